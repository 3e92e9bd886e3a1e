// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Transdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Transdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Conflicts between on-disk translation files and in-memory data, and the session a user
//! steps through to resolve them.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::model::{LanguageData, ProjectId};
use crate::ops::ProjectOp;

/// One translation entry whose disk value differs from the in-memory value.
///
/// A `None` side means the key is absent there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub key: String,
    pub language: String,
    pub original_value: Option<String>,
    pub new_value: Option<String>,
}

impl Conflict {
    /// The value the entry takes under `action`; `None` removes the key.
    pub fn resolved_value(&self, action: &ResolutionAction) -> Option<String> {
        match action {
            ResolutionAction::OriginalValue => self.original_value.clone(),
            ResolutionAction::NewValue => self.new_value.clone(),
            ResolutionAction::UseCustom { custom_value } => Some(custom_value.clone()),
        }
    }
}

/// Per-key differences between a disk map and an in-memory map, sorted by key.
pub fn diff_language(language: &str, disk: &LanguageData, memory: &LanguageData) -> Vec<Conflict> {
    let keys: BTreeSet<&String> = disk.keys().chain(memory.keys()).collect();
    keys.into_iter()
        .filter_map(|key| {
            let original_value = disk.get(key);
            let new_value = memory.get(key);
            (original_value != new_value).then(|| Conflict {
                key: key.clone(),
                language: language.to_owned(),
                original_value: original_value.cloned(),
                new_value: new_value.cloned(),
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ResolutionAction {
    OriginalValue,
    NewValue,
    #[serde(rename_all = "camelCase")]
    UseCustom { custom_value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictResolution {
    pub key: String,
    pub language: String,
    #[serde(flatten)]
    pub action: ResolutionAction,
}

/// A language file that was left untouched because it diverged from the last snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictedFile {
    pub language: String,
    pub path: PathBuf,
    /// Disk content as read when the conflict was detected.
    pub disk_text: String,
}

/// Everything one reconciliation pass refused to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictBatch {
    pub project_id: ProjectId,
    pub files: Vec<ConflictedFile>,
    pub conflicts: Vec<Conflict>,
}

impl ConflictBatch {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn session(&self) -> ConflictSession {
        ConflictSession::new(self.conflicts.clone())
    }
}

/// Turns committed resolutions into ops on the project's data, one per language.
///
/// Resolutions that match no conflict are skipped.
pub fn resolution_ops(conflicts: &[Conflict], resolutions: &[ConflictResolution]) -> Vec<ProjectOp> {
    let mut by_language: BTreeMap<&str, Vec<(String, Option<String>)>> = BTreeMap::new();
    for resolution in resolutions {
        let Some(conflict) = conflicts
            .iter()
            .find(|c| c.key == resolution.key && c.language == resolution.language)
        else {
            tracing::debug!(key = %resolution.key, language = %resolution.language, "resolution without conflict");
            continue;
        };
        by_language
            .entry(conflict.language.as_str())
            .or_default()
            .push((conflict.key.clone(), conflict.resolved_value(&resolution.action)));
    }

    by_language
        .into_iter()
        .map(|(language, values)| ProjectOp::SetValues {
            language: language.to_owned(),
            values,
        })
        .collect()
}

/// Checks that `resolutions` settle every conflict exactly once and nothing else.
pub fn check_resolutions(
    conflicts: &[Conflict],
    resolutions: &[ConflictResolution],
) -> Result<(), ConflictError> {
    let mut seen: BTreeSet<(&str, &str)> = BTreeSet::new();
    for resolution in resolutions {
        let target = (resolution.language.as_str(), resolution.key.as_str());
        if !conflicts
            .iter()
            .any(|c| c.language == target.0 && c.key == target.1)
        {
            return Err(ConflictError::Unmatched {
                key: resolution.key.clone(),
                language: resolution.language.clone(),
            });
        }
        if !seen.insert(target) {
            return Err(ConflictError::Duplicate {
                key: resolution.key.clone(),
                language: resolution.language.clone(),
            });
        }
    }
    if seen.len() != conflicts.len() {
        return Err(ConflictError::Incomplete {
            resolved: seen.len(),
            total: conflicts.len(),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Showing an unresolved conflict.
    Presenting { index: usize },
    /// Showing a conflict that already has a resolution.
    Resolving { index: usize },
    AllResolved,
    Committed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Finish {
    Committed,
    Cancelled,
}

/// Stepwise resolution of a fixed batch of conflicts.
#[derive(Debug, Clone)]
pub struct ConflictSession {
    conflicts: Vec<Conflict>,
    resolutions: Vec<ConflictResolution>,
    index: usize,
    finished: Option<Finish>,
}

impl ConflictSession {
    pub fn new(conflicts: Vec<Conflict>) -> Self {
        Self {
            conflicts,
            resolutions: Vec::new(),
            index: 0,
            finished: None,
        }
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn resolutions(&self) -> &[ConflictResolution] {
        &self.resolutions
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&Conflict> {
        self.conflicts.get(self.index)
    }

    pub fn state(&self) -> SessionState {
        match self.finished {
            Some(Finish::Committed) => SessionState::Committed,
            Some(Finish::Cancelled) => SessionState::Cancelled,
            None if self.can_commit() => SessionState::AllResolved,
            None if self.resolution_at(self.index).is_some() => {
                SessionState::Resolving { index: self.index }
            }
            None => SessionState::Presenting { index: self.index },
        }
    }

    pub fn next(&mut self) {
        self.go_to(self.index.saturating_add(1));
    }

    pub fn previous(&mut self) {
        self.go_to(self.index.saturating_sub(1));
    }

    /// Moves to `index`, clamped to the batch.
    pub fn go_to(&mut self, index: usize) {
        self.index = index.min(self.conflicts.len().saturating_sub(1));
    }

    pub fn resolution_at(&self, index: usize) -> Option<&ResolutionAction> {
        let conflict = self.conflicts.get(index)?;
        self.position_of(conflict)
            .map(|position| &self.resolutions[position].action)
    }

    /// Records `action` for the current conflict, replacing an earlier choice in place.
    pub fn resolve(&mut self, action: ResolutionAction) -> Result<(), ConflictError> {
        self.ensure_open()?;
        let conflict = self
            .conflicts
            .get(self.index)
            .ok_or(ConflictError::OutOfRange {
                index: self.index,
                len: self.conflicts.len(),
            })?;

        let resolution = ConflictResolution {
            key: conflict.key.clone(),
            language: conflict.language.clone(),
            action,
        };
        match self.position_of(conflict) {
            Some(position) => self.resolutions[position] = resolution,
            None => self.resolutions.push(resolution),
        }
        Ok(())
    }

    /// Chooses a custom value, keeping text already entered for this conflict.
    pub fn select_custom(&mut self) -> Result<(), ConflictError> {
        let custom_value = match self.resolution_at(self.index) {
            Some(ResolutionAction::UseCustom { custom_value }) => custom_value.clone(),
            _ => String::new(),
        };
        self.resolve(ResolutionAction::UseCustom { custom_value })
    }

    pub fn set_custom_value(&mut self, value: impl Into<String>) -> Result<(), ConflictError> {
        self.resolve(ResolutionAction::UseCustom {
            custom_value: value.into(),
        })
    }

    /// Every conflict has exactly one resolution.
    pub fn can_commit(&self) -> bool {
        self.resolutions.len() == self.conflicts.len()
    }

    pub fn commit(&mut self) -> Result<Vec<ConflictResolution>, ConflictError> {
        self.ensure_open()?;
        if !self.can_commit() {
            return Err(ConflictError::Incomplete {
                resolved: self.resolutions.len(),
                total: self.conflicts.len(),
            });
        }
        self.finished = Some(Finish::Committed);
        Ok(std::mem::take(&mut self.resolutions))
    }

    /// Drops every recorded resolution.
    pub fn cancel(&mut self) {
        self.resolutions.clear();
        self.finished = Some(Finish::Cancelled);
    }

    fn ensure_open(&self) -> Result<(), ConflictError> {
        match self.finished {
            Some(_) => Err(ConflictError::Finished),
            None => Ok(()),
        }
    }

    fn position_of(&self, conflict: &Conflict) -> Option<usize> {
        self.resolutions
            .iter()
            .position(|r| r.key == conflict.key && r.language == conflict.language)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictError {
    Incomplete { resolved: usize, total: usize },
    Finished,
    OutOfRange { index: usize, len: usize },
    Unmatched { key: String, language: String },
    Duplicate { key: String, language: String },
    /// The batch belongs to a project that is no longer current.
    StaleBatch { project_id: ProjectId },
}

impl fmt::Display for ConflictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incomplete { resolved, total } => {
                write!(f, "only {resolved} of {total} conflicts are resolved")
            }
            Self::Finished => write!(f, "conflict session already finished"),
            Self::OutOfRange { index, len } => {
                write!(f, "conflict index {index} out of range for {len} conflicts")
            }
            Self::Unmatched { key, language } => {
                write!(f, "no conflict for key {key:?} in {language}")
            }
            Self::Duplicate { key, language } => {
                write!(f, "key {key:?} in {language} is resolved more than once")
            }
            Self::StaleBatch { project_id } => {
                write!(f, "conflict batch for project {project_id} is not current")
            }
        }
    }
}

impl std::error::Error for ConflictError {}
