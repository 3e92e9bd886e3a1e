// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Transdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Transdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::path::PathBuf;

use serde::Serialize;

use crate::conflict::{Conflict, ConflictBatch, ConflictedFile};
use crate::model::ProjectId;

/// What happened to one language file during a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Disk matched the baseline and the new snapshot was written.
    Written,
    /// The file was missing and a fresh snapshot was created.
    CreatedFresh,
    ReadFailed { error: String },
    /// Disk diverged from the baseline and is not a JSON string map.
    Malformed { error: String },
    /// Disk diverged from the baseline; nothing was written.
    Conflict {
        conflicts: Vec<Conflict>,
        disk_text: String,
    },
    WriteFailedRestored { error: String },
    /// The write failed and the original content could not be put back.
    WriteFailedRestoreFailed {
        error: String,
        restore_error: String,
    },
    CreateFailed { error: String },
    Unencodable { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub language: String,
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

impl FileReport {
    pub fn notification(&self) -> Notification {
        let path = self.path.display();
        let language = &self.language;
        let (severity, message) = match &self.outcome {
            FileOutcome::Written => (Severity::Info, format!("Saved {language} to {path}")),
            FileOutcome::CreatedFresh => {
                (Severity::Info, format!("Created {path} for {language}"))
            }
            FileOutcome::ReadFailed { error } => (
                Severity::Warning,
                format!("Could not read {path}; {language} was not saved: {error}"),
            ),
            FileOutcome::Malformed { error } => (
                Severity::Warning,
                format!("{path} changed on disk and is not valid translation JSON: {error}"),
            ),
            FileOutcome::Conflict { conflicts, .. } => (
                Severity::Warning,
                format!(
                    "{path} changed on disk; {} {language} entries need review",
                    conflicts.len()
                ),
            ),
            FileOutcome::WriteFailedRestored { error } => (
                Severity::Error,
                format!("Saving {path} failed and the previous content was restored: {error}"),
            ),
            FileOutcome::WriteFailedRestoreFailed {
                error,
                restore_error,
            } => (
                Severity::Critical,
                format!(
                    "Saving {path} failed ({error}) and restoring it also failed ({restore_error}); the file may be damaged"
                ),
            ),
            FileOutcome::CreateFailed { error } => (
                Severity::Error,
                format!("Could not create {path} for {language}: {error}"),
            ),
            FileOutcome::Unencodable { error } => (
                Severity::Error,
                format!("Could not serialize {language}: {error}"),
            ),
        };

        Notification {
            severity,
            language: self.language.clone(),
            path: self.path.clone(),
            message,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

/// A user-facing message about one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub severity: Severity,
    pub language: String,
    pub path: PathBuf,
    pub message: String,
}

/// Result of one reconciliation pass over every language file of a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub project_id: ProjectId,
    pub files: Vec<FileReport>,
}

impl ReconcileReport {
    pub fn file(&self, language: &str) -> Option<&FileReport> {
        self.files.iter().find(|file| file.language == language)
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.files.iter().map(FileReport::notification).collect()
    }

    pub fn has_conflicts(&self) -> bool {
        self.files
            .iter()
            .any(|file| matches!(file.outcome, FileOutcome::Conflict { .. }))
    }

    /// Conflicting files of this pass, or `None` when every file was handled.
    pub fn conflict_batch(&self) -> Option<ConflictBatch> {
        let mut files = Vec::new();
        let mut conflicts = Vec::new();
        for file in &self.files {
            if let FileOutcome::Conflict {
                conflicts: file_conflicts,
                disk_text,
            } = &file.outcome
            {
                files.push(ConflictedFile {
                    language: file.language.clone(),
                    path: file.path.clone(),
                    disk_text: disk_text.clone(),
                });
                conflicts.extend(file_conflicts.iter().cloned());
            }
        }

        (!files.is_empty()).then(|| ConflictBatch {
            project_id: self.project_id.clone(),
            files,
            conflicts,
        })
    }
}
