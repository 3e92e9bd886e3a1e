// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Transdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Transdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{LanguageId, ProjectId};

/// Translation key -> translated value for one language.
pub type LanguageData = BTreeMap<String, String>;

/// Language label -> that language's translations.
pub type TranslationData = BTreeMap<String, LanguageData>;

/// One row of a project's language map: `filename` is the JSON file stem under `i18n_path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileLanguage {
    pub id: LanguageId,
    pub filename: String,
    pub language: String,
}

impl FileLanguage {
    pub fn new(filename: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            id: LanguageId::generate(),
            filename: filename.into(),
            language: language.into(),
        }
    }
}

/// One i18n workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    id: ProjectId,
    name: String,
    path: PathBuf,
    i18n_path: PathBuf,
    file_language_map: Vec<FileLanguage>,
    data: TranslationData,
    translation_count: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(
        id: ProjectId,
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        i18n_path: impl Into<PathBuf>,
        file_language_map: Vec<FileLanguage>,
        data: TranslationData,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            path: path.into(),
            i18n_path: i18n_path.into(),
            file_language_map,
            data,
            translation_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &ProjectId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn i18n_path(&self) -> &Path {
        &self.i18n_path
    }

    /// `i18n_path` joined onto `path` when it is project-relative.
    pub fn resolved_i18n_path(&self) -> PathBuf {
        resolve_i18n_path(&self.path, &self.i18n_path)
    }

    pub fn file_language_map(&self) -> &[FileLanguage] {
        &self.file_language_map
    }

    pub fn file_language_map_mut(&mut self) -> &mut Vec<FileLanguage> {
        &mut self.file_language_map
    }

    pub fn data(&self) -> &TranslationData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut TranslationData {
        &mut self.data
    }

    pub fn translation_count(&self) -> u64 {
        self.translation_count
    }

    pub fn set_translation_count(&mut self, translation_count: u64) {
        self.translation_count = translation_count;
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn set_created_at(&mut self, created_at: DateTime<Utc>) {
        self.created_at = created_at;
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn set_updated_at(&mut self, updated_at: DateTime<Utc>) {
        self.updated_at = updated_at;
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Number of distinct translation keys across all languages.
    pub fn distinct_key_count(&self) -> u64 {
        let keys: BTreeSet<&str> = self
            .data
            .values()
            .flat_map(|language| language.keys().map(String::as_str))
            .collect();
        keys.len() as u64
    }

    pub fn language_for_id(&self, language_id: &LanguageId) -> Option<&FileLanguage> {
        self.file_language_map
            .iter()
            .find(|entry| &entry.id == language_id)
    }

    /// The reconciler-facing view of this project.
    pub fn slice(&self) -> ProjectSlice {
        ProjectSlice {
            project_id: self.id.clone(),
            path: self.path.clone(),
            i18n_path: self.i18n_path.clone(),
            file_language_map: self.file_language_map.clone(),
            data: self.data.clone(),
        }
    }
}

/// The part of a project that is mirrored on disk.
///
/// Two slices are compared by value; a change in any field triggers reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSlice {
    pub project_id: ProjectId,
    pub path: PathBuf,
    pub i18n_path: PathBuf,
    pub file_language_map: Vec<FileLanguage>,
    pub data: TranslationData,
}

impl ProjectSlice {
    pub fn resolved_i18n_path(&self) -> PathBuf {
        resolve_i18n_path(&self.path, &self.i18n_path)
    }

    /// Path of the JSON file holding `entry`'s strings.
    pub fn language_file_path(&self, entry: &FileLanguage) -> PathBuf {
        self.resolved_i18n_path()
            .join(format!("{}.json", entry.filename))
    }

    pub fn language_data(&self, language: &str) -> Option<&LanguageData> {
        self.data.get(language)
    }
}

fn resolve_i18n_path(path: &Path, i18n_path: &Path) -> PathBuf {
    if i18n_path.is_absolute() {
        i18n_path.to_path_buf()
    } else {
        path.join(i18n_path)
    }
}
