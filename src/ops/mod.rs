// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Transdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Transdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Fine-grained mutation operations on a single project.
//!
//! Operations never fail: referencing an unknown language id or key leaves the project
//! untouched and yields an unchanged delta.

use std::collections::BTreeSet;

use crate::model::{FileLanguage, LanguageId, Project, TranslationData};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectOp {
    AddLanguage {
        entry: FileLanguage,
    },
    RemoveLanguage {
        language_id: LanguageId,
    },
    AddTranslationKey {
        key: String,
    },
    RemoveTranslationByKey {
        key: String,
    },
    /// Renames `old_key` in every language. An existing `new_key` is overwritten.
    RenameTranslationKey {
        old_key: String,
        new_key: String,
    },
    UpdateTranslation {
        language: String,
        key: String,
        value: String,
    },
    /// Per-language, per-key merge; keys absent from the patch are preserved.
    MergeData {
        patch: TranslationData,
    },
    /// Sets (`Some`) or removes (`None`) individual values for one language.
    SetValues {
        language: String,
        values: Vec<(String, Option<String>)>,
    },
}

/// Which languages an op touched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectDelta {
    pub languages: Vec<String>,
    pub language_map_changed: bool,
}

impl ProjectDelta {
    pub fn is_changed(&self) -> bool {
        self.language_map_changed || !self.languages.is_empty()
    }
}

#[derive(Debug, Default)]
struct DeltaBuilder {
    languages: BTreeSet<String>,
    language_map_changed: bool,
}

impl DeltaBuilder {
    fn record_language(&mut self, language: &str) {
        self.languages.insert(language.to_owned());
    }

    fn record_language_map(&mut self) {
        self.language_map_changed = true;
    }

    fn finish(self) -> ProjectDelta {
        ProjectDelta {
            languages: self.languages.into_iter().collect(),
            language_map_changed: self.language_map_changed,
        }
    }
}

pub fn apply_op(project: &mut Project, op: &ProjectOp) -> ProjectDelta {
    let mut delta = DeltaBuilder::default();

    match op {
        ProjectOp::AddLanguage { entry } => add_language(project, entry, &mut delta),
        ProjectOp::RemoveLanguage { language_id } => {
            remove_language(project, language_id, &mut delta)
        }
        ProjectOp::AddTranslationKey { key } => add_translation_key(project, key, &mut delta),
        ProjectOp::RemoveTranslationByKey { key } => {
            for (language, values) in project.data_mut().iter_mut() {
                if values.remove(key).is_some() {
                    delta.record_language(language);
                }
            }
        }
        ProjectOp::RenameTranslationKey { old_key, new_key } => {
            rename_translation_key(project, old_key, new_key, &mut delta)
        }
        ProjectOp::UpdateTranslation {
            language,
            key,
            value,
        } => {
            let values = project.data_mut().entry(language.clone()).or_default();
            if values.get(key) != Some(value) {
                values.insert(key.clone(), value.clone());
                delta.record_language(language);
            }
        }
        ProjectOp::MergeData { patch } => merge_data(project.data_mut(), patch, &mut delta),
        ProjectOp::SetValues { language, values } => {
            set_values(project.data_mut(), language, values, &mut delta)
        }
    }

    let delta = delta.finish();
    if delta.is_changed() {
        let count = project.distinct_key_count();
        project.set_translation_count(count);
        project.touch();
    }
    delta
}

fn add_language(project: &mut Project, entry: &FileLanguage, delta: &mut DeltaBuilder) {
    if project
        .file_language_map()
        .iter()
        .any(|existing| existing.id == entry.id)
    {
        return;
    }

    project.file_language_map_mut().push(entry.clone());
    delta.record_language_map();

    if !project.data().contains_key(&entry.language) {
        project
            .data_mut()
            .insert(entry.language.clone(), Default::default());
        delta.record_language(&entry.language);
    }
}

fn remove_language(project: &mut Project, language_id: &LanguageId, delta: &mut DeltaBuilder) {
    let Some(index) = project
        .file_language_map()
        .iter()
        .position(|entry| &entry.id == language_id)
    else {
        return;
    };

    let removed = project.file_language_map_mut().remove(index);
    delta.record_language_map();

    // Another row may still map a different file to the same label.
    let still_mapped = project
        .file_language_map()
        .iter()
        .any(|entry| entry.language == removed.language);
    if !still_mapped && project.data_mut().remove(&removed.language).is_some() {
        delta.record_language(&removed.language);
    }
}

fn add_translation_key(project: &mut Project, key: &str, delta: &mut DeltaBuilder) {
    let languages = project
        .file_language_map()
        .iter()
        .map(|entry| entry.language.clone())
        .collect::<Vec<_>>();

    for language in languages {
        let values = project.data_mut().entry(language.clone()).or_default();
        if !values.contains_key(key) {
            values.insert(key.to_owned(), String::new());
            delta.record_language(&language);
        }
    }
}

fn rename_translation_key(
    project: &mut Project,
    old_key: &str,
    new_key: &str,
    delta: &mut DeltaBuilder,
) {
    if old_key == new_key {
        return;
    }

    for (language, values) in project.data_mut().iter_mut() {
        let Some(value) = values.remove(old_key) else {
            continue;
        };
        // Last write wins: a pre-existing `new_key` is replaced without a collision check.
        values.insert(new_key.to_owned(), value);
        delta.record_language(language);
    }
}

fn merge_data(data: &mut TranslationData, patch: &TranslationData, delta: &mut DeltaBuilder) {
    for (language, incoming) in patch {
        if incoming.is_empty() {
            continue;
        }
        let values = data.entry(language.clone()).or_default();
        let mut changed = false;
        for (key, value) in incoming {
            if values.get(key) != Some(value) {
                values.insert(key.clone(), value.clone());
                changed = true;
            }
        }
        if changed {
            delta.record_language(language);
        }
    }
}

fn set_values(
    data: &mut TranslationData,
    language: &str,
    updates: &[(String, Option<String>)],
    delta: &mut DeltaBuilder,
) {
    let removal_only = updates.iter().all(|(_, value)| value.is_none());
    let values = if removal_only {
        match data.get_mut(language) {
            Some(values) => values,
            None => return,
        }
    } else {
        data.entry(language.to_owned()).or_default()
    };
    let mut changed = false;
    for (key, value) in updates {
        match value {
            Some(value) => {
                if values.get(key) != Some(value) {
                    values.insert(key.clone(), value.clone());
                    changed = true;
                }
            }
            None => {
                if values.remove(key).is_some() {
                    changed = true;
                }
            }
        }
    }
    if changed {
        delta.record_language(language);
    }
}
