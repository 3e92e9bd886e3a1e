// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Transdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Transdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Catalog of projects with a current-project pointer.
//!
//! Every mutation persists the catalog into the `project-storage` document and publishes the
//! current project's [`ProjectSlice`] to subscribers when it changed by value. When the
//! current project changes, the outgoing project's last published slice is also broadcast so
//! a listener that missed intermediate values can still flush it.

mod persist;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{broadcast, watch};

use crate::files::{FileEntry, FileManager};
use crate::model::{
    FileLanguage, LanguageId, Project, ProjectId, ProjectSlice, TranslationData,
};
use crate::ops::{apply_op, ProjectDelta, ProjectOp};
use crate::store::{KeyValueStore, PersistedDocument};

use persist::{storage_from_json, storage_to_json, ProjectStorageJson};

pub const PROJECT_STORAGE_KEY: &str = "project-storage";

const DEPARTURE_CAPACITY: usize = 64;

pub struct ProjectRepository {
    store: Arc<dyn KeyValueStore>,
    files: Arc<dyn FileManager>,
    document: PersistedDocument<ProjectStorageJson>,
    current_project_id: Option<ProjectId>,
    projects: BTreeMap<ProjectId, Project>,
    project_files: Vec<FileEntry>,
    changes: watch::Sender<Option<ProjectSlice>>,
    departures: broadcast::Sender<ProjectSlice>,
}

impl std::fmt::Debug for ProjectRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectRepository")
            .field("current_project_id", &self.current_project_id)
            .field("projects", &self.projects.len())
            .field("project_files", &self.project_files.len())
            .finish()
    }
}

impl ProjectRepository {
    /// Hydrates from the store. An unreadable document is logged and treated as empty.
    pub fn load(store: Arc<dyn KeyValueStore>, files: Arc<dyn FileManager>) -> Self {
        let document = PersistedDocument::<ProjectStorageJson>::new(PROJECT_STORAGE_KEY);
        let (current_project_id, projects) = match document.load(store.as_ref()) {
            Ok(Some(storage)) => storage_from_json(storage),
            Ok(None) => (None, BTreeMap::new()),
            Err(err) => {
                tracing::warn!(key = PROJECT_STORAGE_KEY, error = %err, "ignoring unreadable project storage");
                (None, BTreeMap::new())
            }
        };

        let initial = current_project_id
            .as_ref()
            .and_then(|id| projects.get(id))
            .map(Project::slice);
        let (changes, _) = watch::channel(initial);
        let (departures, _) = broadcast::channel(DEPARTURE_CAPACITY);

        tracing::debug!(
            projects = projects.len(),
            current = ?current_project_id,
            "loaded project repository"
        );

        Self {
            store,
            files,
            document,
            current_project_id,
            projects,
            project_files: Vec::new(),
            changes,
            departures,
        }
    }

    /// Receives the current project's slice whenever it changes by value.
    pub fn subscribe(&self) -> watch::Receiver<Option<ProjectSlice>> {
        self.changes.subscribe()
    }

    /// Receives the last published slice of a project each time it stops being current.
    pub fn subscribe_departures(&self) -> broadcast::Receiver<ProjectSlice> {
        self.departures.subscribe()
    }

    pub fn current_project_id(&self) -> Option<&ProjectId> {
        self.current_project_id.as_ref()
    }

    pub fn current_project(&self) -> Option<&Project> {
        self.current_project_id
            .as_ref()
            .and_then(|id| self.projects.get(id))
    }

    pub fn project(&self, id: &ProjectId) -> Option<&Project> {
        self.projects.get(id)
    }

    pub fn projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.values()
    }

    /// Cached listing of the current project's directory. Never persisted.
    pub fn project_files(&self) -> &[FileEntry] {
        &self.project_files
    }

    pub fn create_project(
        &mut self,
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        i18n_path: impl Into<PathBuf>,
        file_language_map: Vec<FileLanguage>,
        data: Option<TranslationData>,
    ) -> Project {
        let project = Project::new(
            ProjectId::generate(),
            name,
            path,
            i18n_path,
            file_language_map,
            data.unwrap_or_default(),
        );
        let id = project.id().clone();
        tracing::info!(project = %id, name = project.name(), "created project");

        self.projects.insert(id.clone(), project.clone());
        self.current_project_id = Some(id);
        self.project_files.clear();
        self.commit();
        project
    }

    /// Makes `id` current. An unknown id leaves no project current.
    pub fn switch_project(&mut self, id: &ProjectId) {
        self.current_project_id = self.projects.contains_key(id).then(|| id.clone());
        if self.current_project_id.is_none() {
            tracing::debug!(project = %id, "switch to unknown project");
        }
        self.project_files.clear();
        self.commit();
    }

    /// Replaces the record at `project.id()`. Returns `false` for an unknown id.
    pub fn update_project(&mut self, mut project: Project) -> bool {
        let Some(slot) = self.projects.get_mut(project.id()) else {
            tracing::debug!(project = %project.id(), "update of unknown project ignored");
            return false;
        };
        project.touch();
        *slot = project;
        self.commit();
        true
    }

    /// Deletes the current project; the first remaining project (by id) becomes current.
    pub fn remove_current_project(&mut self) -> Option<Project> {
        let id = self.current_project_id.take()?;
        let removed = self.projects.remove(&id);
        self.current_project_id = self.projects.keys().next().cloned();
        self.project_files.clear();
        tracing::info!(project = %id, next = ?self.current_project_id, "removed project");
        self.commit();
        removed
    }

    /// Adds a language file entry and seeds an empty map for it.
    pub fn add_language(
        &mut self,
        filename: impl Into<String>,
        language: impl Into<String>,
    ) -> Option<LanguageId> {
        self.current_project()?;
        let entry = FileLanguage::new(filename, language);
        let id = entry.id.clone();
        self.apply(ProjectOp::AddLanguage { entry })
            .is_changed()
            .then_some(id)
    }

    pub fn remove_language(&mut self, language_id: &LanguageId) -> ProjectDelta {
        self.apply(ProjectOp::RemoveLanguage {
            language_id: language_id.clone(),
        })
    }

    pub fn remove_translation_by_key(&mut self, key: &str) -> ProjectDelta {
        self.apply(ProjectOp::RemoveTranslationByKey {
            key: key.to_owned(),
        })
    }

    /// Renames a key in every language, overwriting an existing `new_key`.
    pub fn update_translation_key(&mut self, old_key: &str, new_key: &str) -> ProjectDelta {
        self.apply(ProjectOp::RenameTranslationKey {
            old_key: old_key.to_owned(),
            new_key: new_key.to_owned(),
        })
    }

    pub fn add_translation_key(&mut self, key: &str) -> ProjectDelta {
        self.apply(ProjectOp::AddTranslationKey {
            key: key.to_owned(),
        })
    }

    pub fn update_translation(&mut self, language: &str, key: &str, value: &str) -> ProjectDelta {
        self.apply(ProjectOp::UpdateTranslation {
            language: language.to_owned(),
            key: key.to_owned(),
            value: value.to_owned(),
        })
    }

    /// Additive per-language merge; the patch wins on shared keys.
    pub fn update_data(&mut self, patch: TranslationData) -> ProjectDelta {
        self.apply(ProjectOp::MergeData { patch })
    }

    /// Applies one op to the current project. No current project means no change.
    pub fn apply(&mut self, op: ProjectOp) -> ProjectDelta {
        self.apply_all(std::iter::once(op))
    }

    /// Applies ops in order, persisting and publishing once at the end.
    pub fn apply_all(&mut self, ops: impl IntoIterator<Item = ProjectOp>) -> ProjectDelta {
        let Some(project) = self
            .current_project_id
            .as_ref()
            .and_then(|id| self.projects.get_mut(id))
        else {
            return ProjectDelta::default();
        };

        let mut total = ProjectDelta::default();
        for op in ops {
            let delta = apply_op(project, &op);
            total.language_map_changed |= delta.language_map_changed;
            for language in delta.languages {
                if !total.languages.contains(&language) {
                    total.languages.push(language);
                }
            }
        }

        if total.is_changed() {
            self.commit();
        }
        total
    }

    /// Refreshes the cached listing; failures degrade to an empty list.
    pub async fn fetch_project_files(&mut self) -> &[FileEntry] {
        let Some(path) = self.current_project().map(|project| project.path().to_path_buf()) else {
            self.project_files.clear();
            return &self.project_files;
        };

        self.project_files = match self.files.read_project_files(&path).await {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to list project files");
                Vec::new()
            }
        };
        &self.project_files
    }

    fn commit(&self) {
        self.persist();
        self.publish();
    }

    fn persist(&self) {
        let storage = storage_to_json(self.current_project_id.as_ref(), &self.projects);
        if let Err(err) = self.document.save(self.store.as_ref(), &storage) {
            tracing::warn!(key = PROJECT_STORAGE_KEY, error = %err, "failed to persist projects");
        }
    }

    fn publish(&self) {
        let slice = self.current_project().map(Project::slice);
        self.changes.send_if_modified(|current| {
            if *current == slice {
                return false;
            }
            if let Some(outgoing) = current.as_ref() {
                let switched = slice
                    .as_ref()
                    .map_or(true, |next| next.project_id != outgoing.project_id);
                if switched {
                    // No receivers just means no sync worker is running.
                    let _ = self.departures.send(outgoing.clone());
                }
            }
            *current = slice;
            true
        });
    }
}

#[cfg(test)]
mod tests;
