// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Transdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Transdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{FileLanguage, Project, ProjectId, TranslationData};

/// Persisted layout of the `project-storage` document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProjectStorageJson {
    #[serde(default)]
    pub(crate) current_project_id: Option<String>,
    #[serde(default)]
    pub(crate) projects: BTreeMap<String, ProjectJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProjectJson {
    id: String,
    name: String,
    path: PathBuf,
    i18n_path: PathBuf,
    #[serde(default)]
    file_language_map: Vec<FileLanguage>,
    #[serde(default)]
    data: TranslationData,
    #[serde(default)]
    translation_count: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

pub(crate) fn project_to_json(project: &Project) -> ProjectJson {
    ProjectJson {
        id: project.id().to_string(),
        name: project.name().to_owned(),
        path: project.path().to_path_buf(),
        i18n_path: project.i18n_path().to_path_buf(),
        file_language_map: project.file_language_map().to_vec(),
        data: project.data().clone(),
        translation_count: project.translation_count(),
        created_at: project.created_at(),
        updated_at: project.updated_at(),
    }
}

pub(crate) fn project_from_json(project_json: ProjectJson) -> Option<Project> {
    let id = match ProjectId::new(project_json.id.clone()) {
        Ok(id) => id,
        Err(err) => {
            tracing::warn!(id = %project_json.id, error = %err, "dropping persisted project with invalid id");
            return None;
        }
    };

    let mut project = Project::new(
        id,
        project_json.name,
        project_json.path,
        project_json.i18n_path,
        project_json.file_language_map,
        project_json.data,
    );
    project.set_translation_count(project_json.translation_count);
    project.set_created_at(project_json.created_at);
    project.set_updated_at(project_json.updated_at);
    Some(project)
}

pub(crate) fn storage_to_json(
    current_project_id: Option<&ProjectId>,
    projects: &BTreeMap<ProjectId, Project>,
) -> ProjectStorageJson {
    ProjectStorageJson {
        current_project_id: current_project_id.map(ToString::to_string),
        projects: projects
            .iter()
            .map(|(id, project)| (id.to_string(), project_to_json(project)))
            .collect(),
    }
}

pub(crate) fn storage_from_json(
    storage: ProjectStorageJson,
) -> (Option<ProjectId>, BTreeMap<ProjectId, Project>) {
    let projects = storage
        .projects
        .into_values()
        .filter_map(project_from_json)
        .map(|project| (project.id().clone(), project))
        .collect::<BTreeMap<_, _>>();

    let current_project_id = storage
        .current_project_id
        .and_then(|raw| ProjectId::new(raw).ok())
        .filter(|id| projects.contains_key(id));

    (current_project_id, projects)
}
