// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Transdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Transdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ignore::WalkBuilder;

use super::{FileEntry, FileError, FileManager};
use crate::store::{write_atomic, WriteDurability};

/// Directory names never descended into when listing a project.
pub const DEFAULT_IGNORED_DIRS: &[&str] = &["node_modules", ".git", "dist", "build", "target"];

/// Real filesystem access. Listings honor `.gitignore` files and [`DEFAULT_IGNORED_DIRS`].
#[derive(Debug, Clone)]
pub struct LocalFileManager {
    ignored_dirs: Vec<String>,
    durability: WriteDurability,
}

impl Default for LocalFileManager {
    fn default() -> Self {
        Self {
            ignored_dirs: DEFAULT_IGNORED_DIRS
                .iter()
                .map(|name| (*name).to_owned())
                .collect(),
            durability: WriteDurability::default(),
        }
    }
}

impl LocalFileManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extra_ignores(mut self, names: impl IntoIterator<Item = String>) -> Self {
        for name in names {
            if !self.ignored_dirs.contains(&name) {
                self.ignored_dirs.push(name);
            }
        }
        self
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn ignored_dirs(&self) -> &[String] {
        &self.ignored_dirs
    }

    async fn list(&self, dir: &Path, dirs_only: bool) -> Result<Vec<FileEntry>, FileError> {
        let root = dir.to_path_buf();
        let ignored = self.ignored_dirs.clone();
        tokio::task::spawn_blocking(move || walk(&root, ignored, dirs_only))
            .await
            .map_err(|err| FileError::Task {
                message: err.to_string(),
            })?
    }
}

fn walk(root: &Path, ignored: Vec<String>, dirs_only: bool) -> Result<Vec<FileEntry>, FileError> {
    let metadata = fs::metadata(root).map_err(|source| FileError::from_io(root, source))?;
    if !metadata.is_dir() {
        return Err(FileError::Walk {
            path: root.to_path_buf(),
            message: "not a directory".to_owned(),
        });
    }

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(true)
        .require_git(false)
        .filter_entry(move |entry| {
            if entry.depth() == 0 {
                return true;
            }
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            !(is_dir
                && ignored
                    .iter()
                    .any(|name| entry.file_name().to_string_lossy() == name.as_str()))
        })
        .build();

    let mut entries = Vec::new();
    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(root = %root.display(), error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if entry.depth() == 0 {
            continue;
        }

        let is_directory = entry.file_type().is_some_and(|ft| ft.is_dir());
        if dirs_only && !is_directory {
            continue;
        }

        let metadata = entry.metadata().ok();
        entries.push(FileEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.path().to_path_buf(),
            is_directory,
            size: metadata
                .as_ref()
                .filter(|md| md.is_file())
                .map(|md| md.len()),
            modified_time: metadata
                .as_ref()
                .and_then(|md| md.modified().ok())
                .map(DateTime::<Utc>::from),
        });
    }

    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
}

#[async_trait]
impl FileManager for LocalFileManager {
    async fn read_project_files(&self, dir: &Path) -> Result<Vec<FileEntry>, FileError> {
        self.list(dir, false).await
    }

    async fn read_project_folders(&self, dir: &Path) -> Result<Vec<FileEntry>, FileError> {
        self.list(dir, true).await
    }

    async fn read_file_content(&self, path: &Path) -> Result<String, FileError> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| FileError::from_io(path, source))
    }

    async fn write_file_content(&self, path: &Path, content: &str) -> Result<(), FileError> {
        let target: PathBuf = path.to_path_buf();
        let bytes = content.as_bytes().to_vec();
        let durability = self.durability;
        tokio::task::spawn_blocking(move || {
            write_atomic(&target, &bytes, durability).map_err(|source| FileError::Write {
                path: target.clone(),
                source,
            })
        })
        .await
        .map_err(|err| FileError::Task {
            message: err.to_string(),
        })?
    }
}
