// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Transdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Transdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::{FileEntry, FileError, FileManager};

/// One call to `write_file_content`, successful or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteAttempt {
    pub path: PathBuf,
    pub content: String,
    pub succeeded: bool,
}

#[derive(Debug, Default)]
struct MemoryFiles {
    files: BTreeMap<PathBuf, String>,
    failing_reads: BTreeSet<PathBuf>,
    failing_writes: BTreeMap<PathBuf, usize>,
    writes: Vec<WriteAttempt>,
}

/// In-memory file tree with failure injection, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryFileManager {
    inner: Mutex<MemoryFiles>,
}

impl MemoryFileManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryFiles> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.lock().files.insert(path.into(), content.into());
    }

    pub fn remove(&self, path: &Path) -> Option<String> {
        self.lock().files.remove(path)
    }

    pub fn content(&self, path: &Path) -> Option<String> {
        self.lock().files.get(path).cloned()
    }

    /// Fails every read of `path` until [`Self::clear_failures`].
    pub fn fail_reads(&self, path: impl Into<PathBuf>) {
        self.lock().failing_reads.insert(path.into());
    }

    /// Fails the next `count` writes to `path`.
    pub fn fail_next_writes(&self, path: impl Into<PathBuf>, count: usize) {
        self.lock().failing_writes.insert(path.into(), count);
    }

    pub fn clear_failures(&self) {
        let mut inner = self.lock();
        inner.failing_reads.clear();
        inner.failing_writes.clear();
    }

    pub fn writes(&self) -> Vec<WriteAttempt> {
        self.lock().writes.clone()
    }

    pub fn writes_to(&self, path: &Path) -> Vec<WriteAttempt> {
        self.lock()
            .writes
            .iter()
            .filter(|attempt| attempt.path == path)
            .cloned()
            .collect()
    }

    fn list(&self, dir: &Path, dirs_only: bool) -> Vec<FileEntry> {
        let inner = self.lock();
        let mut dirs = BTreeSet::new();
        let mut entries = Vec::new();

        for (path, content) in &inner.files {
            let Ok(relative) = path.strip_prefix(dir) else {
                continue;
            };
            let mut current = dir.to_path_buf();
            let components = relative.components().collect::<Vec<_>>();
            for component in components.iter().take(components.len().saturating_sub(1)) {
                current.push(component);
                dirs.insert(current.clone());
            }
            if !dirs_only {
                entries.push(FileEntry {
                    name: file_name(path),
                    path: path.clone(),
                    is_directory: false,
                    size: Some(content.len() as u64),
                    modified_time: None,
                });
            }
        }

        entries.extend(dirs.into_iter().map(|path| FileEntry {
            name: file_name(&path),
            path,
            is_directory: true,
            size: None,
            modified_time: None,
        }));
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        entries
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[async_trait]
impl FileManager for MemoryFileManager {
    async fn read_project_files(&self, dir: &Path) -> Result<Vec<FileEntry>, FileError> {
        Ok(self.list(dir, false))
    }

    async fn read_project_folders(&self, dir: &Path) -> Result<Vec<FileEntry>, FileError> {
        Ok(self.list(dir, true))
    }

    async fn read_file_content(&self, path: &Path) -> Result<String, FileError> {
        let inner = self.lock();
        if inner.failing_reads.contains(path) {
            return Err(FileError::Injected {
                path: path.to_path_buf(),
            });
        }
        inner
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| FileError::NotFound {
                path: path.to_path_buf(),
            })
    }

    async fn write_file_content(&self, path: &Path, content: &str) -> Result<(), FileError> {
        let mut inner = self.lock();
        let fail = match inner.failing_writes.get_mut(path) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            _ => false,
        };

        inner.writes.push(WriteAttempt {
            path: path.to_path_buf(),
            content: content.to_owned(),
            succeeded: !fail,
        });

        if fail {
            return Err(FileError::Injected {
                path: path.to_path_buf(),
            });
        }

        inner.files.insert(path.to_path_buf(), content.to_owned());
        Ok(())
    }
}
