// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Transdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Transdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! File and folder access for project directories and translation files.

pub mod local;
pub mod memory;

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::StoreError;

pub use local::LocalFileManager;
pub use memory::{MemoryFileManager, WriteAttempt};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_directory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait FileManager: Send + Sync {
    /// Every file and directory below `dir`, honoring ignore rules, sorted by path.
    async fn read_project_files(&self, dir: &Path) -> Result<Vec<FileEntry>, FileError>;

    /// Directories below `dir`, honoring ignore rules, sorted by path.
    async fn read_project_folders(&self, dir: &Path) -> Result<Vec<FileEntry>, FileError>;

    async fn read_file_content(&self, path: &Path) -> Result<String, FileError>;

    async fn write_file_content(&self, path: &Path, content: &str) -> Result<(), FileError>;
}

#[derive(Debug)]
pub enum FileError {
    NotFound { path: PathBuf },
    Io { path: PathBuf, source: io::Error },
    Walk { path: PathBuf, message: String },
    Write { path: PathBuf, source: StoreError },
    Task { message: String },
    Injected { path: PathBuf },
}

impl FileError {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NotFound { path }
            | Self::Io { path, .. }
            | Self::Walk { path, .. }
            | Self::Write { path, .. }
            | Self::Injected { path } => Some(path),
            Self::Task { .. } => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Io { source, .. } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }

    fn from_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => write!(f, "file not found: {path:?}"),
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Walk { path, message } => write!(f, "cannot list {path:?}: {message}"),
            Self::Write { path, source } => write!(f, "cannot write {path:?}: {source}"),
            Self::Task { message } => write!(f, "file task failed: {message}"),
            Self::Injected { path } => write!(f, "injected failure for {path:?}"),
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Write { source, .. } => Some(source),
            Self::NotFound { .. } | Self::Walk { .. } | Self::Task { .. } | Self::Injected { .. } => {
                None
            }
        }
    }
}
