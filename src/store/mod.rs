// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Transdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Transdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persisted key-value storage.
//!
//! Logical documents (`project-storage`, `llm-store`, API keys) are stored as JSON text under
//! string keys. The default backend keeps a single on-disk JSON object mapping those keys to
//! their text.

mod atomic;
pub mod document;
pub mod json_file;
pub mod memory;

use std::fmt;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub(crate) use atomic::write_atomic;
pub use document::{PersistedDocument, PERSIST_VERSION};
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// get/set/remove by string key.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Returns whether the key existed.
    fn remove(&self, key: &str) -> Result<bool, StoreError>;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WriteDurability {
    /// Fast, best-effort persistence.
    ///
    /// - Writes a temp file and renames atomically into place.
    /// - Does not perform per-file fsync/sync.
    #[default]
    BestEffort,

    /// Slower, best-effort durability.
    ///
    /// Attempts to flush written file contents and rename operations to stable storage where
    /// possible. Exact guarantees are platform/filesystem-dependent.
    Durable,
}

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    Encode {
        key: String,
        source: serde_json::Error,
    },
    Decode {
        key: String,
        source: serde_json::Error,
    },
    UnsupportedVersion {
        key: String,
        version: u32,
    },
    InvalidPath {
        path: PathBuf,
    },
    SymlinkRefused {
        path: PathBuf,
    },
    Poisoned,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
            Self::Encode { key, source } => write!(f, "cannot encode document {key:?}: {source}"),
            Self::Decode { key, source } => write!(f, "cannot decode document {key:?}: {source}"),
            Self::UnsupportedVersion { key, version } => {
                write!(f, "document {key:?} has unsupported version {version}")
            }
            Self::InvalidPath { path } => write!(f, "invalid storage path {path:?}"),
            Self::SymlinkRefused { path } => {
                write!(f, "refusing to write through symlink at {path:?}")
            }
            Self::Poisoned => f.write_str("store lock poisoned"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Encode { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
            Self::UnsupportedVersion { .. } => None,
            Self::InvalidPath { .. } => None,
            Self::SymlinkRefused { .. } => None,
            Self::Poisoned => None,
        }
    }
}
