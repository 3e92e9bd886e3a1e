// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Transdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Transdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Runtime configuration: a camelCase JSON file with every field defaulted, plus a few
//! environment overrides.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::files::LocalFileManager;
use crate::reconcile::{MissingFilePolicy, ReconcileConfig};
use crate::store::{JsonFileStore, WriteDurability};
use crate::sync::{SyncConfig, DEFAULT_DEBOUNCE};

/// Environment variables read by [`Config::with_env_overrides`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigEnv {
    DebounceMs,
    StoragePath,
    LogFilter,
}

impl ConfigEnv {
    pub const ALL: [ConfigEnv; 3] = [Self::DebounceMs, Self::StoragePath, Self::LogFilter];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DebounceMs => "TRANSDESK_DEBOUNCE_MS",
            Self::StoragePath => "TRANSDESK_STORAGE_PATH",
            Self::LogFilter => "TRANSDESK_LOG",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub sync: SyncSettings,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub files: FilesConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncSettings {
    pub debounce_ms: u64,
    pub missing_file: MissingFilePolicy,
    pub write_durability: WriteDurability,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
            missing_file: MissingFilePolicy::default(),
            write_durability: WriteDurability::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageConfig {
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("transdesk-storage.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives; `RUST_LOG` takes precedence for the console.
    pub filter: String,
    /// Daily-rotated log files are written here when set.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilesConfig {
    /// Directory names skipped in listings, on top of the built-in set.
    pub extra_ignores: Vec<String>,
}

impl Config {
    /// Reads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_json_str(&text).map_err(|err| match err {
                ConfigError::Parse { source, .. } => ConfigError::Parse {
                    path: Some(path.to_path_buf()),
                    source,
                },
                other => other,
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(text).map_err(|source| ConfigError::Parse { path: None, source })
    }

    /// Applies `TRANSDESK_*` overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides_from(|name| std::env::var_os(name))
    }

    /// Applies overrides from `lookup`; empty values are ignored.
    pub fn with_overrides_from(
        mut self,
        lookup: impl Fn(&str) -> Option<std::ffi::OsString>,
    ) -> Result<Self, ConfigError> {
        for env in ConfigEnv::ALL {
            let Some(raw) = lookup(env.as_str()) else {
                continue;
            };
            let value = raw.into_string().map_err(|_| ConfigError::InvalidEnv {
                name: env.as_str(),
                value: None,
            })?;
            let value = value.trim();
            if value.is_empty() {
                continue;
            }

            match env {
                ConfigEnv::DebounceMs => {
                    self.sync.debounce_ms =
                        value.parse().map_err(|_| ConfigError::InvalidEnv {
                            name: env.as_str(),
                            value: Some(value.to_owned()),
                        })?;
                }
                ConfigEnv::StoragePath => self.storage.path = PathBuf::from(value),
                ConfigEnv::LogFilter => self.logging.filter = value.to_owned(),
            }
        }
        Ok(self)
    }

    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            debounce: Duration::from_millis(self.sync.debounce_ms),
            reconcile: ReconcileConfig {
                missing_file: self.sync.missing_file,
            },
        }
    }

    pub fn open_store(&self) -> JsonFileStore {
        JsonFileStore::new(&self.storage.path).with_durability(self.sync.write_durability)
    }

    pub fn file_manager(&self) -> LocalFileManager {
        LocalFileManager::new()
            .with_extra_ignores(self.files.extra_ignores.iter().cloned())
            .with_durability(self.sync.write_durability)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Parse {
        path: Option<PathBuf>,
        source: serde_json::Error,
    },
    InvalidEnv {
        name: &'static str,
        value: Option<String>,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read config {path:?}: {source}"),
            Self::Parse {
                path: Some(path),
                source,
            } => write!(f, "invalid config {path:?}: {source}"),
            Self::Parse { path: None, source } => write!(f, "invalid config: {source}"),
            Self::InvalidEnv {
                name,
                value: Some(value),
            } => write!(f, "invalid value {value:?} for {name}"),
            Self::InvalidEnv { name, value: None } => write!(f, "{name} must be valid UTF-8"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::InvalidEnv { .. } => None,
        }
    }
}
