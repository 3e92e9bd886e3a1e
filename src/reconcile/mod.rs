// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Transdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Transdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-verify-write reconciliation of language files against in-memory data.
//!
//! For each language file the disk text is compared with the previous snapshot of that
//! language. A match means nobody else touched the file, so the new snapshot is written
//! (restoring the old text if the write fails). A mismatch is a conflict and the file is
//! left alone.

mod report;
pub mod snapshot;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};

use crate::conflict::diff_language;
use crate::files::FileManager;
use crate::model::{FileLanguage, ProjectSlice};

pub use report::{FileOutcome, FileReport, Notification, ReconcileReport, Severity};
use snapshot::{language_snapshot, parse_language_file, same_content};

/// What to do when a language file cannot be read because it does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MissingFilePolicy {
    /// Skip the file and warn.
    #[default]
    Abort,
    /// Write the new snapshot as a fresh file.
    CreateFresh,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileConfig {
    pub missing_file: MissingFilePolicy,
}

/// Disk texts a user has accepted as the baseline for a file, keyed by path.
pub type Acknowledged = HashMap<PathBuf, String>;

pub struct Reconciler {
    files: Arc<dyn FileManager>,
    config: ReconcileConfig,
}

impl Reconciler {
    pub fn new(files: Arc<dyn FileManager>, config: ReconcileConfig) -> Self {
        Self { files, config }
    }

    pub fn config(&self) -> ReconcileConfig {
        self.config
    }

    /// One pass over every language file of `current`, run concurrently.
    ///
    /// `previous` supplies the baseline snapshots. A file whose disk text equals its
    /// `acknowledged` entry also counts as matching the baseline.
    pub async fn reconcile(
        &self,
        previous: &ProjectSlice,
        current: &ProjectSlice,
        acknowledged: &Acknowledged,
    ) -> ReconcileReport {
        tracing::debug!(
            project = %current.project_id,
            files = current.file_language_map.len(),
            "reconciliation pass started"
        );

        let files = join_all(
            current
                .file_language_map
                .iter()
                .map(|entry| self.reconcile_file(previous, current, entry, acknowledged)),
        )
        .await;

        let report = ReconcileReport {
            project_id: current.project_id.clone(),
            files,
        };
        tracing::debug!(
            project = %report.project_id,
            conflicts = report.has_conflicts(),
            "reconciliation pass finished"
        );
        report
    }

    async fn reconcile_file(
        &self,
        previous: &ProjectSlice,
        current: &ProjectSlice,
        entry: &FileLanguage,
        acknowledged: &Acknowledged,
    ) -> FileReport {
        let path = current.language_file_path(entry);
        let outcome = self
            .reconcile_path(previous, current, &entry.language, &path, acknowledged)
            .await;
        log_outcome(&entry.language, &path, &outcome);
        FileReport {
            language: entry.language.clone(),
            path,
            outcome,
        }
    }

    async fn reconcile_path(
        &self,
        previous: &ProjectSlice,
        current: &ProjectSlice,
        language: &str,
        path: &Path,
        acknowledged: &Acknowledged,
    ) -> FileOutcome {
        let next = match language_snapshot(current.language_data(language)) {
            Ok(text) => text,
            Err(err) => {
                return FileOutcome::Unencodable {
                    error: err.to_string(),
                }
            }
        };

        let disk_text = match self.files.read_file_content(path).await {
            Ok(text) => text,
            Err(err)
                if err.is_not_found()
                    && self.config.missing_file == MissingFilePolicy::CreateFresh =>
            {
                return match self.files.write_file_content(path, &next).await {
                    Ok(()) => FileOutcome::CreatedFresh,
                    Err(err) => FileOutcome::CreateFailed {
                        error: err.to_string(),
                    },
                };
            }
            Err(err) => {
                return FileOutcome::ReadFailed {
                    error: err.to_string(),
                }
            }
        };

        let baseline = match language_snapshot(previous.language_data(language)) {
            Ok(text) => text,
            Err(err) => {
                return FileOutcome::Unencodable {
                    error: err.to_string(),
                }
            }
        };
        let accepted = acknowledged
            .get(path)
            .is_some_and(|text| same_content(text, &disk_text));

        if !same_content(&disk_text, &baseline) && !accepted {
            return match parse_language_file(&disk_text) {
                Ok(disk) => FileOutcome::Conflict {
                    conflicts: diff_language(
                        language,
                        &disk,
                        current.language_data(language).unwrap_or(&Default::default()),
                    ),
                    disk_text,
                },
                Err(err) => FileOutcome::Malformed {
                    error: err.to_string(),
                },
            };
        }

        let Err(write_err) = self.files.write_file_content(path, &next).await else {
            return FileOutcome::Written;
        };

        match self.files.write_file_content(path, &disk_text).await {
            Ok(()) => FileOutcome::WriteFailedRestored {
                error: write_err.to_string(),
            },
            Err(restore_err) => FileOutcome::WriteFailedRestoreFailed {
                error: write_err.to_string(),
                restore_error: restore_err.to_string(),
            },
        }
    }
}

fn log_outcome(language: &str, path: &Path, outcome: &FileOutcome) {
    let path = path.display();
    match outcome {
        FileOutcome::Written => tracing::info!(%language, %path, "language file written"),
        FileOutcome::CreatedFresh => tracing::info!(%language, %path, "language file created"),
        FileOutcome::ReadFailed { error } => {
            tracing::warn!(%language, %path, %error, "language file unreadable; skipped")
        }
        FileOutcome::Malformed { error } => {
            tracing::warn!(%language, %path, %error, "language file changed on disk and is malformed")
        }
        FileOutcome::Conflict { conflicts, .. } => tracing::warn!(
            %language,
            %path,
            conflicts = conflicts.len(),
            "language file changed on disk; not overwriting"
        ),
        FileOutcome::WriteFailedRestored { error } => {
            tracing::error!(%language, %path, %error, "write failed; previous content restored")
        }
        FileOutcome::WriteFailedRestoreFailed {
            error,
            restore_error,
        } => tracing::error!(
            %language,
            %path,
            %error,
            %restore_error,
            "write failed and restore failed"
        ),
        FileOutcome::CreateFailed { error } => {
            tracing::error!(%language, %path, %error, "could not create language file")
        }
        FileOutcome::Unencodable { error } => {
            tracing::error!(%language, %path, %error, "could not serialize language data")
        }
    }
}
