// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Transdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Transdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Background driver that keeps language files in step with the repository.
//!
//! One worker task per repository watches the current project's slice. Every change restarts
//! a trailing debounce timer; when it expires the worker reconciles the project's baseline
//! against the latest slice. Passes never overlap because only the worker runs them.
//! Baselines are kept per project: the first sight of a project only records one, and a
//! project that stops being current has its last slice flushed before anything else runs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::{broadcast, mpsc, watch, Notify};
use tokio::task::JoinHandle;

use crate::conflict::{
    check_resolutions, resolution_ops, ConflictBatch, ConflictError, ConflictResolution,
};
use crate::files::FileManager;
use crate::model::{ProjectId, ProjectSlice};
use crate::ops::ProjectDelta;
use crate::reconcile::{Acknowledged, ReconcileConfig, ReconcileReport, Reconciler};
use crate::repository::ProjectRepository;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    pub debounce: Duration,
    pub reconcile: ReconcileConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            reconcile: ReconcileConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// A pass finished; sent for every pass.
    Reconciled(ReconcileReport),
    /// The pass left files untouched because they changed on disk.
    Conflicts(ConflictBatch),
}

pub struct SyncService;

impl SyncService {
    /// Starts the worker for `repo`. The current slice becomes the initial baseline.
    pub fn spawn(
        repo: &ProjectRepository,
        files: Arc<dyn FileManager>,
        config: SyncConfig,
    ) -> (SyncHandle, mpsc::UnboundedReceiver<SyncEvent>) {
        let mut slices = repo.subscribe();
        let departures = repo.subscribe_departures();
        let baselines = slices
            .borrow_and_update()
            .clone()
            .map(|slice| (slice.project_id.clone(), slice))
            .into_iter()
            .collect();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let force = Arc::new(Notify::new());
        let acknowledged = Arc::new(Mutex::new(Acknowledged::new()));

        let worker = Worker {
            slices,
            departures,
            baselines,
            reconciler: Reconciler::new(files, config.reconcile),
            debounce: config.debounce,
            force: force.clone(),
            acknowledged: acknowledged.clone(),
            events: events_tx,
        };
        let task = tokio::spawn(worker.run());

        (
            SyncHandle {
                force,
                acknowledged,
                task,
            },
            events_rx,
        )
    }
}

pub struct SyncHandle {
    force: Arc<Notify>,
    acknowledged: Arc<Mutex<Acknowledged>>,
    task: JoinHandle<()>,
}

impl SyncHandle {
    /// Runs a pass as soon as the worker is idle, skipping the debounce window.
    pub fn request_pass(&self) {
        self.force.notify_one();
    }

    /// Applies committed resolutions and lets the next pass write over the conflicting files.
    ///
    /// `resolutions` must settle every conflict of `batch` exactly once; otherwise nothing is
    /// applied. The disk texts recorded in `batch` become the accepted baseline for their
    /// files. If a file changed again since, the next pass reports a fresh conflict instead.
    pub fn finish_conflict_resolution(
        &self,
        repo: &mut ProjectRepository,
        batch: &ConflictBatch,
        resolutions: &[ConflictResolution],
    ) -> Result<ProjectDelta, ConflictError> {
        if repo.current_project_id() != Some(&batch.project_id) {
            tracing::warn!(project = %batch.project_id, "conflict batch is for a project that is no longer current");
            return Err(ConflictError::StaleBatch {
                project_id: batch.project_id.clone(),
            });
        }
        check_resolutions(&batch.conflicts, resolutions).map_err(|err| {
            tracing::warn!(project = %batch.project_id, error = %err, "conflict resolution rejected");
            err
        })?;

        let delta = repo.apply_all(resolution_ops(&batch.conflicts, resolutions));
        {
            let mut acknowledged = lock(&self.acknowledged);
            for file in &batch.files {
                acknowledged.insert(file.path.clone(), file.disk_text.clone());
            }
        }
        tracing::info!(
            project = %batch.project_id,
            files = batch.files.len(),
            resolutions = resolutions.len(),
            "conflict resolution applied"
        );
        self.request_pass();
        Ok(delta)
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn abort(&self) {
        self.task.abort();
    }

    /// Waits for the worker, which exits once the repository is dropped.
    pub async fn join(self) {
        if let Err(err) = self.task.await {
            if !err.is_cancelled() {
                tracing::error!(error = %err, "sync worker failed");
            }
        }
    }
}

fn lock(acknowledged: &Mutex<Acknowledged>) -> MutexGuard<'_, Acknowledged> {
    match acknowledged.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

enum Trigger {
    Changed,
    Forced,
    Closed,
}

struct Worker {
    slices: watch::Receiver<Option<ProjectSlice>>,
    departures: broadcast::Receiver<ProjectSlice>,
    baselines: HashMap<ProjectId, ProjectSlice>,
    reconciler: Reconciler,
    debounce: Duration,
    force: Arc<Notify>,
    acknowledged: Arc<Mutex<Acknowledged>>,
    events: mpsc::UnboundedSender<SyncEvent>,
}

impl Worker {
    async fn run(mut self) {
        loop {
            let trigger = match self.wait().await {
                Trigger::Closed => Trigger::Closed,
                Trigger::Forced => Trigger::Forced,
                Trigger::Changed => self.settle().await,
            };

            self.flush_departures().await;
            let latest = self.slices.borrow_and_update().clone();
            self.pass(latest, matches!(trigger, Trigger::Forced)).await;

            if matches!(trigger, Trigger::Closed) {
                break;
            }
        }
        tracing::debug!("sync worker stopped");
    }

    async fn wait(&mut self) -> Trigger {
        tokio::select! {
            changed = self.slices.changed() => match changed {
                Ok(()) => Trigger::Changed,
                Err(_) => Trigger::Closed,
            },
            () = self.force.notified() => Trigger::Forced,
        }
    }

    /// Trailing debounce: every further change restarts the timer.
    async fn settle(&mut self) -> Trigger {
        loop {
            tokio::select! {
                changed = self.slices.changed() => {
                    if changed.is_err() {
                        return Trigger::Closed;
                    }
                }
                () = tokio::time::sleep(self.debounce) => return Trigger::Changed,
                () = self.force.notified() => return Trigger::Forced,
            }
        }
    }

    /// Writes edits that projects received right before they stopped being current.
    async fn flush_departures(&mut self) {
        loop {
            let departed = match self.departures.try_recv() {
                Ok(slice) => slice,
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "missed project switches; their pending edits wait for the next change");
                    continue;
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return,
            };
            tracing::debug!(project = %departed.project_id, "flushing project that stopped being current");
            self.advance(departed, false).await;
        }
    }

    async fn pass(&mut self, latest: Option<ProjectSlice>, forced: bool) {
        match latest {
            Some(current) => self.advance(current, forced).await,
            None => tracing::debug!("no current project"),
        }
    }

    /// Moves the project's baseline to `current`, reconciling when one existed before.
    async fn advance(&mut self, current: ProjectSlice, forced: bool) {
        let Some(previous) = self
            .baselines
            .insert(current.project_id.clone(), current.clone())
        else {
            tracing::debug!(project = %current.project_id, "first sight of project; baseline set");
            return;
        };
        if !forced && previous == current {
            return;
        }

        let acknowledged = self.take_acknowledged(&current);
        let report = self
            .reconciler
            .reconcile(&previous, &current, &acknowledged)
            .await;

        let batch = report.conflict_batch();
        // A closed receiver only means nobody listens anymore.
        let _ = self.events.send(SyncEvent::Reconciled(report));
        if let Some(batch) = batch {
            let _ = self.events.send(SyncEvent::Conflicts(batch));
        }
    }

    /// Removes the acknowledged disk texts that belong to `slice`'s files.
    fn take_acknowledged(&self, slice: &ProjectSlice) -> Acknowledged {
        let mut acknowledged = lock(&self.acknowledged);
        slice
            .file_language_map
            .iter()
            .filter_map(|entry| {
                let path = slice.language_file_path(entry);
                acknowledged.remove(&path).map(|text| (path, text))
            })
            .collect()
    }
}
