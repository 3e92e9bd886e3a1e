// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Transdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Transdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use transdesk::conflict::{diff_language, ConflictError, ConflictSession, ResolutionAction};
use transdesk::files::{FileManager, LocalFileManager, MemoryFileManager};
use transdesk::model::{FileLanguage, LanguageData, ProjectSlice, TranslationData};
use transdesk::reconcile::snapshot::language_snapshot;
use transdesk::reconcile::{Acknowledged, FileOutcome, ReconcileConfig, Reconciler, Severity};
use transdesk::repository::ProjectRepository;
use transdesk::store::{JsonFileStore, KeyValueStore, MemoryStore};
use transdesk::sync::{SyncConfig, SyncEvent, SyncService};

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "transdesk-it-{prefix}-{}-{nanos}-{counter}",
            std::process::id()
        ));
        std::fs::create_dir_all(&path).expect("create temp dir");
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

fn values(pairs: &[(&str, &str)]) -> LanguageData {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect()
}

fn english(pairs: &[(&str, &str)]) -> TranslationData {
    BTreeMap::from([("English".to_owned(), values(pairs))])
}

fn pretty(pairs: &[(&str, &str)]) -> String {
    language_snapshot(Some(&values(pairs))).expect("snapshot")
}

fn demo_repo(files: Arc<dyn FileManager>) -> ProjectRepository {
    let mut repo = ProjectRepository::load(Arc::new(MemoryStore::new()), files);
    repo.create_project(
        "Demo",
        "/p",
        "/p/i18n",
        vec![FileLanguage::new("en", "English")],
        Some(TranslationData::new()),
    );
    repo
}

fn slice_with(repo: &ProjectRepository, pairs: &[(&str, &str)]) -> ProjectSlice {
    let mut slice = repo.current_project().expect("current project").slice();
    slice.data = english(pairs);
    slice
}

const EN: &str = "/p/i18n/en.json";

#[test]
fn scenario_a_new_key_starts_empty() {
    let mut repo = demo_repo(Arc::new(MemoryFileManager::new()));

    repo.add_translation_key("greeting");

    let project = repo.current_project().expect("current project");
    assert_eq!(project.data()["English"]["greeting"], "");
}

#[tokio::test]
async fn scenario_b_external_change_is_a_conflict() {
    let files = Arc::new(MemoryFileManager::new());
    let repo = demo_repo(files.clone());
    let previous = slice_with(&repo, &[("a", "1")]);
    files.insert(EN, pretty(&[("a", "2")]));
    let current = slice_with(&repo, &[("a", "1"), ("b", "2")]);

    let report = Reconciler::new(files.clone(), ReconcileConfig::default())
        .reconcile(&previous, &current, &Acknowledged::new())
        .await;

    let file = report.file("English").expect("english report");
    assert!(matches!(file.outcome, FileOutcome::Conflict { .. }));
    assert_eq!(file.notification().severity, Severity::Warning);
    assert!(files.writes().is_empty());
    assert_eq!(files.content(Path::new(EN)), Some(pretty(&[("a", "2")])));
}

#[tokio::test]
async fn scenario_c_matching_disk_receives_new_snapshot() {
    let files = Arc::new(MemoryFileManager::new());
    let repo = demo_repo(files.clone());
    let previous = slice_with(&repo, &[("a", "1")]);
    files.insert(EN, pretty(&[("a", "1")]));
    let current = slice_with(&repo, &[("a", "3")]);

    let report = Reconciler::new(files.clone(), ReconcileConfig::default())
        .reconcile(&previous, &current, &Acknowledged::new())
        .await;

    assert_eq!(
        report.file("English").expect("english report").outcome,
        FileOutcome::Written
    );
    let on_disk = files.read_file_content(Path::new(EN)).await.expect("read");
    assert_eq!(on_disk, pretty(&[("a", "3")]));
}

#[tokio::test]
async fn scenario_d_failed_write_restores_original() {
    let files = Arc::new(MemoryFileManager::new());
    let repo = demo_repo(files.clone());
    let previous = slice_with(&repo, &[("a", "3")]);
    files.insert(EN, pretty(&[("a", "3")]));
    files.fail_next_writes(EN, 1);
    let current = slice_with(&repo, &[("a", "4")]);

    let report = Reconciler::new(files.clone(), ReconcileConfig::default())
        .reconcile(&previous, &current, &Acknowledged::new())
        .await;

    let file = report.file("English").expect("english report");
    assert!(matches!(file.outcome, FileOutcome::WriteFailedRestored { .. }));
    let attempts = files.writes_to(Path::new(EN));
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0].content, pretty(&[("a", "4")]));
    assert_eq!(attempts[1].content, pretty(&[("a", "3")]));

    files.fail_next_writes(EN, 2);
    let report = Reconciler::new(files.clone(), ReconcileConfig::default())
        .reconcile(&previous, &current, &Acknowledged::new())
        .await;
    let file = report.file("English").expect("english report");
    assert!(matches!(
        file.outcome,
        FileOutcome::WriteFailedRestoreFailed { .. }
    ));
    assert_eq!(file.notification().severity, Severity::Critical);
}

#[test]
fn scenario_e_commit_waits_for_every_resolution() {
    let disk = values(&[("a", "2"), ("c", "x")]);
    let memory = values(&[("a", "1"), ("c", "y")]);
    let conflicts = diff_language("English", &disk, &memory);
    assert_eq!(conflicts.len(), 2);

    let mut session = ConflictSession::new(conflicts);
    session.resolve(ResolutionAction::NewValue).expect("resolve");

    assert!(!session.can_commit());
    assert_eq!(
        session.commit(),
        Err(ConflictError::Incomplete {
            resolved: 1,
            total: 2
        })
    );

    session.next();
    session.resolve(ResolutionAction::OriginalValue).expect("resolve");
    assert!(session.can_commit());
    assert_eq!(session.commit().expect("commit").len(), 2);
}

#[tokio::test]
async fn end_to_end_on_the_local_filesystem() {
    let tmp = TempDir::new("e2e");
    let root = tmp.path().join("app");
    let i18n = root.join("locales");
    std::fs::create_dir_all(&i18n).expect("create i18n dir");
    std::fs::write(i18n.join("en.json"), "{}\n").expect("seed en.json");

    let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::new(tmp.path().join("storage.json")));
    let files: Arc<dyn FileManager> = Arc::new(LocalFileManager::new());
    let mut repo = ProjectRepository::load(store.clone(), files.clone());
    repo.create_project(
        "App",
        &root,
        "locales",
        vec![FileLanguage::new("en", "English")],
        None,
    );

    let (handle, mut events) = SyncService::spawn(
        &repo,
        files,
        SyncConfig {
            debounce: Duration::from_millis(20),
            ..SyncConfig::default()
        },
    );

    repo.update_data(english(&[("title", "Hello")]));
    match tokio::time::timeout(Duration::from_secs(10), events.recv()).await {
        Ok(Some(SyncEvent::Reconciled(report))) => {
            assert_eq!(report.files[0].outcome, FileOutcome::Written);
        }
        other => panic!("expected a reconciliation, got {other:?}"),
    }
    assert_eq!(
        std::fs::read_to_string(i18n.join("en.json")).expect("read en.json"),
        pretty(&[("title", "Hello")])
    );

    let listing = repo.fetch_project_files().await;
    assert!(listing.iter().any(|entry| entry.name == "en.json"));

    let reloaded = ProjectRepository::load(store, Arc::new(MemoryFileManager::new()));
    assert_eq!(
        reloaded.current_project().expect("persisted project").data()["English"]["title"],
        "Hello"
    );

    drop(repo);
    handle.join().await;
}
