// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Transdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Transdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use rstest::{fixture, rstest};
use serde_json::Value;

use crate::files::{FileManager, MemoryFileManager};
use crate::model::fixtures::{file_language, language_data};
use crate::model::{ProjectId, TranslationData};
use crate::store::{KeyValueStore, MemoryStore};

use super::{ProjectRepository, PROJECT_STORAGE_KEY};

struct RepoCtx {
    store: Arc<MemoryStore>,
    files: Arc<MemoryFileManager>,
    repo: ProjectRepository,
}

impl RepoCtx {
    fn reload(&self) -> ProjectRepository {
        ProjectRepository::load(
            self.store.clone() as Arc<dyn KeyValueStore>,
            self.files.clone() as Arc<dyn FileManager>,
        )
    }

    fn stored_document(&self) -> Value {
        let text = self.store.get(PROJECT_STORAGE_KEY).unwrap().unwrap();
        serde_json::from_str(&text).unwrap()
    }
}

#[fixture]
fn ctx() -> RepoCtx {
    let store = Arc::new(MemoryStore::new());
    let files = Arc::new(MemoryFileManager::new());
    let repo = ProjectRepository::load(
        store.clone() as Arc<dyn KeyValueStore>,
        files.clone() as Arc<dyn FileManager>,
    );
    RepoCtx { store, files, repo }
}

fn english_data(pairs: &[(&str, &str)]) -> TranslationData {
    let mut data = TranslationData::new();
    data.insert("English".to_owned(), language_data(pairs));
    data
}

fn demo(repo: &mut ProjectRepository) -> ProjectId {
    repo.create_project(
        "Demo",
        "/p",
        "/p/i18n",
        vec![file_language("l-en", "en", "English")],
        None,
    )
    .id()
    .clone()
}

#[rstest]
fn create_project_makes_it_current_with_zero_count(mut ctx: RepoCtx) {
    let id = demo(&mut ctx.repo);

    let current = ctx.repo.current_project().unwrap();
    assert_eq!(current.id(), &id);
    assert_eq!(current.translation_count(), 0);
    assert!(current.data().is_empty());
    assert_eq!(current.created_at(), current.updated_at());
}

#[rstest]
fn add_translation_key_seeds_empty_english_value(mut ctx: RepoCtx) {
    demo(&mut ctx.repo);

    ctx.repo.add_translation_key("greeting");

    assert_eq!(ctx.repo.current_project().unwrap().data()["English"]["greeting"], "");
}

#[rstest]
fn mutations_without_current_project_are_noops(mut ctx: RepoCtx) {
    let id = demo(&mut ctx.repo);
    ctx.repo.switch_project(&ProjectId::new("missing").unwrap());
    assert!(ctx.repo.current_project_id().is_none());
    let before = ctx.repo.project(&id).unwrap().clone();

    assert!(!ctx.repo.add_translation_key("k").is_changed());
    assert!(!ctx.repo.update_translation("English", "k", "v").is_changed());
    assert!(!ctx.repo.update_data(english_data(&[("k", "v")])).is_changed());
    assert!(!ctx.repo.update_translation_key("a", "b").is_changed());
    assert!(!ctx.repo.remove_translation_by_key("k").is_changed());
    assert!(ctx.repo.add_language("fr", "French").is_none());
    assert!(ctx.repo.remove_current_project().is_none());

    assert_eq!(ctx.repo.project(&id).unwrap(), &before);
}

#[rstest]
fn update_data_merges_and_patch_wins(mut ctx: RepoCtx) {
    demo(&mut ctx.repo);
    ctx.repo.update_data(english_data(&[("a", "1"), ("b", "2")]));

    ctx.repo.update_data(english_data(&[("b", "20"), ("c", "3")]));

    let english = &ctx.repo.current_project().unwrap().data()["English"];
    assert_eq!(english, &language_data(&[("a", "1"), ("b", "20"), ("c", "3")]));
    assert_eq!(ctx.repo.current_project().unwrap().translation_count(), 3);
}

#[rstest]
fn update_translation_key_overwrites_existing_target(mut ctx: RepoCtx) {
    demo(&mut ctx.repo);
    ctx.repo.update_data(english_data(&[("old", "x"), ("new", "y")]));

    ctx.repo.update_translation_key("old", "new");

    let english = &ctx.repo.current_project().unwrap().data()["English"];
    assert_eq!(english, &language_data(&[("new", "x")]));
}

#[rstest]
fn add_and_remove_language_round_trip(mut ctx: RepoCtx) {
    demo(&mut ctx.repo);

    let french = ctx.repo.add_language("fr", "French").unwrap();
    let project = ctx.repo.current_project().unwrap();
    assert_eq!(project.file_language_map().len(), 2);
    assert!(project.data()["French"].is_empty());

    ctx.repo.remove_language(&french);
    let project = ctx.repo.current_project().unwrap();
    assert_eq!(project.file_language_map().len(), 1);
    assert!(!project.data().contains_key("French"));
}

#[rstest]
fn switch_project_selects_known_id(mut ctx: RepoCtx) {
    let first = demo(&mut ctx.repo);
    let second = demo(&mut ctx.repo);
    assert_eq!(ctx.repo.current_project_id(), Some(&second));

    ctx.repo.switch_project(&first);

    assert_eq!(ctx.repo.current_project_id(), Some(&first));
}

#[rstest]
fn remove_current_project_falls_back_to_remaining_project(mut ctx: RepoCtx) {
    let first = demo(&mut ctx.repo);
    demo(&mut ctx.repo);

    ctx.repo.remove_current_project().unwrap();
    assert_eq!(ctx.repo.current_project_id(), Some(&first));

    ctx.repo.remove_current_project().unwrap();
    assert!(ctx.repo.current_project_id().is_none());
    assert_eq!(ctx.repo.projects().count(), 0);
}

#[rstest]
fn update_project_replaces_record_and_ignores_unknown_ids(mut ctx: RepoCtx) {
    let id = demo(&mut ctx.repo);
    let mut project = ctx.repo.project(&id).unwrap().clone();
    project.set_name("Renamed");

    assert!(ctx.repo.update_project(project));
    assert_eq!(ctx.repo.current_project().unwrap().name(), "Renamed");
    assert_eq!(ctx.repo.current_project_id(), Some(&id));

    let stranger = crate::model::fixtures::bilingual_project();
    assert!(!ctx.repo.update_project(stranger));
    assert_eq!(ctx.repo.projects().count(), 1);
}

#[rstest]
fn state_survives_reload_with_camel_case_layout(mut ctx: RepoCtx) {
    let id = demo(&mut ctx.repo);
    ctx.repo.update_translation("English", "greeting", "Hello");

    let document = ctx.stored_document();
    assert_eq!(document["version"], 0);
    assert_eq!(document["state"]["currentProjectId"], id.as_str());
    let stored = &document["state"]["projects"][id.as_str()];
    assert_eq!(stored["i18nPath"], "/p/i18n");
    assert_eq!(stored["fileLanguageMap"][0]["filename"], "en");
    assert_eq!(stored["translationCount"], 1);
    assert!(document["state"].get("projectFiles").is_none());

    let reloaded = ctx.reload();
    assert_eq!(reloaded.current_project_id(), Some(&id));
    assert_eq!(
        reloaded.current_project().unwrap(),
        ctx.repo.current_project().unwrap()
    );
}

#[rstest]
fn corrupt_storage_loads_as_empty(ctx: RepoCtx) {
    ctx.store.set(PROJECT_STORAGE_KEY, "{not json").unwrap();

    let repo = ctx.reload();

    assert!(repo.current_project_id().is_none());
    assert_eq!(repo.projects().count(), 0);
}

#[rstest]
fn subscribers_see_only_value_changes(mut ctx: RepoCtx) {
    let mut rx = ctx.repo.subscribe();
    demo(&mut ctx.repo);
    assert!(rx.has_changed().unwrap());
    let slice = rx.borrow_and_update().clone().unwrap();
    assert!(slice.data.is_empty());

    ctx.repo.add_translation_key("greeting");
    assert!(rx.has_changed().unwrap());
    rx.borrow_and_update();

    // Same value again: no publication.
    ctx.repo.update_translation("English", "greeting", "");
    assert!(!rx.has_changed().unwrap());
}

#[rstest]
fn switching_away_broadcasts_the_outgoing_slice(mut ctx: RepoCtx) {
    let mut departures = ctx.repo.subscribe_departures();
    let first = demo(&mut ctx.repo);
    assert!(departures.try_recv().is_err());

    ctx.repo.update_translation("English", "greeting", "Hi");
    ctx.repo.create_project(
        "Other",
        "/q",
        "/q/i18n",
        vec![file_language("l-en-q", "en", "English")],
        None,
    );

    let departed = departures.try_recv().unwrap();
    assert_eq!(departed.project_id, first);
    assert_eq!(departed.data["English"]["greeting"], "Hi");
    assert!(departures.try_recv().is_err());
}

#[rstest]
#[tokio::test]
async fn fetch_project_files_lists_current_project(mut ctx: RepoCtx) {
    ctx.files.insert("/p/i18n/en.json", "{}");
    demo(&mut ctx.repo);

    let names = ctx
        .repo
        .fetch_project_files()
        .await
        .iter()
        .map(|entry| entry.name.clone())
        .collect::<Vec<_>>();

    assert_eq!(names, vec!["i18n", "en.json"]);
}

#[rstest]
#[tokio::test]
async fn fetch_project_files_without_project_is_empty(mut ctx: RepoCtx) {
    ctx.files.insert("/p/i18n/en.json", "{}");
    assert!(ctx.repo.fetch_project_files().await.is_empty());
}
