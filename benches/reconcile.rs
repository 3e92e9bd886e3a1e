// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Transdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Transdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use transdesk::conflict::diff_language;
use transdesk::files::{FileManager, MemoryFileManager};
use transdesk::model::{FileLanguage, LanguageData, Project, ProjectId, ProjectSlice};
use transdesk::reconcile::snapshot::language_snapshot;
use transdesk::reconcile::{Acknowledged, ReconcileConfig, Reconciler};

#[derive(Debug, Clone, Copy)]
enum Case {
    Small,
    Medium,
    Large,
}

impl Case {
    fn id(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    /// `(languages, keys per language)`
    fn shape(self) -> (usize, usize) {
        match self {
            Self::Small => (2, 50),
            Self::Medium => (8, 500),
            Self::Large => (24, 2_000),
        }
    }
}

fn language_data(keys: usize, salt: &str) -> LanguageData {
    (0..keys)
        .map(|index| (format!("key{index:05}"), format!("{salt} value {index}")))
        .collect()
}

/// Previous and next slice differing in one key per language, with disk matching previous.
fn fixture(case: Case) -> (ProjectSlice, ProjectSlice, Arc<MemoryFileManager>) {
    let (languages, keys) = case.shape();
    let map = (0..languages)
        .map(|index| FileLanguage::new(format!("lang{index}"), format!("Language {index}")))
        .collect::<Vec<_>>();
    let data = map
        .iter()
        .map(|entry| (entry.language.clone(), language_data(keys, &entry.filename)))
        .collect();
    let project = Project::new(
        ProjectId::generate(),
        "Bench",
        "/bench",
        "i18n",
        map,
        data,
    );

    let previous = project.slice();
    let mut next = previous.clone();
    for values in next.data.values_mut() {
        values.insert("key00000".to_owned(), "changed".to_owned());
    }

    let files = Arc::new(MemoryFileManager::new());
    for entry in &previous.file_language_map {
        let text = language_snapshot(previous.language_data(&entry.language))
            .expect("snapshot");
        files.insert(previous.language_file_path(entry), text);
    }
    (previous, next, files)
}

// Benchmark identity (keep stable):
// - Group names in this file: `reconcile.pass`, `reconcile.diff`
// - Case IDs must remain stable across refactors so results stay comparable.
fn benches_reconcile(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");

    let mut group = c.benchmark_group("reconcile.pass");
    for case in [Case::Small, Case::Medium, Case::Large] {
        let (previous, next, files) = fixture(case);
        group.bench_function(case.id(), |b| {
            b.iter_batched(
                || {
                    let fresh = MemoryFileManager::new();
                    for entry in &previous.file_language_map {
                        let path = previous.language_file_path(entry);
                        let text = files.content(&path).expect("fixture file");
                        fresh.insert(path, text);
                    }
                    Reconciler::new(
                        Arc::new(fresh) as Arc<dyn FileManager>,
                        ReconcileConfig::default(),
                    )
                },
                |reconciler| {
                    let report = runtime.block_on(reconciler.reconcile(
                        black_box(&previous),
                        black_box(&next),
                        &Acknowledged::new(),
                    ));
                    black_box(report.files.len())
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();

    let mut group = c.benchmark_group("reconcile.diff");
    for case in [Case::Small, Case::Medium, Case::Large] {
        let (_, keys) = case.shape();
        let disk = language_data(keys, "disk");
        let memory = language_data(keys, "memory");
        group.bench_function(case.id(), |b| {
            b.iter(|| black_box(diff_language("English", black_box(&disk), black_box(&memory))))
        });
    }
    group.finish();
}

criterion_group!(benches, benches_reconcile);
criterion_main!(benches);
