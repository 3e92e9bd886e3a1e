// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Transdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Transdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::{LanguageId, ProjectId};
use super::project::{FileLanguage, LanguageData, Project, TranslationData};

pub(crate) fn language_data(pairs: &[(&str, &str)]) -> LanguageData {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect()
}

pub(crate) fn file_language(id: &str, filename: &str, language: &str) -> FileLanguage {
    FileLanguage {
        id: LanguageId::new(id).expect("language id"),
        filename: filename.to_owned(),
        language: language.to_owned(),
    }
}

/// `/p` project with English (`en`) and Spanish (`es`) files under `/p/i18n`.
pub(crate) fn bilingual_project() -> Project {
    let mut data = TranslationData::new();
    data.insert(
        "English".to_owned(),
        language_data(&[("greeting", "Hello"), ("farewell", "Bye")]),
    );
    data.insert(
        "Spanish".to_owned(),
        language_data(&[("greeting", "Hola"), ("farewell", "Adiós")]),
    );

    Project::new(
        ProjectId::new("p-bilingual").expect("project id"),
        "Bilingual",
        "/p",
        "/p/i18n",
        vec![
            file_language("l-en", "en", "English"),
            file_language("l-es", "es", "Spanish"),
        ],
        data,
    )
}
