// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Transdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Transdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A project ties a source folder, a translations folder, a language map and the cached
//! translation data together.

#[cfg(test)]
pub(crate) mod fixtures;
pub mod ids;
pub mod project;

pub use ids::{Id, IdError, LanguageId, ProjectId};
pub use project::{FileLanguage, LanguageData, Project, ProjectSlice, TranslationData};
