// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Transdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Transdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Transdesk: project-state synchronization core for i18n translation workspaces.
//!
//! A [`repository::ProjectRepository`] owns every project and persists itself through a
//! [`store::KeyValueStore`]. A [`sync::SyncService`] watches the current project and keeps
//! its language files on disk in step, refusing to overwrite files that changed underneath
//! it and routing those through [`conflict::ConflictSession`].

pub mod config;
pub mod conflict;
pub mod files;
pub mod logging;
pub mod model;
pub mod ops;
pub mod reconcile;
pub mod repository;
pub mod store;
pub mod sync;
pub mod translate;

#[cfg(test)]
mod test_support;
