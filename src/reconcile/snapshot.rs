// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Transdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Transdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::LanguageData;

/// Pretty JSON (two-space indent, sorted keys) of one language's map. Absent maps are `{}`.
pub fn language_snapshot(data: Option<&LanguageData>) -> Result<String, serde_json::Error> {
    match data {
        Some(data) => serde_json::to_string_pretty(data),
        None => Ok("{}".to_owned()),
    }
}

/// Text equality ignoring leading and trailing whitespace.
pub fn same_content(left: &str, right: &str) -> bool {
    left.trim() == right.trim()
}

pub fn parse_language_file(text: &str) -> Result<LanguageData, serde_json::Error> {
    if text.trim().is_empty() {
        return Ok(LanguageData::new());
    }
    serde_json::from_str(text)
}
