// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Transdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Transdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::store::{KeyValueStore, PersistedDocument, StoreError};

pub const LLM_STORE_KEY: &str = "llm-store";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    Gemini,
    OpenAi,
    Claude,
    Xai,
    Ollama,
}

impl LlmProvider {
    pub const ALL: [LlmProvider; 5] = [
        Self::Gemini,
        Self::OpenAi,
        Self::Claude,
        Self::Xai,
        Self::Ollama,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
            Self::Claude => "claude",
            Self::Xai => "xai",
            Self::Ollama => "ollama",
        }
    }

    /// Local providers run without an API key.
    pub fn requires_api_key(self) -> bool {
        !matches!(self, Self::Ollama)
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LlmProvider {
    type Err = UnknownProvider;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|provider| provider.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| UnknownProvider(value.to_owned()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownProvider(pub String);

impl fmt::Display for UnknownProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown LLM provider {:?}", self.0)
    }
}

impl std::error::Error for UnknownProvider {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmConfig {
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_owned(),
            base_url: None,
        }
    }
}

/// The `llm-store` document: which provider to call and how.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmSettings {
    pub llm_provider: LlmProvider,
    #[serde(default)]
    pub llm_config: LlmConfig,
}

impl LlmSettings {
    fn document() -> PersistedDocument<Self> {
        PersistedDocument::new(LLM_STORE_KEY)
    }

    /// Stored settings, or defaults when none were saved.
    pub fn load(store: &dyn KeyValueStore) -> Result<Self, StoreError> {
        Ok(Self::document().load(store)?.unwrap_or_default())
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), StoreError> {
        Self::document().save(store, self)
    }
}
