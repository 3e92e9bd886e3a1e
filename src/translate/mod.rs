// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Transdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Transdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Machine translation through an external LLM provider.
//!
//! The provider call itself is behind [`LlmClient`]. Failures propagate to the caller without
//! retries, and nothing is merged into the repository unless the whole call succeeded.

pub mod prompt;
pub mod secrets;
pub mod settings;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::model::{Project, TranslationData};
use crate::ops::ProjectDelta;
use crate::repository::ProjectRepository;
use crate::store::StoreError;

pub use prompt::{build_translation_prompt, translation_output_schema, TranslationOutput};
pub use secrets::{ApiKeyVault, SecretCipher, SecretError};
pub use settings::{LlmConfig, LlmProvider, LlmSettings, LLM_STORE_KEY};

/// What a provider returned.
#[derive(Debug, Clone, PartialEq)]
pub enum LlmOutput {
    Structured(Value),
    Text(String),
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn translate(
        &self,
        api_key: &str,
        prompt: &str,
        output_schema: Option<&Value>,
        provider: LlmProvider,
        config: &LlmConfig,
    ) -> Result<LlmOutput, TranslateError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub provider: LlmProvider,
    pub config: LlmConfig,
    pub source_text: String,
    pub languages: Vec<String>,
}

impl TranslationRequest {
    /// Targets every language mapped in `project`, in map order.
    pub fn for_project(
        project: &Project,
        settings: &LlmSettings,
        source_text: impl Into<String>,
    ) -> Self {
        let mut languages: Vec<String> = Vec::new();
        for entry in project.file_language_map() {
            if !languages.contains(&entry.language) {
                languages.push(entry.language.clone());
            }
        }
        Self {
            provider: settings.llm_provider,
            config: settings.llm_config.clone(),
            source_text: source_text.into(),
            languages,
        }
    }
}

pub struct Translator {
    client: Arc<dyn LlmClient>,
    keys: ApiKeyVault,
}

impl Translator {
    pub fn new(client: Arc<dyn LlmClient>, keys: ApiKeyVault) -> Self {
        Self { client, keys }
    }

    pub async fn translate(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslationData, TranslateError> {
        if request.source_text.trim().is_empty() {
            return Err(TranslateError::EmptyPrompt);
        }

        let api_key = match self.keys.get(request.provider)? {
            Some(key) => key,
            None if !request.provider.requires_api_key() => String::new(),
            None => {
                return Err(TranslateError::MissingApiKey {
                    provider: request.provider,
                })
            }
        };

        let prompt = build_translation_prompt(&request.source_text, &request.languages);
        let schema = translation_output_schema();
        tracing::debug!(
            provider = %request.provider,
            model = %request.config.model,
            languages = request.languages.len(),
            "requesting translation"
        );

        let output = self
            .client
            .translate(
                &api_key,
                &prompt,
                Some(&schema),
                request.provider,
                &request.config,
            )
            .await
            .map_err(|err| {
                tracing::warn!(provider = %request.provider, error = %err, "translation failed");
                err
            })?;

        match output {
            LlmOutput::Structured(value) => prompt::parse_structured_output(value),
            LlmOutput::Text(text) => prompt::parse_text_output(&text),
        }
    }

    /// Translates and merges the result into the current project.
    pub async fn translate_into_repository(
        &self,
        repo: &mut ProjectRepository,
        request: &TranslationRequest,
    ) -> Result<ProjectDelta, TranslateError> {
        let data = self.translate(request).await?;
        Ok(repo.update_data(data))
    }
}

#[derive(Debug)]
pub enum TranslateError {
    EmptyPrompt,
    MissingApiKey { provider: LlmProvider },
    Provider { provider: LlmProvider, message: String },
    MalformedOutput { message: String },
    Secret(SecretError),
    Store(StoreError),
}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPrompt => write!(f, "nothing to translate"),
            Self::MissingApiKey { provider } => write!(f, "no API key stored for {provider}"),
            Self::Provider { provider, message } => write!(f, "{provider} request failed: {message}"),
            Self::MalformedOutput { message } => {
                write!(f, "provider output is not a translation map: {message}")
            }
            Self::Secret(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for TranslateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Secret(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SecretError> for TranslateError {
    fn from(err: SecretError) -> Self {
        Self::Secret(err)
    }
}

impl From<StoreError> for TranslateError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}
