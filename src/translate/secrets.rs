// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Transdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Transdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::settings::LlmProvider;
use super::TranslateError;
use crate::store::KeyValueStore;

/// Platform encryption for secrets at rest.
pub trait SecretCipher: Send + Sync {
    fn encrypt(&self, plaintext: &str) -> Result<Vec<u8>, SecretError>;
    fn decrypt(&self, ciphertext: &[u8]) -> Result<String, SecretError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretError {
    pub message: String,
}

impl SecretError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for SecretError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "secret storage failed: {}", self.message)
    }
}

impl std::error::Error for SecretError {}

pub fn api_key_store_key(provider: LlmProvider) -> String {
    format!("api-key:{provider}")
}

/// Per-provider API keys, encrypted and base64-encoded in the persisted store.
#[derive(Clone)]
pub struct ApiKeyVault {
    store: Arc<dyn KeyValueStore>,
    cipher: Arc<dyn SecretCipher>,
}

impl ApiKeyVault {
    pub fn new(store: Arc<dyn KeyValueStore>, cipher: Arc<dyn SecretCipher>) -> Self {
        Self { store, cipher }
    }

    pub fn set(&self, provider: LlmProvider, api_key: &str) -> Result<(), TranslateError> {
        let ciphertext = self.cipher.encrypt(api_key)?;
        self.store
            .set(&api_key_store_key(provider), &STANDARD.encode(ciphertext))?;
        Ok(())
    }

    pub fn get(&self, provider: LlmProvider) -> Result<Option<String>, TranslateError> {
        let Some(encoded) = self.store.get(&api_key_store_key(provider))? else {
            return Ok(None);
        };
        let ciphertext = STANDARD
            .decode(encoded.trim())
            .map_err(|err| SecretError::new(format!("stored key for {provider} is not base64: {err}")))?;
        Ok(Some(self.cipher.decrypt(&ciphertext)?))
    }

    pub fn remove(&self, provider: LlmProvider) -> Result<bool, TranslateError> {
        Ok(self.store.remove(&api_key_store_key(provider))?)
    }
}

impl fmt::Debug for ApiKeyVault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyVault").finish_non_exhaustive()
    }
}
