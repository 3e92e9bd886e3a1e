// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Transdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Transdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{KeyValueStore, StoreError};

pub const PERSIST_VERSION: u32 = 0;

#[derive(Debug, Serialize)]
struct EnvelopeRef<'a, T> {
    state: &'a T,
    version: u32,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    state: T,
    #[serde(default)]
    version: u32,
}

/// A typed document stored as `{"state": ..., "version": N}` under one logical key.
#[derive(Debug, Clone)]
pub struct PersistedDocument<T> {
    key: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PersistedDocument<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn load(&self, store: &dyn KeyValueStore) -> Result<Option<T>, StoreError> {
        let Some(text) = store.get(&self.key)? else {
            return Ok(None);
        };

        let envelope: Envelope<T> =
            serde_json::from_str(&text).map_err(|source| StoreError::Decode {
                key: self.key.clone(),
                source,
            })?;

        if envelope.version > PERSIST_VERSION {
            return Err(StoreError::UnsupportedVersion {
                key: self.key.clone(),
                version: envelope.version,
            });
        }

        Ok(Some(envelope.state))
    }

    pub fn save(&self, store: &dyn KeyValueStore, state: &T) -> Result<(), StoreError> {
        let text = serde_json::to_string(&EnvelopeRef {
            state,
            version: PERSIST_VERSION,
        })
        .map_err(|source| StoreError::Encode {
            key: self.key.clone(),
            source,
        })?;
        store.set(&self.key, &text)
    }

    pub fn clear(&self, store: &dyn KeyValueStore) -> Result<bool, StoreError> {
        store.remove(&self.key)
    }
}
