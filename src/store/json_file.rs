// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Transdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Transdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{write_atomic, KeyValueStore, StoreError, WriteDurability};

/// A single on-disk JSON object mapping keys to string values.
///
/// The file is read lazily on first access and rewritten in full on every mutation.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    durability: WriteDurability,
    entries: Mutex<Option<BTreeMap<String, String>>>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            durability: WriteDurability::default(),
            entries: Mutex::new(None),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                return Ok(BTreeMap::new());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&text).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(entries).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        write_atomic(&self.path, format!("{text}\n").as_bytes(), self.durability)
    }

    fn with_entries<R>(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, String>) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let mut guard = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        if guard.is_none() {
            *guard = Some(self.read_entries()?);
        }
        match guard.as_mut() {
            Some(entries) => f(entries),
            None => Err(StoreError::Poisoned),
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.with_entries(|entries| Ok(entries.get(key).cloned()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.with_entries(|entries| {
            if entries.get(key).is_some_and(|existing| existing == value) {
                return Ok(());
            }
            let mut next = entries.clone();
            next.insert(key.to_owned(), value.to_owned());
            self.write_entries(&next)?;
            *entries = next;
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> Result<bool, StoreError> {
        self.with_entries(|entries| {
            if !entries.contains_key(key) {
                return Ok(false);
            }
            let mut next = entries.clone();
            next.remove(key);
            self.write_entries(&next)?;
            *entries = next;
            Ok(true)
        })
    }
}
