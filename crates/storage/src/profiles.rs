// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Named settings profiles persisted as one snapshot

use crate::snapshot::{JsonStore, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// A named bundle of user-facing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub settings: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ProfilesSnapshot {
    profiles: BTreeMap<String, BTreeMap<String, serde_json::Value>>,
}

/// Profile registry backed by a [`JsonStore`] snapshot
pub struct ProfileStore {
    store: JsonStore,
    inner: Mutex<ProfilesSnapshot>,
}

impl ProfileStore {
    /// Open the store, loading any existing snapshot
    pub fn open(store: JsonStore) -> Self {
        let inner = Mutex::new(store.load());
        Self { store, inner }
    }

    /// All profiles, sorted by name
    pub fn list(&self) -> Vec<Profile> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner
            .profiles
            .iter()
            .map(|(name, settings)| Profile {
                name: name.clone(),
                settings: settings.clone(),
            })
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<Profile> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.profiles.get(name).map(|settings| Profile {
            name: name.to_string(),
            settings: settings.clone(),
        })
    }

    /// Insert or replace a profile and persist the snapshot
    pub fn put(
        &self,
        name: &str,
        settings: BTreeMap<String, serde_json::Value>,
    ) -> Result<Profile, StoreError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.profiles.insert(name.to_string(), settings.clone());
        self.store.save(&*inner)?;
        Ok(Profile {
            name: name.to_string(),
            settings,
        })
    }
}

#[cfg(test)]
#[path = "profiles_tests.rs"]
mod tests;
