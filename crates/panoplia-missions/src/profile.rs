// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The persisted player profile.

use panoplia_storage::{SafeStore, Stored, keys};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{debug, info, warn};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MaritalStatus {
    #[default]
    Single,
    Married,
}

/// Counters mutated by mission rewards and penalties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    pub name: String,
    #[serde(default)]
    pub wisdom: u32,
    #[serde(default)]
    pub sin: u32,
    /// Players created before coins existed have no wallet; rewards never
    /// create one.
    #[serde(default)]
    pub coins: Option<u32>,
    #[serde(default)]
    pub marital_status: MaritalStatus,
}

impl PlayerProfile {
    /// A fresh profile with an empty wallet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            wisdom: 0,
            sin: 0,
            coins: Some(0),
            marital_status: MaritalStatus::default(),
        }
    }
}

/// Reads and writes the `profile` key.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    store: SafeStore,
}

impl ProfileStore {
    pub fn new(store: SafeStore) -> Self {
        Self { store }
    }

    /// `None` when no profile was ever saved or storage is unavailable.
    pub fn load(&self) -> Option<PlayerProfile> {
        self.store.read_json(keys::PROFILE)
    }

    pub fn save(&self, profile: &PlayerProfile) -> bool {
        self.store.write_json(keys::PROFILE, profile)
    }

    /// Save `profile` unless one already exists. Returns the stored profile.
    ///
    /// An existing profile that cannot be read is left alone and `None` is
    /// returned.
    pub fn initialize(&self, profile: PlayerProfile) -> Option<PlayerProfile> {
        match self.store.load_json::<PlayerProfile>(keys::PROFILE) {
            Stored::Present(existing) => {
                debug!(name = %existing.name, "profile already initialized");
                return Some(existing);
            }
            Stored::Unreadable => {
                warn!("stored profile unreadable; not replacing it");
                return None;
            }
            Stored::Absent => {}
        }
        if !self.save(&profile) {
            return None;
        }
        info!(name = %profile.name, "profile created");
        Some(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panoplia_core::KvStore;
    use panoplia_storage::MemoryStore;
    use std::sync::Arc;

    fn store() -> ProfileStore {
        ProfileStore::new(SafeStore::new(Arc::new(MemoryStore::new())))
    }

    #[test]
    fn initialize_keeps_existing_profile() {
        let profiles = store();
        assert!(profiles.load().is_none());

        let mut first = PlayerProfile::new("Ana");
        first.wisdom = 7;
        profiles.initialize(first.clone());

        let again = profiles.initialize(PlayerProfile::new("Bia")).unwrap();
        assert_eq!(again, first);
    }

    #[test]
    fn initialize_leaves_unreadable_profile_alone() {
        let backend = Arc::new(MemoryStore::new());
        backend.set(keys::PROFILE, "{\"name\": ").unwrap();
        let profiles = ProfileStore::new(SafeStore::new(backend.clone()));

        assert!(profiles.initialize(PlayerProfile::new("Bia")).is_none());
        assert_eq!(
            backend.get(keys::PROFILE).unwrap().as_deref(),
            Some("{\"name\": ")
        );
    }

    #[test]
    fn missing_fields_take_defaults() {
        let raw = serde_json::json!({ "name": "Davi", "wisdom": 3 });
        let profile: PlayerProfile = serde_json::from_value(raw).unwrap();
        assert_eq!(profile.coins, None);
        assert_eq!(profile.sin, 0);
        assert_eq!(profile.marital_status, MaritalStatus::Single);
    }
}
