// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Failure-tolerant JSON facade over a [`KvStore`].
//!
//! Storage problems never escape this type. Reads degrade to `None` ("no
//! saved state, use defaults") and writes degrade to `false`; both are logged
//! so the degradation is visible in the trace.
//!
//! Read-modify-write callers use [`SafeStore::load_json`] instead, which keeps
//! an absent key apart from one that could not be read. Writing defaults over
//! an unreadable value would destroy it.

use std::sync::Arc;

use panoplia_core::{HealthStatus, KvStore, PanopliaError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// What a read found under a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stored<T> {
    /// Nothing was ever saved.
    Absent,
    Present(T),
    /// The backend failed or the value did not decode.
    Unreadable,
}

impl<T> Stored<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Stored::Present(value) => Some(value),
            Stored::Absent | Stored::Unreadable => None,
        }
    }

    pub fn is_unreadable(&self) -> bool {
        matches!(self, Stored::Unreadable)
    }
}

/// Shared handle to the process-wide store.
#[derive(Clone)]
pub struct SafeStore {
    inner: Arc<dyn KvStore>,
}

impl std::fmt::Debug for SafeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SafeStore")
            .field("backend", &self.inner.name())
            .finish()
    }
}

impl SafeStore {
    pub fn new(inner: Arc<dyn KvStore>) -> Self {
        Self { inner }
    }

    /// Name of the wrapped backend.
    pub fn backend_name(&self) -> &str {
        self.inner.name()
    }

    pub fn health_check(&self) -> HealthStatus {
        self.inner.health_check()
    }

    /// Read and decode `key`. Absent keys, backend failures and corrupt
    /// JSON all come back as `None`.
    pub fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.load_json(key).into_option()
    }

    /// Read and decode `key`, telling an absent key from an unreadable one.
    pub fn load_json<T: DeserializeOwned>(&self, key: &str) -> Stored<T> {
        let raw = match self.load_raw(key) {
            Stored::Present(raw) => raw,
            Stored::Absent => return Stored::Absent,
            Stored::Unreadable => return Stored::Unreadable,
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Stored::Present(value),
            Err(source) => {
                let err = PanopliaError::Serialization {
                    key: key.to_string(),
                    source,
                };
                warn!(key, error = %err, "discarding unreadable stored value");
                Stored::Unreadable
            }
        }
    }

    /// Encode and write `value` under `key`. Returns `false` on any failure.
    pub fn write_json<T: Serialize>(&self, key: &str, value: &T) -> bool {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %e, "failed to encode value for storage");
                return false;
            }
        };
        match self.inner.set(key, &raw) {
            Ok(()) => {
                debug!(key, bytes = raw.len(), "stored value");
                true
            }
            Err(e) => {
                warn!(key, backend = self.inner.name(), error = %e, "storage write failed");
                false
            }
        }
    }

    /// Raw string stored under `key`.
    pub fn read_raw(&self, key: &str) -> Option<String> {
        self.load_raw(key).into_option()
    }

    pub fn load_raw(&self, key: &str) -> Stored<String> {
        match self.inner.get(key) {
            Ok(Some(value)) => Stored::Present(value),
            Ok(None) => Stored::Absent,
            Err(e) => {
                warn!(key, backend = self.inner.name(), error = %e, "storage read failed");
                Stored::Unreadable
            }
        }
    }

    /// Delete `key`. Returns `false` when the backend refused.
    pub fn remove(&self, key: &str) -> bool {
        match self.inner.remove(key) {
            Ok(()) => true,
            Err(e) => {
                warn!(key, backend = self.inner.name(), error = %e, "storage delete failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use serde::Deserialize;
    use tracing_test::traced_test;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        wisdom: u32,
    }

    fn safe(store: MemoryStore) -> SafeStore {
        SafeStore::new(Arc::new(store))
    }

    #[test]
    fn round_trips_json() {
        let store = safe(MemoryStore::new());
        assert!(store.write_json("profile", &Sample { wisdom: 7 }));
        assert_eq!(
            store.read_json::<Sample>("profile"),
            Some(Sample { wisdom: 7 })
        );
    }

    #[test]
    fn missing_key_reads_none() {
        let store = safe(MemoryStore::new());
        assert_eq!(store.read_json::<Sample>("profile"), None);
    }

    #[test]
    #[traced_test]
    fn corrupt_json_reads_none_and_warns() {
        let backend = MemoryStore::new();
        backend.set("profile", "{not json").unwrap();
        let store = safe(backend);

        assert_eq!(store.read_json::<Sample>("profile"), None);
        assert!(logs_contain("discarding unreadable stored value"));
    }

    #[test]
    #[traced_test]
    fn disabled_storage_degrades_instead_of_failing() {
        let store = safe(MemoryStore::disabled());
        assert!(!store.write_json("profile", &Sample { wisdom: 1 }));
        assert_eq!(store.read_json::<Sample>("profile"), None);
        assert!(!store.remove("profile"));
        assert!(logs_contain("storage write failed"));
    }

    #[test]
    fn load_json_separates_absent_from_unreadable() {
        let backend = MemoryStore::new();
        backend.set("inventory", "[1, 2").unwrap();
        let store = safe(backend);

        assert_eq!(store.load_json::<Sample>("profile"), Stored::Absent);
        assert!(store.load_json::<Sample>("inventory").is_unreadable());

        store.write_json("profile", &Sample { wisdom: 3 });
        assert_eq!(
            store.load_json::<Sample>("profile"),
            Stored::Present(Sample { wisdom: 3 })
        );
    }

    #[test]
    fn failed_backend_read_is_unreadable() {
        let store = safe(MemoryStore::disabled());
        assert!(store.load_json::<Sample>("profile").is_unreadable());
        assert!(store.load_raw("profile").is_unreadable());
    }

    #[test]
    fn quota_exceeded_write_returns_false() {
        let store = safe(MemoryStore::with_quota(8));
        assert!(!store.write_json("profile", &Sample { wisdom: 1 }));
    }
}
