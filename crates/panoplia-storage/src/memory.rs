// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Volatile in-memory [`KvStore`].
//!
//! Used by tests and as the fallback when the configured database cannot be
//! opened. It can also imitate the failure modes of browser-style storage: a
//! byte quota that rejects oversized writes, and a fully disabled store.

use std::collections::HashMap;
use std::sync::Mutex;

use panoplia_core::{HealthStatus, KvStore, PanopliaError};
use thiserror::Error;

/// Failures raised by [`MemoryStore`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreFailure {
    #[error("storage quota exceeded: {needed} bytes needed, quota is {quota}")]
    QuotaExceeded { needed: usize, quota: usize },

    #[error("storage is disabled")]
    Disabled,
}

/// HashMap-backed key/value store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
    disabled: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose total key + value bytes may not exceed `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::default()
        }
    }

    /// A store on which every call fails.
    pub fn disabled() -> Self {
        Self {
            disabled: true,
            ..Self::default()
        }
    }

    /// Bytes currently used by keys and values.
    pub fn used_bytes(&self) -> usize {
        self.entries
            .lock()
            .map(|entries| usage(&entries))
            .unwrap_or_default()
    }

    fn check_enabled(&self) -> Result<(), PanopliaError> {
        if self.disabled {
            return Err(PanopliaError::storage(StoreFailure::Disabled));
        }
        Ok(())
    }

    fn entries(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, PanopliaError> {
        self.entries
            .lock()
            .map_err(|_| PanopliaError::Internal("memory store lock poisoned".into()))
    }
}

fn usage(entries: &HashMap<String, String>) -> usize {
    entries.iter().map(|(k, v)| k.len() + v.len()).sum()
}

impl KvStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, key: &str) -> Result<Option<String>, PanopliaError> {
        self.check_enabled()?;
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PanopliaError> {
        self.check_enabled()?;
        let mut entries = self.entries()?;
        if let Some(quota) = self.quota_bytes {
            let replaced = entries.get(key).map(|old| key.len() + old.len());
            let needed = usage(&entries) - replaced.unwrap_or(0) + key.len() + value.len();
            if needed > quota {
                return Err(PanopliaError::storage(StoreFailure::QuotaExceeded {
                    needed,
                    quota,
                }));
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PanopliaError> {
        self.check_enabled()?;
        self.entries()?.remove(key);
        Ok(())
    }

    fn health_check(&self) -> HealthStatus {
        if self.disabled {
            return HealthStatus::Unhealthy(StoreFailure::Disabled.to_string());
        }
        match self.quota_bytes {
            Some(quota) if self.used_bytes() * 10 >= quota * 9 => {
                HealthStatus::Degraded(format!("{} of {quota} bytes used", self.used_bytes()))
            }
            _ => HealthStatus::Healthy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let store = MemoryStore::new();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(store.used_bytes(), 2);
    }

    #[test]
    fn quota_rejects_oversized_write_and_keeps_old_value() {
        let store = MemoryStore::with_quota(10);
        store.set("k", "1234").unwrap();

        let err = store.set("k", "123456789012").unwrap_err();
        assert!(err.to_string().contains("quota exceeded"), "got {err}");
        assert_eq!(store.get("k").unwrap().as_deref(), Some("1234"));
    }

    #[test]
    fn quota_accounts_for_replaced_value() {
        let store = MemoryStore::with_quota(10);
        store.set("k", "123456789").unwrap();
        // Replacing frees the old value first.
        store.set("k", "987654321").unwrap();
    }

    #[test]
    fn disabled_store_fails_everything() {
        let store = MemoryStore::disabled();
        assert!(store.get("k").is_err());
        assert!(store.set("k", "v").is_err());
        assert!(store.remove("k").is_err());
        assert!(matches!(store.health_check(), HealthStatus::Unhealthy(_)));
    }

    #[test]
    fn nearly_full_quota_is_degraded() {
        let store = MemoryStore::with_quota(10);
        store.set("k", "12345678").unwrap();
        assert!(matches!(store.health_check(), HealthStatus::Degraded(_)));
    }
}
