// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key/value storage adapter trait for persistence backends (SQLite, memory).

use crate::error::PanopliaError;
use crate::types::HealthStatus;

/// Adapter for key/value persistence backends.
///
/// Every logical record (profile, inventory, mission states) is stored as a
/// single serialized blob under one key. Implementations are synchronous and
/// local; callers that must not fail wrap them in a failure-tolerant facade.
pub trait KvStore: Send + Sync {
    /// Returns the human-readable name of this backend.
    fn name(&self) -> &str;

    /// Reads the value stored under `key`, or `None` when absent.
    fn get(&self, key: &str) -> Result<Option<String>, PanopliaError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), PanopliaError>;

    /// Deletes `key`. Deleting an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), PanopliaError>;

    /// Reports whether the backend is usable.
    fn health_check(&self) -> HealthStatus;
}
