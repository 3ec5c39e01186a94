// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend selection for the `[storage]` section.

use std::sync::Arc;

use panoplia_config::model::StorageConfig;
use panoplia_core::KvStore;
use panoplia_storage::{MemoryStore, SqliteStore};
use tracing::{info, warn};

/// Open the configured backend.
///
/// A database that cannot be opened is not fatal: the game falls back to a
/// volatile in-memory store and says so.
pub fn open_store(config: &StorageConfig) -> Arc<dyn KvStore> {
    if config.in_memory {
        info!("using in-memory storage");
        return Arc::new(MemoryStore::new());
    }
    match SqliteStore::open(config) {
        Ok(store) => {
            info!(path = %store.path(), "storage opened");
            Arc::new(store)
        }
        Err(e) => {
            warn!(
                path = %config.database_path,
                error = %e,
                "storage unavailable, progress will not be saved"
            );
            Arc::new(MemoryStore::new())
        }
    }
}
