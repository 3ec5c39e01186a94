// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`KvStore`] trait.
//!
//! One connection guarded by a mutex is the single writer for the process.
//! Two processes sharing the same file still race read-modify-write cycles on
//! the same key; the last writer wins.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use panoplia_config::model::StorageConfig;
use panoplia_core::{HealthStatus, KvStore, PanopliaError};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use crate::migrations;

/// SQLite-backed key/value store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    path: String,
}

impl SqliteStore {
    /// Open the database configured in `[storage]`, creating parent
    /// directories and running migrations.
    pub fn open(config: &StorageConfig) -> Result<Self, PanopliaError> {
        Self::open_path(&config.database_path, config.wal_mode)
    }

    /// Open (or create) the database at `path`.
    pub fn open_path(path: &str, wal_mode: bool) -> Result<Self, PanopliaError> {
        let parent = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty());
        if let Some(parent) = parent {
            std::fs::create_dir_all(parent).map_err(PanopliaError::storage)?;
        }

        let conn = Connection::open(path).map_err(PanopliaError::storage)?;
        let store = Self::from_connection(conn, wal_mode, path)?;
        debug!(path = %path, wal_mode, "SQLite store opened");
        Ok(store)
    }

    /// Open a private in-memory database (tests, `storage.in_memory`).
    pub fn open_in_memory() -> Result<Self, PanopliaError> {
        let conn = Connection::open_in_memory().map_err(PanopliaError::storage)?;
        Self::from_connection(conn, false, ":memory:")
    }

    fn from_connection(
        mut conn: Connection,
        wal_mode: bool,
        path: &str,
    ) -> Result<Self, PanopliaError> {
        conn.busy_timeout(Duration::from_secs(5))
            .map_err(PanopliaError::storage)?;
        if wal_mode {
            let mode: String = conn
                .query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))
                .map_err(PanopliaError::storage)?;
            debug!(journal_mode = %mode, "journal mode set");
        }
        conn.execute_batch("PRAGMA synchronous = NORMAL;")
            .map_err(PanopliaError::storage)?;
        migrations::run_migrations(&mut conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            path: path.to_string(),
        })
    }

    /// Location of the database file.
    pub fn path(&self) -> &str {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, PanopliaError> {
        self.conn
            .lock()
            .map_err(|_| PanopliaError::Internal("sqlite connection lock poisoned".into()))
    }
}

impl KvStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn get(&self, key: &str) -> Result<Option<String>, PanopliaError> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT value FROM kv_store WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(PanopliaError::storage)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PanopliaError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value],
        )
        .map_err(PanopliaError::storage)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PanopliaError> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key])
            .map_err(PanopliaError::storage)?;
        Ok(())
    }

    fn health_check(&self) -> HealthStatus {
        let conn = match self.lock() {
            Ok(conn) => conn,
            Err(e) => return HealthStatus::Unhealthy(e.to_string()),
        };
        match conn.execute_batch("SELECT 1;") {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        }
    }
}
