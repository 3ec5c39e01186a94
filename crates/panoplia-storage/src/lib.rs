// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key/value persistence layer for the Panoplia mission tracker.
//!
//! Provides two [`KvStore`](panoplia_core::KvStore) backends (SQLite with
//! embedded migrations, and a volatile in-memory map that can simulate quota
//! and disabled-storage failures) plus [`SafeStore`], the failure-tolerant
//! JSON facade every domain service persists through.

pub mod database;
pub mod keys;
pub mod memory;
pub mod migrations;
pub mod safe;

pub use database::SqliteStore;
pub use memory::{MemoryStore, StoreFailure};
pub use safe::{SafeStore, Stored};
