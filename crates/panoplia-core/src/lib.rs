// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Panoplia mission tracker.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Panoplia workspace. Storage backends
//! implement [`KvStore`]; time-dependent services read the wall clock through
//! [`Clock`] so sweeps can be driven deterministically in tests.

pub mod clock;
pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::PanopliaError;
pub use traits::KvStore;
pub use types::{EpochMillis, HealthStatus, MissionId, SlotKind};
