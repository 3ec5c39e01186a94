// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the storage, inventory and mission crates.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Milliseconds since the Unix epoch. Every persisted timestamp uses this unit.
pub type EpochMillis = i64;

/// Identifier of a mission definition (and of its persisted state).
#[derive(
    Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MissionId(pub String);

impl MissionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MissionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Which equip-slot pool an item occupies.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SlotKind {
    /// Time-limited items; three positions.
    Consumable,
    /// Items without expiry; two positions.
    Permanent,
}

impl SlotKind {
    /// Number of positions in the pool of this kind.
    pub const fn capacity(self) -> usize {
        match self {
            SlotKind::Consumable => 3,
            SlotKind::Permanent => 2,
        }
    }
}

/// Health status reported by storage health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Backend is fully operational.
    Healthy,
    /// Backend answers but something is off (e.g. quota nearly exhausted).
    Degraded(String),
    /// Backend is not operational.
    Unhealthy(String),
}
