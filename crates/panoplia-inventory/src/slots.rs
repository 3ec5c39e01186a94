// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Equipped items and their expiration arithmetic.

use panoplia_core::{EpochMillis, SlotKind};
use serde::{Deserialize, Serialize};

/// An item sitting in one equip slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquippedItem {
    pub id: String,
    pub name: String,
    pub kind: SlotKind,
    pub equipped_at: EpochMillis,
    /// Lifetime in seconds. `None` means the item never expires.
    #[serde(rename = "duration", default)]
    pub duration_secs: Option<u64>,
}

impl EquippedItem {
    pub fn new(
        name: impl Into<String>,
        kind: SlotKind,
        duration_secs: Option<u64>,
        now: EpochMillis,
    ) -> Self {
        let name = name.into();
        let slug: String = name
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '-' })
            .collect();
        Self {
            id: format!("{slug}-{now}"),
            name,
            kind,
            equipped_at: now,
            duration_secs,
        }
    }

    /// Instant the item stops being valid, if it ever does.
    pub fn expires_at(&self) -> Option<EpochMillis> {
        self.duration_secs.map(|secs| {
            let secs = i64::try_from(secs).unwrap_or(i64::MAX);
            self.equipped_at.saturating_add(secs.saturating_mul(1000))
        })
    }

    /// Whole seconds left, rounded up; `None` for items without a duration.
    ///
    /// Any instant before expiry yields at least 1, expiry itself yields 0.
    pub fn time_remaining_secs(&self, now: EpochMillis) -> Option<u64> {
        let remaining_ms = self.expires_at()?.saturating_sub(now).max(0) as u64;
        Some(remaining_ms.div_ceil(1000))
    }

    pub fn is_expired(&self, now: EpochMillis) -> bool {
        self.expires_at().is_some_and(|end| end <= now)
    }
}

/// Snapshot of both slot pools, as polled by the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquippedSlots {
    pub consumable: Vec<Option<EquippedItem>>,
    pub permanent: Vec<Option<EquippedItem>>,
}

impl EquippedSlots {
    pub fn occupied(&self, kind: SlotKind) -> usize {
        let pool = match kind {
            SlotKind::Consumable => &self.consumable,
            SlotKind::Permanent => &self.permanent,
        };
        pool.iter().filter(|slot| slot.is_some()).count()
    }
}

/// Index of the first empty position in `pool`.
pub fn first_empty(pool: &[Option<EquippedItem>]) -> Option<usize> {
    pool.iter().position(Option::is_none)
}
