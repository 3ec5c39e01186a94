// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeMap;

use panoplia_core::{EpochMillis, MissionId};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Status of an accepted mission. Only `Active` accepts transitions.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MissionStatus {
    #[default]
    Active,
    Completed,
    Expired,
    Abandoned,
}

impl MissionStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, MissionStatus::Active)
    }
}

/// Persisted progress of one mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionState {
    #[serde(default)]
    pub id: MissionId,
    #[serde(default)]
    pub status: MissionStatus,
    #[serde(default)]
    pub checklist: BTreeMap<String, bool>,
    /// Quiz progress in percent, always within `0..=100`.
    #[serde(default)]
    pub quiz_score: u8,
    /// Anchor of the mission window.
    #[serde(default)]
    pub started_at: EpochMillis,
    #[serde(default)]
    pub updated_at: EpochMillis,
}

impl MissionState {
    pub fn new(id: MissionId, now: EpochMillis) -> Self {
        Self {
            id,
            status: MissionStatus::Active,
            checklist: BTreeMap::new(),
            quiz_score: 0,
            started_at: now,
            updated_at: now,
        }
    }

    pub fn is_checked(&self, item_id: &str) -> bool {
        self.checklist.get(item_id).copied().unwrap_or(false)
    }

    pub fn transition(&mut self, status: MissionStatus, now: EpochMillis) {
        self.status = status;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_active_is_non_terminal() {
        assert!(!MissionStatus::Active.is_terminal());
        assert!(MissionStatus::Completed.is_terminal());
        assert!(MissionStatus::Expired.is_terminal());
        assert!(MissionStatus::Abandoned.is_terminal());
    }

    #[test]
    fn serializes_camel_case() {
        let state = MissionState::new(MissionId::new("a"), 5);
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["status"], "active");
        assert_eq!(json["quizScore"], 0);
        assert_eq!(json["startedAt"], 5);
    }
}
