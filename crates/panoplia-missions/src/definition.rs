// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Immutable mission templates.

use std::collections::BTreeSet;

use panoplia_core::{EpochMillis, MissionId, SlotKind};
use panoplia_inventory::{ArmorPiece, ItemGrant};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::profile::MaritalStatus;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Category {
    Action,
    Quiz,
    Couple,
    Checklist,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

/// Who may accept a mission.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Restriction {
    #[default]
    None,
    RequiresMarried,
    RequiresSingle,
}

impl Restriction {
    /// Whether a player with `status` passes. An unknown status only passes
    /// unrestricted missions.
    pub fn allows(self, status: Option<MaritalStatus>) -> bool {
        match self {
            Restriction::None => true,
            Restriction::RequiresMarried => status == Some(MaritalStatus::Married),
            Restriction::RequiresSingle => status == Some(MaritalStatus::Single),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmorGrant {
    pub piece: ArmorPiece,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumableGrant {
    pub name: String,
    pub quantity: u32,
    /// Lifetime once equipped; `None` for items that never expire.
    pub duration_secs: Option<u64>,
    pub kind: SlotKind,
}

impl ConsumableGrant {
    /// The single unit handed to the inventory per `quantity`.
    pub fn item_grant(&self) -> ItemGrant {
        ItemGrant {
            name: self.name.clone(),
            kind: self.kind,
            duration_secs: self.duration_secs,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardBundle {
    pub wisdom: u32,
    pub coins: u32,
    #[serde(default)]
    pub armor: Vec<ArmorGrant>,
    #[serde(default)]
    pub consumables: Vec<ConsumableGrant>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyBundle {
    pub sin: u32,
    pub wisdom_loss: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    /// Index into `options`.
    pub answer: usize,
}

/// A mission template. Never mutated after registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionDefinition {
    pub id: MissionId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub restriction: Restriction,
    #[serde(default)]
    pub reward: RewardBundle,
    #[serde(default)]
    pub penalty: PenaltyBundle,
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
    #[serde(default)]
    pub quiz_questions: Vec<QuizQuestion>,
    /// Time allowed after acceptance; `None` never expires.
    #[serde(default)]
    pub window_secs: Option<u64>,
    /// Numeric id used by the old "enhanced" state layout.
    #[serde(default)]
    pub legacy_id: Option<u32>,
}

impl MissionDefinition {
    pub fn new(id: impl Into<String>, title: impl Into<String>, category: Category) -> Self {
        Self {
            id: MissionId::new(id),
            title: title.into(),
            description: String::new(),
            category,
            difficulty: Difficulty::default(),
            tags: BTreeSet::new(),
            restriction: Restriction::default(),
            reward: RewardBundle::default(),
            penalty: PenaltyBundle::default(),
            checklist: Vec::new(),
            quiz_questions: Vec::new(),
            window_secs: None,
            legacy_id: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_restriction(mut self, restriction: Restriction) -> Self {
        self.restriction = restriction;
        self
    }

    pub fn with_reward(mut self, reward: RewardBundle) -> Self {
        self.reward = reward;
        self
    }

    pub fn with_penalty(mut self, penalty: PenaltyBundle) -> Self {
        self.penalty = penalty;
        self
    }

    pub fn with_checklist<I>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, &'static str)>,
    {
        self.checklist = items
            .into_iter()
            .map(|(id, label)| ChecklistItem {
                id: id.to_string(),
                label: label.to_string(),
            })
            .collect();
        self
    }

    pub fn with_quiz(mut self, questions: Vec<QuizQuestion>) -> Self {
        self.quiz_questions = questions;
        self
    }

    pub fn with_window_secs(mut self, secs: u64) -> Self {
        self.window_secs = Some(secs);
        self
    }

    pub fn with_legacy_id(mut self, legacy_id: u32) -> Self {
        self.legacy_id = Some(legacy_id);
        self
    }

    /// Instant the window closes for a mission accepted at `started_at`.
    pub fn window_end(&self, started_at: EpochMillis) -> Option<EpochMillis> {
        let secs = i64::try_from(self.window_secs?).unwrap_or(i64::MAX);
        Some(started_at.saturating_add(secs.saturating_mul(1000)))
    }

    pub fn is_window_elapsed(&self, started_at: EpochMillis, now: EpochMillis) -> bool {
        self.window_end(started_at).is_some_and(|end| end <= now)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn has_checklist_item(&self, item_id: &str) -> bool {
        self.checklist.iter().any(|item| item.id == item_id)
    }
}
