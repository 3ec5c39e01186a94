// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Missions for the Panoplia mission tracker.
//!
//! - [`registry`]: the immutable catalog of [`MissionDefinition`]s.
//! - [`state_store`]: the versioned `mission-states` document, migrated from
//!   older layouts on first read.
//! - [`profile`]: the persisted player profile.
//! - [`rewards`]: applies reward and penalty bundles to profile and inventory.
//! - [`lifecycle`]: the guarded `active -> completed | expired | abandoned`
//!   state machine.

pub mod definition;
pub mod lifecycle;
pub mod profile;
pub mod registry;
pub mod rewards;
pub mod state;
pub mod state_store;

pub use definition::{
    ArmorGrant, Category, ChecklistItem, ConsumableGrant, Difficulty, MissionDefinition,
    PenaltyBundle, QuizQuestion, Restriction, RewardBundle,
};
pub use lifecycle::{MissionLifecycle, QuizThreshold, QuizThresholds, Rejection, TransitionOutcome};
pub use profile::{MaritalStatus, PlayerProfile, ProfileStore};
pub use registry::MissionRegistry;
pub use rewards::RewardEngine;
pub use state::{MissionState, MissionStatus};
pub use state_store::MissionStateStore;
