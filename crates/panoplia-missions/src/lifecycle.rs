// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The mission state machine.
//!
//! ```text
//! (no state) --accept / first interaction--> active
//! active --complete (criteria met)--> completed   + rewards
//! active --abandon-------------------> abandoned  + penalties
//! active --window elapsed------------> expired    (nothing applied)
//! ```
//!
//! Every mutating call checks the current status first, so repeating a
//! terminal call is rejected instead of paying out twice. The terminal
//! status is persisted before any reward or penalty is applied.

use std::fmt;
use std::sync::Arc;

use panoplia_core::{Clock, MissionId};
use panoplia_inventory::InventoryManager;
use panoplia_storage::SafeStore;
use tracing::{debug, info, warn};

use crate::definition::{Category, MissionDefinition};
use crate::profile::ProfileStore;
use crate::registry::MissionRegistry;
use crate::rewards::RewardEngine;
use crate::state::{MissionState, MissionStatus};
use crate::state_store::MissionStateStore;

/// Which pass mark a quiz completion is judged against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuizThreshold {
    #[default]
    Standard,
    /// Chapter quizzes are stricter.
    Chapter,
}

/// Pass marks in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizThresholds {
    pub standard: u8,
    pub chapter: u8,
}

impl Default for QuizThresholds {
    fn default() -> Self {
        Self {
            standard: 60,
            chapter: 70,
        }
    }
}

impl QuizThresholds {
    pub fn required(&self, threshold: QuizThreshold) -> u8 {
        match threshold {
            QuizThreshold::Standard => self.standard,
            QuizThreshold::Chapter => self.chapter,
        }
    }
}

/// Why a transition was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The mission already reached a terminal status.
    NotActive(MissionStatus),
    /// Checklist items are still unchecked.
    CriteriaUnmet,
    QuizBelowThreshold { score: u8, required: u8 },
    /// The player's profile does not satisfy the mission restriction.
    RestrictionUnmet,
    /// The window closed before the call; the mission is now expired.
    WindowElapsed,
    UnknownMission,
    UnknownChecklistItem(String),
    StorageUnavailable,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NotActive(status) => write!(f, "mission is already {status}"),
            Rejection::CriteriaUnmet => write!(f, "checklist is not complete"),
            Rejection::QuizBelowThreshold { score, required } => {
                write!(f, "quiz score {score}% is below the required {required}%")
            }
            Rejection::RestrictionUnmet => write!(f, "mission is not available for this player"),
            Rejection::WindowElapsed => write!(f, "mission window has elapsed"),
            Rejection::UnknownMission => write!(f, "unknown mission"),
            Rejection::UnknownChecklistItem(item) => write!(f, "unknown checklist item `{item}`"),
            Rejection::StorageUnavailable => write!(f, "storage is unavailable"),
        }
    }
}

/// Result of a lifecycle call: the updated state, or a rejection carrying the
/// state as it stands (when there is one).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    Applied(MissionState),
    Rejected {
        reason: Rejection,
        state: Option<MissionState>,
    },
}

impl TransitionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, TransitionOutcome::Applied(_))
    }

    pub fn state(&self) -> Option<&MissionState> {
        match self {
            TransitionOutcome::Applied(state) => Some(state),
            TransitionOutcome::Rejected { state, .. } => state.as_ref(),
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            TransitionOutcome::Applied(_) => None,
            TransitionOutcome::Rejected { reason, .. } => Some(reason),
        }
    }
}

struct Rejected {
    reason: Rejection,
    state: Option<MissionState>,
}

fn reject(reason: Rejection, state: Option<MissionState>) -> Rejected {
    Rejected { reason, state }
}

/// Drives mission states through their lifecycle.
#[derive(Clone)]
pub struct MissionLifecycle {
    registry: Arc<MissionRegistry>,
    states: MissionStateStore,
    profiles: ProfileStore,
    rewards: RewardEngine,
    clock: Arc<dyn Clock>,
    thresholds: QuizThresholds,
}

impl MissionLifecycle {
    pub fn new(
        registry: Arc<MissionRegistry>,
        store: SafeStore,
        inventory: InventoryManager,
        clock: Arc<dyn Clock>,
        thresholds: QuizThresholds,
    ) -> Self {
        let profiles = ProfileStore::new(store.clone());
        Self {
            states: MissionStateStore::new(store, registry.clone(), clock.clone()),
            rewards: RewardEngine::new(profiles.clone(), inventory),
            registry,
            profiles,
            clock,
            thresholds,
        }
    }

    pub fn registry(&self) -> &MissionRegistry {
        &self.registry
    }

    pub fn states(&self) -> &MissionStateStore {
        &self.states
    }

    pub fn thresholds(&self) -> QuizThresholds {
        self.thresholds
    }

    fn settle(
        &self,
        operation: &'static str,
        id: &MissionId,
        result: Result<MissionState, Rejected>,
    ) -> TransitionOutcome {
        match result {
            Ok(state) => TransitionOutcome::Applied(state),
            Err(Rejected { reason, state }) => {
                warn!(mission_id = %id, operation, reason = %reason, "transition rejected");
                TransitionOutcome::Rejected { reason, state }
            }
        }
    }

    fn definition(&self, id: &MissionId) -> Result<&MissionDefinition, Rejected> {
        self.registry
            .get(id)
            .ok_or_else(|| reject(Rejection::UnknownMission, None))
    }

    /// The active state of `def`, created on first interaction.
    ///
    /// Terminal states are refused. An active state whose window has closed
    /// is expired on the spot and refused.
    fn live_state(&self, def: &MissionDefinition) -> Result<MissionState, Rejected> {
        let state = match self.states.get(&def.id) {
            Some(state) => state,
            None => {
                let marital = self.profiles.load().map(|p| p.marital_status);
                if !def.restriction.allows(marital) {
                    return Err(reject(Rejection::RestrictionUnmet, None));
                }
                let state = self
                    .states
                    .get_or_create(&def.id)
                    .ok_or_else(|| reject(Rejection::StorageUnavailable, None))?;
                info!(mission_id = %def.id, "mission accepted");
                state
            }
        };

        if state.status.is_terminal() {
            return Err(reject(Rejection::NotActive(state.status), Some(state)));
        }

        let now = self.clock.now_millis();
        if def.is_window_elapsed(state.started_at, now) {
            let mut expired = state.clone();
            expired.transition(MissionStatus::Expired, now);
            if !self.states.put(&expired) {
                return Err(reject(Rejection::StorageUnavailable, Some(state)));
            }
            info!(mission_id = %def.id, "mission expired");
            return Err(reject(Rejection::WindowElapsed, Some(expired)));
        }
        Ok(state)
    }

    /// Start `id`, or return it unchanged when it is already active.
    pub fn accept(&self, id: &MissionId) -> TransitionOutcome {
        let result = self.definition(id).and_then(|def| self.live_state(def));
        self.settle("accept", id, result)
    }

    /// Flip one checklist box of an active mission.
    pub fn toggle_checklist_item(&self, id: &MissionId, item_id: &str) -> TransitionOutcome {
        let result = self.definition(id).and_then(|def| {
            if !def.checklist.is_empty() && !def.has_checklist_item(item_id) {
                return Err(reject(
                    Rejection::UnknownChecklistItem(item_id.to_string()),
                    self.states.get(id),
                ));
            }
            let mut state = self.live_state(def)?;
            let checked = !state.is_checked(item_id);
            state.checklist.insert(item_id.to_string(), checked);
            state.updated_at = self.clock.now_millis();
            self.persist(state)
        });
        self.settle("toggle", id, result)
    }

    /// Record quiz progress; `percent` is clamped to `0..=100`.
    pub fn update_quiz_progress(&self, id: &MissionId, percent: i64) -> TransitionOutcome {
        let result = self.definition(id).and_then(|def| {
            let mut state = self.live_state(def)?;
            state.quiz_score = percent.clamp(0, 100) as u8;
            state.updated_at = self.clock.now_millis();
            self.persist(state)
        });
        self.settle("quiz", id, result)
    }

    /// Complete an active mission whose criteria are met, then credit its
    /// rewards.
    pub fn complete(&self, id: &MissionId, threshold: QuizThreshold) -> TransitionOutcome {
        let result = self.definition(id).and_then(|def| {
            let state = self.live_state(def)?;
            self.check_criteria(def, &state, threshold)
                .map_err(|reason| reject(reason, Some(state.clone())))?;

            let mut completed = state.clone();
            completed.transition(MissionStatus::Completed, self.clock.now_millis());
            if !self.states.put(&completed) {
                return Err(reject(Rejection::StorageUnavailable, Some(state)));
            }
            info!(mission_id = %id, "mission completed");
            self.rewards.apply_rewards(def);
            Ok(completed)
        });
        self.settle("complete", id, result)
    }

    /// Give up on an active mission, then charge its penalties.
    pub fn abandon(&self, id: &MissionId) -> TransitionOutcome {
        let result = self.definition(id).and_then(|def| {
            let state = self.live_state(def)?;
            let mut abandoned = state.clone();
            abandoned.transition(MissionStatus::Abandoned, self.clock.now_millis());
            if !self.states.put(&abandoned) {
                return Err(reject(Rejection::StorageUnavailable, Some(state)));
            }
            info!(mission_id = %id, "mission abandoned");
            self.rewards.apply_penalties(def);
            Ok(abandoned)
        });
        self.settle("abandon", id, result)
    }

    fn check_criteria(
        &self,
        def: &MissionDefinition,
        state: &MissionState,
        threshold: QuizThreshold,
    ) -> Result<(), Rejection> {
        match def.category {
            Category::Checklist => {
                let done = if def.checklist.is_empty() {
                    state.checklist.values().all(|&checked| checked)
                } else {
                    def.checklist.iter().all(|item| state.is_checked(&item.id))
                };
                if done {
                    Ok(())
                } else {
                    Err(Rejection::CriteriaUnmet)
                }
            }
            Category::Quiz => {
                let required = self.thresholds.required(threshold);
                if state.quiz_score >= required {
                    Ok(())
                } else {
                    Err(Rejection::QuizBelowThreshold {
                        score: state.quiz_score,
                        required,
                    })
                }
            }
            Category::Action | Category::Couple => Ok(()),
        }
    }

    fn persist(&self, state: MissionState) -> Result<MissionState, Rejected> {
        if self.states.put(&state) {
            Ok(state)
        } else {
            Err(reject(Rejection::StorageUnavailable, None))
        }
    }

    /// Expire every active mission whose window has closed. Nothing is
    /// credited or charged. Returns the ids that were expired.
    pub fn sweep_expired(&self) -> Vec<MissionId> {
        let now = self.clock.now_millis();
        let expired: Vec<MissionState> = self
            .states
            .all()
            .into_iter()
            .filter(|state| state.status == MissionStatus::Active)
            .filter(|state| {
                self.registry
                    .get(&state.id)
                    .is_some_and(|def| def.is_window_elapsed(state.started_at, now))
            })
            .map(|mut state| {
                state.transition(MissionStatus::Expired, now);
                state
            })
            .collect();

        if expired.is_empty() {
            return Vec::new();
        }
        if !self.states.put_many(&expired) {
            warn!(count = expired.len(), "expired missions could not be saved");
            return Vec::new();
        }
        expired
            .into_iter()
            .map(|state| {
                info!(mission_id = %state.id, "mission expired");
                state.id
            })
            .collect()
    }

    /// Current state without creating one.
    pub fn state(&self, id: &MissionId) -> Option<MissionState> {
        self.states.get(id)
    }

    /// Whole seconds left in the window of an active mission.
    pub fn window_remaining_secs(&self, id: &MissionId) -> Option<u64> {
        let state = self.states.get(id).filter(|s| s.status == MissionStatus::Active)?;
        let end = self.registry.get(id)?.window_end(state.started_at)?;
        let remaining_ms = end.saturating_sub(self.clock.now_millis()).max(0) as u64;
        Some(remaining_ms.div_ceil(1000))
    }

    pub fn reset_all(&self) -> bool {
        let reset = self.states.reset_all();
        debug!(reset, "mission reset requested");
        reset
    }
}
