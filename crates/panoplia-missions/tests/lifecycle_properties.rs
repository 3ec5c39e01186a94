// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Properties of the mission state machine over arbitrary call sequences.

use std::sync::Arc;

use panoplia_core::{ManualClock, MissionId};
use panoplia_inventory::InventoryManager;
use panoplia_missions::{
    Category, MissionDefinition, MissionLifecycle, MissionRegistry, MissionStatus, PenaltyBundle,
    PlayerProfile, ProfileStore, QuizThreshold, QuizThresholds, RewardBundle, RewardEngine,
};
use panoplia_storage::{MemoryStore, SafeStore};
use proptest::prelude::*;

const MISSION: &str = "vigilia";

fn lifecycle(initial_wisdom: u32) -> (MissionLifecycle, ProfileStore, Arc<ManualClock>) {
    let mut registry = MissionRegistry::new();
    registry
        .register(
            MissionDefinition::new(MISSION, "Vigília", Category::Quiz)
                .with_reward(RewardBundle {
                    wisdom: 10,
                    coins: 1,
                    ..RewardBundle::default()
                })
                .with_penalty(PenaltyBundle {
                    sin: 1,
                    wisdom_loss: 7,
                })
                .with_window_secs(120),
        )
        .unwrap();

    let safe = SafeStore::new(Arc::new(MemoryStore::new()));
    let clock = Arc::new(ManualClock::new(0));
    let profiles = ProfileStore::new(safe.clone());
    let mut profile = PlayerProfile::new("Ana");
    profile.wisdom = initial_wisdom;
    profiles.save(&profile);

    let lifecycle = MissionLifecycle::new(
        Arc::new(registry),
        safe.clone(),
        InventoryManager::new(safe, clock.clone()),
        clock.clone(),
        QuizThresholds::default(),
    );
    (lifecycle, profiles, clock)
}

#[derive(Debug, Clone)]
enum Call {
    Accept,
    Quiz(i64),
    Complete,
    Abandon,
    Advance(i64),
    Sweep,
}

fn call() -> impl Strategy<Value = Call> {
    prop_oneof![
        Just(Call::Accept),
        (-50i64..200).prop_map(Call::Quiz),
        Just(Call::Complete),
        Just(Call::Abandon),
        (0i64..90).prop_map(Call::Advance),
        Just(Call::Sweep),
    ]
}

proptest! {
    #[test]
    fn terminal_status_never_changes(calls in proptest::collection::vec(call(), 1..40)) {
        let (lifecycle, profiles, clock) = lifecycle(20);
        let id = MissionId::new(MISSION);
        let mut terminal: Option<MissionStatus> = None;

        for call in calls {
            match call {
                Call::Accept => { lifecycle.accept(&id); }
                Call::Quiz(p) => { lifecycle.update_quiz_progress(&id, p); }
                Call::Complete => { lifecycle.complete(&id, QuizThreshold::Standard); }
                Call::Abandon => { lifecycle.abandon(&id); }
                Call::Advance(secs) => clock.advance_secs(secs),
                Call::Sweep => { lifecycle.sweep_expired(); }
            }

            let status = lifecycle.state(&id).map(|s| s.status);
            if let Some(seen) = terminal {
                prop_assert_eq!(status, Some(seen));
            } else if let Some(status) = status.filter(|s| s.is_terminal()) {
                terminal = Some(status);
            }
            if let Some(state) = lifecycle.state(&id) {
                prop_assert!(state.quiz_score <= 100);
            }
        }

        // at most one payout or charge happened
        let profile = profiles.load().unwrap();
        match terminal {
            Some(MissionStatus::Completed) => prop_assert_eq!(profile.wisdom, 30),
            Some(MissionStatus::Abandoned) => {
                prop_assert_eq!(profile.wisdom, 13);
                prop_assert_eq!(profile.sin, 1);
            }
            _ => {
                prop_assert_eq!(profile.wisdom, 20);
                prop_assert_eq!(profile.sin, 0);
            }
        }
    }

    #[test]
    fn penalties_never_push_wisdom_below_zero(wisdom in 0u32..1_000, loss in 0u32..2_000) {
        let safe = SafeStore::new(Arc::new(MemoryStore::new()));
        let profiles = ProfileStore::new(safe.clone());
        let mut profile = PlayerProfile::new("Ana");
        profile.wisdom = wisdom;
        profiles.save(&profile);

        let engine = RewardEngine::new(
            profiles.clone(),
            InventoryManager::new(safe, Arc::new(ManualClock::new(0))),
        );
        let def = MissionDefinition::new("x", "X", Category::Action)
            .with_penalty(PenaltyBundle { sin: 0, wisdom_loss: loss });
        engine.apply_penalties(&def);

        prop_assert_eq!(profiles.load().unwrap().wisdom, wisdom.saturating_sub(loss));
    }
}
