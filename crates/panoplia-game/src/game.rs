// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The explicit service object every caller goes through.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use panoplia_config::PanopliaConfig;
use panoplia_core::{Clock, HealthStatus, KvStore, MissionId, SlotKind};
use panoplia_inventory::{
    AddedItem, ArmorPiece, ClearedSlot, EquipOutcome, EquippedItem, EquippedSlots,
    InventoryManager, InventoryRecord,
};
use panoplia_missions::{
    MaritalStatus, MissionDefinition, MissionLifecycle, MissionRegistry, MissionState,
    PlayerProfile, ProfileStore, QuizThreshold, QuizThresholds, TransitionOutcome,
};
use panoplia_storage::SafeStore;
use tracing::{debug, info};

/// What one sweep pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub expired_missions: Vec<MissionId>,
    pub cleared_slots: Vec<ClearedSlot>,
}

impl SweepReport {
    pub fn is_empty(&self) -> bool {
        self.expired_missions.is_empty() && self.cleared_slots.is_empty()
    }
}

/// A mission as the presentation layer lists it.
#[derive(Debug, Clone)]
pub struct MissionView {
    pub definition: MissionDefinition,
    pub state: Option<MissionState>,
    /// Whole seconds left for an active mission with a window.
    pub window_remaining_secs: Option<u64>,
}

/// Mission tracker service. One per process.
///
/// Every mutation holds the operation lock for its whole read-modify-write,
/// so user calls and sweep ticks never interleave.
pub struct Game {
    store: SafeStore,
    clock: Arc<dyn Clock>,
    lifecycle: MissionLifecycle,
    inventory: InventoryManager,
    profiles: ProfileStore,
    ops: Mutex<()>,
}

impl Game {
    pub fn new(
        store: Arc<dyn KvStore>,
        clock: Arc<dyn Clock>,
        registry: MissionRegistry,
        thresholds: QuizThresholds,
    ) -> Self {
        let store = SafeStore::new(store);
        let inventory = InventoryManager::new(store.clone(), clock.clone());
        let lifecycle = MissionLifecycle::new(
            Arc::new(registry),
            store.clone(),
            inventory.clone(),
            clock.clone(),
            thresholds,
        );
        info!(backend = store.backend_name(), missions = lifecycle.registry().len(), "game ready");
        Self {
            profiles: ProfileStore::new(store.clone()),
            store,
            clock,
            lifecycle,
            inventory,
            ops: Mutex::new(()),
        }
    }

    /// Build from loaded configuration with the builtin catalog.
    pub fn from_config(
        store: Arc<dyn KvStore>,
        clock: Arc<dyn Clock>,
        config: &PanopliaConfig,
    ) -> Self {
        let thresholds = QuizThresholds {
            standard: config.quiz.pass_threshold,
            chapter: config.quiz.chapter_pass_threshold,
        };
        Self::new(store, clock, MissionRegistry::builtin(), thresholds)
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // The guarded value is `()`, so a poisoned lock holds nothing stale.
        self.ops.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn registry(&self) -> &MissionRegistry {
        self.lifecycle.registry()
    }

    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    pub fn health(&self) -> HealthStatus {
        self.store.health_check()
    }

    pub fn backend_name(&self) -> &str {
        self.store.backend_name()
    }

    // --- profile ---

    /// Create the player profile if none exists yet.
    pub fn init_profile(&self, name: &str, marital_status: MaritalStatus) -> Option<PlayerProfile> {
        let _guard = self.lock();
        let mut profile = PlayerProfile::new(name);
        profile.marital_status = marital_status;
        self.profiles.initialize(profile)
    }

    pub fn profile(&self) -> Option<PlayerProfile> {
        self.profiles.load()
    }

    // --- missions ---

    pub fn accept(&self, id: &MissionId) -> TransitionOutcome {
        let _guard = self.lock();
        self.lifecycle.accept(id)
    }

    pub fn toggle_checklist_item(&self, id: &MissionId, item_id: &str) -> TransitionOutcome {
        let _guard = self.lock();
        self.lifecycle.toggle_checklist_item(id, item_id)
    }

    pub fn update_quiz_progress(&self, id: &MissionId, percent: i64) -> TransitionOutcome {
        let _guard = self.lock();
        self.lifecycle.update_quiz_progress(id, percent)
    }

    pub fn complete(&self, id: &MissionId, threshold: QuizThreshold) -> TransitionOutcome {
        let _guard = self.lock();
        self.lifecycle.complete(id, threshold)
    }

    pub fn abandon(&self, id: &MissionId) -> TransitionOutcome {
        let _guard = self.lock();
        self.lifecycle.abandon(id)
    }

    pub fn mission_state(&self, id: &MissionId) -> Option<MissionState> {
        self.lifecycle.state(id)
    }

    /// Every catalog mission with its current state, in catalog order.
    pub fn missions(&self) -> Vec<MissionView> {
        self.registry()
            .iter()
            .map(|def| MissionView {
                definition: def.clone(),
                state: self.lifecycle.state(&def.id),
                window_remaining_secs: self.lifecycle.window_remaining_secs(&def.id),
            })
            .collect()
    }

    /// Missions the current player may accept.
    pub fn available_missions(&self) -> Vec<MissionDefinition> {
        let profile = self.profiles.load();
        self.registry()
            .available_for(profile.as_ref())
            .cloned()
            .collect()
    }

    /// Forget all mission progress.
    pub fn reset_missions(&self) -> bool {
        let _guard = self.lock();
        self.lifecycle.reset_all()
    }

    // --- inventory ---

    pub fn add_item(&self, name: &str) -> Option<AddedItem> {
        let _guard = self.lock();
        self.inventory.add_item(name)
    }

    pub fn equip_to_slot(&self, item: EquippedItem, kind: SlotKind) -> EquipOutcome {
        let _guard = self.lock();
        self.inventory.equip_to_slot(item, kind)
    }

    pub fn equip_owned(&self, name: &str) -> EquipOutcome {
        let _guard = self.lock();
        self.inventory.equip_owned(name)
    }

    pub fn unequip_from_slot(&self, kind: SlotKind, index: usize) -> bool {
        let _guard = self.lock();
        self.inventory.unequip_from_slot(kind, index)
    }

    pub fn equip_armor(&self, piece: ArmorPiece) -> bool {
        let _guard = self.lock();
        self.inventory.equip_armor(piece)
    }

    pub fn unequip_armor(&self, piece: ArmorPiece) -> bool {
        let _guard = self.lock();
        self.inventory.unequip_armor(piece)
    }

    pub fn inventory(&self) -> InventoryRecord {
        self.inventory.load()
    }

    pub fn equipped_slots(&self) -> EquippedSlots {
        self.inventory.equipped_slots()
    }

    pub fn time_remaining(&self, item: &EquippedItem) -> Option<u64> {
        self.inventory.time_remaining(item)
    }

    pub fn has_sword(&self) -> bool {
        self.inventory.has_sword()
    }

    pub fn has_bible(&self) -> bool {
        self.inventory.has_bible()
    }

    pub fn has_armor_piece(&self, piece: ArmorPiece) -> bool {
        self.inventory.has_armor_piece(piece)
    }

    // --- sweep ---

    /// Expire elapsed missions and clear expired equip slots.
    pub fn sweep(&self) -> SweepReport {
        let _guard = self.lock();
        let report = SweepReport {
            expired_missions: self.lifecycle.sweep_expired(),
            cleared_slots: self.inventory.clear_expired_items(),
        };
        if report.is_empty() {
            debug!("sweep found nothing to expire");
        } else {
            info!(
                missions = report.expired_missions.len(),
                slots = report.cleared_slots.len(),
                "sweep applied"
            );
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panoplia_core::ManualClock;
    use panoplia_storage::MemoryStore;

    fn game() -> (Game, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(0));
        let game = Game::new(
            Arc::new(MemoryStore::new()),
            clock.clone(),
            MissionRegistry::builtin(),
            QuizThresholds::default(),
        );
        (game, clock)
    }

    #[test]
    fn sweep_covers_missions_and_slots() {
        let (game, clock) = game();
        game.init_profile("Ana", MaritalStatus::Single);
        game.accept(&MissionId::new("jejum"));
        game.equip_to_slot(
            EquippedItem::new("Maná", SlotKind::Consumable, Some(60), 0),
            SlotKind::Consumable,
        );

        assert!(game.sweep().is_empty());

        clock.advance_secs(12 * 60 * 60);
        let report = game.sweep();
        assert_eq!(report.expired_missions, vec![MissionId::new("jejum")]);
        assert_eq!(report.cleared_slots.len(), 1);
    }

    #[test]
    fn mission_views_follow_catalog_order() {
        let (game, _) = game();
        game.accept(&MissionId::new("louvor-diario"));
        let views = game.missions();
        assert_eq!(views.len(), game.registry().len());

        let louvor = views
            .iter()
            .find(|v| v.definition.id.as_str() == "louvor-diario")
            .unwrap();
        assert!(louvor.state.is_some());
        assert_eq!(louvor.window_remaining_secs, Some(24 * 60 * 60));
    }

    #[test]
    fn available_missions_respect_marital_status() {
        let (game, _) = game();
        game.init_profile("Ana", MaritalStatus::Married);
        let ids: Vec<_> = game
            .available_missions()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert!(ids.contains(&MissionId::new("oracao-em-casal")));
        assert!(!ids.contains(&MissionId::new("guardar-o-coracao")));
    }

    #[test]
    fn game_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Game>();
    }
}
