// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Applies reward and penalty bundles to the profile and inventory.
//!
//! Both operations are skipped entirely when no profile exists: profile
//! creation belongs to whoever onboards the player, not to this engine.
//!
//! Item grants are independent `add_grant` calls. If the process stops
//! midway, the items granted so far stay granted.

use panoplia_inventory::InventoryManager;
use tracing::{debug, info, warn};

use crate::definition::MissionDefinition;
use crate::profile::ProfileStore;

#[derive(Clone)]
pub struct RewardEngine {
    profiles: ProfileStore,
    inventory: InventoryManager,
}

impl RewardEngine {
    pub fn new(profiles: ProfileStore, inventory: InventoryManager) -> Self {
        Self {
            profiles,
            inventory,
        }
    }

    /// Credit the reward bundle of `definition`. Returns `false` when nothing
    /// was applied.
    pub fn apply_rewards(&self, definition: &MissionDefinition) -> bool {
        let Some(mut profile) = self.profiles.load() else {
            debug!(mission_id = %definition.id, "no profile; rewards skipped");
            return false;
        };
        let reward = &definition.reward;

        profile.wisdom = profile.wisdom.saturating_add(reward.wisdom);
        if let Some(coins) = profile.coins.as_mut() {
            *coins = coins.saturating_add(reward.coins);
        }
        if !self.profiles.save(&profile) {
            warn!(mission_id = %definition.id, "reward not persisted");
            return false;
        }

        for grant in &reward.armor {
            for _ in 0..grant.quantity {
                self.inventory.add_item(grant.piece.display_name());
            }
        }
        for grant in &reward.consumables {
            let item = grant.item_grant();
            for _ in 0..grant.quantity {
                self.inventory.add_grant(&item);
            }
        }

        info!(
            mission_id = %definition.id,
            wisdom = reward.wisdom,
            coins = reward.coins,
            total_wisdom = profile.wisdom,
            "rewards applied"
        );
        true
    }

    /// Charge the penalty bundle of `definition`. Wisdom never drops below 0.
    pub fn apply_penalties(&self, definition: &MissionDefinition) -> bool {
        let Some(mut profile) = self.profiles.load() else {
            debug!(mission_id = %definition.id, "no profile; penalties skipped");
            return false;
        };
        let penalty = &definition.penalty;

        profile.sin = profile.sin.saturating_add(penalty.sin);
        profile.wisdom = profile.wisdom.saturating_sub(penalty.wisdom_loss);
        if !self.profiles.save(&profile) {
            warn!(mission_id = %definition.id, "penalty not persisted");
            return false;
        }

        info!(
            mission_id = %definition.id,
            sin = penalty.sin,
            wisdom_loss = penalty.wisdom_loss,
            total_wisdom = profile.wisdom,
            "penalties applied"
        );
        true
    }
}
