// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inventory & equipment slot manager.
//!
//! Every operation is a read-modify-write of the `inventory` key through a
//! [`SafeStore`]. Storage failures surface as `None`, `false` or
//! [`EquipOutcome::StorageUnavailable`], never as panics or errors. A stored
//! inventory that cannot be read is never overwritten; changes are refused
//! until it reads again.

use std::sync::Arc;

use panoplia_core::{Clock, SlotKind};
use panoplia_storage::{SafeStore, Stored, keys};
use tracing::{debug, info, warn};

use crate::armor::ArmorPiece;
use crate::record::{InventoryRecord, ItemGrant, OwnedItem};
use crate::slots::{EquippedItem, EquippedSlots, first_empty};

/// How a granted item was filed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddedItem {
    /// The name matched an armor piece, which is now unlocked.
    Armor(ArmorPiece),
    /// Stored as a generic item; `quantity` is the new total.
    Generic { name: String, quantity: u32 },
}

/// Result of an equip request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EquipOutcome {
    Equipped { kind: SlotKind, index: usize },
    /// Every position of the pool is taken. Nothing was evicted.
    SlotsFull { kind: SlotKind },
    /// `equip_owned` was asked for an item the player does not have.
    NotOwned,
    StorageUnavailable,
}

impl EquipOutcome {
    pub fn is_equipped(&self) -> bool {
        matches!(self, EquipOutcome::Equipped { .. })
    }
}

/// A slot emptied by the expiration sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearedSlot {
    pub kind: SlotKind,
    pub index: usize,
    pub item: EquippedItem,
}

/// Reads and mutates the persisted inventory.
#[derive(Clone)]
pub struct InventoryManager {
    store: SafeStore,
    clock: Arc<dyn Clock>,
}

impl InventoryManager {
    pub fn new(store: SafeStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// The stored inventory, or an empty one when nothing is saved yet.
    pub fn load(&self) -> InventoryRecord {
        self.store
            .read_json(keys::INVENTORY)
            .unwrap_or_default()
    }

    /// The inventory to modify. `None` while the stored one is unreadable.
    fn load_for_update(&self) -> Option<InventoryRecord> {
        match self.store.load_json(keys::INVENTORY) {
            Stored::Present(record) => Some(record),
            Stored::Absent => Some(InventoryRecord::default()),
            Stored::Unreadable => {
                warn!("inventory unreadable; change refused");
                None
            }
        }
    }

    fn save(&self, record: &InventoryRecord) -> bool {
        self.store.write_json(keys::INVENTORY, record)
    }

    /// Add one unit of a plain item by name.
    pub fn add_item(&self, name: &str) -> Option<AddedItem> {
        self.add_grant(&ItemGrant::plain(name))
    }

    /// Add one unit of `grant`. Names matching an armor piece unlock (or
    /// repair) that piece; everything else lands in the generic items.
    ///
    /// Returns `None` when the inventory could not be read or persisted.
    pub fn add_grant(&self, grant: &ItemGrant) -> Option<AddedItem> {
        let mut record = self.load_for_update()?;
        let added = match ArmorPiece::classify(&grant.name) {
            Some(piece) => {
                record.armor_state_mut(piece).grant();
                AddedItem::Armor(piece)
            }
            None => AddedItem::Generic {
                name: grant.name.clone(),
                quantity: record.add_generic(grant),
            },
        };

        if !self.save(&record) {
            warn!(item = %grant.name, "item grant not persisted");
            return None;
        }
        debug!(item = %grant.name, ?added, "item added to inventory");
        Some(added)
    }

    /// Put `item` into the first free position of the `kind` pool.
    pub fn equip_to_slot(&self, mut item: EquippedItem, kind: SlotKind) -> EquipOutcome {
        let Some(mut record) = self.load_for_update() else {
            return EquipOutcome::StorageUnavailable;
        };
        let Some(index) = first_empty(record.slots(kind)) else {
            debug!(slot_kind = %kind, item = %item.name, "all slots occupied");
            return EquipOutcome::SlotsFull { kind };
        };

        item.kind = kind;
        let name = item.name.clone();
        record.slots_mut(kind)[index] = Some(item);
        if !self.save(&record) {
            return EquipOutcome::StorageUnavailable;
        }
        info!(slot_kind = %kind, index, item = %name, "item equipped");
        EquipOutcome::Equipped { kind, index }
    }

    /// Consume one owned unit of `name` into its pool. The unit is only
    /// taken when a free slot exists.
    pub fn equip_owned(&self, name: &str) -> EquipOutcome {
        let Some(mut record) = self.load_for_update() else {
            return EquipOutcome::StorageUnavailable;
        };
        let Some(owned) = record.item(name).filter(|i| i.quantity > 0).cloned() else {
            return EquipOutcome::NotOwned;
        };
        let Some(index) = first_empty(record.slots(owned.kind)) else {
            debug!(slot_kind = %owned.kind, item = %owned.name, "all slots occupied");
            return EquipOutcome::SlotsFull { kind: owned.kind };
        };

        record.take_one(&owned.name);
        let item = EquippedItem::new(
            owned.name.clone(),
            owned.kind,
            owned.duration_secs,
            self.clock.now_millis(),
        );
        record.slots_mut(owned.kind)[index] = Some(item);
        if !self.save(&record) {
            return EquipOutcome::StorageUnavailable;
        }
        info!(slot_kind = %owned.kind, index, item = %owned.name, "owned item equipped");
        EquipOutcome::Equipped {
            kind: owned.kind,
            index,
        }
    }

    /// Empty position `index` of the `kind` pool.
    ///
    /// Returns `false` for an out-of-range index or a failed write. Clearing
    /// an already empty slot succeeds without writing.
    pub fn unequip_from_slot(&self, kind: SlotKind, index: usize) -> bool {
        if index >= kind.capacity() {
            return false;
        }
        let Some(mut record) = self.load_for_update() else {
            return false;
        };
        let Some(removed) = record.slots_mut(kind)[index].take() else {
            return true;
        };
        if !self.save(&record) {
            return false;
        }
        info!(slot_kind = %kind, index, item = %removed.name, "item unequipped");
        true
    }

    /// Seconds left on `item`; `None` for items that never expire.
    pub fn time_remaining(&self, item: &EquippedItem) -> Option<u64> {
        item.time_remaining_secs(self.clock.now_millis())
    }

    /// Clear every timed item whose lifetime has elapsed, in both pools.
    ///
    /// Has no timer of its own; the recurring sweep calls it.
    pub fn clear_expired_items(&self) -> Vec<ClearedSlot> {
        let now = self.clock.now_millis();
        let Some(mut record) = self.load_for_update() else {
            return Vec::new();
        };
        let mut cleared = Vec::new();

        for kind in [SlotKind::Consumable, SlotKind::Permanent] {
            for (index, slot) in record.slots_mut(kind).iter_mut().enumerate() {
                if let Some(item) = slot.take_if(|item| item.is_expired(now)) {
                    cleared.push(ClearedSlot { kind, index, item });
                }
            }
        }

        if cleared.is_empty() {
            return cleared;
        }
        if !self.save(&record) {
            warn!(count = cleared.len(), "expired items could not be cleared");
            return Vec::new();
        }
        for slot in &cleared {
            info!(slot_kind = %slot.kind, index = slot.index, item = %slot.item.name, "equipped item expired");
        }
        cleared
    }

    /// Both pools, for polling by the presentation layer.
    pub fn equipped_slots(&self) -> EquippedSlots {
        let record = self.load();
        EquippedSlots {
            consumable: record.consumable_slots.to_vec(),
            permanent: record.permanent_slots.to_vec(),
        }
    }

    pub fn owned_items(&self) -> Vec<OwnedItem> {
        self.load().items
    }

    pub fn has_armor_piece(&self, piece: ArmorPiece) -> bool {
        self.load().armor_state(piece).unlocked
    }

    /// Quizzes are gated on the sword.
    pub fn has_sword(&self) -> bool {
        self.has_armor_piece(ArmorPiece::Sword)
    }

    /// The study section is gated on owning a bible.
    pub fn has_bible(&self) -> bool {
        self.load().items.iter().any(|item| {
            let name = item.name.to_lowercase();
            item.quantity > 0 && (name.contains("bíblia") || name.contains("bible"))
        })
    }

    /// Wear an unlocked armor piece. Locked pieces are refused.
    pub fn equip_armor(&self, piece: ArmorPiece) -> bool {
        self.set_armor_equipped(piece, true)
    }

    pub fn unequip_armor(&self, piece: ArmorPiece) -> bool {
        self.set_armor_equipped(piece, false)
    }

    fn set_armor_equipped(&self, piece: ArmorPiece, equipped: bool) -> bool {
        let Some(mut record) = self.load_for_update() else {
            return false;
        };
        let state = record.armor_state_mut(piece);
        if !state.unlocked {
            return false;
        }
        if state.equipped == equipped {
            return true;
        }
        state.equipped = equipped;
        let saved = self.save(&record);
        if saved {
            info!(piece = %piece, equipped, "armor piece toggled");
        }
        saved
    }
}
