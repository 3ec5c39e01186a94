// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inventory and equipment slots for the Panoplia mission tracker.
//!
//! The persisted [`InventoryRecord`] holds generic owned items, the seven
//! armor-piece flags and two fixed-capacity equip-slot pools. The
//! [`InventoryManager`] is the only writer: it classifies granted items,
//! equips into the first free slot (never evicting), and clears expired
//! consumables when the recurring sweep calls
//! [`InventoryManager::clear_expired_items`].

pub mod armor;
pub mod manager;
pub mod record;
pub mod slots;

pub use armor::{ArmorPiece, ArmorState};
pub use manager::{AddedItem, ClearedSlot, EquipOutcome, InventoryManager};
pub use record::{InventoryRecord, ItemGrant, OwnedItem};
pub use slots::{EquippedItem, EquippedSlots};
