// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The persisted inventory singleton.

use std::collections::BTreeMap;

use panoplia_core::SlotKind;
use serde::{Deserialize, Serialize};

use crate::armor::{ArmorPiece, ArmorState};
use crate::slots::EquippedItem;

/// A generic (non-armor) item the player owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedItem {
    pub name: String,
    pub quantity: u32,
    /// Pool the item goes to when equipped.
    pub kind: SlotKind,
    /// Lifetime once equipped; `None` never expires.
    #[serde(default)]
    pub duration_secs: Option<u64>,
}

/// One unit of an item handed to the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemGrant {
    pub name: String,
    pub kind: SlotKind,
    #[serde(default)]
    pub duration_secs: Option<u64>,
}

impl ItemGrant {
    /// A grant with no lifetime, equipped into the permanent pool.
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: SlotKind::Permanent,
            duration_secs: None,
        }
    }

    /// A timed grant, equipped into the consumable pool.
    pub fn consumable(name: impl Into<String>, duration_secs: u64) -> Self {
        Self {
            name: name.into(),
            kind: SlotKind::Consumable,
            duration_secs: Some(duration_secs),
        }
    }
}

/// Everything the player owns and wears.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    #[serde(default)]
    pub items: Vec<OwnedItem>,
    #[serde(default)]
    pub armor: BTreeMap<ArmorPiece, ArmorState>,
    #[serde(default)]
    pub consumable_slots: [Option<EquippedItem>; 3],
    #[serde(default)]
    pub permanent_slots: [Option<EquippedItem>; 2],
}

impl InventoryRecord {
    pub fn slots(&self, kind: SlotKind) -> &[Option<EquippedItem>] {
        match kind {
            SlotKind::Consumable => &self.consumable_slots,
            SlotKind::Permanent => &self.permanent_slots,
        }
    }

    pub fn slots_mut(&mut self, kind: SlotKind) -> &mut [Option<EquippedItem>] {
        match kind {
            SlotKind::Consumable => &mut self.consumable_slots,
            SlotKind::Permanent => &mut self.permanent_slots,
        }
    }

    /// Flags of `piece`; pieces never granted read as locked.
    pub fn armor_state(&self, piece: ArmorPiece) -> ArmorState {
        self.armor.get(&piece).copied().unwrap_or_default()
    }

    pub fn armor_state_mut(&mut self, piece: ArmorPiece) -> &mut ArmorState {
        self.armor.entry(piece).or_default()
    }

    /// Case-insensitive lookup of an owned generic item.
    pub fn item(&self, name: &str) -> Option<&OwnedItem> {
        let wanted = name.to_lowercase();
        self.items.iter().find(|i| i.name.to_lowercase() == wanted)
    }

    fn item_position(&self, name: &str) -> Option<usize> {
        let wanted = name.to_lowercase();
        self.items.iter().position(|i| i.name.to_lowercase() == wanted)
    }

    /// Add one unit of `grant` to the generic items; returns the new quantity.
    pub fn add_generic(&mut self, grant: &ItemGrant) -> u32 {
        match self.item_position(&grant.name) {
            Some(pos) => {
                let item = &mut self.items[pos];
                item.quantity = item.quantity.saturating_add(1);
                item.quantity
            }
            None => {
                self.items.push(OwnedItem {
                    name: grant.name.clone(),
                    quantity: 1,
                    kind: grant.kind,
                    duration_secs: grant.duration_secs,
                });
                1
            }
        }
    }

    /// Remove one unit of `name`, dropping the entry when it reaches zero.
    /// Returns the removed unit's description.
    pub fn take_one(&mut self, name: &str) -> Option<OwnedItem> {
        let pos = self.item_position(name)?;
        let item = &mut self.items[pos];
        if item.quantity == 0 {
            return None;
        }
        item.quantity -= 1;
        let taken = OwnedItem {
            quantity: 1,
            ..item.clone()
        };
        if item.quantity == 0 {
            self.items.remove(pos);
        }
        Some(taken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_is_empty_with_fixed_slots() {
        let record = InventoryRecord::default();
        assert!(record.items.is_empty());
        assert_eq!(record.slots(SlotKind::Consumable).len(), 3);
        assert_eq!(record.slots(SlotKind::Permanent).len(), 2);
        assert!(!record.armor_state(ArmorPiece::Sword).unlocked);
    }

    #[test]
    fn add_generic_merges_case_insensitively() {
        let mut record = InventoryRecord::default();
        assert_eq!(record.add_generic(&ItemGrant::plain("Bíblia")), 1);
        assert_eq!(record.add_generic(&ItemGrant::plain("BÍBLIA")), 2);
        assert_eq!(record.items.len(), 1);
        assert_eq!(record.items[0].name, "Bíblia");
    }

    #[test]
    fn take_one_decrements_then_removes() {
        let mut record = InventoryRecord::default();
        let grant = ItemGrant::consumable("Maná", 60);
        record.add_generic(&grant);
        record.add_generic(&grant);

        let taken = record.take_one("maná").unwrap();
        assert_eq!(taken.duration_secs, Some(60));
        assert_eq!(record.item("Maná").unwrap().quantity, 1);

        record.take_one("Maná").unwrap();
        assert!(record.item("Maná").is_none());
        assert!(record.take_one("Maná").is_none());
    }

    #[test]
    fn persisted_shape_uses_camel_case_slot_arrays() {
        let json = serde_json::to_value(InventoryRecord::default()).unwrap();
        assert_eq!(json["consumableSlots"].as_array().unwrap().len(), 3);
        assert_eq!(json["permanentSlots"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn partial_documents_fill_in_defaults() {
        let record: InventoryRecord =
            serde_json::from_str(r#"{"items":[{"name":"Pão","quantity":2,"kind":"consumable"}]}"#)
                .unwrap();
        assert_eq!(record.items[0].quantity, 2);
        assert_eq!(record.items[0].duration_secs, None);
        assert!(record.consumable_slots.iter().all(Option::is_none));
    }
}
