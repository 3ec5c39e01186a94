// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Equip slot behavior across whole sequences of operations.

use std::sync::Arc;

use panoplia_core::{Clock, ManualClock, SlotKind};
use panoplia_inventory::{EquipOutcome, EquippedItem, InventoryManager};
use panoplia_storage::{MemoryStore, SafeStore};
use proptest::prelude::*;

fn manager_at(start: i64) -> (InventoryManager, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start));
    let store = SafeStore::new(Arc::new(MemoryStore::new()));
    (InventoryManager::new(store, clock.clone()), clock)
}

#[test]
fn timed_consumable_expires_after_its_duration() {
    let (inv, clock) = manager_at(0);
    let potion = EquippedItem::new("Óleo da Unção", SlotKind::Consumable, Some(300), 0);
    assert!(inv.equip_to_slot(potion, SlotKind::Consumable).is_equipped());

    clock.advance_secs(299);
    let equipped = inv.equipped_slots().consumable[0].clone().unwrap();
    assert!(inv.time_remaining(&equipped).unwrap() > 0);
    assert!(inv.clear_expired_items().is_empty());

    clock.advance_secs(2);
    let cleared = inv.clear_expired_items();
    assert_eq!(cleared.len(), 1);
    assert_eq!(cleared[0].item.name, "Óleo da Unção");
    assert!(inv.equipped_slots().consumable[0].is_none());
}

#[test]
fn fourth_consumable_is_rejected_and_pool_untouched() {
    let (inv, _) = manager_at(1_000);
    for name in ["Pão", "Vinho", "Azeite"] {
        let item = EquippedItem::new(name, SlotKind::Consumable, Some(600), 1_000);
        assert!(inv.equip_to_slot(item, SlotKind::Consumable).is_equipped());
    }
    let before = inv.equipped_slots();

    let extra = EquippedItem::new("Mirra", SlotKind::Consumable, Some(600), 1_000);
    assert_eq!(
        inv.equip_to_slot(extra, SlotKind::Consumable),
        EquipOutcome::SlotsFull {
            kind: SlotKind::Consumable
        }
    );

    let after = inv.equipped_slots();
    assert_eq!(before, after);
    let names: Vec<_> = after
        .consumable
        .iter()
        .flatten()
        .map(|item| item.name.as_str())
        .collect();
    assert_eq!(names, ["Pão", "Vinho", "Azeite"]);
}

#[derive(Debug, Clone)]
enum Op {
    Equip(SlotKind, Option<u64>),
    Unequip(SlotKind, usize),
    Advance(i64),
    Sweep,
}

fn kind() -> impl Strategy<Value = SlotKind> {
    prop_oneof![Just(SlotKind::Consumable), Just(SlotKind::Permanent)]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (kind(), proptest::option::of(1u64..600)).prop_map(|(k, d)| Op::Equip(k, d)),
        (kind(), 0usize..4).prop_map(|(k, i)| Op::Unequip(k, i)),
        (0i64..400).prop_map(Op::Advance),
        Just(Op::Sweep),
    ]
}

proptest! {
    #[test]
    fn occupancy_never_exceeds_capacity(ops in proptest::collection::vec(op(), 1..60)) {
        let (inv, clock) = manager_at(0);

        for op in ops {
            match op {
                Op::Equip(kind, duration) => {
                    let occupied = inv.equipped_slots().occupied(kind);
                    let item = EquippedItem::new("x", kind, duration, clock.now_millis());
                    let outcome = inv.equip_to_slot(item, kind);
                    if occupied < kind.capacity() {
                        prop_assert!(outcome.is_equipped());
                    } else {
                        prop_assert_eq!(outcome, EquipOutcome::SlotsFull { kind });
                    }
                }
                Op::Unequip(kind, index) => {
                    let ok = inv.unequip_from_slot(kind, index);
                    prop_assert_eq!(ok, index < kind.capacity());
                }
                Op::Advance(secs) => clock.advance_secs(secs),
                Op::Sweep => {
                    let now = clock.now_millis();
                    for cleared in inv.clear_expired_items() {
                        prop_assert!(cleared.item.is_expired(now));
                    }
                    let slots = inv.equipped_slots();
                    for item in slots.consumable.iter().chain(&slots.permanent).flatten() {
                        prop_assert!(!item.is_expired(now));
                    }
                }
            }

            let slots = inv.equipped_slots();
            prop_assert_eq!(slots.consumable.len(), SlotKind::Consumable.capacity());
            prop_assert_eq!(slots.permanent.len(), SlotKind::Permanent.capacity());
        }
    }
}
