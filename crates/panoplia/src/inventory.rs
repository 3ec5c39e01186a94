// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inventory subcommands: `inventory`, `equip`, `unequip` and `armor`.

use std::process::ExitCode;
use std::str::FromStr;

use panoplia_core::SlotKind;
use panoplia_game::Game;
use panoplia_inventory::{ArmorPiece, EquipOutcome, EquippedItem};

use crate::missions::REJECTED;
use crate::status::format_duration;

pub fn show(game: &Game, json: bool) -> ExitCode {
    let record = game.inventory();
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&record).unwrap_or_else(|_| "{}".to_string())
        );
        return ExitCode::SUCCESS;
    }

    println!();
    println!("  Items");
    if record.items.is_empty() {
        println!("    (none)");
    }
    for item in &record.items {
        let lifetime = item
            .duration_secs
            .map(|secs| format!(", lasts {}", format_duration(secs)))
            .unwrap_or_default();
        println!("    {} x{} [{}{}]", item.name, item.quantity, item.kind, lifetime);
    }

    println!();
    println!("  Armor");
    for piece in ArmorPiece::all() {
        let state = record.armor_state(piece);
        let marker = match (state.unlocked, state.equipped) {
            (false, _) => "locked".to_string(),
            (true, true) => format!("worn, {}%", state.integrity),
            (true, false) => format!("owned, {}%", state.integrity),
        };
        println!("    {:<32} {marker}", piece.display_name());
    }

    println!();
    for kind in [SlotKind::Consumable, SlotKind::Permanent] {
        println!("  {kind} slots");
        for (index, slot) in record.slots(kind).iter().enumerate() {
            println!("    [{index}] {}", describe_slot(game, slot.as_ref()));
        }
    }
    println!();
    ExitCode::SUCCESS
}

pub(crate) fn describe_slot(game: &Game, slot: Option<&EquippedItem>) -> String {
    match slot {
        None => "(empty)".to_string(),
        Some(item) => match game.time_remaining(item) {
            Some(secs) => format!("{} ({} left)", item.name, format_duration(secs)),
            None => item.name.clone(),
        },
    }
}

pub fn equip(game: &Game, name: &str) -> ExitCode {
    match game.equip_owned(name) {
        EquipOutcome::Equipped { kind, index } => {
            println!("Equipped `{name}` in {kind} slot {index}.");
            ExitCode::SUCCESS
        }
        EquipOutcome::SlotsFull { kind } => {
            eprintln!("panoplia: all {kind} slots are in use; unequip one first");
            ExitCode::from(REJECTED)
        }
        EquipOutcome::NotOwned => {
            eprintln!("panoplia: you do not own `{name}`");
            ExitCode::from(REJECTED)
        }
        EquipOutcome::StorageUnavailable => {
            eprintln!("panoplia: storage is unavailable");
            ExitCode::FAILURE
        }
    }
}

pub fn unequip(game: &Game, kind: &str, index: usize) -> ExitCode {
    let Ok(kind) = SlotKind::from_str(kind) else {
        eprintln!("panoplia: slot kind must be `consumable` or `permanent`");
        return ExitCode::FAILURE;
    };
    if index >= kind.capacity() {
        eprintln!(
            "panoplia: no {kind} slot {index} (there are {})",
            kind.capacity()
        );
        return ExitCode::FAILURE;
    }
    if game.unequip_from_slot(kind, index) {
        println!("{kind} slot {index} is empty.");
        ExitCode::SUCCESS
    } else {
        eprintln!("panoplia: storage is unavailable");
        ExitCode::FAILURE
    }
}

/// Accepts the short key (`sword`) or any name the piece is known by.
fn parse_piece(raw: &str) -> Option<ArmorPiece> {
    ArmorPiece::from_str(&raw.to_lowercase())
        .ok()
        .or_else(|| ArmorPiece::classify(raw))
}

pub fn armor(game: &Game, piece: &str, off: bool) -> ExitCode {
    let Some(piece) = parse_piece(piece) else {
        eprintln!("panoplia: unknown armor piece `{piece}`");
        return ExitCode::FAILURE;
    };
    let changed = if off {
        game.unequip_armor(piece)
    } else {
        game.equip_armor(piece)
    };
    if changed {
        let verb = if off { "removed" } else { "put on" };
        println!("{} {verb}.", piece.display_name());
        ExitCode::SUCCESS
    } else {
        eprintln!("panoplia: {} is still locked", piece.display_name());
        ExitCode::from(REJECTED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_piece_accepts_keys_and_names() {
        assert_eq!(parse_piece("sword"), Some(ArmorPiece::Sword));
        assert_eq!(parse_piece("Helmet"), Some(ArmorPiece::Helmet));
        assert_eq!(parse_piece("Escudo da Fé"), Some(ArmorPiece::Shield));
        assert_eq!(parse_piece("lança"), None);
    }
}
