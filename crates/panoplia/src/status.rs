// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `panoplia status` command implementation.
//!
//! Summarizes the profile, mission progress, worn armor and equip slots.
//! `--json` prints the same summary for scripting.

use std::io::IsTerminal;
use std::process::ExitCode;

use panoplia_core::{HealthStatus, SlotKind};
use panoplia_game::Game;
use panoplia_inventory::ArmorPiece;
use panoplia_missions::MissionStatus;
use serde::Serialize;

use crate::inventory::describe_slot;

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub player: Option<PlayerSummary>,
    pub storage_backend: String,
    pub storage_healthy: bool,
    pub missions: MissionCounts,
    pub armor: Vec<ArmorSummary>,
    pub slots: Vec<SlotSummary>,
    pub has_sword: bool,
    pub has_bible: bool,
}

#[derive(Debug, Serialize)]
pub struct PlayerSummary {
    pub name: String,
    pub wisdom: u32,
    pub sin: u32,
    pub coins: Option<u32>,
    pub marital_status: String,
}

#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct MissionCounts {
    pub active: usize,
    pub completed: usize,
    pub expired: usize,
    pub abandoned: usize,
}

#[derive(Debug, Serialize)]
pub struct ArmorSummary {
    pub piece: ArmorPiece,
    pub unlocked: bool,
    pub equipped: bool,
    pub integrity: u8,
}

#[derive(Debug, Serialize)]
pub struct SlotSummary {
    pub kind: SlotKind,
    pub index: usize,
    pub item: Option<String>,
    pub remaining_secs: Option<u64>,
}

/// Format seconds into a short human-readable duration.
pub(crate) fn format_duration(secs: u64) -> String {
    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

fn count_missions(statuses: impl Iterator<Item = MissionStatus>) -> MissionCounts {
    let mut counts = MissionCounts::default();
    for status in statuses {
        match status {
            MissionStatus::Active => counts.active += 1,
            MissionStatus::Completed => counts.completed += 1,
            MissionStatus::Expired => counts.expired += 1,
            MissionStatus::Abandoned => counts.abandoned += 1,
        }
    }
    counts
}

pub fn build_status(game: &Game) -> StatusResponse {
    let record = game.inventory();
    let player = game.profile().map(|p| PlayerSummary {
        name: p.name,
        wisdom: p.wisdom,
        sin: p.sin,
        coins: p.coins,
        marital_status: p.marital_status.to_string(),
    });
    let missions = count_missions(
        game.missions()
            .into_iter()
            .filter_map(|view| view.state.map(|s| s.status)),
    );
    let armor = ArmorPiece::all()
        .map(|piece| {
            let state = record.armor_state(piece);
            ArmorSummary {
                piece,
                unlocked: state.unlocked,
                equipped: state.equipped,
                integrity: state.integrity,
            }
        })
        .collect();
    let slots = [SlotKind::Consumable, SlotKind::Permanent]
        .into_iter()
        .flat_map(|kind| {
            record
                .slots(kind)
                .iter()
                .enumerate()
                .map(move |(index, slot)| SlotSummary {
                    kind,
                    index,
                    item: slot.as_ref().map(|item| item.name.clone()),
                    remaining_secs: slot.as_ref().and_then(|item| game.time_remaining(item)),
                })
                .collect::<Vec<_>>()
        })
        .collect();

    StatusResponse {
        player,
        storage_backend: game.backend_name().to_string(),
        storage_healthy: game.health() == HealthStatus::Healthy,
        missions,
        armor,
        slots,
        has_sword: game.has_sword(),
        has_bible: game.has_bible(),
    }
}

/// Run the `panoplia status` command.
pub fn run_status(game: &Game, json: bool, plain: bool) -> ExitCode {
    if json {
        let status = build_status(game);
        println!(
            "{}",
            serde_json::to_string_pretty(&status).unwrap_or_else(|_| "{}".to_string())
        );
        return ExitCode::SUCCESS;
    }

    let use_color = !plain && std::io::stdout().is_terminal();
    print_status(game, &build_status(game), use_color);
    ExitCode::SUCCESS
}

fn print_status(game: &Game, status: &StatusResponse, use_color: bool) {
    use colored::Colorize;

    println!();
    println!("  panoplia status");
    println!("  {}", "-".repeat(35));

    match &status.player {
        Some(p) => {
            let coins = p.coins.map(|c| c.to_string()).unwrap_or_else(|| "-".into());
            println!("    Player:   {} ({})", p.name, p.marital_status);
            if use_color {
                println!(
                    "    Wisdom:   {}   Sin: {}   Coins: {}",
                    p.wisdom.to_string().green(),
                    p.sin.to_string().red(),
                    coins.yellow()
                );
            } else {
                println!("    Wisdom:   {}   Sin: {}   Coins: {coins}", p.wisdom, p.sin);
            }
        }
        None => println!("    Player:   (none yet, run `panoplia init`)"),
    }

    let m = &status.missions;
    println!(
        "    Missions: {} active, {} completed, {} expired, {} abandoned",
        m.active, m.completed, m.expired, m.abandoned
    );

    let worn: Vec<&str> = status
        .armor
        .iter()
        .filter(|a| a.equipped)
        .map(|a| a.piece.display_name())
        .collect();
    let unlocked = status.armor.iter().filter(|a| a.unlocked).count();
    println!("    Armor:    {unlocked}/7 unlocked");
    if !worn.is_empty() {
        println!("              wearing {}", worn.join(", "));
    }

    let record = game.inventory();
    for kind in [SlotKind::Consumable, SlotKind::Permanent] {
        let described: Vec<String> = record
            .slots(kind)
            .iter()
            .map(|slot| describe_slot(game, slot.as_ref()))
            .collect();
        println!("    {:<9} {}", format!("{kind}:"), described.join(" | "));
    }

    let storage = if status.storage_healthy {
        if use_color {
            format!("{} {}", "✓".green(), status.storage_backend)
        } else {
            format!("[OK] {}", status.storage_backend)
        }
    } else if use_color {
        format!("{} {}", "✗".red(), status.storage_backend)
    } else {
        format!("[FAIL] {}", status.storage_backend)
    };
    println!("    Storage:  {storage}");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use panoplia_core::MissionId;
    use panoplia_test_utils::TestHarness;

    #[test]
    fn format_duration_seconds() {
        assert_eq!(format_duration(42), "42s");
    }

    #[test]
    fn format_duration_minutes() {
        assert_eq!(format_duration(125), "2m 5s");
    }

    #[test]
    fn format_duration_hours_and_days() {
        assert_eq!(format_duration(3720), "1h 2m");
        assert_eq!(format_duration(90060), "1d 1h");
    }

    #[test]
    fn counts_each_status() {
        let counts = count_missions(
            [
                MissionStatus::Active,
                MissionStatus::Completed,
                MissionStatus::Completed,
                MissionStatus::Abandoned,
            ]
            .into_iter(),
        );
        assert_eq!(
            counts,
            MissionCounts {
                active: 1,
                completed: 2,
                expired: 0,
                abandoned: 1
            }
        );
    }

    #[test]
    fn status_serializes_profile_and_slots() {
        let h = TestHarness::builder().with_wisdom(12).build().unwrap();
        h.game.accept(&MissionId::new("jejum"));

        let status = build_status(&h.game);
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["player"]["wisdom"], 12);
        assert_eq!(json["missions"]["active"], 1);
        assert_eq!(json["slots"].as_array().unwrap().len(), 5);
        assert_eq!(json["armor"][0]["piece"], "belt");
        assert_eq!(json["storage_backend"], "memory");
    }
}
