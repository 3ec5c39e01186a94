// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mission subcommands: `init`, `missions`, `accept`, `toggle`, `quiz`,
//! `complete`, `abandon`, `sweep` and `reset`.

use std::io::IsTerminal;
use std::process::ExitCode;

use panoplia_core::MissionId;
use panoplia_game::{Game, MissionView};
use panoplia_missions::{
    Category, Difficulty, MaritalStatus, MissionStatus, QuizThreshold, Restriction,
    TransitionOutcome,
};
use serde::Serialize;

use crate::status::format_duration;

/// Exit code for a refused transition or a full slot pool.
pub(crate) const REJECTED: u8 = 2;

/// One row of `panoplia missions --json`.
#[derive(Debug, Serialize)]
pub struct MissionListing {
    pub id: String,
    pub title: String,
    pub category: Category,
    pub difficulty: Difficulty,
    pub restriction: Restriction,
    pub status: Option<MissionStatus>,
    pub window_remaining_secs: Option<u64>,
    pub checklist: Vec<String>,
}

impl From<&MissionView> for MissionListing {
    fn from(view: &MissionView) -> Self {
        let def = &view.definition;
        Self {
            id: def.id.to_string(),
            title: def.title.clone(),
            category: def.category,
            difficulty: def.difficulty,
            restriction: def.restriction,
            status: view.state.as_ref().map(|s| s.status),
            window_remaining_secs: view.window_remaining_secs,
            checklist: def.checklist.iter().map(|item| item.id.clone()).collect(),
        }
    }
}

pub fn init(game: &Game, name: &str, married: bool) -> ExitCode {
    let status = if married {
        MaritalStatus::Married
    } else {
        MaritalStatus::Single
    };
    match game.init_profile(name, status) {
        Some(profile) => {
            println!(
                "Profile `{}` ready (wisdom {}, sin {}).",
                profile.name, profile.wisdom, profile.sin
            );
            ExitCode::SUCCESS
        }
        None => {
            eprintln!("panoplia: could not save the profile");
            ExitCode::FAILURE
        }
    }
}

pub fn list(game: &Game, all: bool, json: bool) -> ExitCode {
    let available: Vec<MissionId> = game
        .available_missions()
        .into_iter()
        .map(|def| def.id)
        .collect();
    let views: Vec<MissionView> = game
        .missions()
        .into_iter()
        .filter(|view| all || view.state.is_some() || available.contains(&view.definition.id))
        .collect();

    if json {
        let rows: Vec<MissionListing> = views.iter().map(MissionListing::from).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string())
        );
        return ExitCode::SUCCESS;
    }

    let use_color = std::io::stdout().is_terminal();
    println!();
    for view in &views {
        let def = &view.definition;
        let status = view
            .state
            .as_ref()
            .map(|s| s.status.to_string())
            .unwrap_or_else(|| "available".to_string());
        let status = paint_status(&status, use_color);
        let window = view
            .window_remaining_secs
            .map(|secs| format!(" ({} left)", format_duration(secs)))
            .unwrap_or_default();
        println!("  {:<22} {:<10} {}{}", def.id.as_str(), status, def.title, window);
    }
    println!();
    ExitCode::SUCCESS
}

fn paint_status(status: &str, use_color: bool) -> String {
    if !use_color {
        return status.to_string();
    }
    use colored::Colorize;
    match status {
        "active" => status.yellow().to_string(),
        "completed" => status.green().to_string(),
        "expired" | "abandoned" => status.red().to_string(),
        _ => status.dimmed().to_string(),
    }
}

pub fn accept(game: &Game, id: &str) -> ExitCode {
    report("accept", id, game.accept(&MissionId::new(id)))
}

pub fn toggle(game: &Game, id: &str, item: &str) -> ExitCode {
    let outcome = game.toggle_checklist_item(&MissionId::new(id), item);
    if let TransitionOutcome::Applied(state) = &outcome {
        let mark = if state.is_checked(item) { "x" } else { " " };
        println!("[{mark}] {item}");
    }
    report("toggle", id, outcome)
}

pub fn quiz(game: &Game, id: &str, percent: i64) -> ExitCode {
    let outcome = game.update_quiz_progress(&MissionId::new(id), percent);
    if let TransitionOutcome::Applied(state) = &outcome {
        println!("Quiz progress: {}%", state.quiz_score);
    }
    report("update", id, outcome)
}

pub fn complete(game: &Game, id: &str, chapter: bool) -> ExitCode {
    let threshold = if chapter {
        QuizThreshold::Chapter
    } else {
        QuizThreshold::Standard
    };
    let outcome = game.complete(&MissionId::new(id), threshold);
    let applied = outcome.is_applied();
    let code = report("complete", id, outcome);
    if applied {
        print_profile(game);
    }
    code
}

pub fn abandon(game: &Game, id: &str) -> ExitCode {
    let outcome = game.abandon(&MissionId::new(id));
    let applied = outcome.is_applied();
    let code = report("abandon", id, outcome);
    if applied {
        print_profile(game);
    }
    code
}

pub fn sweep(game: &Game) -> ExitCode {
    let report = game.sweep();
    for id in &report.expired_missions {
        println!("expired: {id}");
    }
    for slot in &report.cleared_slots {
        println!("cleared: {} slot {} ({})", slot.kind, slot.index, slot.item.name);
    }
    if report.is_empty() {
        println!("Nothing to expire.");
    }
    ExitCode::SUCCESS
}

pub fn reset(game: &Game, yes: bool) -> ExitCode {
    if !yes {
        eprintln!("panoplia: pass --yes to erase all mission progress");
        return ExitCode::FAILURE;
    }
    if game.reset_missions() {
        println!("All mission progress erased.");
        ExitCode::SUCCESS
    } else {
        eprintln!("panoplia: storage refused the reset");
        ExitCode::FAILURE
    }
}

fn report(verb: &str, id: &str, outcome: TransitionOutcome) -> ExitCode {
    match outcome {
        TransitionOutcome::Applied(state) => {
            println!("{id}: {}", state.status);
            ExitCode::SUCCESS
        }
        TransitionOutcome::Rejected { reason, .. } => {
            eprintln!("panoplia: cannot {verb} `{id}`: {reason}");
            ExitCode::from(REJECTED)
        }
    }
}

fn print_profile(game: &Game) {
    if let Some(profile) = game.profile() {
        let coins = profile
            .coins
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "Wisdom {} | Sin {} | Coins {}",
            profile.wisdom, profile.sin, coins
        );
    }
}
