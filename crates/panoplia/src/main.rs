// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Panoplia - a gamified spiritual-habit tracker.
//!
//! This is the binary entry point. It stands in for the presentation layer:
//! every subcommand is one call into [`panoplia_game::Game`].

mod inventory;
mod missions;
mod serve;
mod status;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use panoplia_config::PanopliaConfig;
use panoplia_core::SystemClock;
use panoplia_game::{Game, open_store};

/// Panoplia - put on the full armor, one mission at a time.
#[derive(Parser, Debug)]
#[command(name = "panoplia", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the usual locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the player profile.
    Init {
        /// Player name (defaults to `player.name`).
        #[arg(long)]
        name: Option<String>,
        /// Unlocks couple missions.
        #[arg(long)]
        married: bool,
    },
    /// List missions with their status.
    Missions {
        /// Include missions the player cannot accept.
        #[arg(long)]
        all: bool,
        #[arg(long)]
        json: bool,
    },
    /// Accept a mission.
    Accept { id: String },
    /// Check or uncheck one checklist item.
    Toggle { id: String, item: String },
    /// Record quiz progress in percent.
    Quiz {
        id: String,
        #[arg(allow_negative_numbers = true)]
        percent: i64,
    },
    /// Complete a mission and collect its rewards.
    Complete {
        id: String,
        /// Judge against the chapter quiz pass mark.
        #[arg(long)]
        chapter: bool,
    },
    /// Abandon a mission and take its penalty.
    Abandon { id: String },
    /// Show owned items, armor and equip slots.
    Inventory {
        #[arg(long)]
        json: bool,
    },
    /// Equip one owned item into a free slot.
    Equip { name: String },
    /// Empty an equip slot.
    Unequip {
        /// `consumable` or `permanent`.
        kind: String,
        index: usize,
    },
    /// Put on (or take off) an unlocked armor piece.
    Armor {
        /// belt, breastplate, sandals, shield, helmet, sword or cloak.
        piece: String,
        #[arg(long)]
        off: bool,
    },
    /// Show the player's profile, missions and equipment.
    Status {
        #[arg(long)]
        json: bool,
        /// Disable colors.
        #[arg(long)]
        plain: bool,
    },
    /// Run one expiration sweep now.
    Sweep,
    /// Keep sweeping on the configured interval until interrupted.
    Serve,
    /// Forget all mission progress.
    Reset {
        /// Required; there is no undo.
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => panoplia_config::load_and_validate_path(path),
        None => panoplia_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            panoplia_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.player.log_level);

    let Some(command) = cli.command else {
        println!("panoplia: use --help for available commands");
        return ExitCode::SUCCESS;
    };

    let game = Arc::new(open_game(&config));
    match command {
        Commands::Init { name, married } => {
            let name = name.unwrap_or_else(|| config.player.name.clone());
            missions::init(&game, &name, married)
        }
        Commands::Missions { all, json } => missions::list(&game, all, json),
        Commands::Accept { id } => missions::accept(&game, &id),
        Commands::Toggle { id, item } => missions::toggle(&game, &id, &item),
        Commands::Quiz { id, percent } => missions::quiz(&game, &id, percent),
        Commands::Complete { id, chapter } => missions::complete(&game, &id, chapter),
        Commands::Abandon { id } => missions::abandon(&game, &id),
        Commands::Reset { yes } => missions::reset(&game, yes),
        Commands::Inventory { json } => inventory::show(&game, json),
        Commands::Equip { name } => inventory::equip(&game, &name),
        Commands::Unequip { kind, index } => inventory::unequip(&game, &kind, index),
        Commands::Armor { piece, off } => inventory::armor(&game, &piece, off),
        Commands::Status { json, plain } => status::run_status(&game, json, plain),
        Commands::Sweep => missions::sweep(&game),
        Commands::Serve => serve::run_serve(game, &config).await,
    }
}

fn open_game(config: &PanopliaConfig) -> Game {
    let store = open_store(&config.storage);
    Game::from_config(store, Arc::new(SystemClock), config)
}

/// Log to stderr so stdout stays clean for `--json` output.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

/// `log_level` for every panoplia crate, `warn` for everything else.
fn default_directives(log_level: &str) -> String {
    const CRATES: [&str; 7] = [
        "panoplia",
        "panoplia_core",
        "panoplia_config",
        "panoplia_storage",
        "panoplia_inventory",
        "panoplia_missions",
        "panoplia_game",
    ];
    let mut directives: Vec<String> = CRATES
        .iter()
        .map(|krate| format!("{krate}={log_level}"))
        .collect();
    directives.push("warn".to_string());
    directives.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_negative_quiz_percent() {
        let cli = Cli::try_parse_from(["panoplia", "quiz", "quiz-efesios-6", "-5"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Quiz { percent: -5, .. })
        ));
    }

    #[test]
    fn directives_cover_every_crate() {
        let directives = default_directives("debug");
        assert!(directives.contains("panoplia_missions=debug"));
        assert!(directives.ends_with(",warn"));
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = panoplia_config::load_and_validate_str("").unwrap();
        assert_eq!(config.player.name, "peregrino");
        assert_eq!(config.sweep.interval_ms, 1000);
    }
}
