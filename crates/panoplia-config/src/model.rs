// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Panoplia mission tracker.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Panoplia configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PanopliaConfig {
    /// Player identity and logging.
    #[serde(default)]
    pub player: PlayerConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Recurring expiration sweep settings.
    #[serde(default)]
    pub sweep: SweepConfig,

    /// Quiz pass thresholds.
    #[serde(default)]
    pub quiz: QuizConfig,
}

/// Player identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerConfig {
    /// Name used when `panoplia init` creates the profile.
    #[serde(default = "default_player_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            name: default_player_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_player_name() -> String {
    "peregrino".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,

    /// Keep everything in memory. Nothing survives the process.
    #[serde(default)]
    pub in_memory: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
            in_memory: false,
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("panoplia").join("panoplia.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("panoplia.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Expiration sweep configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SweepConfig {
    /// Milliseconds between two sweep ticks.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Run the recurring sweep in `panoplia serve`.
    #[serde(default = "default_sweep_enabled")]
    pub enabled: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            enabled: default_sweep_enabled(),
        }
    }
}

fn default_interval_ms() -> u64 {
    1000
}

fn default_sweep_enabled() -> bool {
    true
}

/// Quiz scoring configuration, in percent.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QuizConfig {
    /// Minimum score for regular quiz missions.
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: u8,

    /// Minimum score for chapter quizzes.
    #[serde(default = "default_chapter_pass_threshold")]
    pub chapter_pass_threshold: u8,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            pass_threshold: default_pass_threshold(),
            chapter_pass_threshold: default_chapter_pass_threshold(),
        }
    }
}

fn default_pass_threshold() -> u8 {
    60
}

fn default_chapter_pass_threshold() -> u8 {
    70
}
