// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::PanopliaConfig;

/// Accepted sweep interval, in milliseconds.
const SWEEP_INTERVAL_RANGE: std::ops::RangeInclusive<u64> = 100..=60_000;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every problem instead of failing on the first one.
pub fn validate_config(config: &PanopliaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !config.storage.in_memory && config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty unless storage.in_memory is set"
                .to_string(),
        });
    }

    if !SWEEP_INTERVAL_RANGE.contains(&config.sweep.interval_ms) {
        errors.push(ConfigError::Validation {
            message: format!(
                "sweep.interval_ms must be between {} and {}, got {}",
                SWEEP_INTERVAL_RANGE.start(),
                SWEEP_INTERVAL_RANGE.end(),
                config.sweep.interval_ms
            ),
        });
    }

    for (key, value) in [
        ("quiz.pass_threshold", config.quiz.pass_threshold),
        ("quiz.chapter_pass_threshold", config.quiz.chapter_pass_threshold),
    ] {
        if value > 100 {
            errors.push(ConfigError::Validation {
                message: format!("{key} is a percentage and must be at most 100, got {value}"),
            });
        }
    }

    if !LOG_LEVELS.contains(&config.player.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "player.log_level `{}` is not one of {}",
                config.player.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.player.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "player.name must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
