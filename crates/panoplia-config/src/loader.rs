// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./panoplia.toml` > `~/.config/panoplia/panoplia.toml` > `/etc/panoplia/panoplia.toml`
//! with environment variable overrides via `PANOPLIA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::PanopliaConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/panoplia/panoplia.toml` (system-wide)
/// 3. `~/.config/panoplia/panoplia.toml` (user XDG config)
/// 4. `./panoplia.toml` (local directory)
/// 5. `PANOPLIA_*` environment variables
pub fn load_config() -> Result<PanopliaConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<PanopliaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PanopliaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PanopliaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PanopliaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(PanopliaConfig::default()))
        .merge(Toml::file("/etc/panoplia/panoplia.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("panoplia/panoplia.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("panoplia.toml"))
        .merge(env_provider())
}

/// Environment provider mapping `PANOPLIA_<SECTION>_<KEY>` to `section.key`.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `PANOPLIA_SWEEP_INTERVAL_MS` must become `sweep.interval_ms`.
fn env_provider() -> Env {
    Env::prefixed("PANOPLIA_").map(|key| {
        let mapped = key
            .as_str()
            .replacen("player_", "player.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("sweep_", "sweep.", 1)
            .replacen("quiz_", "quiz.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_vars_map_to_sections() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("PANOPLIA_SWEEP_INTERVAL_MS", "2000");
            jail.set_env("PANOPLIA_QUIZ_CHAPTER_PASS_THRESHOLD", "80");
            jail.set_env("PANOPLIA_STORAGE_IN_MEMORY", "true");

            let config = load_config()?;
            assert_eq!(config.sweep.interval_ms, 2000);
            assert_eq!(config.quiz.chapter_pass_threshold, 80);
            assert!(config.storage.in_memory);
            Ok(())
        });
    }

    #[test]
    fn local_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "panoplia.toml",
                r#"
[player]
name = "timoteo"
"#,
            )?;
            let config = load_config()?;
            assert_eq!(config.player.name, "timoteo");
            assert_eq!(config.sweep.interval_ms, 1000);
            Ok(())
        });
    }
}
