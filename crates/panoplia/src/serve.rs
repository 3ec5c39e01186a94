// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `panoplia serve`: keep the game state current until interrupted.

use std::process::ExitCode;
use std::sync::Arc;

use panoplia_config::PanopliaConfig;
use panoplia_game::{Game, SweepRunner, shutdown};
use tracing::info;

pub async fn run_serve(game: Arc<Game>, config: &PanopliaConfig) -> ExitCode {
    info!("starting panoplia serve");
    let cancel = shutdown::install_signal_handler();

    if !config.sweep.enabled {
        info!("sweep disabled, waiting for shutdown signal");
        cancel.cancelled().await;
        return ExitCode::SUCCESS;
    }

    println!(
        "panoplia: sweeping every {} ms (Ctrl+C to stop)",
        config.sweep.interval_ms
    );
    let runner = SweepRunner::from_config(game, &config.sweep);
    let sweeps = runner.run(cancel).await;
    info!(sweeps, "panoplia serve stopped");
    ExitCode::SUCCESS
}
