// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recurring expiration sweep.
//!
//! One interval drives every time-based transition; nothing schedules a
//! timer per mission or per item. Detection lags by at most one interval.

use std::sync::Arc;
use std::time::Duration;

use panoplia_config::model::SweepConfig;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::game::Game;

pub struct SweepRunner {
    game: Arc<Game>,
    interval: Duration,
}

impl SweepRunner {
    pub fn new(game: Arc<Game>, interval: Duration) -> Self {
        Self { game, interval }
    }

    pub fn from_config(game: Arc<Game>, config: &SweepConfig) -> Self {
        Self::new(game, Duration::from_millis(config.interval_ms))
    }

    /// Sweep on every tick until `cancel` fires. Returns the number of
    /// sweeps performed.
    pub async fn run(self, cancel: CancellationToken) -> u64 {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(interval_ms = self.interval.as_millis() as u64, "sweep runner started");

        let mut sweeps = 0u64;
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(sweeps, "sweep runner shutting down");
                    return sweeps;
                }
                _ = interval.tick() => {
                    let report = self.game.sweep();
                    sweeps += 1;
                    if !report.is_empty() {
                        debug!(
                            missions = ?report.expired_missions,
                            slots = report.cleared_slots.len(),
                            "sweep tick changed state"
                        );
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panoplia_core::{ManualClock, MissionId};
    use panoplia_missions::{MissionRegistry, QuizThresholds};
    use panoplia_storage::MemoryStore;
    use tracing_test::traced_test;

    #[tokio::test(start_paused = true)]
    #[traced_test]
    async fn runner_logs_start_changes_and_shutdown() {
        let clock = Arc::new(ManualClock::new(0));
        let game = Arc::new(Game::new(
            Arc::new(MemoryStore::new()),
            clock.clone(),
            MissionRegistry::builtin(),
            QuizThresholds::default(),
        ));
        assert!(game.accept(&MissionId::new("jejum")).is_applied());
        clock.advance_secs(12 * 60 * 60);

        let cancel = CancellationToken::new();
        let stopper = cancel.clone();
        let (sweeps, ()) = tokio::join!(
            SweepRunner::new(game, Duration::from_secs(1)).run(cancel),
            async move {
                tokio::time::sleep(Duration::from_millis(1_500)).await;
                stopper.cancel();
            },
        );

        assert!(sweeps >= 1);
        assert!(logs_contain("sweep runner started"));
        assert!(logs_contain("sweep tick changed state"));
        assert!(logs_contain("sweep runner shutting down"));
    }
}
