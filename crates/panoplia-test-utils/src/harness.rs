// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A complete game over a deterministic clock.
//!
//! `TestHarness` wires a [`Game`] to a [`ManualClock`] and either an
//! in-memory store or a SQLite file in a temp directory, optionally seeding
//! the player profile first.

use std::sync::Arc;

use panoplia_core::{KvStore, ManualClock, PanopliaError};
use panoplia_game::Game;
use panoplia_missions::{
    MaritalStatus, MissionRegistry, PlayerProfile, ProfileStore, QuizThresholds,
};
use panoplia_storage::{MemoryStore, SafeStore, SqliteStore};

/// Builder for [`TestHarness`].
pub struct TestHarnessBuilder {
    profile: Option<PlayerProfile>,
    start_millis: i64,
    registry: MissionRegistry,
    thresholds: QuizThresholds,
    sqlite: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            profile: Some(PlayerProfile::new("peregrino")),
            start_millis: 0,
            registry: MissionRegistry::builtin(),
            thresholds: QuizThresholds::default(),
            sqlite: false,
        }
    }

    /// Seed the profile with this much wisdom.
    pub fn with_wisdom(mut self, wisdom: u32) -> Self {
        if let Some(profile) = self.profile.as_mut() {
            profile.wisdom = wisdom;
        }
        self
    }

    pub fn with_marital_status(mut self, status: MaritalStatus) -> Self {
        if let Some(profile) = self.profile.as_mut() {
            profile.marital_status = status;
        }
        self
    }

    /// Start without any saved profile.
    pub fn without_profile(mut self) -> Self {
        self.profile = None;
        self
    }

    /// Initial reading of the manual clock, in epoch milliseconds.
    pub fn starting_at(mut self, millis: i64) -> Self {
        self.start_millis = millis;
        self
    }

    pub fn with_registry(mut self, registry: MissionRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_thresholds(mut self, thresholds: QuizThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Persist to a SQLite file instead of memory.
    pub fn with_sqlite(mut self) -> Self {
        self.sqlite = true;
        self
    }

    pub fn build(self) -> Result<TestHarness, PanopliaError> {
        let store: Arc<dyn KvStore>;
        let mut temp_dir = None;
        if self.sqlite {
            let dir = tempfile::TempDir::new().map_err(PanopliaError::storage)?;
            let path = dir.path().join("panoplia-test.db");
            store = Arc::new(SqliteStore::open_path(&path.to_string_lossy(), true)?);
            temp_dir = Some(dir);
        } else {
            store = Arc::new(MemoryStore::new());
        }

        if let Some(profile) = &self.profile {
            let profiles = ProfileStore::new(SafeStore::new(store.clone()));
            if !profiles.save(profile) {
                return Err(PanopliaError::Internal("could not seed profile".into()));
            }
        }

        let clock = Arc::new(ManualClock::new(self.start_millis));
        let game = Arc::new(Game::new(
            store.clone(),
            clock.clone(),
            self.registry,
            self.thresholds,
        ));

        Ok(TestHarness {
            game,
            clock,
            store,
            _temp_dir: temp_dir,
        })
    }
}

/// A game, its clock and its raw store.
pub struct TestHarness {
    pub game: Arc<Game>,
    pub clock: Arc<ManualClock>,
    /// The backend under the game, for inspecting persisted JSON.
    pub store: Arc<dyn KvStore>,
    _temp_dir: Option<tempfile::TempDir>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// In-memory game with a default profile at t = 0.
    pub fn new() -> Result<Self, PanopliaError> {
        Self::builder().build()
    }

    pub fn advance_secs(&self, secs: i64) {
        self.clock.advance_secs(secs);
    }

    pub fn profile(&self) -> Option<PlayerProfile> {
        self.game.profile()
    }
}
