// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Panoplia game service.
//!
//! [`Game`] is built once per process from an injected store and clock and
//! serializes every mutation through a single operation lock. The
//! [`SweepRunner`] drives [`Game::sweep`] on a fixed interval until its
//! cancellation token fires.

pub mod game;
pub mod shutdown;
pub mod store;
pub mod sweeper;

pub use game::{Game, MissionView, SweepReport};
pub use store::open_store;
pub use sweeper::SweepRunner;
