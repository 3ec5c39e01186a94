// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Panoplia integration tests.

pub mod harness;

pub use harness::{TestHarness, TestHarnessBuilder};
