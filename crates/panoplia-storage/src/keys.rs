// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Logical storage keys.

/// The player profile singleton.
pub const PROFILE: &str = "profile";

/// The inventory singleton (owned items, armor flags, equip slots).
pub const INVENTORY: &str = "inventory";

/// Versioned document holding every mission state.
pub const MISSION_STATES: &str = "mission-states";

/// Numeric-id mission states written by older releases. Read once, migrated
/// into [`MISSION_STATES`], then removed.
pub const LEGACY_MISSION_STATES: &str = "enhanced-mission-states";
