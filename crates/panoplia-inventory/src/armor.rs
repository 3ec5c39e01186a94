// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The seven armor pieces.
//!
//! Armor pieces are boolean unlocks with an equipped flag and an integrity
//! percentage. They never occupy equip slots.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Integrity of a freshly unlocked or repaired piece.
pub const FULL_INTEGRITY: u8 = 100;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ArmorPiece {
    Belt,
    Breastplate,
    Sandals,
    Shield,
    Helmet,
    Sword,
    Cloak,
}

impl ArmorPiece {
    /// Name shown to the player and used when the piece is granted by name.
    pub fn display_name(self) -> &'static str {
        match self {
            ArmorPiece::Belt => "Cinto da Verdade",
            ArmorPiece::Breastplate => "Couraça da Justiça",
            ArmorPiece::Sandals => "Sandálias do Evangelho da Paz",
            ArmorPiece::Shield => "Escudo da Fé",
            ArmorPiece::Helmet => "Capacete da Salvação",
            ArmorPiece::Sword => "Espada do Espírito",
            ArmorPiece::Cloak => "Manto de Louvor",
        }
    }

    /// Lowercase substrings that identify the piece inside an item name.
    fn keywords(self) -> &'static [&'static str] {
        match self {
            ArmorPiece::Belt => &["cinto", "belt"],
            ArmorPiece::Breastplate => &["couraça", "breastplate"],
            ArmorPiece::Sandals => &["sandália", "calçado", "sandal"],
            ArmorPiece::Shield => &["escudo", "shield"],
            ArmorPiece::Helmet => &["capacete", "helmet"],
            ArmorPiece::Sword => &["espada", "sword"],
            ArmorPiece::Cloak => &["manto", "cloak"],
        }
    }

    /// Fuzzy-match an item name against the armor pieces (case-insensitive
    /// substring). The first piece in declaration order wins.
    pub fn classify(name: &str) -> Option<ArmorPiece> {
        let lowered = name.to_lowercase();
        ArmorPiece::iter().find(|piece| piece.keywords().iter().any(|kw| lowered.contains(kw)))
    }

    pub fn all() -> impl Iterator<Item = ArmorPiece> {
        ArmorPiece::iter()
    }
}

/// Persisted flags for one armor piece.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArmorState {
    pub unlocked: bool,
    pub equipped: bool,
    pub integrity: u8,
}

impl ArmorState {
    /// Unlock the piece, or repair it when it is already unlocked.
    pub fn grant(&mut self) {
        self.unlocked = true;
        self.integrity = FULL_INTEGRITY;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_portuguese_and_english_names() {
        assert_eq!(ArmorPiece::classify("Cinto da Verdade"), Some(ArmorPiece::Belt));
        assert_eq!(ArmorPiece::classify("COURAÇA"), Some(ArmorPiece::Breastplate));
        assert_eq!(
            ArmorPiece::classify("Sandálias do Evangelho"),
            Some(ArmorPiece::Sandals)
        );
        assert_eq!(ArmorPiece::classify("old shield"), Some(ArmorPiece::Shield));
        assert_eq!(ArmorPiece::classify("Espada do Espírito"), Some(ArmorPiece::Sword));
    }

    #[test]
    fn generic_items_are_not_armor() {
        assert_eq!(ArmorPiece::classify("Cinturão da Verdade"), None);
        assert_eq!(ArmorPiece::classify("Bíblia de Estudo"), None);
        assert_eq!(ArmorPiece::classify("Óleo da Unção"), None);
    }

    #[test]
    fn every_display_name_classifies_to_itself() {
        for piece in ArmorPiece::all() {
            assert_eq!(ArmorPiece::classify(piece.display_name()), Some(piece));
        }
    }

    #[test]
    fn grant_unlocks_and_repairs() {
        let mut state = ArmorState::default();
        state.grant();
        assert!(state.unlocked);
        assert_eq!(state.integrity, FULL_INTEGRITY);

        state.integrity = 40;
        state.grant();
        assert_eq!(state.integrity, FULL_INTEGRITY);
    }

    #[test]
    fn seven_pieces() {
        assert_eq!(ArmorPiece::all().count(), 7);
    }
}
