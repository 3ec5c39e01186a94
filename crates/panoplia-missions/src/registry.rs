// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The static mission catalog.

use std::collections::HashMap;

use panoplia_core::{MissionId, PanopliaError, SlotKind};
use panoplia_inventory::ArmorPiece;

use crate::definition::{
    ArmorGrant, Category, ConsumableGrant, Difficulty, MissionDefinition, PenaltyBundle,
    QuizQuestion, Restriction, RewardBundle,
};
use crate::profile::PlayerProfile;

const ONE_DAY_SECS: u64 = 24 * 60 * 60;

/// Mission definitions in registration order, indexed by id.
#[derive(Debug, Clone, Default)]
pub struct MissionRegistry {
    missions: Vec<MissionDefinition>,
    index: HashMap<MissionId, usize>,
}

impl MissionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition. Ids must be unique.
    pub fn register(&mut self, definition: MissionDefinition) -> Result<(), PanopliaError> {
        if self.index.contains_key(&definition.id) {
            return Err(PanopliaError::Internal(format!(
                "duplicate mission id `{}`",
                definition.id
            )));
        }
        self.index.insert(definition.id.clone(), self.missions.len());
        self.missions.push(definition);
        Ok(())
    }

    pub fn get(&self, id: &MissionId) -> Option<&MissionDefinition> {
        self.index.get(id).map(|&pos| &self.missions[pos])
    }

    /// Resolve a numeric id from the old state layout.
    pub fn by_legacy_id(&self, legacy_id: u32) -> Option<&MissionDefinition> {
        self.missions
            .iter()
            .find(|def| def.legacy_id == Some(legacy_id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &MissionDefinition> {
        self.missions.iter()
    }

    pub fn len(&self) -> usize {
        self.missions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.missions.is_empty()
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &MissionDefinition> {
        self.missions.iter().filter(move |def| def.category == category)
    }

    pub fn by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a MissionDefinition> {
        self.missions.iter().filter(move |def| def.has_tag(tag))
    }

    /// Missions whose restriction the player satisfies. Without a profile
    /// only unrestricted missions are offered.
    pub fn available_for<'a>(
        &'a self,
        profile: Option<&PlayerProfile>,
    ) -> impl Iterator<Item = &'a MissionDefinition> {
        let status = profile.map(|p| p.marital_status);
        self.missions
            .iter()
            .filter(move |def| def.restriction.allows(status))
    }

    /// The catalog shipped with the game: one mission per armor piece plus
    /// daily, quiz, couple and checklist missions.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for definition in builtin_definitions() {
            registry.index.insert(definition.id.clone(), registry.missions.len());
            registry.missions.push(definition);
        }
        registry
    }
}

fn armor_reward(piece: ArmorPiece, wisdom: u32, coins: u32) -> RewardBundle {
    RewardBundle {
        wisdom,
        coins,
        armor: vec![ArmorGrant { piece, quantity: 1 }],
        consumables: Vec::new(),
    }
}

fn consumable(name: &str, duration_secs: u64) -> ConsumableGrant {
    ConsumableGrant {
        name: name.to_string(),
        quantity: 1,
        duration_secs: Some(duration_secs),
        kind: SlotKind::Consumable,
    }
}

fn question(prompt: &str, options: [&str; 3], answer: usize) -> QuizQuestion {
    QuizQuestion {
        prompt: prompt.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        answer,
    }
}

fn builtin_definitions() -> Vec<MissionDefinition> {
    vec![
        MissionDefinition::new("cinturao-da-verdade", "Cinturão da Verdade", Category::Action)
            .with_description("Passe o dia inteiro sem contar nenhuma mentira.")
            .with_tags(["verdade", "diaria"])
            .with_reward(RewardBundle {
                wisdom: 50,
                coins: 20,
                armor: Vec::new(),
                consumables: vec![consumable("Cinturão da Verdade", 3_600)],
            })
            .with_penalty(PenaltyBundle {
                sin: 1,
                wisdom_loss: 5,
            })
            .with_window_secs(ONE_DAY_SECS)
            .with_legacy_id(1),
        MissionDefinition::new("falar-a-verdade", "Cinto da Verdade", Category::Action)
            .with_description("Confesse uma falha a alguém de confiança.")
            .with_difficulty(Difficulty::Medium)
            .with_tags(["armadura", "verdade"])
            .with_reward(armor_reward(ArmorPiece::Belt, 30, 10))
            .with_penalty(PenaltyBundle {
                sin: 1,
                wisdom_loss: 5,
            })
            .with_window_secs(3 * ONE_DAY_SECS)
            .with_legacy_id(2),
        MissionDefinition::new("praticar-a-justica", "Couraça da Justiça", Category::Action)
            .with_description("Ajude alguém sem esperar nada em troca.")
            .with_difficulty(Difficulty::Medium)
            .with_tags(["armadura", "servico"])
            .with_reward(armor_reward(ArmorPiece::Breastplate, 30, 10))
            .with_penalty(PenaltyBundle {
                sin: 1,
                wisdom_loss: 5,
            })
            .with_window_secs(3 * ONE_DAY_SECS)
            .with_legacy_id(3),
        MissionDefinition::new("anunciar-a-paz", "Sandálias do Evangelho da Paz", Category::Action)
            .with_description("Reconcilie-se com alguém com quem você brigou.")
            .with_difficulty(Difficulty::Hard)
            .with_tags(["armadura", "paz"])
            .with_reward(armor_reward(ArmorPiece::Sandals, 40, 15))
            .with_penalty(PenaltyBundle {
                sin: 2,
                wisdom_loss: 10,
            })
            .with_window_secs(7 * ONE_DAY_SECS)
            .with_legacy_id(4),
        MissionDefinition::new("firmes-na-fe", "Escudo da Fé", Category::Action)
            .with_description("Ore por um pedido difícil durante uma semana.")
            .with_difficulty(Difficulty::Medium)
            .with_tags(["armadura", "oracao"])
            .with_reward(armor_reward(ArmorPiece::Shield, 30, 10))
            .with_penalty(PenaltyBundle {
                sin: 1,
                wisdom_loss: 5,
            })
            .with_window_secs(7 * ONE_DAY_SECS)
            .with_legacy_id(5),
        MissionDefinition::new("mente-renovada", "Capacete da Salvação", Category::Action)
            .with_description("Fique um dia sem redes sociais e medite na Palavra.")
            .with_difficulty(Difficulty::Hard)
            .with_tags(["armadura", "disciplina"])
            .with_reward(armor_reward(ArmorPiece::Helmet, 40, 15))
            .with_penalty(PenaltyBundle {
                sin: 2,
                wisdom_loss: 10,
            })
            .with_window_secs(ONE_DAY_SECS)
            .with_legacy_id(6),
        MissionDefinition::new("memorizar-versiculo", "Espada do Espírito", Category::Action)
            .with_description("Memorize Efésios 6:17.")
            .with_tags(["armadura", "estudo"])
            .with_reward(armor_reward(ArmorPiece::Sword, 25, 10))
            .with_window_secs(3 * ONE_DAY_SECS)
            .with_legacy_id(7),
        MissionDefinition::new("louvor-diario", "Manto de Louvor", Category::Action)
            .with_description("Separe quinze minutos para louvar.")
            .with_tags(["armadura", "louvor", "diaria"])
            .with_reward(armor_reward(ArmorPiece::Cloak, 20, 5))
            .with_window_secs(ONE_DAY_SECS)
            .with_legacy_id(8),
        MissionDefinition::new("quiz-efesios-6", "Quiz: a armadura de Deus", Category::Quiz)
            .with_description("Responda sobre Efésios 6:10-18.")
            .with_difficulty(Difficulty::Medium)
            .with_tags(["quiz", "estudo"])
            .with_reward(RewardBundle {
                wisdom: 40,
                coins: 15,
                armor: Vec::new(),
                consumables: vec![consumable("Pão da Vida", 600)],
            })
            .with_penalty(PenaltyBundle {
                sin: 0,
                wisdom_loss: 5,
            })
            .with_quiz(vec![
                question(
                    "Qual peça da armadura é a Palavra de Deus?",
                    ["O escudo", "A espada", "O capacete"],
                    1,
                ),
                question(
                    "Com o que os pés devem estar calçados?",
                    ["Com a prontidão do evangelho da paz", "Com a verdade", "Com a fé"],
                    0,
                ),
                question(
                    "O que apaga os dardos inflamados do maligno?",
                    ["O cinto", "A couraça", "O escudo da fé"],
                    2,
                ),
            ])
            .with_legacy_id(9),
        MissionDefinition::new("oracao-em-casal", "Oração em casal", Category::Couple)
            .with_description("Orem juntos antes de dormir.")
            .with_tags(["casal", "oracao"])
            .with_restriction(Restriction::RequiresMarried)
            .with_reward(RewardBundle {
                wisdom: 30,
                coins: 10,
                armor: Vec::new(),
                consumables: vec![consumable("Óleo da Unção", 1_800)],
            })
            .with_window_secs(ONE_DAY_SECS)
            .with_legacy_id(10),
        MissionDefinition::new("guardar-o-coracao", "Guardar o coração", Category::Action)
            .with_description("Escreva uma oração pelo seu futuro cônjuge.")
            .with_tags(["solteiro"])
            .with_restriction(Restriction::RequiresSingle)
            .with_reward(RewardBundle {
                wisdom: 20,
                coins: 5,
                ..RewardBundle::default()
            })
            .with_window_secs(ONE_DAY_SECS)
            .with_legacy_id(11),
        MissionDefinition::new("rotina-matinal", "Rotina matinal", Category::Checklist)
            .with_description("Comece o dia com a rotina completa.")
            .with_tags(["diaria", "disciplina"])
            .with_checklist([
                ("oracao", "Orar"),
                ("leitura", "Ler um capítulo"),
                ("gratidao", "Anotar três gratidões"),
            ])
            .with_reward(RewardBundle {
                wisdom: 25,
                coins: 10,
                armor: Vec::new(),
                consumables: vec![ConsumableGrant {
                    name: "Bíblia de Estudo".to_string(),
                    quantity: 1,
                    duration_secs: None,
                    kind: SlotKind::Permanent,
                }],
            })
            .with_window_secs(ONE_DAY_SECS)
            .with_legacy_id(12),
        MissionDefinition::new("jejum", "Jejum de um dia", Category::Action)
            .with_description("Jejue do nascer ao pôr do sol.")
            .with_difficulty(Difficulty::Hard)
            .with_tags(["disciplina"])
            .with_reward(RewardBundle {
                wisdom: 60,
                coins: 25,
                ..RewardBundle::default()
            })
            .with_penalty(PenaltyBundle {
                sin: 2,
                wisdom_loss: 10,
            })
            .with_window_secs(ONE_DAY_SECS / 2)
            .with_legacy_id(13),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::MaritalStatus;
    use std::collections::HashSet;

    #[test]
    fn builtin_ids_and_legacy_ids_are_unique() {
        let registry = MissionRegistry::builtin();
        let ids: HashSet<_> = registry.iter().map(|d| d.id.clone()).collect();
        let legacy: HashSet<_> = registry.iter().filter_map(|d| d.legacy_id).collect();
        assert_eq!(ids.len(), registry.len());
        assert_eq!(legacy.len(), registry.len());
    }

    #[test]
    fn every_armor_piece_is_earnable() {
        let registry = MissionRegistry::builtin();
        for piece in ArmorPiece::all() {
            let earnable = registry
                .iter()
                .any(|d| d.reward.armor.iter().any(|g| g.piece == piece));
            assert!(earnable, "no mission grants {piece}");
        }
    }

    #[test]
    fn cinturao_rewards() {
        let registry = MissionRegistry::builtin();
        let def = registry.get(&MissionId::new("cinturao-da-verdade")).unwrap();
        assert_eq!(def.reward.wisdom, 50);
        assert_eq!(def.reward.coins, 20);
        assert_eq!(def.reward.consumables[0].name, "Cinturão da Verdade");
        assert_eq!(registry.by_legacy_id(1).unwrap().id, def.id);
    }

    #[test]
    fn register_rejects_duplicates() {
        let mut registry = MissionRegistry::new();
        let def = MissionDefinition::new("a", "A", Category::Action);
        registry.register(def.clone()).unwrap();
        assert!(registry.register(def).is_err());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn filters() {
        let registry = MissionRegistry::builtin();
        assert_eq!(registry.by_category(Category::Quiz).count(), 1);
        assert_eq!(registry.by_tag("armadura").count(), 7);

        let mut married = PlayerProfile::new("Ana");
        married.marital_status = MaritalStatus::Married;
        let ids: Vec<_> = registry
            .available_for(Some(&married))
            .map(|d| d.id.as_str())
            .collect();
        assert!(ids.contains(&"oracao-em-casal"));
        assert!(!ids.contains(&"guardar-o-coracao"));

        let anonymous = registry.available_for(None).count();
        assert_eq!(anonymous, registry.len() - 2);
    }
}
