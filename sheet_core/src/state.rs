//! Persisted character state
//!
//! Every key field is an opaque reference into [`GameData`](crate::data::GameData);
//! the state never embeds game content.

use crate::types::{AbilityScores, SourceKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterState {
    // === Identity ===
    pub id: String,
    pub name: String,

    // === Selections ===
    pub race: String,
    #[serde(default)]
    pub subrace: Option<String>,
    /// Class entries in the order they were taken; the first is the primary class
    pub classes: Vec<ClassLevel>,
    pub background: String,
    pub base_ability_scores: AbilityScores,
    #[serde(default = "default_method")]
    pub ability_score_method: String,
    #[serde(default)]
    pub feature_choices: Vec<FeatureChoice>,
    #[serde(default)]
    pub feats: Vec<String>,

    // === Inventory ===
    #[serde(default)]
    pub equipment: Vec<EquipmentEntry>,
    #[serde(default)]
    pub currency: Currency,

    // === Spells ===
    #[serde(default)]
    pub known_spells: Vec<String>,
    #[serde(default)]
    pub prepared_spells: Vec<String>,

    // === Session ===
    #[serde(default)]
    pub current_hp: Option<i32>,
    #[serde(default)]
    pub temp_hp: i32,
    /// Die size (`d8`) -> dice spent
    #[serde(default)]
    pub hit_dice_used: BTreeMap<String, u32>,
    #[serde(default)]
    pub death_saves: DeathSaves,
    #[serde(default)]
    pub conditions: Vec<String>,
    /// Spell level -> slots spent
    #[serde(default)]
    pub spell_slots_used: BTreeMap<String, u32>,

    // === Versioning ===
    #[serde(default)]
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

fn default_method() -> String {
    "manual".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassLevel {
    pub class: String,
    pub level: u32,
    #[serde(default)]
    pub subclass: Option<String>,
}

/// A discrete decision made during creation or level-up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureChoice {
    pub feature_id: String,
    pub chosen: Chosen,
    pub source: SourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
}

/// One chosen value or several
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Chosen {
    One(String),
    Many(Vec<String>),
}

impl Chosen {
    pub fn values(&self) -> &[String] {
        match self {
            Chosen::One(value) => std::slice::from_ref(value),
            Chosen::Many(values) => values,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentEntry {
    pub item: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub equipped: bool,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    #[serde(default)]
    pub cp: u32,
    #[serde(default)]
    pub sp: u32,
    #[serde(default)]
    pub ep: u32,
    #[serde(default)]
    pub gp: u32,
    #[serde(default)]
    pub pp: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathSaves {
    #[serde(default)]
    pub successes: u8,
    #[serde(default)]
    pub failures: u8,
}

impl CharacterState {
    /// Choices recorded against a feature id
    pub fn choices_for<'a>(&'a self, feature_id: &'a str) -> impl Iterator<Item = &'a FeatureChoice> {
        self.feature_choices
            .iter()
            .filter(move |choice| choice.feature_id == feature_id)
    }

    pub fn primary_class(&self) -> Option<&ClassLevel> {
        self.classes.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chosen_shapes() {
        let one: FeatureChoice = serde_json::from_value(json!({
            "featureId": "fighter-1-fighting-style",
            "chosen": "defense",
            "source": "class",
            "level": 1
        }))
        .unwrap();
        assert_eq!(one.chosen.values(), ["defense".to_string()]);

        let many: FeatureChoice = serde_json::from_value(json!({
            "featureId": "background-sage-languages",
            "chosen": ["elvish", "draconic"],
            "source": "background"
        }))
        .unwrap();
        assert_eq!(many.chosen.values().len(), 2);
        assert_eq!(many.level, None);
    }

    #[test]
    fn test_state_defaults() {
        let state: CharacterState = serde_json::from_value(json!({
            "id": "c1",
            "name": "Ilsa",
            "race": "human",
            "classes": [{ "class": "fighter", "level": 2 }],
            "background": "soldier",
            "baseAbilityScores": { "str": 15, "dex": 14, "con": 13, "int": 8, "wis": 10, "cha": 12 },
            "equipment": [{ "item": "longsword", "equipped": true }]
        }))
        .unwrap();
        assert_eq!(state.ability_score_method, "manual");
        assert_eq!(state.equipment[0].quantity, 1);
        assert_eq!(state.current_hp, None);
        assert_eq!(state.currency, Currency::default());
        assert_eq!(state.primary_class().unwrap().level, 2);
    }

    #[test]
    fn test_choices_for() {
        let state: CharacterState = serde_json::from_value(json!({
            "id": "c1",
            "name": "Ilsa",
            "race": "human",
            "classes": [],
            "background": "soldier",
            "baseAbilityScores": { "str": 10, "dex": 10, "con": 10, "int": 10, "wis": 10, "cha": 10 },
            "featureChoices": [
                { "featureId": "a", "chosen": "x", "source": "class" },
                { "featureId": "b", "chosen": "y", "source": "race" },
                { "featureId": "a", "chosen": "z", "source": "class" }
            ]
        }))
        .unwrap();
        assert_eq!(state.choices_for("a").count(), 2);
        assert_eq!(state.choices_for("c").count(), 0);
    }
}
