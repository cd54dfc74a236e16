//! Read-only game content: races, classes, backgrounds, feats, spells, items

mod class;
mod content;
mod race;

pub use class::{Class, ClassFeature, FeatureKind, Spellcasting, Subclass};
pub use content::{
    ArmorCategory, Background, BackgroundFeature, Feat, Item, ItemKind, Spell, WeaponCategory,
    WeaponProperty,
};
pub use race::{Race, SpeedSpec, Subrace, Trait, TraitGrants};

use crate::config::RulesConfig;
use crate::types::{Ability, CasterType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// A reference from character state or rules that cannot be resolved
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataIntegrityError {
    #[error("race `{0}` not found")]
    MissingRace(String),
    #[error("class `{0}` not found")]
    MissingClass(String),
    #[error("background `{0}` not found")]
    MissingBackground(String),
    #[error("feat `{0}` not found")]
    MissingFeat(String),
    #[error("spell `{0}` not found")]
    MissingSpell(String),
    #[error("item `{0}` not found")]
    MissingItem(String),
    #[error("formula `{0}` not found in rules")]
    MissingFormula(String),
    #[error("no caster level multiplier for caster type `{0}`")]
    MissingCasterMultiplier(CasterType),
    #[error("class `{0}` has no hit die")]
    MissingHitDie(String),
    #[error("spellcasting of `{0}` has no caster type")]
    MissingCasterType(String),
}

/// Proficiencies granted by a piece of content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProficiencyGrants {
    #[serde(default)]
    pub armor: Vec<String>,
    #[serde(default)]
    pub weapons: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub saving_throws: Vec<Ability>,
    #[serde(default)]
    pub languages: Vec<String>,
}

/// All content and rules, supplied in full on every computation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameData {
    #[serde(default)]
    pub races: BTreeMap<String, Race>,
    #[serde(default)]
    pub classes: BTreeMap<String, Class>,
    #[serde(default)]
    pub backgrounds: BTreeMap<String, Background>,
    #[serde(default)]
    pub feats: BTreeMap<String, Feat>,
    #[serde(default)]
    pub spells: BTreeMap<String, Spell>,
    #[serde(default)]
    pub items: BTreeMap<String, Item>,
    #[serde(default)]
    pub rules: RulesConfig,
}

impl GameData {
    pub fn race(&self, key: &str) -> Result<&Race, DataIntegrityError> {
        self.races
            .get(key)
            .ok_or_else(|| DataIntegrityError::MissingRace(key.to_string()))
    }

    /// Selected subrace, if one is selected and exists
    pub fn subrace<'a>(&'a self, race: &'a Race, key: Option<&str>) -> Option<&'a Subrace> {
        let key = key?;
        let subrace = race.subraces.get(key);
        if subrace.is_none() {
            tracing::warn!(subrace = key, race = %race.name, "selected subrace not found; ignoring");
        }
        subrace
    }

    pub fn class(&self, key: &str) -> Result<&Class, DataIntegrityError> {
        self.classes
            .get(key)
            .ok_or_else(|| DataIntegrityError::MissingClass(key.to_string()))
    }

    pub fn background(&self, key: &str) -> Result<&Background, DataIntegrityError> {
        self.backgrounds
            .get(key)
            .ok_or_else(|| DataIntegrityError::MissingBackground(key.to_string()))
    }

    pub fn feat(&self, key: &str) -> Result<&Feat, DataIntegrityError> {
        self.feats
            .get(key)
            .ok_or_else(|| DataIntegrityError::MissingFeat(key.to_string()))
    }

    pub fn spell(&self, key: &str) -> Result<&Spell, DataIntegrityError> {
        self.spells
            .get(key)
            .ok_or_else(|| DataIntegrityError::MissingSpell(key.to_string()))
    }

    pub fn item(&self, key: &str) -> Result<&Item, DataIntegrityError> {
        self.items
            .get(key)
            .ok_or_else(|| DataIntegrityError::MissingItem(key.to_string()))
    }

    /// Hit die for a class: its own declaration, else the rules table
    pub fn hit_die(&self, class_key: &str, class: &Class) -> Result<u32, DataIntegrityError> {
        class
            .hit_die
            .or_else(|| self.rules.hit_dice.get(class_key).copied())
            .ok_or_else(|| DataIntegrityError::MissingHitDie(class_key.to_string()))
    }
}
