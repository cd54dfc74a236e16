//! Backgrounds, feats, spells and items

use super::ProficiencyGrants;
use crate::types::Ability;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Background {
    pub name: String,
    /// Skills, tools and languages the background grants
    #[serde(default)]
    pub proficiencies: ProficiencyGrants,
    #[serde(default)]
    pub feature: Option<BackgroundFeature>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundFeature {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feat {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub prerequisite: Option<String>,
    /// Fixed increases; chosen increases are recorded as `feat-{key}-ability` choices
    #[serde(default)]
    pub ability_bonuses: BTreeMap<Ability, i32>,
    #[serde(default)]
    pub proficiencies: ProficiencyGrants,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spell {
    pub name: String,
    /// 0 for cantrips
    pub level: u8,
    #[serde(default)]
    pub school: Option<String>,
    #[serde(default)]
    pub ritual: bool,
    #[serde(default)]
    pub concentration: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub name: String,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(flatten)]
    pub kind: ItemKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ItemKind {
    Armor {
        category: ArmorCategory,
        base_ac: i32,
        #[serde(default)]
        stealth_disadvantage: bool,
    },
    Shield {
        ac_bonus: i32,
    },
    Weapon {
        category: WeaponCategory,
        /// Damage dice, e.g. `1d8`
        damage: String,
        damage_type: String,
        #[serde(default)]
        ranged: bool,
        #[serde(default)]
        properties: Vec<WeaponProperty>,
    },
    Gear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArmorCategory {
    Light,
    Medium,
    Heavy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponCategory {
    Simple,
    Martial,
}

impl WeaponCategory {
    pub fn key(self) -> &'static str {
        match self {
            WeaponCategory::Simple => "simple",
            WeaponCategory::Martial => "martial",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WeaponProperty {
    Ammunition,
    Finesse,
    Heavy,
    Light,
    Loading,
    Reach,
    Thrown,
    TwoHanded,
    Versatile,
    #[serde(other)]
    Other,
}

impl Item {
    pub fn is_shield(&self) -> bool {
        matches!(self.kind, ItemKind::Shield { .. })
    }
}
