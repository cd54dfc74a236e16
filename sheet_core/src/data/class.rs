//! Classes, subclasses, leveled features and spellcasting descriptors

use super::ProficiencyGrants;
use crate::types::{Ability, CasterType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub name: String,
    /// Falls back to `rules.hitDice` when absent
    #[serde(default)]
    pub hit_die: Option<u32>,
    /// Baseline proficiencies, granted only when this is the first class
    #[serde(default)]
    pub proficiencies: ProficiencyGrants,
    #[serde(default)]
    pub features: Vec<ClassFeature>,
    #[serde(default)]
    pub subclasses: BTreeMap<String, Subclass>,
    #[serde(default)]
    pub spellcasting: Option<Spellcasting>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subclass {
    pub name: String,
    #[serde(default)]
    pub features: Vec<ClassFeature>,
    #[serde(default)]
    pub spellcasting: Option<Spellcasting>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassFeature {
    pub level: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub kind: FeatureKind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeatureKind {
    #[default]
    Standard,
    /// Choices recorded against this feature are `"ability:amount"` increases
    AbilityScoreImprovement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spellcasting {
    pub ability: Ability,
    /// Falls back to `rules.multiclassSpellSlots.casterTypes` when absent
    #[serde(default)]
    pub caster_type: Option<CasterType>,
    /// Class level -> cantrips known
    #[serde(default)]
    pub cantrips_known: BTreeMap<String, u32>,
    /// Class level -> spells known
    #[serde(default)]
    pub spells_known: BTreeMap<String, u32>,
}

/// Features at or below `level`, ordered by level then declaration order
pub(crate) fn features_through(features: &[ClassFeature], level: u32) -> Vec<&ClassFeature> {
    let mut unlocked: Vec<&ClassFeature> = features.iter().filter(|f| f.level <= level).collect();
    unlocked.sort_by_key(|f| f.level);
    unlocked
}

/// Value of a by-level table at `level`: the entry for the highest level not above it
fn by_level(table: &BTreeMap<String, u32>, level: u32) -> Option<u32> {
    table
        .iter()
        .filter_map(|(key, value)| key.parse::<u32>().ok().map(|k| (k, *value)))
        .filter(|(k, _)| *k <= level)
        .max_by_key(|(k, _)| *k)
        .map(|(_, value)| value)
}

impl Class {
    pub fn features_through(&self, level: u32) -> Vec<&ClassFeature> {
        features_through(&self.features, level)
    }
}

impl Subclass {
    pub fn features_through(&self, level: u32) -> Vec<&ClassFeature> {
        features_through(&self.features, level)
    }
}

impl Spellcasting {
    pub fn cantrips_at(&self, level: u32) -> u32 {
        by_level(&self.cantrips_known, level).unwrap_or(0)
    }

    /// `None` when the source has no spells-known progression (prepared casters)
    pub fn spells_known_at(&self, level: u32) -> Option<u32> {
        if self.spells_known.is_empty() {
            return None;
        }
        Some(by_level(&self.spells_known, level).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wizard() -> Class {
        serde_json::from_value(json!({
            "name": "Wizard",
            "hitDie": 6,
            "features": [
                { "level": 2, "name": "Arcane Tradition" },
                { "level": 1, "name": "Arcane Recovery" },
                { "level": 4, "name": "Ability Score Improvement", "kind": "abilityScoreImprovement" },
                { "level": 1, "name": "Spellcasting" }
            ],
            "spellcasting": {
                "ability": "int",
                "casterType": "full",
                "cantripsKnown": { "1": 3, "4": 4, "10": 5 }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_features_through_level() {
        let class = wizard();
        let names: Vec<&str> = class.features_through(2).iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Arcane Recovery", "Spellcasting", "Arcane Tradition"]);
        assert_eq!(class.features_through(4)[3].kind, FeatureKind::AbilityScoreImprovement);
    }

    #[test]
    fn test_by_level_tables() {
        let casting = wizard().spellcasting.unwrap();
        assert_eq!(casting.caster_type, Some(CasterType::Full));
        assert_eq!(casting.cantrips_at(1), 3);
        assert_eq!(casting.cantrips_at(3), 3);
        assert_eq!(casting.cantrips_at(9), 4);
        assert_eq!(casting.cantrips_at(20), 5);
        assert_eq!(casting.spells_known_at(5), None);
    }

    #[test]
    fn test_spells_known_before_first_entry() {
        let casting: Spellcasting = serde_json::from_value(json!({
            "ability": "cha",
            "spellsKnown": { "3": 3, "4": 4 }
        }))
        .unwrap();
        assert_eq!(casting.spells_known_at(2), Some(0));
        assert_eq!(casting.spells_known_at(4), Some(4));
        assert_eq!(casting.cantrips_at(4), 0);
        assert_eq!(casting.caster_type, None);
    }
}
