//! Rules configuration: formulas, skills and progression tables

use super::ConfigError;
use crate::data::DataIntegrityError;
use crate::formula::Tables;
use crate::types::{Ability, CasterType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Names of formulas the pipeline reads from `formulas`
pub mod formula_names {
    pub const ABILITY_MODIFIER: &str = "abilityModifier";
    pub const PROFICIENCY_BONUS: &str = "proficiencyBonus";
}

/// Game rules supplied as data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesConfig {
    /// Formula strings keyed by name
    #[serde(default)]
    pub formulas: BTreeMap<String, String>,
    #[serde(default)]
    pub ability_score_methods: BTreeMap<String, AbilityScoreMethod>,
    /// Skill key -> governing ability
    #[serde(default)]
    pub skills: BTreeMap<String, SkillDefinition>,
    /// Total level -> proficiency bonus; takes precedence over the formula
    #[serde(default)]
    pub proficiency_bonus_table: BTreeMap<String, i32>,
    #[serde(default)]
    pub multiclass_spell_slots: MulticlassSpellSlots,
    /// Class key -> hit die size, for classes that do not declare one
    #[serde(default)]
    pub hit_dice: BTreeMap<String, u32>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub damage_types: Vec<String>,
    /// Extra lookup tables exposed to formulas
    #[serde(default)]
    pub tables: Tables,
}

/// How base ability scores were generated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AbilityScoreMethod {
    PointBuy {
        budget: u32,
        /// Score -> point cost
        costs: BTreeMap<String, u32>,
    },
    StandardArray {
        values: Vec<i32>,
    },
    Roll {
        dice: String,
    },
    Manual,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub ability: Ability,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Shared multiclass spell slot progression
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MulticlassSpellSlots {
    /// Effective caster level -> slots per spell level
    #[serde(default)]
    pub table: BTreeMap<String, Vec<u32>>,
    /// Caster type key -> class level multiplier
    #[serde(default)]
    pub caster_level_multipliers: BTreeMap<String, f64>,
    /// Caster type key -> class keys of that type
    #[serde(default)]
    pub caster_types: BTreeMap<String, Vec<String>>,
}

impl MulticlassSpellSlots {
    pub fn multiplier(&self, caster_type: CasterType) -> Option<f64> {
        self.caster_level_multipliers.get(caster_type.key()).copied()
    }

    /// Caster type a class is grouped under, if any
    pub fn caster_type_of(&self, class_key: &str) -> Option<CasterType> {
        CasterType::all().iter().copied().find(|caster_type| {
            self.caster_types
                .get(caster_type.key())
                .is_some_and(|classes| classes.iter().any(|c| c == class_key))
        })
    }

    /// Slot array for an effective caster level; empty when the table has no entry
    pub fn slots_for(&self, effective_level: u32) -> Vec<u32> {
        self.table
            .get(&effective_level.to_string())
            .cloned()
            .unwrap_or_default()
    }
}

impl RulesConfig {
    /// Formula string by name
    pub fn formula(&self, name: &str) -> Result<&str, DataIntegrityError> {
        self.formulas
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| DataIntegrityError::MissingFormula(name.to_string()))
    }

    /// Lookup tables visible to formulas
    ///
    /// `proficiencyBonus` and `hitDice` mirror the rule tables; entries in
    /// `tables` with the same name replace them.
    pub fn formula_tables(&self) -> Tables {
        let mut tables = Tables::new();
        tables.insert(
            "proficiencyBonus".to_string(),
            self.proficiency_bonus_table
                .iter()
                .map(|(level, bonus)| (level.clone(), f64::from(*bonus)))
                .collect(),
        );
        tables.insert(
            "hitDice".to_string(),
            self.hit_dice
                .iter()
                .map(|(class, die)| (class.clone(), f64::from(*die)))
                .collect(),
        );
        tables.extend(self.tables.clone());
        tables
    }

    pub fn is_known_damage_type(&self, damage_type: &str) -> bool {
        self.damage_types.iter().any(|d| d.eq_ignore_ascii_case(damage_type))
    }

    pub fn is_known_condition(&self, condition: &str) -> bool {
        self.conditions.iter().any(|c| c.eq_ignore_ascii_case(condition))
    }
}

/// Load the bundled default rules
pub fn default_rules() -> Result<RulesConfig, ConfigError> {
    let toml = include_str!("../../config/rules.toml");
    super::parse_toml(toml)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_load() {
        let rules = default_rules().unwrap();
        assert_eq!(
            rules.formula(formula_names::ABILITY_MODIFIER).unwrap(),
            "floor((score - 10) / 2)"
        );
        assert_eq!(rules.skills.len(), 18);
        assert_eq!(rules.skills["stealth"].ability, Ability::Dexterity);
        assert_eq!(rules.multiclass_spell_slots.multiplier(CasterType::Half), Some(0.5));
        assert_eq!(rules.multiclass_spell_slots.slots_for(4), vec![4, 3]);
        assert!(rules.multiclass_spell_slots.slots_for(0).is_empty());
        assert_eq!(rules.hit_dice["wizard"], 6);
        assert!(rules.is_known_damage_type("Fire"));
        assert!(rules.is_known_condition("poisoned"));
    }

    #[test]
    fn test_default_ability_score_methods() {
        let rules = default_rules().unwrap();
        match &rules.ability_score_methods["pointBuy"] {
            AbilityScoreMethod::PointBuy { budget, costs } => {
                assert_eq!(*budget, 27);
                assert_eq!(costs["15"], 9);
            }
            other => panic!("expected point buy, got {:?}", other),
        }
        assert!(matches!(
            rules.ability_score_methods["standardArray"],
            AbilityScoreMethod::StandardArray { .. }
        ));
    }

    #[test]
    fn test_caster_type_groupings() {
        let rules = default_rules().unwrap();
        let slots = &rules.multiclass_spell_slots;
        assert_eq!(slots.caster_type_of("wizard"), Some(CasterType::Full));
        assert_eq!(slots.caster_type_of("paladin"), Some(CasterType::Half));
        assert_eq!(slots.caster_type_of("warlock"), Some(CasterType::Pact));
        assert_eq!(slots.caster_type_of("barbarian"), None);
    }

    #[test]
    fn test_missing_formula() {
        let rules = RulesConfig::default();
        assert_eq!(
            rules.formula("abilityModifier"),
            Err(DataIntegrityError::MissingFormula("abilityModifier".to_string()))
        );
    }

    #[test]
    fn test_formula_tables() {
        let mut rules = RulesConfig::default();
        rules.proficiency_bonus_table.insert("1".to_string(), 2);
        rules.hit_dice.insert("fighter".to_string(), 10);
        let mut custom = BTreeMap::new();
        custom.insert("a".to_string(), 1.0);
        rules.tables.insert("custom".to_string(), custom);

        let tables = rules.formula_tables();
        assert_eq!(tables["proficiencyBonus"]["1"], 2.0);
        assert_eq!(tables["hitDice"]["fighter"], 10.0);
        assert_eq!(tables["custom"]["a"], 1.0);
    }
}
