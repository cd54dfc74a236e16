//! Resolvers - One pure function per slice of the derived character
//!
//! Stages run in dependency order and hand immutable records forward:
//! [`AbilityStage`] → [`ProgressionStage`] → [`Proficiencies`] → derived
//! stats. A resolver that needs modifiers or the proficiency bonus takes the
//! stage record, so it cannot run before that stage exists.

mod abilities;
mod armor_class;
mod defenses;
mod equipment;
mod features;
mod hit_points;
mod progression;
mod proficiencies;
mod skills;
mod speed;
mod spellcasting;

pub use abilities::{
    compute_ability_modifiers, compute_ability_scores, point_buy_summary, AbilityStage,
    PointBuySummary,
};
pub use armor_class::{compute_armor_class, ArmorClass};
pub use defenses::{compute_defenses, Defenses};
pub use equipment::{compute_attacks, compute_inventory, Attack, InventoryItem};
pub use features::{compute_features, Feature, FeatureSource};
pub use hit_points::{compute_hit_points, HitDicePool, HitPoints};
pub use progression::{compute_proficiency_bonus, compute_total_level, ProgressionStage};
pub use proficiencies::{compute_proficiencies, Proficiencies};
pub use skills::{compute_saving_throws, compute_skills, ProficiencyLevel, SavingThrow, Skill};
pub use speed::{compute_initiative, compute_speed, DEFAULT_WALKING_SPEED};
pub use spellcasting::{
    compute_spellcasting, pact_slot_count, pact_slot_level, KnownSpell, SpellSlots,
    SpellcastingBlock,
};

use crate::config::RulesConfig;
use crate::data::DataIntegrityError;
use crate::formula::{Evaluator, FormulaError, Tables, Variables, MAX_INT_MAGNITUDE};
use thiserror::Error;

/// Failure of a character computation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComputeError {
    #[error("formula `{name}` failed: {source}")]
    Formula {
        name: String,
        #[source]
        source: FormulaError,
    },
    #[error(transparent)]
    Data(#[from] DataIntegrityError),
    #[error("malformed choice `{value}` for feature `{feature_id}`")]
    MalformedChoice { feature_id: String, value: String },
    #[error("`{name}` value {value} is outside ±{max}", max = MAX_INT_MAGNITUDE)]
    OutOfRange { name: String, value: i64 },
}

impl ComputeError {
    /// Check a derived integer against the same bound formula results obey
    pub(crate) fn in_range(name: &str, value: i64) -> Result<i32, ComputeError> {
        if value.abs() > i64::from(MAX_INT_MAGNITUDE) {
            return Err(ComputeError::OutOfRange {
                name: name.to_string(),
                value,
            });
        }
        Ok(value as i32)
    }
}

/// Named rule formulas bound to an evaluator and the rule lookup tables
pub struct Formulas<'a> {
    evaluator: &'a Evaluator,
    rules: &'a RulesConfig,
    tables: Tables,
}

impl<'a> Formulas<'a> {
    pub fn new(evaluator: &'a Evaluator, rules: &'a RulesConfig) -> Self {
        Formulas {
            evaluator,
            rules,
            tables: rules.formula_tables(),
        }
    }

    pub fn rules(&self) -> &'a RulesConfig {
        self.rules
    }

    /// Evaluate the formula stored under `name`, floored to an integer
    pub fn int(&self, name: &str, variables: &Variables) -> Result<i32, ComputeError> {
        let expression = self.rules.formula(name)?;
        self.evaluator
            .evaluate_int(expression, variables, Some(&self.tables))
            .map_err(|source| ComputeError::Formula {
                name: name.to_string(),
                source,
            })
    }
}
