//! AbilityAccumulator - Collects ability bonuses before the cap is applied

use crate::resolve::ComputeError;
use crate::types::{Ability, AbilityScores, AbilitySet};
use serde::{Deserialize, Serialize};

/// Uniform upper bound on final ability scores
pub const ABILITY_SCORE_CAP: i32 = 20;

/// One bonus applied to one ability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityBonus {
    pub source: String,
    pub ability: Ability,
    pub amount: i32,
}

/// Accumulates ability bonuses from every source
#[derive(Debug, Clone, Default)]
pub struct AbilityAccumulator {
    base: AbilityScores,
    bonuses: AbilitySet<i32>,
    breakdown: Vec<AbilityBonus>,
}

impl AbilityAccumulator {
    pub fn new(base: AbilityScores) -> Self {
        AbilityAccumulator {
            base,
            bonuses: AbilitySet::default(),
            breakdown: Vec::new(),
        }
    }

    /// Record a bonus; fails when the running total leaves the integer range
    pub fn add(&mut self, source: &str, ability: Ability, amount: i32) -> Result<(), ComputeError> {
        let total = i64::from(self.bonuses.get(ability)) + i64::from(amount);
        *self.bonuses.get_mut(ability) = ComputeError::in_range(source, total)?;
        self.breakdown.push(AbilityBonus {
            source: source.to_string(),
            ability,
            amount,
        });
        Ok(())
    }

    /// Total bonus accumulated so far for an ability
    pub fn bonus(&self, ability: Ability) -> i32 {
        self.bonuses.get(ability)
    }

    /// Final scores: base plus every bonus, capped
    pub fn finish(self) -> Result<(AbilityScores, Vec<AbilityBonus>), ComputeError> {
        let scores = AbilitySet::try_from_fn(|ability| {
            let total = i64::from(self.base.get(ability)) + i64::from(self.bonuses.get(ability));
            let capped = total.min(i64::from(ABILITY_SCORE_CAP));
            ComputeError::in_range(ability.key(), capped)
        })?;
        Ok((scores, self.breakdown))
    }
}
