//! Final ability scores and modifiers

use super::{ComputeError, Formulas};
use crate::config::{formula_names, AbilityScoreMethod, RulesConfig};
use crate::data::GameData;
use crate::formula::variables;
use crate::source::{
    AbilityAccumulator, AbilityBonus, AbilitySource, FeatSource, ImprovementSource, RaceSource,
    SubraceSource,
};
use crate::state::CharacterState;
use crate::types::{Ability, AbilityModifiers, AbilityScores, AbilitySet};
use serde::{Deserialize, Serialize};

/// Final scores, their modifiers and where each bonus came from
#[derive(Debug, Clone, PartialEq)]
pub struct AbilityStage {
    pub scores: AbilityScores,
    pub modifiers: AbilityModifiers,
    pub breakdown: Vec<AbilityBonus>,
}

impl AbilityStage {
    pub fn resolve(
        state: &CharacterState,
        data: &GameData,
        formulas: &Formulas<'_>,
    ) -> Result<Self, ComputeError> {
        let (scores, breakdown) = accumulate(state, data)?;
        let modifiers = compute_ability_modifiers(&scores, formulas)?;
        Ok(AbilityStage {
            scores,
            modifiers,
            breakdown,
        })
    }

    pub fn modifier(&self, ability: Ability) -> i32 {
        self.modifiers.get(ability)
    }
}

fn accumulate(
    state: &CharacterState,
    data: &GameData,
) -> Result<(AbilityScores, Vec<AbilityBonus>), ComputeError> {
    let race = data.race(&state.race)?;

    let mut sources: Vec<Box<dyn AbilitySource + '_>> = vec![
        Box::new(RaceSource { race }),
        Box::new(ImprovementSource { state, data }),
        Box::new(FeatSource { state, data }),
    ];
    if let Some(subrace) = data.subrace(race, state.subrace.as_deref()) {
        sources.push(Box::new(SubraceSource { subrace }));
    }
    sources.sort_by_key(|s| s.priority());

    let mut accumulator = AbilityAccumulator::new(state.base_ability_scores);
    for source in &sources {
        tracing::trace!(source = source.id(), priority = source.priority(), "applying ability source");
        source.apply(&mut accumulator)?;
    }
    accumulator.finish()
}

/// Base scores plus race, subrace, class improvement and feat bonuses, capped at 20
pub fn compute_ability_scores(
    state: &CharacterState,
    data: &GameData,
) -> Result<AbilityScores, ComputeError> {
    accumulate(state, data).map(|(scores, _)| scores)
}

/// Modifier per ability from the `abilityModifier` formula with `score` bound
pub fn compute_ability_modifiers(
    scores: &AbilityScores,
    formulas: &Formulas<'_>,
) -> Result<AbilityModifiers, ComputeError> {
    AbilitySet::try_from_fn(|ability| {
        let vars = variables([("score", f64::from(scores.get(ability)))]);
        formulas.int(formula_names::ABILITY_MODIFIER, &vars)
    })
}

/// Points spent under a point-buy method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointBuySummary {
    pub spent: u32,
    pub budget: u32,
}

/// Cost of the base scores when the chosen method is a point buy
///
/// `None` for other methods or when a base score is outside the cost table.
pub fn point_buy_summary(state: &CharacterState, rules: &RulesConfig) -> Option<PointBuySummary> {
    match rules.ability_score_methods.get(&state.ability_score_method)? {
        AbilityScoreMethod::PointBuy { budget, costs } => {
            let mut spent = 0;
            for ability in Ability::all() {
                let score = state.base_ability_scores.get(*ability);
                spent += costs.get(&score.to_string())?;
            }
            Some(PointBuySummary {
                spent,
                budget: *budget,
            })
        }
        AbilityScoreMethod::StandardArray { .. }
        | AbilityScoreMethod::Roll { .. }
        | AbilityScoreMethod::Manual => None,
    }
}
