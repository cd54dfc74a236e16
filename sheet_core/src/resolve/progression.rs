//! Total level and proficiency bonus

use super::{ComputeError, Formulas};
use crate::config::formula_names;
use crate::formula::variables;
use crate::state::{CharacterState, ClassLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressionStage {
    pub total_level: u32,
    pub proficiency_bonus: i32,
}

impl ProgressionStage {
    pub fn resolve(state: &CharacterState, formulas: &Formulas<'_>) -> Result<Self, ComputeError> {
        let total_level = compute_total_level(&state.classes);
        let proficiency_bonus = compute_proficiency_bonus(total_level, formulas)?;
        Ok(ProgressionStage {
            total_level,
            proficiency_bonus,
        })
    }
}

/// Sum of all class levels
pub fn compute_total_level(classes: &[ClassLevel]) -> u32 {
    classes.iter().map(|c| c.level).sum()
}

/// Table entry for the total level if present, else the `proficiencyBonus` formula
pub fn compute_proficiency_bonus(total_level: u32, formulas: &Formulas<'_>) -> Result<i32, ComputeError> {
    if let Some(bonus) = formulas
        .rules()
        .proficiency_bonus_table
        .get(&total_level.to_string())
    {
        return ComputeError::in_range("proficiencyBonusTable", i64::from(*bonus));
    }
    let vars = variables([("totalLevel", f64::from(total_level))]);
    formulas.int(formula_names::PROFICIENCY_BONUS, &vars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{default_rules, RulesConfig};
    use crate::formula::{Evaluator, FormulaError};
    use proptest::prelude::*;

    fn class(key: &str, level: u32) -> ClassLevel {
        ClassLevel {
            class: key.to_string(),
            level,
            subclass: None,
        }
    }

    #[test]
    fn test_total_level_is_additive() {
        assert_eq!(compute_total_level(&[class("fighter", 3), class("wizard", 2)]), 5);
        assert_eq!(compute_total_level(&[]), 0);
    }

    #[test]
    fn test_formula_fallback() {
        let rules = default_rules().unwrap();
        let evaluator = Evaluator::standard();
        let formulas = Formulas::new(&evaluator, &rules);
        let cases = [(1, 2), (4, 2), (5, 3), (9, 4), (13, 5), (17, 6), (20, 6)];
        for (level, expected) in cases {
            assert_eq!(compute_proficiency_bonus(level, &formulas), Ok(expected), "level {}", level);
        }
    }

    #[test]
    fn test_table_takes_precedence() {
        let mut rules = default_rules().unwrap();
        rules.proficiency_bonus_table.insert("5".to_string(), 7);
        let evaluator = Evaluator::standard();
        let formulas = Formulas::new(&evaluator, &rules);
        assert_eq!(compute_proficiency_bonus(5, &formulas), Ok(7));
        assert_eq!(compute_proficiency_bonus(6, &formulas), Ok(3));
    }

    #[test]
    fn test_missing_formula_without_table() {
        let rules = RulesConfig::default();
        let evaluator = Evaluator::standard();
        let formulas = Formulas::new(&evaluator, &rules);
        assert!(matches!(
            compute_proficiency_bonus(1, &formulas),
            Err(ComputeError::Data(_))
        ));
    }

    #[test]
    fn test_oversized_bonus_is_rejected() {
        let mut rules = default_rules().unwrap();
        rules
            .formulas
            .insert("proficiencyBonus".to_string(), "10000000000".to_string());
        let evaluator = Evaluator::standard();
        let formulas = Formulas::new(&evaluator, &rules);
        assert!(matches!(
            compute_proficiency_bonus(5, &formulas),
            Err(ComputeError::Formula { source: FormulaError::OutOfRange(_), .. })
        ));

        let mut rules = default_rules().unwrap();
        rules.proficiency_bonus_table.insert("5".to_string(), i32::MAX);
        let formulas = Formulas::new(&evaluator, &rules);
        assert_eq!(
            compute_proficiency_bonus(5, &formulas),
            Err(ComputeError::OutOfRange {
                name: "proficiencyBonusTable".to_string(),
                value: i64::from(i32::MAX)
            })
        );
    }

    proptest! {
        #[test]
        fn prop_proficiency_bonus_law(level in 1u32..=30) {
            let rules = default_rules().unwrap();
            let evaluator = Evaluator::standard();
            let formulas = Formulas::new(&evaluator, &rules);
            let expected = 1 + ((level + 3) / 4) as i32;
            prop_assert_eq!(compute_proficiency_bonus(level, &formulas), Ok(expected));
        }
    }
}
