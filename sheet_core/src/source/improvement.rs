//! ImprovementSource - Ability score improvements chosen at class levels

use crate::data::{FeatureKind, GameData};
use crate::resolve::ComputeError;
use crate::source::{AbilityAccumulator, AbilitySource};
use crate::state::CharacterState;
use crate::types::{feature_id, Ability};

/// Parse an `"ability:amount"` choice value, e.g. `"dex:2"`
pub fn parse_ability_increase(feature_id: &str, value: &str) -> Result<(Ability, i32), ComputeError> {
    let malformed = || ComputeError::MalformedChoice {
        feature_id: feature_id.to_string(),
        value: value.to_string(),
    };
    let (ability, amount) = value.split_once(':').ok_or_else(malformed)?;
    let ability = ability.parse::<Ability>().map_err(|_| malformed())?;
    let amount = amount.trim().parse::<i32>().map_err(|_| malformed())?;
    Ok((ability, amount))
}

/// Choices recorded against every unlocked improvement feature of every class
///
/// Matches choices by `{classKey}-{level}-{featureName}`.
pub struct ImprovementSource<'a> {
    pub state: &'a CharacterState,
    pub data: &'a GameData,
}

impl AbilitySource for ImprovementSource<'_> {
    fn id(&self) -> &str {
        "class"
    }

    fn priority(&self) -> i32 {
        100 // After racial bonuses
    }

    fn apply(&self, scores: &mut AbilityAccumulator) -> Result<(), ComputeError> {
        for entry in &self.state.classes {
            let class = self.data.class(&entry.class)?;
            let improvements = class
                .features_through(entry.level)
                .into_iter()
                .filter(|f| f.kind == FeatureKind::AbilityScoreImprovement);

            for feature in improvements {
                let id = feature_id::leveled(&entry.class, feature.level, &feature.name);
                for choice in self.state.choices_for(&id) {
                    for value in choice.chosen.values() {
                        let (ability, amount) = parse_ability_increase(&id, value)?;
                        scores.add(&id, ability, amount)?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AbilityScores;
    use serde_json::json;

    fn fixture(choices: serde_json::Value) -> (CharacterState, GameData) {
        let data: GameData = serde_json::from_value(json!({
            "classes": {
                "fighter": {
                    "name": "Fighter",
                    "hitDie": 10,
                    "features": [
                        { "level": 4, "name": "Ability Score Improvement", "kind": "abilityScoreImprovement" },
                        { "level": 6, "name": "Ability Score Improvement", "kind": "abilityScoreImprovement" },
                        { "level": 1, "name": "Fighting Style" }
                    ]
                }
            }
        }))
        .unwrap();
        let state: CharacterState = serde_json::from_value(json!({
            "id": "c1",
            "name": "Ilsa",
            "race": "human",
            "classes": [{ "class": "fighter", "level": 5 }],
            "background": "soldier",
            "baseAbilityScores": { "str": 15, "dex": 14, "con": 13, "int": 8, "wis": 10, "cha": 12 },
            "featureChoices": choices
        }))
        .unwrap();
        (state, data)
    }

    #[test]
    fn test_parse_ability_increase() {
        assert_eq!(parse_ability_increase("x", "dex:2").unwrap(), (Ability::Dexterity, 2));
        assert_eq!(parse_ability_increase("x", "Strength: 1").unwrap(), (Ability::Strength, 1));
        assert!(matches!(
            parse_ability_increase("x", "dex"),
            Err(ComputeError::MalformedChoice { .. })
        ));
        assert!(matches!(
            parse_ability_increase("x", "luck:2"),
            Err(ComputeError::MalformedChoice { .. })
        ));
        assert!(matches!(
            parse_ability_increase("x", "dex:two"),
            Err(ComputeError::MalformedChoice { .. })
        ));
    }

    #[test]
    fn test_unlocked_improvements_apply() {
        let (state, data) = fixture(json!([
            { "featureId": "fighter-4-ability-score-improvement", "chosen": ["str:1", "con:1"], "source": "class", "level": 4 },
            { "featureId": "fighter-6-ability-score-improvement", "chosen": "dex:2", "source": "class", "level": 6 },
            { "featureId": "fighter-1-fighting-style", "chosen": "str:9", "source": "class", "level": 1 }
        ]));
        let mut acc = AbilityAccumulator::new(state.base_ability_scores);
        ImprovementSource { state: &state, data: &data }.apply(&mut acc).unwrap();

        let (scores, _) = acc.finish().unwrap();
        assert_eq!(scores.strength, 16);
        assert_eq!(scores.constitution, 14);
        // Level 6 improvement is not unlocked at level 5; fighting style is not an improvement
        assert_eq!(scores.dexterity, 14);
    }

    #[test]
    fn test_missing_class_is_reported() {
        let (mut state, data) = fixture(json!([]));
        state.classes[0].class = "mystic".to_string();
        let mut acc = AbilityAccumulator::new(AbilityScores::splat(10));
        let result = ImprovementSource { state: &state, data: &data }.apply(&mut acc);
        assert!(matches!(result, Err(ComputeError::Data(_))));
    }
}
