//! FeatSource - Fixed and chosen ability increases from feats

use crate::data::GameData;
use crate::resolve::ComputeError;
use crate::source::{parse_ability_increase, AbilityAccumulator, AbilitySource};
use crate::state::CharacterState;
use crate::types::feature_id;

/// Increases from every taken feat, matched by `feat-{featKey}-ability`
pub struct FeatSource<'a> {
    pub state: &'a CharacterState,
    pub data: &'a GameData,
}

impl AbilitySource for FeatSource<'_> {
    fn id(&self) -> &str {
        "feat"
    }

    fn priority(&self) -> i32 {
        200 // Feats apply last
    }

    fn apply(&self, scores: &mut AbilityAccumulator) -> Result<(), ComputeError> {
        for key in &self.state.feats {
            let feat = self.data.feat(key)?;
            let source = feature_id::feat(key);
            for (ability, amount) in &feat.ability_bonuses {
                scores.add(&source, *ability, *amount)?;
            }

            let choice_id = feature_id::feat_ability(key);
            for choice in self.state.choices_for(&choice_id) {
                for value in choice.chosen.values() {
                    let (ability, amount) = parse_ability_increase(&choice_id, value)?;
                    scores.add(&source, ability, amount)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataIntegrityError;
    use serde_json::json;

    fn state_with(feats: serde_json::Value, choices: serde_json::Value) -> CharacterState {
        serde_json::from_value(json!({
            "id": "c1",
            "name": "Ilsa",
            "race": "human",
            "classes": [{ "class": "fighter", "level": 4 }],
            "background": "soldier",
            "baseAbilityScores": { "str": 10, "dex": 10, "con": 10, "int": 10, "wis": 10, "cha": 10 },
            "feats": feats,
            "featureChoices": choices
        }))
        .unwrap()
    }

    fn data() -> GameData {
        serde_json::from_value(json!({
            "feats": {
                "resilient": { "name": "Resilient" },
                "durable": { "name": "Durable", "abilityBonuses": { "con": 1 } }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_fixed_and_chosen_increases() {
        let state = state_with(
            json!(["resilient", "durable"]),
            json!([{ "featureId": "feat-resilient-ability", "chosen": "wis:1", "source": "feat" }]),
        );
        let data = data();
        let mut acc = AbilityAccumulator::new(state.base_ability_scores);
        FeatSource { state: &state, data: &data }.apply(&mut acc).unwrap();

        let (scores, breakdown) = acc.finish().unwrap();
        assert_eq!(scores.wisdom, 11);
        assert_eq!(scores.constitution, 11);
        assert!(breakdown.iter().all(|b| b.source.starts_with("feat-")));
    }

    #[test]
    fn test_unknown_feat_is_reported() {
        let state = state_with(json!(["lucky"]), json!([]));
        let data = data();
        let mut acc = AbilityAccumulator::new(state.base_ability_scores);
        let result = FeatSource { state: &state, data: &data }.apply(&mut acc);
        assert_eq!(
            result,
            Err(ComputeError::Data(DataIntegrityError::MissingFeat("lucky".to_string())))
        );
    }
}
