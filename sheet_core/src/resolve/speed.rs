//! Movement speeds and initiative

use super::AbilityStage;
use crate::data::{Race, SpeedSpec, Subrace};
use crate::types::Ability;
use std::collections::BTreeMap;

pub const DEFAULT_WALKING_SPEED: u32 = 30;

const WALK: &str = "walk";

/// Speed per movement mode
///
/// A race without speed walks at [`DEFAULT_WALKING_SPEED`]. A subrace scalar
/// replaces the walking speed; a subrace map overrides mode by mode.
pub fn compute_speed(race: &Race, subrace: Option<&Subrace>) -> BTreeMap<String, u32> {
    let mut speed = match &race.speed {
        None => BTreeMap::from([(WALK.to_string(), DEFAULT_WALKING_SPEED)]),
        Some(SpeedSpec::Walk(walk)) => BTreeMap::from([(WALK.to_string(), *walk)]),
        Some(SpeedSpec::Modes(modes)) => modes.clone(),
    };

    match subrace.and_then(|s| s.speed.as_ref()) {
        Some(SpeedSpec::Walk(walk)) => {
            speed.insert(WALK.to_string(), *walk);
        }
        Some(SpeedSpec::Modes(modes)) => {
            speed.extend(modes.iter().map(|(mode, value)| (mode.clone(), *value)));
        }
        None => {}
    }
    speed
}

pub fn compute_initiative(abilities: &AbilityStage) -> i32 {
    abilities.modifier(Ability::Dexterity)
}
