//! Maximum hit points and hit dice pools

use super::{AbilityStage, ComputeError};
use crate::data::GameData;
use crate::state::CharacterState;
use crate::types::Ability;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitDicePool {
    pub total: u32,
    pub used: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitPoints {
    pub max: i32,
    pub current: i32,
    pub temp: i32,
    /// Die size (`d8`) -> pool
    pub hit_dice: BTreeMap<String, HitDicePool>,
}

/// Full die plus CON at the first class's first level; `ceil(die/2) + 1 + CON`
/// for every other level. Never below 1.
pub fn compute_hit_points(
    state: &CharacterState,
    data: &GameData,
    abilities: &AbilityStage,
) -> Result<HitPoints, ComputeError> {
    let con = i64::from(abilities.modifier(Ability::Constitution));
    let mut max = 0i64;
    let mut hit_dice: BTreeMap<String, HitDicePool> = BTreeMap::new();

    for (index, entry) in state.classes.iter().enumerate() {
        let class = data.class(&entry.class)?;
        let die = data.hit_die(&entry.class, class)?;
        let average = i64::from(die.div_ceil(2)) + 1;
        let mut levels = i64::from(entry.level);

        if index == 0 && levels > 0 {
            max += i64::from(die) + con;
            levels -= 1;
        }
        max += levels * (average + con);
        let pool = hit_dice.entry(format!("d{}", die)).or_default();
        pool.total = pool.total.saturating_add(entry.level);
    }

    for (die, used) in &state.hit_dice_used {
        hit_dice.entry(die.clone()).or_default().used = *used;
    }

    let max = ComputeError::in_range("hitPoints", max.max(1))?;
    Ok(HitPoints {
        max,
        current: state.current_hp.unwrap_or(max).min(max),
        temp: state.temp_hp,
        hit_dice,
    })
}
