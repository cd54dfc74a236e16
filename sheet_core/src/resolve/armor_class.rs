//! Armor class from equipped armor and shield

use super::equipment::equipped_items;
use super::{AbilityStage, ComputeError};
use crate::data::{ArmorCategory, GameData, ItemKind};
use crate::state::CharacterState;
use crate::types::Ability;
use serde::{Deserialize, Serialize};

/// Unarmored base
pub const UNARMORED_AC: i32 = 10;

/// Medium armor DEX cap
pub const MEDIUM_ARMOR_DEX_CAP: i32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArmorClass {
    pub value: i32,
    /// Item key of the armor counted, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub armor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shield: Option<String>,
}

fn dex_contribution(category: Option<ArmorCategory>, dex: i32) -> i32 {
    match category {
        None | Some(ArmorCategory::Light) => dex,
        Some(ArmorCategory::Medium) => dex.min(MEDIUM_ARMOR_DEX_CAP),
        Some(ArmorCategory::Heavy) => 0,
    }
}

/// First equipped armor and first equipped shield; further ones are ignored
pub fn compute_armor_class(
    state: &CharacterState,
    data: &GameData,
    abilities: &AbilityStage,
) -> Result<ArmorClass, ComputeError> {
    let mut armor = None;
    let mut shield = None;

    for (key, item) in equipped_items(state, data)? {
        match &item.kind {
            ItemKind::Armor {
                category, base_ac, ..
            } if armor.is_none() => armor = Some((key, *category, *base_ac)),
            ItemKind::Shield { ac_bonus } if shield.is_none() => shield = Some((key, *ac_bonus)),
            _ => {}
        }
    }

    let dex = abilities.modifier(Ability::Dexterity);
    let base = match armor {
        Some((_, category, base_ac)) => base_ac + dex_contribution(Some(category), dex),
        None => UNARMORED_AC + dex_contribution(None, dex),
    };
    let bonus = shield.map_or(0, |(_, bonus)| bonus);

    Ok(ArmorClass {
        value: base + bonus,
        armor: armor.map(|(key, _, _)| key.to_string()),
        shield: shield.map(|(key, _)| key.to_string()),
    })
}
