//! Inventory resolution and weapon attacks

use super::{AbilityStage, ComputeError, Proficiencies, ProgressionStage};
use crate::data::{GameData, Item, ItemKind, WeaponProperty};
use crate::state::CharacterState;
use crate::types::Ability;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub item: String,
    pub name: String,
    pub quantity: u32,
    pub equipped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attack {
    pub item: String,
    pub name: String,
    pub ability: Ability,
    pub proficient: bool,
    pub attack_bonus: i32,
    /// Dice plus signed modifier, e.g. `1d8+3`
    pub damage: String,
    pub damage_type: String,
}

/// Equipped entries resolved against item data, in inventory order
pub(crate) fn equipped_items<'a>(
    state: &'a CharacterState,
    data: &'a GameData,
) -> Result<Vec<(&'a str, &'a Item)>, ComputeError> {
    state
        .equipment
        .iter()
        .filter(|entry| entry.equipped)
        .map(|entry| Ok((entry.item.as_str(), data.item(&entry.item)?)))
        .collect()
}

/// Every equipment entry with its item name
pub fn compute_inventory(
    state: &CharacterState,
    data: &GameData,
) -> Result<Vec<InventoryItem>, ComputeError> {
    state
        .equipment
        .iter()
        .map(|entry| {
            let item = data.item(&entry.item)?;
            Ok(InventoryItem {
                item: entry.item.clone(),
                name: item.name.clone(),
                quantity: entry.quantity,
                equipped: entry.equipped,
            })
        })
        .collect()
}

fn damage_text(dice: &str, modifier: i32) -> String {
    match modifier {
        0 => dice.to_string(),
        m if m > 0 => format!("{}+{}", dice, m),
        m => format!("{}{}", dice, m),
    }
}

/// One attack per equipped weapon
///
/// Ranged weapons use DEX, finesse weapons the better of STR and DEX, all
/// others STR. Proficiency applies when the weapon key, name or category is
/// among weapon proficiencies.
pub fn compute_attacks(
    state: &CharacterState,
    data: &GameData,
    abilities: &AbilityStage,
    progression: &ProgressionStage,
    proficiencies: &Proficiencies,
) -> Result<Vec<Attack>, ComputeError> {
    let mut attacks = Vec::new();

    for (key, item) in equipped_items(state, data)? {
        let ItemKind::Weapon {
            category,
            damage,
            damage_type,
            ranged,
            properties,
        } = &item.kind
        else {
            continue;
        };

        let ability = if *ranged {
            Ability::Dexterity
        } else if properties.contains(&WeaponProperty::Finesse)
            && abilities.modifier(Ability::Dexterity) > abilities.modifier(Ability::Strength)
        {
            Ability::Dexterity
        } else {
            Ability::Strength
        };
        let modifier = abilities.modifier(ability);
        let proficient = proficiencies.has_weapon(key)
            || proficiencies.has_weapon(&item.name)
            || proficiencies.has_weapon(category.key());

        let mut attack_bonus = modifier;
        if proficient {
            attack_bonus += progression.proficiency_bonus;
        }

        attacks.push(Attack {
            item: key.to_string(),
            name: item.name.clone(),
            ability,
            proficient,
            attack_bonus,
            damage: damage_text(damage, modifier),
            damage_type: damage_type.clone(),
        });
    }

    Ok(attacks)
}
