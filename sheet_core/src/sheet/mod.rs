//! ComputedCharacter - The full derived character sheet
//!
//! Built by running every resolver in dependency order over one
//! [`CharacterState`] and one [`GameData`]. The result is never persisted;
//! recomputing from the same inputs yields the same sheet.

use crate::data::GameData;
use crate::formula::Evaluator;
use crate::resolve::{
    compute_armor_class, compute_attacks, compute_defenses, compute_features,
    compute_hit_points, compute_initiative, compute_inventory, compute_proficiencies,
    compute_saving_throws, compute_skills, compute_speed, compute_spellcasting,
    point_buy_summary, AbilityStage, ArmorClass, Attack, ComputeError, Defenses, Feature,
    Formulas, HitPoints, InventoryItem, PointBuySummary, Proficiencies, ProgressionStage,
    SavingThrow, Skill, SpellcastingBlock,
};
use crate::source::AbilityBonus;
use crate::state::CharacterState;
use crate::types::{Ability, AbilityModifiers, AbilityScores};
use serde::Serialize;
use std::collections::BTreeMap;

/// Skill whose passive score is surfaced on its own
pub const PERCEPTION: &str = "perception";

/// Character state plus every derived value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedCharacter {
    #[serde(flatten)]
    pub state: CharacterState,

    // === Abilities ===
    pub ability_scores: AbilityScores,
    pub ability_modifiers: AbilityModifiers,
    /// Every bonus applied on top of the base scores, in application order
    pub ability_breakdown: Vec<AbilityBonus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_buy: Option<PointBuySummary>,

    // === Progression ===
    pub total_level: u32,
    pub proficiency_bonus: i32,

    // === Checks ===
    pub saving_throws: BTreeMap<Ability, SavingThrow>,
    pub skills: BTreeMap<String, Skill>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passive_perception: Option<i32>,

    // === Combat ===
    pub hit_points: HitPoints,
    pub armor_class: ArmorClass,
    pub speed: BTreeMap<String, u32>,
    pub initiative: i32,
    pub attacks: Vec<Attack>,
    pub inventory: Vec<InventoryItem>,

    // === Features ===
    pub features: Vec<Feature>,
    pub proficiencies: Proficiencies,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spellcasting: Option<SpellcastingBlock>,
    pub defenses: Defenses,
}

impl ComputedCharacter {
    pub fn modifier(&self, ability: Ability) -> i32 {
        self.ability_modifiers.get(ability)
    }

    pub fn skill(&self, key: &str) -> Option<&Skill> {
        self.skills.get(key)
    }
}

/// Compute a character with the standard formula functions
pub fn compute_character(
    state: &CharacterState,
    data: &GameData,
) -> Result<ComputedCharacter, ComputeError> {
    compute_character_with(state, data, &Evaluator::standard())
}

/// Compute a character with a caller-supplied evaluator
pub fn compute_character_with(
    state: &CharacterState,
    data: &GameData,
    evaluator: &Evaluator,
) -> Result<ComputedCharacter, ComputeError> {
    let span = tracing::debug_span!("compute_character", character_id = %state.id);
    let _guard = span.enter();

    let rules = &data.rules;
    let formulas = Formulas::new(evaluator, rules);

    let abilities = AbilityStage::resolve(state, data, &formulas)?;
    tracing::debug!(scores = ?abilities.scores, "abilities resolved");

    let progression = ProgressionStage::resolve(state, &formulas)?;
    tracing::debug!(
        total_level = progression.total_level,
        proficiency_bonus = progression.proficiency_bonus,
        "progression resolved"
    );

    let proficiencies = compute_proficiencies(state, data)?;

    let saving_throws = compute_saving_throws(&abilities, &progression, &proficiencies);
    let skills = compute_skills(rules, &abilities, &progression, &proficiencies);
    let passive_perception = skills.get(PERCEPTION).map(|skill| skill.passive);

    let race = data.race(&state.race)?;
    let subrace = data.subrace(race, state.subrace.as_deref());

    let hit_points = compute_hit_points(state, data, &abilities)?;
    let armor_class = compute_armor_class(state, data, &abilities)?;
    let speed = compute_speed(race, subrace);
    let initiative = compute_initiative(&abilities);
    let attacks = compute_attacks(state, data, &abilities, &progression, &proficiencies)?;
    let inventory = compute_inventory(state, data)?;
    tracing::debug!(hp = hit_points.max, ac = armor_class.value, "combat stats resolved");

    let features = compute_features(state, data)?;
    let spellcasting = compute_spellcasting(state, data, &abilities, &progression)?;
    let defenses = compute_defenses(race, subrace, rules);

    if !rules.conditions.is_empty() {
        for condition in state.conditions.iter().filter(|c| !rules.is_known_condition(c)) {
            tracing::warn!(condition = %condition, "active condition is not defined in rules");
        }
    }

    tracing::debug!(features = features.len(), "character computed");

    Ok(ComputedCharacter {
        state: state.clone(),
        ability_scores: abilities.scores,
        ability_modifiers: abilities.modifiers,
        ability_breakdown: abilities.breakdown,
        point_buy: point_buy_summary(state, rules),
        total_level: progression.total_level,
        proficiency_bonus: progression.proficiency_bonus,
        saving_throws,
        skills,
        passive_perception,
        hit_points,
        armor_class,
        speed,
        initiative,
        attacks,
        inventory,
        features,
        proficiencies,
        spellcasting,
        defenses,
    })
}
