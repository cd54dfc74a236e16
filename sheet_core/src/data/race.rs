//! Races, subraces and their traits

use super::ProficiencyGrants;
use crate::types::Ability;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Race {
    pub name: String,
    #[serde(default)]
    pub ability_bonuses: BTreeMap<Ability, i32>,
    /// Absent means the default walking speed
    #[serde(default)]
    pub speed: Option<SpeedSpec>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub traits: Vec<Trait>,
    #[serde(default)]
    pub proficiencies: ProficiencyGrants,
    #[serde(default)]
    pub subraces: BTreeMap<String, Subrace>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subrace {
    pub name: String,
    #[serde(default)]
    pub ability_bonuses: BTreeMap<Ability, i32>,
    /// Scalar replaces the walking speed; a map merges per movement mode
    #[serde(default)]
    pub speed: Option<SpeedSpec>,
    #[serde(default)]
    pub traits: Vec<Trait>,
    #[serde(default)]
    pub proficiencies: ProficiencyGrants,
}

/// Speed as a bare walking speed or per movement mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpeedSpec {
    Walk(u32),
    Modes(BTreeMap<String, u32>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trait {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub grants: TraitGrants,
}

/// Defensive properties and senses a trait confers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraitGrants {
    #[serde(default)]
    pub resistances: Vec<String>,
    #[serde(default)]
    pub immunities: Vec<String>,
    #[serde(default)]
    pub vulnerabilities: Vec<String>,
    #[serde(default)]
    pub condition_immunities: Vec<String>,
    /// Sense name -> range in feet
    #[serde(default)]
    pub senses: BTreeMap<String, u32>,
}
