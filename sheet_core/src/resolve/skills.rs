//! Skill and saving throw modifiers

use super::{AbilityStage, Proficiencies, ProgressionStage};
use crate::config::RulesConfig;
use crate::types::Ability;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProficiencyLevel {
    None,
    Proficient,
    /// Double proficiency bonus
    Expertise,
}

impl ProficiencyLevel {
    pub fn bonus(self, proficiency_bonus: i32) -> i32 {
        match self {
            ProficiencyLevel::None => 0,
            ProficiencyLevel::Proficient => proficiency_bonus,
            ProficiencyLevel::Expertise => proficiency_bonus * 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub ability: Ability,
    pub proficiency: ProficiencyLevel,
    pub modifier: i32,
    /// 10 + modifier
    pub passive: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingThrow {
    pub proficient: bool,
    pub modifier: i32,
}

/// Every skill defined in the rules; expertise wins over plain proficiency
pub fn compute_skills(
    rules: &RulesConfig,
    abilities: &AbilityStage,
    progression: &ProgressionStage,
    proficiencies: &Proficiencies,
) -> BTreeMap<String, Skill> {
    rules
        .skills
        .iter()
        .map(|(key, definition)| {
            let proficiency = if proficiencies.has_expertise(key) {
                ProficiencyLevel::Expertise
            } else if proficiencies.has_skill(key) {
                ProficiencyLevel::Proficient
            } else {
                ProficiencyLevel::None
            };
            let modifier = abilities.modifier(definition.ability)
                + proficiency.bonus(progression.proficiency_bonus);
            let skill = Skill {
                ability: definition.ability,
                proficiency,
                modifier,
                passive: 10 + modifier,
            };
            (key.clone(), skill)
        })
        .collect()
}

pub fn compute_saving_throws(
    abilities: &AbilityStage,
    progression: &ProgressionStage,
    proficiencies: &Proficiencies,
) -> BTreeMap<Ability, SavingThrow> {
    Ability::all()
        .iter()
        .map(|ability| {
            let proficient = proficiencies.has_saving_throw(*ability);
            let mut modifier = abilities.modifier(*ability);
            if proficient {
                modifier += progression.proficiency_bonus;
            }
            (*ability, SavingThrow { proficient, modifier })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_rules;
    use crate::types::AbilityScores;

    fn abilities() -> AbilityStage {
        let scores = AbilityScores {
            strength: 8,
            dexterity: 16,
            constitution: 12,
            intelligence: 10,
            wisdom: 14,
            charisma: 11,
        };
        AbilityStage {
            scores,
            modifiers: AbilityScores {
                strength: -1,
                dexterity: 3,
                constitution: 1,
                intelligence: 0,
                wisdom: 2,
                charisma: 0,
            },
            breakdown: Vec::new(),
        }
    }

    fn progression() -> ProgressionStage {
        ProgressionStage {
            total_level: 5,
            proficiency_bonus: 3,
        }
    }

    #[test]
    fn test_skill_tiers() {
        let rules = default_rules().unwrap();
        let profs = Proficiencies {
            skills: vec!["stealth".into(), "perception".into()],
            expertise: vec!["stealth".into()],
            ..Default::default()
        };
        let skills = compute_skills(&rules, &abilities(), &progression(), &profs);

        assert_eq!(skills.len(), rules.skills.len());
        let stealth = &skills["stealth"];
        assert_eq!(stealth.proficiency, ProficiencyLevel::Expertise);
        assert_eq!(stealth.modifier, 3 + 6);

        let perception = &skills["perception"];
        assert_eq!(perception.modifier, 2 + 3);
        assert_eq!(perception.passive, 15);

        let athletics = &skills["athletics"];
        assert_eq!(athletics.proficiency, ProficiencyLevel::None);
        assert_eq!(athletics.modifier, -1);
    }

    #[test]
    fn test_expertise_without_proficiency_entry() {
        let rules = default_rules().unwrap();
        let profs = Proficiencies {
            expertise: vec!["arcana".into()],
            ..Default::default()
        };
        let skills = compute_skills(&rules, &abilities(), &progression(), &profs);
        assert_eq!(skills["arcana"].modifier, 6);
    }

    #[test]
    fn test_saving_throws() {
        let profs = Proficiencies {
            saving_throws: vec![Ability::Dexterity, Ability::Wisdom],
            ..Default::default()
        };
        let saves = compute_saving_throws(&abilities(), &progression(), &profs);
        assert_eq!(saves.len(), 6);
        assert_eq!(saves[&Ability::Dexterity], SavingThrow { proficient: true, modifier: 6 });
        assert_eq!(saves[&Ability::Strength], SavingThrow { proficient: false, modifier: -1 });
    }
}
