//! Proficiency aggregation from class, race, background, choices and feats

use super::ComputeError;
use crate::data::{GameData, ProficiencyGrants};
use crate::state::{CharacterState, FeatureChoice};
use crate::types::{Ability, SourceKind};
use serde::{Deserialize, Serialize};

/// De-duplicated proficiencies in the order they were first granted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proficiencies {
    pub armor: Vec<String>,
    pub weapons: Vec<String>,
    pub tools: Vec<String>,
    pub skills: Vec<String>,
    pub saving_throws: Vec<Ability>,
    pub languages: Vec<String>,
    /// Skills with doubled proficiency bonus
    pub expertise: Vec<String>,
}

fn push_unique<T: PartialEq + Clone>(list: &mut Vec<T>, value: &T) {
    if !list.contains(value) {
        list.push(value.clone());
    }
}

fn extend_unique<T: PartialEq + Clone>(list: &mut Vec<T>, values: &[T]) {
    for value in values {
        push_unique(list, value);
    }
}

impl Proficiencies {
    fn merge(&mut self, grants: &ProficiencyGrants) {
        extend_unique(&mut self.armor, &grants.armor);
        extend_unique(&mut self.weapons, &grants.weapons);
        extend_unique(&mut self.tools, &grants.tools);
        extend_unique(&mut self.skills, &grants.skills);
        extend_unique(&mut self.saving_throws, &grants.saving_throws);
        extend_unique(&mut self.languages, &grants.languages);
    }

    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s == skill)
    }

    pub fn has_expertise(&self, skill: &str) -> bool {
        self.expertise.iter().any(|s| s == skill)
    }

    pub fn has_saving_throw(&self, ability: Ability) -> bool {
        self.saving_throws.contains(&ability)
    }

    pub fn has_weapon(&self, weapon: &str) -> bool {
        self.weapons.iter().any(|w| w.eq_ignore_ascii_case(weapon))
    }
}

/// What a recorded choice grants, judged from its feature id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChoiceGrant {
    Expertise,
    Skill,
    Tool,
    Language,
    Other,
}

fn classify(choice: &FeatureChoice) -> ChoiceGrant {
    let id = choice.feature_id.to_ascii_lowercase();
    if id.contains("expertise") {
        ChoiceGrant::Expertise
    } else if id.contains("language") {
        ChoiceGrant::Language
    } else if id.contains("tool") {
        ChoiceGrant::Tool
    } else if id.contains("skill") {
        ChoiceGrant::Skill
    } else {
        ChoiceGrant::Other
    }
}

/// Merge proficiencies, in order: primary class, race, background, recorded
/// background/race choices, feats
///
/// Only the first class contributes baseline class proficiencies.
pub fn compute_proficiencies(
    state: &CharacterState,
    data: &GameData,
) -> Result<Proficiencies, ComputeError> {
    let mut profs = Proficiencies::default();

    if let Some(primary) = state.primary_class() {
        let class = data.class(&primary.class)?;
        profs.merge(&class.proficiencies);

        let prefix = format!("{}-", primary.class);
        let skill_choices = state.feature_choices.iter().filter(|c| {
            c.source == SourceKind::Class
                && c.feature_id.starts_with(&prefix)
                && classify(c) == ChoiceGrant::Skill
        });
        for choice in skill_choices {
            extend_unique(&mut profs.skills, choice.chosen.values());
        }
    }

    let race = data.race(&state.race)?;
    profs.merge(&race.proficiencies);
    if let Some(subrace) = data.subrace(race, state.subrace.as_deref()) {
        profs.merge(&subrace.proficiencies);
    }

    let background = data.background(&state.background)?;
    extend_unique(&mut profs.skills, &background.proficiencies.skills);
    extend_unique(&mut profs.tools, &background.proficiencies.tools);
    extend_unique(&mut profs.languages, &background.proficiencies.languages);

    let origin_choices = state.feature_choices.iter().filter(|c| {
        matches!(
            c.source,
            SourceKind::Background | SourceKind::Race | SourceKind::Subrace
        )
    });
    for choice in origin_choices {
        let values = choice.chosen.values();
        match classify(choice) {
            ChoiceGrant::Language => extend_unique(&mut profs.languages, values),
            ChoiceGrant::Tool => extend_unique(&mut profs.tools, values),
            ChoiceGrant::Skill => extend_unique(&mut profs.skills, values),
            ChoiceGrant::Expertise | ChoiceGrant::Other => {}
        }
    }

    for key in &state.feats {
        let feat = data.feat(key)?;
        profs.merge(&feat.proficiencies);
    }

    for choice in &state.feature_choices {
        if classify(choice) == ChoiceGrant::Expertise {
            extend_unique(&mut profs.expertise, choice.chosen.values());
        }
    }

    Ok(profs)
}
