//! Core types shared by content data, character state and computed output

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the six ability axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Ability {
    #[serde(rename = "str", alias = "strength")]
    Strength,
    #[serde(rename = "dex", alias = "dexterity")]
    Dexterity,
    #[serde(rename = "con", alias = "constitution")]
    Constitution,
    #[serde(rename = "int", alias = "intelligence")]
    Intelligence,
    #[serde(rename = "wis", alias = "wisdom")]
    Wisdom,
    #[serde(rename = "cha", alias = "charisma")]
    Charisma,
}

impl Ability {
    /// All abilities in sheet order
    pub fn all() -> &'static [Ability] {
        &[
            Ability::Strength,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Charisma,
        ]
    }

    /// Short key used in data files and choice strings
    pub fn key(self) -> &'static str {
        match self {
            Ability::Strength => "str",
            Ability::Dexterity => "dex",
            Ability::Constitution => "con",
            Ability::Intelligence => "int",
            Ability::Wisdom => "wis",
            Ability::Charisma => "cha",
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error returned when a string names no ability
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown ability `{0}`")]
pub struct UnknownAbility(pub String);

impl FromStr for Ability {
    type Err = UnknownAbility;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "str" | "strength" => Ok(Ability::Strength),
            "dex" | "dexterity" => Ok(Ability::Dexterity),
            "con" | "constitution" => Ok(Ability::Constitution),
            "int" | "intelligence" => Ok(Ability::Intelligence),
            "wis" | "wisdom" => Ok(Ability::Wisdom),
            "cha" | "charisma" => Ok(Ability::Charisma),
            _ => Err(UnknownAbility(s.to_string())),
        }
    }
}

/// A value per ability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilitySet<T> {
    #[serde(rename = "str", alias = "strength")]
    pub strength: T,
    #[serde(rename = "dex", alias = "dexterity")]
    pub dexterity: T,
    #[serde(rename = "con", alias = "constitution")]
    pub constitution: T,
    #[serde(rename = "int", alias = "intelligence")]
    pub intelligence: T,
    #[serde(rename = "wis", alias = "wisdom")]
    pub wisdom: T,
    #[serde(rename = "cha", alias = "charisma")]
    pub charisma: T,
}

/// Ability scores (base or final)
pub type AbilityScores = AbilitySet<i32>;

/// Ability modifiers derived from final scores
pub type AbilityModifiers = AbilitySet<i32>;

impl<T: Copy> AbilitySet<T> {
    /// Same value for every ability
    pub fn splat(value: T) -> Self {
        AbilitySet {
            strength: value,
            dexterity: value,
            constitution: value,
            intelligence: value,
            wisdom: value,
            charisma: value,
        }
    }

    pub fn get(&self, ability: Ability) -> T {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn get_mut(&mut self, ability: Ability) -> &mut T {
        match ability {
            Ability::Strength => &mut self.strength,
            Ability::Dexterity => &mut self.dexterity,
            Ability::Constitution => &mut self.constitution,
            Ability::Intelligence => &mut self.intelligence,
            Ability::Wisdom => &mut self.wisdom,
            Ability::Charisma => &mut self.charisma,
        }
    }

    /// Build a set by computing each ability, stopping at the first error
    pub fn try_from_fn<E>(mut f: impl FnMut(Ability) -> Result<T, E>) -> Result<Self, E> {
        Ok(AbilitySet {
            strength: f(Ability::Strength)?,
            dexterity: f(Ability::Dexterity)?,
            constitution: f(Ability::Constitution)?,
            intelligence: f(Ability::Intelligence)?,
            wisdom: f(Ability::Wisdom)?,
            charisma: f(Ability::Charisma)?,
        })
    }
}

/// Spell slot progression of a spellcasting source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CasterType {
    Full,
    Half,
    Third,
    Pact,
}

impl CasterType {
    /// Key used in `multiclassSpellSlots` tables
    pub fn key(self) -> &'static str {
        match self {
            CasterType::Full => "full",
            CasterType::Half => "half",
            CasterType::Third => "third",
            CasterType::Pact => "pact",
        }
    }

    pub fn all() -> &'static [CasterType] {
        &[CasterType::Full, CasterType::Half, CasterType::Third, CasterType::Pact]
    }
}

impl fmt::Display for CasterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Kind of content a feature or choice originates from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Race,
    Subrace,
    Class,
    Subclass,
    Background,
    Feat,
    #[serde(other)]
    Other,
}

impl SourceKind {
    pub fn key(self) -> &'static str {
        match self {
            SourceKind::Race => "race",
            SourceKind::Subrace => "subrace",
            SourceKind::Class => "class",
            SourceKind::Subclass => "subclass",
            SourceKind::Background => "background",
            SourceKind::Feat => "feat",
            SourceKind::Other => "other",
        }
    }
}

/// Lowercase, hyphen-separated form of a display name used inside feature ids
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// Stable identifier builders shared by feature aggregation and choice matching
pub mod feature_id {
    use super::slugify;

    /// `{classKey}-{level}-{featureName}`, also used for subclass features
    pub fn leveled(owner_key: &str, level: u32, name: &str) -> String {
        format!("{}-{}-{}", owner_key, level, slugify(name))
    }

    /// `{kind}-{key}-{traitName}` for unleveled race, subrace and background features
    pub fn unleveled(kind: &str, key: &str, name: &str) -> String {
        format!("{}-{}-{}", kind, key, slugify(name))
    }

    /// `feat-{featKey}`
    pub fn feat(feat_key: &str) -> String {
        format!("feat-{}", feat_key)
    }

    /// `feat-{featKey}-ability`, the choice that records a feat's ability increase
    pub fn feat_ability(feat_key: &str) -> String {
        format!("feat-{}-ability", feat_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ability_from_str() {
        assert_eq!("dex".parse::<Ability>().unwrap(), Ability::Dexterity);
        assert_eq!("Wisdom".parse::<Ability>().unwrap(), Ability::Wisdom);
        assert!("luck".parse::<Ability>().is_err());
    }

    #[test]
    fn test_ability_set_serializes_short_keys() {
        let scores = AbilityScores {
            strength: 10,
            dexterity: 14,
            constitution: 12,
            intelligence: 8,
            wisdom: 13,
            charisma: 10,
        };
        let json = serde_json::to_value(scores).unwrap();
        assert_eq!(json["dex"], 14);

        let back: AbilityScores = serde_json::from_value(json).unwrap();
        assert_eq!(back.get(Ability::Intelligence), 8);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Ability Score Improvement"), "ability-score-improvement");
        assert_eq!(slugify("  Fey   Ancestry! "), "fey-ancestry");
        assert_eq!(slugify("Action Surge (one use)"), "action-surge-one-use");
    }

    #[test]
    fn test_feature_ids() {
        assert_eq!(
            feature_id::leveled("fighter", 4, "Ability Score Improvement"),
            "fighter-4-ability-score-improvement"
        );
        assert_eq!(feature_id::unleveled("race", "elf", "Darkvision"), "race-elf-darkvision");
        assert_eq!(feature_id::feat_ability("resilient"), "feat-resilient-ability");
    }
}
