//! RaceSource / SubraceSource - Fixed racial ability bonuses

use crate::data::{Race, Subrace};
use crate::resolve::ComputeError;
use crate::source::{AbilityAccumulator, AbilitySource};

/// Bonuses declared on the selected race
pub struct RaceSource<'a> {
    pub race: &'a Race,
}

impl AbilitySource for RaceSource<'_> {
    fn id(&self) -> &str {
        "race"
    }

    fn priority(&self) -> i32 {
        -100 // Race applies first
    }

    fn apply(&self, scores: &mut AbilityAccumulator) -> Result<(), ComputeError> {
        for (ability, amount) in &self.race.ability_bonuses {
            scores.add(self.id(), *ability, *amount)?;
        }
        Ok(())
    }
}

/// Bonuses declared on the selected subrace
pub struct SubraceSource<'a> {
    pub subrace: &'a Subrace,
}

impl AbilitySource for SubraceSource<'_> {
    fn id(&self) -> &str {
        "subrace"
    }

    fn priority(&self) -> i32 {
        -50
    }

    fn apply(&self, scores: &mut AbilityAccumulator) -> Result<(), ComputeError> {
        for (ability, amount) in &self.subrace.ability_bonuses {
            scores.add(self.id(), *ability, *amount)?;
        }
        Ok(())
    }
}
