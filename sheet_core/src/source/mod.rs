//! AbilitySource - Trait and implementations for ability score bonus providers

mod accumulator;
mod feat;
mod improvement;
mod race;

pub use accumulator::{AbilityAccumulator, AbilityBonus, ABILITY_SCORE_CAP};
pub use feat::FeatSource;
pub use improvement::{parse_ability_increase, ImprovementSource};
pub use race::{RaceSource, SubraceSource};

use crate::resolve::ComputeError;

/// Anything that contributes ability score bonuses
pub trait AbilitySource {
    /// Short name of the source kind, traced as each source is applied
    fn id(&self) -> &str;

    /// Application order (higher = applied later)
    /// - Race: -100
    /// - Subrace: -50
    /// - Class improvements: 100
    /// - Feats: 200
    fn priority(&self) -> i32 {
        0
    }

    /// Add this source's bonuses to the accumulator
    fn apply(&self, scores: &mut AbilityAccumulator) -> Result<(), ComputeError>;
}
