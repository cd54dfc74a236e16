//! Prelude module for convenient imports
//!
//! ```rust
//! use sheet_core::prelude::*;
//! ```

// Inputs
pub use crate::data::GameData;
pub use crate::state::{CharacterState, Chosen, ClassLevel, FeatureChoice};
pub use crate::types::{Ability, AbilityScores, CasterType, SourceKind};

// Pipeline
pub use crate::resolve::ComputeError;
pub use crate::sheet::{compute_character, compute_character_with, ComputedCharacter};

// Formulas
pub use crate::formula::{Evaluator, FormulaError, FunctionSet};

// Config
pub use crate::config::{default_rules, RulesConfig};
