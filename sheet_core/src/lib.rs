//! sheet_core - Character sheet computation for tabletop role-playing games
//!
//! This library provides:
//! - CharacterState: The persisted, user-owned selections and session values
//! - GameData: Read-only races, classes, backgrounds, feats, spells, items and rules
//! - Evaluator: A sandboxed arithmetic formula language with table lookups
//! - compute_character: The pipeline that derives a ComputedCharacter

pub mod config;
pub mod data;
pub mod formula;
pub mod prelude;
pub mod resolve;
pub mod sheet;
pub mod source;
pub mod state;
pub mod types;

// Re-export core types for convenience
pub use config::{default_rules, ConfigError, RulesConfig};
pub use data::{DataIntegrityError, GameData};
pub use formula::{evaluate, Evaluator, FormulaError, FunctionSet};
pub use resolve::ComputeError;
pub use sheet::{compute_character, compute_character_with, ComputedCharacter};
pub use source::{AbilityAccumulator, AbilitySource};
pub use state::{CharacterState, ClassLevel, FeatureChoice};
pub use types::{Ability, AbilityScores, CasterType, SourceKind};
