//! Allow-listed functions callable from formulas

use serde::{Deserialize, Serialize};

/// A function the evaluator knows how to run
///
/// This is a closed set: formulas can only reach behaviour listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Builtin {
    Floor,
    Ceil,
    Round,
    Min,
    Max,
    Abs,
}

/// Number of arguments a builtin accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl std::fmt::Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "{}", n),
            Arity::AtLeast(n) => write!(f, "at least {}", n),
        }
    }
}

impl Builtin {
    pub fn all() -> &'static [Builtin] {
        &[
            Builtin::Floor,
            Builtin::Ceil,
            Builtin::Round,
            Builtin::Min,
            Builtin::Max,
            Builtin::Abs,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Floor => "floor",
            Builtin::Ceil => "ceil",
            Builtin::Round => "round",
            Builtin::Min => "min",
            Builtin::Max => "max",
            Builtin::Abs => "abs",
        }
    }

    pub fn from_name(name: &str) -> Option<Builtin> {
        Builtin::all().iter().copied().find(|b| b.name() == name)
    }

    pub fn arity(self) -> Arity {
        match self {
            Builtin::Min | Builtin::Max => Arity::AtLeast(2),
            Builtin::Floor | Builtin::Ceil | Builtin::Round | Builtin::Abs => Arity::Exactly(1),
        }
    }

    /// Apply to already-evaluated arguments; arity is checked by the caller
    pub(crate) fn apply(self, args: &[f64]) -> f64 {
        match self {
            Builtin::Floor => args[0].floor(),
            Builtin::Ceil => args[0].ceil(),
            Builtin::Round => args[0].round(),
            Builtin::Abs => args[0].abs(),
            Builtin::Min => args.iter().copied().fold(f64::INFINITY, f64::min),
            Builtin::Max => args.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

/// Name of the table lookup primitive
pub const LOOKUP: &str = "lookup";

/// Immutable set of functions a formula may call
///
/// Build one at setup time and share it; there is no way to register
/// arbitrary host functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSet {
    builtins: Vec<Builtin>,
    lookup: bool,
}

impl FunctionSet {
    /// Every builtin plus `lookup`
    pub fn standard() -> Self {
        FunctionSet {
            builtins: Builtin::all().to_vec(),
            lookup: true,
        }
    }

    /// Plain arithmetic only
    pub fn empty() -> Self {
        FunctionSet {
            builtins: Vec::new(),
            lookup: false,
        }
    }

    pub fn with(mut self, builtin: Builtin) -> Self {
        if !self.builtins.contains(&builtin) {
            self.builtins.push(builtin);
        }
        self
    }

    pub fn without(mut self, builtin: Builtin) -> Self {
        self.builtins.retain(|b| *b != builtin);
        self
    }

    pub fn with_lookup(mut self, enabled: bool) -> Self {
        self.lookup = enabled;
        self
    }

    pub fn allows(&self, builtin: Builtin) -> bool {
        self.builtins.contains(&builtin)
    }

    pub fn allows_lookup(&self) -> bool {
        self.lookup
    }
}

impl Default for FunctionSet {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_set() {
        let set = FunctionSet::standard();
        for builtin in Builtin::all() {
            assert!(set.allows(*builtin), "missing {}", builtin.name());
        }
        assert!(set.allows_lookup());
    }

    #[test]
    fn test_with_and_without() {
        let set = FunctionSet::empty().with(Builtin::Floor).with(Builtin::Floor);
        assert!(set.allows(Builtin::Floor));
        assert!(!set.allows(Builtin::Round));

        let set = FunctionSet::standard().without(Builtin::Round).with_lookup(false);
        assert!(!set.allows(Builtin::Round));
        assert!(!set.allows_lookup());
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Builtin::from_name("ceil"), Some(Builtin::Ceil));
        assert_eq!(Builtin::from_name("eval"), None);
        assert_eq!(Builtin::from_name("random"), None);
    }

    #[test]
    fn test_apply() {
        assert!((Builtin::Min.apply(&[3.0, -1.0, 2.0]) - -1.0).abs() < f64::EPSILON);
        assert!((Builtin::Max.apply(&[3.0, -1.0]) - 3.0).abs() < f64::EPSILON);
        assert!((Builtin::Floor.apply(&[-0.5]) - -1.0).abs() < f64::EPSILON);
        assert!(Builtin::Min.arity().accepts(4));
        assert!(!Builtin::Abs.arity().accepts(2));
    }
}
