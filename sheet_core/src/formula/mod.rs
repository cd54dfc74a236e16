//! Sandboxed formula evaluator
//!
//! Formulas are data, not code. An expression string is tokenized, parsed
//! into a tree and walked against a caller-supplied variable map. The only
//! callable names are the allow-listed builtins of a [`FunctionSet`] plus the
//! `lookup(table, key)` primitive, which reads from the caller-supplied
//! tables. Nothing in the language can define functions, evaluate strings,
//! touch the host or draw random numbers.
//!
//! ```rust
//! use sheet_core::formula::{evaluate, Variables};
//!
//! let mut vars = Variables::new();
//! vars.insert("score".to_string(), 15.0);
//! let modifier = evaluate("floor((score - 10) / 2)", &vars, None).unwrap();
//! assert_eq!(modifier, 2.0);
//! ```

mod eval;
mod functions;
mod lexer;
mod parser;

pub use functions::{Arity, Builtin, FunctionSet, LOOKUP};
pub use parser::MAX_DEPTH;

use std::collections::BTreeMap;
use thiserror::Error;

/// Maximum accepted expression length in bytes
pub const MAX_LENGTH: usize = 4096;

/// Largest magnitude an integer formula result may have (2^24)
///
/// Keeps every integer the sheet derives exactly representable and leaves
/// room to sum a handful of them in `i32`.
pub const MAX_INT_MAGNITUDE: i32 = 1 << 24;

/// Variables visible to a formula
pub type Variables = BTreeMap<String, f64>;

/// Named lookup tables visible to a formula
pub type Tables = BTreeMap<String, BTreeMap<String, f64>>;

/// Formula parsing or evaluation failure
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    #[error("syntax error at byte {position}: {message}")]
    Syntax { position: usize, message: String },
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("unknown variable `{0}`")]
    UnknownVariable(String),
    #[error("function `{0}` is not allowed")]
    UnknownFunction(String),
    #[error("function `{function}` expects {expected} argument(s), got {found}")]
    Arity {
        function: String,
        expected: String,
        found: usize,
    },
    #[error("lookup table `{0}` not found")]
    MissingTable(String),
    #[error("key `{key}` not found in lookup table `{table}`")]
    MissingKey { table: String, key: String },
    #[error("string \"{0}\" used where a number is required")]
    StringValue(String),
    #[error("expression nested deeper than {0} levels")]
    TooDeep(usize),
    #[error("expression longer than {0} bytes")]
    TooLong(usize),
    #[error("expression produced a non-finite value")]
    NonFinite,
    #[error("integer result {0} is outside ±{max}", max = MAX_INT_MAGNITUDE)]
    OutOfRange(f64),
}

/// Formula evaluator bound to an immutable function allow-list
///
/// Holds no per-call state, so one instance can be shared freely between
/// threads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluator {
    functions: FunctionSet,
}

impl Evaluator {
    pub fn new(functions: FunctionSet) -> Self {
        Evaluator { functions }
    }

    /// Evaluator with every builtin and `lookup` enabled
    pub fn standard() -> Self {
        Self::new(FunctionSet::standard())
    }

    pub fn functions(&self) -> &FunctionSet {
        &self.functions
    }

    /// Evaluate an expression to a finite number
    pub fn evaluate(
        &self,
        expression: &str,
        variables: &Variables,
        tables: Option<&Tables>,
    ) -> Result<f64, FormulaError> {
        if expression.len() > MAX_LENGTH {
            return Err(FormulaError::TooLong(MAX_LENGTH));
        }
        let tokens = lexer::tokenize(expression)?;
        let tree = parser::parse(&tokens, expression.len())?;
        let context = eval::Context {
            functions: &self.functions,
            variables,
            tables,
        };
        let value = context.number(&tree)?;
        tracing::trace!(expression, value, "evaluated formula");
        Ok(value)
    }

    /// Evaluate and floor the result to an integer within ±[`MAX_INT_MAGNITUDE`]
    pub fn evaluate_int(
        &self,
        expression: &str,
        variables: &Variables,
        tables: Option<&Tables>,
    ) -> Result<i32, FormulaError> {
        let value = self.evaluate(expression, variables, tables)?.floor();
        if value.abs() > f64::from(MAX_INT_MAGNITUDE) {
            return Err(FormulaError::OutOfRange(value));
        }
        Ok(value as i32)
    }
}

/// Evaluate with the standard function set
pub fn evaluate(
    expression: &str,
    variables: &Variables,
    tables: Option<&Tables>,
) -> Result<f64, FormulaError> {
    Evaluator::standard().evaluate(expression, variables, tables)
}

/// Build a variable map from name/value pairs
pub fn variables<'a>(pairs: impl IntoIterator<Item = (&'a str, f64)>) -> Variables {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}
