//! Tree-walking evaluation of parsed formulas

use super::functions::{Arity, Builtin, FunctionSet, LOOKUP};
use super::parser::{BinaryOp, Expr};
use super::{FormulaError, Tables, Variables};

pub(crate) struct Context<'a> {
    pub functions: &'a FunctionSet,
    pub variables: &'a Variables,
    pub tables: Option<&'a Tables>,
}

fn finite(value: f64) -> Result<f64, FormulaError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FormulaError::NonFinite)
    }
}

fn truth(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Render a numeric lookup key the way table keys are written (`5`, not `5.0`)
fn key_text(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

impl Context<'_> {
    pub fn number(&self, expr: &Expr) -> Result<f64, FormulaError> {
        let value = match expr {
            Expr::Number(n) => *n,
            Expr::Str(s) => return Err(FormulaError::StringValue(s.clone())),
            Expr::Var(name) => *self
                .variables
                .get(name)
                .ok_or_else(|| FormulaError::UnknownVariable(name.clone()))?,
            Expr::Neg(inner) => -self.number(inner)?,
            Expr::Binary(op, lhs, rhs) => {
                let a = self.number(lhs)?;
                let b = self.number(rhs)?;
                match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Div => a / b,
                    BinaryOp::Rem => a % b,
                    BinaryOp::Lt => truth(a < b),
                    BinaryOp::Le => truth(a <= b),
                    BinaryOp::Gt => truth(a > b),
                    BinaryOp::Ge => truth(a >= b),
                    BinaryOp::Eq => truth(a == b),
                    BinaryOp::Ne => truth(a != b),
                }
            }
            Expr::Conditional(condition, then, otherwise) => {
                if self.number(condition)? != 0.0 {
                    self.number(then)?
                } else {
                    self.number(otherwise)?
                }
            }
            Expr::Call(name, args) => self.call(name, args)?,
        };
        finite(value)
    }

    fn call(&self, name: &str, args: &[Expr]) -> Result<f64, FormulaError> {
        if name == LOOKUP {
            if !self.functions.allows_lookup() {
                return Err(FormulaError::UnknownFunction(name.to_string()));
            }
            return self.lookup(args);
        }

        let builtin = Builtin::from_name(name)
            .filter(|b| self.functions.allows(*b))
            .ok_or_else(|| FormulaError::UnknownFunction(name.to_string()))?;

        let arity = builtin.arity();
        if !arity.accepts(args.len()) {
            return Err(FormulaError::Arity {
                function: name.to_string(),
                expected: arity.to_string(),
                found: args.len(),
            });
        }

        let values = args
            .iter()
            .map(|arg| self.number(arg))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(builtin.apply(&values))
    }

    fn lookup(&self, args: &[Expr]) -> Result<f64, FormulaError> {
        if args.len() != 2 {
            return Err(FormulaError::Arity {
                function: LOOKUP.to_string(),
                expected: Arity::Exactly(2).to_string(),
                found: args.len(),
            });
        }

        // A bare identifier in table position names the table itself.
        let table_name = match &args[0] {
            Expr::Str(name) | Expr::Var(name) => name.clone(),
            other => {
                return Err(FormulaError::Syntax {
                    position: 0,
                    message: format!("lookup table must be a name, found {:?}", other),
                })
            }
        };
        let key = match &args[1] {
            Expr::Str(key) => key.clone(),
            other => key_text(self.number(other)?),
        };

        let table = self
            .tables
            .and_then(|tables| tables.get(&table_name))
            .ok_or_else(|| FormulaError::MissingTable(table_name.clone()))?;
        table
            .get(&key)
            .copied()
            .ok_or(FormulaError::MissingKey {
                table: table_name,
                key,
            })
    }
}
