//! Recursive-descent parser producing an expression tree
//!
//! Precedence, lowest first:
//! ternary `?:` (right associative), equality, comparison, additive,
//! multiplicative, unary sign, primary.

use super::lexer::{Spanned, Token};
use super::FormulaError;

/// Maximum nesting of sub-expressions accepted by the parser
pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    Number(f64),
    Str(String),
    Var(String),
    Neg(Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Conditional(Box<Expr>, Box<Expr>, Box<Expr>),
    Call(String, Vec<Expr>),
}

pub(crate) fn parse(tokens: &[Spanned], source_len: usize) -> Result<Expr, FormulaError> {
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        source_len,
    };
    let expr = parser.ternary()?;
    match parser.peek() {
        None => Ok(expr),
        Some(spanned) => Err(FormulaError::Syntax {
            position: spanned.pos,
            message: format!("unexpected {:?} after expression", spanned.token),
        }),
    }
}

struct Parser<'t> {
    tokens: &'t [Spanned],
    pos: usize,
    depth: usize,
    source_len: usize,
}

impl<'t> Parser<'t> {
    fn peek(&self) -> Option<&'t Spanned> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Result<&'t Spanned, FormulaError> {
        let spanned = self.tokens.get(self.pos).ok_or(FormulaError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(spanned)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek().is_some_and(|s| &s.token == token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token) -> Result<(), FormulaError> {
        match self.peek() {
            Some(s) if s.token == token => {
                self.pos += 1;
                Ok(())
            }
            Some(s) => Err(FormulaError::Syntax {
                position: s.pos,
                message: format!("expected {:?}, found {:?}", token, s.token),
            }),
            None => Err(FormulaError::Syntax {
                position: self.source_len,
                message: format!("expected {:?} at end of input", token),
            }),
        }
    }

    fn enter(&mut self) -> Result<(), FormulaError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(FormulaError::TooDeep(MAX_DEPTH));
        }
        Ok(())
    }

    fn ternary(&mut self) -> Result<Expr, FormulaError> {
        self.enter()?;
        let condition = self.equality()?;
        let expr = if self.eat(&Token::Question) {
            let then = self.ternary()?;
            self.expect(Token::Colon)?;
            let otherwise = self.ternary()?;
            Expr::Conditional(Box::new(condition), Box::new(then), Box::new(otherwise))
        } else {
            condition
        };
        self.depth -= 1;
        Ok(expr)
    }

    /// Left-associative chain of `next` operands joined by operators `op_of` accepts
    ///
    /// Every operator nests the tree one level deeper and counts against
    /// [`MAX_DEPTH`] like a parenthesis would.
    fn chain(
        &mut self,
        next: fn(&mut Self) -> Result<Expr, FormulaError>,
        op_of: fn(&Token) -> Option<BinaryOp>,
    ) -> Result<Expr, FormulaError> {
        let mut lhs = next(self)?;
        let mut nested = 0;
        while let Some(op) = self.peek().and_then(|s| op_of(&s.token)) {
            self.pos += 1;
            self.enter()?;
            nested += 1;
            let rhs = next(self)?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        self.depth -= nested;
        Ok(lhs)
    }

    fn equality(&mut self) -> Result<Expr, FormulaError> {
        self.chain(Self::comparison, |token| match token {
            Token::EqEq => Some(BinaryOp::Eq),
            Token::NotEq => Some(BinaryOp::Ne),
            _ => None,
        })
    }

    fn comparison(&mut self) -> Result<Expr, FormulaError> {
        self.chain(Self::additive, |token| match token {
            Token::Lt => Some(BinaryOp::Lt),
            Token::Le => Some(BinaryOp::Le),
            Token::Gt => Some(BinaryOp::Gt),
            Token::Ge => Some(BinaryOp::Ge),
            _ => None,
        })
    }

    fn additive(&mut self) -> Result<Expr, FormulaError> {
        self.chain(Self::multiplicative, |token| match token {
            Token::Plus => Some(BinaryOp::Add),
            Token::Minus => Some(BinaryOp::Sub),
            _ => None,
        })
    }

    fn multiplicative(&mut self) -> Result<Expr, FormulaError> {
        self.chain(Self::unary, |token| match token {
            Token::Star => Some(BinaryOp::Mul),
            Token::Slash => Some(BinaryOp::Div),
            Token::Percent => Some(BinaryOp::Rem),
            _ => None,
        })
    }

    fn unary(&mut self) -> Result<Expr, FormulaError> {
        self.enter()?;
        let expr = if self.eat(&Token::Minus) {
            Expr::Neg(Box::new(self.unary()?))
        } else if self.eat(&Token::Plus) {
            self.unary()?
        } else {
            self.primary()?
        };
        self.depth -= 1;
        Ok(expr)
    }

    fn primary(&mut self) -> Result<Expr, FormulaError> {
        let spanned = self.next()?;
        match &spanned.token {
            Token::Number(n) => Ok(Expr::Number(*n)),
            Token::Str(s) => Ok(Expr::Str(s.clone())),
            Token::LParen => {
                let inner = self.ternary()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Token::Ident(name) => {
                if self.eat(&Token::LParen) {
                    let args = self.arguments()?;
                    Ok(Expr::Call(name.clone(), args))
                } else {
                    Ok(Expr::Var(name.clone()))
                }
            }
            other => Err(FormulaError::Syntax {
                position: spanned.pos,
                message: format!("unexpected {:?}", other),
            }),
        }
    }

    fn arguments(&mut self) -> Result<Vec<Expr>, FormulaError> {
        let mut args = Vec::new();
        if self.eat(&Token::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.ternary()?);
            if self.eat(&Token::Comma) {
                continue;
            }
            self.expect(Token::RParen)?;
            return Ok(args);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::lexer::tokenize;
    use super::*;

    fn parse_str(input: &str) -> Result<Expr, FormulaError> {
        parse(&tokenize(input)?, input.len())
    }

    #[test]
    fn test_precedence() {
        let expr = parse_str("1 + 2 * 3").unwrap();
        assert_eq!(
            expr,
            Expr::Binary(
                BinaryOp::Add,
                Box::new(Expr::Number(1.0)),
                Box::new(Expr::Binary(
                    BinaryOp::Mul,
                    Box::new(Expr::Number(2.0)),
                    Box::new(Expr::Number(3.0))
                ))
            )
        );
    }

    #[test]
    fn test_ternary_is_right_associative() {
        let expr = parse_str("a ? 1 : b ? 2 : 3").unwrap();
        match expr {
            Expr::Conditional(_, _, otherwise) => {
                assert!(matches!(*otherwise, Expr::Conditional(..)));
            }
            other => panic!("expected conditional, got {:?}", other),
        }
    }

    #[test]
    fn test_call_arguments() {
        let expr = parse_str("max(1, x, 3)").unwrap();
        match expr {
            Expr::Call(name, args) => {
                assert_eq!(name, "max");
                assert_eq!(args.len(), 3);
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_syntax_errors() {
        assert!(matches!(parse_str("1 +"), Err(FormulaError::UnexpectedEnd)));
        assert!(matches!(parse_str("(1 + 2"), Err(FormulaError::Syntax { .. })));
        assert!(matches!(parse_str("1 2"), Err(FormulaError::Syntax { position: 2, .. })));
        assert!(matches!(parse_str("a ? 1"), Err(FormulaError::Syntax { .. })));
        assert!(matches!(parse_str(""), Err(FormulaError::UnexpectedEnd)));
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}1{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert!(matches!(parse_str(&deep), Err(FormulaError::TooDeep(_))));

        let negations = format!("{}1", "-".repeat(MAX_DEPTH + 1));
        assert!(matches!(parse_str(&negations), Err(FormulaError::TooDeep(_))));

        let shallow = format!("{}1{}", "(".repeat(10), ")".repeat(10));
        assert!(parse_str(&shallow).is_ok());
    }

    #[test]
    fn test_operator_chains_count_toward_nesting() {
        let sum = format!("{}1", "1+".repeat(40));
        assert!(parse_str(&sum).is_ok());

        for op in ["+", "*", "<", "=="] {
            let chain = format!("{}1", format!("1{}", op).repeat(MAX_DEPTH + 1));
            assert_eq!(parse_str(&chain), Err(FormulaError::TooDeep(MAX_DEPTH)));
        }
    }
}
