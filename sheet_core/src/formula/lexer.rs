//! Tokenizer for the formula language

use super::FormulaError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Number(f64),
    Ident(String),
    Str(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Lt,
    Le,
    Gt,
    Ge,
    EqEq,
    NotEq,
    Question,
    Colon,
    Comma,
    LParen,
    RParen,
}

/// A token and the byte offset it starts at
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Spanned {
    pub token: Token,
    pub pos: usize,
}

pub(crate) fn tokenize(input: &str) -> Result<Vec<Spanned>, FormulaError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let start = i;

        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || (c == b'.' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit)) {
            while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                i += 1;
            }
            let text = &input[start..i];
            let value = text.parse::<f64>().map_err(|_| FormulaError::Syntax {
                position: start,
                message: format!("invalid number `{}`", text),
            })?;
            tokens.push(Spanned { token: Token::Number(value), pos: start });
            continue;
        }

        if c.is_ascii_alphabetic() || c == b'_' {
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
            tokens.push(Spanned {
                token: Token::Ident(input[start..i].to_string()),
                pos: start,
            });
            continue;
        }

        if c == b'"' || c == b'\'' {
            i += 1;
            while i < bytes.len() && bytes[i] != c {
                i += 1;
            }
            if i >= bytes.len() {
                return Err(FormulaError::Syntax {
                    position: start,
                    message: "unterminated string literal".to_string(),
                });
            }
            tokens.push(Spanned {
                token: Token::Str(input[start + 1..i].to_string()),
                pos: start,
            });
            i += 1;
            continue;
        }

        let next = bytes.get(i + 1).copied();
        let (token, width) = match (c, next) {
            (b'<', Some(b'=')) => (Token::Le, 2),
            (b'>', Some(b'=')) => (Token::Ge, 2),
            (b'=', Some(b'=')) => (Token::EqEq, 2),
            (b'!', Some(b'=')) => (Token::NotEq, 2),
            (b'<', _) => (Token::Lt, 1),
            (b'>', _) => (Token::Gt, 1),
            (b'+', _) => (Token::Plus, 1),
            (b'-', _) => (Token::Minus, 1),
            (b'*', _) => (Token::Star, 1),
            (b'/', _) => (Token::Slash, 1),
            (b'%', _) => (Token::Percent, 1),
            (b'?', _) => (Token::Question, 1),
            (b':', _) => (Token::Colon, 1),
            (b',', _) => (Token::Comma, 1),
            (b'(', _) => (Token::LParen, 1),
            (b')', _) => (Token::RParen, 1),
            _ => {
                let shown = input[start..].chars().next().unwrap_or('?');
                return Err(FormulaError::Syntax {
                    position: start,
                    message: format!("unexpected character `{}`", shown),
                });
            }
        };
        tokens.push(Spanned { token, pos: start });
        i += width;
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<Token> {
        tokenize(input).unwrap().into_iter().map(|s| s.token).collect()
    }

    #[test]
    fn test_tokenize_arithmetic() {
        assert_eq!(
            kinds("floor((score - 10) / 2)"),
            vec![
                Token::Ident("floor".into()),
                Token::LParen,
                Token::LParen,
                Token::Ident("score".into()),
                Token::Minus,
                Token::Number(10.0),
                Token::RParen,
                Token::Slash,
                Token::Number(2.0),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_tokenize_comparisons_and_strings() {
        assert_eq!(
            kinds("a >= 2 ? lookup('slots', \"5\") : .5"),
            vec![
                Token::Ident("a".into()),
                Token::Ge,
                Token::Number(2.0),
                Token::Question,
                Token::Ident("lookup".into()),
                Token::LParen,
                Token::Str("slots".into()),
                Token::Comma,
                Token::Str("5".into()),
                Token::RParen,
                Token::Colon,
                Token::Number(0.5),
            ]
        );
    }

    #[test]
    fn test_tokenize_rejects_unknown_characters() {
        assert!(matches!(tokenize("a = 1"), Err(FormulaError::Syntax { position: 2, .. })));
        assert!(matches!(tokenize("x; y"), Err(FormulaError::Syntax { .. })));
        assert!(matches!(tokenize("'open"), Err(FormulaError::Syntax { .. })));
    }

    #[test]
    fn test_tokenize_rejects_malformed_number() {
        assert!(matches!(tokenize("1.2.3"), Err(FormulaError::Syntax { position: 0, .. })));
    }
}
