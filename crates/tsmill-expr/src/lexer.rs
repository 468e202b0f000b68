//! Tokenizer for the expression grammar.

use std::fmt;

use crate::error::ExprError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    /// `**` or `^`.
    Power,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "number {v}"),
            Self::Ident(name) => write!(f, "identifier {name:?}"),
            Self::Plus => f.write_str("'+'"),
            Self::Minus => f.write_str("'-'"),
            Self::Star => f.write_str("'*'"),
            Self::Slash => f.write_str("'/'"),
            Self::Percent => f.write_str("'%'"),
            Self::Power => f.write_str("'**'"),
            Self::LParen => f.write_str("'('"),
            Self::RParen => f.write_str("')'"),
            Self::LBracket => f.write_str("'['"),
            Self::RBracket => f.write_str("']'"),
            Self::Comma => f.write_str("','"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character.
    pub position: usize,
}

/// Split `src` into tokens, skipping whitespace.
pub(crate) fn tokenize(src: &str) -> Result<Vec<Token>, ExprError> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while let Some(ch) = src[i..].chars().next() {
        let start = i;
        let kind = match ch {
            c if c.is_whitespace() => {
                i += c.len_utf8();
                continue;
            }
            '0'..='9' | '.' => {
                let end = scan_number(bytes, i);
                if end == i {
                    return Err(ExprError::UnexpectedChar { ch, position: i });
                }
                let text = &src[i..end];
                let value = text.parse::<f64>().map_err(|_| ExprError::InvalidNumber {
                    text: text.to_string(),
                    position: i,
                })?;
                i = end;
                TokenKind::Number(value)
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let end = bytes[i..]
                    .iter()
                    .position(|b| !(b.is_ascii_alphanumeric() || *b == b'_'))
                    .map_or(bytes.len(), |p| i + p);
                let name = src[i..end].to_string();
                i = end;
                TokenKind::Ident(name)
            }
            '*' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                TokenKind::Power
            }
            _ => {
                let kind = match ch {
                    '+' => TokenKind::Plus,
                    '-' => TokenKind::Minus,
                    '*' => TokenKind::Star,
                    '/' => TokenKind::Slash,
                    '%' => TokenKind::Percent,
                    '^' => TokenKind::Power,
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    '[' => TokenKind::LBracket,
                    ']' => TokenKind::RBracket,
                    ',' => TokenKind::Comma,
                    other => return Err(ExprError::UnexpectedChar { ch: other, position: i }),
                };
                i += 1;
                kind
            }
        };
        tokens.push(Token {
            kind,
            position: start,
        });
    }

    Ok(tokens)
}

/// Return the end of the numeric literal starting at `start`, or `start` if
/// there is none. Accepts `1`, `2.5`, `5.`, `.5` and an optional exponent;
/// an `e` not followed by digits is left for the next token.
fn scan_number(bytes: &[u8], start: usize) -> usize {
    let digits_from = |mut j: usize| {
        while bytes.get(j).is_some_and(u8::is_ascii_digit) {
            j += 1;
        }
        j
    };

    let int_end = digits_from(start);
    let mut end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if int_end == start && frac_end == end + 1 {
            // a lone '.'
            return start;
        }
        end = frac_end;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut j = end + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_end = digits_from(j);
        if exp_end > j {
            end = exp_end;
        }
    }
    end
}
