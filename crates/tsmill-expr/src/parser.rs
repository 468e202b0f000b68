//! Recursive-descent parser from tokens to [`Expr`].
//!
//! Precedence, loosest first:
//!
//! | Level | Operators | Associativity |
//! |---|---|---|
//! | additive | `+ -` | left |
//! | multiplicative | `* / %` | left |
//! | unary | prefix `+ -` | right |
//! | power | `**` `^` | right |
//!
//! Power binds tighter than unary minus, so `-2**2` is `-4`, while the
//! exponent itself may carry a sign (`2**-1`).
//!
//! Both the parser's recursion and the height of the tree it builds are
//! capped at [`MAX_DEPTH`], so evaluating a parsed tree never recurses deeper
//! than that either.

use crate::ast::{BinaryOp, ColumnRef, Expr};
use crate::error::ExprError;
use crate::function::{constant, Function};
use crate::lexer::{Token, TokenKind};

/// Offsets beyond this cannot be represented exactly in an `f64`.
const MAX_OFFSET: f64 = 9_007_199_254_740_992.0;

/// Deepest nesting accepted, in parser recursion levels and in tree height.
pub(crate) const MAX_DEPTH: usize = 256;

/// Names the parser treats as placeholders.
#[derive(Debug, Clone)]
pub(crate) struct Placeholders {
    pub variable: String,
    pub time: String,
}

pub(crate) struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    names: &'a Placeholders,
    depth: usize,
}

/// A subtree together with its height; leaves have height 1.
struct Node {
    expr: Expr,
    height: usize,
}

impl Node {
    fn leaf(expr: Expr) -> Self {
        Self { expr, height: 1 }
    }

    fn over(expr: Expr, tallest_child: usize) -> Result<Self, ExprError> {
        let height = tallest_child + 1;
        if height > MAX_DEPTH {
            return Err(ExprError::NestingTooDeep { limit: MAX_DEPTH });
        }
        Ok(Self { expr, height })
    }
}

impl<'a> Parser<'a> {
    pub(crate) fn new(tokens: &'a [Token], names: &'a Placeholders) -> Self {
        Self {
            tokens,
            pos: 0,
            names,
            depth: 0,
        }
    }

    /// Parse the whole token stream as one expression.
    pub(crate) fn parse(mut self) -> Result<Expr, ExprError> {
        if self.tokens.is_empty() {
            return Err(ExprError::EmptyExpression);
        }
        let node = self.additive()?;
        match self.next() {
            Some(tok) => Err(unexpected(tok)),
            None => Ok(node.expr),
        }
    }

    fn peek(&self) -> Option<&'a TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let tok = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(tok)
    }

    fn additive(&mut self) -> Result<Node, ExprError> {
        let mut lhs = self.multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(TokenKind::Plus) => BinaryOp::Add,
                Some(TokenKind::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.multiplicative()?;
            lhs = binary(op, lhs, rhs)?;
        }
    }

    fn multiplicative(&mut self) -> Result<Node, ExprError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(TokenKind::Star) => BinaryOp::Mul,
                Some(TokenKind::Slash) => BinaryOp::Div,
                Some(TokenKind::Percent) => BinaryOp::Rem,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = binary(op, lhs, rhs)?;
        }
    }

    /// Every recursive path (parentheses, brackets, call arguments, prefix
    /// signs, exponents) passes through here, so the depth is counted once.
    fn unary(&mut self) -> Result<Node, ExprError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ExprError::NestingTooDeep { limit: MAX_DEPTH });
        }
        let node = self.signed();
        self.depth -= 1;
        node
    }

    fn signed(&mut self) -> Result<Node, ExprError> {
        match self.peek() {
            Some(TokenKind::Minus) => {
                self.pos += 1;
                let operand = self.unary()?;
                let height = operand.height;
                Node::over(Expr::Neg(Box::new(operand.expr)), height)
            }
            Some(TokenKind::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Node, ExprError> {
        let base = self.primary()?;
        if self.peek() == Some(&TokenKind::Power) {
            self.pos += 1;
            let exponent = self.unary()?;
            return binary(BinaryOp::Pow, base, exponent);
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Node, ExprError> {
        let tok = self.next().ok_or(ExprError::UnexpectedEnd)?;
        match &tok.kind {
            TokenKind::Number(v) => Ok(Node::leaf(Expr::Literal(*v))),
            TokenKind::Ident(name) => self.identifier(name, tok.position),
            TokenKind::LParen => {
                let inner = self.additive()?;
                self.close(&TokenKind::RParen, '(', tok.position)?;
                Ok(inner)
            }
            _ => Err(unexpected(tok)),
        }
    }

    fn identifier(&mut self, name: &str, position: usize) -> Result<Node, ExprError> {
        if self.peek() == Some(&TokenKind::LParen) {
            return self.call(name, position);
        }
        if name == self.names.time {
            return Ok(Node::leaf(Expr::Time));
        }
        if let Some(column) = self.column_ref(name) {
            if self.peek() != Some(&TokenKind::LBracket) {
                return Ok(Node::leaf(Expr::Current(column)));
            }
            let open = self.next().map_or(position, |t| t.position);
            let index = self.additive()?;
            self.close(&TokenKind::RBracket, '[', open)?;
            let offset = time_offset(&index.expr, open)?;
            return Ok(Node::leaf(Expr::Shifted { column, offset }));
        }
        if let Some(value) = constant(name) {
            return Ok(Node::leaf(Expr::Literal(value)));
        }
        Err(ExprError::UnknownIdentifier {
            name: name.to_string(),
            position,
        })
    }

    /// Parse `name(arg, ...)`; the current token is the `(`.
    fn call(&mut self, name: &str, position: usize) -> Result<Node, ExprError> {
        let function = Function::from_name(name).ok_or_else(|| ExprError::UnknownFunction {
            name: name.to_string(),
            position,
        })?;
        let open = self.next().map_or(position, |t| t.position);

        let mut args = Vec::new();
        let mut tallest = 0;
        if self.peek() == Some(&TokenKind::RParen) {
            self.pos += 1;
        } else {
            loop {
                let arg = self.additive()?;
                tallest = tallest.max(arg.height);
                args.push(arg.expr);
                match self.next() {
                    Some(Token {
                        kind: TokenKind::Comma,
                        ..
                    }) => {}
                    Some(Token {
                        kind: TokenKind::RParen,
                        ..
                    }) => break,
                    Some(tok) => return Err(unexpected(tok)),
                    None => {
                        return Err(ExprError::UnclosedDelimiter {
                            delimiter: '(',
                            position: open,
                        });
                    }
                }
            }
        }

        if !function.arity().accepts(args.len()) {
            return Err(ExprError::WrongArity {
                function: function.name(),
                expected: function.arity(),
                got: args.len(),
            });
        }
        Node::over(Expr::Call { function, args }, tallest)
    }

    /// Resolve the bare or numbered variable.
    fn column_ref(&self, name: &str) -> Option<ColumnRef> {
        if name == self.names.variable {
            return Some(ColumnRef::Implicit);
        }
        let digits = name.strip_prefix(self.names.variable.as_str())?;
        if digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let number: usize = digits.parse().ok()?;
        Some(ColumnRef::Position(number - 1))
    }

    fn close(&mut self, expected: &TokenKind, opener: char, open: usize) -> Result<(), ExprError> {
        match self.next() {
            Some(tok) if &tok.kind == expected => Ok(()),
            Some(tok) => Err(unexpected(tok)),
            None => Err(ExprError::UnclosedDelimiter {
                delimiter: opener,
                position: open,
            }),
        }
    }
}

fn binary(op: BinaryOp, lhs: Node, rhs: Node) -> Result<Node, ExprError> {
    let tallest = lhs.height.max(rhs.height);
    let expr = Expr::Binary {
        op,
        lhs: Box::new(lhs.expr),
        rhs: Box::new(rhs.expr),
    };
    Node::over(expr, tallest)
}

fn unexpected(tok: &Token) -> ExprError {
    match tok.kind {
        TokenKind::RParen => ExprError::UnmatchedDelimiter {
            delimiter: ')',
            position: tok.position,
        },
        TokenKind::RBracket => ExprError::UnmatchedDelimiter {
            delimiter: ']',
            position: tok.position,
        },
        _ => ExprError::UnexpectedToken {
            found: tok.kind.to_string(),
            position: tok.position,
        },
    }
}

/// Turn a bracket index into an integer row offset.
fn time_offset(index: &Expr, position: usize) -> Result<i64, ExprError> {
    match index.linear_in_time() {
        Some((coef, k)) if coef == 1.0 && k.fract() == 0.0 && k.abs() <= MAX_OFFSET => {
            Ok(k as i64)
        }
        _ => Err(ExprError::InvalidTimeIndex { position }),
    }
}
