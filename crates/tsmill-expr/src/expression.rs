//! Parsed expressions and their evaluation over a [`TimeSeries`].

use std::fmt;
use std::str::FromStr;

use tracing::{debug, instrument};
use tsmill_series::{Column, TimeSeries};

use crate::ast::{ColumnRef, Expr, Frame};
use crate::error::ExprError;
use crate::function::{constant, Function};
use crate::lexer::tokenize;
use crate::parser::{Parser, Placeholders};

/// Name of the single column produced by expressions with numbered references.
pub const DERIVED_COLUMN: &str = "_";

/// How an expression is driven over the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Uses bracketed row offsets or the time placeholder; evaluated row by
    /// row, and a row whose offset falls outside the series becomes NaN.
    TimeIndexed,
    /// Uses only numbered columns at the current row.
    ColumnIndexed,
    /// Uses the bare variable or no variable at all, applied to each input
    /// column in turn.
    Plain,
}

/// Builder for [`Expression`] with custom placeholder names.
///
/// # Defaults
///
/// | Placeholder | Default |
/// |-------------|---------|
/// | `variable`  | `x`     |
/// | `time`      | `t`     |
#[derive(Debug, Clone)]
pub struct ExpressionBuilder {
    variable: String,
    time: String,
}

impl Default for ExpressionBuilder {
    fn default() -> Self {
        Self {
            variable: "x".to_string(),
            time: "t".to_string(),
        }
    }
}

impl ExpressionBuilder {
    /// Set the token that names the column value (`x`, `x1`, `x2`, ...).
    #[must_use]
    pub fn variable(mut self, name: impl Into<String>) -> Self {
        self.variable = name.into();
        self
    }

    /// Set the token that names the current row inside brackets.
    #[must_use]
    pub fn time(mut self, name: impl Into<String>) -> Self {
        self.time = name.into();
        self
    }

    /// Parse `src` with these placeholders.
    ///
    /// # Errors
    ///
    /// [`ExprError::InvalidPlaceholder`] for unusable placeholder names, or
    /// any syntax error from the expression itself.
    pub fn parse(&self, src: &str) -> Result<Expression, ExprError> {
        check_placeholder(&self.variable)?;
        check_placeholder(&self.time)?;
        if self.variable == self.time {
            return Err(ExprError::InvalidPlaceholder {
                name: self.time.clone(),
                reason: "variable and time placeholders must differ",
            });
        }
        if self
            .time
            .strip_prefix(self.variable.as_str())
            .is_some_and(|rest| rest.bytes().all(|b| b.is_ascii_digit()))
        {
            return Err(ExprError::InvalidPlaceholder {
                name: self.time.clone(),
                reason: "time placeholder reads as a numbered column",
            });
        }

        let names = Placeholders {
            variable: self.variable.clone(),
            time: self.time.clone(),
        };
        let tokens = tokenize(src)?;
        let root = Parser::new(&tokens, &names).parse()?;
        Expression::analyse(src, root)
    }
}

fn check_placeholder(name: &str) -> Result<(), ExprError> {
    let mut chars = name.chars();
    let is_ident = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    let reason = if !is_ident {
        "not an identifier"
    } else if Function::from_name(name).is_some() {
        "collides with a function name"
    } else if constant(name).is_some() {
        "collides with a constant name"
    } else {
        return Ok(());
    };
    Err(ExprError::InvalidPlaceholder {
        name: name.to_string(),
        reason,
    })
}

/// A validated expression ready to run against any [`TimeSeries`].
///
/// ```
/// use tsmill_expr::Expression;
///
/// let expr = Expression::parse("x[t] + x[t-1]").unwrap();
/// assert_eq!(expr.to_string(), "x[t] + x[t-1]");
/// ```
#[derive(Debug, Clone)]
pub struct Expression {
    source: String,
    root: Expr,
    shape: Shape,
    /// Highest zero-based numbered column referenced, if any.
    max_position: Option<usize>,
}

impl Expression {
    /// Parse with the default placeholders `x` and `t`.
    ///
    /// # Errors
    ///
    /// Any syntax error, or [`ExprError::MixedColumnReferences`].
    pub fn parse(src: &str) -> Result<Self, ExprError> {
        Self::builder().parse(src)
    }

    /// Start a builder for custom placeholder names.
    #[must_use]
    pub fn builder() -> ExpressionBuilder {
        ExpressionBuilder::default()
    }

    /// The expression as written.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// How the expression addresses its input, which decides the output columns.
    #[must_use]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Number of input columns the expression needs, if it uses numbered columns.
    #[must_use]
    pub fn required_columns(&self) -> Option<usize> {
        self.max_position.map(|p| p + 1)
    }

    fn analyse(src: &str, root: Expr) -> Result<Self, ExprError> {
        let mut implicit = false;
        let mut time_indexed = false;
        let mut max_position: Option<usize> = None;

        root.walk(&mut |node| {
            let column = match node {
                Expr::Time => {
                    time_indexed = true;
                    None
                }
                Expr::Shifted { column, .. } => {
                    time_indexed = true;
                    Some(*column)
                }
                Expr::Current(column) => Some(*column),
                _ => None,
            };
            match column {
                Some(ColumnRef::Implicit) => implicit = true,
                Some(ColumnRef::Position(p)) => {
                    max_position = Some(max_position.map_or(p, |m| m.max(p)));
                }
                None => {}
            }
        });

        if implicit && max_position.is_some() {
            return Err(ExprError::MixedColumnReferences);
        }
        let shape = if time_indexed {
            Shape::TimeIndexed
        } else if max_position.is_some() {
            Shape::ColumnIndexed
        } else {
            Shape::Plain
        };

        Ok(Self {
            source: src.to_string(),
            root,
            shape,
            max_position,
        })
    }

    /// Evaluate against `series`, returning a series on the same index.
    ///
    /// Expressions with numbered columns produce one column named
    /// [`DERIVED_COLUMN`]; all others produce one column per input column,
    /// keeping the input names. Rows whose bracketed offsets fall outside
    /// the series are NaN.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ExprError::ColumnOutOfRange`] | a numbered column exceeds `series.n_columns()` |
    /// | [`ExprError::Series`] | the result cannot be assembled |
    #[instrument(skip(self, series), fields(expression = %self.source, shape = ?self.shape, rows = series.len()))]
    pub fn evaluate(&self, series: &TimeSeries) -> Result<TimeSeries, ExprError> {
        let available = series.n_columns();
        if let Some(p) = self.max_position {
            if p >= available {
                return Err(ExprError::ColumnOutOfRange {
                    column: p + 1,
                    available,
                });
            }
        }

        let inputs = series.columns();
        let mut missing = 0usize;
        let columns: Vec<Column> = if self.max_position.is_some() {
            vec![Column::new(DERIVED_COLUMN, self.rows(inputs, 0, &mut missing))]
        } else {
            inputs
                .iter()
                .enumerate()
                .map(|(i, c)| Column::new(c.name(), self.rows(inputs, i, &mut missing)))
                .collect()
        };

        debug!(missing_rows = missing, "expression evaluated");
        Ok(series.with_columns(columns)?)
    }

    fn rows(&self, columns: &[Column], implicit: usize, missing: &mut usize) -> Vec<f64> {
        let n = columns.first().map_or(0, Column::len);
        (0..n)
            .map(|row| {
                let frame = Frame {
                    columns,
                    row,
                    implicit,
                };
                self.root.eval(&frame).unwrap_or_else(|| {
                    *missing += 1;
                    f64::NAN
                })
            })
            .collect()
    }
}

impl FromStr for Expression {
    type Err = ExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Parse `expression` with the default placeholders and evaluate it over `series`.
///
/// # Errors
///
/// See [`Expression::parse`] and [`Expression::evaluate`].
pub fn evaluate(series: &TimeSeries, expression: &str) -> Result<TimeSeries, ExprError> {
    Expression::parse(expression)?.evaluate(series)
}
