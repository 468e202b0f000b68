//! Row-wise evaluation of user expressions over a [`TimeSeries`](tsmill_series::TimeSeries).
//!
//! An expression is arithmetic over column values, math functions and
//! constants. The variable placeholder (`x` by default) names the column
//! being evaluated, numbered forms (`x1`, `x2`, ...) name input columns by
//! position, and a bracket index such as `x[t-1]` reads a value a fixed
//! number of rows away from the current one.
//!
//! Parsing and all column checks happen before any row is evaluated. The
//! only failure confined to a single row is a bracket offset that falls
//! outside the series, which leaves that row NaN.

mod ast;
mod error;
mod expression;
mod function;
mod lexer;
mod parser;

pub use error::ExprError;
pub use expression::{evaluate, Expression, ExpressionBuilder, Shape, DERIVED_COLUMN};
pub use function::{Arity, Function};
