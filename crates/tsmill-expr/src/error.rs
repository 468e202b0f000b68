//! Error types for expression parsing and evaluation.

use tsmill_series::SeriesError;

use crate::function::Arity;

/// Errors from parsing or evaluating an expression.
///
/// Every variant except [`ExprError::Series`] is raised before any row is
/// evaluated. Positions are byte offsets into the expression source.
#[derive(Debug, thiserror::Error)]
pub enum ExprError {
    /// Returned when the expression is empty or only whitespace.
    #[error("expression is empty")]
    EmptyExpression,

    /// Returned when the tokenizer meets a character outside the grammar.
    #[error("unexpected character {ch:?} at position {position}")]
    UnexpectedChar {
        /// The offending character.
        ch: char,
        /// Byte offset of the character.
        position: usize,
    },

    /// Returned when a numeric literal cannot be read as an `f64`.
    #[error("invalid number {text:?} at position {position}")]
    InvalidNumber {
        /// The literal as written.
        text: String,
        /// Byte offset of the literal.
        position: usize,
    },

    /// Returned when a token appears where the grammar does not allow it.
    #[error("unexpected {found} at position {position}")]
    UnexpectedToken {
        /// Description of the token found.
        found: String,
        /// Byte offset of the token.
        position: usize,
    },

    /// Returned when the expression ends in the middle of a construct.
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    /// Returned when an opening parenthesis or bracket is never closed.
    #[error("unclosed {delimiter:?} opened at position {position}")]
    UnclosedDelimiter {
        /// The opening delimiter.
        delimiter: char,
        /// Byte offset of the opening delimiter.
        position: usize,
    },

    /// Returned when a closing parenthesis or bracket has no opening partner.
    #[error("unmatched {delimiter:?} at position {position}")]
    UnmatchedDelimiter {
        /// The closing delimiter.
        delimiter: char,
        /// Byte offset of the closing delimiter.
        position: usize,
    },

    /// Returned when a call names a function that does not exist.
    #[error("unknown function {name:?} at position {position}")]
    UnknownFunction {
        /// The name used in the call.
        name: String,
        /// Byte offset of the name.
        position: usize,
    },

    /// Returned when a function is called with the wrong number of arguments.
    #[error("{function} takes {expected} argument(s), got {got}")]
    WrongArity {
        /// The function called.
        function: &'static str,
        /// The accepted argument count.
        expected: Arity,
        /// The number of arguments supplied.
        got: usize,
    },

    /// Returned when a name is neither a placeholder, a constant, nor a function call.
    #[error("unknown identifier {name:?} at position {position}")]
    UnknownIdentifier {
        /// The unrecognised name.
        name: String,
        /// Byte offset of the name.
        position: usize,
    },

    /// Returned when a bracket index does not reduce to the time placeholder plus an integer.
    #[error("bracket index at position {position} must be the time placeholder plus an integer offset")]
    InvalidTimeIndex {
        /// Byte offset of the opening bracket.
        position: usize,
    },

    /// Returned when the variable or time placeholder cannot be used.
    #[error("invalid placeholder {name:?}: {reason}")]
    InvalidPlaceholder {
        /// The rejected placeholder.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Returned when parentheses, calls, signs or operator chains nest too deeply.
    #[error("expression nests deeper than {limit} levels")]
    NestingTooDeep {
        /// The maximum accepted depth.
        limit: usize,
    },

    /// Returned when the implicit variable and numbered columns appear together.
    #[error("expression mixes the implicit variable with numbered column references")]
    MixedColumnReferences,

    /// Returned when a numbered column exceeds the number of input columns.
    #[error("column {column} referenced but the series has {available} column(s)")]
    ColumnOutOfRange {
        /// The one-based column number used in the expression.
        column: usize,
        /// Number of columns in the input series.
        available: usize,
    },

    /// Returned when the result series cannot be assembled.
    #[error(transparent)]
    Series(#[from] SeriesError),
}
