//! Error types for time series construction.

use chrono::NaiveDateTime;

/// Errors from validating the shape and ordering of a [`TimeSeries`](crate::TimeSeries).
#[derive(Debug, thiserror::Error)]
pub enum SeriesError {
    /// Returned when a series is built without any value columns.
    #[error("time series must have at least one column")]
    NoColumns,

    /// Returned when a timestamp is not strictly greater than its predecessor.
    #[error("timestamps must be strictly increasing: {current} at row {row} follows {previous}")]
    UnorderedIndex {
        /// Zero-based row of the offending timestamp.
        row: usize,
        /// Timestamp of the previous row.
        previous: NaiveDateTime,
        /// Timestamp found at `row`.
        current: NaiveDateTime,
    },

    /// Returned when a column has a different number of values than the index.
    #[error("column \"{column}\" has {got} values, expected {expected}")]
    LengthMismatch {
        /// Name of the offending column.
        column: String,
        /// Number of timestamps in the index.
        expected: usize,
        /// Number of values in the column.
        got: usize,
    },

    /// Returned when two columns share a name.
    #[error("duplicate column name \"{column}\"")]
    DuplicateColumn {
        /// The duplicated name.
        column: String,
    },

    /// Returned when a regular index is requested with a non-positive step.
    #[error("index step must be positive, got {step}")]
    NonPositiveStep {
        /// The requested step.
        step: chrono::TimeDelta,
    },
}
