//! Error types for DTW alignment.

/// Errors from DTW configuration and input validation.
#[derive(Debug, thiserror::Error)]
pub enum DtwError {
    /// Returned when the band window is zero.
    #[error("window must be at least 1, got {window}")]
    InvalidWindow {
        /// The rejected window.
        window: usize,
    },

    /// Returned when either sequence has no elements.
    #[error("sequences must be non-empty")]
    EmptySeries,

    /// Returned when a sequence contains NaN, infinity, or negative infinity.
    #[error("{sequence} sequence contains non-finite value at index {index}")]
    NonFiniteValue {
        /// `"first"` or `"second"`.
        sequence: &'static str,
        /// Position of the first non-finite value found.
        index: usize,
    },

    /// Returned when a series column contains NaN or infinity.
    #[error("column {column:?} contains non-finite value at row {index}")]
    NonFiniteColumn {
        /// Name of the offending column.
        column: String,
        /// Row of the first non-finite value found.
        index: usize,
    },

    /// Returned when the band is too narrow to connect the first and last cells.
    #[error("window {window} cannot align sequences of length {len_a} and {len_b}")]
    BandTooNarrow {
        /// Length of the first sequence.
        len_a: usize,
        /// Length of the second sequence.
        len_b: usize,
        /// The configured window.
        window: usize,
    },
}
