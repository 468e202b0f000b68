//! Error types for spectral and windowed filtering.

use tsmill_series::SeriesError;

/// Errors from filter configuration and input validation.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// Returned when an FFT filter is applied without a cutoff period.
    #[error("cutoff_period must be set for FFT filtering")]
    MissingCutoffPeriod,

    /// Returned when an FFT filter is applied without a smoothing window length.
    #[error("window_len must be set for FFT filtering")]
    MissingWindowLen,

    /// Returned when the cutoff period is zero, negative, or not finite.
    #[error("cutoff_period must be a positive finite number, got {cutoff_period}")]
    InvalidCutoffPeriod {
        /// The rejected cutoff period.
        cutoff_period: f64,
    },

    /// Returned when the FFT smoothing window is zero or wider than the input.
    #[error("window_len must be between 1 and the input length {len}, got {window_len}")]
    InvalidWindowLen {
        /// The rejected window length.
        window_len: usize,
        /// Length of the input.
        len: usize,
    },

    /// Returned when a windowed filter is given an even window length.
    #[error("window_len must be odd for windowed filters, got {window_len}")]
    EvenWindowLen {
        /// The rejected window length.
        window_len: usize,
    },

    /// Returned when the input is not longer than the window.
    #[error("input length {len} must exceed window_len {window_len}")]
    SeriesTooShort {
        /// Length of the input vector.
        len: usize,
        /// Requested window length.
        window_len: usize,
    },

    /// Returned when the input vector is empty.
    #[error("input vector must be non-empty")]
    EmptyInput,

    /// Returned when an input vector contains NaN or infinity.
    #[error("input contains non-finite value at index {index}")]
    NonFiniteValue {
        /// Position of the first non-finite value.
        index: usize,
    },

    /// Returned when a series column contains NaN or infinity.
    #[error("column \"{column}\" contains non-finite value at row {index}")]
    NonFiniteColumn {
        /// Name of the offending column.
        column: String,
        /// Row of the first non-finite value.
        index: usize,
    },

    /// Returned when a filter name is not recognised.
    #[error("unknown filter type \"{name}\" (expected flat, hanning, hamming, bartlett, blackman, fft_lowpass or fft_highpass)")]
    UnknownFilter {
        /// The rejected name.
        name: String,
    },

    /// Wraps an error rebuilding the output series.
    #[error(transparent)]
    Series(#[from] SeriesError),
}
