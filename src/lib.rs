//! Time series kernels over a shared timestamp-indexed table.
//!
//! | Kernel | Crate | Entry point |
//! |---|---|---|
//! | Spectral and windowed filters | `tsmill-spectral` | [`SpectralFilter`], [`WindowFilter`], [`Filter`] |
//! | Time-indexed expressions | `tsmill-expr` | [`Expression`], [`evaluate`] |
//! | DTW alignment | `tsmill-dtw` | [`Aligner`] |
//!
//! Every kernel borrows a [`TimeSeries`] and returns a new value; none of
//! them perform I/O or install a tracing subscriber.
//!
//! ```
//! use chrono::{NaiveDate, TimeDelta};
//! use tsmill::{evaluate, Column, TimeSeries};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let series = TimeSeries::regular(
//!     start,
//!     TimeDelta::days(1),
//!     vec![Column::new("flow", vec![1.0, 2.0, 3.0, 4.0, 5.0])],
//! )
//! .unwrap();
//!
//! let out = evaluate(&series, "x[t] + x[t-1]").unwrap();
//! let values = out.column("flow").unwrap().values();
//! assert!(values[0].is_nan());
//! assert_eq!(&values[1..], &[3.0, 5.0, 7.0, 9.0]);
//! ```

pub use tsmill_dtw::{
    Aligner, Band, CostMatrix, DtwDistance, DtwError, PairwiseRow, PairwiseTable, WarpingPath,
    WarpingStep,
};
pub use tsmill_expr::{evaluate, Arity, ExprError, Expression, ExpressionBuilder, Function, Shape};
pub use tsmill_series::{Column, Frequency, SeriesError, TimeSeries};
pub use tsmill_spectral::{
    convolve, highpass, lowpass, ConvolveMode, Filter, FilterError, Pass, SpectralFilter,
    WindowFilter, WindowKind,
};
