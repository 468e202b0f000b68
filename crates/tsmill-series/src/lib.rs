//! Timestamp-indexed numeric table shared by the tsmill kernels.
//!
//! A [`TimeSeries`] is an ordered set of rows keyed by strictly increasing
//! timestamps, holding one or more named `f64` columns. Missing cells are
//! stored as NaN. Kernels borrow a series immutably and build new ones via
//! [`TimeSeries::with_columns`]; nothing mutates a series in place.

mod column;
mod error;
mod frequency;
mod series;

pub use column::Column;
pub use error::SeriesError;
pub use frequency::Frequency;
pub use series::TimeSeries;
