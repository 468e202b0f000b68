//! Frequency-domain and windowed time-domain filters.
//!
//! [`SpectralFilter`] removes content above (low-pass) or below (high-pass)
//! a cutoff period by masking the real FFT spectrum with an edge-smoothed
//! mask. [`WindowFilter`] convolves the signal with a normalised window.
//! Both operate on single columns or on every column of a
//! [`TimeSeries`](tsmill_series::TimeSeries) in parallel.

mod columns;
mod convolve;
mod error;
mod filter;
mod spectral;
mod window;

pub use convolve::{convolve, ConvolveMode};
pub use error::FilterError;
pub use filter::Filter;
pub use spectral::{highpass, lowpass, Pass, SpectralFilter};
pub use window::{WindowFilter, WindowKind};
