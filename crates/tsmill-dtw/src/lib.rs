//! Banded dynamic time warping.
//!
//! Pure math library, zero I/O. [`Aligner`] computes the DTW distance
//! between two sequences inside a Sakoe-Chiba [`Band`], optionally with the
//! full [`CostMatrix`] and optimal [`WarpingPath`], and builds a
//! [`PairwiseTable`] over the columns of a
//! [`TimeSeries`](tsmill_series::TimeSeries).

mod aligner;
mod band;
mod distance;
mod error;
mod matrix;
mod pairwise;
mod path;

pub use aligner::Aligner;
pub use band::Band;
pub use distance::DtwDistance;
pub use error::DtwError;
pub use matrix::CostMatrix;
pub use pairwise::{PairwiseRow, PairwiseTable};
pub use path::{WarpingPath, WarpingStep};
