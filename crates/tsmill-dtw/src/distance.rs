//! Distance value returned by the aligner.

use std::fmt;

/// Accumulated cost at the final cell of a banded cost matrix.
///
/// The value is the plain sum of pointwise costs along the cheapest path
/// through the band and its edge runs. It is neither square-rooted nor
/// divided by the path length, so it grows with the sequence lengths.
/// Serialises as a bare number.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct DtwDistance(f64);

impl DtwDistance {
    pub(crate) fn new(value: f64) -> Self {
        Self(value)
    }

    /// Return the accumulated cost.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for DtwDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}
