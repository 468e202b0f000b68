//! Sakoe-Chiba band over the DTW cost matrix.

use std::ops::Range;

/// Symmetric band of half-width `window`.
///
/// Interior cell `(i, j)` with `i, j >= 1` is inside the band when
/// `|i - j| <= window`. Row 0 and column 0 are outside the band's reach and
/// are always filled, so every path starts with a run along one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Band {
    window: usize,
}

impl Band {
    /// Create a band. A zero window is rejected when the band is used.
    #[must_use]
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    /// Return the half-width.
    #[must_use]
    pub fn window(&self) -> usize {
        self.window
    }

    /// Return the interior columns (`j >= 1`) of row `row` inside the band.
    ///
    /// Empty for row 0 and whenever the band lies entirely past `n_cols`.
    #[must_use]
    pub fn interior_range(&self, row: usize, n_cols: usize) -> Range<usize> {
        if row == 0 {
            return 1..1;
        }
        let start = row.saturating_sub(self.window).max(1);
        let end = row
            .saturating_add(self.window)
            .saturating_add(1)
            .min(n_cols);
        start..end.max(start)
    }

    /// Whether cell `(i, j)` is filled for a matrix of any size.
    #[must_use]
    pub fn contains(&self, i: usize, j: usize) -> bool {
        i == 0 || j == 0 || i.abs_diff(j) <= self.window
    }

    /// Whether the final cell of an `m x n` matrix is reachable.
    ///
    /// A single-row or single-column matrix is entirely edge and always
    /// reachable; otherwise the corner must lie inside the band.
    #[must_use]
    pub fn reaches_end(&self, m: usize, n: usize) -> bool {
        m <= 1 || n <= 1 || m.abs_diff(n) <= self.window
    }
}
