//! Cells visited by the cheapest alignment.

/// Cell `(a, b)` of the cost matrix: sample `a` of the first sequence
/// aligned with sample `b` of the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WarpingStep {
    /// Row, an index into the first sequence.
    pub a: usize,
    /// Column, an index into the second sequence.
    pub b: usize,
}

/// Cells from `(0, 0)` to `(m-1, n-1)`, each one row, one column, or one
/// diagonal step after the last.
///
/// Cells with both indices at least 1 lie inside the band. A path may open
/// with a run along row 0 or column 0, which the band does not restrict.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WarpingPath(Vec<WarpingStep>);

impl WarpingPath {
    pub(crate) fn new(steps: Vec<WarpingStep>) -> Self {
        Self(steps)
    }

    /// Return the cells in order.
    #[must_use]
    pub fn steps(&self) -> &[WarpingStep] {
        &self.0
    }

    /// Return the number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the path holds no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Largest `|a - b|` over the cells off row 0 and column 0.
    ///
    /// Never exceeds the aligner's window. Zero when the path stays on the
    /// diagonal or on the edges.
    #[must_use]
    pub fn band_deviation(&self) -> usize {
        self.0
            .iter()
            .filter(|s| s.a > 0 && s.b > 0)
            .map(|s| s.a.abs_diff(s.b))
            .max()
            .unwrap_or(0)
    }
}

impl<'a> IntoIterator for &'a WarpingPath {
    type Item = &'a WarpingStep;
    type IntoIter = std::slice::Iter<'a, WarpingStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(cells: &[(usize, usize)]) -> WarpingPath {
        WarpingPath::new(cells.iter().map(|&(a, b)| WarpingStep { a, b }).collect())
    }

    #[test]
    fn edge_runs_do_not_count_as_deviation() {
        let p = path(&[(0, 0), (0, 1), (0, 2), (1, 3), (2, 3)]);
        assert_eq!(p.band_deviation(), 2);
        assert_eq!(path(&[(0, 0), (0, 1), (0, 2)]).band_deviation(), 0);
    }

    #[test]
    fn diagonal_has_no_deviation() {
        let p = path(&[(0, 0), (1, 1), (2, 2)]);
        assert_eq!(p.band_deviation(), 0);
        assert_eq!(p.len(), 3);
        assert_eq!((&p).into_iter().count(), 3);
    }
}
