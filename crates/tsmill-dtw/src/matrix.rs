//! Full DTW cost matrix.

/// Accumulated-cost table of an `m x n` alignment, stored row-major.
///
/// Cells outside the band are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<Option<f64>>,
}

impl CostMatrix {
    pub(crate) fn empty(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        }
    }

    pub(crate) fn set(&mut self, i: usize, j: usize, value: f64) {
        self.cells[i * self.cols + j] = Some(value);
    }

    /// Number of rows (length of the first sequence).
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (length of the second sequence).
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Return the accumulated cost at `(i, j)`, or `None` outside the band
    /// or the matrix.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i >= self.rows || j >= self.cols {
            return None;
        }
        self.cells[i * self.cols + j]
    }

    /// Return the accumulated cost at the final cell.
    #[must_use]
    pub fn final_cost(&self) -> Option<f64> {
        self.get(self.rows.checked_sub(1)?, self.cols.checked_sub(1)?)
    }

    /// Iterate over the filled cells as `(i, j, cost)`.
    pub fn filled(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(k, c)| c.map(|v| (k / self.cols, k % self.cols, v)))
    }
}
