//! Banded DTW distance, cost matrix, warping path and pairwise tables.

use rayon::prelude::*;
use tracing::{debug, info, instrument};
use tsmill_series::TimeSeries;

use crate::band::Band;
use crate::distance::DtwDistance;
use crate::error::DtwError;
use crate::matrix::CostMatrix;
use crate::pairwise::{PairwiseRow, PairwiseTable};
use crate::path::{WarpingPath, WarpingStep};

/// Pointwise cost used by [`Aligner::distance`].
fn absolute(x: f64, y: f64) -> f64 {
    (x - y).abs()
}

/// Immutable DTW configuration. Thread-safe and copyable.
///
/// The recurrence is
/// `cost[i][j] = d(a[i], b[j]) + min(cost[i-1][j-1], cost[i][j-1], cost[i-1][j])`
/// over the cells of the [`Band`], with the minimum taken only over filled
/// cells. Row 0 and column 0 are running sums and always filled. The
/// distance is `cost[m-1][n-1]`, not normalised by path length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Aligner {
    window: usize,
}

impl Aligner {
    /// Create an aligner with band half-width `window`.
    ///
    /// A zero window is accepted here and rejected when the aligner is used.
    #[must_use]
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    /// Return the band half-width.
    #[must_use]
    pub fn window(&self) -> usize {
        self.window
    }

    /// Return the band this aligner fills.
    #[must_use]
    pub fn band(&self) -> Band {
        Band::new(self.window)
    }

    /// DTW distance with the absolute difference as pointwise cost.
    ///
    /// Uses a rolling two-row buffer rather than the full cost matrix.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::InvalidWindow`] | `window == 0` |
    /// | [`DtwError::EmptySeries`] | either sequence is empty |
    /// | [`DtwError::NonFiniteValue`] | either sequence contains NaN or infinity |
    /// | [`DtwError::BandTooNarrow`] | both lengths exceed 1 and differ by more than `window` |
    #[instrument(skip(a, b), fields(len_a = a.len(), len_b = b.len()))]
    pub fn distance(&self, a: &[f64], b: &[f64]) -> Result<DtwDistance, DtwError> {
        self.distance_with(a, b, absolute)
    }

    /// DTW distance with a caller-supplied pointwise cost.
    ///
    /// # Errors
    ///
    /// Same as [`distance`](Self::distance).
    pub fn distance_with<F>(&self, a: &[f64], b: &[f64], cost: F) -> Result<DtwDistance, DtwError>
    where
        F: Fn(f64, f64) -> f64,
    {
        self.validate(a, b)?;
        self.rolling(a, b, &cost)
            .map(DtwDistance::new)
            .ok_or_else(|| self.too_narrow(a, b))
    }

    /// Fill the whole cost matrix with the absolute difference as pointwise cost.
    ///
    /// # Errors
    ///
    /// Same as [`distance`](Self::distance).
    pub fn cost_matrix(&self, a: &[f64], b: &[f64]) -> Result<CostMatrix, DtwError> {
        self.validate(a, b)?;
        Ok(self.fill(a, b, &absolute))
    }

    /// DTW distance and the optimal warping path.
    ///
    /// Allocates the full cost matrix and walks back from the final cell,
    /// preferring the diagonal, then the cell above, then the cell to the
    /// left when predecessors tie.
    ///
    /// # Errors
    ///
    /// Same as [`distance`](Self::distance).
    #[instrument(skip(a, b), fields(len_a = a.len(), len_b = b.len()))]
    pub fn distance_and_path(
        &self,
        a: &[f64],
        b: &[f64],
    ) -> Result<(DtwDistance, WarpingPath), DtwError> {
        self.validate(a, b)?;
        let cost = self.fill(a, b, &absolute);
        let total = cost.final_cost().ok_or_else(|| self.too_narrow(a, b))?;
        let steps = traceback(&cost);
        debug!(path_len = steps.len(), "warping path recovered");
        Ok((DtwDistance::new(total), WarpingPath::new(steps)))
    }

    /// Distances between every unordered pair of distinct columns of `series`.
    ///
    /// Pairs are computed in parallel with rayon; the table lists them in
    /// column order. A single-column series gives an empty table.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::InvalidWindow`] | `window == 0` |
    /// | [`DtwError::EmptySeries`] | `series` has no rows |
    /// | [`DtwError::NonFiniteColumn`] | a column contains NaN or infinity |
    #[instrument(skip(self, series), fields(window = self.window, rows = series.len(), columns = series.n_columns()))]
    pub fn pairwise(&self, series: &TimeSeries) -> Result<PairwiseTable, DtwError> {
        if self.window == 0 {
            return Err(DtwError::InvalidWindow { window: 0 });
        }
        if series.is_empty() {
            return Err(DtwError::EmptySeries);
        }
        let columns = series.columns();
        if let Some((column, index)) = columns
            .iter()
            .find_map(|c| c.first_non_finite().map(|i| (c, i)))
        {
            return Err(DtwError::NonFiniteColumn {
                column: column.name().to_string(),
                index,
            });
        }

        let k = columns.len();
        let pairs: Vec<(usize, usize)> = (0..k)
            .flat_map(|i| (i + 1..k).map(move |j| (i, j)))
            .collect();

        let distances: Vec<DtwDistance> = pairs
            .par_iter()
            .map(|&(i, j)| self.distance(columns[i].values(), columns[j].values()))
            .collect::<Result<_, _>>()?;

        let rows: Vec<PairwiseRow> = pairs
            .iter()
            .zip(distances)
            .map(|(&(i, j), distance)| PairwiseRow {
                name_a: columns[i].name().to_string(),
                name_b: columns[j].name().to_string(),
                distance,
            })
            .collect();

        info!(pairs = rows.len(), "pairwise DTW table computed");
        Ok(PairwiseTable::new(rows))
    }

    fn validate(&self, a: &[f64], b: &[f64]) -> Result<(), DtwError> {
        if self.window == 0 {
            return Err(DtwError::InvalidWindow { window: 0 });
        }
        if a.is_empty() || b.is_empty() {
            return Err(DtwError::EmptySeries);
        }
        for (sequence, values) in [("first", a), ("second", b)] {
            if let Some(index) = values.iter().position(|v| !v.is_finite()) {
                return Err(DtwError::NonFiniteValue { sequence, index });
            }
        }
        if !self.band().reaches_end(a.len(), b.len()) {
            return Err(self.too_narrow(a, b));
        }
        Ok(())
    }

    fn too_narrow(&self, a: &[f64], b: &[f64]) -> DtwError {
        DtwError::BandTooNarrow {
            len_a: a.len(),
            len_b: b.len(),
            window: self.window,
        }
    }

    /// Rolling two-row evaluation of the recurrence.
    ///
    /// Each buffer spans all `n` columns. Before a buffer is reused only the
    /// columns written two rows earlier are cleared, so a row costs
    /// `O(window)` after the first.
    fn rolling(&self, a: &[f64], b: &[f64], d: &impl Fn(f64, f64) -> f64) -> Option<f64> {
        let n = b.len();
        let band = self.band();

        let mut prev: Vec<Option<f64>> = b
            .iter()
            .scan(0.0, |acc, &y| {
                *acc += d(a[0], y);
                Some(Some(*acc))
            })
            .collect();
        let mut curr: Vec<Option<f64>> = vec![None; n];
        let mut edge = d(a[0], b[0]);
        let mut prev_written = 0..n;
        let mut stale = 0..0;

        for (i, &x) in a.iter().enumerate().skip(1) {
            curr[stale].fill(None);
            edge += d(x, b[0]);
            curr[0] = Some(edge);

            let range = band.interior_range(i, n);
            for j in range.clone() {
                curr[j] = [prev[j - 1], curr[j - 1], prev[j]]
                    .into_iter()
                    .flatten()
                    .reduce(f64::min)
                    .map(|best| best + d(x, b[j]));
            }

            std::mem::swap(&mut prev, &mut curr);
            stale = prev_written;
            prev_written = range;
        }

        prev[n - 1]
    }

    /// Full-matrix evaluation of the recurrence.
    fn fill(&self, a: &[f64], b: &[f64], d: &impl Fn(f64, f64) -> f64) -> CostMatrix {
        let (m, n) = (a.len(), b.len());
        let band = self.band();
        let mut cost = CostMatrix::empty(m, n);

        let mut acc = 0.0;
        for (j, &y) in b.iter().enumerate() {
            acc += d(a[0], y);
            cost.set(0, j, acc);
        }

        let mut edge = d(a[0], b[0]);
        for (i, &x) in a.iter().enumerate().skip(1) {
            edge += d(x, b[0]);
            cost.set(i, 0, edge);

            for j in band.interior_range(i, n) {
                let best = [
                    cost.get(i - 1, j - 1),
                    cost.get(i, j - 1),
                    cost.get(i - 1, j),
                ]
                .into_iter()
                .flatten()
                .reduce(f64::min);
                if let Some(best) = best {
                    cost.set(i, j, best + d(x, b[j]));
                }
            }
        }
        cost
    }
}

/// Walk back from the final cell to `(0, 0)` through filled cells.
fn traceback(cost: &CostMatrix) -> Vec<WarpingStep> {
    let mut i = cost.rows() - 1;
    let mut j = cost.cols() - 1;
    let mut steps = vec![WarpingStep { a: i, b: j }];

    while i > 0 || j > 0 {
        (i, j) = if i == 0 {
            (0, j - 1)
        } else if j == 0 {
            (i - 1, 0)
        } else {
            [(i - 1, j - 1), (i - 1, j), (i, j - 1)]
                .into_iter()
                .filter_map(|(p, q)| cost.get(p, q).map(|c| (p, q, c)))
                .min_by(|x, y| x.2.total_cmp(&y.2))
                .map_or((i - 1, j - 1), |(p, q, _)| (p, q))
        };
        steps.push(WarpingStep { a: i, b: j });
    }

    steps.reverse();
    steps
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeDelta};
    use tsmill_series::Column;

    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-10
    }

    #[test]
    fn identical_sequences_distance_zero() {
        let a = [1.0, 2.0, 3.0];
        assert_eq!(Aligner::new(1).distance(&a, &a).unwrap().value(), 0.0);
    }

    #[test]
    fn hand_computed_2x2() {
        // cost[0][0] = 1, cost[0][1] = 1, cost[1][0] = 1
        // cost[1][1] = |1 - 0| + min(1, 1, 1) = 2
        let d = Aligner::new(1).distance(&[0.0, 1.0], &[1.0, 0.0]).unwrap();
        assert!(close(d.value(), 2.0));
    }

    #[test]
    fn constant_offset_accumulates_along_diagonal() {
        let d = Aligner::new(1)
            .distance(&[0.0, 0.0, 0.0], &[1.0, 1.0, 1.0])
            .unwrap();
        assert!(close(d.value(), 3.0));
    }

    #[test]
    fn single_element_sequences() {
        let d = Aligner::new(1).distance(&[5.0], &[3.0]).unwrap();
        assert!(close(d.value(), 2.0));
    }

    #[test]
    fn single_row_is_running_sum_of_edge() {
        // every cell lies on row 0, so the band never applies
        let d = Aligner::new(1).distance(&[1.0], &[0.0, 2.0, 4.0, 1.0]).unwrap();
        assert!(close(d.value(), 1.0 + 1.0 + 3.0 + 0.0));
        let d = Aligner::new(1).distance(&[0.0, 2.0, 4.0, 1.0], &[1.0]).unwrap();
        assert!(close(d.value(), 5.0));
    }

    #[test]
    fn band_too_narrow_for_length_gap() {
        let result = Aligner::new(1).distance(&[1.0, 2.0], &[1.0, 2.0, 3.0, 4.0]);
        assert!(matches!(
            result,
            Err(DtwError::BandTooNarrow {
                len_a: 2,
                len_b: 4,
                window: 1
            })
        ));
        assert!(Aligner::new(2).distance(&[1.0, 2.0], &[1.0, 2.0, 3.0, 4.0]).is_ok());
    }

    #[test]
    fn invalid_inputs_rejected() {
        assert!(matches!(
            Aligner::new(0).distance(&[1.0], &[1.0]),
            Err(DtwError::InvalidWindow { window: 0 })
        ));
        assert!(matches!(
            Aligner::new(1).distance(&[], &[1.0]),
            Err(DtwError::EmptySeries)
        ));
        assert!(matches!(
            Aligner::new(1).distance(&[1.0, 2.0], &[1.0, f64::NAN]),
            Err(DtwError::NonFiniteValue {
                sequence: "second",
                index: 1
            })
        ));
    }

    #[test]
    fn unbounded_window_matches_widest_needed() {
        let a = [1.0, 3.0, 5.0, 2.0, 0.0, 4.0];
        let b = [2.0, 4.0, 1.0];
        let unbounded = Aligner::new(usize::MAX);
        assert!(close(
            unbounded.distance(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]).unwrap().value(),
            0.0
        ));
        let wide = Aligner::new(a.len()).distance(&a, &b).unwrap().value();
        assert!(close(unbounded.distance(&a, &b).unwrap().value(), wide));
        let (d, path) = unbounded.distance_and_path(&a, &b).unwrap();
        assert!(close(d.value(), wide));
        assert_eq!(path.steps().last(), Some(&WarpingStep { a: 5, b: 2 }));
    }

    #[test]
    fn custom_pointwise_cost() {
        let squared = |x: f64, y: f64| (x - y).powi(2);
        let d = Aligner::new(1)
            .distance_with(&[0.0, 0.0], &[2.0, 2.0], squared)
            .unwrap();
        assert!(close(d.value(), 8.0));
    }

    #[test]
    fn rolling_matches_full_matrix() {
        let a = [1.0, 3.0, 5.0, 2.0, 0.0, 4.0];
        let b = [2.0, 4.0, 1.0, 1.0, 3.0];
        for window in 1..=6 {
            let aligner = Aligner::new(window);
            let rolling = aligner.distance(&a, &b).unwrap().value();
            let full = aligner.cost_matrix(&a, &b).unwrap().final_cost().unwrap();
            assert!(close(rolling, full), "window {window}: {rolling} vs {full}");
        }
    }

    #[test]
    fn cells_outside_band_stay_empty() {
        let m = Aligner::new(1)
            .cost_matrix(&[1.0, 2.0, 3.0, 4.0], &[1.0, 2.0, 3.0, 4.0])
            .unwrap();
        assert_eq!(m.get(1, 3), None);
        assert_eq!(m.get(3, 1), None);
        assert!(m.get(0, 3).is_some());
        assert!(m.get(3, 0).is_some());
        assert!(m.get(2, 3).is_some());
    }

    #[test]
    fn path_endpoints_and_continuity() {
        let a = [1.0, 5.0, 2.0, 8.0, 3.0];
        let b = [2.0, 4.0, 7.0];
        let (dist, path) = Aligner::new(2).distance_and_path(&a, &b).unwrap();
        let steps = path.steps();
        assert_eq!(steps.first(), Some(&WarpingStep { a: 0, b: 0 }));
        assert_eq!(steps.last(), Some(&WarpingStep { a: 4, b: 2 }));
        for pair in steps.windows(2) {
            let da = pair[1].a - pair[0].a;
            let db = pair[1].b - pair[0].b;
            assert!(da <= 1 && db <= 1 && da + db >= 1);
        }
        let along_path: f64 = path.into_iter().map(|s| (a[s.a] - b[s.b]).abs()).sum();
        assert!(close(along_path, dist.value()));
    }

    #[test]
    fn identical_sequences_follow_diagonal() {
        let a = [1.0, 2.0, 3.0, 2.0];
        let (_, path) = Aligner::new(1).distance_and_path(&a, &a).unwrap();
        assert!(path.steps().iter().all(|s| s.a == s.b));
    }

    #[test]
    fn pairwise_visits_each_pair_once_in_order() {
        let start = NaiveDate::from_ymd_opt(2021, 3, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        let series = TimeSeries::regular(
            start,
            TimeDelta::days(1),
            vec![
                Column::new("a", vec![1.0, 2.0, 3.0]),
                Column::new("b", vec![3.0, 2.0, 1.0]),
                Column::new("c", vec![1.0, 1.0, 1.0]),
            ],
        )
        .unwrap();
        let aligner = Aligner::new(1);
        let table = aligner.pairwise(&series).unwrap();

        let names: Vec<(&str, &str)> = table.iter().map(|(a, b, _)| (a, b)).collect();
        assert_eq!(names, vec![("a", "b"), ("a", "c"), ("b", "c")]);

        let direct = aligner.distance(&[3.0, 2.0, 1.0], &[1.0, 1.0, 1.0]).unwrap();
        assert_eq!(table.get("c", "b"), Some(direct));
    }

    #[test]
    fn pairwise_rejects_missing_values() {
        let start = NaiveDate::from_ymd_opt(2021, 3, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        let series = TimeSeries::regular(
            start,
            TimeDelta::days(1),
            vec![
                Column::new("a", vec![1.0, 2.0]),
                Column::new("b", vec![f64::NAN, 2.0]),
            ],
        )
        .unwrap();
        assert!(matches!(
            Aligner::new(1).pairwise(&series),
            Err(DtwError::NonFiniteColumn { index: 0, .. })
        ));
    }

    #[test]
    fn config_round_trips_through_json() {
        let json = serde_json::to_string(&Aligner::new(4)).unwrap();
        assert_eq!(json, r#"{"window":4}"#);
        let back: Aligner = serde_json::from_str(&json).unwrap();
        assert_eq!(back.window(), 4);
    }
}
