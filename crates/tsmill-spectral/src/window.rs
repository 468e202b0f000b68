//! Windowed time-domain smoothing filters.

use std::f64::consts::PI;

use tracing::{info, instrument};
use tsmill_series::TimeSeries;

use crate::columns::{check_input, filter_columns};
use crate::convolve::{convolve, ConvolveMode};
use crate::error::FilterError;

/// Shape of the smoothing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    /// Uniform weights (moving average).
    Flat,
    /// Raised cosine, zero at both ends.
    Hanning,
    /// Raised cosine on a 0.08 pedestal.
    Hamming,
    /// Triangle, zero at both ends.
    Bartlett,
    /// Three-term cosine sum.
    Blackman,
}

impl WindowKind {
    /// Return the `m` unnormalised window weights.
    #[must_use]
    pub fn weights(self, m: usize) -> Vec<f64> {
        if m == 1 {
            return vec![1.0];
        }
        let denom = (m - 1) as f64;
        (0..m)
            .map(|k| {
                let x = k as f64 / denom;
                match self {
                    Self::Flat => 1.0,
                    Self::Hanning => 0.5 - 0.5 * (2.0 * PI * x).cos(),
                    Self::Hamming => 0.54 - 0.46 * (2.0 * PI * x).cos(),
                    Self::Bartlett => 1.0 - (2.0 * x - 1.0).abs(),
                    Self::Blackman => {
                        0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos()
                    }
                }
            })
            .collect()
    }
}

/// Windowed convolution filter.
///
/// The signal is extended by `window_len / 2` samples at each end by
/// reflection (mirroring without repeating the edge sample) and convolved
/// with the window normalised to unit sum, so the output keeps the input
/// length.
///
/// # Defaults
///
/// | Parameter    | Default |
/// |--------------|---------|
/// | `window_len` | 5       |
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WindowFilter {
    kind: WindowKind,
    window_len: usize,
}

impl WindowFilter {
    /// Create a filter of the given kind with the default window length.
    #[must_use]
    pub fn new(kind: WindowKind) -> Self {
        Self { kind, window_len: 5 }
    }

    /// Set the window length.
    #[must_use]
    pub fn with_window_len(mut self, window_len: usize) -> Self {
        self.window_len = window_len;
        self
    }

    /// Return the window kind.
    #[must_use]
    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    /// Return the window length.
    #[must_use]
    pub fn window_len(&self) -> usize {
        self.window_len
    }

    /// Smooth a single vector.
    ///
    /// Windows shorter than 3 samples leave the input unchanged.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`FilterError::EmptyInput`] | `values` is empty |
    /// | [`FilterError::SeriesTooShort`] | `values.len() <= window_len` |
    /// | [`FilterError::EvenWindowLen`] | `window_len` is even and at least 3 |
    /// | [`FilterError::NonFiniteValue`] | `values` contains NaN or infinity |
    #[instrument(skip(values), fields(n = values.len()))]
    pub fn apply(&self, values: &[f64]) -> Result<Vec<f64>, FilterError> {
        check_input(values)?;
        self.check_len(values.len())?;
        Ok(self.smooth(values))
    }

    /// Smooth every column of `series` independently.
    ///
    /// # Errors
    ///
    /// The errors of [`apply`](Self::apply), with
    /// [`FilterError::NonFiniteColumn`] in place of `NonFiniteValue`.
    #[instrument(skip(series), fields(rows = series.len(), columns = series.n_columns()))]
    pub fn apply_series(&self, series: &TimeSeries) -> Result<TimeSeries, FilterError> {
        if series.is_empty() {
            return Err(FilterError::EmptyInput);
        }
        self.check_len(series.len())?;
        let filtered = filter_columns(series, |values| Ok(self.smooth(values)))?;
        info!(columns = filtered.n_columns(), kind = ?self.kind, "series filtered");
        Ok(filtered)
    }

    fn check_len(&self, len: usize) -> Result<(), FilterError> {
        if len <= self.window_len {
            return Err(FilterError::SeriesTooShort {
                len,
                window_len: self.window_len,
            });
        }
        if self.window_len >= 3 && self.window_len % 2 == 0 {
            return Err(FilterError::EvenWindowLen {
                window_len: self.window_len,
            });
        }
        Ok(())
    }

    fn smooth(&self, values: &[f64]) -> Vec<f64> {
        if self.window_len < 3 {
            return values.to_vec();
        }
        let weights = self.kind.weights(self.window_len);
        let total: f64 = weights.iter().sum();
        let normalised: Vec<f64> = weights.iter().map(|w| w / total).collect();
        let padded = reflect_pad(values, self.window_len / 2);
        convolve(&padded, &normalised, ConvolveMode::Valid)
    }
}

/// Extend `values` by `pad` samples on each side, mirrored about the edge samples.
///
/// Requires `pad < values.len()`.
fn reflect_pad(values: &[f64], pad: usize) -> Vec<f64> {
    let n = values.len();
    let left = (1..=pad).rev().map(|i| values[i]);
    let right = (n - 1 - pad..n - 1).rev().map(|i| values[i]);
    left.chain(values.iter().copied()).chain(right).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflect_pad_mirrors_without_edge() {
        assert_eq!(
            reflect_pad(&[1.0, 2.0, 3.0, 4.0, 5.0], 2),
            vec![3.0, 2.0, 1.0, 2.0, 3.0, 4.0, 5.0, 4.0, 3.0]
        );
    }

    #[test]
    fn flat_window_is_moving_average() {
        let out = WindowFilter::new(WindowKind::Flat)
            .with_window_len(3)
            .apply(&[1.0, 2.0, 3.0, 4.0, 5.0])
            .unwrap();
        // padded: [2,1,2,3,4,5,4]
        let expected = [5.0 / 3.0, 2.0, 3.0, 4.0, 13.0 / 3.0];
        for (g, e) in out.iter().zip(expected) {
            assert!((g - e).abs() < 1e-12, "got {g}, expected {e}");
        }
    }

    #[test]
    fn output_length_matches_input() {
        let v: Vec<f64> = (0..20).map(|i| (i as f64).sin()).collect();
        for kind in [
            WindowKind::Flat,
            WindowKind::Hanning,
            WindowKind::Hamming,
            WindowKind::Bartlett,
            WindowKind::Blackman,
        ] {
            let out = WindowFilter::new(kind).with_window_len(7).apply(&v).unwrap();
            assert_eq!(out.len(), v.len(), "{kind:?}");
        }
    }

    #[test]
    fn smoothing_preserves_constant() {
        let v = vec![2.5; 12];
        for kind in [WindowKind::Hanning, WindowKind::Blackman, WindowKind::Bartlett] {
            let out = WindowFilter::new(kind).apply(&v).unwrap();
            for x in out {
                assert!((x - 2.5).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn short_window_is_identity() {
        let v = [1.0, 5.0, 2.0];
        let out = WindowFilter::new(WindowKind::Hamming)
            .with_window_len(2)
            .apply(&v)
            .unwrap();
        assert_eq!(out, v.to_vec());
    }

    #[test]
    fn input_must_exceed_window() {
        let result = WindowFilter::new(WindowKind::Flat).apply(&[1.0; 5]);
        assert!(matches!(
            result,
            Err(FilterError::SeriesTooShort { len: 5, window_len: 5 })
        ));
    }

    #[test]
    fn even_window_rejected() {
        let result = WindowFilter::new(WindowKind::Flat)
            .with_window_len(4)
            .apply(&[1.0; 10]);
        assert!(matches!(result, Err(FilterError::EvenWindowLen { window_len: 4 })));
    }

    #[test]
    fn hanning_weights_match_reference() {
        let w = WindowKind::Hanning.weights(5);
        let expected = [0.0, 0.5, 1.0, 0.5, 0.0];
        for (g, e) in w.iter().zip(expected) {
            assert!((g - e).abs() < 1e-12);
        }
    }

    #[test]
    fn bartlett_weights_match_reference() {
        let w = WindowKind::Bartlett.weights(5);
        let expected = [0.0, 0.5, 1.0, 0.5, 0.0];
        for (g, e) in w.iter().zip(expected) {
            assert!((g - e).abs() < 1e-12);
        }
    }
}
