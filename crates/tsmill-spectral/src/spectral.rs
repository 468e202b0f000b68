//! FFT low-pass and high-pass filtering with an edge-smoothed mask.

use std::iter;

use num_complex::Complex;
use rustfft::FftPlanner;
use tracing::{debug, info, instrument};
use tsmill_series::TimeSeries;

use crate::columns::{check_input, filter_columns};
use crate::convolve::{convolve, ConvolveMode};
use crate::error::FilterError;

/// Which side of the cutoff is retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pass {
    /// Keep periods longer than the cutoff.
    Low,
    /// Keep periods shorter than the cutoff.
    High,
}

/// FFT filter configuration.
///
/// Both `cutoff_period` and `window_len` are mandatory; they are optional
/// here only so that an incomplete configuration can be built (for example
/// deserialized) and rejected when applied.
///
/// The cutoff period is in sample units: a cutoff of 10 separates content
/// with periods longer than 10 samples from content with shorter periods.
/// `window_len` is the length of the moving average that smooths the mask
/// edge to limit ringing.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpectralFilter {
    pass: Pass,
    cutoff_period: Option<f64>,
    window_len: Option<usize>,
}

impl SpectralFilter {
    /// Create an unconfigured filter for the given pass band.
    #[must_use]
    pub fn new(pass: Pass) -> Self {
        Self {
            pass,
            cutoff_period: None,
            window_len: None,
        }
    }

    /// Create an unconfigured low-pass filter.
    #[must_use]
    pub fn lowpass() -> Self {
        Self::new(Pass::Low)
    }

    /// Create an unconfigured high-pass filter.
    #[must_use]
    pub fn highpass() -> Self {
        Self::new(Pass::High)
    }

    /// Set the cutoff period, in samples.
    #[must_use]
    pub fn with_cutoff_period(mut self, cutoff_period: f64) -> Self {
        self.cutoff_period = Some(cutoff_period);
        self
    }

    /// Set the length of the mask smoothing window.
    #[must_use]
    pub fn with_window_len(mut self, window_len: usize) -> Self {
        self.window_len = Some(window_len);
        self
    }

    /// Return the pass band.
    #[must_use]
    pub fn pass(&self) -> Pass {
        self.pass
    }

    /// Return the cutoff period, if set.
    #[must_use]
    pub fn cutoff_period(&self) -> Option<f64> {
        self.cutoff_period
    }

    /// Return the smoothing window length, if set.
    #[must_use]
    pub fn window_len(&self) -> Option<usize> {
        self.window_len
    }

    /// Filter a single vector. The output has the same length as the input.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`FilterError::MissingCutoffPeriod`] | cutoff period not set |
    /// | [`FilterError::MissingWindowLen`] | window length not set |
    /// | [`FilterError::InvalidCutoffPeriod`] | cutoff period `<= 0` or not finite |
    /// | [`FilterError::InvalidWindowLen`] | window length is zero or exceeds `values.len()` |
    /// | [`FilterError::EmptyInput`] | `values` is empty |
    /// | [`FilterError::NonFiniteValue`] | `values` contains NaN or infinity |
    #[instrument(skip(values), fields(n = values.len()))]
    pub fn apply(&self, values: &[f64]) -> Result<Vec<f64>, FilterError> {
        let (cutoff_period, window_len) = self.validated()?;
        check_input(values)?;
        fits(window_len, values.len())?;
        Ok(transform(values, self.pass, cutoff_period, window_len))
    }

    /// Filter every column of `series` independently.
    ///
    /// # Errors
    ///
    /// The configuration errors of [`apply`](Self::apply), plus
    /// [`FilterError::NonFiniteColumn`] when a column has missing values.
    #[instrument(skip(series), fields(rows = series.len(), columns = series.n_columns()))]
    pub fn apply_series(&self, series: &TimeSeries) -> Result<TimeSeries, FilterError> {
        let (cutoff_period, window_len) = self.validated()?;
        if series.is_empty() {
            return Err(FilterError::EmptyInput);
        }
        fits(window_len, series.len())?;
        let filtered = filter_columns(series, |values| {
            Ok(transform(values, self.pass, cutoff_period, window_len))
        })?;
        info!(columns = filtered.n_columns(), pass = ?self.pass, "series filtered");
        Ok(filtered)
    }

    fn validated(&self) -> Result<(f64, usize), FilterError> {
        let cutoff_period = self.cutoff_period.ok_or(FilterError::MissingCutoffPeriod)?;
        let window_len = self.window_len.ok_or(FilterError::MissingWindowLen)?;
        if !(cutoff_period.is_finite() && cutoff_period > 0.0) {
            return Err(FilterError::InvalidCutoffPeriod { cutoff_period });
        }
        Ok((cutoff_period, window_len))
    }
}

/// The smoothing window must hold at least one bin and be no wider than the signal.
fn fits(window_len: usize, len: usize) -> Result<(), FilterError> {
    if window_len == 0 || window_len > len {
        return Err(FilterError::InvalidWindowLen { window_len, len });
    }
    Ok(())
}

/// Low-pass filter `vector`, keeping periods longer than `cutoff_period`.
///
/// # Errors
///
/// See [`SpectralFilter::apply`].
pub fn lowpass(
    vector: &[f64],
    cutoff_period: Option<f64>,
    window_len: Option<usize>,
) -> Result<Vec<f64>, FilterError> {
    configured(Pass::Low, cutoff_period, window_len).apply(vector)
}

/// High-pass filter `vector`, keeping periods shorter than `cutoff_period`.
///
/// # Errors
///
/// See [`SpectralFilter::apply`].
pub fn highpass(
    vector: &[f64],
    cutoff_period: Option<f64>,
    window_len: Option<usize>,
) -> Result<Vec<f64>, FilterError> {
    configured(Pass::High, cutoff_period, window_len).apply(vector)
}

fn configured(pass: Pass, cutoff_period: Option<f64>, window_len: Option<usize>) -> SpectralFilter {
    SpectralFilter {
        pass,
        cutoff_period,
        window_len,
    }
}

/// Forward FFT, mask the one-sided spectrum, inverse FFT.
///
/// The mask is real, so scaling bin `k` and its mirror `n - k` by the same
/// factor keeps the spectrum Hermitian and the inverse real.
fn transform(values: &[f64], pass: Pass, cutoff_period: f64, window_len: usize) -> Vec<f64> {
    let n = values.len();
    let mask = smoothed_mask(n, pass, cutoff_period, window_len);

    let mut planner = FftPlanner::<f64>::new();
    let forward = planner.plan_fft_forward(n);
    let inverse = planner.plan_fft_inverse(n);

    let mut buffer: Vec<Complex<f64>> = values.iter().map(|&x| Complex::new(x, 0.0)).collect();
    forward.process(&mut buffer);

    for (k, bin) in buffer.iter_mut().enumerate() {
        let mirrored = if k < mask.len() { k } else { n - k };
        *bin *= mask[mirrored];
    }

    inverse.process(&mut buffer);

    let scale = n as f64;
    buffer.iter().map(|c| c.re / scale).collect()
}

/// Build the per-bin mask for a real FFT of length `n`.
///
/// Bin `k` (for `k` in `0..=n/2`) has frequency `k / n`. The hard mask is
/// padded by `window_len + 1` on each side with the value the retained band
/// continues into, smoothed by a `window_len` moving average, and trimmed
/// back to `n/2 + 1` bins.
fn smoothed_mask(n: usize, pass: Pass, cutoff_period: f64, window_len: usize) -> Vec<f64> {
    let n_bins = n / 2 + 1;
    let cutoff_freq = 1.0 / cutoff_period;
    let pad = window_len + 1;
    let (low_fill, high_fill) = match pass {
        Pass::Low => (1.0, 0.0),
        Pass::High => (0.0, 1.0),
    };

    let hard = (0..n_bins).map(|k| {
        let freq = k as f64 / n as f64;
        let keep = match pass {
            Pass::Low => freq <= cutoff_freq,
            Pass::High => freq >= cutoff_freq,
        };
        if keep { 1.0 } else { 0.0 }
    });

    let padded: Vec<f64> = iter::repeat_n(low_fill, pad)
        .chain(hard)
        .chain(iter::repeat_n(high_fill, pad))
        .collect();

    let kernel = vec![1.0 / window_len as f64; window_len];
    let smoothed = convolve(&padded, &kernel, ConvolveMode::Same);
    let mask = smoothed[pad..pad + n_bins].to_vec();

    debug!(
        n_bins,
        cutoff_freq,
        retained = mask.iter().filter(|&&m| m > 0.0).count(),
        "spectral mask built"
    );
    mask
}
