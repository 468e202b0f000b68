//! Filter selection by name.

use tsmill_series::TimeSeries;

use crate::error::FilterError;
use crate::spectral::SpectralFilter;
use crate::window::{WindowFilter, WindowKind};

/// Any of the supported filters.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Filter {
    /// FFT low-pass or high-pass.
    Spectral(SpectralFilter),
    /// Windowed time-domain smoothing.
    Window(WindowFilter),
}

impl Filter {
    /// Build a filter from its short name.
    ///
    /// Names are `flat`, `hanning`, `hamming`, `bartlett`, `blackman`,
    /// `fft_lowpass` and `fft_highpass`. `cutoff_period` is only used by the
    /// FFT filters; `window_len` falls back to the window default when `None`
    /// for the windowed filters but stays unset for the FFT filters, which
    /// then refuse to run.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::UnknownFilter`] for an unrecognised name.
    pub fn from_name(
        name: &str,
        cutoff_period: Option<f64>,
        window_len: Option<usize>,
    ) -> Result<Self, FilterError> {
        let spectral = match name {
            "fft_lowpass" => Some(SpectralFilter::lowpass()),
            "fft_highpass" => Some(SpectralFilter::highpass()),
            _ => None,
        };
        if let Some(mut filter) = spectral {
            if let Some(c) = cutoff_period {
                filter = filter.with_cutoff_period(c);
            }
            if let Some(w) = window_len {
                filter = filter.with_window_len(w);
            }
            return Ok(Self::Spectral(filter));
        }

        let kind = match name {
            "flat" => WindowKind::Flat,
            "hanning" => WindowKind::Hanning,
            "hamming" => WindowKind::Hamming,
            "bartlett" => WindowKind::Bartlett,
            "blackman" => WindowKind::Blackman,
            other => {
                return Err(FilterError::UnknownFilter {
                    name: other.to_string(),
                });
            }
        };
        let mut filter = WindowFilter::new(kind);
        if let Some(w) = window_len {
            filter = filter.with_window_len(w);
        }
        Ok(Self::Window(filter))
    }

    /// Filter a single vector.
    ///
    /// # Errors
    ///
    /// Whatever the underlying filter returns.
    pub fn apply(&self, values: &[f64]) -> Result<Vec<f64>, FilterError> {
        match self {
            Self::Spectral(f) => f.apply(values),
            Self::Window(f) => f.apply(values),
        }
    }

    /// Filter every column of `series`.
    ///
    /// # Errors
    ///
    /// Whatever the underlying filter returns.
    pub fn apply_series(&self, series: &TimeSeries) -> Result<TimeSeries, FilterError> {
        match self {
            Self::Spectral(f) => f.apply_series(series),
            Self::Window(f) => f.apply_series(series),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectral::Pass;

    #[test]
    fn fft_names_map_to_spectral() {
        let f = Filter::from_name("fft_highpass", Some(10.0), Some(3)).unwrap();
        match f {
            Filter::Spectral(s) => {
                assert_eq!(s.pass(), Pass::High);
                assert_eq!(s.cutoff_period(), Some(10.0));
                assert_eq!(s.window_len(), Some(3));
            }
            Filter::Window(_) => panic!("expected spectral filter"),
        }
    }

    #[test]
    fn window_names_use_default_length() {
        let f = Filter::from_name("blackman", None, None).unwrap();
        assert_eq!(
            f,
            Filter::Window(WindowFilter::new(WindowKind::Blackman))
        );
    }

    #[test]
    fn fft_without_window_fails_on_apply() {
        let f = Filter::from_name("fft_lowpass", Some(10.0), None).unwrap();
        assert!(matches!(f.apply(&[1.0, 2.0]), Err(FilterError::MissingWindowLen)));
    }

    #[test]
    fn unknown_name_rejected() {
        let result = Filter::from_name("kalman", None, None);
        assert!(matches!(result, Err(FilterError::UnknownFilter { .. })));
    }

    #[test]
    fn tagged_json_round_trip() {
        let f = Filter::from_name("fft_lowpass", Some(24.0), Some(5)).unwrap();
        let json = serde_json::to_string(&f).unwrap();
        assert!(json.contains(r#""type":"spectral""#));
        let back: Filter = serde_json::from_str(&json).unwrap();
        assert_eq!(back, f);
    }
}
