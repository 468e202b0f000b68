//! Accuracy regression tests for tsmill-spectral.
//!
//! These pin the numerical behaviour of the FFT and windowed filters on
//! fixed inputs so that refactors of the mask or convolution code are caught.

use chrono::{NaiveDate, TimeDelta};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tsmill_series::{Column, TimeSeries};
use tsmill_spectral::{highpass, lowpass, Filter, FilterError, WindowFilter, WindowKind};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn random_vector(seed: u64, n: usize) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

fn daily(columns: Vec<Column>) -> TimeSeries {
    let start = NaiveDate::from_ymd_opt(2000, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid start date");
    TimeSeries::regular(start, TimeDelta::days(1), columns).expect("valid test series")
}

// ---------------------------------------------------------------------------
// a) lowpass_and_highpass_are_complementary
// ---------------------------------------------------------------------------

/// With no bin exactly on the cutoff frequency the two smoothed masks sum to
/// one, so the two outputs must add back up to the input.
#[test]
fn lowpass_and_highpass_are_complementary() {
    for seed in 0..5 {
        let v = random_vector(seed, 64);
        let low = lowpass(&v, Some(10.0), Some(5)).unwrap();
        let high = highpass(&v, Some(10.0), Some(5)).unwrap();
        for (i, ((l, h), x)) in low.iter().zip(&high).zip(&v).enumerate() {
            assert!(
                (l + h - x).abs() < 1e-10,
                "seed {seed} index {i}: {l} + {h} != {x}"
            );
        }
    }
}

// ---------------------------------------------------------------------------
// b) highpass_removes_constant_offset
// ---------------------------------------------------------------------------

/// The DC bin is always zeroed by the high-pass mask.
#[test]
fn highpass_removes_constant_offset() {
    let v = vec![7.25; 40];
    let out = highpass(&v, Some(6.0), Some(3)).unwrap();
    for x in out {
        assert!(x.abs() < 1e-10, "expected zero, got {x}");
    }
}

// ---------------------------------------------------------------------------
// c) lowpass_preserves_mean
// ---------------------------------------------------------------------------

#[test]
fn lowpass_preserves_mean() {
    let v = random_vector(42, 101);
    let out = lowpass(&v, Some(12.0), Some(7)).unwrap();
    let mean_in: f64 = v.iter().sum::<f64>() / v.len() as f64;
    let mean_out: f64 = out.iter().sum::<f64>() / out.len() as f64;
    assert!((mean_in - mean_out).abs() < 1e-12);
}

// ---------------------------------------------------------------------------
// d) lowpass_reduces_roughness
// ---------------------------------------------------------------------------

/// Sum of squared first differences must drop after low-pass filtering noise.
#[test]
fn lowpass_reduces_roughness() {
    let roughness = |v: &[f64]| -> f64 { v.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum() };
    let v = random_vector(7, 128);
    let out = lowpass(&v, Some(16.0), Some(5)).unwrap();
    assert!(roughness(&out) < 0.25 * roughness(&v));
}

// ---------------------------------------------------------------------------
// e) series_columns_are_filtered_independently
// ---------------------------------------------------------------------------

#[test]
fn series_columns_are_filtered_independently() {
    let a = random_vector(1, 48);
    let b = random_vector(2, 48);
    let series = daily(vec![Column::new("a", a.clone()), Column::new("b", b.clone())]);

    let filter = Filter::from_name("fft_lowpass", Some(8.0), Some(3)).unwrap();
    let out = filter.apply_series(&series).unwrap();

    assert_eq!(out.index(), series.index());
    assert_eq!(out.column_names().collect::<Vec<_>>(), vec!["a", "b"]);
    let expected_a = lowpass(&a, Some(8.0), Some(3)).unwrap();
    let expected_b = lowpass(&b, Some(8.0), Some(3)).unwrap();
    assert_eq!(out.column("a").unwrap().values(), expected_a.as_slice());
    assert_eq!(out.column("b").unwrap().values(), expected_b.as_slice());
}

// ---------------------------------------------------------------------------
// f) missing_values_are_reported_per_column
// ---------------------------------------------------------------------------

#[test]
fn missing_values_are_reported_per_column() {
    let mut b = vec![1.0; 20];
    b[13] = f64::NAN;
    let series = daily(vec![Column::new("a", vec![0.0; 20]), Column::new("b", b)]);

    let result = Filter::from_name("fft_highpass", Some(4.0), Some(3))
        .unwrap()
        .apply_series(&series);
    match result {
        Err(FilterError::NonFiniteColumn { column, index }) => {
            assert_eq!(column, "b");
            assert_eq!(index, 13);
        }
        other => panic!("expected NonFiniteColumn, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// g) window_filters_match_known_values
// ---------------------------------------------------------------------------

/// Hanning with window 5 has normalised weights [0, 0.25, 0.5, 0.25, 0].
#[test]
fn window_filters_match_known_values() {
    let v = [0.0, 4.0, 0.0, 4.0, 0.0, 4.0, 0.0];
    let out = WindowFilter::new(WindowKind::Hanning).apply(&v).unwrap();
    // reflected: [0, 4, | 0, 4, 0, 4, 0, 4, 0 | 4, 0]
    let expected = [2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0];
    for (i, (g, e)) in out.iter().zip(expected).enumerate() {
        assert!((g - e).abs() < 1e-12, "index {i}: got {g}, expected {e}");
    }
}

// ---------------------------------------------------------------------------
// h) oversized_windows_are_rejected
// ---------------------------------------------------------------------------

#[test]
fn oversized_windows_are_rejected() {
    let series = daily(vec![Column::new("a", vec![1.0, 2.0, 3.0, 4.0])]);
    for window_len in [5, 1 << 40, usize::MAX] {
        let result = Filter::from_name("fft_lowpass", Some(2.0), Some(window_len))
            .unwrap()
            .apply_series(&series);
        assert!(
            matches!(result, Err(FilterError::InvalidWindowLen { len: 4, .. })),
            "window {window_len}: {result:?}"
        );
    }
    let result = Filter::from_name("hanning", None, Some(usize::MAX))
        .unwrap()
        .apply(&[1.0, 2.0, 3.0, 4.0]);
    assert!(matches!(result, Err(FilterError::SeriesTooShort { len: 4, .. })));
}
