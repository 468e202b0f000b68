//! Discrete linear convolution.

/// Output size of [`convolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvolveMode {
    /// Every point of overlap: length `n + m - 1`.
    Full,
    /// Centred on the full result: length `max(n, m)`.
    Same,
    /// Only points where the inputs fully overlap: length `max(n, m) - min(n, m) + 1`.
    Valid,
}

/// Convolve two sequences.
///
/// The operation is commutative; the longer input is treated as the signal.
/// In [`ConvolveMode::Same`] the output starts at offset `(min(n, m) - 1) / 2`
/// of the full convolution, so even-length kernels lean left.
/// Returns an empty vector if either input is empty.
#[must_use]
pub fn convolve(a: &[f64], b: &[f64], mode: ConvolveMode) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let (signal, kernel) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let n = signal.len();
    let m = kernel.len();

    let (start, len) = match mode {
        ConvolveMode::Full => (0, n + m - 1),
        ConvolveMode::Same => ((m - 1) / 2, n),
        ConvolveMode::Valid => (m - 1, n - m + 1),
    };

    (start..start + len)
        .map(|k| {
            // full[k] = sum_j kernel[j] * signal[k - j] over valid signal indices
            let lo = k.saturating_sub(n - 1);
            let hi = k.min(m - 1);
            (lo..=hi).map(|j| kernel[j] * signal[k - j]).sum()
        })
        .collect()
}
