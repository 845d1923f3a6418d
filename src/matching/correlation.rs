//! Full cross-correlation of a recording window against a template
//!
//! Computes `c[k] = Σ_n signal[n + k - (M - 1)] · template[n]` for every
//! alignment `k` in `0..N + M - 1` (the "full" mode), where `N` is the signal
//! length and `M` the template length. Index `k` corresponds to lag
//! `k - (M - 1)`, so the template starts at signal position `k - (M - 1)`.
//!
//! # Algorithm
//!
//! Correlation equals convolution with the time-reversed template:
//!
//! 1. Zero-pad the signal and the reversed template to a power of two
//!    `>= N + M - 1`
//! 2. Forward FFT of both
//! 3. Pointwise product
//! 4. Inverse FFT, scale by `1 / fft_size`, keep the first `N + M - 1` values
//!
//! Complexity is O(L log L) instead of the O(N·M) direct sum.

use crate::error::RemovalError;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Full cross-correlation of `signal` against `template`
///
/// # Returns
///
/// Vector of length `signal.len() + template.len() - 1`
///
/// # Errors
///
/// Returns `RemovalError::InvalidInput` if either input is empty
pub fn cross_correlate_full(signal: &[f32], template: &[f32]) -> Result<Vec<f32>, RemovalError> {
    if signal.is_empty() || template.is_empty() {
        return Err(RemovalError::InvalidInput(format!(
            "Cannot correlate empty input (signal={}, template={})",
            signal.len(),
            template.len()
        )));
    }

    let output_len = signal.len() + template.len() - 1;
    let fft_size = output_len.next_power_of_two();

    log::debug!(
        "Correlating {} frames against {}-frame template (fft size {})",
        signal.len(),
        template.len(),
        fft_size
    );

    let mut signal_spectrum: Vec<Complex<f32>> =
        signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
    signal_spectrum.resize(fft_size, Complex::new(0.0, 0.0));

    let mut template_spectrum: Vec<Complex<f32>> =
        template.iter().rev().map(|&x| Complex::new(x, 0.0)).collect();
    template_spectrum.resize(fft_size, Complex::new(0.0, 0.0));

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(fft_size);
    fft.process(&mut signal_spectrum);
    fft.process(&mut template_spectrum);

    for (s, t) in signal_spectrum.iter_mut().zip(template_spectrum.iter()) {
        *s *= *t;
    }
    drop(template_spectrum);

    let ifft = planner.plan_fft_inverse(fft_size);
    ifft.process(&mut signal_spectrum);

    let scale = 1.0 / fft_size as f32;
    Ok(signal_spectrum[..output_len]
        .iter()
        .map(|x| x.re * scale)
        .collect())
}

/// Index of the maximum value; the first one wins on ties
///
/// NaN values are never selected. Returns `None` for an empty slice.
pub fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}
