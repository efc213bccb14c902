//! Spectral estimation using rustfft
//!
//! Hanning windowing, forward FFT, one-sided power spectral density and
//! spectral moment integration for the wave metrics pipeline. Input size is
//! whatever the rolling buffer currently holds; rustfft handles arbitrary
//! (non-power-of-two) lengths, so no zero padding is applied and the
//! frequency bookkeeping stays exact.

use crate::types::SpectralMoments;
use num_complex::Complex;
use rustfft::FftPlanner;
use std::f64::consts::PI;

/// Apply a Hanning window: sample `i` of `n` is scaled by
/// `0.5 * (1 - cos(2π·i/(n-1)))`.
///
/// For `n <= 1` there is no taper to compute (the denominator would be
/// zero); the input is returned unchanged.
pub fn hanning_window(samples: &[f64]) -> Vec<f64> {
    let n = samples.len();
    if n <= 1 {
        return samples.to_vec();
    }

    let denom = (n - 1) as f64;
    samples
        .iter()
        .enumerate()
        .map(|(i, &s)| s * 0.5 * (1.0 - (2.0 * PI * i as f64 / denom).cos()))
        .collect()
}

/// Forward DFT of a real-valued signal (standard semantics, no
/// normalization). Returns `n` complex bins; empty input returns an empty
/// spectrum rather than erroring, mirroring sensor-dropout reality.
pub fn fft(samples: &[f64]) -> Vec<Complex<f64>> {
    if samples.is_empty() {
        return Vec::new();
    }

    let mut buffer: Vec<Complex<f64>> =
        samples.iter().map(|&x| Complex::new(x, 0.0)).collect();

    let mut planner = FftPlanner::new();
    let plan = planner.plan_fft_forward(buffer.len());
    plan.process(&mut buffer);

    buffer
}

/// One-sided power spectral density of a spectrum of length `n`.
///
/// Output has length `n/2`; bin `i` is `(re² + im²) / n`.
pub fn power_spectral_density(spectrum: &[Complex<f64>]) -> Vec<f64> {
    let n = spectrum.len();
    if n == 0 {
        return Vec::new();
    }

    let scale = n as f64;
    spectrum
        .iter()
        .take(n / 2)
        .map(|c| (c.re * c.re + c.im * c.im) / scale)
        .collect()
}

/// Zeroth, first and second spectral moments of a one-sided PSD.
///
/// Frequency resolution is `df = sampling_rate / (2 * len(psd))`; bin `i`
/// sits at `f = i * df` and contributes `S*df`, `S*f*df`, `S*f²*df`. The
/// rectangular-rule discretization is part of the output contract and must
/// not be swapped for a trapezoidal integral.
pub fn spectral_moments(psd: &[f64], sampling_rate: f64) -> SpectralMoments {
    if psd.is_empty() || sampling_rate <= 0.0 {
        return SpectralMoments::ZERO;
    }

    let df = sampling_rate / (2.0 * psd.len() as f64);
    let mut moments = SpectralMoments::ZERO;
    for (i, &density) in psd.iter().enumerate() {
        let freq = i as f64 * df;
        moments.m0 += density * df;
        moments.m1 += density * freq * df;
        moments.m2 += density * freq * freq * df;
    }
    moments
}

/// Index of the maximum-magnitude bin among bins `1..n/2` (DC excluded).
///
/// Ties resolve to the first occurrence (left-to-right scan). Returns 0
/// when the spectrum has no usable non-DC bin.
pub fn peak_bin_index(spectrum: &[Complex<f64>]) -> usize {
    let half = spectrum.len() / 2;
    if half <= 1 {
        return 0;
    }

    let mut peak_idx = 1;
    let mut peak_mag = spectrum[1].norm_sqr();
    for (i, c) in spectrum.iter().enumerate().take(half).skip(2) {
        let mag = c.norm_sqr();
        if mag > peak_mag {
            peak_mag = mag;
            peak_idx = i;
        }
    }
    peak_idx
}

/// Phase `atan2(im, re)` at the given bin, 0 for out-of-range bins.
pub fn phase_at_bin(spectrum: &[Complex<f64>], bin: usize) -> f64 {
    spectrum.get(bin).map_or(0.0, |c| c.im.atan2(c.re))
}
