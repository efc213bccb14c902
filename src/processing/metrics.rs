//! Wave metric estimation from spectral moments
//!
//! Converts spectral moments into significant wave height and period
//! estimates, derives propagation direction from the cross-axis phase
//! difference at the spectral peak, and carries the time-domain
//! double-integration height estimate used when the spectrum is degenerate.
//!
//! The direction estimate is a simplified proxy for wave heading (not a
//! true directional spectrum); its behavior is preserved exactly rather
//! than physically improved.

use super::spectral::{fft, hanning_window, peak_bin_index, phase_at_bin, power_spectral_density, spectral_moments};
use crate::types::WaveMetrics;

/// Significant wave height Hm0: `4 * sqrt(m0)`.
///
/// The standard oceanographic estimate of the average height among the
/// largest third of waves. Non-positive `m0` means "no signal" and maps
/// to 0 rather than NaN.
pub fn significant_height(m0: f64) -> f64 {
    if m0 <= 0.0 {
        return 0.0;
    }
    4.0 * m0.sqrt()
}

/// Average period `m0 / m1`, 0 when `m1` is 0.
pub fn average_period(m0: f64, m1: f64) -> f64 {
    if m1 == 0.0 {
        return 0.0;
    }
    m0 / m1
}

/// Zero-crossing period `sqrt(m0 / m2)`, 0 when `m2` is 0.
pub fn zero_crossing_period(m0: f64, m2: f64) -> f64 {
    if m2 == 0.0 {
        return 0.0;
    }
    let ratio = m0 / m2;
    if ratio <= 0.0 {
        return 0.0;
    }
    ratio.sqrt()
}

/// Propagation direction from the cross-axis phase difference, in
/// degrees normalized into `[0, 360)`.
///
/// Both horizontal axes are Hanning-windowed and transformed, each axis's
/// peak bin is found independently, and the phase difference
/// `phase_y - phase_x` at those peaks is converted to degrees (+360 when
/// negative). Empty input on either axis returns 0.
pub fn estimate_direction(horizontal_x: &[f64], horizontal_y: &[f64]) -> f64 {
    if horizontal_x.is_empty() || horizontal_y.is_empty() {
        return 0.0;
    }

    let spectrum_x = fft(&hanning_window(horizontal_x));
    let spectrum_y = fft(&hanning_window(horizontal_y));

    let phase_x = phase_at_bin(&spectrum_x, peak_bin_index(&spectrum_x));
    let phase_y = phase_at_bin(&spectrum_y, peak_bin_index(&spectrum_y));

    let mut degrees = (phase_y - phase_x).to_degrees();
    if degrees < 0.0 {
        degrees += 360.0;
    }
    degrees
}

/// Time-domain wave height: de-mean the vertical acceleration series,
/// double-integrate it (rectangular rule) and return the peak-to-peak
/// displacement.
///
/// Removing the mean first makes a constant (zero-variance) series yield
/// exactly 0 and suppresses gravity/bias drift in the double integral.
/// Returns 0 for empty input or non-positive `dt`.
pub fn integrated_wave_height(vertical: &[f64], dt: f64) -> f64 {
    if vertical.is_empty() || dt <= 0.0 {
        return 0.0;
    }

    let mean = vertical.iter().sum::<f64>() / vertical.len() as f64;

    let mut velocity = 0.0;
    let mut displacement = 0.0;
    let mut min_disp = f64::MAX;
    let mut max_disp = f64::MIN;
    for &a in vertical {
        velocity += (a - mean) * dt;
        displacement += velocity * dt;
        min_disp = min_disp.min(displacement);
        max_disp = max_disp.max(displacement);
    }

    max_disp - min_disp
}

/// Run the full per-batch estimation: Hanning window and FFT the vertical
/// axis, integrate spectral moments, derive heights and periods, and
/// estimate direction from the horizontal axes.
///
/// Degenerate input (empty axes, flat signal, non-positive sampling rate)
/// returns [`WaveMetrics::ZERO`] so the pipeline stays live through sensor
/// dropouts.
pub fn analyze(
    vertical: &[f64],
    horizontal_x: &[f64],
    horizontal_y: &[f64],
    sampling_rate: f64,
) -> WaveMetrics {
    if vertical.is_empty() || sampling_rate <= 0.0 {
        return WaveMetrics::ZERO;
    }

    let spectrum = fft(&hanning_window(vertical));
    let psd = power_spectral_density(&spectrum);
    let moments = spectral_moments(&psd, sampling_rate);

    if moments.is_degenerate() {
        tracing::debug!("Degenerate spectrum (no energy), emitting zero metrics");
        return WaveMetrics::ZERO;
    }

    WaveMetrics {
        significant_height: significant_height(moments.m0),
        average_period: average_period(moments.m0, moments.m1),
        zero_crossing_period: zero_crossing_period(moments.m0, moments.m2),
        direction: estimate_direction(horizontal_x, horizontal_y),
    }
}
