//! Trend analysis and big-wave forecasting
//!
//! Operates read-only on the rolling measurement history: moving averages,
//! ordinary-least-squares trend, z-score outlier detection, and a composite
//! "big wave coming" confidence score. All arithmetic guards (empty series,
//! zero variance, short series) return neutral values; nothing here panics
//! or produces NaN on the public surface.

use crate::config::ForecastConfig;
use crate::types::MeasuredWaveData;
use statrs::statistics::Statistics;

/// Sliding average of the given width.
///
/// Returns an empty vector when `window < 1` or the series is shorter than
/// the window; otherwise the result has length `series.len() - window + 1`.
pub fn moving_average(series: &[f64], window: usize) -> Vec<f64> {
    if window < 1 || series.len() < window {
        return Vec::new();
    }

    series
        .windows(window)
        .map(|w| w.iter().sum::<f64>() / window as f64)
        .collect()
}

/// Ordinary-least-squares slope of the series against index `0..n-1`.
/// Fewer than two points have no trend: returns 0.
pub fn slope(series: &[f64]) -> f64 {
    ols_line(series).map_or(0.0, |(m, _)| m)
}

/// Linear extrapolation one step beyond the series using the OLS line.
/// `None` for fewer than two points.
pub fn forecast_next(series: &[f64]) -> Option<f64> {
    let (m, b) = ols_line(series)?;
    Some(m * series.len() as f64 + b)
}

/// OLS `(slope, intercept)` fit, `None` for fewer than two points or a
/// degenerate denominator.
fn ols_line(series: &[f64]) -> Option<(f64, f64)> {
    let n = series.len();
    if n < 2 {
        return None;
    }

    let n_f = n as f64;
    let sum_x = (n * (n - 1)) as f64 / 2.0;
    let sum_x2 = ((n - 1) * n * (2 * n - 1)) as f64 / 6.0;
    let sum_y: f64 = series.iter().sum();
    let sum_xy: f64 = series.iter().enumerate().map(|(i, &y)| i as f64 * y).sum();

    let denominator = n_f * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 {
        return None;
    }

    let m = (n_f * sum_xy - sum_x * sum_y) / denominator;
    let b = (sum_y - m * sum_x) / n_f;
    Some((m, b))
}

/// Sample standard deviation (sum of squared deviations divided by `n-1`).
/// 0 for fewer than two points.
pub fn standard_deviation(series: &[f64]) -> f64 {
    if series.len() < 2 {
        return 0.0;
    }
    // statrs Statistics::std_dev uses the n-1 divisor
    series.std_dev()
}

/// Z-score of the last element against the mean and sample standard
/// deviation of the full series. Guards zero variance and short series
/// by returning 0.
pub fn z_score(series: &[f64]) -> f64 {
    if series.len() < 2 {
        return 0.0;
    }
    let std_dev = standard_deviation(series);
    if std_dev == 0.0 {
        return 0.0;
    }
    let mean = series.mean();
    (series[series.len() - 1] - mean) / std_dev
}

/// Composite big-wave confidence in `[0, 1]`.
///
/// Blends a logistic-squashed height-trend term with a logistic-squashed
/// z-score term over the most recent `trend_window` heights. Both terms are
/// strictly increasing in their input, so confidence is monotone in (a) the
/// recent height slope and (b) the latest height's z-score. Histories
/// shorter than three measurements score 0 (not enough evidence).
pub fn next_big_wave_confidence(history: &[MeasuredWaveData], config: &ForecastConfig) -> f64 {
    if history.len() < 3 {
        return 0.0;
    }

    let start = history.len().saturating_sub(config.trend_window);
    let heights: Vec<f64> = history[start..].iter().map(|m| m.height).collect();

    let trend_term = logistic(slope(&heights) / config.slope_scale);
    let outlier_term = logistic(z_score(&heights) / config.z_score_scale);

    let confidence = 0.6 * trend_term + 0.4 * outlier_term;
    confidence.clamp(0.0, 1.0)
}

/// Whether a big wave is predicted: confidence above the configured
/// threshold.
pub fn predict_next_big_wave(history: &[MeasuredWaveData], config: &ForecastConfig) -> bool {
    next_big_wave_confidence(history, config) > config.big_wave_threshold
}

/// Standard logistic squashing onto (0, 1), centered at 0.5 for zero input.
fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ForecastConfig;

    fn history_with_heights(heights: &[f64]) -> Vec<MeasuredWaveData> {
        heights
            .iter()
            .enumerate()
            .map(|(i, &h)| MeasuredWaveData {
                time: i as f64 * 2.0,
                height: h,
                period: 8.0,
                direction: 120.0,
            })
            .collect()
    }

    #[test]
    fn test_moving_average_known_values() {
        let averaged = moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(averaged.len(), 3);
        assert!((averaged[0] - 2.0).abs() < 1e-12);
        assert!((averaged[1] - 3.0).abs() < 1e-12);
        assert!((averaged[2] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_moving_average_degenerate_windows() {
        assert!(moving_average(&[1.0, 2.0, 3.0], 0).is_empty());
        assert!(moving_average(&[1.0, 2.0], 3).is_empty());
        assert_eq!(moving_average(&[1.0, 2.0], 2), vec![1.5]);
    }

    #[test]
    fn test_slope_of_perfect_line() {
        assert!((slope(&[1.0, 2.0, 3.0, 4.0, 5.0]) - 1.0).abs() < 1e-12);
        assert!((slope(&[10.0, 8.0, 6.0]) + 2.0).abs() < 1e-12);
        assert_eq!(slope(&[5.0]), 0.0);
        assert_eq!(slope(&[]), 0.0);
    }

    #[test]
    fn test_forecast_next_extrapolates() {
        let next = forecast_next(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert!((next - 6.0).abs() < 1e-9);
        assert!(forecast_next(&[1.0]).is_none());
        assert!(forecast_next(&[]).is_none());
    }

    #[test]
    fn test_sample_standard_deviation() {
        // Canonical fixture: sum of squared deviations is 32 over n-1 = 7
        let sd = standard_deviation(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((sd - (32.0_f64 / 7.0).sqrt()).abs() < 1e-9);
        assert_eq!(standard_deviation(&[5.0]), 0.0);
        assert_eq!(standard_deviation(&[]), 0.0);
    }

    #[test]
    fn test_z_score_guards() {
        assert_eq!(z_score(&[]), 0.0);
        assert_eq!(z_score(&[1.0]), 0.0);
        // Zero variance
        assert_eq!(z_score(&[3.0, 3.0, 3.0]), 0.0);
    }

    #[test]
    fn test_z_score_of_outlier() {
        let z = z_score(&[1.0, 1.0, 1.0, 1.0, 5.0]);
        assert!(z > 1.0, "outlier z-score should be clearly positive, got {z}");
    }

    #[test]
    fn test_confidence_bounded_and_short_history_zero() {
        let config = ForecastConfig::default();
        assert_eq!(
            next_big_wave_confidence(&history_with_heights(&[1.0, 2.0]), &config),
            0.0
        );

        let rising = history_with_heights(&[1.0, 1.5, 2.0, 2.5, 3.0, 4.0]);
        let c = next_big_wave_confidence(&rising, &config);
        assert!((0.0..=1.0).contains(&c));
    }

    #[test]
    fn test_confidence_monotone_in_slope() {
        let config = ForecastConfig::default();
        let flat = history_with_heights(&[1.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
        let gentle = history_with_heights(&[1.0, 1.1, 1.2, 1.3, 1.4, 1.5]);
        let steep = history_with_heights(&[1.0, 1.5, 2.0, 2.5, 3.0, 3.5]);

        let c_flat = next_big_wave_confidence(&flat, &config);
        let c_gentle = next_big_wave_confidence(&gentle, &config);
        let c_steep = next_big_wave_confidence(&steep, &config);

        assert!(c_gentle >= c_flat);
        assert!(c_steep >= c_gentle);
    }

    #[test]
    fn test_confidence_monotone_in_z_score() {
        let config = ForecastConfig::default();
        // Identical base, last height increasingly anomalous
        let mild = history_with_heights(&[2.0, 2.1, 1.9, 2.0, 2.1, 2.3]);
        let spike = history_with_heights(&[2.0, 2.1, 1.9, 2.0, 2.1, 3.5]);

        assert!(
            next_big_wave_confidence(&spike, &config)
                >= next_big_wave_confidence(&mild, &config)
        );
    }

    #[test]
    fn test_prediction_threshold() {
        let config = ForecastConfig::default();
        let flat = history_with_heights(&[1.0; 8]);
        assert!(!predict_next_big_wave(&flat, &config));

        let surging = history_with_heights(&[0.5, 1.0, 1.5, 2.0, 2.5, 3.2, 4.0, 5.5]);
        assert!(predict_next_big_wave(&surging, &config));
    }
}
