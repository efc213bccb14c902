//! Signal processing module - windowing, FFT and wave metric estimation

mod metrics;
mod spectral;
mod window;

pub use metrics::{
    analyze, average_period, estimate_direction, integrated_wave_height, significant_height,
    zero_crossing_period,
};
pub use spectral::{
    fft, hanning_window, peak_bin_index, phase_at_bin, power_spectral_density, spectral_moments,
};
pub use window::SignalWindow;

use thiserror::Error;

/// Errors in signal processing.
///
/// Degenerate input (empty sequences, flat signal, dropped samples) is
/// handled with neutral return values, never with these errors; they exist
/// for contract violations on explicit batch APIs.
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("insufficient data: need {needed}, have {available}")]
    InsufficientData { needed: usize, available: usize },

    #[error("invalid sampling rate: {0}")]
    InvalidSamplingRate(f64),
}
