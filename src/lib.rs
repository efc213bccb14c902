//! Wavesense: Sensor-to-Wave-Metrics Signal Processing
//!
//! Turns a noisy stream of triaxial accelerometer samples into estimates of
//! significant wave height, dominant period and propagation direction, plus
//! a short-horizon big-wave forecast.
//!
//! ## Architecture
//!
//! - **SignalWindow**: fixed-capacity rolling sample buffer with a
//!   dynamically estimated sampling rate
//! - **Spectral analysis**: Hanning windowing, FFT, one-sided PSD and
//!   spectral moment integration
//! - **Wave metrics**: Hm0 height, average/zero-crossing periods, phase
//!   based direction
//! - **WaveDataProcessor**: timer-driven orchestration, smoothing, rolling
//!   measurement history
//! - **Trends**: moving average, OLS trend, z-score and the composite
//!   big-wave confidence score

pub mod acquisition;
pub mod config;
pub mod pipeline;
pub mod processing;
pub mod trends;
pub mod types;

// Re-export configuration
pub use config::{ConfigError, PipelineConfig};

// Re-export commonly used types
pub use types::{
    MeasuredWaveData, PipelineStatus, SensorSample, SpectralMoments, WaveMetrics, WaveUiState,
};

// Re-export the pipeline entry points
pub use pipeline::WaveDataProcessor;
pub use processing::{ProcessingError, SignalWindow};

// Re-export acquisition seams
pub use acquisition::{AcquisitionError, SensorSource};
