//! Shared data types for the wave processing pipeline
//!
//! Everything the pipeline emits across its public surface lives here:
//! raw sensor samples, spectral moments, per-batch wave metrics, the
//! rolling measurement history record, and the UI-facing state snapshot.

use serde::{Deserialize, Serialize};

// ============================================================================
// Inbound Sensor Data
// ============================================================================

/// One triaxial accelerometer reading delivered by a sensor source.
///
/// The vertical axis carries heave acceleration (gravity already removed or
/// removable via [`crate::config::GRAVITY_MS2`]); the two horizontal axes
/// carry surge/sway used for direction estimation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorSample {
    /// Monotonic timestamp in nanoseconds, as provided by the platform
    pub timestamp_nanos: u64,
    /// Vertical (heave) acceleration in m/s²
    pub vertical: f64,
    /// Horizontal X (surge) acceleration in m/s²
    pub horizontal_x: f64,
    /// Horizontal Y (sway) acceleration in m/s²
    pub horizontal_y: f64,
}

impl SensorSample {
    /// Elapsed seconds between this sample and a previous one.
    ///
    /// Negative or zero when timestamps are duplicated or out of order;
    /// callers drop such samples (timing anomaly, handled as a no-op).
    pub fn dt_since(&self, previous: &SensorSample) -> f64 {
        (self.timestamp_nanos as i128 - previous.timestamp_nanos as i128) as f64 * 1e-9
    }
}

// ============================================================================
// Spectral Quantities
// ============================================================================

/// Zeroth, first and second moments of the one-sided power spectral density.
///
/// `m0` is proportional to total signal energy. All three are non-negative;
/// `m0 == 0` is the valid degenerate "no signal" state and every downstream
/// formula treats it as such rather than producing NaN.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpectralMoments {
    pub m0: f64,
    pub m1: f64,
    pub m2: f64,
}

impl SpectralMoments {
    pub const ZERO: SpectralMoments = SpectralMoments {
        m0: 0.0,
        m1: 0.0,
        m2: 0.0,
    };

    /// True when the spectrum carried no energy (flat or absent signal).
    pub fn is_degenerate(&self) -> bool {
        self.m0 <= 0.0
    }
}

// ============================================================================
// Wave Metrics
// ============================================================================

/// Wave metrics derived from one analysis batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveMetrics {
    /// Significant wave height Hm0 in meters (>= 0)
    pub significant_height: f64,
    /// Average period m0/m1 in seconds (>= 0)
    pub average_period: f64,
    /// Zero-crossing period sqrt(m0/m2) in seconds (>= 0)
    pub zero_crossing_period: f64,
    /// Propagation direction in degrees, normalized into [0, 360)
    pub direction: f64,
}

impl WaveMetrics {
    /// Neutral metrics for degenerate input (sensor dropout, flat signal).
    pub const ZERO: WaveMetrics = WaveMetrics {
        significant_height: 0.0,
        average_period: 0.0,
        zero_crossing_period: 0.0,
        direction: 0.0,
    };
}

/// One finalized sample of the output series.
///
/// `time` is seconds elapsed since the start of the current recording
/// session (monotonic, not wall-clock).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasuredWaveData {
    /// Seconds since session start
    pub time: f64,
    /// Smoothed significant wave height in meters
    pub height: f64,
    /// Smoothed average period in seconds
    pub period: f64,
    /// Propagation direction in degrees [0, 360)
    pub direction: f64,
}

// ============================================================================
// Pipeline Status
// ============================================================================

/// Processing state exposed to the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineStatus {
    /// No samples received yet
    Idle,
    /// Buffer filling, not yet eligible for batch processing
    Accumulating,
    /// Buffer at capacity, estimates being produced each cycle
    Ready,
}

impl std::fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineStatus::Idle => write!(f, "Idle"),
            PipelineStatus::Accumulating => write!(f, "Accumulating"),
            PipelineStatus::Ready => write!(f, "Ready"),
        }
    }
}

// ============================================================================
// UI-Facing State
// ============================================================================

/// Snapshot of the pipeline's outward-facing state.
///
/// Wrapped in `Arc<RwLock<>>` and updated at the processing cadence; the
/// excluded UI/export collaborators only ever read it. Height, period and
/// direction are `None` until the first successful batch ("collecting
/// data..." state).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveUiState {
    /// Rolling history of finalized measurements, oldest first (cap 50)
    pub measured_waves: Vec<MeasuredWaveData>,

    /// Latest smoothed significant wave height (m)
    pub height: Option<f64>,

    /// Latest smoothed average period (s)
    pub period: Option<f64>,

    /// Latest propagation direction (deg)
    pub direction: Option<f64>,

    /// Composite big-wave confidence score in [0, 1]
    pub big_wave_confidence: f64,

    /// Whether the forecaster currently predicts a big wave
    pub big_wave_predicted: bool,

    /// Current processing state
    pub status: PipelineStatus,

    /// Total sensor samples admitted this session
    pub samples_collected: usize,

    /// Total analysis batches completed this session
    pub total_analyses: u64,

    /// Wall-clock time of the most recent analysis
    pub last_analysis_time: Option<chrono::DateTime<chrono::Utc>>,
}

impl Default for WaveUiState {
    fn default() -> Self {
        Self {
            measured_waves: Vec::new(),
            height: None,
            period: None,
            direction: None,
            big_wave_confidence: 0.0,
            big_wave_predicted: false,
            status: PipelineStatus::Idle,
            samples_collected: 0,
            total_analyses: 0,
            last_analysis_time: None,
        }
    }
}

impl WaveUiState {
    /// True once at least one batch has produced metrics.
    pub fn has_metrics(&self) -> bool {
        self.height.is_some()
    }
}
