//! Wave Data Processor
//!
//! The core orchestration component that coordinates:
//! - Sensor sample buffering (fixed-capacity sliding window)
//! - Timer-driven spectral analysis on buffer snapshots
//! - Exponential smoothing of height and period across batches
//! - The rolling measurement history consumed by the trend forecaster
//! - UI-facing state updates at the processing cadence
//!
//! # Architecture
//!
//! Ingest is a short critical section (append plus optional evict) driven
//! at sensor rate; analysis runs from a low-frequency periodic timer on an
//! owned snapshot of the buffer, so neither path blocks the other and no
//! slice crosses the task boundary aliased. All per-session accumulator
//! state (smoothing, last timestamp, history) lives on the processor
//! instance and is constructed fresh per recording session.

use crate::config::{PipelineConfig, GRAVITY_MS2};
use crate::processing::{self, ProcessingError, SignalWindow};
use crate::trends;
use crate::types::{MeasuredWaveData, PipelineStatus, SensorSample, WaveUiState};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::Receiver;
use tokio::sync::RwLock;
use tracing::{debug, info, trace};

/// Orchestrates the sensor-to-wave-metrics pipeline for one session.
pub struct WaveDataProcessor {
    config: PipelineConfig,

    /// Rolling triaxial sample window
    window: SignalWindow,

    /// Bounded measurement history, oldest first
    history: VecDeque<MeasuredWaveData>,

    /// Previous smoothed (height, period); `None` until the first batch
    smoothing_state: Option<(f64, f64)>,

    /// Last admitted sample, for dt computation (explicit field, reset on
    /// clear - never process-wide state)
    last_sample: Option<SensorSample>,

    /// Monotonic session time base
    session_start: Instant,

    samples_collected: usize,
    total_analyses: u64,
}

impl WaveDataProcessor {
    pub fn new(config: PipelineConfig) -> Self {
        info!(
            buffer_capacity = config.buffer.capacity,
            history_capacity = config.buffer.history_capacity,
            interval_secs = config.processing.interval_secs,
            smoothing_alpha = config.processing.smoothing_alpha,
            "Initializing WaveDataProcessor"
        );
        Self {
            window: SignalWindow::new(config.buffer.capacity),
            history: VecDeque::with_capacity(config.buffer.history_capacity),
            smoothing_state: None,
            last_sample: None,
            session_start: Instant::now(),
            samples_collected: 0,
            total_analyses: 0,
            config,
        }
    }

    /// Admit one sensor sample.
    ///
    /// The first sample of a session only establishes the timestamp base.
    /// Samples with non-positive dt (duplicate or out-of-order timestamps)
    /// are dropped without touching the rate estimate or the timestamp
    /// base. Returns whether the sample entered the window.
    pub fn ingest(&mut self, sample: SensorSample) -> bool {
        let Some(previous) = self.last_sample else {
            self.last_sample = Some(sample);
            return false;
        };

        let dt = sample.dt_since(&previous);
        if dt <= 0.0 {
            trace!(dt, "Dropping out-of-order sensor sample");
            return false;
        }

        let vertical = if self.config.processing.subtract_gravity {
            sample.vertical - GRAVITY_MS2
        } else {
            sample.vertical
        };

        let admitted = self
            .window
            .add_sample(vertical, sample.horizontal_x, sample.horizontal_y, dt);
        if admitted {
            self.last_sample = Some(sample);
            self.samples_collected += 1;
        }
        admitted
    }

    /// Current processing state.
    pub fn status(&self) -> PipelineStatus {
        if self.window.is_empty() {
            PipelineStatus::Idle
        } else if self.window.is_full() {
            PipelineStatus::Ready
        } else {
            PipelineStatus::Accumulating
        }
    }

    /// Run one analysis batch on the current buffer snapshot.
    ///
    /// Returns `None` while the buffer is not yet at capacity (the window
    /// keeps sliding - processing never drains it). A full buffer always
    /// yields a measurement; a degenerate spectrum yields zero metrics
    /// with the time-domain height as cross-check rather than an error.
    pub fn process_batch(&mut self) -> Option<MeasuredWaveData> {
        match self.try_process_batch() {
            Ok(measured) => Some(measured),
            Err(reason) => {
                debug!(%reason, "Skipping analysis batch");
                None
            }
        }
    }

    /// [`Self::process_batch`] with the skip reason made explicit, for
    /// callers that need to distinguish "still accumulating" from a
    /// timestamp pathology.
    pub fn try_process_batch(&mut self) -> Result<MeasuredWaveData, ProcessingError> {
        if !self.window.is_full() {
            return Err(ProcessingError::InsufficientData {
                needed: self.window.capacity(),
                available: self.window.len(),
            });
        }

        let sampling_rate = self.window.sampling_rate();
        if sampling_rate <= 0.0 {
            return Err(ProcessingError::InvalidSamplingRate(sampling_rate));
        }
        let vertical = self.window.snapshot_vertical();
        let horizontal_x = self.window.snapshot_horizontal_x();
        let horizontal_y = self.window.snapshot_horizontal_y();

        let metrics = processing::analyze(&vertical, &horizontal_x, &horizontal_y, sampling_rate);

        // Flat spectrum: fall back to the time-domain double-integration
        // height so a borderline signal still registers
        let raw_height = if metrics.significant_height > 0.0 {
            metrics.significant_height
        } else {
            processing::integrated_wave_height(&vertical, 1.0 / sampling_rate)
        };

        let (height, period) = self.smooth(raw_height, metrics.average_period);

        let measured = MeasuredWaveData {
            time: self.session_start.elapsed().as_secs_f64(),
            height,
            period,
            direction: metrics.direction,
        };

        if self.history.len() >= self.config.buffer.history_capacity {
            self.history.pop_front();
        }
        self.history.push_back(measured);
        self.total_analyses += 1;

        debug!(
            height = measured.height,
            period = measured.period,
            direction = measured.direction,
            zero_crossing_period = metrics.zero_crossing_period,
            sampling_rate,
            "Analysis batch complete"
        );

        Ok(measured)
    }

    /// Exponential smoothing across batches:
    /// `smoothed = previous * alpha + current * (1 - alpha)`.
    /// The first batch has no previous value and passes through unchanged.
    fn smooth(&mut self, height: f64, period: f64) -> (f64, f64) {
        let alpha = self.config.processing.smoothing_alpha;
        let smoothed = match self.smoothing_state {
            Some((prev_height, prev_period)) => (
                prev_height * alpha + height * (1.0 - alpha),
                prev_period * alpha + period * (1.0 - alpha),
            ),
            None => (height, period),
        };
        self.smoothing_state = Some(smoothed);
        smoothed
    }

    /// Big-wave confidence over the current history.
    pub fn big_wave_confidence(&self) -> f64 {
        trends::next_big_wave_confidence(&self.history(), &self.config.forecast)
    }

    /// Whether a big wave is currently predicted.
    pub fn big_wave_predicted(&self) -> bool {
        trends::predict_next_big_wave(&self.history(), &self.config.forecast)
    }

    /// Owned copy of the measurement history, oldest first. The deque may
    /// be discontiguous once it has wrapped, so this always copies.
    pub fn history(&self) -> Vec<MeasuredWaveData> {
        self.history.iter().copied().collect()
    }

    /// Total samples admitted this session.
    pub fn samples_collected(&self) -> usize {
        self.samples_collected
    }

    /// Total analysis batches completed this session.
    pub fn total_analyses(&self) -> u64 {
        self.total_analyses
    }

    /// Reset the session: empties the sample window, history and smoothing
    /// state, and restarts the session clock. Displayed metrics return to
    /// the "collecting data" state.
    pub fn clear(&mut self) {
        info!("Clearing wave processor session state");
        self.window.clear();
        self.history.clear();
        self.smoothing_state = None;
        self.last_sample = None;
        self.samples_collected = 0;
        self.total_analyses = 0;
        self.session_start = Instant::now();
    }

    /// Write the outward-facing snapshot into the shared UI state.
    fn update_ui_state(&self, state: &mut WaveUiState, latest: Option<MeasuredWaveData>) {
        state.status = self.status();
        state.samples_collected = self.samples_collected;
        state.total_analyses = self.total_analyses;
        state.measured_waves = self.history();
        state.big_wave_confidence = self.big_wave_confidence();
        state.big_wave_predicted = self.big_wave_predicted();
        if let Some(measured) = latest {
            state.height = Some(measured.height);
            state.period = Some(measured.period);
            state.direction = Some(measured.direction);
            state.last_analysis_time = Some(chrono::Utc::now());
        }
    }

    /// Run the processing loop.
    ///
    /// Drains sensor samples from the channel at sensor rate and runs an
    /// analysis batch at the configured interval. Exits when the channel
    /// closes or the shutdown flag is raised; on exit the processor is in
    /// a safely clearable state (no in-flight snapshot aliases the
    /// buffer - analysis always works on owned copies).
    pub async fn run(
        &mut self,
        mut sensor_rx: Receiver<SensorSample>,
        ui_state: Arc<RwLock<WaveUiState>>,
        shutdown: Arc<AtomicBool>,
    ) {
        info!("WaveDataProcessor starting main loop");

        let mut interval = tokio::time::interval(std::time::Duration::from_secs_f64(
            self.config.processing.interval_secs,
        ));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            tokio::select! {
                maybe_sample = sensor_rx.recv() => {
                    match maybe_sample {
                        Some(sample) => {
                            self.ingest(sample);
                        }
                        None => {
                            info!("Sensor channel closed - stopping processor");
                            break;
                        }
                    }
                }
                _ = interval.tick() => {
                    let latest = self.process_batch();
                    let mut state = ui_state.write().await;
                    self.update_ui_state(&mut state, latest);
                }
            }
        }

        // Final state flush so consumers observe the terminal counters
        let mut state = ui_state.write().await;
        self.update_ui_state(&mut state, None);
        info!(
            samples = self.samples_collected,
            analyses = self.total_analyses,
            "WaveDataProcessor shut down"
        );
    }
}
