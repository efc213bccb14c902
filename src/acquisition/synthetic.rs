//! Synthetic swell generator
//!
//! In-process sensor source producing triaxial acceleration for a
//! configurable sea state: a dominant swell component plus a weaker wind
//! chop component and Gaussian sensor noise. The horizontal axes carry the
//! same dominant frequency with a fixed phase offset so direction
//! estimation has something real to lock onto.

use super::{AcquisitionError, SensorSource};
use crate::types::SensorSample;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use std::f64::consts::PI;

/// Sea-state scenarios for the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwellScenario {
    /// Gentle 0.1 Hz swell, low noise
    Calm,
    /// Moderate swell with wind chop
    Moderate,
    /// Growing swell: amplitude ramps up over the session, for exercising
    /// the big-wave forecaster
    Building,
}

impl SwellScenario {
    /// Parse a scenario name from the CLI.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "calm" => Some(Self::Calm),
            "moderate" => Some(Self::Moderate),
            "building" => Some(Self::Building),
            _ => None,
        }
    }

    fn base_amplitude(self) -> f64 {
        match self {
            Self::Calm => 0.3,
            Self::Moderate | Self::Building => 0.8,
        }
    }

    fn noise_sigma(self) -> f64 {
        match self {
            Self::Calm => 0.02,
            Self::Moderate | Self::Building => 0.08,
        }
    }
}

/// In-process synthetic sensor source.
pub struct SyntheticSwellSource {
    scenario: SwellScenario,
    sample_rate_hz: f64,
    /// Dominant swell frequency in Hz
    swell_freq_hz: f64,
    /// Phase offset applied to the horizontal-Y axis (radians)
    direction_phase: f64,
    noise: Normal<f64>,
    rng: StdRng,
    sample_index: u64,
    connected: bool,
}

impl SyntheticSwellSource {
    /// Create a generator for the given scenario and sample rate.
    ///
    /// Seeding is explicit so simulations are reproducible.
    pub fn new(scenario: SwellScenario, sample_rate_hz: f64, seed: u64) -> Self {
        // sigma is always positive for the defined scenarios
        let noise = Normal::new(0.0, scenario.noise_sigma())
            .unwrap_or_else(|_| Normal::new(0.0, 0.01).expect("fixed sigma is valid"));
        Self {
            scenario,
            sample_rate_hz,
            swell_freq_hz: 0.1,
            direction_phase: PI / 3.0,
            noise,
            rng: StdRng::seed_from_u64(seed),
            sample_index: 0,
            connected: false,
        }
    }

    /// Generate the next sample deterministically from the sample index.
    ///
    /// Public so the simulation harness can drive generation synchronously
    /// at its own pace; the async [`SensorSource::read`] path uses it too.
    pub fn generate(&mut self) -> SensorSample {
        let t = self.sample_index as f64 / self.sample_rate_hz;
        self.sample_index += 1;

        let amplitude = match self.scenario {
            // Ramp from 1x to 3x base amplitude over the first ten minutes
            SwellScenario::Building => {
                self.scenario.base_amplitude() * (1.0 + 2.0 * (t / 600.0).min(1.0))
            }
            _ => self.scenario.base_amplitude(),
        };

        let swell = 2.0 * PI * self.swell_freq_hz * t;
        let chop = 2.0 * PI * 0.45 * t;

        let vertical = amplitude * swell.sin()
            + 0.2 * amplitude * chop.sin()
            + self.noise.sample(&mut self.rng);
        let horizontal_x =
            0.6 * amplitude * swell.sin() + self.noise.sample(&mut self.rng);
        let horizontal_y = 0.6 * amplitude * (swell + self.direction_phase).sin()
            + self.noise.sample(&mut self.rng);

        SensorSample {
            timestamp_nanos: (t * 1e9) as u64,
            vertical,
            horizontal_x,
            horizontal_y,
        }
    }
}

#[async_trait]
impl SensorSource for SyntheticSwellSource {
    async fn connect(&mut self) -> Result<(), AcquisitionError> {
        self.connected = true;
        tracing::info!(
            scenario = ?self.scenario,
            sample_rate_hz = self.sample_rate_hz,
            "Synthetic swell source connected"
        );
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), AcquisitionError> {
        self.connected = false;
        Ok(())
    }

    async fn read(&mut self) -> Result<Vec<SensorSample>, AcquisitionError> {
        if !self.connected {
            return Err(AcquisitionError::Disconnected("not connected".to_string()));
        }

        // Pace the stream at the configured sample rate
        tokio::time::sleep(std::time::Duration::from_secs_f64(
            1.0 / self.sample_rate_hz,
        ))
        .await;
        Ok(vec![self.generate()])
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
