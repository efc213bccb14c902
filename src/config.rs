//! Pipeline Configuration
//!
//! Tunable constants for the wave processing pipeline, loaded from TOML and
//! replacing ad hoc hardcoded values with operator-tunable ones.
//!
//! ## Loading Order
//!
//! 1. `WAVESENSE_CONFIG` environment variable (path to TOML file)
//! 2. `wavesense.toml` in the current working directory
//! 3. Built-in defaults
//!
//! A config is validated after loading; invalid values are a startup error,
//! not something the pipeline discovers mid-session.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Standard gravity subtracted from the vertical axis when a source
/// delivers raw (gravity-inclusive) accelerometer output.
pub const GRAVITY_MS2: f64 = 9.8;

/// Environment variable naming an explicit config file path.
pub const CONFIG_ENV_VAR: &str = "WAVESENSE_CONFIG";

/// Default config file searched in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "wavesense.toml";

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub buffer: BufferConfig,
    pub processing: ProcessingConfig,
    pub forecast: ForecastConfig,
}

/// Rolling sample buffer parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Fixed capacity of the rolling sample window. At UI-class sensor
    /// rates (20-100 Hz) 170 samples is a few seconds of motion.
    pub capacity: usize,

    /// Bounded measurement history length (FIFO, oldest evicted).
    pub history_capacity: usize,
}

/// Batch processing parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Seconds between timer-driven analysis batches.
    pub interval_secs: f64,

    /// Exponential smoothing coefficient applied to height and period:
    /// `smoothed = previous * alpha + current * (1 - alpha)`.
    /// Valid range 0.5..=0.8.
    pub smoothing_alpha: f64,

    /// Subtract standard gravity from the vertical axis on ingest.
    /// Enable for sources that deliver raw accelerometer output.
    pub subtract_gravity: bool,
}

/// Big-wave forecast parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Confidence threshold above which a big wave is predicted.
    pub big_wave_threshold: f64,

    /// Number of most-recent history heights fed to the trend terms.
    pub trend_window: usize,

    /// Slope (m per sample) mapping to ~0.73 on the logistic slope term.
    pub slope_scale: f64,

    /// Z-score mapping to ~0.73 on the logistic outlier term.
    pub z_score_scale: f64,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            capacity: 170,
            history_capacity: 50,
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            interval_secs: 2.0,
            smoothing_alpha: 0.6,
            subtract_gravity: false,
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            big_wave_threshold: 0.6,
            trend_window: 10,
            slope_scale: 0.05,
            z_score_scale: 2.0,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            buffer: BufferConfig::default(),
            processing: ProcessingConfig::default(),
            forecast: ForecastConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration using the documented loading order.
    ///
    /// Missing files fall through to defaults; unreadable or unparsable
    /// files are reported as errors so a typo'd config never silently
    /// reverts to defaults.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            tracing::info!(path = %path, "Loading config from {}", CONFIG_ENV_VAR);
            return Self::load_from(&path);
        }

        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            tracing::info!(path = DEFAULT_CONFIG_FILE, "Loading config from working directory");
            return Self::load_from(DEFAULT_CONFIG_FILE);
        }

        tracing::debug!("No config file found, using built-in defaults");
        let config = Self::default();
        config.validate()?;
        Ok(config)
    }

    /// Load and validate configuration from an explicit TOML file.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().display().to_string();
        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path_str.clone(),
            source,
        })?;
        let config: Self = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path_str,
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate invariants the pipeline relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer.capacity < 2 {
            return Err(ConfigError::Invalid(format!(
                "buffer.capacity must be >= 2, got {}",
                self.buffer.capacity
            )));
        }
        if self.buffer.history_capacity == 0 {
            return Err(ConfigError::Invalid(
                "buffer.history_capacity must be >= 1".to_string(),
            ));
        }
        if self.processing.interval_secs <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "processing.interval_secs must be positive, got {}",
                self.processing.interval_secs
            )));
        }
        if !(0.5..=0.8).contains(&self.processing.smoothing_alpha) {
            return Err(ConfigError::Invalid(format!(
                "processing.smoothing_alpha must be in 0.5..=0.8, got {}",
                self.processing.smoothing_alpha
            )));
        }
        if !(0.0..=1.0).contains(&self.forecast.big_wave_threshold) {
            return Err(ConfigError::Invalid(format!(
                "forecast.big_wave_threshold must be in 0.0..=1.0, got {}",
                self.forecast.big_wave_threshold
            )));
        }
        if self.forecast.trend_window < 2 {
            return Err(ConfigError::Invalid(format!(
                "forecast.trend_window must be >= 2, got {}",
                self.forecast.trend_window
            )));
        }
        if self.forecast.slope_scale <= 0.0 || self.forecast.z_score_scale <= 0.0 {
            return Err(ConfigError::Invalid(
                "forecast scales must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.buffer.capacity, 170);
        assert_eq!(config.buffer.history_capacity, 50);
        assert!((config.processing.smoothing_alpha - 0.6).abs() < 1e-12);
        assert!((config.forecast.big_wave_threshold - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[buffer]
capacity = 256

[processing]
interval_secs = 1.0
smoothing_alpha = 0.7
"#
        )
        .unwrap();

        let config = PipelineConfig::load_from(file.path()).unwrap();
        assert_eq!(config.buffer.capacity, 256);
        // Unspecified sections keep their defaults
        assert_eq!(config.buffer.history_capacity, 50);
        assert!((config.processing.interval_secs - 1.0).abs() < 1e-12);
        assert!((config.processing.smoothing_alpha - 0.7).abs() < 1e-12);
        assert!((config.forecast.big_wave_threshold - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_alpha_rejected() {
        let config = PipelineConfig {
            processing: ProcessingConfig {
                smoothing_alpha: 0.95,
                ..ProcessingConfig::default()
            },
            ..PipelineConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_tiny_buffer_rejected() {
        let config = PipelineConfig {
            buffer: BufferConfig {
                capacity: 1,
                ..BufferConfig::default()
            },
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unparsable_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "this is not toml {{").unwrap();
        assert!(matches!(
            PipelineConfig::load_from(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
