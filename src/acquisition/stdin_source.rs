//! Stdin Sensor Source
//!
//! Reads JSON-formatted triaxial samples from stdin, one object per line.
//! Used with the simulation harness: `simulation | wavesense --stdin`.

use super::{AcquisitionError, SensorSource};
use crate::types::SensorSample;
use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader, Stdin};

/// JSON wire structure for one sample line.
///
/// Matches the output of the simulation binary. `timestamp_nanos` is the
/// platform-style monotonic timestamp; the axes are accelerations in m/s².
#[derive(Debug, Deserialize)]
struct JsonSample {
    timestamp_nanos: u64,
    vertical: f64,
    horizontal_x: f64,
    horizontal_y: f64,
}

/// Sensor source that reads JSON sample lines from stdin.
pub struct StdinSensorSource {
    reader: Option<BufReader<Stdin>>,
    connected: bool,
    line_buffer: String,
}

impl StdinSensorSource {
    pub fn new() -> Self {
        Self {
            reader: None,
            connected: false,
            line_buffer: String::with_capacity(256),
        }
    }

    /// Parse one JSON line into a sample. Empty lines yield nothing;
    /// malformed lines are reported so the caller can log and continue.
    fn parse_line(line: &str) -> Result<Option<SensorSample>, AcquisitionError> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let json: JsonSample = serde_json::from_str(trimmed)
            .map_err(|e| AcquisitionError::ParseError(format!("bad sample line: {e}")))?;

        Ok(Some(SensorSample {
            timestamp_nanos: json.timestamp_nanos,
            vertical: json.vertical,
            horizontal_x: json.horizontal_x,
            horizontal_y: json.horizontal_y,
        }))
    }
}

impl Default for StdinSensorSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SensorSource for StdinSensorSource {
    async fn connect(&mut self) -> Result<(), AcquisitionError> {
        if self.connected {
            return Ok(());
        }

        self.reader = Some(BufReader::new(tokio::io::stdin()));
        self.connected = true;
        tracing::info!("Stdin sensor source connected - waiting for JSON sample lines");
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), AcquisitionError> {
        if !self.connected {
            return Ok(());
        }

        tracing::info!("Disconnecting stdin sensor source");
        self.reader = None;
        self.connected = false;
        Ok(())
    }

    async fn read(&mut self) -> Result<Vec<SensorSample>, AcquisitionError> {
        if !self.connected {
            return Err(AcquisitionError::Disconnected("not connected".to_string()));
        }

        let reader = self
            .reader
            .as_mut()
            .ok_or_else(|| AcquisitionError::Disconnected("no stdin reader".to_string()))?;

        self.line_buffer.clear();
        let bytes_read = reader
            .read_line(&mut self.line_buffer)
            .await
            .map_err(|e| AcquisitionError::Disconnected(format!("stdin read error: {e}")))?;

        if bytes_read == 0 {
            self.connected = false;
            return Err(AcquisitionError::Disconnected("stdin closed (EOF)".to_string()));
        }

        match Self::parse_line(&self.line_buffer)? {
            Some(sample) => Ok(vec![sample]),
            None => Ok(Vec::new()),
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_line() {
        let line = r#"{"timestamp_nanos": 123456789, "vertical": 0.42, "horizontal_x": -0.1, "horizontal_y": 0.05}"#;
        let sample = StdinSensorSource::parse_line(line).unwrap().unwrap();
        assert_eq!(sample.timestamp_nanos, 123_456_789);
        assert!((sample.vertical - 0.42).abs() < 1e-12);
        assert!((sample.horizontal_x + 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_parse_empty_line_is_not_a_sample() {
        assert!(StdinSensorSource::parse_line("").unwrap().is_none());
        assert!(StdinSensorSource::parse_line("   \n").unwrap().is_none());
    }

    #[test]
    fn test_parse_malformed_line_errors() {
        let result = StdinSensorSource::parse_line("{not json");
        assert!(matches!(result, Err(AcquisitionError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_read_before_connect_fails() {
        let mut source = StdinSensorSource::new();
        assert!(!source.is_connected());
        assert!(matches!(
            source.read().await,
            Err(AcquisitionError::Disconnected(_))
        ));
    }
}
