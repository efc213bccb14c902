//! Sensor data acquisition
//!
//! The pipeline never touches a platform sensor API directly; it consumes
//! [`SensorSample`]s from anything implementing [`SensorSource`]. Two
//! sources ship with the crate: a JSON-lines stdin reader (for piping the
//! simulation binary in) and an in-process synthetic swell generator.

mod stdin_source;
mod synthetic;

pub use stdin_source::StdinSensorSource;
pub use synthetic::{SyntheticSwellSource, SwellScenario};

use crate::types::SensorSample;
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by sensor sources.
#[derive(Error, Debug)]
pub enum AcquisitionError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("source disconnected: {0}")]
    Disconnected(String),

    #[error("parse error: {0}")]
    ParseError(String),
}

/// Abstraction over a triaxial acceleration sample stream.
///
/// `read` yields zero or more samples per call; an empty batch is a valid
/// "nothing arrived yet" result, not an error. Sources must be safely
/// disconnectable mid-stream so stopping sensing can cancel acquisition
/// without leaving dangling readers.
#[async_trait]
pub trait SensorSource: Send {
    /// Establish the underlying stream.
    async fn connect(&mut self) -> Result<(), AcquisitionError>;

    /// Tear the stream down; subsequent reads fail until reconnected.
    async fn disconnect(&mut self) -> Result<(), AcquisitionError>;

    /// Read the next batch of samples.
    async fn read(&mut self) -> Result<Vec<SensorSample>, AcquisitionError>;

    /// Whether the source is currently connected.
    fn is_connected(&self) -> bool;
}
