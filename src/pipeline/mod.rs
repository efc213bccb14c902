//! Wave processing pipeline - orchestration of buffering, spectral
//! analysis, smoothing, history and forecasting

mod processor;

pub use processor::WaveDataProcessor;
