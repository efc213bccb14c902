//! Wavesense runtime
//!
//! Wires a sensor source (stdin JSON lines or the built-in synthetic
//! swell generator) into the wave processing pipeline and logs the rolling
//! wave state at the processing cadence.
//!
//! ```bash
//! # Synthetic sea state
//! wavesense --scenario building
//!
//! # Pipe the simulation harness in
//! simulation --scenario moderate | wavesense --stdin
//! ```

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use wavesense::acquisition::{
    SensorSource, StdinSensorSource, SwellScenario, SyntheticSwellSource,
};
use wavesense::{PipelineConfig, WaveDataProcessor, WaveUiState};

#[derive(Parser, Debug)]
#[command(name = "wavesense")]
#[command(about = "Wave motion processing pipeline")]
#[command(version)]
struct Args {
    /// Read JSON sample lines from stdin instead of generating them
    #[arg(long)]
    stdin: bool,

    /// Synthetic scenario when not reading stdin: calm, moderate, building
    #[arg(long, default_value = "moderate")]
    scenario: String,

    /// Synthetic sample rate in Hz
    #[arg(long, default_value = "50.0")]
    sample_rate: f64,

    /// Random seed for the synthetic source
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Path to a TOML config file (overrides WAVESENSE_CONFIG lookup)
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => PipelineConfig::load_from(path)
            .with_context(|| format!("loading config from {path}"))?,
        None => PipelineConfig::load().context("loading config")?,
    };

    let mut source: Box<dyn SensorSource> = if args.stdin {
        Box::new(StdinSensorSource::new())
    } else {
        let scenario = SwellScenario::parse(&args.scenario)
            .ok_or_else(|| anyhow!("unknown scenario '{}'", args.scenario))?;
        if args.sample_rate <= 0.0 {
            return Err(anyhow!("sample rate must be positive"));
        }
        Box::new(SyntheticSwellSource::new(scenario, args.sample_rate, args.seed))
    };

    let ui_state = Arc::new(RwLock::new(WaveUiState::default()));
    let shutdown = Arc::new(AtomicBool::new(false));
    let (sample_tx, sample_rx) = mpsc::channel(1024);

    // Acquisition task: source -> channel
    let acquisition_shutdown = shutdown.clone();
    let acquisition = tokio::spawn(async move {
        if let Err(e) = source.connect().await {
            warn!(error = %e, "Sensor source failed to connect");
            return;
        }
        while !acquisition_shutdown.load(Ordering::Relaxed) {
            match source.read().await {
                Ok(samples) => {
                    for sample in samples {
                        if sample_tx.send(sample).await.is_err() {
                            return; // processor gone
                        }
                    }
                }
                // A malformed line is logged and skipped; the stream survives
                Err(wavesense::AcquisitionError::ParseError(msg)) => {
                    warn!(error = %msg, "Skipping malformed sample line");
                }
                Err(e) => {
                    info!(error = %e, "Sensor source ended");
                    break;
                }
            }
        }
        let _ = source.disconnect().await;
    });

    // Processing task: channel -> metrics -> shared state
    let mut processor = WaveDataProcessor::new(config);
    let processor_state = ui_state.clone();
    let processor_shutdown = shutdown.clone();
    let processing = tokio::spawn(async move {
        processor
            .run(sample_rx, processor_state, processor_shutdown)
            .await;
    });

    // Status reporting until Ctrl-C or the pipeline ends on its own
    let report_state = ui_state.clone();
    let reporter = tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(2));
        loop {
            interval.tick().await;
            let state = report_state.read().await;
            match (state.height, state.period, state.direction) {
                (Some(height), Some(period), Some(direction)) => info!(
                    height_m = format!("{height:.2}"),
                    period_s = format!("{period:.2}"),
                    direction_deg = format!("{direction:.0}"),
                    confidence = format!("{:.2}", state.big_wave_confidence),
                    big_wave = state.big_wave_predicted,
                    waves = state.measured_waves.len(),
                    "Wave state"
                ),
                _ => info!(
                    status = %state.status,
                    samples = state.samples_collected,
                    "Collecting data..."
                ),
            }
        }
    });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown requested");
            shutdown.store(true, Ordering::Relaxed);
        }
        _ = processing => {
            info!("Processing ended");
        }
    }

    reporter.abort();
    acquisition.abort();
    Ok(())
}
