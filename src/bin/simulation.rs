//! Wave Motion Simulation
//!
//! Generates synthetic triaxial accelerometer data for testing wavesense.
//! Emits one JSON object per line on stdout in the format the stdin sensor
//! source consumes.
//!
//! # Usage
//! ```bash
//! ./simulation --scenario building --minutes 10 --speed 50 | ./wavesense --stdin
//! ```

use anyhow::{anyhow, Result};
use clap::Parser;
use std::io::{self, Write};

use wavesense::acquisition::{SwellScenario, SyntheticSwellSource};
use wavesense::types::SensorSample;

#[derive(Parser, Debug)]
#[command(name = "wave-simulation")]
#[command(about = "Synthetic wave motion data for wavesense testing")]
#[command(version)]
struct Args {
    /// Sea-state scenario: calm, moderate, building
    #[arg(long, default_value = "moderate")]
    scenario: String,

    /// Simulated duration in minutes
    #[arg(short, long, default_value = "5", value_parser = clap::value_parser!(u32).range(1..=240))]
    minutes: u32,

    /// Sample rate in Hz
    #[arg(long, default_value = "50", value_parser = clap::value_parser!(u32).range(1..=200))]
    sample_rate: u32,

    /// Time compression factor (1 = real-time, 50 = 50x faster)
    #[arg(short, long, default_value = "50", value_parser = clap::value_parser!(u32).range(1..=1000))]
    speed: u32,

    /// Random seed for reproducibility
    #[arg(long, default_value = "42")]
    seed: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();
    let scenario = SwellScenario::parse(&args.scenario)
        .ok_or_else(|| anyhow!("unknown scenario '{}'", args.scenario))?;

    let rate = f64::from(args.sample_rate);
    let total_samples = u64::from(args.minutes) * 60 * u64::from(args.sample_rate);
    let emit_interval =
        std::time::Duration::from_secs_f64(1.0 / (rate * f64::from(args.speed)));

    tracing::warn!(
        scenario = ?scenario,
        minutes = args.minutes,
        sample_rate = args.sample_rate,
        speed = args.speed,
        "Starting wave simulation"
    );

    let mut source = SyntheticSwellSource::new(scenario, rate, args.seed);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut ticker = tokio::time::interval(emit_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Burst);

    for _ in 0..total_samples {
        ticker.tick().await;
        let sample: SensorSample = source.generate();
        let line = serde_json::to_string(&sample)?;
        if writeln!(out, "{line}").is_err() {
            // Downstream consumer closed the pipe; normal termination
            break;
        }
    }

    Ok(())
}
