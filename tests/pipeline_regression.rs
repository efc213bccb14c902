//! Pipeline Regression Tests
//!
//! Exercises the full pipeline through the synthetic swell source and
//! WaveDataProcessor: buffer fill, spectral analysis batches, history
//! capping, and big-wave forecasting. Asserts on data integrity (no NaN
//! values, direction in range) and on the forecaster separating a
//! building sea from a calm one.
//!
//! Sources are seeded, so these runs are fully deterministic.

use wavesense::acquisition::{SwellScenario, SyntheticSwellSource};
use wavesense::config::PipelineConfig;
use wavesense::pipeline::WaveDataProcessor;
use wavesense::types::MeasuredWaveData;

/// A low sample rate keeps the 170-sample window long enough (42.5 s at
/// 4 Hz) to resolve the 0.1 Hz dominant swell.
const SAMPLE_RATE_HZ: f64 = 4.0;

/// Feed `count` synthetic samples through a processor, running an
/// analysis batch every `batch_every` admitted samples.
/// Returns the processor and every measurement produced.
fn run_session(
    scenario: SwellScenario,
    count: usize,
    batch_every: usize,
    config: PipelineConfig,
) -> (WaveDataProcessor, Vec<MeasuredWaveData>) {
    let mut source = SyntheticSwellSource::new(scenario, SAMPLE_RATE_HZ, 42);
    let mut processor = WaveDataProcessor::new(config);
    let mut measurements = Vec::new();

    let mut admitted = 0usize;
    for _ in 0..count {
        if processor.ingest(source.generate()) {
            admitted += 1;
            if admitted % batch_every == 0 {
                if let Some(measured) = processor.process_batch() {
                    measurements.push(measured);
                }
            }
        }
    }

    (processor, measurements)
}

/// A moderate sea should fill the buffer and yield plausible metrics.
#[test]
fn pipeline_moderate_sea_produces_metrics() {
    let (processor, measurements) =
        run_session(SwellScenario::Moderate, 2_000, 170, PipelineConfig::default());

    assert!(processor.total_analyses() > 0);
    assert!(
        !measurements.is_empty(),
        "A full session should produce at least one measurement"
    );

    for measured in &measurements {
        assert!(measured.height > 0.0, "height {} not positive", measured.height);
        assert!(measured.period > 0.0, "period {} not positive", measured.period);
        assert!(
            (0.0..360.0).contains(&measured.direction),
            "direction {} out of range",
            measured.direction
        );
    }

    // The dominant swell is 0.1 Hz; the estimated period should land in
    // the same decade, not at the chop or noise scale
    let last = measurements.last().unwrap();
    assert!(
        (2.0..=30.0).contains(&last.period),
        "period {} implausible for a 10 s swell",
        last.period
    );
}

/// No NaN or infinite values anywhere in the measurement stream.
#[test]
fn pipeline_no_nan_in_measurements() {
    for scenario in [
        SwellScenario::Calm,
        SwellScenario::Moderate,
        SwellScenario::Building,
    ] {
        let (processor, measurements) =
            run_session(scenario, 2_000, 170, PipelineConfig::default());

        for measured in &measurements {
            assert!(measured.time.is_finite());
            assert!(measured.height.is_finite());
            assert!(measured.period.is_finite());
            assert!(measured.direction.is_finite());
        }
        assert!(processor.big_wave_confidence().is_finite());
    }
}

/// The measurement history is capped and evicts oldest-first.
#[test]
fn pipeline_history_capped_oldest_evicted() {
    // Batch every 20 samples so a modest session produces 60+ measurements
    let (processor, measurements) =
        run_session(SwellScenario::Moderate, 1_600, 20, PipelineConfig::default());

    assert!(measurements.len() > 50);
    let history = processor.history();
    assert_eq!(history.len(), 50);

    // The retained entries are exactly the 50 most recent, in order
    let expected = &measurements[measurements.len() - 50..];
    for (kept, produced) in history.iter().zip(expected.iter()) {
        assert!((kept.time - produced.time).abs() < 1e-9);
    }
}

/// A building sea should raise big-wave confidence past the alert
/// threshold; a calm sea should not trigger a prediction.
#[test]
fn pipeline_building_sea_triggers_forecast() {
    // 2 000 samples at 4 Hz ends mid-ramp for the building scenario, so
    // the forecaster's trend window sees heights still climbing
    let (building, _) =
        run_session(SwellScenario::Building, 2_000, 85, PipelineConfig::default());
    let (calm, _) = run_session(SwellScenario::Calm, 2_000, 85, PipelineConfig::default());

    let building_conf = building.big_wave_confidence();
    let calm_conf = calm.big_wave_confidence();

    assert!(
        building_conf > calm_conf,
        "building sea confidence {building_conf} should exceed calm {calm_conf}"
    );
    assert!(
        building.big_wave_predicted(),
        "growing swell should trigger a big-wave prediction (confidence {building_conf})"
    );
    assert!(
        !calm.big_wave_predicted(),
        "flat sea should not trigger a prediction (confidence {calm_conf})"
    );
}

/// Smoothed heights from a steady sea stay in a narrow band; the
/// exponential filter should damp batch-to-batch jitter, not amplify it.
#[test]
fn pipeline_steady_sea_heights_stable() {
    let (_, measurements) =
        run_session(SwellScenario::Moderate, 4_000, 170, PipelineConfig::default());
    assert!(measurements.len() >= 5);

    // Skip the first few batches while smoothing settles
    let settled = &measurements[2..];
    let mean: f64 = settled.iter().map(|m| m.height).sum::<f64>() / settled.len() as f64;
    for measured in settled {
        assert!(
            (measured.height - mean).abs() < 0.5 * mean,
            "height {} strays more than 50% from mean {}",
            measured.height,
            mean
        );
    }
}
