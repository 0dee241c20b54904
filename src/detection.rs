//! Run detection pipeline.
//!
//! Two entry points share the same stages:
//!
//! - [`detect_batch`]: smoothing → descent flags → raw segments → merge → validate.
//!   Use this once a session is complete.
//! - [`detect_incremental`]: the same without the merge step, meant to be
//!   re-run on a growing prefix while recording. Runs split by a short stop
//!   stay split until the batch pass joins them.
//!
//! Both expect samples in ascending timestamp order. They do not check it;
//! call [`validate_samples`] first when the source is not trusted.

use std::time::Instant;

use log::{debug, info};

use crate::descent::classify_descent;
use crate::runs::build_runs;
use crate::segments::{detect_raw_segments, merge_segments, Segment};
use crate::smoothing::{smooth_elevation, smooth_speed};
use crate::{DetectionConfig, Result, Run, Sample, SkiTrackError};

/// Smoothed signals and raw segments for one track.
struct Prepared {
    elevation: Vec<f64>,
    speed: Vec<f64>,
    raw_segments: Vec<Segment>,
}

/// Run the stages common to both entry points.
///
/// Returns `None` when the track is shorter than the trend window.
fn prepare(samples: &[Sample], config: &DetectionConfig) -> Option<Prepared> {
    if samples.is_empty() || samples.len() < config.trend_window {
        return None;
    }

    let half_window = config.smoothing_half_window();
    let elevation = smooth_elevation(samples, half_window);
    let speed = smooth_speed(samples, half_window);
    let descending = classify_descent(&elevation, &speed, config);
    let raw_segments = detect_raw_segments(&descending);

    Some(Prepared {
        elevation,
        speed,
        raw_segments,
    })
}

/// Detect ski runs over a complete session.
///
/// # Example
/// ```
/// use ski_tracker::{detect_batch, DetectionConfig, Sample};
///
/// let samples: Vec<Sample> = (0..10)
///     .map(|i| Sample::new(46.0, 7.0, 2000.0, i * 1000, 0.0))
///     .collect();
/// // Shorter than the trend window
/// assert!(detect_batch(&samples, &DetectionConfig::default()).is_empty());
/// ```
pub fn detect_batch(samples: &[Sample], config: &DetectionConfig) -> Vec<Run> {
    let start = Instant::now();
    let Some(prepared) = prepare(samples, config) else {
        return Vec::new();
    };

    let merged = merge_segments(&prepared.raw_segments, samples, &prepared.elevation, config);
    let runs = build_runs(&merged, samples, &prepared.speed, config);

    info!(
        "[SkiTracker] Detected {} runs from {} samples ({} raw segments) in {}ms",
        runs.len(),
        samples.len(),
        prepared.raw_segments.len(),
        start.elapsed().as_millis()
    );
    runs
}

/// Detect ski runs on a live, growing track without merging across gaps.
pub fn detect_incremental(samples: &[Sample], config: &DetectionConfig) -> Vec<Run> {
    let Some(prepared) = prepare(samples, config) else {
        return Vec::new();
    };

    let runs = build_runs(&prepared.raw_segments, samples, &prepared.speed, config);
    debug!(
        "[SkiTracker] Live detection: {} runs from {} samples",
        runs.len(),
        samples.len()
    );
    runs
}

/// Check that timestamps never decrease.
///
/// Equal consecutive timestamps are accepted.
pub fn validate_samples(samples: &[Sample]) -> Result<()> {
    match samples
        .windows(2)
        .position(|w| w[1].timestamp < w[0].timestamp)
    {
        Some(pos) => Err(SkiTrackError::UnsortedSamples {
            index: pos + 1,
            previous: samples[pos].timestamp,
            current: samples[pos + 1].timestamp,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Steady descent: 1 sample/s, ~10 km/h, `drop` meters per sample.
    fn descent(n: usize, drop: f64) -> Vec<Sample> {
        (0..n)
            .map(|i| {
                Sample::new(
                    46.0 + i as f64 * 0.000025,
                    7.0,
                    2500.0 - i as f64 * drop,
                    i as i64 * 1000,
                    10.0,
                )
            })
            .collect()
    }

    #[test]
    fn test_short_track_yields_nothing() {
        let samples = descent(19, 5.0);
        assert!(detect_batch(&samples, &DetectionConfig::default()).is_empty());
        assert!(detect_incremental(&samples, &DetectionConfig::default()).is_empty());
        assert!(detect_batch(&[], &DetectionConfig::default()).is_empty());
    }

    #[test]
    fn test_steady_descent_single_run() {
        let samples = descent(120, 2.0);
        let runs = detect_batch(&samples, &DetectionConfig::default());
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].start_index, 0);
        assert_eq!(runs[0].end_index, 119);
        assert!((runs[0].vertical_drop - 238.0).abs() < 1e-9);
    }

    #[test]
    fn test_incremental_matches_batch_without_gaps() {
        let samples = descent(120, 2.0);
        let config = DetectionConfig::default();
        assert_eq!(
            detect_batch(&samples, &config),
            detect_incremental(&samples, &config)
        );
    }

    #[test]
    fn test_incremental_on_prefix() {
        let samples = descent(120, 2.0);
        let config = DetectionConfig::default();
        // 40s in: not long enough yet
        assert!(detect_incremental(&samples[..41], &config).is_empty());
        assert_eq!(detect_incremental(&samples[..90], &config).len(), 1);
    }

    #[test]
    fn test_validate_samples() {
        let mut samples = descent(5, 1.0);
        assert!(validate_samples(&samples).is_ok());
        assert!(validate_samples(&[]).is_ok());

        samples[3].timestamp = 500;
        assert_eq!(
            validate_samples(&samples),
            Err(SkiTrackError::UnsortedSamples {
                index: 3,
                previous: 2000,
                current: 500,
            })
        );
    }
}
