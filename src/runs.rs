//! Segment validation and conversion to runs.

use log::debug;

use crate::geo_utils::haversine_distance;
use crate::segments::Segment;
use crate::{DetectionConfig, Run, Sample};

/// Filter merged segments by duration and vertical drop, then convert the
/// survivors to numbered runs.
///
/// Vertical drop is taken from the raw start/end elevations, not the smoothed
/// ones. Run numbers follow the order of the surviving segments, starting at 1.
pub fn build_runs(
    segments: &[Segment],
    samples: &[Sample],
    smoothed_speed: &[f64],
    config: &DetectionConfig,
) -> Vec<Run> {
    segments
        .iter()
        .filter(|seg| {
            let start = &samples[seg.start];
            let end = &samples[seg.end];
            let duration = (end.timestamp - start.timestamp) as f64 / 1000.0;
            let vertical = start.elevation - end.elevation;

            let keep = duration >= config.min_run_duration
                && vertical >= config.min_run_vertical
                && vertical > 0.0;
            if !keep {
                debug!(
                    "[Runs] Dropped segment {}..{}: {:.0}s, {:.1}m vertical",
                    seg.start, seg.end, duration, vertical
                );
            }
            keep
        })
        .enumerate()
        .map(|(i, seg)| segment_to_run(seg, samples, smoothed_speed, (i + 1) as u32))
        .collect()
}

/// Compute the metrics of a single segment.
///
/// Average speed is weighted by the distance covered on each step, so a fast
/// stretch counts for the ground it covered rather than the samples it took.
pub fn segment_to_run(
    segment: &Segment,
    samples: &[Sample],
    smoothed_speed: &[f64],
    run_number: u32,
) -> Run {
    let start = &samples[segment.start];
    let end = &samples[segment.end];

    let mut distance = 0.0;
    let mut weighted_speed = 0.0;
    for k in segment.start + 1..=segment.end {
        let step = haversine_distance(&samples[k - 1], &samples[k]);
        distance += step;
        weighted_speed += smoothed_speed[k] * step;
    }

    let max_speed = smoothed_speed[segment.start..=segment.end]
        .iter()
        .copied()
        .fold(0.0, f64::max);
    // Rounding in the weighted sum can push a constant-speed average past the max
    let avg_speed = if distance > 0.0 {
        (weighted_speed / distance).min(max_speed)
    } else {
        0.0
    };

    let vertical_drop = start.elevation - end.elevation;
    let avg_slope = if distance > 0.0 {
        vertical_drop / distance * 100.0
    } else {
        0.0
    };

    Run {
        run_number,
        start_index: segment.start,
        end_index: segment.end,
        start_time: start.timestamp,
        end_time: end.timestamp,
        start_elevation: start.elevation,
        end_elevation: end.elevation,
        max_speed,
        avg_speed,
        distance,
        vertical_drop,
        avg_slope,
        sample_count: segment.sample_count(),
    }
}
