//! Session-wide statistics.
//!
//! Built from the full sample sequence plus the finalized run list:
//! - Distance, ascent/descent, altitude range and speed figures (one pass)
//! - Ski-specific figures from the runs (ski distance, vertical, lift distance)
//! - Time split into stationary / ascending / descending / moving (second pass)
//! - A 0-100 performance score
//!
//! ## Example
//! ```rust
//! use ski_tracker::{compute_session_statistics, Sample};
//!
//! let samples = vec![
//!     Sample::new(46.0, 7.0, 2000.0, 0, 12.0),
//!     Sample::new(46.001, 7.0, 1990.0, 10_000, 25.0),
//! ];
//! let stats = compute_session_statistics(&samples, &[]);
//! assert_eq!(stats.total_descent, 10.0);
//! assert_eq!(stats.performance_score, 0.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::geo_utils::haversine_distance;
use crate::{Run, Sample};

/// Upper bounds of the speed histogram buckets (km/h). The last bucket is open.
pub const SPEED_BUCKET_BOUNDARIES: [f64; 5] = [10.0, 20.0, 30.0, 40.0, 50.0];

/// Below this recorded speed an interval counts as stationary (km/h).
pub const STATIONARY_SPEED_KMH: f64 = 3.0;

/// Vertical rate beyond which an interval counts as ascending/descending (m/s).
pub const VERTICAL_RATE_THRESHOLD: f64 = 1.0;

/// Performance score normalization targets.
const SCORE_TARGET_RUNS: f64 = 20.0;
const SCORE_TARGET_AVG_SKI_SPEED: f64 = 50.0;
const SCORE_TARGET_MAX_SPEED: f64 = 80.0;
const SCORE_TARGET_VERTICAL_PER_RUN: f64 = 500.0;

/// Sample counts per speed band: 0-10, 10-20, 20-30, 30-40, 40-50, 50+ km/h.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeedHistogram {
    pub buckets: [u32; 6],
}

impl SpeedHistogram {
    /// Bucket index for a speed in km/h.
    pub fn bucket_for(speed: f64) -> usize {
        SPEED_BUCKET_BOUNDARIES
            .iter()
            .position(|&upper| speed < upper)
            .unwrap_or(SPEED_BUCKET_BOUNDARIES.len())
    }

    pub fn record(&mut self, speed: f64) {
        self.buckets[Self::bucket_for(speed)] += 1;
    }

    pub fn total(&self) -> u32 {
        self.buckets.iter().sum()
    }

    /// Share of samples in each bucket (0-100). All zero when empty.
    pub fn percentages(&self) -> [f64; 6] {
        let total = self.total();
        let mut out = [0.0; 6];
        if total == 0 {
            return out;
        }
        for (pct, &count) in out.iter_mut().zip(self.buckets.iter()) {
            *pct = count as f64 / total as f64 * 100.0;
        }
        out
    }

    /// Human-readable range for a bucket, e.g. "10-20" or "50+".
    pub fn bucket_label(index: usize) -> String {
        let bounds = SPEED_BUCKET_BOUNDARIES;
        match index {
            0 => format!("0-{}", bounds[0]),
            i if i < bounds.len() => format!("{}-{}", bounds[i - 1], bounds[i]),
            _ => format!("{}+", bounds[bounds.len() - 1]),
        }
    }
}

/// Seconds spent in each vertical movement state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeDistribution {
    pub moving: f64,
    pub stationary: f64,
    pub ascending: f64,
    pub descending: f64,
}

impl TimeDistribution {
    pub fn total(&self) -> f64 {
        self.moving + self.stationary + self.ascending + self.descending
    }
}

/// Aggregate statistics for one ski session.
///
/// Distances in meters, elevations in meters, speeds in km/h, times in seconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStatistics {
    pub total_distance: f64,
    pub ski_distance: f64,
    pub lift_distance: f64,
    pub ski_vertical: f64,
    pub total_ascent: f64,
    pub total_descent: f64,
    pub max_altitude: f64,
    pub min_altitude: f64,
    pub max_speed: f64,
    /// Mean of all positive recorded speeds
    pub avg_speed: f64,
    /// Mean of the runs' average speeds
    pub avg_ski_speed: f64,
    pub total_duration: f64,
    pub moving_time: f64,
    pub stationary_time: f64,
    pub ascending_time: f64,
    pub descending_time: f64,
    pub avg_heart_rate: Option<f64>,
    pub max_heart_rate: Option<u16>,
    /// Composite score in [0, 100]
    pub performance_score: f64,
    pub speed_histogram: SpeedHistogram,
    pub run_count: u32,
    /// Sum of run durations
    pub ski_time: f64,
}

impl SessionStatistics {
    pub fn time_distribution(&self) -> TimeDistribution {
        TimeDistribution {
            moving: self.moving_time,
            stationary: self.stationary_time,
            ascending: self.ascending_time,
            descending: self.descending_time,
        }
    }
}

/// Compute session statistics from the samples and the detected runs.
///
/// Empty input yields an all-zero record. Every elevation delta counts
/// towards ascent or descent; no noise dead-zone is applied.
pub fn compute_session_statistics(samples: &[Sample], runs: &[Run]) -> SessionStatistics {
    if samples.is_empty() {
        return SessionStatistics::default();
    }

    let mut total_distance = 0.0;
    let mut total_ascent = 0.0;
    let mut total_descent = 0.0;
    let mut max_altitude = f64::MIN;
    let mut min_altitude = f64::MAX;
    let mut max_speed: f64 = 0.0;
    let mut speed_sum = 0.0;
    let mut speed_count = 0u32;
    let mut hr_sum = 0u64;
    let mut hr_count = 0u32;
    let mut hr_max: Option<u16> = None;
    let mut speed_histogram = SpeedHistogram::default();

    for (i, sample) in samples.iter().enumerate() {
        if i > 0 {
            let prev = &samples[i - 1];
            total_distance += haversine_distance(prev, sample);
            let delta = sample.elevation - prev.elevation;
            if delta > 0.0 {
                total_ascent += delta;
            } else {
                total_descent -= delta;
            }
        }

        max_altitude = max_altitude.max(sample.elevation);
        min_altitude = min_altitude.min(sample.elevation);
        max_speed = max_speed.max(sample.speed);
        if sample.speed > 0.0 {
            speed_sum += sample.speed;
            speed_count += 1;
        }
        if let Some(hr) = sample.heart_rate {
            hr_sum += hr as u64;
            hr_count += 1;
            hr_max = Some(hr_max.map_or(hr, |m| m.max(hr)));
        }
        speed_histogram.record(sample.speed);
    }

    let run_count = runs.len() as u32;
    let ski_distance: f64 = runs.iter().map(|r| r.distance).sum();
    let ski_vertical: f64 = runs.iter().map(|r| r.vertical_drop).sum();
    let ski_time: f64 = runs.iter().map(|r| r.duration_secs()).sum();
    let avg_ski_speed = if runs.is_empty() {
        0.0
    } else {
        runs.iter().map(|r| r.avg_speed).sum::<f64>() / runs.len() as f64
    };
    let avg_vertical_per_run = if runs.is_empty() {
        0.0
    } else {
        ski_vertical / runs.len() as f64
    };

    let time = compute_time_distribution(samples);
    let first = &samples[0];
    let last = &samples[samples.len() - 1];

    SessionStatistics {
        total_distance,
        ski_distance,
        lift_distance: (total_distance - ski_distance).max(0.0),
        ski_vertical,
        total_ascent,
        total_descent,
        max_altitude,
        min_altitude,
        max_speed,
        avg_speed: if speed_count > 0 {
            speed_sum / speed_count as f64
        } else {
            0.0
        },
        avg_ski_speed,
        total_duration: (last.timestamp - first.timestamp) as f64 / 1000.0,
        moving_time: time.moving,
        stationary_time: time.stationary,
        ascending_time: time.ascending,
        descending_time: time.descending,
        avg_heart_rate: if hr_count > 0 {
            Some(hr_sum as f64 / hr_count as f64)
        } else {
            None
        },
        max_heart_rate: hr_max,
        performance_score: performance_score(
            run_count,
            avg_ski_speed,
            max_speed,
            avg_vertical_per_run,
        ),
        speed_histogram,
        run_count,
        ski_time,
    }
}

/// Split elapsed time between consecutive samples into movement states.
///
/// Each interval is judged on the later sample's recorded speed and the
/// vertical rate across the interval. Priority: stationary, ascending,
/// descending, moving.
pub fn compute_time_distribution(samples: &[Sample]) -> TimeDistribution {
    let mut dist = TimeDistribution::default();

    for w in samples.windows(2) {
        let (prev, curr) = (&w[0], &w[1]);
        // Backwards timestamps contribute no time
        let dt = ((curr.timestamp - prev.timestamp) as f64 / 1000.0).max(0.0);
        let rate = if dt > 0.0 {
            (curr.elevation - prev.elevation) / dt
        } else {
            0.0
        };

        if curr.speed < STATIONARY_SPEED_KMH {
            dist.stationary += dt;
        } else if rate > VERTICAL_RATE_THRESHOLD {
            dist.ascending += dt;
        } else if rate < -VERTICAL_RATE_THRESHOLD {
            dist.descending += dt;
        } else {
            dist.moving += dt;
        }
    }

    dist
}

/// Composite 0-100 score.
///
/// Run count contributes up to 25 points, average ski speed 35, max speed 20
/// and average vertical per run 20. Zero when there are no runs.
pub fn performance_score(
    run_count: u32,
    avg_ski_speed: f64,
    max_speed: f64,
    avg_vertical_per_run: f64,
) -> f64 {
    if run_count == 0 {
        return 0.0;
    }
    let part = |value: f64, target: f64| (value / target).clamp(0.0, 1.0);

    part(run_count as f64, SCORE_TARGET_RUNS) * 25.0
        + part(avg_ski_speed, SCORE_TARGET_AVG_SKI_SPEED) * 35.0
        + part(max_speed, SCORE_TARGET_MAX_SPEED) * 20.0
        + part(avg_vertical_per_run, SCORE_TARGET_VERTICAL_PER_RUN) * 20.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(distance: f64, vertical_drop: f64, avg_speed: f64) -> Run {
        Run {
            run_number: 1,
            start_index: 0,
            end_index: 1,
            start_time: 0,
            end_time: 60_000,
            start_elevation: 2000.0,
            end_elevation: 2000.0 - vertical_drop,
            max_speed: avg_speed,
            avg_speed,
            distance,
            vertical_drop,
            avg_slope: 0.0,
            sample_count: 2,
        }
    }

    #[test]
    fn test_empty_session() {
        let stats = compute_session_statistics(&[], &[]);
        assert_eq!(stats, SessionStatistics::default());
        assert_eq!(stats.avg_heart_rate, None);
    }

    #[test]
    fn test_histogram_buckets() {
        assert_eq!(SpeedHistogram::bucket_for(0.0), 0);
        assert_eq!(SpeedHistogram::bucket_for(9.99), 0);
        assert_eq!(SpeedHistogram::bucket_for(10.0), 1);
        assert_eq!(SpeedHistogram::bucket_for(49.9), 4);
        assert_eq!(SpeedHistogram::bucket_for(50.0), 5);
        assert_eq!(SpeedHistogram::bucket_for(120.0), 5);
        assert_eq!(SpeedHistogram::bucket_label(0), "0-10");
        assert_eq!(SpeedHistogram::bucket_label(2), "20-30");
        assert_eq!(SpeedHistogram::bucket_label(5), "50+");

        let mut hist = SpeedHistogram::default();
        for speed in [5.0, 15.0, 15.0, 60.0] {
            hist.record(speed);
        }
        assert_eq!(hist.buckets, [1, 2, 0, 0, 0, 1]);
        assert_eq!(hist.percentages()[1], 50.0);
        assert_eq!(SpeedHistogram::default().percentages(), [0.0; 6]);
    }

    #[test]
    fn test_ascent_descent_and_speed() {
        let samples = vec![
            Sample::new(46.0, 7.0, 1000.0, 0, 0.0),
            Sample::new(46.0, 7.0, 1010.0, 1000, 20.0),
            Sample::new(46.0, 7.0, 1004.0, 2000, 40.0),
            Sample::new(46.0, 7.0, 1005.0, 3000, 0.0),
        ];
        let stats = compute_session_statistics(&samples, &[]);
        assert_eq!(stats.total_ascent, 11.0);
        assert_eq!(stats.total_descent, 6.0);
        assert_eq!(stats.max_altitude, 1010.0);
        assert_eq!(stats.min_altitude, 1000.0);
        assert_eq!(stats.max_speed, 40.0);
        // Zero speeds are excluded from the average
        assert_eq!(stats.avg_speed, 30.0);
        assert_eq!(stats.total_duration, 3.0);
        assert_eq!(stats.total_distance, 0.0);
    }

    #[test]
    fn test_heart_rate_only_over_present_values() {
        let samples = vec![
            Sample::new(46.0, 7.0, 1000.0, 0, 10.0).with_heart_rate(120),
            Sample::new(46.0, 7.0, 1000.0, 1000, 10.0),
            Sample::new(46.0, 7.0, 1000.0, 2000, 10.0).with_heart_rate(150),
        ];
        let stats = compute_session_statistics(&samples, &[]);
        assert_eq!(stats.avg_heart_rate, Some(135.0));
        assert_eq!(stats.max_heart_rate, Some(150));
    }

    #[test]
    fn test_ski_and_lift_distance() {
        let samples: Vec<Sample> = (0..11)
            .map(|i| Sample::new(46.0 + i as f64 * 0.001, 7.0, 2000.0, i * 1000, 20.0))
            .collect();
        let runs = vec![run(400.0, 100.0, 30.0), run(300.0, 50.0, 20.0)];
        let stats = compute_session_statistics(&samples, &runs);
        assert_eq!(stats.ski_distance, 700.0);
        assert_eq!(stats.ski_vertical, 150.0);
        assert!((stats.lift_distance - (stats.total_distance - 700.0)).abs() < 1e-9);
        assert_eq!(stats.avg_ski_speed, 25.0);
        assert_eq!(stats.run_count, 2);
        assert_eq!(stats.ski_time, 120.0);
    }

    #[test]
    fn test_time_distribution_priority() {
        let samples = vec![
            Sample::new(46.0, 7.0, 1000.0, 0, 10.0),
            // stationary wins over a 5 m/s climb
            Sample::new(46.0, 7.0, 1010.0, 2000, 1.0),
            // ascending: +2 m/s
            Sample::new(46.0, 7.0, 1020.0, 7000, 10.0),
            // descending: -3 m/s
            Sample::new(46.0, 7.0, 1005.0, 12000, 30.0),
            // moving: flat
            Sample::new(46.0, 7.0, 1005.0, 20000, 8.0),
        ];
        let dist = compute_time_distribution(&samples);
        assert_eq!(dist.stationary, 2.0);
        assert_eq!(dist.ascending, 5.0);
        assert_eq!(dist.descending, 5.0);
        assert_eq!(dist.moving, 8.0);
        assert_eq!(dist.total(), 20.0);
    }

    #[test]
    fn test_backwards_timestamp_adds_no_time() {
        let samples = vec![
            Sample::new(46.0, 7.0, 1000.0, 0, 10.0),
            Sample::new(46.0, 7.0, 1000.0, 10_000, 10.0),
            Sample::new(46.0, 7.0, 1000.0, 5_000, 1.0),
            Sample::new(46.0, 7.0, 1000.0, 15_000, 10.0),
        ];
        let dist = compute_time_distribution(&samples);
        assert_eq!(dist.stationary, 0.0);
        assert_eq!(dist.moving, 20.0);

        // Same interval accounting as the activity pass
        let activity = crate::activity::classify_activity(&samples, &[]);
        assert_eq!(dist.total() * 1000.0, activity.total_ms() as f64);
    }

    #[test]
    fn test_performance_score() {
        assert_eq!(performance_score(0, 60.0, 90.0, 600.0), 0.0);
        assert_eq!(performance_score(25, 60.0, 90.0, 600.0), 100.0);
        // 10/20*25 + 25/50*35 + 40/80*20 + 250/500*20
        assert!((performance_score(10, 25.0, 40.0, 250.0) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_uses_session_max_speed() {
        let samples = vec![
            Sample::new(46.0, 7.0, 2000.0, 0, 80.0),
            Sample::new(46.0, 7.0, 1900.0, 60_000, 10.0),
        ];
        let runs = vec![run(500.0, 500.0, 50.0)];
        let stats = compute_session_statistics(&samples, &runs);
        // 1/20*25 + 35 + 20 + 20
        assert!((stats.performance_score - 76.25).abs() < 1e-9);
    }
}
