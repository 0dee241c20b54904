//! Windowed moving-average smoothing for elevation and speed.
//!
//! Both smoothers use a centered window of `2 * half_window + 1` samples that
//! shrinks near the ends of the track instead of padding or wrapping. Output
//! always has the same length as the input.

use crate::geo_utils::haversine_distance;
use crate::Sample;

/// Conversion factor from m/s to km/h.
pub const MS_TO_KMH: f64 = 3.6;

/// Bounds `[start, end)` of the window centered on `i`, clamped to `n`.
#[inline]
pub(crate) fn window_bounds(i: usize, half_window: usize, n: usize) -> (usize, usize) {
    (i.saturating_sub(half_window), (i + half_window + 1).min(n))
}

/// Moving-average elevation for every sample.
///
/// # Example
/// ```
/// use ski_tracker::{smooth_elevation, Sample};
/// let samples: Vec<Sample> = [100.0, 110.0, 90.0]
///     .iter()
///     .enumerate()
///     .map(|(i, &e)| Sample::new(46.0, 7.0, e, i as i64 * 1000, 0.0))
///     .collect();
/// let smoothed = smooth_elevation(&samples, 1);
/// assert_eq!(smoothed, vec![105.0, 100.0, 100.0]);
/// ```
pub fn smooth_elevation(samples: &[Sample], half_window: usize) -> Vec<f64> {
    let n = samples.len();
    if n <= 1 {
        return samples.iter().map(|s| s.elevation).collect();
    }

    (0..n)
        .map(|i| {
            let (start, end) = window_bounds(i, half_window, n);
            let sum: f64 = samples[start..end].iter().map(|s| s.elevation).sum();
            sum / (end - start) as f64
        })
        .collect()
}

/// Speed reconstructed from positions and timestamps over a moving window (km/h).
///
/// For each sample the window's path length is divided by its elapsed time.
/// When the window holds a single sample, or no time passes across it, the
/// sample's recorded speed is used instead.
pub fn smooth_speed(samples: &[Sample], half_window: usize) -> Vec<f64> {
    let n = samples.len();
    if n <= 1 {
        return samples.iter().map(|s| s.speed).collect();
    }

    // Per-interval distance (m) and duration (s), interval k joins k and k+1
    let intervals: Vec<(f64, f64)> = samples
        .windows(2)
        .map(|w| {
            (
                haversine_distance(&w[0], &w[1]),
                (w[1].timestamp - w[0].timestamp) as f64 / 1000.0,
            )
        })
        .collect();

    (0..n)
        .map(|i| {
            let (start, end) = window_bounds(i, half_window, n);
            if end - start < 2 {
                return samples[i].speed;
            }
            let (distance, time) = intervals[start..end - 1]
                .iter()
                .fold((0.0, 0.0), |(d, t), &(di, ti)| (d + di, t + ti));
            if time <= 0.0 {
                samples[i].speed
            } else {
                distance / time * MS_TO_KMH
            }
        })
        .collect()
}
