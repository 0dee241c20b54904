//! Per-sample descent classification.
//!
//! A sample counts as descending when the skier is moving and the smoothed
//! elevation falls by at least `min_window_drop` across a wide trend window
//! centered on it. The window looks both behind and ahead, so this cannot be
//! evaluated one sample at a time without buffering `trend_window` samples.

use crate::DetectionConfig;

/// Flag every sample as descending or not.
///
/// `smoothed_elevation` and `smoothed_speed` must be the same length; the
/// result has one flag per entry.
///
/// # Example
/// ```
/// use ski_tracker::{classify_descent, DetectionConfig};
/// let elevation: Vec<f64> = (0..30).map(|i| 2000.0 - i as f64 * 2.0).collect();
/// let speed = vec![20.0; 30];
/// let flags = classify_descent(&elevation, &speed, &DetectionConfig::default());
/// assert!(flags.iter().all(|&d| d));
/// ```
pub fn classify_descent(
    smoothed_elevation: &[f64],
    smoothed_speed: &[f64],
    config: &DetectionConfig,
) -> Vec<bool> {
    let n = smoothed_elevation.len().min(smoothed_speed.len());
    if n == 0 {
        return Vec::new();
    }
    let half_window = config.trend_half_window();

    (0..n)
        .map(|i| {
            // Stationary GPS drift can look like a descent
            if smoothed_speed[i] < config.descent_speed_threshold {
                return false;
            }
            let window_start = i.saturating_sub(half_window);
            let window_end = (i + half_window).min(n - 1);
            let drop = smoothed_elevation[window_start] - smoothed_elevation[window_end];
            drop >= config.min_window_drop
        })
        .collect()
}
