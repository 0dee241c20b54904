//! Geographic utilities for distance and slope between samples.

use crate::Sample;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two samples in meters (haversine).
///
/// Returns exactly 0.0 for identical positions. The intermediate term is
/// clamped to [0, 1] so near-antipodal points never produce NaN.
///
/// # Example
/// ```
/// use ski_tracker::{haversine_distance, Sample};
/// let a = Sample::new(46.0, 7.0, 2000.0, 0, 0.0);
/// let b = Sample::new(46.001, 7.0, 1990.0, 1000, 0.0);
/// let d = haversine_distance(&a, &b);
/// assert!((d - 111.2).abs() < 0.5);
/// ```
pub fn haversine_distance(a: &Sample, b: &Sample) -> f64 {
    haversine_coords(a.latitude, a.longitude, b.latitude, b.longitude)
}

/// Haversine distance for raw coordinates in degrees.
pub fn haversine_coords(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    if lat1 == lat2 && lon1 == lon2 {
        return 0.0;
    }

    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Slope between two samples as a percentage (rise over run × 100).
///
/// Returns 0.0 when the samples share a position.
pub fn slope_percent(a: &Sample, b: &Sample) -> f64 {
    let distance = haversine_distance(a, b);
    if distance == 0.0 {
        return 0.0;
    }
    (b.elevation - a.elevation) / distance * 100.0
}

/// Total distance along consecutive samples in meters.
pub fn track_distance(samples: &[Sample]) -> f64 {
    samples
        .windows(2)
        .map(|w| haversine_distance(&w[0], &w[1]))
        .sum()
}
