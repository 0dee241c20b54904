//! # Algorithm Toolbox
//!
//! Direct access to every stage of the run detection pipeline. Use these to
//! plug a single stage into your own processing without the full
//! [`analyze_session`](crate::analyze_session) call.
//!
//! ## Stages
//!
//! - **Geometry**: haversine distance and slope between samples
//! - **Smoothing**: windowed elevation and speed averages
//! - **Descent Classification**: per-sample descending flag
//! - **Segmentation**: raw segment detection and gap merging
//! - **Run Building**: validation and per-run metrics
//! - **Statistics**: session aggregates, time split, performance score
//! - **Activity**: skiing / lift / pause / walking breakdown
//!
//! # Example
//!
//! ```rust
//! use ski_tracker::algorithms::{
//!     classify_descent, detect_raw_segments, smooth_elevation, smooth_speed,
//!     DetectionConfig, Sample,
//! };
//!
//! let samples: Vec<Sample> = (0..40)
//!     .map(|i| {
//!         let lat = 46.0 + i as f64 * 0.00005;
//!         Sample::new(lat, 7.0, 2000.0 - i as f64 * 3.0, i * 1000, 0.0)
//!     })
//!     .collect();
//!
//! let config = DetectionConfig::default();
//! let elevation = smooth_elevation(&samples, config.smoothing_half_window());
//! let speed = smooth_speed(&samples, config.smoothing_half_window());
//! let flags = classify_descent(&elevation, &speed, &config);
//! let segments = detect_raw_segments(&flags);
//! assert_eq!(segments.len(), 1);
//! ```

// =============================================================================
// Core Types (re-exported from lib)
// =============================================================================

pub use crate::{DetectionConfig, Run, Sample};

// =============================================================================
// Geometry
// =============================================================================

pub use crate::geo_utils::{
    haversine_coords, haversine_distance, slope_percent, track_distance, EARTH_RADIUS_M,
};

// =============================================================================
// Smoothing
// =============================================================================

/// Moving-average elevation over a centered, edge-shrinking window.
pub use crate::smoothing::smooth_elevation;
/// Path length over elapsed time across the same window, in km/h.
pub use crate::smoothing::smooth_speed;

// =============================================================================
// Descent Classification
// =============================================================================

/// Flags samples whose surrounding trend window drops far enough while moving.
pub use crate::descent::classify_descent;

// =============================================================================
// Segmentation
// =============================================================================

/// Inclusive index range of a candidate run.
pub use crate::segments::Segment;
/// Maximal runs of descending flags.
pub use crate::segments::detect_raw_segments;
/// Joins segments across short, flat gaps.
pub use crate::segments::merge_segments;

// =============================================================================
// Run Building
// =============================================================================

/// Filters segments by duration and vertical drop and numbers the survivors.
pub use crate::runs::build_runs;
/// Metrics for a single segment.
pub use crate::runs::segment_to_run;

// =============================================================================
// Statistics
// =============================================================================

pub use crate::stats::{
    compute_session_statistics, compute_time_distribution, performance_score, SessionStatistics,
    SpeedHistogram, TimeDistribution,
};

// =============================================================================
// Activity
// =============================================================================

pub use crate::activity::{
    classify_activity, run_membership_mask, ActivityBreakdown, ActivityState,
};
