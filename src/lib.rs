//! # Ski Tracker
//!
//! Ski run detection and session statistics from GPS tracks.
//!
//! This library provides:
//! - Elevation and speed smoothing over a sliding window
//! - Descent classification and ski run segmentation with gap merging
//! - Per-run metrics (distance, vertical drop, distance-weighted speed, slope)
//! - Session-wide statistics, time distribution and a performance score
//! - Activity breakdown (skiing, lift, pause, walking)
//!
//! The whole pipeline is a pure transformation: samples in, runs and statistics out.
//! Nothing here performs I/O or keeps state between calls.
//!
//! ## Features
//!
//! - **`parallel`** - Analyze many independent sessions concurrently with rayon
//!
//! ## Quick Start
//!
//! ```rust
//! use ski_tracker::{analyze_session, DetectionConfig, Sample};
//!
//! // Two minutes of steady descent: 2m drop per second at ~10 km/h
//! let samples: Vec<Sample> = (0..120)
//!     .map(|i| {
//!         Sample::new(
//!             46.0 + i as f64 * 0.000025,
//!             7.0,
//!             2500.0 - i as f64 * 2.0,
//!             i as i64 * 1000,
//!             10.0,
//!         )
//!     })
//!     .collect();
//!
//! let analysis = analyze_session(&samples, &DetectionConfig::default());
//! assert_eq!(analysis.runs.len(), 1);
//! println!("Vertical: {:.0}m", analysis.statistics.ski_vertical);
//! ```

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{Result, SkiTrackError};

// Geographic utilities (distance, slope)
pub mod geo_utils;
pub use geo_utils::{haversine_distance, slope_percent};

// Windowed elevation/speed smoothing
pub mod smoothing;
pub use smoothing::{smooth_elevation, smooth_speed};

// Per-sample descent classification
pub mod descent;
pub use descent::classify_descent;

// Raw segment detection and gap merging
pub mod segments;
pub use segments::{detect_raw_segments, merge_segments, Segment};

// Segment validation and conversion to runs
pub mod runs;
pub use runs::{build_runs, segment_to_run};

// Detection pipeline (batch and live entry points)
pub mod detection;
pub use detection::{detect_batch, detect_incremental, validate_samples};

// Session statistics
pub mod stats;
pub use stats::{
    compute_session_statistics, compute_time_distribution, performance_score, SessionStatistics,
    SpeedHistogram, TimeDistribution,
};

// Activity state breakdown
pub mod activity;
pub use activity::{classify_activity, run_membership_mask, ActivityBreakdown, ActivityState};

// One-call session analysis
pub mod session;
pub use session::{analyze_session, analyze_sessions, try_analyze_session, SessionAnalysis};
#[cfg(feature = "parallel")]
pub use session::analyze_sessions_parallel;

// Algorithm toolbox - modular access to every stage
// Use ski_tracker::algorithms::{...} for standalone algorithm access
pub mod algorithms;

// ============================================================================
// Core Types
// ============================================================================

/// A single GPS fix recorded during a ski session.
///
/// Samples are expected in ascending timestamp order. The pipeline only ever
/// borrows them; nothing is re-sorted or modified.
///
/// # Example
/// ```
/// use ski_tracker::Sample;
/// let sample = Sample::new(46.0207, 7.7491, 2850.0, 1_700_000_000_000, 32.5)
///     .with_heart_rate(142);
/// assert_eq!(sample.heart_rate, Some(142));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Elevation in meters
    pub elevation: f64,
    /// Epoch milliseconds
    pub timestamp: i64,
    /// Horizontal accuracy in meters
    pub accuracy: f64,
    /// Speed in km/h, either device-reported or derived by the importer
    pub speed: f64,
    /// Heart rate in bpm, when a sensor was paired
    pub heart_rate: Option<u16>,
}

impl Sample {
    /// Create a new sample with zero accuracy and no heart rate.
    pub fn new(latitude: f64, longitude: f64, elevation: f64, timestamp: i64, speed: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation,
            timestamp,
            accuracy: 0.0,
            speed,
            heart_rate: None,
        }
    }

    pub fn with_heart_rate(mut self, bpm: u16) -> Self {
        self.heart_rate = Some(bpm);
        self
    }

    pub fn with_accuracy(mut self, meters: f64) -> Self {
        self.accuracy = meters;
        self
    }
}

/// A validated downhill run.
///
/// Indices refer to the exact sample slice the run was detected on; the run
/// does not own or copy samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    /// 1-based position in discovery order
    pub run_number: u32,
    /// Index of the first sample (inclusive)
    pub start_index: usize,
    /// Index of the last sample (inclusive)
    pub end_index: usize,
    /// Epoch milliseconds of the first sample
    pub start_time: i64,
    /// Epoch milliseconds of the last sample
    pub end_time: i64,
    /// Raw elevation at the first sample (meters)
    pub start_elevation: f64,
    /// Raw elevation at the last sample (meters)
    pub end_elevation: f64,
    /// Maximum smoothed speed (km/h)
    pub max_speed: f64,
    /// Distance-weighted average smoothed speed (km/h)
    pub avg_speed: f64,
    /// Horizontal distance in meters
    pub distance: f64,
    /// start_elevation - end_elevation (meters, always > 0)
    pub vertical_drop: f64,
    /// Average slope in percent
    pub avg_slope: f64,
    /// Number of samples in the run
    pub sample_count: usize,
}

impl Run {
    /// Duration of the run in seconds.
    pub fn duration_secs(&self) -> f64 {
        (self.end_time - self.start_time) as f64 / 1000.0
    }

    /// Inclusive sample index range covered by this run.
    pub fn sample_range(&self) -> std::ops::RangeInclusive<usize> {
        self.start_index..=self.end_index
    }
}

/// Configuration for run detection.
///
/// All fields have defaults; partial overrides can be loaded from JSON with
/// [`DetectionConfig::from_json`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Total smoothing window in samples. Half-window is `smoothing_window / 2`.
    /// Default: 5
    pub smoothing_window: usize,

    /// Total trend window in samples used by the descent classifier.
    /// Half-window is `trend_window / 2`. Default: 20
    pub trend_window: usize,

    /// Smoothed speed below which a sample is never descending (km/h).
    /// Suppresses stationary GPS drift. Default: 5.0
    pub descent_speed_threshold: f64,

    /// Minimum smoothed elevation drop across the trend window (meters).
    /// Default: 10.0
    pub min_window_drop: f64,

    /// Maximum pause between two segments that still merges them (seconds).
    /// Default: 120.0
    pub max_gap_time: f64,

    /// Maximum climb between two segments that still merges them (meters).
    /// Default: 50.0
    pub max_ascent_in_gap: f64,

    /// Minimum run duration (seconds). Default: 60.0
    pub min_run_duration: f64,

    /// Minimum run vertical drop (meters). Default: 30.0
    pub min_run_vertical: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            smoothing_window: 5,
            trend_window: 20,
            descent_speed_threshold: 5.0,
            min_window_drop: 10.0,
            max_gap_time: 120.0,
            max_ascent_in_gap: 50.0,
            min_run_duration: 60.0,
            min_run_vertical: 30.0,
        }
    }
}

impl DetectionConfig {
    /// Load a config from JSON. Missing fields keep their defaults.
    ///
    /// # Example
    /// ```
    /// use ski_tracker::DetectionConfig;
    /// let config = DetectionConfig::from_json(r#"{"max_gap_time": 90.0}"#).unwrap();
    /// assert_eq!(config.max_gap_time, 90.0);
    /// assert_eq!(config.trend_window, 20);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let config: DetectionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that windows are non-empty and thresholds are finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        let windows = [
            ("smoothing_window", self.smoothing_window),
            ("trend_window", self.trend_window),
        ];
        for (name, value) in windows {
            if value == 0 {
                return Err(SkiTrackError::InvalidConfig {
                    message: format!("{} must be at least 1", name),
                });
            }
        }

        let thresholds = [
            ("descent_speed_threshold", self.descent_speed_threshold),
            ("min_window_drop", self.min_window_drop),
            ("max_gap_time", self.max_gap_time),
            ("max_ascent_in_gap", self.max_ascent_in_gap),
            ("min_run_duration", self.min_run_duration),
            ("min_run_vertical", self.min_run_vertical),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(SkiTrackError::InvalidConfig {
                    message: format!(
                        "{} must be a finite, non-negative number (got {})",
                        name, value
                    ),
                });
            }
        }
        Ok(())
    }

    /// Half-width of the smoothing window.
    pub fn smoothing_half_window(&self) -> usize {
        self.smoothing_window / 2
    }

    /// Half-width of the descent trend window.
    pub fn trend_half_window(&self) -> usize {
        self.trend_window / 2
    }
}

// ============================================================================
// Tests
// ============================================================================
