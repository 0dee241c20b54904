//! One-call session analysis: runs, statistics and activity breakdown.

#[cfg(feature = "parallel")]
use log::info;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::activity::{classify_activity, ActivityBreakdown};
use crate::detection::{detect_batch, validate_samples};
use crate::stats::{compute_session_statistics, SessionStatistics};
use crate::{DetectionConfig, Result, Run, Sample};

/// Everything derived from one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionAnalysis {
    /// Runs in ascending run-number order
    pub runs: Vec<Run>,
    pub statistics: SessionStatistics,
    pub activity: ActivityBreakdown,
}

impl SessionAnalysis {
    /// Serialize the analysis to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Detect runs, then compute statistics and the activity breakdown.
///
/// Samples are assumed to be sorted by timestamp; see [`try_analyze_session`]
/// for a checked variant.
pub fn analyze_session(samples: &[Sample], config: &DetectionConfig) -> SessionAnalysis {
    let runs = detect_batch(samples, config);
    let statistics = compute_session_statistics(samples, &runs);
    let activity = classify_activity(samples, &runs);

    SessionAnalysis {
        runs,
        statistics,
        activity,
    }
}

/// Like [`analyze_session`], but rejects an invalid config or samples that
/// are not sorted by timestamp.
pub fn try_analyze_session(
    samples: &[Sample],
    config: &DetectionConfig,
) -> Result<SessionAnalysis> {
    config.validate()?;
    validate_samples(samples)?;
    Ok(analyze_session(samples, config))
}

/// Analyze independent sessions one after another.
pub fn analyze_sessions(
    sessions: &[Vec<Sample>],
    config: &DetectionConfig,
) -> Vec<SessionAnalysis> {
    sessions
        .iter()
        .map(|samples| analyze_session(samples, config))
        .collect()
}

/// Analyze independent sessions in parallel.
/// Falls back to sequential for small batches.
#[cfg(feature = "parallel")]
pub fn analyze_sessions_parallel(
    sessions: &[Vec<Sample>],
    config: &DetectionConfig,
) -> Vec<SessionAnalysis> {
    if sessions.len() < 4 {
        return analyze_sessions(sessions, config);
    }

    info!(
        "[SkiTracker] Analyzing {} sessions in parallel",
        sessions.len()
    );
    sessions
        .par_iter()
        .map(|samples| analyze_session(samples, config))
        .collect()
}
