//! Activity breakdown: skiing, lift, pause and walking time.
//!
//! Every interval between consecutive samples is assigned to exactly one
//! state, judged on the later sample:
//!
//! 1. inside a detected run → Skiing
//! 2. speed below 1 km/h → Pause
//! 3. gained more than 5m at under 10 km/h → Lift
//! 4. anything else → Walking (including fast movement outside a run)

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Run, Sample};

/// Below this speed the skier is paused (km/h).
pub const PAUSE_SPEED_KMH: f64 = 1.0;

/// Elevation gain per interval that marks lift travel (meters).
pub const LIFT_MIN_GAIN_M: f64 = 5.0;

/// Upper speed bound for lift and walking detection (km/h).
pub const SLOW_MOVEMENT_KMH: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActivityState {
    Skiing,
    Lift,
    Pause,
    Walking,
}

impl ActivityState {
    pub const ALL: [ActivityState; 4] = [
        ActivityState::Skiing,
        ActivityState::Lift,
        ActivityState::Pause,
        ActivityState::Walking,
    ];
}

/// Milliseconds spent in each activity state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityBreakdown {
    pub skiing_ms: u64,
    pub lift_ms: u64,
    pub pause_ms: u64,
    pub walking_ms: u64,
}

impl ActivityBreakdown {
    pub fn duration_ms(&self, state: ActivityState) -> u64 {
        match state {
            ActivityState::Skiing => self.skiing_ms,
            ActivityState::Lift => self.lift_ms,
            ActivityState::Pause => self.pause_ms,
            ActivityState::Walking => self.walking_ms,
        }
    }

    fn add(&mut self, state: ActivityState, ms: u64) {
        match state {
            ActivityState::Skiing => self.skiing_ms += ms,
            ActivityState::Lift => self.lift_ms += ms,
            ActivityState::Pause => self.pause_ms += ms,
            ActivityState::Walking => self.walking_ms += ms,
        }
    }

    pub fn total_ms(&self) -> u64 {
        self.skiing_ms + self.lift_ms + self.pause_ms + self.walking_ms
    }

    /// Share of total time in a state (0-100). Zero when no time was recorded.
    pub fn percent(&self, state: ActivityState) -> f64 {
        let total = self.total_ms();
        if total == 0 {
            return 0.0;
        }
        self.duration_ms(state) as f64 / total as f64 * 100.0
    }

    pub fn percentages(&self) -> BTreeMap<ActivityState, f64> {
        ActivityState::ALL
            .iter()
            .map(|&state| (state, self.percent(state)))
            .collect()
    }

    pub fn to_map(&self) -> BTreeMap<ActivityState, u64> {
        ActivityState::ALL
            .iter()
            .map(|&state| (state, self.duration_ms(state)))
            .collect()
    }
}

/// Mark which samples fall inside any run. Indices past `sample_count` are ignored.
pub fn run_membership_mask(runs: &[Run], sample_count: usize) -> Vec<bool> {
    let mut mask = vec![false; sample_count];
    for run in runs {
        if run.start_index >= sample_count || run.end_index < run.start_index {
            continue;
        }
        let end = run.end_index.min(sample_count - 1);
        mask[run.start_index..=end].fill(true);
    }
    mask
}

/// Classify one interval ending at `curr`.
fn classify_interval(prev: &Sample, curr: &Sample, in_run: bool) -> ActivityState {
    let gain = curr.elevation - prev.elevation;

    if in_run {
        ActivityState::Skiing
    } else if curr.speed < PAUSE_SPEED_KMH {
        ActivityState::Pause
    } else if gain > LIFT_MIN_GAIN_M && curr.speed < SLOW_MOVEMENT_KMH {
        ActivityState::Lift
    } else {
        // Both slow movement and fast movement outside a run land here.
        // TODO: give fast non-run movement (gondolas, undetected runs) its own state
        ActivityState::Walking
    }
}

/// Accumulate time per activity state given the detected runs.
///
/// # Example
/// ```
/// use ski_tracker::{classify_activity, ActivityState, Sample};
/// let samples: Vec<Sample> = (0..3)
///     .map(|i| Sample::new(46.0, 7.0, 2000.0, i * 1000, 0.0))
///     .collect();
/// let breakdown = classify_activity(&samples, &[]);
/// assert_eq!(breakdown.percent(ActivityState::Pause), 100.0);
/// ```
pub fn classify_activity(samples: &[Sample], runs: &[Run]) -> ActivityBreakdown {
    let mask = run_membership_mask(runs, samples.len());
    let mut breakdown = ActivityBreakdown::default();

    for (i, w) in samples.windows(2).enumerate() {
        let (prev, curr) = (&w[0], &w[1]);
        let elapsed = (curr.timestamp - prev.timestamp).max(0) as u64;
        let state = classify_interval(prev, curr, mask[i + 1]);
        breakdown.add(state, elapsed);
    }

    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(elevation: f64, t_ms: i64, speed: f64) -> Sample {
        Sample::new(46.0, 7.0, elevation, t_ms, speed)
    }

    fn run_over(start_index: usize, end_index: usize) -> Run {
        Run {
            run_number: 1,
            start_index,
            end_index,
            start_time: 0,
            end_time: 0,
            start_elevation: 0.0,
            end_elevation: 0.0,
            max_speed: 0.0,
            avg_speed: 0.0,
            distance: 0.0,
            vertical_drop: 0.0,
            avg_slope: 0.0,
            sample_count: end_index - start_index + 1,
        }
    }

    #[test]
    fn test_mask() {
        let mask = run_membership_mask(&[run_over(1, 2), run_over(4, 9)], 6);
        assert_eq!(mask, vec![false, true, true, false, true, true]);
        assert!(run_membership_mask(&[run_over(7, 8)], 6).iter().all(|&m| !m));
    }

    #[test]
    fn test_each_state() {
        let prev = sample(1000.0, 0, 0.0);
        assert_eq!(
            classify_interval(&prev, &sample(990.0, 1000, 40.0), true),
            ActivityState::Skiing
        );
        assert_eq!(
            classify_interval(&prev, &sample(1000.0, 1000, 0.5), false),
            ActivityState::Pause
        );
        assert_eq!(
            classify_interval(&prev, &sample(1006.0, 1000, 8.0), false),
            ActivityState::Lift
        );
        assert_eq!(
            classify_interval(&prev, &sample(1001.0, 1000, 4.0), false),
            ActivityState::Walking
        );
        assert_eq!(
            classify_interval(&prev, &sample(1010.0, 1000, 25.0), false),
            ActivityState::Walking
        );
    }

    #[test]
    fn test_breakdown_percentages() {
        let samples = vec![
            sample(1000.0, 0, 0.0),
            sample(1000.0, 30_000, 0.0),  // pause 30s
            sample(1050.0, 60_000, 6.0),  // lift 30s
            sample(1050.0, 120_000, 4.0), // walking 60s
        ];
        let breakdown = classify_activity(&samples, &[]);
        assert_eq!(breakdown.pause_ms, 30_000);
        assert_eq!(breakdown.lift_ms, 30_000);
        assert_eq!(breakdown.walking_ms, 60_000);
        assert_eq!(breakdown.total_ms(), 120_000);
        assert_eq!(breakdown.percent(ActivityState::Walking), 50.0);
        assert_eq!(breakdown.percentages()[&ActivityState::Skiing], 0.0);
        assert_eq!(breakdown.to_map()[&ActivityState::Lift], 30_000);
    }

    #[test]
    fn test_empty_total_gives_zero_percent() {
        let breakdown = classify_activity(&[sample(1000.0, 0, 0.0)], &[]);
        for state in ActivityState::ALL {
            assert_eq!(breakdown.percent(state), 0.0);
        }
        assert_eq!(classify_activity(&[], &[]), ActivityBreakdown::default());
    }
}
