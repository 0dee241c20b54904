//! Raw segment detection and gap merging.
//!
//! ## Algorithm
//! 1. Scan the descent flags left to right, emitting each maximal run of `true`
//! 2. Walk the raw segments with a single accumulator, extending it across a
//!    gap only when the pause is short AND the climb in between is small
//! 3. Flush the accumulator whenever either condition fails, and at the end

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{DetectionConfig, Sample};

/// Inclusive sample index range of a candidate run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of samples covered.
    pub fn sample_count(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Group contiguous descending samples into segments.
///
/// # Example
/// ```
/// use ski_tracker::{detect_raw_segments, Segment};
/// let flags = [false, true, true, false, true];
/// assert_eq!(
///     detect_raw_segments(&flags),
///     vec![Segment::new(1, 2), Segment::new(4, 4)]
/// );
/// ```
pub fn detect_raw_segments(descending: &[bool]) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut open: Option<usize> = None;

    for (i, &is_descending) in descending.iter().enumerate() {
        match (open, is_descending) {
            (None, true) => open = Some(i),
            (Some(start), false) => {
                segments.push(Segment::new(start, i - 1));
                open = None;
            }
            _ => {}
        }
    }
    if let Some(start) = open {
        segments.push(Segment::new(start, descending.len() - 1));
    }

    segments
}

/// Join segments separated by a short, mostly flat gap.
///
/// Gap time is measured between the accumulator's last sample and the next
/// segment's first sample; ascent uses the smoothed elevation at the same
/// two points (positive means uphill). Both must be within limits to merge.
pub fn merge_segments(
    segments: &[Segment],
    samples: &[Sample],
    smoothed_elevation: &[f64],
    config: &DetectionConfig,
) -> Vec<Segment> {
    if segments.len() <= 1 {
        return segments.to_vec();
    }

    let mut merged = Vec::with_capacity(segments.len());
    let first = segments[0];

    let last = segments[1..].iter().fold(first, |current, &next| {
        let gap_time =
            (samples[next.start].timestamp - samples[current.end].timestamp) as f64 / 1000.0;
        let ascent = smoothed_elevation[next.start] - smoothed_elevation[current.end];

        if gap_time <= config.max_gap_time && ascent <= config.max_ascent_in_gap {
            Segment::new(current.start, next.end)
        } else {
            debug!(
                "[Segments] Split at {}..{}: gap {:.0}s, ascent {:.1}m",
                current.end, next.start, gap_time, ascent
            );
            merged.push(current);
            next
        }
    });
    merged.push(last);

    debug!(
        "[Segments] {} raw segments merged into {}",
        segments.len(),
        merged.len()
    );
    merged
}
