//! Greedy IoU non-maximum suppression.

use crate::candidate::Candidate;

/// Default IoU above which a candidate is suppressed.
pub const DEFAULT_IOU_THRESHOLD: f64 = 0.5;

/// Order in which the greedy pass picks survivors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NmsPolicy {
    /// Highest remaining score wins each round; ties keep input order.
    #[default]
    ScoreDescending,
    /// First remaining candidate in input order wins each round, regardless
    /// of score. Order sensitive.
    FirstInOrder,
}

/// Collapses overlapping candidates into representatives.
///
/// Each round takes the first remaining candidate (in policy order) as a
/// survivor and discards every remaining candidate whose IoU with it is
/// strictly greater than `iou_threshold`. Survivors are returned in selection
/// order. The output never grows and no two survivors overlap by more than
/// the threshold.
pub fn suppress(
    mut candidates: Vec<Candidate>,
    iou_threshold: f64,
    policy: NmsPolicy,
) -> Vec<Candidate> {
    if policy == NmsPolicy::ScoreDescending {
        // Stable: equal scores keep their scan order.
        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    }

    // A candidate is removed only by an earlier survivor, so a single ordered
    // pass against the kept list is the same as repeatedly draining the pool.
    let mut kept: Vec<Candidate> = Vec::new();
    for candidate in candidates {
        let suppressed = kept
            .iter()
            .any(|survivor| survivor.bbox.iou(&candidate.bbox) > iou_threshold);
        if !suppressed {
            kept.push(candidate);
        }
    }
    kept
}
