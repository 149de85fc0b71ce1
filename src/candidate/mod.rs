//! Candidate extraction and pruning.
//!
//! Thresholding turns a score grid into labeled candidate boxes; greedy
//! IoU-based non-maximum suppression collapses overlapping candidates.

pub mod bbox;
pub mod extract;
pub mod nms;

use crate::candidate::bbox::BBox;
use std::sync::Arc;

/// An unfiltered, possibly overlapping detection proposal.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    /// Template placement in source coordinates.
    pub bbox: BBox,
    /// Similarity score at the placement, always finite.
    pub score: f32,
    /// Object class of the template that produced the candidate.
    pub label: Arc<str>,
}
