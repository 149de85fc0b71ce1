//! boxmatch finds known templates in a grayscale image and reports them as
//! labeled, non-overlapping bounding boxes.
//!
//! Each template is scored densely against the source (ZNCC by default), the
//! score grid is thresholded into candidate boxes, and greedy IoU non-maximum
//! suppression keeps one box per cluster. Templates are processed
//! independently and merged in submission order; the optional `rayon`
//! feature parallelizes both the scan and the per-template work.

pub mod candidate;
pub mod detect;
pub mod grid;
pub mod image;
pub mod kernel;
pub mod lowlevel;
pub mod palette;
pub mod template;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use crate::image::io;

pub use candidate::bbox::BBox;
pub use candidate::extract::{
    extract_candidates, extract_candidates_within, DEFAULT_SCORE_THRESHOLD,
};
pub use candidate::nms::{suppress, NmsPolicy, DEFAULT_IOU_THRESHOLD};
pub use candidate::Candidate;
#[cfg(feature = "image-io")]
pub use detect::FsAssets;
pub use detect::{
    consolidate_grid, AssetLoader, DetectConfig, Detection, DetectionReport, Detector,
    InMemoryAssets, SkippedTemplate,
};
pub use grid::ScoreGrid;
pub use crate::image::{ImageView, OwnedImage, Size};
pub use kernel::{SimilarityScorer, ZnccScorer};
pub use palette::{LabelPalette, Rgb8};
pub use template::{Template, TemplateDescriptor};
pub use util::{BoxMatchError, BoxMatchResult};
