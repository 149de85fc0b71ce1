//! Similarity scoring kernels.
//!
//! A kernel turns a source image and a template into a dense [`ScoreGrid`]
//! with one score per valid top-left placement. Detection only depends on the
//! [`SimilarityScorer`] trait, so other normalized metrics can be plugged in.

use crate::grid::ScoreGrid;
use crate::template::TemplatePlan;
use crate::trace::trace_span;
use crate::util::{BoxMatchError, BoxMatchResult};
use crate::ImageView;

pub mod scalar;

#[cfg(feature = "rayon")]
pub mod rayon;

/// Produces a similarity grid for a template placed over a source image.
///
/// Implementations must return a grid of
/// `(src_h - tpl_h + 1) x (src_w - tpl_w + 1)` scores normalized to a bounded
/// range (ZNCC uses `[-1, 1]`) so that a fixed threshold is meaningful.
pub trait SimilarityScorer: Send + Sync {
    /// Scores every placement of `template` inside `source`.
    fn score(
        &self,
        source: ImageView<'_, u8>,
        template: ImageView<'_, u8>,
    ) -> BoxMatchResult<ScoreGrid>;
}

/// Zero-mean normalized cross-correlation scorer.
///
/// Equivalent to the `TM_CCOEFF_NORMED` metric. Source windows whose variance
/// is at or below `min_var_i` score `0.0`.
#[derive(Clone, Copy, Debug)]
pub struct ZnccScorer {
    /// Minimum variance of an image window for a non-zero score.
    pub min_var_i: f64,
    /// Scan grid rows in parallel (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for ZnccScorer {
    fn default() -> Self {
        Self {
            min_var_i: 1e-8,
            parallel: false,
        }
    }
}

impl ZnccScorer {
    /// Creates a sequential scorer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables row-parallel scanning.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

impl SimilarityScorer for ZnccScorer {
    fn score(
        &self,
        source: ImageView<'_, u8>,
        template: ImageView<'_, u8>,
    ) -> BoxMatchResult<ScoreGrid> {
        if source.width() < template.width() || source.height() < template.height() {
            return Err(BoxMatchError::TemplateTooLarge {
                tpl_width: template.width(),
                tpl_height: template.height(),
                img_width: source.width(),
                img_height: source.height(),
            });
        }
        let plan = TemplatePlan::from_view(template)?;
        let _span = trace_span!(
            "zncc_score",
            tpl_width = plan.width(),
            tpl_height = plan.height()
        )
        .entered();

        #[cfg(feature = "rayon")]
        if self.parallel {
            return rayon::zncc_grid_par(source, &plan, self.min_var_i);
        }

        scalar::zncc_grid(source, &plan, self.min_var_i)
    }
}
