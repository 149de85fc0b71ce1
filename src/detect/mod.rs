//! Multi-template detection.
//!
//! The [`Detector`] runs every template descriptor through scoring, threshold
//! extraction and per-template NMS, then merges the survivors in descriptor
//! order. A template that cannot be loaded or scored is skipped and reported;
//! a missing source image aborts the whole run.

mod assets;

#[cfg(feature = "image-io")]
pub use assets::FsAssets;
pub use assets::{AssetLoader, InMemoryAssets};

use crate::candidate::bbox::BBox;
use crate::candidate::extract::{extract_candidates_within, DEFAULT_SCORE_THRESHOLD};
use crate::candidate::nms::{suppress, NmsPolicy, DEFAULT_IOU_THRESHOLD};
use crate::candidate::Candidate;
use crate::grid::ScoreGrid;
use crate::image::Size;
use crate::kernel::{SimilarityScorer, ZnccScorer};
use crate::template::{Template, TemplateDescriptor};
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::{BoxMatchError, BoxMatchResult};
use crate::ImageView;
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Configuration for a detection run.
#[derive(Clone, Debug)]
pub struct DetectConfig {
    /// Minimum similarity score for a placement to become a candidate.
    pub score_threshold: f32,
    /// IoU above which NMS suppresses a candidate.
    pub iou_threshold: f64,
    /// Survivor selection order for NMS.
    pub nms_policy: NmsPolicy,
    /// Scale applied to the source size when a template is larger than it.
    pub oversize_scale: f32,
    /// Process templates in parallel (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            nms_policy: NmsPolicy::default(),
            oversize_scale: 0.5,
            parallel: false,
        }
    }
}

impl DetectConfig {
    fn validate(&self) -> BoxMatchResult<()> {
        if !self.score_threshold.is_finite() {
            return Err(BoxMatchError::InvalidInput("score threshold must be finite"));
        }
        if !self.iou_threshold.is_finite() {
            return Err(BoxMatchError::InvalidInput("IoU threshold must be finite"));
        }
        if !(self.oversize_scale.is_finite()
            && self.oversize_scale > 0.0
            && self.oversize_scale <= 1.0)
        {
            return Err(BoxMatchError::InvalidInput("oversize scale must be in (0, 1]"));
        }
        Ok(())
    }
}

/// A labeled box that survived non-maximum suppression.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub bbox: BBox,
    pub label: Arc<str>,
    /// Similarity score of the surviving placement, kept for diagnostics.
    pub score: f32,
}

impl From<Candidate> for Detection {
    fn from(value: Candidate) -> Self {
        Self {
            bbox: value.bbox,
            label: value.label,
            score: value.score,
        }
    }
}

/// A template that was left out of a run, and why.
#[derive(Clone, Debug, PartialEq)]
pub struct SkippedTemplate {
    pub asset: String,
    pub label: Arc<str>,
    pub reason: BoxMatchError,
}

/// Result of a detection run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectionReport {
    /// Detections in descriptor order, then NMS selection order.
    pub detections: Vec<Detection>,
    /// Templates skipped because they could not be loaded or scored.
    pub skipped: Vec<SkippedTemplate>,
}

impl DetectionReport {
    /// Total number of detections.
    pub fn len(&self) -> usize {
        self.detections.len()
    }

    /// Returns true when nothing was detected.
    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    /// Iterates detections in report order.
    pub fn iter(&self) -> std::slice::Iter<'_, Detection> {
        self.detections.iter()
    }

    /// Number of detections per label, in label order.
    pub fn count_by_label(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for detection in &self.detections {
            *counts.entry(&*detection.label).or_insert(0) += 1;
        }
        counts
    }
}

/// Extracts and suppresses candidates from one template's score grid.
///
/// Placements are bounded by `source`; NMS only sees this grid's candidates.
pub fn consolidate_grid(
    grid: &ScoreGrid,
    template: Size,
    label: &Arc<str>,
    source: Size,
    config: &DetectConfig,
) -> Vec<Detection> {
    let candidates =
        extract_candidates_within(grid, template, label, config.score_threshold, source);
    let found = candidates.len();
    let survivors = suppress(candidates, config.iou_threshold, config.nms_policy);
    trace_event!(
        "template_consolidated",
        label = &**label,
        candidates = found,
        survivors = survivors.len()
    );
    survivors.into_iter().map(Detection::from).collect()
}

/// Runs templates against a source image and collects labeled detections.
#[derive(Clone, Debug)]
pub struct Detector<S = ZnccScorer> {
    scorer: S,
    config: DetectConfig,
}

impl Default for Detector<ZnccScorer> {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector<ZnccScorer> {
    /// Creates a detector with the ZNCC scorer and default configuration.
    pub fn new() -> Self {
        Self::with_scorer(ZnccScorer::default())
    }
}

impl<S: SimilarityScorer> Detector<S> {
    /// Creates a detector around a custom scorer.
    pub fn with_scorer(scorer: S) -> Self {
        Self {
            scorer,
            config: DetectConfig::default(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: DetectConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &DetectConfig {
        &self.config
    }

    /// Returns the similarity scorer.
    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Detects every template in `source`.
    ///
    /// Templates that fail to load or score are recorded in
    /// [`DetectionReport::skipped`] and do not stop the run.
    pub fn detect<L>(
        &self,
        source: ImageView<'_, u8>,
        templates: &[TemplateDescriptor],
        assets: &L,
    ) -> BoxMatchResult<DetectionReport>
    where
        L: AssetLoader + ?Sized,
    {
        self.config.validate()?;
        let _span = trace_span!(
            "detect",
            templates = templates.len(),
            width = source.width(),
            height = source.height()
        )
        .entered();

        let outcomes = self.run_templates(source, templates, assets);

        let mut report = DetectionReport::default();
        for (descriptor, outcome) in templates.iter().zip(outcomes) {
            match outcome {
                Ok(found) => report.detections.extend(found),
                Err(reason) => {
                    trace_warn!(
                        "template_skipped",
                        asset = descriptor.asset(),
                        label = &**descriptor.label(),
                        reason = reason.to_string().as_str()
                    );
                    report.skipped.push(SkippedTemplate {
                        asset: descriptor.asset().to_owned(),
                        label: Arc::clone(descriptor.label()),
                        reason,
                    });
                }
            }
        }

        trace_event!(
            "detection_summary",
            total = report.len(),
            skipped = report.skipped.len()
        );
        Ok(report)
    }

    /// Loads the source image through `assets` and detects every template.
    ///
    /// Fails with [`BoxMatchError::SourceUnavailable`] when the source cannot
    /// be loaded; no template is processed in that case.
    pub fn detect_asset<L>(
        &self,
        source_id: &str,
        templates: &[TemplateDescriptor],
        assets: &L,
    ) -> BoxMatchResult<DetectionReport>
    where
        L: AssetLoader + ?Sized,
    {
        let source = assets
            .load(source_id)
            .map_err(|err| BoxMatchError::SourceUnavailable {
                reason: err.to_string(),
            })?;
        self.detect(source.view(), templates, assets)
    }

    fn run_templates<L>(
        &self,
        source: ImageView<'_, u8>,
        templates: &[TemplateDescriptor],
        assets: &L,
    ) -> Vec<BoxMatchResult<Vec<Detection>>>
    where
        L: AssetLoader + ?Sized,
    {
        // Indexed collect keeps submission order.
        #[cfg(feature = "rayon")]
        if self.config.parallel {
            return templates
                .par_iter()
                .map(|descriptor| self.detect_template(source, descriptor, assets))
                .collect();
        }

        templates
            .iter()
            .map(|descriptor| self.detect_template(source, descriptor, assets))
            .collect()
    }

    fn detect_template<L>(
        &self,
        source: ImageView<'_, u8>,
        descriptor: &TemplateDescriptor,
        assets: &L,
    ) -> BoxMatchResult<Vec<Detection>>
    where
        L: AssetLoader + ?Sized,
    {
        let raster = assets.load(descriptor.asset())?;
        let original = raster.size();
        let template =
            Template::from_owned(raster).fit_to_source(source.size(), self.config.oversize_scale)?;
        if template.size() != original {
            trace_event!(
                "template_resized",
                asset = descriptor.asset(),
                from_width = original.width,
                from_height = original.height,
                to_width = template.size().width,
                to_height = template.size().height
            );
        }

        let grid = self.scorer.score(source, template.view())?;
        Ok(consolidate_grid(
            &grid,
            template.size(),
            descriptor.label(),
            source.size(),
            &self.config,
        ))
    }
}
