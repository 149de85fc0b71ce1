//! Threshold scan of a similarity grid.

use crate::candidate::bbox::BBox;
use crate::candidate::Candidate;
use crate::grid::ScoreGrid;
use crate::image::Size;
use crate::trace::trace_debug;
use std::sync::Arc;

/// Default similarity threshold for accepting a placement.
pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.6;

/// Emits one candidate per grid cell whose score is at least `threshold`.
///
/// Cells are visited in row-major order (y outer, x inner) and the output
/// keeps that order. Each candidate box has its top-left corner at the cell
/// and the template's size. Non-finite scores are never emitted. An empty
/// grid or a zero-sized template yields no candidates.
pub fn extract_candidates(
    grid: &ScoreGrid,
    template: Size,
    label: &Arc<str>,
    threshold: f32,
) -> Vec<Candidate> {
    scan(grid, template, label, threshold, None)
}

/// Like [`extract_candidates`], but skips placements whose box would extend
/// past `bounds` (the source image size).
pub fn extract_candidates_within(
    grid: &ScoreGrid,
    template: Size,
    label: &Arc<str>,
    threshold: f32,
    bounds: Size,
) -> Vec<Candidate> {
    scan(grid, template, label, threshold, Some(bounds))
}

fn scan(
    grid: &ScoreGrid,
    template: Size,
    label: &Arc<str>,
    threshold: f32,
    bounds: Option<Size>,
) -> Vec<Candidate> {
    let mut out = Vec::new();
    if template.is_empty() {
        return out;
    }

    for (y, row) in grid.rows().enumerate() {
        for (x, &score) in row.iter().enumerate() {
            if !score.is_finite() || score < threshold {
                continue;
            }
            let Ok(bbox) = BBox::at(x, y, template) else {
                continue;
            };
            if bounds.is_some_and(|b| !bbox.fits_within(b)) {
                continue;
            }
            trace_debug!(
                "candidate",
                label = &**label,
                x = x,
                y = y,
                score = score
            );
            out.push(Candidate {
                bbox,
                score,
                label: Arc::clone(label),
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{extract_candidates, extract_candidates_within};
    use crate::grid::ScoreGrid;
    use crate::image::Size;
    use std::sync::Arc;

    #[test]
    fn threshold_is_inclusive() {
        let grid = ScoreGrid::from_rows(&[[0.59f32, 0.6, 0.61]]).unwrap();
        let label: Arc<str> = Arc::from("Apple");
        let found = extract_candidates(&grid, Size::new(2, 2), &label, 0.6);
        let xs: Vec<usize> = found.iter().map(|c| c.bbox.x()).collect();
        assert_eq!(xs, vec![1, 2]);
        assert!(found.iter().all(|c| &*c.label == "Apple"));
    }

    #[test]
    fn non_finite_scores_are_skipped() {
        let grid = ScoreGrid::from_rows(&[[f32::NAN, f32::INFINITY, 1.0]]).unwrap();
        let label: Arc<str> = Arc::from("x");
        let found = extract_candidates(&grid, Size::new(1, 1), &label, f32::NEG_INFINITY);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].bbox.x(), 2);
    }

    #[test]
    fn bounded_scan_drops_out_of_bounds_placements() {
        let grid = ScoreGrid::from_rows(&[[0.9f32, 0.9], [0.9, 0.9]]).unwrap();
        let label: Arc<str> = Arc::from("x");
        let found =
            extract_candidates_within(&grid, Size::new(2, 2), &label, 0.5, Size::new(3, 2));
        let placements: Vec<(usize, usize)> =
            found.iter().map(|c| (c.bbox.x(), c.bbox.y())).collect();
        assert_eq!(placements, vec![(0, 0), (1, 0)]);
    }

    #[test]
    fn zero_sized_template_yields_nothing() {
        let grid = ScoreGrid::from_rows(&[[1.0f32]]).unwrap();
        let label: Arc<str> = Arc::from("x");
        assert!(extract_candidates(&grid, Size::new(0, 1), &label, 0.0).is_empty());
    }
}
