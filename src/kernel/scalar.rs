//! Scalar reference kernel for ZNCC score grids.

use crate::grid::ScoreGrid;
use crate::template::TemplatePlan;
use crate::util::{BoxMatchError, BoxMatchResult};
use crate::ImageView;

/// Computes the ZNCC score of `tpl` placed with its top-left corner at
/// `(x, y)`.
///
/// Returns `None` when the placement does not fit inside the image. Flat image
/// windows (variance at or below `min_var_i`) score `0.0`.
pub fn zncc_score_at(
    image: ImageView<'_, u8>,
    tpl: &TemplatePlan,
    x: usize,
    y: usize,
    min_var_i: f64,
) -> Option<f32> {
    let tpl_width = tpl.width();
    let tpl_height = tpl.height();
    if x.checked_add(tpl_width)? > image.width() || y.checked_add(tpl_height)? > image.height() {
        return None;
    }

    let t_prime = tpl.zero_mean();
    let n = (tpl_width * tpl_height) as f64;
    let mut dot = 0.0f64;
    let mut sum_i = 0.0f64;
    let mut sum_i2 = 0.0f64;
    for ty in 0..tpl_height {
        let img_row = image.row(y + ty)?;
        let base = ty * tpl_width;
        for (tx, &pixel) in img_row[x..x + tpl_width].iter().enumerate() {
            let value = pixel as f64;
            dot += t_prime[base + tx] * value;
            sum_i += value;
            sum_i2 += value * value;
        }
    }

    let var_i = sum_i2 - (sum_i * sum_i) / n;
    if var_i <= min_var_i * n {
        return Some(0.0);
    }
    let score = dot / (tpl.var_t() * var_i).sqrt();
    if score.is_finite() {
        Some(score.clamp(-1.0, 1.0) as f32)
    } else {
        Some(0.0)
    }
}

/// Fills `out` with the scores of grid row `y`.
pub(crate) fn zncc_row(
    image: ImageView<'_, u8>,
    tpl: &TemplatePlan,
    y: usize,
    min_var_i: f64,
    out: &mut [f32],
) {
    for (x, cell) in out.iter_mut().enumerate() {
        *cell = zncc_score_at(image, tpl, x, y, min_var_i).unwrap_or(0.0);
    }
}

/// Returns the grid size for `tpl` scanned over `image`.
pub(crate) fn grid_dims(
    image: ImageView<'_, u8>,
    tpl: &TemplatePlan,
) -> BoxMatchResult<(usize, usize)> {
    if image.width() < tpl.width() || image.height() < tpl.height() {
        return Err(BoxMatchError::TemplateTooLarge {
            tpl_width: tpl.width(),
            tpl_height: tpl.height(),
            img_width: image.width(),
            img_height: image.height(),
        });
    }
    Ok((
        image.width() - tpl.width() + 1,
        image.height() - tpl.height() + 1,
    ))
}

/// Scans every valid placement and returns the dense ZNCC grid.
pub fn zncc_grid(
    image: ImageView<'_, u8>,
    tpl: &TemplatePlan,
    min_var_i: f64,
) -> BoxMatchResult<ScoreGrid> {
    let (width, height) = grid_dims(image, tpl)?;
    let mut data = vec![0.0f32; width * height];
    for (y, row) in data.chunks_exact_mut(width).enumerate() {
        zncc_row(image, tpl, y, min_var_i, row);
    }
    ScoreGrid::new(data, width, height)
}
