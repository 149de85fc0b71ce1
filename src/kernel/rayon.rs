//! Rayon-parallel ZNCC grid scan (feature-gated).
//!
//! Rows of the score grid are independent, so each worker fills whole rows
//! of the output buffer in place. The result is identical to the scalar scan.

use crate::grid::ScoreGrid;
use crate::kernel::scalar::{grid_dims, zncc_row};
use crate::template::TemplatePlan;
use crate::util::BoxMatchResult;
use crate::ImageView;
use rayon::prelude::*;

/// Row-parallel full scan for the ZNCC kernel.
pub fn zncc_grid_par(
    image: ImageView<'_, u8>,
    tpl: &TemplatePlan,
    min_var_i: f64,
) -> BoxMatchResult<ScoreGrid> {
    let (width, height) = grid_dims(image, tpl)?;
    let mut data = vec![0.0f32; width * height];
    data.par_chunks_exact_mut(width)
        .enumerate()
        .for_each(|(y, row)| zncc_row(image, tpl, y, min_var_i, row));
    ScoreGrid::new(data, width, height)
}
