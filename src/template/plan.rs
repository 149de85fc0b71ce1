//! Template plan precomputation for zero-mean normalized correlation.

use crate::image::ImageView;
use crate::util::{BoxMatchError, BoxMatchResult};

/// Precomputed statistics and zero-mean buffer for ZNCC scoring.
#[derive(Clone, Debug)]
pub struct TemplatePlan {
    width: usize,
    height: usize,
    var_t: f64,
    zero_mean: Vec<f64>,
}

impl TemplatePlan {
    /// Builds a plan from a template view.
    ///
    /// Fails with `DegenerateTemplate` when the template has (near) zero
    /// variance, since normalized correlation is undefined for it.
    pub fn from_view(tpl: ImageView<'_, u8>) -> BoxMatchResult<Self> {
        let width = tpl.width();
        let height = tpl.height();
        let count = width
            .checked_mul(height)
            .ok_or(BoxMatchError::InvalidDimensions { width, height })?;

        let mut sum = 0.0f64;
        for y in 0..height {
            let row = row_of(tpl, y)?;
            sum += row.iter().map(|&v| v as f64).sum::<f64>();
        }
        let mean = sum / count as f64;

        let mut zero_mean = Vec::with_capacity(count);
        let mut var_t = 0.0f64;
        for y in 0..height {
            for &value in row_of(tpl, y)? {
                let centered = value as f64 - mean;
                var_t += centered * centered;
                zero_mean.push(centered);
            }
        }

        if var_t / count as f64 <= 1e-8 {
            return Err(BoxMatchError::DegenerateTemplate {
                reason: "zero variance",
            });
        }

        Ok(Self {
            width,
            height,
            var_t,
            zero_mean,
        })
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the sum of squared deviations from the mean.
    pub fn var_t(&self) -> f64 {
        self.var_t
    }

    /// Returns the zero-mean template buffer in row-major order.
    pub fn zero_mean(&self) -> &[f64] {
        &self.zero_mean
    }
}

fn row_of<'a>(tpl: ImageView<'a, u8>, y: usize) -> BoxMatchResult<&'a [u8]> {
    tpl.row(y).ok_or(BoxMatchError::BufferTooSmall {
        needed: (y + 1) * tpl.stride(),
        got: tpl.as_slice().len(),
    })
}
