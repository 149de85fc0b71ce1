//! Bilinear resampling for grayscale images.

use crate::image::{ImageView, OwnedImage, Size};
use crate::util::{BoxMatchError, BoxMatchResult};

/// Resizes a grayscale image to `dst` using bilinear sampling.
///
/// Destination pixel centers map to source coordinates with the half-pixel
/// convention `src = (dst + 0.5) * scale - 0.5`, clamped to the valid range.
/// Values are rounded to the nearest integer before clamping to `[0, 255]`.
pub fn resize_u8_bilinear(src: ImageView<'_, u8>, dst: Size) -> BoxMatchResult<OwnedImage> {
    if dst.is_empty() {
        return Err(BoxMatchError::InvalidDimensions {
            width: dst.width,
            height: dst.height,
        });
    }

    let src_width = src.width();
    let src_height = src.height();
    let scale_x = src_width as f32 / dst.width as f32;
    let scale_y = src_height as f32 / dst.height as f32;
    let max_x = (src_width - 1) as f32;
    let max_y = (src_height - 1) as f32;

    let mut out = Vec::with_capacity(dst.width * dst.height);
    for y in 0..dst.height {
        let src_y = ((y as f32 + 0.5) * scale_y - 0.5).clamp(0.0, max_y);
        let y0 = src_y.floor() as usize;
        let y1 = (y0 + 1).min(src_height - 1);
        let fy = src_y - y0 as f32;
        let row0 = src.row(y0).ok_or(BoxMatchError::InvalidInput("row out of bounds"))?;
        let row1 = src.row(y1).ok_or(BoxMatchError::InvalidInput("row out of bounds"))?;

        for x in 0..dst.width {
            let src_x = ((x as f32 + 0.5) * scale_x - 0.5).clamp(0.0, max_x);
            let x0 = src_x.floor() as usize;
            let x1 = (x0 + 1).min(src_width - 1);
            let fx = src_x - x0 as f32;

            let top = row0[x0] as f32 * (1.0 - fx) + row0[x1] as f32 * fx;
            let bottom = row1[x0] as f32 * (1.0 - fx) + row1[x1] as f32 * fx;
            let value = top * (1.0 - fy) + bottom * fy;
            out.push(value.round().clamp(0.0, 255.0) as u8);
        }
    }

    OwnedImage::new(out, dst.width, dst.height)
}
