//! Draws detections onto the source image.

use ab_glyph::{FontArc, PxScale};
use boxmatch::{Detection, LabelPalette, OwnedImage, Rgb8};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use std::fs;
use std::path::Path;

const LABEL_PX: f32 = 16.0;
const COUNT_PX: f32 = 12.0;

/// How detections are drawn.
#[derive(Clone, Debug)]
pub struct RenderStyle {
    /// Box outline width in pixels.
    pub thickness: u32,
    /// Integer upscale applied after drawing.
    pub scale: u32,
    /// Font for label and count text; no text is drawn without one.
    pub font: Option<FontArc>,
}

/// Reads a TrueType/OpenType font from disk.
pub fn load_font(path: impl AsRef<Path>) -> Result<FontArc, Box<dyn std::error::Error>> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    FontArc::try_from_vec(bytes)
        .map_err(|err| format!("{}: {err}", path.display()).into())
}

/// Renders `detections` as hollow boxes colored per label, writes each label
/// inside its box and the total count in the bottom-left corner, then
/// upscales the canvas with nearest-neighbour sampling.
pub fn annotate(
    source: &OwnedImage,
    detections: &[Detection],
    palette: &LabelPalette,
    style: &RenderStyle,
) -> Result<RgbImage, Box<dyn std::error::Error>> {
    let width = u32::try_from(source.width())?;
    let height = u32::try_from(source.height())?;
    let (out_width, out_height) = width
        .checked_mul(style.scale)
        .zip(height.checked_mul(style.scale))
        .ok_or("render.scale overflows the output size")?;

    let gray = GrayImage::from_raw(width, height, source.data().to_vec())
        .ok_or("source buffer does not match its dimensions")?;
    let mut canvas = DynamicImage::ImageLuma8(gray).to_rgb8();

    for detection in detections {
        let color = Rgb(palette.color_for(&detection.label).0);
        let x = i32::try_from(detection.bbox.x())?;
        let y = i32::try_from(detection.bbox.y())?;
        let box_width = u32::try_from(detection.bbox.width())?;
        let box_height = u32::try_from(detection.bbox.height())?;

        // Extra strokes are drawn inward so the box keeps its outer edge.
        for inset in 0..style.thickness {
            if box_width <= 2 * inset || box_height <= 2 * inset {
                break;
            }
            let rect = Rect::at(x + inset as i32, y + inset as i32)
                .of_size(box_width - 2 * inset, box_height - 2 * inset);
            draw_hollow_rect_mut(&mut canvas, rect, color);
        }

        if let Some(font) = &style.font {
            let pad = i32::try_from(style.thickness)?;
            draw_text_mut(
                &mut canvas,
                color,
                x + pad,
                y + pad,
                PxScale::from(LABEL_PX),
                font,
                &detection.label,
            );
        }
    }

    if let Some(font) = &style.font {
        let text_y = (i32::try_from(height)? - COUNT_PX as i32 - 2).max(0);
        draw_text_mut(
            &mut canvas,
            Rgb(Rgb8::BLUE.0),
            2,
            text_y,
            PxScale::from(COUNT_PX),
            font,
            &format!("Objects: {}", detections.len()),
        );
    }

    if style.scale > 1 {
        canvas = imageops::resize(&canvas, out_width, out_height, FilterType::Nearest);
    }
    Ok(canvas)
}
