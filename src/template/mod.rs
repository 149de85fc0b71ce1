//! Template storage, descriptors and planning utilities.

use crate::image::resize::resize_u8_bilinear;
use crate::image::{ImageView, OwnedImage, Size};
use crate::util::{BoxMatchError, BoxMatchResult};
use std::sync::Arc;

mod plan;

pub use plan::TemplatePlan;

/// Owned template image in contiguous grayscale format.
#[derive(Clone, Debug)]
pub struct Template {
    img: OwnedImage,
}

impl Template {
    /// Creates a template from a contiguous grayscale buffer.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> BoxMatchResult<Self> {
        let img = OwnedImage::new(data, width, height)?;
        Ok(Self { img })
    }

    /// Wraps an already decoded raster.
    pub fn from_owned(img: OwnedImage) -> Self {
        Self { img }
    }

    /// Returns the template size.
    pub fn size(&self) -> Size {
        self.img.size()
    }

    /// Returns a borrowed view of the template data.
    pub fn view(&self) -> ImageView<'_, u8> {
        self.img.view()
    }

    /// Resolves the template against a source size.
    ///
    /// A template wider or taller than the source is resized to
    /// `floor(source * scale)` on each axis (at least one pixel). Templates
    /// that already fit are returned unchanged.
    pub fn fit_to_source(self, source: Size, scale: f32) -> BoxMatchResult<Self> {
        if !(scale.is_finite() && scale > 0.0 && scale <= 1.0) {
            return Err(BoxMatchError::InvalidInput("oversize scale must be in (0, 1]"));
        }
        if source.contains(self.size()) {
            return Ok(self);
        }
        let target = Size::new(
            ((source.width as f32 * scale).floor() as usize).max(1),
            ((source.height as f32 * scale).floor() as usize).max(1),
        );
        let img = resize_u8_bilinear(self.view(), target)?;
        Ok(Self { img })
    }
}

/// A template asset reference paired with the label it detects.
///
/// Several descriptors may share a label, e.g. two views of the same fruit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateDescriptor {
    asset: String,
    label: Arc<str>,
}

impl TemplateDescriptor {
    /// Creates a descriptor for an asset identifier and label.
    pub fn new(asset: impl Into<String>, label: impl Into<Arc<str>>) -> Self {
        Self {
            asset: asset.into(),
            label: label.into(),
        }
    }

    /// Returns the asset identifier resolved by an `AssetLoader`.
    pub fn asset(&self) -> &str {
        &self.asset
    }

    /// Returns the label attached to every detection of this template.
    pub fn label(&self) -> &Arc<str> {
        &self.label
    }
}
