//! Error types for boxmatch.

use thiserror::Error;

/// Result alias for boxmatch operations.
pub type BoxMatchResult<T> = std::result::Result<T, BoxMatchError>;

/// Errors that can occur when loading assets, scoring templates or running
/// detection.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BoxMatchError {
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Image or box dimensions are zero or overflow.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is smaller than the row width.
    #[error("stride {stride} is smaller than width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer does not hold enough elements.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Score grid data does not form a rectangle of the declared size.
    #[error("invalid score grid: {reason}")]
    InvalidGrid { reason: &'static str },
    /// Template does not fit inside the source image.
    #[error(
        "template {tpl_width}x{tpl_height} does not fit in source {img_width}x{img_height}"
    )]
    TemplateTooLarge {
        tpl_width: usize,
        tpl_height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// Template cannot be normalized (for example a constant image).
    #[error("degenerate template: {reason}")]
    DegenerateTemplate { reason: &'static str },
    /// Asset loader has no raster for the identifier.
    #[error("asset not found: {id}")]
    AssetNotFound { id: String },
    /// Decoding or reading an image failed.
    #[error("image io error: {reason}")]
    ImageIo { reason: String },
    /// Source image could not be obtained; detection cannot run.
    #[error("source image unavailable: {reason}")]
    SourceUnavailable { reason: String },
    /// Label palette configuration is invalid.
    #[error("invalid palette: {reason}")]
    InvalidPalette { reason: String },
}
