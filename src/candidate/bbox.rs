//! Axis-aligned bounding boxes and overlap measures.

use crate::image::Size;
use crate::util::{BoxMatchError, BoxMatchResult};

/// Axis-aligned box with a top-left corner and a non-zero extent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BBox {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
}

impl BBox {
    /// Creates a box, rejecting zero width or height.
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> BoxMatchResult<Self> {
        if width == 0 || height == 0 {
            return Err(BoxMatchError::InvalidDimensions { width, height });
        }
        if x.checked_add(width).is_none() || y.checked_add(height).is_none() {
            return Err(BoxMatchError::InvalidInput("box corner overflows"));
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// Creates a box at `(x, y)` with the given size.
    pub fn at(x: usize, y: usize, size: Size) -> BoxMatchResult<Self> {
        Self::new(x, y, size.width, size.height)
    }

    /// Left edge.
    pub fn x(&self) -> usize {
        self.x
    }

    /// Top edge.
    pub fn y(&self) -> usize {
        self.y
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Exclusive right edge.
    pub fn right(&self) -> usize {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> usize {
        self.y + self.height
    }

    /// Width and height as a [`Size`].
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Area in pixels.
    pub fn area(&self) -> f64 {
        self.width as f64 * self.height as f64
    }

    /// Area of the overlap with `other`, zero when the boxes are disjoint.
    pub fn intersection_area(&self, other: &BBox) -> f64 {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        let w = right.saturating_sub(left);
        let h = bottom.saturating_sub(top);
        w as f64 * h as f64
    }

    /// Intersection over union with `other`, in `[0, 1]`.
    pub fn iou(&self, other: &BBox) -> f64 {
        let overlap = self.intersection_area(other);
        overlap / (self.area() + other.area() - overlap)
    }

    /// Returns true when the box lies inside an image of size `bounds`.
    pub fn fits_within(&self, bounds: Size) -> bool {
        self.right() <= bounds.width && self.bottom() <= bounds.height
    }
}
