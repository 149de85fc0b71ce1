//! Dense similarity score grids.
//!
//! A grid holds one score per candidate top-left placement of a template:
//! cell `(x, y)` scores the template placed with its top-left corner at
//! `(x, y)` in the source image. Larger scores mean better matches.

use crate::util::{BoxMatchError, BoxMatchResult};

/// Row-major grid of similarity scores.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScoreGrid {
    data: Vec<f32>,
    width: usize,
    height: usize,
}

impl ScoreGrid {
    /// Creates a grid from a row-major buffer of exactly `width * height`
    /// scores. Zero-sized grids are valid and empty.
    pub fn new(data: Vec<f32>, width: usize, height: usize) -> BoxMatchResult<Self> {
        let needed = width
            .checked_mul(height)
            .ok_or(BoxMatchError::InvalidDimensions { width, height })?;
        if data.len() != needed {
            return Err(BoxMatchError::InvalidGrid {
                reason: "buffer length does not match width * height",
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Builds a grid from nested rows; every row must have the same length.
    pub fn from_rows<R: AsRef<[f32]>>(rows: &[R]) -> BoxMatchResult<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        let mut data = Vec::with_capacity(width * height);
        for row in rows {
            let row = row.as_ref();
            if row.len() != width {
                return Err(BoxMatchError::InvalidGrid {
                    reason: "rows have different lengths",
                });
            }
            data.extend_from_slice(row);
        }
        if width == 0 {
            return Ok(Self::default());
        }
        Self::new(data, width, height)
    }

    /// Returns the number of placements along x.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of placements along y.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns true when the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the score at placement `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Returns row `y` of the grid.
    pub fn row(&self, y: usize) -> Option<&[f32]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        self.data.get(start..start + self.width)
    }

    /// Iterates rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        // chunks_exact panics on zero; an empty grid has no rows.
        self.data.chunks_exact(self.width.max(1))
    }

    /// Returns the scores in row-major order.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}
