//! Label to render-color mapping.

use crate::util::{BoxMatchError, BoxMatchResult};
use std::collections::BTreeMap;

/// 8-bit RGB color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb8(pub [u8; 3]);

impl Rgb8 {
    pub const RED: Rgb8 = Rgb8([255, 0, 0]);
    pub const GREEN: Rgb8 = Rgb8([0, 255, 0]);
    pub const BLUE: Rgb8 = Rgb8([0, 0, 255]);
}

/// Per-label colors with a required fallback for unmapped labels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelPalette {
    colors: BTreeMap<String, Rgb8>,
    fallback: Rgb8,
}

impl LabelPalette {
    /// Builds a palette, rejecting empty labels and duplicate entries.
    pub fn new<I, L>(entries: I, fallback: Rgb8) -> BoxMatchResult<Self>
    where
        I: IntoIterator<Item = (L, Rgb8)>,
        L: Into<String>,
    {
        let mut colors = BTreeMap::new();
        for (label, color) in entries {
            let label = label.into();
            if label.trim().is_empty() {
                return Err(BoxMatchError::InvalidPalette {
                    reason: "empty label".to_owned(),
                });
            }
            if colors.insert(label.clone(), color).is_some() {
                return Err(BoxMatchError::InvalidPalette {
                    reason: format!("duplicate label {label:?}"),
                });
            }
        }
        Ok(Self { colors, fallback })
    }

    /// Palette with no explicit entries; every label renders in `fallback`.
    pub fn uniform(fallback: Rgb8) -> Self {
        Self {
            colors: BTreeMap::new(),
            fallback,
        }
    }

    /// Returns the color for `label`, or the fallback when unmapped.
    pub fn color_for(&self, label: &str) -> Rgb8 {
        self.colors.get(label).copied().unwrap_or(self.fallback)
    }

    /// Color used for labels without an entry.
    pub fn fallback(&self) -> Rgb8 {
        self.fallback
    }

    /// Iterates explicit entries in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Rgb8)> {
        self.colors.iter().map(|(label, &color)| (label.as_str(), color))
    }
}
