//! Template and source asset resolution.

use crate::image::OwnedImage;
use crate::util::{BoxMatchError, BoxMatchResult};
use std::collections::HashMap;

/// Resolves an asset identifier to a decoded grayscale raster.
///
/// A failed load is an error, never an empty raster.
pub trait AssetLoader: Sync {
    /// Loads the raster named by `id`.
    fn load(&self, id: &str) -> BoxMatchResult<OwnedImage>;
}

/// Assets held in memory, keyed by identifier.
#[derive(Clone, Debug, Default)]
pub struct InMemoryAssets {
    images: HashMap<String, OwnedImage>,
}

impl InMemoryAssets {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an asset, returning the previous raster if any.
    pub fn insert(&mut self, id: impl Into<String>, image: OwnedImage) -> Option<OwnedImage> {
        self.images.insert(id.into(), image)
    }

    /// Builder-style [`InMemoryAssets::insert`].
    pub fn with(mut self, id: impl Into<String>, image: OwnedImage) -> Self {
        self.insert(id, image);
        self
    }

    /// Number of stored assets.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Returns true when no asset is stored.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl AssetLoader for InMemoryAssets {
    fn load(&self, id: &str) -> BoxMatchResult<OwnedImage> {
        self.images
            .get(id)
            .cloned()
            .ok_or_else(|| BoxMatchError::AssetNotFound { id: id.to_owned() })
    }
}

/// Loads assets from disk as grayscale images, optionally relative to a root
/// directory.
#[cfg(feature = "image-io")]
#[derive(Clone, Debug, Default)]
pub struct FsAssets {
    root: Option<std::path::PathBuf>,
}

#[cfg(feature = "image-io")]
impl FsAssets {
    /// Resolves identifiers as paths relative to the working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves identifiers relative to `root`.
    pub fn with_root(root: impl Into<std::path::PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }
}

#[cfg(feature = "image-io")]
impl AssetLoader for FsAssets {
    fn load(&self, id: &str) -> BoxMatchResult<OwnedImage> {
        let path = match &self.root {
            Some(root) => root.join(id),
            None => std::path::PathBuf::from(id),
        };
        if !path.is_file() {
            return Err(BoxMatchError::AssetNotFound { id: id.to_owned() });
        }
        crate::image::io::load_gray_image(&path)
    }
}
