//! Per-card image cache

use crate::artwork::ImageSize;
use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use rustc_hash::FxHashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// State of the full-resolution source
#[derive(Debug, Clone, Default)]
enum FullImage {
    #[default]
    Unloaded,
    /// A load was attempted and nothing resolved
    Missing,
    Loaded(Arc<DynamicImage>),
}

/// Full-size image plus scaled copies keyed by requested width
///
/// Scaled copies are shared as `Arc`s: asking twice for the same width
/// hands out the same buffer until [`ImageCache::clear`].
#[derive(Debug, Clone, Default)]
pub struct ImageCache {
    full: FullImage,
    scaled: FxHashMap<u32, Arc<RgbaImage>>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached copy for `width`, if any
    pub fn scaled(&self, width: u32) -> Option<Arc<RgbaImage>> {
        self.scaled.get(&width).cloned()
    }

    pub(crate) fn insert_scaled(&mut self, width: u32, image: Arc<RgbaImage>) {
        self.scaled.insert(width, image);
    }

    /// Whether a full-size load has been attempted since the last clear
    pub fn is_full_loaded(&self) -> bool {
        !matches!(self.full, FullImage::Unloaded)
    }

    pub fn scaled_len(&self) -> usize {
        self.scaled.len()
    }

    pub fn is_empty(&self) -> bool {
        !self.is_full_loaded() && self.scaled.is_empty()
    }

    /// Load the full-size image from the first candidate that decodes
    ///
    /// The outcome is memoized, including a miss: candidates are only probed
    /// again after [`ImageCache::clear`].
    pub(crate) fn load_full(&mut self, candidates: &[PathBuf]) -> Option<Arc<DynamicImage>> {
        match &self.full {
            FullImage::Loaded(image) => return Some(Arc::clone(image)),
            FullImage::Missing => return None,
            FullImage::Unloaded => {}
        }

        for path in candidates {
            match image::open(path) {
                Ok(image) => {
                    debug!(path = %path.display(), "loaded full image");
                    let image = Arc::new(image);
                    self.full = FullImage::Loaded(Arc::clone(&image));
                    return Some(image);
                }
                Err(e) => debug!(path = %path.display(), error = %e, "image candidate failed"),
            }
        }

        self.full = FullImage::Missing;
        None
    }

    /// Drop the full-size image and every scaled copy
    pub fn clear(&mut self) {
        if !self.is_empty() {
            debug!(scaled = self.scaled.len(), "clearing image cache");
        }
        self.full = FullImage::Unloaded;
        self.scaled.clear();
    }
}

/// Stretch `source` to exactly `size`, ignoring its aspect ratio
pub fn scale_to(source: &DynamicImage, size: ImageSize) -> RgbaImage {
    image::imageops::resize(source, size.width, size.height, FilterType::Triangle)
}
