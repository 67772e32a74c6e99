//! Card artwork: lazy full-size loading, per-width scaled cache and the
//! built-in card back placeholder

pub mod cache;
pub mod placeholder;

pub use cache::{scale_to, ImageCache};
pub use placeholder::render_card_back;

/// Requested pixel size of a card image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        ImageSize { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
