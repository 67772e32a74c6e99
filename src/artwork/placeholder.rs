//! Vector card back used when no raster back image is available

use crate::artwork::ImageSize;
use crate::{CatalogError, Result};
use image::{Rgba, RgbaImage};
use resvg::{tiny_skia, usvg};

const CARD_BACK_SVG: &[u8] = include_bytes!("../../assets/back.svg");

/// Rasterize the built-in card back into a transparent buffer of `size`
pub fn render_card_back(size: ImageSize) -> Result<RgbaImage> {
    if size.is_empty() {
        return Err(CatalogError::InvalidImageSize {
            width: size.width,
            height: size.height,
        });
    }

    let tree = usvg::Tree::from_data(CARD_BACK_SVG, &usvg::Options::default())
        .map_err(|e| CatalogError::Placeholder(e.to_string()))?;
    let mut pixmap = tiny_skia::Pixmap::new(size.width, size.height).ok_or(
        CatalogError::InvalidImageSize {
            width: size.width,
            height: size.height,
        },
    )?;

    let svg_size = tree.size();
    let transform = tiny_skia::Transform::from_scale(
        size.width as f32 / svg_size.width(),
        size.height as f32 / svg_size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    let mut image = RgbaImage::new(size.width, size.height);
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_card_back() {
        let image = render_card_back(ImageSize::new(50, 70)).unwrap();
        assert_eq!(image.dimensions(), (50, 70));
        // The middle of the card is painted
        assert!(image.get_pixel(25, 35)[3] > 0);
    }

    #[test]
    fn test_render_card_back_rejects_empty_size() {
        assert!(matches!(
            render_card_back(ImageSize::new(0, 70)),
            Err(CatalogError::InvalidImageSize { width: 0, height: 70 })
        ));
    }
}
