//! SVG rasterization and pixel-format conversion using resvg/tiny-skia.
//!
//! Layers are tiny-skia pixmaps (premultiplied alpha) while decoded assets
//! and encoded output are `image::RgbaImage` (straight alpha). This module
//! converts between the two and rasterizes the embedded SVG assets.

use image::RgbaImage;
use resvg::tiny_skia::{ColorU8, IntSize, Pixmap, Transform};
use resvg::usvg::{Options, Tree};

// ============================================================================
// SVG Rendering
// ============================================================================

/// Renders an SVG document at its own declared size.
///
/// Returns `None` if the SVG cannot be parsed or has an empty size.
pub fn render_svg(svg_data: &str) -> Option<Pixmap> {
    let tree = Tree::from_str(svg_data, &Options::default()).ok()?;
    let size = tree.size().to_int_size();

    let mut pixmap = Pixmap::new(size.width(), size.height())?;
    resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());
    Some(pixmap)
}

// ============================================================================
// Conversion
// ============================================================================

/// Converts a premultiplied pixmap to a straight-alpha image.
pub fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut raw = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let c = pixel.demultiply();
        raw.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    // the buffer length always matches width * height * 4
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), raw)
        .unwrap_or_else(|| RgbaImage::new(pixmap.width(), pixmap.height()))
}

/// Converts an image::RgbaImage to a premultiplied tiny_skia Pixmap.
///
/// Returns `None` for zero-sized images.
pub fn rgba_image_to_pixmap(img: &RgbaImage) -> Option<Pixmap> {
    let size = IntSize::from_wh(img.width(), img.height())?;
    let mut pixmap = Pixmap::new(size.width(), size.height())?;

    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(img.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }

    Some(pixmap)
}

// ============================================================================
// Tests
// ============================================================================
