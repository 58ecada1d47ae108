//! Drop shadow post-process.

use image::{Rgba, RgbaImage, imageops};

use super::{BACKING_ALPHA, ImagePaint, Layer};
use crate::error::Result;
use crate::geometry::Bounds;

/// Vertical offset of the shadow.
pub const SHADOW_OFFSET_Y: f32 = 4.0;

/// Gaussian sigma of the shadow, half of its 4px blur radius.
pub const SHADOW_SIGMA: f32 = 2.0;

/// Opacity at which the shadowed layer is drawn back onto the card.
pub const SHADOW_OPACITY: f32 = BACKING_ALPHA;

/// Returns `layer` drawn over a blurred black silhouette of itself, offset
/// downwards.
pub fn drop_shadow(layer: &Layer) -> Result<Layer> {
    let source = layer.to_rgba_image();
    let silhouette = RgbaImage::from_fn(source.width(), source.height(), |x, y| {
        Rgba([0, 0, 0, source.get_pixel(x, y).0[3]])
    });
    let blurred = imageops::blur(&silhouette, SHADOW_SIGMA);

    let mut shadowed = Layer::new()?;
    let dest = Bounds::new(
        0.0,
        SHADOW_OFFSET_Y,
        blurred.width() as f32,
        blurred.height() as f32,
    );
    shadowed.draw_rgba(&blurred, dest, ImagePaint::default());
    shadowed.draw_layer(layer, 1.0);
    Ok(shadowed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use resvg::tiny_skia::Color;

    fn square() -> Layer {
        let mut layer = Layer::new().unwrap();
        layer.fill_rounded_rect(Bounds::new(100.0, 100.0, 50.0, 50.0), 0.0, Color::WHITE);
        layer
    }

    #[test]
    fn shadow_falls_below_content() {
        let shadowed = drop_shadow(&square()).unwrap();

        let [r, g, b, a] = shadowed.pixel(125, 152);
        assert!(a > 0, "no shadow below the square");
        assert_eq!((r, g, b), (0, 0, 0));

        // content keeps its color
        assert_eq!(shadowed.pixel(125, 125), [255, 255, 255, 255]);
    }

    #[test]
    fn shadow_is_offset_downwards() {
        let shadowed = drop_shadow(&square()).unwrap();
        assert!(shadowed.pixel(125, 151)[3] > shadowed.pixel(125, 97)[3]);
    }

    #[test]
    fn blank_layer_casts_no_shadow() {
        let shadowed = drop_shadow(&Layer::new().unwrap()).unwrap();
        assert!(shadowed.is_blank());
    }
}
