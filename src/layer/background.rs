//! Background layer: a flat base, the filtered background image and a dim
//! overlay for text contrast.

use image::RgbaImage;
use image::imageops;
use resvg::tiny_skia::Color;

use super::{ImagePaint, Layer, LayerKind, LayerRenderer, RenderContext, with_opacity};
use crate::assets::BackgroundSource;
use crate::error::Result;
use crate::geometry::Bounds;

/// Where the avatar is drawn when it stands in for the background: enlarged
/// and shifted up so its center band fills the card.
const AVATAR_BACKGROUND_BOUNDS: Bounds = Bounds::new(0.0, -345.0, 900.0, 900.0);

const OVERLAY_ALPHA: f32 = 0.2;

/// Destination rectangle of the background image for its source.
pub fn background_bounds(source: BackgroundSource) -> Bounds {
    match source {
        BackgroundSource::Avatar => AVATAR_BACKGROUND_BOUNDS,
        BackgroundSource::Custom | BackgroundSource::Banner => Bounds::card(),
    }
}

/// Applies a gaussian blur (`sigma` in source pixels) and a brightness
/// multiplier to a copy of `image`.
pub fn apply_filters(image: &RgbaImage, sigma: f32, brightness: f32) -> RgbaImage {
    let mut filtered = if sigma > 0.0 {
        imageops::blur(image, sigma)
    } else {
        image.clone()
    };

    if brightness != 1.0 {
        for pixel in filtered.pixels_mut() {
            for channel in &mut pixel.0[..3] {
                *channel = (f32::from(*channel) * brightness).round().clamp(0.0, 255.0) as u8;
            }
        }
    }
    filtered
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BackgroundLayer;

impl LayerRenderer for BackgroundLayer {
    const KIND: LayerKind = LayerKind::Background;

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Option<Layer>> {
        let mut layer = Layer::new()?;
        layer.fill(Color::from_rgba8(0x18, 0x19, 0x1c, 255));

        if let Some(background) = &ctx.assets.background {
            let dest = background_bounds(background.source);
            // blur radius is given in card pixels
            let scale = background.image.width() as f32 / dest.width;
            let filtered = apply_filters(
                &background.image,
                ctx.options.background_blur() * scale,
                ctx.options.background_brightness_factor(),
            );
            layer.draw_rgba(&filtered, dest, ImagePaint::default());
            tracing::debug!(source = ?background.source, "drew background image");
        }

        let overlay = with_opacity(Color::from_rgba8(0x2a, 0x2d, 0x33, 255), OVERLAY_ALPHA);
        layer.fill_rounded_rect(Bounds::card(), 0.0, overlay);
        Ok(Some(layer))
    }
}

// ============================================================================
// Tests
// ============================================================================
