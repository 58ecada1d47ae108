//! Frame layer: the decorative frame asset, the date backing and the optional
//! badge row backing.

use resvg::tiny_skia::{BlendMode, Color};

use super::{BACKING_ALPHA, ImagePaint, Layer, LayerKind, LayerRenderer, RenderContext, with_opacity};
use crate::assets::StaticAsset;
use crate::assets::badges::BADGE_STRIDE;
use crate::error::Result;
use crate::geometry::Bounds;

const FRAME_OPACITY: f32 = 0.5;

const DATE_BACKING: Bounds = Bounds::new(696.0, 248.0, 165.0, 33.0);

/// Backing behind `count` badges, growing to the left from the right edge.
pub fn badge_backing_bounds(count: usize) -> Bounds {
    let width = BADGE_STRIDE * count as f32;
    Bounds::new(857.0 - width, 15.0, width + 8.0, 61.0)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FrameLayer;

impl LayerRenderer for FrameLayer {
    const KIND: LayerKind = LayerKind::Frame;

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Option<Layer>> {
        let mut layer = Layer::new()?;
        let backing = with_opacity(Color::BLACK, BACKING_ALPHA);

        let frame = StaticAsset::Frame.render()?;
        layer.draw_image(
            &frame,
            Bounds::card(),
            ImagePaint {
                opacity: FRAME_OPACITY,
                blend_mode: BlendMode::SourceOut,
                clip: None,
            },
        );

        layer.fill_rounded_rect(DATE_BACKING, 12.0, backing);

        let badges = ctx.assets.badges.len();
        if ctx.options.badges_frame && badges > 0 && !ctx.options.remove_badges {
            layer.fill_rounded_rect(badge_backing_bounds(badges), 17.0, backing);
        }

        Ok(Some(layer))
    }
}

// ============================================================================
// Tests
// ============================================================================
