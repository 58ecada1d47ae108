//! Avatar decoration overlay.

use super::{ImagePaint, Layer, LayerKind, LayerRenderer, RenderContext, StatusCutout};
use crate::error::Result;
use crate::geometry::Bounds;

/// The decoration is larger than the avatar so it can hang over its edge.
pub const AVATAR_FRAME_BOUNDS: Bounds = Bounds::new(25.0, 18.0, 269.0, 269.0);

/// Draws the profile's avatar decoration, with the status region cut out so
/// the status icon below stays visible. The icon itself is not redrawn.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvatarFrameLayer;

impl LayerRenderer for AvatarFrameLayer {
    const KIND: LayerKind = LayerKind::AvatarFrame;

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Option<Layer>> {
        let Some(frame) = &ctx.assets.avatar_frame else {
            return Ok(None);
        };

        let mut layer = Layer::new()?;
        layer.draw_rgba(frame, AVATAR_FRAME_BOUNDS, ImagePaint::default());

        if let Some(status) = ctx.options.presence_status()? {
            StatusCutout::new(status).cut(&mut layer)?;
        }
        Ok(Some(layer))
    }
}
