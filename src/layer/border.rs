//! Border layer: a gradient over the whole card with the inner area cut
//! away, leaving a 9px ring.

use resvg::tiny_skia::BlendMode;

use super::{Layer, LayerKind, LayerRenderer, RenderContext};
use crate::error::{CardError, Result};
use crate::geometry::{
    Bounds, CARD_HEIGHT, CARD_WIDTH, Gradient, gradient_axis, rounded_rect_path,
};

/// Inner area removed from the gradient fill.
pub const BORDER_HOLE: Bounds = Bounds::new(9.0, 9.0, 867.0, 285.0);

pub const BORDER_HOLE_RADIUS: f32 = 25.0;

/// Border colors: the `borderColor` option, else the profile colors.
///
/// Colors are validated even when the border is removed, so a bad
/// `borderColor` is always reported.
pub fn border_gradient(ctx: &RenderContext<'_>) -> Result<Option<Gradient>> {
    let gradient = match (&ctx.options.border_color, &ctx.profile.profile_colors) {
        (Some(spec), _) => Some(spec.gradient("borderColor")?),
        (None, Some(colors)) if !colors.is_empty() => {
            Some(Gradient::from_hex("borderColor", colors)?)
        }
        _ => None,
    };
    Ok(gradient.filter(|_| !ctx.options.remove_border))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BorderLayer;

impl LayerRenderer for BorderLayer {
    const KIND: LayerKind = LayerKind::Border;

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Option<Layer>> {
        let Some(gradient) = border_gradient(ctx)? else {
            return Ok(None);
        };

        let axis = gradient_axis(
            ctx.options.border_align,
            CARD_WIDTH as f32,
            CARD_HEIGHT as f32,
        );
        let shader = gradient.shader((0.0, 0.0), axis)?;

        let mut layer = Layer::new()?;
        let card = rounded_rect_path(Bounds::card(), 0.0)
            .ok_or_else(|| CardError::surface("border fill"))?;
        layer.fill_path(&card, shader, BlendMode::SourceOver, None);

        let hole = rounded_rect_path(BORDER_HOLE, BORDER_HOLE_RADIUS)
            .ok_or_else(|| CardError::surface("border hole"))?;
        layer.cut_out(&hole);

        tracing::debug!(
            colors = gradient.colors().len(),
            align = ?ctx.options.border_align,
            "rendered border"
        );
        Ok(Some(layer))
    }
}

// ============================================================================
// Tests
// ============================================================================
