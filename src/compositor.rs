//! Fixed-order layer compositing.
//!
//! The compositor holds at most one layer per [`LayerKind`] and draws them
//! bottom to top in [`LayerKind::ORDER`], regardless of insertion order. It
//! decodes nothing and validates nothing: every layer it receives is already
//! finished, including its own status cutout.
//!
//! The shadow slot is derived. When drop shadows are enabled, the layers that
//! cast a shadow (avatar and text, badges, bot badge) are merged, run through
//! [`drop_shadow`] and drawn once more at reduced opacity after every content
//! layer.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::layer::shadow::{SHADOW_OPACITY, drop_shadow};
use crate::layer::{Layer, LayerKind, LayerRenderer, RenderContext};

/// Collects finished layers and merges them onto one canvas.
#[derive(Debug, Clone, Default)]
pub struct Compositor {
    layers: BTreeMap<LayerKind, Layer>,
    drop_shadows: bool,
}

impl Compositor {
    /// Creates an empty compositor with the shadow pass disabled.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_drop_shadows(mut self, enabled: bool) -> Self {
        self.drop_shadows = enabled;
        self
    }

    /// Stores `layer` in the slot for `kind`, returning the layer it replaces.
    ///
    /// Storing a [`LayerKind::Shadow`] layer replaces the derived shadow.
    pub fn insert(&mut self, kind: LayerKind, layer: Layer) -> Option<Layer> {
        self.layers.insert(kind, layer)
    }

    /// Runs `renderer` and stores its layer, if it produced one.
    pub fn render<R: LayerRenderer>(&mut self, renderer: &R, ctx: &RenderContext<'_>) -> Result<()> {
        match renderer.render(ctx)? {
            Some(layer) => {
                self.insert(R::KIND, layer);
            }
            None => tracing::debug!(layer = R::KIND.as_str(), "layer not applicable, skipped"),
        }
        Ok(())
    }

    pub fn get(&self, kind: LayerKind) -> Option<&Layer> {
        self.layers.get(&kind)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    fn casts_shadow(&self) -> bool {
        self.layers.keys().any(LayerKind::casts_shadow)
    }

    /// Kinds that [`composite`](Self::composite) will draw, bottom to top.
    pub fn draw_order(&self) -> Vec<LayerKind> {
        LayerKind::ORDER
            .into_iter()
            .filter(|kind| match kind {
                LayerKind::Shadow => {
                    self.layers.contains_key(kind) || (self.drop_shadows && self.casts_shadow())
                }
                _ => self.layers.contains_key(kind),
            })
            .collect()
    }

    /// Merges the shadow-casting layers and applies the drop shadow.
    fn shadow_layer(&self) -> Result<Option<Layer>> {
        if let Some(layer) = self.layers.get(&LayerKind::Shadow) {
            return Ok(Some(layer.clone()));
        }
        if !self.drop_shadows || !self.casts_shadow() {
            return Ok(None);
        }

        let mut casters = Layer::new()?;
        for (kind, layer) in &self.layers {
            if kind.casts_shadow() {
                casters.draw_layer(layer, 1.0);
            }
        }
        drop_shadow(&casters).map(Some)
    }

    /// Draws every stored layer onto a fresh canvas in the fixed order.
    pub fn composite(&self) -> Result<Layer> {
        let mut canvas = Layer::new()?;
        for kind in self.draw_order() {
            match kind {
                LayerKind::Shadow => {
                    if let Some(shadow) = self.shadow_layer()? {
                        canvas.draw_layer(&shadow, SHADOW_OPACITY);
                    }
                }
                _ => {
                    if let Some(layer) = self.layers.get(&kind) {
                        canvas.draw_layer(layer, 1.0);
                    }
                }
            }
        }
        Ok(canvas)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Bounds;
    use resvg::tiny_skia::Color;

    fn solid(color: Color) -> Layer {
        let mut layer = Layer::new().unwrap();
        layer.fill(color);
        layer
    }

    fn patch(bounds: Bounds, color: Color) -> Layer {
        let mut layer = Layer::new().unwrap();
        layer.fill_rounded_rect(bounds, 0.0, color);
        layer
    }

    #[test]
    fn draws_in_fixed_order_regardless_of_insertion() {
        let red = Color::from_rgba8(255, 0, 0, 255);
        let blue = Color::from_rgba8(0, 0, 255, 255);

        let mut forward = Compositor::new();
        forward.insert(LayerKind::Background, solid(red));
        forward.insert(LayerKind::XpBar, solid(blue));

        let mut reversed = Compositor::new();
        reversed.insert(LayerKind::XpBar, solid(blue));
        reversed.insert(LayerKind::Background, solid(red));

        assert_eq!(forward.composite().unwrap().pixel(10, 10), [0, 0, 255, 255]);
        assert_eq!(reversed.composite().unwrap(), forward.composite().unwrap());
    }

    #[test]
    fn swapping_a_pair_changes_the_output() {
        let red = Color::from_rgba8(255, 0, 0, 255);
        let green = Color::from_rgba8(0, 255, 0, 255);

        let mut a = Compositor::new();
        a.insert(LayerKind::Border, solid(red));
        a.insert(LayerKind::Frame, solid(green));

        let mut b = Compositor::new();
        b.insert(LayerKind::Border, solid(green));
        b.insert(LayerKind::Frame, solid(red));

        assert_ne!(a.composite().unwrap(), b.composite().unwrap());
    }

    #[test]
    fn draw_order_lists_present_layers_bottom_up() {
        let mut compositor = Compositor::new().with_drop_shadows(true);
        compositor.insert(LayerKind::BotBadge, Layer::new().unwrap());
        compositor.insert(LayerKind::Background, Layer::new().unwrap());
        compositor.insert(LayerKind::Border, Layer::new().unwrap());

        assert_eq!(
            compositor.draw_order(),
            vec![
                LayerKind::Background,
                LayerKind::Border,
                LayerKind::BotBadge,
                LayerKind::Shadow
            ]
        );
    }

    #[test]
    fn shadow_pass_needs_a_caster() {
        let mut compositor = Compositor::new().with_drop_shadows(true);
        compositor.insert(LayerKind::Background, Layer::new().unwrap());
        assert_eq!(compositor.draw_order(), vec![LayerKind::Background]);

        compositor.insert(LayerKind::Shadow, Layer::new().unwrap());
        assert_eq!(compositor.draw_order().last(), Some(&LayerKind::Shadow));
    }

    #[test]
    fn shadow_pass_darkens_below_casters() {
        let white = Color::WHITE;
        let square = Bounds::new(100.0, 100.0, 50.0, 50.0);

        let mut plain = Compositor::new();
        plain.insert(LayerKind::AvatarText, patch(square, white));
        let mut shadowed = Compositor::new().with_drop_shadows(true);
        shadowed.insert(LayerKind::AvatarText, patch(square, white));

        assert_eq!(plain.composite().unwrap().pixel(125, 152)[3], 0);
        assert!(shadowed.composite().unwrap().pixel(125, 152)[3] > 0);
    }

    #[test]
    fn non_casters_get_no_shadow() {
        let square = Bounds::new(100.0, 100.0, 50.0, 50.0);
        let mut compositor = Compositor::new().with_drop_shadows(true);
        compositor.insert(LayerKind::XpBar, patch(square, Color::WHITE));
        assert_eq!(compositor.composite().unwrap().pixel(125, 152)[3], 0);
    }

    #[test]
    fn empty_compositor_yields_a_blank_card() {
        let compositor = Compositor::new();
        assert!(compositor.is_empty());
        let canvas = compositor.composite().unwrap();
        assert_eq!((canvas.width(), canvas.height()), (885, 303));
        assert!(canvas.is_blank());
    }
}
