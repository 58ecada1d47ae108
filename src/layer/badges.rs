//! Badge row layer.

use super::{ImagePaint, Layer, LayerKind, LayerRenderer, RenderContext};
use crate::error::Result;

/// Draws the loaded badges right to left from the anchor.
///
/// Failed badges were already dropped by [`load_badges`](crate::assets::load_badges),
/// so every descriptor here has an image and a packed slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct BadgeRowLayer;

impl LayerRenderer for BadgeRowLayer {
    const KIND: LayerKind = LayerKind::Badges;

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Option<Layer>> {
        let badges = &ctx.assets.badges;
        if ctx.options.remove_badges || badges.is_empty() {
            return Ok(None);
        }

        let mut layer = Layer::new()?;
        for badge in &badges.loaded {
            layer.draw_rgba(&badge.image, badge.bounds(), ImagePaint::default());
        }

        tracing::debug!(
            drawn = badges.len(),
            skipped = badges.skipped.len(),
            "rendered badge row"
        );
        Ok(Some(layer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{BadgeDescriptor, BadgeReport, SkippedBadge};
    use crate::layer::tests::{assert_near, solid_assets, with_context};
    use crate::options::RenderOptions;
    use crate::profile::UserProfile;
    use image::{Rgba, RgbaImage};

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];

    fn render(badges: BadgeReport, options: &RenderOptions) -> Option<Layer> {
        let mut assets = solid_assets([0, 0, 0, 255]);
        assets.badges = badges;
        let profile = UserProfile::new("1", "ferris");
        with_context(&profile, options, &assets, |ctx| BadgeRowLayer.render(ctx)).unwrap()
    }

    fn two_badges() -> BadgeReport {
        BadgeReport {
            loaded: vec![
                BadgeDescriptor::new(RgbaImage::from_pixel(8, 8, Rgba(RED)), 0),
                BadgeDescriptor::new(RgbaImage::from_pixel(8, 8, Rgba(BLUE)), 1),
            ],
            skipped: vec![SkippedBadge {
                index: 1,
                reference: "broken".into(),
                reason: "bad".into(),
            }],
        }
    }

    #[test]
    fn badges_step_left() {
        let layer = render(two_badges(), &RenderOptions::default()).unwrap();
        // slot 0 spans 810..856, slot 1 spans 751..797
        assert_near(layer.pixel(833, 45), RED);
        assert_near(layer.pixel(774, 45), BLUE);
        assert_eq!(layer.pixel(804, 45)[3], 0);
        assert_eq!(layer.pixel(715, 45)[3], 0);
    }

    #[test]
    fn no_layer_without_badges() {
        assert!(render(BadgeReport::default(), &RenderOptions::default()).is_none());
    }

    #[test]
    fn remove_badges_hides_the_row() {
        let options = RenderOptions {
            remove_badges: true,
            ..RenderOptions::default()
        };
        assert!(render(two_badges(), &options).is_none());
    }
}
