//! Presence status cutout and icon.
//!
//! The status badge sits on the bottom-right of the avatar. Before the icon is
//! drawn, the layer underneath is erased (destination-out) in a slightly
//! larger shape so the badge reads as punched through the avatar: a circle
//! for every status except `phone`, which uses a tall rounded rectangle at a
//! different anchor.

use resvg::tiny_skia::Path;

use super::Layer;
use crate::assets::StaticAsset;
use crate::error::{CardError, Result};
use crate::geometry::{Bounds, rounded_rect_path};
use crate::options::PresenceStatus;

/// Top-left corner of the circular status icon.
const ICON_ORIGIN: (f32, f32) = (212.0, 204.0);

/// Top-left corner of the phone status icon.
const PHONE_ICON_ORIGIN: (f32, f32) = (224.5, 202.0);

/// Margin around the phone icon that is cut out of the layer.
const PHONE_MARGIN: f32 = 8.0;

/// Where and how a status badge is carved out of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCutout {
    status: PresenceStatus,
}

impl StatusCutout {
    pub fn new(status: PresenceStatus) -> Self {
        Self { status }
    }

    pub fn status(&self) -> PresenceStatus {
        self.status
    }

    /// Top-left corner at which the icon is drawn.
    pub fn icon_origin(&self) -> (f32, f32) {
        if self.status.is_phone() {
            PHONE_ICON_ORIGIN
        } else {
            ICON_ORIGIN
        }
    }

    /// Region erased from the layer, with its corner radius.
    pub fn hole(&self) -> (Bounds, f32) {
        let (x, y) = self.icon_origin();
        if self.status.is_phone() {
            (
                Bounds::new(x - PHONE_MARGIN, y - PHONE_MARGIN, 57.0, 78.0),
                10.0,
            )
        } else {
            // radius clamps to 31, i.e. a circle centered on (243, 235)
            (Bounds::new(x, y, 62.0, 62.0), 62.0)
        }
    }

    fn hole_path(&self) -> Result<Path> {
        let (bounds, radius) = self.hole();
        rounded_rect_path(bounds, radius).ok_or_else(|| CardError::surface("status cutout"))
    }

    /// Erases the status region from `layer`.
    pub fn cut(&self, layer: &mut Layer) -> Result<()> {
        layer.cut_out(&self.hole_path()?);
        Ok(())
    }

    /// Erases the status region, then draws the status icon in it.
    pub fn cut_and_draw(&self, layer: &mut Layer) -> Result<()> {
        self.cut(layer)?;
        let icon = StaticAsset::Status(self.status).render()?;
        let (x, y) = self.icon_origin();
        layer.draw_image_at(&icon, x, y);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use resvg::tiny_skia::Color;

    fn filled_layer() -> Layer {
        let mut layer = Layer::new().unwrap();
        layer.fill(Color::WHITE);
        layer
    }

    #[test]
    fn phone_uses_a_different_anchor_and_shape() {
        let phone = StatusCutout::new(PresenceStatus::Phone);
        let online = StatusCutout::new(PresenceStatus::Online);

        assert_ne!(phone.icon_origin(), online.icon_origin());
        assert_eq!(phone.hole(), (Bounds::new(216.5, 194.0, 57.0, 78.0), 10.0));
        assert_eq!(online.hole(), (Bounds::new(212.0, 204.0, 62.0, 62.0), 62.0));
    }

    #[test]
    fn every_non_phone_status_shares_the_circle() {
        let circle = StatusCutout::new(PresenceStatus::Online).hole();
        for status in PresenceStatus::ALL {
            if !status.is_phone() {
                assert_eq!(StatusCutout::new(status).hole(), circle, "{status}");
            }
        }
    }

    #[test]
    fn phone_cutout_is_rectangular() {
        let mut phone = filled_layer();
        StatusCutout::new(PresenceStatus::Phone).cut(&mut phone).unwrap();
        let mut online = filled_layer();
        StatusCutout::new(PresenceStatus::Online).cut(&mut online).unwrap();

        // inside the phone rectangle, outside the circle
        assert_eq!(phone.pixel(220, 268)[3], 0);
        assert_eq!(online.pixel(220, 268)[3], 255);

        // both cover the circle center
        assert_eq!(phone.pixel(243, 235)[3], 0);
        assert_eq!(online.pixel(243, 235)[3], 0);

        // far away, untouched
        assert_eq!(online.pixel(100, 100), [255, 255, 255, 255]);
    }

    #[test]
    fn icon_is_drawn_inside_the_cutout() {
        let mut layer = filled_layer();
        StatusCutout::new(PresenceStatus::Online)
            .cut_and_draw(&mut layer)
            .unwrap();

        // icon dot in the middle
        let [r, g, b, a] = layer.pixel(243, 235);
        assert_eq!(a, 255);
        assert!(g > r && g > b, "expected green, got {r},{g},{b}");

        // ring between the dot and the cutout edge stays clear
        assert_eq!(layer.pixel(270, 235)[3], 0);
    }

    #[test]
    fn offline_draws_the_invisible_icon() {
        let mut offline = Layer::new().unwrap();
        StatusCutout::new(PresenceStatus::Offline)
            .cut_and_draw(&mut offline)
            .unwrap();
        let mut invisible = Layer::new().unwrap();
        StatusCutout::new(PresenceStatus::Invisible)
            .cut_and_draw(&mut invisible)
            .unwrap();
        assert_eq!(offline, invisible);
    }
}
