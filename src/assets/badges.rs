//! Badge loading.
//!
//! Each user-supplied badge is decoded independently. A badge that fails to
//! decode is skipped (never replaced by a placeholder) and reported, and the
//! survivors are packed into consecutive slots right to left from a fixed
//! anchor, so positions depend on the surviving count, not the input index.

use image::RgbaImage;

use super::{AssetLoader, ImageSource};
use crate::geometry::Bounds;
use crate::text::truncate_for_log;

/// X coordinate of the first (rightmost) badge slot.
pub const BADGE_ANCHOR_X: f32 = 800.0;

/// Horizontal distance between consecutive badge slots.
pub const BADGE_STRIDE: f32 = 59.0;

/// Offset of a badge image inside its slot.
pub const BADGE_X_OFFSET: f32 = 10.0;

pub const BADGE_Y: f32 = 22.0;

/// Badges are drawn as `BADGE_SIZE × BADGE_SIZE` squares.
pub const BADGE_SIZE: f32 = 46.0;

/// Left edge of slot `slot` (0 is the rightmost).
pub fn badge_slot_x(slot: usize) -> f32 {
    BADGE_ANCHOR_X - slot as f32 * BADGE_STRIDE
}

/// A decoded badge and where it goes.
#[derive(Debug, Clone, PartialEq)]
pub struct BadgeDescriptor {
    pub image: RgbaImage,
    /// Position among the surviving badges, counted from the right.
    pub slot: usize,
    pub x_offset: f32,
    pub y: f32,
    pub width: f32,
}

impl BadgeDescriptor {
    pub fn new(image: RgbaImage, slot: usize) -> Self {
        Self {
            image,
            slot,
            x_offset: BADGE_X_OFFSET,
            y: BADGE_Y,
            width: BADGE_SIZE,
        }
    }

    /// Where the badge is drawn on the card.
    pub fn bounds(&self) -> Bounds {
        Bounds::new(
            badge_slot_x(self.slot) + self.x_offset,
            self.y,
            self.width,
            self.width,
        )
    }
}

/// A badge that was left out, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedBadge {
    /// Index in the caller's badge list.
    pub index: usize,
    /// The badge reference, truncated to 30 characters.
    pub reference: String,
    pub reason: String,
}

/// Outcome of loading a batch of badges.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BadgeReport {
    pub loaded: Vec<BadgeDescriptor>,
    pub skipped: Vec<SkippedBadge>,
}

impl BadgeReport {
    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }
}

/// Decodes every badge reference, skipping the ones that fail.
pub fn load_badges<S: AsRef<str>>(loader: &dyn AssetLoader, references: &[S]) -> BadgeReport {
    let mut report = BadgeReport::default();

    for (index, reference) in references.iter().enumerate() {
        let reference = reference.as_ref();
        match loader.load(&ImageSource::parse(reference)) {
            Ok(image) => {
                let slot = report.loaded.len();
                report.loaded.push(BadgeDescriptor::new(image, slot));
            }
            Err(err) => {
                let truncated = truncate_for_log(reference, 30);
                tracing::warn!(badge = %truncated, error = %err, "could not load custom badge, skipping");
                report.skipped.push(SkippedBadge {
                    index,
                    reference: truncated,
                    reason: err.to_string(),
                });
            }
        }
    }

    report
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssetLoader;
    use crate::assets::tests::png_bytes;

    #[test]
    fn slots_step_left_from_anchor() {
        assert_eq!(badge_slot_x(0), 800.0);
        assert_eq!(badge_slot_x(1), 741.0);
        assert_eq!(badge_slot_x(3), 623.0);
    }

    #[test]
    fn descriptor_bounds() {
        let badge = BadgeDescriptor::new(RgbaImage::new(1, 1), 1);
        assert_eq!(badge.bounds(), Bounds::new(751.0, 22.0, 46.0, 46.0));
    }

    #[test]
    fn failed_badges_are_skipped_and_survivors_packed() {
        let loader = MemoryAssetLoader::new()
            .with("https://x/a.png", png_bytes(4, 4, [255, 0, 0, 255]))
            .with("https://x/broken.png", b"nope".to_vec())
            .with("https://x/c.png", png_bytes(4, 4, [0, 0, 255, 255]));

        let report = load_badges(
            &loader,
            &["https://x/a.png", "https://x/broken.png", "https://x/c.png"],
        );

        assert_eq!(report.len(), 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].index, 1);
        assert_eq!(report.skipped[0].reference, "https://x/broken.png");

        // the third input takes the second slot, not the third
        assert_eq!(report.loaded[0].slot, 0);
        assert_eq!(report.loaded[1].slot, 1);
        assert_eq!(report.loaded[1].bounds().x, 751.0);
        assert_eq!(report.loaded[1].image.get_pixel(0, 0).0, [0, 0, 255, 255]);
    }

    #[test]
    fn skipped_reference_is_truncated() {
        let long = format!("https://x/{}.png", "b".repeat(60));
        let report = load_badges(&MemoryAssetLoader::new(), &[long]);
        assert!(report.is_empty());
        assert_eq!(report.skipped[0].reference.chars().count(), 33);
    }

    #[test]
    fn empty_input_yields_empty_report() {
        let refs: [&str; 0] = [];
        assert_eq!(load_badges(&MemoryAssetLoader::new(), &refs), BadgeReport::default());
    }
}
