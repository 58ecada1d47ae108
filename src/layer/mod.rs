//! Layer infrastructure for the card pipeline.
//!
//! Every visual concern of the card is drawn by its own [`LayerRenderer`]
//! onto a fresh, transparent, card-sized [`Layer`]. Renderers only read the
//! shared [`RenderContext`]; all drawing state (blend mode, opacity, clip)
//! is scoped to a single call on a single layer, so nothing leaks between
//! layers and renderers can run in any order. Only the
//! [`Compositor`](crate::Compositor) cares about z-order.
//!
//! # Architecture
//!
//! ```text
//! UserProfile + RenderOptions ──► ResolvedAssets (decode + fallbacks)
//!                                      │
//!                ┌─────────────────────┼─────────────────────┐
//!                ▼                     ▼                     ▼
//!         BackgroundLayer         BorderLayer     ...     XpBarLayer
//!                │                     │                     │
//!                └──────────► Compositor (fixed order) ◄─────┘
//! ```

pub mod avatar;
pub mod avatar_frame;
pub mod background;
pub mod badges;
pub mod border;
pub mod bot_badge;
pub mod frame;
pub mod shadow;
pub mod status;
pub mod svg;
pub mod xp_bar;

pub use avatar::AvatarTextLayer;
pub use avatar_frame::AvatarFrameLayer;
pub use background::BackgroundLayer;
pub use badges::BadgeRowLayer;
pub use border::BorderLayer;
pub use bot_badge::BotBadgeLayer;
pub use frame::FrameLayer;
pub use status::StatusCutout;
pub use xp_bar::XpBarLayer;

use image::RgbaImage;
use resvg::tiny_skia::{
    BlendMode, Color, FillRule, FilterQuality, Mask, Paint, Path, Pixmap, PixmapPaint, Shader,
    Transform,
};

use crate::assets::ResolvedAssets;
use crate::error::{CardError, Result};
use crate::geometry::{Bounds, CARD_HEIGHT, CARD_WIDTH, rounded_rect_path};
use crate::options::RenderOptions;
use crate::profile::UserProfile;
use crate::text::{TextRun, Typesetter};

/// Opacity of the dark translucent backings behind text and badges.
pub const BACKING_ALPHA: f32 = 0.4;

/// Default color of secondary text (tag, subtitle, date, XP).
pub fn muted_text_color() -> Color {
    Color::from_rgba8(0xda, 0xda, 0xda, 255)
}

/// Returns `color` with its alpha multiplied by `opacity`.
pub fn with_opacity(color: Color, opacity: f32) -> Color {
    let mut color = color;
    color.apply_opacity(opacity);
    color
}

// ============================================================================
// Layer
// ============================================================================

/// A transparent card-sized drawing surface.
///
/// Produced once by a renderer, composited once, then dropped.
#[derive(Clone, PartialEq)]
pub struct Layer {
    pixmap: Pixmap,
}

impl std::fmt::Debug for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Layer")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .finish()
    }
}

/// How an image is drawn onto a layer.
#[derive(Clone, Copy)]
pub struct ImagePaint<'a> {
    pub opacity: f32,
    pub blend_mode: BlendMode,
    pub clip: Option<&'a Mask>,
}

impl Default for ImagePaint<'_> {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            blend_mode: BlendMode::SourceOver,
            clip: None,
        }
    }
}

impl Layer {
    /// Creates a transparent 885×303 layer.
    pub fn new() -> Result<Self> {
        let pixmap = Pixmap::new(CARD_WIDTH, CARD_HEIGHT)
            .ok_or_else(|| CardError::surface("card layer"))?;
        Ok(Self { pixmap })
    }

    /// Creates a layer from an image, which must be card-sized.
    pub fn from_rgba_image(img: &RgbaImage) -> Result<Self> {
        if img.dimensions() != (CARD_WIDTH, CARD_HEIGHT) {
            return Err(CardError::surface(format!(
                "layer from {}x{} image",
                img.width(),
                img.height()
            )));
        }
        let pixmap = svg::rgba_image_to_pixmap(img).ok_or_else(|| CardError::surface("card layer"))?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Straight-alpha RGBA value of a pixel; transparent when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixmap
            .pixel(x, y)
            .map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .unwrap_or([0, 0, 0, 0])
    }

    /// Returns true if no pixel has any coverage.
    pub fn is_blank(&self) -> bool {
        self.pixmap.pixels().iter().all(|p| p.alpha() == 0)
    }

    pub fn to_rgba_image(&self) -> RgbaImage {
        svg::pixmap_to_rgba_image(&self.pixmap)
    }

    /// Fills the whole layer with a flat color.
    pub fn fill(&mut self, color: Color) {
        self.pixmap.fill(color);
    }

    /// Fills a path with an arbitrary shader and blend mode.
    pub fn fill_path(
        &mut self,
        path: &Path,
        shader: Shader<'_>,
        blend_mode: BlendMode,
        clip: Option<&Mask>,
    ) {
        let paint = Paint {
            shader,
            blend_mode,
            anti_alias: true,
            ..Paint::default()
        };
        self.pixmap
            .fill_path(path, &paint, FillRule::Winding, Transform::identity(), clip);
    }

    /// Fills a rounded rectangle with a flat color. Empty rectangles draw nothing.
    pub fn fill_rounded_rect(&mut self, bounds: Bounds, radius: f32, color: Color) {
        if let Some(path) = rounded_rect_path(bounds, radius) {
            self.fill_path(&path, Shader::SolidColor(color), BlendMode::SourceOver, None);
        }
    }

    /// Erases every pixel covered by `path` (destination-out).
    pub fn cut_out(&mut self, path: &Path) {
        self.fill_path(
            path,
            Shader::SolidColor(Color::BLACK),
            BlendMode::DestinationOut,
            None,
        );
    }

    /// Builds a clip mask covering `path`.
    pub fn clip_mask(path: &Path) -> Result<Mask> {
        let mut mask =
            Mask::new(CARD_WIDTH, CARD_HEIGHT).ok_or_else(|| CardError::surface("clip mask"))?;
        mask.fill_path(path, FillRule::Winding, true, Transform::identity());
        Ok(mask)
    }

    /// Draws `image` stretched into `dest`.
    pub fn draw_image(&mut self, image: &Pixmap, dest: Bounds, paint: ImagePaint<'_>) {
        let sx = dest.width / image.width() as f32;
        let sy = dest.height / image.height() as f32;
        let pixmap_paint = PixmapPaint {
            opacity: paint.opacity,
            blend_mode: paint.blend_mode,
            quality: FilterQuality::Bicubic,
        };
        self.pixmap.draw_pixmap(
            0,
            0,
            image.as_ref(),
            &pixmap_paint,
            Transform::from_row(sx, 0.0, 0.0, sy, dest.x, dest.y),
            paint.clip,
        );
    }

    /// Draws `image` at its natural size with its top-left corner at (x, y).
    pub fn draw_image_at(&mut self, image: &Pixmap, x: f32, y: f32) {
        let dest = Bounds::new(x, y, image.width() as f32, image.height() as f32);
        self.draw_image(image, dest, ImagePaint::default());
    }

    /// Draws a decoded image stretched into `dest`.
    pub fn draw_rgba(&mut self, image: &RgbaImage, dest: Bounds, paint: ImagePaint<'_>) {
        if let Some(pixmap) = svg::rgba_image_to_pixmap(image) {
            self.draw_image(&pixmap, dest, paint);
        }
    }

    /// Draws another layer on top of this one.
    pub fn draw_layer(&mut self, other: &Layer, opacity: f32) {
        let paint = PixmapPaint {
            opacity,
            blend_mode: BlendMode::SourceOver,
            quality: FilterQuality::Nearest,
        };
        self.pixmap.draw_pixmap(
            0,
            0,
            other.pixmap.as_ref(),
            &paint,
            Transform::identity(),
            None,
        );
    }

    /// Rasterizes text runs and draws them on top.
    pub fn draw_text(&mut self, typesetter: &Typesetter, runs: &[TextRun]) -> Result<()> {
        if runs.is_empty() {
            return Ok(());
        }
        let text = typesetter.render(runs, self.width(), self.height())?;
        self.draw_image_at(&text, 0.0, 0.0);
        Ok(())
    }
}

// ============================================================================
// Layer kinds
// ============================================================================

/// The role of a layer, which fixes its place in the z-order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LayerKind {
    Background,
    Border,
    Frame,
    AvatarText,
    AvatarFrame,
    Badges,
    BotBadge,
    XpBar,
    Shadow,
}

impl LayerKind {
    /// Bottom-to-top draw order.
    pub const ORDER: [LayerKind; 9] = [
        Self::Background,
        Self::Border,
        Self::Frame,
        Self::AvatarText,
        Self::AvatarFrame,
        Self::Badges,
        Self::BotBadge,
        Self::XpBar,
        Self::Shadow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Border => "border",
            Self::Frame => "frame",
            Self::AvatarText => "avatar-text",
            Self::AvatarFrame => "avatar-frame",
            Self::Badges => "badges",
            Self::BotBadge => "bot-badge",
            Self::XpBar => "xp-bar",
            Self::Shadow => "shadow",
        }
    }

    /// Layers that receive the drop shadow.
    pub fn casts_shadow(&self) -> bool {
        matches!(self, Self::AvatarText | Self::Badges | Self::BotBadge)
    }
}

// ============================================================================
// Render Context
// ============================================================================

/// Read-only inputs shared by every renderer during one render call.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub profile: &'a UserProfile,
    pub options: &'a RenderOptions,
    pub assets: &'a ResolvedAssets,
    pub typesetter: &'a Typesetter,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        profile: &'a UserProfile,
        options: &'a RenderOptions,
        assets: &'a ResolvedAssets,
        typesetter: &'a Typesetter,
    ) -> Self {
        Self {
            profile,
            options,
            assets,
            typesetter,
        }
    }
}

/// A self-contained renderer for one layer.
///
/// `render` returns `Ok(None)` when the layer does not apply to this card
/// (no border colors, not a bot, no rank data...).
pub trait LayerRenderer {
    const KIND: LayerKind;

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Option<Layer>>;
}

// ============================================================================
// Tests
// ============================================================================
