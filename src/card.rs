//! Profile card rendering entry point.

use std::io::Cursor;

use image::{ImageFormat, RgbaImage};

use crate::assets::{AssetLoader, LocalAssetLoader, ResolvedAssets};
use crate::compositor::Compositor;
use crate::error::Result;
use crate::layer::{
    AvatarFrameLayer, AvatarTextLayer, BackgroundLayer, BadgeRowLayer, BorderLayer, BotBadgeLayer,
    FrameLayer, RenderContext, XpBarLayer,
};
use crate::options::RenderOptions;
use crate::profile::UserProfile;
use crate::text::Typesetter;

// ============================================================================
// ProfileCard
// ============================================================================

/// Renders 885×303 profile cards.
///
/// A `ProfileCard` owns the asset loader and the font database, both of which
/// are reused across renders. Nothing else survives a call: every render
/// resolves its own assets, draws fresh layers and composites them.
///
/// # Pipeline
///
/// 1. Validate options (`presenceStatus`, colors, `rankData`)
/// 2. Resolve assets, applying background/avatar fallbacks and skipping
///    broken badges
/// 3. Render each layer independently
/// 4. Composite in the fixed order: background, border, frame, avatar and
///    text, avatar frame, badges, bot badge, XP bar, shadow
///
/// # Example
///
/// ```no_run
/// use profile_card::{MemoryAssetLoader, ProfileCard, RenderOptions, UserProfile};
///
/// let loader = MemoryAssetLoader::new()
///     .with("https://cdn.example.com/avatar.png", std::fs::read("avatar.png").unwrap());
///
/// let mut profile = UserProfile::new("80351110224678912", "ferris");
/// profile.avatar_url = Some("https://cdn.example.com/avatar.png".into());
///
/// let card = ProfileCard::new(loader);
/// let png = card.render_png(&profile, &RenderOptions::default()).unwrap();
/// std::fs::write("card.png", png).unwrap();
/// ```
#[derive(Debug)]
pub struct ProfileCard<L = LocalAssetLoader> {
    loader: L,
    typesetter: Typesetter,
}

impl Default for ProfileCard<LocalAssetLoader> {
    fn default() -> Self {
        Self::new(LocalAssetLoader)
    }
}

impl<L: AssetLoader> ProfileCard<L> {
    /// Creates a renderer that loads assets through `loader` and draws text
    /// with the system fonts.
    pub fn new(loader: L) -> Self {
        Self::with_typesetter(loader, Typesetter::system())
    }

    /// Creates a renderer with an explicit font setup.
    pub fn with_typesetter(loader: L, typesetter: Typesetter) -> Self {
        Self { loader, typesetter }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn typesetter(&self) -> &Typesetter {
        &self.typesetter
    }

    /// Renders the card to an RGBA image.
    ///
    /// Configuration errors and fatal asset errors abort the render; no
    /// partial image is returned.
    #[tracing::instrument(skip_all, fields(user = %profile.id))]
    pub fn render(&self, profile: &UserProfile, options: &RenderOptions) -> Result<RgbaImage> {
        validate(options)?;

        let assets = ResolvedAssets::resolve(&self.loader, profile, options, &self.typesetter)?;
        let ctx = RenderContext::new(profile, options, &assets, &self.typesetter);

        let mut compositor = Compositor::new().with_drop_shadows(options.drop_shadows);
        compositor.render(&BackgroundLayer, &ctx)?;
        compositor.render(&BorderLayer, &ctx)?;
        compositor.render(&FrameLayer, &ctx)?;
        compositor.render(&AvatarTextLayer, &ctx)?;
        compositor.render(&AvatarFrameLayer, &ctx)?;
        compositor.render(&BadgeRowLayer, &ctx)?;
        compositor.render(&BotBadgeLayer, &ctx)?;
        compositor.render(&XpBarLayer, &ctx)?;

        tracing::debug!(layers = compositor.len(), "compositing card");
        Ok(compositor.composite()?.to_rgba_image())
    }

    /// Renders the card and encodes it as PNG.
    pub fn render_png(&self, profile: &UserProfile, options: &RenderOptions) -> Result<Vec<u8>> {
        let image = self.render(profile, options)?;
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}

/// Checks every option that can make a render fail before any asset is
/// decoded.
fn validate(options: &RenderOptions) -> Result<()> {
    options.presence_status()?;
    if let Some(spec) = &options.border_color {
        spec.gradient("borderColor")?;
    }
    if let Some(rank) = &options.rank_data {
        rank.values()?;
        if let Some(spec) = &rank.bar_color {
            spec.gradient("barColor")?;
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
