//! Avatar and text layer: display name, tag or subtitle, creation date, the
//! clipped avatar and the presence status badge.

use resvg::tiny_skia::{BlendMode, Color, Shader};

use super::{
    BACKING_ALPHA, ImagePaint, Layer, LayerKind, LayerRenderer, RenderContext, muted_text_color,
    with_opacity,
};
use crate::error::{CardError, Result};
use crate::geometry::{Bounds, parse_color_or, rounded_rect_path};
use crate::layer::status::StatusCutout;
use crate::options::RenderOptions;
use crate::profile::UserProfile;
use crate::text::{Anchor, FittedText, Font, TextRun, Typesetter, date_text, fit_text};

/// Where the avatar is drawn and clipped.
pub const AVATAR_BOUNDS: Bounds = Bounds::new(47.0, 39.0, 225.0, 225.0);

pub const USERNAME_BASE_SIZE: f32 = 80.0;

/// Smallest font size the username shrinks to before being truncated.
pub const USERNAME_MIN_SIZE: f32 = 45.0;

/// Username width budget for bots, leaving room for the bot badge.
pub const BOT_USERNAME_BUDGET: f32 = 470.0;

pub const USERNAME_BUDGET: f32 = 555.0;

const SUBTITLE_BACKING: Bounds = Bounds::new(304.0, 248.0, 380.0, 33.0);

/// Name shown on the card: custom username, then global name, then username.
pub fn display_name<'a>(profile: &'a UserProfile, options: &'a RenderOptions) -> &'a str {
    options
        .custom_username
        .as_deref()
        .filter(|name| !name.is_empty())
        .or_else(|| profile.global_name.as_deref().filter(|name| !name.is_empty()))
        .unwrap_or(&profile.username)
}

/// Width budget for the username of this profile.
pub fn username_budget(profile: &UserProfile) -> f32 {
    if profile.bot {
        BOT_USERNAME_BUDGET
    } else {
        USERNAME_BUDGET
    }
}

/// Fits a username into `budget` using the bold username font.
///
/// The bot badge is positioned from the same result, so both layers always
/// agree on where the name ends.
pub fn fit_username(typesetter: &Typesetter, name: &str, budget: f32) -> FittedText {
    fit_text(name, USERNAME_BASE_SIZE, USERNAME_MIN_SIZE, budget, |text, size| {
        typesetter.measure(text, Font::bold(size))
    })
}

/// Tag under the name: custom tag, `@clyde` for the AI account, `@username`
/// without a discriminator, otherwise `#discriminator`.
pub fn tag_text(profile: &UserProfile, options: &RenderOptions) -> String {
    if let Some(tag) = &options.custom_tag {
        return tag.clone();
    }
    if profile.is_ai_account() {
        return "@clyde".to_string();
    }
    match profile.discriminator() {
        Some(discriminator) => format!("#{discriminator}"),
        None => format!("@{}", profile.username),
    }
}

/// Draws the name, tag, subtitle and date text, then the avatar, then the
/// status badge.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvatarTextLayer;

impl AvatarTextLayer {
    fn text_runs(&self, ctx: &RenderContext<'_>, layer: &mut Layer) -> Result<Vec<TextRun>> {
        let RenderContext {
            profile, options, ..
        } = *ctx;
        let ranked = options.rank_data.is_some();
        let mut runs = Vec::with_capacity(4);

        if let (Some(subtitle), false) = (options.custom_subtitle.as_deref(), ranked) {
            let backing = Color::from_rgba8(0x2a, 0x2d, 0x33, 255);
            layer.fill_rounded_rect(SUBTITLE_BACKING, 12.0, with_opacity(backing, BACKING_ALPHA));
            let color = parse_color_or("color", options.color.as_deref(), muted_text_color())?;
            runs.push(TextRun::new(subtitle, 314.0, 273.0, Font::regular(23.0), color));
        }

        let fitted = fit_username(
            ctx.typesetter,
            display_name(profile, options),
            username_budget(profile),
        );
        let username_color =
            parse_color_or("usernameColor", options.username_color.as_deref(), Color::WHITE)?;
        runs.push(TextRun::new(
            fitted.text,
            300.0,
            155.0,
            Font::bold(fitted.size),
            username_color,
        ));

        if !ranked {
            let tag_color =
                parse_color_or("tagColor", options.tag_color.as_deref(), muted_text_color())?;
            runs.push(TextRun::new(
                tag_text(profile, options),
                300.0,
                215.0,
                Font::regular(60.0),
                tag_color,
            ));
        }

        let date = date_text(options.custom_date.as_deref(), profile.created_timestamp);
        if !date.is_empty() {
            runs.push(
                TextRun::new(date, 775.0, 273.0, Font::regular(23.0), muted_text_color())
                    .anchored(Anchor::Middle),
            );
        }

        Ok(runs)
    }

    fn draw_avatar(&self, ctx: &RenderContext<'_>, layer: &mut Layer) -> Result<()> {
        let radius = if ctx.options.square_avatar { 30.0 } else { 225.0 };
        let region =
            rounded_rect_path(AVATAR_BOUNDS, radius).ok_or_else(|| CardError::surface("avatar clip"))?;
        let clip = Layer::clip_mask(&region)?;

        // backdrop for transparent avatars
        let backdrop = Color::from_rgba8(0x29, 0x2b, 0x2f, 255);
        layer.fill_path(
            &region,
            Shader::SolidColor(backdrop),
            BlendMode::SourceOver,
            Some(&clip),
        );
        layer.draw_rgba(
            &ctx.assets.avatar.image,
            AVATAR_BOUNDS,
            ImagePaint {
                clip: Some(&clip),
                ..ImagePaint::default()
            },
        );
        Ok(())
    }
}

impl LayerRenderer for AvatarTextLayer {
    const KIND: LayerKind = LayerKind::AvatarText;

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Option<Layer>> {
        let status = ctx.options.presence_status()?;
        let mut layer = Layer::new()?;

        let runs = self.text_runs(ctx, &mut layer)?;
        layer.draw_text(ctx.typesetter, &runs)?;
        self.draw_avatar(ctx, &mut layer)?;

        if let Some(status) = status {
            StatusCutout::new(status).cut_and_draw(&mut layer)?;
        }

        tracing::debug!(
            avatar = ?ctx.assets.avatar.source,
            status = ?status,
            "rendered avatar and text layer"
        );
        Ok(Some(layer))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::tests::{assert_near, blank_typesetter, solid_assets, with_context};
    use crate::options::RankData;
    use crate::profile::AI_ACCOUNT_ID;

    const AVATAR: [u8; 4] = [200, 40, 40, 255];

    fn render(profile: &UserProfile, options: &RenderOptions) -> Result<Option<Layer>> {
        let assets = solid_assets(AVATAR);
        with_context(profile, options, &assets, |ctx| AvatarTextLayer.render(ctx))
    }

    #[test]
    fn display_name_precedence() {
        let mut profile = UserProfile::new("1", "ferris");
        let mut options = RenderOptions::default();
        assert_eq!(display_name(&profile, &options), "ferris");

        profile.global_name = Some("Ferris the Crab".into());
        assert_eq!(display_name(&profile, &options), "Ferris the Crab");

        options.custom_username = Some("Custom".into());
        assert_eq!(display_name(&profile, &options), "Custom");

        options.custom_username = Some(String::new());
        assert_eq!(display_name(&profile, &options), "Ferris the Crab");
    }

    #[test]
    fn tag_precedence() {
        let mut profile = UserProfile::new("1", "ferris");
        let mut options = RenderOptions::default();
        assert_eq!(tag_text(&profile, &options), "@ferris");

        profile.discriminator = Some("0".into());
        assert_eq!(tag_text(&profile, &options), "@ferris");

        profile.discriminator = Some("1234".into());
        assert_eq!(tag_text(&profile, &options), "#1234");

        profile.id = AI_ACCOUNT_ID.into();
        assert_eq!(tag_text(&profile, &options), "@clyde");

        options.custom_tag = Some("the crab".into());
        assert_eq!(tag_text(&profile, &options), "the crab");
    }

    #[test]
    fn bots_get_a_narrower_budget() {
        let mut profile = UserProfile::new("1", "ferris");
        assert_eq!(username_budget(&profile), USERNAME_BUDGET);
        profile.bot = true;
        assert_eq!(username_budget(&profile), BOT_USERNAME_BUDGET);
    }

    #[test]
    fn username_fit_without_fonts_keeps_base_size() {
        let fitted = fit_username(&blank_typesetter(), "ferris", USERNAME_BUDGET);
        assert_eq!(fitted.size, USERNAME_BASE_SIZE);
        assert_eq!(fitted.text, "ferris");
    }

    #[test]
    fn avatar_is_drawn_inside_round_clip() {
        let layer = render(&UserProfile::new("1", "ferris"), &RenderOptions::default())
            .unwrap()
            .unwrap();

        assert_near(layer.pixel(159, 151), AVATAR);
        // outside the circle, inside the bounding square
        assert_eq!(layer.pixel(55, 60)[3], 0);
    }

    #[test]
    fn square_avatar_keeps_corners() {
        let options = RenderOptions {
            square_avatar: true,
            ..RenderOptions::default()
        };
        let layer = render(&UserProfile::new("1", "ferris"), &options)
            .unwrap()
            .unwrap();
        assert_near(layer.pixel(55, 60), AVATAR);
        assert_eq!(layer.pixel(40, 60)[3], 0);
    }

    #[test]
    fn status_cuts_through_the_avatar() {
        let square = RenderOptions {
            square_avatar: true,
            ..RenderOptions::default()
        };
        let profile = UserProfile::new("1", "ferris");

        let plain = render(&profile, &square).unwrap().unwrap();
        assert_near(plain.pixel(218, 230), AVATAR);

        let online = render(&profile, &square.clone().with_presence_status("online"))
            .unwrap()
            .unwrap();
        // between the icon dot and the cutout edge
        assert_eq!(online.pixel(218, 230)[3], 0);
    }

    #[test]
    fn invalid_status_is_rejected() {
        let options = RenderOptions::default().with_presence_status("away");
        let err = render(&UserProfile::new("1", "ferris"), &options).unwrap_err();
        assert_eq!(err.option(), Some("presenceStatus"));
    }

    #[test]
    fn invalid_text_color_is_rejected() {
        let options = RenderOptions {
            tag_color: Some("nope".into()),
            ..RenderOptions::default()
        };
        let err = render(&UserProfile::new("1", "ferris"), &options).unwrap_err();
        assert_eq!(err.option(), Some("tagColor"));

        // the tag is not drawn with rank data, so its color is never parsed
        let ranked = RenderOptions {
            rank_data: Some(RankData::new(1.0, 2.0, 3.0)),
            ..options
        };
        assert!(render(&UserProfile::new("1", "ferris"), &ranked).is_ok());
    }

    #[test]
    fn subtitle_backing_only_without_rank_data() {
        let options = RenderOptions {
            custom_subtitle: Some("hello".into()),
            ..RenderOptions::default()
        };
        let profile = UserProfile::new("1", "ferris");

        let with_subtitle = render(&profile, &options).unwrap().unwrap();
        assert!(with_subtitle.pixel(500, 265)[3] > 0);

        let ranked = options.with_rank_data(RankData::new(1.0, 2.0, 3.0));
        let without = render(&profile, &ranked).unwrap().unwrap();
        assert_eq!(without.pixel(500, 265)[3], 0);
    }
}
