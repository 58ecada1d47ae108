//! Bot badge drawn right after the username.

use super::avatar::{BOT_USERNAME_BUDGET, display_name, fit_username};
use super::{Layer, LayerKind, LayerRenderer, RenderContext};
use crate::assets::{BotBadgeKind, StaticAsset};
use crate::error::Result;
use crate::profile::UserProfile;

/// Gap between the end of the username and the badge.
const BADGE_GAP: f32 = 10.0;

const USERNAME_X: f32 = 300.0;

const BADGE_Y: f32 = 110.0;

/// Badge variant for a profile, or `None` for human users.
pub fn bot_badge_kind(profile: &UserProfile) -> Option<BotBadgeKind> {
    if !profile.bot {
        None
    } else if profile.is_ai_account() {
        Some(BotBadgeKind::Ai)
    } else if profile.verified {
        Some(BotBadgeKind::Verified)
    } else {
        Some(BotBadgeKind::Unverified)
    }
}

/// Top-left corner of the badge for a username of the given rendered width.
pub fn bot_badge_origin(username_width: f32) -> (f32, f32) {
    (USERNAME_X + username_width + BADGE_GAP, BADGE_Y)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BotBadgeLayer;

impl LayerRenderer for BotBadgeLayer {
    const KIND: LayerKind = LayerKind::BotBadge;

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Option<Layer>> {
        let Some(kind) = bot_badge_kind(ctx.profile) else {
            return Ok(None);
        };

        let fitted = fit_username(
            ctx.typesetter,
            display_name(ctx.profile, ctx.options),
            BOT_USERNAME_BUDGET,
        );
        let (x, y) = bot_badge_origin(fitted.width);

        let badge = StaticAsset::BotBadge(kind).render()?;
        let mut layer = Layer::new()?;
        layer.draw_image_at(&badge, x, y);

        tracing::debug!(?kind, x, "rendered bot badge");
        Ok(Some(layer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::tests::{solid_assets, with_context};
    use crate::options::RenderOptions;
    use crate::profile::AI_ACCOUNT_ID;

    fn render(profile: &UserProfile) -> Option<Layer> {
        let assets = solid_assets([0, 0, 0, 255]);
        let options = RenderOptions::default();
        with_context(profile, &options, &assets, |ctx| BotBadgeLayer.render(ctx)).unwrap()
    }

    #[test]
    fn variant_selection() {
        let mut profile = UserProfile::new("1", "ferris");
        assert_eq!(bot_badge_kind(&profile), None);

        profile.bot = true;
        assert_eq!(bot_badge_kind(&profile), Some(BotBadgeKind::Unverified));

        profile.verified = true;
        assert_eq!(bot_badge_kind(&profile), Some(BotBadgeKind::Verified));

        profile.id = AI_ACCOUNT_ID.into();
        assert_eq!(bot_badge_kind(&profile), Some(BotBadgeKind::Ai));
    }

    #[test]
    fn origin_follows_username_width() {
        assert_eq!(bot_badge_origin(0.0), (310.0, 110.0));
        assert_eq!(bot_badge_origin(200.0), (510.0, 110.0));
    }

    #[test]
    fn humans_get_no_badge() {
        assert!(render(&UserProfile::new("1", "ferris")).is_none());
    }

    #[test]
    fn bot_badge_is_drawn_after_the_name() {
        let mut profile = UserProfile::new("1", "ferris");
        profile.bot = true;
        // no fonts: the name measures 0, so the badge starts at x = 310
        let layer = render(&profile).unwrap();
        assert_eq!(layer.pixel(330, 112)[3], 255);
        assert_eq!(layer.pixel(305, 130)[3], 0);
        assert_eq!(layer.pixel(330, 155)[3], 0);
    }
}
