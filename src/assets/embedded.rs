//! The static asset bundle: status icons, the decorative frame and the bot
//! badges, embedded as SVG and rasterized at their natural size.
//!
//! These assets ship with the crate and are assumed valid; a rasterization
//! failure is reported as a fatal [`AssetDecodeError::Svg`].

use resvg::tiny_skia::Pixmap;

use crate::error::AssetDecodeError;
use crate::layer::svg::render_svg;
use crate::options::PresenceStatus;

/// Variant of the badge drawn next to a bot's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BotBadgeKind {
    /// The reserved system AI account.
    Ai,
    Verified,
    Unverified,
}

/// One entry of the static bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaticAsset {
    /// Status icon; offline maps to the invisible icon.
    Status(PresenceStatus),
    Frame,
    BotBadge(BotBadgeKind),
}

impl StaticAsset {
    pub fn name(&self) -> String {
        match self {
            Self::Status(status) => format!("status/{}", status.icon_status()),
            Self::Frame => "frame".to_string(),
            Self::BotBadge(kind) => format!("bot-badge/{kind:?}").to_lowercase(),
        }
    }

    /// Returns the SVG markup for this asset.
    pub fn svg(&self) -> &'static str {
        match self {
            Self::Status(status) => match status.icon_status() {
                PresenceStatus::Online => STATUS_ONLINE,
                PresenceStatus::Idle => STATUS_IDLE,
                PresenceStatus::Dnd => STATUS_DND,
                PresenceStatus::Streaming => STATUS_STREAMING,
                PresenceStatus::Phone => STATUS_PHONE,
                PresenceStatus::Invisible | PresenceStatus::Offline => STATUS_INVISIBLE,
            },
            Self::Frame => FRAME,
            Self::BotBadge(BotBadgeKind::Ai) => BOT_AI,
            Self::BotBadge(BotBadgeKind::Verified) => BOT_VERIFIED,
            Self::BotBadge(BotBadgeKind::Unverified) => BOT_UNVERIFIED,
        }
    }

    /// Rasterizes the asset at its natural size.
    pub fn render(&self) -> Result<Pixmap, AssetDecodeError> {
        render_svg(self.svg()).ok_or_else(|| AssetDecodeError::Svg(self.name()))
    }
}

// ============================================================================
// Status icons (62×62, dot centered; phone 41×62)
// ============================================================================

const STATUS_ONLINE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="62" height="62" viewBox="0 0 62 62">
<circle cx="31" cy="31" r="22" fill="#23a55a"/>
</svg>"##;

const STATUS_IDLE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="62" height="62" viewBox="0 0 62 62">
<mask id="moon"><rect width="62" height="62" fill="#ffffff"/><circle cx="20" cy="20" r="14" fill="#000000"/></mask>
<circle cx="31" cy="31" r="22" fill="#f0b232" mask="url(#moon)"/>
</svg>"##;

const STATUS_DND: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="62" height="62" viewBox="0 0 62 62">
<mask id="bar"><rect width="62" height="62" fill="#ffffff"/><rect x="17" y="27" width="28" height="8" rx="4" fill="#000000"/></mask>
<circle cx="31" cy="31" r="22" fill="#f23f43" mask="url(#bar)"/>
</svg>"##;

const STATUS_INVISIBLE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="62" height="62" viewBox="0 0 62 62">
<mask id="ring"><rect width="62" height="62" fill="#ffffff"/><circle cx="31" cy="31" r="11" fill="#000000"/></mask>
<circle cx="31" cy="31" r="22" fill="#80848e" mask="url(#ring)"/>
</svg>"##;

const STATUS_STREAMING: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="62" height="62" viewBox="0 0 62 62">
<mask id="play"><rect width="62" height="62" fill="#ffffff"/><path d="M25 19 L43 31 L25 43 Z" fill="#000000"/></mask>
<circle cx="31" cy="31" r="22" fill="#593695" mask="url(#play)"/>
</svg>"##;

const STATUS_PHONE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="41" height="62" viewBox="0 0 41 62">
<mask id="screen"><rect width="41" height="62" fill="#ffffff"/><rect x="6" y="7" width="29" height="40" rx="2" fill="#000000"/><circle cx="20.5" cy="54" r="3.5" fill="#000000"/></mask>
<rect width="41" height="62" rx="8" fill="#23a55a" mask="url(#screen)"/>
</svg>"##;

// ============================================================================
// Frame (885×303)
// ============================================================================

const FRAME: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="885" height="303" viewBox="0 0 885 303">
<rect x="0" y="0" width="885" height="303" rx="34" fill="#000000" fill-opacity="0.6"/>
<rect x="22" y="22" width="841" height="259" rx="24" fill="none" stroke="#ffffff" stroke-opacity="0.12" stroke-width="2"/>
<rect x="290" y="232" width="575" height="1" fill="#ffffff" fill-opacity="0.08"/>
</svg>"##;

// ============================================================================
// Bot badges (drawn as stroked glyph paths so they need no fonts)
// ============================================================================

const BOT_VERIFIED: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="80" height="40" viewBox="0 0 80 40">
<rect width="80" height="40" rx="9" fill="#5865f2"/>
<g fill="none" stroke="#ffffff" stroke-width="3.5" stroke-linecap="round" stroke-linejoin="round">
<path d="M9 20 L14 26 L23 14"/>
<path d="M31 10 V30 H38 A5 5 0 0 0 38 20 H31 M31 20 H37 A5 5 0 0 0 37 10 H31"/>
<ellipse cx="53" cy="20" rx="6" ry="10"/>
<path d="M63 10 H75 M69 10 V30"/>
</g>
</svg>"##;

const BOT_UNVERIFIED: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="60" height="40" viewBox="0 0 60 40">
<rect width="60" height="40" rx="9" fill="#5865f2"/>
<g fill="none" stroke="#ffffff" stroke-width="3.5" stroke-linecap="round" stroke-linejoin="round">
<path d="M10 10 V30 H17 A5 5 0 0 0 17 20 H10 M10 20 H16 A5 5 0 0 0 16 10 H10"/>
<ellipse cx="33" cy="20" rx="6" ry="10"/>
<path d="M43 10 H55 M49 10 V30"/>
</g>
</svg>"##;

const BOT_AI: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="60" height="40" viewBox="0 0 60 40">
<rect width="60" height="40" rx="9" fill="#5865f2"/>
<g fill="none" stroke="#ffffff" stroke-width="3.5" stroke-linecap="round" stroke-linejoin="round">
<path d="M9 20 L14 26 L23 14"/>
<path d="M29 30 L36 10 L43 30 M31.5 23 H40.5"/>
<path d="M51 10 V30"/>
</g>
</svg>"##;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn all_assets() -> Vec<StaticAsset> {
        let mut assets: Vec<StaticAsset> = PresenceStatus::ALL
            .into_iter()
            .map(StaticAsset::Status)
            .collect();
        assets.push(StaticAsset::Frame);
        assets.extend(
            [BotBadgeKind::Ai, BotBadgeKind::Verified, BotBadgeKind::Unverified]
                .into_iter()
                .map(StaticAsset::BotBadge),
        );
        assets
    }

    #[test]
    fn every_bundled_asset_rasterizes() {
        for asset in all_assets() {
            let pixmap = asset.render().unwrap_or_else(|e| panic!("{}: {e}", asset.name()));
            assert!(
                pixmap.pixels().iter().any(|p| p.alpha() > 0),
                "{} rendered blank",
                asset.name()
            );
        }
    }

    #[test]
    fn status_icons_have_expected_sizes() {
        let online = StaticAsset::Status(PresenceStatus::Online).render().unwrap();
        assert_eq!((online.width(), online.height()), (62, 62));

        let phone = StaticAsset::Status(PresenceStatus::Phone).render().unwrap();
        assert_eq!((phone.width(), phone.height()), (41, 62));
    }

    #[test]
    fn offline_shares_invisible_icon() {
        assert_eq!(
            StaticAsset::Status(PresenceStatus::Offline).svg(),
            StaticAsset::Status(PresenceStatus::Invisible).svg()
        );
        assert_eq!(StaticAsset::Status(PresenceStatus::Offline).name(), "status/invisible");
    }

    #[test]
    fn frame_is_card_sized() {
        let frame = StaticAsset::Frame.render().unwrap();
        assert_eq!((frame.width(), frame.height()), (885, 303));
    }

    #[test]
    fn bot_badge_names() {
        assert_eq!(StaticAsset::BotBadge(BotBadgeKind::Ai).name(), "bot-badge/ai");
    }
}
