//! Rendering options.
//!
//! [`RenderOptions`] enumerates every recognised option. Each one toggles a
//! single rendering branch and its absence means "use the default". Values
//! that need validation (`presenceStatus`, `rankData` numerics, colors) are
//! kept in their raw JSON form here and checked by the renderer that uses
//! them, so a bad value surfaces as a [`CardError::Configuration`].
//!
//! # Example
//!
//! ```
//! use profile_card::{ColorSpec, RankData, RenderOptions};
//!
//! let options = RenderOptions::new()
//!     .with_border_color(ColorSpec::list(["#ff0000", "#0000ff"]))
//!     .with_presence_status("dnd")
//!     .with_rank_data(RankData::new(250.0, 1000.0, 7.0));
//!
//! let json = options.to_json().unwrap();
//! let restored = RenderOptions::from_json(&json).unwrap();
//! assert_eq!(restored.presence_status.as_deref(), Some("dnd"));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CardError, Result};
use crate::geometry::{BorderAlign, Gradient};

// ============================================================================
// ColorSpec
// ============================================================================

/// A color option given either as one hex string or as an ordered list.
///
/// ```json
/// "#ff0000"
/// // or
/// ["#ff0000", "#00ff00", "#0000ff"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(untagged)]
pub enum ColorSpec {
    Single(String),
    List(Vec<String>),
}

impl ColorSpec {
    pub fn single(color: impl Into<String>) -> Self {
        Self::Single(color.into())
    }

    pub fn list<I, S>(colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(colors.into_iter().map(Into::into).collect())
    }

    /// Returns the colors in order.
    pub fn colors(&self) -> &[String] {
        match self {
            Self::Single(color) => std::slice::from_ref(color),
            Self::List(colors) => colors,
        }
    }

    /// Validates the list (1 to 20 entries, all hex) for the named option.
    pub fn gradient(&self, option: &'static str) -> Result<Gradient> {
        Gradient::from_hex(option, self.colors())
    }
}

impl From<&str> for ColorSpec {
    fn from(color: &str) -> Self {
        Self::single(color)
    }
}

impl From<Vec<String>> for ColorSpec {
    fn from(colors: Vec<String>) -> Self {
        Self::List(colors)
    }
}

// ============================================================================
// PresenceStatus
// ============================================================================

/// A user's availability, drawn as a badge over the avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresenceStatus {
    Idle,
    Dnd,
    Online,
    Invisible,
    Offline,
    Streaming,
    Phone,
}

impl PresenceStatus {
    pub const ALL: [PresenceStatus; 7] = [
        Self::Idle,
        Self::Dnd,
        Self::Online,
        Self::Invisible,
        Self::Offline,
        Self::Streaming,
        Self::Phone,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dnd => "dnd",
            Self::Online => "online",
            Self::Invisible => "invisible",
            Self::Offline => "offline",
            Self::Streaming => "streaming",
            Self::Phone => "phone",
        }
    }

    /// The status whose icon is drawn; offline users share the invisible icon.
    pub fn icon_status(self) -> Self {
        match self {
            Self::Offline => Self::Invisible,
            other => other,
        }
    }

    pub fn is_phone(&self) -> bool {
        matches!(self, Self::Phone)
    }
}

impl fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresenceStatus {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                CardError::configuration(
                    "presenceStatus",
                    format!(
                        "('{s}') must be 'online' | 'idle' | 'offline' | 'dnd' | 'invisible' | 'streaming' | 'phone'"
                    ),
                )
            })
    }
}

// ============================================================================
// RankData
// ============================================================================

/// XP / level / rank information for the progress bar.
///
/// `currentXp`, `requiredXp` and `level` are required whenever `rankData` is
/// present; they are optional here so that a missing field is reported by
/// name instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct RankData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_xp: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_xp: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<f64>,

    /// Progress fill colors; the fill is white when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bar_color: Option<ColorSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_color: Option<String>,

    /// Colors ranks 1 to 3 gold, silver and bronze.
    pub auto_color_rank: bool,
}

/// The validated numeric part of [`RankData`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankValues {
    pub current_xp: f64,
    pub required_xp: f64,
    pub level: f64,
    pub rank: Option<f64>,
}

impl RankData {
    pub fn new(current_xp: f64, required_xp: f64, level: f64) -> Self {
        Self {
            current_xp: Some(current_xp),
            required_xp: Some(required_xp),
            level: Some(level),
            ..Self::default()
        }
    }

    pub fn with_rank(mut self, rank: f64) -> Self {
        self.rank = Some(rank);
        self
    }

    pub fn with_bar_color(mut self, color: impl Into<ColorSpec>) -> Self {
        self.bar_color = Some(color.into());
        self
    }

    /// Checks the required numeric fields, naming every missing one.
    pub fn values(&self) -> Result<RankValues> {
        let fields = [
            ("currentXp", self.current_xp),
            ("requiredXp", self.required_xp),
            ("level", self.level),
        ];
        let missing: Vec<&str> = fields
            .iter()
            .filter(|(_, value)| !value.is_some_and(f64::is_finite))
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            return Err(CardError::configuration(
                "rankData",
                format!(
                    "requires currentXp, requiredXp and level properties (missing: {})",
                    missing.join(", ")
                ),
            ));
        }

        Ok(RankValues {
            current_xp: self.current_xp.unwrap_or_default(),
            required_xp: self.required_xp.unwrap_or_default(),
            level: self.level.unwrap_or_default(),
            rank: self.rank.filter(|r| r.is_finite()),
        })
    }
}

// ============================================================================
// RenderOptions
// ============================================================================

/// Every recognised rendering option, with its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Replaces the display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_username: Option<String>,

    /// Replaces the `@username` / `#discriminator` tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_tag: Option<String>,

    /// Subtitle drawn under the tag; ignored when `rankData` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_subtitle: Option<String>,

    /// Replaces the formatted creation date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_date: Option<String>,

    /// Background image reference; takes priority over the banner.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_background: Option<String>,

    /// Avatar image reference; takes priority over the profile avatar.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_avatar: Option<String>,

    /// Badge image references, drawn right to left.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_badges: Vec<String>,

    /// Draws a translucent backing behind the badge row.
    pub badges_frame: bool,

    pub remove_badges: bool,

    /// Skips the border layer even when colors are available.
    pub remove_border: bool,

    /// Skips the avatar decoration layer.
    pub remove_avatar_frame: bool,

    /// Border gradient colors; defaults to the profile colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<ColorSpec>,

    #[serde(rename = "borderAllign")]
    pub border_align: BorderAlign,

    /// One of `idle`, `dnd`, `online`, `invisible`, `offline`, `streaming`, `phone`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_status: Option<String>,

    /// Uses slightly rounded corners instead of a circle for the avatar.
    pub square_avatar: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub username_color: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_color: Option<String>,

    /// Subtitle text color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Blurs the background with a 9px radius instead of 3px.
    pub more_background_blur: bool,

    pub disable_background_blur: bool,

    /// Percentage added to 100% background brightness (may be negative).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_brightness: Option<f32>,

    /// Runs the drop-shadow pass over text, avatar and badges.
    pub drop_shadows: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank_data: Option<RankData>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            custom_username: None,
            custom_tag: None,
            custom_subtitle: None,
            custom_date: None,
            custom_background: None,
            custom_avatar: None,
            custom_badges: Vec::new(),
            badges_frame: false,
            remove_badges: false,
            remove_border: false,
            remove_avatar_frame: false,
            border_color: None,
            border_align: BorderAlign::Horizontal,
            presence_status: None,
            square_avatar: false,
            username_color: None,
            tag_color: None,
            color: None,
            more_background_blur: false,
            disable_background_blur: false,
            background_brightness: None,
            drop_shadows: true,
            rank_data: None,
        }
    }
}

impl RenderOptions {
    /// Creates options with every default.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_border_color(mut self, color: impl Into<ColorSpec>) -> Self {
        self.border_color = Some(color.into());
        self
    }

    pub fn with_border_align(mut self, align: BorderAlign) -> Self {
        self.border_align = align;
        self
    }

    pub fn with_presence_status(mut self, status: impl Into<String>) -> Self {
        self.presence_status = Some(status.into());
        self
    }

    pub fn with_rank_data(mut self, rank: RankData) -> Self {
        self.rank_data = Some(rank);
        self
    }

    pub fn with_custom_badges<I, S>(mut self, badges: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.custom_badges = badges.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_custom_background(mut self, source: impl Into<String>) -> Self {
        self.custom_background = Some(source.into());
        self
    }

    /// Parses `presenceStatus`, rejecting values outside the fixed set.
    pub fn presence_status(&self) -> Result<Option<PresenceStatus>> {
        self.presence_status
            .as_deref()
            .map(str::parse)
            .transpose()
    }

    /// Blur radius applied to the background image.
    pub fn background_blur(&self) -> f32 {
        if self.more_background_blur {
            9.0
        } else if self.disable_background_blur {
            0.0
        } else {
            3.0
        }
    }

    /// Brightness multiplier applied to the background image.
    pub fn background_brightness_factor(&self) -> f32 {
        self.background_brightness
            .map_or(1.0, |pct| ((pct + 100.0) / 100.0).max(0.0))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_options_use_defaults() {
        let options = RenderOptions::from_json("{}").unwrap();
        assert_eq!(options, RenderOptions::default());
        assert!(options.drop_shadows);
        assert_eq!(options.border_align, BorderAlign::Horizontal);
        assert_eq!(options.background_blur(), 3.0);
        assert_eq!(options.background_brightness_factor(), 1.0);
    }

    #[test]
    fn border_color_accepts_string_or_list() {
        let single = RenderOptions::from_json(r##"{"borderColor": "#ff0000"}"##).unwrap();
        assert_eq!(single.border_color, Some(ColorSpec::single("#ff0000")));
        assert_eq!(single.border_color.unwrap().colors().len(), 1);

        let list =
            RenderOptions::from_json(r##"{"borderColor": ["#ff0000", "#00ff00"], "borderAllign": "vertical"}"##)
                .unwrap();
        assert_eq!(list.border_color.as_ref().unwrap().colors().len(), 2);
        assert_eq!(list.border_align, BorderAlign::Vertical);
    }

    #[test]
    fn presence_status_parses_every_valid_value() {
        for status in PresenceStatus::ALL {
            let options = RenderOptions::new().with_presence_status(status.as_str());
            assert_eq!(options.presence_status().unwrap(), Some(status));
        }
        assert_eq!(RenderOptions::new().presence_status().unwrap(), None);
    }

    #[test]
    fn invalid_presence_status_is_a_configuration_error() {
        let options = RenderOptions::new().with_presence_status("away");
        let err = options.presence_status().unwrap_err();
        assert_eq!(err.option(), Some("presenceStatus"));
        assert!(err.to_string().contains("'away'"));
    }

    #[test]
    fn offline_uses_invisible_icon() {
        assert_eq!(PresenceStatus::Offline.icon_status(), PresenceStatus::Invisible);
        assert_eq!(PresenceStatus::Phone.icon_status(), PresenceStatus::Phone);
    }

    #[test]
    fn rank_data_names_missing_fields() {
        let rank = RankData {
            current_xp: Some(10.0),
            ..RankData::default()
        };
        let err = rank.values().unwrap_err();
        let message = err.to_string();
        assert_eq!(err.option(), Some("rankData"));
        assert!(message.contains("requiredXp"));
        assert!(message.contains("level"));
        assert!(!message.contains("missing: currentXp"));
    }

    #[test]
    fn rank_data_rejects_non_finite_values() {
        let rank = RankData::new(f64::NAN, 100.0, 1.0);
        assert!(rank.values().is_err());
    }

    #[test]
    fn rank_data_from_json() {
        let json = r##"{"rankData": {"currentXp": 50, "requiredXp": 100, "level": 3, "rank": 1, "barColor": "#00ff00", "autoColorRank": true}}"##;
        let options = RenderOptions::from_json(json).unwrap();
        let rank = options.rank_data.unwrap();
        let values = rank.values().unwrap();
        assert_eq!(values.current_xp, 50.0);
        assert_eq!(values.rank, Some(1.0));
        assert!(rank.auto_color_rank);
        assert_eq!(rank.bar_color, Some(ColorSpec::single("#00ff00")));
    }

    #[test]
    fn blur_and_brightness_knobs() {
        let options = RenderOptions {
            more_background_blur: true,
            disable_background_blur: true,
            background_brightness: Some(-50.0),
            ..RenderOptions::default()
        };
        assert_eq!(options.background_blur(), 9.0);
        assert_eq!(options.background_brightness_factor(), 0.5);
    }

    #[test]
    fn options_roundtrip_through_json() {
        let options = RenderOptions::new()
            .with_border_color(ColorSpec::list(["#111111", "#222222"]))
            .with_custom_badges(["badge.png"])
            .with_rank_data(RankData::new(1.0, 2.0, 3.0).with_rank(4.0));

        let json = options.to_json_pretty().unwrap();
        assert!(json.contains("\"customBadges\""));
        assert!(json.contains("\"borderAllign\""));

        let restored = RenderOptions::from_json(&json).unwrap();
        assert_eq!(restored, options);
    }
}
