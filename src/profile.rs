//! Serializable user metadata consumed by the renderers.
//!
//! A [`UserProfile`] is supplied by the caller (the crate never fetches user
//! data) and is read-only for the whole render.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "id": "123456789012345678",
//!   "username": "ferris",
//!   "globalName": "Ferris",
//!   "discriminator": "0",
//!   "bot": false,
//!   "verified": false,
//!   "createdTimestamp": 1609459200000,
//!   "avatarUrl": "https://cdn.example.com/avatar.png",
//!   "bannerUrl": null,
//!   "profileColors": ["#ff0000", "#0000ff"],
//!   "avatarFrame": null
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Id of the reserved system AI account, which gets the "AI" bot badge and
/// the `@clyde` tag.
pub const AI_ACCOUNT_ID: &str = "1081004946872352958";

/// Identity, asset references and decoration of the user on the card.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    /// Numeric account id as a string.
    pub id: String,

    pub username: String,

    /// Display name shown instead of the username when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_name: Option<String>,

    /// Legacy four digit discriminator; empty or `"0"` means none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,

    pub bot: bool,

    pub verified: bool,

    /// Account creation time in milliseconds since the Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_timestamp: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_url: Option<String>,

    /// Profile theme colors, used for the border when no override is given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_colors: Option<Vec<String>>,

    /// Avatar decoration drawn over the avatar.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_frame: Option<String>,
}

impl UserProfile {
    /// Creates a profile with just an id and username.
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            ..Self::default()
        }
    }

    /// Returns true for the reserved system AI account.
    pub fn is_ai_account(&self) -> bool {
        self.id == AI_ACCOUNT_ID
    }

    /// Returns the discriminator if it is a real one (not empty or `"0"`).
    pub fn discriminator(&self) -> Option<&str> {
        self.discriminator
            .as_deref()
            .filter(|d| !d.is_empty() && *d != "0")
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
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
    fn profile_json_uses_camel_case() {
        let mut profile = UserProfile::new("42", "ferris");
        profile.global_name = Some("Ferris".into());
        profile.created_timestamp = Some(1_609_459_200_000);

        let json = profile.to_json().unwrap();
        assert!(json.contains("\"globalName\""));
        assert!(json.contains("\"createdTimestamp\""));
        assert!(!json.contains("bannerUrl"));

        let restored = UserProfile::from_json(&json).unwrap();
        assert_eq!(restored, profile);
    }

    #[test]
    fn empty_profile_deserializes() {
        let profile = UserProfile::from_json("{}").unwrap();
        assert!(profile.id.is_empty());
        assert!(!profile.bot);
        assert!(profile.avatar_url.is_none());
    }

    #[test]
    fn zero_discriminator_is_treated_as_absent() {
        let mut profile = UserProfile::new("1", "a");
        profile.discriminator = Some("0".into());
        assert_eq!(profile.discriminator(), None);

        profile.discriminator = Some("0420".into());
        assert_eq!(profile.discriminator(), Some("0420"));
    }

    #[test]
    fn detects_ai_account() {
        assert!(UserProfile::new(AI_ACCOUNT_ID, "clyde").is_ai_account());
        assert!(!UserProfile::new("1", "clyde").is_ai_account());
    }
}
