//! Asset loading and resolution.
//!
//! The crate never fetches anything over the network. Callers hand in image
//! references (URLs, file paths, base64 data) and an [`AssetLoader`] that
//! knows how to turn them into pixels. All loading happens up front in
//! [`ResolvedAssets::resolve`], which also applies the per-asset fallback
//! policy, so the layer renderers themselves never decode anything.
//!
//! # Fallbacks
//!
//! | Asset        | On decode failure                                  |
//! |--------------|----------------------------------------------------|
//! | background   | avatar image, then a flat fill                     |
//! | avatar       | generated placeholder                              |
//! | badges       | skipped (reported in [`BadgeReport::skipped`])     |
//! | avatar frame | fatal                                              |

pub mod badges;
pub mod embedded;

pub use badges::{BadgeDescriptor, BadgeReport, SkippedBadge, load_badges};
pub use embedded::{BotBadgeKind, StaticAsset};

use std::collections::HashMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::RgbaImage;

use crate::error::{AssetDecodeError, Result};
use crate::fallback_avatar;
use crate::layer::avatar::display_name;
use crate::options::RenderOptions;
use crate::profile::UserProfile;
use crate::text::{Typesetter, truncate_for_log};

/// Base64 prefixes of PNG and JPEG files, used to recognise bare base64 data.
const BASE64_IMAGE_PREFIXES: [&str; 2] = ["iVBORw0KGgo", "/9j/"];

// ============================================================================
// ImageSource
// ============================================================================

/// Where an image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// A remote URL; only loaders that pre-fetched it can resolve it.
    Url(String),
    /// A file on the local filesystem.
    Path(String),
    /// Base64 encoded image file data.
    Base64(String),
    /// Raw image file data.
    Bytes(Vec<u8>),
}

impl ImageSource {
    /// Classifies a string reference.
    ///
    /// - `http://` / `https://` → [`ImageSource::Url`]
    /// - `data:...;base64,...` or bare base64 PNG/JPEG data → [`ImageSource::Base64`]
    /// - anything else → [`ImageSource::Path`]
    pub fn parse(reference: &str) -> Self {
        let trimmed = reference.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            return Self::Url(trimmed.to_string());
        }
        if let Some(rest) = trimmed.strip_prefix("data:") {
            let payload = rest.split_once(',').map_or(rest, |(_, data)| data);
            return Self::Base64(payload.to_string());
        }
        if BASE64_IMAGE_PREFIXES.iter().any(|p| trimmed.starts_with(p)) {
            return Self::Base64(trimmed.to_string());
        }
        Self::Path(trimmed.to_string())
    }

    /// A short description for log output.
    pub fn describe(&self) -> String {
        match self {
            Self::Url(url) => truncate_for_log(url, 30),
            Self::Path(path) => truncate_for_log(path, 30),
            Self::Base64(data) => truncate_for_log(data, 30),
            Self::Bytes(bytes) => format!("<{} bytes>", bytes.len()),
        }
    }
}

impl From<&str> for ImageSource {
    fn from(reference: &str) -> Self {
        Self::parse(reference)
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

// ============================================================================
// Loaders
// ============================================================================

/// Turns an [`ImageSource`] into decoded pixels.
pub trait AssetLoader {
    fn load(&self, source: &ImageSource) -> Result<RgbaImage, AssetDecodeError>;

    /// Parses and loads a string reference.
    fn load_reference(&self, reference: &str) -> Result<RgbaImage, AssetDecodeError> {
        self.load(&ImageSource::parse(reference))
    }
}

/// Decodes bytes, base64 data and local files. URLs are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalAssetLoader;

impl AssetLoader for LocalAssetLoader {
    fn load(&self, source: &ImageSource) -> Result<RgbaImage, AssetDecodeError> {
        match source {
            ImageSource::Bytes(bytes) => decode_bytes(bytes),
            ImageSource::Base64(data) => {
                let bytes = STANDARD.decode(data.trim())?;
                decode_bytes(&bytes)
            }
            ImageSource::Path(path) => {
                let bytes = std::fs::read(path).map_err(|source| AssetDecodeError::Io {
                    path: path.clone(),
                    source,
                })?;
                decode_bytes(&bytes)
            }
            ImageSource::Url(url) => Err(AssetDecodeError::Unsupported(format!(
                "{} (network fetching is left to the caller)",
                truncate_for_log(url, 30)
            ))),
        }
    }
}

/// Serves pre-fetched image bytes by reference.
///
/// URLs and paths are looked up in the map first; anything not registered
/// falls through to [`LocalAssetLoader`], except URLs, which are reported
/// as missing.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetLoader {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryAssetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the bytes for a reference, replacing any previous entry.
    pub fn insert(&mut self, reference: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(reference.into(), bytes);
    }

    pub fn with(mut self, reference: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(reference, bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AssetLoader for MemoryAssetLoader {
    fn load(&self, source: &ImageSource) -> Result<RgbaImage, AssetDecodeError> {
        match source {
            ImageSource::Url(key) | ImageSource::Path(key) => match self.entries.get(key) {
                Some(bytes) => decode_bytes(bytes),
                None if matches!(source, ImageSource::Url(_)) => {
                    Err(AssetDecodeError::Missing(truncate_for_log(key, 30)))
                }
                None => LocalAssetLoader.load(source),
            },
            _ => LocalAssetLoader.load(source),
        }
    }
}

fn decode_bytes(bytes: &[u8]) -> Result<RgbaImage, AssetDecodeError> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

// ============================================================================
// Resolved assets
// ============================================================================

/// Which reference ended up as the card background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundSource {
    Custom,
    Banner,
    /// The avatar, drawn enlarged behind the card.
    Avatar,
}

impl BackgroundSource {
    /// What happens when this source fails to load.
    fn fallback_note(self) -> &'static str {
        match self {
            Self::Custom | Self::Banner => "could not load background, falling back to avatar",
            Self::Avatar => "could not load avatar as background, using a flat fill",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BackgroundImage {
    pub image: RgbaImage,
    pub source: BackgroundSource,
}

/// Which reference ended up as the avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarSource {
    Custom,
    Profile,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct AvatarImage {
    pub image: RgbaImage,
    pub source: AvatarSource,
}

/// Every decoded image a render needs, after fallbacks.
#[derive(Debug, Clone)]
pub struct ResolvedAssets {
    /// `None` means the background is a flat fill.
    pub background: Option<BackgroundImage>,
    pub avatar: AvatarImage,
    pub avatar_frame: Option<RgbaImage>,
    pub badges: BadgeReport,
}

impl ResolvedAssets {
    /// Loads every asset referenced by the profile and options.
    ///
    /// Only the avatar frame can fail here; the other assets degrade as
    /// described in the module docs.
    pub fn resolve(
        loader: &dyn AssetLoader,
        profile: &UserProfile,
        options: &RenderOptions,
        typesetter: &Typesetter,
    ) -> Result<Self> {
        let background = resolve_background(loader, profile, options);
        let avatar = resolve_avatar(loader, profile, options, typesetter)?;

        let avatar_frame = match (&profile.avatar_frame, options.remove_avatar_frame) {
            (Some(reference), false) => Some(loader.load_reference(reference)?),
            _ => None,
        };

        let badges = if options.remove_badges {
            BadgeReport::default()
        } else {
            load_badges(loader, &options.custom_badges)
        };

        Ok(Self {
            background,
            avatar,
            avatar_frame,
            badges,
        })
    }
}

fn avatar_reference<'a>(profile: &'a UserProfile, options: &'a RenderOptions) -> Option<&'a str> {
    options
        .custom_avatar
        .as_deref()
        .or(profile.avatar_url.as_deref())
}

/// Background priority: custom > banner > avatar, then flat.
fn resolve_background(
    loader: &dyn AssetLoader,
    profile: &UserProfile,
    options: &RenderOptions,
) -> Option<BackgroundImage> {
    let avatar = avatar_reference(profile, options);
    let preferred = options
        .custom_background
        .as_deref()
        .map(|r| (r, BackgroundSource::Custom))
        .or_else(|| profile.banner_url.as_deref().map(|r| (r, BackgroundSource::Banner)))
        .or_else(|| avatar.map(|r| (r, BackgroundSource::Avatar)));

    let (reference, source) = preferred?;
    match loader.load_reference(reference) {
        Ok(image) => return Some(BackgroundImage { image, source }),
        Err(err) => {
            tracing::warn!(
                reference = %truncate_for_log(reference, 30),
                error = %err,
                "{}",
                source.fallback_note()
            );
        }
    }

    if source == BackgroundSource::Avatar {
        return None;
    }
    let reference = avatar?;
    match loader.load_reference(reference) {
        Ok(image) => Some(BackgroundImage {
            image,
            source: BackgroundSource::Avatar,
        }),
        Err(err) => {
            tracing::warn!(
                reference = %truncate_for_log(reference, 30),
                error = %err,
                "{}",
                BackgroundSource::Avatar.fallback_note()
            );
            None
        }
    }
}

/// Avatar priority: custom > profile > generated placeholder.
fn resolve_avatar(
    loader: &dyn AssetLoader,
    profile: &UserProfile,
    options: &RenderOptions,
    typesetter: &Typesetter,
) -> Result<AvatarImage> {
    let preferred = options
        .custom_avatar
        .as_deref()
        .map(|r| (r, AvatarSource::Custom))
        .or_else(|| profile.avatar_url.as_deref().map(|r| (r, AvatarSource::Profile)));

    if let Some((reference, source)) = preferred {
        match loader.load_reference(reference) {
            Ok(image) => return Ok(AvatarImage { image, source }),
            Err(err) => {
                tracing::warn!(
                    reference = %truncate_for_log(reference, 30),
                    error = %err,
                    "could not load avatar, using fallback"
                );
            }
        }
    }

    let image = fallback_avatar::generate(&profile.id, display_name(profile, options), typesetter)?;
    Ok(AvatarImage {
        image,
        source: AvatarSource::Fallback,
    })
}

// ============================================================================
// Tests
// ============================================================================
