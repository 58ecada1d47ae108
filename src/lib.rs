//! profile-card: layered rendering of 885×303 user profile cards
//!
//! A card is built from independent layers (background, border, frame,
//! avatar and text, avatar decoration, badges, bot badge, XP bar) that are
//! each drawn onto their own transparent surface and then composited in a
//! fixed order, with an optional drop-shadow pass on top.
//!
//! # Example
//!
//! ```
//! use profile_card::{ColorSpec, ProfileCard, RankData, RenderOptions, UserProfile};
//!
//! let mut profile = UserProfile::new("80351110224678912", "ferris");
//! profile.global_name = Some("Ferris".into());
//!
//! let options = RenderOptions::new()
//!     .with_border_color(ColorSpec::list(["#f74c00", "#ffb000"]))
//!     .with_presence_status("online")
//!     .with_rank_data(RankData::new(420.0, 1000.0, 7.0).with_rank(3.0));
//!
//! // No avatar URL: a placeholder avatar is generated from the id and name.
//! let card = ProfileCard::default();
//! let image = card.render(&profile, &options).unwrap();
//! assert_eq!(image.dimensions(), (885, 303));
//! ```
//!
//! # Assets
//!
//! The crate performs no network I/O. Images are resolved through an
//! [`AssetLoader`]: [`LocalAssetLoader`] decodes files, base64 and raw bytes,
//! and [`MemoryAssetLoader`] serves bytes the caller fetched beforehand.
//!
//! # JSON Input
//!
//! [`UserProfile`] and [`RenderOptions`] use camelCase JSON:
//!
//! ```
//! use profile_card::RenderOptions;
//!
//! let options = RenderOptions::from_json(
//!     r##"{ "borderColor": "#ff0000", "borderAllign": "vertical", "squareAvatar": true }"##,
//! )
//! .unwrap();
//! assert!(options.square_avatar);
//! ```

pub mod assets;
mod card;
mod compositor;
mod error;
pub mod fallback_avatar;
pub mod geometry;
pub mod layer;
mod options;
mod profile;
pub mod text;

pub use assets::{
    AssetLoader, BadgeDescriptor, BadgeReport, ImageSource, LocalAssetLoader, MemoryAssetLoader,
    ResolvedAssets, SkippedBadge,
};
pub use card::ProfileCard;
pub use compositor::Compositor;
pub use error::{AssetDecodeError, CardError, Result};
pub use geometry::{Bounds, BorderAlign, Gradient};
pub use layer::{Layer, LayerKind, LayerRenderer, RenderContext};
pub use options::{ColorSpec, PresenceStatus, RankData, RankValues, RenderOptions};
pub use profile::{AI_ACCOUNT_ID, UserProfile};
pub use text::Typesetter;
