//! Placeholder avatar for users without a loadable avatar image.
//!
//! The image is a pure function of the user id and display name: a colored
//! disc picked from a fixed palette by the last hex digit of the id, with
//! the first letter of the name in white on top.

use image::RgbaImage;
use resvg::tiny_skia::{Color, FillRule, Paint, Pixmap, PixmapPaint, Transform};

use crate::error::{CardError, Result};
use crate::geometry::circle_path;
use crate::layer::svg::pixmap_to_rgba_image;
use crate::text::{Anchor, Font, TextRun, Typesetter};

/// Width and height of the generated avatar.
pub const FALLBACK_AVATAR_SIZE: u32 = 512;

/// Default avatar colors, indexed by the last hex digit of the id modulo 10.
pub const DEFAULT_AVATAR_COLORS: [[u8; 3]; 10] = [
    [0xfa, 0xa6, 0x1a],
    [0xf0, 0x47, 0x47],
    [0x74, 0x7f, 0x8d],
    [0x43, 0xb5, 0x81],
    [0xfa, 0xa6, 0x1a],
    [0xf0, 0x47, 0x47],
    [0x74, 0x7f, 0x8d],
    [0x43, 0xb5, 0x81],
    [0xfa, 0xa6, 0x1a],
    [0xf0, 0x47, 0x47],
];

/// Palette index for a user id. Ids not ending in a hex digit use index 0.
pub fn palette_index(user_id: &str) -> usize {
    user_id
        .chars()
        .last()
        .and_then(|c| c.to_digit(16))
        .map_or(0, |digit| digit as usize % DEFAULT_AVATAR_COLORS.len())
}

/// Background color for a user id.
pub fn avatar_color(user_id: &str) -> Color {
    let [r, g, b] = DEFAULT_AVATAR_COLORS[palette_index(user_id)];
    Color::from_rgba8(r, g, b, 255)
}

/// The uppercased first letter of the name, or `U` for an empty name.
pub fn initial(display_name: &str) -> String {
    display_name
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "U".to_string())
}

/// Draws the placeholder avatar.
pub fn generate(user_id: &str, display_name: &str, typesetter: &Typesetter) -> Result<RgbaImage> {
    let size = FALLBACK_AVATAR_SIZE;
    let center = size as f32 / 2.0;

    let mut pixmap = Pixmap::new(size, size).ok_or_else(|| CardError::surface("fallback avatar"))?;
    let disc = circle_path(center, center, center).ok_or_else(|| CardError::surface("avatar disc"))?;
    let mut paint = Paint::default();
    paint.set_color(avatar_color(user_id));
    paint.anti_alias = true;
    pixmap.fill_path(&disc, &paint, FillRule::Winding, Transform::identity(), None);

    let run = TextRun::new(initial(display_name), center, center, Font::bold(300.0), Color::WHITE)
        .anchored(Anchor::Middle)
        .centered_vertically();
    let text = typesetter.render(&[run], size, size)?;
    pixmap.draw_pixmap(0, 0, text.as_ref(), &PixmapPaint::default(), Transform::identity(), None);

    Ok(pixmap_to_rgba_image(&pixmap))
}
