//! Card geometry: fixed dimensions, rounded-rect paths, gradient stops.
//!
//! Everything here is pure. Paths follow HTML canvas `roundRect` semantics:
//! a radius larger than half the shorter side is clamped, so a 225×225 box
//! with radius 225 becomes a circle.

use std::str::FromStr;

use palette::Srgb;
use resvg::tiny_skia::{
    Color, GradientStop, LinearGradient, Path, PathBuilder, Point, Rect, Shader, SpreadMode,
    Transform,
};
use serde::{Deserialize, Serialize};

use crate::error::{CardError, Result};

/// Width of the card and of every layer, in pixels.
pub const CARD_WIDTH: u32 = 885;

/// Height of the card and of every layer, in pixels.
pub const CARD_HEIGHT: u32 = 303;

/// Maximum number of colors accepted for a gradient option.
pub const MAX_GRADIENT_COLORS: usize = 20;

/// Control point distance for approximating a quarter circle with a cubic.
const KAPPA: f32 = 0.552_284_8;

// ============================================================================
// Bounds
// ============================================================================

/// An axis-aligned rectangle in card coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The full card area.
    pub const fn card() -> Self {
        Self::new(0.0, 0.0, CARD_WIDTH as f32, CARD_HEIGHT as f32)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Returns a copy with a different width, keeping the origin.
    pub fn with_width(self, width: f32) -> Self {
        Self { width, ..self }
    }
}

// ============================================================================
// Paths
// ============================================================================

/// Builds a rounded-rectangle path.
///
/// Returns `None` for empty rectangles, which callers treat as "draw nothing".
pub fn rounded_rect_path(bounds: Bounds, radius: f32) -> Option<Path> {
    if bounds.width <= 0.0 || bounds.height <= 0.0 {
        return None;
    }

    let r = radius
        .max(0.0)
        .min(bounds.width / 2.0)
        .min(bounds.height / 2.0);
    if r == 0.0 {
        let rect = Rect::from_xywh(bounds.x, bounds.y, bounds.width, bounds.height)?;
        return Some(PathBuilder::from_rect(rect));
    }

    let k = r * KAPPA;
    let (left, top, right, bottom) = (bounds.x, bounds.y, bounds.right(), bounds.bottom());

    let mut pb = PathBuilder::new();
    pb.move_to(left + r, top);
    pb.line_to(right - r, top);
    pb.cubic_to(right - r + k, top, right, top + r - k, right, top + r);
    pb.line_to(right, bottom - r);
    pb.cubic_to(right, bottom - r + k, right - r + k, bottom, right - r, bottom);
    pb.line_to(left + r, bottom);
    pb.cubic_to(left + r - k, bottom, left, bottom - r + k, left, bottom - r);
    pb.line_to(left, top + r);
    pb.cubic_to(left, top + r - k, left + r - k, top, left + r, top);
    pb.close();
    pb.finish()
}

/// Builds a circular path, used as a clip region.
pub fn circle_path(cx: f32, cy: f32, radius: f32) -> Option<Path> {
    PathBuilder::from_circle(cx, cy, radius)
}

// ============================================================================
// Gradients
// ============================================================================

/// Direction in which gradient colors are distributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum BorderAlign {
    /// Left to right.
    #[default]
    Horizontal,
    /// Top to bottom.
    Vertical,
}

/// Returns the vector along which stops are laid out for a box of the given size.
pub fn gradient_axis(align: BorderAlign, width: f32, height: f32) -> (f32, f32) {
    match align {
        BorderAlign::Horizontal => (width, 0.0),
        BorderAlign::Vertical => (0.0, height),
    }
}

/// Maps colors to evenly spaced stops in `[0, 1]`.
///
/// A single color yields one stop at 0; the `i / (n - 1)` spacing is only
/// computed when there are at least two colors.
pub fn color_stops(colors: &[Color]) -> Vec<(f32, Color)> {
    match colors {
        [] => Vec::new(),
        [only] => vec![(0.0, *only)],
        _ => {
            let last = (colors.len() - 1) as f32;
            colors
                .iter()
                .enumerate()
                .map(|(i, c)| (i as f32 / last, *c))
                .collect()
        }
    }
}

/// Parses a `#rgb` / `#rrggbb` hex color into an opaque color.
pub fn parse_color(option: &'static str, value: &str) -> Result<Color> {
    let rgb = Srgb::<u8>::from_str(value.trim())
        .map_err(|_| CardError::configuration(option, format!("'{value}' is not a hex color")))?;
    Ok(Color::from_rgba8(rgb.red, rgb.green, rgb.blue, 255))
}

/// Parses a hex color, falling back to `default` when the option is unset.
pub fn parse_color_or(option: &'static str, value: Option<&str>, default: Color) -> Result<Color> {
    value.map_or(Ok(default), |v| parse_color(option, v))
}

/// A validated list of 1 to [`MAX_GRADIENT_COLORS`] colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    colors: Vec<Color>,
}

impl Gradient {
    /// Validates and parses a list of hex colors for the named option.
    pub fn from_hex<S: AsRef<str>>(option: &'static str, colors: &[S]) -> Result<Self> {
        if colors.is_empty() {
            return Err(CardError::configuration(
                option,
                "at least one color is required",
            ));
        }
        if colors.len() > MAX_GRADIENT_COLORS {
            return Err(CardError::configuration(
                option,
                format!(
                    "length ({}) must be a maximum of {MAX_GRADIENT_COLORS} colors",
                    colors.len()
                ),
            ));
        }

        let colors = colors
            .iter()
            .map(|c| parse_color(option, c.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { colors })
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn stops(&self) -> Vec<(f32, Color)> {
        color_stops(&self.colors)
    }

    /// Builds a shader running from `start` to `end`.
    ///
    /// A single color degenerates to a flat fill.
    pub fn shader(&self, start: (f32, f32), end: (f32, f32)) -> Result<Shader<'static>> {
        if let [only] = self.colors.as_slice() {
            return Ok(Shader::SolidColor(*only));
        }

        let stops = self
            .stops()
            .into_iter()
            .map(|(pos, color)| GradientStop::new(pos, color))
            .collect();

        LinearGradient::new(
            Point::from_xy(start.0, start.1),
            Point::from_xy(end.0, end.1),
            stops,
            SpreadMode::Pad,
            Transform::identity(),
        )
        .ok_or_else(|| CardError::surface("gradient shader"))
    }
}

// ============================================================================
// Tests
// ============================================================================
