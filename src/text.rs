//! Text measurement, layout and drawing.
//!
//! Text is rendered by building a small SVG document of `<text>` runs and
//! rasterizing it with resvg. Measurement parses the same markup and reads
//! the bounding box of the resulting text node, so drawing and measuring
//! always agree on glyph widths.

use std::fmt::Write as _;
use std::sync::Arc;

use chrono::DateTime;
use resvg::tiny_skia::{Color, Pixmap, Transform};
use resvg::usvg::{self, Node, Options, Tree, fontdb};

use crate::error::{CardError, Result};

/// Font stack used for all card text.
pub const FONT_FAMILY: &str = "Helvetica, Arial, sans-serif";

/// Placeholder appended to truncated text.
pub const ELLIPSIS: char = '…';

// ============================================================================
// Font / TextRun
// ============================================================================

/// Size and weight of a text run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    pub size: f32,
    pub bold: bool,
}

impl Font {
    pub const fn regular(size: f32) -> Self {
        Self { size, bold: false }
    }

    pub const fn bold(size: f32) -> Self {
        Self { size, bold: true }
    }
}

/// Horizontal alignment relative to the run's x coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    #[default]
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_svg(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// A single line of text placed on a layer. `y` is the alphabetic baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font: Font,
    pub color: Color,
    pub anchor: Anchor,
    /// Centers the glyphs vertically on `y` instead of sitting on it.
    pub middle_baseline: bool,
}

impl TextRun {
    pub fn new(text: impl Into<String>, x: f32, y: f32, font: Font, color: Color) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font,
            color,
            anchor: Anchor::Start,
            middle_baseline: false,
        }
    }

    pub fn anchored(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn centered_vertically(mut self) -> Self {
        self.middle_baseline = true;
        self
    }

    fn write_svg(&self, out: &mut String) {
        let [r, g, b, a] = {
            let c = self.color.to_color_u8();
            [c.red(), c.green(), c.blue(), c.alpha()]
        };
        let _ = write!(
            out,
            r##"<text x="{}" y="{}" font-family="{}" font-size="{}" font-weight="{}" text-anchor="{}" fill="#{:02x}{:02x}{:02x}" fill-opacity="{}"{}>{}</text>"##,
            self.x,
            self.y,
            FONT_FAMILY,
            self.font.size,
            if self.font.bold { "bold" } else { "normal" },
            self.anchor.as_svg(),
            r,
            g,
            b,
            a as f32 / 255.0,
            if self.middle_baseline {
                r#" dominant-baseline="central""#
            } else {
                ""
            },
            escape_xml(&self.text),
        );
    }
}

// ============================================================================
// Typesetter
// ============================================================================

/// Measures and rasterizes text against a font database.
///
/// The database is loaded once and shared; a typesetter carries no
/// per-render state.
#[derive(Clone)]
pub struct Typesetter {
    fontdb: Arc<fontdb::Database>,
}

impl Typesetter {
    /// Uses the given font database.
    pub fn new(fontdb: fontdb::Database) -> Self {
        Self {
            fontdb: Arc::new(fontdb),
        }
    }

    /// Loads every font installed on the system.
    pub fn system() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");
        Self::new(db)
    }

    /// Loads fonts from raw font file data (TTF/OTF).
    pub fn from_font_data(fonts: impl IntoIterator<Item = Vec<u8>>) -> Self {
        let mut db = fontdb::Database::new();
        for data in fonts {
            db.load_font_data(data);
        }
        Self::new(db)
    }

    /// Returns the number of font faces available.
    pub fn face_count(&self) -> usize {
        self.fontdb.len()
    }

    fn options(&self) -> Options<'static> {
        let mut opts = Options::default();
        opts.fontdb = Arc::clone(&self.fontdb);
        opts
    }

    /// Returns the rendered width of `text` in pixels.
    ///
    /// Text that cannot be shaped (no matching font) measures 0.
    pub fn measure(&self, text: &str, font: Font) -> f32 {
        if text.is_empty() {
            return 0.0;
        }

        let run = TextRun::new(text, 0.0, font.size, font, Color::BLACK);
        let mut svg = String::from(r#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1" xml:space="preserve">"#);
        run.write_svg(&mut svg);
        svg.push_str("</svg>");

        let Ok(tree) = Tree::from_str(&svg, &self.options()) else {
            return 0.0;
        };
        tree.root()
            .children()
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.bounding_box().width()),
                _ => None,
            })
            .sum()
    }

    /// Rasterizes `runs` onto a transparent pixmap of the given size.
    pub fn render(&self, runs: &[TextRun], width: u32, height: u32) -> Result<Pixmap> {
        let mut pixmap =
            Pixmap::new(width, height).ok_or_else(|| CardError::surface("text pixmap"))?;
        if runs.is_empty() {
            return Ok(pixmap);
        }

        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" xml:space="preserve">"#
        );
        for run in runs {
            run.write_svg(&mut svg);
        }
        svg.push_str("</svg>");

        let tree = Tree::from_str(&svg, &self.options())
            .map_err(|e: usvg::Error| CardError::surface(format!("text document: {e}")))?;
        resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());
        Ok(pixmap)
    }
}

impl std::fmt::Debug for Typesetter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Typesetter")
            .field("faces", &self.fontdb.len())
            .finish()
    }
}

/// Escapes markup characters and drops characters XML 1.0 does not allow.
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\t' | '\n' | '\r' => out.push(c),
            c if (c as u32) < 0x20 || c == '\u{fffe}' || c == '\u{ffff}' => {}
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

// ============================================================================
// Layout helpers
// ============================================================================

/// Text resized (and if needed truncated) to fit a width budget.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedText {
    pub text: String,
    pub size: f32,
    pub width: f32,
}

/// Fits `text` into `budget` pixels.
///
/// Shrinks the font 1px at a time from `base_size` down to `min_size`; if the
/// text is still too wide it drops trailing characters and appends an
/// ellipsis. `measure(text, size)` must be deterministic, so the same input
/// always yields the same result.
pub fn fit_text(
    text: &str,
    base_size: f32,
    min_size: f32,
    budget: f32,
    measure: impl Fn(&str, f32) -> f32,
) -> FittedText {
    let mut size = base_size;
    let mut width = measure(text, size);
    while width > budget && size - 1.0 >= min_size {
        size -= 1.0;
        width = measure(text, size);
    }

    if width <= budget {
        return FittedText {
            text: text.to_string(),
            size,
            width,
        };
    }

    let chars: Vec<char> = text.chars().collect();
    let truncated = |keep: usize| {
        let mut candidate: String = chars[..keep].iter().collect();
        candidate.truncate(candidate.trim_end().len());
        candidate.push(ELLIPSIS);
        let width = measure(&candidate, size);
        (candidate, width)
    };

    // Width grows with the kept prefix, so search for the longest one that fits.
    let (mut lo, mut hi) = (0, chars.len().saturating_sub(1));
    while lo < hi {
        let mid = lo + (hi - lo).div_ceil(2);
        if truncated(mid).1 <= budget {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }

    let (text, width) = truncated(lo);
    FittedText { text, size, width }
}

/// Shortens large numbers: `1500` becomes `1.5K`, `2000000` becomes `2M`.
pub fn abbreviate_number(value: f64) -> String {
    const SUFFIXES: [&str; 5] = ["", "K", "M", "B", "T"];

    if !value.is_finite() {
        return String::new();
    }

    let magnitude = value.abs();
    let mut tier = 0;
    while tier + 1 < SUFFIXES.len() && magnitude >= 1000f64.powi(tier as i32 + 1) {
        tier += 1;
    }

    let round_at = |tier: usize| (value / 1000f64.powi(tier as i32) * 10.0).round() / 10.0;
    let mut rounded = round_at(tier);
    if rounded.abs() >= 1000.0 && tier + 1 < SUFFIXES.len() {
        tier += 1;
        rounded = round_at(tier);
    }
    let mut out = if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{rounded:.1}")
    };
    out.push_str(SUFFIXES[tier]);
    out
}

/// Formats an account creation timestamp (ms since epoch) as `Jan 1, 2021`.
pub fn format_created_date(timestamp_ms: i64) -> Option<String> {
    DateTime::from_timestamp_millis(timestamp_ms).map(|dt| dt.format("%b %-d, %Y").to_string())
}

/// Returns the custom date if set, otherwise the formatted timestamp.
pub fn date_text(custom: Option<&str>, timestamp_ms: Option<i64>) -> String {
    match custom {
        Some(custom) => custom.to_string(),
        None => timestamp_ms
            .and_then(format_created_date)
            .unwrap_or_default(),
    }
}

/// Truncates a reference for log output.
pub fn truncate_for_log(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Every character is half the font size wide.
    fn fake_measure(text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size * 0.5
    }

    #[test]
    fn short_text_keeps_base_size() {
        let fitted = fit_text("ferris", 80.0, 45.0, 555.0, fake_measure);
        assert_eq!(fitted.text, "ferris");
        assert_eq!(fitted.size, 80.0);
        assert_eq!(fitted.width, 240.0);
    }

    #[test]
    fn long_text_shrinks_until_it_fits() {
        // 16 chars: fits at size <= 69.375 for a 555 budget
        let fitted = fit_text("abcdefghijklmnop", 80.0, 45.0, 555.0, fake_measure);
        assert_eq!(fitted.text, "abcdefghijklmnop");
        assert_eq!(fitted.size, 69.0);
        assert!(fitted.width <= 555.0);
    }

    #[test]
    fn fitting_is_deterministic_and_monotonic() {
        let a = fit_text("a reasonably long display name", 80.0, 45.0, 470.0, fake_measure);
        let b = fit_text("a reasonably long display name", 80.0, 45.0, 470.0, fake_measure);
        assert_eq!(a, b);

        let wider = fit_text("a reasonably long display name", 80.0, 45.0, 555.0, fake_measure);
        assert!(wider.size >= a.size);
    }

    #[test]
    fn overlong_text_is_truncated_at_min_size() {
        let name = "x".repeat(40);
        let fitted = fit_text(&name, 80.0, 45.0, 470.0, fake_measure);
        assert_eq!(fitted.size, 45.0);
        assert!(fitted.text.ends_with(ELLIPSIS));
        assert!(fitted.width <= 470.0);
        // 470 / 22.5 = 20.8 chars, so 19 x's plus the ellipsis
        assert_eq!(fitted.text.chars().count(), 20);
    }

    #[test]
    fn abbreviates_numbers() {
        assert_eq!(abbreviate_number(0.0), "0");
        assert_eq!(abbreviate_number(999.0), "999");
        assert_eq!(abbreviate_number(1500.0), "1.5K");
        assert_eq!(abbreviate_number(2_000_000.0), "2M");
        assert_eq!(abbreviate_number(12.5), "12.5");
        assert_eq!(abbreviate_number(-4200.0), "-4.2K");
    }

    #[test]
    fn rounding_up_moves_to_the_next_suffix() {
        assert_eq!(abbreviate_number(999_950.0), "1M");
        assert_eq!(abbreviate_number(999_949.0), "999.9K");
        assert_eq!(abbreviate_number(999.96), "1K");
    }

    #[test]
    fn formats_creation_date() {
        // 2021-01-01T00:00:00Z
        assert_eq!(
            format_created_date(1_609_459_200_000).as_deref(),
            Some("Jan 1, 2021")
        );
        assert_eq!(date_text(Some("Since forever"), Some(0)), "Since forever");
        assert_eq!(date_text(None, None), "");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_xml("<b>&\"'"), "&lt;b&gt;&amp;&quot;&apos;");
    }

    #[test]
    fn drops_characters_xml_forbids() {
        assert_eq!(escape_xml("fer\u{1}ris\u{fffe}"), "ferris");
        assert_eq!(escape_xml("a\tb\nc"), "a\tb\nc");
    }

    #[test]
    fn control_characters_still_render() {
        let typesetter = Typesetter::new(fontdb::Database::new());
        let run = TextRun::new("fer\u{1}ris", 0.0, 20.0, Font::bold(20.0), Color::WHITE);
        assert!(typesetter.render(&[run], 100, 40).is_ok());
    }

    #[test]
    fn very_long_text_truncates_with_few_measurements() {
        use std::cell::Cell;

        let calls = Cell::new(0);
        let name = "x".repeat(10_000);
        let fitted = fit_text(&name, 80.0, 45.0, 470.0, |text, size| {
            calls.set(calls.get() + 1);
            fake_measure(text, size)
        });
        assert_eq!(fitted.text.chars().count(), 20);
        assert!(calls.get() < 100, "{} measurements", calls.get());
    }

    #[test]
    fn text_run_svg_carries_color_and_anchor() {
        let run = TextRun::new("hi", 775.0, 273.0, Font::regular(23.0), Color::from_rgba8(0xda, 0xda, 0xda, 255))
            .anchored(Anchor::Middle);
        let mut svg = String::new();
        run.write_svg(&mut svg);
        assert!(svg.contains(r##"fill="#dadada""##));
        assert!(svg.contains(r#"text-anchor="middle""#));
        assert!(svg.contains(r#"font-weight="normal""#));
    }

    #[test]
    fn empty_font_database_measures_zero() {
        let typesetter = Typesetter::new(fontdb::Database::new());
        assert_eq!(typesetter.face_count(), 0);
        assert_eq!(typesetter.measure("ferris", Font::bold(80.0)), 0.0);
        assert_eq!(typesetter.measure("", Font::bold(80.0)), 0.0);
    }

    #[test]
    fn render_without_runs_is_transparent() {
        let typesetter = Typesetter::new(fontdb::Database::new());
        let pixmap = typesetter.render(&[], 10, 10).unwrap();
        assert!(pixmap.pixels().iter().all(|p| p.alpha() == 0));
    }

    #[test]
    fn truncates_log_references() {
        assert_eq!(truncate_for_log("short", 30), "short");
        let long = "a".repeat(40);
        assert_eq!(truncate_for_log(&long, 30), format!("{}...", "a".repeat(30)));
    }
}
