//! XP bar layer: XP, rank and level text and the clipped progress fill.

use resvg::tiny_skia::{BlendMode, Color, Shader};

use super::{BACKING_ALPHA, Layer, LayerKind, LayerRenderer, RenderContext, muted_text_color, with_opacity};
use crate::error::{CardError, Result};
use crate::geometry::{Bounds, parse_color_or, rounded_rect_path};
use crate::options::{RankData, RankValues};
use crate::text::{Anchor, Font, TextRun, abbreviate_number};

/// Progress track; the fill is clipped to it.
pub const TRACK: Bounds = Bounds::new(304.0, 179.0, 557.0, 36.0);

pub const TRACK_RADIUS: f32 = 14.0;

/// Width of a full progress fill.
pub const TRACK_FILL_WIDTH: f32 = 556.0;

const TEXT_BACKING: Bounds = Bounds::new(304.0, 248.0, 380.0, 33.0);

/// Right edge of the level text.
const LEVEL_RIGHT: f32 = 674.0;

const TEXT_BASELINE: f32 = 273.0;

/// Fill width for `current` out of `required` XP on a track of `track` pixels.
///
/// The result is rounded and clamped to `[0, track]`. A non-positive
/// requirement counts as complete once any XP has been earned.
pub fn progress_width(current: f64, required: f64, track: f32) -> f32 {
    if required <= 0.0 {
        return if current > 0.0 { track } else { 0.0 };
    }
    let width = (current * f64::from(track) / required).round();
    width.clamp(0.0, f64::from(track)) as f32
}

/// Rank text color: gold, silver and bronze for the top three when enabled.
pub fn rank_color(rank: f64, auto_color: bool) -> Color {
    if !auto_color {
        return muted_text_color();
    }
    match rank {
        r if r == 1.0 => Color::from_rgba8(0xf1, 0xc4, 0x0f, 255),
        r if r == 2.0 => Color::from_rgba8(0xa1, 0xa4, 0xc9, 255),
        r if r == 3.0 => Color::from_rgba8(0xad, 0x8a, 0x56, 255),
        _ => muted_text_color(),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct XpBarLayer;

impl XpBarLayer {
    fn text_runs(&self, ctx: &RenderContext<'_>, rank_data: &RankData, values: &RankValues) -> Result<Vec<TextRun>> {
        let level_color = parse_color_or(
            "levelColor",
            rank_data.level_color.as_deref(),
            muted_text_color(),
        )?;
        let label = Font::bold(21.0);
        let level = format!("Lvl {}", abbreviate_number(values.level));

        let mut runs = vec![TextRun::new(
            format!(
                "{} / {} XP",
                abbreviate_number(values.current_xp),
                abbreviate_number(values.required_xp)
            ),
            314.0,
            TEXT_BASELINE,
            Font::regular(21.0),
            muted_text_color(),
        )];

        if let Some(rank) = values.rank {
            let right = LEVEL_RIGHT - ctx.typesetter.measure(&level, label) - 10.0;
            runs.push(
                TextRun::new(
                    format!("RANK #{}", abbreviate_number(rank)),
                    right,
                    TEXT_BASELINE,
                    label,
                    rank_color(rank, rank_data.auto_color_rank),
                )
                .anchored(Anchor::End),
            );
        }

        runs.push(
            TextRun::new(level, LEVEL_RIGHT, TEXT_BASELINE, label, level_color)
                .anchored(Anchor::End),
        );
        Ok(runs)
    }
}

impl LayerRenderer for XpBarLayer {
    const KIND: LayerKind = LayerKind::XpBar;

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Option<Layer>> {
        let Some(rank_data) = &ctx.options.rank_data else {
            return Ok(None);
        };
        let values = rank_data.values()?;
        let bar = rank_data
            .bar_color
            .as_ref()
            .map(|spec| spec.gradient("barColor"))
            .transpose()?;
        let runs = self.text_runs(ctx, rank_data, &values)?;

        let mut layer = Layer::new()?;
        let backing = with_opacity(Color::BLACK, BACKING_ALPHA);
        layer.fill_rounded_rect(TEXT_BACKING, 12.0, backing);
        layer.draw_text(ctx.typesetter, &runs)?;

        layer.fill_rounded_rect(TRACK, TRACK_RADIUS, backing);
        let track = rounded_rect_path(TRACK, TRACK_RADIUS)
            .ok_or_else(|| CardError::surface("xp track"))?;
        let clip = Layer::clip_mask(&track)?;

        let width = progress_width(values.current_xp, values.required_xp, TRACK_FILL_WIDTH);
        if let Some(fill) = rounded_rect_path(TRACK.with_width(width), TRACK_RADIUS) {
            let shader = match &bar {
                Some(gradient) => gradient.shader((304.0, 197.0), (860.0, 197.0))?,
                None => Shader::SolidColor(Color::WHITE),
            };
            layer.fill_path(&fill, shader, BlendMode::SourceOver, Some(&clip));
        }

        tracing::debug!(
            current = values.current_xp,
            required = values.required_xp,
            width,
            "rendered xp bar"
        );
        Ok(Some(layer))
    }
}

// ============================================================================
// Tests
// ============================================================================
