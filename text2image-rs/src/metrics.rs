//! Text measurement and glyph outline extraction using cosmic-text.

use crate::error::Text2ImageResult;
use cosmic_text::{
    Attrs, Buffer, CacheKeyFlags, Command, Family, FontSystem, Metrics, Shaping, SwashCache,
};

/// Font selection and size for a measurement or render.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    /// Font family name. None selects the sans-serif family.
    pub family: Option<String>,
    /// Font size in pixels.
    pub size_px: f32,
}

/// Measured extents of a glyph run, relative to its baseline origin.
///
/// `left`/`top`/`right`/`bottom` bound the glyph ink (the actually drawn
/// outlines), with y growing downward, so `top` is negative for ink above
/// the baseline. Ascent and descent are font-metric distances to the top and
/// bottom of the em box, independent of the specific glyphs' ink.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextMetrics {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub ascent: f32,
    pub descent: f32,
    /// Advance width of the run.
    pub width: f32,
}

impl TextMetrics {
    /// Width of the ink bounding box.
    pub fn ink_width(&self) -> f32 {
        self.right - self.left
    }

    /// Height of the ink bounding box.
    pub fn ink_height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Height of the ascent + descent envelope.
    pub fn envelope(&self) -> f32 {
        self.ascent + self.descent
    }
}

/// A glyph outline path positioned relative to the run's baseline origin.
pub(crate) struct PositionedGlyph {
    pub path: tiny_skia::Path,
    pub x: f32,
    pub y: f32,
}

/// A shaped run: the outline of every glyph plus the run's metrics.
pub(crate) struct ShapedRun {
    pub glyphs: Vec<PositionedGlyph>,
    pub metrics: TextMetrics,
}

/// Shape `text` and build the outline path of every glyph, positioned
/// relative to a baseline origin at (0, 0).
///
/// Deterministic for identical (font, text) pairs: hinting is disabled and
/// glyph outlines come straight from the font tables. Glyphs without an
/// outline (whitespace, some fallback glyphs) contribute advance width but
/// no ink.
pub(crate) fn shape_run(
    font_system: &mut FontSystem,
    swash_cache: &mut SwashCache,
    font: &FontSpec,
    text: &str,
) -> Text2ImageResult<ShapedRun> {
    let metrics = Metrics::new(font.size_px, font.size_px * 1.2);
    let mut buffer = Buffer::new(font_system, metrics);

    let family = font
        .family
        .as_deref()
        .map(Family::Name)
        .unwrap_or(Family::SansSerif);

    // Disable hinting so identical (font, text) pairs rasterize identically
    // regardless of the pixel grid.
    let attrs = Attrs::new()
        .family(family)
        .cache_key_flags(CacheKeyFlags::DISABLE_HINTING);

    buffer.set_text(font_system, text, &attrs, Shaping::Advanced, None);
    buffer.shape_until_scroll(font_system, false);

    let mut width: f32 = 0.0;
    let mut ascent: f32 = 0.0;
    let mut descent: f32 = 0.0;
    let mut glyphs = Vec::new();
    let mut bounds: Option<(f32, f32, f32, f32)> = None;

    for run in buffer.layout_runs() {
        width = width.max(run.line_w);
        ascent = ascent.max(run.line_y - run.line_top);
        descent = descent.max((run.line_top + run.line_height) - run.line_y);

        for glyph in run.glyphs.iter() {
            let physical = glyph.physical((0.0, 0.0), 1.0);
            let glyph_x = glyph.x + glyph.font_size * glyph.x_offset;
            let glyph_y = glyph.y - glyph.font_size * glyph.y_offset;

            let Some(commands) =
                swash_cache.get_outline_commands(font_system, physical.cache_key)
            else {
                continue;
            };

            // Font outlines have Y pointing up, the canvas has Y pointing
            // down, so Y coordinates are negated during path building.
            let mut path_builder = tiny_skia::PathBuilder::new();
            for cmd in commands {
                match cmd {
                    Command::MoveTo(p) => path_builder.move_to(p.x, -p.y),
                    Command::LineTo(p) => path_builder.line_to(p.x, -p.y),
                    Command::QuadTo(ctrl, end) => {
                        path_builder.quad_to(ctrl.x, -ctrl.y, end.x, -end.y)
                    }
                    Command::CurveTo(c1, c2, end) => {
                        path_builder.cubic_to(c1.x, -c1.y, c2.x, -c2.y, end.x, -end.y)
                    }
                    Command::Close => path_builder.close(),
                }
            }
            let Some(path) = path_builder.finish() else {
                continue;
            };

            let b = path.bounds();
            let (left, top, right, bottom) = (
                b.left() + glyph_x,
                b.top() + glyph_y,
                b.right() + glyph_x,
                b.bottom() + glyph_y,
            );
            bounds = Some(match bounds {
                None => (left, top, right, bottom),
                Some((l, t, r, btm)) => {
                    (l.min(left), t.min(top), r.max(right), btm.max(bottom))
                }
            });
            glyphs.push(PositionedGlyph {
                path,
                x: glyph_x,
                y: glyph_y,
            });
        }
    }

    if ascent == 0.0 && descent == 0.0 {
        // Empty run: fall back to em-box fractions.
        ascent = font.size_px * 0.8;
        descent = font.size_px * 0.2;
    }

    let (left, top, right, bottom) = bounds.unwrap_or((0.0, 0.0, 0.0, 0.0));
    Ok(ShapedRun {
        glyphs,
        metrics: TextMetrics {
            left,
            top,
            right,
            bottom,
            ascent,
            descent,
            width,
        },
    })
}

/// Measure a string: ink bounding box, ascent/descent, and advance width.
pub fn measure(
    font_system: &mut FontSystem,
    swash_cache: &mut SwashCache,
    font: &FontSpec,
    text: &str,
) -> Text2ImageResult<TextMetrics> {
    Ok(shape_run(font_system, swash_cache, font, text)?.metrics)
}
