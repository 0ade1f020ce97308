//! Canvas sizing: final dimensions and draw origin from requested minimums,
//! padding, and measured text extents.

use crate::align;
use crate::metrics::TextMetrics;
use crate::request::{BaselinePolicy, RenderRequest, Shadow};

/// Final canvas dimensions and the draw origin for one text item.
///
/// The origin is where the run's baseline anchor lands, snapped to whole
/// pixels. Computed once per item and immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasPlan {
    pub width: u32,
    pub height: u32,
    pub origin_x: i32,
    pub origin_y: i32,
}

/// Batch-wide maximum ascent/descent, the only state shared between items.
///
/// [`BaselinePolicy::Perfect`] sizes every canvas in a batch for this
/// envelope so each image gets the same height and baseline row.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BatchEnvelope {
    pub ascent: f32,
    pub descent: f32,
}

/// Per-side space reserved for the offset and blurred shadow silhouette, so
/// auto-fit canvases don't clip it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct ShadowMargins {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl ShadowMargins {
    pub(crate) fn new(shadow: Option<&Shadow>) -> Self {
        match shadow {
            None => Self::default(),
            Some(shadow) => {
                let blur = shadow.blur.max(0.0).ceil();
                let (dx, dy) = (shadow.offset.0 as f32, shadow.offset.1 as f32);
                Self {
                    left: (blur - dx).max(0.0),
                    right: (blur + dx).max(0.0),
                    top: (blur - dy).max(0.0),
                    bottom: (blur + dy).max(0.0),
                }
            }
        }
    }
}

/// Ink bounds inflated by half the stroke width per side (the stroke is
/// centered on the glyph path).
pub(crate) fn inflated_ink(metrics: &TextMetrics, stroke_width: f32) -> (f32, f32, f32, f32) {
    let half = stroke_width.max(0.0) / 2.0;
    (
        metrics.left - half,
        metrics.top - half,
        metrics.right + half,
        metrics.bottom + half,
    )
}

/// Natural height of an item under the given baseline policy.
///
/// The envelope policies add the full stroke width so stroked runs still fit
/// an auto-sized canvas.
fn natural_height(
    metrics: &TextMetrics,
    policy: BaselinePolicy,
    envelope: &BatchEnvelope,
    stroke_width: f32,
) -> f32 {
    match policy {
        BaselinePolicy::None => {
            let (_, top, _, bottom) = inflated_ink(metrics, stroke_width);
            (bottom - top).max(0.0)
        }
        BaselinePolicy::Broad => metrics.envelope() + stroke_width,
        BaselinePolicy::Perfect => envelope.ascent + envelope.descent + stroke_width,
    }
}

/// Compute the canvas plan for one measured item.
///
/// Final width/height are `max(minimum, natural + shadow margins + 2 *
/// padding)` per axis; a minimum of 0 shrinks the canvas exactly to the
/// required size. The draw origin places the run under the request's
/// baseline policy, clamped so glyph ink stays inside the canvas.
pub fn plan(metrics: &TextMetrics, request: &RenderRequest, envelope: &BatchEnvelope) -> CanvasPlan {
    let (left, _, right, _) = inflated_ink(metrics, request.stroke_width);
    let margins = ShadowMargins::new(request.shadow.as_ref());

    let natural_width = (right - left).max(0.0);
    let natural_height = natural_height(metrics, request.baseline, envelope, request.stroke_width);

    let required_width =
        natural_width + margins.left + margins.right + 2.0 * request.pad_x as f32;
    let required_height =
        natural_height + margins.top + margins.bottom + 2.0 * request.pad_y as f32;

    let mut width = request.min_width.max(required_width.ceil() as u32);
    let mut height = request.min_height.max(required_height.ceil() as u32);

    if let Some(ratio) = request.aspect_ratio {
        (width, height) = apply_aspect_ratio(width, height, ratio);
    }

    // A degenerate run with no padding still needs a non-zero pixmap.
    let width = width.max(1);
    let height = height.max(1);

    let (origin_x, origin_y) = align::draw_origin(metrics, request, envelope, &margins, width, height);
    CanvasPlan {
        width,
        height,
        origin_x,
        origin_y,
    }
}

/// Grow the canvas, never shrink it, until it matches the requested
/// width/height ratio.
fn apply_aspect_ratio(width: u32, height: u32, ratio: f32) -> (u32, u32) {
    let desired_width = ((height as f32 * ratio) as u32).max(width);
    let desired_height = ((width as f32 / ratio) as u32).max(height);
    if desired_width > desired_height {
        (desired_width, ((desired_width as f32 / ratio) as u32).max(1))
    } else {
        (
            ((desired_height as f32 * ratio) as u32).max(1),
            desired_height,
        )
    }
}
