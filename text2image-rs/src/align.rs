//! Baseline alignment: placing the draw origin within the planned canvas.

use crate::metrics::TextMetrics;
use crate::plan::{inflated_ink, BatchEnvelope, ShadowMargins};
use crate::request::{BaselinePolicy, RenderRequest};

/// Compute the draw origin (baseline anchor) for one item.
///
/// The interior is the canvas minus padding and the reserved shadow margins.
/// The ink bbox is always centered horizontally; the vertical rule depends on
/// the baseline policy. The result is clamped so glyph ink stays inside the
/// canvas — which degrades exact centering when the requested minimum size is
/// too small, by design of the clamp, not as an error — and snapped to whole
/// pixels so baseline rows are comparable across images.
pub(crate) fn draw_origin(
    metrics: &TextMetrics,
    request: &RenderRequest,
    envelope: &BatchEnvelope,
    margins: &ShadowMargins,
    width: u32,
    height: u32,
) -> (i32, i32) {
    let (left, top, right, bottom) = inflated_ink(metrics, request.stroke_width);

    let interior_left = request.pad_x as f32 + margins.left;
    let interior_right = width as f32 - request.pad_x as f32 - margins.right;
    let interior_top = request.pad_y as f32 + margins.top;
    let interior_bottom = height as f32 - request.pad_y as f32 - margins.bottom;

    let center_x = (interior_left + interior_right) / 2.0;
    let center_y = (interior_top + interior_bottom) / 2.0;

    // Horizontal: center the ink bbox regardless of policy.
    let ideal_x = center_x - (left + right) / 2.0;

    let ideal_y = match request.baseline {
        BaselinePolicy::None => center_y - (top + bottom) / 2.0,
        // The baseline sits at the ascent fraction of the centered envelope,
        // the same row for every glyph of the font.
        BaselinePolicy::Broad => center_y + (metrics.ascent - metrics.descent) / 2.0,
        // Same, but for the batch-wide envelope: one absolute baseline row
        // shared by every image in the batch.
        BaselinePolicy::Perfect => center_y + (envelope.ascent - envelope.descent) / 2.0,
    };

    // Keep glyph ink inside the canvas. The upper bound wins when the canvas
    // is too small to honor both.
    let x = clamp(ideal_x, -left, width as f32 - right);
    let y = clamp(ideal_y, -top, height as f32 - bottom);

    (x.round() as i32, y.round() as i32)
}

fn clamp(value: f32, lower: f32, upper: f32) -> f32 {
    value.max(lower).min(upper)
}
