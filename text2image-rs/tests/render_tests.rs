//! End-to-end rendering tests.
//!
//! These tests shape and rasterize real glyphs, so they need at least one
//! usable font on the machine; each one skips with a note when none is found.

use std::sync::OnceLock;
use text2image_rs::{
    BaselinePolicy, FontConfig, FontSpec, RenderRequest, Rgba, Shadow, TextRenderer,
};

fn fonts_available() -> bool {
    static AVAILABLE: OnceLock<bool> = OnceLock::new();
    *AVAILABLE.get_or_init(|| FontConfig::default().resolve().is_ok())
}

macro_rules! skip_if_no_fonts {
    () => {
        if !fonts_available() {
            eprintln!("Skipping test: no system fonts available.");
            return;
        }
    };
}

fn renderer() -> TextRenderer {
    TextRenderer::new().expect("renderer should build with system fonts")
}

fn alpha_at(data: &[u8], width: u32, x: u32, y: u32) -> u8 {
    data[((y * width + x) * 4 + 3) as usize]
}

#[test]
fn test_measure_is_deterministic() {
    skip_if_no_fonts!();
    let mut renderer = renderer();
    let font = FontSpec {
        family: None,
        size_px: 42.0,
    };
    let first = renderer.measure(&font, "Text2Image").unwrap();
    let second = renderer.measure(&font, "Text2Image").unwrap();
    assert_eq!(first, second);
    assert!(first.ink_width() > 0.0);
    assert!(first.ascent > 0.0);
}

#[test]
fn test_render_is_idempotent() {
    skip_if_no_fonts!();
    let mut renderer = renderer();
    let request = RenderRequest::builder(["Sample"])
        .padding(4, 4)
        .build()
        .unwrap();
    let first = renderer.render_one(&request, "Sample").unwrap();
    let second = renderer.render_one(&request, "Sample").unwrap();
    assert_eq!(first.to_png().unwrap(), second.to_png().unwrap());
}

#[test]
fn test_auto_fit_equals_ink_plus_padding() {
    skip_if_no_fonts!();
    let mut renderer = renderer();
    let request = RenderRequest::builder(["Hi"]).padding(5, 4).build().unwrap();
    let metrics = renderer.measure(&request.font, "Hi").unwrap();
    let image = renderer.render_one(&request, "Hi").unwrap();
    assert_eq!(image.width(), (metrics.ink_width() + 10.0).ceil() as u32);
    assert_eq!(image.height(), (metrics.ink_height() + 8.0).ceil() as u32);
}

#[test]
fn test_minimum_size_is_respected() {
    skip_if_no_fonts!();
    let mut renderer = renderer();
    let request = RenderRequest::builder(["Hi"])
        .min_size(300, 200)
        .build()
        .unwrap();
    let image = renderer.render_one(&request, "Hi").unwrap();
    assert_eq!((image.width(), image.height()), (300, 200));
}

#[test]
fn test_whitespace_only_still_gets_padding() {
    skip_if_no_fonts!();
    let mut renderer = renderer();
    let request = RenderRequest::builder([" "]).padding(6, 5).build().unwrap();
    let image = renderer.render_one(&request, " ").unwrap();
    assert_eq!((image.width(), image.height()), (12, 10));
}

#[test]
fn test_perfect_policy_shares_height_and_baseline() {
    skip_if_no_fonts!();
    let mut renderer = renderer();
    let request = RenderRequest::builder(["e", "f", "g"])
        .min_size(0, 64)
        .padding(3, 0)
        .baseline(BaselinePolicy::Perfect)
        .build()
        .unwrap();

    let plans = renderer.plan(&request).unwrap();
    assert_eq!(plans.len(), 3);
    assert!(plans.iter().all(|p| p.height == plans[0].height));
    assert!(plans[0].height >= 64);
    // One absolute baseline row across the whole batch.
    assert!(plans.iter().all(|p| p.origin_y == plans[0].origin_y));

    let images = renderer.render(&request).unwrap();
    for image in images {
        let image = image.unwrap();
        assert_eq!(image.height(), plans[0].height);
    }
}

#[test]
fn test_broad_policy_shares_baseline_with_enough_height() {
    skip_if_no_fonts!();
    let mut renderer = renderer();
    let request = RenderRequest::builder(["e", "g"])
        .min_size(0, 200)
        .baseline(BaselinePolicy::Broad)
        .build()
        .unwrap();
    let plans = renderer.plan(&request).unwrap();
    assert_eq!(plans[0].origin_y, plans[1].origin_y);
}

#[test]
fn test_none_policy_sizes_to_ink() {
    skip_if_no_fonts!();
    let mut renderer = renderer();
    let request = RenderRequest::builder(["e", "g"]).build().unwrap();
    let plans = renderer.plan(&request).unwrap();
    // The descender makes "g" at least as tall as "e".
    assert!(plans[1].height >= plans[0].height);
}

#[test]
fn test_stroke_only_leaves_interior_unfilled() {
    skip_if_no_fonts!();
    let mut renderer = renderer();
    let request = RenderRequest::builder(["O"])
        .font_size(64.0)
        .padding(4, 4)
        .fill_color(None)
        .stroke(Some(Rgba::opaque(255, 255, 255)), 2.0)
        .build()
        .unwrap();
    let image = renderer.render_one(&request, "O").unwrap();
    let data = image.data();
    assert!(data.iter().skip(3).step_by(4).any(|&a| a > 0));
    // The counter of the centered "O" stays transparent.
    assert_eq!(
        alpha_at(&data, image.width(), image.width() / 2, image.height() / 2),
        0
    );
}

#[test]
fn test_transparent_fill_without_other_layers_is_blank() {
    skip_if_no_fonts!();
    let mut renderer = renderer();
    let request = RenderRequest::builder(["Sample"])
        .fill_color(None)
        .build()
        .unwrap();
    let image = renderer.render_one(&request, "Sample").unwrap();
    assert!(image.data().iter().skip(3).step_by(4).all(|&a| a == 0));
}

#[test]
fn test_background_fills_whole_canvas() {
    skip_if_no_fonts!();
    let mut renderer = renderer();
    let request = RenderRequest::builder(["Hi"])
        .padding(8, 8)
        .background_color(Some(Rgba::opaque(200, 30, 30)))
        .build()
        .unwrap();
    let image = renderer.render_one(&request, "Hi").unwrap();
    let data = image.data();
    assert_eq!(&data[..4], &[200, 30, 30, 255]);
    let last = data.len() - 4;
    assert_eq!(&data[last..], &[200, 30, 30, 255]);
}

#[test]
fn test_shadow_only_render_passes_through() {
    skip_if_no_fonts!();
    let mut renderer = renderer();
    let request = RenderRequest::builder(["Sample"])
        .fill_color(None)
        .shadow(Some(Shadow {
            color: Rgba::opaque(40, 40, 40),
            offset: (5, 5),
            blur: 3.0,
        }))
        .build()
        .unwrap();
    let image = renderer.render_one(&request, "Sample").unwrap();
    assert!(image.data().iter().skip(3).step_by(4).any(|&a| a > 0));
}

#[test]
fn test_large_canvas_with_shadow_scenario() {
    skip_if_no_fonts!();
    let mut renderer = renderer();
    let request = RenderRequest::builder(["Text2Image"])
        .min_size(1280, 640)
        .shadow(Some(Shadow {
            color: Rgba::opaque(0, 0, 0),
            offset: (-30, 15),
            blur: 10.0,
        }))
        .build()
        .unwrap();
    let image = renderer.render_one(&request, "Text2Image").unwrap();
    assert_eq!((image.width(), image.height()), (1280, 640));
    let data = image.data();
    assert!(data.iter().skip(3).step_by(4).any(|&a| a > 0));
    // The background stays transparent outside the text footprint.
    assert_eq!(alpha_at(&data, image.width(), 0, 0), 0);
}
