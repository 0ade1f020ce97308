//! The rendering pipeline: background, shadow, stroke, and fill layers.

use crate::blur::box_blur;
use crate::error::{Text2ImageError, Text2ImageResult};
use crate::font_config::FontConfig;
use crate::metrics::{self, FontSpec, ShapedRun, TextMetrics};
use crate::plan::{self, BatchEnvelope, CanvasPlan};
use crate::request::RenderRequest;
use crate::units::Rgba;
use cosmic_text::{FontSystem, SwashCache};
use tiny_skia::{Pixmap, PixmapPaint, Transform};

/// A finished RGBA bitmap for one rendered text item.
pub struct TextImage {
    pixmap: Pixmap,
}

impl TextImage {
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Raw RGBA pixels with straight (non-premultiplied) alpha, row-major.
    pub fn data(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.pixmap.data().len());
        for pixel in self.pixmap.data().chunks_exact(4) {
            let a = pixel[3];
            if a == 0 {
                data.extend_from_slice(&[0, 0, 0, 0]);
            } else if a == 255 {
                data.extend_from_slice(pixel);
            } else {
                let alpha = a as f32 / 255.0;
                data.push((pixel[0] as f32 / alpha).min(255.0) as u8);
                data.push((pixel[1] as f32 / alpha).min(255.0) as u8);
                data.push((pixel[2] as f32 / alpha).min(255.0) as u8);
                data.push(a);
            }
        }
        data
    }

    /// Encode the image as an RGBA8 PNG.
    pub fn to_png(&self) -> Text2ImageResult<Vec<u8>> {
        let mut buf = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buf, self.width(), self.height());
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&self.data())?;
        }
        Ok(buf)
    }
}

/// Renders batches of text items against a shared font database.
///
/// The font system is loaded once and reused read-only by every item; there
/// is no other state carried between renders.
pub struct TextRenderer {
    font_system: FontSystem,
    swash_cache: SwashCache,
}

impl TextRenderer {
    /// Create a renderer over the default font configuration (system fonts).
    pub fn new() -> Text2ImageResult<Self> {
        Self::with_config(&FontConfig::default())
    }

    /// Create a renderer over an explicit font configuration.
    pub fn with_config(config: &FontConfig) -> Text2ImageResult<Self> {
        let db = config.resolve()?;
        let font_system = FontSystem::new_with_locale_and_db("en".to_string(), db);
        Ok(Self {
            font_system,
            swash_cache: SwashCache::new(),
        })
    }

    /// Measure a string with the given font.
    pub fn measure(&mut self, font: &FontSpec, text: &str) -> Text2ImageResult<TextMetrics> {
        metrics::measure(&mut self.font_system, &mut self.swash_cache, font, text)
    }

    /// Compute the canvas plan of every item in the request without
    /// rasterizing anything.
    pub fn plan(&mut self, request: &RenderRequest) -> Text2ImageResult<Vec<CanvasPlan>> {
        let envelope = self.batch_envelope(request)?;
        request
            .texts
            .iter()
            .map(|text| {
                let metrics = self.measure(&request.font, text)?;
                Ok(plan::plan(&metrics, request, &envelope))
            })
            .collect()
    }

    /// Render every text in the request, one image per text.
    ///
    /// Items are independent: a failing item yields an `Err` in its slot and
    /// the remaining items still render. The outer `Err` is reserved for
    /// batch-fatal conditions.
    pub fn render(
        &mut self,
        request: &RenderRequest,
    ) -> Text2ImageResult<Vec<Text2ImageResult<TextImage>>> {
        let envelope = self.batch_envelope(request)?;
        let mut images = Vec::with_capacity(request.texts.len());
        for text in &request.texts {
            images.push(self.render_item(request, text, &envelope));
        }
        Ok(images)
    }

    /// Render a single string with the request's settings (a batch of one).
    pub fn render_one(
        &mut self,
        request: &RenderRequest,
        text: &str,
    ) -> Text2ImageResult<TextImage> {
        let envelope = self.batch_envelope(request)?;
        self.render_item(request, text, &envelope)
    }

    /// The batch-wide maximum ascent/descent envelope, computed up front so
    /// the perfect baseline policy can pin one row across all items.
    fn batch_envelope(&mut self, request: &RenderRequest) -> Text2ImageResult<BatchEnvelope> {
        let mut envelope = BatchEnvelope::default();
        for text in &request.texts {
            let metrics = self.measure(&request.font, text)?;
            envelope.ascent = envelope.ascent.max(metrics.ascent);
            envelope.descent = envelope.descent.max(metrics.descent);
        }
        Ok(envelope)
    }

    fn render_item(
        &mut self,
        request: &RenderRequest,
        text: &str,
        envelope: &BatchEnvelope,
    ) -> Text2ImageResult<TextImage> {
        let run = metrics::shape_run(
            &mut self.font_system,
            &mut self.swash_cache,
            &request.font,
            text,
        )?;
        let plan = plan::plan(&run.metrics, request, envelope);
        log::debug!(
            "\"{}\" -> {}x{} canvas, origin ({}, {})",
            text,
            plan.width,
            plan.height,
            plan.origin_x,
            plan.origin_y
        );

        let mut pixmap = Pixmap::new(plan.width, plan.height).ok_or(
            Text2ImageError::InvalidDimensions {
                width: plan.width,
                height: plan.height,
            },
        )?;

        // 1. Background, under everything.
        if let Some(background) = request.background_color {
            pixmap.fill(background.into());
        }

        // 2. Shadow: the run's silhouette on a scratch layer, offset,
        //    blurred, then composited before any text ink.
        if let Some(shadow) = &request.shadow {
            let mut layer = Pixmap::new(plan.width, plan.height).ok_or(
                Text2ImageError::InvalidDimensions {
                    width: plan.width,
                    height: plan.height,
                },
            )?;
            let origin = (
                plan.origin_x + shadow.offset.0,
                plan.origin_y + shadow.offset.1,
            );
            fill_run(&mut layer, &run, origin, shadow.color);
            if request.stroke_width > 0.0 {
                stroke_run(&mut layer, &run, origin, shadow.color, request.stroke_width);
            }
            box_blur(&mut layer, shadow.blur);
            pixmap.draw_pixmap(
                0,
                0,
                layer.as_ref(),
                &PixmapPaint::default(),
                Transform::identity(),
                None,
            );
        }

        let origin = (plan.origin_x, plan.origin_y);

        // 3. Stroke, centered on the glyph paths.
        if request.stroke_width > 0.0 {
            if let Some(color) = request.stroke_color {
                stroke_run(&mut pixmap, &run, origin, color, request.stroke_width);
            }
        }

        // 4. Fill, topmost. None draws nothing, letting stroke-only or
        //    shadow-only renders through.
        if let Some(color) = request.fill_color {
            fill_run(&mut pixmap, &run, origin, color);
        }

        Ok(TextImage { pixmap })
    }
}

fn fill_run(pixmap: &mut Pixmap, run: &ShapedRun, origin: (i32, i32), color: Rgba) {
    let mut paint = tiny_skia::Paint {
        anti_alias: true,
        ..Default::default()
    };
    paint.set_color(color.into());
    for glyph in &run.glyphs {
        let transform =
            Transform::from_translate(origin.0 as f32 + glyph.x, origin.1 as f32 + glyph.y);
        pixmap.fill_path(
            &glyph.path,
            &paint,
            tiny_skia::FillRule::Winding,
            transform,
            None,
        );
    }
}

fn stroke_run(pixmap: &mut Pixmap, run: &ShapedRun, origin: (i32, i32), color: Rgba, width: f32) {
    let mut paint = tiny_skia::Paint {
        anti_alias: true,
        ..Default::default()
    };
    paint.set_color(color.into());
    let stroke = tiny_skia::Stroke {
        width,
        ..Default::default()
    };
    for glyph in &run.glyphs {
        let transform =
            Transform::from_translate(origin.0 as f32 + glyph.x, origin.1 as f32 + glyph.y);
        pixmap.stroke_path(&glyph.path, &paint, &stroke, transform, None);
    }
}
