//! Text to raster image rendering using tiny-skia and cosmic-text.
//!
//! This crate renders text strings into RGBA bitmaps with configurable font,
//! fill, stroke, shadow, padding, and minimum canvas size. The emphasis is on
//! reproducible, cross-glyph alignment: separately rendered characters, laid
//! side by side, line up like one continuous run of text. It uses:
//! - `tiny-skia` for 2D rasterization and compositing
//! - `cosmic-text` for text shaping and glyph outlines
//! - `fontdb` for font database management
//!
//! # Example
//!
//! ```rust,ignore
//! use text2image_rs::{BaselinePolicy, RenderRequest, TextRenderer};
//!
//! let mut renderer = TextRenderer::new()?;
//! let request = RenderRequest::builder(["e", "f", "g"])
//!     .min_size(0, 64)
//!     .baseline(BaselinePolicy::Perfect)
//!     .build()?;
//! for image in renderer.render(&request)? {
//!     let png_data = image?.to_png()?;
//!     // ...
//! }
//! ```

mod align;
mod blur;
mod error;
mod font_config;
mod metrics;
mod plan;
mod render;
mod request;
mod units;

// Re-export public API
pub use error::{Text2ImageError, Text2ImageResult};
pub use font_config::FontConfig;
pub use metrics::{FontSpec, TextMetrics};
pub use plan::{plan, BatchEnvelope, CanvasPlan};
pub use render::{TextImage, TextRenderer};
pub use request::{
    BaselinePolicy, RenderRequest, RenderRequestBuilder, Shadow, DEFAULT_FILL,
    DEFAULT_FONT_SIZE_PX,
};
pub use units::{
    parse_color, parse_measure, parse_offset, parse_ratio, parse_signed_measure, parse_size, Rgba,
};
