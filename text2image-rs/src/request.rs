//! Render requests: the structured input of the rendering pipeline.

use crate::error::{Text2ImageError, Text2ImageResult};
use crate::metrics::FontSpec;
use crate::units::Rgba;
use std::str::FromStr;

/// Default font size in pixels (32pt at 96 DPI).
pub const DEFAULT_FONT_SIZE_PX: f32 = 42.0;

/// Default fill color.
pub const DEFAULT_FILL: Rgba = Rgba::opaque(0xE6, 0xE2, 0xE1);

/// Vertical alignment policy for placing glyph runs on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaselinePolicy {
    /// Center the glyph ink bounding box within the canvas interior.
    #[default]
    None,
    /// Center the font's ascent/descent envelope instead of the tight ink
    /// bounds, so glyphs with different ink shapes (a descender vs none) get
    /// consistent vertical placement.
    Broad,
    /// Align every run in a batch to one absolute baseline row computed from
    /// the batch-wide maximum envelope, at the cost of a taller canvas.
    Perfect,
}

impl FromStr for BaselinePolicy {
    type Err = Text2ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "broad" => Ok(Self::Broad),
            "perfect" => Ok(Self::Perfect),
            other => Err(Text2ImageError::Argument(format!(
                "invalid baseline policy '{other}', expected one of 'none', 'broad' or 'perfect'"
            ))),
        }
    }
}

/// Text shadow parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: Rgba,
    /// Offset of the shadow silhouette in pixels.
    pub offset: (i32, i32),
    /// Blur radius; 0 leaves the silhouette sharp.
    pub blur: f32,
}

/// One batch of texts plus the rendering settings shared by every item.
///
/// Each text renders to its own image; items are processed independently
/// except for the batch-wide ascent/descent envelope used by
/// [`BaselinePolicy::Perfect`]. Construct through [`RenderRequest::builder`],
/// which validates the invariants.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub texts: Vec<String>,
    pub font: FontSpec,
    pub min_width: u32,
    pub min_height: u32,
    pub pad_x: u32,
    pub pad_y: u32,
    /// Glyph ink color. None skips the fill layer entirely.
    pub fill_color: Option<Rgba>,
    pub stroke_color: Option<Rgba>,
    pub stroke_width: f32,
    /// Canvas background. None leaves it transparent.
    pub background_color: Option<Rgba>,
    pub shadow: Option<Shadow>,
    pub baseline: BaselinePolicy,
    /// Grow the canvas to this width/height ratio. None disables the step.
    pub aspect_ratio: Option<f32>,
}

impl RenderRequest {
    /// Start building a request for the given batch of texts.
    pub fn builder<I, S>(texts: I) -> RenderRequestBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RenderRequestBuilder::new(texts.into_iter().map(Into::into).collect())
    }
}

/// Builder for [`RenderRequest`] with the default settings baked in.
#[derive(Debug, Clone)]
pub struct RenderRequestBuilder {
    request: RenderRequest,
}

impl RenderRequestBuilder {
    fn new(texts: Vec<String>) -> Self {
        Self {
            request: RenderRequest {
                texts,
                font: FontSpec {
                    family: None,
                    size_px: DEFAULT_FONT_SIZE_PX,
                },
                min_width: 0,
                min_height: 0,
                pad_x: 0,
                pad_y: 0,
                fill_color: Some(DEFAULT_FILL),
                stroke_color: None,
                stroke_width: 0.0,
                background_color: None,
                shadow: None,
                baseline: BaselinePolicy::default(),
                aspect_ratio: None,
            },
        }
    }

    pub fn font_family(mut self, family: Option<String>) -> Self {
        self.request.font.family = family;
        self
    }

    pub fn font_size(mut self, size_px: f32) -> Self {
        self.request.font.size_px = size_px;
        self
    }

    pub fn min_size(mut self, width: u32, height: u32) -> Self {
        self.request.min_width = width;
        self.request.min_height = height;
        self
    }

    pub fn padding(mut self, pad_x: u32, pad_y: u32) -> Self {
        self.request.pad_x = pad_x;
        self.request.pad_y = pad_y;
        self
    }

    pub fn fill_color(mut self, color: Option<Rgba>) -> Self {
        self.request.fill_color = color;
        self
    }

    pub fn stroke(mut self, color: Option<Rgba>, width: f32) -> Self {
        self.request.stroke_color = color;
        self.request.stroke_width = width;
        self
    }

    pub fn background_color(mut self, color: Option<Rgba>) -> Self {
        self.request.background_color = color;
        self
    }

    pub fn shadow(mut self, shadow: Option<Shadow>) -> Self {
        self.request.shadow = shadow;
        self
    }

    pub fn baseline(mut self, policy: BaselinePolicy) -> Self {
        self.request.baseline = policy;
        self
    }

    pub fn aspect_ratio(mut self, ratio: Option<f32>) -> Self {
        self.request.aspect_ratio = ratio;
        self
    }

    /// Validate the request invariants and produce the request.
    pub fn build(self) -> Text2ImageResult<RenderRequest> {
        let request = self.request;
        if request.texts.is_empty() {
            return Err(Text2ImageError::Argument(
                "at least one text is required".to_string(),
            ));
        }
        if !request.font.size_px.is_finite() || request.font.size_px <= 0.0 {
            return Err(Text2ImageError::Argument(format!(
                "font size must be positive, got {}",
                request.font.size_px
            )));
        }
        if !request.stroke_width.is_finite() || request.stroke_width < 0.0 {
            return Err(Text2ImageError::Argument(format!(
                "stroke width must be non-negative, got {}",
                request.stroke_width
            )));
        }
        if request.stroke_width > 0.0 && request.stroke_color.is_none() {
            return Err(Text2ImageError::Argument(
                "a positive stroke width requires a stroke color".to_string(),
            ));
        }
        if let Some(shadow) = &request.shadow {
            if !shadow.blur.is_finite() || shadow.blur < 0.0 {
                return Err(Text2ImageError::Argument(format!(
                    "shadow blur must be non-negative, got {}",
                    shadow.blur
                )));
            }
        }
        if let Some(ratio) = request.aspect_ratio {
            if !ratio.is_finite() || ratio <= 0.0 {
                return Err(Text2ImageError::Argument(format!(
                    "aspect ratio must be positive, got {ratio}"
                )));
            }
        }
        Ok(request)
    }
}
