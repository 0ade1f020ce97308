//! Measure, vector, ratio, and color parsing for render requests.
//!
//! These are the pure string-to-value conversions used by the command-line
//! surface. Each function returns a [`Text2ImageResult`] carrying the
//! offending value on failure; nothing here touches the filesystem or the
//! rendering pipeline.

use crate::error::{Text2ImageError, Text2ImageResult};

/// Fixed DPI assumption used to convert point measures to pixels.
const DPI: f32 = 96.0;
const POINTS_PER_INCH: f32 = 72.0;

/// An RGBA color with 8-bit channels and straight alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }
}

impl From<Rgba> for tiny_skia::Color {
    fn from(c: Rgba) -> Self {
        tiny_skia::Color::from_rgba8(c.r, c.g, c.b, c.a)
    }
}

// --- Measures ---

/// Parse a signed measure: `<PIXELS | Npx | Npt>`.
///
/// Point values convert to pixels at a fixed 96 DPI.
pub fn parse_signed_measure(s: &str) -> Text2ImageResult<i32> {
    let trimmed = s.trim();
    let (digits, is_pt) = if let Some(v) = trimmed.strip_suffix("px") {
        (v, false)
    } else if let Some(v) = trimmed.strip_suffix("pt") {
        (v, true)
    } else {
        (trimmed, false)
    };
    let value: i32 = digits.trim().parse().map_err(|_| {
        Text2ImageError::Argument(format!(
            "invalid measure '{s}', expected <PIXELS | Npx | Npt>"
        ))
    })?;
    if is_pt {
        Ok((value as f32 * DPI / POINTS_PER_INCH) as i32)
    } else {
        Ok(value)
    }
}

/// Parse a non-negative measure: `<PIXELS | Npx | Npt>`.
pub fn parse_measure(s: &str) -> Text2ImageResult<u32> {
    let value = parse_signed_measure(s)?;
    u32::try_from(value)
        .map_err(|_| Text2ImageError::Argument(format!("measure '{s}' must be non-negative")))
}

/// Parse an `X,Y` pair of signed measures.
pub fn parse_offset(s: &str) -> Text2ImageResult<(i32, i32)> {
    match s.split(',').collect::<Vec<_>>().as_slice() {
        [x, y] => Ok((parse_signed_measure(x)?, parse_signed_measure(y)?)),
        _ => Err(Text2ImageError::Argument(format!(
            "invalid pair '{s}', expected <X,Y>"
        ))),
    }
}

/// Parse an `X,Y` pair of non-negative measures.
pub fn parse_size(s: &str) -> Text2ImageResult<(u32, u32)> {
    match s.split(',').collect::<Vec<_>>().as_slice() {
        [x, y] => Ok((parse_measure(x)?, parse_measure(y)?)),
        _ => Err(Text2ImageError::Argument(format!(
            "invalid pair '{s}', expected <X,Y>"
        ))),
    }
}

// --- Ratios ---

/// Parse an aspect ratio: `<N | N/D>`. Must be positive.
pub fn parse_ratio(s: &str) -> Text2ImageResult<f32> {
    let invalid =
        || Text2ImageError::Argument(format!("invalid ratio '{s}', expected <N | N/D>"));
    let ratio = match s.split('/').collect::<Vec<_>>().as_slice() {
        [n] => n.trim().parse::<f32>().map_err(|_| invalid())?,
        [n, d] => {
            let n: f32 = n.trim().parse().map_err(|_| invalid())?;
            let d: f32 = d.trim().parse().map_err(|_| invalid())?;
            if d == 0.0 {
                return Err(Text2ImageError::Argument(format!(
                    "ratio '{s}' has division by zero"
                )));
            }
            n / d
        }
        _ => return Err(invalid()),
    };
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(Text2ImageError::Argument(format!(
            "ratio '{s}' must be positive"
        )));
    }
    Ok(ratio)
}

// --- Colors ---

/// Parse a color string into an RGBA color.
///
/// Accepts the CSS forms understood by csscolorparser (named colors, `#RGB`,
/// `#RRGGBB`, `#RGBA`, `#RRGGBBAA`, ...) plus `0x`-prefixed hex, 1- and
/// 2-digit grey levels, and `R,G,B` integer triples. The `transparent`
/// sentinel (or any fully transparent color) parses to `None`.
pub fn parse_color(s: &str) -> Text2ImageResult<Option<Rgba>> {
    let trimmed = s.trim();
    if let Some(hex) = trimmed.strip_prefix("0x") {
        return parse_hex(trimmed, hex).map(Some);
    }
    if let Some(hex) = trimmed.strip_prefix('#') {
        // csscolorparser has no 1- or 2-digit grey forms.
        if hex.len() == 1 || hex.len() == 2 {
            return parse_hex(trimmed, hex).map(Some);
        }
    }
    if trimmed.contains(',') {
        return parse_triple(trimmed).map(Some);
    }
    let parsed = csscolorparser::parse(trimmed)
        .map_err(|err| Text2ImageError::Argument(format!("invalid color '{s}': {err}")))?;
    let [r, g, b, a] = parsed.to_rgba8();
    if a == 0 {
        return Ok(None);
    }
    Ok(Some(Rgba::new(r, g, b, a)))
}

/// Hex colors: 1 digit (grey `L*0x11`), 2 digits (grey), 3 digits (RGB),
/// 6 digits (RRGGBB).
fn parse_hex(original: &str, hex: &str) -> Text2ImageResult<Rgba> {
    let value = u32::from_str_radix(hex, 16).map_err(|_| {
        Text2ImageError::Argument(format!("invalid hex color '{original}'"))
    })?;
    let (r, g, b) = match hex.len() {
        1 => {
            let l = (value * 0x11) as u8;
            (l, l, l)
        }
        2 => {
            let l = value as u8;
            (l, l, l)
        }
        3 => (
            (((value & 0xF00) >> 8) * 0x11) as u8,
            (((value & 0x0F0) >> 4) * 0x11) as u8,
            ((value & 0x00F) * 0x11) as u8,
        ),
        6 => (
            ((value & 0xFF0000) >> 16) as u8,
            ((value & 0x00FF00) >> 8) as u8,
            (value & 0x0000FF) as u8,
        ),
        _ => {
            return Err(Text2ImageError::Argument(format!(
                "hex color '{original}' must have 1, 2, 3 or 6 digits"
            )))
        }
    };
    Ok(Rgba::opaque(r, g, b))
}

/// `R,G,B` triples of integers in [0, 255].
fn parse_triple(s: &str) -> Text2ImageResult<Rgba> {
    let invalid = || {
        Text2ImageError::Argument(format!(
            "invalid color '{s}', expected a triple of comma-separated integers in [0, 255]"
        ))
    };
    let components = s
        .split(',')
        .map(|part| part.trim().parse::<u8>().map_err(|_| invalid()))
        .collect::<Text2ImageResult<Vec<u8>>>()?;
    match components.as_slice() {
        [r, g, b] => Ok(Rgba::opaque(*r, *g, *b)),
        _ => Err(invalid()),
    }
}
