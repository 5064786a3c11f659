//! Canonical color value and its hex / HSL / RGB forms.
//!
//! A [`Color`] is stored once, as 8-bit sRGB components plus a float alpha.
//! Every other representation is derived from it by a pure conversion:
//!
//! | Form | Produced by | Notes |
//! |------|-------------|-------|
//! | `#rrggbb` | [`Color::to_hex`] | lowercase, alpha not included |
//! | `#rrggbbaa` | [`Color::render_string`] | value used to paint the background |
//! | [`Hsl`] | [`Color::to_hsl`] | hue in degrees, s/l/a in 0..=1 |
//! | [`Rgb`] | [`Color::to_rgb`] | 0..=255 components, alpha in 0..=1 |
//!
//! # Persisted form
//!
//! On disk a color is a [`ColorRecord`] carrying all three forms at once, the
//! shape picker widgets conventionally emit:
//!
//! ```json
//! { "hex": "#ff0000", "hsl": { "h": 0, "s": 1, "l": 0.5, "a": 1 }, "rgb": { "r": 255, "g": 0, "b": 0, "a": 1 } }
//! ```
//!
//! Serialization derives every form from the canonical value, so they always
//! agree. Deserialization reads the `rgb` form (alpha defaults to 1 when
//! missing) and falls back to `hex`, then `hsl`.
//!
//! # Example
//!
//! ```
//! use softlight_core::Color;
//!
//! let red = Color::from_hex("#ff0000").unwrap();
//! assert_eq!(red.render_string(), "#ff0000ff");
//! assert_eq!(Color::TRANSPARENT_BLACK.render_string(), "#00000000");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ColorError;

// ============================================================================
// Color
// ============================================================================

/// sRGB color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColorRecord", into = "ColorRecord")]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
    alpha: f32,
}

impl Color {
    /// Black with zero alpha. Fresh installs start here.
    pub const TRANSPARENT_BLACK: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        alpha: 0.0,
    };

    /// Fully opaque black, painted while lights out is active.
    pub const OFF: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        alpha: 1.0,
    };

    /// Opaque color from 8-bit components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, alpha: 1.0 }
    }

    /// Color from 8-bit components and alpha. Alpha is clamped to 0..=1;
    /// NaN becomes 1.
    pub fn rgba(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self {
            r,
            g,
            b,
            alpha: clamp_alpha(alpha),
        }
    }

    /// Red component.
    pub const fn r(&self) -> u8 {
        self.r
    }

    /// Green component.
    pub const fn g(&self) -> u8 {
        self.g
    }

    /// Blue component.
    pub const fn b(&self) -> u8 {
        self.b
    }

    /// Alpha in 0..=1.
    pub const fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Alpha scaled to a byte, rounded to nearest.
    pub fn alpha_byte(&self) -> u8 {
        unit_to_byte(self.alpha)
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self::rgba(self.r, self.g, self.b, alpha)
    }

    /// Components as `[r, g, b, a]` with alpha scaled to a byte.
    pub fn to_rgba8(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.alpha_byte()]
    }

    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa` (the `#` is optional).
    ///
    /// Short and six-digit forms are opaque.
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let invalid = || ColorError::InvalidHex(hex.to_string());
        let digits = hex.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        let nibble = |i: usize| {
            u8::from_str_radix(&digits[i..i + 1], 16)
                .map(|n| n * 17)
                .map_err(|_| invalid())
        };

        match digits.len() {
            3 => Ok(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self::rgba(
                byte(0)?,
                byte(2)?,
                byte(4)?,
                f32::from(byte(6)?) / 255.0,
            )),
            _ => Err(invalid()),
        }
    }

    /// `#rrggbb`, lowercase, without alpha.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Value the background is painted with: the hex form followed by the
    /// alpha as two lowercase hex digits.
    pub fn render_string(&self) -> String {
        format!("{}{:02x}", self.to_hex(), self.alpha_byte())
    }

    /// HSL form of this color.
    pub fn to_hsl(&self) -> Hsl {
        let r = f32::from(self.r) / 255.0;
        let g = f32::from(self.g) / 255.0;
        let b = f32::from(self.b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        let d = max - min;

        if d == 0.0 {
            return Hsl {
                h: 0.0,
                s: 0.0,
                l,
                a: self.alpha,
            };
        }

        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };

        let sector = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        Hsl {
            h: sector * 60.0,
            s,
            l,
            a: self.alpha,
        }
    }

    /// Color from its HSL form. Hue wraps; s, l and a are clamped.
    pub fn from_hsl(hsl: Hsl) -> Self {
        let h = hsl.h.rem_euclid(360.0) / 60.0;
        let s = hsl.s.clamp(0.0, 1.0);
        let l = hsl.l.clamp(0.0, 1.0);

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = l - c / 2.0;

        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        Self::rgba(
            unit_to_byte(r + m),
            unit_to_byte(g + m),
            unit_to_byte(b + m),
            hsl.a,
        )
    }

    /// RGB form of this color.
    pub fn to_rgb(&self) -> Rgb {
        Rgb {
            r: self.r,
            g: self.g,
            b: self.b,
            a: Some(self.alpha),
        }
    }

    /// Redundant persisted form with all three representations.
    pub fn to_record(&self) -> ColorRecord {
        ColorRecord {
            hex: Some(self.to_hex()),
            hsl: Some(self.to_hsl()),
            rgb: Some(self.to_rgb()),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT_BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_string())
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

fn clamp_alpha(alpha: f32) -> f32 {
    if alpha.is_nan() {
        1.0
    } else {
        alpha.clamp(0.0, 1.0)
    }
}

fn unit_to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

// ============================================================================
// Boundary forms
// ============================================================================

/// Hue / saturation / lightness with alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    /// Hue in degrees, 0..360.
    pub h: f32,
    /// Saturation, 0..=1.
    pub s: f32,
    /// Lightness, 0..=1.
    pub l: f32,
    /// Alpha, 0..=1.
    #[serde(default = "opaque")]
    pub a: f32,
}

/// 8-bit RGB with optional alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    /// Red, 0..=255.
    pub r: u8,
    /// Green, 0..=255.
    pub g: u8,
    /// Blue, 0..=255.
    pub b: u8,
    /// Alpha, 0..=1. Absent means opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<f32>,
}

const fn opaque() -> f32 {
    1.0
}

/// Redundant color record as stored on disk.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ColorRecord {
    /// `#rrggbb` form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex: Option<String>,
    /// HSL form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hsl: Option<Hsl>,
    /// RGB form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rgb: Option<Rgb>,
}

impl TryFrom<ColorRecord> for Color {
    type Error = ColorError;

    fn try_from(record: ColorRecord) -> Result<Self, Self::Error> {
        if let Some(rgb) = record.rgb {
            return Ok(Self::rgba(rgb.r, rgb.g, rgb.b, rgb.a.unwrap_or(1.0)));
        }
        if let Some(hex) = record.hex {
            let color = Self::from_hex(&hex)?;
            return Ok(match record.hsl {
                Some(hsl) => color.with_alpha(hsl.a),
                None => color,
            });
        }
        record.hsl.map(Self::from_hsl).ok_or(ColorError::Empty)
    }
}

impl From<Color> for ColorRecord {
    fn from(color: Color) -> Self {
        color.to_record()
    }
}
