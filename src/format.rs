//! Textual color formats and their canonical serialization.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::UnknownFormat;

/// One of the textual formats a color can be copied as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorFormat {
    #[default]
    Hex,
    Hsl,
    Rgb,
    Lch,
}

impl ColorFormat {
    pub const ALL: [ColorFormat; 4] = [
        ColorFormat::Hex,
        ColorFormat::Hsl,
        ColorFormat::Rgb,
        ColorFormat::Lch,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ColorFormat::Hex => "Hex",
            ColorFormat::Hsl => "HSL",
            ColorFormat::Rgb => "RGB",
            ColorFormat::Lch => "LCH",
        }
    }
}

impl fmt::Display for ColorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for ColorFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hex" => Ok(ColorFormat::Hex),
            "hsl" => Ok(ColorFormat::Hsl),
            "rgb" => Ok(ColorFormat::Rgb),
            "lch" => Ok(ColorFormat::Lch),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

/// Serialize `color` in `format`.
///
/// * Hex: `#rrggbb`, or `#rrggbbaa` when the color is translucent
/// * HSL: `hsl(H, S%, L%)` with an optional fourth alpha term
/// * RGB: `rgb(R, G, B)` with an optional fourth alpha term
/// * LCH: `lch(L% C H)`
pub fn serialize(color: &Color, format: ColorFormat) -> String {
    match format {
        ColorFormat::Hex => hex_string(color),
        ColorFormat::Hsl => hsl_string(color),
        ColorFormat::Rgb => rgb_string(color),
        ColorFormat::Lch => lch_string(color),
    }
}

fn hex_string(color: &Color) -> String {
    let [r, g, b, a] = color.to_rgba8();
    if color.is_opaque() {
        format!("#{r:02x}{g:02x}{b:02x}")
    } else {
        format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}

fn hsl_string(color: &Color) -> String {
    let hsl = color.to_hsl();
    let hue = hsl.hue.round() as u32 % 360;
    let saturation = (hsl.saturation * 100.0).round() as u32;
    let lightness = (hsl.lightness * 100.0).round() as u32;

    if color.is_opaque() {
        format!("hsl({hue}, {saturation}%, {lightness}%)")
    } else {
        let alpha = alpha_string(color.alpha());
        format!("hsl({hue}, {saturation}%, {lightness}%, {alpha})")
    }
}

fn rgb_string(color: &Color) -> String {
    let [r, g, b, _] = color.to_rgba8();
    if color.is_opaque() {
        format!("rgb({r}, {g}, {b})")
    } else {
        let alpha = alpha_string(color.alpha());
        format!("rgb({r}, {g}, {b}, {alpha})")
    }
}

fn lch_string(color: &Color) -> String {
    let lch = color.to_lch();
    let lightness = trimmed(lch.lightness, 1);
    let chroma = positive_zero((lch.chroma * 10.0).round() / 10.0);
    let hue = lch.hue.round() as u32 % 360;
    format!("lch({lightness}% {chroma:.1} {hue})")
}

/// Three places keep every 8-bit alpha within one step of itself.
fn alpha_string(alpha: f32) -> String {
    trimmed(alpha, 3)
}

/// Fixed-point with `decimals` places, trailing zeros dropped.
fn trimmed(value: f32, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, positive_zero(value));
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

fn positive_zero(value: f32) -> f32 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

impl Color {
    pub fn hex_string(&self) -> String {
        serialize(self, ColorFormat::Hex)
    }

    pub fn hsl_string(&self) -> String {
        serialize(self, ColorFormat::Hsl)
    }

    pub fn rgb_string(&self) -> String {
        serialize(self, ColorFormat::Rgb)
    }

    pub fn lch_string(&self) -> String {
        serialize(self, ColorFormat::Lch)
    }

    /// The color as the user prefers to see it, e.g. in menus or after picking.
    pub fn string_representation(&self, preferred: ColorFormat) -> String {
        serialize(self, preferred)
    }
}

/// Memoized serializations for a single source color.
///
/// Any lookup with a different color drops every cached string first.
#[derive(Debug, Default)]
pub struct FormatCache {
    source: Option<Color>,
    strings: HashMap<ColorFormat, String>,
}

impl FormatCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, color: &Color, format: ColorFormat) -> &str {
        if self.source != Some(*color) {
            self.invalidate();
            self.source = Some(*color);
        }
        self.strings
            .entry(format)
            .or_insert_with(|| serialize(color, format))
    }

    pub fn invalidate(&mut self) {
        self.source = None;
        self.strings.clear();
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
