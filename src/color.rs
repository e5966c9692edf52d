//! The in-memory color value and its colorspace views.
//!
//! A [`Color`] is stored as sRGB with straight alpha, every channel in
//! `[0, 1]`. HSL and LCH are derived on demand through `palette`, so the
//! RGB components stay the single source of truth.

use palette::{FromColor, Hsl, IntoColor, Lch, Srgb};
use serde::{Deserialize, Serialize};

/// An immutable sRGB color with alpha.
///
/// Equality is component-wise and exact. Constructors clamp every channel
/// into `[0, 1]` (NaN becomes `0`), so two colors that compare equal are
/// guaranteed to produce the same text in every format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ColorRepr", into = "ColorRepr")]
pub struct Color {
    r: f32,
    g: f32,
    b: f32,
    a: f32,
}

/// HSL view of a [`Color`]: hue in degrees `[0, 360)`, the rest in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HslValue {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
    pub alpha: f32,
}

/// CIE LCH (D65) view of a [`Color`].
///
/// `lightness` is in `[0, 100]`, `chroma` is unbounded but never negative,
/// `hue` is in degrees `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LchValue {
    pub lightness: f32,
    pub chroma: f32,
    pub hue: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    /// Opaque color from `[0, 1]` channels.
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self::with_alpha(r, g, b, 1.0)
    }

    pub fn with_alpha(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: unit(r),
            g: unit(g),
            b: unit(b),
            a: unit(a),
        }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba8(r, g, b, 255)
    }

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Build a color from HSL. Hue wraps, saturation and lightness are clamped.
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Self {
        let hsl: Hsl = Hsl::new(wrap_degrees(hue), unit(saturation), unit(lightness));
        let rgb: Srgb = Srgb::from_color(hsl);
        Self::with_alpha(rgb.red, rgb.green, rgb.blue, alpha)
    }

    /// Build a color from CIE LCH (D65).
    ///
    /// Results outside the sRGB gamut are clamped per component.
    pub fn from_lch(lightness: f32, chroma: f32, hue: f32, alpha: f32) -> Self {
        let lch: Lch = Lch::new(lightness, chroma.max(0.0), wrap_degrees(hue));
        let rgb: Srgb = lch.into_color();
        Self::with_alpha(rgb.red, rgb.green, rgb.blue, alpha)
    }

    pub fn red(&self) -> f32 {
        self.r
    }

    pub fn green(&self) -> f32 {
        self.g
    }

    pub fn blue(&self) -> f32 {
        self.b
    }

    pub fn alpha(&self) -> f32 {
        self.a
    }

    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }

    pub fn is_grayscale(&self) -> bool {
        self.r == self.g && self.g == self.b
    }

    /// Channels quantized to 8 bits, rounding to nearest.
    pub fn to_rgba8(&self) -> [u8; 4] {
        [
            quantize(self.r),
            quantize(self.g),
            quantize(self.b),
            quantize(self.a),
        ]
    }

    pub fn to_hsl(&self) -> HslValue {
        if self.is_grayscale() {
            return HslValue {
                hue: 0.0,
                saturation: 0.0,
                lightness: self.r,
                alpha: self.a,
            };
        }

        let hsl: Hsl = Hsl::from_color(self.to_srgb());
        HslValue {
            hue: wrap_degrees(hsl.hue.into_positive_degrees()),
            saturation: unit(hsl.saturation),
            lightness: unit(hsl.lightness),
            alpha: self.a,
        }
    }

    /// sRGB -> linear -> XYZ -> Lab -> LCH, D65 white.
    pub fn to_lch(&self) -> LchValue {
        let lch: Lch = Lch::from_color(self.to_srgb());
        let lightness = lch.l.clamp(0.0, 100.0);

        // Gray has no hue; float noise in the a/b axes must not leak one in.
        if self.is_grayscale() {
            return LchValue {
                lightness,
                chroma: 0.0,
                hue: 0.0,
            };
        }

        LchValue {
            lightness,
            chroma: lch.chroma.max(0.0),
            hue: wrap_degrees(lch.hue.into_positive_degrees()),
        }
    }

    /// Largest per-channel distance to `other`, alpha included.
    pub fn max_channel_delta(&self, other: &Color) -> f32 {
        (self.r - other.r)
            .abs()
            .max((self.g - other.g).abs())
            .max((self.b - other.b).abs())
            .max((self.a - other.a).abs())
    }

    fn to_srgb(self) -> Srgb {
        Srgb::new(self.r, self.g, self.b)
    }
}

/// Serialized shape of a color. Deserialization goes back through the
/// clamping constructor so persisted data can't break the channel range.
#[derive(Serialize, Deserialize)]
struct ColorRepr {
    r: f32,
    g: f32,
    b: f32,
    #[serde(default = "opaque")]
    a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl From<ColorRepr> for Color {
    fn from(repr: ColorRepr) -> Self {
        Color::with_alpha(repr.r, repr.g, repr.b, repr.a)
    }
}

impl From<Color> for ColorRepr {
    fn from(color: Color) -> Self {
        ColorRepr {
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        }
    }
}

fn unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn quantize(value: f32) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

pub(crate) fn wrap_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can land exactly on 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32, tolerance: f32) -> bool {
        (a - b).abs() <= tolerance
    }

    #[test]
    fn constructors_clamp_channels() {
        let c = Color::with_alpha(1.5, -0.2, f32::NAN, 2.0);
        assert_eq!(c.red(), 1.0);
        assert_eq!(c.green(), 0.0);
        assert_eq!(c.blue(), 0.0);
        assert_eq!(c.alpha(), 1.0);
    }

    #[test]
    fn rgb8_quantization_is_exact() {
        for v in [0u8, 1, 17, 128, 200, 254, 255] {
            let c = Color::from_rgba8(v, v, v, v);
            assert_eq!(c.to_rgba8(), [v, v, v, v]);
        }
    }

    #[test]
    fn grayscale_has_no_hue_or_saturation() {
        let gray = Color::from_rgb8(128, 128, 128);
        let hsl = gray.to_hsl();
        assert_eq!(hsl.hue, 0.0);
        assert_eq!(hsl.saturation, 0.0);

        let lch = gray.to_lch();
        assert_eq!(lch.hue, 0.0);
        assert_eq!(lch.chroma, 0.0);
    }

    #[test]
    fn red_to_hsl() {
        let hsl = Color::from_rgb8(255, 0, 0).to_hsl();
        assert!(close(hsl.hue, 0.0, 0.01) || close(hsl.hue, 360.0, 0.01));
        assert!(close(hsl.saturation, 1.0, 1e-4));
        assert!(close(hsl.lightness, 0.5, 1e-4));
    }

    #[test]
    fn blue_to_hsl() {
        let hsl = Color::from_rgb8(0, 0, 255).to_hsl();
        assert!(close(hsl.hue, 240.0, 0.01));
        assert!(close(hsl.saturation, 1.0, 1e-4));
        assert!(close(hsl.lightness, 0.5, 1e-4));
    }

    #[test]
    fn hsl_round_trip_keeps_alpha() {
        let c = Color::with_alpha(0.2, 0.4, 0.6, 0.5);
        let hsl = c.to_hsl();
        let back = Color::from_hsl(hsl.hue, hsl.saturation, hsl.lightness, hsl.alpha);
        assert!(c.max_channel_delta(&back) < 1e-4);
        assert_eq!(back.alpha(), 0.5);
    }

    #[test]
    fn white_and_black_lch() {
        let white = Color::WHITE.to_lch();
        assert!(close(white.lightness, 100.0, 0.01));
        assert_eq!(white.chroma, 0.0);

        let black = Color::BLACK.to_lch();
        assert!(close(black.lightness, 0.0, 0.01));
        assert_eq!(black.chroma, 0.0);
    }

    #[test]
    fn red_to_lch_uses_d65() {
        let lch = Color::from_rgb8(255, 0, 0).to_lch();
        assert!(close(lch.lightness, 53.24, 0.5));
        assert!(close(lch.chroma, 104.55, 0.5));
        assert!(close(lch.hue, 40.0, 0.5));
    }

    #[test]
    fn lch_round_trip_for_chromatic_color() {
        let c = Color::from_rgb8(100, 120, 140);
        let lch = c.to_lch();
        let back = Color::from_lch(lch.lightness, lch.chroma, lch.hue, 1.0);
        assert!(c.max_channel_delta(&back) < 1e-3);
    }

    #[test]
    fn out_of_gamut_lch_is_clamped() {
        let c = Color::from_lch(50.0, 200.0, 140.0, 1.0);
        for channel in [c.red(), c.green(), c.blue()] {
            assert!((0.0..=1.0).contains(&channel));
        }
    }

    #[test]
    fn hue_wraps() {
        assert_eq!(wrap_degrees(360.0), 0.0);
        assert_eq!(wrap_degrees(-90.0), 270.0);
        assert_eq!(wrap_degrees(725.0), 5.0);
    }

    #[test]
    fn serde_clamps_out_of_range_input() {
        let c: Color = serde_json::from_str(r#"{"r":2.0,"g":0.5,"b":-1.0}"#).unwrap();
        assert_eq!(c, Color::with_alpha(1.0, 0.5, 0.0, 1.0));
    }
}
