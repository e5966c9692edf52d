//! Lenient parsing of color text.
//!
//! Accepted shapes:
//! * hex with or without `#`: `RGB`, `RGBA`, `RRGGBB`, `RRGGBBAA`
//! * `rgb(R, G, B[, A])` / `rgba(...)`, channels `0..=255` or percentages
//! * `hsl(H, S%, L%[, A])` / `hsla(...)`, hue in degrees (optional `deg`)
//! * `lch(L% C H[ / A])`
//!
//! Arguments may be separated by commas, whitespace or a CSS `/` before
//! alpha. Function names and hex digits are case-insensitive. A parse either
//! yields a complete color or an error; nothing is partially applied.

use std::str::FromStr;

use tracing::debug;

use crate::color::Color;
use crate::error::ColorParseError;
use crate::format::ColorFormat;

/// Grammars are tried in this order when the format is unknown. Only the
/// first successful parse counts.
pub const DETECTION_ORDER: [ColorFormat; 4] = [
    ColorFormat::Hex,
    ColorFormat::Hsl,
    ColorFormat::Rgb,
    ColorFormat::Lch,
];

/// CSS Color 4 maps `100%` chroma onto this value.
const LCH_CHROMA_PERCENT_REFERENCE: f32 = 150.0;

/// Parse `input` in whichever format matches first.
pub fn parse(input: &str) -> Result<Color, ColorParseError> {
    detect(input).map(|(_, color)| color)
}

/// Parse `input` and report which grammar accepted it.
pub fn detect(input: &str) -> Result<(ColorFormat, Color), ColorParseError> {
    let text = input.trim();
    if text.is_empty() {
        return Err(ColorParseError::Empty);
    }

    let mut first_error = None;
    for format in DETECTION_ORDER {
        match parse_as(text, format) {
            Ok(color) => return Ok((format, color)),
            Err(ColorParseError::UnknownFormat(_)) => {}
            Err(err) => {
                first_error.get_or_insert(err);
            }
        }
    }

    let err = first_error.unwrap_or_else(|| ColorParseError::UnknownFormat(text.to_string()));
    debug!(input = text, error = %err, "text is not a color");
    Err(err)
}

/// Parse `input` with one specific grammar.
pub fn parse_as(input: &str, format: ColorFormat) -> Result<Color, ColorParseError> {
    let text = input.trim().to_ascii_lowercase();
    if text.is_empty() {
        return Err(ColorParseError::Empty);
    }

    match format {
        ColorFormat::Hex => parse_hex(&text),
        ColorFormat::Hsl => parse_hsl(&text),
        ColorFormat::Rgb => parse_rgb(&text),
        ColorFormat::Lch => parse_lch(&text),
    }
}

fn parse_hex(text: &str) -> Result<Color, ColorParseError> {
    let (digits, prefixed) = match text.strip_prefix('#') {
        Some(rest) => (rest, true),
        None => (text, false),
    };

    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(if prefixed {
            ColorParseError::InvalidHex(text.to_string())
        } else {
            ColorParseError::UnknownFormat(text.to_string())
        });
    }

    let nibble = |c: u8| -> u8 {
        match c {
            b'0'..=b'9' => c - b'0',
            _ => c - b'a' + 10,
        }
    };
    let bytes = digits.as_bytes();

    let channels: Vec<u8> = match bytes.len() {
        // #RGB / #RGBA
        3 | 4 => bytes.iter().map(|&c| nibble(c) * 17).collect(),
        // #RRGGBB / #RRGGBBAA
        6 | 8 => bytes
            .chunks(2)
            .map(|pair| nibble(pair[0]) << 4 | nibble(pair[1]))
            .collect(),
        len => return Err(ColorParseError::InvalidLength(len)),
    };

    let alpha = channels.get(3).copied().unwrap_or(255);
    Ok(Color::from_rgba8(channels[0], channels[1], channels[2], alpha))
}

fn parse_rgb(text: &str) -> Result<Color, ColorParseError> {
    let args = function_args(text, &["rgba", "rgb"])?;
    let tokens = arguments("rgb", args)?;

    let r = rgb_channel(tokens[0])?;
    let g = rgb_channel(tokens[1])?;
    let b = rgb_channel(tokens[2])?;
    let a = optional_alpha(&tokens)?;

    Ok(Color::with_alpha(r, g, b, a))
}

fn parse_hsl(text: &str) -> Result<Color, ColorParseError> {
    let args = function_args(text, &["hsla", "hsl"])?;
    let tokens = arguments("hsl", args)?;

    let hue = hue(tokens[0])?;
    let saturation = percentage(tokens[1])? / 100.0;
    let lightness = percentage(tokens[2])? / 100.0;
    let alpha = optional_alpha(&tokens)?;

    Ok(Color::from_hsl(hue, saturation, lightness, alpha))
}

fn parse_lch(text: &str) -> Result<Color, ColorParseError> {
    let args = function_args(text, &["lch"])?;
    let tokens = arguments("lch", args)?;

    let lightness = percentage(tokens[0])?;
    let chroma = match number(tokens[1])? {
        Number::Plain(v) => at_least_zero(v, tokens[1])?,
        Number::Percent(v) => at_least_zero(v, tokens[1])? / 100.0 * LCH_CHROMA_PERCENT_REFERENCE,
    };
    let hue = hue(tokens[2])?;
    let alpha = optional_alpha(&tokens)?;

    Ok(Color::from_lch(lightness, chroma, hue, alpha))
}

/// Strip `name(` ... `)` and return what is between the parentheses.
fn function_args<'a>(text: &'a str, names: &[&str]) -> Result<&'a str, ColorParseError> {
    names
        .iter()
        .find_map(|name| {
            text.strip_prefix(*name)?
                .trim_start()
                .strip_prefix('(')?
                .strip_suffix(')')
        })
        .ok_or_else(|| ColorParseError::UnknownFormat(text.to_string()))
}

/// Split an argument list into three or four tokens.
///
/// Either commas or whitespace separate the components, and a single `/`
/// may introduce alpha. Empty comma or slash fields are rejected.
fn arguments<'a>(
    function: &'static str,
    args: &'a str,
) -> Result<Vec<&'a str>, ColorParseError> {
    let mut parts = args.split('/');
    let components = parts.next().unwrap_or_default();
    let alpha = parts.next();
    if parts.next().is_some() {
        return Err(ColorParseError::InvalidNumber(args.trim().to_string()));
    }

    let mut tokens: Vec<&str> = if components.contains(',') {
        components
            .split(',')
            .map(|field| field_token(field, args))
            .collect::<Result<_, _>>()?
    } else {
        components.split_whitespace().collect()
    };
    if let Some(alpha) = alpha {
        tokens.push(field_token(alpha, args)?);
    }

    if !(3..=4).contains(&tokens.len()) {
        return Err(ColorParseError::ArgumentCount {
            function,
            expected: "3 or 4",
            found: tokens.len(),
        });
    }
    Ok(tokens)
}

/// A separated field must hold exactly one token.
fn field_token<'a>(field: &'a str, args: &str) -> Result<&'a str, ColorParseError> {
    let field = field.trim();
    if field.is_empty() || field.contains(char::is_whitespace) {
        return Err(ColorParseError::InvalidNumber(args.trim().to_string()));
    }
    Ok(field)
}

enum Number {
    Plain(f32),
    Percent(f32),
}

fn number(token: &str) -> Result<Number, ColorParseError> {
    let (digits, percent) = match token.strip_suffix('%') {
        Some(digits) => (digits, true),
        None => (token, false),
    };

    let value: f32 = digits
        .parse()
        .map_err(|_| ColorParseError::InvalidNumber(token.to_string()))?;
    if !value.is_finite() {
        return Err(ColorParseError::InvalidNumber(token.to_string()));
    }

    Ok(if percent {
        Number::Percent(value)
    } else {
        Number::Plain(value)
    })
}

fn within(value: f32, min: f32, max: f32, token: &str) -> Result<f32, ColorParseError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ColorParseError::OutOfRange(token.to_string()))
    }
}

fn at_least_zero(value: f32, token: &str) -> Result<f32, ColorParseError> {
    within(value, 0.0, f32::MAX, token)
}

fn rgb_channel(token: &str) -> Result<f32, ColorParseError> {
    match number(token)? {
        Number::Plain(v) => Ok(within(v, 0.0, 255.0, token)? / 255.0),
        Number::Percent(v) => Ok(within(v, 0.0, 100.0, token)? / 100.0),
    }
}

/// A `0..=100` quantity; the `%` sign is optional.
fn percentage(token: &str) -> Result<f32, ColorParseError> {
    match number(token)? {
        Number::Plain(v) | Number::Percent(v) => within(v, 0.0, 100.0, token),
    }
}

/// Degrees, optionally suffixed with `deg`. Any finite angle is accepted.
fn hue(token: &str) -> Result<f32, ColorParseError> {
    let digits = token.strip_suffix("deg").unwrap_or(token);
    match number(digits)? {
        Number::Plain(v) => Ok(v),
        Number::Percent(_) => Err(ColorParseError::InvalidNumber(token.to_string())),
    }
}

fn optional_alpha(tokens: &[&str]) -> Result<f32, ColorParseError> {
    let Some(token) = tokens.get(3) else {
        return Ok(1.0);
    };
    match number(token)? {
        Number::Plain(v) => within(v, 0.0, 1.0, token),
        Number::Percent(v) => Ok(within(v, 0.0, 100.0, token)? / 100.0),
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

impl TryFrom<&str> for Color {
    type Error = ColorParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        parse(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::serialize;

    const ONE_STEP: f32 = 1.0 / 255.0;

    fn assert_near(actual: Color, expected: Color, tolerance: f32) {
        let delta = actual.max_channel_delta(&expected);
        assert!(
            delta <= tolerance,
            "{actual:?} differs from {expected:?} by {delta}"
        );
    }

    #[test]
    fn lenient_inputs_parse_to_white() {
        for text in [
            "#FFF",
            "#ffffff",
            "rgb(255,255,255)",
            "rgb(255 255 255)",
            "hsl(0, 0%, 100%)",
        ] {
            let color = parse(text).unwrap_or_else(|e| panic!("{text}: {e}"));
            assert_near(color, Color::WHITE, 1e-6);
        }
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(
            parse("notacolor"),
            Err(ColorParseError::UnknownFormat("notacolor".into()))
        );
        assert_eq!(
            parse("rgb(256,0,0)"),
            Err(ColorParseError::OutOfRange("256".into()))
        );
        assert_eq!(parse("#12"), Err(ColorParseError::InvalidLength(2)));
        assert_eq!(parse("   "), Err(ColorParseError::Empty));
    }

    #[test]
    fn hex_forms() {
        assert_eq!(parse("abc").unwrap(), Color::from_rgb8(0xaa, 0xbb, 0xcc));
        assert_eq!(
            parse("#abcd").unwrap(),
            Color::from_rgba8(0xaa, 0xbb, 0xcc, 0xdd)
        );
        assert_eq!(
            parse("  #00D4FF80 ").unwrap(),
            Color::from_rgba8(0x00, 0xd4, 0xff, 0x80)
        );
        assert_eq!(
            parse("#zzzzzz"),
            Err(ColorParseError::InvalidHex("#zzzzzz".into()))
        );
        assert_eq!(parse("#1234567"), Err(ColorParseError::InvalidLength(7)));
    }

    #[test]
    fn rgb_variants() {
        let red = Color::from_rgb8(255, 0, 0);
        assert_eq!(parse("RGB(255, 0, 0)").unwrap(), red);
        assert_eq!(parse("rgb(100%, 0%, 0%)").unwrap(), red);
        assert_eq!(
            parse("rgba(255, 0, 0, 0.5)").unwrap(),
            Color::with_alpha(1.0, 0.0, 0.0, 0.5)
        );
        assert_eq!(
            parse("rgb(255 0 0 / 50%)").unwrap(),
            Color::with_alpha(1.0, 0.0, 0.0, 0.5)
        );
    }

    #[test]
    fn rgb_argument_errors() {
        assert_eq!(
            parse("rgb(1, 2)"),
            Err(ColorParseError::ArgumentCount {
                function: "rgb",
                expected: "3 or 4",
                found: 2,
            })
        );
        assert_eq!(
            parse("rgb(1, 2, x)"),
            Err(ColorParseError::InvalidNumber("x".into()))
        );
        assert_eq!(
            parse("rgb(0, 0, 0, 2)"),
            Err(ColorParseError::OutOfRange("2".into()))
        );
        assert!(parse("rgb(0, 0, 0").is_err());
    }

    #[test]
    fn empty_fields_are_rejected() {
        for text in [
            "rgb(255,,0,0)",
            "rgb(255,,255,255)",
            "rgb(10,,20,30)",
            "rgb(10, 20, 30,)",
            "rgb(,10, 20, 30)",
            "hsl(0, 0%, 100%, )",
            "rgb(10 20 30 /)",
            "rgb(10 20 30 / / 1)",
            "rgb(10 20, 30)",
        ] {
            assert!(parse(text).is_err(), "{text} should not parse");
        }
    }

    #[test]
    fn hsl_variants() {
        let lime = Color::from_rgb8(0, 255, 0);
        assert_near(parse("hsl(120deg 100% 50%)").unwrap(), lime, 1e-5);
        assert_near(parse("HSLA(480, 100%, 50%, 1)").unwrap(), lime, 1e-5);
        assert_eq!(
            parse("hsl(0, 120%, 50%)"),
            Err(ColorParseError::OutOfRange("120%".into()))
        );
    }

    #[test]
    fn lch_variants() {
        assert_near(parse("lch(100% 0 0)").unwrap(), Color::WHITE, 1e-3);
        assert_near(parse("LCH(0% 0.0 0)").unwrap(), Color::BLACK, 1e-3);

        let translucent = parse("lch(50% 20 180 / 0.5)").unwrap();
        assert_eq!(translucent.alpha(), 0.5);

        assert_eq!(
            parse("lch(50% -1 0)"),
            Err(ColorParseError::OutOfRange("-1".into()))
        );
    }

    #[test]
    fn lch_outside_srgb_is_clamped() {
        let color = parse("lch(60% 180 140)").unwrap();
        for channel in [color.red(), color.green(), color.blue()] {
            assert!((0.0..=1.0).contains(&channel));
        }
    }

    #[test]
    fn detection_reports_grammar_in_order() {
        assert_eq!(detect("123456").unwrap().0, ColorFormat::Hex);
        assert_eq!(detect("hsl(0 0% 0%)").unwrap().0, ColorFormat::Hsl);
        assert_eq!(detect("rgb(0 0 0)").unwrap().0, ColorFormat::Rgb);
        assert_eq!(detect("lch(0% 0 0)").unwrap().0, ColorFormat::Lch);
    }

    #[test]
    fn parse_as_restricts_grammar() {
        assert!(parse_as("#fff", ColorFormat::Rgb).is_err());
        assert!(parse_as("rgb(1, 2, 3)", ColorFormat::Rgb).is_ok());
    }

    #[test]
    fn hex_round_trip_is_exact() {
        for (r, g, b, a) in [
            (0, 0, 0, 255),
            (255, 255, 255, 255),
            (18, 52, 86, 255),
            (203, 182, 172, 255),
            (1, 2, 3, 4),
            (250, 128, 7, 128),
        ] {
            let color = Color::from_rgba8(r, g, b, a);
            assert_eq!(parse(&serialize(&color, ColorFormat::Hex)).unwrap(), color);
        }
    }

    #[test]
    fn rgb_round_trip_is_exact_for_opaque_colors() {
        for (r, g, b) in [(0, 0, 0), (18, 52, 86), (203, 182, 172), (255, 128, 7)] {
            let color = Color::from_rgb8(r, g, b);
            assert_eq!(parse(&serialize(&color, ColorFormat::Rgb)).unwrap(), color);
        }
    }

    #[test]
    fn hsl_round_trip_within_one_step_for_primaries_and_grays() {
        for (r, g, b) in [
            (255, 0, 0),
            (0, 255, 0),
            (0, 0, 255),
            (255, 255, 0),
            (0, 128, 128),
            (128, 128, 128),
            (255, 255, 255),
            (0, 0, 0),
        ] {
            let color = Color::from_rgb8(r, g, b);
            let back = parse(&serialize(&color, ColorFormat::Hsl)).unwrap();
            assert_near(back, color, ONE_STEP);
        }
    }

    /// Integer percentages and whole-degree hues cost up to about 4.7 steps.
    #[test]
    fn hsl_round_trip_stays_within_five_steps() {
        let levels = || (0..=255u8).step_by(5);
        for r in levels() {
            for g in levels() {
                for b in levels() {
                    let color = Color::from_rgb8(r, g, b);
                    let text = serialize(&color, ColorFormat::Hsl);
                    let back = parse(&text).unwrap();
                    assert_near(back, color, 5.0 * ONE_STEP);
                }
            }
        }
    }

    #[test]
    fn alpha_survives_functional_round_trips() {
        for a in 0..=255u8 {
            let color = Color::from_rgba8(10, 20, 30, a);
            for format in [ColorFormat::Rgb, ColorFormat::Hsl] {
                let text = serialize(&color, format);
                let back = parse(&text).unwrap();
                let delta = (back.alpha() - color.alpha()).abs();
                assert!(delta <= ONE_STEP, "{text}: alpha off by {delta}");
            }
        }
    }

    #[test]
    fn lch_round_trip() {
        for color in [
            Color::WHITE,
            Color::BLACK,
            Color::from_rgb8(128, 128, 128),
        ] {
            let back = parse(&serialize(&color, ColorFormat::Lch)).unwrap();
            assert_near(back, color, ONE_STEP);
        }

        let slate = Color::from_rgb8(100, 120, 140);
        let back = parse(&serialize(&slate, ColorFormat::Lch)).unwrap();
        assert_near(back, slate, 2.0 * ONE_STEP);
    }

    #[test]
    fn from_str_and_try_from() {
        let a: Color = "#102030".parse().unwrap();
        let b = Color::try_from("rgb(16, 32, 48)").unwrap();
        assert_eq!(a, b);
    }
}
