//! CSS color parsing and perceptual darkening.
//!
//! Background colors arrive as CSS color strings and are parsed opaquely.
//! The gradient fill derives its outer stop by darkening the base color in
//! CIE Lab space: lightness drops by 18 per unit of magnitude, so the
//! adjustment is perceptually even across hues.

use palette::{FromColor, Lab, LinSrgb, Srgb};
use thiserror::Error;

/// Lab lightness decrease per unit of darkening magnitude.
const LIGHTNESS_STEP: f32 = 18.0;

/// Error for unparseable color strings.
#[derive(Debug, Error)]
#[error("invalid color {input:?}: {reason}")]
pub struct ColorError {
    /// The rejected input string
    pub input: String,
    /// Parser-supplied reason
    pub reason: String,
}

/// An sRGB color with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);
    pub const TRANSPARENT: Rgba = Rgba {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Parse a CSS color string (hex, rgb(), hsl(), named colors, ...).
pub fn parse_color(input: &str) -> Result<Rgba, ColorError> {
    let parsed = csscolorparser::parse(input).map_err(|e| ColorError {
        input: input.to_string(),
        reason: e.to_string(),
    })?;

    let [r, g, b, a] = parsed.to_rgba8();
    Ok(Rgba::new(r, g, b, a))
}

/// Darken a color by `magnitude` in Lab space.
///
/// Lightness decreases by 18 per unit; chroma and alpha are preserved.
/// A negative magnitude brightens. Out-of-gamut results are clamped back
/// into sRGB.
pub fn darken(color: Rgba, magnitude: f64) -> Rgba {
    let srgb = Srgb::new(
        color.r as f32 / 255.0,
        color.g as f32 / 255.0,
        color.b as f32 / 255.0,
    );

    let mut lab: Lab = Lab::from_color(srgb.into_linear());
    lab.l = (lab.l - LIGHTNESS_STEP * magnitude as f32).clamp(0.0, 100.0);

    let out: Srgb = Srgb::from_linear(LinSrgb::from_color(lab));
    Rgba {
        r: (out.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        g: (out.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        b: (out.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
        a: color.a,
    }
}

/// Relative luminance of a color, used by tests to compare brightness.
#[cfg(test)]
pub(crate) fn luminance(color: Rgba) -> f64 {
    0.2126 * color.r as f64 + 0.7152 * color.g as f64 + 0.0722 * color.b as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        let color = parse_color("#ff8000").unwrap();
        assert_eq!(color, Rgba::opaque(255, 128, 0));
    }

    #[test]
    fn test_parse_short_hex() {
        let color = parse_color("#fff").unwrap();
        assert_eq!(color, Rgba::WHITE);
    }

    #[test]
    fn test_parse_named() {
        let color = parse_color("rebeccapurple").unwrap();
        assert_eq!(color, Rgba::opaque(102, 51, 153));
    }

    #[test]
    fn test_parse_rgb_function() {
        let color = parse_color("rgb(10, 20, 30)").unwrap();
        assert_eq!(color, Rgba::opaque(10, 20, 30));
    }

    #[test]
    fn test_parse_rgba_alpha() {
        let color = parse_color("rgba(10, 20, 30, 0.5)").unwrap();
        assert_eq!(color.a, 128);
    }

    #[test]
    fn test_parse_invalid() {
        let err = parse_color("not-a-color").unwrap_err();
        assert_eq!(err.input, "not-a-color");
    }

    #[test]
    fn test_darken_reduces_luminance() {
        let base = parse_color("#438edb").unwrap();
        let darker = darken(base, 1.0);
        assert!(luminance(darker) < luminance(base));
    }

    #[test]
    fn test_darken_zero_is_near_identity() {
        let base = Rgba::opaque(67, 142, 219);
        let same = darken(base, 0.0);

        // Round-trip through Lab may shift a component by one step
        assert!((same.r as i32 - base.r as i32).abs() <= 1);
        assert!((same.g as i32 - base.g as i32).abs() <= 1);
        assert!((same.b as i32 - base.b as i32).abs() <= 1);
    }

    #[test]
    fn test_darken_is_monotone_in_magnitude() {
        let base = Rgba::opaque(200, 180, 160);
        let one = darken(base, 1.0);
        let two = darken(base, 2.0);
        assert!(luminance(two) < luminance(one));
    }

    #[test]
    fn test_darken_negative_brightens() {
        let base = Rgba::opaque(100, 100, 100);
        let brighter = darken(base, -1.0);
        assert!(luminance(brighter) > luminance(base));
    }

    #[test]
    fn test_darken_black_saturates() {
        let black = Rgba::opaque(0, 0, 0);
        let darker = darken(black, 3.0);
        assert_eq!(darker, black);
    }

    #[test]
    fn test_darken_preserves_alpha() {
        let base = Rgba::new(80, 120, 160, 77);
        let darker = darken(base, 1.5);
        assert_eq!(darker.a, 77);
    }
}
