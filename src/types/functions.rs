//! Pure colour functions.
//!
//! These operate on canonical [`Colour`] values and plain factors; argument
//! checking and expression evaluation live in the resolver.
//!
//! - `alpha(c, f)` - set alpha to `round(f * 255)`
//! - `fade(c, f)` - multiply the existing alpha by `f`
//! - `hsl(h, s, l)` / `hsla(h, s, l, a)` - build a colour from HSL
//! - `named(word)` - CSS named colour lookup
//! - `darken`, `lighten`, `saturate`, `desaturate` - HSL adjustments
//! - `mix(a, b, f)` - linear blend

use std::fmt;
use std::str::FromStr;

use palette::{Hsl, IntoColor, Srgb};

use super::colour::unit_to_byte;
use super::Colour;

/// A built-in colour function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColourFn {
    Alpha,
    Fade,
    Hsl,
    Hsla,
    Named,
    Darken,
    Lighten,
    Saturate,
    Desaturate,
    Mix,
}

impl ColourFn {
    pub const ALL: [ColourFn; 10] = [
        ColourFn::Alpha,
        ColourFn::Fade,
        ColourFn::Hsl,
        ColourFn::Hsla,
        ColourFn::Named,
        ColourFn::Darken,
        ColourFn::Lighten,
        ColourFn::Saturate,
        ColourFn::Desaturate,
        ColourFn::Mix,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ColourFn::Alpha => "alpha",
            ColourFn::Fade => "fade",
            ColourFn::Hsl => "hsl",
            ColourFn::Hsla => "hsla",
            ColourFn::Named => "named",
            ColourFn::Darken => "darken",
            ColourFn::Lighten => "lighten",
            ColourFn::Saturate => "saturate",
            ColourFn::Desaturate => "desaturate",
            ColourFn::Mix => "mix",
        }
    }

    /// Usage string shown in error help.
    pub fn usage(self) -> &'static str {
        match self {
            ColourFn::Alpha => "alpha($colour, 0.5)",
            ColourFn::Fade => "fade($colour, 0.5)",
            ColourFn::Hsl => "hsl(210, 50%, 40%)",
            ColourFn::Hsla => "hsla(210, 50%, 40%, 0.8)",
            ColourFn::Named => "named(tomato)",
            ColourFn::Darken => "darken($colour, 20%)",
            ColourFn::Lighten => "lighten($colour, 20%)",
            ColourFn::Saturate => "saturate($colour, 20%)",
            ColourFn::Desaturate => "desaturate($colour, 20%)",
            ColourFn::Mix => "mix($a, $b, 50%)",
        }
    }

    /// Number of arguments the function takes.
    pub fn arity(self) -> usize {
        match self {
            ColourFn::Named => 1,
            ColourFn::Hsl | ColourFn::Mix => 3,
            ColourFn::Hsla => 4,
            _ => 2,
        }
    }
}

impl FromStr for ColourFn {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, ()> {
        ColourFn::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or(())
    }
}

impl fmt::Display for ColourFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set the alpha channel to an absolute factor.
pub fn alpha(colour: Colour, factor: f32) -> Colour {
    colour.with_alpha(unit_to_byte(factor))
}

/// Multiply the existing alpha channel by a factor.
pub fn fade(colour: Colour, factor: f32) -> Colour {
    let a = (colour.a as f32 * factor.clamp(0.0, 1.0)).round() as u8;
    colour.with_alpha(a)
}

/// Build an opaque colour from hue in degrees and unit saturation/lightness.
pub fn hsl(hue: f32, saturation: f32, lightness: f32) -> Colour {
    let hsl: Hsl = Hsl::new(
        hue.rem_euclid(360.0),
        saturation.clamp(0.0, 1.0),
        lightness.clamp(0.0, 1.0),
    );
    let rgb: Srgb<f32> = hsl.into_color();
    Colour::from_unit_rgb(rgb.red, rgb.green, rgb.blue)
}

/// Reduce lightness by a factor of the current lightness.
pub fn darken(colour: Colour, factor: f32) -> Colour {
    adjust_hsl(colour, |hsl| {
        hsl.lightness -= hsl.lightness * factor;
    })
}

/// Increase lightness by a factor of the remaining range.
pub fn lighten(colour: Colour, factor: f32) -> Colour {
    adjust_hsl(colour, |hsl| {
        hsl.lightness += (1.0 - hsl.lightness) * factor;
    })
}

/// Increase saturation by a factor of the remaining range.
pub fn saturate(colour: Colour, factor: f32) -> Colour {
    adjust_hsl(colour, |hsl| {
        hsl.saturation += (1.0 - hsl.saturation) * factor;
    })
}

/// Reduce saturation by a factor of the current saturation.
pub fn desaturate(colour: Colour, factor: f32) -> Colour {
    adjust_hsl(colour, |hsl| {
        hsl.saturation -= hsl.saturation * factor;
    })
}

/// Mix two colours (0.0 = first colour, 1.0 = second colour).
pub fn mix(a: Colour, b: Colour, factor: f32) -> Colour {
    let factor = factor.clamp(0.0, 1.0);
    let inv = 1.0 - factor;
    let blend = |x: u8, y: u8| ((x as f32 * inv) + (y as f32 * factor)).round() as u8;

    Colour::new(blend(a.r, b.r), blend(a.g, b.g), blend(a.b, b.b), blend(a.a, b.a))
}

/// Round-trip through HSL, applying `adjust`, keeping the original alpha.
fn adjust_hsl(colour: Colour, adjust: impl FnOnce(&mut Hsl)) -> Colour {
    let [r, g, b] = colour.to_unit_rgb();
    let rgb: Srgb<f32> = Srgb::new(r, g, b);
    let mut hsl: Hsl = rgb.into_color();

    adjust(&mut hsl);
    hsl.lightness = hsl.lightness.clamp(0.0, 1.0);
    hsl.saturation = hsl.saturation.clamp(0.0, 1.0);

    let out: Srgb<f32> = hsl.into_color();
    Colour::from_unit_rgb(out.red, out.green, out.blue).with_alpha(colour.a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_is_absolute() {
        let c = Colour::from_hex("#336699").unwrap();
        assert_eq!(alpha(c, 0.5).to_string(), "#33669980");

        // Overwrites whatever alpha was there before
        let half = Colour::from_hex("#33669980").unwrap();
        assert_eq!(alpha(half, 1.0).to_string(), "#336699");
    }

    #[test]
    fn test_fade_multiplies_existing_alpha() {
        let half = Colour::from_hex("#33669980").unwrap();
        assert_eq!(fade(half, 0.5).to_string(), "#33669940");
    }

    #[test]
    fn test_fade_on_opaque_matches_alpha() {
        let c = Colour::from_hex("#336699").unwrap();
        assert_eq!(fade(c, 0.5), alpha(c, 0.5));
    }

    #[test]
    fn test_hsl_primaries() {
        assert_eq!(hsl(0.0, 1.0, 0.5), Colour::rgb(255, 0, 0));
        assert_eq!(hsl(240.0, 1.0, 0.5), Colour::rgb(0, 0, 255));
        assert_eq!(hsl(0.0, 0.0, 1.0), Colour::WHITE);
        assert_eq!(hsl(360.0, 1.0, 0.5), Colour::rgb(255, 0, 0));
    }

    #[test]
    fn test_mix_black_white() {
        let grey = mix(Colour::BLACK, Colour::WHITE, 0.5);
        assert_eq!(grey, Colour::rgb(128, 128, 128));
    }

    #[test]
    fn test_darken_white_is_grey() {
        let c = darken(Colour::WHITE, 0.5);
        assert!(c.r < 255);
        assert_eq!(c.r, c.g);
        assert_eq!(c.g, c.b);
    }

    #[test]
    fn test_lighten_keeps_alpha() {
        let c = lighten(Colour::new(0, 0, 0, 0x40), 0.5);
        assert!(c.r > 0);
        assert_eq!(c.a, 0x40);
    }

    #[test]
    fn test_desaturate_fully_is_greyscale() {
        let c = desaturate(Colour::rgb(255, 0, 0), 1.0);
        assert_eq!(c.r, c.g);
        assert_eq!(c.g, c.b);
    }

    #[test]
    fn test_saturate_widens_gap() {
        let muted = Colour::from_hex("#b08080").unwrap();
        let vivid = saturate(muted, 0.5);
        assert!(vivid.r as i32 - vivid.g as i32 >= muted.r as i32 - muted.g as i32);
    }

    #[test]
    fn test_function_names_round_trip() {
        for f in ColourFn::ALL {
            assert_eq!(f.name().parse::<ColourFn>(), Ok(f));
        }
        assert!("tint".parse::<ColourFn>().is_err());
    }
}
