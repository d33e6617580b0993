//! Colour helpers for filled shapes
//!
//! Colours are parsed with the `color` crate, so any CSS colour is accepted
//! as a base; generated colours are `#rrggbb` strings. Every generated colour
//! keeps a WCAG contrast ratio of at least 4.5:1 against black text so labels
//! stay readable.

use std::str::FromStr;

use color::{AlphaColor, DynamicColor, Hsl, LinearSrgb, Srgb};
use rand::Rng;

use super::error::{Result, SketchError};

/// Fixed palette used by [`ColorTechnique::Palette`](crate::sketch::ColorTechnique)
pub const PALETTE: &[&str] = &[
    "#EF476F", "#FFD166", "#06D6A0", "#118AB2", "#FC5185", "#FFCE66", "#6EC4E8", "#E8AEB7",
    "#EDC7B7", "#FF8A5B", "#F4C2C2", "#BDBDBD", "#EDF5E1", "#F7FFF7", "#FFA500", "#FFC0CB",
    "#FF4500", "#FFA07A", "#FF69B4", "#FFD700", "#00FF00", "#FF00FF", "#BA55D3", "#00FA9A",
    "#00FFFF", "#FFB6C1", "#9ACD32", "#FFFF00", "#FF7F50", "#00BFFF", "#FFDAB9", "#FFFFE0",
    "#FFE4E1", "#C0C0C0", "#808080",
];

/// Minimum contrast ratio against black text
pub const MIN_CONTRAST: f64 = 4.5;

/// Parse any CSS colour into sRGB
pub fn parse(color: &str) -> Result<AlphaColor<Srgb>> {
    DynamicColor::from_str(color)
        .map(|c| c.to_alpha_color::<Srgb>())
        .map_err(|e| SketchError::malformed_input(format!("invalid colour '{}': {}", color, e)))
}

/// Opaque sRGB colour from 8-bit components
pub fn from_rgb8(red: u8, green: u8, blue: u8) -> AlphaColor<Srgb> {
    AlphaColor::new([
        f32::from(red) / 255.0,
        f32::from(green) / 255.0,
        f32::from(blue) / 255.0,
        1.0,
    ])
}

/// Snap a colour to the nearest 8-bit sRGB colour
fn quantize(color: AlphaColor<Srgb>) -> AlphaColor<Srgb> {
    let rgba = color.to_rgba8();
    from_rgb8(rgba.r, rgba.g, rgba.b)
}

/// WCAG relative luminance, computed from linear sRGB
pub fn relative_luminance(color: AlphaColor<Srgb>) -> f64 {
    let [r, g, b, _] = color.convert::<LinearSrgb>().components;
    f64::from(0.2126 * r + 0.7152 * g + 0.0722 * b)
}

/// Contrast ratio of a colour against pure black
pub fn contrast_with_black(color: AlphaColor<Srgb>) -> f64 {
    (relative_luminance(color) + 0.05) / 0.05
}

/// Format as `#rrggbb`, dropping alpha
pub fn to_hex(color: AlphaColor<Srgb>) -> String {
    let rgba = color.to_rgba8();
    format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
}

/// Generate a random colour readable behind black text
pub fn random_hex_color<R: Rng + ?Sized>(rng: &mut R) -> String {
    loop {
        let color = from_rgb8(rng.random(), rng.random(), rng.random());
        if contrast_with_black(color) >= MIN_CONTRAST {
            return to_hex(color);
        }
    }
}

/// Pick a palette colour, avoiding `exclude` when possible
pub fn palette_color<R: Rng + ?Sized>(rng: &mut R, exclude: Option<&str>) -> String {
    let choices: Vec<&str> = PALETTE
        .iter()
        .copied()
        .filter(|c| exclude.map_or(true, |e| !c.eq_ignore_ascii_case(e)))
        .collect();
    let pool = if choices.is_empty() { PALETTE } else { &choices[..] };
    pool[rng.random_range(0..pool.len())].to_string()
}

/// Sample a colour whose hue sits 90 to 270 degrees away from `base`.
///
/// Saturation drops by 10 points and lightness rises by 10 (HSL, 0 to 100);
/// a result too dark for black text is lightened in steps of 5 until it is
/// readable. Lightness 100 is white, so the loop always ends.
pub fn sample_color<R: Rng + ?Sized>(base: &str, rng: &mut R) -> Result<String> {
    let [hue, saturation, lightness, _] = parse(base)?.convert::<Hsl>().components;
    let hue = if hue.is_finite() { hue } else { 0.0 };

    let hue = (hue + 90.0 + 180.0 * rng.random::<f32>()).rem_euclid(360.0);
    let saturation = (saturation - 10.0).clamp(0.0, 100.0);
    let mut lightness = (lightness + 10.0).clamp(0.0, 100.0);

    loop {
        let candidate =
            quantize(AlphaColor::<Hsl>::new([hue, saturation, lightness, 1.0]).convert::<Srgb>());
        if contrast_with_black(candidate) >= MIN_CONTRAST || lightness >= 100.0 {
            return Ok(to_hex(candidate));
        }
        lightness = (lightness + 5.0).min(100.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn contrast_of(hex: &str) -> f64 {
        contrast_with_black(parse(hex).unwrap())
    }

    #[test]
    fn test_parse_css_colours() {
        assert_eq!(to_hex(parse("#FF0080").unwrap()), "#ff0080");
        assert_eq!(to_hex(parse("blue").unwrap()), "#0000ff");
        assert!(parse("not-a-colour").is_err());
        assert!(parse("#gg0000").is_err());
    }

    #[test]
    fn test_contrast_extremes() {
        assert!((contrast_of("#ffffff") - 21.0).abs() < 1e-3);
        assert!((contrast_of("#000000") - 1.0).abs() < 1e-6);
        assert!(contrast_of("#0000ff") < MIN_CONTRAST);
        assert!(contrast_of("#ffd166") > MIN_CONTRAST);
    }

    #[test]
    fn test_random_colors_are_readable() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let color = random_hex_color(&mut rng);
            assert_eq!(color.len(), 7);
            assert!(contrast_of(&color) >= MIN_CONTRAST, "{color}");
        }
    }

    #[test]
    fn test_sampled_colors_are_readable() {
        let mut rng = StdRng::seed_from_u64(11);
        for base in ["#0000ff", "#118AB2", "#ffffff", "#000000", "#EF476F", "navy"] {
            for _ in 0..50 {
                let color = sample_color(base, &mut rng).unwrap();
                assert!(contrast_of(&color) >= MIN_CONTRAST, "{base} -> {color}");
            }
        }
    }

    #[test]
    fn test_sampled_hue_moves_away_from_base() {
        let mut rng = StdRng::seed_from_u64(5);
        let base_hue = parse("#ff0000").unwrap().convert::<Hsl>().components[0];
        for _ in 0..50 {
            let sampled = sample_color("#ff0000", &mut rng).unwrap();
            let hue = parse(&sampled).unwrap().convert::<Hsl>().components[0];
            let distance = (hue - base_hue).rem_euclid(360.0);
            assert!((85.0..=275.0).contains(&distance), "{sampled} at {hue}");
        }
    }

    #[test]
    fn test_sample_color_rejects_garbage() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(sample_color("not-a-colour", &mut rng).is_err());
    }

    #[test]
    fn test_palette_color_excludes_parent() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            assert_ne!(palette_color(&mut rng, Some("#ef476f")), "#EF476F");
        }
    }
}
