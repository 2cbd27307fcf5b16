//! Name hashing and HSL conversion.
//!
//! The hash is the classic base-31 polynomial over UTF-16 code units
//! with 32-bit wrapping, so a name maps to the same color on every
//! platform and across restarts.

use nabe_map_neighborhood_models::Color;

/// Base-31 polynomial hash of the name's UTF-16 code units.
#[must_use]
pub fn name_hash(name: &str) -> i32 {
    name.encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Hue in `[0, 360)`, saturation in `[70, 100)`, lightness in `[45, 70)`.
#[must_use]
pub fn hsl_components(name: &str) -> (u16, u8, u8) {
    let hash = i64::from(name_hash(name));
    let hue = hash.abs() % 360;
    let saturation = 70 + (hash * 13).abs() % 30;
    let lightness = 45 + (hash * 7).abs() % 25;

    // All three are bounded by the moduli above.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    (hue as u16, saturation as u8, lightness as u8)
}

/// Converts HSL (hue in degrees, saturation and lightness in `[0, 1]`)
/// to RGB.
#[must_use]
pub fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> Color {
    let a = saturation * lightness.min(1.0 - lightness);
    let channel = |n: f64| {
        let k = (n + hue / 30.0) % 12.0;
        let v = a.mul_add(-(k - 3.0).min(9.0 - k).clamp(-1.0, 1.0), lightness);
        to_byte(v)
    };
    Color::new(channel(0.0), channel(8.0), channel(4.0))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_byte(unit: f64) -> u8 {
    (unit * 255.0).round().clamp(0.0, 255.0) as u8
}

/// The vibrant color derived from a region name.
#[must_use]
pub fn color_from_name(name: &str) -> Color {
    let (hue, saturation, lightness) = hsl_components(name);
    hsl_to_rgb(
        f64::from(hue),
        f64::from(saturation) / 100.0,
        f64::from(lightness) / 100.0,
    )
}
