//! 8-bit pixel colors and the small amount of color math the effects need.
//!
//! Pixels are stored as `Srgb<u8>`. Hues follow the LED-strip convention of a
//! full color wheel mapped onto `0..=255`, converted through `palette::Hsv`.

use palette::{FromColor, Hsv, Srgb};

/// One pixel cell: three 8-bit channels.
pub type Rgb8 = Srgb<u8>;

pub const BLACK: Rgb8 = Srgb::new(0, 0, 0);
pub const WHITE: Rgb8 = Srgb::new(255, 255, 255);
pub const RED: Rgb8 = Srgb::new(255, 0, 0);
pub const GREEN: Rgb8 = Srgb::new(0, 255, 0);
pub const BLUE: Rgb8 = Srgb::new(0, 0, 255);
/// Turn-signal amber.
pub const AMBER: Rgb8 = Srgb::new(255, 110, 0);

/// Creates a pixel color from 8-bit hue, saturation and value.
///
/// `hue` wraps the full color wheel over `0..=255`.
#[inline]
pub fn hsv8(hue: u8, saturation: u8, value: u8) -> Rgb8 {
    let degrees = f32::from(hue) * (360.0 / 256.0);
    let hsv = Hsv::new(
        degrees,
        f32::from(saturation) / 255.0,
        f32::from(value) / 255.0,
    );
    Srgb::<f32>::from_color(hsv).into_format::<u8>()
}

/// Creates a fully saturated, full brightness color from an 8-bit hue.
#[inline]
pub fn hue8(hue: u8) -> Rgb8 {
    hsv8(hue, 255, 255)
}

/// Adds `overlay` to `base` per channel, capping at 255.
#[inline]
pub fn saturating_add(base: Rgb8, overlay: Rgb8) -> Rgb8 {
    Srgb::new(
        base.red.saturating_add(overlay.red),
        base.green.saturating_add(overlay.green),
        base.blue.saturating_add(overlay.blue),
    )
}

/// Scales one channel by `scale / 256`.
#[inline]
pub fn scale8(value: u8, scale: u8) -> u8 {
    ((u16::from(value) * (u16::from(scale) + 1)) >> 8) as u8
}

/// Dims a color by `amount / 256` toward black.
#[inline]
pub fn fade_to_black(color: Rgb8, amount: u8) -> Rgb8 {
    let keep = 255 - amount;
    Srgb::new(
        scale8(color.red, keep),
        scale8(color.green, keep),
        scale8(color.blue, keep),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale8_keeps_full_scale() {
        assert_eq!(scale8(255, 255), 255);
        assert_eq!(scale8(200, 255), 200);
        assert_eq!(scale8(255, 0), 0);
    }

    #[test]
    fn fade_by_zero_is_identity() {
        let c = Srgb::new(10, 128, 255);
        assert_eq!(fade_to_black(c, 0), c);
    }

    #[test]
    fn fade_by_full_goes_black() {
        assert_eq!(fade_to_black(WHITE, 255), BLACK);
    }
}
