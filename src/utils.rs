use image::{Rgb, Rgba};
use palette::{LinSrgb, Srgb};

// BT.709 luminance weights, applied to linear light.
const LUMA_RED: f32 = 0.2126;
const LUMA_GREEN: f32 = 0.7152;
const LUMA_BLUE: f32 = 0.0722;

/// Parses `#rrggbb`, `rrggbb` or `#rgb`. Returns `None` for anything else.
pub fn hex_to_rgb(hex: &str) -> Option<Rgb<u8>> {
    let (digits, prefixed) = match hex.strip_prefix('#') {
        Some(digits) => (digits, true),
        None => (hex, false),
    };
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    match digits.len() {
        6 => {
            let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
            let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
            let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
            Some(Rgb([r, g, b]))
        }
        // short form only with the leading #
        3 if prefixed => {
            let mut channels = [0u8; 3];
            for (channel, digit) in channels.iter_mut().zip(digits.chars()) {
                let value = digit.to_digit(16)? as u8;
                *channel = value * 16 + value;
            }
            Some(Rgb(channels))
        }
        _ => None,
    }
}

pub fn rgb_to_hex(color: Rgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}

pub fn composite_over_white(pixel: Rgba<u8>) -> Rgb<u8> {
    let alpha = pixel[3] as u32;
    let blend = |channel: u8| -> u8 {
        // rounded (c * a + 255 * (255 - a)) / 255
        ((channel as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8
    };

    Rgb([blend(pixel[0]), blend(pixel[1]), blend(pixel[2])])
}

/// Perceptual luminance of an sRGB pixel, re-encoded as an sRGB grey level.
pub fn luminance(pixel: Rgb<u8>) -> u8 {
    let linear: LinSrgb = Srgb::new(pixel[0], pixel[1], pixel[2])
        .into_format::<f32>()
        .into_linear();
    let y = (LUMA_RED * linear.red + LUMA_GREEN * linear.green + LUMA_BLUE * linear.blue)
        .clamp(0.0, 1.0);

    let grey: Srgb<u8> = Srgb::<f32>::from_linear(LinSrgb::new(y, y, y)).into_format();
    grey.red
}

pub fn channel_mean(pixel: Rgb<u8>) -> f64 {
    let sum = pixel[0] as f64 + pixel[1] as f64 + pixel[2] as f64;
    sum / 3.0 / 255.0
}
