use crate::utils::{hex_to_rgb, rgb_to_hex};

use image::Rgb;
use tracing::warn;

/// The classic named colors. These win over CSS names with the same spelling,
/// so `orange` is 255,200,0 and `green` is 0,255,0.
pub const CLASSIC: [(&str, [u8; 3]); 15] = [
    ("white", [255, 255, 255]),
    ("lightgray", [192, 192, 192]),
    ("light_gray", [192, 192, 192]),
    ("gray", [128, 128, 128]),
    ("darkgray", [64, 64, 64]),
    ("dark_gray", [64, 64, 64]),
    ("black", [0, 0, 0]),
    ("red", [255, 0, 0]),
    ("pink", [255, 175, 175]),
    ("orange", [255, 200, 0]),
    ("yellow", [255, 255, 0]),
    ("green", [0, 255, 0]),
    ("magenta", [255, 0, 255]),
    ("cyan", [0, 255, 255]),
    ("blue", [0, 0, 255]),
];

/// Looks up a color by classic name, CSS name or hex literal, ignoring case.
pub fn lookup(spec: &str) -> Option<Rgb<u8>> {
    let name = spec.trim().to_ascii_lowercase();

    if let Some((_, rgb)) = CLASSIC.iter().find(|(classic, _)| *classic == name) {
        return Some(Rgb(*rgb));
    }

    if let Some(css) = palette::named::from_str(&name) {
        let (r, g, b) = css.into_components();
        return Some(Rgb([r, g, b]));
    }

    hex_to_rgb(&name)
}

pub fn resolve(key: &str, spec: &str, default: Rgb<u8>) -> Rgb<u8> {
    match lookup(spec) {
        Some(color) => color,
        None => {
            warn!(
                "Attempted to use an unknown color {:?} for {}, using {} instead",
                spec,
                key,
                rgb_to_hex(default)
            );
            default
        }
    }
}
