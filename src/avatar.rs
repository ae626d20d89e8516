use crate::types::Tones;
use crate::utils::{channel_mean, composite_over_white, luminance};

use image::{DynamicImage, GenericImageView, ImageBuffer, Rgb, RgbImage};
use indicatif::ProgressBar;
use tracing::debug;

/// Runs flatten, greyscale and clamp in that order.
pub fn generate(img: &DynamicImage, tones: &Tones, pb: &ProgressBar) -> RgbImage {
    pb.set_length(3);

    // First pass: drop transparency
    pb.set_message("Pass 1: Flattening Transparency");
    let opaque = flatten(img);
    pb.inc(1);

    // Second pass: desaturate
    pb.set_message("Pass 2: Converting to Greyscale");
    let grey = greyscale(&opaque);
    pb.inc(1);

    // Third pass: map every pixel to fill or background
    pb.set_message("Pass 3: Clamping to Two Tones");
    let avatar = clamp(&grey, tones);
    pb.inc(1);

    pb.finish_with_message("Avatar generation complete");
    avatar
}

pub fn flatten(img: &DynamicImage) -> RgbImage {
    let (width, height) = img.dimensions();
    debug!(width, height, has_alpha = img.color().has_alpha(), "flattening");

    if !img.color().has_alpha() {
        return img.to_rgb8();
    }

    let rgba = img.to_rgba8();
    ImageBuffer::from_fn(width, height, |x, y| {
        composite_over_white(*rgba.get_pixel(x, y))
    })
}

pub fn greyscale(img: &RgbImage) -> RgbImage {
    let (width, height) = img.dimensions();
    debug!(width, height, "converting to greyscale");

    ImageBuffer::from_fn(width, height, |x, y| {
        let level = luminance(*img.get_pixel(x, y));
        Rgb([level, level, level])
    })
}

pub fn clamp(img: &RgbImage, tones: &Tones) -> RgbImage {
    let (width, height) = img.dimensions();
    debug!(width, height, threshold = tones.threshold, "clamping");

    ImageBuffer::from_fn(width, height, |x, y| {
        clamp_pixel(*img.get_pixel(x, y), tones)
    })
}

/// Pixels brighter than the threshold become background, the rest fill.
///
/// Brightness here is the plain channel mean, not the luminance used by
/// [`greyscale`]. A mean exactly equal to the threshold counts as fill.
pub fn clamp_pixel(pixel: Rgb<u8>, tones: &Tones) -> Rgb<u8> {
    if channel_mean(pixel) > tones.threshold {
        tones.background
    } else {
        tones.fill
    }
}
