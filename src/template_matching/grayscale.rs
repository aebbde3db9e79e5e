//! BT.601 luma conversion
//!
//! Fixed-point weights 0.299/0.587/0.114 scaled by 2^14 with round-half-up,
//! the same integer rule video decoders use for BGR to gray.

use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};

const SHIFT: u32 = 14;
const R_WEIGHT: u32 = 4899;
const G_WEIGHT: u32 = 9617;
const B_WEIGHT: u32 = 1868;
const ROUND: u32 = 1 << (SHIFT - 1);

/// Luma of a single RGB pixel
pub fn luma(pixel: &Rgb<u8>) -> u8 {
    let [r, g, b] = pixel.0;
    let weighted = r as u32 * R_WEIGHT + g as u32 * G_WEIGHT + b as u32 * B_WEIGHT;
    ((weighted + ROUND) >> SHIFT) as u8
}

/// Single-channel copy of an RGB buffer
pub fn to_luma(image: &RgbImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([luma(image.get_pixel(x, y))])
    })
}

/// Decoded image of any layout; alpha is dropped before conversion
pub fn dynamic_to_luma(image: &DynamicImage) -> GrayImage {
    to_luma(&image.to_rgb8())
}
