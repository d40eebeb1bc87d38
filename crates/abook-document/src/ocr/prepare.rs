// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layer clean-up ahead of text recognition.

use abook_canvas::raster::flatten_on_white;
use image::imageops::{self, FilterType};
use image::{GrayImage, RgbaImage};
use imageproc::filter::sharpen3x3;
use tracing::debug;

const CONTRAST_FACTOR: f32 = 3.0;
/// Pixels at or above this become white after binarisation.
const BINARY_THRESHOLD: u8 = 220;
/// Mean brightness below which the page is treated as light-on-dark.
const INVERT_BELOW_MEAN: f32 = 127.0;
/// Pixels darker than this count as content when cropping.
const CONTENT_BELOW: u8 = 250;
const CROP_PADDING: u32 = 20;
const MIN_WIDTH: u32 = 200;
const MIN_HEIGHT: u32 = 100;
const MIN_UPSCALE: f32 = 2.0;

/// Run the full pipeline on a layer raster.
///
/// Returns `None` when the layer holds nothing darker than paper.
pub fn prepare_layer(pixels: &RgbaImage) -> Option<GrayImage> {
    let gray = imageops::grayscale(&flatten_on_white(pixels));
    let gray = boost_contrast(&gray, CONTRAST_FACTOR);
    let gray = sharpen3x3(&gray);
    let mut binary = binarize(&gray, BINARY_THRESHOLD);

    if mean_brightness(&binary) < INVERT_BELOW_MEAN {
        imageops::invert(&mut binary);
    }

    let cropped = crop_to_content(&binary, CROP_PADDING)?;
    let prepared = upscale_small(cropped);
    debug!(
        width = prepared.width(),
        height = prepared.height(),
        "layer prepared for recognition"
    );
    Some(prepared)
}

/// Stretch every pixel away from the image mean by `factor`.
pub fn boost_contrast(image: &GrayImage, factor: f32) -> GrayImage {
    let mean = mean_brightness(image);
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        let stretched = mean + factor * (f32::from(pixel.0[0]) - mean);
        pixel.0[0] = stretched.round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Pure black and white: below `threshold` is ink.
pub fn binarize(image: &GrayImage, threshold: u8) -> GrayImage {
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        pixel.0[0] = if pixel.0[0] < threshold { 0 } else { 255 };
    }
    out
}

pub fn mean_brightness(image: &GrayImage) -> f32 {
    let count = image.as_raw().len();
    if count == 0 {
        return 255.0;
    }
    let sum: u64 = image.as_raw().iter().map(|&v| u64::from(v)).sum();
    sum as f32 / count as f32
}

/// Crop to the bounding box of content pixels plus `padding`, clamped to the
/// image. `None` when there is no content.
pub fn crop_to_content(image: &GrayImage, padding: u32) -> Option<GrayImage> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel.0[0] >= CONTENT_BELOW {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    let (x0, y0, x1, y1) = bounds?;

    let left = x0.saturating_sub(padding);
    let top = y0.saturating_sub(padding);
    let right = (x1 + padding + 1).min(image.width());
    let bottom = (y1 + padding + 1).min(image.height());
    Some(imageops::crop_imm(image, left, top, right - left, bottom - top).to_image())
}

/// Enlarge images under the minimum size, at least doubling them.
pub fn upscale_small(image: GrayImage) -> GrayImage {
    let (w, h) = image.dimensions();
    if w >= MIN_WIDTH && h >= MIN_HEIGHT {
        return image;
    }
    let factor = (MIN_WIDTH as f32 / w as f32)
        .max(MIN_HEIGHT as f32 / h as f32)
        .max(MIN_UPSCALE);
    let new_w = (w as f32 * factor).round() as u32;
    let new_h = (h as f32 * factor).round() as u32;
    imageops::resize(&image, new_w, new_h, FilterType::Lanczos3)
}

#[cfg(test)]
mod tests {
    use image::{Luma, Rgba};

    use super::*;

    #[test]
    fn transparent_layer_has_no_content() {
        let layer = RgbaImage::from_pixel(120, 80, Rgba([0, 0, 0, 0]));
        assert!(prepare_layer(&layer).is_none());
    }

    #[test]
    fn ink_is_cropped_padded_and_upscaled() {
        let mut layer = RgbaImage::from_pixel(400, 300, Rgba([0, 0, 0, 0]));
        for x in 100..150 {
            for y in 140..150 {
                layer.put_pixel(x, y, Rgba([20, 20, 20, 255]));
            }
        }
        let prepared = prepare_layer(&layer).expect("content");
        // 50x10 ink + 2x20 padding = 90x50, scaled by max(200/90, 100/50, 2.0).
        assert_eq!(prepared.dimensions(), (200, 111));
        assert!(prepared.get_pixel(2, 2).0[0] > 250);
        assert!(prepared.get_pixel(100, 55).0[0] < 5);
    }

    #[test]
    fn dark_pages_are_inverted() {
        let mut layer = RgbaImage::from_pixel(300, 200, Rgba([0, 0, 0, 255]));
        layer.put_pixel(150, 100, Rgba([255, 255, 255, 255]));
        let prepared = prepare_layer(&layer).expect("content");
        let mean = mean_brightness(&prepared);
        assert!(mean > INVERT_BELOW_MEAN, "expected light background, mean {mean}");
    }

    #[test]
    fn crop_clamps_padding_to_edges() {
        let mut img = GrayImage::from_pixel(50, 40, Luma([255]));
        img.put_pixel(2, 3, Luma([0]));
        let cropped = crop_to_content(&img, 20).expect("content");
        assert_eq!(cropped.dimensions(), (23, 24));
    }

    #[test]
    fn large_images_are_not_resized() {
        let img = GrayImage::from_pixel(300, 150, Luma([255]));
        assert_eq!(upscale_small(img).dimensions(), (300, 150));
    }

    #[test]
    fn contrast_pushes_away_from_mean() {
        let mut img = GrayImage::from_pixel(2, 1, Luma([100]));
        img.put_pixel(1, 0, Luma([140]));
        let boosted = boost_contrast(&img, 3.0);
        assert_eq!(boosted.get_pixel(0, 0).0[0], 60);
        assert_eq!(boosted.get_pixel(1, 0).0[0], 180);
    }
}
