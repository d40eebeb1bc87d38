// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pixel-level helpers shared by the rasterizer, compositor and exporters.

use image::{Rgb, RgbImage, Rgba, RgbaImage};

/// Composite `src` over `dst` (straight alpha, Porter-Duff "over").
///
/// Results are rounded, so drawing onto a fully transparent pixel yields
/// `src` exactly.
pub fn blend_over(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    match src.0[3] {
        0 => return,
        255 => {
            *dst = src;
            return;
        }
        _ => {}
    }
    let sa = src.0[3] as f32 / 255.0;
    let da = dst.0[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return;
    }
    for c in 0..3 {
        let value = (src.0[c] as f32 * sa + dst.0[c] as f32 * da * (1.0 - sa)) / out_a;
        dst.0[c] = value.round().clamp(0.0, 255.0) as u8;
    }
    dst.0[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

/// Composite `top` onto `bottom` with `top`'s origin at `(x, y)` in `bottom`.
///
/// Parts of `top` falling outside `bottom` are ignored.
pub fn overlay(bottom: &mut RgbaImage, top: &RgbaImage, x: i64, y: i64) {
    let (bw, bh) = (bottom.width() as i64, bottom.height() as i64);
    for (tx, ty, pixel) in top.enumerate_pixels() {
        let bx = x + tx as i64;
        let by = y + ty as i64;
        if bx < 0 || by < 0 || bx >= bw || by >= bh {
            continue;
        }
        blend_over(bottom.get_pixel_mut(bx as u32, by as u32), *pixel);
    }
}

/// Flatten a transparent raster onto white paper, dropping alpha.
pub fn flatten_on_white(image: &RgbaImage) -> RgbImage {
    let mut paper = RgbaImage::from_pixel(image.width(), image.height(), Rgba([255, 255, 255, 255]));
    overlay(&mut paper, image, 0, 0);
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let p = paper.get_pixel(x, y).0;
        Rgb([p[0], p[1], p[2]])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translucent_over_transparent_is_exact() {
        let mut dst = Rgba([0, 0, 0, 0]);
        blend_over(&mut dst, Rgba([180, 180, 180, 100]));
        assert_eq!(dst, Rgba([180, 180, 180, 100]));
    }

    #[test]
    fn opaque_replaces_and_clear_is_ignored() {
        let mut dst = Rgba([1, 2, 3, 200]);
        blend_over(&mut dst, Rgba([9, 9, 9, 0]));
        assert_eq!(dst, Rgba([1, 2, 3, 200]));
        blend_over(&mut dst, Rgba([9, 8, 7, 255]));
        assert_eq!(dst, Rgba([9, 8, 7, 255]));
    }

    #[test]
    fn half_gray_over_white() {
        let mut dst = Rgba([255, 255, 255, 255]);
        blend_over(&mut dst, Rgba([0, 0, 0, 128]));
        assert_eq!(dst.0[3], 255);
        assert_eq!(dst.0[0], 127);
    }

    #[test]
    fn overlay_clips_to_bottom() {
        let mut bottom = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0]));
        let top = RgbaImage::from_pixel(4, 4, Rgba([10, 10, 10, 255]));
        overlay(&mut bottom, &top, 2, -2);
        assert_eq!(*bottom.get_pixel(2, 0), Rgba([10, 10, 10, 255]));
        assert_eq!(*bottom.get_pixel(3, 1), Rgba([10, 10, 10, 255]));
        assert_eq!(bottom.get_pixel(1, 0).0[3], 0);
        assert_eq!(bottom.get_pixel(2, 2).0[3], 0);
    }

    #[test]
    fn flatten_replaces_transparency_with_white() {
        let mut image = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 0]));
        image.put_pixel(1, 0, Rgba([20, 20, 20, 255]));
        let flat = flatten_on_white(&image);
        assert_eq!(*flat.get_pixel(0, 0), Rgb([255, 255, 255]));
        assert_eq!(*flat.get_pixel(1, 0), Rgb([20, 20, 20]));
    }
}
