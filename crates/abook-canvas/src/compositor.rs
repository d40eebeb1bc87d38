// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Frame compositor — visible layers into the viewport, then onto the
// rotated display.

use image::{Rgba, RgbaImage, imageops};

use crate::geometry::DisplayGeometry;
use crate::layer::Layer;
use crate::raster::overlay;

pub const PAPER: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const TOOLBAR_BACKGROUND: Rgba<u8> = Rgba([230, 230, 230, 255]);
pub const STATUS_BAR_BACKGROUND: Rgba<u8> = Rgba([245, 245, 245, 255]);

/// Composite the scrolled window `[0, scroll_y, width, visible_height]` of
/// every visible layer, bottom to top, over white paper.
///
/// Rows past the end of a layer's raster contribute nothing.
pub fn compose_visible<'a>(
    layers: impl IntoIterator<Item = &'a Layer>,
    scroll_y: u32,
    width: u32,
    visible_height: u32,
) -> RgbaImage {
    let mut frame = RgbaImage::from_pixel(width, visible_height, PAPER);
    for layer in layers.into_iter().filter(|l| l.visible) {
        if scroll_y >= layer.height() {
            continue;
        }
        let rows = visible_height.min(layer.height() - scroll_y);
        let cols = width.min(layer.width());
        let window = imageops::crop_imm(&layer.pixels, 0, scroll_y, cols, rows).to_image();
        overlay(&mut frame, &window, 0, 0);
    }
    frame
}

/// Place the viewport buffer in a portrait frame beside the toolbar and
/// below the status bar.
pub fn render_portrait(viewport: &RgbaImage, geometry: &DisplayGeometry) -> RgbaImage {
    let mut frame = RgbaImage::from_pixel(geometry.portrait_width, geometry.portrait_height, PAPER);
    for (x, y, pixel) in frame.enumerate_pixels_mut() {
        if x < geometry.toolbar_width {
            *pixel = TOOLBAR_BACKGROUND;
        } else if y < geometry.status_bar_height {
            *pixel = STATUS_BAR_BACKGROUND;
        }
    }
    imageops::replace(
        &mut frame,
        viewport,
        geometry.toolbar_width as i64,
        geometry.status_bar_height as i64,
    );
    frame
}

/// Rotate a portrait frame 90° counter-clockwise for the landscape window.
pub fn rotate_for_display(portrait: &RgbaImage) -> RgbaImage {
    imageops::rotate270(portrait)
}
