// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page templates — static background patterns stamped onto a layer.

use abook_core::TemplateKind;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;

const PAPER: Rgba<u8> = Rgba([255, 255, 255, 255]);
const MARGIN_COLOR: Rgba<u8> = Rgba([255, 200, 200, 255]);
const MARGIN_X: u32 = 80;

// Single line
const RULE_SPACING: u32 = 40;
const RULE_COLOR: Rgba<u8> = Rgba([200, 200, 255, 255]);

// Double line
const DOUBLE_SUB_SPACING: u32 = 25;
const DOUBLE_DARK: Rgba<u8> = Rgba([180, 180, 220, 255]);
const DOUBLE_LIGHT: Rgba<u8> = Rgba([220, 220, 240, 255]);

// Graph
const GRID_SIZE: u32 = 20;
const GRID_MAJOR_EVERY: u32 = 5;
const GRID_MAJOR: Rgba<u8> = Rgba([200, 200, 220, 255]);
const GRID_MINOR: Rgba<u8> = Rgba([230, 230, 240, 255]);

// Dotted
const DOT_SPACING: u32 = 25;
const DOT_RADIUS: i32 = 2;
const DOT_COLOR: Rgba<u8> = Rgba([200, 200, 220, 255]);

/// Fill `pixels` with the pattern for `kind`. Every pixel is overwritten.
pub fn render(pixels: &mut RgbaImage, kind: TemplateKind) {
    for p in pixels.pixels_mut() {
        *p = PAPER;
    }
    match kind {
        TemplateKind::Blank => {}
        TemplateKind::SingleLine => single_line(pixels),
        TemplateKind::DoubleLine => double_line(pixels),
        TemplateKind::Graph => graph(pixels),
        TemplateKind::Dotted => dotted(pixels),
    }
}

fn hline(pixels: &mut RgbaImage, y: u32, thickness: u32, color: Rgba<u8>) {
    let width = pixels.width();
    draw_filled_rect_mut(pixels, Rect::at(0, y as i32).of_size(width, thickness), color);
}

fn vline(pixels: &mut RgbaImage, x: u32, thickness: u32, color: Rgba<u8>) {
    let height = pixels.height();
    draw_filled_rect_mut(pixels, Rect::at(x as i32, 0).of_size(thickness, height), color);
}

fn single_line(pixels: &mut RgbaImage) {
    let height = pixels.height();
    let mut y = RULE_SPACING;
    while y < height {
        hline(pixels, y, 1, RULE_COLOR);
        y += RULE_SPACING;
    }
    vline(pixels, MARGIN_X, 2, MARGIN_COLOR);
}

fn double_line(pixels: &mut RgbaImage) {
    let height = pixels.height();
    let mut y = 0;
    while y < height {
        hline(pixels, y, 2, DOUBLE_DARK);
        y += DOUBLE_SUB_SPACING;
        if y < height {
            hline(pixels, y, 1, DOUBLE_LIGHT);
        }
        y += DOUBLE_SUB_SPACING;
    }
    vline(pixels, MARGIN_X, 2, MARGIN_COLOR);
}

fn graph(pixels: &mut RgbaImage) {
    let (width, height) = pixels.dimensions();
    let style = |count: u32| {
        if count % GRID_MAJOR_EVERY == 0 {
            (GRID_MAJOR, 2)
        } else {
            (GRID_MINOR, 1)
        }
    };

    for (count, x) in (0..width).step_by(GRID_SIZE as usize).enumerate() {
        let (color, thickness) = style(count as u32);
        vline(pixels, x, thickness, color);
    }
    for (count, y) in (0..height).step_by(GRID_SIZE as usize).enumerate() {
        let (color, thickness) = style(count as u32);
        hline(pixels, y, thickness, color);
    }
}

fn dotted(pixels: &mut RgbaImage) {
    let (width, height) = pixels.dimensions();
    let mut y = DOT_SPACING;
    while y < height {
        let mut x = DOT_SPACING;
        while x < width {
            draw_filled_circle_mut(pixels, (x as i32, y as i32), DOT_RADIUS, DOT_COLOR);
            x += DOT_SPACING;
        }
        y += DOT_SPACING;
    }
}
