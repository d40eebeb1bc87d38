// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// A single drawable sheet: one RGBA raster plus display metadata.

use abook_core::TemplateKind;
use image::{Rgba, RgbaImage};

use crate::geometry::DisplayGeometry;
use crate::template;

/// Pixel storage of a layer. Straight (non-premultiplied) RGBA, row-major.
pub type RasterBuffer = RgbaImage;

/// Fully transparent pixel.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// One transparent sheet of a notebook page.
///
/// `modified` is set by every mutation and cleared only by the caller after a
/// successful save; nothing inside the canvas reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub pixels: RasterBuffer,
    pub visible: bool,
    pub modified: bool,
    pub template_name: String,
    pub name: String,
}

impl Layer {
    /// Allocate a transparent layer with the default canvas dimensions.
    pub fn create(template_name: impl Into<String>) -> Self {
        let geometry = DisplayGeometry::default();
        Self::with_size(geometry.canvas_width(), geometry.canvas_height(), template_name)
    }

    /// Allocate a transparent layer of an explicit size.
    pub fn with_size(width: u32, height: u32, template_name: impl Into<String>) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, TRANSPARENT),
            visible: true,
            modified: false,
            template_name: template_name.into(),
            name: "Layer 1".into(),
        }
    }

    /// Rebuild a layer from stored parts. The result is unmodified.
    pub fn from_parts(
        name: impl Into<String>,
        template_name: impl Into<String>,
        visible: bool,
        pixels: RasterBuffer,
    ) -> Self {
        Self {
            pixels,
            visible,
            modified: false,
            template_name: template_name.into(),
            name: name.into(),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Overwrite the whole raster with a template's background pattern.
    ///
    /// Prior strokes are discarded, not blended.
    pub fn apply_template(&mut self, kind: TemplateKind) {
        template::render(&mut self.pixels, kind);
        self.template_name = kind.name().to_owned();
        self.modified = true;
    }

    /// Swap in a new raster (used by undo). Dimensions must match.
    pub fn replace_pixels(&mut self, pixels: RasterBuffer) {
        debug_assert_eq!(pixels.dimensions(), self.pixels.dimensions());
        self.pixels = pixels;
        self.modified = true;
    }

    /// Whether no pixel carries any coverage.
    pub fn is_blank(&self) -> bool {
        self.pixels.pixels().all(|p| p.0[3] == 0)
    }
}
