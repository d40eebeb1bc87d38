// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Display and canvas dimensions. Every pixel constant of the notepad lives here.

/// Integer pixel position. Which space it belongs to (landscape display,
/// portrait display, or canvas) is fixed by the function producing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Physical display layout.
///
/// Content is authored on a portrait surface and rotated 90° before it
/// reaches the landscape window. The canvas sits right of the toolbar and
/// below the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayGeometry {
    pub portrait_width: u32,
    pub portrait_height: u32,
    pub toolbar_width: u32,
    pub status_bar_height: u32,
    /// Height of one virtual page; also the canvas growth increment.
    pub page_height: u32,
    /// Pages allocated up front for every layer raster.
    pub pages_per_layer: u32,
}

impl Default for DisplayGeometry {
    fn default() -> Self {
        Self {
            portrait_width: 600,
            portrait_height: 1024,
            toolbar_width: 80,
            status_bar_height: 25,
            page_height: 1024,
            pages_per_layer: 5,
        }
    }
}

impl DisplayGeometry {
    /// Width of every layer raster.
    pub fn canvas_width(&self) -> u32 {
        self.portrait_width - self.toolbar_width
    }

    /// Initial height of every layer raster.
    pub fn canvas_height(&self) -> u32 {
        self.page_height * self.pages_per_layer
    }

    /// Rows of canvas visible below the status bar.
    pub fn visible_height(&self) -> u32 {
        self.portrait_height - self.status_bar_height
    }

    /// Size of the outer landscape window, `(width, height)`.
    pub fn landscape_size(&self) -> (u32, u32) {
        (self.portrait_height, self.portrait_width)
    }

    /// Landscape window point to portrait authoring point.
    pub fn to_portrait(&self, landscape: Point) -> Point {
        Point::new(self.portrait_width as i32 - landscape.y, landscape.x)
    }

    /// Inverse of [`to_portrait`](Self::to_portrait).
    pub fn to_landscape(&self, portrait: Point) -> Point {
        Point::new(portrait.y, self.portrait_width as i32 - portrait.x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_dimensions() {
        let g = DisplayGeometry::default();
        assert_eq!(g.canvas_width(), 520);
        assert_eq!(g.canvas_height(), 5120);
        assert_eq!(g.visible_height(), 999);
        assert_eq!(g.landscape_size(), (1024, 600));
    }
}
