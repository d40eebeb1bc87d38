// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stroke rasterizer — turns pointer samples into ink on a layer.
//
// Lines are drawn by stamping a filled disc at every integer step between two
// samples (step count = max(|dx|, |dy|)), which leaves no gaps at any slope.
// Pen and eraser write pixels directly. The highlighter first builds a
// coverage mask for the whole segment, then composites its translucent ink
// once per covered pixel so overlapping discs within a segment do not darken.

use abook_core::Tool;
use image::Rgba;
use tracing::trace;

use crate::geometry::Point;
use crate::layer::{Layer, TRANSPARENT};
use crate::raster::blend_over;

/// Opaque pen ink.
pub const PEN_INK: Rgba<u8> = Rgba([20, 20, 20, 255]);
/// Translucent neutral gray used by the highlighter.
pub const HIGHLIGHTER_INK: Rgba<u8> = Rgba([180, 180, 180, 100]);

// -- Dirty rectangles --------------------------------------------------------

/// Axis-aligned pixel region touched by a drawing operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl DirtyRect {
    /// Bounding box of two points grown by `pad` on every side.
    pub fn from_points(a: Point, b: Point, pad: i32) -> Self {
        let min_x = a.x.min(b.x) - pad;
        let max_x = a.x.max(b.x) + pad;
        let min_y = a.y.min(b.y) - pad;
        let max_y = a.y.max(b.y) + pad;
        Self {
            x: min_x,
            y: min_y,
            width: (max_x - min_x + 1).max(1),
            height: (max_y - min_y + 1).max(1),
        }
    }

    pub fn union(self, other: DirtyRect) -> DirtyRect {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        let max_x = (self.x + self.width).max(other.x + other.width);
        let max_y = (self.y + self.height).max(other.y + other.height);
        DirtyRect {
            x: min_x,
            y: min_y,
            width: (max_x - min_x).max(1),
            height: (max_y - min_y).max(1),
        }
    }

    /// Intersect with `[0, width) × [0, height)`; `None` when nothing remains.
    pub fn clamp(self, width: u32, height: u32) -> Option<DirtyRect> {
        let max_w = width as i32;
        let max_h = height as i32;
        let x0 = self.x.clamp(0, max_w);
        let y0 = self.y.clamp(0, max_h);
        let x1 = (self.x + self.width).clamp(0, max_w);
        let y1 = (self.y + self.height).clamp(0, max_h);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(DirtyRect {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.width && y < self.y + self.height
    }
}

// -- Tool sizes --------------------------------------------------------------

/// Allowed size range of one tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeRange {
    pub min: u32,
    pub max: u32,
    pub step: u32,
    pub default: u32,
}

impl SizeRange {
    pub const PEN: SizeRange = SizeRange { min: 1, max: 40, step: 2, default: 4 };
    pub const HIGHLIGHTER: SizeRange = SizeRange { min: 10, max: 60, step: 5, default: 20 };
    pub const ERASER: SizeRange = SizeRange { min: 5, max: 100, step: 5, default: 30 };

    pub fn for_tool(tool: Tool) -> SizeRange {
        match tool {
            Tool::Pen => Self::PEN,
            Tool::Highlighter => Self::HIGHLIGHTER,
            Tool::Eraser => Self::ERASER,
        }
    }

    pub fn clamp(&self, size: u32) -> u32 {
        size.clamp(self.min, self.max)
    }
}

/// Per-tool stroke sizes. Each size always lies inside its tool's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolSizes {
    pen: u32,
    highlighter: u32,
    eraser: u32,
}

impl Default for ToolSizes {
    fn default() -> Self {
        Self {
            pen: SizeRange::PEN.default,
            highlighter: SizeRange::HIGHLIGHTER.default,
            eraser: SizeRange::ERASER.default,
        }
    }
}

impl ToolSizes {
    /// Build from arbitrary values; each is clamped into range.
    pub fn new(pen: u32, highlighter: u32, eraser: u32) -> Self {
        Self {
            pen: SizeRange::PEN.clamp(pen),
            highlighter: SizeRange::HIGHLIGHTER.clamp(highlighter),
            eraser: SizeRange::ERASER.clamp(eraser),
        }
    }

    pub fn size(&self, tool: Tool) -> u32 {
        match tool {
            Tool::Pen => self.pen,
            Tool::Highlighter => self.highlighter,
            Tool::Eraser => self.eraser,
        }
    }

    pub fn set(&mut self, tool: Tool, size: u32) -> u32 {
        let size = SizeRange::for_tool(tool).clamp(size);
        *self.slot(tool) = size;
        size
    }

    /// Step the tool's size up, saturating at its maximum.
    pub fn increase(&mut self, tool: Tool) -> u32 {
        let range = SizeRange::for_tool(tool);
        let slot = self.slot(tool);
        *slot = (*slot + range.step).min(range.max);
        *slot
    }

    /// Step the tool's size down, saturating at its minimum.
    pub fn decrease(&mut self, tool: Tool) -> u32 {
        let range = SizeRange::for_tool(tool);
        let slot = self.slot(tool);
        *slot = slot.saturating_sub(range.step).max(range.min);
        *slot
    }

    /// Disc radius used when stamping.
    pub fn radius(&self, tool: Tool) -> i32 {
        (self.size(tool) / 2) as i32
    }

    fn slot(&mut self, tool: Tool) -> &mut u32 {
        match tool {
            Tool::Pen => &mut self.pen,
            Tool::Highlighter => &mut self.highlighter,
            Tool::Eraser => &mut self.eraser,
        }
    }
}

// -- Disc mask ---------------------------------------------------------------

/// Horizontal span of a disc at vertical offset `dy`.
#[derive(Debug, Clone, Copy)]
struct DiscRow {
    dy: i32,
    half_width: i32,
}

/// Row spans of a filled disc: pixels with `dx² + dy² <= r²`.
#[derive(Debug, Clone)]
struct DiscMask {
    radius: i32,
    rows: Vec<DiscRow>,
}

impl DiscMask {
    fn new(radius: i32) -> Self {
        let radius = radius.max(0);
        let mut rows = Vec::with_capacity((radius * 2 + 1) as usize);
        for dy in -radius..=radius {
            let mut half_width = radius;
            while half_width > 0 && half_width * half_width + dy * dy > radius * radius {
                half_width -= 1;
            }
            rows.push(DiscRow { dy, half_width });
        }
        Self { radius, rows }
    }

    /// Visit every pixel of the disc centred on `center` that falls in `clip`.
    fn for_each(&self, center: Point, clip: DirtyRect, mut f: impl FnMut(i32, i32)) {
        let clip_x1 = clip.x + clip.width - 1;
        let clip_y1 = clip.y + clip.height - 1;
        for row in &self.rows {
            let y = center.y + row.dy;
            if y < clip.y || y > clip_y1 {
                continue;
            }
            let x0 = (center.x - row.half_width).max(clip.x);
            let x1 = (center.x + row.half_width).min(clip_x1);
            for x in x0..=x1 {
                f(x, y);
            }
        }
    }
}

/// Integer sample points from `a` to `b` inclusive, one per step.
fn line_steps(a: Point, b: Point) -> impl Iterator<Item = Point> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let steps = dx.abs().max(dy.abs());
    (0..=steps).map(move |i| {
        if steps == 0 {
            return a;
        }
        let t = i as f32 / steps as f32;
        Point::new(
            a.x + (dx as f32 * t).round() as i32,
            a.y + (dy as f32 * t).round() as i32,
        )
    })
}

// -- Rasterizer --------------------------------------------------------------

/// Converts one stroke at a time into pixel writes.
#[derive(Debug, Clone, Default)]
pub struct StrokeRasterizer {
    tool: Tool,
    sizes: ToolSizes,
    start: Option<Point>,
    last: Option<Point>,
}

impl StrokeRasterizer {
    pub fn new(tool: Tool, sizes: ToolSizes) -> Self {
        Self {
            tool,
            sizes,
            start: None,
            last: None,
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switch tool. A stroke in progress is finished first.
    pub fn set_tool(&mut self, tool: Tool) {
        self.end_stroke();
        self.tool = tool;
    }

    pub fn sizes(&self) -> &ToolSizes {
        &self.sizes
    }

    pub fn sizes_mut(&mut self) -> &mut ToolSizes {
        &mut self.sizes
    }

    /// Size of the current tool.
    pub fn size(&self) -> u32 {
        self.sizes.size(self.tool)
    }

    pub fn is_drawing(&self) -> bool {
        self.start.is_some()
    }

    /// Record the first sample of a stroke. Nothing is drawn yet.
    pub fn begin_stroke(&mut self, pos: Point) {
        self.start = Some(pos);
        self.last = None;
    }

    /// Add a sample to the stroke in progress and draw the new piece.
    ///
    /// The first call after [`begin_stroke`](Self::begin_stroke) stamps one
    /// disc at the start point and nothing else, wherever `pos` is. Later
    /// calls draw from the previous sample to `pos`. Returns the clipped
    /// region that changed, or `None` when no stroke is active or nothing
    /// landed on the layer.
    pub fn extend_stroke(&mut self, layer: &mut Layer, pos: Point) -> Option<DirtyRect> {
        let start = self.start?;
        let (from, to) = match self.last {
            Some(last) => (last, pos),
            None => (start, start),
        };
        let dirty = self.draw_segment(layer, from, to);
        self.last = Some(to);
        dirty
    }

    /// Finish the stroke. No pixels are written.
    pub fn end_stroke(&mut self) {
        self.start = None;
        self.last = None;
    }

    fn draw_segment(&self, layer: &mut Layer, from: Point, to: Point) -> Option<DirtyRect> {
        let radius = self.sizes.radius(self.tool);
        let clip = DirtyRect::from_points(from, to, radius).clamp(layer.width(), layer.height())?;
        let mask = DiscMask::new(radius);

        match self.tool {
            Tool::Pen => stamp_line(layer, &mask, from, to, clip, PEN_INK),
            Tool::Eraser => stamp_line(layer, &mask, from, to, clip, TRANSPARENT),
            Tool::Highlighter => composite_line(layer, &mask, from, to, clip, HIGHLIGHTER_INK),
        }
        layer.modified = true;
        trace!(tool = ?self.tool, ?from, ?to, radius = mask.radius, "segment rasterized");
        Some(clip)
    }
}

fn stamp_line(
    layer: &mut Layer,
    mask: &DiscMask,
    from: Point,
    to: Point,
    clip: DirtyRect,
    color: Rgba<u8>,
) {
    for center in line_steps(from, to) {
        mask.for_each(center, clip, |x, y| {
            layer.pixels.put_pixel(x as u32, y as u32, color);
        });
    }
}

fn composite_line(
    layer: &mut Layer,
    mask: &DiscMask,
    from: Point,
    to: Point,
    clip: DirtyRect,
    color: Rgba<u8>,
) {
    let stride = clip.width as usize;
    let mut coverage = vec![false; stride * clip.height as usize];
    for center in line_steps(from, to) {
        mask.for_each(center, clip, |x, y| {
            coverage[(y - clip.y) as usize * stride + (x - clip.x) as usize] = true;
        });
    }
    for (i, covered) in coverage.into_iter().enumerate() {
        if !covered {
            continue;
        }
        let x = clip.x as u32 + (i % stride) as u32;
        let y = clip.y as u32 + (i / stride) as u32;
        blend_over(layer.pixels.get_pixel_mut(x, y), color);
    }
}
