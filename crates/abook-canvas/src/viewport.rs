// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Viewport controller — maps the rotated physical display onto the scrollable
// canvas.
//
// Pointer coordinates arrive in landscape window space and are first mapped
// to the portrait authoring space (`px = W - ly`, `py = lx`, where `W` is the
// portrait width). The toolbar and status bar are then subtracted and the
// scroll offset added to reach canvas pixels.

use tracing::debug;

use crate::geometry::{DisplayGeometry, Point};

/// Scroll state plus the transforms derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportController {
    geometry: DisplayGeometry,
    sensitivity: f32,
    scroll_offset_y: u32,
    canvas_height: u32,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(DisplayGeometry::default(), 30.0)
    }
}

impl ViewportController {
    pub fn new(geometry: DisplayGeometry, sensitivity: f32) -> Self {
        Self {
            geometry,
            sensitivity,
            scroll_offset_y: 0,
            canvas_height: geometry.canvas_height(),
        }
    }

    pub fn geometry(&self) -> &DisplayGeometry {
        &self.geometry
    }

    pub fn scroll_offset_y(&self) -> u32 {
        self.scroll_offset_y
    }

    pub fn canvas_height(&self) -> u32 {
        self.canvas_height
    }

    /// Largest offset the current canvas height allows.
    pub fn max_scroll(&self) -> u32 {
        self.canvas_height.saturating_sub(self.geometry.visible_height())
    }

    /// Landscape window point to portrait authoring point.
    pub fn to_portrait(&self, landscape: Point) -> Point {
        self.geometry.to_portrait(landscape)
    }

    /// Inverse of [`to_portrait`](Self::to_portrait).
    pub fn to_landscape(&self, portrait: Point) -> Point {
        self.geometry.to_landscape(portrait)
    }

    /// Portrait point to canvas pixel.
    ///
    /// Points over the toolbar, over the status bar, or off the display are
    /// not on the canvas and yield `None`.
    pub fn canvas_position(&self, portrait: Point) -> Option<Point> {
        let g = &self.geometry;
        if portrait.x < g.toolbar_width as i32
            || portrait.y < g.status_bar_height as i32
            || portrait.x >= g.portrait_width as i32
            || portrait.y >= g.portrait_height as i32
        {
            return None;
        }
        Some(Point::new(
            portrait.x - g.toolbar_width as i32,
            portrait.y - g.status_bar_height as i32 + self.scroll_offset_y as i32,
        ))
    }

    /// Landscape window point straight to canvas pixel.
    pub fn pointer_to_canvas(&self, landscape: Point) -> Option<Point> {
        self.canvas_position(self.to_portrait(landscape))
    }

    /// Apply a wheel movement. Positive `delta_y` scrolls up.
    ///
    /// The offset is clamped to `[0, canvas_height - visible_height]`. When
    /// it comes within one page of the bottom the canvas grows by a page; the
    /// canvas never shrinks.
    pub fn handle_scroll(&mut self, delta_y: f32) {
        let target = self.scroll_offset_y as f32 - delta_y * self.sensitivity;
        let clamped = target.round().clamp(0.0, self.max_scroll() as f32);
        self.scroll_offset_y = clamped as u32;

        let page = self.geometry.page_height;
        if self.scroll_offset_y > self.canvas_height.saturating_sub(page) {
            self.canvas_height += page;
            debug!(canvas_height = self.canvas_height, "canvas extended by one page");
        }
    }

    /// Jump back to the top of the page.
    pub fn reset(&mut self) {
        self.scroll_offset_y = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landscape_round_trip_is_exact() {
        let v = ViewportController::default();
        let (w, h) = v.geometry().landscape_size();
        for lx in (0..w as i32).step_by(7) {
            for ly in (0..h as i32).step_by(5) {
                let p = Point::new(lx, ly);
                assert_eq!(v.to_landscape(v.to_portrait(p)), p);
            }
        }
        for px in (0..600).step_by(11) {
            for py in (0..1024).step_by(13) {
                let p = Point::new(px, py);
                assert_eq!(v.to_portrait(v.to_landscape(p)), p);
            }
        }
    }

    #[test]
    fn rotation_contract() {
        let v = ViewportController::default();
        assert_eq!(v.to_portrait(Point::new(300, 100)), Point::new(500, 300));
    }

    #[test]
    fn toolbar_and_status_bar_are_rejected() {
        let v = ViewportController::default();
        assert_eq!(v.canvas_position(Point::new(79, 500)), None);
        assert_eq!(v.canvas_position(Point::new(300, 24)), None);
        assert_eq!(v.canvas_position(Point::new(600, 500)), None);
        assert_eq!(v.canvas_position(Point::new(80, 25)), Some(Point::new(0, 0)));
    }

    #[test]
    fn canvas_position_follows_scroll() {
        let mut v = ViewportController::default();
        v.handle_scroll(-10.0);
        assert_eq!(v.scroll_offset_y(), 300);
        assert_eq!(v.canvas_position(Point::new(130, 75)), Some(Point::new(50, 350)));
    }

    #[test]
    fn scroll_is_bounded_above_at_zero() {
        let mut v = ViewportController::default();
        v.handle_scroll(5.0);
        assert_eq!(v.scroll_offset_y(), 0);
        assert_eq!(v.canvas_height(), 5120);
    }

    #[test]
    fn scroll_stays_in_range_and_canvas_only_grows() {
        let mut v = ViewportController::default();
        let deltas = [-3.0, -40.0, 2.0, -200.0, 15.0, -1.5, -500.0, 90.0, -7.0, 1000.0, -60.0];
        let mut last_height = v.canvas_height();
        for _ in 0..5 {
            for d in deltas {
                v.handle_scroll(d);
                assert!(v.scroll_offset_y() <= v.canvas_height() - v.geometry().visible_height());
                assert!(v.canvas_height() >= last_height);
                last_height = v.canvas_height();
            }
        }
        assert!(v.canvas_height() > 5120, "scrolling down should extend the canvas");
    }

    #[test]
    fn growth_happens_near_the_bottom() {
        let mut v = ViewportController::default();
        // Jump to the bottom: offset clamps to 5120 - 999 = 4121, which is
        // within one page of the end, so a page is appended.
        v.handle_scroll(-10_000.0);
        assert_eq!(v.scroll_offset_y(), 4121);
        assert_eq!(v.canvas_height(), 6144);
    }
}
