// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Editing session — owns the open notebook and routes pointer input through
// the viewport into the rasterizer.
//
// Pointer events arrive in landscape window coordinates. Points that do not
// land on the canvas are ignored without error.

use abook_core::error::{AbookError, Result};
use abook_core::{TemplateKind, Tool};
use image::RgbaImage;
use tracing::{debug, info};

use crate::compositor;
use crate::geometry::{DisplayGeometry, Point};
use crate::layer::Layer;
use crate::notebook::Notebook;
use crate::stroke::{DirtyRect, StrokeRasterizer, ToolSizes};
use crate::undo::UndoStack;
use crate::viewport::ViewportController;

pub struct Editor {
    notebook: Notebook,
    active: usize,
    viewport: ViewportController,
    rasterizer: StrokeRasterizer,
    undo: UndoStack,
}

impl Editor {
    /// Open a notebook for editing on the top-most layer.
    pub fn open(mut notebook: Notebook, viewport: ViewportController, sizes: ToolSizes) -> Self {
        notebook.ensure_layer();
        let active = notebook.layer_count() - 1;
        info!(notebook = %notebook.name, layers = notebook.layer_count(), "editor opened");
        Self {
            notebook,
            active,
            viewport,
            rasterizer: StrokeRasterizer::new(Tool::Pen, sizes),
            undo: UndoStack::default(),
        }
    }

    pub fn notebook(&self) -> &Notebook {
        &self.notebook
    }

    pub fn into_notebook(self) -> Notebook {
        self.notebook
    }

    pub fn mark_saved(&mut self) {
        self.notebook.mark_saved();
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_layer(&self) -> &Layer {
        &self.notebook.layers()[self.active]
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    // -- Tools ---------------------------------------------------------------

    pub fn tool(&self) -> Tool {
        self.rasterizer.tool()
    }

    pub fn select_tool(&mut self, tool: Tool) {
        self.rasterizer.set_tool(tool);
    }

    pub fn tool_size(&self) -> u32 {
        self.rasterizer.size()
    }

    pub fn increase_size(&mut self) -> u32 {
        let tool = self.rasterizer.tool();
        self.rasterizer.sizes_mut().increase(tool)
    }

    /// Set the current tool's size, clamped to its range.
    pub fn set_tool_size(&mut self, size: u32) -> u32 {
        let tool = self.rasterizer.tool();
        self.rasterizer.sizes_mut().set(tool, size)
    }

    pub fn decrease_size(&mut self) -> u32 {
        let tool = self.rasterizer.tool();
        self.rasterizer.sizes_mut().decrease(tool)
    }

    pub fn tool_sizes(&self) -> &ToolSizes {
        self.rasterizer.sizes()
    }

    // -- Pointer input -------------------------------------------------------

    /// Start a stroke and stamp the first disc. Returns `false` when the
    /// point is off the canvas.
    ///
    /// The undo snapshot is taken here so even a stroke that never moves can
    /// be undone.
    pub fn pointer_down(&mut self, landscape: Point) -> bool {
        let Some(pos) = self.viewport.pointer_to_canvas(landscape) else {
            return false;
        };
        self.undo.snapshot(&self.notebook.layers()[self.active]);
        self.rasterizer.begin_stroke(pos);
        if let Some(layer) = self.notebook.layer_mut(self.active) {
            self.rasterizer.extend_stroke(layer, pos);
        }
        true
    }

    /// Continue the current stroke to `landscape`.
    pub fn pointer_move(&mut self, landscape: Point) -> Option<DirtyRect> {
        if !self.rasterizer.is_drawing() {
            return None;
        }
        let pos = self.viewport.pointer_to_canvas(landscape)?;
        let layer = self.notebook.layer_mut(self.active)?;
        self.rasterizer.extend_stroke(layer, pos)
    }

    pub fn pointer_up(&mut self) {
        self.rasterizer.end_stroke();
    }

    /// Draw a whole stroke given in canvas coordinates.
    pub fn stroke_canvas(&mut self, points: &[Point]) -> Option<DirtyRect> {
        let (&first, _) = points.split_first()?;
        self.undo.snapshot(&self.notebook.layers()[self.active]);
        self.rasterizer.begin_stroke(first);
        let layer = self.notebook.layer_mut(self.active)?;
        let mut dirty: Option<DirtyRect> = None;
        for &p in points {
            if let Some(d) = self.rasterizer.extend_stroke(layer, p) {
                dirty = Some(dirty.map_or(d, |acc| acc.union(d)));
            }
        }
        self.rasterizer.end_stroke();
        dirty
    }

    pub fn scroll(&mut self, delta_y: f32) {
        self.viewport.handle_scroll(delta_y);
    }

    // -- History -------------------------------------------------------------

    /// Undo the last destructive operation on the active layer.
    pub fn undo(&mut self) -> bool {
        self.rasterizer.end_stroke();
        match self.notebook.layer_mut(self.active) {
            Some(layer) => self.undo.undo(layer),
            None => false,
        }
    }

    // -- Layers and pages ----------------------------------------------------

    /// Switch the active layer. History never crosses pages, so undo is
    /// cleared and the view returns to the top.
    pub fn select_layer(&mut self, index: usize) -> Result<()> {
        if index >= self.notebook.layer_count() {
            return Err(AbookError::LayerOutOfRange {
                index,
                count: self.notebook.layer_count(),
            });
        }
        self.rasterizer.end_stroke();
        self.active = index;
        self.undo.clear();
        self.viewport.reset();
        debug!(active = index, "layer selected");
        Ok(())
    }

    /// Append a layer and make it active.
    pub fn add_layer(&mut self) -> usize {
        let index = self.notebook.add_layer();
        self.active = index;
        self.undo.clear();
        index
    }

    /// Remove a layer. The active layer keeps its identity when another layer
    /// goes. Removing the active layer activates whichever layer takes its
    /// slot, or the new top.
    pub fn remove_layer(&mut self, index: usize) -> Result<()> {
        self.notebook.remove_layer(index)?;
        let active = if index < self.active {
            self.active - 1
        } else {
            self.active
        };
        self.after_restructure(active);
        Ok(())
    }

    pub fn move_layer_up(&mut self, index: usize) -> Result<usize> {
        let to = self.notebook.move_layer_up(index)?;
        self.after_restructure(follow_swap(self.active, index, to));
        Ok(to)
    }

    pub fn move_layer_down(&mut self, index: usize) -> Result<usize> {
        let to = self.notebook.move_layer_down(index)?;
        self.after_restructure(follow_swap(self.active, index, to));
        Ok(to)
    }

    pub fn toggle_visibility(&mut self, index: usize) -> Result<bool> {
        self.notebook.toggle_visibility(index)
    }

    pub fn rename_layer(&mut self, index: usize, name: impl Into<String>) -> Result<()> {
        self.notebook.rename_layer(index, name)
    }

    pub fn merge_visible_layers(&mut self) -> Result<usize> {
        let merged = self.notebook.merge_visible_layers()?;
        self.after_restructure(0);
        Ok(merged)
    }

    /// Stamp a template onto the active layer. Undoable.
    pub fn apply_template(&mut self, kind: TemplateKind) {
        self.rasterizer.end_stroke();
        if let Some(layer) = self.notebook.layer_mut(self.active) {
            self.undo.snapshot(layer);
            layer.apply_template(kind);
        }
        self.notebook.active_template = kind.name().to_owned();
        info!(template = %kind, layer = self.active, "template applied");
    }

    fn after_restructure(&mut self, active: usize) {
        self.rasterizer.end_stroke();
        self.active = active.min(self.notebook.layer_count().saturating_sub(1));
        self.undo.clear();
    }

    // -- Rendering -----------------------------------------------------------

    /// Visible canvas area at the current scroll offset.
    pub fn render_viewport(&self) -> RgbaImage {
        let g: &DisplayGeometry = self.viewport.geometry();
        compositor::compose_visible(
            self.notebook.layers(),
            self.viewport.scroll_offset_y(),
            g.canvas_width(),
            g.visible_height(),
        )
    }

    /// Complete landscape frame ready for the window.
    pub fn render_frame(&self) -> RgbaImage {
        let portrait = compositor::render_portrait(&self.render_viewport(), self.viewport.geometry());
        compositor::rotate_for_display(&portrait)
    }
}

/// Where the active index ends up after the layers at `from` and `to` swap.
fn follow_swap(active: usize, from: usize, to: usize) -> usize {
    if active == from {
        to
    } else if active == to {
        from
    } else {
        active
    }
}

#[cfg(test)]
mod tests {
    use abook_core::Folder;

    use super::*;
    use crate::stroke::PEN_INK;

    fn editor() -> Editor {
        let notebook = Notebook::new("Lecture", Folder::Notes);
        Editor::open(notebook, ViewportController::default(), ToolSizes::default())
    }

    /// Landscape point that lands on canvas pixel `(cx, cy)` with no scroll.
    fn landscape_for(cx: i32, cy: i32) -> Point {
        // portrait = (cx + 80, cy + 25); landscape = (py, 600 - px)
        Point::new(cy + 25, 600 - (cx + 80))
    }

    #[test]
    fn pointer_stroke_lands_on_canvas() {
        let mut ed = editor();
        assert!(ed.pointer_down(landscape_for(50, 50)));
        ed.pointer_move(landscape_for(50, 50));
        ed.pointer_move(landscape_for(150, 50));
        ed.pointer_up();

        let layer = ed.active_layer();
        assert_eq!(*layer.pixels.get_pixel(50, 50), PEN_INK);
        assert_eq!(*layer.pixels.get_pixel(150, 50), PEN_INK);
        assert_eq!(layer.pixels.get_pixel(100, 60).0[3], 0);
    }

    #[test]
    fn press_stamps_and_first_move_draws_a_segment() {
        let mut ed = editor();
        assert!(ed.pointer_down(landscape_for(30, 40)));
        assert_eq!(*ed.active_layer().pixels.get_pixel(30, 40), PEN_INK);
        ed.pointer_move(landscape_for(90, 40));
        for x in 30..=90 {
            assert_eq!(*ed.active_layer().pixels.get_pixel(x, 40), PEN_INK, "gap at x={x}");
        }
        ed.pointer_up();
    }

    #[test]
    fn toolbar_press_is_ignored() {
        let mut ed = editor();
        // Portrait x = 40 is over the toolbar.
        assert!(!ed.pointer_down(Point::new(500, 560)));
        assert!(ed.pointer_move(Point::new(500, 400)).is_none());
        assert_eq!(ed.undo_depth(), 0);
        assert!(ed.active_layer().is_blank());
    }

    #[test]
    fn tap_without_motion_is_undoable() {
        let mut ed = editor();
        assert!(ed.pointer_down(landscape_for(10, 10)));
        ed.pointer_up();
        assert!(!ed.active_layer().is_blank());
        assert_eq!(ed.undo_depth(), 1);
        assert!(ed.undo());
        assert!(ed.active_layer().is_blank());
    }

    #[test]
    fn undo_reverts_stroke() {
        let mut ed = editor();
        ed.stroke_canvas(&[Point::new(5, 5), Point::new(60, 90)]);
        assert!(!ed.active_layer().is_blank());
        assert!(ed.undo());
        assert!(ed.active_layer().is_blank());
        assert!(!ed.undo());
    }

    #[test]
    fn switching_layers_clears_history() {
        let mut ed = editor();
        ed.stroke_canvas(&[Point::new(5, 5)]);
        let added = ed.add_layer();
        assert_eq!(ed.active_index(), added);
        ed.stroke_canvas(&[Point::new(9, 9)]);
        assert_eq!(ed.undo_depth(), 1);
        ed.select_layer(0).expect("select bottom");
        assert_eq!(ed.undo_depth(), 0);
        assert!(ed.select_layer(7).is_err());
    }

    #[test]
    fn scrolled_strokes_land_lower_on_canvas() {
        let mut ed = editor();
        ed.scroll(-10.0);
        assert!(ed.pointer_down(landscape_for(20, 20)));
        ed.pointer_move(landscape_for(20, 20));
        ed.pointer_up();
        assert_eq!(*ed.active_layer().pixels.get_pixel(20, 320), PEN_INK);
    }

    #[test]
    fn template_apply_is_undoable() {
        let mut ed = editor();
        ed.apply_template(TemplateKind::Graph);
        assert_eq!(ed.notebook().active_template, "Graph");
        assert!(!ed.active_layer().is_blank());
        assert!(ed.undo());
        assert!(ed.active_layer().is_blank());
    }

    #[test]
    fn size_steps_apply_to_current_tool() {
        let mut ed = editor();
        ed.select_tool(Tool::Eraser);
        assert_eq!(ed.increase_size(), 35);
        ed.select_tool(Tool::Pen);
        assert_eq!(ed.tool_size(), 4);
        assert_eq!(ed.decrease_size(), 2);
    }

    #[test]
    fn frame_is_landscape() {
        let mut ed = editor();
        ed.stroke_canvas(&[Point::new(0, 0)]);
        let frame = ed.render_frame();
        assert_eq!(frame.dimensions(), (1024, 600));
        // Canvas (0, 0) -> portrait (80, 25) -> landscape (25, 519).
        assert_eq!(*frame.get_pixel(25, 519), PEN_INK);
    }

    fn three_layers_on_second() -> Editor {
        let mut ed = editor();
        ed.add_layer();
        ed.add_layer();
        ed.select_layer(1).expect("select");
        ed
    }

    #[test]
    fn active_layer_follows_neighbour_swaps() {
        let mut ed = three_layers_on_second();
        assert_eq!(ed.move_layer_up(0).expect("up"), 1);
        assert_eq!(ed.active_layer().name, "Layer 2");
        assert_eq!(ed.active_index(), 0);

        assert_eq!(ed.move_layer_down(1).expect("down"), 0);
        assert_eq!(ed.active_layer().name, "Layer 2");
        assert_eq!(ed.active_index(), 1);

        ed.move_layer_up(1).expect("up");
        assert_eq!(ed.active_layer().name, "Layer 2");
        assert_eq!(ed.active_index(), 2);
    }

    #[test]
    fn strokes_after_a_swap_hit_the_active_layer() {
        let mut ed = three_layers_on_second();
        ed.move_layer_down(2).expect("down");
        ed.stroke_canvas(&[Point::new(5, 5)]);
        let names_with_ink: Vec<_> = ed
            .notebook()
            .layers()
            .iter()
            .filter(|l| !l.is_blank())
            .map(|l| l.name.as_str())
            .collect();
        assert_eq!(names_with_ink, ["Layer 2"]);
    }

    #[test]
    fn removing_a_lower_layer_keeps_the_active_one() {
        let mut ed = three_layers_on_second();
        ed.remove_layer(0).expect("remove");
        assert_eq!(ed.active_index(), 0);
        assert_eq!(ed.active_layer().name, "Layer 2");

        let mut ed = three_layers_on_second();
        ed.remove_layer(2).expect("remove");
        assert_eq!(ed.active_layer().name, "Layer 2");
    }

    #[test]
    fn removing_the_active_layer_activates_the_next_in_its_slot() {
        let mut ed = three_layers_on_second();
        ed.remove_layer(1).expect("remove");
        assert_eq!(ed.active_layer().name, "Layer 3");

        ed.select_layer(1).expect("select top");
        ed.remove_layer(1).expect("remove top");
        assert_eq!(ed.active_index(), 0);
        assert_eq!(ed.active_layer().name, "Layer 1");
    }
}
