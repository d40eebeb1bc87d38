// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Notebook aggregate — an ordered stack of layers plus metadata.
//
// Index 0 is the bottom layer. "Up" moves a layer towards the top of the
// stack (higher index).

use abook_core::error::{AbookError, Result};
use abook_core::{Folder, TemplateKind};
use image::{Rgba, RgbaImage};
use tracing::{debug, info, warn};

use crate::geometry::DisplayGeometry;
use crate::layer::Layer;
use crate::raster::overlay;

#[derive(Debug, Clone, PartialEq)]
pub struct Notebook {
    pub name: String,
    pub folder: Folder,
    pub active_template: String,
    layers: Vec<Layer>,
    canvas_size: (u32, u32),
    /// Set by removal, reordering, visibility and renaming, which leave the
    /// layers' own `modified` flags alone.
    structure_modified: bool,
}

impl Notebook {
    /// A new notebook with one transparent layer of the default canvas size.
    pub fn new(name: impl Into<String>, folder: Folder) -> Self {
        let g = DisplayGeometry::default();
        Self::with_canvas_size(name, folder, (g.canvas_width(), g.canvas_height()))
    }

    /// A new notebook whose layers use an explicit raster size.
    pub fn with_canvas_size(name: impl Into<String>, folder: Folder, canvas_size: (u32, u32)) -> Self {
        let mut notebook = Self {
            name: name.into(),
            folder,
            active_template: TemplateKind::Blank.name().to_owned(),
            layers: Vec::new(),
            canvas_size,
            structure_modified: false,
        };
        notebook.add_layer();
        notebook
    }

    /// Reassemble a notebook from stored parts.
    ///
    /// An empty `layers` list is accepted here; [`ensure_layer`](Self::ensure_layer)
    /// repairs it before editing.
    pub fn from_parts(
        name: impl Into<String>,
        folder: Folder,
        active_template: impl Into<String>,
        layers: Vec<Layer>,
    ) -> Self {
        let canvas_size = layers.first().map(|l| l.pixels.dimensions()).unwrap_or_else(|| {
            let g = DisplayGeometry::default();
            (g.canvas_width(), g.canvas_height())
        });
        Self {
            name: name.into(),
            folder,
            active_template: active_template.into(),
            layers,
            canvas_size,
            structure_modified: false,
        }
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        self.canvas_size
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    pub fn layer_mut(&mut self, index: usize) -> Option<&mut Layer> {
        self.layers.get_mut(index)
    }

    /// Visible layers, bottom to top.
    pub fn visible_layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(|l| l.visible)
    }

    /// Whether the layer list or any layer changed since it was loaded or
    /// last saved.
    pub fn is_modified(&self) -> bool {
        self.structure_modified || self.layers.iter().any(|l| l.modified)
    }

    /// Clear every `modified` flag after a successful save.
    pub fn mark_saved(&mut self) {
        self.structure_modified = false;
        for layer in &mut self.layers {
            layer.modified = false;
        }
    }

    /// Add a blank layer when the list is empty. Returns `true` if one was added.
    pub fn ensure_layer(&mut self) -> bool {
        if self.layers.is_empty() {
            warn!(notebook = %self.name, "notebook had no layers; adding a blank one");
            self.add_layer();
            return true;
        }
        false
    }

    /// Append a transparent layer on top and return its index.
    pub fn add_layer(&mut self) -> usize {
        let (width, height) = self.canvas_size;
        let mut layer = Layer::with_size(width, height, self.active_template.clone());
        layer.name = format!("Layer {}", self.layers.len() + 1);
        layer.modified = true;
        self.layers.push(layer);
        debug!(count = self.layers.len(), "layer added");
        self.layers.len() - 1
    }

    /// Remove and return a layer. The last remaining layer cannot be removed.
    pub fn remove_layer(&mut self, index: usize) -> Result<Layer> {
        self.check_index(index)?;
        if self.layers.len() == 1 {
            return Err(AbookError::LastLayer);
        }
        self.structure_modified = true;
        Ok(self.layers.remove(index))
    }

    /// Move a layer one step towards the top. Returns its new index.
    pub fn move_layer_up(&mut self, index: usize) -> Result<usize> {
        self.check_index(index)?;
        if index + 1 >= self.layers.len() {
            return Ok(index);
        }
        self.layers.swap(index, index + 1);
        self.structure_modified = true;
        Ok(index + 1)
    }

    /// Move a layer one step towards the bottom. Returns its new index.
    pub fn move_layer_down(&mut self, index: usize) -> Result<usize> {
        self.check_index(index)?;
        if index == 0 {
            return Ok(0);
        }
        self.layers.swap(index, index - 1);
        self.structure_modified = true;
        Ok(index - 1)
    }

    /// Flip a layer's visibility and return the new state.
    pub fn toggle_visibility(&mut self, index: usize) -> Result<bool> {
        self.check_index(index)?;
        let layer = &mut self.layers[index];
        layer.visible = !layer.visible;
        self.structure_modified = true;
        Ok(layer.visible)
    }

    pub fn rename_layer(&mut self, index: usize, name: impl Into<String>) -> Result<()> {
        self.check_index(index)?;
        self.layers[index].name = name.into();
        self.structure_modified = true;
        Ok(())
    }

    /// Flatten all visible layers into one, replacing the whole layer list.
    ///
    /// Hidden layers are discarded. Needs at least two visible layers.
    /// Returns how many layers were merged.
    pub fn merge_visible_layers(&mut self) -> Result<usize> {
        let visible: Vec<&Layer> = self.visible_layers().collect();
        if visible.len() < 2 {
            return Err(AbookError::InvalidArgument(
                "merging needs at least two visible layers".into(),
            ));
        }

        let (width, height) = self.canvas_size;
        let mut pixels = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
        for layer in &visible {
            overlay(&mut pixels, &layer.pixels, 0, 0);
        }
        let merged_count = visible.len();
        let template_name = visible[0].template_name.clone();

        let mut merged = Layer::from_parts("Merged", template_name, true, pixels);
        merged.modified = true;
        self.layers = vec![merged];

        info!(notebook = %self.name, merged_count, "visible layers merged");
        Ok(merged_count)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.layers.len() {
            Ok(())
        } else {
            Err(AbookError::LayerOutOfRange {
                index,
                count: self.layers.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(name: &str) -> Notebook {
        Notebook::with_canvas_size(name, Folder::Notes, (16, 16))
    }

    #[test]
    fn new_notebook_has_one_layer() {
        let nb = small("Physics");
        assert_eq!(nb.layer_count(), 1);
        assert_eq!(nb.layers()[0].name, "Layer 1");
        assert_eq!(nb.active_template, "Blank");
        assert_eq!(Notebook::new("Big", Folder::Books).canvas_size(), (520, 5120));
    }

    #[test]
    fn add_and_remove_layers() {
        let mut nb = small("n");
        assert_eq!(nb.add_layer(), 1);
        assert_eq!(nb.layers()[1].name, "Layer 2");
        let removed = nb.remove_layer(0).expect("remove bottom");
        assert_eq!(removed.name, "Layer 1");
        assert!(matches!(nb.remove_layer(0), Err(AbookError::LastLayer)));
        assert!(matches!(
            nb.remove_layer(3),
            Err(AbookError::LayerOutOfRange { index: 3, count: 1 })
        ));
    }

    #[test]
    fn reorder_swaps_neighbours() {
        let mut nb = small("n");
        nb.add_layer();
        nb.add_layer();
        assert_eq!(nb.move_layer_up(0).expect("up"), 1);
        let names: Vec<_> = nb.layers().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Layer 2", "Layer 1", "Layer 3"]);

        assert_eq!(nb.move_layer_up(2).expect("top stays"), 2);
        assert_eq!(nb.move_layer_down(0).expect("bottom stays"), 0);
        assert_eq!(nb.move_layer_down(2).expect("down"), 1);
        let names: Vec<_> = nb.layers().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Layer 2", "Layer 3", "Layer 1"]);
    }

    #[test]
    fn toggle_visibility_flips() {
        let mut nb = small("n");
        assert!(!nb.toggle_visibility(0).expect("toggle"));
        assert!(nb.toggle_visibility(0).expect("toggle"));
        assert!(nb.toggle_visibility(5).is_err());
    }

    #[test]
    fn merge_requires_two_visible_layers() {
        let mut nb = small("n");
        nb.add_layer();
        nb.toggle_visibility(1).expect("hide");
        assert!(matches!(
            nb.merge_visible_layers(),
            Err(AbookError::InvalidArgument(_))
        ));
        assert_eq!(nb.layer_count(), 2);
    }

    #[test]
    fn merge_composites_bottom_to_top_and_drops_hidden() {
        let mut nb = small("n");
        nb.add_layer();
        nb.add_layer();
        let red = Rgba([200, 0, 0, 255]);
        let blue = Rgba([0, 0, 200, 255]);
        let green = Rgba([0, 200, 0, 255]);
        nb.layer_mut(0).expect("l0").pixels.put_pixel(1, 1, red);
        nb.layer_mut(0).expect("l0").pixels.put_pixel(2, 2, red);
        nb.layer_mut(1).expect("l1").pixels.put_pixel(1, 1, blue);
        nb.layer_mut(2).expect("l2").pixels.put_pixel(3, 3, green);
        nb.toggle_visibility(2).expect("hide top");

        assert_eq!(nb.merge_visible_layers().expect("merge"), 2);
        assert_eq!(nb.layer_count(), 1);
        let merged = &nb.layers()[0];
        assert!(merged.modified);
        assert_eq!(*merged.pixels.get_pixel(1, 1), blue);
        assert_eq!(*merged.pixels.get_pixel(2, 2), red);
        assert_eq!(merged.pixels.get_pixel(3, 3).0[3], 0);
    }

    #[test]
    fn ensure_layer_repairs_empty_notebook() {
        let mut nb = Notebook::from_parts("broken", Folder::Tests, "Blank", Vec::new());
        assert_eq!(nb.layer_count(), 0);
        assert!(nb.ensure_layer());
        assert_eq!(nb.layer_count(), 1);
        assert!(!nb.ensure_layer());
    }

    #[test]
    fn saving_clears_modified_flags() {
        let mut nb = small("n");
        assert!(nb.is_modified());
        nb.mark_saved();
        assert!(!nb.is_modified());
    }

    #[test]
    fn layer_list_edits_mark_the_notebook_modified() {
        let edits: [fn(&mut Notebook); 5] = [
            |nb| {
                nb.remove_layer(1).expect("remove");
            },
            |nb| {
                nb.move_layer_up(0).expect("up");
            },
            |nb| {
                nb.move_layer_down(1).expect("down");
            },
            |nb| {
                nb.toggle_visibility(0).expect("toggle");
            },
            |nb| nb.rename_layer(0, "Sketch").expect("rename"),
        ];
        for edit in edits {
            let mut nb = small("n");
            nb.add_layer();
            nb.mark_saved();
            edit(&mut nb);
            assert!(nb.is_modified());
            nb.mark_saved();
            assert!(!nb.is_modified());
        }
    }

    #[test]
    fn reorder_at_the_ends_is_not_a_change() {
        let mut nb = small("n");
        nb.add_layer();
        nb.mark_saved();
        nb.move_layer_up(1).expect("top");
        nb.move_layer_down(0).expect("bottom");
        assert!(!nb.is_modified());
    }
}
