// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bounded single-step undo over whole-layer snapshots.

use std::collections::VecDeque;

use tracing::debug;

use crate::layer::{Layer, RasterBuffer};

/// Default number of snapshots kept per editing session.
pub const DEFAULT_UNDO_DEPTH: usize = 20;

/// FIFO-bounded stack of full raster copies.
///
/// A snapshot is pushed before every destructive operation; when the stack is
/// full the oldest entry is dropped.
#[derive(Debug, Clone)]
pub struct UndoStack {
    entries: VecDeque<RasterBuffer>,
    capacity: usize,
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_DEPTH)
    }
}

impl UndoStack {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a deep copy of the layer's current raster.
    pub fn snapshot(&mut self, layer: &Layer) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(layer.pixels.clone());
        debug!(depth = self.entries.len(), "undo snapshot taken");
    }

    /// Restore the most recent snapshot. Returns `false` when empty.
    pub fn undo(&mut self, layer: &mut Layer) -> bool {
        match self.entries.pop_back() {
            Some(pixels) => {
                layer.replace_pixels(pixels);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
