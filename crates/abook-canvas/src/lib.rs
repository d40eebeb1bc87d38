// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// abook-canvas — The drawing core of ABook.
//
// A notebook is an ordered stack of oversized transparent RGBA layers. Pointer
// samples arrive in landscape display space, are mapped through the viewport
// into canvas space, and are rasterized onto the active layer. Visible layers
// are composited into the scrolled viewport and rotated back for display.

pub mod compositor;
pub mod editor;
pub mod geometry;
pub mod layer;
pub mod notebook;
pub mod raster;
pub mod stroke;
pub mod template;
pub mod undo;
pub mod viewport;

pub use editor::Editor;
pub use geometry::{DisplayGeometry, Point};
pub use layer::{Layer, RasterBuffer};
pub use notebook::Notebook;
pub use stroke::{DirtyRect, StrokeRasterizer, ToolSizes};
pub use undo::UndoStack;
pub use viewport::ViewportController;
