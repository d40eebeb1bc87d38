// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// abook-store — Durable save/load of notebooks.
//
// Notebooks and their layers live in two SQLite tables. Each layer raster is
// stored as a self-describing blob together with a SHA-256 digest that is
// checked on load.

pub mod codec;
pub mod integrity;
pub mod store;

pub use store::NotebookStore;
