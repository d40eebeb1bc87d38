// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — notebook export.

pub mod export;
#[cfg(test)]
mod inspect;

pub use export::NotebookPdfExporter;
