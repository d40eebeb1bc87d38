// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// abook-document — Everything that turns notebook pages into something else.
//
// Provides PDF export of visible layers, the OCR preparation pipeline and
// recogniser seam, the writing assistant (spelling, grammar, summaries,
// dictionary lookup), and the handwriting-to-text conversion that ties them
// together. Each external collaborator degrades to "unavailable" instead of
// failing the application.

pub mod assist;
pub mod convert;
pub mod ocr;
pub mod pdf;

pub use assist::{DictionaryClient, WordLookup, WritingAssistant};
pub use convert::{Conversion, HandwritingConverter};
pub use ocr::{Recognition, TextRecognizer, UnavailableRecognizer};
pub use pdf::export::NotebookPdfExporter;

#[cfg(feature = "ocr")]
pub use ocr::engine::OcrEngine;
