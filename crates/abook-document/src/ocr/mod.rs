// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Handwriting recognition: layer pre-processing and the recogniser seam.
//
// The pre-processing in `prepare` always runs in this crate; recognisers only
// ever see a cropped, binarised, dark-on-light grayscale image.

pub mod prepare;

#[cfg(feature = "ocr")]
pub mod engine;

use abook_canvas::Layer;
use abook_core::error::{AbookError, Result};
use image::GrayImage;
use tracing::{debug, instrument};

pub use prepare::prepare_layer;

/// Text shown when a layer yields nothing to read.
pub const NO_TEXT_SENTINEL: &str = "[No text detected]";

/// Outcome of recognising one layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recognition {
    Text(String),
    NoText,
}

impl Recognition {
    /// Wrap raw recogniser output, treating whitespace-only text as nothing.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self::NoText
        } else {
            Self::Text(trimmed.to_owned())
        }
    }

    /// Display text, with the sentinel standing in for no text.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::NoText => NO_TEXT_SENTINEL,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::NoText => None,
        }
    }
}

/// Something that turns a prepared page image into text.
pub trait TextRecognizer {
    /// Short name for logs.
    fn name(&self) -> &str;

    fn recognize(&self, image: &GrayImage) -> Result<String>;
}

/// Stand-in used when no OCR models are installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableRecognizer;

impl TextRecognizer for UnavailableRecognizer {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn recognize(&self, _image: &GrayImage) -> Result<String> {
        Err(AbookError::Unavailable("handwriting recognition".into()))
    }
}

/// Prepare `layer` and hand it to `recognizer`.
///
/// Blank layers never reach the recogniser.
#[instrument(skip_all, fields(recognizer = recognizer.name(), layer = %layer.name))]
pub fn recognize_layer(recognizer: &dyn TextRecognizer, layer: &Layer) -> Result<Recognition> {
    let Some(prepared) = prepare_layer(&layer.pixels) else {
        debug!("layer has no content");
        return Ok(Recognition::NoText);
    };
    let raw = recognizer.recognize(&prepared)?;
    let recognition = Recognition::from_raw(&raw);
    debug!(chars = recognition.text().map_or(0, str::len), "recognition finished");
    Ok(recognition)
}
