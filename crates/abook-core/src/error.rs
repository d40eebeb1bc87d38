// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for ABook.

use thiserror::Error;

/// Top-level error type for all ABook operations.
///
/// "Not found" is never an error: lookups return `Ok(None)` or a structured
/// result instead. Pointer input outside the canvas is likewise a no-op.
#[derive(Debug, Error)]
pub enum AbookError {
    // -- Canvas errors --
    #[error("layer index {index} out of range (notebook has {count} layers)")]
    LayerOutOfRange { index: usize, count: usize },

    #[error("a notebook must keep at least one layer")]
    LastLayer,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // -- Document errors --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("OCR failed: {0}")]
    OcrError(String),

    #[error("network request failed: {0}")]
    Network(String),

    // -- Storage / persistence --
    #[error("database error: {0}")]
    Database(String),

    #[error("layer blob is malformed: {0}")]
    Encoding(String),

    #[error("integrity check failed: expected {expected}, got {actual}")]
    IntegrityMismatch { expected: String, actual: String },

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Collaborators --
    #[error("{0} is not available")]
    Unavailable(String),
}

impl AbookError {
    /// Whether this error came from saving or loading notebook data.
    ///
    /// Storage errors are reported to the user but never end the editing
    /// session.
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            Self::Database(_)
                | Self::Encoding(_)
                | Self::IntegrityMismatch { .. }
                | Self::Io(_)
                | Self::Serialization(_)
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, AbookError>;
