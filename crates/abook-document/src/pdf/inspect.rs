// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Read back an exported PDF with `lopdf` so tests can check what was written.

use std::path::Path;

use abook_core::error::{AbookError, Result};
use lopdf::Document;

/// Number of pages in an in-memory PDF.
pub(crate) fn page_count(data: &[u8]) -> Result<usize> {
    let document = Document::load_mem(data)
        .map_err(|err| AbookError::PdfError(format!("failed to load PDF from memory: {err}")))?;
    Ok(document.get_pages().len())
}

/// Number of pages in a PDF on disk.
pub(crate) fn page_count_of_file(path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    let document = Document::load(path).map_err(|err| {
        AbookError::PdfError(format!("failed to open {}: {err}", path.display()))
    })?;
    Ok(document.get_pages().len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_is_a_pdf_error() {
        assert!(matches!(page_count(b"not a pdf"), Err(AbookError::PdfError(_))));
        assert!(matches!(
            page_count_of_file("/nonexistent/abook.pdf"),
            Err(AbookError::PdfError(_))
        ));
    }
}
