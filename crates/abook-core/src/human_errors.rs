// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the notebook screens.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Severity drives how the status bar presents it.

use crate::error::AbookError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Network blip or busy file; trying again may work.
    Transient,
    /// The user must do something first (install a word list, download models).
    ActionRequired,
    /// Retrying will not help.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether repeating the same action may succeed.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert an `AbookError` into a `HumanError` for the status bar.
pub fn humanize_error(err: &AbookError) -> HumanError {
    match err {
        // -- Canvas errors --
        AbookError::LayerOutOfRange { .. } => HumanError {
            message: "That layer doesn't exist.".into(),
            suggestion: "Open the layers panel and pick one of the listed layers.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        AbookError::LastLayer => HumanError {
            message: "A notebook needs at least one layer.".into(),
            suggestion: "Add another layer before removing this one.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        AbookError::InvalidArgument(detail) => HumanError {
            message: "That request couldn't be understood.".into(),
            suggestion: format!("Check the value and try again. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        // -- Document errors --
        AbookError::PdfError(_) => HumanError {
            message: "The PDF couldn't be created.".into(),
            suggestion: "Make sure the export folder exists and has free space, then export again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        AbookError::ImageError(_) => HumanError {
            message: "This page image couldn't be processed.".into(),
            suggestion: "Try again, or export the notebook as a PDF instead.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        AbookError::OcrError(_) => HumanError {
            message: "Handwriting conversion didn't work on this page.".into(),
            suggestion: "Write a little larger and more clearly, then convert again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        AbookError::Network(_) => HumanError {
            message: "The dictionary couldn't be reached.".into(),
            suggestion: "Check your internet connection, then look the word up again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Storage errors --
        AbookError::Database(_) | AbookError::Io(_) => HumanError {
            message: "Your notebook couldn't be saved or opened.".into(),
            suggestion: "Your current page is still open. Check free disk space and try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        AbookError::Encoding(_) | AbookError::Serialization(_) => HumanError {
            message: "Part of this notebook is damaged.".into(),
            suggestion: "The saved page data could not be read. Open another notebook or restore a backup.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        AbookError::IntegrityMismatch { .. } => HumanError {
            message: "A saved page has changed since it was stored.".into(),
            suggestion: "The page data doesn't match its checksum. Restore the notebook from a backup.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        // -- Collaborators --
        AbookError::Unavailable(feature) => HumanError {
            message: format!("{feature} isn't available on this device."),
            suggestion: "Install the missing component in Settings. Drawing and saving still work.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_failure_is_transient() {
        let human = humanize_error(&AbookError::Database("disk I/O error".into()));
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.retriable);
    }

    #[test]
    fn missing_collaborator_names_the_feature() {
        let human = humanize_error(&AbookError::Unavailable("Spell checking".into()));
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.message.starts_with("Spell checking"));
    }

    #[test]
    fn corrupted_blob_is_permanent() {
        let human = humanize_error(&AbookError::Encoding("bad magic".into()));
        assert_eq!(human.severity, Severity::Permanent);
        assert!(!human.retriable);
    }
}
