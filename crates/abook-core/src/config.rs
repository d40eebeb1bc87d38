// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::TemplateKind;

/// Base URL of the free dictionary API; the word is appended to it.
pub const DEFAULT_DICTIONARY_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en/";

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file name inside the data directory.
    pub database_file: String,
    /// Where exported PDFs are written (data dir `exports/` when unset).
    pub pdf_output_dir: Option<PathBuf>,
    /// Newline-separated word list for the spell checker.
    pub spell_word_list: Option<PathBuf>,
    /// Directory holding `text-detection.rten` and `text-recognition.rten`.
    pub ocr_model_dir: Option<PathBuf>,
    /// Dictionary lookup endpoint.
    pub dictionary_url: String,
    /// Network timeout for dictionary lookups, in seconds.
    pub lookup_timeout_secs: u64,
    /// Pixels scrolled per wheel notch.
    pub scroll_sensitivity: f32,
    /// Template applied to layers of new notebooks.
    pub default_template: TemplateKind,
    pub pen_size: u32,
    pub highlighter_size: u32,
    pub eraser_size: u32,
    /// Replace misspellings in converted text with the best suggestion.
    pub auto_correct: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_file: "abook.db".into(),
            pdf_output_dir: None,
            spell_word_list: Some(PathBuf::from("/usr/share/dict/words")),
            ocr_model_dir: None,
            dictionary_url: DEFAULT_DICTIONARY_URL.into(),
            lookup_timeout_secs: 5,
            scroll_sensitivity: 30.0,
            default_template: TemplateKind::Blank,
            pen_size: 4,
            highlighter_size: 20,
            eraser_size: 30,
            auto_correct: true,
        }
    }
}
