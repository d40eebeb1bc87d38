// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Writing assistant for recognised handwriting.
//
// Spelling needs a word list and is reported `Unavailable` without one;
// grammar hints and summaries are self-contained and always work.

pub mod dictionary;
pub mod grammar;
pub mod spelling;
pub mod summary;
pub mod words;

use std::path::Path;

use abook_core::error::{AbookError, Result};
use serde::Serialize;
use tracing::{debug, warn};

pub use dictionary::{DictionaryClient, WordLookup};
pub use grammar::{GrammarChecker, GrammarIssue};
pub use spelling::{Correction, SpellChecker, SpellingIssue};
pub use summary::summarize;
pub use words::extract_words;

/// Everything the assistant can say about one piece of text.
#[derive(Debug, Clone, Serialize)]
pub struct TextAnalysis {
    pub spelling_errors: Vec<SpellingIssue>,
    pub grammar_issues: Vec<GrammarIssue>,
    pub word_count: usize,
    pub char_count: usize,
    pub spelling_available: bool,
}

#[derive(Debug, Default)]
pub struct WritingAssistant {
    speller: Option<SpellChecker>,
    grammar: GrammarChecker,
}

impl WritingAssistant {
    pub fn new(speller: Option<SpellChecker>) -> Self {
        Self {
            speller,
            grammar: GrammarChecker,
        }
    }

    /// Load the word list at `word_list`, or run without spelling when it is
    /// missing or unset.
    pub fn from_word_list(word_list: Option<&Path>) -> Self {
        let speller = word_list.and_then(|path| match SpellChecker::from_word_list(path) {
            Ok(speller) => Some(speller),
            Err(e) => {
                warn!(error = %e, "spell checking disabled");
                None
            }
        });
        Self::new(speller)
    }

    pub fn spelling_available(&self) -> bool {
        self.speller.is_some()
    }

    fn speller(&self) -> Result<&SpellChecker> {
        self.speller
            .as_ref()
            .ok_or_else(|| AbookError::Unavailable("spell checking".into()))
    }

    pub fn check_spelling(&self, text: &str) -> Result<Vec<SpellingIssue>> {
        let issues = self.speller()?.check(text);
        debug!(issues = issues.len(), "spelling checked");
        Ok(issues)
    }

    pub fn suggestions(&self, word: &str) -> Result<Vec<String>> {
        Ok(self.speller()?.suggestions(word, spelling::MAX_SUGGESTIONS))
    }

    pub fn auto_correct(&self, text: &str, aggressive: bool) -> Result<(String, Vec<Correction>)> {
        Ok(self.speller()?.auto_correct(text, aggressive))
    }

    pub fn add_to_dictionary(&mut self, word: &str) -> Result<()> {
        self.speller
            .as_mut()
            .ok_or_else(|| AbookError::Unavailable("spell checking".into()))?
            .add_word(word);
        Ok(())
    }

    pub fn check_grammar(&self, text: &str) -> Vec<GrammarIssue> {
        self.grammar.check(text)
    }

    /// Spelling (when available), grammar and counts in one go.
    pub fn analyze(&self, text: &str) -> TextAnalysis {
        TextAnalysis {
            spelling_errors: self
                .speller
                .as_ref()
                .map(|s| s.check(text))
                .unwrap_or_default(),
            grammar_issues: self.check_grammar(text),
            word_count: words::word_count(text),
            char_count: text.chars().count(),
            spelling_available: self.spelling_available(),
        }
    }
}
