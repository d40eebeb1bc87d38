// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Offline spell checking over an `fst` word set.
//
// The word list is a plain file with one word per line (the system
// `/usr/share/dict/words` works). Words are folded to lowercase; anything
// that is not purely alphabetic is skipped. Suggestions come from
// Levenshtein automata at distance 1, widening to 2 when nothing is close.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use abook_core::error::{AbookError, Result};
use fst::automaton::Levenshtein;
use fst::{IntoStreamer, Set};
use serde::Serialize;
use tracing::{debug, info, instrument};

use super::words::WORD_RE;

pub const MAX_SUGGESTIONS: usize = 5;

/// Always accepted regardless of the word list.
const CUSTOM_WORDS: &[&str] = &["abook", "ocr", "jss"];

/// Typos corrected even in conservative mode.
const COMMON_MISTAKES: &[(&str, &str)] = &[
    ("teh", "the"),
    ("adn", "and"),
    ("waht", "what"),
    ("thsi", "this"),
    ("taht", "that"),
    ("recieve", "receive"),
    ("occured", "occurred"),
];

/// One misspelled word. `position` is the byte offset in the checked text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpellingIssue {
    pub word: String,
    pub suggestions: Vec<String>,
    pub position: usize,
}

/// A replacement made by [`SpellChecker::auto_correct`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Correction {
    pub original: String,
    pub replacement: String,
}

pub struct SpellChecker {
    words: Set<Vec<u8>>,
    custom: HashSet<String>,
}

impl std::fmt::Debug for SpellChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpellChecker")
            .field("words", &self.words.len())
            .field("custom", &self.custom.len())
            .finish()
    }
}

impl SpellChecker {
    /// Load a newline separated word list.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_word_list(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AbookError::Unavailable(format!(
                "spell checking (no word list at {})",
                path.display()
            )));
        }
        let contents = std::fs::read_to_string(path)?;
        let checker = Self::from_words(contents.lines())?;
        info!(words = checker.words.len(), "spelling word list loaded");
        Ok(checker)
    }

    pub fn from_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let sorted: BTreeSet<String> = words
            .into_iter()
            .map(str::trim)
            .filter(|w| !w.is_empty() && w.chars().all(|c| c.is_ascii_alphabetic()))
            .map(str::to_ascii_lowercase)
            .collect();
        let words = Set::from_iter(sorted)
            .map_err(|e| AbookError::InvalidArgument(format!("word list: {e}")))?;
        Ok(Self {
            words,
            custom: CUSTOM_WORDS.iter().map(|w| (*w).to_owned()).collect(),
        })
    }

    /// Accept `word` from now on.
    pub fn add_word(&mut self, word: &str) {
        self.custom.insert(word.to_ascii_lowercase());
    }

    pub fn is_known(&self, word: &str) -> bool {
        let lower = word.to_ascii_lowercase();
        self.custom.contains(&lower) || self.words.contains(&lower)
    }

    /// Closest known words, best first.
    pub fn suggestions(&self, word: &str, limit: usize) -> Vec<String> {
        let lower = word.to_ascii_lowercase();
        for distance in 1..=2 {
            let mut found = self.search(&lower, distance);
            if found.is_empty() {
                continue;
            }
            found.retain(|candidate| candidate != &lower);
            found.sort_by_key(|c| {
                (
                    c.chars().next() != lower.chars().next(),
                    c.len().abs_diff(lower.len()),
                    c.clone(),
                )
            });
            found.truncate(limit);
            return found;
        }
        Vec::new()
    }

    fn search(&self, word: &str, distance: u32) -> Vec<String> {
        let automaton = match Levenshtein::new(word, distance) {
            Ok(automaton) => automaton,
            Err(e) => {
                debug!(word, distance, error = %e, "levenshtein automaton too large");
                return Vec::new();
            }
        };
        self.words
            .search(automaton)
            .into_stream()
            .into_strs()
            .unwrap_or_default()
    }

    /// Every unknown word of two or more letters, in text order.
    pub fn check(&self, text: &str) -> Vec<SpellingIssue> {
        WORD_RE
            .find_iter(text)
            .filter(|m| m.as_str().len() > 1 && !self.is_known(m.as_str()))
            .map(|m| SpellingIssue {
                word: m.as_str().to_owned(),
                suggestions: self.suggestions(m.as_str(), MAX_SUGGESTIONS),
                position: m.start(),
            })
            .collect()
    }

    /// Replace misspelled words, keeping trailing punctuation and the
    /// capitalisation of the original. Without `aggressive`, only well known
    /// typos are touched. Whitespace collapses to single spaces.
    pub fn auto_correct(&self, text: &str, aggressive: bool) -> (String, Vec<Correction>) {
        let mut corrections = Vec::new();
        let corrected: Vec<String> = text
            .split_whitespace()
            .map(|token| {
                let core = token.trim_end_matches(|c: char| !c.is_alphanumeric());
                let tail = &token[core.len()..];
                if core.len() < 2
                    || !core.chars().all(|c| c.is_ascii_alphabetic())
                    || self.is_known(core)
                {
                    return token.to_owned();
                }
                let Some(replacement) = self.correction_for(core, aggressive) else {
                    return token.to_owned();
                };
                let replacement = match_case(core, &replacement);
                corrections.push(Correction {
                    original: core.to_owned(),
                    replacement: replacement.clone(),
                });
                format!("{replacement}{tail}")
            })
            .collect();
        (corrected.join(" "), corrections)
    }

    fn correction_for(&self, word: &str, aggressive: bool) -> Option<String> {
        let lower = word.to_ascii_lowercase();
        if let Some((_, fix)) = COMMON_MISTAKES.iter().find(|(typo, _)| *typo == lower) {
            return Some((*fix).to_owned());
        }
        if !aggressive {
            return None;
        }
        self.suggestions(word, 1).into_iter().next()
    }
}

fn match_case(original: &str, replacement: &str) -> String {
    if original.chars().all(|c| c.is_ascii_uppercase()) {
        return replacement.to_ascii_uppercase();
    }
    let mut chars = replacement.chars();
    match (original.chars().next(), chars.next()) {
        (Some(first), Some(r)) if first.is_ascii_uppercase() => {
            r.to_ascii_uppercase().to_string() + chars.as_str()
        }
        _ => replacement.to_owned(),
    }
}
