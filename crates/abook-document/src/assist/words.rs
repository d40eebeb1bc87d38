// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Word tokenising shared by the assistant and the lookup list.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Runs of ASCII letters.
pub(crate) static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z]+").expect("word pattern is valid"));

/// Most words offered for dictionary lookup after a conversion.
pub const MAX_LOOKUP_WORDS: usize = 15;

/// Unique words of `text`, sorted ignoring case, capped at
/// [`MAX_LOOKUP_WORDS`]. The first spelling seen of each word is kept.
pub fn extract_words(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut words: Vec<String> = WORD_RE
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|w| seen.insert(w.to_ascii_lowercase()))
        .map(str::to_owned)
        .collect();
    words.sort_by_key(|w| w.to_ascii_lowercase());
    words.truncate(MAX_LOOKUP_WORDS);
    words
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
