// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rule based grammar hints.

use serde::Serialize;

use super::words::WORD_RE;

pub const MAX_GRAMMAR_SUGGESTIONS: usize = 3;

/// A grammar hint covering `length` bytes from `position`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrammarIssue {
    pub message: String,
    pub suggestions: Vec<String>,
    pub position: usize,
    pub length: usize,
    pub category: String,
}

const CAPITALIZATION: &str = "Capitalization";
const REPETITION: &str = "Repetition";

/// Checks three rules: a word repeated back to back, a sentence starting in
/// lowercase, and a lowercase standalone "i".
#[derive(Debug, Default, Clone, Copy)]
pub struct GrammarChecker;

impl GrammarChecker {
    pub fn check(&self, text: &str) -> Vec<GrammarIssue> {
        let mut issues = Vec::new();
        let mut previous: Option<regex::Match<'_>> = None;

        for word in WORD_RE.find_iter(text) {
            let gap = &text[previous.map_or(0, |p| p.end())..word.start()];
            let starts_sentence = previous.is_none() || gap.contains(['.', '!', '?']);

            let repeated = previous.filter(|prev| {
                gap.chars().all(char::is_whitespace)
                    && prev.as_str().eq_ignore_ascii_case(word.as_str())
            });
            if let Some(prev) = repeated {
                issues.push(GrammarIssue {
                    message: format!("Possible repeated word: \"{}\"", word.as_str()),
                    suggestions: vec![prev.as_str().to_owned()],
                    position: prev.start(),
                    length: word.end() - prev.start(),
                    category: REPETITION.into(),
                });
            }

            let first_lower = word.as_str().starts_with(|c: char| c.is_ascii_lowercase());
            if starts_sentence && first_lower {
                issues.push(GrammarIssue {
                    message: "Sentence should start with a capital letter".into(),
                    suggestions: vec![capitalize(word.as_str())],
                    position: word.start(),
                    length: word.len(),
                    category: CAPITALIZATION.into(),
                });
            } else if word.as_str() == "i" {
                issues.push(GrammarIssue {
                    message: "The pronoun \"I\" is always capitalised".into(),
                    suggestions: vec!["I".into()],
                    position: word.start(),
                    length: 1,
                    category: CAPITALIZATION.into(),
                });
            }

            previous = Some(word);
        }

        for issue in &mut issues {
            issue.suggestions.truncate(MAX_GRAMMAR_SUGGESTIONS);
        }
        issues.sort_by_key(|i| i.position);
        issues
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_has_no_issues() {
        assert!(GrammarChecker.check("This is fine. So is this!").is_empty());
        assert!(GrammarChecker.check("").is_empty());
    }

    #[test]
    fn repeated_words_are_flagged() {
        let issues = GrammarChecker.check("We saw the the dog.");
        assert_eq!(issues.len(), 1);
        let issue = &issues[0];
        assert_eq!(issue.category, "Repetition");
        assert_eq!(issue.position, 7);
        assert_eq!(issue.length, 7);
        assert_eq!(issue.suggestions, ["the"]);
    }

    #[test]
    fn repetition_across_punctuation_is_not_flagged() {
        assert!(GrammarChecker.check("Go. Go home.").is_empty());
    }

    #[test]
    fn lowercase_sentence_starts_are_flagged() {
        let issues = GrammarChecker.check("hello there. it works? Yes.");
        let fixes: Vec<&str> = issues.iter().map(|i| i.suggestions[0].as_str()).collect();
        assert_eq!(fixes, ["Hello", "It"]);
        assert_eq!(issues[1].position, 13);
    }

    #[test]
    fn lone_lowercase_i_is_flagged_once() {
        let issues = GrammarChecker.check("Today i think. i agree.");
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.suggestions == ["I"]));
        assert_eq!(issues[0].position, 6);
        assert_eq!(issues[1].position, 15);
    }
}
