// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Extractive summaries: keep the longest, earliest sentences.

use std::cmp::Ordering;

pub const SUMMARY_SENTENCES: usize = 3;
/// Shorter text is returned untouched.
pub const MIN_SUMMARY_INPUT: usize = 50;

/// Pick up to `max_sentences` sentences scored by word count minus half the
/// sentence index, and return them in their original order.
///
/// Line breaks count as sentence ends. Text that is short or already has no
/// more than `max_sentences` sentences comes back unchanged.
pub fn summarize(text: &str, max_sentences: usize) -> String {
    if text.trim().len() < MIN_SUMMARY_INPUT {
        return text.to_owned();
    }

    let normalised = text.replace('\n', ". ");
    let sentences: Vec<&str> = normalised
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if sentences.len() <= max_sentences {
        return text.to_owned();
    }

    let mut scored: Vec<(f32, usize)> = sentences
        .iter()
        .enumerate()
        .map(|(i, s)| (s.split_whitespace().count() as f32 - i as f32 * 0.5, i))
        .collect();
    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| sentences[b.1].cmp(sentences[a.1]))
    });

    let mut keep: Vec<usize> = scored.iter().take(max_sentences).map(|&(_, i)| i).collect();
    keep.sort_unstable();

    let mut summary = keep
        .iter()
        .map(|&i| sentences[i])
        .collect::<Vec<_>>()
        .join(". ");
    if !summary.is_empty() && !summary.ends_with('.') {
        summary.push('.');
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_unchanged() {
        assert_eq!(summarize("Just a note.", SUMMARY_SENTENCES), "Just a note.");
    }

    #[test]
    fn few_sentences_are_unchanged() {
        let text = "The first sentence is here. The second one follows it. Then a third ends.";
        assert_eq!(summarize(text, SUMMARY_SENTENCES), text);
    }

    #[test]
    fn keeps_top_sentences_in_original_order() {
        let text = "Short one. \
                    This sentence has quite a lot of words in it overall. \
                    Tiny. \
                    Another reasonably long sentence with several words. \
                    Ok then. \
                    The closing sentence also carries a fair number of words";
        let summary = summarize(text, SUMMARY_SENTENCES);
        assert_eq!(
            summary,
            "This sentence has quite a lot of words in it overall. \
             Another reasonably long sentence with several words. \
             The closing sentence also carries a fair number of words."
        );
    }

    #[test]
    fn line_breaks_split_sentences() {
        let text = "alpha beta gamma delta\nshort\nepsilon zeta eta theta iota\nx\nkappa lambda mu nu xi omicron";
        let summary = summarize(text, 2);
        assert_eq!(summary, "epsilon zeta eta theta iota. kappa lambda mu nu xi omicron.");
    }
}
