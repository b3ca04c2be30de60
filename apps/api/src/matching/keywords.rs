//! Salient-keyword extraction over job text.

use std::collections::HashMap;

/// Upper bound on keywords returned by `extract_keywords`.
pub const MAX_KEYWORDS: usize = 15;

/// Tokens this short or shorter are never keywords.
const MIN_TOKEN_LEN: usize = 3;

pub const STOP_WORDS: &[&str] = &[
    "the", "be", "to", "of", "and", "a", "in", "that", "have", "i", "it", "for", "not", "on",
    "with", "he", "as", "you", "do", "at", "this", "but", "his", "by", "from", "they", "we",
    "say", "her", "she", "or", "an", "will", "my", "one", "all", "would", "there", "their",
    "what", "so", "up", "out", "if", "about", "who", "get", "which", "go",
];

/// Returns up to `MAX_KEYWORDS` repeated, non-stop-word tokens from `text`, most frequent first.
///
/// Only tokens occurring more than once qualify. Ties keep first-seen order.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    // (token, count) in first-seen order; the index map points into it.
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for token in cleaned.split_whitespace() {
        if token.len() < MIN_TOKEN_LEN || STOP_WORDS.contains(&token) {
            continue;
        }
        match index.get(token).copied() {
            Some(i) => counts[i].1 += 1,
            None => {
                index.insert(token, counts.len());
                counts.push((token, 1));
            }
        }
    }

    counts.retain(|(_, count)| *count > 1);
    // sort_by is stable, so equal counts stay in first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    counts
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(|(token, _)| token.to_string())
        .collect()
}
