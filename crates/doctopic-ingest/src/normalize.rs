//! Tokenization and stop-word filtering.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use stop_words::{get, LANGUAGE};

/// Unicode word runs: letters, digits and underscore.
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("valid regex"));

static STOP_WORDS: Lazy<HashSet<String>> = Lazy::new(|| {
    get(LANGUAGE::English)
        .into_iter()
        .map(|w| w.to_lowercase())
        .collect()
});

/// Lowercased word tokens of `text`, stop words included.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    WORD.find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Number of word tokens in `text`.
pub fn word_count(text: &str) -> usize {
    WORD.find_iter(&text.to_lowercase()).count()
}

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

/// Lowercase, keep word tokens that are not English stop words, and join
/// them with single spaces.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    tokenize(text)
        .into_iter()
        .filter(|w| !is_stop_word(w))
        .collect::<Vec<_>>()
        .join(" ")
}
