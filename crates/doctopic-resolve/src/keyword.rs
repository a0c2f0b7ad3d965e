//! Keyword match scoring.
//!
//! `match_percent = keyword_count / total_words * 100`, rounded to 3
//! decimals and exactly 0 when there are no words.
//!
//! Under [`MatchPolicy::Substring`] a keyword may hit several times inside
//! one word (`"a"` in `"banana"`), and phrases count once per occurrence,
//! so the percentage is not capped at 100.

use std::collections::HashMap;

use doctopic_core::{round_to, Error, KeywordMatch, MatchPolicy, Result};
use doctopic_ingest::normalize::{normalize, word_count};
use doctopic_store::TopicKeywords;
use tracing::debug;

/// Scores text against keyword lists with a fixed policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordMatcher {
    policy: MatchPolicy,
}

impl KeywordMatcher {
    pub fn new(policy: MatchPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Score `text` against `keywords`.
    pub fn score<S: AsRef<str>>(&self, text: &str, keywords: &[S]) -> KeywordMatch {
        let (total_words, keyword_count) = match self.policy {
            MatchPolicy::Substring => substring_count(text, keywords),
            MatchPolicy::Token => token_frequency(text, keywords),
        };

        let match_percent = if total_words == 0 {
            0.0
        } else {
            round_to(keyword_count as f64 / total_words as f64 * 100.0, 3)
        };

        KeywordMatch {
            total_words,
            keyword_count,
            match_percent,
        }
    }

    /// Score `text` against the keywords of a named topic.
    pub fn score_topic(
        &self,
        topics: &TopicKeywords,
        topic: &str,
        text: &str,
    ) -> Result<KeywordMatch> {
        let keywords = topics
            .get(topic)
            .ok_or_else(|| Error::NotFound(format!("topic {}", topic)))?;
        let result = self.score(text, keywords.as_slice());
        debug!(
            "Topic {} ({}): {}/{} words = {}%",
            topic, self.policy, result.keyword_count, result.total_words, result.match_percent
        );
        Ok(result)
    }
}

/// Score `text` against `keywords` under `policy`.
pub fn match_keywords<S: AsRef<str>>(
    text: &str,
    keywords: &[S],
    policy: MatchPolicy,
) -> KeywordMatch {
    KeywordMatcher::new(policy).score(text, keywords)
}

/// Word tokens of the raw text vs. non-overlapping substring hits.
fn substring_count<S: AsRef<str>>(text: &str, keywords: &[S]) -> (usize, usize) {
    let lower = text.to_lowercase();
    let total_words = word_count(&lower);

    let keyword_count = keywords
        .iter()
        .map(|kw| kw.as_ref().to_lowercase())
        .filter(|kw| !kw.is_empty())
        .map(|kw| lower.matches(kw.as_str()).count())
        .sum();

    (total_words, keyword_count)
}

/// Surviving tokens after stop-word removal vs. exact token hits.
fn token_frequency<S: AsRef<str>>(text: &str, keywords: &[S]) -> (usize, usize) {
    let cleaned = normalize(text);

    let mut freq: HashMap<&str, usize> = HashMap::new();
    let mut total_words = 0;
    for word in cleaned.split_whitespace() {
        *freq.entry(word).or_insert(0) += 1;
        total_words += 1;
    }

    let keyword_count = keywords
        .iter()
        .map(|kw| {
            freq.get(kw.as_ref().to_lowercase().as_str())
                .copied()
                .unwrap_or(0)
        })
        .sum();

    (total_words, keyword_count)
}
