//! Analysis result types handed to the presentation layer.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::str::FromStr;

use crate::error::Error;

/// Label returned when there is no text to classify.
pub const UNKNOWN_TOPIC: &str = "Unknown";

/// How keyword hits are counted against a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    /// Case-insensitive substring occurrences in the raw text; every word
    /// token counts towards the total, stop words included.
    #[default]
    Substring,
    /// Exact token frequencies after stop-word removal.
    Token,
}

impl std::fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Substring => write!(f, "substring"),
            Self::Token => write!(f, "token"),
        }
    }
}

impl FromStr for MatchPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "substring" | "substring-count" | "substring_count" => Ok(Self::Substring),
            "token" | "token-frequency" | "token_frequency" => Ok(Self::Token),
            other => Err(Error::Config(format!("unknown match policy: {}", other))),
        }
    }
}

/// Lexical match of a document against one topic's keyword list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeywordMatch {
    pub total_words: usize,
    pub keyword_count: usize,
    /// Percentage rounded to 3 decimals; `0.0` when `total_words` is 0.
    pub match_percent: f64,
}

impl KeywordMatch {
    pub fn empty() -> Self {
        Self {
            total_words: 0,
            keyword_count: 0,
            match_percent: 0.0,
        }
    }
}

/// One ranked topic with its normalized score (percent, unrounded).
#[derive(Debug, Clone, PartialEq)]
pub struct TopicScore {
    pub topic: String,
    pub score: f64,
}

/// Ranked topics, best first. Serializes as an ordered JSON object of
/// `label -> "12.34%"`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopTopics(pub Vec<TopicScore>);

impl TopTopics {
    /// The single-entry result for blank input.
    pub fn unknown() -> Self {
        Self(vec![TopicScore {
            topic: UNKNOWN_TOPIC.to_string(),
            score: 0.0,
        }])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TopicScore> {
        self.0.iter()
    }

    /// `(label, "12.34%")` pairs in rank order.
    pub fn rendered(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|s| (s.topic.clone(), format_percent(s.score)))
            .collect()
    }
}

impl Serialize for TopTopics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for score in &self.0 {
            map.serialize_entry(&score.topic, &format_percent(score.score))?;
        }
        map.end()
    }
}

/// Either kind of analysis, as returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    Lexical(KeywordMatch),
    Semantic(TopTopics),
}

impl From<KeywordMatch> for AnalysisResult {
    fn from(m: KeywordMatch) -> Self {
        Self::Lexical(m)
    }
}

impl From<TopTopics> for AnalysisResult {
    fn from(t: TopTopics) -> Self {
        Self::Semantic(t)
    }
}

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Render a percentage rounded to 2 decimals with a `%` suffix.
/// Whole numbers keep one decimal place (`40.0%`).
pub fn format_percent(value: f64) -> String {
    let rounded = round_to(value, 2);
    if rounded.fract() == 0.0 {
        format!("{:.1}%", rounded)
    } else {
        format!("{}%", rounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(41.2749), "41.27%");
        assert_eq!(format_percent(40.0), "40.0%");
        assert_eq!(format_percent(0.0), "0.0%");
        assert_eq!(format_percent(33.3333), "33.33%");
    }

    #[test]
    fn test_top_topics_preserves_rank_order() {
        let topics = TopTopics(vec![
            TopicScore { topic: "Sports".into(), score: 50.0 },
            TopicScore { topic: "Art".into(), score: 30.0 },
            TopicScore { topic: "Music".into(), score: 20.0 },
        ]);
        let json = serde_json::to_string(&topics).unwrap();
        assert_eq!(json, r#"{"Sports":"50.0%","Art":"30.0%","Music":"20.0%"}"#);
    }

    #[test]
    fn test_keyword_match_keys() {
        let result = AnalysisResult::from(KeywordMatch {
            total_words: 8,
            keyword_count: 3,
            match_percent: 37.5,
        });
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["total_words"], 8);
        assert_eq!(value["keyword_count"], 3);
        assert_eq!(value["match_percent"], 37.5);
        assert_eq!(value.as_object().unwrap().len(), 3);
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("substring".parse::<MatchPolicy>().unwrap(), MatchPolicy::Substring);
        assert_eq!("Token".parse::<MatchPolicy>().unwrap(), MatchPolicy::Token);
        assert!("fuzzy".parse::<MatchPolicy>().is_err());
        assert_eq!(MatchPolicy::default(), MatchPolicy::Substring);
    }
}
