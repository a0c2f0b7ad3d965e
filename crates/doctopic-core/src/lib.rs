//! DocTopic Core: shared errors, configuration and analysis result types.

pub mod config;
pub mod error;
pub mod types;

pub use config::{DataPaths, DocTopicConfig};
pub use error::{Error, Result};
pub use types::{
    format_percent, round_to, AnalysisResult, KeywordMatch, MatchPolicy, TopTopics, TopicScore,
    UNKNOWN_TOPIC,
};
