//! DocTopic Resolve: lexical scoring of documents against topic keywords.
//!
//! Two counting policies exist (see [`MatchPolicy`]); a matcher is built
//! for exactly one of them and never mixes the two.

pub mod keyword;

pub use doctopic_core::{KeywordMatch, MatchPolicy};
pub use keyword::{match_keywords, KeywordMatcher};
