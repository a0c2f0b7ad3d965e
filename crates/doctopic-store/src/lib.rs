//! DocTopic Store: static topic keyword data.

pub mod keywords;
pub mod validate;

pub use keywords::{load, load_file, load_folder, KeywordStore, TopicKeywords};
pub use validate::{validate_folder, ValidationReport};
