//! Offline commands: keyword data validation and one-shot analysis.

use std::path::{Path, PathBuf};

use doctopic_core::{AnalysisResult, DataPaths, MatchPolicy, Result};
use doctopic_ingest::extract_path;
use doctopic_resolve::KeywordMatcher;
use doctopic_store::{validate_folder, KeywordStore, ValidationReport};

/// The keyword folder to validate: `<dir>/topics_keywords` when it exists,
/// otherwise `dir` itself.
pub fn keyword_folder(dir: &Path) -> PathBuf {
    let nested = DataPaths::new(dir).keywords_dir;
    if nested.is_dir() {
        nested
    } else {
        dir.to_path_buf()
    }
}

pub fn validate(dir: &Path) -> ValidationReport {
    validate_folder(&keyword_folder(dir))
}

pub fn print_report(folder: &Path, report: &ValidationReport) {
    println!("=== DocTopic Keyword Validation ===");
    println!();
    println!("Folder:             {}", folder.display());
    println!("Folder exists:      {}", if report.folder_exists { "YES" } else { "NO" });
    println!("Files checked:      {}", report.files_checked);
    println!("Keywords:           {}", report.keywords);

    if !report.errors.is_empty() {
        println!();
        println!("Errors:");
        for e in &report.errors {
            println!("  - {}", e);
        }
    }

    println!();
    if report.is_valid() {
        println!("Status: VALID");
    } else {
        println!("Status: INVALID");
    }
}

/// Score one file against one topic and render the result as JSON.
pub fn analyze(
    data_paths: &DataPaths,
    file: &Path,
    topic: &str,
    policy: MatchPolicy,
) -> Result<String> {
    let store = KeywordStore::open(data_paths.keyword_source())?;
    let text = extract_path(file)?;
    let result = KeywordMatcher::new(policy).score_topic(&store.snapshot(), topic, &text)?;

    let rendered = serde_json::json!({
        "title": "Analysis Results",
        "topic": topic,
        "filename": file.display().to_string(),
        "policy": policy,
        "result": AnalysisResult::from(result),
    });
    Ok(serde_json::to_string_pretty(&rendered)?)
}
