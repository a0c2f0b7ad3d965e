//! Keyword data validation.
//!
//! Checks a keyword folder against the data conventions: every file is a
//! non-empty JSON list of unique lowercase strings and every file name
//! starts with a capital letter. Loading never enforces these rules.

use std::collections::HashSet;
use std::path::Path;

use serde_json::Value;

use crate::keywords::is_json;

/// Outcome of validating one keyword folder.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub folder_exists: bool,
    pub files_checked: usize,
    pub keywords: usize,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.folder_exists && self.errors.is_empty()
    }
}

/// Validate every `*.json` file in `dir`.
pub fn validate_folder(dir: &Path) -> ValidationReport {
    let mut report = ValidationReport::default();

    if !dir.is_dir() {
        report
            .errors
            .push(format!("Folder not found: {}", dir.display()));
        return report;
    }
    report.folder_exists = true;

    let mut files: Vec<_> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && is_json(p))
            .collect(),
        Err(e) => {
            report
                .errors
                .push(format!("Failed to read {}: {}", dir.display(), e));
            return report;
        }
    };
    files.sort();

    for path in &files {
        report.files_checked += 1;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();
        validate_file(path, &filename, &mut report);
    }

    report
}

fn validate_file(path: &Path, filename: &str, report: &mut ValidationReport) {
    if !filename.chars().next().is_some_and(char::is_uppercase) {
        report
            .errors
            .push(format!("{} is not capitalized", filename));
    }

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            report.errors.push(format!("{} could not be read: {}", filename, e));
            return;
        }
    };
    if content.trim().is_empty() {
        report.errors.push(format!("{} is empty", filename));
        return;
    }

    let data: Value = match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            report
                .errors
                .push(format!("{} is not valid JSON: {}", filename, e));
            return;
        }
    };
    let Some(items) = data.as_array() else {
        report
            .errors
            .push(format!("{} does not contain a list", filename));
        return;
    };
    if items.is_empty() {
        report
            .errors
            .push(format!("{} contains an empty list", filename));
        return;
    }
    report.keywords += items.len();

    let mut seen = HashSet::new();
    if !items.iter().all(|item| seen.insert(item.to_string())) {
        report
            .errors
            .push(format!("{} contains duplicate entries", filename));
    }

    for item in items {
        match item.as_str() {
            Some(s) if is_lowercase_word(s) => {}
            _ => report
                .errors
                .push(format!("{} contains non-lowercase value: {}", filename, item)),
        }
    }
}

/// At least one cased character and no uppercase ones.
fn is_lowercase_word(s: &str) -> bool {
    s.chars().any(char::is_lowercase) && !s.chars().any(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_valid_folder() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Environment.json", r#"["clean","green","environment"]"#);
        write(dir.path(), "Technology.json", r#"["ai","software","3d printing"]"#);

        let report = validate_folder(dir.path());
        assert!(report.is_valid(), "{:?}", report.errors);
        assert_eq!(report.files_checked, 2);
        assert_eq!(report.keywords, 6);
    }

    #[test]
    fn test_missing_folder() {
        let dir = tempfile::tempdir().unwrap();
        let report = validate_folder(&dir.path().join("missing"));
        assert!(!report.folder_exists);
        assert!(!report.is_valid());
    }

    #[test]
    fn test_each_rule_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "lowercase.json", r#"["fine"]"#);
        write(dir.path(), "Empty.json", "   ");
        write(dir.path(), "Broken.json", "[");
        write(dir.path(), "Object.json", r#"{"a": 1}"#);
        write(dir.path(), "Nothing.json", "[]");
        write(dir.path(), "Dupes.json", r#"["a","a"]"#);
        write(dir.path(), "Shouty.json", r#"["OK", 3, "123"]"#);

        let report = validate_folder(dir.path());
        let joined = report.errors.join("\n");
        assert!(joined.contains("lowercase.json is not capitalized"));
        assert!(joined.contains("Empty.json is empty"));
        assert!(joined.contains("Broken.json is not valid JSON"));
        assert!(joined.contains("Object.json does not contain a list"));
        assert!(joined.contains("Nothing.json contains an empty list"));
        assert!(joined.contains("Dupes.json contains duplicate entries"));
        assert_eq!(
            report
                .errors
                .iter()
                .filter(|e| e.starts_with("Shouty.json contains non-lowercase"))
                .count(),
            3
        );
    }
}
