//! Input validation for the scaffold prompts
//!
//! These rules guard the prompt boundary; the pipeline itself trusts the
//! request it receives.

use std::path::Path;

/// A project name must start with a letter and contain only letters and
/// numbers.
pub fn validate_project_name(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err("Project name is required".to_string());
    }
    if value.chars().any(char::is_whitespace) {
        return Err("Project name cannot contain spaces".to_string());
    }
    let starts_with_letter = value
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic());
    if !starts_with_letter || !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(
            "Project name must start with a letter and contain only letters and numbers"
                .to_string(),
        );
    }
    Ok(())
}

/// Bundle identifiers are reverse-domain: at least two dot-separated
/// segments, each a lowercase letter followed by lowercase letters, digits,
/// or hyphens.
pub fn validate_bundle_id(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err("Bundle ID is required".to_string());
    }
    let segment_ok = |segment: &str| {
        let mut chars = segment.chars();
        chars.next().is_some_and(|c| c.is_ascii_lowercase())
            && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    };
    let segments: Vec<&str> = value.split('.').collect();
    if segments.len() < 2 || !segments.iter().all(|s| segment_ok(s)) {
        return Err("Invalid bundle ID format (e.g., com.company.myapp)".to_string());
    }
    Ok(())
}

/// The target directory must not already exist as a non-empty directory.
pub fn validate_directory(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err("Directory is required".to_string());
    }
    let path = Path::new(value);
    if path.exists() {
        let occupied = std::fs::read_dir(path)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false);
        if occupied {
            return Err("Directory already exists and is not empty".to_string());
        }
    }
    Ok(())
}
