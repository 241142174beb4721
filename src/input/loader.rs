//! Loading candidate and job records from disk
//!
//! A path is either a single JSON file or a directory of `*.json` files.
//! Malformed records are skipped and reported rather than aborting the batch.

use crate::error::{RankerError, Result};
use crate::input::records::{CandidateRecord, JobRecord};
use crate::output::report::SkippedRecord;
use regex::Regex;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Successfully parsed records plus everything that had to be skipped.
#[derive(Debug)]
pub struct LoadOutcome<T> {
    pub records: Vec<T>,
    pub skipped: Vec<SkippedRecord>,
}

pub fn load_candidates(path: &Path) -> Result<LoadOutcome<CandidateRecord>> {
    let mut outcome: LoadOutcome<CandidateRecord> = load_records(path)?;

    // Resumes without a structured skill list sometimes carry a "Skills:"
    // line in the raw text; recover it so skill overlap has something to
    // work with.
    for record in &mut outcome.records {
        if record.skills.is_empty() && !record.text.is_empty() {
            record.skills = extract_skills_line(&record.text);
        }
    }

    Ok(outcome)
}

pub fn load_jobs(path: &Path) -> Result<LoadOutcome<JobRecord>> {
    load_records(path)
}

fn load_records<T: DeserializeOwned>(path: &Path) -> Result<LoadOutcome<T>> {
    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for file in json_files(path)? {
        let source = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file.display().to_string());

        let content = match std::fs::read_to_string(&file) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Skipping unreadable file {}: {}", source, e);
                skipped.push(SkippedRecord {
                    id: source,
                    reason: format!("unreadable file: {}", e),
                });
                continue;
            }
        };

        match serde_json::from_str::<T>(&content) {
            Ok(record) => records.push(record),
            Err(e) => {
                log::warn!("Skipping malformed record {}: {}", source, e);
                skipped.push(SkippedRecord {
                    id: source,
                    reason: format!("malformed JSON: {}", e),
                });
            }
        }
    }

    Ok(LoadOutcome { records, skipped })
}

/// Expand a path into the JSON files it names, sorted for deterministic
/// batch order.
fn json_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    if path.is_dir() {
        let mut files: Vec<PathBuf> = std::fs::read_dir(path)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();
        return Ok(files);
    }

    Err(RankerError::InvalidInput(format!(
        "input path does not exist: {}",
        path.display()
    )))
}

/// Pull skill tokens out of a "Skills: a, b; c" line in raw resume text.
fn extract_skills_line(text: &str) -> Vec<String> {
    let pattern = Regex::new(r"(?im)^\s*skills[:\-]?(.+)$").unwrap();

    pattern
        .captures(text)
        .and_then(|cap| cap.get(1))
        .map(|line| {
            line.as_str()
                .split([',', ';'])
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}
