//! Attribute normalization
//!
//! Maps raw candidate and job records into canonical forms the scorer can
//! compare: lower-cased deduplicated skill sets and numeric years of
//! experience. Pure functions; the only failure is a missing identity.

use crate::error::{RankerError, Result};
use crate::input::records::{CandidateRecord, JobRecord, NumberOrText};
use regex::Regex;
use std::collections::BTreeSet;

/// Canonical candidate attributes used for scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: String,
    pub skills: BTreeSet<String>,
    pub experience_years: f32,
    pub text: String,
    pub embedding: Option<Vec<f32>>,
}

/// Canonical job-description attributes used for scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct JobDescription {
    pub id: String,
    pub required_skills: BTreeSet<String>,
    pub required_experience: f32,
    pub text: String,
    pub embedding: Option<Vec<f32>>,
}

pub fn normalize_candidate(record: &CandidateRecord) -> Result<Candidate> {
    let id = normalize_id(&record.id, "candidate")?;

    Ok(Candidate {
        id,
        skills: normalize_skills(&record.skills),
        experience_years: parse_experience(record.experience.as_ref()),
        text: record.embedding_text(),
        embedding: record.embedding.clone(),
    })
}

pub fn normalize_job(record: &JobRecord) -> Result<JobDescription> {
    let id = normalize_id(&record.id, "job description")?;

    Ok(JobDescription {
        id,
        required_skills: normalize_skills(&record.required_skills),
        required_experience: parse_experience(record.required_experience.as_ref()),
        text: record.embedding_text(),
        embedding: record.embedding.clone(),
    })
}

fn normalize_id(raw: &str, kind: &str) -> Result<String> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(RankerError::Validation(format!("{} record has no id", kind)));
    }
    Ok(id.to_string())
}

fn normalize_skills(raw: &[String]) -> BTreeSet<String> {
    raw.iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Years of experience from a number or free text ("3", "3.5", "3+ years",
/// "2-4"). Ranges take the lower bound. Missing or unparseable input is 0,
/// never an error.
fn parse_experience(raw: Option<&NumberOrText>) -> f32 {
    match raw {
        None => 0.0,
        Some(NumberOrText::Number(n)) => n.max(0.0),
        Some(NumberOrText::Text(text)) => {
            let pattern = Regex::new(r"(\d+(?:\.\d+)?)").unwrap();
            pattern
                .captures(text)
                .and_then(|cap| cap.get(1))
                .and_then(|m| m.as_str().parse::<f32>().ok())
                .map(|n| n.max(0.0))
                .unwrap_or(0.0)
        }
    }
}
