//! Raw input record shapes
//!
//! Field names and aliases follow the JSON the upstream extraction stage
//! produces. Everything except the id is optional; the normalizer decides
//! what is usable.

use serde::{Deserialize, Serialize};

/// Numeric field that may arrive as a JSON number or as free text such as
/// "3+ years" or "2-4".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(f32),
    Text(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRecord {
    #[serde(default, alias = "candidate_id")]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, alias = "professional_summary")]
    pub summary: String,

    #[serde(default, alias = "key_skills", alias = "raw_skills")]
    pub skills: Vec<String>,

    #[serde(default, alias = "experience_years", alias = "years_of_experience")]
    pub experience: Option<NumberOrText>,

    #[serde(default, alias = "plaintext")]
    pub text: String,

    /// Precomputed vector from the external embedding service, if the
    /// extraction stage inlined one.
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(default, alias = "jd_id")]
    pub id: String,

    #[serde(default, alias = "job_title")]
    pub title: String,

    #[serde(default, alias = "primary_skills")]
    pub required_skills: Vec<String>,

    #[serde(default, alias = "experience_required", alias = "min_experience")]
    pub required_experience: Option<NumberOrText>,

    #[serde(default, alias = "source_text")]
    pub description: String,

    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
}

impl CandidateRecord {
    /// Text handed to the embedder when no vector is inlined: summary plus
    /// skills plus raw resume text, matching what was embedded upstream.
    pub fn embedding_text(&self) -> String {
        let mut parts: Vec<&str> = vec![self.summary.as_str()];
        parts.extend(self.skills.iter().map(|s| s.as_str()));
        parts.push(self.text.as_str());
        parts.retain(|p| !p.trim().is_empty());
        parts.join(" ")
    }
}

impl JobRecord {
    pub fn embedding_text(&self) -> String {
        let mut parts: Vec<&str> = vec![self.title.as_str()];
        parts.extend(self.required_skills.iter().map(|s| s.as_str()));
        parts.push(self.description.as_str());
        parts.retain(|p| !p.trim().is_empty());
        parts.join(" ")
    }
}
