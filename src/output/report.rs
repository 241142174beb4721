//! Ranking report assembly
//!
//! Shapes ranked match results into the rows the formatters render. The
//! match score is rounded to the configured precision exactly once, here,
//! never earlier in scoring.

use crate::config::BucketThresholds;
use crate::matching::ranker::RankedList;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Tier assigned to a ranked row from thresholds on the match score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Bucket {
    Hired,
    Shortlist,
    Review,
    Rejected,
}

impl Bucket {
    pub fn from_score(score: f32, thresholds: &BucketThresholds) -> Self {
        if score >= thresholds.hired {
            Bucket::Hired
        } else if score >= thresholds.shortlist {
            Bucket::Shortlist
        } else if score <= thresholds.rejected {
            Bucket::Rejected
        } else {
            Bucket::Review
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Bucket::Hired => "Hired",
            Bucket::Shortlist => "Shortlist",
            Bucket::Review => "Review",
            Bucket::Rejected => "Rejected",
        };
        write!(f, "{}", label)
    }
}

/// One assembled output row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRow {
    pub candidate_id: String,
    pub jd_id: String,
    pub match_score: f32,
    pub bucket: Bucket,
    pub rationale: String,
}

/// Ranked rows for one job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobRanking {
    pub jd_id: String,
    pub rows: Vec<RankedRow>,
}

/// A record dropped from the batch, with the reason it was dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRecord {
    pub id: String,
    pub reason: String,
}

/// A job whose similarity query failed; the rest of the batch still ranks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobFailure {
    pub jd_id: String,
    pub reason: String,
}

/// Everything one ranking run produced, successes and casualties alike.
#[derive(Debug, Clone, Serialize)]
pub struct RankingReport {
    pub generated_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub jobs: Vec<JobRanking>,
    pub skipped: Vec<SkippedRecord>,
    pub failures: Vec<JobFailure>,
}

impl RankingReport {
    pub fn total_rows(&self) -> usize {
        self.jobs.iter().map(|job| job.rows.len()).sum()
    }
}

/// Assemble a ranked list into output rows: round the match score, attach
/// the bucket tier and a rationale naming the component scores.
pub fn assemble(
    ranked: &RankedList,
    thresholds: &BucketThresholds,
    precision: usize,
) -> Vec<RankedRow> {
    ranked
        .results
        .iter()
        .map(|result| {
            let match_score = round_to(result.match_score, precision);
            let c = &result.components;
            RankedRow {
                candidate_id: result.candidate_id.clone(),
                jd_id: result.jd_id.clone(),
                match_score,
                bucket: Bucket::from_score(match_score, thresholds),
                rationale: format!(
                    "semantic {:.p$}, skill overlap {:.p$}, experience fit {:.p$}",
                    c.semantic,
                    c.skill_overlap,
                    c.experience_fit,
                    p = precision
                ),
            }
        })
        .collect()
}

fn round_to(value: f32, precision: usize) -> f32 {
    let factor = 10f32.powi(precision as i32);
    (value * factor).round() / factor
}
