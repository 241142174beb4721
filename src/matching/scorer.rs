//! Hybrid scoring
//!
//! Combines the semantic similarity signal with skill overlap and experience
//! fit into one match score per (candidate, job) pair. Pure given the
//! candidate, job, raw semantic score, and configuration.

use crate::config::{Config, WEIGHT_TOLERANCE};
use crate::error::{RankerError, Result};
use crate::matching::normalizer::{Candidate, JobDescription};
use serde::Serialize;
use strsim::jaro_winkler;

/// Component weights. Must be non-negative and sum to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub semantic: f32,
    pub skill: f32,
    pub experience: f32,
}

impl Weights {
    pub fn sum(&self) -> f32 {
        self.semantic + self.skill + self.experience
    }

    pub fn validate(&self) -> Result<()> {
        if self.semantic < 0.0 || self.skill < 0.0 || self.experience < 0.0 {
            return Err(RankerError::Configuration(
                "scoring weights must be non-negative".to_string(),
            ));
        }
        if (self.sum() - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(RankerError::Configuration(format!(
                "scoring weights must sum to 1.0, got {}",
                self.sum()
            )));
        }
        Ok(())
    }
}

/// Native similarity range of the backing index, mapped linearly onto [0,1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreRange {
    pub min: f32,
    pub max: f32,
}

impl ScoreRange {
    pub fn rescale(&self, score: f32) -> f32 {
        ((score - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComponentScores {
    pub semantic: f32,
    pub skill_overlap: f32,
    pub experience_fit: f32,
}

/// One scored (candidate, job) pair. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub candidate_id: String,
    pub jd_id: String,
    pub match_score: f32,
    pub components: ComponentScores,
}

#[derive(Debug, Clone)]
pub struct HybridScorer {
    weights: Weights,
    range: ScoreRange,
    fuzzy_threshold: Option<f32>,
}

impl HybridScorer {
    pub fn new(weights: Weights, range: ScoreRange, fuzzy_threshold: Option<f32>) -> Result<Self> {
        weights.validate()?;
        if range.min >= range.max {
            return Err(RankerError::Configuration(format!(
                "similarity score range is empty: [{}, {}]",
                range.min, range.max
            )));
        }

        Ok(Self {
            weights,
            range,
            fuzzy_threshold,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            Weights {
                semantic: config.scoring.semantic_weight,
                skill: config.scoring.skill_weight,
                experience: config.scoring.experience_weight,
            },
            ScoreRange {
                min: config.index.score_min,
                max: config.index.score_max,
            },
            config.scoring.fuzzy_skill_threshold,
        )
    }

    /// Score one candidate against one job given the raw semantic score from
    /// the index.
    pub fn score(
        &self,
        candidate: &Candidate,
        job: &JobDescription,
        semantic_score: f32,
    ) -> MatchResult {
        let components = ComponentScores {
            semantic: self.range.rescale(semantic_score),
            skill_overlap: self.skill_overlap(candidate, job),
            experience_fit: Self::experience_fit(
                candidate.experience_years,
                job.required_experience,
            ),
        };

        let match_score = (self.weights.semantic * components.semantic
            + self.weights.skill * components.skill_overlap
            + self.weights.experience * components.experience_fit)
            .clamp(0.0, 1.0);

        MatchResult {
            candidate_id: candidate.id.clone(),
            jd_id: job.id.clone(),
            match_score,
            components,
        }
    }

    /// Fraction of required skills the candidate covers. An empty requirement
    /// imposes no penalty.
    fn skill_overlap(&self, candidate: &Candidate, job: &JobDescription) -> f32 {
        if job.required_skills.is_empty() {
            return 1.0;
        }

        let covered = job
            .required_skills
            .iter()
            .filter(|required| self.covers(candidate, required))
            .count();

        covered as f32 / job.required_skills.len() as f32
    }

    fn covers(&self, candidate: &Candidate, required: &str) -> bool {
        if candidate.skills.contains(required) {
            return true;
        }

        match self.fuzzy_threshold {
            Some(threshold) => candidate
                .skills
                .iter()
                .any(|skill| jaro_winkler(skill, required) as f32 >= threshold),
            None => false,
        }
    }

    fn experience_fit(candidate_years: f32, required_years: f32) -> f32 {
        if required_years <= 0.0 || candidate_years >= required_years {
            1.0
        } else {
            (candidate_years / required_years).clamp(0.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn skills(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn candidate(id: &str, skill_set: &[&str], years: f32) -> Candidate {
        Candidate {
            id: id.to_string(),
            skills: skills(skill_set),
            experience_years: years,
            text: String::new(),
            embedding: None,
        }
    }

    fn job(id: &str, required: &[&str], years: f32) -> JobDescription {
        JobDescription {
            id: id.to_string(),
            required_skills: skills(required),
            required_experience: years,
            text: String::new(),
            embedding: None,
        }
    }

    fn scorer() -> HybridScorer {
        HybridScorer::new(
            Weights {
                semantic: 0.6,
                skill: 0.25,
                experience: 0.15,
            },
            ScoreRange { min: 0.0, max: 1.0 },
            None,
        )
        .unwrap()
    }

    #[test]
    fn worked_example_matches_hand_computation() {
        let result = scorer().score(
            &candidate("c1", &["python", "sql"], 3.0),
            &job("j1", &["python", "sql", "aws"], 2.0),
            0.9,
        );

        assert!((result.components.skill_overlap - 2.0 / 3.0).abs() < 1e-6);
        assert_eq!(result.components.experience_fit, 1.0);
        // 0.6*0.9 + 0.25*(2/3) + 0.15*1.0
        assert!((result.match_score - 0.856_666_7).abs() < 1e-4);
    }

    #[test]
    fn empty_required_skills_impose_no_penalty() {
        let result = scorer().score(&candidate("c1", &[], 0.0), &job("j1", &[], 5.0), 0.0);
        assert_eq!(result.components.skill_overlap, 1.0);
    }

    #[test]
    fn zero_required_experience_is_always_fit() {
        let result = scorer().score(&candidate("c1", &[], 0.0), &job("j1", &[], 0.0), 0.0);
        assert_eq!(result.components.experience_fit, 1.0);
    }

    #[test]
    fn partial_experience_is_proportional() {
        let result = scorer().score(&candidate("c1", &[], 1.0), &job("j1", &[], 4.0), 0.0);
        assert_eq!(result.components.experience_fit, 0.25);
    }

    #[test]
    fn semantic_score_rescales_from_cosine_range() {
        let scorer = HybridScorer::new(
            Weights {
                semantic: 1.0,
                skill: 0.0,
                experience: 0.0,
            },
            ScoreRange {
                min: -1.0,
                max: 1.0,
            },
            None,
        )
        .unwrap();

        let result = scorer.score(&candidate("c1", &[], 0.0), &job("j1", &[], 0.0), 0.0);
        assert_eq!(result.components.semantic, 0.5);

        let clamped = scorer.score(&candidate("c1", &[], 0.0), &job("j1", &[], 0.0), -2.0);
        assert_eq!(clamped.components.semantic, 0.0);
    }

    #[test]
    fn invalid_weights_are_a_configuration_error() {
        let range = ScoreRange { min: 0.0, max: 1.0 };
        let negative = Weights {
            semantic: -0.1,
            skill: 0.6,
            experience: 0.5,
        };
        assert!(matches!(
            HybridScorer::new(negative, range, None),
            Err(RankerError::Configuration(_))
        ));

        let off_by_a_lot = Weights {
            semantic: 0.5,
            skill: 0.2,
            experience: 0.2,
        };
        assert!(HybridScorer::new(off_by_a_lot, range, None).is_err());
    }

    #[test]
    fn fuzzy_threshold_covers_near_matches() {
        let exact = scorer().score(
            &candidate("c1", &["postgres"], 0.0),
            &job("j1", &["postgresql"], 0.0),
            0.0,
        );
        assert_eq!(exact.components.skill_overlap, 0.0);

        let fuzzy = HybridScorer::new(
            Weights {
                semantic: 0.6,
                skill: 0.25,
                experience: 0.15,
            },
            ScoreRange { min: 0.0, max: 1.0 },
            Some(0.9),
        )
        .unwrap();
        let result = fuzzy.score(
            &candidate("c1", &["postgres"], 0.0),
            &job("j1", &["postgresql"], 0.0),
            0.0,
        );
        assert_eq!(result.components.skill_overlap, 1.0);
    }

    #[test]
    fn match_score_stays_in_unit_interval() {
        let result = scorer().score(
            &candidate("c1", &["python"], 10.0),
            &job("j1", &["python"], 1.0),
            2.0,
        );
        assert!(result.match_score <= 1.0);
        assert!(result.match_score >= 0.0);
    }
}
