//! Configuration management for the candidate ranker

use crate::error::{RankerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Tolerance when checking that scoring weights sum to 1.0.
pub const WEIGHT_TOLERANCE: f32 = 1e-4;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub ranking: RankingConfig,
    pub index: IndexConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub semantic_weight: f32,
    pub skill_weight: f32,
    pub experience_weight: f32,
    /// Jaro-Winkler threshold above which a candidate skill counts as
    /// covering a required skill. None keeps exact set overlap.
    pub fuzzy_skill_threshold: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    pub top_k: usize,
    pub max_concurrent_jobs: usize,
    pub buckets: BucketThresholds,
}

/// Match-score cutoffs for bucketing ranked candidates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketThresholds {
    pub hired: f32,
    pub shortlist: f32,
    pub rejected: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    pub candidate_namespace: String,
    pub jd_namespace: String,
    /// Native similarity range of the backing index, rescaled into [0,1]
    /// before scoring.
    pub score_min: f32,
    pub score_max: f32,
    pub embedding_dim: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub precision: usize,
    pub color_output: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Csv,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig {
                semantic_weight: 0.6,
                skill_weight: 0.25,
                experience_weight: 0.15,
                fuzzy_skill_threshold: None,
            },
            ranking: RankingConfig {
                top_k: 10,
                max_concurrent_jobs: 4,
                buckets: BucketThresholds {
                    hired: 0.75,
                    shortlist: 0.55,
                    rejected: 0.30,
                },
            },
            index: IndexConfig {
                candidate_namespace: "resumes".to_string(),
                jd_namespace: "jd".to_string(),
                score_min: 0.0,
                score_max: 1.0,
                embedding_dim: 384,
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                precision: 4,
                color_output: true,
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            toml::from_str(&content)
                .map_err(|e| RankerError::Configuration(format!("Failed to parse config: {}", e)))?
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            config
        };
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| RankerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("candidate-ranker")
            .join("config.toml")
    }

    /// Reject configurations that would silently corrupt every score.
    pub fn validate(&self) -> Result<()> {
        let s = &self.scoring;
        if s.semantic_weight < 0.0 || s.skill_weight < 0.0 || s.experience_weight < 0.0 {
            return Err(RankerError::Configuration(
                "scoring weights must be non-negative".to_string(),
            ));
        }
        let sum = s.semantic_weight + s.skill_weight + s.experience_weight;
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(RankerError::Configuration(format!(
                "scoring weights must sum to 1.0, got {}",
                sum
            )));
        }
        if let Some(threshold) = s.fuzzy_skill_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(RankerError::Configuration(format!(
                    "fuzzy_skill_threshold must be within [0, 1], got {}",
                    threshold
                )));
            }
        }

        if self.index.score_min >= self.index.score_max {
            return Err(RankerError::Configuration(format!(
                "index score range is empty: [{}, {}]",
                self.index.score_min, self.index.score_max
            )));
        }
        if self.index.embedding_dim == 0 {
            return Err(RankerError::Configuration(
                "embedding_dim must be positive".to_string(),
            ));
        }
        if self.index.candidate_namespace.trim().is_empty()
            || self.index.jd_namespace.trim().is_empty()
        {
            return Err(RankerError::Configuration(
                "index namespaces must not be empty".to_string(),
            ));
        }

        if self.ranking.max_concurrent_jobs == 0 {
            return Err(RankerError::Configuration(
                "max_concurrent_jobs must be at least 1".to_string(),
            ));
        }
        let b = &self.ranking.buckets;
        if !(b.rejected <= b.shortlist && b.shortlist <= b.hired) {
            return Err(RankerError::Configuration(
                "bucket thresholds must satisfy rejected <= shortlist <= hired".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn negative_weight_is_rejected() {
        let mut config = Config::default();
        config.scoring.semantic_weight = -0.1;
        config.scoring.skill_weight = 0.95;
        assert!(matches!(
            config.validate(),
            Err(RankerError::Configuration(_))
        ));
    }

    #[test]
    fn weights_must_sum_to_one() {
        let mut config = Config::default();
        config.scoring.semantic_weight = 0.5;
        config.scoring.skill_weight = 0.2;
        config.scoring.experience_weight = 0.2;
        assert!(matches!(
            config.validate(),
            Err(RankerError::Configuration(_))
        ));
    }

    #[test]
    fn empty_score_range_is_rejected() {
        let mut config = Config::default();
        config.index.score_min = 1.0;
        config.index.score_max = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn toml_round_trip_preserves_config() {
        let config = Config::default();
        let content = toml::to_string_pretty(&config).unwrap();
        let restored: Config = toml::from_str(&content).unwrap();
        assert_eq!(restored.scoring.semantic_weight, 0.6);
        assert_eq!(restored.ranking.top_k, 10);
        assert_eq!(restored.index.candidate_namespace, "resumes");
    }

    #[test]
    fn load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.ranking.top_k, 10);

        // Second load reads the file it just wrote
        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.output.precision, 4);
    }
}
