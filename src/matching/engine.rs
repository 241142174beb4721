//! Ranking pipeline
//!
//! Drives one full ranking run: normalizes the input batch, loads vectors
//! into the index, then ranks every job concurrently. Jobs are independent;
//! each runs as its own task behind a semaphore sized from configuration,
//! and a failed similarity query is reported for that job alone.

use crate::config::Config;
use crate::error::{RankerError, Result};
use crate::index::{Embedder, VectorIndex};
use crate::input::records::{CandidateRecord, JobRecord};
use crate::matching::normalizer::{self, Candidate, JobDescription};
use crate::matching::ranker;
use crate::matching::scorer::{HybridScorer, MatchResult};
use crate::output::report::{self, JobFailure, JobRanking, RankingReport, SkippedRecord};
use chrono::Utc;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Hits requested per query beyond the final cut, so attribute scores can
/// promote candidates the semantic ordering alone would have dropped.
const QUERY_OVERSAMPLE: usize = 4;

/// The full scoring and ranking pipeline over pluggable index and embedder
/// backends.
pub struct Pipeline<I, E> {
    index: Arc<I>,
    embedder: Arc<E>,
    scorer: HybridScorer,
    config: Config,
}

impl<I, E> Pipeline<I, E>
where
    I: VectorIndex,
    E: Embedder + 'static,
{
    /// Validates configuration up front; bad weights abort before any
    /// scoring happens.
    pub fn new(config: Config, index: I, embedder: E) -> Result<Self> {
        config.validate()?;
        let scorer = HybridScorer::from_config(&config)?;
        Ok(Self {
            index: Arc::new(index),
            embedder: Arc::new(embedder),
            scorer,
            config,
        })
    }

    /// Rank every job against the candidate pool. Returns partial results:
    /// invalid records land in `skipped`, jobs whose query failed land in
    /// `failures`, and everything else ranks normally.
    pub async fn run(
        &self,
        candidates: &[CandidateRecord],
        jobs: &[JobRecord],
    ) -> Result<RankingReport> {
        let started = Instant::now();
        let mut skipped = Vec::new();

        let pool = self.load_candidates(candidates, &mut skipped).await?;
        let jobs = self.load_jobs(jobs, &mut skipped).await?;
        info!(
            "Ranking {} jobs against {} candidates",
            jobs.len(),
            pool.len()
        );

        let pool = Arc::new(pool);
        let semaphore = Arc::new(Semaphore::new(self.config.ranking.max_concurrent_jobs));
        let mut tasks = JoinSet::new();
        for (position, job) in jobs.into_iter().enumerate() {
            let index = Arc::clone(&self.index);
            let embedder = Arc::clone(&self.embedder);
            let pool = Arc::clone(&pool);
            let semaphore = Arc::clone(&semaphore);
            let scorer = self.scorer.clone();
            let config = self.config.clone();

            tasks.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return (
                            position,
                            Err(JobFailure {
                                jd_id: job.id.clone(),
                                reason: "ranking pipeline shut down".to_string(),
                            }),
                        )
                    }
                };
                (
                    position,
                    rank_job(job, index, embedder, pool, scorer, config).await,
                )
            });
        }

        let mut rankings = Vec::new();
        let mut failures = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((position, Ok(ranking))) => rankings.push((position, ranking)),
                Ok((position, Err(failure))) => {
                    warn!("Job {} failed: {}", failure.jd_id, failure.reason);
                    failures.push((position, failure));
                }
                Err(e) => {
                    return Err(RankerError::Processing(format!(
                        "ranking task aborted: {}",
                        e
                    )))
                }
            }
        }

        // Tasks finish in arbitrary order; restore input order.
        rankings.sort_by_key(|(position, _)| *position);
        failures.sort_by_key(|(position, _)| *position);

        Ok(RankingReport {
            generated_at: Utc::now(),
            elapsed_ms: started.elapsed().as_millis() as u64,
            jobs: rankings.into_iter().map(|(_, ranking)| ranking).collect(),
            skipped,
            failures: failures.into_iter().map(|(_, failure)| failure).collect(),
        })
    }

    /// Normalize candidate records and upsert their vectors. Invalid or
    /// duplicate records are skipped, not fatal; an unreachable index is,
    /// since nothing could rank without the pool.
    async fn load_candidates(
        &self,
        records: &[CandidateRecord],
        skipped: &mut Vec<SkippedRecord>,
    ) -> Result<HashMap<String, Candidate>> {
        let namespace = &self.config.index.candidate_namespace;
        let mut pool = HashMap::with_capacity(records.len());

        for record in records {
            let candidate = match normalizer::normalize_candidate(record) {
                Ok(candidate) => candidate,
                Err(e) => {
                    warn!("Skipping candidate record: {}", e);
                    skipped.push(SkippedRecord {
                        id: record_label(&record.id),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            if pool.contains_key(&candidate.id) {
                skipped.push(SkippedRecord {
                    id: candidate.id.clone(),
                    reason: "duplicate candidate id".to_string(),
                });
                continue;
            }

            let vector = candidate
                .embedding
                .clone()
                .unwrap_or_else(|| self.embedder.embed(&candidate.text));
            self.index.upsert(namespace, &candidate.id, vector).await?;
            pool.insert(candidate.id.clone(), candidate);
        }

        debug!("Candidate pool loaded: {} vectors", pool.len());
        Ok(pool)
    }

    async fn load_jobs(
        &self,
        records: &[JobRecord],
        skipped: &mut Vec<SkippedRecord>,
    ) -> Result<Vec<JobDescription>> {
        let namespace = &self.config.index.jd_namespace;
        let mut jobs: Vec<JobDescription> = Vec::with_capacity(records.len());

        for record in records {
            let job = match normalizer::normalize_job(record) {
                Ok(job) => job,
                Err(e) => {
                    warn!("Skipping job record: {}", e);
                    skipped.push(SkippedRecord {
                        id: record_label(&record.id),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            if jobs.iter().any(|existing| existing.id == job.id) {
                skipped.push(SkippedRecord {
                    id: job.id.clone(),
                    reason: "duplicate job id".to_string(),
                });
                continue;
            }

            let vector = job
                .embedding
                .clone()
                .unwrap_or_else(|| self.embedder.embed(&job.text));
            self.index.upsert(namespace, &job.id, vector).await?;
            jobs.push(job);
        }

        Ok(jobs)
    }
}

/// Rank a single job: fetch its vector back from the index, query the
/// candidate namespace, score the hits, rank, assemble. All state is local
/// to the call, so abandoning the task leaves nothing behind.
async fn rank_job<I: VectorIndex, E: Embedder>(
    job: JobDescription,
    index: Arc<I>,
    embedder: Arc<E>,
    pool: Arc<HashMap<String, Candidate>>,
    scorer: HybridScorer,
    config: Config,
) -> std::result::Result<JobRanking, JobFailure> {
    let fail = |reason: String| JobFailure {
        jd_id: job.id.clone(),
        reason,
    };

    let vector = match index.fetch(&config.index.jd_namespace, &job.id).await {
        Ok(Some(vector)) => vector,
        Ok(None) => embedder.embed(&job.text),
        Err(e) => return Err(fail(e.to_string())),
    };

    let top_k = config.ranking.top_k;
    let top_n = top_k.saturating_mul(QUERY_OVERSAMPLE);
    let hits = index
        .query(&config.index.candidate_namespace, &vector, top_n)
        .await
        .map_err(|e| fail(e.to_string()))?;
    debug!("Job {}: {} similarity hits", job.id, hits.len());

    // Hits referencing ids outside the current batch are dropped; the index
    // may hold vectors from earlier runs.
    let results: Vec<MatchResult> = hits
        .iter()
        .filter_map(|hit| {
            pool.get(&hit.id)
                .map(|candidate| scorer.score(candidate, &job, hit.score))
        })
        .collect();

    let ranked = ranker::rank(&job.id, &results, top_k);
    let rows = report::assemble(&ranked, &config.ranking.buckets, config.output.precision);
    Ok(JobRanking {
        jd_id: job.id,
        rows,
    })
}

fn record_label(id: &str) -> String {
    let id = id.trim();
    if id.is_empty() {
        "<missing id>".to_string()
    } else {
        id.to_string()
    }
}
