//! Experiment tracking: per-analysis scalar metrics handed to an audit store.
//!
//! Fire-and-forget from the caller's perspective: `spawn_log_run` detaches the
//! write and only logs failures.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::engine::MatchResult;

#[derive(Debug, Error)]
pub enum TrackingError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// The five scalars recorded per analysis, plus run identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    pub run_id: Uuid,
    pub experiment: String,
    pub recorded_at: DateTime<Utc>,
    pub match_percentage: f64,
    pub similarity_score: f64,
    pub cv_skills_count: usize,
    pub job_skills_count: usize,
    pub matched_skills_count: usize,
}

impl RunMetrics {
    pub fn from_result(experiment: &str, result: &MatchResult) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            experiment: experiment.to_string(),
            recorded_at: Utc::now(),
            match_percentage: result.match_percentage,
            similarity_score: result.similarity_score,
            cv_skills_count: result.cv_skills.len(),
            job_skills_count: result.job_skills.len(),
            matched_skills_count: result.matched_skills.len(),
        }
    }
}

#[async_trait]
pub trait ExperimentTracker: Send + Sync {
    async fn log_run(&self, run: &RunMetrics) -> Result<(), TrackingError>;

    fn name(&self) -> &str;
}

/// Detaches `log_run` onto the runtime; failures are logged, never returned.
pub fn spawn_log_run(tracker: Arc<dyn ExperimentTracker>, run: RunMetrics) {
    tokio::spawn(async move {
        if let Err(e) = tracker.log_run(&run).await {
            warn!(
                tracker = tracker.name(),
                run_id = %run.run_id,
                "Failed to log experiment run: {e}"
            );
        }
    });
}

// ────────────────────────────────────────────────────────────────────────────
// LogTracker: structured-log sink (default)
// ────────────────────────────────────────────────────────────────────────────

pub struct LogTracker;

#[async_trait]
impl ExperimentTracker for LogTracker {
    async fn log_run(&self, run: &RunMetrics) -> Result<(), TrackingError> {
        info!(
            experiment = %run.experiment,
            run_id = %run.run_id,
            match_percentage = run.match_percentage,
            similarity_score = run.similarity_score,
            cv_skills_count = run.cv_skills_count,
            job_skills_count = run.job_skills_count,
            matched_skills_count = run.matched_skills_count,
            "experiment.run"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// PgTracker: PostgreSQL run history
// ────────────────────────────────────────────────────────────────────────────

const CREATE_RUNS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS match_runs (
    run_id UUID PRIMARY KEY,
    experiment TEXT NOT NULL,
    recorded_at TIMESTAMPTZ NOT NULL,
    match_percentage DOUBLE PRECISION NOT NULL,
    similarity_score DOUBLE PRECISION NOT NULL,
    cv_skills_count INTEGER NOT NULL,
    job_skills_count INTEGER NOT NULL,
    matched_skills_count INTEGER NOT NULL
)"#;

pub struct PgTracker {
    pool: PgPool,
}

impl PgTracker {
    /// Wraps an existing pool and makes sure the runs table exists.
    pub async fn new(pool: PgPool) -> Result<Self, TrackingError> {
        sqlx::query(CREATE_RUNS_TABLE).execute(&pool).await?;
        info!("Experiment tracking table ready");
        Ok(Self { pool })
    }
}

#[async_trait]
impl ExperimentTracker for PgTracker {
    async fn log_run(&self, run: &RunMetrics) -> Result<(), TrackingError> {
        sqlx::query(
            "INSERT INTO match_runs (run_id, experiment, recorded_at, match_percentage, \
             similarity_score, cv_skills_count, job_skills_count, matched_skills_count) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(run.run_id)
        .bind(&run.experiment)
        .bind(run.recorded_at)
        .bind(run.match_percentage)
        .bind(run.similarity_score)
        .bind(count_to_i32(run.cv_skills_count))
        .bind(count_to_i32(run.job_skills_count))
        .bind(count_to_i32(run.matched_skills_count))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "postgres"
    }
}

fn count_to_i32(count: usize) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}
