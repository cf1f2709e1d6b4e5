// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! SQLite-backed [`PipelineRunRepository`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use episode_pipeline_domain::entities::PipelineRun;
use episode_pipeline_domain::repositories::PipelineRunRepository;
use episode_pipeline_domain::value_objects::{EpisodeId, PipelineRunStatus};
use episode_pipeline_domain::PipelineError;
use sqlx::{Row, SqlitePool};

pub struct SqlitePipelineRunRepository {
    pool: SqlitePool,
}

impl SqlitePipelineRunRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<PipelineRun, PipelineError> {
        let stage: String = row.get("stage");
        let status: String = row.get("status");
        let started_at: String = row.get("started_at");
        let finished_at: Option<String> = row.get("finished_at");
        Ok(PipelineRun {
            id: row.get::<String, _>("id").parse()?,
            episode_id: row.get("episode_id"),
            stage: stage.parse()?,
            status: status.parse::<PipelineRunStatus>()?,
            started_at: parse_ts(&started_at)?,
            finished_at: finished_at.map(|s| parse_ts(&s)).transpose()?,
            input_tokens: row.get::<Option<i64>, _>("input_tokens").map(|v| v as u32),
            output_tokens: row.get::<Option<i64>, _>("output_tokens").map(|v| v as u32),
            estimated_cost_usd: row.get("estimated_cost_usd"),
            error_message: row.get("error_message"),
        })
    }
}

fn parse_ts(s: &str) -> Result<DateTime<Utc>, PipelineError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| PipelineError::database_error(format!("malformed timestamp {s}: {e}")))
}

#[async_trait]
impl PipelineRunRepository for SqlitePipelineRunRepository {
    async fn insert(&self, run: &PipelineRun) -> Result<(), PipelineError> {
        sqlx::query(
            "INSERT INTO pipeline_runs \
             (id, episode_id, stage, status, started_at, finished_at, input_tokens, output_tokens, estimated_cost_usd, error_message) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(run.id.to_string())
        .bind(&run.episode_id)
        .bind(run.stage.as_str())
        .bind(run.status.as_str())
        .bind(run.started_at.to_rfc3339())
        .bind(run.finished_at.map(|t| t.to_rfc3339()))
        .bind(run.input_tokens.map(|v| v as i64))
        .bind(run.output_tokens.map(|v| v as i64))
        .bind(run.estimated_cost_usd)
        .bind(&run.error_message)
        .execute(&self.pool)
        .await
        .map_err(|e| PipelineError::database_error(format!("inserting pipeline run: {e}")))?;
        Ok(())
    }

    async fn update(&self, run: &PipelineRun) -> Result<(), PipelineError> {
        sqlx::query(
            "UPDATE pipeline_runs SET status = ?, finished_at = ?, input_tokens = ?, \
             output_tokens = ?, estimated_cost_usd = ?, error_message = ? WHERE id = ?",
        )
        .bind(run.status.as_str())
        .bind(run.finished_at.map(|t| t.to_rfc3339()))
        .bind(run.input_tokens.map(|v| v as i64))
        .bind(run.output_tokens.map(|v| v as i64))
        .bind(run.estimated_cost_usd)
        .bind(&run.error_message)
        .bind(run.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| PipelineError::database_error(format!("updating pipeline run {}: {e}", run.id)))?;
        Ok(())
    }

    async fn sum_successful_cost(&self, episode_id: &EpisodeId) -> Result<f64, PipelineError> {
        let row = sqlx::query(
            "SELECT COALESCE(SUM(estimated_cost_usd), 0.0) AS total FROM pipeline_runs \
             WHERE episode_id = ? AND status = ?",
        )
        .bind(episode_id)
        .bind(PipelineRunStatus::Success.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| PipelineError::database_error(format!("summing cost for episode {episode_id}: {e}")))?;
        Ok(row.get("total"))
    }

    async fn list_for_episode(&self, episode_id: &EpisodeId) -> Result<Vec<PipelineRun>, PipelineError> {
        let rows = sqlx::query("SELECT * FROM pipeline_runs WHERE episode_id = ? ORDER BY started_at ASC")
            .bind(episode_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PipelineError::database_error(format!("listing runs for episode {episode_id}: {e}")))?;
        rows.iter().map(Self::from_row).collect()
    }
}
