// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! SQLite-backed [`ReviewTaskRepository`]. `artifact_paths` is stored as a
//! JSON array in a single TEXT column since review tasks never query into
//! individual paths.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use episode_pipeline_domain::entities::ReviewTask;
use episode_pipeline_domain::repositories::ReviewTaskRepository;
use episode_pipeline_domain::value_objects::{EpisodeId, ReviewTaskId, ReviewTaskStatus, Stage};
use episode_pipeline_domain::PipelineError;
use sqlx::{Row, SqlitePool};

pub struct SqliteReviewTaskRepository {
    pool: SqlitePool,
}

impl SqliteReviewTaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<ReviewTask, PipelineError> {
        let stage: String = row.get("stage");
        let status: String = row.get("status");
        let artifact_paths: String = row.get("artifact_paths");
        let prompt_version_id: Option<String> = row.get("prompt_version_id");
        let created_at: String = row.get("created_at");
        let reviewed_at: Option<String> = row.get("reviewed_at");
        Ok(ReviewTask {
            id: row.get::<String, _>("id").parse()?,
            episode_id: row.get("episode_id"),
            stage: stage.parse()?,
            status: status.parse::<ReviewTaskStatus>()?,
            artifact_paths: serde_json::from_str(&artifact_paths)
                .map_err(|e| PipelineError::database_error(format!("malformed artifact_paths json: {e}")))?,
            diff_path: row.get("diff_path"),
            artifact_hash: row.get("artifact_hash"),
            reviewer_notes: row.get("reviewer_notes"),
            prompt_version_id: prompt_version_id.map(|s| s.parse()).transpose()?,
            created_at: parse_ts(&created_at)?,
            reviewed_at: reviewed_at.map(|s| parse_ts(&s)).transpose()?,
        })
    }
}

fn parse_ts(s: &str) -> Result<DateTime<Utc>, PipelineError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| PipelineError::database_error(format!("malformed timestamp {s}: {e}")))
}

#[async_trait]
impl ReviewTaskRepository for SqliteReviewTaskRepository {
    async fn insert(&self, task: &ReviewTask) -> Result<(), PipelineError> {
        let artifact_paths = serde_json::to_string(&task.artifact_paths)
            .map_err(|e| PipelineError::database_error(format!("serializing artifact_paths: {e}")))?;
        sqlx::query(
            "INSERT INTO review_tasks \
             (id, episode_id, stage, status, artifact_paths, diff_path, artifact_hash, reviewer_notes, prompt_version_id, created_at, reviewed_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(task.id.to_string())
        .bind(&task.episode_id)
        .bind(task.stage.as_str())
        .bind(task.status.as_str())
        .bind(artifact_paths)
        .bind(&task.diff_path)
        .bind(&task.artifact_hash)
        .bind(&task.reviewer_notes)
        .bind(task.prompt_version_id.as_ref().map(|id| id.to_string()))
        .bind(task.created_at.to_rfc3339())
        .bind(task.reviewed_at.map(|t| t.to_rfc3339()))
        .execute(&self.pool)
        .await
        .map_err(|e| PipelineError::database_error(format!("inserting review task: {e}")))?;
        Ok(())
    }

    async fn update(&self, task: &ReviewTask) -> Result<(), PipelineError> {
        sqlx::query(
            "UPDATE review_tasks SET status = ?, artifact_hash = ?, reviewer_notes = ?, reviewed_at = ? \
             WHERE id = ?",
        )
        .bind(task.status.as_str())
        .bind(&task.artifact_hash)
        .bind(&task.reviewer_notes)
        .bind(task.reviewed_at.map(|t| t.to_rfc3339()))
        .bind(task.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| PipelineError::database_error(format!("updating review task {}: {e}", task.id)))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &ReviewTaskId) -> Result<Option<ReviewTask>, PipelineError> {
        let row = sqlx::query("SELECT * FROM review_tasks WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PipelineError::database_error(format!("finding review task {id}: {e}")))?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn find_active_for_episode_stage(
        &self,
        episode_id: &EpisodeId,
        stage: Stage,
    ) -> Result<Option<ReviewTask>, PipelineError> {
        let row = sqlx::query(
            "SELECT * FROM review_tasks WHERE episode_id = ? AND stage = ? AND status IN (?, ?) \
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(episode_id)
        .bind(stage.as_str())
        .bind(ReviewTaskStatus::Pending.as_str())
        .bind(ReviewTaskStatus::InReview.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PipelineError::database_error(format!("finding active review task for {episode_id}/{stage}: {e}")))?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn find_latest_changes_requested(
        &self,
        episode_id: &EpisodeId,
        stage: Stage,
    ) -> Result<Option<ReviewTask>, PipelineError> {
        let row = sqlx::query(
            "SELECT * FROM review_tasks WHERE episode_id = ? AND stage = ? AND status = ? \
             ORDER BY reviewed_at DESC LIMIT 1",
        )
        .bind(episode_id)
        .bind(stage.as_str())
        .bind(ReviewTaskStatus::ChangesRequested.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            PipelineError::database_error(format!(
                "finding latest changes-requested task for {episode_id}/{stage}: {e}"
            ))
        })?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn find_approved_for_episode_stage(
        &self,
        episode_id: &EpisodeId,
        stage: Stage,
    ) -> Result<Option<ReviewTask>, PipelineError> {
        let row = sqlx::query(
            "SELECT * FROM review_tasks WHERE episode_id = ? AND stage = ? AND status = ? \
             ORDER BY reviewed_at DESC LIMIT 1",
        )
        .bind(episode_id)
        .bind(stage.as_str())
        .bind(ReviewTaskStatus::Approved.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            PipelineError::database_error(format!("finding approved task for {episode_id}/{stage}: {e}"))
        })?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn list_pending(&self) -> Result<Vec<ReviewTask>, PipelineError> {
        let rows = sqlx::query("SELECT * FROM review_tasks WHERE status = ? ORDER BY created_at ASC")
            .bind(ReviewTaskStatus::Pending.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PipelineError::database_error(format!("listing pending review tasks: {e}")))?;
        rows.iter().map(Self::from_row).collect()
    }
}
