// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! SQLite-backed [`ContentArtifactRepository`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use episode_pipeline_domain::entities::ContentArtifact;
use episode_pipeline_domain::repositories::ContentArtifactRepository;
use episode_pipeline_domain::value_objects::{ArtifactType, EpisodeId};
use episode_pipeline_domain::PipelineError;
use sqlx::{Row, SqlitePool};

pub struct SqliteContentArtifactRepository {
    pool: SqlitePool,
}

impl SqliteContentArtifactRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<ContentArtifact, PipelineError> {
        let artifact_type: String = row.get("artifact_type");
        let prompt_version_id: Option<String> = row.get("prompt_version_id");
        let created_at: String = row.get("created_at");
        Ok(ContentArtifact {
            id: row.get::<String, _>("id").parse()?,
            episode_id: row.get("episode_id"),
            artifact_type: artifact_type.parse()?,
            file_path: row.get("file_path"),
            prompt_version_id: prompt_version_id.map(|s| s.parse()).transpose()?,
            input_tokens: row.get::<Option<i64>, _>("input_tokens").map(|v| v as u32),
            output_tokens: row.get::<Option<i64>, _>("output_tokens").map(|v| v as u32),
            cost_usd: row.get("cost_usd"),
            prompt_hash: row.get("prompt_hash"),
            created_at: parse_ts(&created_at)?,
        })
    }
}

fn parse_ts(s: &str) -> Result<DateTime<Utc>, PipelineError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| PipelineError::database_error(format!("malformed timestamp {s}: {e}")))
}

#[async_trait]
impl ContentArtifactRepository for SqliteContentArtifactRepository {
    async fn insert(&self, artifact: &ContentArtifact) -> Result<(), PipelineError> {
        sqlx::query(
            "INSERT INTO content_artifacts \
             (id, episode_id, artifact_type, file_path, prompt_version_id, input_tokens, output_tokens, cost_usd, prompt_hash, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(artifact.id.to_string())
        .bind(&artifact.episode_id)
        .bind(artifact.artifact_type.as_str())
        .bind(&artifact.file_path)
        .bind(artifact.prompt_version_id.as_ref().map(|id| id.to_string()))
        .bind(artifact.input_tokens.map(|v| v as i64))
        .bind(artifact.output_tokens.map(|v| v as i64))
        .bind(artifact.cost_usd)
        .bind(&artifact.prompt_hash)
        .bind(artifact.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| PipelineError::database_error(format!("inserting content artifact: {e}")))?;
        Ok(())
    }

    async fn find_latest(
        &self,
        episode_id: &EpisodeId,
        artifact_type: ArtifactType,
    ) -> Result<Option<ContentArtifact>, PipelineError> {
        let row = sqlx::query(
            "SELECT * FROM content_artifacts WHERE episode_id = ? AND artifact_type = ? \
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(episode_id)
        .bind(artifact_type.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PipelineError::database_error(format!("finding latest artifact for episode {episode_id}: {e}")))?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn list_for_episode(&self, episode_id: &EpisodeId) -> Result<Vec<ContentArtifact>, PipelineError> {
        let rows = sqlx::query("SELECT * FROM content_artifacts WHERE episode_id = ? ORDER BY created_at ASC")
            .bind(episode_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PipelineError::database_error(format!("listing artifacts for episode {episode_id}: {e}")))?;
        rows.iter().map(Self::from_row).collect()
    }
}
