// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! SQLite-backed [`EpisodeRepository`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use episode_pipeline_domain::entities::Episode;
use episode_pipeline_domain::repositories::EpisodeRepository;
use episode_pipeline_domain::value_objects::{EpisodeId, EpisodeStatus};
use episode_pipeline_domain::PipelineError;
use sqlx::{Row, SqlitePool};

pub struct SqliteEpisodeRepository {
    pool: SqlitePool,
}

impl SqliteEpisodeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Episode, PipelineError> {
        let status: String = row.get("status");
        let status: EpisodeStatus = status.parse()?;
        let published_at_youtube: Option<String> = row.get("published_at_youtube");
        let created_at: String = row.get("created_at");
        let updated_at: String = row.get("updated_at");
        Ok(Episode::from_parts(
            row.get("id"),
            status,
            row.get::<i64, _>("pipeline_version") as u8,
            row.get("error_message"),
            row.get("youtube_video_id"),
            published_at_youtube.map(|s| parse_ts(&s)).transpose()?,
            row.get("review_status"),
            parse_ts(&created_at)?,
            parse_ts(&updated_at)?,
        ))
    }
}

fn parse_ts(s: &str) -> Result<DateTime<Utc>, PipelineError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| PipelineError::database_error(format!("malformed timestamp {s}: {e}")))
}

#[async_trait]
impl EpisodeRepository for SqliteEpisodeRepository {
    async fn insert(&self, episode: &Episode) -> Result<(), PipelineError> {
        sqlx::query(
            "INSERT INTO episodes \
             (id, status, pipeline_version, error_message, youtube_video_id, published_at_youtube, review_status, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&episode.id)
        .bind(episode.status().as_str())
        .bind(episode.pipeline_version() as i64)
        .bind(&episode.error_message)
        .bind(&episode.youtube_video_id)
        .bind(episode.published_at_youtube.map(|t| t.to_rfc3339()))
        .bind(&episode.review_status)
        .bind(episode.created_at.to_rfc3339())
        .bind(episode.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| PipelineError::database_error(format!("inserting episode: {e}")))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &EpisodeId) -> Result<Option<Episode>, PipelineError> {
        let row = sqlx::query("SELECT * FROM episodes WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PipelineError::database_error(format!("fetching episode {id}: {e}")))?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn update(&self, episode: &Episode) -> Result<(), PipelineError> {
        sqlx::query(
            "UPDATE episodes SET status = ?, error_message = ?, youtube_video_id = ?, \
             published_at_youtube = ?, review_status = ?, updated_at = ? WHERE id = ?",
        )
        .bind(episode.status().as_str())
        .bind(&episode.error_message)
        .bind(&episode.youtube_video_id)
        .bind(episode.published_at_youtube.map(|t| t.to_rfc3339()))
        .bind(&episode.review_status)
        .bind(episode.updated_at.to_rfc3339())
        .bind(&episode.id)
        .execute(&self.pool)
        .await
        .map_err(|e| PipelineError::database_error(format!("updating episode {}: {e}", episode.id)))?;
        Ok(())
    }

    async fn list_actionable(&self) -> Result<Vec<Episode>, PipelineError> {
        let terminal = [
            EpisodeStatus::Published.as_str(),
            EpisodeStatus::Failed.as_str(),
            EpisodeStatus::CostLimit.as_str(),
        ];
        let rows = sqlx::query("SELECT * FROM episodes WHERE status NOT IN (?, ?, ?) ORDER BY updated_at ASC")
            .bind(terminal[0])
            .bind(terminal[1])
            .bind(terminal[2])
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PipelineError::database_error(format!("listing actionable episodes: {e}")))?;
        rows.iter().map(Self::from_row).collect()
    }

    async fn list_latest(&self, limit: usize) -> Result<Vec<Episode>, PipelineError> {
        let terminal = [
            EpisodeStatus::Published.as_str(),
            EpisodeStatus::Failed.as_str(),
            EpisodeStatus::CostLimit.as_str(),
        ];
        let rows = sqlx::query(
            "SELECT * FROM episodes WHERE status NOT IN (?, ?, ?) ORDER BY updated_at DESC LIMIT ?",
        )
        .bind(terminal[0])
        .bind(terminal[1])
        .bind(terminal[2])
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PipelineError::database_error(format!("listing latest episodes: {e}")))?;
        rows.iter().map(Self::from_row).collect()
    }
}
