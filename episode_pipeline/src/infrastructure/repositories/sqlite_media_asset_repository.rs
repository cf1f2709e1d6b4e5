// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! SQLite-backed [`MediaAssetRepository`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use episode_pipeline_domain::entities::MediaAsset;
use episode_pipeline_domain::repositories::MediaAssetRepository;
use episode_pipeline_domain::value_objects::{EpisodeId, MediaAssetType};
use episode_pipeline_domain::PipelineError;
use sqlx::{Row, SqlitePool};

pub struct SqliteMediaAssetRepository {
    pool: SqlitePool,
}

impl SqliteMediaAssetRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<MediaAsset, PipelineError> {
        let asset_type: String = row.get("asset_type");
        let metadata: String = row.get("metadata");
        let prompt_version_id: Option<String> = row.get("prompt_version_id");
        let created_at: String = row.get("created_at");
        Ok(MediaAsset {
            id: row.get::<String, _>("id").parse()?,
            episode_id: row.get("episode_id"),
            chapter_id: row.get("chapter_id"),
            asset_type: asset_type.parse()?,
            file_path: row.get("file_path"),
            mime_type: row.get("mime_type"),
            size_bytes: row.get::<i64, _>("size_bytes") as u64,
            duration_seconds: row.get("duration_seconds"),
            metadata: serde_json::from_str(&metadata)
                .map_err(|e| PipelineError::database_error(format!("malformed metadata json: {e}")))?,
            prompt_version_id: prompt_version_id.map(|s| s.parse()).transpose()?,
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
impl MediaAssetRepository for SqliteMediaAssetRepository {
    async fn insert(&self, asset: &MediaAsset) -> Result<(), PipelineError> {
        let metadata = serde_json::to_string(&asset.metadata)
            .map_err(|e| PipelineError::database_error(format!("serializing metadata: {e}")))?;
        sqlx::query(
            "INSERT INTO media_assets \
             (id, episode_id, chapter_id, asset_type, file_path, mime_type, size_bytes, duration_seconds, metadata, prompt_version_id, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(asset.id.to_string())
        .bind(&asset.episode_id)
        .bind(&asset.chapter_id)
        .bind(asset.asset_type.as_str())
        .bind(&asset.file_path)
        .bind(&asset.mime_type)
        .bind(asset.size_bytes as i64)
        .bind(asset.duration_seconds)
        .bind(metadata)
        .bind(asset.prompt_version_id.as_ref().map(|id| id.to_string()))
        .bind(asset.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| PipelineError::database_error(format!("inserting media asset: {e}")))?;
        Ok(())
    }

    async fn list_for_episode(&self, episode_id: &EpisodeId) -> Result<Vec<MediaAsset>, PipelineError> {
        let rows = sqlx::query("SELECT * FROM media_assets WHERE episode_id = ? ORDER BY created_at ASC")
            .bind(episode_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PipelineError::database_error(format!("listing media assets for episode {episode_id}: {e}")))?;
        rows.iter().map(Self::from_row).collect()
    }

    async fn list_for_episode_by_type(
        &self,
        episode_id: &EpisodeId,
        asset_type: MediaAssetType,
    ) -> Result<Vec<MediaAsset>, PipelineError> {
        let rows = sqlx::query(
            "SELECT * FROM media_assets WHERE episode_id = ? AND asset_type = ? ORDER BY created_at ASC",
        )
        .bind(episode_id)
        .bind(asset_type.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            PipelineError::database_error(format!("listing media assets for episode {episode_id} by type: {e}"))
        })?;
        rows.iter().map(Self::from_row).collect()
    }
}
