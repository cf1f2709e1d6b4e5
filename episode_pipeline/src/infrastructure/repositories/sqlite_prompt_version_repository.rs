// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! SQLite-backed [`PromptVersionRepository`]. `set_default` runs its
//! demote-then-promote pair inside a transaction so a crash between the two
//! statements can never leave a name with zero or two defaults.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use episode_pipeline_domain::entities::PromptVersion;
use episode_pipeline_domain::repositories::PromptVersionRepository;
use episode_pipeline_domain::value_objects::{ContentHash, PromptVersionId};
use episode_pipeline_domain::PipelineError;
use sqlx::{Row, SqlitePool};

pub struct SqlitePromptVersionRepository {
    pool: SqlitePool,
}

impl SqlitePromptVersionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<PromptVersion, PipelineError> {
        let content_hash: String = row.get("content_hash");
        let model_params: Option<String> = row.get("model_params");
        let created_at: String = row.get("created_at");
        Ok(PromptVersion {
            id: row.get::<String, _>("id").parse()?,
            name: row.get("name"),
            version: row.get::<i64, _>("version") as u32,
            content_hash: ContentHash::from_hex(&content_hash)?,
            template_path: row.get("template_path"),
            model: row.get("model"),
            model_params: model_params
                .map(|s| serde_json::from_str(&s))
                .transpose()
                .map_err(|e| PipelineError::database_error(format!("malformed model_params json: {e}")))?,
            is_default: row.get::<i64, _>("is_default") != 0,
            created_at: parse_ts(&created_at)?,
            notes: row.get("notes"),
        })
    }
}

fn parse_ts(s: &str) -> Result<DateTime<Utc>, PipelineError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| PipelineError::database_error(format!("malformed timestamp {s}: {e}")))
}

#[async_trait]
impl PromptVersionRepository for SqlitePromptVersionRepository {
    async fn insert(&self, version: &PromptVersion) -> Result<(), PipelineError> {
        let model_params = version
            .model_params
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| PipelineError::database_error(format!("serializing model_params: {e}")))?;
        sqlx::query(
            "INSERT INTO prompt_versions \
             (id, name, version, content_hash, template_path, model, model_params, is_default, created_at, notes) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(version.id.to_string())
        .bind(&version.name)
        .bind(version.version as i64)
        .bind(version.content_hash.to_hex())
        .bind(&version.template_path)
        .bind(&version.model)
        .bind(model_params)
        .bind(version.is_default as i64)
        .bind(version.created_at.to_rfc3339())
        .bind(&version.notes)
        .execute(&self.pool)
        .await
        .map_err(|e| PipelineError::database_error(format!("inserting prompt version: {e}")))?;
        Ok(())
    }

    async fn find_by_name_and_hash(
        &self,
        name: &str,
        content_hash: &ContentHash,
    ) -> Result<Option<PromptVersion>, PipelineError> {
        let row = sqlx::query("SELECT * FROM prompt_versions WHERE name = ? AND content_hash = ?")
            .bind(name)
            .bind(content_hash.to_hex())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PipelineError::database_error(format!("finding prompt version by hash for {name}: {e}")))?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn find_by_id(&self, id: &PromptVersionId) -> Result<Option<PromptVersion>, PipelineError> {
        let row = sqlx::query("SELECT * FROM prompt_versions WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PipelineError::database_error(format!("finding prompt version {id}: {e}")))?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn find_default(&self, name: &str) -> Result<Option<PromptVersion>, PipelineError> {
        let row = sqlx::query("SELECT * FROM prompt_versions WHERE name = ? AND is_default = 1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PipelineError::database_error(format!("finding default prompt version for {name}: {e}")))?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn max_version(&self, name: &str) -> Result<Option<u32>, PipelineError> {
        let row = sqlx::query("SELECT MAX(version) AS max_version FROM prompt_versions WHERE name = ?")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| PipelineError::database_error(format!("finding max version for {name}: {e}")))?;
        Ok(row.get::<Option<i64>, _>("max_version").map(|v| v as u32))
    }

    async fn set_default(&self, name: &str, id: &PromptVersionId) -> Result<(), PipelineError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| PipelineError::database_error(format!("starting set_default transaction: {e}")))?;
        sqlx::query("UPDATE prompt_versions SET is_default = 0 WHERE name = ? AND is_default = 1")
            .bind(name)
            .execute(&mut *tx)
            .await
            .map_err(|e| PipelineError::database_error(format!("demoting default for {name}: {e}")))?;
        sqlx::query("UPDATE prompt_versions SET is_default = 1 WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| PipelineError::database_error(format!("promoting prompt version {id}: {e}")))?;
        tx.commit()
            .await
            .map_err(|e| PipelineError::database_error(format!("committing set_default transaction: {e}")))?;
        Ok(())
    }

    async fn history(&self, name: &str) -> Result<Vec<PromptVersion>, PipelineError> {
        let rows = sqlx::query("SELECT * FROM prompt_versions WHERE name = ? ORDER BY version DESC")
            .bind(name)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PipelineError::database_error(format!("listing history for {name}: {e}")))?;
        rows.iter().map(Self::from_row).collect()
    }
}
