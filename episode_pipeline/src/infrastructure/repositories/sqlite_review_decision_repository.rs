// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! SQLite-backed [`ReviewDecisionRepository`]: append-only, no updates.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use episode_pipeline_domain::entities::ReviewDecision;
use episode_pipeline_domain::repositories::ReviewDecisionRepository;
use episode_pipeline_domain::value_objects::ReviewTaskId;
use episode_pipeline_domain::PipelineError;
use sqlx::{Row, SqlitePool};

pub struct SqliteReviewDecisionRepository {
    pool: SqlitePool,
}

impl SqliteReviewDecisionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<ReviewDecision, PipelineError> {
        let decision: String = row.get("decision");
        let decided_at: String = row.get("decided_at");
        Ok(ReviewDecision {
            id: row.get::<String, _>("id").parse()?,
            review_task_id: row.get::<String, _>("review_task_id").parse()?,
            decision: decision.parse()?,
            notes: row.get("notes"),
            decided_at: parse_ts(&decided_at)?,
        })
    }
}

fn parse_ts(s: &str) -> Result<DateTime<Utc>, PipelineError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| PipelineError::database_error(format!("malformed timestamp {s}: {e}")))
}

#[async_trait]
impl ReviewDecisionRepository for SqliteReviewDecisionRepository {
    async fn insert(&self, decision: &ReviewDecision) -> Result<(), PipelineError> {
        sqlx::query(
            "INSERT INTO review_decisions (id, review_task_id, decision, notes, decided_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(decision.id.to_string())
        .bind(decision.review_task_id.to_string())
        .bind(decision.decision.as_str())
        .bind(&decision.notes)
        .bind(decision.decided_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| PipelineError::database_error(format!("inserting review decision: {e}")))?;
        Ok(())
    }

    async fn list_for_task(&self, review_task_id: &ReviewTaskId) -> Result<Vec<ReviewDecision>, PipelineError> {
        let rows = sqlx::query("SELECT * FROM review_decisions WHERE review_task_id = ? ORDER BY decided_at ASC")
            .bind(review_task_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PipelineError::database_error(format!("listing decisions for task {review_task_id}: {e}")))?;
        rows.iter().map(Self::from_row).collect()
    }
}
