// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Common Test Helpers
//!
//! Shared harness for integration tests: an in-memory SQLite pool with
//! migrations applied, every driver wired in dry-run mode, and a fixed
//! clock, so stage runs are deterministic and touch no real network or
//! external process.

use episode_pipeline::application::clock::{FixedClock, SharedClock};
use episode_pipeline::application::services::{CascadeEngine, PipelineExecutor, PromptRegistry, ReviewCoordinator};
use episode_pipeline::application::stages::PipelineContext;
use episode_pipeline::infrastructure::config::PipelineSettings;
use episode_pipeline::infrastructure::drivers::imagegen::OpenAiImageGenDriver;
use episode_pipeline::infrastructure::drivers::llm::OpenAiLlmDriver;
use episode_pipeline::infrastructure::drivers::media::FfmpegMediaDriver;
use episode_pipeline::infrastructure::drivers::publish::YoutubePublishDriver;
use episode_pipeline::infrastructure::drivers::tts::OpenAiTtsDriver;
use episode_pipeline::infrastructure::repositories::{
    schema, SqliteContentArtifactRepository, SqliteEpisodeRepository, SqliteMediaAssetRepository, SqlitePipelineRunRepository,
    SqlitePromptVersionRepository, SqliteReviewDecisionRepository, SqliteReviewTaskRepository,
};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use tempfile::TempDir;

/// Everything a test needs to drive the pipeline against a throwaway
/// database and filesystem tree.
pub struct Harness {
    pub context: Arc<PipelineContext>,
    pub review_coordinator: Arc<ReviewCoordinator>,
    pub executor: Arc<PipelineExecutor>,
    /// Kept alive for the harness's lifetime; dropping it removes the
    /// on-disk data directory.
    pub _data_dir: TempDir,
}

pub fn fixed_now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

/// Builds a fresh harness pinned to [`fixed_now`]: migrated in-memory
/// SQLite, dry-run drivers, and a temp `data_dir`. Each call gets its own
/// isolated database and filesystem tree so tests can run concurrently.
pub async fn build_harness() -> Harness {
    build_harness_with_clock(Arc::new(FixedClock(fixed_now())) as SharedClock).await
}

pub async fn build_harness_with_clock(clock: SharedClock) -> Harness {
    let data_dir = TempDir::new().expect("create temp data dir");

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory sqlite pool");
    schema::ensure_schema(&pool).await.expect("apply migrations");

    let mut settings = PipelineSettings { dry_run: true, ..PipelineSettings::default() };
    settings.data_dir = data_dir.path().to_string_lossy().into_owned();

    let context = Arc::new(PipelineContext {
        settings: Arc::new(settings),
        clock: clock.clone(),
        cascade: Arc::new(CascadeEngine::new(clock.clone())),
        prompt_registry: Arc::new(PromptRegistry::new(Arc::new(SqlitePromptVersionRepository::new(pool.clone())), clock.clone())),
        episode_repo: Arc::new(SqliteEpisodeRepository::new(pool.clone())),
        run_repo: Arc::new(SqlitePipelineRunRepository::new(pool.clone())),
        artifact_repo: Arc::new(SqliteContentArtifactRepository::new(pool.clone())),
        prompt_repo: Arc::new(SqlitePromptVersionRepository::new(pool.clone())),
        review_task_repo: Arc::new(SqliteReviewTaskRepository::new(pool.clone())),
        review_decision_repo: Arc::new(SqliteReviewDecisionRepository::new(pool.clone())),
        media_repo: Arc::new(SqliteMediaAssetRepository::new(pool.clone())),
        llm: Arc::new(OpenAiLlmDriver::new("test-key".to_string(), "http://unused.invalid".to_string(), true)),
        imagegen: Arc::new(OpenAiImageGenDriver::new(
            "test-key".to_string(),
            "http://unused.invalid".to_string(),
            "test-model".to_string(),
            true,
        )),
        tts: Arc::new(OpenAiTtsDriver::new("test-key".to_string(), "http://unused.invalid".to_string(), true)),
        media: Arc::new(FfmpegMediaDriver::new(true)),
        publish: Arc::new(YoutubePublishDriver::new("test-token".to_string(), "http://unused.invalid".to_string(), true)),
    });

    let review_coordinator = Arc::new(ReviewCoordinator::new());
    let executor = Arc::new(PipelineExecutor::new(
        context.clone(),
        review_coordinator.clone(),
        episode_pipeline::application::stages::all_stage_modules(),
    ));

    Harness { context, review_coordinator, executor, _data_dir: data_dir }
}

/// Calculate SHA256 checksum of data, hex-encoded.
pub fn calculate_sha256(data: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_sha256() {
        let data = b"test data";
        let hash = calculate_sha256(data);
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, calculate_sha256(data));
    }

    #[test]
    fn fixed_now_is_stable() {
        assert_eq!(fixed_now(), fixed_now());
    }
}
