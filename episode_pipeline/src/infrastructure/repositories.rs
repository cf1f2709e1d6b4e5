// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! SQLite implementations of the seven domain repository ports (§3), plus
//! schema/migration bootstrapping.

pub mod schema;
pub mod sqlite_content_artifact_repository;
pub mod sqlite_episode_repository;
pub mod sqlite_media_asset_repository;
pub mod sqlite_pipeline_run_repository;
pub mod sqlite_prompt_version_repository;
pub mod sqlite_review_decision_repository;
pub mod sqlite_review_task_repository;

pub use sqlite_content_artifact_repository::SqliteContentArtifactRepository;
pub use sqlite_episode_repository::SqliteEpisodeRepository;
pub use sqlite_media_asset_repository::SqliteMediaAssetRepository;
pub use sqlite_pipeline_run_repository::SqlitePipelineRunRepository;
pub use sqlite_prompt_version_repository::SqlitePromptVersionRepository;
pub use sqlite_review_decision_repository::SqliteReviewDecisionRepository;
pub use sqlite_review_task_repository::SqliteReviewTaskRepository;
