// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Repository ports (§3): one trait per aggregate/entity, each implemented
//! against SQLite in the `episode-pipeline` crate's infrastructure layer.
//! The domain only ever depends on these traits, never on `sqlx` directly.

pub mod content_artifact_repository;
pub mod episode_repository;
pub mod media_asset_repository;
pub mod pipeline_run_repository;
pub mod prompt_version_repository;
pub mod review_decision_repository;
pub mod review_task_repository;

pub use content_artifact_repository::ContentArtifactRepository;
pub use episode_repository::EpisodeRepository;
pub use media_asset_repository::MediaAssetRepository;
pub use pipeline_run_repository::PipelineRunRepository;
pub use prompt_version_repository::PromptVersionRepository;
pub use review_decision_repository::ReviewDecisionRepository;
pub use review_task_repository::ReviewTaskRepository;
