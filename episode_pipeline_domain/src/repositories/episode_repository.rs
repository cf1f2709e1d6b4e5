// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Episode persistence port. The SQLite implementation lives in the
//! `episode-pipeline` crate's infrastructure layer.

use crate::entities::Episode;
use crate::value_objects::EpisodeId;
use crate::PipelineError;
use async_trait::async_trait;

/// Thread-safe (`Send + Sync`) so it can be shared behind an `Arc` across
/// concurrently-scheduled episodes (§5).
#[async_trait]
pub trait EpisodeRepository: Send + Sync {
    async fn insert(&self, episode: &Episode) -> Result<(), PipelineError>;

    async fn find_by_id(&self, id: &EpisodeId) -> Result<Option<Episode>, PipelineError>;

    /// Persists the full episode row, including `status`, `error_message`,
    /// and the YouTube fields. Implementations should serialize this per
    /// episode (§5: "the store must serialize commits per episode").
    async fn update(&self, episode: &Episode) -> Result<(), PipelineError>;

    /// All episodes at an actionable status (§4.7 "Pending" mode input
    /// before the stage-scoped review filter is applied by the batch
    /// selector).
    async fn list_actionable(&self) -> Result<Vec<Episode>, PipelineError>;

    /// Actionable episodes ordered newest-first by `updated_at`, for the
    /// "Latest" batch mode (§4.7).
    async fn list_latest(&self, limit: usize) -> Result<Vec<Episode>, PipelineError>;
}
