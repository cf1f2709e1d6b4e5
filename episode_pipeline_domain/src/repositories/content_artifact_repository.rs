// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `ContentArtifact` persistence port (§3). One row per successful run;
//! stale artifacts are never deleted, only marked stale on disk (§4.3).

use crate::entities::ContentArtifact;
use crate::value_objects::{ArtifactType, EpisodeId};
use crate::PipelineError;
use async_trait::async_trait;

#[async_trait]
pub trait ContentArtifactRepository: Send + Sync {
    async fn insert(&self, artifact: &ContentArtifact) -> Result<(), PipelineError>;

    async fn find_latest(
        &self,
        episode_id: &EpisodeId,
        artifact_type: ArtifactType,
    ) -> Result<Option<ContentArtifact>, PipelineError>;

    async fn list_for_episode(&self, episode_id: &EpisodeId) -> Result<Vec<ContentArtifact>, PipelineError>;
}
