// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `MediaAsset` persistence port (§3): durable records of produced audio,
//! image, and video files.

use crate::entities::MediaAsset;
use crate::value_objects::{EpisodeId, MediaAssetType};
use crate::PipelineError;
use async_trait::async_trait;

#[async_trait]
pub trait MediaAssetRepository: Send + Sync {
    async fn insert(&self, asset: &MediaAsset) -> Result<(), PipelineError>;

    async fn list_for_episode(&self, episode_id: &EpisodeId) -> Result<Vec<MediaAsset>, PipelineError>;

    async fn list_for_episode_by_type(
        &self,
        episode_id: &EpisodeId,
        asset_type: MediaAssetType,
    ) -> Result<Vec<MediaAsset>, PipelineError>;
}
