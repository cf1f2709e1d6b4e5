// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! A produced media file with duration/size metadata (§3 `MediaAsset`).

use crate::value_objects::{EpisodeId, MediaAssetId, MediaAssetType, PromptVersionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAsset {
    pub id: MediaAssetId,
    pub episode_id: EpisodeId,
    pub chapter_id: Option<String>,
    pub asset_type: MediaAssetType,
    pub file_path: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub duration_seconds: Option<f64>,
    pub metadata: serde_json::Value,
    pub prompt_version_id: Option<PromptVersionId>,
    pub created_at: DateTime<Utc>,
}

#[allow(clippy::too_many_arguments)]
impl MediaAsset {
    pub fn new(
        episode_id: EpisodeId,
        chapter_id: Option<String>,
        asset_type: MediaAssetType,
        file_path: impl Into<String>,
        mime_type: impl Into<String>,
        size_bytes: u64,
        duration_seconds: Option<f64>,
        metadata: serde_json::Value,
        prompt_version_id: Option<PromptVersionId>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: MediaAssetId::new(),
            episode_id,
            chapter_id,
            asset_type,
            file_path: file_path.into(),
            mime_type: mime_type.into(),
            size_bytes,
            duration_seconds,
            metadata,
            prompt_version_id,
            created_at: now,
        }
    }
}
