// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! A persisted, hash-addressed stage output (§3 `ContentArtifact`). Stale
//! artifacts are never deleted; `.stale` sibling files mark them invalid
//! (§4.3).

use crate::value_objects::{ArtifactType, ContentArtifactId, EpisodeId, PromptVersionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentArtifact {
    pub id: ContentArtifactId,
    pub episode_id: EpisodeId,
    pub artifact_type: ArtifactType,
    pub file_path: String,
    pub prompt_version_id: Option<PromptVersionId>,
    pub input_tokens: Option<u32>,
    pub output_tokens: Option<u32>,
    pub cost_usd: f64,
    pub prompt_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[allow(clippy::too_many_arguments)]
impl ContentArtifact {
    pub fn new(
        episode_id: EpisodeId,
        artifact_type: ArtifactType,
        file_path: impl Into<String>,
        prompt_version_id: Option<PromptVersionId>,
        input_tokens: Option<u32>,
        output_tokens: Option<u32>,
        cost_usd: f64,
        prompt_hash: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ContentArtifactId::new(),
            episode_id,
            artifact_type,
            file_path: file_path.into(),
            prompt_version_id,
            input_tokens,
            output_tokens,
            cost_usd,
            prompt_hash,
            created_at: now,
        }
    }
}
