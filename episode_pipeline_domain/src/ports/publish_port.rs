// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Publish driver port (§6.3). Used by `publish`.

use crate::PipelineError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivacyMode {
    Private,
    Unlisted,
    Public,
}

#[derive(Debug, Clone)]
pub struct PublishResponse {
    pub external_id: String,
    pub published_at: DateTime<Utc>,
}

#[async_trait]
pub trait PublishPort: Send + Sync {
    async fn upload(
        &self,
        video_path: &Path,
        metadata: &Value,
        privacy: PrivacyMode,
    ) -> Result<PublishResponse, PipelineError>;
}
