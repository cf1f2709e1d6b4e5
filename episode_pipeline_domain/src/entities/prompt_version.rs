// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! An immutable snapshot of a named prompt template (§3 `PromptVersion`,
//! §4.6 Prompt Registry).

use crate::value_objects::{ContentHash, PromptVersionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptVersion {
    pub id: PromptVersionId,
    pub name: String,
    /// Monotone per `name`, starting at 1.
    pub version: u32,
    pub content_hash: ContentHash,
    pub template_path: String,
    pub model: Option<String>,
    pub model_params: Option<serde_json::Value>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub notes: Option<String>,
}

#[allow(clippy::too_many_arguments)]
impl PromptVersion {
    pub fn new(
        name: impl Into<String>,
        version: u32,
        content_hash: ContentHash,
        template_path: impl Into<String>,
        model: Option<String>,
        model_params: Option<serde_json::Value>,
        is_default: bool,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: PromptVersionId::new(),
            name: name.into(),
            version,
            content_hash,
            template_path: template_path.into(),
            model,
            model_params,
            is_default,
            created_at: now,
            notes: None,
        }
    }
}
