// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `PromptVersion` persistence port (§3, §4.6). Versions are append-only;
//! `set_default` is the only update, and must demote the previous default
//! atomically with promoting the new one.

use crate::entities::PromptVersion;
use crate::value_objects::{ContentHash, PromptVersionId};
use crate::PipelineError;
use async_trait::async_trait;

#[async_trait]
pub trait PromptVersionRepository: Send + Sync {
    async fn insert(&self, version: &PromptVersion) -> Result<(), PipelineError>;

    async fn find_by_name_and_hash(
        &self,
        name: &str,
        content_hash: &ContentHash,
    ) -> Result<Option<PromptVersion>, PipelineError>;

    /// Used by `promote_to_default(version_id)` callers, which are given
    /// only a version id and must resolve `name` before calling
    /// `set_default`.
    async fn find_by_id(&self, id: &PromptVersionId) -> Result<Option<PromptVersion>, PipelineError>;

    async fn find_default(&self, name: &str) -> Result<Option<PromptVersion>, PipelineError>;

    /// Highest existing `version` for `name`, or `None` if the name has no
    /// versions yet (§4.6: "version := 1 + max(existing versions for name),
    /// or 1").
    async fn max_version(&self, name: &str) -> Result<Option<u32>, PipelineError>;

    /// Demotes the current default for `name` (if any) and promotes `id`
    /// in a single transaction.
    async fn set_default(&self, name: &str, id: &PromptVersionId) -> Result<(), PipelineError>;

    /// All versions for `name`, newest first.
    async fn history(&self, name: &str) -> Result<Vec<PromptVersion>, PipelineError>;
}
