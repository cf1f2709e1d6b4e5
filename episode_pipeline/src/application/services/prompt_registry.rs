// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Prompt Registry (§4.6): loads templates from disk, deduplicates by
//! body-hash, and promotes a default version per prompt name.

use crate::application::clock::SharedClock;
use episode_pipeline_domain::entities::PromptVersion;
use episode_pipeline_domain::repositories::PromptVersionRepository;
use episode_pipeline_domain::services::{DelimitedFrontmatterParser, PromptFrontmatter, PromptTemplateService};
use episode_pipeline_domain::value_objects::PromptVersionId;
use episode_pipeline_domain::PipelineError;
use std::sync::Arc;

pub struct PromptRegistry {
    repo: Arc<dyn PromptVersionRepository>,
    parser: DelimitedFrontmatterParser,
    clock: SharedClock,
}

impl PromptRegistry {
    pub fn new(repo: Arc<dyn PromptVersionRepository>, clock: SharedClock) -> Self {
        Self { repo, parser: DelimitedFrontmatterParser, clock }
    }

    /// `load_template(path) → (metadata, body)` (§4.6).
    pub async fn load_template(&self, path: &str) -> Result<(Option<PromptFrontmatter>, String), PipelineError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| PipelineError::input_invalid(format!("cannot read prompt template {path}: {e}")))?;
        Ok(self.parser.parse(&raw))
    }

    /// Stable under frontmatter-only changes; strips frontmatter first if
    /// present (idempotent if already stripped).
    pub fn compute_hash(&self, raw_or_body: &str) -> episode_pipeline_domain::value_objects::ContentHash {
        let (_, body) = self.parser.parse(raw_or_body);
        self.parser.compute_hash(&body)
    }

    /// Registers a template version, deduplicating by `(name, body hash)`;
    /// optionally promotes it to default for `name`, atomically demoting
    /// whatever was default before.
    pub async fn register_version(&self, path: &str, set_default: bool) -> Result<PromptVersion, PipelineError> {
        let (frontmatter, body) = self.load_template(path).await?;
        let name = frontmatter
            .as_ref()
            .and_then(|f| f.name.clone())
            .ok_or_else(|| PipelineError::input_invalid(format!("prompt template {path} is missing a name")))?;
        let hash = self.parser.compute_hash(&body);

        if let Some(existing) = self.repo.find_by_name_and_hash(&name, &hash).await? {
            if set_default && !existing.is_default {
                self.promote_to_default(existing.id).await?;
                return self.repo.find_default(&name).await?.map(Ok).unwrap_or_else(|| {
                    Err(PipelineError::internal_error("promoted version vanished"))
                });
            }
            return Ok(existing);
        }

        let next_version = self.repo.max_version(&name).await?.unwrap_or(0) + 1;
        let model = frontmatter.as_ref().and_then(|f| f.model.clone());
        let version = PromptVersion::new(
            name.clone(),
            next_version,
            hash,
            path.to_string(),
            model,
            None,
            set_default,
            self.clock.now_utc(),
        );
        self.repo.insert(&version).await?;
        if set_default {
            self.repo.set_default(&name, &version.id).await?;
        }
        Ok(version)
    }

    pub async fn get_default(&self, name: &str) -> Result<Option<PromptVersion>, PipelineError> {
        self.repo.find_default(name).await
    }

    pub async fn promote_to_default(&self, version_id: PromptVersionId) -> Result<(), PipelineError> {
        let version = self
            .repo
            .find_by_id(&version_id)
            .await?
            .ok_or_else(|| PipelineError::not_found(format!("prompt version {version_id}")))?;
        self.repo.set_default(&version.name, &version_id).await
    }

    pub async fn get_history(&self, name: &str) -> Result<Vec<PromptVersion>, PipelineError> {
        self.repo.history(name).await
    }
}
