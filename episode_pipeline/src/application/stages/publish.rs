// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `publish` (§3.2: `APPROVED → PUBLISHED`), the terminal stage.

use crate::application::stages::{PipelineContext, StageModule, StageWork};
use episode_pipeline_domain::ports::PrivacyMode;
use episode_pipeline_domain::value_objects::{ArtifactType, Stage};
use episode_pipeline_domain::PipelineError;
use std::path::PathBuf;

pub struct PublishStage;

#[async_trait::async_trait]
impl StageModule for PublishStage {
    fn stage(&self) -> Stage {
        Stage::Publish
    }

    fn declared_inputs(&self, ctx: &PipelineContext, episode_id: &str) -> Vec<PathBuf> {
        vec![ctx.layout(episode_id).render_draft()]
    }

    fn declared_outputs(&self, ctx: &PipelineContext, episode_id: &str) -> Vec<PathBuf> {
        vec![ctx.layout(episode_id).render_draft()]
    }

    async fn work(&self, ctx: &PipelineContext, episode_id: &str, _feedback: Option<&str>, _force: bool) -> Result<StageWork, PipelineError> {
        let layout = ctx.layout(episode_id);
        let draft = layout.render_draft();
        let metadata = serde_json::json!({ "episode_id": episode_id, "title": episode_id });
        let response = ctx.publish.upload(&draft, &metadata, PrivacyMode::Unlisted).await?;

        let mut work = StageWork::new(ArtifactType::Published, draft, format!("published as {}", response.external_id));
        work.youtube_video_id = Some(response.external_id);
        work.published_at_youtube = Some(response.published_at);
        Ok(work)
    }
}
