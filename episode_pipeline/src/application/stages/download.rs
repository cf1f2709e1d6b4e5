// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `download` (§3.2: `NEW → DOWNLOADED`). Fetching the source episode is
//! explicitly out of scope (§1: "deliberately out of scope... the on-disk
//! directory layout, beyond contracts needed for hashing/stale markers");
//! there is no dedicated driver port for it, so this module writes a
//! placeholder source file keyed by the episode id. A real deployment
//! would plug a fetch port here the same way `render` plugs in
//! [`episode_pipeline_domain::ports::MediaPort`].

use crate::application::stages::{write_atomic, PipelineContext, StageModule, StageWork};
use episode_pipeline_domain::value_objects::{ArtifactType, Stage};
use episode_pipeline_domain::PipelineError;
use std::path::PathBuf;

pub struct DownloadStage;

#[async_trait::async_trait]
impl StageModule for DownloadStage {
    fn stage(&self) -> Stage {
        Stage::Download
    }

    fn declared_inputs(&self, _ctx: &PipelineContext, _episode_id: &str) -> Vec<PathBuf> {
        Vec::new()
    }

    fn declared_outputs(&self, ctx: &PipelineContext, episode_id: &str) -> Vec<PathBuf> {
        vec![ctx.layout(episode_id).raw_source()]
    }

    async fn work(&self, ctx: &PipelineContext, episode_id: &str, _feedback: Option<&str>, _force: bool) -> Result<StageWork, PipelineError> {
        let output = ctx.layout(episode_id).raw_source();
        write_atomic(&output, format!("source-placeholder:{episode_id}").as_bytes()).await?;
        Ok(StageWork::new(ArtifactType::RawSource, output, "downloaded source episode"))
    }
}
