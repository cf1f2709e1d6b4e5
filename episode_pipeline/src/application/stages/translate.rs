// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `translate` (§3.2: `CORRECTED → TRANSLATED`), gated into readiness by
//! `review_gate_1` but not itself review-protected.

use crate::application::stages::{write_atomic, PipelineContext, StageModule, StageWork};
use episode_pipeline_domain::value_objects::{ArtifactType, Stage};
use episode_pipeline_domain::PipelineError;
use std::path::PathBuf;

pub const PROMPT_NAME: &str = "translate_transcript";
const FALLBACK_MODEL: &str = "gpt-4o";

pub struct TranslateStage;

#[async_trait::async_trait]
impl StageModule for TranslateStage {
    fn stage(&self) -> Stage {
        Stage::Translate
    }

    fn declared_inputs(&self, ctx: &PipelineContext, episode_id: &str) -> Vec<PathBuf> {
        vec![ctx.layout(episode_id).transcript_corrected()]
    }

    fn declared_outputs(&self, ctx: &PipelineContext, episode_id: &str) -> Vec<PathBuf> {
        vec![ctx.layout(episode_id).transcript_translated()]
    }

    fn conservative_cost_estimate(&self) -> f64 {
        0.30
    }

    fn prompt_name(&self) -> Option<&'static str> {
        Some(PROMPT_NAME)
    }

    async fn work(&self, ctx: &PipelineContext, episode_id: &str, _feedback: Option<&str>, _force: bool) -> Result<StageWork, PipelineError> {
        let layout = ctx.layout(episode_id);
        let corrected = tokio::fs::read_to_string(layout.transcript_corrected()).await?;

        let default_version = ctx.prompt_registry.get_default(PROMPT_NAME).await?;
        let model = default_version
            .as_ref()
            .and_then(|v| v.model.clone())
            .unwrap_or_else(|| FALLBACK_MODEL.to_string());

        let response = ctx
            .llm
            .call(
                "Translate the German transcript into natural Turkish, preserving meaning and tone.",
                &corrected,
                &model,
                None,
            )
            .await?;

        let output = layout.transcript_translated();
        write_atomic(&output, response.text.as_bytes()).await?;

        let mut work = StageWork::new(ArtifactType::Translation, output, "translated transcript to Turkish");
        work.input_tokens = Some(response.input_tokens);
        work.output_tokens = Some(response.output_tokens);
        work.cost_usd = response.cost_usd;
        work.model = Some(model);
        work.prompt_name = Some(PROMPT_NAME.to_string());
        work.prompt_hash = default_version.map(|v| v.content_hash);
        Ok(work)
    }
}
