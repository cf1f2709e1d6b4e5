// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `correct` (§3.2: `TRANSCRIBED → CORRECTED`). Protected by
//! `review_gate_1`. Injects the latest `CHANGES_REQUESTED` feedback for
//! this stage into the prompt's user message when present (§4.5 "Feedback
//! channel").

use crate::application::stages::{write_atomic, PipelineContext, StageModule, StageWork};
use episode_pipeline_domain::value_objects::{ArtifactType, Stage};
use episode_pipeline_domain::PipelineError;
use std::path::PathBuf;

pub const PROMPT_NAME: &str = "correct_transcript";
const FALLBACK_MODEL: &str = "gpt-4o";

pub struct CorrectStage;

#[async_trait::async_trait]
impl StageModule for CorrectStage {
    fn stage(&self) -> Stage {
        Stage::Correct
    }

    fn declared_inputs(&self, ctx: &PipelineContext, episode_id: &str) -> Vec<PathBuf> {
        vec![ctx.layout(episode_id).transcript_clean()]
    }

    fn declared_outputs(&self, ctx: &PipelineContext, episode_id: &str) -> Vec<PathBuf> {
        vec![ctx.layout(episode_id).transcript_corrected()]
    }

    fn conservative_cost_estimate(&self) -> f64 {
        0.20
    }

    fn prompt_name(&self) -> Option<&'static str> {
        Some(PROMPT_NAME)
    }

    async fn work(&self, ctx: &PipelineContext, episode_id: &str, feedback: Option<&str>, _force: bool) -> Result<StageWork, PipelineError> {
        let layout = ctx.layout(episode_id);
        let transcript = tokio::fs::read_to_string(layout.transcript_clean()).await?;

        let default_version = ctx.prompt_registry.get_default(PROMPT_NAME).await?;
        let model = default_version
            .as_ref()
            .and_then(|v| v.model.clone())
            .unwrap_or_else(|| FALLBACK_MODEL.to_string());

        let mut user_message = transcript;
        if let Some(notes) = feedback {
            user_message.push_str("\n\n[reviewer feedback]\n");
            user_message.push_str(notes);
        }

        let response = ctx
            .llm
            .call(
                "Correct German transcription errors without altering meaning.",
                &user_message,
                &model,
                None,
            )
            .await?;

        let output = layout.transcript_corrected();
        write_atomic(&output, response.text.as_bytes()).await?;

        let mut work = StageWork::new(ArtifactType::Correction, output, "corrected transcript");
        work.input_tokens = Some(response.input_tokens);
        work.output_tokens = Some(response.output_tokens);
        work.cost_usd = response.cost_usd;
        work.model = Some(model);
        work.prompt_name = Some(PROMPT_NAME.to_string());
        work.prompt_hash = default_version.map(|v| v.content_hash);
        Ok(work)
    }
}
