// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `transcribe` (§3.2: `DOWNLOADED → TRANSCRIBED`). Speech-to-text is
//! modeled as an [`LlmPort`](episode_pipeline_domain::ports::LlmPort) call
//! rather than a dedicated ASR port, since §6.3 only narrows the core's
//! dependency to the five listed driver ports and treats the concrete
//! transcription backend as an opaque collaborator.

use crate::application::stages::{write_atomic, PipelineContext, StageModule, StageWork};
use episode_pipeline_domain::value_objects::{ArtifactType, Stage};
use episode_pipeline_domain::PipelineError;
use std::path::PathBuf;

const MODEL: &str = "whisper-transcribe-v2";

pub struct TranscribeStage;

#[async_trait::async_trait]
impl StageModule for TranscribeStage {
    fn stage(&self) -> Stage {
        Stage::Transcribe
    }

    fn declared_inputs(&self, ctx: &PipelineContext, episode_id: &str) -> Vec<PathBuf> {
        vec![ctx.layout(episode_id).raw_source()]
    }

    fn declared_outputs(&self, ctx: &PipelineContext, episode_id: &str) -> Vec<PathBuf> {
        vec![ctx.layout(episode_id).transcript_clean()]
    }

    fn conservative_cost_estimate(&self) -> f64 {
        0.50
    }

    async fn work(&self, ctx: &PipelineContext, episode_id: &str, _feedback: Option<&str>, _force: bool) -> Result<StageWork, PipelineError> {
        let layout = ctx.layout(episode_id);
        let source = tokio::fs::read(layout.raw_source()).await?;
        let marker = format!("source bytes: {}", source.len());
        let response = ctx
            .llm
            .call(
                "Transcribe the provided German-language audio source to clean text.",
                &marker,
                MODEL,
                None,
            )
            .await?;

        let output = layout.transcript_clean();
        write_atomic(&output, response.text.as_bytes()).await?;

        let mut work = StageWork::new(ArtifactType::Transcript, output, "transcribed source to German text");
        work.input_tokens = Some(response.input_tokens);
        work.output_tokens = Some(response.output_tokens);
        work.cost_usd = response.cost_usd;
        work.model = Some(MODEL.to_string());
        Ok(work)
    }
}
