// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `chapterize` (§3.2: `ADAPTED → CHAPTERIZED`). The only stage where
//! "validation after work" (§7) applies: a schema-invalid chapter document
//! gets one corrective re-prompt before the stage fails; both attempts'
//! costs are recorded regardless of outcome.

use crate::application::stages::{write_atomic, PipelineContext, StageModule, StageWork};
use crate::infrastructure::filesystem::chapters::ChapterDocument;
use episode_pipeline_domain::value_objects::{ArtifactType, Stage};
use episode_pipeline_domain::PipelineError;
use std::path::PathBuf;

pub const PROMPT_NAME: &str = "chapterize_script";
const FALLBACK_MODEL: &str = "gpt-4o";

pub struct ChapterizeStage;

impl ChapterizeStage {
    fn try_parse(episode_id: &str, raw: &str) -> Result<ChapterDocument, String> {
        let document: ChapterDocument = serde_json::from_str(raw).map_err(|e| e.to_string())?;
        if document.episode_id != episode_id {
            return Err(format!("chapter document episode_id mismatch: {}", document.episode_id));
        }
        document.validate().map_err(|e| e.to_string())?;
        Ok(document)
    }
}

#[async_trait::async_trait]
impl StageModule for ChapterizeStage {
    fn stage(&self) -> Stage {
        Stage::Chapterize
    }

    fn declared_inputs(&self, ctx: &PipelineContext, episode_id: &str) -> Vec<PathBuf> {
        vec![ctx.layout(episode_id).script_adapted()]
    }

    fn declared_outputs(&self, ctx: &PipelineContext, episode_id: &str) -> Vec<PathBuf> {
        vec![ctx.layout(episode_id).chapters_json()]
    }

    fn conservative_cost_estimate(&self) -> f64 {
        0.25
    }

    fn prompt_name(&self) -> Option<&'static str> {
        Some(PROMPT_NAME)
    }

    async fn work(&self, ctx: &PipelineContext, episode_id: &str, _feedback: Option<&str>, _force: bool) -> Result<StageWork, PipelineError> {
        let layout = ctx.layout(episode_id);
        let script = tokio::fs::read_to_string(layout.script_adapted()).await?;

        let default_version = ctx.prompt_registry.get_default(PROMPT_NAME).await?;
        let model = default_version
            .as_ref()
            .and_then(|v| v.model.clone())
            .unwrap_or_else(|| FALLBACK_MODEL.to_string());

        let system = "Split the adapted script into chapters as a JSON document matching the chapter schema.";
        let mut total_cost = 0.0;
        let mut total_input_tokens = 0u32;
        let mut total_output_tokens = 0u32;

        let first = ctx.llm.call(system, &script, &model, None).await?;
        total_cost += first.cost_usd;
        total_input_tokens += first.input_tokens;
        total_output_tokens += first.output_tokens;

        let document = match Self::try_parse(episode_id, &first.text) {
            Ok(document) => document,
            Err(first_error) => {
                let retry_prompt = format!(
                    "{script}\n\n[previous attempt was invalid: {first_error}. Return only corrected JSON.]"
                );
                let retry = ctx.llm.call(system, &retry_prompt, &model, None).await?;
                total_cost += retry.cost_usd;
                total_input_tokens += retry.input_tokens;
                total_output_tokens += retry.output_tokens;
                Self::try_parse(episode_id, &retry.text).map_err(|second_error| {
                    PipelineError::input_invalid(format!(
                        "chapter document failed validation twice (both attempts cost ${total_cost:.4}, \
                         {total_input_tokens} input / {total_output_tokens} output tokens): \
                         first={first_error}, second={second_error}"
                    ))
                })?
            }
        };

        let output = layout.chapters_json();
        document.write(&output).await?;

        let mut work = StageWork::new(ArtifactType::Chapters, output, format!("produced {} chapters", document.total_chapters));
        work.input_tokens = Some(total_input_tokens);
        work.output_tokens = Some(total_output_tokens);
        work.cost_usd = total_cost;
        work.model = Some(model);
        work.prompt_name = Some(PROMPT_NAME.to_string());
        work.prompt_hash = default_version.map(|v| v.content_hash);
        Ok(work)
    }
}
