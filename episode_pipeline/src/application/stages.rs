// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The Stage Module Shape (§4.2): one [`StageModule`] trait implemented
//! once per producing stage, plus the shared [`PipelineContext`] every
//! stage and service depends on. The uniform 10-step contract lives in
//! [`crate::application::services::pipeline_executor`]; each module here
//! supplies only step 5 (the stage-specific work) and its declared
//! input/output paths.

pub mod adapt;
pub mod chapterize;
pub mod correct;
pub mod download;
pub mod imagegen;
pub mod publish;
pub mod render;
pub mod transcribe;
pub mod translate;
pub mod tts;

use crate::application::clock::SharedClock;
use crate::application::services::cascade::CascadeEngine;
use crate::application::services::prompt_registry::PromptRegistry;
use crate::infrastructure::config::PipelineSettings;
use crate::infrastructure::filesystem::layout::EpisodeLayout;
use episode_pipeline_domain::ports::{ImageGenPort, LlmPort, MediaPort, PublishPort, TtsPort};
use episode_pipeline_domain::repositories::{
    ContentArtifactRepository, EpisodeRepository, MediaAssetRepository, PipelineRunRepository, PromptVersionRepository,
    ReviewDecisionRepository, ReviewTaskRepository,
};
use episode_pipeline_domain::value_objects::{ArtifactType, ContentHash, Stage};
use episode_pipeline_domain::PipelineError;
use std::path::PathBuf;
use std::sync::Arc;

/// Everything a stage module or application service needs: the settings
/// snapshot, the store ports, and the driver ports (§5 "process-wide state
/// is limited to the settings snapshot and the store handle").
#[derive(Clone)]
pub struct PipelineContext {
    pub settings: Arc<PipelineSettings>,
    pub clock: SharedClock,
    pub cascade: Arc<CascadeEngine>,
    pub prompt_registry: Arc<PromptRegistry>,
    pub episode_repo: Arc<dyn EpisodeRepository>,
    pub run_repo: Arc<dyn PipelineRunRepository>,
    pub artifact_repo: Arc<dyn ContentArtifactRepository>,
    pub prompt_repo: Arc<dyn PromptVersionRepository>,
    pub review_task_repo: Arc<dyn ReviewTaskRepository>,
    pub review_decision_repo: Arc<dyn ReviewDecisionRepository>,
    pub media_repo: Arc<dyn MediaAssetRepository>,
    pub llm: Arc<dyn LlmPort>,
    pub imagegen: Arc<dyn ImageGenPort>,
    pub tts: Arc<dyn TtsPort>,
    pub media: Arc<dyn MediaPort>,
    pub publish: Arc<dyn PublishPort>,
}

impl PipelineContext {
    pub fn layout(&self, episode_id: &str) -> EpisodeLayout {
        EpisodeLayout::new(self.settings.data_dir.clone(), episode_id.to_string())
    }
}

/// What a stage module's work step produced, enough for the executor to
/// complete steps 6-9 of the shape generically.
pub struct StageWork {
    pub input_tokens: Option<u32>,
    pub output_tokens: Option<u32>,
    pub cost_usd: f64,
    pub artifact_type: ArtifactType,
    pub primary_output: PathBuf,
    /// Hash of the active prompt body, if this stage used one (§4.2 step
    /// 2). `None` for non-LLM stages (download, imagegen, tts, render,
    /// publish use their own provenance-relevant identifiers instead).
    pub prompt_hash: Option<ContentHash>,
    pub prompt_name: Option<String>,
    pub model: Option<String>,
    pub detail: String,
    /// Set by `publish` only; the executor applies these to the episode
    /// row alongside the status advance.
    pub youtube_video_id: Option<String>,
    pub published_at_youtube: Option<chrono::DateTime<chrono::Utc>>,
}

impl StageWork {
    pub fn new(artifact_type: ArtifactType, primary_output: PathBuf, detail: impl Into<String>) -> Self {
        Self {
            input_tokens: None,
            output_tokens: None,
            cost_usd: 0.0,
            artifact_type,
            primary_output,
            prompt_hash: None,
            prompt_name: None,
            model: None,
            detail: detail.into(),
            youtube_video_id: None,
            published_at_youtube: None,
        }
    }
}

/// One stage's implementation of the shape in §4.2. The executor owns
/// preconditions, idempotency, cost guard, run bookkeeping, cascade, and
/// status advance; each module supplies only what is stage-specific.
#[async_trait::async_trait]
pub trait StageModule: Send + Sync {
    fn stage(&self) -> Stage;

    /// Declared inputs (§4.3 "input content hash"): drives both cost-guard
    /// placement and idempotency hashing.
    fn declared_inputs(&self, ctx: &PipelineContext, episode_id: &str) -> Vec<PathBuf>;

    /// Declared outputs (§4.2 step 2): all must exist, with no `.stale`
    /// sibling, for a re-entry to be considered current.
    fn declared_outputs(&self, ctx: &PipelineContext, episode_id: &str) -> Vec<PathBuf>;

    /// A conservative cost estimate used by the pre-flight cost guard
    /// (§4.2 step 3), independent of the actual counters the work step
    /// returns.
    fn conservative_cost_estimate(&self) -> f64 {
        0.0
    }

    /// The default prompt's name (§4.6), for stages whose currentness
    /// depends on the active prompt version. `None` for stages with no
    /// prompt (download, transcribe, imagegen, tts, render, publish).
    fn prompt_name(&self) -> Option<&'static str> {
        None
    }

    /// Step 5: call driver ports, write outputs atomically. `feedback` is
    /// the latest `CHANGES_REQUESTED` note for this stage, if any (§4.5
    /// "Feedback channel"). `force` mirrors the stage-level currentness
    /// bypass (§4.3 "Force bypasses all currentness checks"); chapter-
    /// parallel stages (imagegen, tts, render) must also ignore their own
    /// per-chapter manifest reuse check when it is set.
    async fn work(
        &self,
        ctx: &PipelineContext,
        episode_id: &str,
        feedback: Option<&str>,
        force: bool,
    ) -> Result<StageWork, PipelineError>;
}

/// Every producing stage's module, in no particular order — the executor
/// keys them by [`StageModule::stage`] itself. The single place that knows
/// about all ten concrete stage types, so wiring code only depends on this.
pub fn all_stage_modules() -> Vec<Arc<dyn StageModule>> {
    vec![
        Arc::new(download::DownloadStage),
        Arc::new(transcribe::TranscribeStage),
        Arc::new(correct::CorrectStage),
        Arc::new(translate::TranslateStage),
        Arc::new(adapt::AdaptStage),
        Arc::new(chapterize::ChapterizeStage),
        Arc::new(imagegen::ImagegenStage),
        Arc::new(tts::TtsStage),
        Arc::new(render::RenderStage),
        Arc::new(publish::PublishStage),
    ]
}

/// Writes `contents` to `path` via a temp-then-rename so a crash never
/// leaves a half-written output visible (§5 "write the artifact first...
/// implement by writing outputs atomically").
pub async fn write_atomic(path: &std::path::Path, contents: &[u8]) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let tmp = path.with_extension(format!(
        "{}.tmp",
        path.extension().and_then(|e| e.to_str()).unwrap_or("out")
    ));
    tokio::fs::write(&tmp, contents).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}
