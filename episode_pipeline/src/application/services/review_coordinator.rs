// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Review Coordinator (§4.5): gate-encounter logic, reviewer decisions, and
//! the feedback channel that downstream re-runs of the producing stage read
//! from.

use crate::application::services::review_diff::{is_auto_approvable_correction, word_diff_entries, ArtifactDiff};
use crate::application::stages::{write_atomic, PipelineContext};
use episode_pipeline_domain::entities::{Episode, ReviewDecision, ReviewTask};
use episode_pipeline_domain::value_objects::{
    gate_revert_status, stage_graph_v2, ContentHash, EpisodeStatus, ReviewDecisionKind, ReviewTaskId, Stage, StageOutcome,
};
use episode_pipeline_domain::PipelineError;
use std::path::PathBuf;

pub struct ReviewCoordinator;

impl Default for ReviewCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewCoordinator {
    pub fn new() -> Self {
        Self
    }

    /// The path a producer stage's output lives at, used to write `.stale`
    /// markers on the stages immediately downstream of a reverted producer
    /// (§4.3 map, §4.5 "request-changes"). Independent of the stage-module
    /// registry the executor owns, since those paths are fixed layout, not
    /// stage-module behavior.
    fn output_path_for(ctx: &PipelineContext, episode_id: &str, stage: Stage) -> Option<PathBuf> {
        let layout = ctx.layout(episode_id);
        match stage {
            Stage::Translate => Some(layout.transcript_translated()),
            Stage::Chapterize => Some(layout.chapters_json()),
            Stage::Imagegen => Some(layout.images_manifest()),
            Stage::Tts => Some(layout.tts_manifest()),
            Stage::Render => Some(layout.render_draft()),
            _ => None,
        }
    }

    /// §4.5 "On encounter". `episode` is advanced to `APPROVED` in place
    /// when `review_gate_3` settles successfully; the caller persists it.
    pub async fn encounter_gate(&self, ctx: &PipelineContext, episode: &mut Episode, gate: Stage) -> Result<StageOutcome, PipelineError> {
        let producer = gate
            .gated_producer()
            .ok_or_else(|| PipelineError::invalid_config(format!("{gate} is not a review gate")))?;
        let episode_id = episode.id.clone();

        if ctx.review_task_repo.find_approved_for_episode_stage(&episode_id, producer).await?.is_some() {
            if gate == Stage::ReviewGate3 {
                episode.advance_to(EpisodeStatus::Approved, ctx.clock.now_utc())?;
            }
            return Ok(StageOutcome::Success);
        }

        if ctx.review_task_repo.find_active_for_episode_stage(&episode_id, producer).await?.is_some() {
            return Ok(StageOutcome::ReviewPending);
        }

        let layout = ctx.layout(&episode_id);
        let (artifact_path, diff_path, auto_approvable) = match producer {
            Stage::Correct => {
                let before = tokio::fs::read_to_string(layout.transcript_clean()).await?;
                let after = tokio::fs::read_to_string(layout.transcript_corrected()).await?;
                let entries = word_diff_entries(&before, &after);
                let auto = is_auto_approvable_correction(&entries);
                let diff_path = layout.review_correction_diff();
                write_atomic(&diff_path, serde_json::to_vec_pretty(&ArtifactDiff { entries })?.as_slice()).await?;
                (layout.transcript_corrected(), Some(diff_path), auto)
            }
            Stage::Adapt => {
                let before = tokio::fs::read_to_string(layout.transcript_translated()).await?;
                let after = tokio::fs::read_to_string(layout.script_adapted()).await?;
                let entries = word_diff_entries(&before, &after);
                let diff_path = layout.review_adaptation_diff();
                write_atomic(&diff_path, serde_json::to_vec_pretty(&ArtifactDiff { entries })?.as_slice()).await?;
                (layout.script_adapted(), Some(diff_path), false)
            }
            Stage::Render => (layout.render_draft(), None, false),
            _ => unreachable!("gated_producer only yields correct, adapt, or render"),
        };

        let artifact_bytes = tokio::fs::read(&artifact_path).await?;
        let artifact_hash = ContentHash::of(&artifact_bytes).to_hex();

        let mut task = ReviewTask::new(
            episode_id.clone(),
            producer,
            vec![artifact_path.display().to_string()],
            diff_path.map(|p| p.display().to_string()),
            artifact_hash.clone(),
            None,
            ctx.clock.now_utc(),
        );
        ctx.review_task_repo.insert(&task).await?;

        if auto_approvable {
            task.approve(artifact_hash, ctx.clock.now_utc())?;
            ctx.review_task_repo.update(&task).await?;
            let decision = ReviewDecision::new(
                task.id,
                ReviewDecisionKind::Approved,
                Some("auto-approved: punctuation-only correction".to_string()),
                ctx.clock.now_utc(),
            );
            ctx.review_decision_repo.insert(&decision).await?;
            return Ok(StageOutcome::Success);
        }

        Ok(StageOutcome::ReviewPending)
    }

    /// §4.5 "Decisions". Applies `task_id`'s decision, recomputing the
    /// tamper-check hash on approval, reverting the episode on reject or
    /// request-changes, and cascading `.stale` markers for the latter.
    pub async fn decide(
        &self,
        ctx: &PipelineContext,
        task_id: &ReviewTaskId,
        decision: ReviewDecisionKind,
        notes: Option<String>,
    ) -> Result<ReviewTask, PipelineError> {
        let mut task = ctx
            .review_task_repo
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| PipelineError::not_found(format!("review task {task_id}")))?;
        let mut episode = ctx
            .episode_repo
            .find_by_id(&task.episode_id)
            .await?
            .ok_or_else(|| PipelineError::not_found(format!("episode {}", task.episode_id)))?;

        let now = ctx.clock.now_utc();
        match decision {
            ReviewDecisionKind::Approved => {
                let artifact_path = task
                    .artifact_paths
                    .first()
                    .ok_or_else(|| PipelineError::internal_error("review task has no artifact_paths"))?;
                let current_bytes = tokio::fs::read(artifact_path).await?;
                let current_hash = ContentHash::of(&current_bytes).to_hex();
                task.approve(current_hash, now)?;
            }
            ReviewDecisionKind::Rejected => {
                task.reject(notes.clone(), now)?;
                self.revert_episode(&mut episode, task.stage, now);
                ctx.episode_repo.update(&episode).await?;
            }
            ReviewDecisionKind::ChangesRequested => {
                let notes = notes
                    .clone()
                    .ok_or_else(|| PipelineError::invalid_review_action("request-changes requires notes"))?;
                task.request_changes(notes, now)?;
                self.revert_episode(&mut episode, task.stage, now);
                ctx.episode_repo.update(&episode).await?;

                for downstream in task.stage.invalidates() {
                    if let Some(path) = Self::output_path_for(ctx, &task.episode_id, *downstream) {
                        ctx.cascade.write_stale_marker(&path, task.stage, "review: changes requested").await?;
                    }
                }
            }
        }

        ctx.review_task_repo.update(&task).await?;
        let record = ReviewDecision::new(task.id, decision, notes, now);
        ctx.review_decision_repo.insert(&record).await?;

        Ok(task)
    }

    fn revert_episode(&self, episode: &mut Episode, producer: Stage, now: chrono::DateTime<chrono::Utc>) {
        if let Some(gate) = producer.producing_gate() {
            if let Some(status) = gate_revert_status(gate) {
                episode.revert_to(status, now);
            }
        }
    }
}

/// Whether `stage` is one of the three sentinel gates in the v2 graph, used
/// by callers that only have a `Stage` and want to validate it before
/// calling [`ReviewCoordinator::encounter_gate`].
pub fn is_known_gate(stage: Stage) -> bool {
    stage_graph_v2().iter().any(|e| e.stage == stage && stage.is_review_gate())
}
