// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Pipeline Executor (§4.1): resolves the stage list for an episode's
//! `pipeline_version`, runs stages in order under the status guard,
//! suspends on review gates, and stops on terminal/failure/cost-limit.

use crate::application::services::review_coordinator::ReviewCoordinator;
use crate::application::stages::{PipelineContext, StageModule, StageWork};
use crate::infrastructure::filesystem::provenance::Provenance;
use episode_pipeline_domain::entities::{ContentArtifact, PipelineRun};
use episode_pipeline_domain::value_objects::{produced_status, stage_graph_v2, Stage, StageOutcome, StoppedOn};
use episode_pipeline_domain::PipelineError;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct StageResult {
    pub name: Stage,
    pub outcome: StageOutcome,
    pub elapsed: Duration,
    pub detail: String,
}

#[derive(Debug, Clone)]
pub struct Report {
    pub episode_id: String,
    pub stages: Vec<StageResult>,
    pub success: bool,
    pub stopped_on: StoppedOn,
    pub total_cost_usd: f64,
}

enum ShapeOutcome {
    Success(String),
    Skipped(String),
    CostLimit,
}

pub struct PipelineExecutor {
    context: Arc<PipelineContext>,
    review_coordinator: Arc<ReviewCoordinator>,
    modules: HashMap<Stage, Arc<dyn StageModule>>,
}

impl PipelineExecutor {
    pub fn new(
        context: Arc<PipelineContext>,
        review_coordinator: Arc<ReviewCoordinator>,
        modules: Vec<Arc<dyn StageModule>>,
    ) -> Self {
        let modules = modules.into_iter().map(|m| (m.stage(), m)).collect();
        Self { context, review_coordinator, modules }
    }

    fn outputs_for(&self, stage: Stage, episode_id: &str) -> Vec<std::path::PathBuf> {
        self.modules
            .get(&stage)
            .map(|m| m.declared_outputs(&self.context, episode_id))
            .unwrap_or_default()
    }

    /// §4.1 algorithm. `force` re-runs the stage the episode is currently
    /// sitting at regardless of idempotency (§8 scenario 4).
    pub async fn run_for_episode(&self, episode_id: &str, force: bool) -> Result<Report, PipelineError> {
        let mut episode = self
            .context
            .episode_repo
            .find_by_id(&episode_id.to_string())
            .await?
            .ok_or_else(|| PipelineError::not_found(format!("episode {episode_id}")))?;

        if episode.pipeline_version() != 2 {
            return Err(PipelineError::invalid_config(
                "pipeline_version 1 (legacy) is not supported by this executor",
            ));
        }

        let mut stages = Vec::new();
        let mut stopped_on = StoppedOn::Terminal;

        for entry in stage_graph_v2() {
            let started = std::time::Instant::now();

            if episode.status() == entry.required_status {
                // Eligible: dispatch.
            } else if episode.status().is_at_or_past(entry.required_status) {
                stages.push(StageResult {
                    name: entry.stage,
                    outcome: StageOutcome::Skipped,
                    elapsed: started.elapsed(),
                    detail: "already past this stage".to_string(),
                });
                continue;
            } else {
                stages.push(StageResult {
                    name: entry.stage,
                    outcome: StageOutcome::Failed,
                    elapsed: started.elapsed(),
                    detail: format!(
                        "episode status {} precedes required status {}",
                        episode.status(),
                        entry.required_status
                    ),
                });
                stopped_on = StoppedOn::Failed;
                break;
            }

            if entry.stage.is_review_gate() {
                match self.review_coordinator.encounter_gate(&self.context, &mut episode, entry.stage).await {
                    Ok(outcome) => {
                        let pending = matches!(outcome, StageOutcome::ReviewPending);
                        stages.push(StageResult {
                            name: entry.stage,
                            outcome,
                            elapsed: started.elapsed(),
                            detail: if pending { "awaiting review decision".to_string() } else { "gate approved".to_string() },
                        });
                        if pending {
                            stopped_on = StoppedOn::ReviewPending;
                            break;
                        }
                    }
                    Err(e) => {
                        stages.push(StageResult {
                            name: entry.stage,
                            outcome: StageOutcome::Failed,
                            elapsed: started.elapsed(),
                            detail: e.to_string(),
                        });
                        stopped_on = StoppedOn::Failed;
                        break;
                    }
                }
                continue;
            }

            let module = match self.modules.get(&entry.stage) {
                Some(module) => module.clone(),
                None => {
                    stages.push(StageResult {
                        name: entry.stage,
                        outcome: StageOutcome::Failed,
                        elapsed: started.elapsed(),
                        detail: "no stage module registered".to_string(),
                    });
                    stopped_on = StoppedOn::Failed;
                    break;
                }
            };

            let run_force = force && episode.status() == entry.required_status;
            match self.run_stage_module(module.as_ref(), &mut episode, run_force).await {
                Ok(ShapeOutcome::Success(detail)) => {
                    stages.push(StageResult {
                        name: entry.stage,
                        outcome: StageOutcome::Success,
                        elapsed: started.elapsed(),
                        detail,
                    });
                }
                Ok(ShapeOutcome::Skipped(detail)) => {
                    stages.push(StageResult {
                        name: entry.stage,
                        outcome: StageOutcome::Skipped,
                        elapsed: started.elapsed(),
                        detail,
                    });
                }
                Ok(ShapeOutcome::CostLimit) => {
                    episode.mark_cost_limit(self.context.clock.now_utc());
                    self.context.episode_repo.update(&episode).await?;
                    stages.push(StageResult {
                        name: entry.stage,
                        outcome: StageOutcome::Failed,
                        elapsed: started.elapsed(),
                        detail: "cost cap would be exceeded".to_string(),
                    });
                    stopped_on = StoppedOn::CostLimit;
                    break;
                }
                Err(e) => {
                    stages.push(StageResult {
                        name: entry.stage,
                        outcome: StageOutcome::Failed,
                        elapsed: started.elapsed(),
                        detail: e.to_string(),
                    });
                    stopped_on = StoppedOn::Failed;
                    break;
                }
            }

            // §4.1 step 4: post-stage cost check.
            let accumulated = self.context.run_repo.sum_successful_cost(&episode_id.to_string()).await?;
            if accumulated >= self.context.settings.max_episode_cost_usd {
                episode.mark_cost_limit(self.context.clock.now_utc());
                self.context.episode_repo.update(&episode).await?;
                stopped_on = StoppedOn::CostLimit;
                break;
            }
        }

        let total_cost_usd = self.context.run_repo.sum_successful_cost(&episode_id.to_string()).await?;
        let success = !stages.iter().any(|s| s.outcome == StageOutcome::Failed);

        Ok(Report { episode_id: episode_id.to_string(), stages, success, stopped_on, total_cost_usd })
    }

    /// The uniform shape in §4.2, steps 2-10 (step 1's precondition is
    /// already guaranteed by the caller only dispatching at the stage's
    /// required status).
    async fn run_stage_module(
        &self,
        module: &dyn StageModule,
        episode: &mut episode_pipeline_domain::entities::Episode,
        force: bool,
    ) -> Result<ShapeOutcome, PipelineError> {
        let ctx = &self.context;
        let episode_id = episode.id.clone();
        let stage = module.stage();
        let layout = ctx.layout(&episode_id);

        let inputs = module.declared_inputs(ctx, &episode_id);
        let outputs = module.declared_outputs(ctx, &episode_id);

        let feedback_task = ctx.review_task_repo.find_latest_changes_requested(&episode_id, stage).await?;
        let feedback = feedback_task.and_then(|t| t.reviewer_notes);

        let mut extra_parts = Vec::new();
        if let Some(notes) = &feedback {
            extra_parts.push(notes.clone());
        }
        let fresh_input_hash = ctx.cascade.compute_input_hash(&inputs, &extra_parts).await?;

        let fresh_prompt_hash = match module.prompt_name() {
            Some(name) => ctx.prompt_registry.get_default(name).await?.map(|v| v.content_hash),
            None => None,
        };

        let provenance_path = layout.provenance(stage.as_str());
        let provenance = Provenance::read(&provenance_path).await?;

        if !force
            && ctx
                .cascade
                .is_current(&outputs, provenance.as_ref(), &fresh_input_hash, fresh_prompt_hash.as_ref())
                .await
        {
            return Ok(ShapeOutcome::Skipped(format!("{} is up to date", stage.as_str())));
        }

        let existing_cost = ctx.run_repo.sum_successful_cost(&episode_id).await?;
        if existing_cost + module.conservative_cost_estimate() > ctx.settings.max_episode_cost_usd {
            return Ok(ShapeOutcome::CostLimit);
        }

        let mut run = PipelineRun::open(episode_id.clone(), stage, ctx.clock.now_utc());
        ctx.run_repo.insert(&run).await?;

        let work = match module.work(ctx, &episode_id, feedback.as_deref(), force).await {
            Ok(work) => work,
            Err(e) => {
                run.close_failed(e.to_string(), ctx.clock.now_utc());
                ctx.run_repo.update(&run).await?;
                episode.mark_failed(e.to_string(), ctx.clock.now_utc());
                ctx.episode_repo.update(episode).await?;
                return Err(e);
            }
        };

        self.finish_success(episode, &mut run, stage, &inputs, &outputs, &fresh_input_hash, &provenance_path, work)
            .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn finish_success(
        &self,
        episode: &mut episode_pipeline_domain::entities::Episode,
        run: &mut PipelineRun,
        stage: Stage,
        inputs: &[std::path::PathBuf],
        outputs: &[std::path::PathBuf],
        fresh_input_hash: &episode_pipeline_domain::value_objects::ContentHash,
        provenance_path: &std::path::Path,
        work: StageWork,
    ) -> Result<ShapeOutcome, PipelineError> {
        let ctx = &self.context;
        let episode_id = episode.id.clone();

        let artifact = ContentArtifact::new(
            episode_id.clone(),
            work.artifact_type,
            work.primary_output.display().to_string(),
            None,
            work.input_tokens,
            work.output_tokens,
            work.cost_usd,
            work.prompt_hash.map(|h| h.to_hex()),
            ctx.clock.now_utc(),
        );
        ctx.artifact_repo.insert(&artifact).await?;

        let duration_seconds = (ctx.clock.now_utc() - run.started_at).num_milliseconds() as f64 / 1000.0;
        let provenance = Provenance {
            stage: stage.as_str().to_string(),
            episode_id: episode_id.clone(),
            timestamp: ctx.clock.now_utc(),
            prompt_name: work.prompt_name.clone(),
            prompt_version: None,
            prompt_hash: work.prompt_hash.map(|h| h.to_hex()),
            model: work.model.clone(),
            model_params: None,
            input_files: inputs.iter().map(|p| p.display().to_string()).collect(),
            input_content_hash: fresh_input_hash.to_hex(),
            output_files: outputs.iter().map(|p| p.display().to_string()).collect(),
            input_tokens: work.input_tokens.map(i64::from),
            output_tokens: work.output_tokens.map(i64::from),
            cost_usd: work.cost_usd,
            duration_seconds,
            segments_processed: None,
        };
        provenance.write(provenance_path).await?;

        ctx.cascade
            .cascade_invalidate(stage, "upstream regenerated", |downstream| self.outputs_for(downstream, &episode_id))
            .await?;
        for output in outputs {
            ctx.cascade.clear_stale_marker(output).await?;
        }

        if let Some(new_status) = produced_status(stage) {
            episode.advance_to(new_status, ctx.clock.now_utc())?;
        }
        if let Some(video_id) = work.youtube_video_id {
            episode.youtube_video_id = Some(video_id);
        }
        if let Some(published_at) = work.published_at_youtube {
            episode.published_at_youtube = Some(published_at);
        }
        ctx.episode_repo.update(episode).await?;

        run.close_success(work.input_tokens, work.output_tokens, work.cost_usd, ctx.clock.now_utc());
        ctx.run_repo.update(run).await?;

        Ok(ShapeOutcome::Success(work.detail))
    }
}
