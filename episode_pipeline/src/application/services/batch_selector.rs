// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Batch Selector (§4.7): picks actionable episodes and hands each to the
//! pipeline executor in turn. Resolves the §9 Open Question (a) toward the
//! stricter, stage-scoped active-review filter the spec prescribes.

use crate::application::services::pipeline_executor::{PipelineExecutor, Report};
use crate::application::stages::PipelineContext;
use episode_pipeline_domain::entities::Episode;
use episode_pipeline_domain::value_objects::{stage_graph_v2, EpisodeStatus, Stage};
use episode_pipeline_domain::PipelineError;
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
pub enum BatchMode {
    Pending,
    Latest(usize),
}

pub struct BatchSelector {
    context: Arc<PipelineContext>,
    executor: Arc<PipelineExecutor>,
}

impl BatchSelector {
    pub fn new(context: Arc<PipelineContext>, executor: Arc<PipelineExecutor>) -> Self {
        Self { context, executor }
    }

    /// Selects candidates for `mode`, skips any with an active review task
    /// at the stage that would run next, and invokes the executor for the
    /// rest sequentially (§4.7, §5 "single-threaded per episode").
    pub async fn run(&self, mode: BatchMode, force: bool) -> Result<Vec<Report>, PipelineError> {
        let candidates = match mode {
            BatchMode::Pending => self.context.episode_repo.list_actionable().await?,
            BatchMode::Latest(limit) => self.context.episode_repo.list_latest(limit).await?,
        };

        let mut reports = Vec::with_capacity(candidates.len());
        for episode in candidates {
            if self.blocked_by_active_review(&episode).await? {
                continue;
            }
            reports.push(self.executor.run_for_episode(&episode.id, force).await?);
        }
        Ok(reports)
    }

    /// Scoped to `(episode, next stage)` only: a pending review at a
    /// different stage, or for a different episode, never blocks pick-up
    /// (§4.7 "Scoping invariant").
    async fn blocked_by_active_review(&self, episode: &Episode) -> Result<bool, PipelineError> {
        let Some(next) = next_stage_for(episode.status()) else {
            return Ok(false);
        };
        let producer = next.gated_producer().unwrap_or(next);
        Ok(self
            .context
            .review_task_repo
            .find_active_for_episode_stage(&episode.id, producer)
            .await?
            .is_some())
    }
}

fn next_stage_for(status: EpisodeStatus) -> Option<Stage> {
    stage_graph_v2().iter().find(|entry| entry.required_status == status).map(|entry| entry.stage)
}
