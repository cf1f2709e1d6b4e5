// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! One attempt of one stage against one episode (§3 `PipelineRun`).

use crate::value_objects::{EpisodeId, PipelineRunId, PipelineRunStatus, Stage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRun {
    pub id: PipelineRunId,
    pub episode_id: EpisodeId,
    pub stage: Stage,
    pub status: PipelineRunStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub input_tokens: Option<u32>,
    pub output_tokens: Option<u32>,
    pub estimated_cost_usd: f64,
    pub error_message: Option<String>,
}

impl PipelineRun {
    /// Opens a run record (§4.2 step 4: "open a `PipelineRun(stage,
    /// RUNNING)` and record `started_at`").
    pub fn open(episode_id: EpisodeId, stage: Stage, now: DateTime<Utc>) -> Self {
        Self {
            id: PipelineRunId::new(),
            episode_id,
            stage,
            status: PipelineRunStatus::Running,
            started_at: now,
            finished_at: None,
            input_tokens: None,
            output_tokens: None,
            estimated_cost_usd: 0.0,
            error_message: None,
        }
    }

    pub fn close_success(&mut self, input_tokens: Option<u32>, output_tokens: Option<u32>, cost_usd: f64, now: DateTime<Utc>) {
        self.status = PipelineRunStatus::Success;
        self.input_tokens = input_tokens;
        self.output_tokens = output_tokens;
        self.estimated_cost_usd = cost_usd;
        self.finished_at = Some(now);
    }

    pub fn close_skipped(&mut self, now: DateTime<Utc>) {
        self.status = PipelineRunStatus::Skipped;
        self.estimated_cost_usd = 0.0;
        self.finished_at = Some(now);
    }

    pub fn close_failed(&mut self, message: impl Into<String>, now: DateTime<Utc>) {
        self.status = PipelineRunStatus::Failed;
        self.error_message = Some(message.into());
        self.finished_at = Some(now);
    }
}
