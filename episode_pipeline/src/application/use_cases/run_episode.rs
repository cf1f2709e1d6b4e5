// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Run Episode use case: drives a single episode through the pipeline
//! executor and reports the outcome.

use crate::application::commands::RunEpisodeCommand;
use crate::application::services::pipeline_executor::Report;
use crate::application::services::PipelineExecutor;
use episode_pipeline_domain::PipelineError;
use std::sync::Arc;
use tracing::{info, warn};

pub struct RunEpisodeUseCase {
    executor: Arc<PipelineExecutor>,
}

impl RunEpisodeUseCase {
    pub fn new(executor: Arc<PipelineExecutor>) -> Self {
        Self { executor }
    }

    pub async fn execute(&self, command: RunEpisodeCommand) -> Result<Report, PipelineError> {
        info!(episode_id = %command.episode_id, force = command.force, "running episode");
        let report = self.executor.run_for_episode(&command.episode_id, command.force).await?;
        if !report.success {
            warn!(episode_id = %command.episode_id, stopped_on = ?report.stopped_on, "episode run did not complete");
        }
        Ok(report)
    }
}
