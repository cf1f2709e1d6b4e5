// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Run Batch use case: resolves the commanded [`BatchMode`] into the
//! application-service [`batch_selector::BatchMode`] and hands off to the
//! batch selector.

use crate::application::commands::{BatchMode as CommandBatchMode, RunBatchCommand};
use crate::application::services::pipeline_executor::Report;
use crate::application::services::{batch_selector, BatchSelector};
use episode_pipeline_domain::PipelineError;
use std::sync::Arc;
use tracing::info;

pub struct RunBatchUseCase {
    selector: Arc<BatchSelector>,
}

impl RunBatchUseCase {
    pub fn new(selector: Arc<BatchSelector>) -> Self {
        Self { selector }
    }

    pub async fn execute(&self, command: RunBatchCommand) -> Result<Vec<Report>, PipelineError> {
        let mode = match command.mode {
            CommandBatchMode::Pending => batch_selector::BatchMode::Pending,
            CommandBatchMode::Latest { limit } => batch_selector::BatchMode::Latest(limit),
        };
        info!(?mode, force = command.force, "running batch");
        self.selector.run(mode, command.force).await
    }
}
