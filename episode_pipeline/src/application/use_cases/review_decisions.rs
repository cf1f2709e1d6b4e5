// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Review Decision use case: applies a reviewer's approve/reject/
//! request-changes decision via the review coordinator.

use crate::application::commands::ReviewDecisionCommand;
use crate::application::services::ReviewCoordinator;
use crate::application::stages::PipelineContext;
use episode_pipeline_domain::entities::ReviewTask;
use episode_pipeline_domain::value_objects::ReviewDecisionKind;
use episode_pipeline_domain::PipelineError;
use std::sync::Arc;
use tracing::info;

pub struct ReviewDecisionUseCase {
    context: Arc<PipelineContext>,
    coordinator: Arc<ReviewCoordinator>,
}

impl ReviewDecisionUseCase {
    pub fn new(context: Arc<PipelineContext>, coordinator: Arc<ReviewCoordinator>) -> Self {
        Self { context, coordinator }
    }

    pub async fn execute(&self, command: ReviewDecisionCommand) -> Result<ReviewTask, PipelineError> {
        let task_id = command.review_task_id().clone();
        let (kind, notes) = match command {
            ReviewDecisionCommand::Approve { .. } => (ReviewDecisionKind::Approved, None),
            ReviewDecisionCommand::Reject { notes, .. } => (ReviewDecisionKind::Rejected, notes),
            ReviewDecisionCommand::RequestChanges { notes, .. } => (ReviewDecisionKind::ChangesRequested, Some(notes)),
        };
        info!(review_task_id = %task_id, ?kind, "applying review decision");
        self.coordinator.decide(&self.context, &task_id, kind, notes).await
    }
}
