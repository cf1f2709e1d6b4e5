// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! List Review Tasks use case: the operator-facing "what's waiting on me"
//! query.

use crate::application::commands::ListReviewTasksCommand;
use crate::application::stages::PipelineContext;
use episode_pipeline_domain::entities::ReviewTask;
use episode_pipeline_domain::PipelineError;
use std::sync::Arc;

pub struct ListReviewTasksUseCase {
    context: Arc<PipelineContext>,
}

impl ListReviewTasksUseCase {
    pub fn new(context: Arc<PipelineContext>) -> Self {
        Self { context }
    }

    pub async fn execute(&self, _command: ListReviewTasksCommand) -> Result<Vec<ReviewTask>, PipelineError> {
        self.context.review_task_repo.list_pending().await
    }
}
