// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Use cases: the four business operations the bootstrap CLI dispatches
//! into (§4.9), each a thin orchestrator over the application services.

// Use cases module - each CLI command has a corresponding use case
pub mod list_review_tasks;
pub mod review_decisions;
pub mod run_batch;
pub mod run_episode;

pub use list_review_tasks::ListReviewTasksUseCase;
pub use review_decisions::ReviewDecisionUseCase;
pub use run_batch::RunBatchUseCase;
pub use run_episode::RunEpisodeUseCase;

use crate::application::services::{BatchSelector, PipelineExecutor, ReviewCoordinator};
use crate::application::stages::PipelineContext;
use std::sync::Arc;

/// The four use cases the bootstrap CLI dispatches into, built once at
/// startup from the shared [`PipelineContext`].
pub struct UseCases {
    pub run_episode: RunEpisodeUseCase,
    pub run_batch: RunBatchUseCase,
    pub review_decisions: ReviewDecisionUseCase,
    pub list_review_tasks: ListReviewTasksUseCase,
}

impl UseCases {
    pub fn new(context: Arc<PipelineContext>, executor: Arc<PipelineExecutor>, coordinator: Arc<ReviewCoordinator>) -> Self {
        let selector = Arc::new(BatchSelector::new(context.clone(), executor.clone()));
        Self {
            run_episode: RunEpisodeUseCase::new(executor),
            run_batch: RunBatchUseCase::new(selector),
            review_decisions: ReviewDecisionUseCase::new(context.clone(), coordinator),
            list_review_tasks: ListReviewTasksUseCase::new(context),
        }
    }
}
