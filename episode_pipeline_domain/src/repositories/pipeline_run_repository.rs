// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `PipelineRun` persistence port (§3). Each stage execution produces
//! exactly one row; cost accounting sums the successful ones.

use crate::entities::PipelineRun;
use crate::value_objects::EpisodeId;
use crate::PipelineError;
use async_trait::async_trait;

#[async_trait]
pub trait PipelineRunRepository: Send + Sync {
    async fn insert(&self, run: &PipelineRun) -> Result<(), PipelineError>;

    async fn update(&self, run: &PipelineRun) -> Result<(), PipelineError>;

    /// Sum of `estimated_cost_usd` over `SUCCESS` runs for the episode
    /// (§8 cost invariant).
    async fn sum_successful_cost(&self, episode_id: &EpisodeId) -> Result<f64, PipelineError>;

    async fn list_for_episode(&self, episode_id: &EpisodeId) -> Result<Vec<PipelineRun>, PipelineError>;
}
