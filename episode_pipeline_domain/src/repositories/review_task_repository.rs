// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `ReviewTask` persistence port (§3, §4.5, §4.7). Lookups are scoped by
//! `(episode_id, stage)` because an episode can carry at most one active
//! review task per gate at a time.

use crate::entities::ReviewTask;
use crate::value_objects::{EpisodeId, ReviewTaskId, Stage};
use crate::PipelineError;
use async_trait::async_trait;

#[async_trait]
pub trait ReviewTaskRepository: Send + Sync {
    async fn insert(&self, task: &ReviewTask) -> Result<(), PipelineError>;

    async fn update(&self, task: &ReviewTask) -> Result<(), PipelineError>;

    async fn find_by_id(&self, id: &ReviewTaskId) -> Result<Option<ReviewTask>, PipelineError>;

    /// The undecided task for `(episode_id, stage)`, if any. Used both by
    /// the review coordinator (to reject concurrent duplicate tasks at the
    /// same gate) and by the batch selector's stage-scoped active-review
    /// filter (§4.7 Open Question).
    async fn find_active_for_episode_stage(
        &self,
        episode_id: &EpisodeId,
        stage: Stage,
    ) -> Result<Option<ReviewTask>, PipelineError>;

    /// The most recent `changes_requested` task for `(episode_id, stage)`,
    /// feeding reviewer notes back into the next stage attempt (§4.5).
    async fn find_latest_changes_requested(
        &self,
        episode_id: &EpisodeId,
        stage: Stage,
    ) -> Result<Option<ReviewTask>, PipelineError>;

    /// An `approved` task for `(episode_id, stage)`, if one exists. Used by
    /// the review coordinator's gate-encounter check (§4.5 "If the episode
    /// already has an APPROVED review task for the gate's producing
    /// stage... return success").
    async fn find_approved_for_episode_stage(
        &self,
        episode_id: &EpisodeId,
        stage: Stage,
    ) -> Result<Option<ReviewTask>, PipelineError>;

    /// All tasks across all episodes sitting at `pending`, for the
    /// operator-facing "list review tasks" command.
    async fn list_pending(&self) -> Result<Vec<ReviewTask>, PipelineError>;
}
