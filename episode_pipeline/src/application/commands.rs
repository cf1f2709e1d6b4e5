// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Commands: immutable, self-contained instructions that change system
//! state, dispatched from the bootstrap CLI into the use cases in
//! [`crate::application::use_cases`].

use episode_pipeline_domain::value_objects::{EpisodeId, ReviewTaskId};

/// Runs a single episode through the pipeline (§4.9 "run episode").
#[derive(Debug, Clone)]
pub struct RunEpisodeCommand {
    pub episode_id: EpisodeId,
    pub force: bool,
    pub dry_run: bool,
}

impl RunEpisodeCommand {
    pub fn new(episode_id: EpisodeId) -> Self {
        Self {
            episode_id,
            force: false,
            dry_run: false,
        }
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Selects and runs a batch of episodes (§4.7 Batch Selector).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchMode {
    /// All actionable episodes without an active review task at their
    /// next gate (§4.7, §9 Open Question (a): stage-scoped filter).
    Pending,
    /// The `limit` most recently updated actionable episodes.
    Latest { limit: usize },
}

#[derive(Debug, Clone)]
pub struct RunBatchCommand {
    pub mode: BatchMode,
    pub force: bool,
    pub dry_run: bool,
}

impl RunBatchCommand {
    pub fn pending() -> Self {
        Self {
            mode: BatchMode::Pending,
            force: false,
            dry_run: false,
        }
    }

    pub fn latest(limit: usize) -> Self {
        Self {
            mode: BatchMode::Latest { limit },
            force: false,
            dry_run: false,
        }
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// A review decision to apply to a pending task (§4.5).
#[derive(Debug, Clone)]
pub enum ReviewDecisionCommand {
    Approve {
        review_task_id: ReviewTaskId,
    },
    Reject {
        review_task_id: ReviewTaskId,
        notes: Option<String>,
    },
    RequestChanges {
        review_task_id: ReviewTaskId,
        notes: String,
    },
}

impl ReviewDecisionCommand {
    pub fn review_task_id(&self) -> &ReviewTaskId {
        match self {
            ReviewDecisionCommand::Approve { review_task_id }
            | ReviewDecisionCommand::Reject { review_task_id, .. }
            | ReviewDecisionCommand::RequestChanges { review_task_id, .. } => review_task_id,
        }
    }
}

/// Lists review tasks currently awaiting a decision.
#[derive(Debug, Clone, Default)]
pub struct ListReviewTasksCommand;
