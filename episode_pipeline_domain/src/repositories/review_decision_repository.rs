// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `ReviewDecision` persistence port (§3): the append-only audit trail
//! behind each `ReviewTask` state transition.

use crate::entities::ReviewDecision;
use crate::value_objects::ReviewTaskId;
use crate::PipelineError;
use async_trait::async_trait;

#[async_trait]
pub trait ReviewDecisionRepository: Send + Sync {
    async fn insert(&self, decision: &ReviewDecision) -> Result<(), PipelineError>;

    /// Decisions for a task, oldest first.
    async fn list_for_task(&self, review_task_id: &ReviewTaskId) -> Result<Vec<ReviewDecision>, PipelineError>;
}
