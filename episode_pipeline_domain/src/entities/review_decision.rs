// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Append-only record of each action on a review task (§3
//! `ReviewDecision`).

use crate::value_objects::{ReviewDecisionId, ReviewDecisionKind, ReviewTaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewDecision {
    pub id: ReviewDecisionId,
    pub review_task_id: ReviewTaskId,
    pub decision: ReviewDecisionKind,
    pub notes: Option<String>,
    pub decided_at: DateTime<Utc>,
}

impl ReviewDecision {
    pub fn new(review_task_id: ReviewTaskId, decision: ReviewDecisionKind, notes: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: ReviewDecisionId::new(),
            review_task_id,
            decision,
            notes,
            decided_at: now,
        }
    }
}
