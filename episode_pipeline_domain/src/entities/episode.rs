// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The `Episode` aggregate: the unit of work the whole system revolves
//! around (§3). Carries the status state machine and the handful of
//! attributes the stage modules read and write.

use crate::value_objects::{EpisodeId, EpisodeStatus};
use crate::PipelineError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    pub id: EpisodeId,
    status: EpisodeStatus,
    pipeline_version: u8,
    pub error_message: Option<String>,
    pub youtube_video_id: Option<String>,
    pub published_at_youtube: Option<DateTime<Utc>>,
    /// Advisory tag surfaced to the dashboard; not read by the core.
    pub review_status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Episode {
    /// Creates a new episode at `NEW`, as produced by the external
    /// discovery step (§3 "created by an external discovery step at
    /// status NEW").
    pub fn new(id: EpisodeId, pipeline_version: u8, now: DateTime<Utc>) -> Result<Self, PipelineError> {
        if pipeline_version != 1 && pipeline_version != 2 {
            return Err(PipelineError::invalid_config(format!(
                "pipeline_version must be 1 or 2, got {pipeline_version}"
            )));
        }
        Ok(Self {
            id,
            status: EpisodeStatus::New,
            pipeline_version,
            error_message: None,
            youtube_video_id: None,
            published_at_youtube: None,
            review_status: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstructs an episode from stored fields. Used by repository
    /// implementations; does not re-validate `pipeline_version` since it
    /// is immutable once persisted.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: EpisodeId,
        status: EpisodeStatus,
        pipeline_version: u8,
        error_message: Option<String>,
        youtube_video_id: Option<String>,
        published_at_youtube: Option<DateTime<Utc>>,
        review_status: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            status,
            pipeline_version,
            error_message,
            youtube_video_id,
            published_at_youtube,
            review_status,
            created_at,
            updated_at,
        }
    }

    pub fn status(&self) -> EpisodeStatus {
        self.status
    }

    pub fn pipeline_version(&self) -> u8 {
        self.pipeline_version
    }

    /// Advances status at the end of a successful stage (§3 invariant:
    /// "status advances only at the end of a successful stage"). Rejects
    /// any non-forward move; terminal statuses (`Published`, `Failed`,
    /// `CostLimit`) are always reachable from a non-terminal status.
    pub fn advance_to(&mut self, new_status: EpisodeStatus, now: DateTime<Utc>) -> Result<(), PipelineError> {
        if self.status.is_terminal() {
            return Err(PipelineError::internal_error(format!(
                "cannot advance episode {} past terminal status {}",
                self.id, self.status
            )));
        }
        let forward = match (self.status.is_at_or_past(new_status), new_status.is_terminal()) {
            (_, true) => true,
            (false, false) => true,
            (true, false) => false,
        };
        if !forward {
            return Err(PipelineError::internal_error(format!(
                "episode {} cannot advance from {} to {} (not forward)",
                self.id, self.status, new_status
            )));
        }
        self.status = new_status;
        self.updated_at = now;
        Ok(())
    }

    /// Reverts status on a review rejection/changes-request (§4.5). Only
    /// the review coordinator should call this; the domain cannot enforce
    /// that caller restriction structurally, so it is documented here.
    pub fn revert_to(&mut self, status: EpisodeStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }

    pub fn mark_failed(&mut self, message: impl Into<String>, now: DateTime<Utc>) {
        self.error_message = Some(message.into());
        self.status = EpisodeStatus::Failed;
        self.updated_at = now;
    }

    pub fn mark_cost_limit(&mut self, now: DateTime<Utc>) {
        self.status = EpisodeStatus::CostLimit;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(0, 0).unwrap()
    }

    #[test]
    fn rejects_invalid_pipeline_version() {
        assert!(Episode::new("e1".into(), 3, now()).is_err());
    }

    #[test]
    fn advance_to_rejects_backward_move() {
        let mut ep = Episode::new("e1".into(), 2, now()).unwrap();
        ep.advance_to(EpisodeStatus::Corrected, now()).unwrap();
        assert!(ep.advance_to(EpisodeStatus::Downloaded, now()).is_err());
    }

    #[test]
    fn advance_to_terminal_always_allowed() {
        let mut ep = Episode::new("e1".into(), 2, now()).unwrap();
        ep.advance_to(EpisodeStatus::Downloaded, now()).unwrap();
        assert!(ep.advance_to(EpisodeStatus::CostLimit, now()).is_ok());
    }

    #[test]
    fn revert_bypasses_monotonic_check() {
        let mut ep = Episode::new("e1".into(), 2, now()).unwrap();
        ep.advance_to(EpisodeStatus::Corrected, now()).unwrap();
        ep.revert_to(EpisodeStatus::Transcribed, now());
        assert_eq!(ep.status(), EpisodeStatus::Transcribed);
    }
}
