// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! A request for human decision at a review gate (§3 `ReviewTask`, §4.5
//! Review Coordinator). `stage` here is the *producing* stage the gate
//! protects (`correct`, `adapt`, or `render`), not the gate itself.

use crate::value_objects::{EpisodeId, PromptVersionId, ReviewTaskId, ReviewTaskStatus, Stage};
use crate::PipelineError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewTask {
    pub id: ReviewTaskId,
    pub episode_id: EpisodeId,
    pub stage: Stage,
    pub status: ReviewTaskStatus,
    pub artifact_paths: Vec<String>,
    pub diff_path: Option<String>,
    pub artifact_hash: String,
    pub reviewer_notes: Option<String>,
    pub prompt_version_id: Option<PromptVersionId>,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl ReviewTask {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        episode_id: EpisodeId,
        stage: Stage,
        artifact_paths: Vec<String>,
        diff_path: Option<String>,
        artifact_hash: impl Into<String>,
        prompt_version_id: Option<PromptVersionId>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ReviewTaskId::new(),
            episode_id,
            stage,
            status: ReviewTaskStatus::Pending,
            artifact_paths,
            diff_path,
            artifact_hash: artifact_hash.into(),
            reviewer_notes: None,
            prompt_version_id,
            created_at: now,
            reviewed_at: None,
        }
    }

    fn ensure_undecided(&self) -> Result<(), PipelineError> {
        if self.status.is_decided() {
            return Err(PipelineError::invalid_review_action(format!(
                "review task {} has already been decided ({})",
                self.id, self.status
            )));
        }
        Ok(())
    }

    /// Approves the task, recomputing `artifact_hash` from the current
    /// primary artifact to detect tampering between creation and decision
    /// (§4.5 "approve").
    pub fn approve(&mut self, current_artifact_hash: impl Into<String>, now: DateTime<Utc>) -> Result<(), PipelineError> {
        self.ensure_undecided()?;
        self.artifact_hash = current_artifact_hash.into();
        self.status = ReviewTaskStatus::Approved;
        self.reviewed_at = Some(now);
        Ok(())
    }

    /// Rejects the task. Notes are required when the protected stage is
    /// `render` (gate 3), per §4.5: "Rejection requires notes for render
    /// (gate 3); other gates permit but do not require notes."
    pub fn reject(&mut self, notes: Option<String>, now: DateTime<Utc>) -> Result<(), PipelineError> {
        self.ensure_undecided()?;
        if self.stage == Stage::Render && notes.as_deref().unwrap_or("").trim().is_empty() {
            return Err(PipelineError::invalid_review_action(
                "reject on the render gate requires notes",
            ));
        }
        self.reviewer_notes = notes;
        self.status = ReviewTaskStatus::Rejected;
        self.reviewed_at = Some(now);
        Ok(())
    }

    /// Requests changes; notes are always required (§4.5
    /// "`reviewer_notes := notes` (must be non-empty)").
    pub fn request_changes(&mut self, notes: String, now: DateTime<Utc>) -> Result<(), PipelineError> {
        self.ensure_undecided()?;
        if notes.trim().is_empty() {
            return Err(PipelineError::invalid_review_action("request-changes requires non-empty notes"));
        }
        self.reviewer_notes = Some(notes);
        self.status = ReviewTaskStatus::ChangesRequested;
        self.reviewed_at = Some(now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(0, 0).unwrap()
    }

    fn task(stage: Stage) -> ReviewTask {
        ReviewTask::new("e1".into(), stage, vec!["a".into()], None, "hash", None, now())
    }

    #[test]
    fn reject_requires_notes_on_render_gate() {
        let mut t = task(Stage::Render);
        assert!(t.reject(None, now()).is_err());
        assert!(t.reject(Some("audio sync".into()), now()).is_ok());
    }

    #[test]
    fn reject_permits_empty_notes_elsewhere() {
        let mut t = task(Stage::Correct);
        assert!(t.reject(None, now()).is_ok());
    }

    #[test]
    fn request_changes_rejects_empty_notes() {
        let mut t = task(Stage::Adapt);
        assert!(t.request_changes("   ".into(), now()).is_err());
        assert!(t.request_changes("fix tone".into(), now()).is_ok());
    }

    #[test]
    fn decided_task_cannot_be_acted_on_again() {
        let mut t = task(Stage::Correct);
        t.approve("hash", now()).unwrap();
        assert!(t.reject(None, now()).is_err());
    }
}
