// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Small closed enums used across entities (§3) and the executor's report
//! shape (§4.1).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineRunStatus {
    Running,
    Success,
    Failed,
    Skipped,
}

impl PipelineRunStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Running => "RUNNING",
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
            Self::Skipped => "SKIPPED",
        }
    }
}

impl std::fmt::Display for PipelineRunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PipelineRunStatus {
    type Err = crate::PipelineError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "RUNNING" => Self::Running,
            "SUCCESS" => Self::Success,
            "FAILED" => Self::Failed,
            "SKIPPED" => Self::Skipped,
            other => return Err(crate::PipelineError::invalid_config(format!("unknown run status: {other}"))),
        })
    }
}

/// The outcome the pipeline executor's `Report` records per stage (§4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageOutcome {
    Success,
    Skipped,
    ReviewPending,
    Failed,
}

/// Why the executor stopped iterating the stage graph (§4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoppedOn {
    Terminal,
    ReviewPending,
    Failed,
    CostLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactType {
    RawSource,
    Transcript,
    Correction,
    Translation,
    Adaptation,
    Chapters,
    Images,
    TtsAudio,
    Render,
    Published,
}

impl ArtifactType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RawSource => "raw_source",
            Self::Transcript => "transcript",
            Self::Correction => "correction",
            Self::Translation => "translation",
            Self::Adaptation => "adaptation",
            Self::Chapters => "chapters",
            Self::Images => "images",
            Self::TtsAudio => "tts_audio",
            Self::Render => "render",
            Self::Published => "published",
        }
    }
}

impl std::fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ArtifactType {
    type Err = crate::PipelineError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "raw_source" => Self::RawSource,
            "transcript" => Self::Transcript,
            "correction" => Self::Correction,
            "translation" => Self::Translation,
            "adaptation" => Self::Adaptation,
            "chapters" => Self::Chapters,
            "images" => Self::Images,
            "tts_audio" => Self::TtsAudio,
            "render" => Self::Render,
            "published" => Self::Published,
            other => return Err(crate::PipelineError::invalid_config(format!("unknown artifact type: {other}"))),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewTaskStatus {
    Pending,
    InReview,
    Approved,
    Rejected,
    ChangesRequested,
}

impl ReviewTaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InReview => "IN_REVIEW",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::ChangesRequested => "CHANGES_REQUESTED",
        }
    }

    /// Active per §4.5/§4.7: an active task blocks both pick-up of the
    /// same episode/stage and re-creation of a duplicate task.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::InReview)
    }

    /// Decisions are terminal for the task (§3 ReviewTask invariants).
    pub fn is_decided(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected | Self::ChangesRequested)
    }
}

impl std::fmt::Display for ReviewTaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReviewTaskStatus {
    type Err = crate::PipelineError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "PENDING" => Self::Pending,
            "IN_REVIEW" => Self::InReview,
            "APPROVED" => Self::Approved,
            "REJECTED" => Self::Rejected,
            "CHANGES_REQUESTED" => Self::ChangesRequested,
            other => return Err(crate::PipelineError::invalid_config(format!("unknown review task status: {other}"))),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewDecisionKind {
    Approved,
    Rejected,
    ChangesRequested,
}

impl ReviewDecisionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::ChangesRequested => "CHANGES_REQUESTED",
        }
    }
}

impl std::fmt::Display for ReviewDecisionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReviewDecisionKind {
    type Err = crate::PipelineError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "APPROVED" => Self::Approved,
            "REJECTED" => Self::Rejected,
            "CHANGES_REQUESTED" => Self::ChangesRequested,
            other => return Err(crate::PipelineError::invalid_config(format!("unknown review decision kind: {other}"))),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaAssetType {
    Image,
    Audio,
    Video,
}

impl MediaAssetType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "IMAGE",
            Self::Audio => "AUDIO",
            Self::Video => "VIDEO",
        }
    }
}

impl std::fmt::Display for MediaAssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MediaAssetType {
    type Err = crate::PipelineError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "IMAGE" => Self::Image,
            "AUDIO" => Self::Audio,
            "VIDEO" => Self::Video,
            other => return Err(crate::PipelineError::invalid_config(format!("unknown media asset type: {other}"))),
        })
    }
}
