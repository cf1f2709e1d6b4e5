// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Error System
//!
//! A single error enum for the whole domain, organized around the failure
//! taxonomy of the pipeline runtime rather than around Rust error types:
//! input problems, driver problems, validation-after-work problems, cost
//! cap breaches, and review-state conflicts each get their own variant so
//! callers can match on *cause*.
//!
//! `is_recoverable()` marks the subset the executor's retry/backoff logic
//! is allowed to retry automatically; everything else is fatal for the
//! stage that raised it.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum PipelineError {
    /// A declared input artifact is missing or fails schema validation.
    #[error("input missing or malformed: {0}")]
    InputInvalid(String),

    /// Rate limit, timeout, or transient 5xx from a driver port.
    #[error("driver transient error: {0}")]
    DriverTransient(String),

    /// Content-policy refusal or other non-retriable driver failure.
    #[error("driver refused request: {0}")]
    DriverPolicy(String),

    /// LLM/structured output failed schema validation after a corrective
    /// re-prompt attempt.
    #[error("output failed validation after retry: {0}")]
    ValidationFailed(String),

    /// Accumulated or projected cost would exceed `max_episode_cost_usd`.
    #[error("cost cap exceeded: {0}")]
    CostCapExceeded(String),

    /// A review-task action was attempted that the review protocol forbids
    /// (acting on a decided task, empty notes on `request-changes`, reject
    /// on gate 3 without notes, etc).
    #[error("invalid review action: {0}")]
    InvalidReviewAction(String),

    /// A stage was dispatched while the episode's status precedes the
    /// stage's required status.
    #[error("stage precondition not met: {0}")]
    StagePreconditionFailed(String),

    /// Entity not found in the store.
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed configuration (settings surface, prompt frontmatter).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Filesystem I/O failure.
    #[error("io error: {0}")]
    IoError(String),

    /// Store (sqlx) failure.
    #[error("database error: {0}")]
    DatabaseError(String),

    /// JSON (de)serialization failure (provenance, manifests, chapters).
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// ffmpeg/media subprocess timeout or non-zero exit.
    #[error("media operation failed: {0}")]
    MediaError(String),

    /// Unexpected internal invariant violation.
    #[error("internal error: {0}")]
    InternalError(String),
}

impl PipelineError {
    pub fn input_invalid(msg: impl Into<String>) -> Self {
        Self::InputInvalid(msg.into())
    }

    pub fn driver_transient(msg: impl Into<String>) -> Self {
        Self::DriverTransient(msg.into())
    }

    pub fn driver_policy(msg: impl Into<String>) -> Self {
        Self::DriverPolicy(msg.into())
    }

    pub fn cost_cap_exceeded(msg: impl Into<String>) -> Self {
        Self::CostCapExceeded(msg.into())
    }

    pub fn invalid_review_action(msg: impl Into<String>) -> Self {
        Self::InvalidReviewAction(msg.into())
    }

    pub fn stage_precondition_failed(msg: impl Into<String>) -> Self {
        Self::StagePreconditionFailed(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub fn database_error(msg: impl Into<String>) -> Self {
        Self::DatabaseError(msg.into())
    }

    pub fn media_error(msg: impl Into<String>) -> Self {
        Self::MediaError(msg.into())
    }

    pub fn internal_error(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }

    /// Whether the executor's retry/backoff logic may retry this error
    /// automatically. Only driver-transient failures qualify (§7); policy
    /// refusals, validation failures, and cost breaches are all terminal
    /// for the attempt that raised them.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PipelineError::DriverTransient(_))
    }

    /// Coarse category, used for log fields and metrics labels.
    pub fn category(&self) -> &'static str {
        match self {
            PipelineError::InputInvalid(_) => "input",
            PipelineError::DriverTransient(_) => "driver_transient",
            PipelineError::DriverPolicy(_) => "driver_policy",
            PipelineError::ValidationFailed(_) => "validation",
            PipelineError::CostCapExceeded(_) => "cost_cap",
            PipelineError::InvalidReviewAction(_) => "review",
            PipelineError::StagePreconditionFailed(_) => "precondition",
            PipelineError::NotFound(_) => "not_found",
            PipelineError::InvalidConfiguration(_) => "configuration",
            PipelineError::IoError(_) => "io",
            PipelineError::DatabaseError(_) => "database",
            PipelineError::SerializationError(_) => "serialization",
            PipelineError::MediaError(_) => "media",
            PipelineError::InternalError(_) => "internal",
        }
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_driver_transient_is_recoverable() {
        assert!(PipelineError::driver_transient("rate limited").is_recoverable());
        assert!(!PipelineError::driver_policy("content refused").is_recoverable());
        assert!(!PipelineError::cost_cap_exceeded("over cap").is_recoverable());
    }

    #[test]
    fn category_is_stable_per_variant() {
        assert_eq!(PipelineError::input_invalid("x").category(), "input");
        assert_eq!(PipelineError::not_found("x").category(), "not_found");
    }
}
