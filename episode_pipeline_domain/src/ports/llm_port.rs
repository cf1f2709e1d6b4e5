// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! LLM driver port (§6.3). Used by `correct`, `translate`, and `adapt`.

use crate::PipelineError;
use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub text: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub cost_usd: f64,
}

/// Retries HTTP 429 with backoff (§5: 3 attempts, 1s/2s/4s); content-policy
/// rejections are terminal and must surface as
/// [`PipelineError::driver_policy`](crate::PipelineError::driver_policy),
/// never as [`PipelineError::driver_transient`](crate::PipelineError::driver_transient).
#[async_trait]
pub trait LlmPort: Send + Sync {
    async fn call(
        &self,
        system: &str,
        user: &str,
        model: &str,
        params: Option<&Value>,
    ) -> Result<LlmResponse, PipelineError>;
}
