// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Image generation driver port (§6.3). Used by `imagegen`.

use crate::PipelineError;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct ImageResponse {
    pub bytes: Vec<u8>,
    pub revised_prompt: Option<String>,
    pub cost_usd: f64,
}

/// Same retry rule as [`LlmPort`](crate::ports::LlmPort): 429s back off, a
/// content-policy rejection is terminal.
#[async_trait]
pub trait ImageGenPort: Send + Sync {
    async fn generate(&self, prompt: &str, size: &str, quality: &str) -> Result<ImageResponse, PipelineError>;
}
