// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Text-to-speech driver port (§6.3). Used by `tts`.

use crate::PipelineError;
use async_trait::async_trait;
use serde_json::Value;

/// Sentence-boundary chunk ceiling applied by callers before long texts
/// reach [`TtsPort::synthesize`] (§6.3).
pub const TTS_CHUNK_CEILING_CHARS: usize = 5000;

#[derive(Debug, Clone)]
pub struct TtsResponse {
    pub mp3_bytes: Vec<u8>,
    pub duration_s: f64,
    pub character_count: u32,
    pub cost_usd: f64,
}

/// Implementations synthesize a single chunk; chunking long texts at
/// sentence boundaries and concatenating the resulting MP3s is the
/// application layer's job (§6.3), not the port's.
#[async_trait]
pub trait TtsPort: Send + Sync {
    async fn synthesize(
        &self,
        text: &str,
        voice: &str,
        model: &str,
        params: Option<&Value>,
    ) -> Result<TtsResponse, PipelineError>;
}
