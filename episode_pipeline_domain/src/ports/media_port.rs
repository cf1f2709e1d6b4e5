// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Media encode/concat/probe driver port (§6.3). Used by `render`.

use crate::PipelineError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct EncodeSegmentRequest<'a> {
    pub image_path: &'a Path,
    pub audio_path: &'a Path,
    pub overlays: &'a [String],
    pub resolution: &'a str,
    pub fps: u32,
    pub crf: u32,
    pub preset: &'a str,
    pub audio_bitrate: &'a str,
    pub fade_in_s: Option<f64>,
    pub fade_out_s: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct MediaProbe {
    pub duration_s: f64,
    pub size_bytes: u64,
    pub codecs: Vec<String>,
    pub resolution: String,
}

/// A single ffmpeg-family backend covering the three render-stage
/// operations: per-chapter segment encode, stream-copy concat, and probe.
#[async_trait]
pub trait MediaPort: Send + Sync {
    /// Encodes one chapter's image/audio/overlays into an mp4 segment,
    /// returning the path written.
    async fn encode_segment(&self, request: EncodeSegmentRequest<'_>, out_path: &Path) -> Result<PathBuf, PipelineError>;

    /// Concatenates segments via stream copy (§6.3: "stream-copy") into a
    /// single mp4 at `out_path`.
    async fn concat(&self, segments: &[PathBuf], out_path: &Path) -> Result<PathBuf, PipelineError>;

    async fn probe(&self, path: &Path) -> Result<MediaProbe, PipelineError>;
}
