// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! ffmpeg/ffprobe-backed [`MediaPort`] implementation (§6.3).

use async_trait::async_trait;
use episode_pipeline_domain::ports::{EncodeSegmentRequest, MediaPort, MediaProbe};
use episode_pipeline_domain::PipelineError;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::fs;
use tokio::process::Command;
use tracing::debug;

pub struct FfmpegMediaDriver {
    ffmpeg_bin: String,
    ffprobe_bin: String,
    dry_run: bool,
}

impl FfmpegMediaDriver {
    pub fn new(dry_run: bool) -> Self {
        Self { ffmpeg_bin: "ffmpeg".to_string(), ffprobe_bin: "ffprobe".to_string(), dry_run }
    }

    async fn run(&self, bin: &str, args: &[String]) -> Result<String, PipelineError> {
        let output = Command::new(bin)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| PipelineError::media_error(format!("spawning {bin}: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PipelineError::media_error(format!(
                "{bin} exited with {}: {stderr}",
                output.status
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl MediaPort for FfmpegMediaDriver {
    async fn encode_segment(&self, request: EncodeSegmentRequest<'_>, out_path: &Path) -> Result<PathBuf, PipelineError> {
        if self.dry_run {
            debug!(?out_path, "dry-run: skipping ffmpeg encode");
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(out_path, b"").await?;
            return Ok(out_path.to_path_buf());
        }

        let mut filter_parts: Vec<String> = request.overlays.to_vec();
        if let Some(fade_in) = request.fade_in_s {
            filter_parts.push(format!("afade=t=in:st=0:d={fade_in}"));
        }
        if let Some(fade_out) = request.fade_out_s {
            filter_parts.push(format!("afade=t=out:st=0:d={fade_out}"));
        }

        let mut args = vec![
            "-y".to_string(),
            "-loop".to_string(),
            "1".to_string(),
            "-i".to_string(),
            request.image_path.display().to_string(),
            "-i".to_string(),
            request.audio_path.display().to_string(),
            "-vf".to_string(),
            format!("scale={}", request.resolution),
            "-r".to_string(),
            request.fps.to_string(),
            "-c:v".to_string(),
            "libx264".to_string(),
            "-preset".to_string(),
            request.preset.to_string(),
            "-crf".to_string(),
            request.crf.to_string(),
            "-c:a".to_string(),
            "aac".to_string(),
            "-b:a".to_string(),
            request.audio_bitrate.to_string(),
            "-shortest".to_string(),
        ];
        if !filter_parts.is_empty() {
            args.push("-af".to_string());
            args.push(filter_parts.join(","));
        }
        args.push(out_path.display().to_string());

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        self.run(&self.ffmpeg_bin, &args).await?;
        Ok(out_path.to_path_buf())
    }

    async fn concat(&self, segments: &[PathBuf], out_path: &Path) -> Result<PathBuf, PipelineError> {
        if self.dry_run {
            debug!(?out_path, "dry-run: skipping ffmpeg concat");
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(out_path, b"").await?;
            return Ok(out_path.to_path_buf());
        }

        let list_path = out_path.with_extension("concat.txt");
        let manifest: String = segments
            .iter()
            .map(|p| format!("file '{}'\n", p.display()))
            .collect();
        fs::write(&list_path, manifest).await?;

        let args = vec![
            "-y".to_string(),
            "-f".to_string(),
            "concat".to_string(),
            "-safe".to_string(),
            "0".to_string(),
            "-i".to_string(),
            list_path.display().to_string(),
            "-c".to_string(),
            "copy".to_string(),
            out_path.display().to_string(),
        ];
        let result = self.run(&self.ffmpeg_bin, &args).await;
        let _ = fs::remove_file(&list_path).await;
        result?;
        Ok(out_path.to_path_buf())
    }

    async fn probe(&self, path: &Path) -> Result<MediaProbe, PipelineError> {
        if self.dry_run {
            return Ok(MediaProbe {
                duration_s: 0.0,
                size_bytes: 0,
                codecs: Vec::new(),
                resolution: "0x0".to_string(),
            });
        }

        let args = vec![
            "-v".to_string(),
            "error".to_string(),
            "-show_entries".to_string(),
            "format=duration:stream=codec_name,width,height".to_string(),
            "-of".to_string(),
            "json".to_string(),
            path.display().to_string(),
        ];
        let stdout = self.run(&self.ffprobe_bin, &args).await?;
        let parsed: Value = serde_json::from_str(&stdout)?;

        let duration_s = parsed
            .get("format")
            .and_then(|f| f.get("duration"))
            .and_then(|d| d.as_str())
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(0.0);

        let mut codecs = Vec::new();
        let mut resolution = "0x0".to_string();
        if let Some(streams) = parsed.get("streams").and_then(|s| s.as_array()) {
            for stream in streams {
                if let Some(codec) = stream.get("codec_name").and_then(|c| c.as_str()) {
                    codecs.push(codec.to_string());
                }
                if let (Some(w), Some(h)) = (
                    stream.get("width").and_then(|v| v.as_u64()),
                    stream.get("height").and_then(|v| v.as_u64()),
                ) {
                    resolution = format!("{w}x{h}");
                }
            }
        }

        let size_bytes = fs::metadata(path).await?.len();

        Ok(MediaProbe { duration_s, size_bytes, codecs, resolution })
    }
}
