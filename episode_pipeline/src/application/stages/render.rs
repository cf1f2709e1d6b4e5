// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `render` (§3.2: `TTS_DONE → RENDERED`). Encodes one segment per
//! chapter, then stream-copy concatenates them into the episode draft.

use crate::application::stages::imagegen::ImageManifest;
use crate::application::stages::tts::TtsManifest;
use crate::application::stages::{write_atomic, PipelineContext, StageModule, StageWork};
use crate::infrastructure::filesystem::chapters::{Chapter, ChapterDocument};
use crate::infrastructure::config::RenderSettings;
use episode_pipeline_domain::ports::EncodeSegmentRequest;
use episode_pipeline_domain::value_objects::{ArtifactType, ContentHash, Stage};
use episode_pipeline_domain::PipelineError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSegmentEntry {
    pub chapter_id: String,
    pub text_hash: String,
    pub file_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderManifest {
    pub segments: Vec<String>,
    pub duration_s: f64,
    pub resolution: String,
    #[serde(default)]
    pub entries: Vec<RenderSegmentEntry>,
}

impl RenderManifest {
    async fn read(path: &std::path::Path) -> RenderManifest {
        match tokio::fs::read(path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|_| RenderManifest::empty()),
            Err(_) => RenderManifest::empty(),
        }
    }

    fn empty() -> Self {
        Self { segments: vec![], duration_s: 0.0, resolution: String::new(), entries: vec![] }
    }

    fn entry_for(&self, chapter_id: &str) -> Option<&RenderSegmentEntry> {
        self.entries.iter().find(|e| e.chapter_id == chapter_id)
    }
}

/// Canonical-text hash for one chapter's segment (§4.3 "Artifact hashing
/// across implementations"): overlays, transitions and active render
/// settings, plus the already-canonical `text_hash` values the imagegen
/// and tts manifests carry for this chapter — never the binary image or
/// audio bytes those manifests point at.
fn segment_text_hash(chapter: &Chapter, image_text_hash: &str, tts_text_hash: &str, render: &RenderSettings) -> ContentHash {
    let overlays = chapter.overlays.join("\n");
    ContentHash::of_parts([
        overlays.as_bytes(),
        chapter.transitions.in_.as_bytes(),
        chapter.transitions.out.as_bytes(),
        image_text_hash.as_bytes(),
        tts_text_hash.as_bytes(),
        render.resolution.as_bytes(),
        render.fps.to_string().as_bytes(),
        render.crf.to_string().as_bytes(),
        render.preset.as_bytes(),
        render.audio_bitrate.as_bytes(),
        render.transition_duration_s.to_string().as_bytes(),
    ])
}

pub struct RenderStage;

#[async_trait::async_trait]
impl StageModule for RenderStage {
    fn stage(&self) -> Stage {
        Stage::Render
    }

    fn declared_inputs(&self, ctx: &PipelineContext, episode_id: &str) -> Vec<PathBuf> {
        let layout = ctx.layout(episode_id);
        vec![layout.chapters_json(), layout.images_manifest(), layout.tts_manifest()]
    }

    fn declared_outputs(&self, ctx: &PipelineContext, episode_id: &str) -> Vec<PathBuf> {
        vec![ctx.layout(episode_id).render_draft()]
    }

    fn conservative_cost_estimate(&self) -> f64 {
        0.0
    }

    async fn work(&self, ctx: &PipelineContext, episode_id: &str, _feedback: Option<&str>, force: bool) -> Result<StageWork, PipelineError> {
        let layout = ctx.layout(episode_id);
        let document = ChapterDocument::read(&layout.chapters_json()).await?;
        let images: ImageManifest = serde_json::from_slice(&tokio::fs::read(layout.images_manifest()).await?)?;
        let tts: TtsManifest = serde_json::from_slice(&tokio::fs::read(layout.tts_manifest()).await?)?;
        let existing = RenderManifest::read(&layout.render_manifest()).await;

        let render = &ctx.settings.render;
        let mut segments = Vec::with_capacity(document.chapters.len());
        let mut new_entries = Vec::with_capacity(document.chapters.len());
        let mut reused = 0usize;

        for chapter in &document.chapters {
            let image_entry = images
                .entries
                .iter()
                .find(|e| e.chapter_id == chapter.chapter_id)
                .ok_or_else(|| PipelineError::input_invalid(format!("no image manifest entry for {}", chapter.chapter_id)))?;
            let tts_entry = tts
                .entries
                .iter()
                .find(|e| e.chapter_id == chapter.chapter_id)
                .ok_or_else(|| PipelineError::input_invalid(format!("no tts manifest entry for {}", chapter.chapter_id)))?;

            let segment_path = layout.render_segment(&chapter.chapter_id);
            let fresh_hash = segment_text_hash(chapter, &image_entry.text_hash, &tts_entry.text_hash, render);

            let reusable = !force
                && existing
                    .entry_for(&chapter.chapter_id)
                    .is_some_and(|entry| entry.text_hash == fresh_hash.to_hex())
                && tokio::fs::metadata(&segment_path).await.is_ok();

            if reusable {
                reused += 1;
                new_entries.push(RenderSegmentEntry {
                    chapter_id: chapter.chapter_id.clone(),
                    text_hash: fresh_hash.to_hex(),
                    file_path: segment_path.display().to_string(),
                });
                segments.push(segment_path);
                continue;
            }

            let request = EncodeSegmentRequest {
                image_path: std::path::Path::new(&image_entry.file_path),
                audio_path: std::path::Path::new(&tts_entry.file_path),
                overlays: &chapter.overlays,
                resolution: &render.resolution,
                fps: render.fps,
                crf: render.crf,
                preset: &render.preset,
                audio_bitrate: &render.audio_bitrate,
                fade_in_s: Some(render.transition_duration_s),
                fade_out_s: Some(render.transition_duration_s),
            };
            ctx.media.encode_segment(request, &segment_path).await?;
            new_entries.push(RenderSegmentEntry {
                chapter_id: chapter.chapter_id.clone(),
                text_hash: fresh_hash.to_hex(),
                file_path: segment_path.display().to_string(),
            });
            segments.push(segment_path);
        }

        let draft = layout.render_draft();
        ctx.media.concat(&segments, &draft).await?;
        let probe = ctx.media.probe(&draft).await?;

        let manifest = RenderManifest {
            segments: segments.iter().map(|p| p.display().to_string()).collect(),
            duration_s: probe.duration_s,
            resolution: probe.resolution.clone(),
            entries: new_entries,
        };
        write_atomic(&layout.render_manifest(), serde_json::to_vec_pretty(&manifest)?.as_slice()).await?;

        Ok(StageWork::new(
            ArtifactType::Render,
            draft,
            format!(
                "rendered {} of {} segments, {:.1}s",
                manifest.segments.len() - reused,
                manifest.segments.len(),
                probe.duration_s
            ),
        ))
    }
}
