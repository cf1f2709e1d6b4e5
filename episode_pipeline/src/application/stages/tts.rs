// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `tts` (§3.2: `IMAGES_GENERATED → TTS_DONE`). Chunking long narration at
//! sentence boundaries below [`TTS_CHUNK_CEILING_CHARS`] is the port
//! implementation's responsibility (§6.3); this module calls
//! [`TtsPort::synthesize`] once per chapter with the full narration text.

use crate::application::stages::{write_atomic, PipelineContext, StageModule, StageWork};
use crate::infrastructure::filesystem::chapters::ChapterDocument;
use episode_pipeline_domain::entities::MediaAsset;
use episode_pipeline_domain::value_objects::{ArtifactType, ContentHash, MediaAssetType, Stage};
use episode_pipeline_domain::PipelineError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const COST_PER_1000_CHARS_USD: f64 = 0.30;
const DEFAULT_VOICE: &str = "tr-adapt-narrator";
const DEFAULT_MODEL: &str = "tts-1-hd";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsManifestEntry {
    pub chapter_id: String,
    pub text_hash: String,
    pub file_path: String,
    pub duration_s: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TtsManifest {
    pub entries: Vec<TtsManifestEntry>,
}

impl TtsManifest {
    async fn read(path: &std::path::Path) -> TtsManifest {
        match tokio::fs::read(path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => TtsManifest::default(),
        }
    }

    fn entry_for(&self, chapter_id: &str) -> Option<&TtsManifestEntry> {
        self.entries.iter().find(|e| e.chapter_id == chapter_id)
    }
}

pub struct TtsStage;

#[async_trait::async_trait]
impl StageModule for TtsStage {
    fn stage(&self) -> Stage {
        Stage::Tts
    }

    fn declared_inputs(&self, ctx: &PipelineContext, episode_id: &str) -> Vec<PathBuf> {
        vec![ctx.layout(episode_id).chapters_json()]
    }

    fn declared_outputs(&self, ctx: &PipelineContext, episode_id: &str) -> Vec<PathBuf> {
        vec![ctx.layout(episode_id).tts_manifest()]
    }

    fn conservative_cost_estimate(&self) -> f64 {
        0.50
    }

    async fn work(&self, ctx: &PipelineContext, episode_id: &str, _feedback: Option<&str>, force: bool) -> Result<StageWork, PipelineError> {
        let layout = ctx.layout(episode_id);
        let document = ChapterDocument::read(&layout.chapters_json()).await?;
        let existing = TtsManifest::read(&layout.tts_manifest()).await;

        let mut new_entries = Vec::with_capacity(document.chapters.len());
        let mut total_cost = 0.0;
        let mut regenerated = 0usize;

        for chapter in &document.chapters {
            let fresh_hash = ContentHash::of(chapter.narration.text.as_bytes());
            let output_path = layout.chapter_audio(&chapter.chapter_id);

            let reusable = !force
                && existing
                    .entry_for(&chapter.chapter_id)
                    .is_some_and(|entry| entry.text_hash == fresh_hash.to_hex())
                && tokio::fs::metadata(&output_path).await.is_ok();

            if let Some(entry) = existing.entry_for(&chapter.chapter_id).filter(|_| reusable) {
                new_entries.push(entry.clone());
                continue;
            }

            let response = ctx
                .tts
                .synthesize(&chapter.narration.text, DEFAULT_VOICE, DEFAULT_MODEL, None)
                .await?;
            write_atomic(&output_path, &response.mp3_bytes).await?;

            let asset = MediaAsset::new(
                episode_id.to_string(),
                Some(chapter.chapter_id.clone()),
                MediaAssetType::Audio,
                output_path.display().to_string(),
                "audio/mpeg".to_string(),
                response.mp3_bytes.len() as u64,
                Some(response.duration_s),
                serde_json::json!({ "character_count": response.character_count }),
                None,
                ctx.clock.now_utc(),
            );
            ctx.media_repo.insert(&asset).await?;

            total_cost += response
                .cost_usd
                .max((response.character_count as f64 / 1000.0) * COST_PER_1000_CHARS_USD);
            regenerated += 1;
            new_entries.push(TtsManifestEntry {
                chapter_id: chapter.chapter_id.clone(),
                text_hash: fresh_hash.to_hex(),
                file_path: output_path.display().to_string(),
                duration_s: response.duration_s,
            });
        }

        let manifest = TtsManifest { entries: new_entries };
        let output = layout.tts_manifest();
        write_atomic(&output, serde_json::to_vec_pretty(&manifest)?.as_slice()).await?;

        let mut work = StageWork::new(
            ArtifactType::TtsAudio,
            output,
            format!("synthesized {regenerated} of {} chapter narrations", document.chapters.len()),
        );
        work.cost_usd = total_cost;
        Ok(work)
    }
}
