// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `imagegen` (§3.2: `CHAPTERIZED → IMAGES_GENERATED`). The manifest is
//! the single source of truth for chapter-level recovery (§9): a chapter
//! is regenerated only if its manifest entry's text hash no longer
//! matches the chapter's current visual description.

use crate::application::stages::{write_atomic, PipelineContext, StageModule, StageWork};
use crate::infrastructure::filesystem::chapters::ChapterDocument;
use episode_pipeline_domain::entities::MediaAsset;
use episode_pipeline_domain::value_objects::{ArtifactType, ContentHash, MediaAssetType, Stage};
use episode_pipeline_domain::PipelineError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const STANDARD_COST_USD: f64 = 0.080;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageManifestEntry {
    pub chapter_id: String,
    pub text_hash: String,
    pub file_path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageManifest {
    pub entries: Vec<ImageManifestEntry>,
}

impl ImageManifest {
    async fn read(path: &std::path::Path) -> ImageManifest {
        match tokio::fs::read(path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => ImageManifest::default(),
        }
    }

    fn entry_for(&self, chapter_id: &str) -> Option<&ImageManifestEntry> {
        self.entries.iter().find(|e| e.chapter_id == chapter_id)
    }
}

fn visual_text_hash(chapter: &crate::infrastructure::filesystem::chapters::Chapter) -> ContentHash {
    let prompt = chapter.visual.image_prompt.as_deref().unwrap_or(&chapter.visual.description);
    ContentHash::of_parts([chapter.visual.description.as_bytes(), prompt.as_bytes()])
}

pub struct ImagegenStage;

#[async_trait::async_trait]
impl StageModule for ImagegenStage {
    fn stage(&self) -> Stage {
        Stage::Imagegen
    }

    fn declared_inputs(&self, ctx: &PipelineContext, episode_id: &str) -> Vec<PathBuf> {
        vec![ctx.layout(episode_id).chapters_json()]
    }

    fn declared_outputs(&self, ctx: &PipelineContext, episode_id: &str) -> Vec<PathBuf> {
        vec![ctx.layout(episode_id).images_manifest()]
    }

    fn conservative_cost_estimate(&self) -> f64 {
        1.0
    }

    async fn work(&self, ctx: &PipelineContext, episode_id: &str, _feedback: Option<&str>, force: bool) -> Result<StageWork, PipelineError> {
        let layout = ctx.layout(episode_id);
        let document = ChapterDocument::read(&layout.chapters_json()).await?;
        let existing = ImageManifest::read(&layout.images_manifest()).await;

        let mut new_entries = Vec::with_capacity(document.chapters.len());
        let mut total_cost = 0.0;
        let mut regenerated = 0usize;

        for chapter in &document.chapters {
            let fresh_hash = visual_text_hash(chapter);
            let output_path = layout.chapter_image(&chapter.chapter_id, "hero");

            let reusable = !force
                && existing
                    .entry_for(&chapter.chapter_id)
                    .is_some_and(|entry| entry.text_hash == fresh_hash.to_hex())
                && tokio::fs::metadata(&output_path).await.is_ok();

            if reusable {
                new_entries.push(ImageManifestEntry {
                    chapter_id: chapter.chapter_id.clone(),
                    text_hash: fresh_hash.to_hex(),
                    file_path: output_path.display().to_string(),
                });
                continue;
            }

            let prompt = chapter.visual.image_prompt.as_deref().unwrap_or(&chapter.visual.description);
            let response = ctx
                .imagegen
                .generate(prompt, &ctx.settings.imagegen.size, &ctx.settings.imagegen.quality)
                .await?;
            write_atomic(&output_path, &response.bytes).await?;

            let asset = MediaAsset::new(
                episode_id.to_string(),
                Some(chapter.chapter_id.clone()),
                MediaAssetType::Image,
                output_path.display().to_string(),
                "image/png".to_string(),
                response.bytes.len() as u64,
                None,
                serde_json::json!({ "revised_prompt": response.revised_prompt }),
                None,
                ctx.clock.now_utc(),
            );
            ctx.media_repo.insert(&asset).await?;

            total_cost += response.cost_usd.max(STANDARD_COST_USD);
            regenerated += 1;
            new_entries.push(ImageManifestEntry {
                chapter_id: chapter.chapter_id.clone(),
                text_hash: fresh_hash.to_hex(),
                file_path: output_path.display().to_string(),
            });
        }

        let manifest = ImageManifest { entries: new_entries };
        let output = layout.images_manifest();
        write_atomic(&output, serde_json::to_vec_pretty(&manifest)?.as_slice()).await?;

        let mut work = StageWork::new(
            ArtifactType::Images,
            output,
            format!("generated {regenerated} of {} chapter images", document.chapters.len()),
        );
        work.cost_usd = total_cost;
        Ok(work)
    }
}
