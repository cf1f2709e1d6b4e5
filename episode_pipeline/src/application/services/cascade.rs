// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Idempotency & cascade engine (§4.3): input content hashing, the
//! currentness predicate stage modules use to decide `skipped` vs `work`,
//! and `.stale` marker read/write/removal.

use crate::application::clock::SharedClock;
use crate::infrastructure::filesystem::provenance::Provenance;
use episode_pipeline_domain::value_objects::{ContentHash, Stage};
use episode_pipeline_domain::PipelineError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Sibling-file marker written next to an invalidated output (§4.3
/// "Output declaration").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaleMarker {
    pub invalidated_at: chrono::DateTime<chrono::Utc>,
    pub invalidated_by: String,
    pub reason: String,
}

pub struct CascadeEngine {
    clock: SharedClock,
}

impl CascadeEngine {
    pub fn new(clock: SharedClock) -> Self {
        Self { clock }
    }

    /// SHA-256 over a deterministic canonical serialization of a stage's
    /// input set: the bytes of every declared input file, in order, plus
    /// any structured extras (upstream content hashes, injected reviewer
    /// feedback) joined as UTF-8 parts (§4.3 "Input hashing").
    pub async fn compute_input_hash(&self, files: &[PathBuf], extra_parts: &[String]) -> Result<ContentHash, PipelineError> {
        let mut parts: Vec<Vec<u8>> = Vec::with_capacity(files.len() + extra_parts.len());
        for file in files {
            let bytes = tokio::fs::read(file).await.map_err(|e| {
                PipelineError::input_invalid(format!("missing stage input {}: {e}", file.display()))
            })?;
            parts.push(bytes);
        }
        for extra in extra_parts {
            parts.push(extra.as_bytes().to_vec());
        }
        let refs: Vec<&[u8]> = parts.iter().map(|p| p.as_slice()).collect();
        Ok(ContentHash::of_parts(refs))
    }

    fn stale_marker_path(output: &Path) -> PathBuf {
        let mut name = output.file_name().unwrap_or_default().to_os_string();
        name.push(".stale");
        output.with_file_name(name)
    }

    /// §4.2 step 2 / §4.3 "Currentness predicate": fails (i.e. work is
    /// needed) if any output is missing, any `.stale` marker exists, or
    /// either hash changed from what provenance recorded.
    pub async fn is_current(
        &self,
        outputs: &[PathBuf],
        provenance: Option<&Provenance>,
        fresh_input_hash: &ContentHash,
        fresh_prompt_hash: Option<&ContentHash>,
    ) -> bool {
        for output in outputs {
            if tokio::fs::metadata(output).await.is_err() {
                return false;
            }
            if tokio::fs::metadata(Self::stale_marker_path(output)).await.is_ok() {
                return false;
            }
        }
        let Some(provenance) = provenance else {
            return false;
        };
        if provenance.input_content_hash != fresh_input_hash.to_hex() {
            return false;
        }
        match (provenance.prompt_hash.as_deref(), fresh_prompt_hash) {
            (Some(recorded), Some(fresh)) => recorded == fresh.to_hex(),
            (None, None) => true,
            _ => false,
        }
    }

    /// Writes `.stale` markers next to every declared output of each stage
    /// `stage` invalidates (§4.3 downstream map), via `outputs_for`, which
    /// maps an invalidated stage to its on-disk output paths for this
    /// episode.
    pub async fn cascade_invalidate(
        &self,
        stage: Stage,
        reason: &str,
        outputs_for: impl Fn(Stage) -> Vec<PathBuf>,
    ) -> Result<(), PipelineError> {
        for downstream in stage.invalidates() {
            for output in outputs_for(*downstream) {
                self.write_stale_marker(&output, stage, reason).await?;
            }
        }
        Ok(())
    }

    pub async fn write_stale_marker(&self, output: &Path, invalidated_by: Stage, reason: &str) -> Result<(), PipelineError> {
        let marker = StaleMarker {
            invalidated_at: self.clock.now_utc(),
            invalidated_by: invalidated_by.as_str().to_string(),
            reason: reason.to_string(),
        };
        let path = Self::stale_marker_path(output);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(&marker)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Removes a stale marker after its output has been regenerated.
    pub async fn clear_stale_marker(&self, output: &Path) -> Result<(), PipelineError> {
        let path = Self::stale_marker_path(output);
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::clock::FixedClock;
    use std::sync::Arc;

    fn clock() -> SharedClock {
        Arc::new(FixedClock(chrono::DateTime::from_timestamp(0, 0).unwrap()))
    }

    #[tokio::test]
    async fn input_hash_changes_when_file_content_changes() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        tokio::fs::write(&file, b"hello").await.unwrap();
        let engine = CascadeEngine::new(clock());
        let h1 = engine.compute_input_hash(&[file.clone()], &[]).await.unwrap();
        tokio::fs::write(&file, b"hello!").await.unwrap();
        let h2 = engine.compute_input_hash(&[file], &[]).await.unwrap();
        assert_ne!(h1, h2);
    }

    #[tokio::test]
    async fn missing_output_fails_currentness() {
        let engine = CascadeEngine::new(clock());
        let missing = PathBuf::from("/nonexistent/output.txt");
        let fresh = ContentHash::of(b"x");
        assert!(!engine.is_current(&[missing], None, &fresh, None).await);
    }

    #[tokio::test]
    async fn stale_marker_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.txt");
        tokio::fs::write(&output, b"content").await.unwrap();
        let engine = CascadeEngine::new(clock());
        engine.write_stale_marker(&output, Stage::Correct, "edited upstream").await.unwrap();
        let marker_path = CascadeEngine::stale_marker_path(&output);
        assert!(tokio::fs::metadata(&marker_path).await.is_ok());
        engine.clear_stale_marker(&output).await.unwrap();
        assert!(tokio::fs::metadata(&marker_path).await.is_err());
    }
}
