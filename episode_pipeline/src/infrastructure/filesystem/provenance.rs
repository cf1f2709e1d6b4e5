// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Stage provenance (§4.4): the closed JSON schema every stage module
//! writes alongside its outputs, read back by [`crate::application::services::cascade::CascadeEngine`]
//! to decide whether a stage's outputs are current.

use episode_pipeline_domain::PipelineError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provenance {
    pub stage: String,
    pub episode_id: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_version: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_params: Option<Value>,
    pub input_files: Vec<String>,
    pub input_content_hash: String,
    pub output_files: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_tokens: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_tokens: Option<i64>,
    pub cost_usd: f64,
    pub duration_seconds: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments_processed: Option<i64>,
}

impl Provenance {
    pub async fn write(&self, path: &Path) -> Result<(), PipelineError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(self)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    pub async fn read(path: &Path) -> Result<Option<Self>, PipelineError> {
        match tokio::fs::read(path).await {
            Ok(bytes) => {
                let provenance = serde_json::from_slice(&bytes)?;
                Ok(Some(provenance))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Provenance {
        Provenance {
            stage: "correct".to_string(),
            episode_id: "ep123".to_string(),
            timestamp: chrono::DateTime::from_timestamp(0, 0).unwrap(),
            prompt_name: Some("correct_transcript".to_string()),
            prompt_version: Some(3),
            prompt_hash: Some("abc123".to_string()),
            model: Some("gpt-4o".to_string()),
            model_params: None,
            input_files: vec!["transcript.clean.de.txt".to_string()],
            input_content_hash: "deadbeef".to_string(),
            output_files: vec!["transcript.corrected.de.txt".to_string()],
            input_tokens: Some(1200),
            output_tokens: Some(1300),
            cost_usd: 0.05,
            duration_seconds: 4.2,
            segments_processed: None,
        }
    }

    #[tokio::test]
    async fn provenance_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("provenance").join("correct_provenance.json");
        let original = sample();
        original.write(&path).await.unwrap();
        let loaded = Provenance::read(&path).await.unwrap().unwrap();
        assert_eq!(loaded.stage, original.stage);
        assert_eq!(loaded.input_content_hash, original.input_content_hash);
        assert_eq!(loaded.prompt_hash, original.prompt_hash);
    }

    #[tokio::test]
    async fn missing_provenance_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope_provenance.json");
        assert!(Provenance::read(&path).await.unwrap().is_none());
    }

    #[test]
    fn optional_fields_are_omitted_when_absent() {
        let mut minimal = sample();
        minimal.prompt_name = None;
        minimal.prompt_version = None;
        minimal.prompt_hash = None;
        minimal.model = None;
        minimal.model_params = None;
        minimal.input_tokens = None;
        minimal.output_tokens = None;
        minimal.segments_processed = None;
        let json = serde_json::to_string(&minimal).unwrap();
        assert!(!json.contains("prompt_name"));
        assert!(!json.contains("segments_processed"));
    }
}
