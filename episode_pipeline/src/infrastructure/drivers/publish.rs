// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! YouTube Data API v3 video-upload [`PublishPort`] implementation.
//!
//! Uploads via the single-request `multipart/related` form rather than
//! the resumable-upload protocol: simpler, and sufficient for the
//! episode-length video files this pipeline produces.

use crate::infrastructure::drivers::retry_with_backoff;
use async_trait::async_trait;
use chrono::Utc;
use episode_pipeline_domain::ports::{PrivacyMode, PublishPort, PublishResponse};
use episode_pipeline_domain::PipelineError;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tracing::debug;

pub struct YoutubePublishDriver {
    client: Client,
    access_token: String,
    base_url: String,
    dry_run: bool,
}

impl YoutubePublishDriver {
    /// Reads `YOUTUBE_ACCESS_TOKEN` from the environment. Refreshing the
    /// OAuth token from a stored refresh token is out of scope; the
    /// caller's deployment is expected to rotate this externally.
    pub fn from_env(dry_run: bool) -> Result<Self, PipelineError> {
        let access_token = std::env::var("YOUTUBE_ACCESS_TOKEN")
            .map_err(|_| PipelineError::invalid_config("YOUTUBE_ACCESS_TOKEN is not set"))?;
        Ok(Self::new(access_token, "https://www.googleapis.com/upload/youtube/v3".to_string(), dry_run))
    }

    pub fn new(access_token: String, base_url: String, dry_run: bool) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(600))
            .build()
            .expect("reqwest client builds with default TLS backend");
        Self { client, access_token, base_url, dry_run }
    }

    fn privacy_str(privacy: PrivacyMode) -> &'static str {
        match privacy {
            PrivacyMode::Private => "private",
            PrivacyMode::Unlisted => "unlisted",
            PrivacyMode::Public => "public",
        }
    }
}

#[async_trait]
impl PublishPort for YoutubePublishDriver {
    async fn upload(&self, video_path: &Path, metadata: &Value, privacy: PrivacyMode) -> Result<PublishResponse, PipelineError> {
        if self.dry_run {
            debug!(?video_path, "dry-run: skipping YouTube upload");
            return Ok(PublishResponse { external_id: "dry-run-video-id".to_string(), published_at: Utc::now() });
        }

        let snippet = metadata
            .get("snippet")
            .cloned()
            .ok_or_else(|| PipelineError::input_invalid("publish metadata missing `snippet`"))?;
        let request_body = serde_json::json!({
            "snippet": snippet,
            "status": {"privacyStatus": Self::privacy_str(privacy)},
        });

        let video_bytes = fs::read(video_path).await?;
        let url = format!("{}/videos?part=snippet,status&uploadType=multipart", self.base_url);

        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", self.access_token))
            .map_err(|e| PipelineError::invalid_config(format!("malformed access token: {e}")))?;
        headers.insert(AUTHORIZATION, auth);

        retry_with_backoff(|| async {
            let metadata_part = Part::text(request_body.to_string()).mime_str("application/json; charset=UTF-8")
                .map_err(|e| PipelineError::internal_error(format!("building metadata part: {e}")))?;
            let video_part = Part::bytes(video_bytes.clone())
                .file_name(video_path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default())
                .mime_str("video/mp4")
                .map_err(|e| PipelineError::internal_error(format!("building video part: {e}")))?;
            let form = Form::new().part("metadata", metadata_part).part("video", video_part);

            let response = self
                .client
                .post(&url)
                .headers(headers.clone())
                .multipart(form)
                .send()
                .await
                .map_err(|e| PipelineError::driver_transient(format!("upload request failed: {e}")))?;

            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|e| PipelineError::driver_transient(format!("reading upload response: {e}")))?;

            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                return Err(PipelineError::driver_transient(format!("YouTube upload returned {status}: {text}")));
            }
            if !status.is_success() {
                return Err(PipelineError::driver_policy(format!("YouTube upload refused {status}: {text}")));
            }

            let parsed: Value = serde_json::from_str(&text)?;
            let external_id = parsed
                .get("id")
                .and_then(|v| v.as_str())
                .ok_or_else(|| PipelineError::internal_error("upload response missing video id"))?
                .to_string();

            Ok(PublishResponse { external_id, published_at: Utc::now() })
        })
        .await
    }
}
