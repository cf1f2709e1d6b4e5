// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! OpenAI-images-style [`ImageGenPort`] implementation.

use crate::infrastructure::drivers::retry_with_backoff;
use async_trait::async_trait;
use base64::Engine;
use episode_pipeline_domain::ports::{ImageGenPort, ImageResponse};
use episode_pipeline_domain::PipelineError;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

const COST_PER_IMAGE_USD: f64 = 0.04;

pub struct OpenAiImageGenDriver {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    dry_run: bool,
}

impl OpenAiImageGenDriver {
    pub fn from_env(model: impl Into<String>, dry_run: bool) -> Result<Self, PipelineError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| PipelineError::invalid_config("OPENAI_API_KEY is not set"))?;
        Ok(Self::new(api_key, "https://api.openai.com/v1".to_string(), model.into(), dry_run))
    }

    pub fn new(api_key: String, base_url: String, model: String, dry_run: bool) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(180))
            .build()
            .expect("reqwest client builds with default TLS backend");
        Self { client, api_key, base_url, model, dry_run }
    }

    fn headers(&self) -> Result<HeaderMap, PipelineError> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|e| PipelineError::invalid_config(format!("malformed api key: {e}")))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

#[async_trait]
impl ImageGenPort for OpenAiImageGenDriver {
    async fn generate(&self, prompt: &str, size: &str, quality: &str) -> Result<ImageResponse, PipelineError> {
        if self.dry_run {
            debug!(size, quality, "dry-run: skipping image generation");
            return Ok(ImageResponse { bytes: Vec::new(), revised_prompt: None, cost_usd: 0.0 });
        }

        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "size": size,
            "quality": quality,
            "n": 1,
            "response_format": "b64_json",
        });
        let url = format!("{}/images/generations", self.base_url);
        let headers = self.headers()?;

        retry_with_backoff(|| async {
            let response = self
                .client
                .post(&url)
                .headers(headers.clone())
                .json(&body)
                .send()
                .await
                .map_err(|e| PipelineError::driver_transient(format!("image request failed: {e}")))?;

            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|e| PipelineError::driver_transient(format!("reading image response: {e}")))?;

            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                return Err(PipelineError::driver_transient(format!("image provider returned {status}: {text}")));
            }
            if !status.is_success() {
                return Err(PipelineError::driver_policy(format!("image provider refused request {status}: {text}")));
            }

            let parsed: Value = serde_json::from_str(&text)?;
            let entry = parsed
                .get("data")
                .and_then(|d| d.get(0))
                .ok_or_else(|| PipelineError::internal_error("malformed image generation response"))?;
            let b64 = entry
                .get("b64_json")
                .and_then(|v| v.as_str())
                .ok_or_else(|| PipelineError::internal_error("image response missing b64_json"))?;
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(b64)
                .map_err(|e| PipelineError::internal_error(format!("malformed base64 image payload: {e}")))?;
            let revised_prompt = entry.get("revised_prompt").and_then(|v| v.as_str()).map(str::to_string);

            Ok(ImageResponse { bytes, revised_prompt, cost_usd: COST_PER_IMAGE_USD })
        })
        .await
    }
}
