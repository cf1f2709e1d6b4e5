// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! OpenAI-speech-style [`TtsPort`] implementation. Synthesizes a single
//! chunk per call; chunking and MP3 concatenation live in the `tts` stage
//! module, not here (§6.3).

use crate::infrastructure::drivers::retry_with_backoff;
use async_trait::async_trait;
use episode_pipeline_domain::ports::{TtsPort, TtsResponse};
use episode_pipeline_domain::PipelineError;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

const COST_PER_CHAR_USD: f64 = 0.000015;

pub struct OpenAiTtsDriver {
    client: Client,
    api_key: String,
    base_url: String,
    dry_run: bool,
}

impl OpenAiTtsDriver {
    pub fn from_env(dry_run: bool) -> Result<Self, PipelineError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| PipelineError::invalid_config("OPENAI_API_KEY is not set"))?;
        Ok(Self::new(api_key, "https://api.openai.com/v1".to_string(), dry_run))
    }

    pub fn new(api_key: String, base_url: String, dry_run: bool) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("reqwest client builds with default TLS backend");
        Self { client, api_key, base_url, dry_run }
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
impl TtsPort for OpenAiTtsDriver {
    async fn synthesize(
        &self,
        text: &str,
        voice: &str,
        model: &str,
        params: Option<&Value>,
    ) -> Result<TtsResponse, PipelineError> {
        let character_count = text.chars().count() as u32;

        if self.dry_run {
            debug!(voice, model, character_count, "dry-run: skipping TTS call");
            return Ok(TtsResponse { mp3_bytes: Vec::new(), duration_s: 0.0, character_count, cost_usd: 0.0 });
        }

        let mut body = json!({
            "model": model,
            "voice": voice,
            "input": text,
            "response_format": "mp3",
        });
        if let Some(extra) = params {
            if let (Some(body_obj), Some(extra_obj)) = (body.as_object_mut(), extra.as_object()) {
                for (key, value) in extra_obj {
                    body_obj.insert(key.clone(), value.clone());
                }
            }
        }

        let url = format!("{}/audio/speech", self.base_url);
        let headers = self.headers()?;

        retry_with_backoff(|| async {
            let response = self
                .client
                .post(&url)
                .headers(headers.clone())
                .json(&body)
                .send()
                .await
                .map_err(|e| PipelineError::driver_transient(format!("TTS request failed: {e}")))?;

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                let text = response.text().await.unwrap_or_default();
                return Err(PipelineError::driver_transient(format!("TTS provider returned {status}: {text}")));
            }
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                return Err(PipelineError::driver_policy(format!("TTS provider refused request {status}: {text}")));
            }

            let mp3_bytes = response
                .bytes()
                .await
                .map_err(|e| PipelineError::driver_transient(format!("reading TTS response: {e}")))?
                .to_vec();

            // Average spoken-word rate: ~15 characters/second for English
            // prose at a conversational pace, used only as an estimate
            // until the render stage probes the real duration via ffmpeg.
            let duration_s = character_count as f64 / 15.0;
            let cost_usd = character_count as f64 * COST_PER_CHAR_USD;

            Ok(TtsResponse { mp3_bytes, duration_s, character_count, cost_usd })
        })
        .await
    }
}
