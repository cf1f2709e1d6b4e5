// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! OpenAI-chat-completions-style [`LlmPort`] implementation.

use crate::infrastructure::drivers::retry_with_backoff;
use async_trait::async_trait;
use episode_pipeline_domain::ports::{LlmPort, LlmResponse};
use episode_pipeline_domain::PipelineError;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// Per-million-token list prices used to price a completion client-side,
/// since the Chat Completions response reports usage in tokens, not
/// dollars. Approximate, gpt-4o-class pricing; real invoices are the
/// source of truth, this is only for the cost-cap guard (§6.2).
const INPUT_COST_PER_MTOK_USD: f64 = 2.50;
const OUTPUT_COST_PER_MTOK_USD: f64 = 10.00;

pub struct OpenAiLlmDriver {
    client: Client,
    api_key: String,
    base_url: String,
    dry_run: bool,
}

impl OpenAiLlmDriver {
    /// Reads `OPENAI_API_KEY` from the environment; [`PipelineSettings`]
    /// carries no credential fields (§6.4), so every driver owns its own
    /// lookup.
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
impl LlmPort for OpenAiLlmDriver {
    async fn call(
        &self,
        system: &str,
        user: &str,
        model: &str,
        params: Option<&Value>,
    ) -> Result<LlmResponse, PipelineError> {
        if self.dry_run {
            debug!(model, "dry-run: skipping LLM call");
            return Ok(LlmResponse {
                text: format!("[dry-run output for {model}]"),
                input_tokens: 0,
                output_tokens: 0,
                cost_usd: 0.0,
            });
        }

        let mut body = json!({
            "model": model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
        });
        if let Some(extra) = params {
            if let (Some(body_obj), Some(extra_obj)) = (body.as_object_mut(), extra.as_object()) {
                for (key, value) in extra_obj {
                    body_obj.insert(key.clone(), value.clone());
                }
            }
        }

        let url = format!("{}/chat/completions", self.base_url);
        let headers = self.headers()?;

        retry_with_backoff(|| async {
            let response = self
                .client
                .post(&url)
                .headers(headers.clone())
                .json(&body)
                .send()
                .await
                .map_err(|e| PipelineError::driver_transient(format!("LLM request failed: {e}")))?;

            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|e| PipelineError::driver_transient(format!("reading LLM response: {e}")))?;

            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                return Err(PipelineError::driver_transient(format!(
                    "LLM provider returned {status}: {text}"
                )));
            }
            if status == StatusCode::BAD_REQUEST && text.contains("content_policy") {
                return Err(PipelineError::driver_policy(format!("content policy refusal: {text}")));
            }
            if !status.is_success() {
                return Err(PipelineError::driver_policy(format!("LLM provider returned {status}: {text}")));
            }

            let parsed: Value = serde_json::from_str(&text)?;
            if parsed
                .get("choices")
                .and_then(|c| c.get(0))
                .and_then(|c| c.get("finish_reason"))
                .and_then(|r| r.as_str())
                == Some("content_filter")
            {
                return Err(PipelineError::driver_policy("content filter triggered"));
            }

            let content = parsed
                .get("choices")
                .and_then(|c| c.get(0))
                .and_then(|c| c.get("message"))
                .and_then(|m| m.get("content"))
                .and_then(|t| t.as_str())
                .ok_or_else(|| PipelineError::internal_error("malformed chat completion response"))?
                .to_string();

            let input_tokens = parsed
                .get("usage")
                .and_then(|u| u.get("prompt_tokens"))
                .and_then(|t| t.as_u64())
                .unwrap_or(0) as u32;
            let output_tokens = parsed
                .get("usage")
                .and_then(|u| u.get("completion_tokens"))
                .and_then(|t| t.as_u64())
                .unwrap_or(0) as u32;
            let cost_usd = input_tokens as f64 / 1_000_000.0 * INPUT_COST_PER_MTOK_USD
                + output_tokens as f64 / 1_000_000.0 * OUTPUT_COST_PER_MTOK_USD;

            debug!(model, input_tokens, output_tokens, "LLM call accounted");

            Ok(LlmResponse { text: content, input_tokens, output_tokens, cost_usd })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_model_is_proportional_to_tokens() {
        let cheap = 100_f64 / 1_000_000.0 * INPUT_COST_PER_MTOK_USD;
        let expensive = 1_000_f64 / 1_000_000.0 * INPUT_COST_PER_MTOK_USD;
        assert!(expensive > cheap);
    }
}
