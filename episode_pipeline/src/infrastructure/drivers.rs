// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Outbound driver port implementations (§6.3, §6.5): LLM, image
//! generation, text-to-speech, media encoding, and publish. Every driver
//! takes a `dry_run` flag at construction and, when set, skips the real
//! call entirely and returns a canned response so the rest of the pipeline
//! still exercises its state transitions (§6.5).

pub mod imagegen;
pub mod llm;
pub mod media;
pub mod publish;
pub mod tts;

use episode_pipeline_domain::PipelineError;
use std::future::Future;
use std::time::Duration;

/// Retries a driver call up to three times total on
/// [`PipelineError::DriverTransient`], backing off 1s/2s/4s between
/// attempts (§5). Any other error, or the final attempt's error, is
/// returned as-is.
pub(crate) async fn retry_with_backoff<T, F, Fut>(mut attempt: F) -> Result<T, PipelineError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PipelineError>>,
{
    const DELAYS_MS: [u64; 2] = [1000, 2000];
    let mut last_err = None;
    for delay_ms in DELAYS_MS {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_recoverable() => {
                last_err = Some(err);
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
            Err(err) => return Err(err),
        }
    }
    attempt().await.map_err(|err| last_err.take().unwrap_or(err))
}
