// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Episode Pipeline
//!
//! A stage-graph executor for a content-production pipeline: an episode
//! moves through download, transcription, correction, translation,
//! adaptation, chapterizing, image generation, text-to-speech, rendering,
//! and publishing, with three human review gates and per-episode cost
//! accounting along the way.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │          Interface Layer (episode-pipeline-bootstrap)        │
//! │  CLI parsing, signal handling, exit codes                    │
//! └─────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Application Layer (this crate)              │
//! │  pipeline executor, review coordinator, prompt registry,     │
//! │  cascade engine, batch selector, stage modules, use cases    │
//! └─────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────┐
//! │            Domain Layer (episode-pipeline-domain)            │
//! │  entities, value objects, repository/driver ports            │
//! └─────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                Infrastructure Layer (this crate)              │
//! │  sqlx-SQLite repositories, filesystem layout, driver          │
//! │  adapters, config loading, logging/observability              │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod application;
pub mod infrastructure;
pub mod presentation;

// Tests are organized as:
// - Unit tests: #[cfg(test)] modules within each source file
// - Integration tests: tests/ directory

pub use episode_pipeline_domain::{
    entities::Episode, error::PipelineError, value_objects::EpisodeStatus, value_objects::Stage,
};
