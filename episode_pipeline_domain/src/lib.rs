// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

// Production code safety enforced via CI and `make lint-strict`
// (lib/bins checked separately from tests - tests may use unwrap/expect)

//! # Episode Pipeline Domain
//!
//! Pure, reusable business logic for the episode content-production
//! pipeline: entities, value objects, repository ports, driver ports, and
//! domain services. Nothing here depends on `tokio`, a SQL driver, or a
//! logging framework — those are infrastructure concerns.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Interface Layer                          │
//! │  (CLI, bootstrap)                                            │
//! └─────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Application Layer                          │
//! │  (pipeline executor, review coordinator, stage modules)      │
//! └─────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Domain Layer (this crate)                │
//! │  (entities, value objects, domain services, ports)           │
//! └─────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                Infrastructure Layer                         │
//! │  (sqlx repositories, filesystem, driver adapters)            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Core concepts
//!
//! - [`entities::Episode`] carries the status state machine (§3.1 of the
//!   design spec) that the rest of the system advances.
//! - [`value_objects::Stage`] is the closed set of stage identities; the
//!   pipeline-version-2 stage graph (§3.2) is exposed as
//!   [`value_objects::stage_graph_v2`].
//! - [`value_objects::ContentHash`] computes the content hashes that drive
//!   idempotency and cascade invalidation; [`services::PromptTemplateService`]
//!   hashes prompt template bodies with frontmatter stripped (§4.6).
//! - [`repositories`] defines the async storage ports; concrete SQLite
//!   implementations live in the `episode-pipeline` crate.
//! - [`ports`] defines the narrow driver interfaces (LLM, image
//!   generation, TTS, media, publish) that stage modules call through.

pub mod entities;
pub mod error;
pub mod ports;
pub mod repositories;
pub mod services;
pub mod value_objects;

pub use error::PipelineError;
