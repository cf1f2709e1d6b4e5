// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Stage driver ports (§6.3): the narrow async interfaces stage modules
//! depend on. Concrete adapters (real or dry-run) live in the
//! `episode-pipeline` crate's infrastructure layer.

pub mod imagegen_port;
pub mod llm_port;
pub mod media_port;
pub mod publish_port;
pub mod tts_port;

pub use imagegen_port::{ImageGenPort, ImageResponse};
pub use llm_port::{LlmPort, LlmResponse};
pub use media_port::{EncodeSegmentRequest, MediaPort, MediaProbe};
pub use publish_port::{PrivacyMode, PublishPort, PublishResponse};
pub use tts_port::{TtsPort, TtsResponse, TTS_CHUNK_CEILING_CHARS};
