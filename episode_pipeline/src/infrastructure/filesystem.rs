// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Per-episode filesystem layout (§6.1), the chapter document schema
//! (§6.2), and stage provenance (§4.4). `.stale` cascade markers are
//! handled by [`crate::application::services::cascade::CascadeEngine`]
//! directly since they are pure path-and-JSON helpers, not a separate
//! abstraction.

pub mod chapters;
pub mod layout;
pub mod provenance;
