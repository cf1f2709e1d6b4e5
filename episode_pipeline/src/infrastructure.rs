// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Adapters to the outside world: settings loading, the SQLite
//! repositories, the per-episode filesystem layout, outbound driver ports
//! (§6.5), and process-wide logging (§6.6).

pub mod config;
pub mod drivers;
pub mod filesystem;
pub mod logging;
pub mod repositories;
