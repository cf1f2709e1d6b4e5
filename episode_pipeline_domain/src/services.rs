// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Synchronous, CPU-bound domain services. I/O-bound work (reading a
//! template off disk, calling a driver) belongs in the application or
//! infrastructure layers, which wrap these traits where needed.

pub mod prompt_template_service;

pub use prompt_template_service::{DelimitedFrontmatterParser, PromptFrontmatter, PromptTemplateService};
