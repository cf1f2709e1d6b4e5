// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Bootstrap Module
//!
//! The bootstrap module sits **outside** the enterprise application layers
//! (domain, application, infrastructure) and provides:
//!
//! - **Platform abstraction** - OS-specific operations (POSIX vs Windows)
//! - **Signal handling** - Graceful shutdown (SIGTERM, SIGINT, SIGHUP)
//! - **Argument parsing** - Secure CLI argument validation
//! - **Error handling** - Unix exit code mapping
//! - **Async coordination** - Shutdown coordination and cancellation
//!
//! ## Key Design Principles
//!
//! 1. **Separation from Enterprise Layers** - bootstrap can reach into
//!    `episode_pipeline`'s application/infrastructure layers; those layers
//!    never reach back into bootstrap.
//! 2. **Platform Abstraction** - OS-specific functionality lives behind the
//!    [`platform::Platform`] trait, selected at compile time.
//! 3. **Graceful Shutdown** - signal handlers feed a [`shutdown::ShutdownCoordinator`]
//!    with a grace period before forced exit.
//! 4. **Security First** - every CLI argument passes through
//!    [`cli::SecureArgParser`] before reaching application code.
//!
//! ## Module Structure
//!
//! - `platform` - OS abstraction (Unix/Windows)
//! - `signals` - Signal handling (SIGTERM, SIGINT, SIGHUP)
//! - `cli` - Secure argument parsing
//! - `config` - Bootstrap-phase configuration
//! - `exit_code` - Unix exit code enumeration
//! - `logger` - Bootstrap-specific logging
//! - `shutdown` - Shutdown coordination

pub mod cli;
pub mod config;
pub mod exit_code;
pub mod logger;
pub mod platform;
pub mod shutdown;
pub mod signals;

pub use cli::{parse_and_validate, ValidatedCli, ValidatedCommand};
pub use exit_code::{result_to_exit_code, ExitCode};

/// Parses and security-validates the process's CLI arguments.
///
/// The caller is responsible for running the application logic against the
/// returned [`ValidatedCli`] and mapping its result to a process exit code
/// with [`result_to_exit_code`].
///
/// # Errors
///
/// Returns [`cli::ParseError`] if validation fails. Clap itself handles
/// `--help`/`--version` and malformed syntax by exiting the process before
/// this function returns.
pub fn bootstrap_cli() -> Result<ValidatedCli, cli::ParseError> {
    cli::parse_and_validate()
}
