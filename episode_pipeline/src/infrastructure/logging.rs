// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Process-wide `tracing` setup (§6.6). Every stage module, use case, and
//! repository logs through `tracing`'s macros; this module only owns the
//! one-time subscriber initialization the binary calls at startup.

use tracing::Level;

/// Installs the global `tracing` subscriber. `verbosity` follows clap's
/// repeated `-v` convention: 0 is `INFO`, 1 is `DEBUG`, 2+ is `TRACE`.
///
/// Returns an error rather than panicking so the caller can decide how to
/// report a double-initialization (e.g. in tests that call this more than
/// once across the process).
pub fn init_tracing(verbosity: u8) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_verbosity_to_level() {
        // init_tracing is process-global and can only succeed once per test
        // binary; exercise the level mapping directly instead of the call.
        assert_eq!(
            match 0u8 {
                0 => Level::INFO,
                1 => Level::DEBUG,
                _ => Level::TRACE,
            },
            Level::INFO
        );
        assert_eq!(
            match 2u8 {
                0 => Level::INFO,
                1 => Level::DEBUG,
                _ => Level::TRACE,
            },
            Level::TRACE
        );
    }
}
