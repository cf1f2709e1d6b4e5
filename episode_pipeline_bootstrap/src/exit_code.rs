// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Exit Code Management
//!
//! Standardized Unix exit codes following BSD `sysexits.h` conventions.

use std::fmt;

/// Exit codes following Unix conventions (BSD sysexits.h).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum ExitCode {
    #[default]
    Success = 0,
    Error = 1,
    UsageError = 64,
    DataError = 65,
    NoInput = 66,
    Unavailable = 69,
    Software = 70,
    OsError = 71,
    CantCreate = 73,
    IoError = 74,
    TempFail = 75,
    NoPerm = 77,
    Config = 78,
    Interrupted = 130,
    Terminated = 143,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Maps a domain error's message to a `sysexits.h` code by keyword
    /// sniffing, since `episode_pipeline_domain::PipelineError`'s
    /// `category()` does not itself carry exit-code semantics.
    pub fn from_error(error: &dyn std::error::Error) -> Self {
        let text = error.to_string().to_lowercase();
        if text.contains("permission") || text.contains("access denied") {
            ExitCode::NoPerm
        } else if text.contains("not found") || text.contains("no such") {
            ExitCode::NoInput
        } else if text.contains("invalid") || text.contains("argument") {
            ExitCode::UsageError
        } else if text.contains("config") {
            ExitCode::Config
        } else if text.contains("transient") || text.contains("unavailable") {
            ExitCode::TempFail
        } else if text.contains("io") || text.contains("read") || text.contains("write") {
            ExitCode::IoError
        } else {
            ExitCode::Error
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ExitCode::Success => "Success",
            ExitCode::Error => "General error",
            ExitCode::UsageError => "Command line usage error",
            ExitCode::DataError => "Data format error",
            ExitCode::NoInput => "Cannot open input",
            ExitCode::Unavailable => "Service unavailable",
            ExitCode::Software => "Internal software error",
            ExitCode::OsError => "System error",
            ExitCode::CantCreate => "Cannot create output file",
            ExitCode::IoError => "I/O error",
            ExitCode::TempFail => "Temporary failure, retry",
            ExitCode::NoPerm => "Permission denied",
            ExitCode::Config => "Configuration error",
            ExitCode::Interrupted => "Interrupted by signal (SIGINT)",
            ExitCode::Terminated => "Terminated by signal (SIGTERM)",
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Success)
    }

    pub fn is_error(self) -> bool {
        !self.is_success()
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_i32())
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code.as_i32()
    }
}

/// Maps a `Result` from the application layer to a process exit code, the
/// last step before `std::process::exit`.
pub fn result_to_exit_code<T, E: std::error::Error>(result: Result<T, E>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::Success,
        Err(e) => ExitCode::from_error(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_values_match_sysexits() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::UsageError.as_i32(), 64);
        assert_eq!(ExitCode::Config.as_i32(), 78);
        assert_eq!(ExitCode::Interrupted.as_i32(), 130);
    }

    #[test]
    fn from_error_sniffs_keywords() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "episode not found");
        assert_eq!(ExitCode::from_error(&err), ExitCode::NoInput);

        let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied");
        assert_eq!(ExitCode::from_error(&err), ExitCode::NoPerm);
    }

    #[test]
    fn result_to_exit_code_maps_ok_and_err() {
        let ok: Result<(), std::io::Error> = Ok(());
        assert_eq!(result_to_exit_code(ok), ExitCode::Success);

        let err: Result<(), std::io::Error> = Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, "invalid"));
        assert_eq!(result_to_exit_code(err), ExitCode::UsageError);
    }
}
