// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Command-Line Interface
//!
//! Bootstrap-layer CLI handling with security-first argument validation
//! (§7): parse with `clap`, then validate every argument before it
//! reaches application code.
//!
//! ## Pipeline
//!
//! ```text
//! parse_cli()        -- clap structure and raw parsing
//!       |
//! validate_cli()      -- security validation (SecureArgParser)
//!       |
//! ValidatedCli        -- safe, range-checked configuration
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use thiserror::Error;

const MAX_ARG_LENGTH: usize = 1000;
const DANGEROUS_PATTERNS: &[&str] = &["..", "~", "$", "`", ";", "&", "|", ">", "<", "\n", "\r", "\0"];

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("argument too long (max {MAX_ARG_LENGTH} characters): {0}")]
    ArgumentTooLong(String),

    #[error("dangerous pattern `{pattern}` detected in argument: {arg}")]
    DangerousPattern { pattern: String, arg: String },

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("invalid value for {arg}: {reason}")]
    InvalidValue { arg: String, reason: String },
}

/// Validates a single free-form argument (episode id, task id, reviewer
/// notes, prompt name) against length and shell-metacharacter injection.
pub struct SecureArgParser;

impl SecureArgParser {
    pub fn validate_argument(value: &str) -> Result<(), ParseError> {
        if value.len() > MAX_ARG_LENGTH {
            return Err(ParseError::ArgumentTooLong(value.to_string()));
        }
        for pattern in DANGEROUS_PATTERNS {
            if value.contains(pattern) {
                return Err(ParseError::DangerousPattern { pattern: pattern.to_string(), arg: value.to_string() });
            }
        }
        Ok(())
    }

    /// Validates a path argument that must already exist on disk (e.g. a
    /// settings file override).
    pub fn validate_existing_path(value: &str) -> Result<PathBuf, ParseError> {
        Self::validate_argument(value)?;
        let path = Path::new(value);
        if !path.exists() {
            return Err(ParseError::PathNotFound(value.to_string()));
        }
        Ok(path.to_path_buf())
    }
}

#[derive(Parser, Debug)]
#[command(name = "episode_pipeline", about = "Stage-graph executor for the episode content-production pipeline")]
pub struct Cli {
    /// Increase log verbosity; repeatable (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Settings file override (defaults to `./episode_pipeline.toml`)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Skip driver I/O, writing canned outputs so state transitions still occur (§6.5)
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a single episode through the stage graph (§4.1, §4.9 "run episode").
    Run {
        /// Episode id to run.
        episode: String,

        /// Re-run the episode's current stage regardless of idempotency (§4.3).
        #[arg(long)]
        force: bool,
    },
    /// Run a batch of actionable episodes (§4.7 Batch Selector).
    RunBatch {
        #[command(subcommand)]
        mode: BatchModeArg,

        /// Re-run each episode's current stage regardless of idempotency (§4.3).
        #[arg(long)]
        force: bool,
    },
    /// Act on a pending review task (§4.5).
    Review {
        #[command(subcommand)]
        action: ReviewAction,
    },
    /// List review tasks currently awaiting a decision.
    ListReviewTasks,
}

#[derive(Subcommand, Debug)]
pub enum BatchModeArg {
    /// Every actionable episode without an active review task at its next gate.
    Pending,
    /// The N most recently updated actionable episodes.
    Latest { limit: usize },
}

#[derive(Subcommand, Debug)]
pub enum ReviewAction {
    Approve { task_id: String },
    Reject { task_id: String, #[arg(long)] notes: Option<String> },
    RequestChanges { task_id: String, #[arg(long)] notes: String },
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}

#[derive(Debug, Clone)]
pub struct ValidatedCli {
    pub command: ValidatedCommand,
    pub verbose: u8,
    pub config: Option<PathBuf>,
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub enum ValidatedCommand {
    Run { episode: String, force: bool },
    RunBatchPending { force: bool },
    RunBatchLatest { limit: usize, force: bool },
    ReviewApprove { task_id: String },
    ReviewReject { task_id: String, notes: Option<String> },
    ReviewRequestChanges { task_id: String, notes: String },
    ListReviewTasks,
}

pub fn parse_and_validate() -> Result<ValidatedCli, ParseError> {
    validate_cli(parse_cli())
}

fn validate_cli(cli: Cli) -> Result<ValidatedCli, ParseError> {
    let config = match cli.config {
        Some(path) => Some(SecureArgParser::validate_existing_path(&path.to_string_lossy())?),
        None => None,
    };

    let command = match cli.command {
        Commands::Run { episode, force } => {
            SecureArgParser::validate_argument(&episode)?;
            ValidatedCommand::Run { episode, force }
        }
        Commands::RunBatch { mode, force } => match mode {
            BatchModeArg::Pending => ValidatedCommand::RunBatchPending { force },
            BatchModeArg::Latest { limit } => {
                if limit == 0 {
                    return Err(ParseError::InvalidValue { arg: "limit".to_string(), reason: "must be greater than 0".to_string() });
                }
                ValidatedCommand::RunBatchLatest { limit, force }
            }
        },
        Commands::Review { action } => match action {
            ReviewAction::Approve { task_id } => {
                SecureArgParser::validate_argument(&task_id)?;
                ValidatedCommand::ReviewApprove { task_id }
            }
            ReviewAction::Reject { task_id, notes } => {
                SecureArgParser::validate_argument(&task_id)?;
                if let Some(ref n) = notes {
                    SecureArgParser::validate_argument(n)?;
                }
                ValidatedCommand::ReviewReject { task_id, notes }
            }
            ReviewAction::RequestChanges { task_id, notes } => {
                SecureArgParser::validate_argument(&task_id)?;
                SecureArgParser::validate_argument(&notes)?;
                if notes.trim().is_empty() {
                    return Err(ParseError::InvalidValue {
                        arg: "notes".to_string(),
                        reason: "request-changes requires non-empty notes".to_string(),
                    });
                }
                ValidatedCommand::ReviewRequestChanges { task_id, notes }
            }
        },
        Commands::ListReviewTasks => ValidatedCommand::ListReviewTasks,
    };

    Ok(ValidatedCli { command, verbose: cli.verbose, config, dry_run: cli.dry_run })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_dangerous_patterns() {
        let err = SecureArgParser::validate_argument("ep; rm -rf /").unwrap_err();
        assert!(matches!(err, ParseError::DangerousPattern { .. }));
    }

    #[test]
    fn rejects_overlong_arguments() {
        let long = "a".repeat(MAX_ARG_LENGTH + 1);
        let err = SecureArgParser::validate_argument(&long).unwrap_err();
        assert!(matches!(err, ParseError::ArgumentTooLong(_)));
    }

    #[test]
    fn accepts_plain_episode_id() {
        assert!(SecureArgParser::validate_argument("01HXYZ000000000000000000").is_ok());
    }

    #[test]
    fn validate_cli_rejects_empty_request_changes_notes() {
        let cli = Cli {
            verbose: 0,
            config: None,
            dry_run: false,
            command: Commands::Review {
                action: ReviewAction::RequestChanges { task_id: "t1".to_string(), notes: "   ".to_string() },
            },
        };
        let err = validate_cli(cli).unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { .. }));
    }

    #[test]
    fn validate_cli_accepts_run_batch_pending() {
        let cli = Cli {
            verbose: 2,
            config: None,
            dry_run: true,
            command: Commands::RunBatch { mode: BatchModeArg::Pending, force: false },
        };
        let validated = validate_cli(cli).unwrap();
        assert!(validated.dry_run);
        assert!(matches!(validated.command, ValidatedCommand::RunBatchPending { force: false }));
    }

    #[test]
    fn validate_cli_rejects_zero_latest_limit() {
        let cli = Cli {
            verbose: 0,
            config: None,
            dry_run: false,
            command: Commands::RunBatch { mode: BatchModeArg::Latest { limit: 0 }, force: false },
        };
        let err = validate_cli(cli).unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { .. }));
    }
}
