// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Bootstrap Configuration
//!
//! `AppConfig` holds the handful of settings the bootstrap layer itself
//! needs before the application layer's own `PipelineSettings` (loaded
//! separately, from `episode_pipeline::infrastructure::config`) takes
//! over: verbosity, an optional settings-file override path, and the
//! concurrency knobs a batch run is invoked with.

use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl LogLevel {
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }

    /// Maps clap's repeated `-v` count the same way
    /// `episode_pipeline::infrastructure::logging::init_tracing` does.
    pub fn from_verbosity(verbosity: u8) -> Self {
        match verbosity {
            0 => LogLevel::Info,
            1 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    log_level: LogLevel,
    settings_path: Option<PathBuf>,
    dry_run: bool,
}

impl AppConfig {
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn settings_path(&self) -> Option<&PathBuf> {
        self.settings_path.as_ref()
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    log_level: Option<LogLevel>,
    settings_path: Option<PathBuf>,
    dry_run: bool,
}

impl AppConfigBuilder {
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = Some(level);
        self
    }

    pub fn settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = Some(path.into());
        self
    }

    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    pub fn build(self) -> AppConfig {
        AppConfig {
            log_level: self.log_level.unwrap_or_default(),
            settings_path: self.settings_path,
            dry_run: self.dry_run,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_to_info_and_no_dry_run() {
        let config = AppConfig::builder().build();
        assert_eq!(config.log_level(), LogLevel::Info);
        assert!(config.settings_path().is_none());
        assert!(!config.is_dry_run());
    }

    #[test]
    fn builder_applies_overrides() {
        let config = AppConfig::builder()
            .log_level(LogLevel::Debug)
            .settings_path("/etc/episode_pipeline.toml")
            .dry_run(true)
            .build();
        assert_eq!(config.log_level(), LogLevel::Debug);
        assert_eq!(config.settings_path(), Some(&PathBuf::from("/etc/episode_pipeline.toml")));
        assert!(config.is_dry_run());
    }

    #[test]
    fn verbosity_maps_monotonically() {
        assert_eq!(LogLevel::from_verbosity(0), LogLevel::Info);
        assert_eq!(LogLevel::from_verbosity(1), LogLevel::Debug);
        assert_eq!(LogLevel::from_verbosity(5), LogLevel::Trace);
    }
}
