// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Pipeline settings
//!
//! `PipelineSettings` is the process-wide settings snapshot (§4 "Process-wide
//! state is limited to the settings snapshot and the store handle"),
//! loaded once at startup and shared via `Arc` with the executor, stage
//! modules, and review coordinator.
//!
//! ## Loading precedence (§6.8, highest wins)
//!
//! 1. `--config <path>` / `--dry-run` / `--max-episode-cost-usd` CLI flags
//! 2. environment variables prefixed `EPISODE_PIPELINE_`
//!    (e.g. `EPISODE_PIPELINE_MAX_EPISODE_COST_USD`)
//! 3. `config/{environment}.toml`
//! 4. `config/default.toml`
//! 5. built-in [`Default`] values

use config::{Config, Environment, File};
use episode_pipeline_domain::PipelineError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum PipelineVersion {
    V1,
    V2,
}

impl Default for PipelineVersion {
    fn default() -> Self {
        Self::V2
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub resolution: String,
    pub fps: u32,
    pub crf: u32,
    pub preset: String,
    pub audio_bitrate: String,
    pub font: String,
    pub segment_timeout_s: u64,
    pub concat_timeout_s: u64,
    pub transition_duration_s: f64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            resolution: "1920x1080".to_string(),
            fps: 30,
            crf: 20,
            preset: "medium".to_string(),
            audio_bitrate: "192k".to_string(),
            font: "Inter".to_string(),
            segment_timeout_s: 300,
            concat_timeout_s: 600,
            transition_duration_s: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagegenSettings {
    pub provider: String,
    pub model: String,
    pub size: String,
    pub quality: String,
    pub style_prefix: String,
}

impl Default for ImagegenSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-image-1".to_string(),
            size: "1792x1024".to_string(),
            quality: "standard".to_string(),
            style_prefix: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub pipeline_version: PipelineVersion,
    /// Hard cap (§6.4 default 10.00 USD); exceeding it transitions the
    /// episode to `COST_LIMIT`.
    pub max_episode_cost_usd: f64,
    /// Skips driver I/O, writing canned outputs so all state transitions
    /// still occur (§6.5).
    pub dry_run: bool,
    pub data_dir: String,
    pub database_url: String,
    pub render: RenderSettings,
    pub imagegen: ImagegenSettings,
    pub metrics_addr: Option<String>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            pipeline_version: PipelineVersion::default(),
            max_episode_cost_usd: 10.00,
            dry_run: false,
            data_dir: "data".to_string(),
            database_url: "sqlite://episode_pipeline.db".to_string(),
            render: RenderSettings::default(),
            imagegen: ImagegenSettings::default(),
            metrics_addr: None,
        }
    }
}

impl PipelineSettings {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.max_episode_cost_usd <= 0.0 {
            return Err(PipelineError::invalid_config("max_episode_cost_usd must be > 0"));
        }
        const KNOWN_PRESETS: &[&str] = &["ultrafast", "fast", "medium", "slow", "veryslow"];
        if !KNOWN_PRESETS.contains(&self.render.preset.as_str()) {
            return Err(PipelineError::invalid_config(format!(
                "unknown render preset: {}",
                self.render.preset
            )));
        }
        if self.render.fps == 0 {
            return Err(PipelineError::invalid_config("render.fps must be > 0"));
        }
        Ok(())
    }

    /// Loads settings from the precedence chain described above. `environment`
    /// selects `config/{environment}.toml`; `config_path` is an explicit
    /// `--config` override layered on top of everything but CLI flags.
    pub fn load(environment: &str, config_path: Option<&str>) -> Result<Self, PipelineError> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&PipelineSettings::default()).map_err(|e| PipelineError::invalid_config(e.to_string()))?)
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{environment}")).required(false));

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        let settings = builder
            .add_source(Environment::with_prefix("EPISODE_PIPELINE").separator("__"))
            .build()
            .map_err(|e| PipelineError::invalid_config(e.to_string()))?;

        let settings: PipelineSettings = settings.try_deserialize().map_err(|e| PipelineError::invalid_config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_validate() {
        assert!(PipelineSettings::default().validate().is_ok());
    }

    #[test]
    fn zero_cost_cap_is_rejected() {
        let mut settings = PipelineSettings::default();
        settings.max_episode_cost_usd = 0.0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn unknown_render_preset_is_rejected() {
        let mut settings = PipelineSettings::default();
        settings.render.preset = "turbo".to_string();
        assert!(settings.validate().is_err());
    }
}
