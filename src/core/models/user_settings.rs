use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::global_constants;
use crate::global_constants::LOG_TAG_SETTINGS;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub enum ThemeMode {
    Dark,
    #[default]
    Light,
}

/// How the donation prompt is presented once the query limit is hit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub enum DonationPromptStyle {
    #[default]
    Banner,
    Inline,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UserSettings {
    pub gemini_api_base_url: String,
    pub gemini_model: String,
    pub identification_prompt: String,
    pub query_limit: u32,
    pub request_timeout_seconds: u64,
    pub theme_mode: ThemeMode,
    pub donation_prompt_style: DonationPromptStyle,
    pub donation_url: String,
    pub camera_index: Option<u32>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            gemini_api_base_url: global_constants::DEFAULT_GEMINI_API_BASE_URL.to_string(),
            gemini_model: global_constants::DEFAULT_GEMINI_MODEL.to_string(),
            identification_prompt: global_constants::DEFAULT_IDENTIFICATION_PROMPT.to_string(),
            query_limit: global_constants::DEFAULT_QUERY_LIMIT,
            request_timeout_seconds: global_constants::DEFAULT_REQUEST_TIMEOUT_SECONDS,
            theme_mode: ThemeMode::default(),
            donation_prompt_style: DonationPromptStyle::default(),
            donation_url: global_constants::DEFAULT_DONATION_URL.to_string(),
            camera_index: None,
        }
    }
}

impl UserSettings {
    pub fn load() -> anyhow::Result<Self> {
        let settings_path = Self::get_settings_file_path()?;
        Self::load_from_path(&settings_path)
    }

    pub fn load_from_path(settings_path: &Path) -> anyhow::Result<Self> {
        if !settings_path.exists() {
            log::info!("{} No settings file found, using defaults", LOG_TAG_SETTINGS);
            let default_settings = Self::default();
            default_settings.save_to_path(settings_path)?;
            return Ok(default_settings);
        }

        let contents = std::fs::read_to_string(settings_path)
            .with_context(|| format!("Failed to read settings file {:?}", settings_path))?;
        let settings: UserSettings =
            serde_json::from_str(&contents).context("Settings file is not valid JSON")?;

        log::info!("{} Loaded settings from {:?}", LOG_TAG_SETTINGS, settings_path);
        log::debug!(
            "{} Model: {}, query limit: {}",
            LOG_TAG_SETTINGS,
            settings.gemini_model,
            settings.query_limit
        );

        Ok(settings)
    }

    pub fn save_to_path(&self, settings_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(settings_path, contents)
            .with_context(|| format!("Failed to write settings file {:?}", settings_path))?;

        log::info!("{} Saved settings to {:?}", LOG_TAG_SETTINGS, settings_path);
        Ok(())
    }

    /// The credential is injected through the environment, never the settings file.
    pub fn resolve_api_key() -> Option<String> {
        select_api_key(
            std::env::var(global_constants::API_KEY_ENV_VAR).ok(),
            std::env::var(global_constants::API_KEY_FALLBACK_ENV_VAR).ok(),
        )
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_seconds.max(1))
    }

    fn get_settings_file_path() -> anyhow::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join(global_constants::SETTINGS_DIRECTORY_NAME);

        Ok(config_dir.join(global_constants::SETTINGS_FILE_NAME))
    }
}

fn select_api_key(primary: Option<String>, fallback: Option<String>) -> Option<String> {
    [primary, fallback]
        .into_iter()
        .flatten()
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
}
