use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::generation::gemini;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("neither XDG base directory nor HOME is set")]
    MissingHomeDirectory,
    #[error("no API key: set GEMINI_API_KEY or API_KEY")]
    MissingApiKey,
}

const APP_DIR: &str = "dreamframe";
const APP_CONFIG_FILE: &str = "config.json";
const HISTORY_FILE: &str = "history.json";
const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Application-level settings from `config.json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub history_path: Option<PathBuf>,
    pub image_model: Option<String>,
    pub video_model: Option<String>,
    pub video_poll_interval_secs: Option<u64>,
    pub api_base_url: Option<String>,
}

impl AppConfig {
    pub fn image_model(&self) -> &str {
        self.image_model
            .as_deref()
            .unwrap_or(gemini::DEFAULT_IMAGE_MODEL)
    }

    pub fn video_model(&self) -> &str {
        self.video_model
            .as_deref()
            .unwrap_or(gemini::DEFAULT_VIDEO_MODEL)
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .unwrap_or(gemini::DEFAULT_API_BASE_URL)
    }

    /// Zero is raised to one second so polling never spins.
    pub fn video_poll_interval(&self) -> Duration {
        self.video_poll_interval_secs
            .map(|secs| Duration::from_secs(secs.max(1)))
            .unwrap_or(gemini::DEFAULT_VIDEO_POLL_INTERVAL)
    }

    pub fn history_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.history_path {
            return Ok(path.clone());
        }
        let dirs = EnvDirs::from_env();
        default_history_path(dirs.xdg_data_home.as_deref(), dirs.home.as_deref())
    }
}

pub fn load_app_config() -> AppConfig {
    let dirs = EnvDirs::from_env();
    load_app_config_with(dirs.xdg_config_home.as_deref(), dirs.home.as_deref())
}

fn load_app_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> AppConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return AppConfig::default(),
    };
    if !path.exists() {
        return AppConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            AppConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            AppConfig::default()
        }
    }
}

/// First non-blank key among the supported environment variables.
pub fn api_key_from_env() -> Result<String, ConfigError> {
    API_KEY_VARS
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .ok_or(ConfigError::MissingApiKey)
}

struct EnvDirs {
    xdg_config_home: Option<PathBuf>,
    xdg_data_home: Option<PathBuf>,
    home: Option<PathBuf>,
}

impl EnvDirs {
    fn from_env() -> Self {
        Self {
            xdg_config_home: std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
            xdg_data_home: std::env::var_os("XDG_DATA_HOME").map(PathBuf::from),
            home: std::env::var_os("HOME").map(PathBuf::from),
        }
    }
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigError> {
    let mut path = base_root(xdg_config_home, home, &[".config"])?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn default_history_path(
    xdg_data_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigError> {
    let mut path = base_root(xdg_data_home, home, &[".local", "share"])?;
    path.push(APP_DIR);
    path.push(HISTORY_FILE);
    Ok(path)
}

fn base_root(
    xdg_dir: Option<&Path>,
    home: Option<&Path>,
    home_fallback: &[&str],
) -> Result<PathBuf, ConfigError> {
    if let Some(xdg) = xdg_dir.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigError::MissingHomeDirectory)?;
    Ok(home_fallback
        .iter()
        .fold(home.to_path_buf(), |path, part| path.join(part)))
}
