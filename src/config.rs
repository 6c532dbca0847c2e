use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppError, AppResult};

const CONFIG_DIR_NAME: &str = "storygen";
const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_MAX_TOKENS: u32 = 400;
pub const DEFAULT_TEMPERATURE: f32 = 0.4;

const API_KEY_VARS: [&str; 2] = ["STORYGEN_OPENAI_API_KEY", "OPENAI_API_KEY"];
const MODEL_VAR: &str = "STORYGEN_MODEL";
const API_URL_VAR: &str = "STORYGEN_API_URL";

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub provider: ProviderSettings,
}

/// Request shaping for the completion endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl AppConfig {
    /// Reads the stored config file, then the `.env` file and process environment on top of it.
    pub fn load() -> AppResult<Self> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "loaded .env file"),
            Err(err) if err.not_found() => {}
            Err(err) => {
                return Err(AppError::Configuration(format!("invalid .env file: {err}")));
            }
        }
        let stored = StoredConfig::load()?;
        Ok(Self::resolve(stored, |name| env::var(name).ok()))
    }

    pub fn resolve(stored: StoredConfig, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_key = API_KEY_VARS
            .into_iter()
            .find_map(|name| non_empty(lookup(name)))
            .or_else(|| non_empty(stored.openai_api_key));

        let defaults = ProviderSettings::default();
        let provider = ProviderSettings {
            api_url: non_empty(lookup(API_URL_VAR))
                .or_else(|| non_empty(stored.openai_api_url))
                .unwrap_or(defaults.api_url),
            model: non_empty(lookup(MODEL_VAR))
                .or_else(|| non_empty(stored.openai_model))
                .unwrap_or(defaults.model),
            max_tokens: stored.max_tokens.unwrap_or(defaults.max_tokens),
            temperature: stored.temperature.unwrap_or(defaults.temperature),
        };

        Self { api_key, provider }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Settings persisted by `storygen config init`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_api_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        Self::load_from(&config_file_path()?)
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&config_file_path()?)
    }

    fn load_from(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str::<StoredConfig>(&contents)
                .map_err(|err| AppError::Configuration(format!("invalid config file: {err}"))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Serialization(format!("failed to write config: {err}")))?;
        fs::write(path, data)?;
        Ok(())
    }
}

pub fn config_directory() -> AppResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or_else(|| {
            AppError::Configuration("unable to determine configuration directory".to_string())
        })
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}
