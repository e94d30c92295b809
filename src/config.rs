//! Configuration: `orakl.toml` or defaults
//!
//! Every section is optional. A missing file falls back to defaults with a
//! warning; a file that exists but does not parse is an error.

use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{OraklError, DEEP_MAX_TOKENS, INSUFFICIENT_MAX_TOKENS, QUICK_MAX_TOKENS};

/// Default config file, relative to the working directory
pub const CONFIG_PATH: &str = "orakl.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
}

fn default_addr() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { addr: default_addr() }
    }
}

/// Text generator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_quick_max_tokens")]
    pub quick_max_tokens: u32,

    #[serde(default = "default_deep_max_tokens")]
    pub deep_max_tokens: u32,

    #[serde(default = "default_insufficient_max_tokens")]
    pub insufficient_max_tokens: u32,
}

fn default_api_url() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_api_key_env() -> String {
    "ANTHROPIC_API_KEY".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_quick_max_tokens() -> u32 {
    QUICK_MAX_TOKENS
}

fn default_deep_max_tokens() -> u32 {
    DEEP_MAX_TOKENS
}

fn default_insufficient_max_tokens() -> u32 {
    INSUFFICIENT_MAX_TOKENS
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout(),
            quick_max_tokens: default_quick_max_tokens(),
            deep_max_tokens: default_deep_max_tokens(),
            insufficient_max_tokens: default_insufficient_max_tokens(),
        }
    }
}

impl GeneratorConfig {
    /// API key from the configured environment variable
    pub fn api_key(&self) -> Result<String, OraklError> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(OraklError::MissingApiKey(self.api_key_env.clone())),
        }
    }
}

/// Reading persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_store_dir() -> PathBuf {
    PathBuf::from("readings")
}

fn default_true() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: default_store_dir(),
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Extra sign meanings appended to the built-in table
    #[serde(default)]
    pub extra_signs_path: Option<PathBuf>,
}

impl Config {
    /// Load from `path`, or defaults when it does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self, OraklError> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("Config {} not found, using defaults", path.display());
            return Ok(Config::default());
        }
        Self::load_from_path(path)
    }

    fn load_from_path(path: &Path) -> Result<Self, OraklError> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
