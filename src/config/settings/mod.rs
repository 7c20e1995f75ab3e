#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

pub const DEFAULT_EMBEDDING_DIMENSION: u32 = 1536;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OpenAiConfig {
    /// Base URL of an OpenAI-compatible API, without a trailing slash
    pub api_base: String,
    /// Environment variable holding the API key; the key itself never lives in the config file
    pub api_key_env: String,
    pub embedding_model: String,
    pub chat_model: String,
    pub embedding_dimension: u32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            embedding_dimension: DEFAULT_EMBEDDING_DIMENSION,
        }
    }
}

/// Retrieval knobs. The threshold and result count are empirically chosen
/// per embedding model, not contracts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetrievalConfig {
    pub similarity_threshold: f32,
    pub top_k: usize,
    /// Number of prior conversation turns forwarded to the completion service
    pub history_window: usize,
    /// Delay between consecutive embedding calls during bulk ingestion
    pub ingest_delay_ms: u64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.3,
            top_k: 5,
            history_window: 10,
            ingest_delay_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8787,
        }
    }
}

/// Static identity facts for the hand-authored profile and achievements
/// chunks. These are authored data, never derived from source records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProfileConfig {
    pub owner_name: String,
    pub assistant_name: String,
    pub headline: String,
    pub summary: String,
    pub email: String,
    pub linkedin: String,
    pub portfolio_url: String,
    /// Free-form notable recognitions, one per entry
    pub achievements: Vec<String>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            owner_name: "Portfolio Owner".to_string(),
            assistant_name: "Ursa".to_string(),
            headline: String::new(),
            summary: String::new(),
            email: String::new(),
            linkedin: String::new(),
            portfolio_url: String::new(),
            achievements: Vec::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid API base URL: {0}")]
    InvalidApiBase(String),
    #[error("Invalid model name: {0} (cannot be empty)")]
    InvalidModel(String),
    #[error("Invalid API key env var name (cannot be empty)")]
    InvalidApiKeyEnv,
    #[error("Invalid embedding dimension: {0} (must be between 64 and 4096)")]
    InvalidEmbeddingDimension(u32),
    #[error("Invalid similarity threshold: {0} (must be between 0.0 and 1.0)")]
    InvalidSimilarityThreshold(f32),
    #[error("Invalid top_k: {0} (must be between 1 and 50)")]
    InvalidTopK(usize),
    #[error("Invalid history window: {0} (must be between 0 and 100)")]
    InvalidHistoryWindow(usize),
    #[error("Invalid server port: {0}")]
    InvalidPort(u16),
    #[error("Could not determine data directory")]
    DirectoryError,
    #[error("Owner name cannot be empty")]
    EmptyOwnerName,
    #[error("Assistant name cannot be empty")]
    EmptyAssistantName,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Config {
    #[inline]
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join("config.toml");

        if !config_path.exists() {
            return Ok(Self {
                base_dir: config_dir.as_ref().to_path_buf(),
                ..Self::default()
            });
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;
        config.base_dir = config_dir.as_ref().to_path_buf();

        config
            .validate()
            .with_context(|| "Configuration validation failed")?;

        Ok(config)
    }

    #[inline]
    pub fn save(&self) -> Result<()> {
        self.validate()
            .context("Configuration validation failed before saving")?;

        fs::create_dir_all(&self.base_dir).with_context(|| {
            format!(
                "Failed to create config directory: {}",
                self.base_dir.display()
            )
        })?;

        let config_path = self.config_file_path();
        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.openai.validate()?;
        self.retrieval.validate()?;

        if self.server.port == 0 {
            return Err(ConfigError::InvalidPort(self.server.port));
        }

        if self.profile.owner_name.trim().is_empty() {
            return Err(ConfigError::EmptyOwnerName);
        }
        if self.profile.assistant_name.trim().is_empty() {
            return Err(ConfigError::EmptyAssistantName);
        }

        Ok(())
    }

    #[inline]
    pub fn config_file_path(&self) -> PathBuf {
        self.base_dir.join("config.toml")
    }

    /// Path for the SQLite database holding source records and the
    /// knowledge-base generation pointer
    #[inline]
    pub fn database_path(&self) -> PathBuf {
        self.base_dir.join("portfolio.db")
    }

    /// Path for the LanceDB vector database directory
    #[inline]
    pub fn vector_database_path(&self) -> PathBuf {
        self.base_dir.join("vectors")
    }
}

impl Default for Config {
    #[inline]
    fn default() -> Self {
        Self {
            openai: OpenAiConfig::default(),
            retrieval: RetrievalConfig::default(),
            server: ServerConfig::default(),
            profile: ProfileConfig::default(),
            base_dir: PathBuf::from("."),
        }
    }
}

impl OpenAiConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.api_base)
            .map_err(|_| ConfigError::InvalidApiBase(self.api_base.clone()))?;

        if self.api_key_env.trim().is_empty() {
            return Err(ConfigError::InvalidApiKeyEnv);
        }

        if self.embedding_model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(self.embedding_model.clone()));
        }

        if self.chat_model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(self.chat_model.clone()));
        }

        if !(64..=4096).contains(&self.embedding_dimension) {
            return Err(ConfigError::InvalidEmbeddingDimension(
                self.embedding_dimension,
            ));
        }

        Ok(())
    }

    pub fn api_base_url(&self) -> Result<Url, ConfigError> {
        // A trailing slash would make Url::join drop the final path segment
        let base = format!("{}/", self.api_base.trim_end_matches('/'));
        Url::parse(&base).map_err(|_| ConfigError::InvalidApiBase(self.api_base.clone()))
    }

    /// Read the API key from the configured environment variable, if set
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env).ok()
    }
}

impl RetrievalConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ConfigError::InvalidSimilarityThreshold(
                self.similarity_threshold,
            ));
        }

        if self.top_k == 0 || self.top_k > 50 {
            return Err(ConfigError::InvalidTopK(self.top_k));
        }

        if self.history_window > 100 {
            return Err(ConfigError::InvalidHistoryWindow(self.history_window));
        }

        Ok(())
    }
}
