// Configuration management module
// TOML configuration for the embedding service, retrieval knobs, and server

pub mod settings;

use std::path::PathBuf;

pub use settings::{
    Config, ConfigError, OpenAiConfig, ProfileConfig, RetrievalConfig, ServerConfig,
};

/// Directory holding the config file and both databases. Overridable via
/// `URSA_DATA_DIR`, otherwise `~/.ursa`.
pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(dir) = std::env::var("URSA_DATA_DIR") {
        return Ok(PathBuf::from(dir));
    }

    dirs::home_dir()
        .map(|home| home.join(".ursa"))
        .ok_or(ConfigError::DirectoryError)
}
