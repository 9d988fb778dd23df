//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ClientConfig;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    ClientConfig::from_toml_str(&content)
}

impl ClientConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<ClientConfig, ConfigError> {
        let mut config: ClientConfig = toml::from_str(content)?;
        config.api_base_url = config.api_base_url.trim_end_matches('/').to_string();
        validate_config(&config)?;
        Ok(config)
    }
}

/// Semantic checks serde cannot express. Collects every problem.
pub fn validate_config(config: &ClientConfig) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    for (name, value) in [
        ("api_base_url", &config.api_base_url),
        ("rpc_url", &config.rpc_url),
    ] {
        match url::Url::parse(value) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            Ok(parsed) => errors.push(format!(
                "{name} must use http or https, got '{}'",
                parsed.scheme()
            )),
            Err(e) => errors.push(format!("{name} '{value}' is not a valid URL: {e}")),
        }
    }

    if config.signer_env_var.trim().is_empty() {
        errors.push("signer_env_var must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(errors))
    }
}
