use crate::application::config::models::Config;
use crate::common::error::{Result, SockAcceptError};
use std::fs;

/// Parse configuration from TOML file
pub fn parse_config_file(path: &str) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| {
        SockAcceptError::Config(format!("Failed to read config file '{}': {}", path, e))
    })?;

    parse_config(&content)
}

/// Parse configuration from TOML string
pub fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content)
        .map_err(|e| SockAcceptError::Config(format!("Failed to parse TOML config: {}", e)))
}
