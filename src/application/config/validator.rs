use crate::application::config::models::Config;
use crate::common::constants::LOG_LEVELS;
use crate::common::error::{Result, SockAcceptError};

/// Validate configuration for correctness and consistency
pub fn validate_config(config: &Config) -> Result<()> {
    validate_wait_bounds(config)?;

    if config.max_connections == Some(0) {
        return Err(SockAcceptError::Config(
            "max_connections must be greater than 0".to_string(),
        ));
    }

    if !LOG_LEVELS.contains(&config.log_level.as_str()) {
        return Err(SockAcceptError::Config(format!(
            "log_level '{}' must be one of {:?}",
            config.log_level, LOG_LEVELS
        )));
    }

    Ok(())
}

// Same interdependence the accept call enforces, reported before binding.
fn validate_wait_bounds(config: &Config) -> Result<()> {
    match (config.poll_interval_ms, config.deadline_ms) {
        (None, None) => Err(SockAcceptError::Config(
            "either poll_interval_ms or deadline_ms must be set".to_string(),
        )),
        (Some(0), _) => Err(SockAcceptError::Config(
            "poll_interval_ms must be greater than 0".to_string(),
        )),
        (_, Some(0)) => Err(SockAcceptError::Config(
            "deadline_ms must be greater than 0".to_string(),
        )),
        _ => Ok(()),
    }
}
