use crate::common::error::{Result, SockAcceptError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `level` when it is set.
pub fn init(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("sockaccept={}", level)))
        .map_err(|e| SockAcceptError::Config(format!("Invalid log level '{}': {}", level, e)))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| SockAcceptError::Config(format!("Failed to install logger: {}", e)))
}
