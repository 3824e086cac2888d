use crate::common::constants::{DEFAULT_LOG_LEVEL, DEFAULT_POLL_INTERVAL_MS};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Configuration of the `sockaccept` server
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Address to listen on (port 0 picks an ephemeral port)
    pub listen: SocketAddr,

    /// How often a waiting accept checks for shutdown, in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: Option<u64>,

    /// Give up if no connection arrives within this many milliseconds
    #[serde(default)]
    pub deadline_ms: Option<u64>,

    /// Stop after this many accepted connections
    #[serde(default)]
    pub max_connections: Option<u64>,

    /// Line written to every accepted client before it is closed
    #[serde(default)]
    pub greeting: Option<String>,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_poll_interval() -> Option<u64> {
    Some(DEFAULT_POLL_INTERVAL_MS)
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Config {
    pub fn poll_interval(&self) -> Option<Duration> {
        self.poll_interval_ms.map(Duration::from_millis)
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 0)),
            poll_interval_ms: default_poll_interval(),
            deadline_ms: None,
            max_connections: None,
            greeting: None,
            log_level: default_log_level(),
        }
    }
}
