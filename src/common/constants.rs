pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Placeholder reported when the peer of an accepted connection cannot be resolved.
pub const UNKNOWN_PEER: &str = "unknown";

pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Upper bound for a single readiness wait, in milliseconds (what `poll(2)` accepts).
pub const MAX_WAIT_MS: u64 = i32::MAX as u64;

/// The serving loop stops after this many accept failures in a row.
pub const MAX_CONSECUTIVE_ERRORS: u32 = 16;
