pub mod application;
pub mod common;
pub mod core;

pub use application::accept::{
    accept, accept_or_fail, AbortFlag, AcceptConfig, AcceptError, AcceptOutcome, AcceptStatus,
    Acceptor, ArgumentError, ConnectionHandle, ConnectionSetup, DisableSigPipe, PeerAddress,
    Telemetry, TelemetryRecord,
};
