pub mod abort;
pub mod acceptor;
pub mod config;
pub mod connection;
pub mod outcome;
pub mod setup;
pub mod telemetry;

pub use abort::AbortFlag;
pub use acceptor::{accept, accept_or_fail, Acceptor};
pub use config::{AcceptConfig, ArgumentError, WaitSchedule};
pub use connection::{ConnectionHandle, PeerAddress};
pub use outcome::{AcceptError, AcceptOutcome, AcceptStatus};
pub use setup::{ConnectionSetup, DisableSigPipe};
pub use telemetry::{Telemetry, TelemetryRecord};
