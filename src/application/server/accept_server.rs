use crate::application::accept::{AbortFlag, AcceptConfig, AcceptOutcome, AcceptStatus, Acceptor, Telemetry};
use crate::application::config::models::Config;
use crate::application::server::listener::Listener;
use crate::common::constants::MAX_CONSECUTIVE_ERRORS;
use crate::common::error::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

/// What a [`AcceptServer::run`] call did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServeSummary {
    pub accepted: u64,
    pub errors: u64,
    pub last: Option<AcceptStatus>,
}

/// Accepts connections one at a time on a single listener, greets and closes them.
pub struct AcceptServer {
    listener: Listener,
    config: Config,
    abort: AbortFlag,
    telemetry: Arc<Telemetry>,
}

impl AcceptServer {
    pub fn new(config: Config) -> Result<Self> {
        let listener = Listener::new(config.listen)?;
        Ok(Self {
            listener,
            config,
            abort: AbortFlag::new(),
            telemetry: Arc::new(Telemetry::new()),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.listener.addr()
    }

    /// Raising this flag stops [`AcceptServer::run`] within one poll interval.
    pub fn abort_flag(&self) -> AbortFlag {
        self.abort.clone()
    }

    pub fn telemetry(&self) -> Arc<Telemetry> {
        Arc::clone(&self.telemetry)
    }

    /// Accept until aborted, until a wait times out, or until
    /// `max_connections` clients were served. Accept failures are logged and
    /// retried, up to a limit of consecutive failures.
    pub fn run(&self) -> ServeSummary {
        let acceptor = Acceptor::new();
        let mut summary = ServeSummary::default();
        let mut consecutive_errors = 0;

        info!(addr = %self.listener.addr(), "waiting for connections");

        loop {
            if self
                .config
                .max_connections
                .is_some_and(|max| summary.accepted >= max)
            {
                info!(accepted = summary.accepted, "connection limit reached");
                break;
            }

            let outcome = acceptor.accept(&self.call_config());
            summary.last = Some(outcome.status());

            match outcome {
                AcceptOutcome::Accepted(conn) => {
                    consecutive_errors = 0;
                    summary.accepted += 1;
                    info!(peer = %conn.peer(), "client connected");

                    if let Some(greeting) = &self.config.greeting {
                        let line = format!("{}\n", greeting);
                        if let Err(e) = conn.send_all(line.as_bytes()) {
                            warn!(peer = %conn.peer(), error = %e, "failed to send greeting");
                        }
                    }
                }
                AcceptOutcome::Error { message } => {
                    summary.errors += 1;
                    consecutive_errors += 1;
                    warn!(%message, "accept failed");
                    if consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
                        warn!(consecutive_errors, "giving up after repeated accept failures");
                        break;
                    }
                }
                AcceptOutcome::Timeout => {
                    info!("no connection before deadline");
                    break;
                }
                AcceptOutcome::Aborted => {
                    info!("shutdown requested");
                    break;
                }
            }
        }

        summary
    }

    fn call_config(&self) -> AcceptConfig<'_> {
        let mut call = AcceptConfig::new(&self.listener, &self.abort).telemetry(&self.telemetry);
        if let Some(interval) = self.config.poll_interval() {
            call = call.poll_interval(interval);
        }
        if let Some(deadline) = self.config.deadline() {
            call = call.deadline(deadline);
        }
        call
    }
}
