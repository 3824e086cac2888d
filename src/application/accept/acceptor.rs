use crate::application::accept::config::AcceptConfig;
use crate::application::accept::connection::{ConnectionHandle, PeerAddress};
use crate::application::accept::outcome::{AcceptError, AcceptOutcome};
use crate::application::accept::setup::{ConnectionSetup, DisableSigPipe};
use crate::application::accept::telemetry::Telemetry;
use crate::common::time::Deadline;
use crate::core::event::poller::{Poller, Readiness};
use crate::core::net::socket::{accept_raw, peer_address};
use std::os::unix::io::RawFd;
use tracing::{debug, trace};

/// Bounded, cancelable accept.
///
/// Each call waits on the listening socket until a connection arrives, the
/// deadline passes or the abort flag is raised, whichever happens first. The
/// flag is checked on entry and after every readiness wait returns.
#[derive(Debug, Clone, Default)]
pub struct Acceptor<S = DisableSigPipe> {
    setup: S,
}

impl Acceptor {
    pub fn new() -> Self {
        Self {
            setup: DisableSigPipe,
        }
    }
}

impl<S: ConnectionSetup> Acceptor<S> {
    /// Use `setup` instead of [`DisableSigPipe`] to configure accepted connections.
    pub fn with_setup(setup: S) -> Self {
        Self { setup }
    }

    pub fn accept(&self, config: &AcceptConfig<'_>) -> AcceptOutcome {
        let schedule = match config.schedule() {
            Ok(schedule) => schedule,
            Err(e) => return AcceptOutcome::error(e.to_string()),
        };
        let telemetry = config.telemetry_sink();

        if config.abort_flag().is_aborted() {
            return finalize(telemetry, AcceptOutcome::Aborted);
        }

        if let Some(telemetry) = telemetry {
            telemetry.begin(schedule.deadline());
        }
        let deadline = schedule.deadline().map(Deadline::after);

        let poller = Poller::new(config.listener_fd());
        let outcome = loop {
            let Some(budget) = schedule.budget(deadline.as_ref()) else {
                break AcceptOutcome::Timeout;
            };

            let readiness = match poller.wait_readable(budget) {
                Ok(readiness) => readiness,
                Err(e) => break AcceptOutcome::error(e.to_string()),
            };

            if config.abort_flag().is_aborted() {
                break AcceptOutcome::Aborted;
            }

            match readiness {
                Readiness::Expired => {
                    if let Some(telemetry) = telemetry {
                        telemetry.tick();
                    }
                    if deadline.is_some_and(|d| d.is_expired()) {
                        break AcceptOutcome::Timeout;
                    }
                    trace!(fd = poller.as_raw_fd(), "no connection yet, still waiting");
                }
                Readiness::Ready => break self.accept_ready(config.listener_fd(), telemetry),
            }
        };

        finalize(telemetry, outcome)
    }

    /// Like [`Acceptor::accept`], but every outcome other than `Accepted` is an `Err`.
    pub fn accept_or_fail(&self, config: &AcceptConfig<'_>) -> Result<ConnectionHandle, AcceptError> {
        self.accept(config).into_result()
    }

    // A ready socket with nothing to accept (e.g. EAGAIN) is reported as an
    // error; the loop counter only counts waits that expired.
    fn accept_ready(&self, listener: RawFd, telemetry: Option<&Telemetry>) -> AcceptOutcome {
        let conn = match accept_raw(listener) {
            Ok(conn) => conn,
            Err(e) => return AcceptOutcome::error(e.to_string()),
        };

        if let Err(e) = self.setup.configure(conn.as_raw_fd()) {
            drop(conn);
            return AcceptOutcome::error(e.to_string());
        }

        let peer = peer_address(conn.as_raw_fd())
            .map(PeerAddress::Inet)
            .unwrap_or(PeerAddress::Unknown);

        if let Some(telemetry) = telemetry {
            telemetry.record_client(&peer);
        }
        debug!(%peer, fd = conn.as_raw_fd(), "accepted connection");

        AcceptOutcome::Accepted(ConnectionHandle::new(conn, peer))
    }
}

fn finalize(telemetry: Option<&Telemetry>, outcome: AcceptOutcome) -> AcceptOutcome {
    if let Some(telemetry) = telemetry {
        telemetry.finish(outcome.status());
    }
    outcome
}

/// [`Acceptor::accept`] with the default connection setup.
pub fn accept(config: &AcceptConfig<'_>) -> AcceptOutcome {
    Acceptor::new().accept(config)
}

/// [`Acceptor::accept_or_fail`] with the default connection setup.
pub fn accept_or_fail(config: &AcceptConfig<'_>) -> Result<ConnectionHandle, AcceptError> {
    Acceptor::new().accept_or_fail(config)
}
