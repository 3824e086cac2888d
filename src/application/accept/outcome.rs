use crate::application::accept::connection::{ConnectionHandle, PeerAddress};
use std::fmt;
use thiserror::Error;

/// How one accept call ended. Exactly one of these is returned per call.
#[derive(Debug)]
pub enum AcceptOutcome {
    /// A new connection, distinct from the listening socket. Ownership moves to the caller.
    Accepted(ConnectionHandle),
    /// An argument, syscall or socket configuration failure.
    Error { message: String },
    /// The deadline elapsed with no connection.
    Timeout,
    /// The abort flag was observed set.
    Aborted,
}

impl AcceptOutcome {
    pub(crate) fn error(message: impl Into<String>) -> Self {
        AcceptOutcome::Error {
            message: message.into(),
        }
    }

    pub fn status(&self) -> AcceptStatus {
        match self {
            AcceptOutcome::Accepted(conn) => AcceptStatus::Accepted { peer: conn.peer() },
            AcceptOutcome::Error { message } => AcceptStatus::Error {
                message: message.clone(),
            },
            AcceptOutcome::Timeout => AcceptStatus::Timeout,
            AcceptOutcome::Aborted => AcceptStatus::Aborted,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, AcceptOutcome::Accepted(_))
    }

    pub fn into_connection(self) -> Option<ConnectionHandle> {
        match self {
            AcceptOutcome::Accepted(conn) => Some(conn),
            _ => None,
        }
    }

    /// Map onto `Result`, turning every non-`Accepted` case into an [`AcceptError`].
    pub fn into_result(self) -> Result<ConnectionHandle, AcceptError> {
        match self {
            AcceptOutcome::Accepted(conn) => Ok(conn),
            AcceptOutcome::Error { message } => Err(AcceptError::Operation { message }),
            AcceptOutcome::Timeout => Err(AcceptError::Timeout),
            AcceptOutcome::Aborted => Err(AcceptError::Aborted),
        }
    }
}

/// Copy of an outcome that can be kept around, e.g. as telemetry's last result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcceptStatus {
    Accepted { peer: PeerAddress },
    Error { message: String },
    Timeout,
    Aborted,
}

impl fmt::Display for AcceptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcceptStatus::Accepted { peer } => write!(f, "accepted from {}", peer),
            AcceptStatus::Error { message } => write!(f, "error: {}", message),
            AcceptStatus::Timeout => f.write_str("timeout"),
            AcceptStatus::Aborted => f.write_str("aborted"),
        }
    }
}

/// Failures raised by `accept_or_fail`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AcceptError {
    #[error("timed out waiting for a connection")]
    Timeout,

    /// Not an error as such: the caller asked for the wait to stop.
    #[error("accept aborted on request")]
    Aborted,

    #[error("accept failed: {message}")]
    Operation { message: String },
}

impl AcceptError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, AcceptError::Timeout)
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, AcceptError::Aborted)
    }
}
