use crate::application::accept::abort::AbortFlag;
use crate::application::accept::telemetry::Telemetry;
use crate::common::time::Deadline;
use crate::core::net::fd::FileDescriptor;
use std::os::unix::io::{AsRawFd, RawFd};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArgumentError {
    #[error("either a poll interval or a deadline must be given")]
    MissingWaitBound,

    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,
}

/// Validated combination of wait bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitSchedule {
    Poll(Duration),
    Deadline(Duration),
    PollUntil { poll: Duration, deadline: Duration },
}

impl WaitSchedule {
    pub fn deadline(&self) -> Option<Duration> {
        match *self {
            WaitSchedule::Poll(_) => None,
            WaitSchedule::Deadline(deadline) | WaitSchedule::PollUntil { deadline, .. } => {
                Some(deadline)
            }
        }
    }

    /// Budget for the next readiness wait; `None` once the deadline has passed.
    pub(crate) fn budget(&self, deadline: Option<&Deadline>) -> Option<Duration> {
        match (*self, deadline) {
            (WaitSchedule::Poll(poll), _) => Some(poll),
            (WaitSchedule::PollUntil { poll, .. }, Some(d)) => d.remaining().map(|r| r.min(poll)),
            (_, Some(d)) => d.remaining(),
            (WaitSchedule::Deadline(_) | WaitSchedule::PollUntil { .. }, None) => None,
        }
    }
}

/// Inputs of one accept call. The listening socket is borrowed and never
/// closed or reconfigured.
pub struct AcceptConfig<'a> {
    listener: FileDescriptor,
    abort: &'a AbortFlag,
    poll_interval: Option<Duration>,
    deadline: Option<Duration>,
    telemetry: Option<&'a Telemetry>,
}

impl<'a> AcceptConfig<'a> {
    pub fn new<L: AsRawFd + ?Sized>(listener: &'a L, abort: &'a AbortFlag) -> Self {
        Self::from_raw_fd(listener.as_raw_fd(), abort)
    }

    /// For descriptors handed over by another layer; the caller keeps ownership.
    pub fn from_raw_fd(listener: RawFd, abort: &'a AbortFlag) -> Self {
        Self {
            listener: FileDescriptor::new(listener),
            abort,
            poll_interval: None,
            deadline: None,
            telemetry: None,
        }
    }

    /// How often the abort flag is looked at. Very small values burn CPU.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Total time to wait, measured from the start of the call.
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn telemetry(mut self, telemetry: &'a Telemetry) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    pub fn listener_fd(&self) -> RawFd {
        self.listener.as_raw_fd()
    }

    pub fn abort_flag(&self) -> &AbortFlag {
        self.abort
    }

    pub fn telemetry_sink(&self) -> Option<&'a Telemetry> {
        self.telemetry
    }

    pub fn schedule(&self) -> Result<WaitSchedule, ArgumentError> {
        match (self.poll_interval, self.deadline) {
            (None, None) => Err(ArgumentError::MissingWaitBound),
            (Some(poll), _) if poll.is_zero() => Err(ArgumentError::ZeroPollInterval),
            (Some(poll), None) => Ok(WaitSchedule::Poll(poll)),
            (None, Some(deadline)) => Ok(WaitSchedule::Deadline(deadline)),
            (Some(poll), Some(deadline)) => Ok(WaitSchedule::PollUntil { poll, deadline }),
        }
    }
}
