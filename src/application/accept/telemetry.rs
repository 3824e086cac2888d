use crate::application::accept::connection::PeerAddress;
use crate::application::accept::outcome::AcceptStatus;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, SystemTime};

/// Progress and outcome data for accept calls.
///
/// Every field is behind one lock, so a reader never sees `end_time` without
/// the matching `last_result`. Observers get copies through [`Telemetry::snapshot`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TelemetryRecord {
    /// Waits that ended with no event during the current call.
    pub loop_counter: u64,
    /// Connections accepted through this sink over its whole lifetime.
    pub accepted_connections: u64,
    pub start_time: Option<SystemTime>,
    pub timeout_deadline: Option<SystemTime>,
    pub end_time: Option<SystemTime>,
    pub last_result: Option<AcceptStatus>,
    pub client_address: Option<String>,
    pub client_port: Option<u16>,
}

impl TelemetryRecord {
    /// Time from `start_time` to `end_time`.
    ///
    /// A call that finds the abort flag already set records only `end_time`
    /// and `last_result`; on a reused sink the start time (and client fields)
    /// then still belong to the previous call, so this spans both calls.
    pub fn elapsed(&self) -> Option<Duration> {
        let start = self.start_time?;
        let end = self.end_time?;
        Some(end.duration_since(start).unwrap_or(Duration::ZERO))
    }
}

/// Thread-safe telemetry sink. Can be reused across calls.
#[derive(Debug, Default)]
pub struct Telemetry {
    record: Mutex<TelemetryRecord>,
}

impl Telemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> TelemetryRecord {
        self.lock().clone()
    }

    pub fn loop_counter(&self) -> u64 {
        self.lock().loop_counter
    }

    pub fn accepted_connections(&self) -> u64 {
        self.lock().accepted_connections
    }

    /// True once the last call that used this sink has returned its outcome.
    ///
    /// After an abort observed on entry only `end_time` and `last_result` are
    /// fresh; the other fields are left from whatever call set them before.
    pub fn is_finished(&self) -> bool {
        let record = self.lock();
        record.start_time.is_some() && record.end_time.is_some()
    }

    // A panic on another thread while holding the lock must not break the acceptor.
    fn lock(&self) -> MutexGuard<'_, TelemetryRecord> {
        self.record.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn begin(&self, deadline: Option<Duration>) {
        let mut record = self.lock();
        let now = SystemTime::now();
        record.loop_counter = 0;
        record.start_time = Some(now);
        record.timeout_deadline = deadline.and_then(|d| now.checked_add(d));
        record.end_time = None;
        record.last_result = None;
        record.client_address = None;
        record.client_port = None;
    }

    pub(crate) fn tick(&self) {
        self.lock().loop_counter += 1;
    }

    pub(crate) fn record_client(&self, peer: &PeerAddress) {
        let mut record = self.lock();
        record.client_address = Some(peer.host());
        record.client_port = peer.port();
        record.accepted_connections += 1;
    }

    pub(crate) fn finish(&self, status: AcceptStatus) {
        let mut record = self.lock();
        record.end_time = Some(SystemTime::now());
        record.last_result = Some(status);
    }
}
