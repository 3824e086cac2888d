use crate::common::error::{Result, SockAcceptError};
use crate::common::time::budget_to_millis;
use std::io;
use std::os::unix::io::RawFd;
use std::time::Duration;

/// What a single readiness wait observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// The descriptor has something pending (or an error to report).
    Ready,
    /// The budget ran out, or the wait was interrupted, with no event.
    Expired,
}

/// Single-descriptor readiness wait built on `poll(2)`.
pub struct Poller {
    fd: RawFd,
}

impl Poller {
    pub fn new(fd: RawFd) -> Self {
        Self { fd }
    }

    pub fn as_raw_fd(&self) -> RawFd {
        self.fd
    }

    /// Block until the descriptor is readable or `budget` elapses.
    pub fn wait_readable(&self, budget: Duration) -> Result<Readiness> {
        let mut pfd = libc::pollfd {
            fd: self.fd,
            events: libc::POLLIN,
            revents: 0,
        };

        let n = unsafe { libc::poll(&mut pfd, 1, budget_to_millis(budget)) };
        if n < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(Readiness::Expired);
            }
            return Err(SockAcceptError::Network(err.to_string()));
        }
        if n == 0 {
            return Ok(Readiness::Expired);
        }

        if pfd.revents & libc::POLLNVAL != 0 {
            return Err(SockAcceptError::Network(format!(
                "invalid listening socket (fd {})",
                self.fd
            )));
        }

        // POLLERR/POLLHUP count as ready: accept(2) reports the actual error.
        if pfd.revents & (libc::POLLIN | libc::POLLERR | libc::POLLHUP) != 0 {
            Ok(Readiness::Ready)
        } else {
            Ok(Readiness::Expired)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{TcpListener, TcpStream};
    use std::os::unix::io::AsRawFd;
    use std::time::Instant;

    #[test]
    fn test_wait_expires_without_connection() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let poller = Poller::new(listener.as_raw_fd());

        let start = Instant::now();
        let readiness = poller.wait_readable(Duration::from_millis(30)).unwrap();
        assert_eq!(readiness, Readiness::Expired);
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_wait_ready_with_pending_connection() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let _client = TcpStream::connect(listener.local_addr().unwrap()).unwrap();
        let poller = Poller::new(listener.as_raw_fd());

        let readiness = poller.wait_readable(Duration::from_secs(5)).unwrap();
        assert_eq!(readiness, Readiness::Ready);
    }

    #[test]
    fn test_wait_on_invalid_descriptor_fails() {
        let poller = Poller::new(i32::MAX);
        assert!(poller.wait_readable(Duration::from_millis(10)).is_err());
    }
}
