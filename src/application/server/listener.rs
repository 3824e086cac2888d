use crate::common::error::Result;
use crate::core::net::socket::ListeningSocket;
use std::net::SocketAddr;
use std::os::unix::io::{AsRawFd, RawFd};

/// Listener manages a listening socket for accepting connections
pub struct Listener {
    socket: ListeningSocket,
    addr: SocketAddr,
}

impl Listener {
    /// Create a new listener bound to the given address
    pub fn new(addr: SocketAddr) -> Result<Self> {
        let socket = ListeningSocket::bind(addr)?;
        // Resolve port 0 to the one the kernel picked
        let addr = socket.local_addr()?;
        Ok(Self { socket, addr })
    }

    /// Get the socket address this listener is bound to
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl AsRawFd for Listener {
    fn as_raw_fd(&self) -> RawFd {
        self.socket.as_raw_fd()
    }
}
