use crate::common::constants::UNKNOWN_PEER;
use crate::core::net::fd::FileDescriptor;
use crate::core::net::socket::send_no_signal;
use std::fmt;
use std::io;
use std::net::{SocketAddr, TcpStream};
use std::os::unix::io::{AsRawFd, FromRawFd, IntoRawFd, RawFd};

/// Remote end of an accepted connection, as far as it could be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerAddress {
    Inet(SocketAddr),
    /// Resolution failed or the family has no IP/port (e.g. Unix-domain).
    Unknown,
}

impl PeerAddress {
    pub fn host(&self) -> String {
        match self {
            PeerAddress::Inet(addr) => addr.ip().to_string(),
            PeerAddress::Unknown => UNKNOWN_PEER.to_string(),
        }
    }

    pub fn port(&self) -> Option<u16> {
        match self {
            PeerAddress::Inet(addr) => Some(addr.port()),
            PeerAddress::Unknown => None,
        }
    }
}

impl fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeerAddress::Inet(addr) => write!(f, "{}", addr),
            PeerAddress::Unknown => f.write_str(UNKNOWN_PEER),
        }
    }
}

/// An accepted connection. The caller owns it; dropping it closes the socket.
#[derive(Debug)]
pub struct ConnectionHandle {
    fd: FileDescriptor,
    peer: PeerAddress,
}

impl ConnectionHandle {
    pub(crate) fn new(fd: FileDescriptor, peer: PeerAddress) -> Self {
        Self { fd, peer }
    }

    pub fn peer(&self) -> PeerAddress {
        self.peer
    }

    /// Write without risking SIGPIPE; a vanished peer shows up as `EPIPE`.
    pub fn send(&self, buf: &[u8]) -> io::Result<usize> {
        send_no_signal(self.fd.as_raw_fd(), buf)
    }

    pub fn send_all(&self, mut buf: &[u8]) -> io::Result<()> {
        while !buf.is_empty() {
            let n = self.send(buf)?;
            if n == 0 {
                return Err(io::Error::from(io::ErrorKind::WriteZero));
            }
            buf = &buf[n..];
        }
        Ok(())
    }

    /// On Linux there is no socket option that suppresses SIGPIPE, so writes
    /// through the returned stream rely on the process ignoring the signal
    /// (Rust binaries do by default). Use [`ConnectionHandle::send`] otherwise.
    pub fn into_tcp_stream(self) -> TcpStream {
        unsafe { TcpStream::from_raw_fd(self.into_raw_fd()) }
    }
}

impl AsRawFd for ConnectionHandle {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}

/// The raw descriptor carries no SIGPIPE protection on Linux; writers must
/// pass `MSG_NOSIGNAL` or run with SIGPIPE ignored.
impl IntoRawFd for ConnectionHandle {
    fn into_raw_fd(self) -> RawFd {
        self.fd.into_raw_fd()
    }
}
