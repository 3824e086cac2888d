use crate::core::net::socket::disable_sigpipe;
use std::io;
use std::os::unix::io::RawFd;

/// Configuration applied to every accepted connection before it is returned.
///
/// If this fails the connection is closed and the accept reports an error.
pub trait ConnectionSetup {
    fn configure(&self, fd: RawFd) -> io::Result<()>;
}

/// Turns off broken-pipe signalling on the new connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisableSigPipe;

impl ConnectionSetup for DisableSigPipe {
    fn configure(&self, fd: RawFd) -> io::Result<()> {
        disable_sigpipe(fd)
    }
}

impl<F> ConnectionSetup for F
where
    F: Fn(RawFd) -> io::Result<()>,
{
    fn configure(&self, fd: RawFd) -> io::Result<()> {
        self(fd)
    }
}
