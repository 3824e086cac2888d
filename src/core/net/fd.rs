use crate::common::error::{Result, SockAcceptError};
use std::os::unix::io::{AsRawFd, RawFd};

/// Raw descriptor that is closed on drop only when owned.
#[derive(Debug)]
pub struct FileDescriptor {
    fd: RawFd,
    owned: bool,
}

impl FileDescriptor {
    /// Borrow a descriptor owned elsewhere; it is never closed by this wrapper.
    pub fn new(fd: RawFd) -> Self {
        Self { fd, owned: false }
    }

    /// Take ownership of a descriptor.
    pub fn from_raw(fd: RawFd) -> Self {
        Self { fd, owned: true }
    }

    pub fn as_raw_fd(&self) -> RawFd {
        self.fd
    }

    pub fn is_owned(&self) -> bool {
        self.owned
    }

    /// Give up ownership without closing.
    pub fn into_raw_fd(mut self) -> RawFd {
        self.owned = false;
        self.fd
    }

    pub fn set_non_blocking(&self) -> Result<()> {
        unsafe {
            let flags = libc::fcntl(self.fd, libc::F_GETFL);
            if flags < 0 {
                return Err(SockAcceptError::Network(format!(
                    "Failed to get socket flags: {}",
                    std::io::Error::last_os_error()
                )));
            }

            if libc::fcntl(self.fd, libc::F_SETFL, flags | libc::O_NONBLOCK) < 0 {
                return Err(SockAcceptError::Network(format!(
                    "Failed to set non-blocking mode: {}",
                    std::io::Error::last_os_error()
                )));
            }
        }
        Ok(())
    }
}

impl AsRawFd for FileDescriptor {
    fn as_raw_fd(&self) -> RawFd {
        self.fd
    }
}

impl Drop for FileDescriptor {
    fn drop(&mut self) {
        if self.owned && self.fd >= 0 {
            unsafe {
                libc::close(self.fd);
            }
        }
    }
}
