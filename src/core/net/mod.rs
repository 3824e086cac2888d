pub mod fd;
pub mod socket;

pub use fd::FileDescriptor;
pub use socket::{accept_raw, disable_sigpipe, peer_address, send_no_signal, ListeningSocket};
