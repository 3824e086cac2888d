pub mod accept_server;
pub mod listener;

pub use accept_server::{AcceptServer, ServeSummary};
pub use listener::Listener;
