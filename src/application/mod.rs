pub mod accept;
pub mod config;
pub mod server;
