use thiserror::Error;

#[derive(Debug, Error)]
pub enum SockAcceptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),
}

pub type Result<T> = std::result::Result<T, SockAcceptError>;
