use std::io;

use thiserror::Error;

/// Failure talking to the text-completion provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("failed to reach provider: {0}")]
    Network(String),
    #[error("provider responded with {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
