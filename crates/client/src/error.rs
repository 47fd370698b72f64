use std::path::PathBuf;

use engine::EngineError;
use thiserror::Error;

/// Failure of a single HTTP call, classified by status code.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("http error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    pub(crate) fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Conflict(message),
            422 => Self::Validation(message),
            _ => Self::Server(message),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("invalid budget data: {0}")]
    Engine(#[from] EngineError),
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("the budget was changed by someone else: {0}")]
    Conflict(String),
    #[error(transparent)]
    Client(ClientError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl From<ClientError> for SaveError {
    fn from(value: ClientError) -> Self {
        match value {
            ClientError::Conflict(message) => Self::Conflict(message),
            other => Self::Client(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("{} is not a CSV file", .0.display())]
    InvalidFileType(PathBuf),
    #[error("no import in progress")]
    NoPendingImport,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
