use cardferry_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("command failed: {0}")]
    Command(String),
    #[error("unavailable: {0}")]
    Unavailable(String),
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("destination rejected contact: {0}")]
    DestinationWrite(String),
}

pub type Result<T> = std::result::Result<T, SyncError>;
