use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("group label is required")]
    EmptyGroupLabel,
    #[error("invalid batch size: {0}")]
    InvalidBatchSize(usize),
    #[error("invalid index policy: {0} (expected snapshot|cumulative)")]
    InvalidIndexPolicy(String),
}
