use crate::source::SourceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid selection: {0}")]
    InvalidSelection(String),
    #[error("source error: {0}")]
    Source(#[from] SourceError),
    #[error("refresh task failed: {0}")]
    RefreshTask(String),
    #[error("state lock poisoned")]
    StateLock,
}
