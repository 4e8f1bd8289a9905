use crate::config::Config;
use crate::record::CountRecord;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

pub mod file;
pub mod mock;
pub mod remote;

use file::FileRecordSource;
use remote::HttpRecordSource;

/// Provider of the full person-count record list for one report scope.
///
/// Implementations block; callers on the async runtime go through
/// `spawn_blocking`.
pub trait RecordSource: Send + Sync + fmt::Debug {
    fn fetch_records(&self) -> Result<Vec<CountRecord>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("dns error: {0}")]
    Dns(String),
    #[error("connect error: {0}")]
    Connect(std::io::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("http status {0} ({1})")]
    Http(u16, String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("mock source failure: {0}")]
    Mock(String),
}

/// Decode a JSON array of count records.
///
/// Elements are decoded one by one so a single malformed record is skipped
/// instead of discarding the whole response.
pub fn parse_records(body: &str) -> Result<Vec<CountRecord>, SourceError> {
    let values: Vec<serde_json::Value> = serde_json::from_str(body)?;
    let total = values.len();
    let mut records = Vec::with_capacity(total);

    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<CountRecord>(value) {
            Ok(record) => records.push(record),
            Err(err) => warn!(index, error = %err, "Skipping malformed count record"),
        }
    }

    debug!(total, decoded = records.len(), "Decoded count records");
    Ok(records)
}

/// Build the configured source: a local file when `[source].path` is set,
/// otherwise the HTTP endpoint.
pub fn create_source(config: &Config) -> Arc<dyn RecordSource> {
    match config.source_path() {
        Some(path) => Arc::new(FileRecordSource::new(path.to_path_buf())),
        None => Arc::new(HttpRecordSource::new(
            config.source_endpoint().to_string(),
            config.source_timeout(),
        )),
    }
}
