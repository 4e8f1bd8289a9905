use crate::record::CountRecord;
use crate::source::{RecordSource, SourceError, parse_records};
use std::path::{Path, PathBuf};

/// Reads a saved person-count response from disk.
#[derive(Debug, Clone)]
pub struct FileRecordSource {
    path: PathBuf,
}

impl FileRecordSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for FileRecordSource {
    fn fetch_records(&self) -> Result<Vec<CountRecord>, SourceError> {
        let contents = std::fs::read_to_string(&self.path)?;
        parse_records(&contents)
    }
}
