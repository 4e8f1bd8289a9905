use crate::record::CountRecord;
use crate::source::{RecordSource, SourceError};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone)]
pub enum MockFetchBehavior {
    Records(Vec<CountRecord>),
    Fail,
}

impl MockFetchBehavior {
    pub fn ok(records: Vec<CountRecord>) -> Self {
        Self::Records(records)
    }

    pub fn fail() -> Self {
        Self::Fail
    }
}

/// Scripted source: each fetch consumes the next behavior, repeating the
/// last one once the script runs out.
#[derive(Debug)]
pub struct MockRecordSource {
    behaviors: Mutex<Vec<MockFetchBehavior>>,
    fetches: AtomicUsize,
}

impl MockRecordSource {
    pub fn new(behaviors: Vec<MockFetchBehavior>) -> Self {
        Self {
            behaviors: Mutex::new(behaviors),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn with_records(records: Vec<CountRecord>) -> Self {
        Self::new(vec![MockFetchBehavior::ok(records)])
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    fn next_behavior(&self) -> Result<MockFetchBehavior, SourceError> {
        let mut behaviors = self
            .behaviors
            .lock()
            .map_err(|_| SourceError::Mock("behavior lock poisoned".to_string()))?;
        let behavior = if behaviors.len() > 1 {
            behaviors.remove(0)
        } else {
            behaviors
                .first()
                .cloned()
                .unwrap_or(MockFetchBehavior::Records(Vec::new()))
        };
        Ok(behavior)
    }
}

impl RecordSource for MockRecordSource {
    fn fetch_records(&self) -> Result<Vec<CountRecord>, SourceError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        match self.next_behavior()? {
            MockFetchBehavior::Records(records) => Ok(records),
            MockFetchBehavior::Fail => Err(SourceError::Mock("scripted fetch failure".to_string())),
        }
    }
}
