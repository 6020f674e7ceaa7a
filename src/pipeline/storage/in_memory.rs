use super::RecordStore;
use crate::error::Result;
use crate::types::FieldRecord;
use tracing::debug;

/// In-memory store for dry runs and tests
#[derive(Debug, Default)]
pub struct InMemoryStore {
    rows: Vec<FieldRecord>,
    batches: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[FieldRecord] {
        &self.rows
    }

    /// Number of committed batches, including empty ones.
    pub fn batches(&self) -> usize {
        self.batches
    }
}

impl RecordStore for InMemoryStore {
    fn insert_batch(&mut self, records: &[FieldRecord]) -> Result<usize> {
        self.rows.extend_from_slice(records);
        self.batches += 1;
        debug!("Stored batch of {} rows in memory (total {})", records.len(), self.rows.len());
        Ok(records.len())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
