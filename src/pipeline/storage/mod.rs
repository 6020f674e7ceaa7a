// Pipeline storage: the bulk-load seam

pub mod in_memory;

pub use in_memory::InMemoryStore;

use crate::error::Result;
use crate::types::FieldRecord;

/// A destination for extracted records.
///
/// `insert_batch` is all-or-nothing: either every record is committed and the
/// affected row count is returned, or an error is returned and nothing from
/// the batch is kept. Inserts are plain appends, so loading the same records
/// twice stores them twice.
pub trait RecordStore {
    fn insert_batch(&mut self, records: &[FieldRecord]) -> Result<usize>;

    /// Human-readable name of the destination, used in status output.
    fn describe(&self) -> String;
}
