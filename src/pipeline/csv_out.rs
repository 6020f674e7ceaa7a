use crate::error::{EtlError, Result};
use crate::types::FieldRecord;
use std::fs::{self, File};
use std::path::Path;
use tracing::{info, instrument};

/// Writes `records` as CSV to `path`, replacing any existing file.
///
/// The header row comes from the serde field names of `FieldRecord`
/// (`Name,Email,Phone,Address,PostalCode`) and is written even when there
/// are no records. Returns the number of data rows written.
#[instrument(skip_all, fields(path = %path.as_ref().display(), records = records.len()))]
pub fn write_records_csv<P: AsRef<Path>>(records: &[FieldRecord], path: P) -> Result<usize> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| EtlError::file_access(parent, e))?;
    }
    let file = File::create(path).map_err(|e| EtlError::file_access(path, e))?;
    let rows = write_records(records, file)?;
    info!("Wrote CSV rows={}", rows);
    crate::metrics::csv_out::rows_written(rows);
    Ok(rows)
}

/// Serializes `records` with a header row into any writer.
pub fn write_records<W: std::io::Write>(records: &[FieldRecord], sink: W) -> Result<usize> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(sink);
    // Explicit header so an empty record set still produces one
    writer.write_record(crate::constants::CSV_HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(records.len())
}
