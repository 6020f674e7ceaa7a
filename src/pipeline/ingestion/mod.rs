// Pipeline ingestion: reading the source text into memory

use crate::error::{EtlError, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, instrument};

/// Reads the whole source file as one UTF-8 string.
///
/// Missing files, permission problems and invalid UTF-8 all surface as
/// `EtlError::FileAccess`; there is no partial read.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_source<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let blob = fs::read_to_string(path).map_err(|e| EtlError::file_access(path, e))?;
    debug!("Loaded source bytes_len={}", blob.len());
    Ok(blob)
}
