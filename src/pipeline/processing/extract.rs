//! Field extraction from the normalized source blob.
//!
//! A record is four free-text fields and a postal code, separated by a
//! single delimiter character:
//!
//! ```text
//! Alice Smith | alice@x.com | 555-1234 | 1 Main St | 90210
//! ```
//!
//! The pattern (shown for the default `|` delimiter) is
//!
//! ```text
//! (?P<name>[^|]+)\s*\|\s*(?P<email>[^|]+)\s*\|\s*(?P<phone>[^|]+)\s*\|\s*(?P<address>[^|]+)\s*\|\s*(?P<postal_code>[^\s|]+)
//! ```
//!
//! Each free-text group is the longest run of non-delimiter characters, so a
//! field can never contain the delimiter itself. Surrounding whitespace is
//! captured and trimmed when the `FieldRecord` is built.
//!
//! The postal code group takes the whole token after the last delimiter and
//! only then checks that it is all digits. A record like `... | 9A210` is
//! consumed and dropped in one piece; scanning resumes after the bad token,
//! which keeps the pattern from re-aligning its groups in the middle of it.

use crate::error::{EtlError, Result};
use crate::types::{FieldRecord, RecordSequence};
use regex::{CaptureMatches, Regex};
use tracing::{debug, info};

pub struct Extractor {
    delimiter: char,
    pattern: Regex,
}

impl Extractor {
    /// Builds an extractor for `delimiter`.
    ///
    /// Whitespace delimiters would collide with the padding rules and line
    /// normalization, alphanumeric ones with field content and the postal
    /// code; both are rejected.
    pub fn new(delimiter: char) -> Result<Self> {
        validate_delimiter(delimiter)?;
        let d = regex::escape(&delimiter.to_string());
        let free_text = |name: &str| format!(r"(?P<{name}>[^{d}]+)");
        let sep = format!(r"\s*{d}\s*");
        let source = format!(
            "{}{sep}{}{sep}{}{sep}{}{sep}(?P<postal_code>[^\\s{d}]+)",
            free_text("name"),
            free_text("email"),
            free_text("phone"),
            free_text("address"),
        );
        let pattern = Regex::new(&source)
            .map_err(|e| EtlError::Config(format!("invalid record pattern for delimiter {delimiter:?}: {e}")))?;
        Ok(Self { delimiter, pattern })
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Lazily yields records in source order.
    ///
    /// The iterator borrows `blob`; calling this again on the same blob
    /// produces the same sequence.
    pub fn records<'a>(&'a self, blob: &'a str) -> Records<'a> {
        Records {
            captures: self.pattern.captures_iter(blob),
        }
    }

    /// Collects every record in `blob`.
    pub fn extract(&self, blob: &str) -> RecordSequence {
        let records: RecordSequence = self.records(blob).collect();
        info!("Extracted records count={}", records.len());
        crate::metrics::extract::records_extracted(records.len());
        records
    }
}

/// Iterator over the records matched in one blob.
pub struct Records<'a> {
    captures: CaptureMatches<'a, 'a>,
}

impl Iterator for Records<'_> {
    type Item = FieldRecord;

    fn next(&mut self) -> Option<FieldRecord> {
        loop {
            let caps = self.captures.next()?;
            let postal_code = &caps["postal_code"];
            match FieldRecord::new(
                &caps["name"],
                &caps["email"],
                &caps["phone"],
                &caps["address"],
                postal_code,
            ) {
                Some(record) => return Some(record),
                None => {
                    debug!(
                        "Skipping candidate with non-numeric postal code at byte {}: {:?}",
                        caps.get(0).map_or(0, |m| m.start()),
                        postal_code
                    );
                    crate::metrics::extract::candidate_rejected();
                }
            }
        }
    }
}

/// Whitespace and alphanumeric characters cannot separate fields.
pub fn validate_delimiter(delimiter: char) -> Result<()> {
    if delimiter.is_whitespace() || delimiter.is_alphanumeric() {
        return Err(EtlError::Config(format!(
            "delimiter must be a punctuation or symbol character, got {delimiter:?}"
        )));
    }
    Ok(())
}
