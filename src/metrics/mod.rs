//! Pipeline metrics
//!
//! Thin wrappers over the `metrics` facade, one submodule per stage. No
//! recorder is installed by this crate; embedders that install one get the
//! counters below, otherwise every call is a no-op.

pub mod core;

pub use self::core::{time_stage, TimingGuard};

pub const STAGE_DURATION_SECONDS: &str = "etl_stage_duration_seconds";
pub const RECORDS_EXTRACTED_TOTAL: &str = "etl_records_extracted_total";
pub const CANDIDATES_REJECTED_TOTAL: &str = "etl_candidates_rejected_total";
pub const CSV_ROWS_WRITTEN_TOTAL: &str = "etl_csv_rows_written_total";
pub const ROWS_INSERTED_TOTAL: &str = "etl_rows_inserted_total";

pub mod extract {
    pub fn records_extracted(count: usize) {
        ::metrics::counter!(super::RECORDS_EXTRACTED_TOTAL).increment(count as u64);
    }

    pub fn candidate_rejected() {
        ::metrics::counter!(super::CANDIDATES_REJECTED_TOTAL).increment(1);
    }
}

pub mod csv_out {
    pub fn rows_written(count: usize) {
        ::metrics::counter!(super::CSV_ROWS_WRITTEN_TOTAL).increment(count as u64);
    }
}

pub mod store {
    pub fn rows_inserted(count: usize) {
        ::metrics::counter!(super::ROWS_INSERTED_TOTAL).increment(count as u64);
    }
}
