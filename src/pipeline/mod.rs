// Data processing pipeline: ingestion, processing, CSV output and storage

pub mod csv_out;
pub mod ingestion;
pub mod processing;
pub mod storage;

use crate::config::Config;
use crate::error::Result;
use crate::metrics::time_stage;
use crate::types::{FieldRecord, RecordSequence};
use chrono::{DateTime, Utc};
use processing::{normalize_line_breaks, Extractor};
use serde::Serialize;
use std::path::PathBuf;
use storage::RecordStore;
use tracing::{info, info_span, instrument};

/// Result of a complete pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub input_file: PathBuf,
    pub records_found: usize,
    pub csv_file: PathBuf,
    pub csv_rows_written: usize,
    /// `None` for dry runs that never touched a store
    pub store: Option<String>,
    pub rows_inserted: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Load → normalize → extract → CSV → bulk insert, in one sequential pass.
pub struct Pipeline {
    config: Config,
    extractor: Extractor,
}

impl Pipeline {
    pub fn new(config: Config) -> Result<Self> {
        let extractor = Extractor::new(config.input.delimiter)?;
        Ok(Self { config, extractor })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Reads and extracts the configured input file.
    pub fn extract_records(&self) -> Result<RecordSequence> {
        let blob = {
            let _span = info_span!("load").entered();
            let _timing = time_stage("load");
            ingestion::load_source(&self.config.input.path)?
        };
        let _span = info_span!("extract").entered();
        let _timing = time_stage("extract");
        // The raw blob is dropped here; only the normalized copy is scanned
        let normalized = normalize_line_breaks(&blob);
        drop(blob);
        Ok(self.extractor.extract(&normalized))
    }

    /// Runs every stage except the store insert.
    #[instrument(skip_all, fields(input = %self.config.input.path.display()))]
    pub fn extract_only(&self) -> Result<PipelineResult> {
        let started_at = Utc::now();
        let records = self.extract_records()?;
        let csv_rows_written = self.write_csv(&records)?;
        Ok(PipelineResult {
            input_file: self.config.input.path.clone(),
            records_found: records.len(),
            csv_file: self.config.output.path.clone(),
            csv_rows_written,
            store: None,
            rows_inserted: 0,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Runs the full pipeline, opening the store only once the CSV is written.
    ///
    /// The store is dropped, closing its connection, before this returns.
    #[instrument(skip_all, fields(input = %self.config.input.path.display()))]
    pub fn run<S, F>(&self, connect: F) -> Result<PipelineResult>
    where
        S: RecordStore,
        F: FnOnce(&Config) -> Result<S>,
    {
        let started_at = Utc::now();
        info!("Starting pipeline");
        let records = self.extract_records()?;
        let csv_rows_written = self.write_csv(&records)?;
        let mut store = connect(&self.config)?;
        self.load_store(&records, csv_rows_written, &mut store, started_at)
    }

    /// Runs the full pipeline against an already open `store`.
    ///
    /// Any failure aborts the run; nothing is retried. The CSV file is written
    /// before the insert, so a rejected batch still leaves the CSV behind.
    #[instrument(skip_all, fields(input = %self.config.input.path.display(), store = %store.describe()))]
    pub fn run_with_store(&self, store: &mut dyn RecordStore) -> Result<PipelineResult> {
        let started_at = Utc::now();
        info!("Starting pipeline");
        let records = self.extract_records()?;
        let csv_rows_written = self.write_csv(&records)?;
        self.load_store(&records, csv_rows_written, store, started_at)
    }

    fn load_store<S: RecordStore + ?Sized>(
        &self,
        records: &[FieldRecord],
        csv_rows_written: usize,
        store: &mut S,
        started_at: DateTime<Utc>,
    ) -> Result<PipelineResult> {
        let rows_inserted = {
            let _span = info_span!("load_store").entered();
            let _timing = time_stage("load_store");
            store.insert_batch(records)?
        };

        info!(
            "Pipeline finished records={} csv_rows={} inserted={}",
            records.len(),
            csv_rows_written,
            rows_inserted
        );
        Ok(PipelineResult {
            input_file: self.config.input.path.clone(),
            records_found: records.len(),
            csv_file: self.config.output.path.clone(),
            csv_rows_written,
            store: Some(store.describe()),
            rows_inserted,
            started_at,
            finished_at: Utc::now(),
        })
    }

    fn write_csv(&self, records: &[FieldRecord]) -> Result<usize> {
        let _span = info_span!("write_csv").entered();
        let _timing = time_stage("write_csv");
        csv_out::write_records_csv(records, &self.config.output.path)
    }
}
