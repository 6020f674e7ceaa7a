pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod types;

pub use config::Config;
pub use db::SqliteStore;
pub use error::{EtlError, Result};
pub use pipeline::storage::{InMemoryStore, RecordStore};
pub use pipeline::{Pipeline, PipelineResult};
pub use types::{FieldRecord, RecordSequence};
