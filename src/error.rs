use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("File access failed for {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Store connection error: {0}")]
    StoreConnection(String),

    #[error("Store constraint violated, batch rolled back: {0}")]
    StoreConstraint(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl EtlError {
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }

    /// Classifies a failure raised while writing to the store.
    ///
    /// Constraint violations get their own variant so callers can tell a
    /// rejected batch apart from a broken connection.
    pub fn from_store(err: rusqlite::Error) -> Self {
        match err.sqlite_error_code() {
            Some(rusqlite::ErrorCode::ConstraintViolation) => Self::StoreConstraint(err.to_string()),
            Some(
                rusqlite::ErrorCode::CannotOpen
                | rusqlite::ErrorCode::NotADatabase
                | rusqlite::ErrorCode::PermissionDenied
                | rusqlite::ErrorCode::ReadOnly,
            ) => Self::StoreConnection(err.to_string()),
            _ => Self::Database(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
