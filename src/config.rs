use crate::constants::*;
use crate::error::{EtlError, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub path: PathBuf,
    pub delimiter: char,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub table: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_INPUT_FILE),
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CSV_FILE),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATABASE_FILE),
            table: DEFAULT_TABLE.to_string(),
        }
    }
}

impl Config {
    /// Resolves configuration from defaults, a TOML file and the environment.
    ///
    /// An explicit `path` must exist. Without one, `employee_etl.toml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?,
            None => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };
        config.apply_env(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            EtlError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        let config = Self::from_toml(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Overrides values from environment variables, looked up via `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = non_empty(ENV_INPUT) {
            self.input.path = PathBuf::from(v);
        }
        if let Some(v) = non_empty(ENV_OUTPUT) {
            self.output.path = PathBuf::from(v);
        }
        if let Some(v) = non_empty(ENV_DATABASE) {
            self.database.path = PathBuf::from(v);
        }
        if let Some(v) = non_empty(ENV_TABLE) {
            self.database.table = v.trim().to_string();
        }
    }

    pub fn validate(&self) -> Result<()> {
        crate::pipeline::processing::extract::validate_delimiter(self.input.delimiter)?;
        if !crate::db::is_valid_identifier(&self.database.table) {
            return Err(EtlError::Config(format!(
                "database.table {:?} is not a plain SQL identifier",
                self.database.table
            )));
        }
        Ok(())
    }
}
