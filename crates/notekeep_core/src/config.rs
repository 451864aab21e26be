//! Runtime configuration for hosts embedding the note store.
//!
//! # Responsibility
//! - Resolve backend, data location, slot and logging settings from the
//!   environment, with defaults for everything.
//! - Validate values up front so hosts fail before touching storage.
//!
//! # Invariants
//! - A resolved config always carries a valid slot name and log level.
//! - `log_dir`, when set, is absolute.

use crate::logging::{default_log_level, normalize_level, normalize_log_dir, LogTarget};
use crate::storage::validate_slot_name;
use crate::store::DEFAULT_SLOT_NAME;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

pub const ENV_BACKEND: &str = "NOTEKEEP_BACKEND";
pub const ENV_DATA_PATH: &str = "NOTEKEEP_DATA_PATH";
pub const ENV_SLOT: &str = "NOTEKEEP_SLOT";
pub const ENV_LOG_LEVEL: &str = "NOTEKEEP_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "NOTEKEEP_LOG_DIR";

const DEFAULT_FILE_DIR_NAME: &str = "notekeep";
const DEFAULT_SQLITE_FILE_NAME: &str = "notekeep.sqlite3";

/// Durable storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// One JSON file per slot in a directory.
    File,
    /// `slots` table in a SQLite database file.
    Sqlite,
}

impl StorageBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Sqlite => "sqlite",
        }
    }

    /// Default data location for this backend under the temp directory.
    pub fn default_data_path(self) -> PathBuf {
        match self {
            Self::File => std::env::temp_dir().join(DEFAULT_FILE_DIR_NAME),
            Self::Sqlite => std::env::temp_dir().join(DEFAULT_SQLITE_FILE_NAME),
        }
    }
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(ConfigError::InvalidBackend(other.to_string())),
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidBackend(String),
    InvalidSlotName(String),
    InvalidLogLevel(String),
    InvalidLogDir(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBackend(value) => {
                write!(f, "unsupported backend `{value}`; expected file|sqlite")
            }
            Self::InvalidSlotName(value) => write!(f, "invalid slot name `{value}`"),
            Self::InvalidLogLevel(value) => write!(f, "invalid log level `{value}`"),
            Self::InvalidLogDir(details) => write!(f, "invalid log dir: {details}"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved host configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotekeepConfig {
    pub backend: StorageBackend,
    /// Directory (file backend) or database file (sqlite backend).
    pub data_path: PathBuf,
    pub slot: String,
    pub log_level: &'static str,
    /// `None` logs to stderr.
    pub log_dir: Option<PathBuf>,
}

impl Default for NotekeepConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_path: StorageBackend::File.default_data_path(),
            slot: DEFAULT_SLOT_NAME.to_string(),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl NotekeepConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(backend) = read(ENV_BACKEND) {
            config = config.with_backend(backend.parse()?);
        }
        if let Some(path) = read(ENV_DATA_PATH) {
            config.data_path = PathBuf::from(path);
        }
        if let Some(slot) = read(ENV_SLOT) {
            config = config.with_slot(slot)?;
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config = config.with_log_level(&level)?;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            config = config.with_log_dir(&dir)?;
        }
        Ok(config)
    }

    /// Switches backend; a data path still at the old default follows along.
    pub fn with_backend(mut self, backend: StorageBackend) -> Self {
        if self.data_path == self.backend.default_data_path() {
            self.data_path = backend.default_data_path();
        }
        self.backend = backend;
        self
    }

    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = path.into();
        self
    }

    pub fn with_slot(mut self, slot: impl Into<String>) -> Result<Self, ConfigError> {
        let slot = slot.into();
        validate_slot_name(&slot).map_err(|_| ConfigError::InvalidSlotName(slot.clone()))?;
        self.slot = slot;
        Ok(self)
    }

    pub fn with_log_level(mut self, level: &str) -> Result<Self, ConfigError> {
        self.log_level =
            normalize_level(level).map_err(|_| ConfigError::InvalidLogLevel(level.to_string()))?;
        Ok(self)
    }

    pub fn with_log_dir(mut self, dir: &str) -> Result<Self, ConfigError> {
        let path =
            normalize_log_dir(dir).map_err(|err| ConfigError::InvalidLogDir(err.to_string()))?;
        self.log_dir = Some(path);
        Ok(self)
    }

    /// Logging target implied by `log_dir`.
    pub fn log_target(&self) -> LogTarget {
        match &self.log_dir {
            Some(dir) => LogTarget::Directory(dir.clone()),
            None => LogTarget::Stderr,
        }
    }
}
