//! Per-index configuration.
//!
//! Hosts usually embed an `[index]` table in their own TOML; `from_toml_str`
//! takes just that table's body.

use serde::{Deserialize, Serialize};
use std::{
    io,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

/// Default ceiling for encoded snapshot payloads accepted by `restore_from_bytes`.
pub const DEFAULT_MAX_SNAPSHOT_BYTES: usize = 4 * 1024 * 1024;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

///
/// IndexConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    /// Trace every node visited by the insertion scan.
    pub debug: bool,

    /// Route operation counters through `obs`.
    pub metrics: bool,

    /// Deliver `ListEvent`s to the installed sink.
    pub events: bool,

    pub max_snapshot_bytes: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            debug: false,
            metrics: true,
            events: true,
            max_snapshot_bytes: DEFAULT_MAX_SNAPSHOT_BYTES,
        }
    }
}

impl IndexConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;

        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_snapshot_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "max_snapshot_bytes",
                reason: "must be greater than zero".into(),
            });
        }

        Ok(())
    }

    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub const fn with_metrics(mut self, metrics: bool) -> Self {
        self.metrics = metrics;
        self
    }

    #[must_use]
    pub const fn with_events(mut self, events: bool) -> Self {
        self.events = events;
        self
    }

    #[must_use]
    pub const fn with_max_snapshot_bytes(mut self, max_snapshot_bytes: usize) -> Self {
        self.max_snapshot_bytes = max_snapshot_bytes;
        self
    }
}

///
/// TESTS
///
