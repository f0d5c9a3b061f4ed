//! Error types for the `tradeplan` binary.
//!
//! [`CliError`] wraps every failure a run can hit so `main` can propagate
//! with `?` and print one message.

use std::path::PathBuf;

use tradeplan_catalog::CatalogError;
use tradeplan_core::{ConfigError, PlanError, ProgressionError};

/// Top-level error for the `tradeplan` binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The configuration file could not be loaded.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// Drop records could not be turned into paths.
    #[error("catalog error: {source}")]
    Catalog {
        /// The underlying catalog error.
        #[from]
        source: CatalogError,
    },

    /// Character records could not be loaded.
    #[error("character records: {source}")]
    Progression {
        /// The underlying progression error.
        #[from]
        source: ProgressionError,
    },

    /// The planning run failed.
    #[error("planning failed: {source}")]
    Plan {
        /// The underlying planning error.
        #[from]
        source: PlanError,
    },

    /// An input or output file could not be accessed.
    #[error("{path}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The report could not be serialized to JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The text report could not be formatted.
    #[error("render error: {0}")]
    Render(#[from] std::fmt::Error),
}

impl CliError {
    /// Attach `path` to an I/O error.
    pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
