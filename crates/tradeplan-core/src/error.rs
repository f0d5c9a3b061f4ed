//! Error types for the `tradeplan-core` crate.
//!
//! [`PlanError`] is the top-level error of a planning run and wraps every
//! lower-level error via `#[from]`. None of these errors is retried; the
//! caller decides whether to adjust the catalog or ledgers and run again.

use tradeplan_catalog::CatalogError;
use tradeplan_ledger::LedgerError;

use crate::config::ConfigError;
use crate::lp::LpError;

/// Errors that can occur while resolving character progression costs.
#[derive(Debug, thiserror::Error)]
pub enum ProgressionError {
    /// No character record matches the name or alias.
    #[error("unknown character: {0:?}")]
    UnknownCharacter(String),

    /// A skill level is outside 1..=10 or has no cost data.
    #[error("{character}: invalid skill level {level}")]
    InvalidSkillLevel {
        /// The character being upgraded.
        character: String,
        /// The rejected level.
        level: u8,
    },

    /// A level does not exist at the given promotion for this character.
    #[error("{character}: invalid level E{elite} {level}")]
    InvalidLevel {
        /// The character being upgraded.
        character: String,
        /// Promotion stage.
        elite: u8,
        /// The rejected level.
        level: u32,
    },

    /// The requested start and end states are inconsistent.
    #[error("{character}: {reason}")]
    InvalidState {
        /// The character being upgraded.
        character: String,
        /// What is wrong with the states.
        reason: String,
    },

    /// A character record line could not be decoded.
    #[error("malformed character record on line {line}: {source}")]
    Record {
        /// 1-based line number in the input.
        line: usize,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// Reading character records failed.
    #[error("failed to read character records: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

/// Errors that can end a planning run.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// Catalog construction or validation failed.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// A ledger mutation referenced an unknown item.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// A progression requirement could not be resolved.
    #[error("progression error: {0}")]
    Progression(#[from] ProgressionError),

    /// The configuration could not be interpreted.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// No execution counts meet the demand within the usage caps.
    #[error("no plan satisfies the targets within the path limits")]
    Infeasible,

    /// The program has no finite optimum; the catalog is malformed.
    #[error("plan objective is unbounded; check the catalog for free day-producing loops")]
    Unbounded,

    /// No path consumes the day item.
    #[error("catalog has no day-recovery path")]
    MissingRecoveryPath,

    /// More than one path consumes the day item.
    #[error("catalog has {count} day-consuming paths, expected exactly one")]
    AmbiguousRecoveryPath {
        /// Number of day-consuming paths found.
        count: usize,
    },

    /// A ledger is bound to a different item space than the engine.
    #[error("ledger belongs to a different item space")]
    ItemSpaceMismatch,

    /// The solver failed for a reason other than infeasibility.
    #[error("solver failure: {0}")]
    Solver(String),
}

impl From<LpError> for PlanError {
    fn from(error: LpError) -> Self {
        match error {
            LpError::Infeasible => Self::Infeasible,
            LpError::Unbounded => Self::Unbounded,
            other @ (LpError::IterationLimit { .. } | LpError::Dimension { .. }) => {
                Self::Solver(other.to_string())
            }
        }
    }
}
