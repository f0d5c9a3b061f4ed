//! Resource ledgers for the trade planner.
//!
//! An [`Audit`] is a sparse quantity vector over a fixed
//! [`ItemSpace`](tradeplan_catalog::ItemSpace). A planning run keeps two of
//! them: what is currently held and what the plan must end with. Both are
//! only ever gained into; there is no subtraction API.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//!
//! use tradeplan_catalog::ItemSpace;
//! use tradeplan_ledger::Audit;
//!
//! let mut space = ItemSpace::new();
//! space.register_all("materials", ["Orirock", "Sugar"]).ok();
//! let space = Arc::new(space);
//!
//! let mut held = Audit::new(Arc::clone(&space));
//! held.gain("Sugar", 3.0).ok();
//! held.gain("Sugar", 2.0).ok();
//!
//! assert_eq!(held.to_vector(), vec![0.0, 5.0]);
//! ```

pub mod audit;

// Re-export primary types at crate root.
pub use audit::Audit;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when accumulating into a ledger.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The item is not registered in the ledger's item space.
    #[error("unknown item: {0:?}")]
    UnknownItem(String),

    /// The quantity was NaN or infinite.
    #[error("non-finite quantity for {item:?}")]
    NonFiniteQuantity {
        /// The item the quantity was destined for.
        item: String,
    },
}
