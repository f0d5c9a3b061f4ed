//! Error types for the `tradeplan-catalog` crate.
//!
//! All fallible catalog operations return [`CatalogError`]. Validation is
//! eager: an unknown item name is rejected when a path is built, never later
//! at solve time.

/// Errors that can occur while building the item space or trade paths.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// A path or lookup referenced an item absent from the item space.
    #[error("unknown item: {0:?}")]
    UnknownItem(String),

    /// An item name was registered twice.
    #[error("duplicate item: {0:?}")]
    DuplicateItem(String),

    /// A rate or cap was negative or not finite.
    #[error("invalid quantity {quantity} for {item:?}")]
    InvalidQuantity {
        /// The item (or cap name) the quantity belongs to.
        item: String,
        /// The rejected quantity.
        quantity: f64,
    },

    /// An enabled event name matched no event definition.
    #[error("unknown event: {0:?}")]
    UnknownEvent(String),

    /// A drop-record line could not be decoded.
    #[error("malformed drop record on line {line}: {source}")]
    DropRecord {
        /// 1-based line number in the input.
        line: usize,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// Reading drop records failed.
    #[error("failed to read drop records: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
