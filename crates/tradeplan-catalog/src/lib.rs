//! Items and trade paths for the trade planner.
//!
//! The catalog is the static half of a planning run: which resources exist
//! and which conversions between them are available.
//!
//! # Architecture
//!
//! - [`item`] -- [`ItemSpace`]: the ordered registry mapping names to [`ItemId`]s.
//! - [`path`] -- [`TradePath`] and [`TradePathBuilder`]: validated recipes with
//!   optional usage caps.
//! - [`builtin`] -- [`build_catalog`]: the built-in item and path tables.
//! - [`events`] -- Limited-time event shops as data.
//! - [`drops`] -- Battle paths loaded from stage drop statistics.
//!
//! # The day item
//!
//! The reserved item [`DAY`] stands for one elapsed real-world day. Exactly
//! one path in a catalog consumes it: the day-recovery path, which turns a day
//! into that day's sanity and base income. Its execution count is the length
//! of the plan, and per-day usage caps scale with it.
//!
//! # Usage
//!
//! ```
//! use tradeplan_catalog::{CatalogParams, DAY, build_catalog};
//!
//! let catalog = build_catalog(&CatalogParams::default())?;
//! let day = catalog.items.index_of(DAY)?;
//! let recovery = catalog.paths.iter().filter(|p| p.consumes(day));
//! assert_eq!(recovery.count(), 1);
//! # Ok::<(), tradeplan_catalog::CatalogError>(())
//! ```

pub mod builtin;
pub mod drops;
pub mod error;
pub mod events;
pub mod item;
pub mod path;

// Re-export primary types at crate root.
pub use builtin::{Catalog, CatalogParams, build_catalog, builtin_items, recovery_path};
pub use drops::load_drop_paths;
pub use error::CatalogError;
pub use events::{EventDefinition, ShopEntry};
pub use item::{DAY, EXP_K, Item, ItemId, ItemSpace, LMD_K, SANITY};
pub use path::{PathLimits, TradePath, TradePathBuilder};
