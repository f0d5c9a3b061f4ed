//! Planning engine, linear-program solver and plan reporting for the trade
//! planner.
//!
//! A run turns a catalog, the resources held and the resources wanted into
//! the execution counts that reach the target in the fewest elapsed days.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `planner-config.yaml` into
//!   strongly-typed structs, and the ledgers it describes.
//! - [`requirement`] -- [`PlanRequirement`]: character goals folded into the
//!   target ledger.
//! - [`progression`] -- [`ProgressionCosts`] trait and the [`CharacterTable`]
//!   implementation.
//! - [`matrix`] -- Dense row-major matrix used for the path-return matrix.
//! - [`lp`] -- Two-phase simplex for `min c.x, A x <= b, x >= 0`.
//! - [`engine`] -- [`PlanningEngine`]: matrix, objective and constraints.
//! - [`scheme`] -- [`Scheme`]: a solution and its derived balances.
//! - [`report`] -- [`PlanReport`]: filtered, labelled rows for rendering.
//! - [`planner`] -- [`run_plan`]: one run, end to end.
//!
//! # Usage
//!
//! ```
//! use tradeplan_core::{CharacterTable, PlannerConfig, catalog_for, run_plan};
//!
//! let config = PlannerConfig::parse("target_items:\n  Skill Summary - 3: 10\n")?;
//! let catalog = catalog_for(&config)?;
//!
//! let outcome = run_plan(&config, catalog, &CharacterTable::with_builtin())?;
//! assert!(outcome.report.elapsed_days > 0.0);
//! # Ok::<(), tradeplan_core::PlanError>(())
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod lp;
pub mod matrix;
pub mod planner;
pub mod progression;
pub mod report;
pub mod requirement;
pub mod scheme;

pub use config::{ConfigError, PlannerConfig, PlannerSettings};
pub use engine::PlanningEngine;
pub use error::{PlanError, ProgressionError};
pub use planner::{PlanOutcome, catalog_for, run_plan};
pub use progression::{CharacterRecord, CharacterTable, ProgressionCosts};
pub use report::PlanReport;
pub use requirement::{PlanRequirement, Progress, ResolvedPlan, SkillLevels};
pub use scheme::Scheme;
