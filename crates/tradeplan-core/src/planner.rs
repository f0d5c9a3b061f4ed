//! One planning run, end to end.
//!
//! [`run_plan`] is the only place the pieces meet: it freezes the catalog,
//! builds both ledgers from the configuration, folds the character plans
//! into the target, solves, checks the solution and projects it into a
//! [`PlanReport`].

use std::sync::Arc;

use tradeplan_catalog::{Catalog, build_catalog};
use tradeplan_ledger::Audit;

use crate::config::PlannerConfig;
use crate::engine::PlanningEngine;
use crate::error::PlanError;
use crate::progression::ProgressionCosts;
use crate::report::PlanReport;
use crate::requirement::ResolvedPlan;
use crate::scheme::Scheme;

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    /// Render-ready report.
    pub report: PlanReport,
    /// The raw solution.
    pub scheme: Scheme,
    /// The engine the scheme was solved with.
    pub engine: PlanningEngine,
    /// Held resources, including the day endowment.
    pub current: Audit,
    /// Explicit targets plus resolved plan requirements.
    pub target: Audit,
}

/// Build the built-in catalog for the configured rates and events.
///
/// # Errors
///
/// Returns [`PlanError::Catalog`] if a built-in table is inconsistent or a
/// configured rate is invalid.
pub fn catalog_for(config: &PlannerConfig) -> Result<Catalog, PlanError> {
    Ok(build_catalog(&config.catalog_params())?)
}

/// Plan the cheapest way from the configured holdings to the configured
/// targets over `catalog`.
///
/// # Errors
///
/// Fails on any configuration, ledger or progression error while building
/// the ledgers, and with [`PlanError::Infeasible`] when no plan exists.
pub fn run_plan(
    config: &PlannerConfig,
    catalog: Catalog,
    costs: &dyn ProgressionCosts,
) -> Result<PlanOutcome, PlanError> {
    let (space, paths) = catalog.into_parts();
    let paths = config.retain_enabled(&space, paths);
    let space = Arc::new(space);

    let current = config.current_ledger(Arc::clone(&space))?;
    let mut target = config.target_ledger(Arc::clone(&space))?;

    let mut plans = Vec::new();
    for requirement in config.requirements()? {
        let items = requirement.resolve(costs, &mut target)?;
        plans.push(ResolvedPlan { requirement, items });
    }

    let engine = PlanningEngine::new(Arc::clone(&space), paths)?;
    let scheme = engine.solve(&current, &target)?;
    let shortfalls = scheme.verify(&current, &target);

    let report = PlanReport::build(config, &engine, &scheme, &current, &target, &plans);
    tracing::info!(
        plans = plans.len(),
        days = report.elapsed_days,
        recovery_units = report.recovery_units,
        items = report.items.len(),
        paths = report.paths.len(),
        shortfalls = shortfalls.len(),
        "planning run complete"
    );

    Ok(PlanOutcome {
        report,
        scheme,
        engine,
        current,
        target,
    })
}
