//! End-to-end planning scenarios for `tradeplan-core`.
//!
//! Small hand-built catalogs pin down the solver's answers exactly; the
//! built-in catalog runs check that a realistic configuration plans.

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::indexing_slicing
)]

use std::sync::Arc;

use tradeplan_catalog::{Catalog, DAY, ItemSpace, PathLimits, TradePath};
use tradeplan_core::config::{PlanEntry, Quantity, SkillSpec, StateEntry};
use tradeplan_core::progression::DEMO_CHARACTER;
use tradeplan_core::{
    CharacterTable, PlanError, PlanRequirement, PlannerConfig, PlanningEngine, Progress,
    ProgressionCosts, SkillLevels, catalog_for, run_plan,
};
use tradeplan_ledger::Audit;

const EPS: f64 = 1e-6;

// =============================================================================
// Helper: the AP/Gold economy
// =============================================================================

/// Items: day, AP, Gold. A day yields 10 AP; 5 AP convert to 5 Gold.
fn gold_space() -> Arc<ItemSpace> {
    let mut space = ItemSpace::new();
    space.register_all("test", [DAY, "AP", "Gold"]).unwrap();
    Arc::new(space)
}

fn gold_paths(space: &ItemSpace, convert_limits: PathLimits) -> Vec<TradePath> {
    vec![
        TradePath::builder("day")
            .cost(DAY, 1.0)
            .yields("AP", 10.0)
            .build(space)
            .unwrap(),
        TradePath::build(space, [("AP", 5.0)], [("Gold", 5.0)], "convert", convert_limits)
            .unwrap(),
    ]
}

fn ledgers(space: &Arc<ItemSpace>, gold: f64) -> (Audit, Audit) {
    let mut current = Audit::new(Arc::clone(space));
    let mut target = Audit::new(Arc::clone(space));
    current.gain(DAY, 100.0).unwrap();
    target.gain("Gold", gold).unwrap();
    (current, target)
}

fn gold_engine() -> PlanningEngine {
    let space = gold_space();
    let paths = gold_paths(&space, PathLimits::default());
    PlanningEngine::new(space, paths).unwrap()
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn two_days_of_ap_make_twenty_gold() {
    let engine = gold_engine();
    let (current, target) = ledgers(engine.space(), 20.0);
    let scheme = engine.solve(&current, &target).unwrap();

    let counts = scheme.path_counts();
    assert!((counts[0] - 2.0).abs() < EPS, "x_day = {}", counts[0]);
    assert!((counts[1] - 4.0).abs() < EPS, "x_convert = {}", counts[1]);
    assert!((scheme.elapsed_days() - 2.0).abs() < EPS);
    assert!((scheme.objective() - 2.0).abs() < EPS);
    // floor(2 * 10) + 1, allowing for a pivot that lands just under 2 days.
    let units = scheme.recovery_units(10.0);
    assert!((20.0..=21.0).contains(&units), "{units}");
}

#[test]
fn unproducible_target_is_infeasible() {
    let mut space = ItemSpace::new();
    space.register_all("test", [DAY, "AP", "Gold", "Diamond"]).unwrap();
    let space = Arc::new(space);
    let paths = gold_paths(&space, PathLimits::default());
    let engine = PlanningEngine::new(Arc::clone(&space), paths).unwrap();

    let mut current = Audit::new(Arc::clone(&space));
    let mut target = Audit::new(space);
    current.gain(DAY, 100.0).unwrap();
    target.gain("Diamond", 1.0).unwrap();

    assert!(matches!(
        engine.solve(&current, &target),
        Err(PlanError::Infeasible)
    ));
}

#[test]
fn exhausted_lifetime_cap_is_infeasible() {
    let space = gold_space();
    let limits = PathLimits {
        max_count: Some(1.0),
        max_count_per_day: None,
    };
    let paths = gold_paths(&space, limits);
    let engine = PlanningEngine::new(Arc::clone(&space), paths).unwrap();
    let (current, target) = ledgers(&space, 20.0);

    assert!(matches!(
        engine.solve(&current, &target),
        Err(PlanError::Infeasible)
    ));
}

#[test]
fn day_budget_bounds_the_plan() {
    let engine = gold_engine();
    let mut current = Audit::new(Arc::clone(engine.space()));
    let mut target = Audit::new(Arc::clone(engine.space()));
    current.gain(DAY, 1.0).unwrap();
    target.gain("Gold", 500.0).unwrap();

    assert!(matches!(
        engine.solve(&current, &target),
        Err(PlanError::Infeasible)
    ));
}

#[test]
fn held_resources_reduce_the_plan() {
    let engine = gold_engine();
    let (mut current, target) = ledgers(engine.space(), 20.0);
    current.gain("AP", 10.0).unwrap();
    let scheme = engine.solve(&current, &target).unwrap();
    assert!((scheme.elapsed_days() - 1.0).abs() < EPS);

    current.gain("Gold", 20.0).unwrap();
    let scheme = engine.solve(&current, &target).unwrap();
    assert!(scheme.elapsed_days().abs() < EPS);
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn matrix_columns_equal_yield_minus_cost() {
    let engine = CatalogEngine::builtin();
    let matrix = engine.engine.path_return_matrix();
    for (p, path) in engine.engine.paths().iter().enumerate() {
        let column = matrix.column(p);
        for item in engine.engine.space().iter() {
            let expected = path.yield_of(item.id) - path.cost_of(item.id);
            let actual = column[item.id.index()];
            assert!(
                (actual - expected).abs() < 1e-12,
                "{} / {}: {actual} != {expected}",
                path.tag(),
                item.name
            );
        }
    }
}

#[test]
fn obtained_minus_consumed_equals_net_return() {
    let engine = gold_engine();
    let (current, target) = ledgers(engine.space(), 35.0);
    let scheme = engine.solve(&current, &target).unwrap();

    let net = scheme.net();
    for ((obtained, consumed), net) in scheme.obtained().iter().zip(scheme.consumed()).zip(net) {
        assert!((obtained - consumed - net).abs() < EPS);
    }
}

#[test]
fn leftovers_never_go_negative() {
    let engine = gold_engine();
    let (current, target) = ledgers(engine.space(), 37.5);
    let scheme = engine.solve(&current, &target).unwrap();

    for balance in scheme.balances(&current, &target) {
        if balance.target > 0.0 || balance.traffic() > 0.0 {
            assert!(balance.leftover >= -EPS, "{balance:?}");
        }
    }
    assert!(scheme.verify(&current, &target).is_empty());
}

#[test]
fn solving_twice_gives_the_same_objective() {
    let engine = gold_engine();
    let (current, target) = ledgers(engine.space(), 42.0);
    let first = engine.solve(&current, &target).unwrap();
    let second = engine.solve(&current, &target).unwrap();
    assert!((first.objective() - second.objective()).abs() < EPS);
}

#[test]
fn larger_targets_never_take_fewer_days() {
    let engine = gold_engine();
    let mut previous = 0.0;
    for gold in [0.0, 5.0, 20.0, 21.0, 60.0, 250.0] {
        let (current, target) = ledgers(engine.space(), gold);
        let days = engine.solve(&current, &target).unwrap().elapsed_days();
        assert!(days >= previous - EPS, "{gold} gold: {days} < {previous}");
        previous = days;
    }
}

// =============================================================================
// Built-in catalog
// =============================================================================

/// The built-in catalog frozen into an engine, with matching ledgers.
struct CatalogEngine {
    engine: PlanningEngine,
    current: Audit,
}

impl CatalogEngine {
    fn builtin() -> Self {
        let config = PlannerConfig::default();
        let (space, paths) = catalog_for(&config).unwrap().into_parts();
        let space = Arc::new(space);
        let current = config.current_ledger(Arc::clone(&space)).unwrap();
        let engine = PlanningEngine::new(space, paths).unwrap();
        Self { engine, current }
    }
}

#[test]
fn builtin_catalog_plans_skill_summaries() {
    let built = CatalogEngine::builtin();
    let mut target = Audit::new(Arc::clone(built.engine.space()));
    target.gain("Skill Summary - 3", 30.0).unwrap();

    let scheme = built.engine.solve(&built.current, &target).unwrap();
    assert!(scheme.elapsed_days() > 0.0);
    assert!(scheme.verify(&built.current, &target).is_empty());
}

fn demo_plan(target_skills: u8) -> PlanEntry {
    PlanEntry {
        character: DEMO_CHARACTER.to_owned(),
        current: StateEntry::default(),
        target: StateEntry {
            skills: SkillSpec::Number(target_skills),
            ..StateEntry::default()
        },
    }
}

#[test]
fn covered_requirements_need_no_days() {
    let table = CharacterTable::with_builtin();
    let requirement = PlanRequirement::new(
        DEMO_CHARACTER,
        Progress::recruit(),
        Progress {
            elite: 0,
            level: 1,
            skills: SkillLevels::Uniform(4),
        },
    );
    let needed = table.required_items(&requirement).unwrap();

    let mut config = PlannerConfig::default();
    config.plans.push(demo_plan(4));
    for (item, quantity) in &needed {
        config
            .held_items
            .insert(item.clone(), Quantity::Number(*quantity));
    }

    let outcome = run_plan(&config, catalog_for(&config).unwrap(), &table).unwrap();
    assert!(outcome.report.elapsed_days.abs() < EPS);
    assert!((outcome.report.recovery_units - 1.0).abs() < EPS);
    assert_eq!(outcome.report.plans.len(), 1);
}

#[test]
fn project_config_plans_with_builtin_catalog() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("planner-config.yaml");
    let config = PlannerConfig::from_file(&path).unwrap();
    let catalog: Catalog = catalog_for(&config).unwrap();
    let outcome = run_plan(&config, catalog, &CharacterTable::with_builtin()).unwrap();

    assert!(outcome.report.elapsed_days > 0.0);
    assert!(outcome.scheme.verify(&outcome.current, &outcome.target).is_empty());
    assert!(
        outcome
            .report
            .items
            .iter()
            .any(|row| row.item == "Orirock Cluster" && row.leftover >= -EPS)
    );

    let json = serde_json::to_value(&outcome.report).unwrap();
    assert!(json["paths"].as_array().is_some_and(|p| !p.is_empty()));
    assert!(json["plans"][0]["required"].is_array());
}
