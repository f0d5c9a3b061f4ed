//! The planning engine: turns a catalog and two ledgers into a linear program
//! and its solution into a [`Scheme`].
//!
//! # Formulation
//!
//! With `R` the path-return matrix (items x paths), `d = target - current`
//! and `x >= 0` the per-path execution counts:
//!
//! ```text
//! minimize    c . x
//! subject to  -R x <= -d
//!             x_p <= maxCount_p                  (paths with a lifetime cap)
//!             x_p - maxCountPerDay_p * x_day <= 0 (paths with a daily cap)
//! ```
//!
//! where `x_day` is the count of the single day-consuming path and `c` is
//! zero except at that path, where it is the day amount consumed per
//! execution. Minimizing `c . x` therefore minimizes elapsed days and
//! nothing else; every other path is free within the time the plan spans.

use std::sync::Arc;

use tradeplan_catalog::{DAY, ItemId, ItemSpace, TradePath};
use tradeplan_ledger::Audit;

use crate::error::PlanError;
use crate::lp::LinearProgram;
use crate::matrix::Matrix;
use crate::scheme::Scheme;

/// A frozen catalog ready to solve against any pair of ledgers over the
/// same item space.
#[derive(Debug, Clone)]
pub struct PlanningEngine {
    space: Arc<ItemSpace>,
    /// Non-void paths in column order.
    paths: Vec<TradePath>,
    /// The day pseudo-item.
    day: ItemId,
    /// Column of the day-recovery path.
    recovery: usize,
}

impl PlanningEngine {
    /// Freeze `paths` over `space`.
    ///
    /// Void paths are dropped; the remaining order fixes the matrix columns.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Catalog`] if the space has no day item,
    /// [`PlanError::MissingRecoveryPath`] if no path consumes it, or
    /// [`PlanError::AmbiguousRecoveryPath`] if several do.
    pub fn new(space: Arc<ItemSpace>, paths: Vec<TradePath>) -> Result<Self, PlanError> {
        let day = space.index_of(DAY)?;
        let total = paths.len();
        let paths: Vec<TradePath> = paths
            .into_iter()
            .filter(|path| {
                if path.is_void() {
                    tracing::debug!(tag = path.tag(), "dropping void path");
                }
                !path.is_void()
            })
            .collect();

        let consumers: Vec<usize> = paths
            .iter()
            .enumerate()
            .filter(|(_, path)| path.consumes(day))
            .map(|(index, _)| index)
            .collect();
        let recovery = match consumers.as_slice() {
            [] => return Err(PlanError::MissingRecoveryPath),
            [only] => *only,
            many => return Err(PlanError::AmbiguousRecoveryPath { count: many.len() }),
        };

        tracing::debug!(
            items = space.size(),
            paths = paths.len(),
            void = total.saturating_sub(paths.len()),
            recovery,
            "planning engine ready"
        );
        Ok(Self {
            space,
            paths,
            day,
            recovery,
        })
    }

    /// The item space every vector is expressed over.
    pub const fn space(&self) -> &Arc<ItemSpace> {
        &self.space
    }

    /// Paths in column order.
    pub fn paths(&self) -> &[TradePath] {
        &self.paths
    }

    /// The day pseudo-item.
    pub const fn day(&self) -> ItemId {
        self.day
    }

    /// Column of the day-recovery path.
    pub const fn recovery_column(&self) -> usize {
        self.recovery
    }

    /// `R[i, p]`: net per-execution effect of path `p` on item `i`.
    pub fn path_return_matrix(&self) -> Matrix {
        let mut matrix = Matrix::zeros(self.space.size(), self.paths.len());
        for (p, path) in self.paths.iter().enumerate() {
            for &(item, cost) in path.src() {
                matrix.add(item.index(), p, -cost);
            }
            for &(item, gain) in path.dst() {
                matrix.add(item.index(), p, gain);
            }
        }
        matrix
    }

    /// `target - current`, in item-space order.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::ItemSpaceMismatch`] if either ledger is bound to
    /// another item space.
    pub fn demand(&self, current: &Audit, target: &Audit) -> Result<Vec<f64>, PlanError> {
        self.check_ledger(current)?;
        self.check_ledger(target)?;
        Ok(target
            .to_vector()
            .iter()
            .zip(current.to_vector())
            .map(|(t, c)| t - c)
            .collect())
    }

    /// Cost per path: the day amount consumed, for the recovery path only.
    pub fn objective(&self) -> Vec<f64> {
        self.paths
            .iter()
            .enumerate()
            .map(|(p, path)| {
                if p == self.recovery {
                    path.cost_of(self.day)
                } else {
                    0.0
                }
            })
            .collect()
    }

    /// Usage-cap rows `(coefficients, bound)`, lifetime caps first for each
    /// path then its daily cap.
    pub fn usage_constraints(&self) -> Vec<(Vec<f64>, f64)> {
        let width = self.paths.len();
        let mut rows = Vec::new();
        for (p, path) in self.paths.iter().enumerate() {
            if let Some(cap) = path.max_count() {
                rows.push((unit(width, p, 1.0), cap));
            }
            if let Some(rate) = path.max_count_per_day() {
                let mut row = unit(width, p, 1.0);
                if let Some(slot) = row.get_mut(self.recovery) {
                    *slot -= rate;
                }
                rows.push((row, 0.0));
            }
        }
        rows
    }

    /// Assemble the full linear program for `current` and `target`.
    ///
    /// # Errors
    ///
    /// See [`PlanningEngine::demand`].
    pub fn linear_program(
        &self,
        current: &Audit,
        target: &Audit,
    ) -> Result<(LinearProgram, Matrix), PlanError> {
        let demand = self.demand(current, target)?;
        let path_return = self.path_return_matrix();
        let mut lp = LinearProgram::minimize(self.objective());
        for (i, need) in demand.iter().enumerate() {
            let row: Vec<f64> = path_return.row(i).iter().map(|r| -r).collect();
            lp.add_constraint(row, -need)?;
        }
        let caps = self.usage_constraints();
        let cap_rows = caps.len();
        for (row, bound) in caps {
            lp.add_constraint(row, bound)?;
        }
        tracing::debug!(
            variables = lp.variables(),
            demand_rows = demand.len(),
            cap_rows,
            "linear program assembled"
        );
        Ok((lp, path_return))
    }

    /// Find the execution counts that meet `target` from `current` in the
    /// fewest days.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Infeasible`] when no counts meet the demand
    /// within the caps, [`PlanError::Unbounded`] for a malformed catalog,
    /// [`PlanError::ItemSpaceMismatch`] for a foreign ledger, or
    /// [`PlanError::Solver`] if the solver gives up.
    pub fn solve(&self, current: &Audit, target: &Audit) -> Result<Scheme, PlanError> {
        let (lp, path_return) = self.linear_program(current, target)?;
        let solution = lp.solve()?;
        let scheme = Scheme::new(solution.x, path_return, solution.objective, self.day);
        tracing::info!(
            days = scheme.elapsed_days(),
            pivots = solution.iterations,
            executed = scheme.executed_paths(crate::scheme::NOISE_THRESHOLD).count(),
            "plan solved"
        );
        Ok(scheme)
    }

    fn check_ledger(&self, ledger: &Audit) -> Result<(), PlanError> {
        if Arc::ptr_eq(ledger.space(), &self.space) {
            Ok(())
        } else {
            Err(PlanError::ItemSpaceMismatch)
        }
    }
}

fn unit(width: usize, index: usize, value: f64) -> Vec<f64> {
    let mut row = vec![0.0; width];
    if let Some(slot) = row.get_mut(index) {
        *slot = value;
    }
    row
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tradeplan_catalog::{PathLimits, SANITY};

    use super::*;

    fn space() -> Arc<ItemSpace> {
        let mut space = ItemSpace::new();
        space.register_all("test", [DAY, SANITY, "Gold"]).unwrap();
        Arc::new(space)
    }

    fn paths(space: &ItemSpace) -> Vec<TradePath> {
        vec![
            TradePath::builder("day")
                .cost(DAY, 1.0)
                .yields(SANITY, 10.0)
                .build(space)
                .unwrap(),
            TradePath::builder("convert")
                .cost(SANITY, 1.0)
                .yields("Gold", 5.0)
                .max_count(100.0)
                .max_count_per_day(3.0)
                .build(space)
                .unwrap(),
            TradePath::builder("void").build(space).unwrap(),
        ]
    }

    fn engine() -> PlanningEngine {
        let space = space();
        let paths = paths(&space);
        PlanningEngine::new(space, paths).unwrap()
    }

    fn ledgers(engine: &PlanningEngine, days: f64, gold: f64) -> (Audit, Audit) {
        let mut current = Audit::new(Arc::clone(engine.space()));
        let mut target = Audit::new(Arc::clone(engine.space()));
        current.gain(DAY, days).unwrap();
        target.gain("Gold", gold).unwrap();
        (current, target)
    }

    #[test]
    fn void_paths_are_dropped() {
        assert_eq!(engine().paths().len(), 2);
    }

    #[test]
    fn matrix_columns_are_net_effects() {
        let r = engine().path_return_matrix();
        assert_eq!((r.rows(), r.cols()), (3, 2));
        assert_eq!(r.column(0), vec![-1.0, 10.0, 0.0]);
        assert_eq!(r.column(1), vec![0.0, -1.0, 5.0]);
    }

    #[test]
    fn demand_is_target_minus_current() {
        let engine = engine();
        let (current, target) = ledgers(&engine, 1000.0, 30.0);
        let demand = engine.demand(&current, &target).unwrap();
        assert_eq!(demand, vec![-1000.0, 0.0, 30.0]);
    }

    #[test]
    fn objective_weights_only_the_recovery_path() {
        let engine = engine();
        assert_eq!(engine.recovery_column(), 0);
        assert_eq!(engine.objective(), vec![1.0, 0.0]);
    }

    #[test]
    fn usage_rows_reference_recovery_column() {
        let rows = engine().usage_constraints();
        assert_eq!(
            rows,
            vec![(vec![0.0, 1.0], 100.0), (vec![-3.0, 1.0], 0.0)]
        );
    }

    #[test]
    fn recovery_path_must_be_unique() {
        let space = space();
        let mut both = paths(&space);
        both.push(
            TradePath::builder("second day")
                .cost(DAY, 1.0)
                .yields("Gold", 1.0)
                .build(&space)
                .unwrap(),
        );
        let result = PlanningEngine::new(Arc::clone(&space), both);
        assert!(matches!(
            result,
            Err(PlanError::AmbiguousRecoveryPath { count: 2 })
        ));

        let none: Vec<TradePath> = paths(&space).into_iter().skip(1).collect();
        let result = PlanningEngine::new(space, none);
        assert!(matches!(result, Err(PlanError::MissingRecoveryPath)));
    }

    #[test]
    fn foreign_ledger_rejected() {
        let engine = engine();
        let current = Audit::new(space());
        let target = Audit::new(Arc::clone(engine.space()));
        assert!(matches!(
            engine.solve(&current, &target),
            Err(PlanError::ItemSpaceMismatch)
        ));
    }

    #[test]
    fn daily_cap_scales_with_days() {
        let engine = engine();
        let (current, target) = ledgers(&engine, 1000.0, 30.0);
        // 6 conversions needed, 3 per day allowed -> 2 days even though
        // 1 day of sanity would suffice.
        let scheme = engine.solve(&current, &target).unwrap();
        assert!((scheme.elapsed_days() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn lifetime_cap_can_make_plan_infeasible() {
        let space = space();
        let paths = vec![
            TradePath::builder("day")
                .cost(DAY, 1.0)
                .yields(SANITY, 10.0)
                .build(&space)
                .unwrap(),
            TradePath::build(
                &space,
                [(SANITY, 1.0)],
                [("Gold", 5.0)],
                "once",
                PathLimits {
                    max_count: Some(1.0),
                    max_count_per_day: None,
                },
            )
            .unwrap(),
        ];
        let engine = PlanningEngine::new(space, paths).unwrap();
        let (current, target) = ledgers(&engine, 1000.0, 20.0);
        assert!(matches!(
            engine.solve(&current, &target),
            Err(PlanError::Infeasible)
        ));
    }
}
