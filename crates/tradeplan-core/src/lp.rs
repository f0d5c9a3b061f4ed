//! Linear programs in inequality form and a dense two-phase simplex solver.
//!
//! Problems have the shape
//!
//! ```text
//! minimize    c . x
//! subject to  A x <= b     (b of any sign)
//!             x >= 0
//! ```
//!
//! Rows with a negative bound are negated into `>=` form and given an
//! artificial variable; phase one drives the artificials to zero, phase two
//! optimizes the real objective. Pivot selection follows Bland's rule
//! (lowest entering index, lowest leaving basis index on ratio ties), which
//! cannot cycle.

use crate::matrix::dot;

/// Pivot and reduced-cost tolerance.
pub const TOLERANCE: f64 = 1e-9;

/// Relative slack allowed on the phase-one optimum before declaring the
/// problem infeasible.
const FEASIBILITY_TOLERANCE: f64 = 1e-7;

/// Lower bound on the pivot budget.
const MIN_ITERATIONS: usize = 10_000;

/// Errors returned by [`LinearProgram::solve`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LpError {
    /// No `x >= 0` satisfies every constraint.
    #[error("linear program is infeasible")]
    Infeasible,

    /// The objective decreases without limit over the feasible region.
    #[error("linear program is unbounded")]
    Unbounded,

    /// The pivot budget ran out before reaching an optimum.
    #[error("simplex did not converge within {iterations} pivots")]
    IterationLimit {
        /// Pivots performed.
        iterations: usize,
    },

    /// A constraint row does not match the number of variables.
    #[error("constraint {row} has {found} coefficients, expected {expected}")]
    Dimension {
        /// Index of the offending constraint.
        row: usize,
        /// Number of variables in the program.
        expected: usize,
        /// Coefficients supplied.
        found: usize,
    },
}

/// An optimal point.
#[derive(Debug, Clone, PartialEq)]
pub struct LpSolution {
    /// Optimal values, one per variable, all `>= 0`.
    pub x: Vec<f64>,
    /// `c . x` at the optimum.
    pub objective: f64,
    /// Pivots performed across both phases.
    pub iterations: usize,
}

/// A minimization problem over non-negative variables.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearProgram {
    cost: Vec<f64>,
    rows: Vec<Vec<f64>>,
    bounds: Vec<f64>,
}

impl LinearProgram {
    /// Start a problem minimizing `cost . x` with no constraints.
    pub const fn minimize(cost: Vec<f64>) -> Self {
        Self {
            cost,
            rows: Vec::new(),
            bounds: Vec::new(),
        }
    }

    /// Number of variables.
    pub fn variables(&self) -> usize {
        self.cost.len()
    }

    /// Number of constraint rows.
    pub fn constraints(&self) -> usize {
        self.rows.len()
    }

    /// The objective coefficients.
    pub fn cost(&self) -> &[f64] {
        &self.cost
    }

    /// Add the constraint `coefficients . x <= bound`.
    ///
    /// # Errors
    ///
    /// Returns [`LpError::Dimension`] if `coefficients` does not have one
    /// entry per variable.
    pub fn add_constraint(&mut self, coefficients: Vec<f64>, bound: f64) -> Result<(), LpError> {
        if coefficients.len() != self.cost.len() {
            return Err(LpError::Dimension {
                row: self.rows.len(),
                expected: self.cost.len(),
                found: coefficients.len(),
            });
        }
        self.rows.push(coefficients);
        self.bounds.push(bound);
        Ok(())
    }

    /// Solve to optimality.
    ///
    /// # Errors
    ///
    /// Returns [`LpError::Infeasible`], [`LpError::Unbounded`], or
    /// [`LpError::IterationLimit`].
    pub fn solve(&self) -> Result<LpSolution, LpError> {
        let mut tableau = Tableau::new(self);
        let artificial_from = tableau.artificial_from;

        if tableau.width > artificial_from {
            let phase_one: Vec<f64> = (0..tableau.width)
                .map(|j| if j >= artificial_from { 1.0 } else { 0.0 })
                .collect();
            tableau.set_objective(&phase_one);
            tableau.run(|_| true)?;

            let infeasibility = -tableau.objective_value_negated();
            let scale = self.bounds.iter().fold(1.0_f64, |acc, b| acc.max(b.abs()));
            if infeasibility > FEASIBILITY_TOLERANCE * scale {
                tracing::debug!(infeasibility, "phase one left artificials positive");
                return Err(LpError::Infeasible);
            }
            tableau.drive_out_artificials();
        }

        let phase_two: Vec<f64> = (0..tableau.width)
            .map(|j| self.cost.get(j).copied().unwrap_or(0.0))
            .collect();
        tableau.set_objective(&phase_two);
        tableau.run(|j| j < artificial_from)?;

        let x = tableau.primal(self.cost.len());
        Ok(LpSolution {
            objective: dot(&self.cost, &x),
            x,
            iterations: tableau.iterations,
        })
    }
}

// ---------------------------------------------------------------------------
// Tableau
// ---------------------------------------------------------------------------

/// Dense simplex tableau. Each row holds `width` coefficients then the
/// right-hand side.
struct Tableau {
    rows: Vec<Vec<f64>>,
    /// Reduced costs; the trailing entry is minus the objective value.
    objective: Vec<f64>,
    basis: Vec<usize>,
    width: usize,
    /// Columns at or past this index are artificial.
    artificial_from: usize,
    iterations: usize,
    limit: usize,
}

impl Tableau {
    fn new(lp: &LinearProgram) -> Self {
        let n = lp.cost.len();
        let m = lp.rows.len();
        let artificial_count = lp.bounds.iter().filter(|b| **b < 0.0).count();
        let artificial_from = n.saturating_add(m);
        let width = artificial_from.saturating_add(artificial_count);

        let mut rows = Vec::with_capacity(m);
        let mut basis = Vec::with_capacity(m);
        let mut next_artificial = artificial_from;
        for (i, (coefficients, &bound)) in lp.rows.iter().zip(&lp.bounds).enumerate() {
            let sign = if bound < 0.0 { -1.0 } else { 1.0 };
            let mut row: Vec<f64> = coefficients.iter().map(|a| a * sign).collect();
            row.resize(width.saturating_add(1), 0.0);
            set(&mut row, n.saturating_add(i), sign);
            if bound < 0.0 {
                set(&mut row, next_artificial, 1.0);
                basis.push(next_artificial);
                next_artificial = next_artificial.saturating_add(1);
            } else {
                basis.push(n.saturating_add(i));
            }
            set(&mut row, width, bound * sign);
            rows.push(row);
        }

        Self {
            rows,
            objective: vec![0.0; width.saturating_add(1)],
            basis,
            width,
            artificial_from,
            iterations: 0,
            limit: MIN_ITERATIONS.max(m.saturating_add(width).saturating_mul(50)),
        }
    }

    /// Price out the current basis against `cost`.
    fn set_objective(&mut self, cost: &[f64]) {
        let mut objective: Vec<f64> = cost.to_vec();
        objective.resize(self.width.saturating_add(1), 0.0);
        for (row, &b) in self.rows.iter().zip(&self.basis) {
            let cb = cost.get(b).copied().unwrap_or(0.0);
            if cb.abs() > 0.0 {
                for (o, v) in objective.iter_mut().zip(row) {
                    *o -= cb * v;
                }
            }
        }
        self.objective = objective;
    }

    fn objective_value_negated(&self) -> f64 {
        self.objective.get(self.width).copied().unwrap_or(0.0)
    }

    /// Pivot until no allowed column has a negative reduced cost.
    fn run(&mut self, allowed: impl Fn(usize) -> bool) -> Result<(), LpError> {
        loop {
            let entering = self
                .objective
                .iter()
                .take(self.width)
                .enumerate()
                .find(|&(j, &r)| allowed(j) && r < -TOLERANCE)
                .map(|(j, _)| j);
            let Some(col) = entering else {
                return Ok(());
            };
            let row = self.leaving_row(col).ok_or(LpError::Unbounded)?;
            if self.iterations >= self.limit {
                return Err(LpError::IterationLimit {
                    iterations: self.iterations,
                });
            }
            self.pivot(row, col);
            self.iterations = self.iterations.saturating_add(1);
        }
    }

    /// Minimum-ratio row for `col`, ties broken by lowest basis index.
    fn leaving_row(&self, col: usize) -> Option<usize> {
        let mut best: Option<(usize, f64, usize)> = None;
        for (i, (row, &b)) in self.rows.iter().zip(&self.basis).enumerate() {
            let a = row.get(col).copied().unwrap_or(0.0);
            if a <= TOLERANCE {
                continue;
            }
            let ratio = row.get(self.width).copied().unwrap_or(0.0) / a;
            let better = match best {
                None => true,
                Some((_, best_ratio, best_basis)) => {
                    ratio < best_ratio - TOLERANCE
                        || (ratio <= best_ratio + TOLERANCE && b < best_basis)
                }
            };
            if better {
                best = Some((i, ratio, b));
            }
        }
        best.map(|(i, _, _)| i)
    }

    fn pivot(&mut self, r: usize, c: usize) {
        let Some(pivot_row) = self.rows.get(r) else {
            return;
        };
        let p = pivot_row.get(c).copied().unwrap_or(0.0);
        if p.abs() <= TOLERANCE {
            return;
        }
        let normalized: Vec<f64> = pivot_row.iter().map(|v| v / p).collect();
        for (i, row) in self.rows.iter_mut().enumerate() {
            if i == r {
                row.clone_from(&normalized);
            } else {
                eliminate(row, &normalized, c);
            }
        }
        eliminate(&mut self.objective, &normalized, c);
        if let Some(b) = self.basis.get_mut(r) {
            *b = c;
        }
    }

    /// Replace basic artificials (all at zero after a feasible phase one)
    /// with real columns. Rows with no usable column are redundant and keep
    /// their artificial, which phase two never lets re-enter.
    fn drive_out_artificials(&mut self) {
        for r in 0..self.rows.len() {
            let is_artificial = self
                .basis
                .get(r)
                .is_some_and(|&b| b >= self.artificial_from);
            if !is_artificial {
                continue;
            }
            let replacement = self.rows.get(r).and_then(|row| {
                row.iter()
                    .take(self.artificial_from)
                    .position(|v| v.abs() > TOLERANCE)
            });
            if let Some(col) = replacement {
                self.pivot(r, col);
            }
        }
    }

    /// Values of the first `n` columns at the current basis.
    fn primal(&self, n: usize) -> Vec<f64> {
        let mut x = vec![0.0; n];
        for (row, &b) in self.rows.iter().zip(&self.basis) {
            if let Some(slot) = x.get_mut(b) {
                *slot = row.get(self.width).copied().unwrap_or(0.0).max(0.0);
            }
        }
        x
    }
}

fn set(row: &mut [f64], col: usize, value: f64) {
    if let Some(slot) = row.get_mut(col) {
        *slot = value;
    }
}

fn eliminate(row: &mut [f64], pivot: &[f64], col: usize) {
    let factor = row.get(col).copied().unwrap_or(0.0);
    if factor.abs() > 0.0 {
        for (v, p) in row.iter_mut().zip(pivot) {
            *v -= factor * p;
        }
        set(row, col, 0.0);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn textbook_maximization() {
        // max 3x + 5y s.t. x <= 4, 2y <= 12, 3x + 2y <= 18  ->  (2, 6), 36
        let mut lp = LinearProgram::minimize(vec![-3.0, -5.0]);
        lp.add_constraint(vec![1.0, 0.0], 4.0).unwrap();
        lp.add_constraint(vec![0.0, 2.0], 12.0).unwrap();
        lp.add_constraint(vec![3.0, 2.0], 18.0).unwrap();
        let s = lp.solve().unwrap();
        assert!(approx(s.objective, -36.0));
        assert!(approx(*s.x.first().unwrap(), 2.0));
        assert!(approx(*s.x.get(1).unwrap(), 6.0));
    }

    #[test]
    fn covering_constraints_need_phase_one() {
        // min x + y s.t. x + y >= 3, x >= 1  ->  objective 3
        let mut lp = LinearProgram::minimize(vec![1.0, 1.0]);
        lp.add_constraint(vec![-1.0, -1.0], -3.0).unwrap();
        lp.add_constraint(vec![-1.0, 0.0], -1.0).unwrap();
        let s = lp.solve().unwrap();
        assert!(approx(s.objective, 3.0));
        assert!(s.x.iter().all(|v| *v >= 0.0));
        assert!(*s.x.first().unwrap() >= 1.0 - 1e-9);
    }

    #[test]
    fn zero_row_with_negative_bound_is_infeasible() {
        let mut lp = LinearProgram::minimize(vec![1.0]);
        lp.add_constraint(vec![0.0], -1.0).unwrap();
        assert_eq!(lp.solve(), Err(LpError::Infeasible));
    }

    #[test]
    fn contradictory_bounds_are_infeasible() {
        // x <= 1 and x >= 2
        let mut lp = LinearProgram::minimize(vec![1.0]);
        lp.add_constraint(vec![1.0], 1.0).unwrap();
        lp.add_constraint(vec![-1.0], -2.0).unwrap();
        assert_eq!(lp.solve(), Err(LpError::Infeasible));
    }

    #[test]
    fn unbounded_direction_detected() {
        // min -x with only x - y <= 1
        let mut lp = LinearProgram::minimize(vec![-1.0, 0.0]);
        lp.add_constraint(vec![1.0, -1.0], 1.0).unwrap();
        assert_eq!(lp.solve(), Err(LpError::Unbounded));
    }

    #[test]
    fn redundant_rows_are_tolerated() {
        // x >= 2 stated twice; min x
        let mut lp = LinearProgram::minimize(vec![1.0]);
        lp.add_constraint(vec![-1.0], -2.0).unwrap();
        lp.add_constraint(vec![-2.0], -4.0).unwrap();
        let s = lp.solve().unwrap();
        assert!(approx(s.objective, 2.0));
    }

    #[test]
    fn wrong_width_rejected() {
        let mut lp = LinearProgram::minimize(vec![1.0, 1.0]);
        let result = lp.add_constraint(vec![1.0], 1.0);
        assert_eq!(
            result,
            Err(LpError::Dimension {
                row: 0,
                expected: 2,
                found: 1
            })
        );
        assert_eq!(lp.constraints(), 0);
    }

    #[test]
    fn no_constraints_means_origin() {
        let lp = LinearProgram::minimize(vec![2.0, 3.0]);
        let s = lp.solve().unwrap();
        assert_eq!(s.x, vec![0.0, 0.0]);
        assert_eq!(s.iterations, 0);
    }
}
