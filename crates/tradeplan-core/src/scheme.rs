//! A solved plan and the quantities derived from it.
//!
//! A [`Scheme`] stores only the execution counts and the path-return matrix
//! that produced them. Obtained, consumed and leftover figures are computed
//! on demand so they can never drift from the raw solution.

use tradeplan_catalog::ItemId;
use tradeplan_ledger::Audit;

use crate::matrix::Matrix;

/// Counts below this are solver noise and treated as unused.
pub const NOISE_THRESHOLD: f64 = 0.1;

/// Leftovers above `-LEFTOVER_TOLERANCE` count as non-negative.
pub const LEFTOVER_TOLERANCE: f64 = 1e-6;

/// Execution counts plus the matrix they were solved against.
#[derive(Debug, Clone, PartialEq)]
pub struct Scheme {
    path_counts: Vec<f64>,
    path_return: Matrix,
    objective: f64,
    day: ItemId,
}

/// One item's balance sheet across the plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemBalance {
    /// The item.
    pub item: ItemId,
    /// Required at the end.
    pub target: f64,
    /// Held at the start.
    pub held: f64,
    /// Produced by all paths.
    pub obtained: f64,
    /// Consumed by all paths.
    pub consumed: f64,
    /// `held + obtained - consumed - target`.
    pub leftover: f64,
}

impl ItemBalance {
    /// Total production plus consumption.
    pub fn traffic(&self) -> f64 {
        self.obtained + self.consumed
    }
}

impl Scheme {
    /// Wrap a solution.
    pub const fn new(path_counts: Vec<f64>, path_return: Matrix, objective: f64, day: ItemId) -> Self {
        Self {
            path_counts,
            path_return,
            objective,
            day,
        }
    }

    /// Execution count per path, in column order.
    pub fn path_counts(&self) -> &[f64] {
        &self.path_counts
    }

    /// The matrix the counts were solved against.
    pub const fn path_return(&self) -> &Matrix {
        &self.path_return
    }

    /// The day pseudo-item.
    pub const fn day(&self) -> ItemId {
        self.day
    }

    /// Objective value `c . x`.
    pub const fn objective(&self) -> f64 {
        self.objective
    }

    /// Total production per item; net-negative contributions excluded.
    pub fn obtained(&self) -> Vec<f64> {
        self.path_return
            .mul_vec_with(&self.path_counts, |r| r.max(0.0))
    }

    /// Total consumption per item; net-positive contributions excluded.
    pub fn consumed(&self) -> Vec<f64> {
        self.path_return
            .mul_vec_with(&self.path_counts, |r| (-r).max(0.0))
    }

    /// `R @ x`, equal to `obtained - consumed`.
    pub fn net(&self) -> Vec<f64> {
        self.path_return.mul_vec(&self.path_counts)
    }

    /// Days the plan spans.
    pub fn elapsed_days(&self) -> f64 {
        self.consumed()
            .get(self.day.index())
            .copied()
            .unwrap_or(0.0)
    }

    /// Recovery units needed at `per_day` per day: rounded down, plus one so
    /// the figure is always sufficient.
    pub fn recovery_units(&self, per_day: f64) -> f64 {
        (self.elapsed_days() * per_day).floor() + 1.0
    }

    /// Per-item balances against the ledgers the plan was solved for.
    pub fn balances(&self, current: &Audit, target: &Audit) -> Vec<ItemBalance> {
        let obtained = self.obtained();
        let consumed = self.consumed();
        let held = current.to_vector();
        let wanted = target.to_vector();
        current
            .space()
            .iter()
            .zip(obtained)
            .zip(consumed)
            .zip(held.iter().zip(&wanted))
            .map(|(((item, obtained), consumed), (&held, &target))| ItemBalance {
                item: item.id,
                target,
                held,
                obtained,
                consumed,
                leftover: held + obtained - consumed - target,
            })
            .collect()
    }

    /// Paths executed more than `threshold` times: `(column, count)`.
    pub fn executed_paths(&self, threshold: f64) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.path_counts
            .iter()
            .copied()
            .enumerate()
            .filter(move |(_, count)| *count > threshold)
    }

    /// Items with a positive target or real traffic whose leftover is
    /// negative beyond tolerance. Empty for any correct solution.
    pub fn verify(&self, current: &Audit, target: &Audit) -> Vec<ItemBalance> {
        let shortfalls: Vec<ItemBalance> = self
            .balances(current, target)
            .into_iter()
            .filter(|b| b.target > 0.0 || b.traffic() > 0.0)
            .filter(|b| b.leftover < -LEFTOVER_TOLERANCE)
            .collect();
        for shortfall in &shortfalls {
            tracing::warn!(
                item = current.space().name_of(shortfall.item),
                leftover = shortfall.leftover,
                "negative leftover in solved plan"
            );
        }
        shortfalls
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tradeplan_catalog::ItemSpace;

    use super::*;

    /// Items: day, AP, Gold. Paths: day -> 10 AP, 1 AP -> 5 Gold.
    fn fixture() -> (Arc<ItemSpace>, Scheme) {
        let mut space = ItemSpace::new();
        let day = space.register("day", "test").unwrap();
        space.register_all("test", ["AP", "Gold"]).unwrap();
        let mut r = Matrix::zeros(3, 2);
        r.add(0, 0, -1.0);
        r.add(1, 0, 10.0);
        r.add(1, 1, -1.0);
        r.add(2, 1, 5.0);
        (Arc::new(space), Scheme::new(vec![2.0, 4.0], r, 2.0, day))
    }

    #[test]
    fn obtained_and_consumed_split_the_matrix() {
        let (_, scheme) = fixture();
        assert_eq!(scheme.obtained(), vec![0.0, 20.0, 20.0]);
        assert_eq!(scheme.consumed(), vec![2.0, 4.0, 0.0]);
        assert_eq!(scheme.net(), vec![-2.0, 16.0, 20.0]);
        assert!((scheme.elapsed_days() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn recovery_units_round_down_then_add_one() {
        let (_, scheme) = fixture();
        assert!((scheme.recovery_units(240.0) - 481.0).abs() < 1e-12);
        assert!((scheme.recovery_units(0.3) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn balances_and_verification() {
        let (space, scheme) = fixture();
        let mut current = Audit::new(Arc::clone(&space));
        let mut target = Audit::new(Arc::clone(&space));
        current.gain("day", 100.0).unwrap();
        target.gain("Gold", 20.0).unwrap();

        let balances = scheme.balances(&current, &target);
        assert_eq!(balances.len(), 3);
        assert!(balances.get(2).unwrap().leftover.abs() < 1e-12);
        assert!(scheme.verify(&current, &target).is_empty());

        let mut greedy = Audit::new(Arc::clone(&space));
        greedy.gain("Gold", 25.0).unwrap();
        let shortfalls = scheme.verify(&current, &greedy);
        assert_eq!(shortfalls.len(), 1);
    }

    #[test]
    fn noise_is_filtered() {
        let (_, scheme) = fixture();
        let noisy = Scheme::new(
            vec![2.0, 0.05],
            scheme.path_return().clone(),
            2.0,
            scheme.day(),
        );
        let executed: Vec<(usize, f64)> = noisy.executed_paths(NOISE_THRESHOLD).collect();
        assert_eq!(executed, vec![(0, 2.0)]);
    }

    #[test]
    fn count_at_threshold_is_noise() {
        let (_, scheme) = fixture();
        let edge = Scheme::new(
            vec![2.0, NOISE_THRESHOLD],
            scheme.path_return().clone(),
            2.0,
            scheme.day(),
        );
        let executed: Vec<usize> = edge
            .executed_paths(NOISE_THRESHOLD)
            .map(|(column, _)| column)
            .collect();
        assert_eq!(executed, vec![0]);
    }
}
