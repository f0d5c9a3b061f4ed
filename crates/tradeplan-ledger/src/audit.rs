//! The [`Audit`]: a sparse, additive quantity vector bound to one item space.
//!
//! # Design
//!
//! - **Bound**: every audit holds an `Arc` of the item space it was created
//!   for; names are validated against it on every mutation.
//! - **Additive**: quantities are only ever gained into.
//! - **Sparse**: unlisted items are implicitly zero; [`Audit::to_vector`]
//!   materializes the dense form in item-space order.

use std::collections::BTreeMap;
use std::sync::Arc;

use tradeplan_catalog::{ItemId, ItemSpace};

use crate::LedgerError;

/// A resource snapshot: current holdings or a target requirement.
#[derive(Debug, Clone)]
pub struct Audit {
    /// The item space every key belongs to.
    space: Arc<ItemSpace>,
    /// Non-default quantities, keyed by item index.
    quantities: BTreeMap<ItemId, f64>,
}

impl Audit {
    /// Create an empty ledger over `space`.
    pub const fn new(space: Arc<ItemSpace>) -> Self {
        Self {
            space,
            quantities: BTreeMap::new(),
        }
    }

    /// The item space this ledger is bound to.
    pub const fn space(&self) -> &Arc<ItemSpace> {
        &self.space
    }

    /// Add `quantity` of the item named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownItem`] if `name` is not registered, or
    /// [`LedgerError::NonFiniteQuantity`] for NaN or infinite input. The
    /// ledger is unchanged on error.
    pub fn gain(&mut self, name: &str, quantity: f64) -> Result<(), LedgerError> {
        let id = self
            .space
            .get(name)
            .ok_or_else(|| LedgerError::UnknownItem(name.to_owned()))?;
        self.gain_id(id, quantity)
    }

    /// Add `quantity` of the item at `id`.
    ///
    /// # Errors
    ///
    /// As [`Audit::gain`]; a foreign `id` is reported as unknown.
    pub fn gain_id(&mut self, id: ItemId, quantity: f64) -> Result<(), LedgerError> {
        let name = self
            .space
            .item(id)
            .map(|item| item.name.as_str())
            .ok_or_else(|| LedgerError::UnknownItem(id.to_string()))?;
        if !quantity.is_finite() {
            return Err(LedgerError::NonFiniteQuantity {
                item: name.to_owned(),
            });
        }
        *self.quantities.entry(id).or_insert(0.0) += quantity;
        Ok(())
    }

    /// Add every `(name, quantity)` pair.
    ///
    /// All names are validated before anything is added, so a failed call
    /// leaves the ledger unchanged.
    ///
    /// # Errors
    ///
    /// See [`Audit::gain`].
    pub fn gain_all<'a, I>(&mut self, entries: I) -> Result<(), LedgerError>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut resolved = Vec::new();
        for (name, quantity) in entries {
            let id = self
                .space
                .get(name)
                .ok_or_else(|| LedgerError::UnknownItem(name.to_owned()))?;
            if !quantity.is_finite() {
                return Err(LedgerError::NonFiniteQuantity {
                    item: name.to_owned(),
                });
            }
            resolved.push((id, quantity));
        }
        for (id, quantity) in resolved {
            *self.quantities.entry(id).or_insert(0.0) += quantity;
        }
        Ok(())
    }

    /// Fold every quantity of `other` into this ledger.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownItem`] if `other` holds an item this
    /// ledger's space does not know.
    pub fn merge(&mut self, other: &Self) -> Result<(), LedgerError> {
        self.gain_all(
            other
                .quantities
                .iter()
                .map(|(&id, &q)| (other.space.name_of(id), q)),
        )
    }

    /// Quantity held of `id` (0 if unlisted).
    pub fn quantity(&self, id: ItemId) -> f64 {
        self.quantities.get(&id).copied().unwrap_or(0.0)
    }

    /// Quantity held of the item named `name` (0 if unlisted).
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownItem`] if `name` is not registered.
    pub fn quantity_of(&self, name: &str) -> Result<f64, LedgerError> {
        self.space
            .get(name)
            .map(|id| self.quantity(id))
            .ok_or_else(|| LedgerError::UnknownItem(name.to_owned()))
    }

    /// Dense quantities in item-space order.
    pub fn to_vector(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.space.size()];
        for (&id, &quantity) in &self.quantities {
            if let Some(slot) = dense.get_mut(id.index()) {
                *slot = quantity;
            }
        }
        dense
    }

    /// Listed items with their quantities, in index order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, f64)> + '_ {
        self.quantities.iter().map(|(&id, &q)| (id, q))
    }

    /// Number of listed items.
    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    /// Whether no item is listed.
    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn space() -> Arc<ItemSpace> {
        let mut space = ItemSpace::new();
        space
            .register_all("test", ["day", "Sanity", "Gold", "Sugar"])
            .unwrap();
        Arc::new(space)
    }

    #[test]
    fn gains_accumulate() {
        let mut audit = Audit::new(space());
        audit.gain("Gold", 3.0).unwrap();
        audit.gain("Gold", 4.5).unwrap();
        audit.gain("Sugar", 1.0).unwrap();
        assert!((audit.quantity_of("Gold").unwrap() - 7.5).abs() < 1e-12);
        assert_eq!(audit.len(), 2);
        assert_eq!(audit.to_vector(), vec![0.0, 0.0, 7.5, 1.0]);
    }

    #[test]
    fn unlisted_items_are_zero() {
        let audit = Audit::new(space());
        assert!(audit.is_empty());
        assert!(audit.quantity_of("Sanity").unwrap().abs() < f64::EPSILON);
        assert_eq!(audit.to_vector().len(), 4);
    }

    #[test]
    fn unknown_item_rejected() {
        let mut audit = Audit::new(space());
        let result = audit.gain("Diamond", 1.0);
        assert!(matches!(result, Err(LedgerError::UnknownItem(ref n)) if n == "Diamond"));
        assert!(audit.is_empty());
    }

    #[test]
    fn non_finite_rejected() {
        let mut audit = Audit::new(space());
        let result = audit.gain("Gold", f64::NAN);
        assert!(matches!(result, Err(LedgerError::NonFiniteQuantity { .. })));
        assert!(audit.is_empty());
    }

    #[test]
    fn gain_all_is_atomic() {
        let mut audit = Audit::new(space());
        let result = audit.gain_all([("Gold", 1.0), ("Diamond", 2.0)]);
        assert!(result.is_err());
        assert!(audit.is_empty());

        audit.gain_all([("Gold", 1.0), ("Sugar", 2.0)]).unwrap();
        assert_eq!(audit.len(), 2);
    }

    #[test]
    fn merge_folds_other_ledger() {
        let space = space();
        let mut a = Audit::new(Arc::clone(&space));
        let mut b = Audit::new(Arc::clone(&space));
        a.gain("Gold", 1.0).unwrap();
        b.gain("Gold", 2.0).unwrap();
        b.gain("day", 10.0).unwrap();
        a.merge(&b).unwrap();
        assert!((a.quantity_of("Gold").unwrap() - 3.0).abs() < 1e-12);
        assert!((a.quantity_of("day").unwrap() - 10.0).abs() < 1e-12);
    }
}
