//! The item space: an ordered, de-duplicated registry of resource names.
//!
//! Every item gets a stable [`ItemId`] at registration. All vectors and
//! matrices in the planner are addressed by these indices, never by name.
//! The space only grows while the catalog is being built; once handed to a
//! planning run it is shared immutably.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Reserved pseudo-item representing one elapsed real-world day.
pub const DAY: &str = "day";

/// Action points recovered over time and spent on battles.
pub const SANITY: &str = "Sanity";

/// Currency, counted in thousands.
pub const LMD_K: &str = "LMD (k)";

/// Character experience, counted in thousands.
pub const EXP_K: &str = "EXP (k)";

/// Index of an item inside its [`ItemSpace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(usize);

impl ItemId {
    /// Position of the item in item-space order.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A registered resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Stable index in the owning space.
    pub id: ItemId,
    /// Globally unique name.
    pub name: String,
    /// Display grouping only.
    pub category: String,
}

/// Ordered registry of all items a planning run can reference.
#[derive(Debug, Clone, Default)]
pub struct ItemSpace {
    /// Items in registration order; `items[id.index()].id == id`.
    items: Vec<Item>,
    /// Name lookup.
    by_name: BTreeMap<String, ItemId>,
}

impl ItemSpace {
    /// Create an empty item space.
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            by_name: BTreeMap::new(),
        }
    }

    /// Append an item.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateItem`] if the name is already taken.
    pub fn register(&mut self, name: &str, category: &str) -> Result<ItemId, CatalogError> {
        if self.by_name.contains_key(name) {
            return Err(CatalogError::DuplicateItem(name.to_owned()));
        }
        let id = ItemId(self.items.len());
        self.items.push(Item {
            id,
            name: name.to_owned(),
            category: category.to_owned(),
        });
        self.by_name.insert(name.to_owned(), id);
        Ok(id)
    }

    /// Register every name in `names` under one category.
    ///
    /// # Errors
    ///
    /// Stops at the first duplicate.
    pub fn register_all<'a, I>(&mut self, category: &str, names: I) -> Result<(), CatalogError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for name in names {
            self.register(name, category)?;
        }
        Ok(())
    }

    /// Look up the index of `name`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownItem`] if the name is not registered.
    pub fn index_of(&self, name: &str) -> Result<ItemId, CatalogError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| CatalogError::UnknownItem(name.to_owned()))
    }

    /// Look up the index of `name`, if registered.
    pub fn get(&self, name: &str) -> Option<ItemId> {
        self.by_name.get(name).copied()
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// The item at `id`, if it belongs to this space.
    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id.index())
    }

    /// The name of the item at `id`, or `"?"` for a foreign index.
    pub fn name_of(&self, id: ItemId) -> &str {
        self.item(id).map_or("?", |item| item.name.as_str())
    }

    /// Number of registered items.
    pub fn size(&self) -> usize {
        self.items.len()
    }

    /// Whether no items are registered.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate items in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    /// Check that every name is registered.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownItem`] for the first unknown name.
    pub fn validate<'a, I>(&self, names: I) -> Result<(), CatalogError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for name in names {
            self.index_of(name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn register_assigns_sequential_ids() {
        let mut space = ItemSpace::new();
        let a = space.register("Orirock", "T1").unwrap();
        let b = space.register("Sugar", "T2").unwrap();
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(space.size(), 2);
        assert_eq!(space.index_of("Sugar").unwrap().index(), 1);
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut space = ItemSpace::new();
        space.register("Orirock", "T1").unwrap();
        let dup = space.register("Orirock", "T2");
        assert!(matches!(dup, Err(CatalogError::DuplicateItem(ref n)) if n == "Orirock"));
        assert_eq!(space.size(), 1);
    }

    #[test]
    fn unknown_name_rejected() {
        let space = ItemSpace::new();
        assert!(matches!(
            space.index_of("Ghost"),
            Err(CatalogError::UnknownItem(_))
        ));
        assert!(space.validate(["Ghost"]).is_err());
    }

    #[test]
    fn category_is_kept_for_display() {
        let mut space = ItemSpace::new();
        space.register_all("basic", [DAY, SANITY]).unwrap();
        let id = space.index_of(SANITY).unwrap();
        assert_eq!(space.item(id).unwrap().category, "basic");
        assert_eq!(space.name_of(id), SANITY);
    }
}
