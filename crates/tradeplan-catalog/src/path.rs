//! Trade paths: recipes converting a cost multiset into a yield multiset.
//!
//! A [`TradePath`] is validated against an [`ItemSpace`] when it is built and
//! is immutable afterwards. Quantities are per-execution rates and may be
//! fractional (expected drops, shares of a monthly reward).
//!
//! Paths carry two optional usage caps:
//! - `max_count`: lifetime cap on executions.
//! - `max_count_per_day`: executions allowed per elapsed day of the plan.

use std::collections::BTreeMap;

use crate::error::CatalogError;
use crate::item::{ItemId, ItemSpace};

/// Optional usage caps of a path.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PathLimits {
    /// Lifetime cap on executions.
    pub max_count: Option<f64>,
    /// Cap on executions per elapsed day.
    pub max_count_per_day: Option<f64>,
}

/// A validated, immutable conversion recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct TradePath {
    /// Items consumed per execution, in declaration order.
    src: Vec<(ItemId, f64)>,
    /// Items produced per execution, in declaration order.
    dst: Vec<(ItemId, f64)>,
    /// Free-form grouping label.
    tag: String,
    /// Usage caps.
    limits: PathLimits,
}

impl TradePath {
    /// Start building a path with the given tag.
    pub fn builder(tag: impl Into<String>) -> TradePathBuilder {
        TradePathBuilder::new(tag)
    }

    /// Build a path from name-keyed cost and yield lists.
    ///
    /// Repeated names within one side are summed.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownItem`] if any name is absent from
    /// `space`, or [`CatalogError::InvalidQuantity`] for a negative or
    /// non-finite rate or cap.
    pub fn build<'a, S, D>(
        space: &ItemSpace,
        src: S,
        dst: D,
        tag: impl Into<String>,
        limits: PathLimits,
    ) -> Result<Self, CatalogError>
    where
        S: IntoIterator<Item = (&'a str, f64)>,
        D: IntoIterator<Item = (&'a str, f64)>,
    {
        check_cap("max_count", limits.max_count)?;
        check_cap("max_count_per_day", limits.max_count_per_day)?;
        Ok(Self {
            src: resolve_side(space, src)?,
            dst: resolve_side(space, dst)?,
            tag: tag.into(),
            limits,
        })
    }

    /// Items consumed per execution.
    pub fn src(&self) -> &[(ItemId, f64)] {
        &self.src
    }

    /// Items produced per execution.
    pub fn dst(&self) -> &[(ItemId, f64)] {
        &self.dst
    }

    /// Grouping label.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Lifetime execution cap.
    pub const fn max_count(&self) -> Option<f64> {
        self.limits.max_count
    }

    /// Per-day execution cap.
    pub const fn max_count_per_day(&self) -> Option<f64> {
        self.limits.max_count_per_day
    }

    /// A path with neither cost nor yield does nothing and is skipped when
    /// the return matrix is assembled.
    pub fn is_void(&self) -> bool {
        self.src.is_empty() && self.dst.is_empty()
    }

    /// Per-execution cost of `item` (0 if not consumed).
    pub fn cost_of(&self, item: ItemId) -> f64 {
        side_amount(&self.src, item)
    }

    /// Per-execution yield of `item` (0 if not produced).
    pub fn yield_of(&self, item: ItemId) -> f64 {
        side_amount(&self.dst, item)
    }

    /// Whether a single execution consumes `item`.
    pub fn consumes(&self, item: ItemId) -> bool {
        self.cost_of(item) > 0.0
    }

    /// Net per-item effect of `count` executions, yields positive.
    pub fn net_effect(&self, count: f64) -> BTreeMap<ItemId, f64> {
        let mut net = BTreeMap::new();
        for &(item, cost) in &self.src {
            *net.entry(item).or_insert(0.0) -= cost * count;
        }
        for &(item, gain) in &self.dst {
            *net.entry(item).or_insert(0.0) += gain * count;
        }
        net
    }

    /// Compact human-readable form, e.g. `workshop: {Sugar:4.00} -> {Sugar Pack:1.00}`.
    pub fn describe(&self, space: &ItemSpace) -> String {
        format!(
            "{}: {} -> {}",
            self.tag,
            format_side(space, &self.src),
            format_side(space, &self.dst)
        )
    }
}

/// Builder for [`TradePath`], collecting names until validation.
///
/// # Examples
///
/// ```
/// use tradeplan_catalog::{ItemSpace, TradePath};
///
/// let mut space = ItemSpace::new();
/// space.register_all("materials", ["Sugar", "Sugar Pack"]).ok();
///
/// let path = TradePath::builder("workshop")
///     .cost("Sugar", 4.0)
///     .yields("Sugar Pack", 1.0)
///     .build(&space);
///
/// assert!(path.is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct TradePathBuilder {
    tag: String,
    src: Vec<(String, f64)>,
    dst: Vec<(String, f64)>,
    limits: PathLimits,
}

impl TradePathBuilder {
    /// Start a builder with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            src: Vec::new(),
            dst: Vec::new(),
            limits: PathLimits::default(),
        }
    }

    /// Add a per-execution cost.
    #[must_use]
    pub fn cost(mut self, item: &str, quantity: f64) -> Self {
        self.src.push((item.to_owned(), quantity));
        self
    }

    /// Add a per-execution yield.
    #[must_use]
    pub fn yields(mut self, item: &str, quantity: f64) -> Self {
        self.dst.push((item.to_owned(), quantity));
        self
    }

    /// Cap total executions.
    #[must_use]
    pub const fn max_count(mut self, cap: f64) -> Self {
        self.limits.max_count = Some(cap);
        self
    }

    /// Cap executions per elapsed day.
    #[must_use]
    pub const fn max_count_per_day(mut self, cap: f64) -> Self {
        self.limits.max_count_per_day = Some(cap);
        self
    }

    /// Validate every name against `space` and produce the path.
    ///
    /// # Errors
    ///
    /// See [`TradePath::build`].
    pub fn build(self, space: &ItemSpace) -> Result<TradePath, CatalogError> {
        TradePath::build(
            space,
            self.src.iter().map(|(n, q)| (n.as_str(), *q)),
            self.dst.iter().map(|(n, q)| (n.as_str(), *q)),
            self.tag,
            self.limits,
        )
    }
}

fn resolve_side<'a, I>(space: &ItemSpace, side: I) -> Result<Vec<(ItemId, f64)>, CatalogError>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut resolved: Vec<(ItemId, f64)> = Vec::new();
    for (name, quantity) in side {
        let id = space.index_of(name)?;
        if !quantity.is_finite() || quantity < 0.0 {
            return Err(CatalogError::InvalidQuantity {
                item: name.to_owned(),
                quantity,
            });
        }
        match resolved.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, total)) => *total += quantity,
            None => resolved.push((id, quantity)),
        }
    }
    Ok(resolved)
}

fn check_cap(name: &str, cap: Option<f64>) -> Result<(), CatalogError> {
    match cap {
        Some(value) if !value.is_finite() || value < 0.0 => Err(CatalogError::InvalidQuantity {
            item: name.to_owned(),
            quantity: value,
        }),
        _ => Ok(()),
    }
}

fn side_amount(side: &[(ItemId, f64)], item: ItemId) -> f64 {
    side.iter()
        .filter(|(id, _)| *id == item)
        .map(|(_, q)| *q)
        .sum()
}

fn format_side(space: &ItemSpace, side: &[(ItemId, f64)]) -> String {
    let parts: Vec<String> = side
        .iter()
        .map(|&(id, q)| format!("{}:{q:.2}", space.name_of(id)))
        .collect();
    format!("{{{}}}", parts.join(", "))
}
