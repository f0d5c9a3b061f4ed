//! Battle paths derived from stage drop statistics.
//!
//! Input is JSON lines, one stage per line:
//!
//! ```json
//! {"stage": {"code": "1-7", "apCost": 6},
//!  "drops": [{"item": {"name": "Orirock Cube"}, "quantity": 2400, "times": 2000}]}
//! ```
//!
//! Every stage becomes one path costing its sanity and yielding each item's
//! expected drop plus the LMD every battle pays out.

use std::io::BufRead;

use serde::Deserialize;

use crate::error::CatalogError;
use crate::events::{self, KNIGHTS_AND_HUNTERS};
use crate::item::{ItemSpace, LMD_K, SANITY};
use crate::path::TradePath;

/// Drop entries under this name are ignored.
const FURNITURE: &str = "Furniture";

/// Event currency per sanity on event stages.
const EVENT_CURRENCY_PER_SANITY: f64 = 10.0;

/// Thousands of LMD paid out per sanity spent.
const LMD_K_PER_SANITY: f64 = 12.0 / 1000.0;

/// One line of drop statistics.
#[derive(Debug, Clone, Deserialize)]
pub struct DropRecord {
    /// The stage the statistics were collected on.
    pub stage: StageInfo,
    /// Observed drops.
    #[serde(default)]
    pub drops: Vec<DropEntry>,
}

/// Stage identity and cost.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageInfo {
    /// Stage code, used as the path tag.
    pub code: String,
    /// Sanity per run.
    pub ap_cost: f64,
}

/// Observed drop count for one item.
#[derive(Debug, Clone, Deserialize)]
pub struct DropEntry {
    /// The dropped item.
    pub item: DropItem,
    /// Total units observed.
    pub quantity: f64,
    /// Runs sampled.
    pub times: f64,
}

/// Item reference inside a drop entry.
#[derive(Debug, Clone, Deserialize)]
pub struct DropItem {
    /// Item name; must exist in the item space.
    pub name: String,
}

impl DropRecord {
    /// Convert into a battle path over `space`.
    ///
    /// # Errors
    ///
    /// Fails if a dropped item is not registered or a rate is invalid.
    pub fn to_path(&self, space: &ItemSpace) -> Result<TradePath, CatalogError> {
        let ap_cost = self.stage.ap_cost;
        let mut builder = TradePath::builder(self.stage.code.as_str()).cost(SANITY, ap_cost);
        for entry in &self.drops {
            if entry.item.name == FURNITURE || entry.times <= 0.0 {
                continue;
            }
            builder = builder.yields(&entry.item.name, entry.quantity / entry.times);
        }
        if self.stage.code.starts_with("GT")
            && let Some(def) = events::event(KNIGHTS_AND_HUNTERS)
            && space.contains(def.currency)
        {
            builder = builder.yields(def.currency, ap_cost * EVENT_CURRENCY_PER_SANITY);
        }
        builder.yields(LMD_K, ap_cost * LMD_K_PER_SANITY).build(space)
    }
}

/// Read drop statistics and produce one battle path per stage.
///
/// Blank lines are skipped.
///
/// # Errors
///
/// Returns [`CatalogError::DropRecord`] for a malformed line,
/// [`CatalogError::Io`] if reading fails, or a validation error when a drop
/// names an unknown item.
pub fn load_drop_paths<R: BufRead>(
    reader: R,
    space: &ItemSpace,
) -> Result<Vec<TradePath>, CatalogError> {
    let mut paths = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: DropRecord = serde_json::from_str(&line).map_err(|source| {
            CatalogError::DropRecord {
                line: index.saturating_add(1),
                source,
            }
        })?;
        paths.push(record.to_path(space)?);
    }
    tracing::debug!(stages = paths.len(), "loaded drop-derived battle paths");
    Ok(paths)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::builtin::builtin_items;

    fn space() -> ItemSpace {
        builtin_items().unwrap()
    }

    #[test]
    fn stage_becomes_battle_path() {
        let space = space();
        let input = r#"{"stage":{"code":"1-7","apCost":6},"drops":[{"item":{"name":"Orirock Cube"},"quantity":2400,"times":2000},{"item":{"name":"Furniture"},"quantity":5,"times":2000}]}"#;
        let paths = load_drop_paths(input.as_bytes(), &space).unwrap();
        assert_eq!(paths.len(), 1);

        let path = paths.first().unwrap();
        let cube = space.get("Orirock Cube").unwrap();
        let sanity = space.get(SANITY).unwrap();
        let lmd = space.get(LMD_K).unwrap();
        assert_eq!(path.tag(), "1-7");
        assert!((path.cost_of(sanity) - 6.0).abs() < 1e-9);
        assert!((path.yield_of(cube) - 1.2).abs() < 1e-9);
        assert!((path.yield_of(lmd) - 0.072).abs() < 1e-9);
        // Furniture skipped, so only cube and LMD remain.
        assert_eq!(path.dst().len(), 2);
    }

    #[test]
    fn event_stage_yields_currency() {
        let space = space();
        let input = r#"{"stage":{"code":"GT-5","apCost":20},"drops":[]}"#;
        let paths = load_drop_paths(input.as_bytes(), &space).unwrap();
        assert_eq!(paths.len(), 1);
        let coin = space.get("Knight Coin").unwrap();
        assert!((paths.first().unwrap().yield_of(coin) - 200.0).abs() < 1e-9);
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let space = space();
        let input = "\n{\"stage\":{\"code\":\"1-7\",\"apCost\":6},\"drops\":[]}\nnot json\n";
        let result = load_drop_paths(input.as_bytes(), &space);
        assert!(matches!(result, Err(CatalogError::DropRecord { line: 3, .. })));
    }

    #[test]
    fn unknown_drop_item_rejected() {
        let space = space();
        let input = r#"{"stage":{"code":"X-1","apCost":6},"drops":[{"item":{"name":"Mystery Box"},"quantity":1,"times":1}]}"#;
        let result = load_drop_paths(input.as_bytes(), &space);
        assert!(matches!(result, Err(CatalogError::UnknownItem(ref n)) if n == "Mystery Box"));
    }
}
