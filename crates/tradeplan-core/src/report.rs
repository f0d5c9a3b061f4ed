//! The structured plan report.
//!
//! [`PlanReport`] is everything a renderer needs, already filtered and
//! labelled: the day estimate, the settings in effect, the plans, per-item
//! balance rows and per-path execution rows. It serializes to JSON as is;
//! text rendering lives with the binary.

use serde::Serialize;
use tradeplan_catalog::builtin::{TAG_FEED_EXP, TAG_SHOP, TAG_TRADING_POST, TAG_WORKSHOP};
use tradeplan_catalog::{DAY, ItemSpace, SANITY, TradePath};
use tradeplan_ledger::Audit;

use crate::config::PlannerConfig;
use crate::engine::PlanningEngine;
use crate::requirement::ResolvedPlan;
use crate::scheme::{NOISE_THRESHOLD, Scheme};

/// A named quantity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemAmount {
    /// Item name.
    pub item: String,
    /// Quantity.
    pub quantity: f64,
}

/// Settings echoed into the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsSummary {
    /// Sanity recovered per day.
    pub sanity_per_day: f64,
    /// Base LMD per day.
    pub infra_lmd_per_day: f64,
    /// Base battle records per day.
    pub infra_exp_records_per_day: f64,
    /// Tag substrings excluded from the run.
    pub disabled_path_keywords: Vec<String>,
    /// Events whose shops were open.
    pub enabled_events: Vec<String>,
}

/// One character plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanSummary {
    /// Human-readable goal.
    pub description: String,
    /// Items required, when requirement detail is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<ItemAmount>>,
}

/// One item's balance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemRow {
    /// Item name.
    pub item: String,
    /// Display category.
    pub category: String,
    /// Required at the end.
    pub target: f64,
    /// Held at the start.
    pub held: f64,
    /// Produced over the plan.
    pub obtained: f64,
    /// Consumed over the plan.
    pub consumed: f64,
    /// `held + obtained - consumed - target`.
    pub leftover: f64,
}

/// One executed path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathRow {
    /// Executions; may be fractional.
    pub count: f64,
    /// Grouping tag.
    pub tag: String,
    /// Description derived from the tag.
    pub label: String,
    /// Items gained over all executions, when path detail is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gains: Option<Vec<ItemAmount>>,
    /// Items spent over all executions, when path detail is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub costs: Option<Vec<ItemAmount>>,
}

/// A complete, render-ready plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanReport {
    /// Days the plan spans.
    pub elapsed_days: f64,
    /// Sanity needed: days times the daily rate, rounded down, plus one.
    pub recovery_units: f64,
    /// Settings in effect.
    pub settings: SettingsSummary,
    /// Character plans.
    pub plans: Vec<PlanSummary>,
    /// Items with a target or real traffic.
    pub items: Vec<ItemRow>,
    /// Paths executed a non-negligible number of times.
    pub paths: Vec<PathRow>,
}

impl PlanReport {
    /// Project a solved scheme into report rows.
    pub fn build(
        config: &PlannerConfig,
        engine: &PlanningEngine,
        scheme: &Scheme,
        current: &Audit,
        target: &Audit,
        plans: &[ResolvedPlan],
    ) -> Self {
        let settings = &config.settings;
        let space = engine.space();

        let plans = plans
            .iter()
            .map(|plan| PlanSummary {
                description: plan.requirement.describe(),
                required: settings.show_requirement_detail.then(|| {
                    plan.items
                        .iter()
                        .filter(|(_, q)| **q > 0.0)
                        .map(|(item, quantity)| ItemAmount {
                            item: item.clone(),
                            quantity: *quantity,
                        })
                        .collect()
                }),
            })
            .collect();

        let items = scheme
            .balances(current, target)
            .into_iter()
            .filter_map(|balance| {
                let item = space.item(balance.item)?;
                let shown = item.name != DAY
                    && item.name != SANITY
                    && (balance.target > 0.0
                        || balance.obtained > NOISE_THRESHOLD
                        || balance.consumed > NOISE_THRESHOLD);
                shown.then(|| ItemRow {
                    item: item.name.clone(),
                    category: item.category.clone(),
                    target: balance.target,
                    held: balance.held,
                    obtained: balance.obtained,
                    consumed: balance.consumed,
                    leftover: balance.leftover,
                })
            })
            .collect();

        let paths = scheme
            .executed_paths(NOISE_THRESHOLD)
            .filter_map(|(column, count)| {
                let path = engine.paths().get(column)?;
                let (gains, costs) = if settings.show_path_detail {
                    let (gains, costs) = path_detail(space, path, count);
                    (Some(gains), Some(costs))
                } else {
                    (None, None)
                };
                Some(PathRow {
                    count,
                    tag: path.tag().to_owned(),
                    label: path_label(space, path),
                    gains,
                    costs,
                })
            })
            .collect();

        Self {
            elapsed_days: scheme.elapsed_days(),
            recovery_units: scheme.recovery_units(settings.sanity_per_day),
            settings: SettingsSummary {
                sanity_per_day: settings.sanity_per_day,
                infra_lmd_per_day: settings.infra_lmd_per_day,
                infra_exp_records_per_day: settings.infra_exp_records_per_day,
                disabled_path_keywords: config
                    .disabled_keywords()
                    .into_iter()
                    .map(str::to_owned)
                    .collect(),
                enabled_events: settings.enabled_events.clone(),
            },
            plans,
            items,
            paths,
        }
    }
}

/// Describe a path by its tag and the item it is mainly about.
///
/// Shop tags (certificate and event shops) read as purchases.
pub fn path_label(space: &ItemSpace, path: &TradePath) -> String {
    let first_src = path.src().first().map(|(id, _)| space.name_of(*id));
    let first_dst = path.dst().first().map(|(id, _)| space.name_of(*id));
    let tag = path.tag();
    match (tag, first_src, first_dst) {
        (TAG_FEED_EXP, Some(src), _) => format!("feed {src}"),
        (TAG_TRADING_POST, Some(src), _) => format!("trading post: sell {src}"),
        (TAG_WORKSHOP, _, Some(dst)) => format!("workshop: craft {dst}"),
        (_, _, Some(dst)) if tag.contains(TAG_SHOP) => format!("{tag}: buy {dst}"),
        _ => tag.to_owned(),
    }
}

/// Gains and costs of `count` executions, each above the noise threshold.
pub fn path_detail(space: &ItemSpace, path: &TradePath, count: f64) -> (Vec<ItemAmount>, Vec<ItemAmount>) {
    let mut gains = Vec::new();
    let mut costs = Vec::new();
    for (id, amount) in path.net_effect(count) {
        let item = space.name_of(id).to_owned();
        if amount > NOISE_THRESHOLD {
            gains.push(ItemAmount {
                item,
                quantity: amount,
            });
        } else if amount < -NOISE_THRESHOLD {
            costs.push(ItemAmount {
                item,
                quantity: -amount,
            });
        }
    }
    (gains, costs)
}
