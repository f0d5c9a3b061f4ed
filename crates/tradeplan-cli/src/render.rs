//! Text rendering of a [`PlanReport`].
//!
//! Counts and quantities are shown with two decimals; the report keeps the
//! fractional values the solver returned.

use std::fmt::Write;

use tradeplan_core::PlanReport;
use tradeplan_core::report::ItemAmount;

const RULE: &str = "--------------------------------------------------------------------------------";

/// Render `report` as a plain-text plan.
///
/// # Errors
///
/// Returns [`std::fmt::Error`] only if writing to the buffer fails.
pub fn render_text(report: &PlanReport) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    let settings = &report.settings;

    writeln!(out, "Trade plan")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "Elapsed days:   {:.2}", report.elapsed_days)?;
    writeln!(
        out,
        "Sanity needed:  {:.0} ({:.0} per day)",
        report.recovery_units, settings.sanity_per_day
    )?;
    writeln!(
        out,
        "Base income:    {:.0} LMD, {:.0} battle records per day",
        settings.infra_lmd_per_day, settings.infra_exp_records_per_day
    )?;
    if !settings.disabled_path_keywords.is_empty() {
        writeln!(out, "Disabled paths: {}", settings.disabled_path_keywords.join(" "))?;
    }
    if !settings.enabled_events.is_empty() {
        writeln!(out, "Events:         {}", settings.enabled_events.join(", "))?;
    }

    if !report.plans.is_empty() {
        writeln!(out)?;
        writeln!(out, "Plans")?;
        writeln!(out, "{RULE}")?;
        for plan in &report.plans {
            writeln!(out, "{}", plan.description)?;
            if let Some(required) = &plan.required {
                write_amounts(&mut out, "    ", required)?;
            }
        }
    }

    writeln!(out)?;
    writeln!(out, "Items")?;
    writeln!(out, "{RULE}")?;
    writeln!(
        out,
        "{:<32} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "item", "target", "held", "obtained", "consumed", "leftover"
    )?;
    let mut category = None;
    for row in &report.items {
        if category != Some(row.category.as_str()) {
            writeln!(out, "[{}]", row.category)?;
            category = Some(row.category.as_str());
        }
        writeln!(
            out,
            "{:<32} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2}",
            row.item, row.target, row.held, row.obtained, row.consumed, row.leftover
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Paths")?;
    writeln!(out, "{RULE}")?;
    for path in &report.paths {
        writeln!(out, "{:>10.2} x {}", path.count, path.label)?;
        if let Some(gains) = &path.gains {
            write_amounts(&mut out, "             + ", gains)?;
        }
        if let Some(costs) = &path.costs {
            write_amounts(&mut out, "             - ", costs)?;
        }
    }

    Ok(out)
}

fn write_amounts(out: &mut String, prefix: &str, amounts: &[ItemAmount]) -> std::fmt::Result {
    for amount in amounts {
        writeln!(out, "{prefix}{} x {:.2}", amount.item, amount.quantity)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tradeplan_core::report::{ItemRow, PathRow, PlanSummary, SettingsSummary};

    use super::*;

    fn report() -> PlanReport {
        PlanReport {
            elapsed_days: 2.5,
            recovery_units: 601.0,
            settings: SettingsSummary {
                sanity_per_day: 240.0,
                infra_lmd_per_day: 45_000.0,
                infra_exp_records_per_day: 20.0,
                disabled_path_keywords: vec!["CE-".to_owned()],
                enabled_events: Vec::new(),
            },
            plans: vec![PlanSummary {
                description: "Demo Pramanix: E0 Lv1 (skills 1) -> E0 Lv1 (skills 2)".to_owned(),
                required: Some(vec![ItemAmount {
                    item: "Skill Summary - 1".to_owned(),
                    quantity: 4.0,
                }]),
            }],
            items: vec![ItemRow {
                item: "Sugar".to_owned(),
                category: "T2".to_owned(),
                target: 4.0,
                held: 1.0,
                obtained: 3.0,
                consumed: 0.0,
                leftover: 0.0,
            }],
            paths: vec![PathRow {
                count: 3.0,
                tag: "workshop".to_owned(),
                label: "workshop: craft Sugar".to_owned(),
                gains: None,
                costs: None,
            }],
        }
    }

    #[test]
    fn text_report_lists_every_section() {
        let text = render_text(&report()).unwrap();
        assert!(text.contains("Elapsed days:   2.50"));
        assert!(text.contains("Sanity needed:  601 (240 per day)"));
        assert!(text.contains("Disabled paths: CE-"));
        assert!(text.contains("    Skill Summary - 1 x 4.00"));
        assert!(text.contains("[T2]"));
        assert!(text.contains("      3.00 x workshop: craft Sugar"));
        assert!(!text.contains("Events:"));
    }
}
