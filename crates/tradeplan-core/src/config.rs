//! Configuration loading and typed config structures for a planning run.
//!
//! A run is described by one YAML file (see `planner-config.yaml` at the
//! project root): recovery rates and display switches under `settings`,
//! held and wanted items, and character upgrade plans. This module mirrors
//! that structure in strongly-typed structs and converts it into the
//! catalog parameters, ledgers and requirements the engine consumes.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use tradeplan_catalog::{
    CatalogError, CatalogParams, DAY, ItemSpace, LMD_K, TradePath, recovery_path,
};
use tradeplan_ledger::Audit;

use crate::error::PlanError;
use crate::requirement::{PlanRequirement, Progress, SkillLevels};

/// Placeholder in `output_file` replaced by the local time.
pub const TIMESTAMP_PLACEHOLDER: &str = "$TIMESTAMP";

/// Held or target entries under this name are raw LMD, not thousands.
const RAW_LMD: &str = "LMD";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An item quantity is not a number with an optional k/w/m suffix.
    #[error("cannot parse {0:?} as a quantity")]
    InvalidQuantity(String),

    /// A character level is not `"30"`, `"E1 30"` or similar.
    #[error("cannot parse {0:?} as a character level")]
    InvalidLevel(String),

    /// Skill levels are not an integer or a comma-separated list.
    #[error("cannot parse {0:?} as skill levels")]
    InvalidSkills(String),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level planner configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlannerConfig {
    /// Recovery rates, filters and display switches.
    #[serde(default)]
    pub settings: PlannerSettings,

    /// Items currently held, by name.
    #[serde(default)]
    pub held_items: BTreeMap<String, Quantity>,

    /// Items the plan must end with, by name.
    #[serde(default)]
    pub target_items: BTreeMap<String, Quantity>,

    /// Character upgrades whose costs join the targets.
    #[serde(default)]
    pub plans: Vec<PlanEntry>,
}

/// The `settings` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlannerSettings {
    /// Sanity recovered per day.
    #[serde(default = "default_sanity_per_day")]
    pub sanity_per_day: f64,

    /// LMD produced by the base per day.
    #[serde(default = "default_infra_lmd_per_day")]
    pub infra_lmd_per_day: f64,

    /// Tactical battle records produced by the base per day.
    #[serde(default = "default_infra_exp_records_per_day")]
    pub infra_exp_records_per_day: f64,

    /// Whitespace-separated substrings; paths whose tag contains any are
    /// left out of the run.
    #[serde(default)]
    pub disabled_path_keywords: String,

    /// Report destination; `$TIMESTAMP` is replaced by the local time.
    #[serde(default = "default_output_file")]
    pub output_file: String,

    /// Days of the day item seeded into the held ledger.
    #[serde(default = "default_max_plan_days")]
    pub max_plan_days: f64,

    /// Also list the items each plan requires.
    #[serde(default)]
    pub show_requirement_detail: bool,

    /// Also list what every executed path gains and costs.
    #[serde(default)]
    pub show_path_detail: bool,

    /// Events whose shops are open.
    #[serde(default)]
    pub enabled_events: Vec<String>,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            sanity_per_day: default_sanity_per_day(),
            infra_lmd_per_day: default_infra_lmd_per_day(),
            infra_exp_records_per_day: default_infra_exp_records_per_day(),
            disabled_path_keywords: String::new(),
            output_file: default_output_file(),
            max_plan_days: default_max_plan_days(),
            show_requirement_detail: false,
            show_path_detail: false,
            enabled_events: Vec::new(),
        }
    }
}

/// An item quantity: a number, or a string with a `k`, `w` or `m` suffix.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    /// A plain number.
    Number(f64),
    /// Text such as `"1.2m"` or `"30k"`.
    Text(String),
}

impl Quantity {
    /// The numeric value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidQuantity`] for unparseable text.
    pub fn value(&self) -> Result<f64, ConfigError> {
        match self {
            Self::Number(value) => Ok(*value),
            Self::Text(text) => parse_quantity(text),
        }
    }
}

fn parse_quantity(text: &str) -> Result<f64, ConfigError> {
    let trimmed = text.trim();
    let (digits, scale) = match trimmed.chars().last() {
        Some('k') => (trimmed.trim_end_matches('k'), 1e3),
        Some('w') => (trimmed.trim_end_matches('w'), 1e4),
        Some('m') => (trimmed.trim_end_matches('m'), 1e6),
        _ => (trimmed, 1.0),
    };
    digits
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v * scale)
        .ok_or_else(|| ConfigError::InvalidQuantity(text.to_owned()))
}

/// One character upgrade plan.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlanEntry {
    /// Character name or alias.
    pub character: String,
    /// Current state.
    #[serde(default)]
    pub current: StateEntry,
    /// Desired state.
    #[serde(default)]
    pub target: StateEntry,
}

/// A character state as written in YAML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StateEntry {
    /// `30`, `"E1 30"` or `"E2 1"`.
    #[serde(default = "default_level")]
    pub level: LevelSpec,
    /// `7` (every skill) or `"8,9"` (per skill).
    #[serde(default = "default_skills")]
    pub skills: SkillSpec,
}

impl Default for StateEntry {
    fn default() -> Self {
        Self {
            level: default_level(),
            skills: default_skills(),
        }
    }
}

/// Level field of a state.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LevelSpec {
    /// Bare level at E0.
    Number(u32),
    /// Level text with optional promotion prefix.
    Text(String),
}

/// Skills field of a state.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SkillSpec {
    /// Same level on every skill.
    Number(u8),
    /// Comma-separated per-skill levels.
    Text(String),
}

impl StateEntry {
    /// Convert into a [`Progress`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLevel`] or [`ConfigError::InvalidSkills`].
    pub fn to_progress(&self) -> Result<Progress, ConfigError> {
        let (elite, level) = match &self.level {
            LevelSpec::Number(level) => (0, *level),
            LevelSpec::Text(text) => parse_level(text)?,
        };
        let skills = match &self.skills {
            SkillSpec::Number(level) => SkillLevels::Uniform(*level),
            SkillSpec::Text(text) => parse_skills(text)?,
        };
        Ok(Progress {
            elite,
            level,
            skills,
        })
    }
}

fn parse_level(text: &str) -> Result<(u8, u32), ConfigError> {
    let invalid = || ConfigError::InvalidLevel(text.to_owned());
    let tokens: Vec<&str> = text.split_whitespace().collect();
    match tokens.as_slice() {
        [level] => Ok((0, level.parse::<u32>().ok().ok_or_else(invalid)?)),
        [stage, level] => {
            let elite = stage
                .strip_prefix(['E', 'e'])
                .and_then(|n| n.parse::<u8>().ok())
                .filter(|e| *e <= 2)
                .ok_or_else(invalid)?;
            Ok((elite, level.parse::<u32>().ok().ok_or_else(invalid)?))
        }
        _ => Err(invalid()),
    }
}

fn parse_skills(text: &str) -> Result<SkillLevels, ConfigError> {
    let levels = text
        .split(',')
        .map(|part| part.trim().parse::<u8>().ok())
        .collect::<Option<Vec<u8>>>()
        .ok_or_else(|| ConfigError::InvalidSkills(text.to_owned()))?;
    match levels.as_slice() {
        [] => Err(ConfigError::InvalidSkills(text.to_owned())),
        [single] => Ok(SkillLevels::Uniform(*single)),
        _ => Ok(SkillLevels::PerSkill(levels)),
    }
}

impl PlannerConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Catalog parameters for this run.
    pub fn catalog_params(&self) -> CatalogParams {
        CatalogParams {
            sanity_per_day: self.settings.sanity_per_day,
            lmd_per_day: self.settings.infra_lmd_per_day,
            exp_records_per_day: self.settings.infra_exp_records_per_day,
            enabled_events: self.settings.enabled_events.clone(),
        }
    }

    /// The day-recovery path for the configured daily rates.
    ///
    /// # Errors
    ///
    /// Fails if `space` lacks the basic items or a rate is negative.
    pub fn recovery_path(&self, space: &ItemSpace) -> Result<TradePath, CatalogError> {
        recovery_path(space, &self.catalog_params())
    }

    /// Disabled tag substrings.
    pub fn disabled_keywords(&self) -> Vec<&str> {
        self.settings.disabled_path_keywords.split_whitespace().collect()
    }

    /// Drop paths whose tag contains a disabled keyword.
    ///
    /// The day-consuming path is always kept.
    pub fn retain_enabled(&self, space: &ItemSpace, paths: Vec<TradePath>) -> Vec<TradePath> {
        let keywords = self.disabled_keywords();
        if keywords.is_empty() {
            return paths;
        }
        let day = space.get(DAY);
        let before = paths.len();
        let kept: Vec<TradePath> = paths
            .into_iter()
            .filter(|path| {
                day.is_some_and(|d| path.consumes(d))
                    || !keywords.iter().any(|k| path.tag().contains(k))
            })
            .collect();
        tracing::debug!(
            disabled = before.saturating_sub(kept.len()),
            kept = kept.len(),
            "filtered paths by disabled keywords"
        );
        kept
    }

    /// Report path with the timestamp placeholder filled in.
    pub fn output_path<Tz: chrono::TimeZone>(&self, now: &chrono::DateTime<Tz>) -> PathBuf
    where
        Tz::Offset: std::fmt::Display,
    {
        let stamp = now.format("%Y%m%d%H%M%S").to_string();
        PathBuf::from(
            self.settings
                .output_file
                .replace(TIMESTAMP_PLACEHOLDER, &stamp),
        )
    }

    /// Held items in catalog units; `LMD` becomes `LMD (k)`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidQuantity`] for an unparseable quantity.
    pub fn held(&self) -> Result<Vec<(String, f64)>, ConfigError> {
        normalize(&self.held_items)
    }

    /// Target items in catalog units; `LMD` becomes `LMD (k)`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidQuantity`] for an unparseable quantity.
    pub fn targets(&self) -> Result<Vec<(String, f64)>, ConfigError> {
        normalize(&self.target_items)
    }

    /// The held ledger, seeded with `max_plan_days` days.
    ///
    /// # Errors
    ///
    /// Fails on an unparseable quantity or an unknown item.
    pub fn current_ledger(&self, space: Arc<ItemSpace>) -> Result<Audit, PlanError> {
        let mut ledger = Audit::new(space);
        let held = self.held()?;
        ledger.gain_all(held.iter().map(|(n, q)| (n.as_str(), *q)))?;
        ledger.gain(DAY, self.settings.max_plan_days)?;
        Ok(ledger)
    }

    /// The target ledger with explicit targets only; plan requirements are
    /// resolved into it separately.
    ///
    /// # Errors
    ///
    /// Fails on an unparseable quantity or an unknown item.
    pub fn target_ledger(&self, space: Arc<ItemSpace>) -> Result<Audit, PlanError> {
        let mut ledger = Audit::new(space);
        let targets = self.targets()?;
        ledger.gain_all(targets.iter().map(|(n, q)| (n.as_str(), *q)))?;
        Ok(ledger)
    }

    /// Character upgrade requirements, in file order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLevel`] or [`ConfigError::InvalidSkills`].
    pub fn requirements(&self) -> Result<Vec<PlanRequirement>, ConfigError> {
        self.plans
            .iter()
            .map(|plan| {
                Ok(PlanRequirement::new(
                    plan.character.as_str(),
                    plan.current.to_progress()?,
                    plan.target.to_progress()?,
                ))
            })
            .collect()
    }
}

fn normalize(items: &BTreeMap<String, Quantity>) -> Result<Vec<(String, f64)>, ConfigError> {
    items
        .iter()
        .map(|(name, quantity)| {
            let value = quantity.value()?;
            Ok(if name == RAW_LMD {
                (LMD_K.to_owned(), value / 1000.0)
            } else {
                (name.clone(), value)
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_sanity_per_day() -> f64 {
    240.0
}

const fn default_infra_lmd_per_day() -> f64 {
    45_000.0
}

const fn default_infra_exp_records_per_day() -> f64 {
    20.0
}

fn default_output_file() -> String {
    format!("reports/plan_{TIMESTAMP_PLACEHOLDER}.txt")
}

const fn default_max_plan_days() -> f64 {
    1000.0
}

const fn default_level() -> LevelSpec {
    LevelSpec::Number(1)
}

const fn default_skills() -> SkillSpec {
    SkillSpec::Number(1)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use tradeplan_catalog::{CatalogParams, build_catalog};

    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = PlannerConfig::default();
        assert!(approx(config.settings.sanity_per_day, 240.0));
        assert!(approx(config.settings.infra_lmd_per_day, 45_000.0));
        assert!(approx(config.settings.max_plan_days, 1000.0));
        assert_eq!(config.settings.output_file, "reports/plan_$TIMESTAMP.txt");
        assert_eq!(config.catalog_params(), CatalogParams::default());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
settings:
  sanity_per_day: 300
  infra_lmd_per_day: 60000
  infra_exp_records_per_day: 25
  disabled_path_keywords: "CE- event"
  output_file: "out/$TIMESTAMP.txt"
  max_plan_days: 500
  show_requirement_detail: true
  show_path_detail: true
  enabled_events: ["Knights and Hunters"]
held_items:
  Orirock: 30
  LMD: "1.2m"
  Sugar: "2k"
target_items:
  D32 Steel: 2
plans:
  - character: "Demo Pramanix"
    current: { level: 30, skills: 1 }
    target: { level: "E2 1", skills: "8,9" }
"#;
        let config = PlannerConfig::parse(yaml).unwrap();

        assert!(approx(config.settings.sanity_per_day, 300.0));
        assert_eq!(config.disabled_keywords(), vec!["CE-", "event"]);
        assert!(config.settings.show_path_detail);
        assert_eq!(config.settings.enabled_events.len(), 1);

        let held = config.held().unwrap();
        let held_of = |name: &str| held.iter().find(|(n, _)| n == name).map(|(_, q)| *q);
        assert!(approx(held_of(LMD_K).unwrap(), 1200.0));
        assert!(approx(held_of("Sugar").unwrap(), 2000.0));
        assert!(held_of("LMD").is_none());

        let requirements = config.requirements().unwrap();
        assert_eq!(requirements.len(), 1);
        let req = requirements.first().unwrap();
        assert_eq!(req.start.level, 30);
        assert_eq!(req.start.elite, 0);
        assert_eq!(req.end.elite, 2);
        assert_eq!(req.end.skills, SkillLevels::PerSkill(vec![8, 9]));
    }

    #[test]
    fn parse_empty_yaml() {
        let config = PlannerConfig::parse("").unwrap();
        assert!(config.plans.is_empty());
        assert!(config.target_items.is_empty());
    }

    #[test]
    fn quantity_suffixes() {
        assert!(approx(parse_quantity("3k").unwrap(), 3000.0));
        assert!(approx(parse_quantity("1.5w").unwrap(), 15_000.0));
        assert!(approx(parse_quantity("2m").unwrap(), 2_000_000.0));
        assert!(approx(parse_quantity(" 42 ").unwrap(), 42.0));
        assert!(matches!(
            parse_quantity("lots"),
            Err(ConfigError::InvalidQuantity(_))
        ));
    }

    #[test]
    fn level_and_skill_text() {
        assert_eq!(parse_level("30").unwrap(), (0, 30));
        assert_eq!(parse_level("E1 30").unwrap(), (1, 30));
        assert_eq!(parse_level("e2  1").unwrap(), (2, 1));
        assert!(matches!(parse_level("E3 1"), Err(ConfigError::InvalidLevel(_))));
        assert!(matches!(parse_level("E1 x"), Err(ConfigError::InvalidLevel(_))));
        assert_eq!(parse_skills("7").unwrap(), SkillLevels::Uniform(7));
        assert!(matches!(parse_skills("7,,8"), Err(ConfigError::InvalidSkills(_))));
    }

    #[test]
    fn current_ledger_is_seeded_with_days() {
        let yaml = "held_items:\n  LMD: 5000\n";
        let config = PlannerConfig::parse(yaml).unwrap();
        let catalog = build_catalog(&config.catalog_params()).unwrap();
        let ledger = config.current_ledger(Arc::new(catalog.items)).unwrap();
        assert!(approx(ledger.quantity_of(DAY).unwrap(), 1000.0));
        assert!(approx(ledger.quantity_of(LMD_K).unwrap(), 5.0));
    }

    #[test]
    fn unknown_held_item_fails() {
        let yaml = "held_items:\n  Moonstone: 1\n";
        let config = PlannerConfig::parse(yaml).unwrap();
        let catalog = build_catalog(&config.catalog_params()).unwrap();
        let ledger = config.current_ledger(Arc::new(catalog.items));
        assert!(matches!(ledger, Err(PlanError::Ledger(_))));
    }

    #[test]
    fn disabled_keywords_keep_recovery_path() {
        let yaml = "settings:\n  disabled_path_keywords: \"recovery CE-\"\n";
        let config = PlannerConfig::parse(yaml).unwrap();
        let catalog = build_catalog(&config.catalog_params()).unwrap();
        let total = catalog.paths.len();
        let kept = config.retain_enabled(&catalog.items, catalog.paths);
        assert_eq!(kept.len(), total.saturating_sub(1));
        assert!(kept.iter().all(|p| !p.tag().contains("CE-")));
        let day = catalog.items.get(DAY).unwrap();
        assert!(kept.iter().any(|p| p.consumes(day)));
    }

    #[test]
    fn output_path_substitutes_timestamp() {
        let config = PlannerConfig::default();
        let now = chrono::Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
        assert_eq!(
            config.output_path(&now),
            PathBuf::from("reports/plan_20240305070809.txt")
        );
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("planner-config.yaml");
        let config = PlannerConfig::from_file(&path).unwrap();
        assert_eq!(config.plans.len(), 1);
        config.requirements().unwrap();
    }
}
