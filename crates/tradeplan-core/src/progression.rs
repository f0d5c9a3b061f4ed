//! Character upgrade costs.
//!
//! [`ProgressionCosts`] is the seam between a [`PlanRequirement`] and the
//! items it needs. [`CharacterTable`] is the provided implementation: typed
//! [`CharacterRecord`]s looked up by name or alias in a plain map, plus the
//! shared level EXP and LMD tables.
//!
//! An upgrade costs:
//! 1. The promotion items of every stage crossed.
//! 2. The cumulative EXP and LMD difference between the two levels
//!    (clamped at zero).
//! 3. Skill items: common levels 1 to 7 are shared by all skills and paid
//!    once; mastery levels 7 to 10 are paid per skill.
//!
//! Record item sets name raw `LMD` and `EXP`; the result reports them in
//! thousands as `LMD (k)` and `EXP (k)`.

use std::collections::BTreeMap;
use std::io::BufRead;

use serde::Deserialize;
use tradeplan_catalog::{EXP_K, LMD_K};

use crate::error::ProgressionError;
use crate::requirement::{PlanRequirement, Progress};

/// Raw currency name used in record item sets.
pub const LMD: &str = "LMD";

/// Raw experience name used in record item sets.
pub const EXP: &str = "EXP";

/// Highest common skill level; levels above it are masteries.
const COMMON_SKILL_CAP: u8 = 7;

/// Highest skill level.
const MAX_SKILL_LEVEL: u8 = 10;

/// Cumulative EXP to reach a level, per promotion stage: (level, total).
const EXP_TABLE: [&[(u32, f64)]; 2] = [
    &[
        (1, 0.0),
        (10, 1872.0),
        (15, 3875.0),
        (20, 6517.0),
        (25, 9842.0),
        (30, 13_800.0),
        (35, 18_190.0),
        (40, 23_000.0),
        (45, 28_800.0),
        (50, 38_800.0),
    ],
    &[
        (1, 0.0),
        (10, 3672.0),
        (15, 8232.0),
        (20, 14_592.0),
        (25, 22_752.0),
        (30, 32_712.0),
        (35, 44_472.0),
        (40, 58_032.0),
        (45, 73_392.0),
        (50, 90_552.0),
        (55, 110_000.0),
        (60, 141_000.0),
        (65, 180_315.0),
        (70, 226_000.0),
        (75, 280_725.0),
        (80, 350_000.0),
    ],
];

/// Cumulative LMD to reach a level, per promotion stage: (level, total).
const LMD_TABLE: [&[(u32, f64)]; 2] = [
    &[
        (1, 0.0),
        (10, 702.0),
        (15, 1532.0),
        (20, 2736.0),
        (25, 4479.0),
        (30, 6611.0),
        (35, 9675.0),
        (40, 14_180.0),
        (45, 21_109.0),
        (50, 32_394.0),
    ],
    &[
        (1, 0.0),
        (10, 1741.0),
        (15, 4152.0),
        (20, 7735.0),
        (25, 12_918.0),
        (30, 19_790.0),
        (35, 28_548.0),
        (40, 39_390.0),
        (45, 52_337.0),
        (50, 67_930.0),
        (55, 86_793.0),
        (60, 118_128.0),
        (65, 160_352.0),
        (70, 211_732.0),
        (75, 276_508.0),
        (80, 362_142.0),
    ],
];

/// Item quantities keyed by name.
pub type ItemSet = BTreeMap<String, f64>;

/// Maps a progression goal to the items it consumes.
pub trait ProgressionCosts {
    /// Items needed to take the requirement's subject from start to end.
    ///
    /// # Errors
    ///
    /// Returns a [`ProgressionError`] if the subject is unknown or either
    /// state is invalid for it.
    fn required_items(&self, requirement: &PlanRequirement) -> Result<ItemSet, ProgressionError>;
}

/// Upgrade cost data of one character.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CharacterRecord {
    /// Canonical name.
    pub name: String,
    /// Alternative names accepted in plans.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Rarity, 1..=6; selects the level caps.
    pub stars: u8,
    /// Number of skills.
    pub skills: u8,
    /// Items for promotion to E1 and E2.
    #[serde(default)]
    pub promotion: Vec<ItemSet>,
    /// Items for common skill levels 1->2 through 6->7.
    #[serde(default)]
    pub skill_common: Vec<ItemSet>,
    /// Per skill, items for masteries 7->8, 8->9 and 9->10.
    #[serde(default)]
    pub skill_mastery: Vec<Vec<ItemSet>>,
}

/// Level cap at a promotion stage for a rarity.
pub const fn level_cap(elite: u8, stars: u8) -> Option<u32> {
    match (elite, stars) {
        (0, 2) => Some(30),
        (0, 3) => Some(40),
        (0, 4) => Some(45),
        (0, 5 | 6) => Some(50),
        (1, 3) => Some(55),
        (1, 4) => Some(60),
        (1, 5) => Some(70),
        (1, 6) => Some(80),
        (2, 3..=6) => Some(1),
        _ => None,
    }
}

fn interpolate(table: &[(u32, f64)], level: u32) -> Option<f64> {
    table.windows(2).find_map(|pair| match pair {
        [(l0, v0), (l1, v1)] if *l0 <= level && level <= *l1 => {
            let span = f64::from(l1.saturating_sub(*l0));
            let offset = f64::from(level.saturating_sub(*l0));
            Some(v0 + (v1 - v0) * offset / span)
        }
        _ => None,
    })
}

impl CharacterRecord {
    fn invalid_level(&self, state: &Progress) -> ProgressionError {
        ProgressionError::InvalidLevel {
            character: self.name.clone(),
            elite: state.elite,
            level: state.level,
        }
    }

    /// Cumulative total of `tables` to reach `state` from a fresh recruit.
    fn cumulative(&self, tables: &[&[(u32, f64)]; 2], state: &Progress) -> Result<f64, ProgressionError> {
        let cap = level_cap(state.elite, self.stars).ok_or_else(|| self.invalid_level(state))?;
        if state.level < 1 || state.level > cap {
            return Err(self.invalid_level(state));
        }
        let [e0, e1] = *tables;
        let at = |table: &[(u32, f64)], level: u32| {
            interpolate(table, level).ok_or_else(|| self.invalid_level(state))
        };
        let e0_cap = level_cap(0, self.stars).ok_or_else(|| self.invalid_level(state))?;
        match state.elite {
            0 => at(e0, state.level),
            1 => Ok(at(e0, e0_cap)? + at(e1, state.level)?),
            _ => {
                let e1_cap = level_cap(1, self.stars).ok_or_else(|| self.invalid_level(state))?;
                Ok(at(e0, e0_cap)? + at(e1, e1_cap)?)
            }
        }
    }

    fn check_skills(&self, levels: &[u8]) -> Result<(), ProgressionError> {
        match levels.iter().find(|&&l| l < 1 || l > MAX_SKILL_LEVEL) {
            Some(&level) => Err(ProgressionError::InvalidSkillLevel {
                character: self.name.clone(),
                level,
            }),
            None => Ok(()),
        }
    }

    /// Items to move from `start` to `end`, raw LMD and EXP included.
    fn upgrade_items(&self, start: &Progress, end: &Progress) -> Result<ItemSet, ProgressionError> {
        if start.elite > end.elite {
            return Err(ProgressionError::InvalidState {
                character: self.name.clone(),
                reason: format!("cannot go from E{} back to E{}", start.elite, end.elite),
            });
        }
        let mut items = ItemSet::new();

        for stage in 1..=2_u8 {
            if start.elite < stage && stage <= end.elite {
                let set = self
                    .promotion
                    .get(usize::from(stage.saturating_sub(1)))
                    .ok_or_else(|| self.invalid_level(end))?;
                add_all(&mut items, set);
            }
        }

        let lmd = self.cumulative(&LMD_TABLE, end)? - self.cumulative(&LMD_TABLE, start)?;
        let exp = self.cumulative(&EXP_TABLE, end)? - self.cumulative(&EXP_TABLE, start)?;
        add(&mut items, LMD, lmd.max(0.0));
        add(&mut items, EXP, exp.max(0.0));

        let skills = usize::from(self.skills);
        let from = start.skills.expand(skills);
        let to = end.skills.expand(skills);
        self.check_skills(&from)?;
        self.check_skills(&to)?;

        let common = |levels: &[u8]| levels.iter().copied().max().unwrap_or(1).min(COMMON_SKILL_CAP);
        for level in common(&from)..common(&to) {
            let set = self
                .skill_common
                .get(usize::from(level.saturating_sub(1)))
                .ok_or_else(|| ProgressionError::InvalidSkillLevel {
                    character: self.name.clone(),
                    level,
                })?;
            add_all(&mut items, set);
        }

        for (skill, (&begin, &finish)) in from.iter().zip(&to).enumerate() {
            for level in begin.max(COMMON_SKILL_CAP)..finish {
                let set = self
                    .skill_mastery
                    .get(skill)
                    .and_then(|tiers| tiers.get(usize::from(level.saturating_sub(COMMON_SKILL_CAP))))
                    .ok_or_else(|| ProgressionError::InvalidSkillLevel {
                        character: self.name.clone(),
                        level,
                    })?;
                add_all(&mut items, set);
            }
        }

        Ok(items)
    }
}

fn add(items: &mut ItemSet, name: &str, quantity: f64) {
    *items.entry(name.to_owned()).or_insert(0.0) += quantity;
}

fn add_all(items: &mut ItemSet, set: &ItemSet) {
    for (name, quantity) in set {
        add(items, name, *quantity);
    }
}

/// Replace raw LMD and EXP with their thousands and drop empty entries.
fn to_catalog_units(mut items: ItemSet) -> ItemSet {
    for (raw, scaled) in [(LMD, LMD_K), (EXP, EXP_K)] {
        if let Some(quantity) = items.remove(raw) {
            add(&mut items, scaled, quantity / 1000.0);
        }
    }
    items.retain(|_, q| q.abs() > 0.0);
    items
}

// ---------------------------------------------------------------------------
// Character table
// ---------------------------------------------------------------------------

/// Character records keyed by name, with an alias index.
#[derive(Debug, Clone, Default)]
pub struct CharacterTable {
    records: BTreeMap<String, CharacterRecord>,
    aliases: BTreeMap<String, String>,
}

impl CharacterTable {
    /// An empty table.
    pub const fn new() -> Self {
        Self {
            records: BTreeMap::new(),
            aliases: BTreeMap::new(),
        }
    }

    /// A table holding only the built-in demo character.
    pub fn with_builtin() -> Self {
        let mut table = Self::new();
        table.insert(demo_character());
        table
    }

    /// Add or replace a record.
    pub fn insert(&mut self, record: CharacterRecord) {
        for alias in &record.aliases {
            self.aliases.insert(alias.clone(), record.name.clone());
        }
        self.records.insert(record.name.clone(), record);
    }

    /// Load JSON-lines records; blank lines are skipped.
    ///
    /// Returns the number of records added.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressionError::Record`] for a malformed line or
    /// [`ProgressionError::Io`] if reading fails.
    pub fn load_records<R: BufRead>(&mut self, reader: R) -> Result<usize, ProgressionError> {
        let mut added = 0_usize;
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: CharacterRecord =
                serde_json::from_str(&line).map_err(|source| ProgressionError::Record {
                    line: index.saturating_add(1),
                    source,
                })?;
            self.insert(record);
            added = added.saturating_add(1);
        }
        tracing::debug!(added, total = self.records.len(), "character records loaded");
        Ok(added)
    }

    /// Look up by canonical name or alias.
    pub fn get(&self, name: &str) -> Option<&CharacterRecord> {
        self.records.get(name).or_else(|| {
            self.aliases
                .get(name)
                .and_then(|canonical| self.records.get(canonical))
        })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ProgressionCosts for CharacterTable {
    fn required_items(&self, requirement: &PlanRequirement) -> Result<ItemSet, ProgressionError> {
        let record = self
            .get(&requirement.subject)
            .ok_or_else(|| ProgressionError::UnknownCharacter(requirement.subject.clone()))?;
        let items = record.upgrade_items(&requirement.start, &requirement.end)?;
        Ok(to_catalog_units(items))
    }
}

fn set(entries: &[(&str, f64)]) -> ItemSet {
    entries
        .iter()
        .map(|(name, quantity)| ((*name).to_owned(), *quantity))
        .collect()
}

/// Name of the character that is always present.
pub const DEMO_CHARACTER: &str = "Demo Pramanix";

/// The built-in five-star, two-skill demo character.
pub fn demo_character() -> CharacterRecord {
    CharacterRecord {
        name: DEMO_CHARACTER.to_owned(),
        aliases: vec!["demo".to_owned()],
        stars: 5,
        skills: 2,
        promotion: vec![
            set(&[
                (LMD, 20_000.0),
                ("Supporter Chip", 4.0),
                ("Sugar", 4.0),
                ("Oriron", 3.0),
            ]),
            set(&[
                (LMD, 120_000.0),
                ("Supporter Dualchip", 3.0),
                ("Keton Colloid", 7.0),
                ("Grindstone", 11.0),
            ]),
        ],
        skill_common: vec![
            set(&[("Skill Summary - 1", 4.0)]),
            set(&[("Skill Summary - 1", 4.0), ("Sugar Substitute", 7.0)]),
            set(&[("Skill Summary - 2", 6.0), ("Polyester", 3.0)]),
            set(&[("Skill Summary - 2", 6.0), ("Oriron", 4.0)]),
            set(&[("Skill Summary - 2", 6.0), ("Grindstone", 3.0)]),
            set(&[
                ("Skill Summary - 3", 6.0),
                ("RMA70-12", 2.0),
                ("Polyester Pack", 3.0),
            ]),
        ],
        skill_mastery: vec![
            vec![
                set(&[
                    ("Skill Summary - 3", 5.0),
                    ("Orirock Concentration", 3.0),
                    ("Grindstone", 4.0),
                ]),
                set(&[
                    ("Skill Summary - 3", 6.0),
                    ("Polyester Lump", 3.0),
                    ("Orirock Concentration", 6.0),
                ]),
                set(&[
                    ("Skill Summary - 3", 10.0),
                    ("Polymerization Preparation", 4.0),
                    ("Optimized Device", 3.0),
                ]),
            ],
            vec![
                set(&[
                    ("Skill Summary - 3", 5.0),
                    ("Sugar Lump", 3.0),
                    ("RMA70-12", 3.0),
                ]),
                set(&[
                    ("Skill Summary - 3", 6.0),
                    ("Oriron Block", 3.0),
                    ("Sugar Lump", 5.0),
                ]),
                set(&[
                    ("Skill Summary - 3", 10.0),
                    ("Bipolar Nanoflake", 4.0),
                    ("Oriron Block", 3.0),
                ]),
            ],
        ],
    }
}
