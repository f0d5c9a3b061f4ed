//! Character progression goals and their folding into the target ledger.
//!
//! A [`PlanRequirement`] says "take this character from one state to
//! another". It is resolved once, through a [`ProgressionCosts`]
//! implementation, into a flat item delta that is gained into the target
//! ledger. The planning engine never sees the requirement itself.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tradeplan_ledger::Audit;

use crate::error::PlanError;
use crate::progression::ProgressionCosts;

/// Skill levels of a character state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SkillLevels {
    /// The same level on every skill.
    Uniform(u8),
    /// One level per skill, in skill order.
    PerSkill(Vec<u8>),
}

impl SkillLevels {
    /// Expand to one level per skill for a character with `skills` skills.
    ///
    /// A per-skill list shorter than `skills` is padded with its last value.
    pub fn expand(&self, skills: usize) -> Vec<u8> {
        match self {
            Self::Uniform(level) => vec![*level; skills],
            Self::PerSkill(levels) => {
                let pad = levels.last().copied().unwrap_or(1);
                (0..skills)
                    .map(|i| levels.get(i).copied().unwrap_or(pad))
                    .collect()
            }
        }
    }
}

impl fmt::Display for SkillLevels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniform(level) => write!(f, "{level}"),
            Self::PerSkill(levels) => {
                let parts: Vec<String> = levels.iter().map(ToString::to_string).collect();
                write!(f, "({})", parts.join(", "))
            }
        }
    }
}

/// A character's promotion, level and skill levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// Promotion stage, 0..=2.
    pub elite: u8,
    /// Level within the promotion stage.
    pub level: u32,
    /// Skill levels.
    pub skills: SkillLevels,
}

impl Progress {
    /// A freshly recruited character.
    pub const fn recruit() -> Self {
        Self {
            elite: 0,
            level: 1,
            skills: SkillLevels::Uniform(1),
        }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{} Lv{} (skills {})", self.elite, self.level, self.skills)
    }
}

/// A progression goal: take `subject` from `start` to `end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanRequirement {
    /// Character name or alias.
    pub subject: String,
    /// Current state.
    pub start: Progress,
    /// Desired state.
    pub end: Progress,
}

impl PlanRequirement {
    /// Build a requirement.
    pub fn new(subject: impl Into<String>, start: Progress, end: Progress) -> Self {
        Self {
            subject: subject.into(),
            start,
            end,
        }
    }

    /// One-line description, e.g. `Demo Pramanix: E0 Lv1 (skills 1) -> E2 Lv1 (skills 7)`.
    pub fn describe(&self) -> String {
        format!("{}: {} -> {}", self.subject, self.start, self.end)
    }

    /// Resolve into an item delta and gain it into `target`.
    ///
    /// Returns the delta so callers can report it.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Progression`] if the costs cannot be resolved, or
    /// [`PlanError::Ledger`] if they name an item outside the target's space.
    /// `target` is unchanged on error.
    pub fn resolve(
        &self,
        costs: &dyn ProgressionCosts,
        target: &mut Audit,
    ) -> Result<BTreeMap<String, f64>, PlanError> {
        let delta = costs.required_items(self)?;
        target.gain_all(delta.iter().map(|(name, q)| (name.as_str(), *q)))?;
        tracing::debug!(
            subject = %self.subject,
            items = delta.len(),
            "progression requirement resolved"
        );
        Ok(delta)
    }
}

/// A requirement together with the items it resolved to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPlan {
    /// The goal.
    pub requirement: PlanRequirement,
    /// Items it adds to the target ledger.
    pub items: BTreeMap<String, f64>,
}
