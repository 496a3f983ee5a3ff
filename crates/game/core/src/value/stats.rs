//! Adventurer ability scores.
//!
//! Scores follow the d20 convention: 10 is baseline, every two points above
//! or below shifts the modifier by one.

use std::collections::BTreeMap;

/// Closed set of ability scores an adventurer carries.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AbilityKind {
    Might,
    Agility,
    Wits,
    Resolve,
}

/// Converts a raw ability score to its d20 modifier.
///
/// `(score - 10) / 2`, rounding toward negative infinity so a score of 9
/// yields -1, not 0.
pub fn ability_modifier(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

/// Numeric stat map keyed by ability. Absent abilities read as the baseline
/// score of 10.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatMap {
    scores: BTreeMap<AbilityKind, i32>,
}

impl StatMap {
    pub const BASELINE: i32 = 10;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, ability: AbilityKind, score: i32) -> Self {
        self.scores.insert(ability, score);
        self
    }

    pub fn score(&self, ability: AbilityKind) -> i32 {
        self.scores.get(&ability).copied().unwrap_or(Self::BASELINE)
    }

    pub fn modifier(&self, ability: AbilityKind) -> i32 {
        ability_modifier(self.score(ability))
    }
}
