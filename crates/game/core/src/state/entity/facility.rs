//! Facility entities.

use std::collections::VecDeque;

use crate::value::RecipeId;

/// Facility kinds the guild can build out.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum FacilityKind {
    /// Boosts mission throughput.
    Guildhall,
    /// Runs the crafting queue.
    Workshop,
    /// Hosts resource generation slots.
    Mine,
}

/// Attribute payload of a facility entity.
///
/// Facilities have no state machine, only a tier. The crafting queue lives
/// here; the active job's completion instant lives in the entity's
/// `CompleteAt` timer.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Facility {
    pub kind: FacilityKind,
    pub tier: u8,
    /// Recipes waiting behind the active job, front first.
    pub queue: VecDeque<RecipeId>,
    /// Recipe currently being crafted, if any.
    pub active_recipe: Option<RecipeId>,
}

impl Facility {
    pub fn new(kind: FacilityKind) -> Self {
        Self {
            kind,
            tier: 1,
            queue: VecDeque::new(),
            active_recipe: None,
        }
    }

    /// Raises the tier by exactly one level and returns the new tier.
    ///
    /// Tier changes must go through here one level at a time; jumping the
    /// field numerically would skip per-level bookkeeping.
    pub fn upgrade(&mut self) -> u8 {
        self.tier = self.tier.saturating_add(1);
        self.tier
    }
}
