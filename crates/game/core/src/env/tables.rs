//! Static content table oracles.
//!
//! Templates are read-only lookups by id, immutable for the lifetime of a
//! session, and never appear in game state. The core consumes them through
//! these traits; `guild-content` (or a test fixture) provides them.

use crate::state::{EquipSlot, FacilityKind, RoleKind};
use crate::value::{ArchetypeId, Duration, RecipeId, ResourceBundle, ResourceUnit};

/// Template a mission offer is stamped from.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MissionArchetype {
    pub id: ArchetypeId,
    pub name: String,
    pub dc: i32,
    pub base_duration: Duration,
    /// Rewards at the 1.0x outcome band.
    pub rewards: ResourceBundle,
    pub xp_reward: u64,
    pub preferred_role: RoleKind,
    pub tags: Vec<String>,
    /// How long a posted offer stays available before expiring.
    pub offer_ttl: Duration,
}

/// Crafting recipe template.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    /// Resources consumed when the job is enqueued.
    pub cost: Vec<ResourceUnit>,
    pub base_duration: Duration,
    pub output_slot: EquipSlot,
    pub output_max_durability: u32,
    pub output_salvage: ResourceBundle,
    pub output_tags: Vec<String>,
}

/// Mission archetype lookup.
pub trait ArchetypeOracle {
    fn archetype(&self, id: &ArchetypeId) -> Option<&MissionArchetype>;
}

/// Crafting recipe lookup.
pub trait RecipeOracle {
    fn recipe(&self, id: &RecipeId) -> Option<&Recipe>;
}

/// Facility tier progression rules.
pub trait FacilityOracle {
    /// Highest tier this facility kind can reach.
    fn max_tier(&self, kind: FacilityKind) -> u8;

    /// Cost to go from `current_tier` to the next, `None` once capped.
    fn upgrade_cost(&self, kind: FacilityKind, current_tier: u8) -> Option<Vec<ResourceUnit>>;
}
