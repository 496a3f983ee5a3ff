//! Immutable facts emitted after effects are applied.
//!
//! Events describe what is already true in the world; consuming one never
//! mutates core state. External listeners (persistence, UI, analytics)
//! treat the stream as append-only.

use crate::rules::OutcomeBand;
use crate::value::{EntityId, RecipeId, ResourceBundle, Timestamp};

/// Closed set of fact payloads.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    MissionStarted {
        mission: EntityId,
        adventurer: EntityId,
        ends_at: Timestamp,
    },
    MissionResolved {
        mission: EntityId,
        adventurer: EntityId,
        outcome: OutcomeBand,
        rewards: ResourceBundle,
    },
    MissionExpired {
        mission: EntityId,
    },
    AdventurerLeveledUp {
        adventurer: EntityId,
        level: u8,
    },
    ItemEquipped {
        adventurer: EntityId,
        item: EntityId,
    },
    ItemUnequipped {
        adventurer: EntityId,
        item: EntityId,
    },
    ItemRepaired {
        item: EntityId,
    },
    ItemSalvaged {
        item: EntityId,
        refund: ResourceBundle,
    },
    FacilityUpgraded {
        facility: EntityId,
        tier: u8,
    },
    /// A recipe entered the queue behind an already-running job.
    CraftingQueued {
        facility: EntityId,
        recipe: RecipeId,
    },
    CraftingStarted {
        facility: EntityId,
        recipe: RecipeId,
        completes_at: Timestamp,
    },
    CraftingCompleted {
        facility: EntityId,
        recipe: RecipeId,
        item: EntityId,
    },
    ResourcesGenerated {
        slot: EntityId,
        amount: ResourceBundle,
    },
    MissionOfferPosted {
        mission: EntityId,
    },
    SlotWorkerAssigned {
        slot: EntityId,
    },
}

/// A fact plus the instant it became true.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DomainEvent {
    pub kind: EventKind,
    pub at: Timestamp,
}

impl DomainEvent {
    pub fn new(kind: EventKind, at: Timestamp) -> Self {
        Self { kind, at }
    }
}
