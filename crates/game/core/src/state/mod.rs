//! Authoritative world state representation.
//!
//! The hosting layer owns one [`WorldState`] and mutates it exclusively
//! through effects (player verbs via the action driver, time via the idle
//! loop). The core threads the entity map and resource bundle as exclusive
//! references; it never aliases them and provides no internal locking — the
//! host serializes calls.

pub mod entity;

use std::collections::BTreeMap;

pub use entity::{
    Adventurer, AdventurerState, Entity, EntityKind, EquipSlot, Equipment, Facility, FacilityKind,
    Item, ItemState, KindLabel, MetaValue, Mission, MissionState, ResourceSlot, RoleKind,
    SlotAssignee, SlotState, StateLabel, TimerKey, Timers, TransitionError,
};

use crate::value::{EntityId, ResourceBundle, Timestamp};

/// The shared entity map. BTreeMap so every pass over the world visits
/// entities in the same id order — the idle loop depends on this for
/// reproducible catch-up.
pub type EntityMap = BTreeMap<EntityId, Entity>;

/// Complete simulation state for one player.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldState {
    pub player_id: String,
    /// High-water mark of simulated time; only ever moves forward.
    pub last_simulated_at: Timestamp,
    pub entities: EntityMap,
    pub resources: ResourceBundle,
}

impl WorldState {
    pub fn new(player_id: impl Into<String>, created_at: Timestamp) -> Self {
        Self {
            player_id: player_id.into(),
            last_simulated_at: created_at,
            entities: EntityMap::new(),
            resources: ResourceBundle::new(),
        }
    }

    /// Inserts an entity, replacing nothing: the id must be fresh.
    ///
    /// Intended for world setup; in-simulation creation goes through the
    /// spawn effect, which performs the same duplicate check as an error.
    pub fn insert(&mut self, entity: Entity) -> &mut Self {
        debug_assert!(
            !self.entities.contains_key(&entity.id),
            "duplicate entity id {}",
            entity.id
        );
        self.entities.insert(entity.id.clone(), entity);
        self
    }

    /// Read-only view used by requirement evaluation and effect planning.
    pub fn snapshot(&self, now: Timestamp) -> Snapshot<'_> {
        Snapshot {
            entities: &self.entities,
            resources: &self.resources,
            now,
        }
    }
}

/// Immutable view of the world at a single instant.
///
/// Requirements and `compute_effects` read through this; neither gets a
/// mutable path to state, which is what makes re-validation after a preview
/// safe.
#[derive(Clone, Copy)]
pub struct Snapshot<'a> {
    pub entities: &'a EntityMap,
    pub resources: &'a ResourceBundle,
    pub now: Timestamp,
}

impl<'a> Snapshot<'a> {
    pub fn new(entities: &'a EntityMap, resources: &'a ResourceBundle, now: Timestamp) -> Self {
        Self {
            entities,
            resources,
            now,
        }
    }

    pub fn entity(&self, id: &EntityId) -> Option<&'a Entity> {
        self.entities.get(id)
    }
}
