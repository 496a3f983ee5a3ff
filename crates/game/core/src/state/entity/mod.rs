//! The universal entity shape and its typed variants.
//!
//! Every mutable game object is an [`Entity`]: an id, a typed attribute
//! payload ([`EntityKind`]), tags, named timers, and free-form metadata.
//! Entities live only in the shared entity map and reference each other by
//! id; nothing holds an entity by pointer.
//!
//! State machines are closed enums per variant with transition functions on
//! the variant, so illegal edges fail at the entity boundary rather than in
//! whichever effect happened to write the field.

mod adventurer;
mod facility;
mod item;
mod mission;
mod slot;

pub use adventurer::{Adventurer, AdventurerState, EquipSlot, Equipment, RoleKind};
pub use facility::{Facility, FacilityKind};
pub use item::{Item, ItemState};
pub use mission::{Mission, MissionState};
pub use slot::{ResourceSlot, SlotAssignee, SlotState};

use std::collections::{BTreeMap, BTreeSet};

use crate::value::{EntityId, Timestamp};

/// Named instants an entity can carry.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TimerKey {
    /// When a mission run began.
    StartedAt,
    /// When a mission run is due for resolution.
    EndsAt,
    /// When an open offer stops being available.
    ExpiresAt,
    /// Last instant a resource slot generated.
    LastTickAt,
    /// When the active crafting job finishes.
    CompleteAt,
}

/// Timer storage: absent keys mean "not set".
pub type Timers = BTreeMap<TimerKey, Timestamp>;

/// Free-form metadata value. Never read by game rules, with one sanctioned
/// exception: the slot fractional accumulator bookkeeping.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MetaValue {
    Text(String),
    Number(f64),
}

/// Discriminator label for entity kinds, used by requirements.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum KindLabel {
    Adventurer,
    Mission,
    Item,
    Facility,
    ResourceSlot,
}

/// Typed attribute payload, one variant per entity kind.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityKind {
    Adventurer(Adventurer),
    Mission(Mission),
    Item(Item),
    Facility(Facility),
    ResourceSlot(ResourceSlot),
}

impl EntityKind {
    pub fn label(&self) -> KindLabel {
        match self {
            EntityKind::Adventurer(_) => KindLabel::Adventurer,
            EntityKind::Mission(_) => KindLabel::Mission,
            EntityKind::Item(_) => KindLabel::Item,
            EntityKind::Facility(_) => KindLabel::Facility,
            EntityKind::ResourceSlot(_) => KindLabel::ResourceSlot,
        }
    }
}

/// Target of a state-transition effect, tagged by entity kind.
///
/// Facilities carry no state machine, so there is no facility variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateLabel {
    Adventurer(AdventurerState),
    Mission(MissionState),
    Item(ItemState),
    Slot(SlotState),
}

/// Errors raised by state transitions.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("{kind} cannot transition from {from} to {to}")]
    Illegal {
        kind: &'static str,
        from: String,
        to: String,
    },
    #[error("mission cannot enter in_progress without started_at and ends_at timers")]
    MissingMissionTimers,
    #[error("state label does not apply to a {kind} entity")]
    KindMismatch { kind: KindLabel },
}

impl TransitionError {
    pub(crate) fn illegal(
        kind: &'static str,
        from: impl std::fmt::Display,
        to: impl std::fmt::Display,
    ) -> Self {
        Self::Illegal {
            kind,
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// Universal shape for every mutable game object.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Labels used for synergy matching. Insertion order is irrelevant.
    pub tags: BTreeSet<String>,
    pub timers: Timers,
    /// Display/lore annotations plus sanctioned bookkeeping; game rules
    /// never branch on metadata content.
    pub metadata: BTreeMap<String, MetaValue>,
}

impl Entity {
    pub fn new(id: EntityId, kind: EntityKind) -> Self {
        Self {
            id,
            kind,
            tags: BTreeSet::new(),
            timers: BTreeMap::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_timer(mut self, key: TimerKey, at: Timestamp) -> Self {
        self.timers.insert(key, at);
        self
    }

    pub fn timer(&self, key: TimerKey) -> Option<Timestamp> {
        self.timers.get(&key).copied()
    }

    /// Sets or clears a named timer.
    pub fn set_timer(&mut self, key: TimerKey, at: Option<Timestamp>) {
        match at {
            Some(at) => {
                self.timers.insert(key, at);
            }
            None => {
                self.timers.remove(&key);
            }
        }
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: MetaValue) {
        self.metadata.insert(key.into(), value);
    }

    pub fn metadata_number(&self, key: &str) -> Option<f64> {
        match self.metadata.get(key) {
            Some(MetaValue::Number(value)) => Some(*value),
            _ => None,
        }
    }

    /// Adds tags by set union; duplicates are dropped.
    pub fn add_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
    }

    /// Performs a state transition through the variant's own transition
    /// function, enforcing per-kind invariants at the entity boundary.
    pub fn set_state(&mut self, label: StateLabel) -> Result<(), TransitionError> {
        let kind = self.kind.label();
        match (&mut self.kind, label) {
            (EntityKind::Adventurer(adventurer), StateLabel::Adventurer(to)) => {
                adventurer.transition(to)
            }
            (EntityKind::Mission(mission), StateLabel::Mission(to)) => {
                mission.transition(to, &self.timers)
            }
            (EntityKind::Item(item), StateLabel::Item(to)) => item.transition(to),
            (EntityKind::ResourceSlot(slot), StateLabel::Slot(to)) => slot.transition(to),
            _ => Err(TransitionError::KindMismatch { kind }),
        }
    }

    // Typed accessors, teacher-style: callers resolve the variant they need
    // and get None on a kind mismatch.

    pub fn as_adventurer(&self) -> Option<&Adventurer> {
        match &self.kind {
            EntityKind::Adventurer(adventurer) => Some(adventurer),
            _ => None,
        }
    }

    pub fn as_adventurer_mut(&mut self) -> Option<&mut Adventurer> {
        match &mut self.kind {
            EntityKind::Adventurer(adventurer) => Some(adventurer),
            _ => None,
        }
    }

    pub fn as_mission(&self) -> Option<&Mission> {
        match &self.kind {
            EntityKind::Mission(mission) => Some(mission),
            _ => None,
        }
    }

    pub fn as_mission_mut(&mut self) -> Option<&mut Mission> {
        match &mut self.kind {
            EntityKind::Mission(mission) => Some(mission),
            _ => None,
        }
    }

    pub fn as_item(&self) -> Option<&Item> {
        match &self.kind {
            EntityKind::Item(item) => Some(item),
            _ => None,
        }
    }

    pub fn as_item_mut(&mut self) -> Option<&mut Item> {
        match &mut self.kind {
            EntityKind::Item(item) => Some(item),
            _ => None,
        }
    }

    pub fn as_facility(&self) -> Option<&Facility> {
        match &self.kind {
            EntityKind::Facility(facility) => Some(facility),
            _ => None,
        }
    }

    pub fn as_facility_mut(&mut self) -> Option<&mut Facility> {
        match &mut self.kind {
            EntityKind::Facility(facility) => Some(facility),
            _ => None,
        }
    }

    pub fn as_slot(&self) -> Option<&ResourceSlot> {
        match &self.kind {
            EntityKind::ResourceSlot(slot) => Some(slot),
            _ => None,
        }
    }

    pub fn as_slot_mut(&mut self) -> Option<&mut ResourceSlot> {
        match &mut self.kind {
            EntityKind::ResourceSlot(slot) => Some(slot),
            _ => None,
        }
    }
}
