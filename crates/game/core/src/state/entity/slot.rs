//! Resource generation slot entities.

use crate::value::{EntityId, ResourceKind};

use super::TransitionError;

/// Slot availability state machine: `Active <-> Disabled`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SlotState {
    Active,
    Disabled,
}

/// Who is working a resource slot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SlotAssignee {
    #[default]
    None,
    Player,
    Adventurer(EntityId),
}

/// Attribute payload of a resource slot entity.
///
/// The fractional accumulator is deliberately NOT an attribute: it is
/// bookkeeping, not game-visible state, and lives in the entity's metadata
/// under [`ResourceSlot::ACCRUAL_REMAINDER_KEY`]. The last generation
/// instant lives in the `LastTickAt` timer.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceSlot {
    pub resource: ResourceKind,
    pub base_rate_per_minute: f64,
    pub assignee: SlotAssignee,
    /// Facility whose tier multiplies the generation rate, if any.
    pub facility: Option<EntityId>,
    pub state: SlotState,
}

impl ResourceSlot {
    /// Metadata key holding the fractional units carried between ticks.
    pub const ACCRUAL_REMAINDER_KEY: &'static str = "accrual_remainder";

    pub fn new(resource: ResourceKind, base_rate_per_minute: f64) -> Self {
        Self {
            resource,
            base_rate_per_minute,
            assignee: SlotAssignee::None,
            facility: None,
            state: SlotState::Active,
        }
    }

    pub fn with_facility(mut self, facility: EntityId) -> Self {
        self.facility = Some(facility);
        self
    }

    pub(super) fn transition(&mut self, to: SlotState) -> Result<(), TransitionError> {
        let legal = matches!(
            (self.state, to),
            (SlotState::Active, SlotState::Disabled) | (SlotState::Disabled, SlotState::Active)
        );
        if !legal {
            return Err(TransitionError::illegal("resource_slot", self.state, to));
        }
        self.state = to;
        Ok(())
    }
}
