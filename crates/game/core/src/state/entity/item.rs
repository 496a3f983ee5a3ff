//! Item entities.

use crate::value::ResourceBundle;

use super::adventurer::EquipSlot;
use super::TransitionError;

/// Item lifecycle state machine.
///
/// `InArmory <-> Equipped`; `Salvaged` is terminal and only reachable from
/// the armory (equipped items must be unequipped first).
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ItemState {
    InArmory,
    Equipped,
    Salvaged,
}

/// Attribute payload of an item entity.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub slot: EquipSlot,
    pub durability: u32,
    pub max_durability: u32,
    /// Resources credited when the item is salvaged.
    pub salvage: ResourceBundle,
    pub state: ItemState,
}

impl Item {
    pub fn new(slot: EquipSlot, max_durability: u32, salvage: ResourceBundle) -> Self {
        Self {
            slot,
            durability: max_durability,
            max_durability,
            salvage,
            state: ItemState::InArmory,
        }
    }

    /// Restores durability to maximum.
    pub fn repair(&mut self) {
        self.durability = self.max_durability;
    }

    pub(super) fn transition(&mut self, to: ItemState) -> Result<(), TransitionError> {
        let legal = matches!(
            (self.state, to),
            (ItemState::InArmory, ItemState::Equipped)
                | (ItemState::Equipped, ItemState::InArmory)
                | (ItemState::InArmory, ItemState::Salvaged)
        );
        if !legal {
            return Err(TransitionError::illegal("item", self.state, to));
        }
        self.state = to;
        Ok(())
    }
}
