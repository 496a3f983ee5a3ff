//! Adventurer entities and their equipment.

use crate::value::{AbilityKind, EntityId, StatMap};

use super::TransitionError;

/// Guild roles missions can prefer. A matching role grants a synergy bonus
/// on resolution.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum RoleKind {
    Warden,
    Scout,
    Arcanist,
    Chaplain,
}

/// Adventurer availability state machine: `Idle <-> OnMission`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AdventurerState {
    Idle,
    OnMission,
}

/// Equipment slots an adventurer exposes.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EquipSlot {
    Weapon,
    Armor,
}

/// What an adventurer currently has equipped, by item entity id.
///
/// Slots hold ids, never item data: the item entity in the shared map stays
/// the single source of truth for durability and state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equipment {
    weapon: Option<EntityId>,
    armor: Option<EntityId>,
}

impl Equipment {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: EquipSlot) -> Option<&EntityId> {
        match slot {
            EquipSlot::Weapon => self.weapon.as_ref(),
            EquipSlot::Armor => self.armor.as_ref(),
        }
    }

    /// Equips an item into `slot`, returning the previous occupant if any.
    pub fn equip(&mut self, slot: EquipSlot, item: EntityId) -> Option<EntityId> {
        match slot {
            EquipSlot::Weapon => self.weapon.replace(item),
            EquipSlot::Armor => self.armor.replace(item),
        }
    }

    /// Clears `slot`, returning the occupant if any was equipped.
    pub fn unequip(&mut self, slot: EquipSlot) -> Option<EntityId> {
        match slot {
            EquipSlot::Weapon => self.weapon.take(),
            EquipSlot::Armor => self.armor.take(),
        }
    }
}

/// Attribute payload of an adventurer entity.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Adventurer {
    pub role: RoleKind,
    pub abilities: StatMap,
    /// Ability whose modifier is added to mission resolution rolls.
    pub primary_ability: AbilityKind,
    pub xp: u64,
    pub level: u8,
    pub equipment: Equipment,
    pub state: AdventurerState,
}

impl Adventurer {
    pub fn new(role: RoleKind, primary_ability: AbilityKind, abilities: StatMap) -> Self {
        Self {
            role,
            abilities,
            primary_ability,
            xp: 0,
            level: 1,
            equipment: Equipment::empty(),
            state: AdventurerState::Idle,
        }
    }

    /// Modifier added to this adventurer's mission rolls.
    pub fn primary_modifier(&self) -> i32 {
        self.abilities.modifier(self.primary_ability)
    }

    pub(super) fn transition(&mut self, to: AdventurerState) -> Result<(), TransitionError> {
        let legal = matches!(
            (self.state, to),
            (AdventurerState::Idle, AdventurerState::OnMission)
                | (AdventurerState::OnMission, AdventurerState::Idle)
        );
        if !legal {
            return Err(TransitionError::illegal("adventurer", self.state, to));
        }
        self.state = to;
        Ok(())
    }
}
