//! Composite item effects that touch a second entity.

use crate::state::{EntityMap, EquipSlot, ItemState, StateLabel};
use crate::value::{EntityId, ResourceBundle};

use super::EffectError;

fn require_adventurer<'a>(
    entities: &'a mut EntityMap,
    id: &EntityId,
) -> Result<&'a mut crate::state::Adventurer, EffectError> {
    let entity = entities
        .get_mut(id)
        .ok_or_else(|| EffectError::EntityNotFound(id.clone()))?;
    let kind = entity.kind.label();
    entity
        .as_adventurer_mut()
        .ok_or(EffectError::KindMismatch {
            id: id.clone(),
            found: kind,
        })
}

/// Equips an item into an adventurer's slot.
///
/// Whatever previously occupied the slot is unequipped first (back to the
/// armory), then the new item transitions to `Equipped` and the slot is
/// rewritten — one effect, so callers cannot observe a half-swapped state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipItemEffect {
    pub adventurer: EntityId,
    pub item: EntityId,
    pub slot: EquipSlot,
}

impl EquipItemEffect {
    pub fn apply(
        &self,
        entities: &mut EntityMap,
        _resources: &mut ResourceBundle,
    ) -> Result<(), EffectError> {
        // Validate the item before touching anything.
        {
            let entity = entities
                .get(&self.item)
                .ok_or_else(|| EffectError::EntityNotFound(self.item.clone()))?;
            let item = entity.as_item().ok_or(EffectError::KindMismatch {
                id: self.item.clone(),
                found: entity.kind.label(),
            })?;
            if item.slot != self.slot {
                return Err(EffectError::SlotMismatch {
                    item: self.item.clone(),
                    slot: self.slot,
                });
            }
        }

        let previous = require_adventurer(entities, &self.adventurer)?
            .equipment
            .get(self.slot)
            .cloned();

        if let Some(previous) = previous {
            let entity = entities
                .get_mut(&previous)
                .ok_or(EffectError::EntityNotFound(previous))?;
            entity.set_state(StateLabel::Item(ItemState::InArmory))?;
        }

        entities
            .get_mut(&self.item)
            .ok_or_else(|| EffectError::EntityNotFound(self.item.clone()))?
            .set_state(StateLabel::Item(ItemState::Equipped))?;

        require_adventurer(entities, &self.adventurer)?
            .equipment
            .equip(self.slot, self.item.clone());
        Ok(())
    }
}

/// Clears an adventurer's slot; the occupant returns to the armory.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnequipItemEffect {
    pub adventurer: EntityId,
    pub slot: EquipSlot,
}

impl UnequipItemEffect {
    pub fn apply(
        &self,
        entities: &mut EntityMap,
        _resources: &mut ResourceBundle,
    ) -> Result<(), EffectError> {
        let occupant = require_adventurer(entities, &self.adventurer)?
            .equipment
            .unequip(self.slot)
            .ok_or(EffectError::NothingEquipped {
                adventurer: self.adventurer.clone(),
                slot: self.slot,
            })?;

        let entity = entities
            .get_mut(&occupant)
            .ok_or(EffectError::EntityNotFound(occupant))?;
        entity.set_state(StateLabel::Item(ItemState::InArmory))?;
        Ok(())
    }
}

/// Restores an item's durability to maximum.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RepairItemEffect {
    pub item: EntityId,
}

impl RepairItemEffect {
    pub fn apply(
        &self,
        entities: &mut EntityMap,
        _resources: &mut ResourceBundle,
    ) -> Result<(), EffectError> {
        let entity = entities
            .get_mut(&self.item)
            .ok_or_else(|| EffectError::EntityNotFound(self.item.clone()))?;
        let kind = entity.kind.label();
        entity
            .as_item_mut()
            .ok_or(EffectError::KindMismatch {
                id: self.item.clone(),
                found: kind,
            })?
            .repair();
        Ok(())
    }
}

/// Deletes an item and credits its salvage value in the same step.
///
/// Only armory items can be salvaged; the transition check rejects an item
/// that is still equipped or already gone.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SalvageItemEffect {
    pub item: EntityId,
}

impl SalvageItemEffect {
    pub fn apply(
        &self,
        entities: &mut EntityMap,
        resources: &mut ResourceBundle,
    ) -> Result<(), EffectError> {
        let entity = entities
            .get_mut(&self.item)
            .ok_or_else(|| EffectError::EntityNotFound(self.item.clone()))?;
        // Runs the legality check; the entity is removed right after, so the
        // terminal state is never observable.
        entity.set_state(StateLabel::Item(ItemState::Salvaged))?;
        let refund = entity
            .as_item()
            .map(|item| item.salvage.clone())
            .unwrap_or_default();

        entities.remove(&self.item);
        *resources = resources.add_all(&refund);
        Ok(())
    }
}
