//! Armory verbs: equipping, repair, salvage.

use crate::effect::{
    Effect, EquipItemEffect, RepairItemEffect, SalvageItemEffect, UnequipItemEffect,
};
use crate::env::Env;
use crate::event::{DomainEvent, EventKind};
use crate::requirement::Requirement;
use crate::state::{EquipSlot, ItemState, KindLabel, Snapshot, StateLabel};
use crate::value::EntityId;

use super::{ActionError, GameAction, require_adventurer, require_item};

/// Equips an armory item onto an adventurer. The target slot comes from
/// the item itself; whatever occupied that slot is displaced back to the
/// armory by the same effect.
#[derive(Clone, Debug)]
pub struct EquipItem {
    pub adventurer: EntityId,
    pub item: EntityId,
}

impl GameAction for EquipItem {
    fn name(&self) -> &'static str {
        "equip_item"
    }

    fn requirements(
        &self,
        _snapshot: &Snapshot<'_>,
        _env: &Env<'_>,
    ) -> Result<Vec<Requirement>, ActionError> {
        Ok(vec![
            Requirement::entity_exists(self.adventurer.clone(), Some(KindLabel::Adventurer)),
            Requirement::entity_in_state(self.item.clone(), StateLabel::Item(ItemState::InArmory)),
        ])
    }

    fn compute_effects(
        &self,
        snapshot: &Snapshot<'_>,
        _env: &Env<'_>,
    ) -> Result<Vec<Effect>, ActionError> {
        let item = require_item(snapshot, &self.item)?;
        Ok(vec![
            EquipItemEffect {
                adventurer: self.adventurer.clone(),
                item: self.item.clone(),
                slot: item.slot,
            }
            .into(),
        ])
    }

    fn events(
        &self,
        snapshot: &Snapshot<'_>,
        _env: &Env<'_>,
        _effects: &[Effect],
    ) -> Vec<DomainEvent> {
        let mut events = Vec::new();
        // Report the displacement before the new fit.
        if let (Ok(item), Ok(adventurer)) = (
            require_item(snapshot, &self.item),
            require_adventurer(snapshot, &self.adventurer),
        ) && let Some(previous) = adventurer.equipment.get(item.slot)
        {
            events.push(DomainEvent::new(
                EventKind::ItemUnequipped {
                    adventurer: self.adventurer.clone(),
                    item: previous.clone(),
                },
                snapshot.now,
            ));
        }
        events.push(DomainEvent::new(
            EventKind::ItemEquipped {
                adventurer: self.adventurer.clone(),
                item: self.item.clone(),
            },
            snapshot.now,
        ));
        events
    }
}

/// Clears one of an adventurer's equipment slots.
#[derive(Clone, Debug)]
pub struct UnequipItem {
    pub adventurer: EntityId,
    pub slot: EquipSlot,
}

impl GameAction for UnequipItem {
    fn name(&self) -> &'static str {
        "unequip_item"
    }

    fn requirements(
        &self,
        _snapshot: &Snapshot<'_>,
        _env: &Env<'_>,
    ) -> Result<Vec<Requirement>, ActionError> {
        Ok(vec![Requirement::entity_exists(
            self.adventurer.clone(),
            Some(KindLabel::Adventurer),
        )])
    }

    fn compute_effects(
        &self,
        _snapshot: &Snapshot<'_>,
        _env: &Env<'_>,
    ) -> Result<Vec<Effect>, ActionError> {
        Ok(vec![
            UnequipItemEffect {
                adventurer: self.adventurer.clone(),
                slot: self.slot,
            }
            .into(),
        ])
    }

    fn events(
        &self,
        snapshot: &Snapshot<'_>,
        _env: &Env<'_>,
        _effects: &[Effect],
    ) -> Vec<DomainEvent> {
        let Ok(adventurer) = require_adventurer(snapshot, &self.adventurer) else {
            return Vec::new();
        };
        let Some(item) = adventurer.equipment.get(self.slot) else {
            return Vec::new();
        };
        vec![DomainEvent::new(
            EventKind::ItemUnequipped {
                adventurer: self.adventurer.clone(),
                item: item.clone(),
            },
            snapshot.now,
        )]
    }
}

/// Restores an item's durability to maximum.
#[derive(Clone, Debug)]
pub struct RepairItem {
    pub item: EntityId,
}

impl GameAction for RepairItem {
    fn name(&self) -> &'static str {
        "repair_item"
    }

    fn requirements(
        &self,
        _snapshot: &Snapshot<'_>,
        _env: &Env<'_>,
    ) -> Result<Vec<Requirement>, ActionError> {
        Ok(vec![Requirement::entity_exists(
            self.item.clone(),
            Some(KindLabel::Item),
        )])
    }

    fn compute_effects(
        &self,
        _snapshot: &Snapshot<'_>,
        _env: &Env<'_>,
    ) -> Result<Vec<Effect>, ActionError> {
        Ok(vec![
            RepairItemEffect {
                item: self.item.clone(),
            }
            .into(),
        ])
    }

    fn events(
        &self,
        snapshot: &Snapshot<'_>,
        _env: &Env<'_>,
        _effects: &[Effect],
    ) -> Vec<DomainEvent> {
        vec![DomainEvent::new(
            EventKind::ItemRepaired {
                item: self.item.clone(),
            },
            snapshot.now,
        )]
    }
}

/// Destroys an armory item and credits its salvage value.
#[derive(Clone, Debug)]
pub struct SalvageItem {
    pub item: EntityId,
}

impl GameAction for SalvageItem {
    fn name(&self) -> &'static str {
        "salvage_item"
    }

    fn requirements(
        &self,
        _snapshot: &Snapshot<'_>,
        _env: &Env<'_>,
    ) -> Result<Vec<Requirement>, ActionError> {
        Ok(vec![Requirement::entity_in_state(
            self.item.clone(),
            StateLabel::Item(ItemState::InArmory),
        )])
    }

    fn compute_effects(
        &self,
        _snapshot: &Snapshot<'_>,
        _env: &Env<'_>,
    ) -> Result<Vec<Effect>, ActionError> {
        Ok(vec![
            SalvageItemEffect {
                item: self.item.clone(),
            }
            .into(),
        ])
    }

    fn events(
        &self,
        snapshot: &Snapshot<'_>,
        _env: &Env<'_>,
        _effects: &[Effect],
    ) -> Vec<DomainEvent> {
        let Ok(item) = require_item(snapshot, &self.item) else {
            return Vec::new();
        };
        vec![DomainEvent::new(
            EventKind::ItemSalvaged {
                item: self.item.clone(),
                refund: item.salvage.clone(),
            },
            snapshot.now,
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionOutcome, execute};
    use crate::config::SimConfig;
    use crate::state::{
        Adventurer, AdventurerState, Entity, EntityKind, Item, RoleKind, WorldState,
    };
    use crate::value::{
        AbilityKind, ResourceBundle, ResourceKind, ResourceUnit, StatMap, Timestamp,
    };

    fn world() -> WorldState {
        let mut world = WorldState::new("p1", Timestamp::EPOCH);
        world.insert(Entity::new(
            EntityId::from("adv-1"),
            EntityKind::Adventurer(Adventurer::new(
                RoleKind::Warden,
                AbilityKind::Might,
                StatMap::new(),
            )),
        ));
        world.insert(Entity::new(
            EntityId::from("sword-1"),
            EntityKind::Item(Item::new(
                EquipSlot::Weapon,
                100,
                ResourceBundle::from_units([ResourceUnit::new(ResourceKind::Materials, 4)]),
            )),
        ));
        world.insert(Entity::new(
            EntityId::from("sword-2"),
            EntityKind::Item(Item::new(EquipSlot::Weapon, 80, ResourceBundle::new())),
        ));
        world
    }

    fn run(world: &mut WorldState, action: &dyn GameAction) -> ActionOutcome {
        let config = SimConfig::default();
        let env = Env::new(&config);
        execute(
            action,
            &mut world.entities,
            &mut world.resources,
            Timestamp::EPOCH,
            &env,
        )
        .unwrap()
    }

    #[test]
    fn equip_then_swap_reports_the_displacement() {
        let mut world = world();
        run(
            &mut world,
            &EquipItem {
                adventurer: EntityId::from("adv-1"),
                item: EntityId::from("sword-1"),
            },
        );

        let outcome = run(
            &mut world,
            &EquipItem {
                adventurer: EntityId::from("adv-1"),
                item: EntityId::from("sword-2"),
            },
        );
        let events = outcome.events();
        assert!(matches!(
            &events[0].kind,
            EventKind::ItemUnequipped { item, .. } if item.as_str() == "sword-1"
        ));
        assert!(matches!(
            &events[1].kind,
            EventKind::ItemEquipped { item, .. } if item.as_str() == "sword-2"
        ));

        let displaced = world.entities.get(&EntityId::from("sword-1")).unwrap();
        assert_eq!(displaced.as_item().unwrap().state, ItemState::InArmory);
    }

    #[test]
    fn equipping_an_equipped_item_is_denied() {
        let mut world = world();
        let action = EquipItem {
            adventurer: EntityId::from("adv-1"),
            item: EntityId::from("sword-1"),
        };
        run(&mut world, &action);
        let outcome = run(&mut world, &action);
        assert!(outcome.denial_reason().is_some());
    }

    #[test]
    fn unequip_returns_the_item_to_the_armory() {
        let mut world = world();
        run(
            &mut world,
            &EquipItem {
                adventurer: EntityId::from("adv-1"),
                item: EntityId::from("sword-1"),
            },
        );
        let outcome = run(
            &mut world,
            &UnequipItem {
                adventurer: EntityId::from("adv-1"),
                slot: EquipSlot::Weapon,
            },
        );
        assert!(matches!(
            &outcome.events()[0].kind,
            EventKind::ItemUnequipped { item, .. } if item.as_str() == "sword-1"
        ));
        let item = world.entities.get(&EntityId::from("sword-1")).unwrap();
        assert_eq!(item.as_item().unwrap().state, ItemState::InArmory);
        // Equipping never touched the adventurer's availability.
        let adventurer = world.entities.get(&EntityId::from("adv-1")).unwrap();
        assert_eq!(
            adventurer.as_adventurer().unwrap().state,
            AdventurerState::Idle
        );
    }

    #[test]
    fn unequip_empty_slot_is_an_invariant_error() {
        let mut world = world();
        let config = SimConfig::default();
        let env = Env::new(&config);
        let err = execute(
            &UnequipItem {
                adventurer: EntityId::from("adv-1"),
                slot: EquipSlot::Armor,
            },
            &mut world.entities,
            &mut world.resources,
            Timestamp::EPOCH,
            &env,
        )
        .unwrap_err();
        assert!(matches!(err, ActionError::Effect(_)));
    }

    #[test]
    fn repair_restores_full_durability() {
        let mut world = world();
        world
            .entities
            .get_mut(&EntityId::from("sword-1"))
            .unwrap()
            .as_item_mut()
            .unwrap()
            .durability = 12;
        run(
            &mut world,
            &RepairItem {
                item: EntityId::from("sword-1"),
            },
        );
        let item = world.entities.get(&EntityId::from("sword-1")).unwrap();
        assert_eq!(item.as_item().unwrap().durability, 100);
    }

    #[test]
    fn salvage_credits_refund_and_reports_it() {
        let mut world = world();
        let outcome = run(
            &mut world,
            &SalvageItem {
                item: EntityId::from("sword-1"),
            },
        );
        assert!(!world.entities.contains_key(&EntityId::from("sword-1")));
        assert_eq!(world.resources.amount(ResourceKind::Materials), 4);
        assert!(matches!(
            &outcome.events()[0].kind,
            EventKind::ItemSalvaged { refund, .. }
                if refund.amount(ResourceKind::Materials) == 4
        ));
    }

    #[test]
    fn salvaging_an_equipped_item_is_denied() {
        let mut world = world();
        run(
            &mut world,
            &EquipItem {
                adventurer: EntityId::from("adv-1"),
                item: EntityId::from("sword-1"),
            },
        );
        let outcome = run(
            &mut world,
            &SalvageItem {
                item: EntityId::from("sword-1"),
            },
        );
        assert!(outcome.denial_reason().is_some());
        assert!(world.entities.contains_key(&EntityId::from("sword-1")));
    }
}
