//! Mutation primitives: the only sanctioned way to change entities and
//! resources.
//!
//! Effects follow the enum + struct hybrid: each effect kind is a struct
//! with an `apply` method, and [`Effect`] wraps them for dispatch and
//! serialization. An effect is a data object capturing exactly the
//! arguments of one mutation, not a closure — actions emit them, the caller
//! applies them.
//!
//! [`apply_effects`] folds left to right, so effect order is significant
//! and must match emission order: timers are set before the state
//! transition that requires them.
//!
//! Any effect referencing a missing entity id is an error. Actions
//! guarantee existence through requirements before effects run, so a miss
//! here is a requirement/effect ordering bug, not a player-facing
//! condition.

mod entity;
mod item;
mod resource;
mod spawn;

pub use entity::{
    AddEntityTagsEffect, AttributeWrite, SetEntityAttributeEffect, SetEntityMetadataEffect,
    SetEntityStateEffect, SetTimerEffect,
};
pub use item::{EquipItemEffect, RepairItemEffect, SalvageItemEffect, UnequipItemEffect};
pub use resource::{ModifyResourceEffect, ResourceOp};
pub use spawn::SpawnEntityEffect;

use crate::state::{EntityMap, EquipSlot, KindLabel, TransitionError};
use crate::value::{EntityId, ResourceBundle, ResourceError};

/// Invariant violations raised during effect application.
///
/// These are programmer errors (a requirement should have guarded the
/// path), not player-facing outcomes; the action driver propagates them and
/// the idle loop downgrades them to collected error strings.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EffectError {
    #[error("entity {0} does not exist")]
    EntityNotFound(EntityId),
    #[error("entity {0} already exists")]
    DuplicateEntity(EntityId),
    #[error("entity {id} has kind {found}, which this effect cannot target")]
    KindMismatch { id: EntityId, found: KindLabel },
    #[error("item {item} does not fit the {slot} slot")]
    SlotMismatch { item: EntityId, slot: EquipSlot },
    #[error("adventurer {adventurer} has nothing equipped in the {slot} slot")]
    NothingEquipped {
        adventurer: EntityId,
        slot: EquipSlot,
    },
    #[error("facility tier cannot go backwards from {current} to {target}")]
    TierRegression { current: u8, target: u8 },
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// A single state or resource mutation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Effect {
    ModifyResource(ModifyResourceEffect),
    SetEntityState(SetEntityStateEffect),
    SetEntityAttribute(SetEntityAttributeEffect),
    SetTimer(SetTimerEffect),
    SetEntityMetadata(SetEntityMetadataEffect),
    AddEntityTags(AddEntityTagsEffect),
    EquipItem(EquipItemEffect),
    UnequipItem(UnequipItemEffect),
    RepairItem(RepairItemEffect),
    SalvageItem(SalvageItemEffect),
    SpawnEntity(SpawnEntityEffect),
}

impl Effect {
    /// Executes the mutation against the supplied map and bundle.
    pub fn apply(
        &self,
        entities: &mut EntityMap,
        resources: &mut ResourceBundle,
    ) -> Result<(), EffectError> {
        match self {
            Effect::ModifyResource(effect) => effect.apply(entities, resources),
            Effect::SetEntityState(effect) => effect.apply(entities, resources),
            Effect::SetEntityAttribute(effect) => effect.apply(entities, resources),
            Effect::SetTimer(effect) => effect.apply(entities, resources),
            Effect::SetEntityMetadata(effect) => effect.apply(entities, resources),
            Effect::AddEntityTags(effect) => effect.apply(entities, resources),
            Effect::EquipItem(effect) => effect.apply(entities, resources),
            Effect::UnequipItem(effect) => effect.apply(entities, resources),
            Effect::RepairItem(effect) => effect.apply(entities, resources),
            Effect::SalvageItem(effect) => effect.apply(entities, resources),
            Effect::SpawnEntity(effect) => effect.apply(entities, resources),
        }
    }
}

macro_rules! effect_from {
    ($variant:ident, $ty:ty) => {
        impl From<$ty> for Effect {
            fn from(effect: $ty) -> Self {
                Effect::$variant(effect)
            }
        }
    };
}

effect_from!(ModifyResource, ModifyResourceEffect);
effect_from!(SetEntityState, SetEntityStateEffect);
effect_from!(SetEntityAttribute, SetEntityAttributeEffect);
effect_from!(SetTimer, SetTimerEffect);
effect_from!(SetEntityMetadata, SetEntityMetadataEffect);
effect_from!(AddEntityTags, AddEntityTagsEffect);
effect_from!(EquipItem, EquipItemEffect);
effect_from!(UnequipItem, UnequipItemEffect);
effect_from!(RepairItem, RepairItemEffect);
effect_from!(SalvageItem, SalvageItemEffect);
effect_from!(SpawnEntity, SpawnEntityEffect);

/// Applies effects left to right, stopping at the first failure.
pub fn apply_effects(
    effects: &[Effect],
    entities: &mut EntityMap,
    resources: &mut ResourceBundle,
) -> Result<(), EffectError> {
    for effect in effects {
        effect.apply(entities, resources)?;
    }
    Ok(())
}
