//! Single-entity mutation effects: state, attributes, timers, metadata, tags.

use crate::state::{EntityMap, MetaValue, SlotAssignee, StateLabel, TimerKey};
use crate::value::{EntityId, RecipeId, ResourceBundle, Timestamp};

use super::EffectError;

/// Transitions an entity's state machine through the variant's own
/// transition function, so per-kind invariants hold at the entity boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetEntityStateEffect {
    pub id: EntityId,
    pub state: StateLabel,
}

impl SetEntityStateEffect {
    pub fn new(id: impl Into<EntityId>, state: StateLabel) -> Self {
        Self {
            id: id.into(),
            state,
        }
    }

    pub fn apply(
        &self,
        entities: &mut EntityMap,
        _resources: &mut ResourceBundle,
    ) -> Result<(), EffectError> {
        let entity = entities
            .get_mut(&self.id)
            .ok_or_else(|| EffectError::EntityNotFound(self.id.clone()))?;
        entity.set_state(self.state)?;
        Ok(())
    }
}

/// Closed set of writable attributes, one variant per semantic setter.
///
/// Replaces dotted-path string writes: each variant routes to the typed
/// field or method it names, and a write against the wrong entity kind is
/// an error instead of a silent miss.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttributeWrite {
    AdventurerXp(u64),
    AdventurerLevel(u8),
    /// Records (or clears) which adventurer a mission is assigned to.
    MissionAssignee(Option<EntityId>),
    ItemDurability(u32),
    /// Target tier. Routed through `Facility::upgrade()` once per level so
    /// per-level side effects run for every step, never a numeric jump.
    FacilityTier(u8),
    SlotBaseRate(f64),
    SlotAssignee(SlotAssignee),
    /// Appends a recipe to the facility's crafting queue.
    QueuePushRecipe(RecipeId),
    /// Drops the front of the facility's crafting queue.
    QueuePopFront,
    /// Sets or clears the facility's active crafting job.
    ActiveRecipe(Option<RecipeId>),
}

/// Writes a single typed attribute on an entity.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetEntityAttributeEffect {
    pub id: EntityId,
    pub write: AttributeWrite,
}

impl SetEntityAttributeEffect {
    pub fn new(id: impl Into<EntityId>, write: AttributeWrite) -> Self {
        Self {
            id: id.into(),
            write,
        }
    }

    pub fn apply(
        &self,
        entities: &mut EntityMap,
        _resources: &mut ResourceBundle,
    ) -> Result<(), EffectError> {
        let entity = entities
            .get_mut(&self.id)
            .ok_or_else(|| EffectError::EntityNotFound(self.id.clone()))?;
        let kind = entity.kind.label();
        let mismatch = || EffectError::KindMismatch {
            id: self.id.clone(),
            found: kind,
        };

        match &self.write {
            AttributeWrite::AdventurerXp(xp) => {
                entity.as_adventurer_mut().ok_or_else(mismatch)?.xp = *xp;
            }
            AttributeWrite::AdventurerLevel(level) => {
                entity.as_adventurer_mut().ok_or_else(mismatch)?.level = *level;
            }
            AttributeWrite::MissionAssignee(assignee) => {
                entity.as_mission_mut().ok_or_else(mismatch)?.assignee = assignee.clone();
            }
            AttributeWrite::ItemDurability(durability) => {
                let item = entity.as_item_mut().ok_or_else(mismatch)?;
                item.durability = (*durability).min(item.max_durability);
            }
            AttributeWrite::FacilityTier(target) => {
                let facility = entity.as_facility_mut().ok_or_else(mismatch)?;
                if *target < facility.tier {
                    return Err(EffectError::TierRegression {
                        current: facility.tier,
                        target: *target,
                    });
                }
                while facility.tier < *target {
                    facility.upgrade();
                }
            }
            AttributeWrite::SlotBaseRate(rate) => {
                entity.as_slot_mut().ok_or_else(mismatch)?.base_rate_per_minute = *rate;
            }
            AttributeWrite::SlotAssignee(assignee) => {
                entity.as_slot_mut().ok_or_else(mismatch)?.assignee = assignee.clone();
            }
            AttributeWrite::QueuePushRecipe(recipe) => {
                entity
                    .as_facility_mut()
                    .ok_or_else(mismatch)?
                    .queue
                    .push_back(recipe.clone());
            }
            AttributeWrite::QueuePopFront => {
                entity.as_facility_mut().ok_or_else(mismatch)?.queue.pop_front();
            }
            AttributeWrite::ActiveRecipe(recipe) => {
                entity.as_facility_mut().ok_or_else(mismatch)?.active_recipe = recipe.clone();
            }
        }
        Ok(())
    }
}

/// Stores or clears a named timer on an entity.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetTimerEffect {
    pub id: EntityId,
    pub key: TimerKey,
    /// `None` clears the key.
    pub at: Option<Timestamp>,
}

impl SetTimerEffect {
    pub fn set(id: impl Into<EntityId>, key: TimerKey, at: Timestamp) -> Self {
        Self {
            id: id.into(),
            key,
            at: Some(at),
        }
    }

    pub fn clear(id: impl Into<EntityId>, key: TimerKey) -> Self {
        Self {
            id: id.into(),
            key,
            at: None,
        }
    }

    pub fn apply(
        &self,
        entities: &mut EntityMap,
        _resources: &mut ResourceBundle,
    ) -> Result<(), EffectError> {
        let entity = entities
            .get_mut(&self.id)
            .ok_or_else(|| EffectError::EntityNotFound(self.id.clone()))?;
        entity.set_timer(self.key, self.at);
        Ok(())
    }
}

/// Writes a metadata field. Used for bookkeeping that must not affect
/// gameplay rules directly (slot accumulator remainders, display notes).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetEntityMetadataEffect {
    pub id: EntityId,
    pub key: String,
    pub value: MetaValue,
}

impl SetEntityMetadataEffect {
    pub fn new(id: impl Into<EntityId>, key: impl Into<String>, value: MetaValue) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
            value,
        }
    }

    pub fn apply(
        &self,
        entities: &mut EntityMap,
        _resources: &mut ResourceBundle,
    ) -> Result<(), EffectError> {
        let entity = entities
            .get_mut(&self.id)
            .ok_or_else(|| EffectError::EntityNotFound(self.id.clone()))?;
        entity.set_metadata(self.key.clone(), self.value.clone());
        Ok(())
    }
}

/// Adds tags to an entity by set union.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AddEntityTagsEffect {
    pub id: EntityId,
    pub tags: Vec<String>,
}

impl AddEntityTagsEffect {
    pub fn new<I, S>(id: impl Into<EntityId>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn apply(
        &self,
        entities: &mut EntityMap,
        _resources: &mut ResourceBundle,
    ) -> Result<(), EffectError> {
        let entity = entities
            .get_mut(&self.id)
            .ok_or_else(|| EffectError::EntityNotFound(self.id.clone()))?;
        entity.add_tags(self.tags.iter().cloned());
        Ok(())
    }
}
