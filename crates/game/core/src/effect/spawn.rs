//! Entity creation effect.

use crate::state::{Entity, EntityMap};
use crate::value::ResourceBundle;

use super::EffectError;

/// Inserts a freshly constructed entity into the shared map.
///
/// Covers every creation verb (items from crafting, mission offers from
/// archetypes, facilities, resource slots). Reusing an id is an error: ids
/// are never recycled.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnEntityEffect {
    pub entity: Entity,
}

impl SpawnEntityEffect {
    pub fn new(entity: Entity) -> Self {
        Self { entity }
    }

    pub fn apply(
        &self,
        entities: &mut EntityMap,
        _resources: &mut ResourceBundle,
    ) -> Result<(), EffectError> {
        if entities.contains_key(&self.entity.id) {
            return Err(EffectError::DuplicateEntity(self.entity.id.clone()));
        }
        entities.insert(self.entity.id.clone(), self.entity.clone());
        Ok(())
    }
}
