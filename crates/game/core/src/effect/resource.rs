//! Resource pool mutation effects.

use crate::state::EntityMap;
use crate::value::{ResourceBundle, ResourceUnit};

use super::EffectError;

/// Direction of a resource delta.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ResourceOp {
    Add,
    Subtract,
}

/// Delta-applies a list of resource units to the shared pool.
///
/// A subtract that would drive any amount negative fails loudly and leaves
/// the pool untouched; silent clamping would hide a missing
/// `ResourceAtLeast` requirement upstream.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModifyResourceEffect {
    pub units: Vec<ResourceUnit>,
    pub op: ResourceOp,
}

impl ModifyResourceEffect {
    pub fn add(units: impl IntoIterator<Item = ResourceUnit>) -> Self {
        Self {
            units: units.into_iter().collect(),
            op: ResourceOp::Add,
        }
    }

    pub fn subtract(units: impl IntoIterator<Item = ResourceUnit>) -> Self {
        Self {
            units: units.into_iter().collect(),
            op: ResourceOp::Subtract,
        }
    }

    pub fn apply(
        &self,
        _entities: &mut EntityMap,
        resources: &mut ResourceBundle,
    ) -> Result<(), EffectError> {
        let mut next = resources.clone();
        for unit in &self.units {
            next = match self.op {
                ResourceOp::Add => next.add(*unit),
                ResourceOp::Subtract => next.subtract(*unit)?,
            };
        }
        *resources = next;
        Ok(())
    }
}
