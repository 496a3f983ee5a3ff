//! Immutable value primitives every higher layer builds on.

mod id;
mod resource;
mod stats;
mod time;

pub use id::{ArchetypeId, EntityId, RecipeId};
pub use resource::{ResourceBundle, ResourceError, ResourceKind, ResourceUnit};
pub use stats::{AbilityKind, StatMap, ability_modifier};
pub use time::{Duration, Timestamp};
