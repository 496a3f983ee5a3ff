//! Opaque identifier newtypes.
//!
//! Entities cross-reference each other by id string only; references are
//! resolved at read time through the shared entity map. Content tables are
//! likewise addressed by opaque ids owned by the hosting layer.

use std::fmt;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }
    };
}

string_id! {
    /// Unique identifier of an entity in the world's entity map.
    EntityId
}

string_id! {
    /// Identifier of a crafting recipe in the static content tables.
    RecipeId
}

string_id! {
    /// Identifier of a mission archetype in the static content tables.
    ArchetypeId
}
