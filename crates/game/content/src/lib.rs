//! Static content tables and loaders.
//!
//! This crate provides the oracle implementations `guild-core` consumes:
//! mission archetypes, crafting recipes, and facility tier progressions.
//! Content is read-only for the lifetime of a session and never appears in
//! game state.
//!
//! Tables come either built in ([`ContentTables::builtin`]) or from RON
//! data files via the loaders, which deserialize directly into guild-core
//! types.

pub mod tables;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use tables::{ContentTables, FacilityProgression};

#[cfg(feature = "loaders")]
pub use loaders::{LoadResult, TablesLoader};
