//! Read-only environment the simulation runs against.
//!
//! The [`Env`] aggregate bundles the content oracles, the RNG oracle, and
//! the balance config so actions and the idle loop can reach everything
//! they need without hard coupling to concrete implementations. Oracles are
//! optional; asking for a missing one is an [`OracleError`], which actions
//! surface as invariant errors.

mod rng;
mod tables;

pub use rng::{FixedRng, PcgRng, RngOracle, compute_seed, hash_id};
pub use tables::{ArchetypeOracle, FacilityOracle, MissionArchetype, Recipe, RecipeOracle};

use crate::config::SimConfig;

/// Errors raised when a required oracle was not provided.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("archetype oracle not available")]
    ArchetypesNotAvailable,
    #[error("recipe oracle not available")]
    RecipesNotAvailable,
    #[error("facility oracle not available")]
    FacilitiesNotAvailable,
    #[error("rng oracle not available")]
    RngNotAvailable,
}

/// Aggregates the read-only collaborators for one simulation call.
#[derive(Clone, Copy)]
pub struct Env<'a> {
    archetypes: Option<&'a dyn ArchetypeOracle>,
    recipes: Option<&'a dyn RecipeOracle>,
    facilities: Option<&'a dyn FacilityOracle>,
    rng: Option<&'a dyn RngOracle>,
    config: &'a SimConfig,
}

impl<'a> Env<'a> {
    /// Environment with no oracles and the given config. Verbs that need an
    /// absent oracle fail with an [`OracleError`].
    pub fn new(config: &'a SimConfig) -> Self {
        Self {
            archetypes: None,
            recipes: None,
            facilities: None,
            rng: None,
            config,
        }
    }

    pub fn with_archetypes(mut self, archetypes: &'a dyn ArchetypeOracle) -> Self {
        self.archetypes = Some(archetypes);
        self
    }

    pub fn with_recipes(mut self, recipes: &'a dyn RecipeOracle) -> Self {
        self.recipes = Some(recipes);
        self
    }

    pub fn with_facilities(mut self, facilities: &'a dyn FacilityOracle) -> Self {
        self.facilities = Some(facilities);
        self
    }

    pub fn with_rng(mut self, rng: &'a dyn RngOracle) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn config(&self) -> &SimConfig {
        self.config
    }

    pub fn archetypes(&self) -> Result<&'a dyn ArchetypeOracle, OracleError> {
        self.archetypes.ok_or(OracleError::ArchetypesNotAvailable)
    }

    pub fn recipes(&self) -> Result<&'a dyn RecipeOracle, OracleError> {
        self.recipes.ok_or(OracleError::RecipesNotAvailable)
    }

    pub fn facilities(&self) -> Result<&'a dyn FacilityOracle, OracleError> {
        self.facilities.ok_or(OracleError::FacilitiesNotAvailable)
    }

    pub fn rng(&self) -> Result<&'a dyn RngOracle, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }
}
