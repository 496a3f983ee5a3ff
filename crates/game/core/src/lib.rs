//! Deterministic simulation core for an idle guild-management RPG.
//!
//! `guild-core` owns the canonical rules: entities and their state
//! machines, requirements, effects, player verbs, and the offline
//! progression loop. Everything is a pure function of `(state, now, env)`
//! — the crate never reads a clock, never draws ambient randomness, and
//! mutates state only through [`effect::Effect`] application. Hosting
//! layers own persistence, scheduling, and the event sink.
pub mod action;
pub mod config;
pub mod effect;
pub mod env;
pub mod event;
pub mod idle;
pub mod requirement;
pub mod rules;
pub mod state;
pub mod value;

pub use action::{
    ActionError, ActionOutcome, AssignSlotWorker, EnqueueCraft, EquipItem, GameAction,
    PostMissionOffer, RepairItem, ResolveMission, SalvageItem, StartMission, UnequipItem,
    UpgradeFacility, execute,
};
pub use config::{AutoSelectDoctrine, SimConfig};
pub use effect::{Effect, EffectError, apply_effects};
pub use env::{
    ArchetypeOracle, Env, FacilityOracle, FixedRng, MissionArchetype, OracleError, PcgRng, Recipe,
    RecipeOracle, RngOracle,
};
pub use event::{DomainEvent, EventKind};
pub use idle::{IdleError, IdleOutcome, process_idle_progression};
pub use requirement::{Requirement, Verdict};
pub use rules::OutcomeBand;
pub use state::{
    Adventurer, AdventurerState, Entity, EntityKind, EntityMap, EquipSlot, Equipment, Facility,
    FacilityKind, Item, ItemState, KindLabel, MetaValue, Mission, MissionState, ResourceSlot,
    RoleKind, SlotAssignee, SlotState, Snapshot, StateLabel, TimerKey, TransitionError, WorldState,
};
pub use value::{
    AbilityKind, ArchetypeId, Duration, EntityId, RecipeId, ResourceBundle, ResourceError,
    ResourceKind, ResourceUnit, StatMap, Timestamp,
};
