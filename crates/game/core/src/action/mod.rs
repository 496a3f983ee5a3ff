//! Player verbs and the shared execution lifecycle.
//!
//! Every verb runs the same pipeline: build requirements, evaluate them
//! against a snapshot, plan effects, derive events, apply. A failed
//! requirement is a *denial* — an `Ok` outcome carrying a player-readable
//! reason, with no state touched. An error out of planning or application
//! is an invariant violation and surfaces as `Err`.
//!
//! Events are derived from the pre-apply snapshot plus the planned effects,
//! so a verb can report what it displaced or refunded without re-reading
//! state it just deleted.

mod crafting;
mod facility;
mod item;
mod mission;
mod slot;

pub use crafting::EnqueueCraft;
pub use facility::UpgradeFacility;
pub use item::{EquipItem, RepairItem, SalvageItem, UnequipItem};
pub use mission::{PostMissionOffer, ResolveMission, StartMission};
pub use slot::AssignSlotWorker;

use crate::effect::{Effect, EffectError, apply_effects};
use crate::env::{Env, OracleError};
use crate::event::DomainEvent;
use crate::requirement::{Requirement, Verdict};
use crate::state::{
    Adventurer, Entity, EntityMap, Facility, Item, KindLabel, Mission, ResourceSlot, Snapshot,
};
use crate::value::{ArchetypeId, EntityId, RecipeId, ResourceBundle, Timestamp};

/// Invariant violations raised while planning or applying a verb.
///
/// None of these are player-facing conditions; a verb that can be refused
/// for game reasons expresses that through its requirements instead.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Effect(#[from] EffectError),
    #[error(transparent)]
    Oracle(#[from] OracleError),
    #[error("entity {0} does not exist")]
    EntityNotFound(EntityId),
    #[error("entity {id} has kind {found}, expected {expected}")]
    WrongKind {
        id: EntityId,
        expected: KindLabel,
        found: KindLabel,
    },
    #[error("unknown recipe {0}")]
    UnknownRecipe(RecipeId),
    #[error("unknown mission archetype {0}")]
    UnknownArchetype(ArchetypeId),
    #[error("facility {facility} is already at max tier {tier}")]
    FacilityAtMaxTier { facility: EntityId, tier: u8 },
    #[error("mission {0} is in progress but has no assignee")]
    MissionUnassigned(EntityId),
    #[error("mission {0} is in progress but has no ends_at timer")]
    MissionNotTimed(EntityId),
}

/// What a verb execution produced.
#[derive(Clone, Debug, PartialEq)]
pub enum ActionOutcome {
    /// Requirements held; effects were applied and events emitted.
    Performed {
        effects: Vec<Effect>,
        events: Vec<DomainEvent>,
    },
    /// A requirement failed. Nothing was mutated; the reason is safe to
    /// show the player verbatim.
    Denied { reason: String },
}

impl ActionOutcome {
    pub fn is_performed(&self) -> bool {
        matches!(self, ActionOutcome::Performed { .. })
    }

    pub fn denial_reason(&self) -> Option<&str> {
        match self {
            ActionOutcome::Performed { .. } => None,
            ActionOutcome::Denied { reason } => Some(reason),
        }
    }

    /// Events emitted by a performed outcome, empty for a denial.
    pub fn events(&self) -> &[DomainEvent] {
        match self {
            ActionOutcome::Performed { events, .. } => events,
            ActionOutcome::Denied { .. } => &[],
        }
    }
}

/// A player verb: a pure planner that never mutates state itself.
///
/// `requirements` may read the snapshot to *build* the list (an upgrade
/// cost depends on the current tier), but the resulting requirements are
/// still evaluated against that same snapshot by the driver. `events`
/// receives the pre-apply snapshot and the planned effects; it must not
/// assume the effects have run.
pub trait GameAction {
    fn name(&self) -> &'static str;

    fn requirements(
        &self,
        snapshot: &Snapshot<'_>,
        env: &Env<'_>,
    ) -> Result<Vec<Requirement>, ActionError>;

    fn compute_effects(
        &self,
        snapshot: &Snapshot<'_>,
        env: &Env<'_>,
    ) -> Result<Vec<Effect>, ActionError>;

    fn events(
        &self,
        snapshot: &Snapshot<'_>,
        env: &Env<'_>,
        effects: &[Effect],
    ) -> Vec<DomainEvent>;
}

/// Runs one verb through the full lifecycle against mutable world pieces.
///
/// Requirement failures come back as [`ActionOutcome::Denied`] without
/// touching state. Effects apply in order; a failure partway through is an
/// invariant violation and leaves the world partially written — callers
/// that need atomicity run against a clone, as the idle loop does.
pub fn execute(
    action: &dyn GameAction,
    entities: &mut EntityMap,
    resources: &mut ResourceBundle,
    now: Timestamp,
    env: &Env<'_>,
) -> Result<ActionOutcome, ActionError> {
    let (effects, events) = {
        let snapshot = Snapshot::new(entities, resources, now);
        let requirements = action.requirements(&snapshot, env)?;
        for requirement in &requirements {
            if let Verdict::Unsatisfied(reason) = requirement.evaluate(&snapshot) {
                tracing::debug!(action = action.name(), %reason, "verb denied");
                return Ok(ActionOutcome::Denied { reason });
            }
        }
        let effects = action.compute_effects(&snapshot, env)?;
        let events = action.events(&snapshot, env, &effects);
        (effects, events)
    };
    apply_effects(&effects, entities, resources)?;
    tracing::debug!(
        action = action.name(),
        effects = effects.len(),
        events = events.len(),
        "verb performed"
    );
    Ok(ActionOutcome::Performed { effects, events })
}

// Snapshot read helpers shared by the verb planners. A miss here means a
// requirement failed to guard the read, hence the error tier.

pub(crate) fn require_entity<'a>(
    snapshot: &Snapshot<'a>,
    id: &EntityId,
) -> Result<&'a Entity, ActionError> {
    snapshot
        .entity(id)
        .ok_or_else(|| ActionError::EntityNotFound(id.clone()))
}

fn wrong_kind(entity: &Entity, expected: KindLabel) -> ActionError {
    ActionError::WrongKind {
        id: entity.id.clone(),
        expected,
        found: entity.kind.label(),
    }
}

pub(crate) fn require_adventurer<'a>(
    snapshot: &Snapshot<'a>,
    id: &EntityId,
) -> Result<&'a Adventurer, ActionError> {
    let entity = require_entity(snapshot, id)?;
    entity
        .as_adventurer()
        .ok_or_else(|| wrong_kind(entity, KindLabel::Adventurer))
}

pub(crate) fn require_mission<'a>(
    snapshot: &Snapshot<'a>,
    id: &EntityId,
) -> Result<&'a Mission, ActionError> {
    let entity = require_entity(snapshot, id)?;
    entity
        .as_mission()
        .ok_or_else(|| wrong_kind(entity, KindLabel::Mission))
}

pub(crate) fn require_item<'a>(
    snapshot: &Snapshot<'a>,
    id: &EntityId,
) -> Result<&'a Item, ActionError> {
    let entity = require_entity(snapshot, id)?;
    entity
        .as_item()
        .ok_or_else(|| wrong_kind(entity, KindLabel::Item))
}

pub(crate) fn require_facility<'a>(
    snapshot: &Snapshot<'a>,
    id: &EntityId,
) -> Result<&'a Facility, ActionError> {
    let entity = require_entity(snapshot, id)?;
    entity
        .as_facility()
        .ok_or_else(|| wrong_kind(entity, KindLabel::Facility))
}

pub(crate) fn require_slot<'a>(
    snapshot: &Snapshot<'a>,
    id: &EntityId,
) -> Result<&'a ResourceSlot, ActionError> {
    let entity = require_entity(snapshot, id)?;
    entity
        .as_slot()
        .ok_or_else(|| wrong_kind(entity, KindLabel::ResourceSlot))
}
