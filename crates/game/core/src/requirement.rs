//! Pure boolean predicates over a world snapshot.
//!
//! Requirements are data, not closures: a closed enum evaluated against a
//! [`Snapshot`]. Evaluation reads nothing but the snapshot and writes
//! nothing, so the same snapshot always yields the same verdict — actions
//! can safely re-validate after previewing any single effect.

use crate::state::{KindLabel, Snapshot, StateLabel, TimerKey};
use crate::value::{EntityId, ResourceKind};

/// Outcome of evaluating a requirement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Satisfied,
    /// Human-readable reason, surfaced verbatim to the player by callers.
    Unsatisfied(String),
}

impl Verdict {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Verdict::Satisfied)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Verdict::Satisfied => None,
            Verdict::Unsatisfied(reason) => Some(reason),
        }
    }
}

/// Composable precondition for a game verb.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Requirement {
    /// The entity exists, optionally checked against a kind.
    EntityExists {
        id: EntityId,
        kind: Option<KindLabel>,
    },
    /// The entity exists and its state machine is in the given state.
    EntityInState { id: EntityId, state: StateLabel },
    /// The shared pool holds at least `amount` of `kind`.
    ResourceAtLeast { kind: ResourceKind, amount: u64 },
    /// The entity carries the named timer and it is at or before `now`.
    TimerDue { id: EntityId, key: TimerKey },
    /// All sub-requirements hold. Short-circuits on the first failure and
    /// surfaces its reason.
    AllOf(Vec<Requirement>),
    /// At least one sub-requirement holds. Succeeds on the first pass; on
    /// total failure concatenates every sub-reason into one diagnostic.
    AnyOf(Vec<Requirement>),
}

impl Requirement {
    pub fn entity_exists(id: impl Into<EntityId>, kind: Option<KindLabel>) -> Self {
        Requirement::EntityExists {
            id: id.into(),
            kind,
        }
    }

    pub fn entity_in_state(id: impl Into<EntityId>, state: StateLabel) -> Self {
        Requirement::EntityInState {
            id: id.into(),
            state,
        }
    }

    pub fn resource_at_least(kind: ResourceKind, amount: u64) -> Self {
        Requirement::ResourceAtLeast { kind, amount }
    }

    pub fn timer_due(id: impl Into<EntityId>, key: TimerKey) -> Self {
        Requirement::TimerDue { id: id.into(), key }
    }

    pub fn all_of(requirements: impl IntoIterator<Item = Requirement>) -> Self {
        Requirement::AllOf(requirements.into_iter().collect())
    }

    pub fn any_of(requirements: impl IntoIterator<Item = Requirement>) -> Self {
        Requirement::AnyOf(requirements.into_iter().collect())
    }

    /// Evaluates the requirement against a snapshot.
    pub fn evaluate(&self, snapshot: &Snapshot<'_>) -> Verdict {
        match self {
            Requirement::EntityExists { id, kind } => match snapshot.entity(id) {
                None => Verdict::Unsatisfied(format!("entity {id} does not exist")),
                Some(entity) => match kind {
                    Some(expected) if entity.kind.label() != *expected => Verdict::Unsatisfied(
                        format!("entity {id} is not a {expected}"),
                    ),
                    _ => Verdict::Satisfied,
                },
            },
            Requirement::EntityInState { id, state } => match snapshot.entity(id) {
                None => Verdict::Unsatisfied(format!("entity {id} does not exist")),
                Some(entity) => {
                    if entity_state_matches(entity, *state) {
                        Verdict::Satisfied
                    } else {
                        Verdict::Unsatisfied(format!(
                            "entity {id} is not in the required state"
                        ))
                    }
                }
            },
            Requirement::ResourceAtLeast { kind, amount } => {
                let available = snapshot.resources.amount(*kind);
                if available >= *amount {
                    Verdict::Satisfied
                } else {
                    Verdict::Unsatisfied(format!(
                        "needs {amount} {kind}, have {available}"
                    ))
                }
            }
            Requirement::TimerDue { id, key } => match snapshot.entity(id) {
                None => Verdict::Unsatisfied(format!("entity {id} does not exist")),
                Some(entity) => match entity.timer(*key) {
                    Some(at) if at <= snapshot.now => Verdict::Satisfied,
                    Some(_) => Verdict::Unsatisfied(format!("entity {id} is not due yet")),
                    None => Verdict::Unsatisfied(format!("entity {id} has no {key} timer")),
                },
            },
            Requirement::AllOf(requirements) => {
                for requirement in requirements {
                    if let Verdict::Unsatisfied(reason) = requirement.evaluate(snapshot) {
                        return Verdict::Unsatisfied(reason);
                    }
                }
                Verdict::Satisfied
            }
            Requirement::AnyOf(requirements) => {
                let mut reasons = Vec::new();
                for requirement in requirements {
                    match requirement.evaluate(snapshot) {
                        Verdict::Satisfied => return Verdict::Satisfied,
                        Verdict::Unsatisfied(reason) => reasons.push(reason),
                    }
                }
                Verdict::Unsatisfied(reasons.join("; "))
            }
        }
    }
}

fn entity_state_matches(entity: &crate::state::Entity, state: StateLabel) -> bool {
    use crate::state::EntityKind;

    match (&entity.kind, state) {
        (EntityKind::Adventurer(adventurer), StateLabel::Adventurer(expected)) => {
            adventurer.state == expected
        }
        (EntityKind::Mission(mission), StateLabel::Mission(expected)) => mission.state == expected,
        (EntityKind::Item(item), StateLabel::Item(expected)) => item.state == expected,
        (EntityKind::ResourceSlot(slot), StateLabel::Slot(expected)) => slot.state == expected,
        _ => false,
    }
}
