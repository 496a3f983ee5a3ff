//! Mission phase of the idle loop: expiry, resolution, auto-selection.
//!
//! The three steps interleave chronologically. Offers lapse at their
//! `ExpiresAt` instant, runs resolve at their `EndsAt` instant, and a
//! freed adventurer is re-dispatched *at the instant the resolution freed
//! them* — a follow-on run started mid-window carries the timers a
//! tick-by-tick simulation would have stamped, and resolves in the same
//! pass when it too comes due before `now`.

use std::collections::BTreeSet;

use crate::action::{ActionOutcome, ResolveMission, StartMission, execute};
use crate::config::AutoSelectDoctrine;
use crate::effect::{Effect, SetEntityStateEffect, apply_effects};
use crate::env::Env;
use crate::event::{DomainEvent, EventKind};
use crate::rules;
use crate::state::{
    AdventurerState, MissionState, StateLabel, TimerKey, WorldState,
};
use crate::value::{EntityId, Timestamp};

use super::Progress;

/// Runs the whole mission phase up to `now`.
///
/// Adventurers already idle at phase entry dispatch at `pass_start` (the
/// previous pass ended there, so that is the first instant this pass can
/// vouch for). Adventurers freed by a resolution dispatch at the freeing
/// `EndsAt`. Either way a long catch-up stamps the same timers as many
/// short ones.
pub(super) fn advance(
    world: &mut WorldState,
    pass_start: Timestamp,
    now: Timestamp,
    env: &Env<'_>,
    progress: &mut Progress,
) {
    expire_offers(world, pass_start, progress);
    for adventurer in idle_adventurers(world) {
        dispatch(world, adventurer, pass_start, env, progress);
    }

    // A run whose resolution errors stays `InProgress`; remembering the
    // attempt keeps one corrupt mission from looping the pass forever.
    let mut attempted: BTreeSet<EntityId> = BTreeSet::new();
    while let Some((ends_at, due)) = next_due_batch(world, now, &attempted) {
        expire_offers(world, ends_at, progress);
        let mut freed: Vec<EntityId> = Vec::new();
        for mission in due {
            attempted.insert(mission.clone());
            let assignee = world
                .entities
                .get(&mission)
                .and_then(|entity| entity.as_mission())
                .and_then(|attrs| attrs.assignee.clone());
            let result = execute(
                &ResolveMission { mission },
                &mut world.entities,
                &mut world.resources,
                now,
                env,
            );
            if matches!(result, Ok(ActionOutcome::Performed { .. })) {
                freed.extend(assignee);
            }
            progress.record(result);
        }
        freed.sort();
        for adventurer in freed {
            dispatch(world, adventurer, ends_at, env, progress);
        }
    }

    expire_offers(world, now, progress);
}

/// Expires every open offer whose deadline has passed `upto`, stamping the
/// event at the deadline.
fn expire_offers(world: &mut WorldState, upto: Timestamp, progress: &mut Progress) {
    let stale: Vec<(EntityId, Timestamp)> = world
        .entities
        .values()
        .filter_map(|entity| {
            let mission = entity.as_mission()?;
            if mission.state != MissionState::Available {
                return None;
            }
            let expires_at = entity.timer(TimerKey::ExpiresAt)?;
            (expires_at <= upto).then(|| (entity.id.clone(), expires_at))
        })
        .collect();
    for (id, expired_at) in stale {
        let effects: [Effect; 1] = [SetEntityStateEffect::new(
            id.clone(),
            StateLabel::Mission(MissionState::Expired),
        )
        .into()];
        match apply_effects(&effects, &mut world.entities, &mut world.resources) {
            Ok(()) => progress.events.push(DomainEvent::new(
                EventKind::MissionExpired { mission: id },
                expired_at,
            )),
            Err(err) => progress.errors.push(err.to_string()),
        }
    }
}

/// The earliest batch of unresolved due runs: every `InProgress` mission
/// sharing the minimal `EndsAt <= now`, in id order.
fn next_due_batch(
    world: &WorldState,
    now: Timestamp,
    attempted: &BTreeSet<EntityId>,
) -> Option<(Timestamp, Vec<EntityId>)> {
    let mut due: Vec<(Timestamp, EntityId)> = world
        .entities
        .values()
        .filter_map(|entity| {
            let mission = entity.as_mission()?;
            if mission.state != MissionState::InProgress || attempted.contains(&entity.id) {
                return None;
            }
            let ends_at = entity.timer(TimerKey::EndsAt)?;
            (ends_at <= now).then(|| (ends_at, entity.id.clone()))
        })
        .collect();
    due.sort();
    let earliest = due.first()?.0;
    let batch = due
        .into_iter()
        .take_while(|(at, _)| *at == earliest)
        .map(|(_, id)| id)
        .collect();
    Some((earliest, batch))
}

fn idle_adventurers(world: &WorldState) -> Vec<EntityId> {
    world
        .entities
        .values()
        .filter(|entity| {
            entity
                .as_adventurer()
                .is_some_and(|adventurer| adventurer.state == AdventurerState::Idle)
        })
        .map(|entity| entity.id.clone())
        .collect()
}

/// Dispatches one idle adventurer onto an open offer per the configured
/// doctrine, stamping timers at `at`. A denial (for instance an offer
/// another adventurer just took) is skipped quietly.
fn dispatch(
    world: &mut WorldState,
    adventurer: EntityId,
    at: Timestamp,
    env: &Env<'_>,
    progress: &mut Progress,
) {
    let doctrine = env.config().doctrine;
    if doctrine == AutoSelectDoctrine::Off {
        return;
    }
    let Some(mission) = pick_offer(world, &adventurer, doctrine) else {
        return;
    };
    let result = execute(
        &StartMission {
            mission,
            adventurer,
        },
        &mut world.entities,
        &mut world.resources,
        at,
        env,
    );
    progress.record(result);
}

/// Chooses an open offer for one adventurer. Iteration is id order, so
/// `FirstAvailable` takes the lowest mission id and `BestSynergy` breaks
/// score ties the same way.
fn pick_offer(
    world: &WorldState,
    adventurer: &EntityId,
    doctrine: AutoSelectDoctrine,
) -> Option<EntityId> {
    let adventurer_entity = world.entities.get(adventurer)?;
    let mut best: Option<(i32, EntityId)> = None;
    for entity in world.entities.values() {
        let Some(mission) = entity.as_mission() else {
            continue;
        };
        if mission.state != MissionState::Available {
            continue;
        }
        match doctrine {
            AutoSelectDoctrine::Off => return None,
            AutoSelectDoctrine::FirstAvailable => return Some(entity.id.clone()),
            AutoSelectDoctrine::BestSynergy => {
                let score = rules::synergy_bonus(adventurer_entity, entity);
                if best.as_ref().is_none_or(|(top, _)| score > *top) {
                    best = Some((score, entity.id.clone()));
                }
            }
        }
    }
    best.map(|(_, id)| id)
}
