//! Crafting phase of the idle loop: completing jobs and chaining queues.

use crate::effect::{
    AttributeWrite, Effect, SetEntityAttributeEffect, SetTimerEffect, SpawnEntityEffect,
    apply_effects,
};
use crate::env::Env;
use crate::event::{DomainEvent, EventKind};
use crate::rules;
use crate::state::{Entity, EntityKind, Item, TimerKey, WorldState};
use crate::value::{EntityId, RecipeId, Timestamp};

use super::Progress;

/// Completes every crafting job whose `CompleteAt` has passed.
///
/// When a job finishes with recipes still queued, the next one starts at
/// the *completion instant*, not at `now` — a multi-hour catch-up drains
/// the queue exactly as a tick-by-tick run would, possibly completing
/// several jobs in one pass.
pub(super) fn advance(
    world: &mut WorldState,
    now: Timestamp,
    env: &Env<'_>,
    progress: &mut Progress,
) {
    let facilities: Vec<EntityId> = world
        .entities
        .values()
        .filter(|entity| entity.as_facility().is_some())
        .map(|entity| entity.id.clone())
        .collect();

    for facility_id in facilities {
        while let Some(step) = plan_completion(world, &facility_id, now, env, progress) {
            match apply_effects(&step.effects, &mut world.entities, &mut world.resources) {
                Ok(()) => progress.events.extend(step.events),
                Err(err) => {
                    progress.errors.push(err.to_string());
                    break;
                }
            }
        }
    }
}

struct CompletionStep {
    effects: Vec<Effect>,
    events: Vec<DomainEvent>,
}

/// Plans one completion (and the chained start, if any) for a facility, or
/// `None` when no job is due.
fn plan_completion(
    world: &WorldState,
    facility_id: &EntityId,
    now: Timestamp,
    env: &Env<'_>,
    progress: &mut Progress,
) -> Option<CompletionStep> {
    let entity = world.entities.get(facility_id)?;
    let facility = entity.as_facility()?;
    let active = facility.active_recipe.clone()?;
    let Some(complete_at) = entity.timer(TimerKey::CompleteAt) else {
        progress.warnings.push(format!(
            "facility {facility_id} has an active job but no completion timer"
        ));
        return None;
    };
    if complete_at > now {
        return None;
    }

    let recipes = match env.recipes() {
        Ok(recipes) => recipes,
        Err(err) => {
            progress.errors.push(err.to_string());
            return None;
        }
    };
    let Some(recipe) = recipes.recipe(&active) else {
        progress
            .errors
            .push(format!("facility {facility_id} is crafting unknown recipe {active}"));
        return None;
    };

    // The completion instant makes the id unique: jobs on one facility are
    // strictly sequential.
    let item_id = EntityId::new(format!("{facility_id}-craft-{}", complete_at.as_millis()));
    let item = Entity::new(
        item_id.clone(),
        EntityKind::Item(Item::new(
            recipe.output_slot,
            recipe.output_max_durability,
            recipe.output_salvage.clone(),
        )),
    )
    .with_tags(recipe.output_tags.iter().cloned());

    let mut effects: Vec<Effect> = vec![
        SpawnEntityEffect::new(item).into(),
        SetEntityAttributeEffect::new(facility_id.clone(), AttributeWrite::ActiveRecipe(None))
            .into(),
        SetTimerEffect::clear(facility_id.clone(), TimerKey::CompleteAt).into(),
    ];
    let mut events = vec![DomainEvent::new(
        EventKind::CraftingCompleted {
            facility: facility_id.clone(),
            recipe: active,
            item: item_id,
        },
        complete_at,
    )];

    if let Some(next) = facility.queue.front().cloned() {
        match chained_start(facility_id, &next, facility.tier, complete_at, env) {
            Ok((chain_effects, chain_event)) => {
                effects.extend(chain_effects);
                events.push(chain_event);
            }
            Err(message) => progress.errors.push(message),
        }
    }

    Some(CompletionStep { effects, events })
}

fn chained_start(
    facility_id: &EntityId,
    recipe_id: &RecipeId,
    tier: u8,
    started_at: Timestamp,
    env: &Env<'_>,
) -> Result<(Vec<Effect>, DomainEvent), String> {
    let recipe = env
        .recipes()
        .map_err(|err| err.to_string())?
        .recipe(recipe_id)
        .ok_or_else(|| format!("facility {facility_id} queued unknown recipe {recipe_id}"))?;
    let completes_at =
        started_at + rules::effective_craft_duration(recipe.base_duration, tier, env.config());

    let effects: Vec<Effect> = vec![
        SetEntityAttributeEffect::new(facility_id.clone(), AttributeWrite::QueuePopFront).into(),
        SetEntityAttributeEffect::new(
            facility_id.clone(),
            AttributeWrite::ActiveRecipe(Some(recipe_id.clone())),
        )
        .into(),
        SetTimerEffect::set(facility_id.clone(), TimerKey::CompleteAt, completes_at).into(),
    ];
    let event = DomainEvent::new(
        EventKind::CraftingStarted {
            facility: facility_id.clone(),
            recipe: recipe_id.clone(),
            completes_at,
        },
        started_at,
    );
    Ok((effects, event))
}
