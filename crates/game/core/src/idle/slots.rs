//! Resource slot generation phase.
//!
//! Each worked slot carries a fractional accumulator in metadata and a
//! `LastTickAt` timer. Generation credits only whole floored units and
//! persists the remainder, so splitting an interval into many ticks yields
//! exactly the same total as one jump.

use crate::config::SimConfig;
use crate::effect::{Effect, ModifyResourceEffect, SetEntityMetadataEffect, SetTimerEffect, apply_effects};
use crate::env::Env;
use crate::event::{DomainEvent, EventKind};
use crate::rules;
use crate::state::{
    Entity, EntityMap, MetaValue, ResourceSlot, SlotAssignee, SlotState, TimerKey, WorldState,
};
use crate::value::{EntityId, ResourceBundle, ResourceUnit, Timestamp};

use super::Progress;

/// Planned settlement of one slot's pending production.
pub(crate) struct SlotAccrualPlan {
    pub effects: Vec<Effect>,
    /// Whole units credited by the plan, empty when only the accumulator
    /// moved.
    pub credited: ResourceBundle,
    pub warnings: Vec<String>,
}

/// Plans the accrual for one slot, or `None` when there is nothing to do
/// (inactive, unworked, or no elapsed time).
///
/// `since_fallback` anchors a slot that has never ticked; the idle loop
/// passes the world's last simulated instant, verbs pass `None` so a
/// freshly assigned slot simply starts its clock.
pub(crate) fn plan_accrual(
    slot_entity: &Entity,
    entities: &EntityMap,
    since_fallback: Option<Timestamp>,
    now: Timestamp,
    config: &SimConfig,
) -> Option<SlotAccrualPlan> {
    let slot = slot_entity.as_slot()?;
    if slot.state != SlotState::Active || slot.assignee == SlotAssignee::None {
        return None;
    }
    let since = slot_entity.timer(TimerKey::LastTickAt).or(since_fallback)?;
    let elapsed = now.saturating_since(since);
    if elapsed.is_zero() {
        return None;
    }

    let mut warnings = Vec::new();
    if let SlotAssignee::Adventurer(worker) = &slot.assignee
        && !entities.contains_key(worker)
    {
        warnings.push(format!(
            "slot {} worker {worker} no longer resolves",
            slot_entity.id
        ));
    }
    let tier = match &slot.facility {
        Some(facility) => match entities.get(facility).and_then(Entity::as_facility) {
            Some(facility) => facility.tier,
            None => {
                warnings.push(format!(
                    "slot {} facility {facility} no longer resolves",
                    slot_entity.id
                ));
                1
            }
        },
        None => 1,
    };

    let accumulator = slot_entity
        .metadata_number(ResourceSlot::ACCRUAL_REMAINDER_KEY)
        .unwrap_or(0.0);
    let accrual = rules::accrue(
        accumulator,
        slot.base_rate_per_minute,
        rules::worker_multiplier(&slot.assignee, config),
        rules::facility_multiplier(tier, config),
        elapsed,
    );

    let mut effects: Vec<Effect> = Vec::new();
    let mut credited = ResourceBundle::new();
    if accrual.credited > 0 {
        credited = ResourceBundle::from_units([ResourceUnit::new(slot.resource, accrual.credited)]);
        effects.push(ModifyResourceEffect::add(credited.units()).into());
    }
    effects.push(
        SetEntityMetadataEffect::new(
            slot_entity.id.clone(),
            ResourceSlot::ACCRUAL_REMAINDER_KEY,
            MetaValue::Number(accrual.remainder),
        )
        .into(),
    );
    effects.push(SetTimerEffect::set(slot_entity.id.clone(), TimerKey::LastTickAt, now).into());

    Some(SlotAccrualPlan {
        effects,
        credited,
        warnings,
    })
}

/// Settles every worked slot up to `now`.
pub(super) fn generate(
    world: &mut WorldState,
    now: Timestamp,
    env: &Env<'_>,
    progress: &mut Progress,
) {
    let slots: Vec<EntityId> = world
        .entities
        .values()
        .filter(|entity| entity.as_slot().is_some())
        .map(|entity| entity.id.clone())
        .collect();

    for slot in slots {
        let Some(entity) = world.entities.get(&slot) else {
            continue;
        };
        let Some(plan) = plan_accrual(
            entity,
            &world.entities,
            Some(world.last_simulated_at),
            now,
            env.config(),
        ) else {
            continue;
        };
        progress.warnings.extend(plan.warnings);
        match apply_effects(&plan.effects, &mut world.entities, &mut world.resources) {
            Ok(()) => {
                if !plan.credited.is_empty() {
                    progress.events.push(DomainEvent::new(
                        EventKind::ResourcesGenerated {
                            slot,
                            amount: plan.credited,
                        },
                        now,
                    ));
                }
            }
            Err(err) => progress.errors.push(err.to_string()),
        }
    }
}
