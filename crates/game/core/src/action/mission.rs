//! Mission verbs: posting offers, dispatching adventurers, resolution.

use crate::effect::{
    AttributeWrite, Effect, ModifyResourceEffect, SetEntityAttributeEffect, SetEntityStateEffect,
    SetTimerEffect, SpawnEntityEffect,
};
use crate::env::{Env, compute_seed, hash_id};
use crate::event::{DomainEvent, EventKind};
use crate::requirement::Requirement;
use crate::rules;
use crate::rules::OutcomeBand;
use crate::state::{
    AdventurerState, Entity, EntityKind, Mission, MissionState, Snapshot, StateLabel, TimerKey,
};
use crate::value::{ArchetypeId, EntityId, ResourceBundle, Timestamp};

use super::{ActionError, GameAction, require_adventurer, require_entity, require_mission};

/// Dispatches an idle adventurer onto an available mission offer.
///
/// The run duration is the archetype's base duration discounted by the
/// adventurer's level. Timers are planned before the state transition so
/// the mission invariant (no `InProgress` without `StartedAt`/`EndsAt`)
/// holds during application.
#[derive(Clone, Debug)]
pub struct StartMission {
    pub mission: EntityId,
    pub adventurer: EntityId,
}

impl GameAction for StartMission {
    fn name(&self) -> &'static str {
        "start_mission"
    }

    fn requirements(
        &self,
        _snapshot: &Snapshot<'_>,
        _env: &Env<'_>,
    ) -> Result<Vec<Requirement>, ActionError> {
        Ok(vec![
            Requirement::entity_in_state(
                self.mission.clone(),
                StateLabel::Mission(MissionState::Available),
            ),
            Requirement::entity_in_state(
                self.adventurer.clone(),
                StateLabel::Adventurer(AdventurerState::Idle),
            ),
        ])
    }

    fn compute_effects(
        &self,
        snapshot: &Snapshot<'_>,
        env: &Env<'_>,
    ) -> Result<Vec<Effect>, ActionError> {
        let mission = require_mission(snapshot, &self.mission)?;
        let adventurer = require_adventurer(snapshot, &self.adventurer)?;
        let duration =
            rules::effective_duration(mission.base_duration, adventurer.level, env.config());
        let ends_at = snapshot.now + duration;

        Ok(vec![
            SetTimerEffect::set(self.mission.clone(), TimerKey::StartedAt, snapshot.now).into(),
            SetTimerEffect::set(self.mission.clone(), TimerKey::EndsAt, ends_at).into(),
            // An accepted offer can no longer expire.
            SetTimerEffect::clear(self.mission.clone(), TimerKey::ExpiresAt).into(),
            SetEntityAttributeEffect::new(
                self.mission.clone(),
                AttributeWrite::MissionAssignee(Some(self.adventurer.clone())),
            )
            .into(),
            SetEntityStateEffect::new(
                self.mission.clone(),
                StateLabel::Mission(MissionState::InProgress),
            )
            .into(),
            SetEntityStateEffect::new(
                self.adventurer.clone(),
                StateLabel::Adventurer(AdventurerState::OnMission),
            )
            .into(),
        ])
    }

    fn events(
        &self,
        snapshot: &Snapshot<'_>,
        _env: &Env<'_>,
        effects: &[Effect],
    ) -> Vec<DomainEvent> {
        let ends_at = effects.iter().find_map(|effect| match effect {
            Effect::SetTimer(timer) if timer.key == TimerKey::EndsAt => timer.at,
            _ => None,
        });
        let Some(ends_at) = ends_at else {
            return Vec::new();
        };
        vec![DomainEvent::new(
            EventKind::MissionStarted {
                mission: self.mission.clone(),
                adventurer: self.adventurer.clone(),
                ends_at,
            },
            snapshot.now,
        )]
    }
}

/// Everything a resolution needs, computed once from the pre-apply
/// snapshot. The die roll is seeded from the mission id and its stored
/// `EndsAt` instant, so the same run resolves identically no matter when
/// or how often the caller catches up.
struct Resolution {
    adventurer: EntityId,
    band: OutcomeBand,
    rewards: ResourceBundle,
    xp_after: u64,
    level_before: u8,
    level_after: u8,
    resolved_at: Timestamp,
}

/// Resolves a due mission: one deterministic d20 roll against the DC,
/// banded rewards and xp, adventurer returned to the idle pool.
#[derive(Clone, Debug)]
pub struct ResolveMission {
    pub mission: EntityId,
}

impl ResolveMission {
    fn resolution(&self, snapshot: &Snapshot<'_>, env: &Env<'_>) -> Result<Resolution, ActionError> {
        let entity = require_entity(snapshot, &self.mission)?;
        let mission = require_mission(snapshot, &self.mission)?;
        let ends_at = entity
            .timer(TimerKey::EndsAt)
            .ok_or_else(|| ActionError::MissionNotTimed(self.mission.clone()))?;
        let assignee = mission
            .assignee
            .clone()
            .ok_or_else(|| ActionError::MissionUnassigned(self.mission.clone()))?;
        let adventurer_entity = require_entity(snapshot, &assignee)?;
        let adventurer = require_adventurer(snapshot, &assignee)?;

        let seed = compute_seed(hash_id(self.mission.as_str()), ends_at.as_millis(), 0);
        let face = env.rng()?.roll_d20(seed);
        let synergy = rules::synergy_bonus(adventurer_entity, entity);
        let total = rules::roll_total(face, adventurer.primary_modifier(), synergy);
        let band = rules::outcome_band(total, mission.dc, env.config());

        let xp_after = adventurer.xp + rules::xp_gain(mission.xp_reward, band, env.config());
        Ok(Resolution {
            adventurer: assignee,
            band,
            rewards: rules::scaled_rewards(&mission.rewards, band, env.config()),
            xp_after,
            level_before: adventurer.level,
            level_after: rules::level_for_xp(xp_after, env.config()),
            resolved_at: ends_at,
        })
    }
}

impl GameAction for ResolveMission {
    fn name(&self) -> &'static str {
        "resolve_mission"
    }

    fn requirements(
        &self,
        _snapshot: &Snapshot<'_>,
        _env: &Env<'_>,
    ) -> Result<Vec<Requirement>, ActionError> {
        Ok(vec![
            Requirement::entity_in_state(
                self.mission.clone(),
                StateLabel::Mission(MissionState::InProgress),
            ),
            Requirement::timer_due(self.mission.clone(), TimerKey::EndsAt),
        ])
    }

    fn compute_effects(
        &self,
        snapshot: &Snapshot<'_>,
        env: &Env<'_>,
    ) -> Result<Vec<Effect>, ActionError> {
        let resolution = self.resolution(snapshot, env)?;

        let mut effects: Vec<Effect> = vec![
            SetEntityStateEffect::new(
                self.mission.clone(),
                StateLabel::Mission(MissionState::Completed),
            )
            .into(),
            SetEntityStateEffect::new(
                resolution.adventurer.clone(),
                StateLabel::Adventurer(AdventurerState::Idle),
            )
            .into(),
            SetEntityAttributeEffect::new(
                resolution.adventurer.clone(),
                AttributeWrite::AdventurerXp(resolution.xp_after),
            )
            .into(),
        ];
        if !resolution.rewards.is_empty() {
            effects.push(ModifyResourceEffect::add(resolution.rewards.units()).into());
        }
        if resolution.level_after > resolution.level_before {
            effects.push(
                SetEntityAttributeEffect::new(
                    resolution.adventurer,
                    AttributeWrite::AdventurerLevel(resolution.level_after),
                )
                .into(),
            );
        }
        Ok(effects)
    }

    fn events(
        &self,
        snapshot: &Snapshot<'_>,
        env: &Env<'_>,
        _effects: &[Effect],
    ) -> Vec<DomainEvent> {
        let Ok(resolution) = self.resolution(snapshot, env) else {
            return Vec::new();
        };
        let mut events = vec![DomainEvent::new(
            EventKind::MissionResolved {
                mission: self.mission.clone(),
                adventurer: resolution.adventurer.clone(),
                outcome: resolution.band,
                rewards: resolution.rewards.clone(),
            },
            resolution.resolved_at,
        )];
        if resolution.level_after > resolution.level_before {
            events.push(DomainEvent::new(
                EventKind::AdventurerLeveledUp {
                    adventurer: resolution.adventurer,
                    level: resolution.level_after,
                },
                resolution.resolved_at,
            ));
        }
        events
    }
}

/// Stamps a fresh mission offer entity from an archetype template.
///
/// The caller supplies the new entity id; reusing an existing id fails at
/// the spawn effect. The offer carries an `ExpiresAt` timer from the
/// archetype's ttl.
#[derive(Clone, Debug)]
pub struct PostMissionOffer {
    pub mission: EntityId,
    pub archetype: ArchetypeId,
}

impl GameAction for PostMissionOffer {
    fn name(&self) -> &'static str {
        "post_mission_offer"
    }

    fn requirements(
        &self,
        _snapshot: &Snapshot<'_>,
        _env: &Env<'_>,
    ) -> Result<Vec<Requirement>, ActionError> {
        Ok(Vec::new())
    }

    fn compute_effects(
        &self,
        snapshot: &Snapshot<'_>,
        env: &Env<'_>,
    ) -> Result<Vec<Effect>, ActionError> {
        let archetype = env
            .archetypes()?
            .archetype(&self.archetype)
            .ok_or_else(|| ActionError::UnknownArchetype(self.archetype.clone()))?;

        let entity = Entity::new(
            self.mission.clone(),
            EntityKind::Mission(Mission::offer(
                archetype.dc,
                archetype.base_duration,
                archetype.rewards.clone(),
                archetype.xp_reward,
                archetype.preferred_role,
            )),
        )
        .with_tags(archetype.tags.iter().cloned())
        .with_timer(TimerKey::ExpiresAt, snapshot.now + archetype.offer_ttl);

        Ok(vec![SpawnEntityEffect::new(entity).into()])
    }

    fn events(
        &self,
        snapshot: &Snapshot<'_>,
        _env: &Env<'_>,
        _effects: &[Effect],
    ) -> Vec<DomainEvent> {
        vec![DomainEvent::new(
            EventKind::MissionOfferPosted {
                mission: self.mission.clone(),
            },
            snapshot.now,
        )]
    }
}
