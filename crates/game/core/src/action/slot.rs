//! Resource slot verbs.

use crate::effect::{AttributeWrite, Effect, SetEntityAttributeEffect, SetTimerEffect};
use crate::env::Env;
use crate::event::{DomainEvent, EventKind};
use crate::idle::slots::plan_accrual;
use crate::requirement::Requirement;
use crate::state::{KindLabel, Snapshot, SlotAssignee, TimerKey};
use crate::value::EntityId;

use super::{ActionError, GameAction, require_entity, require_slot};

/// Puts a worker on a resource slot (or takes one off with
/// [`SlotAssignee::None`]).
///
/// Any production pending under the old worker is settled first at the old
/// rate, then the clock restarts for the new one — reassigning mid-interval
/// never retroactively re-rates elapsed time.
#[derive(Clone, Debug)]
pub struct AssignSlotWorker {
    pub slot: EntityId,
    pub assignee: SlotAssignee,
}

impl GameAction for AssignSlotWorker {
    fn name(&self) -> &'static str {
        "assign_slot_worker"
    }

    fn requirements(
        &self,
        _snapshot: &Snapshot<'_>,
        _env: &Env<'_>,
    ) -> Result<Vec<Requirement>, ActionError> {
        let mut requirements = vec![Requirement::entity_exists(
            self.slot.clone(),
            Some(KindLabel::ResourceSlot),
        )];
        if let SlotAssignee::Adventurer(worker) = &self.assignee {
            requirements.push(Requirement::entity_exists(
                worker.clone(),
                Some(KindLabel::Adventurer),
            ));
        }
        Ok(requirements)
    }

    fn compute_effects(
        &self,
        snapshot: &Snapshot<'_>,
        env: &Env<'_>,
    ) -> Result<Vec<Effect>, ActionError> {
        let entity = require_entity(snapshot, &self.slot)?;
        require_slot(snapshot, &self.slot)?;

        let mut effects = plan_accrual(entity, snapshot.entities, None, snapshot.now, env.config())
            .map(|plan| plan.effects)
            .unwrap_or_default();
        effects.push(
            SetEntityAttributeEffect::new(
                self.slot.clone(),
                AttributeWrite::SlotAssignee(self.assignee.clone()),
            )
            .into(),
        );
        // Restart the clock for the new worker; redundant when the
        // settlement above already moved it.
        effects.push(SetTimerEffect::set(self.slot.clone(), TimerKey::LastTickAt, snapshot.now).into());
        Ok(effects)
    }

    fn events(
        &self,
        snapshot: &Snapshot<'_>,
        env: &Env<'_>,
        _effects: &[Effect],
    ) -> Vec<DomainEvent> {
        let mut events = Vec::new();
        if let Ok(entity) = require_entity(snapshot, &self.slot)
            && let Some(plan) = plan_accrual(entity, snapshot.entities, None, snapshot.now, env.config())
            && !plan.credited.is_empty()
        {
            events.push(DomainEvent::new(
                EventKind::ResourcesGenerated {
                    slot: self.slot.clone(),
                    amount: plan.credited,
                },
                snapshot.now,
            ));
        }
        events.push(DomainEvent::new(
            EventKind::SlotWorkerAssigned {
                slot: self.slot.clone(),
            },
            snapshot.now,
        ));
        events
    }
}
