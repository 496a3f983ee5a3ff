//! Facility progression verbs.

use crate::effect::{AttributeWrite, Effect, ModifyResourceEffect, SetEntityAttributeEffect};
use crate::env::Env;
use crate::event::{DomainEvent, EventKind};
use crate::requirement::Requirement;
use crate::state::{KindLabel, Snapshot};
use crate::value::EntityId;

use super::{ActionError, GameAction, require_facility};

/// Raises a facility one tier, paying the oracle's cost for the current
/// tier. Asking to upgrade past the cap is an invariant error: the hosting
/// layer should not offer the verb once the oracle reports no next cost.
#[derive(Clone, Debug)]
pub struct UpgradeFacility {
    pub facility: EntityId,
}

impl UpgradeFacility {
    fn cost(
        &self,
        snapshot: &Snapshot<'_>,
        env: &Env<'_>,
    ) -> Result<Vec<crate::value::ResourceUnit>, ActionError> {
        let facility = require_facility(snapshot, &self.facility)?;
        env.facilities()?
            .upgrade_cost(facility.kind, facility.tier)
            .ok_or_else(|| ActionError::FacilityAtMaxTier {
                facility: self.facility.clone(),
                tier: facility.tier,
            })
    }
}

impl GameAction for UpgradeFacility {
    fn name(&self) -> &'static str {
        "upgrade_facility"
    }

    fn requirements(
        &self,
        snapshot: &Snapshot<'_>,
        env: &Env<'_>,
    ) -> Result<Vec<Requirement>, ActionError> {
        let mut requirements = vec![Requirement::entity_exists(
            self.facility.clone(),
            Some(KindLabel::Facility),
        )];
        // The cost depends on the current tier; a missing facility is
        // reported through the existence requirement above.
        if snapshot.entity(&self.facility).is_some() {
            for unit in self.cost(snapshot, env)? {
                requirements.push(Requirement::resource_at_least(unit.kind, unit.amount));
            }
        }
        Ok(requirements)
    }

    fn compute_effects(
        &self,
        snapshot: &Snapshot<'_>,
        env: &Env<'_>,
    ) -> Result<Vec<Effect>, ActionError> {
        let facility = require_facility(snapshot, &self.facility)?;
        let cost = self.cost(snapshot, env)?;
        Ok(vec![
            ModifyResourceEffect::subtract(cost).into(),
            SetEntityAttributeEffect::new(
                self.facility.clone(),
                AttributeWrite::FacilityTier(facility.tier + 1),
            )
            .into(),
        ])
    }

    fn events(
        &self,
        snapshot: &Snapshot<'_>,
        _env: &Env<'_>,
        _effects: &[Effect],
    ) -> Vec<DomainEvent> {
        let Ok(facility) = require_facility(snapshot, &self.facility) else {
            return Vec::new();
        };
        vec![DomainEvent::new(
            EventKind::FacilityUpgraded {
                facility: self.facility.clone(),
                tier: facility.tier + 1,
            },
            snapshot.now,
        )]
    }
}
