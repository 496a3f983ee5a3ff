//! Crafting queue verbs.

use crate::effect::{AttributeWrite, Effect, ModifyResourceEffect, SetEntityAttributeEffect, SetTimerEffect};
use crate::env::Env;
use crate::event::{DomainEvent, EventKind};
use crate::requirement::Requirement;
use crate::rules;
use crate::state::{KindLabel, Snapshot, TimerKey};
use crate::value::{EntityId, RecipeId};

use super::{ActionError, GameAction, require_facility};

/// Pays for a recipe and puts it on a facility's crafting queue.
///
/// Costs are subtracted up front, at enqueue time. If the facility has no
/// running job the recipe starts immediately (`CompleteAt` timer set);
/// otherwise it waits in the queue and the idle loop chains it when the
/// active job finishes.
#[derive(Clone, Debug)]
pub struct EnqueueCraft {
    pub facility: EntityId,
    pub recipe: RecipeId,
}

impl GameAction for EnqueueCraft {
    fn name(&self) -> &'static str {
        "enqueue_craft"
    }

    fn requirements(
        &self,
        _snapshot: &Snapshot<'_>,
        env: &Env<'_>,
    ) -> Result<Vec<Requirement>, ActionError> {
        let recipe = env
            .recipes()?
            .recipe(&self.recipe)
            .ok_or_else(|| ActionError::UnknownRecipe(self.recipe.clone()))?;

        let mut requirements = vec![Requirement::entity_exists(
            self.facility.clone(),
            Some(KindLabel::Facility),
        )];
        for unit in &recipe.cost {
            requirements.push(Requirement::resource_at_least(unit.kind, unit.amount));
        }
        Ok(requirements)
    }

    fn compute_effects(
        &self,
        snapshot: &Snapshot<'_>,
        env: &Env<'_>,
    ) -> Result<Vec<Effect>, ActionError> {
        let recipe = env
            .recipes()?
            .recipe(&self.recipe)
            .ok_or_else(|| ActionError::UnknownRecipe(self.recipe.clone()))?;
        let facility = require_facility(snapshot, &self.facility)?;

        let mut effects: Vec<Effect> =
            vec![ModifyResourceEffect::subtract(recipe.cost.iter().copied()).into()];
        if facility.active_recipe.is_none() {
            let duration = rules::effective_craft_duration(
                recipe.base_duration,
                facility.tier,
                env.config(),
            );
            effects.push(
                SetEntityAttributeEffect::new(
                    self.facility.clone(),
                    AttributeWrite::ActiveRecipe(Some(self.recipe.clone())),
                )
                .into(),
            );
            effects.push(
                SetTimerEffect::set(
                    self.facility.clone(),
                    TimerKey::CompleteAt,
                    snapshot.now + duration,
                )
                .into(),
            );
        } else {
            effects.push(
                SetEntityAttributeEffect::new(
                    self.facility.clone(),
                    AttributeWrite::QueuePushRecipe(self.recipe.clone()),
                )
                .into(),
            );
        }
        Ok(effects)
    }

    fn events(
        &self,
        snapshot: &Snapshot<'_>,
        _env: &Env<'_>,
        effects: &[Effect],
    ) -> Vec<DomainEvent> {
        let completes_at = effects.iter().find_map(|effect| match effect {
            Effect::SetTimer(timer) if timer.key == TimerKey::CompleteAt => timer.at,
            _ => None,
        });
        let kind = match completes_at {
            Some(completes_at) => EventKind::CraftingStarted {
                facility: self.facility.clone(),
                recipe: self.recipe.clone(),
                completes_at,
            },
            None => EventKind::CraftingQueued {
                facility: self.facility.clone(),
                recipe: self.recipe.clone(),
            },
        };
        vec![DomainEvent::new(kind, snapshot.now)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::execute;
    use crate::config::SimConfig;
    use crate::env::{Recipe, RecipeOracle};
    use crate::state::{Entity, EntityKind, EquipSlot, Facility, FacilityKind, WorldState};
    use crate::value::{Duration, ResourceBundle, ResourceKind, ResourceUnit, Timestamp};

    struct OneRecipe(Recipe);

    impl RecipeOracle for OneRecipe {
        fn recipe(&self, id: &RecipeId) -> Option<&Recipe> {
            (self.0.id == *id).then_some(&self.0)
        }
    }

    fn sword_recipe() -> Recipe {
        Recipe {
            id: RecipeId::from("iron-sword"),
            name: "Iron sword".into(),
            cost: vec![ResourceUnit::new(ResourceKind::Materials, 8)],
            base_duration: Duration::from_minutes(10),
            output_slot: EquipSlot::Weapon,
            output_max_durability: 100,
            output_salvage: ResourceBundle::from_units([ResourceUnit::new(
                ResourceKind::Materials,
                2,
            )]),
            output_tags: vec!["iron".into()],
        }
    }

    fn world(materials: u64) -> WorldState {
        let mut world = WorldState::new("p1", Timestamp::EPOCH);
        world.insert(Entity::new(
            EntityId::from("workshop"),
            EntityKind::Facility(Facility::new(FacilityKind::Workshop)),
        ));
        world.resources = world
            .resources
            .add(ResourceUnit::new(ResourceKind::Materials, materials));
        world
    }

    fn enqueue(world: &mut WorldState, now: Timestamp) -> crate::action::ActionOutcome {
        let config = SimConfig::default();
        let oracle = OneRecipe(sword_recipe());
        let env = Env::new(&config).with_recipes(&oracle);
        execute(
            &EnqueueCraft {
                facility: EntityId::from("workshop"),
                recipe: RecipeId::from("iron-sword"),
            },
            &mut world.entities,
            &mut world.resources,
            now,
            &env,
        )
        .unwrap()
    }

    #[test]
    fn first_enqueue_starts_the_job_immediately() {
        let mut world = world(20);
        let outcome = enqueue(&mut world, Timestamp::EPOCH);
        assert!(outcome.is_performed());
        assert_eq!(world.resources.amount(ResourceKind::Materials), 12);

        let workshop = world.entities.get(&EntityId::from("workshop")).unwrap();
        let facility = workshop.as_facility().unwrap();
        assert_eq!(facility.active_recipe, Some(RecipeId::from("iron-sword")));
        assert!(facility.queue.is_empty());
        assert_eq!(
            workshop.timer(TimerKey::CompleteAt),
            Some(Timestamp::EPOCH + Duration::from_minutes(10))
        );
        assert!(matches!(
            outcome.events()[0].kind,
            EventKind::CraftingStarted { .. }
        ));
    }

    #[test]
    fn second_enqueue_waits_in_the_queue() {
        let mut world = world(20);
        enqueue(&mut world, Timestamp::EPOCH);
        let outcome = enqueue(&mut world, Timestamp::from_millis(1_000));
        assert_eq!(world.resources.amount(ResourceKind::Materials), 4);

        let workshop = world.entities.get(&EntityId::from("workshop")).unwrap();
        let facility = workshop.as_facility().unwrap();
        assert_eq!(facility.queue.len(), 1);
        // Still the first job's completion instant.
        assert_eq!(
            workshop.timer(TimerKey::CompleteAt),
            Some(Timestamp::EPOCH + Duration::from_minutes(10))
        );
        assert!(matches!(
            outcome.events()[0].kind,
            EventKind::CraftingQueued { .. }
        ));
    }

    #[test]
    fn enqueue_without_materials_is_denied() {
        let mut world = world(3);
        let outcome = enqueue(&mut world, Timestamp::EPOCH);
        let reason = outcome.denial_reason().unwrap();
        assert!(reason.contains("materials"));
        assert_eq!(world.resources.amount(ResourceKind::Materials), 3);
    }

    #[test]
    fn tier_discounts_the_craft_duration() {
        let mut world = world(20);
        world
            .entities
            .get_mut(&EntityId::from("workshop"))
            .unwrap()
            .as_facility_mut()
            .unwrap()
            .tier = 3;
        enqueue(&mut world, Timestamp::EPOCH);
        let workshop = world.entities.get(&EntityId::from("workshop")).unwrap();
        // 600s base at 1.5x facility speed -> 400s.
        assert_eq!(
            workshop.timer(TimerKey::CompleteAt),
            Some(Timestamp::from_millis(400_000))
        );
    }
}
