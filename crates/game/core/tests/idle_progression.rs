use guild_core::{
    AbilityKind, Adventurer, AdventurerState, ArchetypeId, AutoSelectDoctrine, Duration,
    EnqueueCraft, Entity, EntityId, EntityKind, Env, EquipSlot, EventKind, Facility, FacilityKind,
    FixedRng, IdleError, MetaValue, Mission, MissionArchetype, MissionState, OutcomeBand, PcgRng,
    Recipe, RecipeId, RecipeOracle, ResourceBundle, ResourceKind, ResourceSlot, ResourceUnit,
    RoleKind, SimConfig, SlotAssignee, StatMap, TimerKey, Timestamp, WorldState, execute,
    process_idle_progression,
};

struct Recipes(Vec<Recipe>);

impl RecipeOracle for Recipes {
    fn recipe(&self, id: &RecipeId) -> Option<&Recipe> {
        self.0.iter().find(|recipe| recipe.id == *id)
    }
}

struct Archetypes(Vec<MissionArchetype>);

impl guild_core::ArchetypeOracle for Archetypes {
    fn archetype(&self, id: &ArchetypeId) -> Option<&MissionArchetype> {
        self.0.iter().find(|archetype| archetype.id == *id)
    }
}

fn dagger_recipe(id: &str, minutes: u64) -> Recipe {
    Recipe {
        id: RecipeId::from(id),
        name: id.to_string(),
        cost: vec![ResourceUnit::new(ResourceKind::Materials, 2)],
        base_duration: Duration::from_minutes(minutes),
        output_slot: EquipSlot::Weapon,
        output_max_durability: 60,
        output_salvage: ResourceBundle::new(),
        output_tags: vec![],
    }
}

fn adventurer(id: &str) -> Entity {
    Entity::new(
        EntityId::from(id),
        EntityKind::Adventurer(Adventurer::new(
            RoleKind::Scout,
            AbilityKind::Agility,
            StatMap::new().with(AbilityKind::Agility, 14),
        )),
    )
}

fn offer(id: &str, dc: i32, role: RoleKind) -> Entity {
    Entity::new(
        EntityId::from(id),
        EntityKind::Mission(Mission::offer(
            dc,
            Duration::from_minutes(5),
            ResourceBundle::from_units([ResourceUnit::new(ResourceKind::Gold, 10)]),
            20,
            role,
        )),
    )
}

/// A world with one running mission, a two-job crafting queue, and a worked
/// slot — everything the loop advances without fresh randomness beyond the
/// seeded resolution roll.
fn busy_world(env: &Env<'_>) -> WorldState {
    let mut world = WorldState::new("p1", Timestamp::EPOCH);
    world.insert(adventurer("adv-1"));
    world.insert(offer("mission-1", 10, RoleKind::Scout));
    world.insert(Entity::new(
        EntityId::from("workshop"),
        EntityKind::Facility(Facility::new(FacilityKind::Workshop)),
    ));
    world.insert(Entity::new(
        EntityId::from("slot-1"),
        EntityKind::ResourceSlot(ResourceSlot::new(ResourceKind::Essence, 0.77)),
    ));
    world.resources = world
        .resources
        .add(ResourceUnit::new(ResourceKind::Materials, 10));

    // Dispatch the adventurer: mission runs 5 minutes.
    let outcome = execute(
        &guild_core::StartMission {
            mission: EntityId::from("mission-1"),
            adventurer: EntityId::from("adv-1"),
        },
        &mut world.entities,
        &mut world.resources,
        Timestamp::EPOCH,
        env,
    )
    .unwrap();
    assert!(outcome.is_performed());

    // First craft starts immediately, second queues behind it.
    for recipe in ["dagger-a", "dagger-b"] {
        let outcome = execute(
            &EnqueueCraft {
                facility: EntityId::from("workshop"),
                recipe: RecipeId::from(recipe),
            },
            &mut world.entities,
            &mut world.resources,
            Timestamp::EPOCH,
            env,
        )
        .unwrap();
        assert!(outcome.is_performed());
    }

    let outcome = execute(
        &guild_core::AssignSlotWorker {
            slot: EntityId::from("slot-1"),
            assignee: SlotAssignee::Player,
        },
        &mut world.entities,
        &mut world.resources,
        Timestamp::EPOCH,
        env,
    )
    .unwrap();
    assert!(outcome.is_performed());

    world
}

/// The accumulator remainder is the one f64 in the state; different tick
/// splits accumulate different rounding dust. Compare it approximately and
/// zero it before whole-state comparison.
fn normalize_remainder(world: &mut WorldState) -> f64 {
    let slot = world.entities.get_mut(&EntityId::from("slot-1")).unwrap();
    let remainder = slot
        .metadata_number(ResourceSlot::ACCRUAL_REMAINDER_KEY)
        .unwrap_or(0.0);
    slot.set_metadata(ResourceSlot::ACCRUAL_REMAINDER_KEY, MetaValue::Number(0.0));
    remainder
}

#[test]
fn one_jump_catch_up_matches_per_second_ticks() {
    let mut config = SimConfig::default();
    config.doctrine = AutoSelectDoctrine::Off;
    let rng = PcgRng;
    let recipes = Recipes(vec![dagger_recipe("dagger-a", 2), dagger_recipe("dagger-b", 3)]);
    let env = Env::new(&config).with_rng(&rng).with_recipes(&recipes);

    let start = busy_world(&env);

    let horizon = Timestamp::EPOCH + Duration::from_minutes(10);
    let jumped = process_idle_progression(&start, horizon, &env).unwrap();
    assert!(jumped.errors.is_empty(), "{:?}", jumped.errors);

    let mut ticked = start.clone();
    for second in 1..=600u64 {
        let now = Timestamp::EPOCH + Duration::from_seconds(second);
        let outcome = process_idle_progression(&ticked, now, &env).unwrap();
        assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
        ticked = outcome.state;
    }

    let mut jumped_state = jumped.state;
    let remainder_jumped = normalize_remainder(&mut jumped_state);
    let remainder_ticked = normalize_remainder(&mut ticked);
    assert!((remainder_jumped - remainder_ticked).abs() < 1e-6);
    assert_eq!(jumped_state, ticked);

    // Both paths resolved the mission, drained the queue, and credited the
    // same whole units: 0.77/min over 10 minutes floors to 7.
    assert_eq!(jumped_state.resources.amount(ResourceKind::Essence), 7);
    let mission = jumped_state.entities.get(&EntityId::from("mission-1")).unwrap();
    assert_ne!(mission.as_mission().unwrap().state, MissionState::InProgress);
    let workshop = jumped_state.entities.get(&EntityId::from("workshop")).unwrap();
    assert_eq!(workshop.as_facility().unwrap().active_recipe, None);
    assert!(workshop.as_facility().unwrap().queue.is_empty());
}

#[test]
fn queued_job_chains_from_the_completion_instant() {
    let mut config = SimConfig::default();
    config.doctrine = AutoSelectDoctrine::Off;
    let rng = PcgRng;
    let recipes = Recipes(vec![dagger_recipe("dagger-a", 2), dagger_recipe("dagger-b", 3)]);
    let env = Env::new(&config).with_rng(&rng).with_recipes(&recipes);
    let world = busy_world(&env);

    // Jump past the first job (2 min) but not the chained second (2+3 min).
    let outcome = process_idle_progression(
        &world,
        Timestamp::EPOCH + Duration::from_minutes(4),
        &env,
    )
    .unwrap();

    let workshop = outcome.state.entities.get(&EntityId::from("workshop")).unwrap();
    assert_eq!(
        workshop.as_facility().unwrap().active_recipe,
        Some(RecipeId::from("dagger-b"))
    );
    // Chained at the 2-minute completion instant, due at 5 minutes.
    assert_eq!(
        workshop.timer(TimerKey::CompleteAt),
        Some(Timestamp::EPOCH + Duration::from_minutes(5))
    );

    let completed = outcome
        .events
        .iter()
        .find_map(|event| match &event.kind {
            EventKind::CraftingCompleted { item, .. } => Some(item.clone()),
            _ => None,
        })
        .expect("first job completed");
    assert!(outcome.state.entities.contains_key(&completed));
    assert!(outcome.events.iter().any(|event| matches!(
        &event.kind,
        EventKind::CraftingStarted { recipe, .. } if recipe.as_str() == "dagger-b"
    )));
}

#[test]
fn freed_adventurer_is_redispatched_in_the_same_pass() {
    let mut config = SimConfig::default();
    config.doctrine = AutoSelectDoctrine::FirstAvailable;
    let rng = FixedRng::face(20);
    let env = Env::new(&config).with_rng(&rng);

    let mut world = WorldState::new("p1", Timestamp::EPOCH);
    world.insert(adventurer("adv-1"));
    world.insert(offer("mission-1", 10, RoleKind::Scout));
    world.insert(offer("mission-2", 10, RoleKind::Scout));
    let outcome = execute(
        &guild_core::StartMission {
            mission: EntityId::from("mission-1"),
            adventurer: EntityId::from("adv-1"),
        },
        &mut world.entities,
        &mut world.resources,
        Timestamp::EPOCH,
        &env,
    )
    .unwrap();
    assert!(outcome.is_performed());

    // Mission runs 5 minutes; jump to 6. Resolution frees the adventurer
    // and auto-selection sends them straight onto the second offer.
    let pass = process_idle_progression(
        &world,
        Timestamp::EPOCH + Duration::from_minutes(6),
        &env,
    )
    .unwrap();
    assert!(pass.errors.is_empty(), "{:?}", pass.errors);

    let second = pass.state.entities.get(&EntityId::from("mission-2")).unwrap();
    assert_eq!(second.as_mission().unwrap().state, MissionState::InProgress);
    assert_eq!(
        second.as_mission().unwrap().assignee,
        Some(EntityId::from("adv-1"))
    );
    assert!(pass.events.iter().any(|event| matches!(
        &event.kind,
        EventKind::MissionResolved { mission, .. } if mission.as_str() == "mission-1"
    )));
    assert!(pass.events.iter().any(|event| matches!(
        &event.kind,
        EventKind::MissionStarted { mission, .. } if mission.as_str() == "mission-2"
    )));
}

#[test]
fn follow_on_mission_starts_at_the_freeing_instant() {
    let mut config = SimConfig::default();
    config.doctrine = AutoSelectDoctrine::FirstAvailable;
    let rng = FixedRng::face(20);
    let env = Env::new(&config).with_rng(&rng);

    let mut world = WorldState::new("p1", Timestamp::EPOCH);
    world.insert(adventurer("adv-1"));
    world.insert(offer("mission-1", 10, RoleKind::Scout));
    world.insert(offer("mission-2", 10, RoleKind::Scout));
    let outcome = execute(
        &guild_core::StartMission {
            mission: EntityId::from("mission-1"),
            adventurer: EntityId::from("adv-1"),
        },
        &mut world.entities,
        &mut world.resources,
        Timestamp::EPOCH,
        &env,
    )
    .unwrap();
    assert!(outcome.is_performed());

    // One ten-minute jump versus a stop at the five-minute boundary.
    let horizon = Timestamp::EPOCH + Duration::from_minutes(10);
    let jumped = process_idle_progression(&world, horizon, &env).unwrap();
    assert!(jumped.errors.is_empty(), "{:?}", jumped.errors);

    let halfway = process_idle_progression(
        &world,
        Timestamp::EPOCH + Duration::from_minutes(5),
        &env,
    )
    .unwrap();
    let stepped = process_idle_progression(&halfway.state, horizon, &env).unwrap();
    assert_eq!(jumped.state, stepped.state);

    // The follow-on run is stamped at the first resolution's instant, so
    // it came due (and resolved) inside the same window.
    let second = jumped.state.entities.get(&EntityId::from("mission-2")).unwrap();
    assert_eq!(second.as_mission().unwrap().state, MissionState::Completed);
    assert_eq!(
        second.timer(TimerKey::StartedAt),
        Some(Timestamp::EPOCH + Duration::from_minutes(5))
    );
    assert_eq!(second.timer(TimerKey::EndsAt), Some(horizon));
}

#[test]
fn best_synergy_doctrine_prefers_matching_role_and_tags() {
    let mut config = SimConfig::default();
    config.doctrine = AutoSelectDoctrine::BestSynergy;
    let rng = PcgRng;
    let env = Env::new(&config).with_rng(&rng);

    let mut world = WorldState::new("p1", Timestamp::EPOCH);
    world.insert(adventurer("adv-1").with_tags(["forest"]));
    // Lower id, but wrong role and no shared tags.
    world.insert(offer("mission-a", 10, RoleKind::Warden));
    world.insert(offer("mission-b", 10, RoleKind::Scout).with_tags(["forest"]));

    let pass = process_idle_progression(&world, Timestamp::from_millis(1), &env).unwrap();
    let picked = pass.state.entities.get(&EntityId::from("mission-b")).unwrap();
    assert_eq!(picked.as_mission().unwrap().state, MissionState::InProgress);
    let skipped = pass.state.entities.get(&EntityId::from("mission-a")).unwrap();
    assert_eq!(skipped.as_mission().unwrap().state, MissionState::Available);
}

#[test]
fn stale_offers_expire_during_the_mission_phase() {
    let config = SimConfig::default();
    let env = Env::new(&config);

    let mut world = WorldState::new("p1", Timestamp::EPOCH);
    let stale = offer("mission-old", 10, RoleKind::Scout)
        .with_timer(TimerKey::ExpiresAt, Timestamp::from_millis(30_000));
    let fresh = offer("mission-new", 10, RoleKind::Scout)
        .with_timer(TimerKey::ExpiresAt, Timestamp::from_millis(300_000));
    world.insert(stale);
    world.insert(fresh);

    let pass =
        process_idle_progression(&world, Timestamp::from_millis(60_000), &env).unwrap();
    let old = pass.state.entities.get(&EntityId::from("mission-old")).unwrap();
    assert_eq!(old.as_mission().unwrap().state, MissionState::Expired);
    let new = pass.state.entities.get(&EntityId::from("mission-new")).unwrap();
    assert_eq!(new.as_mission().unwrap().state, MissionState::Available);

    let expiry = pass
        .events
        .iter()
        .find(|event| matches!(&event.kind, EventKind::MissionExpired { .. }))
        .expect("expiry event");
    // Stamped at the deadline, not at the catch-up instant.
    assert_eq!(expiry.at, Timestamp::from_millis(30_000));
}

#[test]
fn one_corrupt_mission_does_not_stall_the_rest() {
    let mut config = SimConfig::default();
    config.doctrine = AutoSelectDoctrine::Off;
    let rng = PcgRng;
    let env = Env::new(&config).with_rng(&rng);

    let mut world = WorldState::new("p1", Timestamp::EPOCH);
    // An in-progress mission with timers but no assignee: resolution hits
    // an invariant error.
    let mut broken = offer("mission-broken", 10, RoleKind::Scout)
        .with_timer(TimerKey::StartedAt, Timestamp::EPOCH)
        .with_timer(TimerKey::EndsAt, Timestamp::from_millis(1_000));
    broken
        .set_state(guild_core::StateLabel::Mission(MissionState::InProgress))
        .unwrap();
    world.insert(broken);

    let mut slot = Entity::new(
        EntityId::from("slot-1"),
        EntityKind::ResourceSlot(ResourceSlot::new(ResourceKind::Gold, 6.0)),
    );
    slot.as_slot_mut().unwrap().assignee = SlotAssignee::Player;
    world.insert(slot);

    let pass =
        process_idle_progression(&world, Timestamp::from_millis(60_000), &env).unwrap();
    assert_eq!(pass.errors.len(), 1);
    assert!(pass.errors[0].contains("mission-broken"));
    // The slot phase still ran: 6/min over a minute.
    assert_eq!(pass.state.resources.amount(ResourceKind::Gold), 6);
    assert_eq!(pass.state.last_simulated_at, Timestamp::from_millis(60_000));
}

#[test]
fn time_cannot_run_backwards() {
    let config = SimConfig::default();
    let env = Env::new(&config);
    let mut world = WorldState::new("p1", Timestamp::from_millis(10_000));
    world.insert(adventurer("adv-1"));

    let err = process_idle_progression(&world, Timestamp::from_millis(9_999), &env).unwrap_err();
    assert_eq!(
        err,
        IdleError::TimeWentBackwards {
            last: Timestamp::from_millis(10_000),
            now: Timestamp::from_millis(9_999),
        }
    );
}

#[test]
fn denied_auto_selection_leaves_no_trace() {
    // Two adventurers, one offer: the second dispatch is denied and the
    // pass reports no error for it.
    let mut config = SimConfig::default();
    config.doctrine = AutoSelectDoctrine::FirstAvailable;
    let rng = PcgRng;
    let env = Env::new(&config).with_rng(&rng);

    let mut world = WorldState::new("p1", Timestamp::EPOCH);
    world.insert(adventurer("adv-1"));
    world.insert(adventurer("adv-2"));
    world.insert(offer("mission-1", 10, RoleKind::Scout));

    let pass = process_idle_progression(&world, Timestamp::from_millis(1), &env).unwrap();
    assert!(pass.errors.is_empty());

    let first = pass.state.entities.get(&EntityId::from("adv-1")).unwrap();
    assert_eq!(
        first.as_adventurer().unwrap().state,
        AdventurerState::OnMission
    );
    let second = pass.state.entities.get(&EntityId::from("adv-2")).unwrap();
    assert_eq!(second.as_adventurer().unwrap().state, AdventurerState::Idle);
    let starts = pass
        .events
        .iter()
        .filter(|event| matches!(&event.kind, EventKind::MissionStarted { .. }))
        .count();
    assert_eq!(starts, 1);
}

#[test]
fn catastrophic_run_pays_nothing_through_the_loop() {
    let mut config = SimConfig::default();
    config.doctrine = AutoSelectDoctrine::Off;
    let rng = FixedRng::face(1);
    let env = Env::new(&config).with_rng(&rng);

    let mut world = WorldState::new("p1", Timestamp::EPOCH);
    world.insert(adventurer("adv-1"));
    // Wrong role, no shared tags: d20=1, agility +2 -> 3 vs dc 16 - band 10.
    world.insert(offer("mission-1", 16, RoleKind::Warden));
    let outcome = execute(
        &guild_core::StartMission {
            mission: EntityId::from("mission-1"),
            adventurer: EntityId::from("adv-1"),
        },
        &mut world.entities,
        &mut world.resources,
        Timestamp::EPOCH,
        &env,
    )
    .unwrap();
    assert!(outcome.is_performed());

    let pass = process_idle_progression(
        &world,
        Timestamp::EPOCH + Duration::from_minutes(6),
        &env,
    )
    .unwrap();
    assert!(pass.errors.is_empty(), "{:?}", pass.errors);

    // No gold, no xp, but the adventurer is back in the pool.
    assert_eq!(pass.state.resources.amount(ResourceKind::Gold), 0);
    let adv = pass.state.entities.get(&EntityId::from("adv-1")).unwrap();
    assert_eq!(adv.as_adventurer().unwrap().state, AdventurerState::Idle);
    assert_eq!(adv.as_adventurer().unwrap().xp, 0);

    let resolved = pass
        .events
        .iter()
        .find(|event| matches!(&event.kind, EventKind::MissionResolved { .. }))
        .expect("resolution event");
    assert_eq!(resolved.at, Timestamp::EPOCH + Duration::from_minutes(5));
    let EventKind::MissionResolved { outcome, rewards, .. } = &resolved.kind else {
        unreachable!();
    };
    assert_eq!(*outcome, OutcomeBand::CriticalFailure);
    assert!(rewards.is_empty());
}

#[test]
fn denied_verb_leaves_the_world_untouched() {
    let config = SimConfig::default();
    let env = Env::new(&config);

    let mut world = WorldState::new("p1", Timestamp::EPOCH);
    world.insert(adventurer("adv-1"));
    world.insert(offer("mission-1", 10, RoleKind::Scout));
    world.insert(offer("mission-2", 10, RoleKind::Scout));
    let outcome = execute(
        &guild_core::StartMission {
            mission: EntityId::from("mission-1"),
            adventurer: EntityId::from("adv-1"),
        },
        &mut world.entities,
        &mut world.resources,
        Timestamp::EPOCH,
        &env,
    )
    .unwrap();
    assert!(outcome.is_performed());

    // The adventurer is already away; the second dispatch must bounce off
    // without a scratch on the world.
    let before = world.clone();
    let denied = execute(
        &guild_core::StartMission {
            mission: EntityId::from("mission-2"),
            adventurer: EntityId::from("adv-1"),
        },
        &mut world.entities,
        &mut world.resources,
        Timestamp::from_millis(1_000),
        &env,
    )
    .unwrap();
    assert!(!denied.is_performed());
    assert!(denied.events().is_empty());
    assert_eq!(world, before);
}

/// A test archetype oracle plus `PostMissionOffer` exercises the whole
/// offer lifecycle: post, ignore, expire.
#[test]
fn posted_offer_expires_if_nobody_takes_it() {
    let config = SimConfig::default();
    let archetypes = Archetypes(vec![MissionArchetype {
        id: ArchetypeId::from("patrol"),
        name: "Forest patrol".into(),
        dc: 8,
        base_duration: Duration::from_minutes(5),
        rewards: ResourceBundle::from_units([ResourceUnit::new(ResourceKind::Gold, 5)]),
        xp_reward: 10,
        preferred_role: RoleKind::Scout,
        tags: vec!["forest".into()],
        offer_ttl: Duration::from_minutes(2),
    }]);
    let env = Env::new(&config).with_archetypes(&archetypes);

    let mut world = WorldState::new("p1", Timestamp::EPOCH);
    let outcome = execute(
        &guild_core::PostMissionOffer {
            mission: EntityId::from("mission-1"),
            archetype: ArchetypeId::from("patrol"),
        },
        &mut world.entities,
        &mut world.resources,
        Timestamp::EPOCH,
        &env,
    )
    .unwrap();
    assert!(outcome.is_performed());

    let pass = process_idle_progression(
        &world,
        Timestamp::EPOCH + Duration::from_minutes(3),
        &env,
    )
    .unwrap();
    let mission = pass.state.entities.get(&EntityId::from("mission-1")).unwrap();
    assert_eq!(mission.as_mission().unwrap().state, MissionState::Expired);
}
