//! Content tables and their oracle implementations.

use guild_core::{
    ArchetypeId, ArchetypeOracle, Duration, EquipSlot, FacilityKind, FacilityOracle,
    MissionArchetype, Recipe, RecipeId, RecipeOracle, ResourceBundle, ResourceKind, ResourceUnit,
    RoleKind,
};

/// Tier progression for one facility kind.
///
/// `upgrade_costs[n]` is the price of going from tier `n + 1` to `n + 2`;
/// the list is `max_tier - 1` entries long.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FacilityProgression {
    pub kind: FacilityKind,
    pub max_tier: u8,
    pub upgrade_costs: Vec<Vec<ResourceUnit>>,
}

/// One bundle of static content: archetypes, recipes, and facility
/// progressions. Implements every content oracle the core consumes.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentTables {
    pub archetypes: Vec<MissionArchetype>,
    pub recipes: Vec<Recipe>,
    pub facilities: Vec<FacilityProgression>,
}

impl ContentTables {
    /// The built-in starter table set: enough content to run a guild
    /// without any data files.
    pub fn builtin() -> Self {
        Self {
            archetypes: builtin_archetypes(),
            recipes: builtin_recipes(),
            facilities: builtin_facilities(),
        }
    }

    fn progression(&self, kind: FacilityKind) -> Option<&FacilityProgression> {
        self.facilities.iter().find(|entry| entry.kind == kind)
    }
}

impl ArchetypeOracle for ContentTables {
    fn archetype(&self, id: &ArchetypeId) -> Option<&MissionArchetype> {
        self.archetypes.iter().find(|entry| entry.id == *id)
    }
}

impl RecipeOracle for ContentTables {
    fn recipe(&self, id: &RecipeId) -> Option<&Recipe> {
        self.recipes.iter().find(|entry| entry.id == *id)
    }
}

impl FacilityOracle for ContentTables {
    fn max_tier(&self, kind: FacilityKind) -> u8 {
        self.progression(kind).map_or(1, |entry| entry.max_tier)
    }

    fn upgrade_cost(&self, kind: FacilityKind, current_tier: u8) -> Option<Vec<ResourceUnit>> {
        let progression = self.progression(kind)?;
        if current_tier == 0 || current_tier >= progression.max_tier {
            return None;
        }
        progression
            .upgrade_costs
            .get(usize::from(current_tier - 1))
            .cloned()
    }
}

fn gold(amount: u64) -> ResourceUnit {
    ResourceUnit::new(ResourceKind::Gold, amount)
}

fn materials(amount: u64) -> ResourceUnit {
    ResourceUnit::new(ResourceKind::Materials, amount)
}

fn essence(amount: u64) -> ResourceUnit {
    ResourceUnit::new(ResourceKind::Essence, amount)
}

fn builtin_archetypes() -> Vec<MissionArchetype> {
    vec![
        MissionArchetype {
            id: ArchetypeId::from("rat-cellar"),
            name: "Rats in the cellar".into(),
            dc: 8,
            base_duration: Duration::from_minutes(5),
            rewards: ResourceBundle::from_units([gold(8)]),
            xp_reward: 15,
            preferred_role: RoleKind::Warden,
            tags: vec!["town".into(), "vermin".into()],
            offer_ttl: Duration::from_minutes(30),
        },
        MissionArchetype {
            id: ArchetypeId::from("bandit-camp"),
            name: "Clear the bandit camp".into(),
            dc: 13,
            base_duration: Duration::from_minutes(20),
            rewards: ResourceBundle::from_units([gold(30), materials(5)]),
            xp_reward: 45,
            preferred_role: RoleKind::Scout,
            tags: vec!["forest".into(), "outlaws".into()],
            offer_ttl: Duration::from_minutes(60),
        },
        MissionArchetype {
            id: ArchetypeId::from("haunted-crypt"),
            name: "Silence the haunted crypt".into(),
            dc: 16,
            base_duration: Duration::from_minutes(45),
            rewards: ResourceBundle::from_units([gold(50), essence(6)]),
            xp_reward: 80,
            preferred_role: RoleKind::Chaplain,
            tags: vec!["undead".into(), "night".into()],
            offer_ttl: Duration::from_minutes(120),
        },
        MissionArchetype {
            id: ArchetypeId::from("wyvern-hunt"),
            name: "Wyvern hunt".into(),
            dc: 19,
            base_duration: Duration::from_minutes(90),
            rewards: ResourceBundle::from_units([
                gold(120),
                essence(12),
                ResourceUnit::new(ResourceKind::Fame, 3),
            ]),
            xp_reward: 150,
            preferred_role: RoleKind::Arcanist,
            tags: vec!["mountains".into(), "beast".into()],
            offer_ttl: Duration::from_minutes(240),
        },
    ]
}

fn builtin_recipes() -> Vec<Recipe> {
    vec![
        Recipe {
            id: RecipeId::from("iron-sword"),
            name: "Iron sword".into(),
            cost: vec![materials(8), gold(5)],
            base_duration: Duration::from_minutes(15),
            output_slot: EquipSlot::Weapon,
            output_max_durability: 100,
            output_salvage: ResourceBundle::from_units([materials(3)]),
            output_tags: vec!["iron".into()],
        },
        Recipe {
            id: RecipeId::from("padded-armor"),
            name: "Padded armor".into(),
            cost: vec![materials(12)],
            base_duration: Duration::from_minutes(25),
            output_slot: EquipSlot::Armor,
            output_max_durability: 80,
            output_salvage: ResourceBundle::from_units([materials(4)]),
            output_tags: vec![],
        },
        Recipe {
            id: RecipeId::from("runed-blade"),
            name: "Runed blade".into(),
            cost: vec![materials(20), essence(4), gold(40)],
            base_duration: Duration::from_minutes(60),
            output_slot: EquipSlot::Weapon,
            output_max_durability: 150,
            output_salvage: ResourceBundle::from_units([materials(6), essence(1)]),
            output_tags: vec!["runed".into(), "arcane".into()],
        },
    ]
}

fn builtin_facilities() -> Vec<FacilityProgression> {
    vec![
        FacilityProgression {
            kind: FacilityKind::Guildhall,
            max_tier: 3,
            upgrade_costs: vec![vec![gold(100)], vec![gold(300), materials(20)]],
        },
        FacilityProgression {
            kind: FacilityKind::Workshop,
            max_tier: 5,
            upgrade_costs: vec![
                vec![gold(50), materials(10)],
                vec![gold(120), materials(25)],
                vec![gold(250), materials(50)],
                vec![gold(500), materials(100), essence(5)],
            ],
        },
        FacilityProgression {
            kind: FacilityKind::Mine,
            max_tier: 5,
            upgrade_costs: vec![
                vec![gold(40)],
                vec![gold(100), materials(15)],
                vec![gold(220), materials(35)],
                vec![gold(450), materials(80), essence(4)],
            ],
        },
    ]
}
