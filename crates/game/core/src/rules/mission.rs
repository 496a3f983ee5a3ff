//! Mission resolution formulas.
//!
//! Pure helpers over [`SimConfig`] parameters: roll totals, outcome bands,
//! reward scaling, and duration modifiers. Nothing here draws randomness —
//! the die face arrives as an argument so tests can force any band.

use crate::config::SimConfig;
use crate::state::Entity;
use crate::value::{Duration, ResourceBundle};

/// Resolution outcome bands, widest success first.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum OutcomeBand {
    CriticalSuccess,
    Success,
    Failure,
    CriticalFailure,
}

impl OutcomeBand {
    /// Reward scaling factor for this band.
    pub fn reward_multiplier(self, config: &SimConfig) -> f64 {
        match self {
            OutcomeBand::CriticalSuccess => config.critical_success_multiplier,
            OutcomeBand::Success => config.success_multiplier,
            OutcomeBand::Failure => config.failure_multiplier,
            OutcomeBand::CriticalFailure => 0.0,
        }
    }
}

/// Total for a resolution check: die face plus the adventurer's primary
/// ability modifier plus synergy.
pub fn roll_total(die_face: u32, primary_modifier: i32, synergy: i32) -> i32 {
    die_face as i32 + primary_modifier + synergy
}

/// Synergy bonus between an adventurer and a mission: +1 for a preferred
/// role match, +1 per tag the two entities share.
///
/// Returns 0 when either entity is not of the expected kind; the caller's
/// requirements should have ruled that out.
pub fn synergy_bonus(adventurer: &Entity, mission: &Entity) -> i32 {
    let (Some(attrs), Some(mission_attrs)) = (adventurer.as_adventurer(), mission.as_mission())
    else {
        return 0;
    };
    let role_match = i32::from(attrs.role == mission_attrs.preferred_role);
    let shared_tags = adventurer.tags.intersection(&mission.tags).count() as i32;
    role_match + shared_tags
}

/// Buckets a roll total against the difficulty class.
pub fn outcome_band(total: i32, dc: i32, config: &SimConfig) -> OutcomeBand {
    let width = config.outcome_band_width;
    if total >= dc + width {
        OutcomeBand::CriticalSuccess
    } else if total >= dc {
        OutcomeBand::Success
    } else if total >= dc - width {
        OutcomeBand::Failure
    } else {
        OutcomeBand::CriticalFailure
    }
}

/// Scales base rewards by the band multiplier, flooring per resource kind.
pub fn scaled_rewards(
    base: &ResourceBundle,
    band: OutcomeBand,
    config: &SimConfig,
) -> ResourceBundle {
    base.scaled(band.reward_multiplier(config))
}

/// Xp earned for a resolution, scaled and floored like rewards. A critical
/// failure earns nothing.
pub fn xp_gain(xp_reward: u64, band: OutcomeBand, config: &SimConfig) -> u64 {
    (xp_reward as f64 * band.reward_multiplier(config)).floor() as u64
}

/// Level implied by a cumulative xp total: one level per `xp_per_level`,
/// capped at `max_level`.
pub fn level_for_xp(xp: u64, config: &SimConfig) -> u8 {
    let steps = if config.xp_per_level == 0 {
        0
    } else {
        xp / config.xp_per_level
    };
    let level = 1u64 + steps;
    level.min(config.max_level as u64) as u8
}

/// Mission duration after the adventurer's level discount.
///
/// Each level beyond the first shaves `duration_discount_per_level`, never
/// below the configured floor.
pub fn effective_duration(base: Duration, adventurer_level: u8, config: &SimConfig) -> Duration {
    let levels_beyond_first = adventurer_level.saturating_sub(1) as f64;
    let factor = (1.0 - config.duration_discount_per_level * levels_beyond_first)
        .max(config.duration_discount_floor);
    base.scaled(factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Adventurer, Entity, EntityKind, Mission, RoleKind};
    use crate::value::{AbilityKind, EntityId, ResourceKind, ResourceUnit, StatMap};

    fn config() -> SimConfig {
        SimConfig::default()
    }

    #[test]
    fn band_edges_are_inclusive() {
        let config = config();
        let dc = 15;
        assert_eq!(outcome_band(25, dc, &config), OutcomeBand::CriticalSuccess);
        assert_eq!(outcome_band(24, dc, &config), OutcomeBand::Success);
        assert_eq!(outcome_band(15, dc, &config), OutcomeBand::Success);
        assert_eq!(outcome_band(14, dc, &config), OutcomeBand::Failure);
        assert_eq!(outcome_band(5, dc, &config), OutcomeBand::Failure);
        assert_eq!(outcome_band(4, dc, &config), OutcomeBand::CriticalFailure);
    }

    #[test]
    fn critical_success_rewards_are_floored_at_one_and_a_half() {
        let base = ResourceBundle::from_units([
            ResourceUnit::new(ResourceKind::Gold, 5),
            ResourceUnit::new(ResourceKind::Fame, 1),
        ]);
        let rewards = scaled_rewards(&base, OutcomeBand::CriticalSuccess, &config());
        assert_eq!(rewards.amount(ResourceKind::Gold), 7);
        assert_eq!(rewards.amount(ResourceKind::Fame), 1);
    }

    #[test]
    fn critical_failure_pays_nothing() {
        let base = ResourceBundle::from_units([ResourceUnit::new(ResourceKind::Gold, 100)]);
        assert!(scaled_rewards(&base, OutcomeBand::CriticalFailure, &config()).is_empty());
        assert_eq!(xp_gain(80, OutcomeBand::CriticalFailure, &config()), 0);
    }

    #[test]
    fn synergy_counts_role_and_shared_tags() {
        let adventurer = Entity::new(
            EntityId::from("adv"),
            EntityKind::Adventurer(Adventurer::new(
                RoleKind::Scout,
                AbilityKind::Agility,
                StatMap::new(),
            )),
        )
        .with_tags(["forest", "night", "swift"]);
        let mission = Entity::new(
            EntityId::from("mis"),
            EntityKind::Mission(Mission::offer(
                12,
                Duration::from_minutes(5),
                ResourceBundle::new(),
                10,
                RoleKind::Scout,
            )),
        )
        .with_tags(["forest", "night"]);

        // +1 role, +2 shared tags
        assert_eq!(synergy_bonus(&adventurer, &mission), 3);
    }

    #[test]
    fn level_thresholds() {
        let config = config();
        assert_eq!(level_for_xp(0, &config), 1);
        assert_eq!(level_for_xp(99, &config), 1);
        assert_eq!(level_for_xp(100, &config), 2);
        assert_eq!(level_for_xp(10_000, &config), config.max_level);
    }

    #[test]
    fn duration_discount_floors_at_half() {
        let config = config();
        let base = Duration::from_minutes(10);
        assert_eq!(effective_duration(base, 1, &config), base);
        assert_eq!(
            effective_duration(base, 3, &config),
            Duration::from_millis(540_000)
        );
        // Deep levels bottom out at the floor.
        assert_eq!(
            effective_duration(base, 20, &config),
            Duration::from_millis(300_000)
        );
    }
}
