//! Simulation tuning parameters.

/// Doctrine the idle loop follows when assigning idle adventurers to open
/// mission offers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AutoSelectDoctrine {
    /// Never auto-assign; missions start only through the player verb.
    Off,
    /// First idle adventurer takes the first open offer, in id order.
    #[default]
    FirstAvailable,
    /// Each idle adventurer takes the open offer with the highest synergy
    /// bonus for them, ties broken by mission id order.
    BestSynergy,
}

/// Balance parameters threaded through the environment.
///
/// Everything the resolution and generation formulas read lives here so a
/// test (or a rebalance) swaps numbers without touching rules code.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Distance from the DC that widens a band: `dc + width` crits,
    /// `dc - width` still salvages half rewards.
    pub outcome_band_width: i32,
    pub critical_success_multiplier: f64,
    pub success_multiplier: f64,
    pub failure_multiplier: f64,

    /// Slot rate multiplier when the player works the slot.
    pub player_worker_multiplier: f64,
    /// Slot rate multiplier when an adventurer works the slot.
    pub adventurer_worker_multiplier: f64,
    /// Per-tier bonus step for facility multipliers: `1 + step * (tier-1)`.
    pub facility_multiplier_step: f64,

    /// Mission duration discount per adventurer level beyond the first.
    pub duration_discount_per_level: f64,
    /// Lower bound on the duration discount factor.
    pub duration_discount_floor: f64,

    /// Xp per level step: reaching level n takes `(n - 1) * xp_per_level`.
    pub xp_per_level: u64,
    pub max_level: u8,

    pub doctrine: AutoSelectDoctrine,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            outcome_band_width: 10,
            critical_success_multiplier: 1.5,
            success_multiplier: 1.0,
            failure_multiplier: 0.5,
            player_worker_multiplier: 1.0,
            adventurer_worker_multiplier: 1.5,
            facility_multiplier_step: 0.25,
            duration_discount_per_level: 0.05,
            duration_discount_floor: 0.5,
            xp_per_level: 100,
            max_level: 20,
            doctrine: AutoSelectDoctrine::default(),
        }
    }
}
