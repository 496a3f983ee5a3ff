//! Resource slot generation formulas.
//!
//! The fractional accumulator is the mechanism that guarantees no resource
//! leakage across irregular tick intervals: fractional production carries
//! forward in metadata, only whole floored units are ever credited.

use crate::config::SimConfig;
use crate::state::SlotAssignee;
use crate::value::Duration;

/// Rate multiplier for whoever works the slot. An unassigned slot produces
/// nothing (the generation pass skips it before this is consulted).
pub fn worker_multiplier(assignee: &SlotAssignee, config: &SimConfig) -> f64 {
    match assignee {
        SlotAssignee::None => 0.0,
        SlotAssignee::Player => config.player_worker_multiplier,
        SlotAssignee::Adventurer(_) => config.adventurer_worker_multiplier,
    }
}

/// Rate multiplier from the linked facility's tier: `1 + step * (tier - 1)`.
/// Slots with no facility link use tier 1.
pub fn facility_multiplier(tier: u8, config: &SimConfig) -> f64 {
    1.0 + config.facility_multiplier_step * (tier.saturating_sub(1)) as f64
}

/// Result of advancing a slot's accumulator over an elapsed interval.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotAccrual {
    /// Whole units to credit this tick.
    pub credited: u64,
    /// Fraction carried to the next tick.
    pub remainder: f64,
}

/// Advances the accumulator: `accumulator + rate * elapsed_minutes`, split
/// into floored whole units and a persistent remainder.
pub fn accrue(
    accumulator: f64,
    base_rate_per_minute: f64,
    worker_mult: f64,
    facility_mult: f64,
    elapsed: Duration,
) -> SlotAccrual {
    let effective_rate = base_rate_per_minute * worker_mult * facility_mult;
    let total = accumulator + effective_rate * elapsed.as_minutes_f64();
    let credited = total.floor().max(0.0) as u64;
    SlotAccrual {
        credited,
        remainder: total - credited as f64,
    }
}
