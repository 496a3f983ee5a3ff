//! Domain resolution formulas: pure functions over [`SimConfig`] numbers.
//!
//! [`crate::config::SimConfig`] carries the tunables; these modules carry
//! the shapes. No randomness, no time reads, no state mutation.

mod crafting;
mod mission;
mod slots;

pub use crafting::effective_craft_duration;
pub use mission::{
    OutcomeBand, effective_duration, level_for_xp, outcome_band, roll_total, scaled_rewards,
    synergy_bonus, xp_gain,
};
pub use slots::{SlotAccrual, accrue, facility_multiplier, worker_multiplier};
