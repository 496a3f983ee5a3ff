//! Crafting duration formulas.

use crate::config::SimConfig;
use crate::value::Duration;

use super::slots::facility_multiplier;

/// Crafting time for a recipe at a given workshop tier.
///
/// Higher tiers divide the base duration by the facility multiplier,
/// floored to whole milliseconds.
pub fn effective_craft_duration(base: Duration, workshop_tier: u8, config: &SimConfig) -> Duration {
    let multiplier = facility_multiplier(workshop_tier, config);
    base.scaled(1.0 / multiplier)
}
