//! Offline catch-up: advancing the world from its last simulated instant
//! to `now`.
//!
//! The loop never reads a clock and never draws fresh randomness: every
//! phase works from stored timers, metadata accumulators, and seeds derived
//! from state. That is what makes one ten-minute call produce the same
//! world as six hundred one-second calls.
//!
//! The input state is never mutated. All phases run against a clone, so a
//! caller that hits an error can retry from the same previous state.

mod crafting;
mod missions;
pub(crate) mod slots;

use crate::action::{ActionError, ActionOutcome};
use crate::env::Env;
use crate::event::DomainEvent;
use crate::state::WorldState;
use crate::value::Timestamp;

/// Errors that abort the whole progression pass.
///
/// Per-entity trouble inside a phase never lands here; it is downgraded to
/// the outcome's `errors`/`warnings` so one corrupt mission cannot freeze
/// the rest of the guild.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IdleError {
    #[error("now {now} is before the last simulated instant {last}")]
    TimeWentBackwards { last: Timestamp, now: Timestamp },
}

/// Result of one progression pass.
#[derive(Clone, Debug)]
pub struct IdleOutcome {
    /// The advanced world, `last_simulated_at` bumped to `now`.
    pub state: WorldState,
    /// Facts that became true during the pass, in occurrence order.
    pub events: Vec<DomainEvent>,
    /// Non-fatal oddities, e.g. a slot worker id that no longer resolves.
    pub warnings: Vec<String>,
    /// Downgraded invariant violations from individual phase steps.
    pub errors: Vec<String>,
}

/// Collects events and downgraded failures across the phases.
#[derive(Debug, Default)]
pub(crate) struct Progress {
    pub events: Vec<DomainEvent>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl Progress {
    /// Folds a verb execution into the pass: performed verbs contribute
    /// their events, denials are skipped silently (the world simply was not
    /// in a state for that step), errors are collected.
    fn record(&mut self, result: Result<ActionOutcome, ActionError>) {
        match result {
            Ok(ActionOutcome::Performed { events, .. }) => self.events.extend(events),
            Ok(ActionOutcome::Denied { .. }) => {}
            Err(err) => {
                tracing::warn!(error = %err, "idle phase step failed");
                self.errors.push(err.to_string());
            }
        }
    }
}

/// Advances a world to `now` through the fixed phase order: missions
/// (expiry, resolution, and auto-selection interleaved in time order),
/// crafting advancement, resource slot generation. An adventurer freed by
/// a resolution is re-dispatched at the freeing instant, in the same pass.
pub fn process_idle_progression(
    state: &WorldState,
    now: Timestamp,
    env: &Env<'_>,
) -> Result<IdleOutcome, IdleError> {
    if now < state.last_simulated_at {
        return Err(IdleError::TimeWentBackwards {
            last: state.last_simulated_at,
            now,
        });
    }

    let mut world = state.clone();
    let mut progress = Progress::default();

    missions::advance(&mut world, state.last_simulated_at, now, env, &mut progress);
    crafting::advance(&mut world, now, env, &mut progress);
    slots::generate(&mut world, now, env, &mut progress);

    world.last_simulated_at = now;
    tracing::debug!(
        player = %world.player_id,
        events = progress.events.len(),
        warnings = progress.warnings.len(),
        errors = progress.errors.len(),
        "idle progression complete"
    );
    Ok(IdleOutcome {
        state: world,
        events: progress.events,
        warnings: progress.warnings,
        errors: progress.errors,
    })
}
