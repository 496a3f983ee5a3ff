//! Mission entities.

use crate::value::{Duration, EntityId, ResourceBundle};

use super::adventurer::RoleKind;
use super::{TimerKey, Timers, TransitionError};

/// Mission offer state machine.
///
/// `Available -> InProgress -> Completed`, with `Expired` reachable from
/// either live state (stale offers and abandoned runs).
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum MissionState {
    Available,
    InProgress,
    Completed,
    Expired,
}

/// Attribute payload of a mission entity.
///
/// Timing lives in the entity's timers (`StartedAt`, `EndsAt`, `ExpiresAt`),
/// not here: resolution is defined purely in terms of stored instants
/// compared against the injected `now`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mission {
    /// Difficulty class the resolution roll is checked against.
    pub dc: i32,
    pub base_duration: Duration,
    /// Rewards at the 1.0x band; the outcome band scales and floors these.
    pub rewards: ResourceBundle,
    pub xp_reward: u64,
    pub preferred_role: RoleKind,
    /// Adventurer currently running the mission, if in progress.
    pub assignee: Option<EntityId>,
    pub state: MissionState,
}

impl Mission {
    pub fn offer(
        dc: i32,
        base_duration: Duration,
        rewards: ResourceBundle,
        xp_reward: u64,
        preferred_role: RoleKind,
    ) -> Self {
        Self {
            dc,
            base_duration,
            rewards,
            xp_reward,
            preferred_role,
            assignee: None,
            state: MissionState::Available,
        }
    }

    /// Validates and performs a state transition.
    ///
    /// Entering `InProgress` requires both `StartedAt` and `EndsAt` timers to
    /// already be present on the entity, so the timer effects must be emitted
    /// before the state transition effect.
    pub(super) fn transition(
        &mut self,
        to: MissionState,
        timers: &Timers,
    ) -> Result<(), TransitionError> {
        let legal = matches!(
            (self.state, to),
            (MissionState::Available, MissionState::InProgress)
                | (MissionState::Available, MissionState::Expired)
                | (MissionState::InProgress, MissionState::Completed)
                | (MissionState::InProgress, MissionState::Expired)
        );
        if !legal {
            return Err(TransitionError::illegal("mission", self.state, to));
        }
        if to == MissionState::InProgress
            && (!timers.contains_key(&TimerKey::StartedAt)
                || !timers.contains_key(&TimerKey::EndsAt))
        {
            return Err(TransitionError::MissingMissionTimers);
        }
        self.state = to;
        Ok(())
    }
}
