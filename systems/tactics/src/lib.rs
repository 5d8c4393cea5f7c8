#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tactical layer that turns a level snapshot into the player's next action.
//!
//! Every decision starts in [`TacticalState::Idle`] and cascades through
//! [`advance`] until a state settles on an [`Action`]. The [`Pilot`] owns the
//! only data that survives between turns: the monster currently hunted and the
//! item currently worn.

mod state;

use roguepilot_core::{Action, ItemSnapshot, LevelView, MonsterId};
use roguepilot_system_objective::ObjectiveTuning;
use roguepilot_system_threat::ThreatTuning;
use serde::Deserialize;

pub use state::{advance, TacticalState, Transition, Turn};

/// Tuning for the whole decision engine.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PilotConfig {
    /// Health the player regains up to; below it health packs are sought.
    pub health_maximum: i32,
    /// A hunted target is dropped when another monster comes this close.
    pub retarget_radius: u32,
    /// Damage prediction tuning.
    pub threat: ThreatTuning,
    /// Item ranking tuning.
    pub objective: ObjectiveTuning,
}

impl Default for PilotConfig {
    fn default() -> Self {
        Self {
            health_maximum: 100,
            retarget_radius: 2,
            threat: ThreatTuning::default(),
            objective: ObjectiveTuning::default(),
        }
    }
}

/// Decisions carried from one turn to the next.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StickyState {
    /// Monster being hunted.
    pub target: Option<MonsterId>,
    /// Item worn by the player when the turn started.
    pub equipped: Option<ItemSnapshot>,
}

impl StickyState {
    /// Reconciles the state with a fresh snapshot.
    ///
    /// The target is dropped once it is gone, or as soon as any other monster
    /// comes within `retarget_radius` of the player.
    #[must_use]
    pub fn refreshed(self, level: &LevelView, retarget_radius: u32) -> Self {
        let origin = level.player().location;
        let target = self.target.filter(|id| {
            level.monster(*id).is_some()
                && !level.monsters().iter().any(|monster| {
                    monster.id != *id && origin.distance_to(monster.location) <= retarget_radius
                })
        });

        if target != self.target {
            tracing::debug!(dropped = ?self.target, "target released");
        }

        Self {
            target,
            equipped: level.player().equipped,
        }
    }
}

/// Agent answering one action per turn.
#[derive(Clone, Debug, Default)]
pub struct Pilot {
    config: PilotConfig,
    sticky: StickyState,
}

impl Pilot {
    /// Creates a pilot with no target and nothing equipped.
    #[must_use]
    pub fn new(config: PilotConfig) -> Self {
        Self {
            config,
            sticky: StickyState::default(),
        }
    }

    /// State carried over from previous turns.
    #[must_use]
    pub const fn sticky(&self) -> &StickyState {
        &self.sticky
    }

    /// Reconciles the sticky state with the snapshot of a new turn.
    pub fn refresh(&mut self, level: &LevelView) {
        self.sticky = self.sticky.refreshed(level, self.config.retarget_radius);
    }

    /// Decides the action for the turn captured by the snapshot.
    pub fn decide(&mut self, level: &LevelView) -> Action {
        self.refresh(level);

        let turn = Turn::new(level, &self.config);
        let mut state = TacticalState::Idle;
        loop {
            tracing::trace!(state = state.name(), "evaluating state");
            let (transition, sticky) = advance(state, &turn, self.sticky);
            self.sticky = sticky;

            match transition {
                Transition::Act(action) => {
                    tracing::debug!(?action, target = ?self.sticky.target, "turn decided");
                    return action;
                }
                Transition::Goto(next) => {
                    tracing::debug!(next = next.name(), "state transition");
                    state = next;
                }
            }
        }
    }
}
