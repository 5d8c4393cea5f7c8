#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that scores whether a straight run or a fight is survivable.

use roguepilot_core::{CellKind, LevelView, Location, MonsterSnapshot, ATTACK_OFFSETS};
use serde::Deserialize;

/// Tuning knobs for every damage prediction made by the agent.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ThreatTuning {
    /// Multiplier applied to the attack/defence ratio for damage the agent deals.
    pub dealt_damage_factor: f64,
    /// Multiplier applied to the attack/defence ratio for damage the agent receives.
    pub received_damage_factor: f64,
    /// Monsters within this many steps of a straight run threaten it.
    pub danger_radius: u32,
    /// Exchanges the agent must be able to absorb before engaging.
    pub hits_to_take: i32,
    /// Exchanges the agent must be able to absorb on the final level.
    pub final_level_hits_to_take: i32,
}

impl Default for ThreatTuning {
    fn default() -> Self {
        Self {
            dealt_damage_factor: 9.0,
            received_damage_factor: 10.0,
            danger_radius: 2,
            hits_to_take: 10,
            final_level_hits_to_take: 3,
        }
    }
}

/// Predicts the damage of one blow, rounding to the nearest hit point.
///
/// A non-positive defence is treated as one.
#[must_use]
pub fn predicted_damage(attack: i32, defence: i32, factor: f64) -> i32 {
    let defence = defence.max(1);
    (f64::from(attack) / f64::from(defence) * factor).round() as i32
}

/// Reports whether exactly one neighbouring cell can be stepped into.
#[must_use]
pub fn is_cornered(level: &LevelView, location: Location) -> bool {
    level.available_steps(location).count() == 1
}

/// Reports whether the exit is sealed off by non-floor cells, which marks the
/// final level of a run.
#[must_use]
pub fn is_final_level(level: &LevelView) -> bool {
    let Some(exit) = level.exit() else {
        return false;
    };

    ATTACK_OFFSETS
        .iter()
        .all(|offset| level.field().get(exit + *offset) != CellKind::Floor)
}

/// Evaluator applying a fixed [`ThreatTuning`] to level snapshots.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreatEvaluator {
    tuning: ThreatTuning,
}

impl ThreatEvaluator {
    /// Creates an evaluator with the provided tuning.
    #[must_use]
    pub const fn new(tuning: ThreatTuning) -> Self {
        Self { tuning }
    }

    /// Damage the player is expected to deal to the monster in one exchange.
    #[must_use]
    pub fn damage_to(&self, level: &LevelView, monster: &MonsterSnapshot) -> i32 {
        predicted_damage(
            level.player().total_attack(),
            monster.total_defence(),
            self.tuning.dealt_damage_factor,
        )
    }

    /// Damage the monster is expected to deal to the player in one exchange.
    #[must_use]
    pub fn damage_from(&self, level: &LevelView, monster: &MonsterSnapshot) -> i32 {
        predicted_damage(
            monster.total_attack(),
            level.player().total_defence(),
            self.tuning.received_damage_factor,
        )
    }

    /// Number of exchanges the player must survive before a fight is accepted.
    #[must_use]
    pub fn hits_to_take(&self, level: &LevelView) -> i32 {
        if is_final_level(level) {
            self.tuning.final_level_hits_to_take
        } else {
            self.tuning.hits_to_take
        }
    }

    /// Decides whether the player can take on the opponents.
    ///
    /// The weakest opponent (lowest health, then attack, then defence) is
    /// ignored when the player is expected to kill it in one exchange. The
    /// remaining incoming damage, scaled by [`Self::hits_to_take`], must stay
    /// strictly below the player's health.
    #[must_use]
    pub fn can_fight(&self, level: &LevelView, opponents: &[MonsterSnapshot]) -> bool {
        let weakest = opponents
            .iter()
            .enumerate()
            .min_by_key(|(_, monster)| (monster.health, monster.attack, monster.defence));

        let spared = match weakest {
            Some((index, monster)) if self.damage_to(level, monster) >= monster.health => {
                Some(index)
            }
            _ => None,
        };

        let incoming = opponents
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != spared)
            .map(|(_, monster)| self.damage_from(level, monster))
            .fold(0, i32::saturating_add);

        incoming.saturating_mul(self.hits_to_take(level)) < level.player().health
    }

    /// Damage predicted from every monster lurking within the danger radius of
    /// any of the cells.
    #[must_use]
    pub fn straight_run_damage(&self, level: &LevelView, cells: &[Location]) -> i32 {
        level
            .monsters()
            .iter()
            .filter(|monster| {
                cells
                    .iter()
                    .any(|cell| monster.location.distance_to(*cell) <= self.tuning.danger_radius)
            })
            .map(|monster| self.damage_from(level, monster))
            .fold(0, i32::saturating_add)
    }
}
