//! Tactical states and the pure transition between them.

use roguepilot_core::{
    Action, ItemSnapshot, LevelView, Location, MonsterSnapshot, Offset, STEP_OFFSETS,
};
use roguepilot_system_objective::{Needs, ObjectivePlan, ObjectiveSelector};
use roguepilot_system_pathfinding::{Pathfinder, Route};
use roguepilot_system_threat::{is_cornered, ThreatEvaluator};

use crate::{PilotConfig, StickyState};

/// Systems and snapshot shared by every state evaluated during one turn.
#[derive(Debug)]
pub struct Turn<'a> {
    level: &'a LevelView,
    health_maximum: i32,
    threat: ThreatEvaluator,
    pathfinder: Pathfinder,
    objectives: ObjectiveSelector,
}

impl<'a> Turn<'a> {
    /// Binds the configured systems to the snapshot of the current turn.
    #[must_use]
    pub fn new(level: &'a LevelView, config: &PilotConfig) -> Self {
        let threat = ThreatEvaluator::new(config.threat);
        Self {
            level,
            health_maximum: config.health_maximum,
            threat,
            pathfinder: Pathfinder::new(threat),
            objectives: ObjectiveSelector::new(config.objective),
        }
    }

    fn origin(&self) -> Location {
        self.level.player().location
    }

    fn health(&self) -> i32 {
        self.level.player().health
    }

    fn monsters_in_range(&self) -> impl Iterator<Item = &'a MonsterSnapshot> {
        let level = self.level;
        level
            .monsters()
            .iter()
            .filter(move |monster| level.is_in_attack_range(monster))
    }

    fn attack(&self, monster: &MonsterSnapshot) -> Action {
        Action::Attack(monster.location - self.origin())
    }

    fn step_along(&self, route: &Route) -> Action {
        match route.first_step(self.origin()) {
            Some(offset) if offset != Offset::ZERO => Action::Step(offset),
            _ => Action::None,
        }
    }
}

/// Behaviour the player is currently in.
///
/// States only live for the duration of a single decision; every turn starts
/// over from [`TacticalState::Idle`].
#[derive(Clone, Debug, Default, PartialEq)]
pub enum TacticalState {
    /// Nothing decided yet.
    #[default]
    Idle,
    /// A target monster is known.
    SeeMonster,
    /// Several monsters wait at the end of the route to the target.
    CrowdFighter {
        /// Monsters able to strike the end of the route.
        crowd: Vec<MonsterSnapshot>,
        /// Route to the target's attack range.
        route: Route,
    },
    /// An item or health pack is worth walking to.
    SeeObjective {
        /// Objective and the route leading to it.
        plan: ObjectivePlan,
    },
    /// Nothing worth fighting for; head for the exit.
    ExitLevel,
}

impl TacticalState {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::SeeMonster => "see_monster",
            Self::CrowdFighter { .. } => "crowd_fighter",
            Self::SeeObjective { .. } => "see_objective",
            Self::ExitLevel => "exit_level",
        }
    }
}

/// Outcome of evaluating one state.
#[derive(Clone, Debug, PartialEq)]
pub enum Transition {
    /// The turn is decided.
    Act(Action),
    /// Evaluate another state within the same turn.
    Goto(TacticalState),
}

/// Evaluates a state against the turn and returns the outcome together with
/// the updated sticky state.
#[must_use]
pub fn advance(
    state: TacticalState,
    turn: &Turn<'_>,
    mut sticky: StickyState,
) -> (Transition, StickyState) {
    let transition = match state {
        TacticalState::Idle => idle(turn, &mut sticky),
        TacticalState::SeeMonster => see_monster(turn, &sticky),
        TacticalState::CrowdFighter { crowd, route } => {
            crowd_fighter(turn, &sticky, &crowd, &route)
        }
        TacticalState::SeeObjective { plan } => see_objective(turn, &plan),
        TacticalState::ExitLevel => exit_level(turn, &mut sticky),
    };
    (transition, sticky)
}

fn idle(turn: &Turn<'_>, sticky: &mut StickyState) -> Transition {
    let level = turn.level;
    let origin = turn.origin();

    if turn.health() < turn.health_maximum {
        if let Some(offset) = STEP_OFFSETS
            .into_iter()
            .find(|offset| level.health_pack_at(origin + *offset).is_some())
        {
            return Transition::Act(Action::Step(offset));
        }
    }

    match choose_target(turn, sticky) {
        Some(target) => {
            sticky.target = Some(target.id);
            Transition::Goto(TacticalState::SeeMonster)
        }
        None => Transition::Goto(TacticalState::ExitLevel),
    }
}

/// Keeps the sticky target while it lives, otherwise prefers the weakest
/// monster in range and then the nearest one.
fn choose_target<'a>(turn: &Turn<'a>, sticky: &StickyState) -> Option<&'a MonsterSnapshot> {
    let level = turn.level;
    if let Some(kept) = sticky.target.and_then(|id| level.monster(id)) {
        return Some(kept);
    }

    let origin = turn.origin();
    turn.monsters_in_range()
        .min_by_key(|monster| (monster.health, monster.attack, monster.defence))
        .or_else(|| {
            level.monsters().iter().min_by_key(|monster| {
                (
                    origin.distance_to(monster.location),
                    monster.health,
                    monster.attack,
                    monster.defence,
                )
            })
        })
}

fn see_monster(turn: &Turn<'_>, sticky: &StickyState) -> Transition {
    let level = turn.level;
    let origin = turn.origin();

    let Some(target) = sticky.target.and_then(|id| level.monster(id)) else {
        return Transition::Goto(TacticalState::ExitLevel);
    };

    if is_cornered(level, origin) {
        if let Some(escape) = level.available_steps(origin).next() {
            return Transition::Act(Action::Step(escape - origin));
        }
    }

    let route = turn.pathfinder.route_to(level, target.location);
    let Some(destination) = route.last() else {
        return Transition::Goto(TacticalState::ExitLevel);
    };

    let crowd: Vec<MonsterSnapshot> = level.monsters_around(destination).copied().collect();
    if crowd.len() > 1 {
        return Transition::Goto(TacticalState::CrowdFighter { crowd, route });
    }

    if !turn.threat.can_fight(level, &[*target]) {
        return Transition::Goto(TacticalState::ExitLevel);
    }

    if level.is_in_attack_range(target) {
        return Transition::Act(turn.attack(target));
    }

    if let Some(item) = adjacent_upgrade(turn, sticky.equipped.as_ref()) {
        return Transition::Act(Action::Step(item.location - origin));
    }

    Transition::Act(turn.step_along(&route))
}

/// Most valuable item lying next to the player, if it beats the worn one.
fn adjacent_upgrade(turn: &Turn<'_>, equipped: Option<&ItemSnapshot>) -> Option<ItemSnapshot> {
    let origin = turn.origin();
    let nearby: Vec<ItemSnapshot> = turn
        .level
        .items()
        .iter()
        .filter(|item| item.location.is_adjacent_to(origin))
        .copied()
        .collect();

    let best = *turn.objectives.best_item(&nearby)?;
    turn.objectives
        .is_upgrade(&best, equipped)
        .then_some(best)
}

fn crowd_fighter(
    turn: &Turn<'_>,
    sticky: &StickyState,
    crowd: &[MonsterSnapshot],
    route: &Route,
) -> Transition {
    let level = turn.level;
    if !turn.threat.can_fight(level, crowd) {
        return Transition::Goto(TacticalState::ExitLevel);
    }

    if let Some(target) = sticky.target.and_then(|id| level.monster(id)) {
        if level.is_in_attack_range(target) {
            return Transition::Act(turn.attack(target));
        }
    }

    Transition::Act(turn.step_along(route))
}

fn see_objective(turn: &Turn<'_>, plan: &ObjectivePlan) -> Transition {
    // A route holding only the origin leaves nothing to walk.
    if plan.route.is_empty() || plan.route.cells() == [turn.origin()] {
        let weakest = turn.monsters_in_range().min_by_key(|monster| monster.health);
        return Transition::Act(weakest.map_or(Action::None, |monster| turn.attack(monster)));
    }

    Transition::Act(turn.step_along(&plan.route))
}

fn exit_level(turn: &Turn<'_>, sticky: &mut StickyState) -> Transition {
    let level = turn.level;
    let origin = turn.origin();
    let needs = Needs {
        health: turn.health() < turn.health_maximum,
        item: turn.health() >= turn.health_maximum,
    };

    let equipped = sticky.equipped.as_ref();
    if let Some(plan) = turn
        .objectives
        .select(level, &turn.pathfinder, needs, equipped)
    {
        return Transition::Goto(TacticalState::SeeObjective { plan });
    }

    let exit = level.exit();
    let route = exit.map_or_else(Route::new, |exit| turn.pathfinder.route_to(level, exit));
    if route.is_empty() {
        return Transition::Act(blocked_exit_fallback(turn));
    }

    let action = turn.step_along(&route);
    if let (Action::Step(offset), Some(exit)) = (action, exit) {
        if origin + offset == exit {
            sticky.target = None;
        }
    }
    Transition::Act(action)
}

/// With the exit out of reach, fight whatever is in range or close in on the
/// nearest monster.
fn blocked_exit_fallback(turn: &Turn<'_>) -> Action {
    if let Some(monster) = turn.monsters_in_range().next() {
        return turn.attack(monster);
    }

    let origin = turn.origin();
    turn.level
        .monsters()
        .iter()
        .min_by_key(|monster| (origin.distance_to(monster.location), monster.health))
        .map_or(Action::None, |monster| {
            Action::Step((monster.location - origin).snap_to_step())
        })
}
