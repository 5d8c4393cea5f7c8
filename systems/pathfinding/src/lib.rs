#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that plans routes across a level snapshot.
//!
//! Cheap shortcuts are tried first (already there, one step away, a safe
//! straight run along a row or column). Everything else goes through a
//! bidirectional breadth-first search whose visited sets live only for the
//! duration of a single call.

mod route;
mod search;

use roguepilot_core::{LevelView, Location, ATTACK_OFFSETS};
use roguepilot_system_threat::ThreatEvaluator;

pub use route::Route;

/// Route planner bound to a threat evaluator used for straight-run checks.
#[derive(Clone, Copy, Debug, Default)]
pub struct Pathfinder {
    threat: ThreatEvaluator,
}

impl Pathfinder {
    /// Creates a pathfinder that judges straight runs with the evaluator.
    #[must_use]
    pub const fn new(threat: ThreatEvaluator) -> Self {
        Self { threat }
    }

    /// Plans a route from the player to the target.
    ///
    /// When a monster stands on the target the route leads to any free cell
    /// from which it can be attacked instead.
    #[must_use]
    pub fn route_to(&self, level: &LevelView, target: Location) -> Route {
        let start = level.player().location;
        if level.monster_at(target).is_some() {
            let positions = attack_positions(level, target);
            return self.find_route(level, start, &positions);
        }

        self.find_route(level, start, &[target])
    }

    /// Plans a route from `start` to the nearest reachable target.
    ///
    /// The route excludes `start`, except when `start` already is a target in
    /// which case the route is `[start]`. An empty route means every target is
    /// unreachable.
    #[must_use]
    pub fn find_route(&self, level: &LevelView, start: Location, targets: &[Location]) -> Route {
        if targets.is_empty() {
            return Route::new();
        }

        if let Some(route) = nearby_route(start, targets) {
            return route;
        }

        if let Some(route) = targets
            .iter()
            .find_map(|target| self.straight_safe_run(level, start, *target))
        {
            tracing::trace!(?start, length = route.len(), "straight safe run");
            return route;
        }

        self.search(level, start, targets)
    }

    /// Plans a route with the bidirectional search alone, skipping the
    /// straight-run shortcut. Targets at or next to `start` still short
    /// circuit.
    #[must_use]
    pub fn search(&self, level: &LevelView, start: Location, targets: &[Location]) -> Route {
        if let Some(route) = nearby_route(start, targets) {
            return route;
        }

        let route = search::bidirectional_search(level, start, targets);
        if route.is_empty() {
            tracing::debug!(?start, targets = targets.len(), "no route found");
        }
        route
    }

    /// Builds the straight route to a target sharing a row or column with
    /// `start`, if the run is clear and survivable.
    ///
    /// Every cell strictly between the endpoints must be steppable, and the
    /// damage predicted from monsters lurking near those cells must stay below
    /// the player's health. The returned route ends at the target.
    #[must_use]
    pub fn straight_safe_run(
        &self,
        level: &LevelView,
        start: Location,
        target: Location,
    ) -> Option<Route> {
        if start == target || (start.x() != target.x() && start.y() != target.y()) {
            return None;
        }

        let step = (target - start).snap_to_step();
        let mut cells = Vec::with_capacity(start.distance_to(target) as usize);
        let mut next = start + step;
        while next != target {
            cells.push(next);
            next += step;
        }

        if cells.iter().any(|cell| !level.is_step_available(*cell)) {
            return None;
        }

        if self.threat.straight_run_damage(level, &cells) >= level.player().health {
            return None;
        }

        cells.push(target);
        Some(Route::from_cells(cells))
    }
}

/// Route to a target that is `start` itself or one step away from it.
fn nearby_route(start: Location, targets: &[Location]) -> Option<Route> {
    if targets.contains(&start) {
        return Some(Route::single(start));
    }

    let target = targets.iter().find(|target| start.is_adjacent_to(**target))?;
    tracing::trace!(?start, ?target, "target one step away");
    Some(Route::single(*target))
}

/// Free cells from which a monster standing on `around` can be attacked.
#[must_use]
pub fn attack_positions(level: &LevelView, around: Location) -> Vec<Location> {
    ATTACK_OFFSETS
        .iter()
        .map(|offset| around + *offset)
        .filter(|location| level.is_step_available(*location))
        .collect()
}
