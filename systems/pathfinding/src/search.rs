//! Level-synchronous bidirectional breadth-first search.
//!
//! Both sides grow one generation at a time: the forward side from the start,
//! the backward side from every target at once. A solution is only chosen once
//! a full generation has been expanded on both sides, so every candidate
//! junction of that generation competes in the tie-break.

use std::collections::HashMap;

use roguepilot_core::{LevelView, Location, STEP_OFFSETS};

use crate::Route;

/// One direction of the search.
///
/// `parents` doubles as the visited set: every cell reached by this side maps
/// to the cell it was reached from, and roots map to `None`.
#[derive(Debug)]
struct SearchSide {
    frontier: Vec<Route>,
    parents: HashMap<Location, Option<Location>>,
}

impl SearchSide {
    fn rooted_at(roots: &[Location]) -> Self {
        let mut frontier = Vec::with_capacity(roots.len());
        let mut parents = HashMap::with_capacity(roots.len());

        for &root in roots {
            if parents.insert(root, None).is_none() {
                frontier.push(Route::single(root));
            }
        }

        Self { frontier, parents }
    }

    fn has_visited(&self, location: Location) -> bool {
        self.parents.contains_key(&location)
    }

    fn is_exhausted(&self) -> bool {
        self.frontier.is_empty()
    }

    /// Grows every frontier route by one step into cells this side has not
    /// visited yet.
    ///
    /// A cell reachable from several routes of the same generation belongs to
    /// the first of them, unless a later route reaches it with an orthogonal
    /// step where the claim used a diagonal one.
    fn expand(&mut self, level: &LevelView) {
        let mut next: Vec<Route> = Vec::new();
        let mut claims: HashMap<Location, (usize, bool)> = HashMap::new();

        for route in &self.frontier {
            let Some(tip) = route.last() else {
                continue;
            };

            for offset in STEP_OFFSETS {
                let cell = tip + offset;
                if self.parents.contains_key(&cell) || !level.is_step_available(cell) {
                    continue;
                }

                let orthogonal = offset.dx() == 0 || offset.dy() == 0;
                match claims.get(&cell).copied() {
                    None => {
                        let _ = claims.insert(cell, (next.len(), orthogonal));
                        next.push(route.extended(cell));
                    }
                    Some((index, false)) if orthogonal => {
                        next[index] = route.extended(cell);
                        let _ = claims.insert(cell, (index, true));
                    }
                    Some(_) => {}
                }
            }
        }

        for route in &next {
            let cells = route.cells();
            if let [.., parent, cell] = cells {
                let _ = self.parents.insert(*cell, Some(*parent));
            }
        }

        self.frontier = next;
    }

    /// Cells from `from` back to the root that reached it, inclusive.
    fn path_to_root(&self, from: Location) -> Route {
        let mut cells = vec![from];
        let mut current = from;

        while let Some(Some(parent)) = self.parents.get(&current) {
            cells.push(*parent);
            current = *parent;
        }

        Route::from_cells(cells)
    }
}

/// Ordering keys of a junction candidate, compared lexicographically.
#[derive(Debug)]
struct Candidate {
    monsters: usize,
    length: usize,
    lead: u32,
    deviation: i64,
    merged: Route,
}

/// Searches for a route from `start` to the nearest reachable target.
///
/// The returned route excludes `start`. An empty route means no target can be
/// reached.
pub(crate) fn bidirectional_search(
    level: &LevelView,
    start: Location,
    targets: &[Location],
) -> Route {
    let Some(anchor) = targets
        .iter()
        .copied()
        .min_by_key(|target| start.distance_to(*target))
    else {
        return Route::new();
    };

    let mut forward = SearchSide::rooted_at(&[start]);
    let mut backward = SearchSide::rooted_at(targets);
    let mut generation = 0_u32;

    loop {
        generation += 1;
        forward.expand(level);
        backward.expand(level);

        if let Some(route) = select_junction(level, start, anchor, &forward, &backward) {
            tracing::trace!(generation, length = route.len(), "search sides met");
            return route;
        }

        if forward.is_exhausted() || backward.is_exhausted() {
            tracing::trace!(generation, "search exhausted");
            return Route::new();
        }
    }
}

fn select_junction(
    level: &LevelView,
    start: Location,
    anchor: Location,
    forward: &SearchSide,
    backward: &SearchSide,
) -> Option<Route> {
    forward
        .frontier
        .iter()
        .filter_map(|route| {
            let junction = route.last()?;
            if !backward.has_visited(junction) {
                return None;
            }

            let merged = route.merge_with(&backward.path_to_root(junction));
            Some(Candidate {
                monsters: route.monsters_crossing(level),
                length: merged.len(),
                lead: lead_distance(start, anchor, route),
                deviation: deviation(start, anchor, &merged),
                merged,
            })
        })
        .min_by_key(|candidate| {
            (
                candidate.monsters,
                candidate.length,
                candidate.lead,
                candidate.deviation,
            )
        })
        .map(|candidate| candidate.merged.without_origin())
}

/// Distance left to the anchor along its dominant axis after the first step.
fn lead_distance(start: Location, anchor: Location, route: &Route) -> u32 {
    let Some(&step) = route.cells().get(1) else {
        return u32::MAX;
    };

    let offset = anchor - start;
    if offset.dx().unsigned_abs() >= offset.dy().unsigned_abs() {
        anchor.x().abs_diff(step.x())
    } else {
        anchor.y().abs_diff(step.y())
    }
}

/// Summed distance of the route's cells from the straight line to the anchor,
/// scaled by the line's length.
fn deviation(start: Location, anchor: Location, route: &Route) -> i64 {
    let line = anchor - start;
    route
        .iter()
        .map(|cell| {
            let offset = *cell - start;
            let cross = i64::from(offset.dx()) * i64::from(line.dy())
                - i64::from(offset.dy()) * i64::from(line.dx());
            cross.abs()
        })
        .sum()
}
