//! Ordered, duplicate-free sequences of contiguous cells.

use std::collections::HashMap;

use roguepilot_core::{LevelView, Location, Offset};

/// Path of contiguous cells leading away from an origin.
///
/// Routes returned by the [`crate::Pathfinder`] exclude the origin: the first
/// cell is the next step to take and the last cell is the reached target. An
/// empty route means the target is unreachable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Route {
    cells: Vec<Location>,
}

impl Route {
    /// Creates an empty route.
    #[must_use]
    pub const fn new() -> Self {
        Self { cells: Vec::new() }
    }

    /// Creates a route made of a single cell.
    #[must_use]
    pub fn single(location: Location) -> Self {
        Self {
            cells: vec![location],
        }
    }

    /// Wraps the provided cells without validating them.
    #[must_use]
    pub fn from_cells(cells: Vec<Location>) -> Self {
        Self { cells }
    }

    /// Copies the route and appends one more cell.
    #[must_use]
    pub(crate) fn extended(&self, location: Location) -> Self {
        let mut cells = Vec::with_capacity(self.cells.len() + 1);
        cells.extend_from_slice(&self.cells);
        cells.push(location);
        Self { cells }
    }

    /// Drops the origin cell.
    #[must_use]
    pub(crate) fn without_origin(mut self) -> Self {
        if !self.cells.is_empty() {
            let _ = self.cells.remove(0);
        }
        self
    }

    /// Cells of the route in travel order.
    #[must_use]
    pub fn cells(&self) -> &[Location] {
        &self.cells
    }

    /// First cell of the route.
    #[must_use]
    pub fn first(&self) -> Option<Location> {
        self.cells.first().copied()
    }

    /// Last cell of the route.
    #[must_use]
    pub fn last(&self) -> Option<Location> {
        self.cells.last().copied()
    }

    /// Number of cells in the route.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the route holds no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reports whether the route passes through the cell.
    #[must_use]
    pub fn contains(&self, location: Location) -> bool {
        self.cells.contains(&location)
    }

    /// Iterates the cells in travel order.
    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.cells.iter()
    }

    /// Offset from `from` to the first cell of the route.
    #[must_use]
    pub fn first_step(&self, from: Location) -> Option<Offset> {
        self.first().map(|first| first - from)
    }

    /// Reports whether every consecutive pair of cells is one step apart.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        self.cells
            .windows(2)
            .all(|pair| pair[0].is_adjacent_to(pair[1]))
    }

    /// Reports whether no cell appears twice.
    #[must_use]
    pub fn is_duplicate_free(&self) -> bool {
        let mut seen = std::collections::HashSet::with_capacity(self.cells.len());
        self.cells.iter().all(|cell| seen.insert(*cell))
    }

    /// Counts the monsters able to strike any cell after the first one.
    #[must_use]
    pub fn monsters_crossing(&self, level: &LevelView) -> usize {
        level
            .monsters()
            .iter()
            .filter(|monster| {
                self.cells
                    .iter()
                    .skip(1)
                    .any(|cell| monster.location.is_adjacent_to(*cell))
            })
            .count()
    }

    /// Joins a continuation that passes through this route's last cell.
    ///
    /// The continuation is followed from just after the junction. Any loop
    /// formed by the join is cut out so the result never repeats a cell.
    #[must_use]
    pub fn merge_with(&self, continuation: &Route) -> Route {
        let resume = self
            .last()
            .and_then(|junction| continuation.cells.iter().position(|cell| *cell == junction))
            .map_or(0, |index| index + 1);

        let mut cells: Vec<Location> = Vec::with_capacity(self.len() + continuation.len());
        let mut positions: HashMap<Location, usize> = HashMap::new();

        for cell in self
            .cells
            .iter()
            .chain(continuation.cells.iter().skip(resume))
            .copied()
        {
            if let Some(&index) = positions.get(&cell) {
                for removed in cells.drain(index + 1..) {
                    let _ = positions.remove(&removed);
                }
                continue;
            }

            let _ = positions.insert(cell, cells.len());
            cells.push(cell);
        }

        Route { cells }
    }
}

impl<'a> IntoIterator for &'a Route {
    type Item = &'a Location;
    type IntoIter = std::slice::Iter<'a, Location>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}
