#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that decides whether an item or a health pack is worth a detour.

use roguepilot_core::{HealthPackSnapshot, ItemSnapshot, LevelView, Location};
use roguepilot_system_pathfinding::{Pathfinder, Route};
use serde::Deserialize;

/// Weights used to rank items against each other.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ObjectiveTuning {
    /// Weight of an item's attack bonus.
    pub item_attack_weight: f64,
    /// Weight of an item's defence bonus.
    pub item_defence_weight: f64,
}

impl Default for ObjectiveTuning {
    fn default() -> Self {
        Self {
            item_attack_weight: 1.2,
            item_defence_weight: 1.0,
        }
    }
}

/// Entity the player decided to walk to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Objective {
    /// Item to pick up and wear.
    Item(ItemSnapshot),
    /// Health pack to consume.
    HealthPack(HealthPackSnapshot),
}

impl Objective {
    /// Cell holding the objective.
    #[must_use]
    pub const fn location(&self) -> Location {
        match self {
            Self::Item(item) => item.location,
            Self::HealthPack(pack) => pack.location,
        }
    }
}

/// Objective paired with the route leading to it.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectivePlan {
    /// Chosen objective.
    pub objective: Objective,
    /// Route from the player to the objective.
    pub route: Route,
}

/// What the player is currently short of.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Needs {
    /// Health is below the maximum.
    pub health: bool,
    /// Health is full, so gear is worth improving.
    pub item: bool,
}

/// Selector applying a fixed [`ObjectiveTuning`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ObjectiveSelector {
    tuning: ObjectiveTuning,
}

impl ObjectiveSelector {
    /// Creates a selector with the provided tuning.
    #[must_use]
    pub const fn new(tuning: ObjectiveTuning) -> Self {
        Self { tuning }
    }

    /// Weighted worth of an item's bonuses.
    #[must_use]
    pub fn item_value(&self, item: &ItemSnapshot) -> f64 {
        f64::from(item.attack_bonus) * self.tuning.item_attack_weight
            + f64::from(item.defence_bonus) * self.tuning.item_defence_weight
    }

    /// Reports whether the candidate is strictly more valuable than the worn item.
    #[must_use]
    pub fn is_upgrade(&self, candidate: &ItemSnapshot, equipped: Option<&ItemSnapshot>) -> bool {
        equipped.map_or(true, |worn| self.item_value(candidate) > self.item_value(worn))
    }

    /// Most valuable item, the first one listed winning ties.
    #[must_use]
    pub fn best_item<'a>(&self, items: &'a [ItemSnapshot]) -> Option<&'a ItemSnapshot> {
        self.by_value(items).into_iter().next()
    }

    /// Picks the objective matching the player's needs.
    ///
    /// Health takes precedence when both needs are raised.
    #[must_use]
    pub fn select(
        &self,
        level: &LevelView,
        pathfinder: &Pathfinder,
        needs: Needs,
        equipped: Option<&ItemSnapshot>,
    ) -> Option<ObjectivePlan> {
        if needs.health {
            if let Some(plan) = self.safest_health_pack(level, pathfinder) {
                return Some(plan);
            }
        }

        if needs.item {
            return self.best_reachable_item(level, pathfinder, equipped);
        }

        None
    }

    /// Health pack behind the safest route.
    ///
    /// Packs are routed nearest first. The first route that no monster can
    /// strike wins outright; otherwise the route crossed by the fewest
    /// monsters wins, shorter routes breaking ties.
    #[must_use]
    pub fn safest_health_pack(
        &self,
        level: &LevelView,
        pathfinder: &Pathfinder,
    ) -> Option<ObjectivePlan> {
        let origin = level.player().location;
        let mut packs: Vec<&HealthPackSnapshot> = level.health_packs().iter().collect();
        packs.sort_by_key(|pack| origin.distance_to(pack.location));

        let mut exposed = Vec::new();
        for pack in packs {
            let route = pathfinder.route_to(level, pack.location);
            if route.is_empty() {
                continue;
            }

            let monsters = route.monsters_crossing(level);
            let plan = ObjectivePlan {
                objective: Objective::HealthPack(*pack),
                route,
            };
            if monsters == 0 {
                return Some(plan);
            }
            exposed.push((monsters, plan));
        }

        exposed
            .into_iter()
            .min_by_key(|(monsters, plan)| (*monsters, plan.route.len()))
            .map(|(_, plan)| plan)
    }

    /// Most valuable reachable item, provided it beats the worn one.
    #[must_use]
    pub fn best_reachable_item(
        &self,
        level: &LevelView,
        pathfinder: &Pathfinder,
        equipped: Option<&ItemSnapshot>,
    ) -> Option<ObjectivePlan> {
        let (item, route) = self
            .by_value(level.items())
            .into_iter()
            .map(|item| (item, pathfinder.route_to(level, item.location)))
            .find(|(_, route)| !route.is_empty())?;

        if !self.is_upgrade(item, equipped) {
            tracing::trace!(location = ?item.location, "reachable item is no upgrade");
            return None;
        }

        Some(ObjectivePlan {
            objective: Objective::Item(*item),
            route,
        })
    }

    fn by_value<'a>(&self, items: &'a [ItemSnapshot]) -> Vec<&'a ItemSnapshot> {
        let mut ranked: Vec<&ItemSnapshot> = items.iter().collect();
        ranked.sort_by(|left, right| self.item_value(right).total_cmp(&self.item_value(left)));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(attack_bonus: i32, defence_bonus: i32) -> ItemSnapshot {
        ItemSnapshot {
            location: Location::new(attack_bonus, defence_bonus),
            attack_bonus,
            defence_bonus,
        }
    }

    #[test]
    fn attack_bonus_weighs_more_than_defence() {
        let selector = ObjectiveSelector::default();
        assert!((selector.item_value(&item(2, 2)) - 4.4).abs() < 1e-9);
        assert!(selector.item_value(&item(3, 0)) > selector.item_value(&item(0, 3)));
    }

    #[test]
    fn best_item_keeps_listing_order_on_ties() {
        let selector = ObjectiveSelector::default();
        let twin = ItemSnapshot {
            location: Location::new(9, 9),
            ..item(3, 1)
        };
        let items = [item(0, 4), item(3, 1), twin];

        assert_eq!(selector.best_item(&items), Some(&items[1]));
        assert_eq!(selector.best_item(&[]), None);
    }

    #[test]
    fn upgrade_requires_strictly_greater_value() {
        let selector = ObjectiveSelector::default();
        let worn = item(2, 2);

        assert!(selector.is_upgrade(&item(1, 1), None));
        assert!(!selector.is_upgrade(&item(2, 2), Some(&worn)));
        assert!(selector.is_upgrade(&item(3, 1), Some(&worn)));
    }
}
