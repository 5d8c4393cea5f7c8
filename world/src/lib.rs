#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level authoring for the Roguepilot decision engine.
//!
//! The host simulation normally supplies [`LevelView`] snapshots directly. This
//! crate builds the same snapshots from ASCII layouts so that tests and the
//! command-line adapter can describe situations compactly.

mod description;
mod layout;

use roguepilot_core::{
    Field, HealthPackSnapshot, ItemSnapshot, LevelView, Location, MonsterId, MonsterSnapshot,
    PlayerSnapshot,
};
use thiserror::Error;

pub use description::{ItemOverride, ItemStats, LevelDescription, MonsterOverride, PawnStats};

use description::{default_item, default_monster, default_player};
use layout::Placement;

/// Reasons a level could not be authored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The layout contained no cells.
    #[error("layout is empty")]
    EmptyLayout,
    /// The layout exceeds the addressable grid size.
    #[error("layout is too large")]
    Oversized,
    /// The layout used a glyph with no meaning.
    #[error("unknown glyph '{glyph}' at ({}, {})", .location.x(), .location.y())]
    UnknownGlyph {
        /// Offending character.
        glyph: char,
        /// Cell holding the character.
        location: Location,
    },
    /// The layout did not place the player.
    #[error("layout does not place the player")]
    MissingPlayer,
    /// The layout placed the player more than once.
    #[error("layout places a second player at ({}, {})", .0.x(), .0.y())]
    DuplicatePlayer(Location),
    /// An override referenced a cell without a monster.
    #[error("no monster at ({}, {})", .0.x(), .0.y())]
    NoMonsterAt(Location),
    /// An override referenced a cell without an item.
    #[error("no item at ({}, {})", .0.x(), .0.y())]
    NoItemAt(Location),
}

/// Mutable level under construction.
#[derive(Clone, Debug)]
pub struct Level {
    field: Field,
    player: PlayerSnapshot,
    monsters: Vec<MonsterSnapshot>,
    items: Vec<ItemSnapshot>,
    health_packs: Vec<HealthPackSnapshot>,
}

impl Level {
    /// Builds a level from an ASCII layout using default stats.
    ///
    /// Monsters receive identifiers in reading order, starting at zero.
    pub fn from_layout(layout: &str) -> Result<Self, LayoutError> {
        let parsed = layout::parse(layout)?;
        let field = Field::new(parsed.width, parsed.height, parsed.cells)
            .ok_or(LayoutError::Oversized)?;

        let player_stats = default_player();
        let monster_stats = default_monster();
        let item_stats = default_item();

        let mut player: Option<PlayerSnapshot> = None;
        let mut monsters = Vec::new();
        let mut items = Vec::new();
        let mut health_packs = Vec::new();
        let mut next_monster_id = 0;

        for (location, placement) in parsed.placements {
            match placement {
                Placement::Player => {
                    if player.is_some() {
                        return Err(LayoutError::DuplicatePlayer(location));
                    }
                    player = Some(PlayerSnapshot {
                        location,
                        health: player_stats.health,
                        attack: player_stats.attack,
                        defence: player_stats.defence,
                        equipped: None,
                    });
                }
                Placement::Monster => {
                    monsters.push(MonsterSnapshot {
                        id: MonsterId::new(next_monster_id),
                        location,
                        health: monster_stats.health,
                        attack: monster_stats.attack,
                        defence: monster_stats.defence,
                    });
                    next_monster_id += 1;
                }
                Placement::Item => items.push(ItemSnapshot {
                    location,
                    attack_bonus: item_stats.attack_bonus,
                    defence_bonus: item_stats.defence_bonus,
                }),
                Placement::HealthPack => health_packs.push(HealthPackSnapshot { location }),
            }
        }

        Ok(Self {
            field,
            player: player.ok_or(LayoutError::MissingPlayer)?,
            monsters,
            items,
            health_packs,
        })
    }

    /// Builds a level from a full description, applying every override.
    pub fn from_description(description: &LevelDescription) -> Result<Self, LayoutError> {
        let mut level = Self::from_layout(&description.layout)?;
        level.set_player_stats(description.player);
        level.equip(description.equipped);

        for monster in &mut level.monsters {
            monster.health = description.monster.health;
            monster.attack = description.monster.attack;
            monster.defence = description.monster.defence;
        }
        for item in &mut level.items {
            item.attack_bonus = description.item.attack_bonus;
            item.defence_bonus = description.item.defence_bonus;
        }

        for entry in &description.monsters {
            level.set_monster_stats(entry.at, entry.stats)?;
        }
        for entry in &description.items {
            level.set_item_bonus(entry.at, entry.stats)?;
        }

        Ok(level)
    }

    /// Replaces the player's stats.
    pub fn set_player_stats(&mut self, stats: PawnStats) {
        self.player.health = stats.health;
        self.player.attack = stats.attack;
        self.player.defence = stats.defence;
    }

    /// Replaces the player's remaining hit points.
    pub fn set_player_health(&mut self, health: i32) {
        self.player.health = health;
    }

    /// Replaces the item worn by the player.
    pub fn equip(&mut self, item: Option<ItemStats>) {
        let location = self.player.location;
        self.player.equipped = item.map(|stats| ItemSnapshot {
            location,
            attack_bonus: stats.attack_bonus,
            defence_bonus: stats.defence_bonus,
        });
    }

    /// Replaces the stats of the monster standing on the cell.
    pub fn set_monster_stats(&mut self, at: Location, stats: PawnStats) -> Result<(), LayoutError> {
        let monster = self
            .monsters
            .iter_mut()
            .find(|monster| monster.location == at)
            .ok_or(LayoutError::NoMonsterAt(at))?;
        monster.health = stats.health;
        monster.attack = stats.attack;
        monster.defence = stats.defence;
        Ok(())
    }

    /// Replaces the bonuses of the item lying on the cell.
    pub fn set_item_bonus(&mut self, at: Location, stats: ItemStats) -> Result<(), LayoutError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.location == at)
            .ok_or(LayoutError::NoItemAt(at))?;
        item.attack_bonus = stats.attack_bonus;
        item.defence_bonus = stats.defence_bonus;
        Ok(())
    }

    /// Removes the monster standing on the cell, as if it had been destroyed.
    pub fn remove_monster(&mut self, at: Location) -> Result<(), LayoutError> {
        let index = self
            .monsters
            .iter()
            .position(|monster| monster.location == at)
            .ok_or(LayoutError::NoMonsterAt(at))?;
        let _ = self.monsters.remove(index);
        Ok(())
    }
}

/// Query functions that provide read-only access to a level.
pub mod query {
    use roguepilot_core::LevelView;

    use super::Level;

    /// Captures the snapshot handed to the decision systems.
    #[must_use]
    pub fn level_view(level: &Level) -> LevelView {
        LevelView::new(
            level.field.clone(),
            level.player,
            level.monsters.clone(),
            level.items.clone(),
            level.health_packs.clone(),
        )
    }
}

/// Parses a layout with default stats and captures its snapshot in one go.
pub fn view_from_layout(layout: &str) -> Result<LevelView, LayoutError> {
    Level::from_layout(layout).map(|level| query::level_view(&level))
}
