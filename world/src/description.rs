//! Serializable level descriptions consumed by adapters.

use roguepilot_core::Location;
use serde::Deserialize;

/// Hit points and combat ratings of a pawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct PawnStats {
    /// Remaining hit points.
    pub health: i32,
    /// Attack rating.
    pub attack: i32,
    /// Defence rating.
    pub defence: i32,
}

impl PawnStats {
    /// Creates a new stat block.
    #[must_use]
    pub const fn new(health: i32, attack: i32, defence: i32) -> Self {
        Self {
            health,
            attack,
            defence,
        }
    }
}

/// Bonuses granted by an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct ItemStats {
    /// Bonus added to the wearer's attack.
    pub attack_bonus: i32,
    /// Bonus added to the wearer's defence.
    pub defence_bonus: i32,
}

impl ItemStats {
    /// Creates a new item bonus block.
    #[must_use]
    pub const fn new(attack_bonus: i32, defence_bonus: i32) -> Self {
        Self {
            attack_bonus,
            defence_bonus,
        }
    }
}

/// Stat override for the monster standing on a given cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct MonsterOverride {
    /// Cell holding an `M` glyph.
    pub at: Location,
    /// Stats replacing the defaults.
    #[serde(flatten)]
    pub stats: PawnStats,
}

/// Bonus override for the item lying on a given cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct ItemOverride {
    /// Cell holding an `I` glyph.
    pub at: Location,
    /// Bonuses replacing the defaults.
    #[serde(flatten)]
    pub stats: ItemStats,
}

/// Complete description of a level snapshot.
///
/// Only `layout` is mandatory; every entity glyph without an override uses
/// the default stats below.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LevelDescription {
    /// ASCII layout of the level.
    pub layout: String,
    /// Stats of the player.
    #[serde(default = "default_player")]
    pub player: PawnStats,
    /// Item worn by the player.
    #[serde(default)]
    pub equipped: Option<ItemStats>,
    /// Stats applied to every monster without an override.
    #[serde(default = "default_monster")]
    pub monster: PawnStats,
    /// Bonuses applied to every item without an override.
    #[serde(default = "default_item")]
    pub item: ItemStats,
    /// Per-monster overrides.
    #[serde(default)]
    pub monsters: Vec<MonsterOverride>,
    /// Per-item overrides.
    #[serde(default)]
    pub items: Vec<ItemOverride>,
}

impl LevelDescription {
    /// Describes a layout populated with default stats.
    #[must_use]
    pub fn from_layout(layout: impl Into<String>) -> Self {
        Self {
            layout: layout.into(),
            player: default_player(),
            equipped: None,
            monster: default_monster(),
            item: default_item(),
            monsters: Vec::new(),
            items: Vec::new(),
        }
    }
}

pub(crate) const fn default_player() -> PawnStats {
    PawnStats::new(100, 10, 10)
}

pub(crate) const fn default_monster() -> PawnStats {
    PawnStats::new(10, 5, 5)
}

pub(crate) const fn default_item() -> ItemStats {
    ItemStats::new(2, 2)
}
