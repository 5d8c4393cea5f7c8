#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Roguepilot decision engine.
//!
//! This crate defines the value types that connect the host simulation with the
//! pure decision systems. The host captures a [`LevelView`] once per turn, the
//! systems query it without mutation, and the tactical layer answers with a
//! single [`Action`] expressed relative to the player's location.

use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

/// Unit offsets the player may step along, orthogonals first.
pub const STEP_OFFSETS: [Offset; 8] = [
    Offset::new(0, -1),
    Offset::new(1, 0),
    Offset::new(0, 1),
    Offset::new(-1, 0),
    Offset::new(1, -1),
    Offset::new(1, 1),
    Offset::new(-1, 1),
    Offset::new(-1, -1),
];

/// Unit offsets from which an attack can land. Identical to [`STEP_OFFSETS`].
pub const ATTACK_OFFSETS: [Offset; 8] = STEP_OFFSETS;

/// Location of a single grid cell.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Location {
    x: i32,
    y: i32,
}

impl Location {
    /// Creates a new location from column and row coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Number of 8-directional steps separating two locations.
    #[must_use]
    pub fn distance_to(self, other: Location) -> u32 {
        (other - self).size()
    }

    /// Reports whether the other location lies exactly one step away.
    #[must_use]
    pub fn is_adjacent_to(self, other: Location) -> bool {
        self.distance_to(other) == 1
    }

    /// Iterates the eight neighbouring cells in [`STEP_OFFSETS`] order.
    pub fn neighbors(self) -> impl Iterator<Item = Location> {
        STEP_OFFSETS.into_iter().map(move |offset| self + offset)
    }
}

impl Add<Offset> for Location {
    type Output = Location;

    fn add(self, offset: Offset) -> Location {
        Location::new(self.x + offset.dx, self.y + offset.dy)
    }
}

impl AddAssign<Offset> for Location {
    fn add_assign(&mut self, offset: Offset) {
        *self = *self + offset;
    }
}

impl Sub for Location {
    type Output = Offset;

    fn sub(self, other: Location) -> Offset {
        Offset::new(self.x - other.x, self.y - other.y)
    }
}

/// Delta between two locations.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Offset {
    dx: i32,
    dy: i32,
}

impl Offset {
    /// Offset that keeps the player in place.
    pub const ZERO: Offset = Offset::new(0, 0);

    /// Creates a new offset from horizontal and vertical components.
    #[must_use]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Horizontal component.
    #[must_use]
    pub const fn dx(&self) -> i32 {
        self.dx
    }

    /// Vertical component.
    #[must_use]
    pub const fn dy(&self) -> i32 {
        self.dy
    }

    /// Chebyshev magnitude of the offset.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.dx.unsigned_abs().max(self.dy.unsigned_abs())
    }

    /// Reports whether the offset is one of the eight unit steps.
    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.size() == 1
    }

    /// Reduces the offset to a unit step along its dominant axis.
    ///
    /// Horizontal wins when both axes have the same magnitude, and the zero
    /// offset stays zero.
    #[must_use]
    pub fn snap_to_step(&self) -> Offset {
        if self.dx == 0 && self.dy == 0 {
            return Offset::ZERO;
        }

        if self.dx.unsigned_abs() >= self.dy.unsigned_abs() {
            Offset::new(self.dx.signum(), 0)
        } else {
            Offset::new(0, self.dy.signum())
        }
    }
}

/// Terrain kinds that make up a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Impassable rock.
    Wall,
    /// Damaging cell the player never walks through voluntarily.
    Trap,
    /// Open ground.
    Floor,
    /// Stairway leading out of the level.
    Exit,
}

impl CellKind {
    /// Reports whether the cell can never be entered by a step.
    #[must_use]
    pub const fn is_obstacle(self) -> bool {
        matches!(self, Self::Wall | Self::Trap)
    }
}

/// Dense terrain grid stored in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    width: u32,
    height: u32,
    cells: Vec<CellKind>,
}

impl Field {
    /// Creates a field from row-major cells.
    ///
    /// Returns `None` when the cell count does not match the dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32, cells: Vec<CellKind>) -> Option<Self> {
        let expected = usize::try_from(u64::from(width) * u64::from(height)).ok()?;
        if cells.len() != expected {
            return None;
        }

        Some(Self {
            width,
            height,
            cells,
        })
    }

    /// Width of the field in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the field in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Terrain at the provided location; cells outside the field read as walls.
    #[must_use]
    pub fn get(&self, location: Location) -> CellKind {
        self.index(location)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(CellKind::Wall)
    }

    /// Iterates every location holding the requested terrain kind, row by row.
    pub fn cells_of_kind(&self, kind: CellKind) -> impl Iterator<Item = Location> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(move |(_, cell)| **cell == kind)
            .filter_map(move |(index, _)| {
                let index = u32::try_from(index).ok()?;
                let x = i32::try_from(index % width).ok()?;
                let y = i32::try_from(index / width).ok()?;
                Some(Location::new(x, y))
            })
    }

    fn index(&self, location: Location) -> Option<usize> {
        let x = u32::try_from(location.x()).ok()?;
        let y = u32::try_from(location.y()).ok()?;
        if x >= self.width || y >= self.height {
            return None;
        }

        let width = usize::try_from(self.width).ok()?;
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        y.checked_mul(width)?.checked_add(x)
    }
}

/// Unique identifier assigned to a monster by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonsterId(u32);

impl MonsterId {
    /// Creates a new monster identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Immutable representation of a visible monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterSnapshot {
    /// Identifier that stays stable while the monster lives.
    pub id: MonsterId,
    /// Cell currently occupied by the monster.
    pub location: Location,
    /// Remaining hit points.
    pub health: i32,
    /// Attack rating.
    pub attack: i32,
    /// Defence rating.
    pub defence: i32,
}

impl MonsterSnapshot {
    /// Attack rating used by damage predictions.
    #[must_use]
    pub const fn total_attack(&self) -> i32 {
        self.attack
    }

    /// Defence rating used by damage predictions.
    #[must_use]
    pub const fn total_defence(&self) -> i32 {
        self.defence
    }
}

/// Immutable representation of an item lying on the floor or equipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    /// Cell holding the item.
    pub location: Location,
    /// Bonus added to the wearer's attack.
    pub attack_bonus: i32,
    /// Bonus added to the wearer's defence.
    pub defence_bonus: i32,
}

/// Immutable representation of a health pack lying on the floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HealthPackSnapshot {
    /// Cell holding the health pack.
    pub location: Location,
}

/// Immutable representation of the controlled player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Cell currently occupied by the player.
    pub location: Location,
    /// Remaining hit points.
    pub health: i32,
    /// Base attack rating.
    pub attack: i32,
    /// Base defence rating.
    pub defence: i32,
    /// Item currently worn, if any.
    pub equipped: Option<ItemSnapshot>,
}

impl PlayerSnapshot {
    /// Attack rating including the equipped item's bonus.
    #[must_use]
    pub fn total_attack(&self) -> i32 {
        self.attack + self.equipped.map_or(0, |item| item.attack_bonus)
    }

    /// Defence rating including the equipped item's bonus.
    #[must_use]
    pub fn total_defence(&self) -> i32 {
        self.defence + self.equipped.map_or(0, |item| item.defence_bonus)
    }
}

/// Single decision answered to the host for the current turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Skip the turn.
    #[default]
    None,
    /// Move one cell along the provided unit offset.
    Step(Offset),
    /// Strike whatever occupies the cell at the provided unit offset.
    Attack(Offset),
}

/// Read-only snapshot of everything the player can see this turn.
#[derive(Clone, Debug)]
pub struct LevelView {
    field: Field,
    player: PlayerSnapshot,
    monsters: Vec<MonsterSnapshot>,
    items: Vec<ItemSnapshot>,
    health_packs: Vec<HealthPackSnapshot>,
}

impl LevelView {
    /// Captures a new level view from the provided parts.
    ///
    /// Monsters are ordered by identifier so that every query enumerates them
    /// deterministically.
    #[must_use]
    pub fn new(
        field: Field,
        player: PlayerSnapshot,
        mut monsters: Vec<MonsterSnapshot>,
        items: Vec<ItemSnapshot>,
        health_packs: Vec<HealthPackSnapshot>,
    ) -> Self {
        monsters.sort_by_key(|monster| monster.id);
        Self {
            field,
            player,
            monsters,
            items,
            health_packs,
        }
    }

    /// Terrain of the level.
    #[must_use]
    pub const fn field(&self) -> &Field {
        &self.field
    }

    /// The controlled player.
    #[must_use]
    pub const fn player(&self) -> &PlayerSnapshot {
        &self.player
    }

    /// Visible monsters in identifier order.
    #[must_use]
    pub fn monsters(&self) -> &[MonsterSnapshot] {
        &self.monsters
    }

    /// Visible items.
    #[must_use]
    pub fn items(&self) -> &[ItemSnapshot] {
        &self.items
    }

    /// Visible health packs.
    #[must_use]
    pub fn health_packs(&self) -> &[HealthPackSnapshot] {
        &self.health_packs
    }

    /// First exit cell of the level, if one is visible.
    #[must_use]
    pub fn exit(&self) -> Option<Location> {
        self.field.cells_of_kind(CellKind::Exit).next()
    }

    /// Monster standing on the provided cell.
    #[must_use]
    pub fn monster_at(&self, location: Location) -> Option<&MonsterSnapshot> {
        self.monsters
            .iter()
            .find(|monster| monster.location == location)
    }

    /// Monster carrying the provided identifier.
    #[must_use]
    pub fn monster(&self, id: MonsterId) -> Option<&MonsterSnapshot> {
        self.monsters.iter().find(|monster| monster.id == id)
    }

    /// Item lying on the provided cell.
    #[must_use]
    pub fn item_at(&self, location: Location) -> Option<&ItemSnapshot> {
        self.items.iter().find(|item| item.location == location)
    }

    /// Health pack lying on the provided cell.
    #[must_use]
    pub fn health_pack_at(&self, location: Location) -> Option<&HealthPackSnapshot> {
        self.health_packs
            .iter()
            .find(|pack| pack.location == location)
    }

    /// Reports whether a step into the cell is currently possible.
    ///
    /// Obstacles, monsters, items and the exit all block the step.
    #[must_use]
    pub fn is_step_available(&self, location: Location) -> bool {
        let kind = self.field.get(location);
        !kind.is_obstacle()
            && kind != CellKind::Exit
            && self.monster_at(location).is_none()
            && self.item_at(location).is_none()
    }

    /// Iterates the passable neighbours of a cell in [`STEP_OFFSETS`] order.
    pub fn available_steps(&self, from: Location) -> impl Iterator<Item = Location> + '_ {
        from.neighbors()
            .filter(move |location| self.is_step_available(*location))
    }

    /// Reports whether the monster stands within striking distance of the player.
    #[must_use]
    pub fn is_in_attack_range(&self, monster: &MonsterSnapshot) -> bool {
        ATTACK_OFFSETS
            .iter()
            .any(|offset| self.player.location + *offset == monster.location)
    }

    /// Iterates the monsters that can strike the provided cell.
    pub fn monsters_around(
        &self,
        around: Location,
    ) -> impl Iterator<Item = &MonsterSnapshot> + '_ {
        self.monsters.iter().filter(move |monster| {
            ATTACK_OFFSETS
                .iter()
                .any(|offset| monster.location + *offset == around)
        })
    }
}
