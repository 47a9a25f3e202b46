//! # Game Module
//!
//! Core spatial types and the tile vocabulary shared by generation, the
//! level aggregate, and pathfinding:
//! - 2D positions and the canonical 8-neighborhood offset tables
//! - The tile-type enumeration and its movement classification
//! - The grid, level, and entity submodules

pub mod entity;
pub mod grid;
pub mod level;

pub use entity::{new_entity_id, Entity, EntityAction, EntityId, EntityKind};
pub use grid::Grid;
pub use level::{Level, PortalColor, PortalPair, PortalPairs};

use serde::{Deserialize, Serialize};

/// X offsets for the 8 surrounding cells, clockwise from north-west.
///
/// Odd indices are the 4 orthogonal neighbors (N, E, S, W); even indices are
/// the 4 diagonal neighbors. Pair with [`NEIGHBOR_DY`].
pub const NEIGHBOR_DX: [i32; 8] = [-1, 0, 1, 1, 1, 0, -1, -1];

/// Y offsets for the 8 surrounding cells, clockwise from north-west.
pub const NEIGHBOR_DY: [i32; 8] = [-1, -1, -1, 0, 1, 1, 1, 0];

/// Offset-table indices of the 4 orthogonal neighbors.
pub const ORTHOGONAL_STEPS: [usize; 4] = [1, 3, 5, 7];

/// Offset-table indices of the 4 diagonal neighbors.
pub const DIAGONAL_STEPS: [usize; 4] = [0, 2, 4, 6];

/// Represents a 2D tile coordinate in the game world.
///
/// # Examples
///
/// ```
/// use cavern::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the neighbor at offset-table index `step` (0..8).
    pub fn neighbor(self, step: usize) -> Position {
        Position::new(self.x + NEIGHBOR_DX[step], self.y + NEIGHBOR_DY[step])
    }

    /// Returns the 4 orthogonal neighbors (N, E, S, W).
    pub fn orthogonal_neighbors(self) -> [Position; 4] {
        [
            self.neighbor(1),
            self.neighbor(3),
            self.neighbor(5),
            self.neighbor(7),
        ]
    }

    /// Returns the 4 diagonal neighbors.
    pub fn diagonal_neighbors(self) -> [Position; 4] {
        [
            self.neighbor(0),
            self.neighbor(2),
            self.neighbor(4),
            self.neighbor(6),
        ]
    }

    /// Calculates the Euclidean distance to another position.
    pub fn euclidean_distance(self, other: Position) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// Calculates the Manhattan distance to another position.
    pub fn manhattan_distance(self, other: Position) -> u32 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as u32
    }

    /// Checks whether `other` is one of this position's 8 neighbors.
    pub fn is_adjacent(self, other: Position) -> bool {
        self != other && (self.x - other.x).abs() <= 1 && (self.y - other.y).abs() <= 1
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Position {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// Every kind of tile a grid cell can hold.
///
/// The discriminants are part of the binary level-file format and must not be
/// reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum TileType {
    Floor = 0,
    Wall = 1,
    DestroyableWall = 2,
    Blockage = 3,
    GoldOre = 4,
    /// Player start marker, normalized to `Floor` once the level records it.
    Player = 5,
    /// Exit marker, normalized to `Floor` once the level records it.
    Exit = 6,
    PortalRed = 7,
    PortalGreen = 8,
    PortalBlue = 9,
    PortalMagenta = 10,
    PortalCyan = 11,
    PortalYellow = 12,
    EnemyFighter = 13,
    EnemyFighterSpawner = 14,
    EnemyFlagman = 15,
    HealOre = 16,
    EnemySuicider = 17,
    EnemySuiciderSpawner = 18,
    EnemyBomber = 19,
    EnemyBomberSpawner = 20,
}

impl TileType {
    /// All tile types that block movement and connectivity.
    pub const WALL_LIKE: [TileType; 4] = [
        TileType::Wall,
        TileType::Blockage,
        TileType::GoldOre,
        TileType::HealOre,
    ];

    /// Returns true if this tile blocks movement and connectivity.
    pub fn is_wall_like(self) -> bool {
        matches!(
            self,
            TileType::Wall | TileType::Blockage | TileType::GoldOre | TileType::HealOre
        )
    }

    /// Returns true if an entity can stand on this tile.
    pub fn is_passable(self) -> bool {
        !self.is_wall_like()
    }

    /// Returns true if this tile can be destroyed into `Floor` during play.
    pub fn is_destructible(self) -> bool {
        matches!(
            self,
            TileType::DestroyableWall | TileType::Blockage | TileType::GoldOre | TileType::HealOre
        )
    }

    /// Returns true if this tile is an enemy spawner.
    pub fn is_spawner(self) -> bool {
        matches!(
            self,
            TileType::EnemyFighterSpawner
                | TileType::EnemySuiciderSpawner
                | TileType::EnemyBomberSpawner
        )
    }

    /// Converts a raw level-file value back into a tile type.
    pub fn from_raw(raw: i32) -> Option<TileType> {
        Some(match raw {
            0 => TileType::Floor,
            1 => TileType::Wall,
            2 => TileType::DestroyableWall,
            3 => TileType::Blockage,
            4 => TileType::GoldOre,
            5 => TileType::Player,
            6 => TileType::Exit,
            7 => TileType::PortalRed,
            8 => TileType::PortalGreen,
            9 => TileType::PortalBlue,
            10 => TileType::PortalMagenta,
            11 => TileType::PortalCyan,
            12 => TileType::PortalYellow,
            13 => TileType::EnemyFighter,
            14 => TileType::EnemyFighterSpawner,
            15 => TileType::EnemyFlagman,
            16 => TileType::HealOre,
            17 => TileType::EnemySuicider,
            18 => TileType::EnemySuiciderSpawner,
            19 => TileType::EnemyBomber,
            20 => TileType::EnemyBomberSpawner,
            _ => return None,
        })
    }

    /// The raw value written to level files.
    pub fn as_raw(self) -> i32 {
        self as i32
    }
}
