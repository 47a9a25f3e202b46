//! # Level
//!
//! The per-session aggregate: a generated grid plus everything the game loop
//! needs to run it (start and exit, portal registry, spawner census).
//!
//! [`Level::new`] drives any [`MapGenerator`] through the fixed placement
//! pipeline, then normalizes the start/exit marker tiles back to floor so the
//! grid only holds terrain, ore, portals, and spawners.

use crate::game::{Grid, Position, TileType};
use crate::generation::{MapGenerator, OreSpec, SpawnerSpec};
use crate::pathfinding;
use crate::CavernResult;
use log::info;
use serde::{Deserialize, Serialize};

/// Ore mix every generated level gets by default.
pub const DEFAULT_ORES: [OreSpec; 2] = [
    OreSpec {
        tile: TileType::GoldOre,
        count: 100,
        chunk_chance: 0.25,
    },
    OreSpec {
        tile: TileType::HealOre,
        count: 25,
        chunk_chance: 0.1,
    },
];

/// A fully generated, playable level.
pub struct Level {
    /// The tile grid, with wall-adjacency codes built.
    pub grid: Grid,
    /// Difficulty the level was generated for.
    pub difficulty: u32,
    /// Where the player enters.
    pub player_start: Position,
    /// Where the player leaves.
    pub exit: Position,
    /// Portal endpoints found in the grid (relevant for hand-built levels).
    pub portals: PortalPairs,
    /// Fighter spawners actually placed.
    pub fighter_spawners: u32,
    /// Suicider spawners actually placed.
    pub suicider_spawners: u32,
    /// Bomber spawners actually placed.
    pub bomber_spawners: u32,
}

impl Level {
    /// Builds a level by running a generator through the placement pipeline.
    ///
    /// # Examples
    ///
    /// ```
    /// use cavern::{EmptyGenerator, GenerationConfig, Level};
    ///
    /// let mut gen = EmptyGenerator::new(40, 40, GenerationConfig::new(1));
    /// let level = Level::new(&mut gen, 0).unwrap();
    /// assert!(level.grid.get(level.player_start).unwrap().is_passable());
    /// ```
    pub fn new(gen: &mut dyn MapGenerator, difficulty: u32) -> CavernResult<Level> {
        info!(
            "building level with {} generator at difficulty {}",
            gen.generator_type(),
            difficulty
        );

        let mut grid = gen.generate_base_layout()?;
        let player_start = gen.place_player(&mut grid)?;
        let exit = gen.place_exit(&mut grid)?;
        gen.place_ore(&mut grid, &DEFAULT_ORES)?;

        // Start and exit markers are bookkeeping, not terrain.
        for pos in [player_start, exit] {
            if matches!(grid.get(pos), Some(TileType::Player) | Some(TileType::Exit)) {
                grid.set(pos, TileType::Floor)?;
            }
        }

        let (fighters, suiciders, bombers) =
            spawner_counts(difficulty, grid.width(), grid.height());
        let specs = [
            SpawnerSpec {
                tile: TileType::EnemyFighterSpawner,
                count: fighters,
            },
            SpawnerSpec {
                tile: TileType::EnemySuiciderSpawner,
                count: suiciders,
            },
            SpawnerSpec {
                tile: TileType::EnemyBomberSpawner,
                count: bombers,
            },
        ];
        gen.place_spawners(&mut grid, &specs)?;

        grid.rebuild_wall_codes();
        let portals = PortalPairs::from_grid(&grid);

        Ok(Level {
            fighter_spawners: grid.count(TileType::EnemyFighterSpawner) as u32,
            suicider_spawners: grid.count(TileType::EnemySuiciderSpawner) as u32,
            bomber_spawners: grid.count(TileType::EnemyBomberSpawner) as u32,
            grid,
            difficulty,
            player_start,
            exit,
            portals,
        })
    }

    /// Finds a path between two tiles, blocking until the search completes.
    pub fn find_path(&self, start: Position, dest: Position) -> Vec<Position> {
        pathfinding::find_path(&self.grid, start, dest)
    }

    /// Destroys a destructible tile, turning it into floor.
    ///
    /// Returns whether anything was destroyed. Wall-adjacency codes around
    /// the tile are refreshed so the renderer picks up the new shape.
    pub fn destroy_wall(&mut self, pos: Position) -> CavernResult<bool> {
        match self.grid.get(pos) {
            Some(tile) if tile.is_destructible() => {
                self.grid.set(pos, TileType::Floor)?;
                self.grid.refresh_wall_codes_around(pos);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Removes a destroyed spawner from the grid and the census.
    pub fn consume_spawner(&mut self, pos: Position) -> CavernResult<bool> {
        let tile = match self.grid.get(pos) {
            Some(tile) if tile.is_spawner() => tile,
            _ => return Ok(false),
        };
        self.grid.set(pos, TileType::Floor)?;
        match tile {
            TileType::EnemyFighterSpawner => {
                self.fighter_spawners = self.fighter_spawners.saturating_sub(1)
            }
            TileType::EnemySuiciderSpawner => {
                self.suicider_spawners = self.suicider_spawners.saturating_sub(1)
            }
            TileType::EnemyBomberSpawner => {
                self.bomber_spawners = self.bomber_spawners.saturating_sub(1)
            }
            _ => {}
        }
        Ok(true)
    }
}

/// How many spawners of each kind a level of this difficulty gets.
///
/// The first difficulty tiers are hand-tuned; from tier 3 on the counts scale
/// with difficulty but are capped by the level area so dense maps do not
/// drown in enemies. Returns `(fighters, suiciders, bombers)`.
pub fn spawner_counts(difficulty: u32, width: usize, height: usize) -> (u32, u32, u32) {
    match difficulty {
        0 => (0, 0, 0),
        1 => (20, 0, 0),
        2 => (15, 20, 0),
        _ => {
            let entity_cap = (width * height / 100) as i64;
            let headroom = 4 * (entity_cap - 14 - 19 - 7) / 5;
            let coef = (difficulty as i64).min(headroom);
            let count = |base: i64, share: i64| (base + share).max(0) as u32;
            (
                count(14, coef / 2),
                count(19, coef / 2),
                count(7, coef / 4),
            )
        }
    }
}

/// The six portal colors, in grid tile order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortalColor {
    Red,
    Green,
    Blue,
    Magenta,
    Cyan,
    Yellow,
}

impl PortalColor {
    /// All colors, indexable by [`PortalColor::index`].
    pub const ALL: [PortalColor; 6] = [
        PortalColor::Red,
        PortalColor::Green,
        PortalColor::Blue,
        PortalColor::Magenta,
        PortalColor::Cyan,
        PortalColor::Yellow,
    ];

    /// The color of a portal tile, if it is one.
    pub fn from_tile(tile: TileType) -> Option<PortalColor> {
        Some(match tile {
            TileType::PortalRed => PortalColor::Red,
            TileType::PortalGreen => PortalColor::Green,
            TileType::PortalBlue => PortalColor::Blue,
            TileType::PortalMagenta => PortalColor::Magenta,
            TileType::PortalCyan => PortalColor::Cyan,
            TileType::PortalYellow => PortalColor::Yellow,
            _ => return None,
        })
    }

    /// The grid tile for this color.
    pub fn tile(self) -> TileType {
        match self {
            PortalColor::Red => TileType::PortalRed,
            PortalColor::Green => TileType::PortalGreen,
            PortalColor::Blue => TileType::PortalBlue,
            PortalColor::Magenta => TileType::PortalMagenta,
            PortalColor::Cyan => TileType::PortalCyan,
            PortalColor::Yellow => TileType::PortalYellow,
        }
    }

    fn index(self) -> usize {
        match self {
            PortalColor::Red => 0,
            PortalColor::Green => 1,
            PortalColor::Blue => 2,
            PortalColor::Magenta => 3,
            PortalColor::Cyan => 4,
            PortalColor::Yellow => 5,
        }
    }
}

/// One portal of a color: an open end, and its partner once linked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalPair {
    pub a: Position,
    pub b: Option<Position>,
}

impl PortalPair {
    /// True once both ends exist.
    pub fn is_linked(&self) -> bool {
        self.b.is_some()
    }
}

/// Registry of portal pairs, one slot per color.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortalPairs([Option<PortalPair>; 6]);

impl PortalPairs {
    /// Collects portal tiles from a grid in row-major order.
    pub fn from_grid(grid: &Grid) -> PortalPairs {
        let mut pairs = PortalPairs::default();
        for pos in grid.positions() {
            if let Some(color) = grid.get(pos).and_then(PortalColor::from_tile) {
                pairs.place(color, pos);
            }
        }
        pairs
    }

    /// Records a newly placed portal of the given color.
    ///
    /// The first placement opens a pair, the second closes it, and a third
    /// abandons the old pair and opens a fresh one.
    pub fn place(&mut self, color: PortalColor, pos: Position) {
        let slot = &mut self.0[color.index()];
        *slot = match slot {
            None => Some(PortalPair { a: pos, b: None }),
            Some(pair) if pair.b.is_none() => Some(PortalPair {
                a: pair.a,
                b: Some(pos),
            }),
            Some(_) => Some(PortalPair { a: pos, b: None }),
        };
    }

    /// The pair of the given color, if any portal of it exists.
    pub fn get(&self, color: PortalColor) -> Option<&PortalPair> {
        self.0[color.index()].as_ref()
    }

    /// Where a portal at `from` of the given color leads, if linked.
    pub fn destination(&self, color: PortalColor, from: Position) -> Option<Position> {
        let pair = self.0[color.index()]?;
        let b = pair.b?;
        if from == pair.a {
            Some(b)
        } else if from == b {
            Some(pair.a)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{EmptyGenerator, GenerationConfig};

    fn arena_level(difficulty: u32) -> Level {
        let mut gen = EmptyGenerator::new(40, 40, GenerationConfig::new(1));
        Level::new(&mut gen, difficulty).unwrap()
    }

    #[test]
    fn test_markers_are_normalized_to_floor() {
        let level = arena_level(0);
        assert_eq!(level.grid.get(level.player_start), Some(TileType::Floor));
        assert_eq!(level.grid.get(level.exit), Some(TileType::Floor));
        assert_eq!(level.grid.count(TileType::Player), 0);
        assert_eq!(level.grid.count(TileType::Exit), 0);
    }

    #[test]
    fn test_spawner_count_tiers() {
        assert_eq!(spawner_counts(0, 200, 200), (0, 0, 0));
        assert_eq!(spawner_counts(1, 200, 200), (20, 0, 0));
        assert_eq!(spawner_counts(2, 200, 200), (15, 20, 0));

        // Large map: the difficulty itself is the binding limit.
        assert_eq!(spawner_counts(10, 200, 200), (19, 24, 9));

        // Tiny area: the cap drives every count to its floor.
        let (f, s, b) = spawner_counts(50, 30, 30);
        assert!(f <= 14 && s <= 19 && b <= 7);
    }

    #[test]
    fn test_destroy_wall_only_hits_destructibles() {
        let mut level = arena_level(0);
        let wall = Position::new(0, 0);
        assert!(!level.destroy_wall(wall).unwrap());
        assert_eq!(level.grid.get(wall), Some(TileType::Wall));

        let pos = level.player_start;
        level.grid.set(pos, TileType::GoldOre).unwrap();
        level.grid.refresh_wall_codes_around(pos);
        assert!(level.destroy_wall(pos).unwrap());
        assert_eq!(level.grid.get(pos), Some(TileType::Floor));
    }

    #[test]
    fn test_consume_spawner_updates_census() {
        let mut level = arena_level(0);
        let pos = level.player_start;
        level
            .grid
            .set(pos, TileType::EnemyFighterSpawner)
            .unwrap();
        level.fighter_spawners = 1;

        assert!(level.consume_spawner(pos).unwrap());
        assert_eq!(level.fighter_spawners, 0);
        assert_eq!(level.grid.get(pos), Some(TileType::Floor));
        assert!(!level.consume_spawner(pos).unwrap());
    }

    #[test]
    fn test_portal_pair_lifecycle() {
        let mut pairs = PortalPairs::default();
        let a = Position::new(3, 3);
        let b = Position::new(9, 9);

        pairs.place(PortalColor::Cyan, a);
        assert!(!pairs.get(PortalColor::Cyan).unwrap().is_linked());
        assert_eq!(pairs.destination(PortalColor::Cyan, a), None);

        pairs.place(PortalColor::Cyan, b);
        assert_eq!(pairs.destination(PortalColor::Cyan, a), Some(b));
        assert_eq!(pairs.destination(PortalColor::Cyan, b), Some(a));

        // A third placement abandons the old pair.
        let c = Position::new(5, 5);
        pairs.place(PortalColor::Cyan, c);
        assert!(!pairs.get(PortalColor::Cyan).unwrap().is_linked());
        assert_eq!(pairs.destination(PortalColor::Cyan, c), None);
    }

    #[test]
    fn test_portals_collected_from_grid() {
        let mut grid = Grid::new(10, 10, TileType::Floor);
        grid.set(Position::new(2, 2), TileType::PortalRed).unwrap();
        grid.set(Position::new(7, 7), TileType::PortalRed).unwrap();
        grid.set(Position::new(4, 4), TileType::PortalBlue).unwrap();

        let pairs = PortalPairs::from_grid(&grid);
        assert_eq!(
            pairs.destination(PortalColor::Red, Position::new(2, 2)),
            Some(Position::new(7, 7))
        );
        assert!(!pairs.get(PortalColor::Blue).unwrap().is_linked());
        assert!(pairs.get(PortalColor::Green).is_none());
    }

    #[test]
    fn test_level_path_from_start_to_exit() {
        let level = arena_level(0);
        let path = level.find_path(level.player_start, level.exit);
        assert!(!path.is_empty());
        assert_eq!(path[0], level.player_start);
        assert_eq!(*path.last().unwrap(), level.exit);
    }
}
