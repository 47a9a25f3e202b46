//! # Cave Generator
//!
//! The primary level generator: a seeded cellular automaton smooths random
//! noise into organic cave shapes, connectivity repair joins the caves into a
//! single region, and feature placement scatters the start, exit, ore veins,
//! and enemy spawners.
//!
//! The requested playable size is padded on every side by
//! [`crate::config::BORDER_SIZE`] tiles of solid wall, so the camera never
//! sees past the level edge.

use crate::config::{BORDER_SIZE, MIN_HEIGHT, MIN_WIDTH};
use crate::game::{Grid, Position, TileType};
use crate::generation::rooms::connect_all_rooms;
use crate::generation::{utils, GenerationConfig, MapGenerator, OreSpec, SpawnerSpec};
use crate::{CavernError, CavernResult};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::Rng;

/// Cellular-automaton cave generator.
///
/// # Examples
///
/// ```
/// use cavern::{CaveGenerator, GenerationConfig, MapGenerator};
///
/// let config = GenerationConfig::new(42);
/// let mut gen = CaveGenerator::new(100, 100, config);
/// let grid = gen.generate_base_layout().unwrap();
/// assert_eq!(grid.width(), 160); // requested size plus the sealed border
/// ```
pub struct CaveGenerator {
    width: usize,
    height: usize,
    config: GenerationConfig,
    rng: StdRng,
    player_start: Option<Position>,
}

impl CaveGenerator {
    /// Creates a generator for the given playable size.
    ///
    /// The stored dimensions include the sealed border and never fall below
    /// the engine minimums.
    pub fn new(width: usize, height: usize, config: GenerationConfig) -> Self {
        let rng = utils::create_rng(&config);
        Self {
            width: (width + 2 * BORDER_SIZE).max(MIN_WIDTH),
            height: (height + 2 * BORDER_SIZE).max(MIN_HEIGHT),
            config,
            rng,
            player_start: None,
        }
    }

    /// Fills the grid with noise: solid wall in the border region, wall at
    /// `init_rate` inside.
    fn seed_noise(&mut self) -> Grid {
        let mut grid = Grid::new(self.width, self.height, TileType::Wall);
        for y in BORDER_SIZE..self.height - BORDER_SIZE {
            for x in BORDER_SIZE..self.width - BORDER_SIZE {
                if self.rng.gen::<f64>() >= self.config.init_rate {
                    let _ = grid.set(Position::new(x as i32, y as i32), TileType::Floor);
                }
            }
        }
        grid
    }

    /// Runs one smoothing pass into a fresh grid.
    ///
    /// The outer 2-tile margin is copied unchanged so the neighbor window
    /// never leaves the grid. A wall survives with at least `death_limit`
    /// wall neighbors; a floor becomes wall with more than `birth_limit`.
    fn smooth(&self, grid: &Grid) -> Grid {
        let mut next = grid.clone();
        for y in 2..self.height as i32 - 2 {
            for x in 2..self.width as i32 - 2 {
                let pos = Position::new(x, y);
                let walls = count_wall_neighbors(grid, pos);
                let tile = match grid.get(pos) {
                    Some(TileType::Wall) if walls >= self.config.death_limit => TileType::Wall,
                    Some(TileType::Wall) => TileType::Floor,
                    Some(TileType::Floor) if walls > self.config.birth_limit => TileType::Wall,
                    Some(other) => other,
                    None => continue,
                };
                let _ = next.set(pos, tile);
            }
        }
        next
    }

    /// Scans the grid from a corner for a start or exit tile.
    ///
    /// The scan walks columns left to right (optionally mirrored) and rows
    /// top to bottom (optionally mirrored). The first pass accepts each
    /// floor tile with probability `spawn_chance`, so the chosen tile sits
    /// near, but not exactly at, the corner. A second pass settles for the
    /// first floor tile. No floor at all is a generation failure.
    fn select_position(
        &mut self,
        grid: &mut Grid,
        mirror_x: bool,
        mirror_y: bool,
        marker: TileType,
    ) -> CavernResult<Position> {
        let width = grid.width() as i32;
        let height = grid.height() as i32;
        let at = |j: i32, i: i32| {
            Position::new(
                if mirror_x { width - 1 - j } else { j },
                if mirror_y { height - 1 - i } else { i },
            )
        };

        for j in 0..width {
            for i in 0..height {
                let pos = at(j, i);
                if grid.get(pos) == Some(TileType::Floor)
                    && self.rng.gen::<f64>() < self.config.spawn_chance
                {
                    grid.set(pos, marker)?;
                    return Ok(pos);
                }
            }
        }

        for j in 0..width {
            for i in 0..height {
                let pos = at(j, i);
                if grid.get(pos) == Some(TileType::Floor) {
                    grid.set(pos, marker)?;
                    return Ok(pos);
                }
            }
        }

        Err(CavernError::GenerationFailed(
            "no floor tile available for placement".to_string(),
        ))
    }

    /// Finds every dead end reachable from the player start, shuffled.
    ///
    /// A breadth-first sweep marks visited passable tiles; a tile is a dead
    /// end when it expands nothing new and its whole 5x5 neighborhood is
    /// either wall or already swept.
    fn find_dead_ends(&mut self, grid: &Grid, start: Position) -> Vec<Position> {
        let width = grid.width();
        let height = grid.height();
        // 2 = wall, 1 = swept, 0 = untouched.
        let mut buffer = vec![vec![0u8; width]; height];
        for pos in grid.positions() {
            if grid.get(pos) == Some(TileType::Wall) {
                buffer[pos.y as usize][pos.x as usize] = 2;
            }
        }

        let mut dead_ends = Vec::new();
        let mut queue = std::collections::VecDeque::new();
        buffer[start.y as usize][start.x as usize] = 1;
        queue.push_back(start);

        while let Some(pos) = queue.pop_front() {
            let mut expanded = false;
            for next in pos.orthogonal_neighbors() {
                if !grid.in_bounds(next) || buffer[next.y as usize][next.x as usize] != 0 {
                    continue;
                }
                buffer[next.y as usize][next.x as usize] = 1;
                queue.push_back(next);
                expanded = true;
            }

            if !expanded && neighborhood_is_exhausted(&buffer, pos, width, height) {
                dead_ends.push(pos);
            }
        }

        // Fisher-Yates so ore seeds spread over all dead ends.
        for i in (1..dead_ends.len()).rev() {
            let j = self.rng.gen_range(0..=i);
            dead_ends.swap(i, j);
        }
        dead_ends
    }

    /// Grows one ore vein outward from `pos` along orthogonal floor tiles.
    fn grow_vein(
        &mut self,
        grid: &mut Grid,
        pos: Position,
        spec: &OreSpec,
        vein_size: &mut u32,
        vein_max: u32,
    ) {
        let _ = grid.set(pos, spec.tile);
        *vein_size += 1;

        for next in pos.orthogonal_neighbors() {
            if *vein_size >= vein_max {
                return;
            }
            if grid.get(next) == Some(TileType::Floor)
                && self.rng.gen::<f64>() < spec.chunk_chance
            {
                self.grow_vein(grid, next, spec, vein_size, vein_max);
            }
        }
    }

    /// Picks a rejection-sampled vein seed: an interior floor tile with at
    /// least 3 wall tiles among its 8 neighbors.
    fn sample_vein_seed(&mut self, grid: &Grid) -> Option<Position> {
        for _ in 0..self.config.max_ore_attempts {
            let x = self
                .rng
                .gen_range(BORDER_SIZE as i32..(grid.width() - BORDER_SIZE) as i32);
            let y = self
                .rng
                .gen_range(BORDER_SIZE as i32..(grid.height() - BORDER_SIZE) as i32);
            let pos = Position::new(x, y);
            if grid.get(pos) != Some(TileType::Floor) {
                continue;
            }
            let walls = (0..8)
                .filter(|&step| grid.get(pos.neighbor(step)) == Some(TileType::Wall))
                .count();
            if walls >= 3 {
                return Some(pos);
            }
        }
        None
    }
}

impl MapGenerator for CaveGenerator {
    fn generate_base_layout(&mut self) -> CavernResult<Grid> {
        info!(
            "generating {}x{} cave (seed {})",
            self.width, self.height, self.config.seed
        );
        let mut grid = self.seed_noise();

        for step in 0..self.config.automaton_steps {
            grid = self.smooth(&grid);
            debug!("automaton step {} done", step + 1);
        }

        // Seal the outermost ring; smoothing never touches it, but a
        // future config could shrink the border below the margin.
        let width = grid.width() as i32;
        let height = grid.height() as i32;
        for x in 0..width {
            grid.set(Position::new(x, 0), TileType::Wall)?;
            grid.set(Position::new(x, height - 1), TileType::Wall)?;
        }
        for y in 0..height {
            grid.set(Position::new(0, y), TileType::Wall)?;
            grid.set(Position::new(width - 1, y), TileType::Wall)?;
        }

        connect_all_rooms(&mut grid, &self.config, &mut self.rng);
        Ok(grid)
    }

    fn place_player(&mut self, grid: &mut Grid) -> CavernResult<Position> {
        let mirror_y = self.rng.gen::<f64>() < 0.5;
        let pos = self.select_position(grid, false, mirror_y, TileType::Player)?;
        self.player_start = Some(pos);
        Ok(pos)
    }

    fn place_exit(&mut self, grid: &mut Grid) -> CavernResult<Position> {
        let mirror_y = self.rng.gen::<f64>() < 0.5;
        self.select_position(grid, true, mirror_y, TileType::Exit)
    }

    fn place_ore(&mut self, grid: &mut Grid, ores: &[OreSpec]) -> CavernResult<()> {
        let start = self.player_start.ok_or_else(|| {
            CavernError::InvalidState("ore placement requires a player start".to_string())
        })?;
        let dead_ends = self.find_dead_ends(grid, start);

        for spec in ores {
            let mut placed = 0u32;
            let mut seeds = dead_ends.iter().copied();

            while placed < spec.count {
                let seed = match seeds.next() {
                    // Earlier veins may have overgrown a dead end.
                    Some(seed) if grid.get(seed) != Some(TileType::Floor) => continue,
                    Some(seed) => seed,
                    None => match self.sample_vein_seed(grid) {
                        Some(seed) => seed,
                        None => {
                            warn!(
                                "ore placement gave up after {} attempts ({} of {} {:?} placed)",
                                self.config.max_ore_attempts, placed, spec.count, spec.tile
                            );
                            return Ok(());
                        }
                    },
                };

                let vein_max = self.config.max_per_vein.min(spec.count - placed);
                let mut vein_size = 0u32;
                self.grow_vein(grid, seed, spec, &mut vein_size, vein_max);
                placed += vein_size;
            }
            debug!("placed {} {:?} tiles", placed, spec.tile);
        }
        Ok(())
    }

    fn place_spawners(&mut self, grid: &mut Grid, spawners: &[SpawnerSpec]) -> CavernResult<()> {
        for spec in spawners {
            for _ in 0..spec.count {
                let mut placed = false;
                for _ in 0..self.config.max_spawner_attempts {
                    let x = self.rng.gen_range(0..grid.width() as i32);
                    let y = self.rng.gen_range(0..grid.height() as i32);
                    let pos = Position::new(x, y);
                    if grid.get(pos) == Some(TileType::Floor) {
                        grid.set(pos, spec.tile)?;
                        placed = true;
                        break;
                    }
                }
                if !placed {
                    warn!(
                        "spawner placement gave up after {} attempts for {:?}",
                        self.config.max_spawner_attempts, spec.tile
                    );
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "cave"
    }
}

/// Counts wall tiles among the 8 neighbors of `pos`.
fn count_wall_neighbors(grid: &Grid, pos: Position) -> u32 {
    (0..8)
        .filter(|&step| grid.get(pos.neighbor(step)) == Some(TileType::Wall))
        .count() as u32
}

/// True when every tile in the 5x5 window around `pos` is wall or swept.
fn neighborhood_is_exhausted(buffer: &[Vec<u8>], pos: Position, width: usize, height: usize) -> bool {
    for dy in -2..=2i32 {
        for dx in -2..=2i32 {
            let x = pos.x + dx;
            let y = pos.y + dy;
            if x < 0 || y < 0 || x as usize >= width || y as usize >= height {
                continue;
            }
            if buffer[y as usize][x as usize] == 0 {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_generator(seed: u64) -> CaveGenerator {
        CaveGenerator::new(40, 40, GenerationConfig::for_testing(seed))
    }

    #[test]
    fn test_dimensions_include_border() {
        let gen = CaveGenerator::new(100, 80, GenerationConfig::new(1));
        assert_eq!(gen.width, 160);
        assert_eq!(gen.height, 140);

        // Tiny requests are clamped to the engine minimum.
        let gen = CaveGenerator::new(0, 0, GenerationConfig::new(1));
        assert!(gen.width >= MIN_WIDTH);
        assert!(gen.height >= MIN_HEIGHT);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = small_generator(1234).generate_base_layout().unwrap();
        let b = small_generator(1234).generate_base_layout().unwrap();
        assert_eq!(a, b);

        let c = small_generator(4321).generate_base_layout().unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_border_region_is_solid_wall() {
        let grid = small_generator(99).generate_base_layout().unwrap();
        for pos in grid.positions() {
            let in_border = (pos.x as usize) < BORDER_SIZE
                || (pos.y as usize) < BORDER_SIZE
                || pos.x as usize >= grid.width() - BORDER_SIZE
                || pos.y as usize >= grid.height() - BORDER_SIZE;
            if in_border {
                assert_eq!(grid.get(pos), Some(TileType::Wall), "breach at {:?}", pos);
            }
        }
    }

    #[test]
    fn test_smoothing_applies_birth_and_death_rules() {
        let gen = small_generator(5);
        let mut grid = Grid::new(gen.width, gen.height, TileType::Floor);

        // An isolated wall (0 neighbors < death_limit) dies.
        grid.set(Position::new(50, 50), TileType::Wall).unwrap();
        // A floor surrounded by 8 walls (> birth_limit) is born.
        for step in 0..8 {
            grid.set(Position::new(60, 60).neighbor(step), TileType::Wall)
                .unwrap();
        }

        let smoothed = gen.smooth(&grid);
        assert_eq!(smoothed.get(Position::new(50, 50)), Some(TileType::Floor));
        assert_eq!(smoothed.get(Position::new(60, 60)), Some(TileType::Wall));
    }

    #[test]
    fn test_player_and_exit_land_on_former_floor() {
        let mut gen = small_generator(7);
        let mut grid = gen.generate_base_layout().unwrap();

        let player = gen.place_player(&mut grid).unwrap();
        let exit = gen.place_exit(&mut grid).unwrap();

        assert_eq!(grid.get(player), Some(TileType::Player));
        assert_eq!(grid.get(exit), Some(TileType::Exit));
        assert_ne!(player, exit);
    }

    #[test]
    fn test_player_placement_fails_without_floor() {
        let mut gen = small_generator(7);
        let mut grid = Grid::new(gen.width, gen.height, TileType::Wall);
        assert!(matches!(
            gen.place_player(&mut grid),
            Err(CavernError::GenerationFailed(_))
        ));
    }

    #[test]
    fn test_ore_placement_hits_requested_count() {
        let mut gen = small_generator(11);
        let mut grid = gen.generate_base_layout().unwrap();
        gen.place_player(&mut grid).unwrap();

        let spec = OreSpec {
            tile: TileType::GoldOre,
            count: 40,
            chunk_chance: 0.25,
        };
        gen.place_ore(&mut grid, &[spec]).unwrap();
        assert_eq!(grid.count(TileType::GoldOre), 40);
    }

    #[test]
    fn test_ore_requires_player_start() {
        let mut gen = small_generator(11);
        let mut grid = gen.generate_base_layout().unwrap();
        let spec = OreSpec {
            tile: TileType::GoldOre,
            count: 5,
            chunk_chance: 0.25,
        };
        assert!(matches!(
            gen.place_ore(&mut grid, &[spec]),
            Err(CavernError::InvalidState(_))
        ));
    }

    #[test]
    fn test_spawners_land_on_floor() {
        let mut gen = small_generator(13);
        let mut grid = gen.generate_base_layout().unwrap();
        gen.place_player(&mut grid).unwrap();

        let spec = SpawnerSpec {
            tile: TileType::EnemyFighterSpawner,
            count: 6,
        };
        gen.place_spawners(&mut grid, &[spec]).unwrap();
        assert_eq!(grid.count(TileType::EnemyFighterSpawner), 6);
    }
}
