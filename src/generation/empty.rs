//! Flat arena generator used by tutorials and tests: all floor inside the
//! sealed border, no ore, no spawners.

use crate::config::{BORDER_SIZE, MIN_HEIGHT, MIN_WIDTH};
use crate::game::{Grid, Position, TileType};
use crate::generation::{GenerationConfig, MapGenerator, OreSpec, SpawnerSpec};
use crate::CavernResult;
use log::info;

/// Generator producing an empty walled arena.
pub struct EmptyGenerator {
    width: usize,
    height: usize,
}

impl EmptyGenerator {
    /// Creates a generator for the given playable size.
    pub fn new(width: usize, height: usize, _config: GenerationConfig) -> Self {
        Self {
            width: (width + 2 * BORDER_SIZE).max(MIN_WIDTH),
            height: (height + 2 * BORDER_SIZE).max(MIN_HEIGHT),
        }
    }
}

impl MapGenerator for EmptyGenerator {
    fn generate_base_layout(&mut self) -> CavernResult<Grid> {
        info!("generating {}x{} empty arena", self.width, self.height);
        let mut grid = Grid::new(self.width, self.height, TileType::Wall);
        for y in BORDER_SIZE..self.height - BORDER_SIZE {
            for x in BORDER_SIZE..self.width - BORDER_SIZE {
                grid.set(Position::new(x as i32, y as i32), TileType::Floor)?;
            }
        }
        Ok(grid)
    }

    fn place_player(&mut self, grid: &mut Grid) -> CavernResult<Position> {
        let pos = Position::new(BORDER_SIZE as i32, BORDER_SIZE as i32);
        grid.set(pos, TileType::Player)?;
        Ok(pos)
    }

    fn place_exit(&mut self, grid: &mut Grid) -> CavernResult<Position> {
        let pos = Position::new(
            (self.width - 1 - BORDER_SIZE) as i32,
            (self.height - 1 - BORDER_SIZE) as i32,
        );
        grid.set(pos, TileType::Exit)?;
        Ok(pos)
    }

    fn place_ore(&mut self, _grid: &mut Grid, _ores: &[OreSpec]) -> CavernResult<()> {
        Ok(())
    }

    fn place_spawners(&mut self, _grid: &mut Grid, _spawners: &[SpawnerSpec]) -> CavernResult<()> {
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "empty"
    }
}
