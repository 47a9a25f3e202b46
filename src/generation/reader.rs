//! Generator that replays a grid saved by the level editor instead of
//! generating one.

use crate::game::{Grid, Position, TileType};
use crate::generation::{MapGenerator, OreSpec, SpawnerSpec};
use crate::levelfile::read_level_file;
use crate::{CavernError, CavernResult};
use log::info;
use std::path::PathBuf;

/// Generator backed by a level file.
///
/// Hand-built levels carry their own ore, spawners, and usually their own
/// start and exit markers, so the placement hooks only fill in markers the
/// file left out.
pub struct FileReaderGenerator {
    path: PathBuf,
}

impl FileReaderGenerator {
    /// Creates a generator reading from the given level file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Finds an existing marker, or stamps it on the first floor tile.
    fn find_or_stamp(&self, grid: &mut Grid, marker: TileType) -> CavernResult<Position> {
        if let Some(pos) = grid.find_first(marker) {
            return Ok(pos);
        }
        let pos = grid.find_first(TileType::Floor).ok_or_else(|| {
            CavernError::GenerationFailed(format!(
                "level file {} has no floor tile for {:?}",
                self.path.display(),
                marker
            ))
        })?;
        grid.set(pos, marker)?;
        Ok(pos)
    }
}

impl MapGenerator for FileReaderGenerator {
    fn generate_base_layout(&mut self) -> CavernResult<Grid> {
        info!("loading level from {}", self.path.display());
        Ok(read_level_file(&self.path))
    }

    fn place_player(&mut self, grid: &mut Grid) -> CavernResult<Position> {
        self.find_or_stamp(grid, TileType::Player)
    }

    fn place_exit(&mut self, grid: &mut Grid) -> CavernResult<Position> {
        self.find_or_stamp(grid, TileType::Exit)
    }

    fn place_ore(&mut self, _grid: &mut Grid, _ores: &[OreSpec]) -> CavernResult<()> {
        Ok(())
    }

    fn place_spawners(&mut self, _grid: &mut Grid, _spawners: &[SpawnerSpec]) -> CavernResult<()> {
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "file"
    }
}
