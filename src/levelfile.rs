//! # Level Files
//!
//! Binary serialization of a [`Grid`], shared with the level editor.
//!
//! Layout, all integers little-endian `i32`:
//!
//! ```text
//! "LVL" 0x00 | width | height | 0x00 | height*width tiles (row-major) | 0
//! ```
//!
//! Tile values are the [`TileType`] discriminants. Reading is forgiving at
//! the API boundary: a malformed file is logged and replaced by a minimal
//! empty grid so a bad download never crashes the game at load time.

use crate::config::{MIN_HEIGHT, MIN_WIDTH};
use crate::game::{Grid, Position, TileType};
use crate::{CavernError, CavernResult};
use log::error;
use std::fs;
use std::path::Path;

const MAGIC: &[u8; 4] = b"LVL\0";

/// Largest dimension accepted from a file. Keeps a corrupt header from
/// allocating gigabytes.
const MAX_DIMENSION: i32 = 4096;

/// Writes a grid to a level file.
pub fn write_level_file(path: &Path, grid: &Grid) -> CavernResult<()> {
    let mut bytes = Vec::with_capacity(13 + grid.width() * grid.height() * 4 + 4);
    bytes.extend_from_slice(MAGIC);
    bytes.extend_from_slice(&(grid.width() as i32).to_le_bytes());
    bytes.extend_from_slice(&(grid.height() as i32).to_le_bytes());
    bytes.push(0);
    for row in grid.rows() {
        for tile in row {
            bytes.extend_from_slice(&tile.as_raw().to_le_bytes());
        }
    }
    bytes.extend_from_slice(&0i32.to_le_bytes());
    fs::write(path, bytes)?;
    Ok(())
}

/// Reads a level file, falling back to a minimal empty grid on any error.
///
/// The error is logged rather than propagated; callers that need to
/// distinguish bad files use [`load_level_file`].
pub fn read_level_file(path: &Path) -> Grid {
    match load_level_file(path) {
        Ok(grid) => grid,
        Err(err) => {
            error!("failed to read level file {}: {}", path.display(), err);
            fallback_grid()
        }
    }
}

/// Strict variant of [`read_level_file`].
pub fn load_level_file(path: &Path) -> CavernResult<Grid> {
    parse_level_bytes(&fs::read(path)?)
}

pub(crate) fn parse_level_bytes(bytes: &[u8]) -> CavernResult<Grid> {
    let mut cursor = Cursor { bytes, offset: 0 };

    if cursor.take(4)? != MAGIC {
        return Err(CavernError::MalformedLevelFile("bad magic".to_string()));
    }
    let width = cursor.read_i32()?;
    let height = cursor.read_i32()?;
    cursor.take(1)?;

    if width <= 0 || height <= 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(CavernError::MalformedLevelFile(format!(
            "implausible dimensions {}x{}",
            width, height
        )));
    }

    let mut grid = Grid::new(width as usize, height as usize, TileType::Floor);
    for y in 0..height {
        for x in 0..width {
            let raw = cursor.read_i32()?;
            let tile = TileType::from_raw(raw).ok_or_else(|| {
                CavernError::MalformedLevelFile(format!("unknown tile value {}", raw))
            })?;
            grid.set(Position::new(x, y), tile)?;
        }
    }

    Ok(grid)
}

/// The grid handed out when a level file cannot be read.
pub(crate) fn fallback_grid() -> Grid {
    Grid::new(MIN_WIDTH, MIN_HEIGHT, TileType::Floor)
}

struct Cursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, n: usize) -> CavernResult<&'a [u8]> {
        if self.offset + n > self.bytes.len() {
            return Err(CavernError::MalformedLevelFile("truncated file".to_string()));
        }
        let slice = &self.bytes[self.offset..self.offset + n];
        self.offset += n;
        Ok(slice)
    }

    fn read_i32(&mut self) -> CavernResult<i32> {
        let bytes = self.take(4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}
