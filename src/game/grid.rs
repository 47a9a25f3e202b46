//! # Grid
//!
//! The rectangular tile matrix backing every level, plus the derived
//! wall-adjacency codes the renderer uses for wall shape selection.
//!
//! A grid is built once by a generator and treated as read-only afterwards,
//! except for the narrow gameplay mutations exposed through [`crate::Level`].

use crate::game::{Position, TileType};
use crate::{CavernError, CavernResult};

/// A `height x width` matrix of tiles.
///
/// Invariants maintained by the generators:
/// - the outermost [`crate::config::BORDER_SIZE`] ring is always `Wall`
/// - dimensions never fall below [`crate::config::MIN_WIDTH`] x
///   [`crate::config::MIN_HEIGHT`]
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<Vec<TileType>>,
    /// 4-bit wall-adjacency code per cell of the `(height-1) x (width-1)`
    /// lattice; empty until [`Grid::rebuild_wall_codes`] runs.
    wall_codes: Vec<Vec<u8>>,
}

impl Grid {
    /// Creates a grid of the given dimensions filled with one tile type.
    pub fn new(width: usize, height: usize, fill: TileType) -> Self {
        Self {
            width,
            height,
            tiles: vec![vec![fill; width]; height],
            wall_codes: Vec::new(),
        }
    }

    /// Builds a grid from row-major tile rows.
    ///
    /// Fails if the rows are empty or ragged.
    pub fn from_rows(rows: Vec<Vec<TileType>>) -> CavernResult<Self> {
        let height = rows.len();
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(CavernError::InvalidState("empty grid".to_string()));
        }
        if rows.iter().any(|r| r.len() != width) {
            return Err(CavernError::InvalidState("ragged grid rows".to_string()));
        }
        Ok(Self {
            width,
            height,
            tiles: rows,
            wall_codes: Vec::new(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Read-only access to the tile rows (row-major).
    pub fn rows(&self) -> &[Vec<TileType>] {
        &self.tiles
    }

    /// Checks whether a position lies inside the grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// Gets the tile at a position, or `None` when out of bounds.
    pub fn get(&self, pos: Position) -> Option<TileType> {
        if self.in_bounds(pos) {
            Some(self.tiles[pos.y as usize][pos.x as usize])
        } else {
            None
        }
    }

    /// Sets the tile at a position.
    pub fn set(&mut self, pos: Position, tile: TileType) -> CavernResult<()> {
        if !self.in_bounds(pos) {
            return Err(CavernError::InvalidState(format!(
                "position ({}, {}) outside {}x{} grid",
                pos.x, pos.y, self.width, self.height
            )));
        }
        self.tiles[pos.y as usize][pos.x as usize] = tile;
        Ok(())
    }

    /// Returns true if the tile at `pos` blocks movement.
    ///
    /// Out-of-bounds positions count as walls, so callers never walk off the
    /// grid.
    pub fn is_wall_like(&self, pos: Position) -> bool {
        self.get(pos).map(TileType::is_wall_like).unwrap_or(true)
    }

    /// Counts tiles of the given type.
    pub fn count(&self, tile: TileType) -> usize {
        self.tiles
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&t| t == tile)
            .count()
    }

    /// Finds the first tile of the given type in row-major order.
    pub fn find_first(&self, tile: TileType) -> Option<Position> {
        for (y, row) in self.tiles.iter().enumerate() {
            for (x, &t) in row.iter().enumerate() {
                if t == tile {
                    return Some(Position::new(x as i32, y as i32));
                }
            }
        }
        None
    }

    /// Iterates over all positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let width = self.width;
        (0..self.height)
            .flat_map(move |y| (0..width).map(move |x| Position::new(x as i32, y as i32)))
    }

    /// Recomputes the wall-adjacency code for every lattice cell.
    ///
    /// The code for lattice cell `(x, y)` packs the wall-likeness of the four
    /// tiles around that lattice corner: bit 8 = `(x, y)`, bit 4 = `(x+1, y)`,
    /// bit 2 = `(x+1, y+1)`, bit 1 = `(x, y+1)`.
    pub fn rebuild_wall_codes(&mut self) {
        if self.width < 2 || self.height < 2 {
            self.wall_codes.clear();
            return;
        }
        self.wall_codes = vec![vec![0u8; self.width - 1]; self.height - 1];
        for y in 0..self.height - 1 {
            for x in 0..self.width - 1 {
                self.wall_codes[y][x] = self.compute_wall_code(x, y);
            }
        }
    }

    /// Refreshes the wall codes of every lattice cell touching `pos`.
    ///
    /// No-op until [`Grid::rebuild_wall_codes`] has run once.
    pub fn refresh_wall_codes_around(&mut self, pos: Position) {
        if self.wall_codes.is_empty() {
            return;
        }
        for dy in -1..=0i32 {
            for dx in -1..=0i32 {
                let x = pos.x + dx;
                let y = pos.y + dy;
                if x >= 0 && y >= 0 && (x as usize) < self.width - 1 && (y as usize) < self.height - 1
                {
                    self.wall_codes[y as usize][x as usize] =
                        self.compute_wall_code(x as usize, y as usize);
                }
            }
        }
    }

    /// Gets the wall-adjacency code for lattice cell `(x, y)`.
    ///
    /// Returns `None` outside the lattice or before the codes were built.
    pub fn wall_code(&self, x: usize, y: usize) -> Option<u8> {
        self.wall_codes.get(y).and_then(|row| row.get(x)).copied()
    }

    /// Equality compares tiles only; wall codes are derived data and may be
    /// built on one side but not the other.
    fn tiles_eq(&self, other: &Grid) -> bool {
        self.width == other.width && self.height == other.height && self.tiles == other.tiles
    }

    fn compute_wall_code(&self, x: usize, y: usize) -> u8 {
        let mut code = 0u8;
        if self.tiles[y][x].is_wall_like() {
            code += 8;
        }
        if self.tiles[y][x + 1].is_wall_like() {
            code += 4;
        }
        if self.tiles[y + 1][x + 1].is_wall_like() {
            code += 2;
        }
        if self.tiles[y + 1][x].is_wall_like() {
            code += 1;
        }
        code
    }
}

impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.tiles_eq(other)
    }
}

impl Eq for Grid {}
