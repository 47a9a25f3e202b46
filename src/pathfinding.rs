//! # Pathfinding
//!
//! Breadth-first search over the tile grid, used by AI agents to navigate
//! toward a target.
//!
//! Grids can be large (150x150 and up), so a search is not a blocking call:
//! [`PathSearch`] is an explicit state machine whose [`PathSearch::step`]
//! processes a bounded number of node expansions and then hands control back
//! to the caller. The game loop drives one step per scheduling tick; dropping
//! the search cancels it with no cleanup beyond releasing its visited set.
//!
//! Movement rules match the rest of the engine: wall-like tiles block, the 4
//! orthogonal neighbors expand unconditionally, and a diagonal step is only
//! taken when at least one of its two flanking orthogonal cells is passable
//! (no corner cutting).

use crate::game::{Position, DIAGONAL_STEPS, NEIGHBOR_DX, NEIGHBOR_DY, ORTHOGONAL_STEPS};
use crate::Grid;
use std::collections::{HashMap, VecDeque};

/// Node expansions performed per [`PathSearch::step`] before yielding.
pub const DEQUEUES_PER_STEP: usize = 100;

/// Progress of an incremental path search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// The expansion budget for this step ran out; call `step` again.
    InProgress,
    /// The search finished; the path (possibly empty) can be read.
    Complete,
}

/// An in-flight breadth-first search from `start` to `dest`.
///
/// The search borrows the grid immutably for its whole lifetime; the grid is
/// never mutated by pathfinding.
///
/// # Examples
///
/// ```
/// use cavern::{Grid, PathSearch, Position, SearchStatus, TileType};
///
/// let grid = Grid::new(10, 10, TileType::Floor);
/// let mut search = PathSearch::new(&grid, Position::new(1, 1), Position::new(4, 1));
/// while search.step() == SearchStatus::InProgress {}
/// let path = search.path();
/// assert_eq!(path.first(), Some(&Position::new(1, 1)));
/// assert_eq!(path.last(), Some(&Position::new(4, 1)));
/// ```
#[derive(Debug)]
pub struct PathSearch<'a> {
    grid: &'a Grid,
    start: Position,
    dest: Position,
    queue: VecDeque<Position>,
    backtrack: HashMap<Position, Position>,
    complete: bool,
}

impl<'a> PathSearch<'a> {
    /// Starts a new search. No expansion happens until [`PathSearch::step`].
    pub fn new(grid: &'a Grid, start: Position, dest: Position) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(start);
        Self {
            grid,
            start,
            dest,
            queue,
            backtrack: HashMap::new(),
            complete: false,
        }
    }

    /// Runs up to [`DEQUEUES_PER_STEP`] node expansions.
    ///
    /// Consumers must not read the path until this returns
    /// [`SearchStatus::Complete`].
    pub fn step(&mut self) -> SearchStatus {
        if self.complete {
            return SearchStatus::Complete;
        }

        let mut expanded = 0;
        while let Some(node) = self.queue.pop_front() {
            // The search ends when the destination is dequeued, not merely
            // enqueued.
            if node == self.dest {
                self.complete = true;
                return SearchStatus::Complete;
            }

            self.expand(node);

            expanded += 1;
            if expanded >= DEQUEUES_PER_STEP {
                return SearchStatus::InProgress;
            }
        }

        self.complete = true;
        SearchStatus::Complete
    }

    /// Returns true once the search has finished.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Reconstructs the path from start to destination, inclusive of both.
    ///
    /// Empty when the destination is unreachable, and meaningless while the
    /// search is still in progress.
    pub fn path(&self) -> Vec<Position> {
        if self.start == self.dest {
            return vec![self.start];
        }
        if !self.backtrack.contains_key(&self.dest) {
            return Vec::new();
        }

        let mut path = Vec::new();
        let mut node = self.dest;
        while node != self.start {
            path.push(node);
            node = self.backtrack[&node];
        }
        path.push(self.start);
        path.reverse();
        path
    }

    /// Drives the search to completion and returns the resulting path.
    pub fn run(mut self) -> Vec<Position> {
        while self.step() == SearchStatus::InProgress {}
        self.path()
    }

    fn expand(&mut self, node: Position) {
        // Orthogonal neighbors expand unconditionally.
        for step in ORTHOGONAL_STEPS {
            let next = node.neighbor(step);
            if self.backtrack.contains_key(&next) || self.grid.is_wall_like(next) {
                continue;
            }
            self.queue.push_back(next);
            self.backtrack.insert(next, node);
        }

        // A diagonal step is allowed only when it does not cut a corner:
        // at least one of the two flanking orthogonal cells must be passable.
        for step in DIAGONAL_STEPS {
            let next = node.neighbor(step);
            if self.backtrack.contains_key(&next) || self.grid.is_wall_like(next) {
                continue;
            }

            let flank_x = Position::new(node.x + NEIGHBOR_DX[step], node.y);
            let flank_y = Position::new(node.x, node.y + NEIGHBOR_DY[step]);
            if !self.grid.is_wall_like(flank_x) || !self.grid.is_wall_like(flank_y) {
                self.queue.push_back(next);
                self.backtrack.insert(next, node);
            }
        }
    }
}

/// Finds a path synchronously. Convenience wrapper over [`PathSearch`] for
/// callers that can afford to block (tests, tooling).
pub fn find_path(grid: &Grid, start: Position, dest: Position) -> Vec<Position> {
    PathSearch::new(grid, start, dest).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TileType;

    /// Grid of the given size, all floor, with a 1-tile wall ring.
    fn bordered_grid(width: usize, height: usize) -> Grid {
        let mut grid = Grid::new(width, height, TileType::Floor);
        for x in 0..width {
            grid.set(Position::new(x as i32, 0), TileType::Wall).unwrap();
            grid.set(Position::new(x as i32, height as i32 - 1), TileType::Wall)
                .unwrap();
        }
        for y in 0..height {
            grid.set(Position::new(0, y as i32), TileType::Wall).unwrap();
            grid.set(Position::new(width as i32 - 1, y as i32), TileType::Wall)
                .unwrap();
        }
        grid
    }

    #[test]
    fn test_diagonal_path_on_open_grid() {
        let grid = bordered_grid(10, 10);
        let path = find_path(&grid, Position::new(1, 1), Position::new(8, 8));

        assert!(!path.is_empty());
        assert!(path.len() <= 8, "diagonal-optimal path expected, got {:?}", path);
        assert_eq!(path[0], Position::new(1, 1));
        assert_eq!(*path.last().unwrap(), Position::new(8, 8));
        for pair in path.windows(2) {
            assert!(pair[0].is_adjacent(pair[1]), "non-adjacent step in {:?}", path);
        }
    }

    #[test]
    fn test_path_to_self_is_single_cell() {
        let grid = bordered_grid(10, 10);
        let pos = Position::new(4, 4);
        assert_eq!(find_path(&grid, pos, pos), vec![pos]);
    }

    #[test]
    fn test_unreachable_pocket_yields_empty_path() {
        let mut grid = bordered_grid(10, 10);
        // Wall in a 1-tile pocket at (5, 5).
        for step in 0..8 {
            grid.set(Position::new(5, 5).neighbor(step), TileType::Wall)
                .unwrap();
        }
        assert!(find_path(&grid, Position::new(1, 1), Position::new(5, 5)).is_empty());
    }

    #[test]
    fn test_corner_cutting_is_prevented() {
        let mut grid = Grid::new(5, 5, TileType::Wall);
        // Two floor cells joined only diagonally, both flanks walled.
        grid.set(Position::new(1, 1), TileType::Floor).unwrap();
        grid.set(Position::new(2, 2), TileType::Floor).unwrap();
        assert!(find_path(&grid, Position::new(1, 1), Position::new(2, 2)).is_empty());

        // Opening one flank makes the diagonal legal.
        grid.set(Position::new(2, 1), TileType::Floor).unwrap();
        let path = find_path(&grid, Position::new(1, 1), Position::new(2, 2));
        assert!(!path.is_empty());
    }

    #[test]
    fn test_ore_blocks_movement() {
        let mut grid = bordered_grid(7, 7);
        for y in 1..6 {
            grid.set(Position::new(3, y), TileType::GoldOre).unwrap();
        }
        assert!(find_path(&grid, Position::new(1, 3), Position::new(5, 3)).is_empty());
    }

    #[test]
    fn test_search_yields_incrementally_on_large_grid() {
        let grid = bordered_grid(60, 60);
        let mut search = PathSearch::new(&grid, Position::new(1, 1), Position::new(58, 58));

        assert_eq!(search.step(), SearchStatus::InProgress);
        assert!(!search.is_complete());

        let mut steps = 1;
        while search.step() == SearchStatus::InProgress {
            steps += 1;
            assert!(steps < 10_000, "search failed to terminate");
        }
        assert!(search.is_complete());
        assert_eq!(*search.path().last().unwrap(), Position::new(58, 58));
    }

    #[test]
    fn test_step_after_completion_stays_complete() {
        let grid = bordered_grid(6, 6);
        let mut search = PathSearch::new(&grid, Position::new(1, 1), Position::new(2, 2));
        while search.step() == SearchStatus::InProgress {}
        assert_eq!(search.step(), SearchStatus::Complete);
    }
}
