//! # Connectivity Repair
//!
//! A raw cellular-automaton pass leaves the map as a scatter of disconnected
//! caves. This module discovers those caves as [`Room`]s via flood fill,
//! seals the ones below the minimum size, and tunnels between the rest until
//! a single connected region remains.
//!
//! Tunnels are L-shaped with a jittered width, and short tunnels are usually
//! carved out of `Blockage` rather than `Floor` so the player has to dig
//! through them.

use crate::config::BORDER_SIZE;
use crate::game::{Grid, Position, TileType};
use crate::generation::GenerationConfig;
use log::debug;
use rand::rngs::StdRng;
use rand::Rng;

/// A connected region of passable tiles found by flood fill.
#[derive(Debug, Clone)]
pub struct Room {
    /// Number of tiles in the region.
    pub size: usize,
    /// Region tiles with at least one orthogonal `Wall` neighbor.
    pub edge_tiles: Vec<Position>,
}

impl Room {
    /// Finds the closest pair of edge tiles between this room and `other`.
    ///
    /// Returns the Euclidean distance and the two endpoints, ours first.
    pub fn nearest_link(&self, other: &Room) -> (f64, Position, Position) {
        let mut best = (f64::INFINITY, self.edge_tiles[0], other.edge_tiles[0]);
        for &a in &self.edge_tiles {
            for &b in &other.edge_tiles {
                let d = a.euclidean_distance(b);
                if d < best.0 {
                    best = (d, a, b);
                }
            }
        }
        best
    }
}

/// A candidate tunnel between two rooms.
struct Link {
    distance: f64,
    a: Position,
    b: Position,
}

/// Discovers all caves and seals those smaller than `min_cave_size`.
///
/// Caves are 4-connected regions of floor and blockage, seeded from floor
/// tiles. Sealed caves are filled with wall and not returned.
pub fn discover_rooms(grid: &mut Grid, min_cave_size: usize) -> Vec<Room> {
    let mut visited = vec![vec![false; grid.width()]; grid.height()];
    let mut rooms = Vec::new();

    for seed in grid.positions().collect::<Vec<_>>() {
        if visited[seed.y as usize][seed.x as usize] || grid.get(seed) != Some(TileType::Floor) {
            continue;
        }

        let region = flood_fill(grid, seed, &mut visited);
        if region.len() < min_cave_size {
            for pos in region {
                let _ = grid.set(pos, TileType::Wall);
            }
            continue;
        }

        let edge_tiles = region
            .iter()
            .copied()
            .filter(|pos| {
                pos.orthogonal_neighbors()
                    .iter()
                    .any(|&n| grid.get(n) == Some(TileType::Wall))
            })
            .collect();
        rooms.push(Room {
            size: region.len(),
            edge_tiles,
        });
    }

    rooms
}

/// 4-connected flood fill over floor and blockage tiles.
fn flood_fill(grid: &Grid, seed: Position, visited: &mut [Vec<bool>]) -> Vec<Position> {
    let mut region = Vec::new();
    let mut queue = std::collections::VecDeque::new();
    visited[seed.y as usize][seed.x as usize] = true;
    queue.push_back(seed);

    while let Some(pos) = queue.pop_front() {
        region.push(pos);
        for next in pos.orthogonal_neighbors() {
            if !grid.in_bounds(next) || visited[next.y as usize][next.x as usize] {
                continue;
            }
            match grid.get(next) {
                Some(TileType::Floor) | Some(TileType::Blockage) => {
                    visited[next.y as usize][next.x as usize] = true;
                    queue.push_back(next);
                }
                _ => {}
            }
        }
    }

    region
}

/// Tunnels between caves until the map is a single connected region.
///
/// Each iteration rediscovers the caves, ranks every pair by the distance of
/// its closest edge tiles, and carves the closest few
/// (`connections_per_turn`) before measuring again.
pub fn connect_all_rooms(grid: &mut Grid, config: &GenerationConfig, rng: &mut StdRng) {
    let margin = interior_margin(grid);

    loop {
        let rooms = discover_rooms(grid, config.min_cave_size);
        if rooms.len() < 2 {
            break;
        }
        debug!("connectivity repair: {} caves remain", rooms.len());

        let mut links = Vec::new();
        for i in 0..rooms.len() {
            for j in i + 1..rooms.len() {
                let (distance, a, b) = rooms[i].nearest_link(&rooms[j]);
                links.push(Link { distance, a, b });
            }
        }
        links.sort_by(|a, b| a.distance.total_cmp(&b.distance));

        for link in links.into_iter().take(config.connections_per_turn) {
            carve_connection(grid, &link, rng, margin);
        }
    }
}

/// Carves an L-shaped tunnel between the link's endpoints.
///
/// The horizontal leg runs at the left endpoint's row, the vertical leg at
/// the right endpoint's column, meeting at the corner. Each column or row of
/// the tunnel gets a randomly jittered thickness. Short tunnels are usually
/// filled with blockage instead of floor.
fn carve_connection(grid: &mut Grid, link: &Link, rng: &mut StdRng, margin: i32) {
    let material = if rng.gen::<f64>() < 0.7 && link.distance < 3.0 {
        TileType::Blockage
    } else {
        TileType::Floor
    };

    let (left, right) = if link.a.x < link.b.x {
        (link.a, link.b)
    } else {
        (link.b, link.a)
    };

    for x in left.x + 1..right.x {
        for dy in jittered_span(rng) {
            carve_at(grid, Position::new(x, left.y + dy), material, margin);
        }
    }

    let (y_lo, y_hi) = if left.y < right.y {
        (left.y, right.y)
    } else {
        (right.y, left.y)
    };
    for y in y_lo + 1..y_hi {
        for dx in jittered_span(rng) {
            carve_at(grid, Position::new(right.x + dx, y), material, margin);
        }
    }

    carve_at(grid, Position::new(right.x, left.y), material, margin);
}

/// Random thickness offsets for one column or row of a tunnel.
fn jittered_span(rng: &mut StdRng) -> std::ops::RangeInclusive<i32> {
    let roll = rng.gen::<f64>();
    if roll < 0.5 {
        -1..=1
    } else if roll < 0.75 {
        -2..=1
    } else {
        -1..=2
    }
}

/// Writes a tunnel tile, skipping anything inside the sealed border ring.
///
/// Existing floor is never overwritten: tunnels only open walls, so the
/// rooms they join come through repair unchanged.
fn carve_at(grid: &mut Grid, pos: Position, material: TileType, margin: i32) {
    if pos.x < margin
        || pos.y < margin
        || pos.x >= grid.width() as i32 - margin
        || pos.y >= grid.height() as i32 - margin
    {
        return;
    }
    if grid.get(pos) == Some(TileType::Floor) {
        return;
    }
    let _ = grid.set(pos, material);
}

/// Width of the ring tunnels must not touch.
///
/// Full-size generated grids keep their whole sealed border; the tiny grids
/// used in tests keep a 1-tile ring.
fn interior_margin(grid: &Grid) -> i32 {
    if grid.width() > 2 * BORDER_SIZE && grid.height() > 2 * BORDER_SIZE {
        BORDER_SIZE as i32
    } else {
        1
    }
}
