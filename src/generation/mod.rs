//! # Generation System
//!
//! Pluggable map generators behind the [`MapGenerator`] trait, plus the
//! shared tuning knobs in [`GenerationConfig`].
//!
//! A generator owns its randomness: every generator is seeded from the config
//! and produces identical output for identical seeds. The level pipeline in
//! [`crate::Level`] calls the trait methods in a fixed order
//! (`generate_base_layout`, `place_player`, `place_exit`, `place_ore`,
//! `place_spawners`), so implementors may assume that order.

pub mod cave;
pub mod empty;
pub mod reader;
pub mod rooms;

pub use cave::CaveGenerator;
pub use empty::EmptyGenerator;
pub use reader::FileReaderGenerator;

use crate::game::{Grid, Position, TileType};
use crate::CavernResult;
use serde::{Deserialize, Serialize};

/// Tuning parameters for map generation.
///
/// All randomness used during generation flows from `seed`, which makes any
/// generated level reproducible from its config alone.
///
/// # Examples
///
/// ```
/// use cavern::GenerationConfig;
///
/// let config = GenerationConfig::new(12345);
/// assert_eq!(config.seed, 12345);
/// assert_eq!(config.automaton_steps, 10);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Seed for the generation RNG.
    pub seed: u64,
    /// Probability that an interior cell starts as wall.
    pub init_rate: f64,
    /// Number of cellular-automaton smoothing passes.
    pub automaton_steps: u32,
    /// A wall cell with fewer than this many wall neighbors dies.
    pub death_limit: u32,
    /// A floor cell with more than this many wall neighbors becomes wall.
    pub birth_limit: u32,
    /// Caves smaller than this are sealed off during connectivity repair.
    pub min_cave_size: usize,
    /// Closest room pairs connected per repair iteration.
    pub connections_per_turn: usize,
    /// Probability of accepting a floor tile during the start/exit corner scan.
    pub spawn_chance: f64,
    /// Largest number of ore tiles a single vein may grow to.
    pub max_per_vein: u32,
    /// Rejection-sampling attempts before ore placement gives up.
    pub max_ore_attempts: u32,
    /// Rejection-sampling attempts before spawner placement gives up.
    pub max_spawner_attempts: u32,
}

impl GenerationConfig {
    /// Creates a config with the standard cave tuning and the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            init_rate: 0.5,
            automaton_steps: 10,
            death_limit: 4,
            birth_limit: 4,
            min_cave_size: 1,
            connections_per_turn: 5,
            spawn_chance: 0.05,
            max_per_vein: 6,
            max_ore_attempts: 500,
            max_spawner_attempts: 100,
        }
    }

    /// Creates a config suited to fast unit tests (fewer smoothing passes).
    pub fn for_testing(seed: u64) -> Self {
        Self {
            automaton_steps: 4,
            ..Self::new(seed)
        }
    }

    /// Loads a config from a JSON file.
    pub fn from_json_file(path: &std::path::Path) -> CavernResult<Self> {
        Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
    }

    /// Saves the config as pretty-printed JSON.
    pub fn to_json_file(&self, path: &std::path::Path) -> CavernResult<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// A kind of ore to scatter, how much of it, and how aggressively it clumps.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OreSpec {
    /// The ore tile to place.
    pub tile: TileType,
    /// Total tiles of this ore to place across the level.
    pub count: u32,
    /// Per-neighbor probability that a vein grows into an adjacent floor tile.
    pub chunk_chance: f64,
}

/// A kind of enemy spawner and how many of them to place.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpawnerSpec {
    /// The spawner tile to place.
    pub tile: TileType,
    /// Number of spawners of this kind.
    pub count: u32,
}

/// Interface implemented by every map generator.
///
/// Generators mutate the grid they are handed; the level pipeline owns the
/// grid and the call order. `place_player` and `place_exit` write marker
/// tiles into the grid and return the chosen position; the pipeline
/// normalizes the markers back to floor once recorded.
pub trait MapGenerator {
    /// Produces the base tile layout, before any feature placement.
    fn generate_base_layout(&mut self) -> CavernResult<Grid>;

    /// Chooses and marks the player start.
    fn place_player(&mut self, grid: &mut Grid) -> CavernResult<Position>;

    /// Chooses and marks the level exit.
    fn place_exit(&mut self, grid: &mut Grid) -> CavernResult<Position>;

    /// Scatters ore veins per the given specs.
    fn place_ore(&mut self, grid: &mut Grid, ores: &[OreSpec]) -> CavernResult<()>;

    /// Places enemy spawners per the given specs.
    fn place_spawners(&mut self, grid: &mut Grid, spawners: &[SpawnerSpec]) -> CavernResult<()>;

    /// Short human-readable name, used in logs.
    fn generator_type(&self) -> &'static str;
}

/// RNG plumbing shared by the generators.
pub mod utils {
    use super::GenerationConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Builds the deterministic RNG a generator draws from.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }
}
