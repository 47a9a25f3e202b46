//! # Cavern
//!
//! Procedural cave-level generation core with incremental grid pathfinding.
//!
//! ## Architecture Overview
//!
//! Cavern is the engine-independent heart of a 2D top-down cave game. The
//! host runtime (rendering, input, audio) talks to it through a small set of
//! interfaces:
//!
//! - **Grid**: the 2D tile matrix with its border and wall-adjacency invariants
//! - **Generation System**: pluggable map generators (cellular-automaton caves,
//!   empty arenas, level files) behind the [`MapGenerator`] trait
//! - **Level**: the per-session aggregate built by running a generator through
//!   the full placement pipeline
//! - **PathFinder**: a breadth-first search over the grid that runs in bounded
//!   increments so AI agents never stall a frame
//!
//! All state is explicitly owned and passed by reference; there are no ambient
//! globals. Generation is fully deterministic for a given seed.

pub mod game;
pub mod generation;
pub mod levelfile;
pub mod pathfinding;

// Explicit re-exports for commonly used types
pub use game::{
    // From entity
    Entity,
    EntityAction,
    EntityId,
    EntityKind,
    // From grid
    Grid,
    // From level
    Level,
    PortalColor,
    PortalPair,
    PortalPairs,
    Position,
    TileType,
};

pub use generation::{
    CaveGenerator, EmptyGenerator, FileReaderGenerator, GenerationConfig, MapGenerator, OreSpec,
    SpawnerSpec,
};

pub use levelfile::{load_level_file, read_level_file, write_level_file};
pub use pathfinding::{find_path, PathSearch, SearchStatus};

/// Core error type for the cavern engine.
#[derive(thiserror::Error, Debug)]
pub enum CavernError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Grid or level is in an invalid state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// A level file could not be parsed
    #[error("Malformed level file: {0}")]
    MalformedLevelFile(String),
}

/// Result type used throughout the cavern codebase.
pub type CavernResult<T> = Result<T, CavernError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine configuration constants.
pub mod config {
    /// Thickness of the solid wall border surrounding every generated level.
    pub const BORDER_SIZE: usize = 30;

    /// Minimum playable grid width; smaller requests are clamped up.
    pub const MIN_WIDTH: usize = 30;

    /// Minimum playable grid height; smaller requests are clamped up.
    pub const MIN_HEIGHT: usize = 30;

    /// Default playable level width requested by the game loop.
    pub const DEFAULT_LEVEL_WIDTH: usize = 150;

    /// Default playable level height requested by the game loop.
    pub const DEFAULT_LEVEL_HEIGHT: usize = 150;
}
