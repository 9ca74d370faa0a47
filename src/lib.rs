//! # Delve
//!
//! A turn-based, text-driven dungeon crawler built on a procedurally generated
//! room graph.
//!
//! ## Architecture Overview
//!
//! The crate is split along the lifecycle of a single game:
//!
//! - **Generation**: grows a connected tree of rooms from a border entrance,
//!   then places a boss, monsters, treasure and events by distance from it
//! - **Game**: the room graph, the explorer cursor moving over it, combat and
//!   event resolution, and the session that ties them to one seeded RNG
//! - **Utils**: graph queries (connectivity, shortest path, farthest room)
//!   and stat scaling helpers
//! - **Input / Rendering**: the thin text command parser and ASCII views used
//!   by the `delve` binary
//!
//! All randomness flows through a caller-supplied [`rand::rngs::StdRng`], so a
//! seed fully determines a dungeon and every fight fought in it.

pub mod game;
pub mod generation;
pub mod input;
pub mod rendering;
pub mod utils;

// Core module re-exports
pub use game::*;
pub use generation::*;
pub use input::*;
pub use rendering::*;
pub use utils::*;

/// Core error type for the Delve engine.
#[derive(thiserror::Error, Debug)]
pub enum DelveError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// A caller-supplied value is out of range or unrecognized
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// An operation was attempted before the map was ready for it
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// A save file or map location does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A save file parsed but does not describe a consistent dungeon
    #[error("Malformed save: {0}")]
    MalformedSave(String),
}

/// Result type used throughout the Delve codebase.
pub type DelveResult<T> = Result<T, DelveError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Default dungeon width in rooms
    pub const DEFAULT_MAP_WIDTH: u32 = 10;

    /// Default dungeon height in rooms
    pub const DEFAULT_MAP_HEIGHT: u32 = 10;

    /// Default number of rooms to carve
    pub const DEFAULT_ROOM_COUNT: usize = 20;

    /// Consecutive rounds without a new room before generation gives up
    pub const MAX_STALLED_ROUNDS: u32 = 20;

    /// Default explorer starting health
    pub const DEFAULT_EXPLORER_HEALTH: u32 = 100;

    /// Default explorer attack damage
    pub const DEFAULT_EXPLORER_DAMAGE: u32 = 10;

    /// Default save slot
    pub const DEFAULT_SAVE_FILE: &str = "delve_save.json";
}
