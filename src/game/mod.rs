//! # Game Module
//!
//! Core game state management, dungeon representation, and the explorer.
//!
//! This module contains the fundamental building blocks of Delve:
//! - Grid coordinates and the four cardinal directions
//! - Rooms, their contents, and the map that owns them
//! - The explorer and the combat/event resolution it drives
//! - Session state and save/load persistence

pub mod entities;
pub mod explorer;
pub mod map;
pub mod save;
pub mod state;

pub use entities::*;
pub use explorer::*;
pub use map::*;
pub use save::*;
pub use state::*;

use crate::DelveError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Represents a 2D coordinate on the dungeon grid.
///
/// Ordering is lexicographic on `(x, y)`, which is also the iteration order
/// of rooms in a [`Map`].
///
/// # Examples
///
/// ```
/// use delve::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, 5);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Calculates the Manhattan distance to another position.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::Position;
    ///
    /// let pos1 = Position::new(0, 0);
    /// let pos2 = Position::new(3, 4);
    /// assert_eq!(pos1.manhattan_distance(pos2), 7);
    /// ```
    pub fn manhattan_distance(self, other: Position) -> u32 {
        (self.x - other.x).unsigned_abs() + (self.y - other.y).unsigned_abs()
    }

    /// Returns the neighboring position one step in `direction`.
    pub fn offset(self, direction: Direction) -> Position {
        let (dx, dy) = direction.delta();
        Position::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The four cardinal directions a room can connect through.
///
/// Serialized with the labels used by the save format (`norte`, `sur`,
/// `este`, `oeste`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Direction {
    #[serde(rename = "norte")]
    North,
    #[serde(rename = "sur")]
    South,
    #[serde(rename = "este")]
    East,
    #[serde(rename = "oeste")]
    West,
}

impl Direction {
    /// All four directions, in a fixed order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Grid delta for one step in this direction. North is `y - 1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::Direction;
    ///
    /// assert_eq!(Direction::North.delta(), (0, -1));
    /// assert_eq!(Direction::East.delta(), (1, 0));
    /// ```
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    /// The direction pointing back the way this one came.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Lowercase English name, as shown to the player.
    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = DelveError;

    /// Parses a direction token. Accepts full names, one-letter shorthands,
    /// and the save-format labels, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "north" | "n" | "norte" => Ok(Direction::North),
            "south" | "s" | "sur" => Ok(Direction::South),
            "east" | "e" | "este" => Ok(Direction::East),
            "west" | "w" | "o" | "oeste" => Ok(Direction::West),
            other => Err(DelveError::InvalidParameter(format!(
                "'{}' is not a cardinal direction",
                other
            ))),
        }
    }
}
