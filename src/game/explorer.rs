//! # Explorer
//!
//! The player-controlled agent. An explorer is a navigational cursor over a
//! [`Map`]: it owns its stats and inventory but only borrows the map it walks.

use crate::config;
use crate::game::{Direction, Item, Map, Position};
use crate::{DelveError, DelveResult};
use log::{debug, warn};
use rand::rngs::StdRng;

/// Narrative returned when exploring a room with nothing in it.
pub const EMPTY_ROOM_MESSAGE: &str = "The room is empty.";

/// Narrative returned when the explorer stands outside every room.
pub const INVALID_POSITION_MESSAGE: &str = "Error: invalid position";

/// The player-controlled agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explorer {
    /// Current health; the explorer is dead at 0
    pub health: u32,
    /// Damage dealt per landed hit
    pub damage: u32,
    /// Items in acquisition order
    pub inventory: Vec<Item>,
    pub position: Position,
}

impl Explorer {
    /// Creates an explorer with default stats at `position`.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Explorer, Position};
    ///
    /// let explorer = Explorer::new(Position::new(0, 3));
    /// assert!(explorer.is_alive());
    /// assert!(explorer.inventory.is_empty());
    /// ```
    pub fn new(position: Position) -> Self {
        Self::with_stats(
            position,
            config::DEFAULT_EXPLORER_HEALTH,
            config::DEFAULT_EXPLORER_DAMAGE,
        )
    }

    pub fn with_stats(position: Position, health: u32, damage: u32) -> Self {
        Self {
            health,
            damage,
            inventory: Vec::new(),
            position,
        }
    }

    /// Places a new explorer at the map's entrance and marks it visited.
    pub fn enter(map: &mut Map, health: u32, damage: u32) -> DelveResult<Self> {
        let entrance = map
            .entrance
            .ok_or_else(|| DelveError::Precondition("Map has no entrance".to_string()))?;
        let room = map.room_mut(entrance).ok_or_else(|| {
            DelveError::NotFound(format!("Entrance {} is not a room", entrance))
        })?;
        room.visited = true;
        Ok(Self::with_stats(entrance, health, damage))
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Applies damage, flooring health at zero.
    pub fn take_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    /// Total gold value of everything carried.
    pub fn inventory_value(&self) -> u64 {
        self.inventory.iter().map(|item| u64::from(item.value)).sum()
    }

    /// Moves through the current room's connection in `direction`.
    ///
    /// Returns false, changing nothing, if the explorer is not in a room or
    /// the room has no exit that way. On success the destination is marked
    /// visited.
    pub fn move_direction(&mut self, map: &mut Map, direction: Direction) -> bool {
        let Some(destination) = map
            .room(self.position)
            .and_then(|room| room.neighbor(direction))
        else {
            return false;
        };
        let Some(room) = map.room_mut(destination) else {
            warn!("Connection from {} points at missing room {}", self.position, destination);
            return false;
        };

        room.visited = true;
        debug!("Explorer moved {} to {}", direction, destination);
        self.position = destination;
        true
    }

    /// Parses `token` as a direction and moves that way.
    ///
    /// Anything other than a cardinal direction returns false without side
    /// effects.
    pub fn move_by_name(&mut self, map: &mut Map, token: &str) -> bool {
        match token.parse::<Direction>() {
            Ok(direction) => self.move_direction(map, direction),
            Err(_) => false,
        }
    }

    /// Directions the explorer can leave the current room by.
    pub fn adjacent_directions(&self, map: &Map) -> Vec<Direction> {
        map.room(self.position)
            .map(|room| room.directions())
            .unwrap_or_default()
    }

    /// Explores the current room and interacts with whatever it holds.
    ///
    /// Resolved contents (collected treasure, defeated monsters, triggered
    /// events) are removed from the room. A monster that wins stays behind
    /// with whatever health it has left. Exploring an empty room always
    /// returns [`EMPTY_ROOM_MESSAGE`].
    pub fn explore_room(&mut self, map: &mut Map, rng: &mut StdRng) -> String {
        let origin = self.position;
        let Some(room) = map.room_mut(origin) else {
            warn!("Explore requested at {}, which is not a room", origin);
            return INVALID_POSITION_MESSAGE.to_string();
        };

        room.visited = true;
        let Some(mut contents) = room.contents.take() else {
            return EMPTY_ROOM_MESSAGE.to_string();
        };

        let interaction = contents.interact(self, map, rng);
        if !interaction.resolved {
            if let Some(room) = map.room_mut(origin) {
                room.contents = Some(contents);
            }
        }

        interaction.narrative
    }
}
