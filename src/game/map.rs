//! # Dungeon Map
//!
//! The room graph. Rooms live in an arena keyed by grid position and refer to
//! their neighbors by position, so bidirectional links never form ownership
//! cycles.

use crate::game::{Boss, ContentKind, Contents, Direction, EventEffect, Item, Monster, Position};
use crate::{DelveError, DelveResult};
use log::error;
use std::collections::BTreeMap;

/// A node in the dungeon graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    /// Unique identifier, assigned in creation order (the entrance is 0)
    pub id: u32,
    pub position: Position,
    pub contents: Option<Contents>,
    /// Neighbor positions keyed by the direction leading to them
    pub connections: BTreeMap<Direction, Position>,
    pub visited: bool,
    pub is_entrance: bool,
}

impl Room {
    /// Creates an ordinary, unvisited, empty room.
    pub fn new(id: u32, position: Position) -> Self {
        Self {
            id,
            position,
            contents: None,
            connections: BTreeMap::new(),
            visited: false,
            is_entrance: false,
        }
    }

    /// Creates the entrance room.
    pub fn entrance(id: u32, position: Position) -> Self {
        Self {
            is_entrance: true,
            ..Self::new(id, position)
        }
    }

    /// Gets the neighbor reached by going `direction`, if connected.
    pub fn neighbor(&self, direction: Direction) -> Option<Position> {
        self.connections.get(&direction).copied()
    }

    /// Directions with a connection, in fixed order.
    pub fn directions(&self) -> Vec<Direction> {
        self.connections.keys().copied().collect()
    }

    pub fn content_kind(&self) -> Option<ContentKind> {
        self.contents.as_ref().map(Contents::kind)
    }
}

/// Summary counts over a populated map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapStats {
    pub total: usize,
    pub monster_count: usize,
    pub treasure_count: usize,
    pub boss_count: usize,
    pub event_count: usize,
    pub empty_count: usize,
    /// Mean number of connections per room, rounded to two decimals
    pub avg_connections: f64,
}

/// Estimated danger of a room, judged from its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    /// No room at that position
    Unknown,
    Safe,
    Easy,
    Medium,
    Hard,
    Dangerous,
    Deadly,
}

impl Difficulty {
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Unknown => "Unknown",
            Difficulty::Safe => "Safe",
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Dangerous => "Dangerous",
            Difficulty::Deadly => "Deadly",
        }
    }
}

/// A rectangular grid holding a graph of rooms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Map {
    pub width: u32,
    pub height: u32,
    /// All rooms, iterated in lexicographic position order
    pub rooms: BTreeMap<Position, Room>,
    /// Position of the entrance room, once generated
    pub entrance: Option<Position>,
}

impl Map {
    /// Creates an empty map with the given grid bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::Map;
    ///
    /// let map = Map::new(10, 8);
    /// assert_eq!(map.capacity(), 80);
    /// assert!(map.is_empty());
    /// ```
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rooms: BTreeMap::new(),
            entrance: None,
        }
    }

    /// Number of grid cells, i.e. the most rooms the map can hold.
    pub fn capacity(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Largest valid `(x, y)` coordinates.
    ///
    /// Fails if either dimension does not fit the signed coordinate space.
    pub fn max_coordinates(&self) -> DelveResult<(i32, i32)> {
        let to_coordinate = |extent: u32, axis: &str| {
            i32::try_from(extent).map(|extent| extent - 1).map_err(|_| {
                DelveError::InvalidParameter(format!(
                    "Map {} {} exceeds the largest supported coordinate {}",
                    axis,
                    extent,
                    i32::MAX
                ))
            })
        };
        Ok((to_coordinate(self.width, "width")?, to_coordinate(self.height, "height")?))
    }

    /// Checks if a position lies inside the grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.rooms.contains_key(&pos)
    }

    pub fn room(&self, pos: Position) -> Option<&Room> {
        self.rooms.get(&pos)
    }

    pub fn room_mut(&mut self, pos: Position) -> Option<&mut Room> {
        self.rooms.get_mut(&pos)
    }

    /// Positions of all rooms, in lexicographic order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.rooms.keys().copied()
    }

    pub fn entrance_room(&self) -> Option<&Room> {
        self.entrance.and_then(|pos| self.rooms.get(&pos))
    }

    /// Removes every room and forgets the entrance.
    pub fn clear(&mut self) {
        self.rooms.clear();
        self.entrance = None;
    }

    /// Inserts a room at its own position.
    ///
    /// Fails if the position is outside the grid or already occupied. An
    /// entrance room becomes the map's entrance.
    pub fn insert_room(&mut self, room: Room) -> DelveResult<()> {
        let pos = room.position;
        if !self.in_bounds(pos) {
            return Err(DelveError::InvalidParameter(format!(
                "Room {} at {} is outside the {}x{} grid",
                room.id, pos, self.width, self.height
            )));
        }
        if self.rooms.contains_key(&pos) {
            return Err(DelveError::InvalidParameter(format!(
                "Position {} is already occupied",
                pos
            )));
        }
        if room.is_entrance {
            self.entrance = Some(pos);
        }
        self.rooms.insert(pos, room);
        Ok(())
    }

    /// Links the room at `from` with its neighbor in `direction`, in both
    /// directions. Returns the neighbor's position.
    pub fn connect(&mut self, from: Position, direction: Direction) -> DelveResult<Position> {
        let to = from.offset(direction);
        if !self.contains(from) || !self.contains(to) {
            return Err(DelveError::NotFound(format!(
                "Cannot connect {} {}: both rooms must exist",
                from, direction
            )));
        }
        if let Some(room) = self.rooms.get_mut(&from) {
            room.connections.insert(direction, to);
        }
        if let Some(room) = self.rooms.get_mut(&to) {
            room.connections.insert(direction.opposite(), from);
        }
        Ok(to)
    }

    /// Counts rooms per content kind. Empty rooms are not counted.
    pub fn count_by_kind(&self) -> BTreeMap<ContentKind, usize> {
        let mut counts = BTreeMap::new();
        for kind in self.rooms.values().filter_map(Room::content_kind) {
            *counts.entry(kind).or_insert(0) += 1;
        }
        counts
    }

    /// Computes summary statistics over the current rooms.
    pub fn stats(&self) -> MapStats {
        let total = self.rooms.len();
        let counts = self.count_by_kind();
        let count = |kind: ContentKind| counts.get(&kind).copied().unwrap_or(0);
        let total_connections: usize = self.rooms.values().map(|room| room.connections.len()).sum();
        let avg_connections = if total > 0 {
            (total_connections as f64 / total as f64 * 100.0).round() / 100.0
        } else {
            0.0
        };

        MapStats {
            total,
            monster_count: count(ContentKind::Monster),
            treasure_count: count(ContentKind::Treasure),
            boss_count: count(ContentKind::Boss),
            event_count: count(ContentKind::Event),
            empty_count: self.rooms.values().filter(|room| room.contents.is_none()).count(),
            avg_connections,
        }
    }

    /// Whether any room still holds the boss.
    pub fn boss_remaining(&self) -> bool {
        self.rooms
            .values()
            .any(|room| room.content_kind() == Some(ContentKind::Boss))
    }

    pub fn unvisited_rooms(&self) -> Vec<Position> {
        self.rooms
            .values()
            .filter(|room| !room.visited)
            .map(|room| room.position)
            .collect()
    }

    pub fn visited_count(&self) -> usize {
        self.rooms.values().filter(|room| room.visited).count()
    }

    /// Estimates how dangerous the room at `pos` is.
    pub fn room_difficulty(&self, pos: Position) -> Difficulty {
        let Some(room) = self.rooms.get(&pos) else {
            return Difficulty::Unknown;
        };

        match &room.contents {
            None | Some(Contents::Treasure(_)) => Difficulty::Safe,
            Some(Contents::Boss(_)) => Difficulty::Deadly,
            Some(Contents::Monster(monster)) => match monster.health {
                0..=19 => Difficulty::Easy,
                20..=29 => Difficulty::Medium,
                _ => Difficulty::Hard,
            },
            Some(Contents::Event(event)) if event.effect == EventEffect::Trap => Difficulty::Dangerous,
            Some(Contents::Event(_)) => Difficulty::Safe,
        }
    }

    /// A small hand-built dungeon for demos and tests.
    ///
    /// Five rooms on a 5x5 grid forming a single corridor from the entrance
    /// at (2, 2): north to a goblin, east to a sword, south to an orc, and
    /// east again to the Goblin King.
    pub fn sample() -> Self {
        let mut map = Map::new(5, 5);
        if let Err(err) = map.build_sample() {
            error!("Sample dungeon is inconsistent: {}", err);
            map.clear();
        }
        map
    }

    fn build_sample(&mut self) -> DelveResult<()> {
        self.insert_room(Room::entrance(0, Position::new(2, 2)))?;
        for (id, (x, y)) in [(2, 1), (3, 1), (3, 2), (4, 2)].into_iter().enumerate() {
            self.insert_room(Room::new(id as u32 + 1, Position::new(x, y)))?;
        }

        self.connect(Position::new(2, 2), Direction::North)?;
        self.connect(Position::new(2, 1), Direction::East)?;
        self.connect(Position::new(3, 1), Direction::South)?;
        self.connect(Position::new(3, 2), Direction::East)?;

        let contents = [
            (Position::new(2, 1), Contents::Monster(Monster::new(100, "Goblin", 15, 3))),
            (
                Position::new(3, 1),
                Contents::Treasure(Item::new("Iron Sword", "A basic sword", 50)),
            ),
            (Position::new(3, 2), Contents::Monster(Monster::new(101, "Orc", 25, 5))),
            (
                Position::new(4, 2),
                Contents::Boss(Boss::new(
                    Monster::new(999, "Goblin King", 50, 8),
                    Some(Item::new("Golden Crown", "Victory", 1000)),
                )),
            ),
        ];
        for (pos, content) in contents {
            let room = self
                .room_mut(pos)
                .ok_or_else(|| DelveError::NotFound(format!("No room at {}", pos)))?;
            room.contents = Some(content);
        }
        Ok(())
    }
}
