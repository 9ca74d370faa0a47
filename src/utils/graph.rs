//! # Graph Queries
//!
//! Breadth-first queries over the room graph: reachability from the
//! entrance, shortest routes between rooms, and the room farthest from a
//! point.

use crate::game::{Map, Position};
use pathfinding::prelude::{bfs, bfs_reach};

/// Neighbors of `pos` through its connections.
fn successors(map: &Map, pos: &Position) -> Vec<Position> {
    map.room(*pos)
        .map(|room| room.connections.values().copied().collect())
        .unwrap_or_default()
}

/// Checks whether every room is reachable from the entrance.
///
/// An empty map, or one without an entrance, is not connected.
pub fn is_connected(map: &Map) -> bool {
    let Some(entrance) = map.entrance.filter(|&pos| map.contains(pos)) else {
        return false;
    };

    bfs_reach(entrance, |pos| successors(map, pos)).count() == map.len()
}

/// Finds the shortest route between two rooms.
///
/// The route lists every position from `start` to `goal`, both included.
/// It is empty if either end is not a room or `goal` is unreachable, and
/// just `[start]` when the two are equal.
///
/// # Examples
///
/// ```
/// use delve::{shortest_path, Map, Position};
///
/// let map = Map::sample();
/// let path = shortest_path(&map, Position::new(2, 2), Position::new(3, 1));
/// assert_eq!(path, vec![Position::new(2, 2), Position::new(2, 1), Position::new(3, 1)]);
/// ```
pub fn shortest_path(map: &Map, start: Position, goal: Position) -> Vec<Position> {
    if !map.contains(start) || !map.contains(goal) {
        return Vec::new();
    }

    bfs(&start, |pos| successors(map, pos), |pos| *pos == goal).unwrap_or_default()
}

/// Finds the room with the greatest Manhattan distance from `origin`.
///
/// Ties go to the first room in lexicographic position order. Returns
/// `None` only for an empty map.
pub fn farthest_room(map: &Map, origin: Position) -> Option<Position> {
    let mut best: Option<(Position, u32)> = None;
    for pos in map.positions() {
        let distance = origin.manhattan_distance(pos);
        if best.map_or(true, |(_, max)| distance > max) {
            best = Some((pos, distance));
        }
    }
    best.map(|(pos, _)| pos)
}
