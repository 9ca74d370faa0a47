//! # Dungeon Generation
//!
//! Room graph layout by randomized incremental growth.
//!
//! The generator creates dungeons by:
//! 1. Picking an entrance cell on a random side of the grid border
//! 2. Repeatedly sampling an existing room and carving a new room into the
//!    first free neighboring cell (in shuffled direction order)
//! 3. Linking each new room to the room it grew from
//!
//! Every new room hangs off exactly one existing room, so the result is a
//! tree: connected by construction, with no cycles.

use crate::config;
use crate::game::{Direction, Map, Position, Room};
use crate::{DelveError, DelveResult};
use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

impl Map {
    /// Builds a fresh room graph of `room_count` rooms, replacing any rooms
    /// already on the map.
    ///
    /// Fails with [`DelveError::InvalidParameter`] if `room_count` is outside
    /// `1..=width*height` or a dimension exceeds `i32::MAX`, and with [`DelveError::GenerationFailed`] after
    /// [`config::MAX_STALLED_ROUNDS`] consecutive rounds carve nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{is_connected, Map};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let mut map = Map::new(6, 6);
    /// let mut rng = StdRng::seed_from_u64(7);
    /// map.generate_structure(12, &mut rng).unwrap();
    /// assert_eq!(map.len(), 12);
    /// assert!(is_connected(&map));
    /// ```
    pub fn generate_structure(&mut self, room_count: usize, rng: &mut StdRng) -> DelveResult<()> {
        self.generate_structure_with_limit(room_count, config::MAX_STALLED_ROUNDS, rng)
    }

    /// Like [`Map::generate_structure`], with an explicit stall limit.
    pub fn generate_structure_with_limit(
        &mut self,
        room_count: usize,
        max_stalled_rounds: u32,
        rng: &mut StdRng,
    ) -> DelveResult<()> {
        let capacity = self.capacity();
        if room_count < 1 || room_count > capacity {
            return Err(DelveError::InvalidParameter(format!(
                "Room count must be between 1 and {}, got {}",
                capacity, room_count
            )));
        }

        let max = self.max_coordinates()?;

        self.clear();

        let entrance = Self::pick_entrance(max, rng);
        self.insert_room(Room::entrance(0, entrance))?;
        debug!("Entrance placed at {} on a {}x{} grid", entrance, self.width, self.height);

        // Sampling pool of placed rooms, in creation order.
        let mut placed = vec![entrance];
        let mut next_id = 1u32;
        let mut stalls = StallCounter::new(max_stalled_rounds);
        let mut directions = Direction::ALL;

        while placed.len() < room_count {
            let source = placed[rng.gen_range(0..placed.len())];
            directions.shuffle(rng);

            let target = directions.iter().copied().find_map(|direction| {
                let candidate = source.offset(direction);
                (self.in_bounds(candidate) && !self.contains(candidate))
                    .then_some((direction, candidate))
            });

            match target {
                Some((direction, candidate)) => {
                    self.insert_room(Room::new(next_id, candidate))?;
                    self.connect(source, direction)?;
                    placed.push(candidate);
                    next_id += 1;
                    stalls.reset();
                }
                None => {
                    let exhausted = stalls.record_stall();
                    trace!("Room at {} has no free neighbor ({} stalled rounds)", source, stalls.rounds());
                    if exhausted {
                        warn!(
                            "Generation stalled after placing {} of {} rooms",
                            placed.len(),
                            room_count
                        );
                        return Err(DelveError::GenerationFailed(format!(
                            "Stalled after {} consecutive rounds with {} of {} rooms placed",
                            stalls.rounds(),
                            placed.len(),
                            room_count
                        )));
                    }
                }
            }
        }

        debug!("Generated {} rooms", self.len());
        Ok(())
    }

    /// Picks a uniformly random side of the border, then a uniformly random
    /// cell along it.
    fn pick_entrance((max_x, max_y): (i32, i32), rng: &mut StdRng) -> Position {
        match Direction::ALL[rng.gen_range(0..Direction::ALL.len())] {
            Direction::North => Position::new(rng.gen_range(0..=max_x), 0),
            Direction::South => Position::new(rng.gen_range(0..=max_x), max_y),
            Direction::East => Position::new(max_x, rng.gen_range(0..=max_y)),
            Direction::West => Position::new(0, rng.gen_range(0..=max_y)),
        }
    }
}

/// Run of consecutive rounds that carved nothing.
#[derive(Debug, Clone, Copy)]
struct StallCounter {
    limit: u32,
    rounds: u32,
}

impl StallCounter {
    fn new(limit: u32) -> Self {
        Self { limit, rounds: 0 }
    }

    /// Records one fruitless round. Returns true once the run reaches the limit.
    fn record_stall(&mut self) -> bool {
        self.rounds += 1;
        self.rounds >= self.limit
    }

    fn reset(&mut self) {
        self.rounds = 0;
    }

    fn rounds(self) -> u32 {
        self.rounds
    }
}
