//! # Content Placement
//!
//! Populates a finished room graph. The boss takes the room farthest from the
//! entrance; a random share of the remaining rooms receives monsters,
//! treasure and events, all scaled by how deep the room lies.

use crate::game::{Boss, Contents, Event, EventEffect, Item, Map, Monster, Position};
use crate::{distance_factor, farthest_room, scale_stat, DelveError, DelveResult};
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// Boss identifier; there is only ever one.
pub const BOSS_ID: u32 = 9999;

/// First monster identifier; monsters are numbered from here in placement order.
pub const MONSTER_ID_BASE: u32 = 1000;

const BOSS_NAME: &str = "Dark Lord";
const MONSTER_NAMES: [&str; 5] = ["Goblin", "Orc", "Skeleton", "Zombie", "Spider"];
const TREASURE_NAMES: [&str; 5] = ["Gold", "Gem", "Sword", "Armor", "Potion"];

/// Share of the non-entrance, non-boss rooms given to each content kind.
/// Each range is sampled independently, half-open.
pub const MONSTER_SHARE: (f64, f64) = (0.20, 0.30);
pub const TREASURE_SHARE: (f64, f64) = (0.15, 0.25);
pub const EVENT_SHARE: (f64, f64) = (0.05, 0.10);

/// The boss's special reward.
pub fn boss_reward() -> Item {
    Item::new("Crown of the Conqueror", "Victory", 1000)
}

impl Map {
    /// Assigns contents to the rooms of a generated map.
    ///
    /// Fails with [`DelveError::Precondition`] if the map has no entrance or
    /// no room besides it. Any contents already present are replaced.
    pub fn place_contents(&mut self, rng: &mut StdRng) -> DelveResult<()> {
        let entrance = self
            .entrance
            .filter(|&pos| self.contains(pos))
            .ok_or_else(|| DelveError::Precondition("Map has no entrance room".to_string()))?;

        let mut available: Vec<Position> = self.positions().filter(|&pos| pos != entrance).collect();
        if available.is_empty() {
            return Err(DelveError::Precondition(
                "Map needs at least one room besides the entrance".to_string(),
            ));
        }

        for room in self.rooms.values_mut() {
            room.contents = None;
        }

        let distances: HashMap<Position, u32> = available
            .iter()
            .map(|&pos| (pos, entrance.manhattan_distance(pos)))
            .collect();
        let max_distance = distances.values().copied().max().unwrap_or(0);

        let boss_pos = farthest_room(self, entrance)
            .filter(|pos| *pos != entrance)
            .ok_or_else(|| DelveError::Precondition("No room available for the boss".to_string()))?;
        available.retain(|&pos| pos != boss_pos);

        let factor = distance_factor(distances[&boss_pos], max_distance, 1.0);
        let boss = Boss::new(
            Monster::new(
                BOSS_ID,
                BOSS_NAME,
                scale_stat(50, 50, factor),
                scale_stat(15, 15, factor),
            ),
            Some(boss_reward()),
        );
        debug!(
            "Boss placed at {} (distance {}, health {}, damage {})",
            boss_pos, distances[&boss_pos], boss.monster.health, boss.monster.damage
        );
        self.set_contents(boss_pos, Contents::Boss(boss));

        let remaining = available.len();
        let monster_count = share_of(remaining, MONSTER_SHARE, rng);
        let treasure_count = share_of(remaining, TREASURE_SHARE, rng);
        let event_count = share_of(remaining, EVENT_SHARE, rng);

        available.shuffle(rng);
        let mut slots = available.into_iter().enumerate();

        for (i, pos) in slots.by_ref().take(monster_count) {
            let factor = distance_factor(distances[&pos], max_distance, 0.5);
            let name = MONSTER_NAMES[rng.gen_range(0..MONSTER_NAMES.len())];
            let monster = Monster::new(
                MONSTER_ID_BASE + i as u32,
                name,
                scale_stat(20, 30, factor),
                scale_stat(5, 10, factor),
            );
            self.set_contents(pos, Contents::Monster(monster));
        }

        for (_, pos) in slots.by_ref().take(treasure_count) {
            let factor = distance_factor(distances[&pos], max_distance, 0.5);
            let name = TREASURE_NAMES[rng.gen_range(0..TREASURE_NAMES.len())];
            let item = Item::new(name, "Valuable treasure", scale_stat(50, 150, factor));
            self.set_contents(pos, Contents::Treasure(item));
        }

        for (_, pos) in slots.by_ref().take(event_count) {
            let event = random_event(rng);
            self.set_contents(pos, Contents::Event(event));
        }

        debug!(
            "Placed {} monsters, {} treasures, {} events among {} rooms",
            monster_count, treasure_count, event_count, remaining
        );
        Ok(())
    }

    fn set_contents(&mut self, pos: Position, contents: Contents) {
        if let Some(room) = self.room_mut(pos) {
            room.contents = Some(contents);
        }
    }
}

/// `floor(rooms * U[low, high))`.
fn share_of(rooms: usize, (low, high): (f64, f64), rng: &mut StdRng) -> usize {
    (rooms as f64 * rng.gen_range(low..high)) as usize
}

/// Rolls a random event: uniform subtype, then a subtype-specific magnitude.
fn random_event(rng: &mut StdRng) -> Event {
    match EventEffect::ALL[rng.gen_range(0..EventEffect::ALL.len())] {
        EventEffect::Trap => {
            Event::new("Trap", "A trap springs!", EventEffect::Trap, rng.gen_range(1..=3))
        }
        EventEffect::Heal => Event::new(
            "Fountain",
            "Crystal-clear water",
            EventEffect::Heal,
            rng.gen_range(2..=5),
        ),
        EventEffect::Teleport => Event::new("Portal", "It pulls you in", EventEffect::Teleport, 0),
        EventEffect::Buff => Event::new(
            "Altar",
            "Strength surges through you",
            EventEffect::Buff,
            rng.gen_range(1..=3),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{ContentKind, Room};
    use rand::SeedableRng;

    fn generated(width: u32, height: u32, rooms: usize, seed: u64) -> (Map, StdRng) {
        let mut map = Map::new(width, height);
        let mut rng = StdRng::seed_from_u64(seed);
        map.generate_structure(rooms, &mut rng).unwrap();
        (map, rng)
    }

    #[test]
    fn test_placement_requires_entrance() {
        let mut map = Map::new(3, 3);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(map.place_contents(&mut rng), Err(DelveError::Precondition(_))));
    }

    #[test]
    fn test_placement_requires_second_room() {
        let (mut map, mut rng) = generated(3, 3, 1, 4);
        assert!(matches!(map.place_contents(&mut rng), Err(DelveError::Precondition(_))));
        assert!(map.entrance_room().unwrap().contents.is_none());
    }

    #[test]
    fn test_two_rooms_get_a_full_strength_boss() {
        let (mut map, mut rng) = generated(3, 3, 2, 8);
        map.place_contents(&mut rng).unwrap();

        let stats = map.stats();
        assert_eq!(stats.boss_count, 1);
        assert_eq!(stats.empty_count, 1);

        let boss_room = map.rooms.values().find(|room| !room.is_entrance).unwrap();
        match &boss_room.contents {
            Some(Contents::Boss(boss)) => {
                assert_eq!(boss.monster.id, BOSS_ID);
                assert_eq!(boss.monster.health, 100);
                assert_eq!(boss.monster.damage, 30);
                assert_eq!(boss.reward, Some(boss_reward()));
            }
            other => panic!("expected boss, found {:?}", other),
        }
    }

    #[test]
    fn test_boss_sits_at_maximum_distance() {
        for seed in 0..40 {
            let (mut map, mut rng) = generated(8, 8, 30, seed);
            map.place_contents(&mut rng).unwrap();

            let entrance = map.entrance.unwrap();
            let max = map
                .positions()
                .map(|pos| entrance.manhattan_distance(pos))
                .max()
                .unwrap();
            let boss_positions: Vec<_> = map
                .rooms
                .values()
                .filter(|room| room.content_kind() == Some(ContentKind::Boss))
                .map(|room| room.position)
                .collect();

            assert_eq!(boss_positions.len(), 1);
            assert_eq!(entrance.manhattan_distance(boss_positions[0]), max);
            assert!(map.entrance_room().unwrap().contents.is_none());
        }
    }

    #[test]
    fn test_content_shares_within_ranges() {
        for seed in 0..40 {
            let (mut map, mut rng) = generated(10, 10, 60, seed);
            map.place_contents(&mut rng).unwrap();

            let stats = map.stats();
            let rest = (stats.total - 2) as f64;
            let within = |count: usize, (low, high): (f64, f64)| {
                count >= (rest * low) as usize && count <= (rest * high) as usize
            };

            assert!(within(stats.monster_count, MONSTER_SHARE), "monsters {}", stats.monster_count);
            assert!(within(stats.treasure_count, TREASURE_SHARE), "treasure {}", stats.treasure_count);
            assert!(within(stats.event_count, EVENT_SHARE), "events {}", stats.event_count);
            assert_eq!(
                stats.monster_count
                    + stats.treasure_count
                    + stats.event_count
                    + stats.boss_count
                    + stats.empty_count,
                stats.total
            );
        }
    }

    #[test]
    fn test_stats_scale_with_distance() {
        for seed in 0..20 {
            let (mut map, mut rng) = generated(10, 10, 50, seed);
            map.place_contents(&mut rng).unwrap();

            for room in map.rooms.values() {
                match &room.contents {
                    Some(Contents::Monster(monster)) => {
                        assert!((20..=50).contains(&monster.health));
                        assert!((5..=15).contains(&monster.damage));
                        assert!(monster.id >= MONSTER_ID_BASE);
                        assert!(MONSTER_NAMES.contains(&monster.name.as_str()));
                    }
                    Some(Contents::Treasure(item)) => {
                        assert!((50..=200).contains(&item.value));
                        assert!(TREASURE_NAMES.contains(&item.name.as_str()));
                    }
                    Some(Contents::Event(event)) => match event.effect {
                        EventEffect::Trap | EventEffect::Buff => {
                            assert!((1..=3).contains(&event.magnitude))
                        }
                        EventEffect::Heal => assert!((2..=5).contains(&event.magnitude)),
                        EventEffect::Teleport => assert_eq!(event.magnitude, 0),
                    },
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn test_replacing_contents_keeps_one_boss() {
        let (mut map, mut rng) = generated(6, 6, 20, 5);
        map.place_contents(&mut rng).unwrap();
        map.place_contents(&mut rng).unwrap();
        assert_eq!(map.stats().boss_count, 1);
    }

    #[test]
    fn test_boss_tie_break_is_first_in_position_order() {
        let mut map = Map::new(3, 3);
        map.insert_room(Room::entrance(0, Position::new(1, 0))).unwrap();
        map.insert_room(Room::new(1, Position::new(0, 0))).unwrap();
        map.insert_room(Room::new(2, Position::new(2, 0))).unwrap();
        map.connect(Position::new(1, 0), crate::Direction::West).unwrap();
        map.connect(Position::new(1, 0), crate::Direction::East).unwrap();

        map.place_contents(&mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(
            map.room(Position::new(0, 0)).unwrap().content_kind(),
            Some(ContentKind::Boss)
        );
    }
}
