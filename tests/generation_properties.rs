//! Property tests for dungeon generation and content placement.

use delve::{
    farthest_room, is_connected, shortest_path, ContentKind, DelveError, DungeonGenerator,
    GenerationConfig, Generator, Map,
};
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

fn links_are_symmetric(map: &Map) -> bool {
    map.rooms.values().all(|room| {
        room.connections.iter().all(|(&direction, &neighbor)| {
            neighbor == room.position.offset(direction)
                && map
                    .room(neighbor)
                    .and_then(|back| back.neighbor(direction.opposite()))
                    == Some(room.position)
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn generated_structure_is_connected_and_symmetric(
        seed in any::<u64>(),
        width in 1_u32..=12,
        height in 1_u32..=12,
        fill in 0.0_f64..=1.0,
    ) {
        let capacity = (width * height) as usize;
        let room_count = ((capacity as f64 * fill) as usize).clamp(1, capacity);
        let mut map = Map::new(width, height);
        let mut rng = StdRng::seed_from_u64(seed);

        match map.generate_structure(room_count, &mut rng) {
            Ok(()) => {
                prop_assert_eq!(map.len(), room_count);
                prop_assert!(is_connected(&map), "seed={seed} produced a disconnected map");
                prop_assert!(links_are_symmetric(&map));
                prop_assert!(map.rooms.values().all(|room| map.in_bounds(room.position)));

                let link_ends: usize = map.rooms.values().map(|room| room.connections.len()).sum();
                prop_assert_eq!(link_ends, 2 * (room_count - 1));
            }
            Err(DelveError::GenerationFailed(_)) => {}
            Err(other) => prop_assert!(false, "unexpected error {other}"),
        }
    }

    #[test]
    fn out_of_range_room_counts_are_rejected(
        seed in any::<u64>(),
        width in 1_u32..=8,
        height in 1_u32..=8,
        extra in 1_usize..=10,
    ) {
        let mut map = Map::new(width, height);
        let mut rng = StdRng::seed_from_u64(seed);
        let too_many = (width * height) as usize + extra;

        let zero_rejected = matches!(
            map.generate_structure(0, &mut rng),
            Err(DelveError::InvalidParameter(_))
        );
        let excess_rejected = matches!(
            map.generate_structure(too_many, &mut rng),
            Err(DelveError::InvalidParameter(_))
        );
        prop_assert!(zero_rejected);
        prop_assert!(excess_rejected);
    }

    #[test]
    fn placement_puts_one_boss_at_the_farthest_room(
        seed in any::<u64>(),
        width in 3_u32..=10,
        height in 3_u32..=10,
    ) {
        let room_count = (width * height / 2) as usize;
        let config = GenerationConfig {
            width,
            height,
            room_count,
            ..GenerationConfig::new(seed)
        };
        let mut rng = StdRng::seed_from_u64(seed);

        let map = match DungeonGenerator::new().generate(&config, &mut rng) {
            Ok(map) => map,
            Err(DelveError::GenerationFailed(_)) => return Ok(()),
            Err(other) => return Err(TestCaseError::fail(other.to_string())),
        };

        let entrance = map.entrance.expect("generated map has an entrance");
        let bosses: Vec<_> = map
            .rooms
            .values()
            .filter(|room| room.content_kind() == Some(ContentKind::Boss))
            .collect();
        prop_assert_eq!(bosses.len(), 1);

        let farthest = farthest_room(&map, entrance).expect("map is not empty");
        prop_assert_eq!(
            entrance.manhattan_distance(bosses[0].position),
            entrance.manhattan_distance(farthest)
        );
        prop_assert!(map.entrance_room().map_or(false, |room| room.contents.is_none()));

        let stats = map.stats();
        let rest = (room_count - 2) as f64;
        prop_assert!(stats.monster_count >= (rest * 0.20) as usize);
        prop_assert!(stats.monster_count <= (rest * 0.30) as usize);
        prop_assert!(stats.treasure_count >= (rest * 0.15) as usize);
        prop_assert!(stats.treasure_count <= (rest * 0.25) as usize);
        prop_assert!(stats.event_count >= (rest * 0.05) as usize);
        prop_assert!(stats.event_count <= (rest * 0.10) as usize);

        let path = shortest_path(&map, entrance, bosses[0].position);
        prop_assert!(!path.is_empty(), "boss must be reachable");
    }
}

#[test]
fn three_rooms_on_a_three_by_three_grid_always_succeed() {
    for seed in 0..500 {
        let mut map = Map::new(3, 3);
        let mut rng = StdRng::seed_from_u64(seed);
        map.generate_structure(3, &mut rng).unwrap();

        assert_eq!(map.len(), 3);
        assert!(is_connected(&map));

        let entrance = map.entrance.unwrap();
        assert!(entrance.x == 0 || entrance.y == 0 || entrance.x == 2 || entrance.y == 2);
    }
}

#[test]
fn same_seed_reproduces_the_dungeon() {
    let config = GenerationConfig::new(2024);
    let generator = DungeonGenerator::new();

    let first = generator
        .generate(&config, &mut StdRng::seed_from_u64(config.seed))
        .unwrap();
    let second = generator
        .generate(&config, &mut StdRng::seed_from_u64(config.seed))
        .unwrap();
    assert_eq!(first, second);
}
