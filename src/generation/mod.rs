//! # Generation Module
//!
//! Procedural dungeon generation: room graph layout and content placement.
//!
//! Generation runs in two passes over a [`Map`]. The structure pass grows a
//! tree of rooms outward from an entrance on the border; the placement pass
//! reads that finished graph and fills rooms with a boss, monsters, treasure
//! and events, scaling their strength by distance from the entrance.

pub mod dungeon;
pub mod placement;

pub use dungeon::*;
pub use placement::*;

use crate::config;
use crate::game::{ContentKind, Map};
use crate::{is_connected, DelveError, DelveResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Configuration for procedural generation.
///
/// Controls the grid size, how many rooms are carved, and the stats the
/// explorer starts a new game with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Grid width in rooms
    pub width: u32,
    /// Grid height in rooms
    pub height: u32,
    /// Number of rooms to carve
    pub room_count: usize,
    /// Consecutive fruitless rounds tolerated before giving up
    pub max_stalled_rounds: u32,
    /// Explorer starting health
    pub explorer_health: u32,
    /// Explorer starting damage
    pub explorer_damage: u32,
}

impl GenerationConfig {
    /// Creates a default generation configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(42);
    /// assert_eq!(config.seed, 42);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            width: config::DEFAULT_MAP_WIDTH,
            height: config::DEFAULT_MAP_HEIGHT,
            room_count: config::DEFAULT_ROOM_COUNT,
            max_stalled_rounds: config::MAX_STALLED_ROUNDS,
            explorer_health: config::DEFAULT_EXPLORER_HEALTH,
            explorer_damage: config::DEFAULT_EXPLORER_DAMAGE,
        }
    }

    /// Creates a configuration for testing with smaller, simpler maps.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            width: 5,
            height: 5,
            room_count: 8,
            ..Self::new(seed)
        }
    }

    /// Checks that a playable dungeon can be built from this configuration.
    ///
    /// A game needs at least two rooms: the entrance and the boss room.
    pub fn validate(&self) -> DelveResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(DelveError::InvalidParameter(format!(
                "Map must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }

        Map::new(self.width, self.height).max_coordinates()?;

        let capacity = self.width as usize * self.height as usize;
        if self.room_count < 2 || self.room_count > capacity {
            return Err(DelveError::InvalidParameter(format!(
                "Room count must be between 2 and {}, got {}",
                capacity, self.room_count
            )));
        }

        if self.max_stalled_rounds == 0 {
            return Err(DelveError::InvalidParameter(
                "max_stalled_rounds must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> DelveResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> DelveResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Builds a complete, populated dungeon in one call.
#[derive(Debug, Clone, Default)]
pub struct DungeonGenerator;

impl DungeonGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Generator<Map> for DungeonGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> DelveResult<Map> {
        config.validate()?;

        let mut map = Map::new(config.width, config.height);
        map.generate_structure_with_limit(config.room_count, config.max_stalled_rounds, rng)?;
        map.place_contents(rng)?;

        self.validate(&map, config)?;
        Ok(map)
    }

    fn validate(&self, map: &Map, config: &GenerationConfig) -> DelveResult<()> {
        if map.len() != config.room_count {
            return Err(DelveError::GenerationFailed(format!(
                "Expected {} rooms, generated {}",
                config.room_count,
                map.len()
            )));
        }

        if !is_connected(map) {
            return Err(DelveError::GenerationFailed(
                "Not every room is reachable from the entrance".to_string(),
            ));
        }

        let bosses = map.count_by_kind().get(&ContentKind::Boss).copied().unwrap_or(0);
        if bosses != 1 {
            return Err(DelveError::GenerationFailed(format!(
                "Expected exactly one boss, found {}",
                bosses
            )));
        }

        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "DungeonGenerator"
    }
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_config_creation() {
        let config = GenerationConfig::new(12345);
        assert_eq!(config.seed, 12345);
        assert_eq!(config.width, config::DEFAULT_MAP_WIDTH);
        assert_eq!(config.max_stalled_rounds, config::MAX_STALLED_ROUNDS);
        assert!(config.validate().is_ok());
        assert!(GenerationConfig::for_testing(1).validate().is_ok());
    }

    #[test]
    fn test_config_validation_rejects_bad_values() {
        let mut config = GenerationConfig::for_testing(1);
        config.room_count = 1;
        assert!(matches!(config.validate(), Err(DelveError::InvalidParameter(_))));

        config.room_count = 26;
        assert!(config.validate().is_err());

        config.room_count = 25;
        assert!(config.validate().is_ok());

        config.width = 0;
        assert!(config.validate().is_err());

        let oversized = GenerationConfig {
            width: u32::MAX,
            height: 1,
            room_count: 2,
            ..GenerationConfig::new(1)
        };
        assert!(matches!(oversized.validate(), Err(DelveError::InvalidParameter(_))));
        let mut rng = utils::create_rng(&oversized);
        assert!(matches!(
            DungeonGenerator::new().generate(&oversized, &mut rng),
            Err(DelveError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_config_serialization() {
        let config = GenerationConfig::for_testing(99);
        let json = serde_json::to_string(&config).unwrap();
        let back: GenerationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_dungeon_generator_produces_valid_map() {
        let generator = DungeonGenerator::new();
        for seed in 0..20 {
            let config = GenerationConfig::for_testing(seed);
            let mut rng = utils::create_rng(&config);

            let map = generator.generate(&config, &mut rng).unwrap();
            assert_eq!(map.len(), config.room_count);
            assert!(generator.validate(&map, &config).is_ok());
        }
        assert_eq!(generator.generator_type(), "DungeonGenerator");
    }

    #[test]
    fn test_same_seed_same_dungeon() {
        let generator = DungeonGenerator::new();
        let config = GenerationConfig::new(777);

        let first = generator.generate(&config, &mut utils::create_rng(&config)).unwrap();
        let second = generator.generate(&config, &mut utils::create_rng(&config)).unwrap();
        assert_eq!(first, second);
    }
}
