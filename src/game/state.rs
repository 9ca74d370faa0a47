//! # Game State Module
//!
//! Session state: the map, the explorer walking it, and the single seeded
//! RNG every fight and event draws from.
//!
//! [`GameState`] is the primary interface for the binary. It advances the
//! turn counter, keeps [`GameStatistics`] current, and recomputes the
//! [`GameCompletionState`] after every action.

use crate::game::{ContentKind, Direction, Explorer, Map};
use crate::generation::{utils::create_rng, DungeonGenerator, GenerationConfig, Generator};
use crate::DelveResult;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Returned by [`GameState::explore`] once the game has been won or lost.
pub const GAME_OVER_MESSAGE: &str = "The game is over.";

/// Central game state containing everything a session needs.
#[derive(Debug, Clone)]
pub struct GameState {
    /// The dungeon being explored
    pub map: Map,
    pub explorer: Explorer,
    /// Shared RNG for combat and events
    pub rng: StdRng,
    /// Seed the session was started from
    pub seed: u64,
    /// Number of actions taken so far
    pub turn_number: u64,
    pub statistics: GameStatistics,
    pub completion_state: GameCompletionState,
}

/// Counters tracking player progress.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameStatistics {
    /// Successful moves between rooms
    pub steps_taken: u64,
    /// Rooms visited at least once
    pub rooms_explored: u32,
    /// Monsters and bosses defeated
    pub monsters_defeated: u32,
    /// Items added to the inventory
    pub items_collected: u32,
    /// Events triggered
    pub events_triggered: u32,
}

impl GameStatistics {
    /// Creates new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Game completion state for handling endings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameCompletionState {
    /// Game is still in progress
    Playing,
    /// The boss is defeated and the explorer still stands
    Victory,
    /// The explorer died
    Defeat,
}

impl GameState {
    /// Generates a dungeon from `config` and places an explorer at its
    /// entrance.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{GameCompletionState, GameState, GenerationConfig};
    ///
    /// let game = GameState::new_game(&GenerationConfig::for_testing(3)).unwrap();
    /// assert_eq!(game.turn_number, 0);
    /// assert_eq!(game.completion_state, GameCompletionState::Playing);
    /// assert_eq!(Some(game.explorer.position), game.map.entrance);
    /// ```
    pub fn new_game(config: &GenerationConfig) -> DelveResult<Self> {
        let mut rng = create_rng(config);
        let mut map = DungeonGenerator::new().generate(config, &mut rng)?;
        let explorer = Explorer::enter(&mut map, config.explorer_health, config.explorer_damage)?;

        info!(
            "New game: seed {}, {} rooms on a {}x{} grid",
            config.seed,
            map.len(),
            map.width,
            map.height
        );
        Ok(Self::assemble(map, explorer, rng, config.seed))
    }

    /// Resumes a session from a loaded map and explorer.
    ///
    /// The RNG is reseeded from `seed`; a loaded game does not replay the
    /// fights that came before it.
    pub fn from_parts(map: Map, explorer: Explorer, seed: u64) -> Self {
        Self::assemble(map, explorer, StdRng::seed_from_u64(seed), seed)
    }

    fn assemble(map: Map, explorer: Explorer, rng: StdRng, seed: u64) -> Self {
        let mut state = Self {
            map,
            explorer,
            rng,
            seed,
            turn_number: 0,
            statistics: GameStatistics::new(),
            completion_state: GameCompletionState::Playing,
        };
        state.statistics.rooms_explored = state.map.visited_count() as u32;
        state.update_completion_state();
        state
    }

    /// Moves the explorer one room in `direction`.
    ///
    /// A blocked move returns false and does not use up a turn.
    pub fn move_explorer(&mut self, direction: Direction) -> bool {
        if self.is_game_ended() || !self.explorer.move_direction(&mut self.map, direction) {
            return false;
        }

        self.statistics.steps_taken += 1;
        self.finish_turn();
        true
    }

    /// Explores the explorer's current room and returns the narrative.
    ///
    /// Once the game has ended this does nothing and uses no turn.
    pub fn explore(&mut self) -> String {
        if self.is_game_ended() {
            return GAME_OVER_MESSAGE.to_string();
        }

        let origin = self.explorer.position;
        let kind = self.map.room(origin).and_then(|room| room.content_kind());
        let items_before = self.explorer.inventory.len();

        let narrative = self.explorer.explore_room(&mut self.map, &mut self.rng);

        let cleared = kind.is_some()
            && self
                .map
                .room(origin)
                .map_or(true, |room| room.contents.is_none());
        if cleared {
            match kind {
                Some(ContentKind::Monster) | Some(ContentKind::Boss) => {
                    self.statistics.monsters_defeated += 1
                }
                Some(ContentKind::Event) => self.statistics.events_triggered += 1,
                _ => {}
            }
        }
        self.statistics.items_collected += (self.explorer.inventory.len() - items_before) as u32;

        self.finish_turn();
        narrative
    }

    fn finish_turn(&mut self) {
        self.turn_number += 1;
        self.statistics.rooms_explored = self.map.visited_count() as u32;
        self.update_completion_state();
    }

    fn update_completion_state(&mut self) {
        let next = if !self.explorer.is_alive() {
            GameCompletionState::Defeat
        } else if !self.map.boss_remaining() {
            GameCompletionState::Victory
        } else {
            GameCompletionState::Playing
        };

        if next != self.completion_state {
            info!("Game state changed: {:?} -> {:?}", self.completion_state, next);
            self.completion_state = next;
        }
    }

    pub fn is_game_ended(&self) -> bool {
        self.completion_state != GameCompletionState::Playing
    }

    /// Share of rooms visited, as a percentage.
    pub fn completion_percentage(&self) -> f64 {
        if self.map.is_empty() {
            return 0.0;
        }
        self.map.visited_count() as f64 / self.map.len() as f64 * 100.0
    }

    /// One-line summary of the explorer's condition.
    pub fn explorer_summary(&self) -> String {
        format!(
            "Health: {} | Damage: {} | Position: {} | Items: {} ({} gold)",
            self.explorer.health,
            self.explorer.damage,
            self.explorer.position,
            self.explorer.inventory.len(),
            self.explorer.inventory_value()
        )
    }

    /// Multi-line report of progress, shown when a game ends.
    pub fn exploration_report(&self) -> String {
        let rule = "=".repeat(50);
        let mut lines = vec![
            rule.clone(),
            "EXPLORATION REPORT".to_string(),
            rule.clone(),
            format!(
                "Rooms explored: {}/{} ({:.1}%)",
                self.map.visited_count(),
                self.map.len(),
                self.completion_percentage()
            ),
            format!("Health remaining: {}", self.explorer.health),
            format!("Current damage: {}", self.explorer.damage),
            format!("Monsters defeated: {}", self.statistics.monsters_defeated),
            format!("Events triggered: {}", self.statistics.events_triggered),
            format!("Steps taken: {}", self.statistics.steps_taken),
            format!("Items collected: {}", self.explorer.inventory.len()),
            format!("Total loot value: {} gold", self.explorer.inventory_value()),
            rule,
        ];

        if !self.explorer.inventory.is_empty() {
            lines.push(String::new());
            lines.push("INVENTORY:".to_string());
            for (i, item) in self.explorer.inventory.iter().enumerate() {
                lines.push(format!("  {}. {} - {} gold", i + 1, item.name, item.value));
            }
        }

        lines.join("\n")
    }
}
