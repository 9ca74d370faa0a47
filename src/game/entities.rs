//! # Room Contents
//!
//! Items and the interactive payloads a room can hold: treasure, monsters,
//! the boss, and one-shot events.
//!
//! Every payload shares the same three capabilities (a description, a kind,
//! and an interaction with the explorer), expressed as methods on the
//! [`Contents`] sum type rather than a trait object hierarchy.

use crate::game::{Explorer, Map};
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;

/// An obtainable object. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Item {
    pub name: String,
    pub description: String,
    pub value: u32,
}

impl Item {
    /// Creates a new item.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::Item;
    ///
    /// let sword = Item::new("Sword", "A plain iron blade", 50);
    /// assert_eq!(sword.name, "Sword");
    /// assert_eq!(sword.value, 50);
    /// ```
    pub fn new(name: impl Into<String>, description: impl Into<String>, value: u32) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            value,
        }
    }
}

/// A hostile creature occupying a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monster {
    pub id: u32,
    pub name: String,
    /// Remaining health; a monster at 0 is defeated
    pub health: u32,
    /// Damage dealt to the explorer per landed hit
    pub damage: u32,
}

impl Monster {
    pub fn new(id: u32, name: impl Into<String>, health: u32, damage: u32) -> Self {
        Self {
            id,
            name: name.into(),
            health,
            damage,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Applies damage, flooring health at zero.
    pub fn take_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }
}

/// The final boss: a monster with a reward granted only on victory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boss {
    pub monster: Monster,
    pub reward: Option<Item>,
}

impl Boss {
    pub fn new(monster: Monster, reward: Option<Item>) -> Self {
        Self { monster, reward }
    }
}

/// What an event does to the explorer when triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventEffect {
    /// Deals `magnitude` damage
    Trap,
    /// Restores `magnitude` health, with no upper cap
    Heal,
    /// Moves the explorer to a random other room
    Teleport,
    /// Permanently raises attack damage by `magnitude`
    Buff,
}

impl EventEffect {
    pub const ALL: [EventEffect; 4] = [
        EventEffect::Trap,
        EventEffect::Heal,
        EventEffect::Teleport,
        EventEffect::Buff,
    ];
}

/// A single-use room event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub name: String,
    pub description: String,
    pub effect: EventEffect,
    pub magnitude: u32,
}

impl Event {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        effect: EventEffect,
        magnitude: u32,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            effect,
            magnitude,
        }
    }
}

/// Discriminant of [`Contents`], used for statistics and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContentKind {
    Treasure,
    Monster,
    Boss,
    Event,
}

impl ContentKind {
    /// Player-facing label for this kind of contents.
    pub fn label(self) -> &'static str {
        match self {
            ContentKind::Treasure => "Treasure Chest",
            ContentKind::Monster => "Monster",
            ContentKind::Boss => "Final Boss",
            ContentKind::Event => "Event",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The interactive payload of a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contents {
    Treasure(Item),
    Monster(Monster),
    Boss(Boss),
    Event(Event),
}

/// Outcome of interacting with a room's contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interaction {
    /// Narrative shown to the player, one line per beat
    pub narrative: String,
    /// Whether the contents are used up and must be cleared from the room
    pub resolved: bool,
}

impl Interaction {
    fn new(lines: Vec<String>, resolved: bool) -> Self {
        Self {
            narrative: lines.join("\n"),
            resolved,
        }
    }
}

/// Differences between an ordinary fight and the boss fight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CombatStyle {
    Standard,
    Boss,
}

impl CombatStyle {
    /// Draws whether the explorer lands the next blow.
    ///
    /// Ordinary monsters trade blows evenly; the boss lets the explorer land
    /// only 2 blows in 6.
    fn explorer_strikes(self, rng: &mut StdRng) -> bool {
        match self {
            CombatStyle::Standard => rng.gen_range(0..=1) == 0,
            CombatStyle::Boss => rng.gen_range(0..=5) <= 1,
        }
    }
}

impl Contents {
    /// One-line description of what occupies the room.
    pub fn description(&self) -> String {
        match self {
            Contents::Treasure(item) => format!("Chest holding {}", item.name),
            Contents::Monster(monster) => format!(
                "{} (Health: {}, Damage: {})",
                monster.name, monster.health, monster.damage
            ),
            Contents::Boss(boss) => format!(
                "BOSS: {} (Health: {}, Damage: {})",
                boss.monster.name, boss.monster.health, boss.monster.damage
            ),
            Contents::Event(event) => event.description.clone(),
        }
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            Contents::Treasure(_) => ContentKind::Treasure,
            Contents::Monster(_) => ContentKind::Monster,
            Contents::Boss(_) => ContentKind::Boss,
            Contents::Event(_) => ContentKind::Event,
        }
    }

    /// Resolves the explorer's interaction with these contents.
    ///
    /// `map` is the dungeon the explorer stands in; the contents must already
    /// have been taken out of the explorer's room, and the caller clears or
    /// restores them according to [`Interaction::resolved`].
    pub fn interact(
        &mut self,
        explorer: &mut Explorer,
        map: &mut Map,
        rng: &mut StdRng,
    ) -> Interaction {
        match self {
            Contents::Treasure(item) => {
                explorer.inventory.push(item.clone());
                debug!("Explorer picked up {} ({} gold)", item.name, item.value);
                Interaction::new(vec![format!("You picked up the treasure: {}!", item.name)], true)
            }
            Contents::Monster(monster) => resolve_combat(monster, None, CombatStyle::Standard, explorer, rng),
            Contents::Boss(boss) => resolve_combat(
                &mut boss.monster,
                boss.reward.as_ref(),
                CombatStyle::Boss,
                explorer,
                rng,
            ),
            Contents::Event(event) => trigger_event(event, explorer, map, rng),
        }
    }
}

/// Runs a fight to completion.
///
/// Each exchange damages exactly one side. The loop stops as soon as either
/// side reaches zero health, or immediately if neither side can hurt the
/// other.
fn resolve_combat(
    monster: &mut Monster,
    reward: Option<&Item>,
    style: CombatStyle,
    explorer: &mut Explorer,
    rng: &mut StdRng,
) -> Interaction {
    let mut lines = match style {
        CombatStyle::Standard => vec![format!("You face {}!", monster.name)],
        CombatStyle::Boss => vec![format!("BATTLE AGAINST {}!!!", monster.name.to_uppercase())],
    };

    if monster.is_alive() && explorer.damage == 0 && monster.damage == 0 {
        lines.push(format!("Neither you nor {} can land a wound.", monster.name));
        return Interaction::new(lines, false);
    }

    let mut exchanges = 0u32;
    while monster.is_alive() && explorer.is_alive() {
        exchanges += 1;
        if style.explorer_strikes(rng) {
            monster.take_damage(explorer.damage);
            trace!("Exchange {}: explorer hits {} for {}", exchanges, monster.name, explorer.damage);
            lines.push(match style {
                CombatStyle::Standard => format!("You attack ({} damage)", explorer.damage),
                CombatStyle::Boss => format!("You strike the boss ({} damage)", explorer.damage),
            });
            if monster.is_alive() {
                lines.push(match style {
                    CombatStyle::Standard => format!("{} health: {}", monster.name, monster.health),
                    CombatStyle::Boss => format!("Boss health: {}", monster.health),
                });
            }
        } else {
            explorer.take_damage(monster.damage);
            trace!("Exchange {}: {} hits explorer for {}", exchanges, monster.name, monster.damage);
            lines.push(match style {
                CombatStyle::Standard => format!("{} attacks ({} damage)", monster.name, monster.damage),
                CombatStyle::Boss => format!("The boss hits you ({} damage)", monster.damage),
            });
            lines.push(format!("Your health: {}", explorer.health));
        }
    }

    if !monster.is_alive() {
        debug!("{} defeated after {} exchanges", monster.name, exchanges);
        match style {
            CombatStyle::Standard => lines.push(format!("You defeated {}!", monster.name)),
            CombatStyle::Boss => {
                lines.push(format!("YOU DEFEATED {}!!!", monster.name.to_uppercase()));
                if let Some(item) = reward {
                    explorer.inventory.push(item.clone());
                    lines.push(format!("You obtained: {}!", item.name));
                }
            }
        }
        Interaction::new(lines, true)
    } else {
        debug!("Explorer fell to {} after {} exchanges", monster.name, exchanges);
        lines.push(match style {
            CombatStyle::Standard => format!("You were defeated by {}.", monster.name),
            CombatStyle::Boss => format!("You fell before {}.", monster.name),
        });
        Interaction::new(lines, false)
    }
}

/// Applies a single-use event effect.
fn trigger_event(
    event: &Event,
    explorer: &mut Explorer,
    map: &mut Map,
    rng: &mut StdRng,
) -> Interaction {
    let mut lines = vec![format!("Event: {}!", event.name), event.description.clone()];

    match event.effect {
        EventEffect::Trap => {
            explorer.take_damage(event.magnitude);
            lines.push(format!(
                "You lost {} health. Current: {}",
                event.magnitude, explorer.health
            ));
        }
        EventEffect::Heal => {
            explorer.health = explorer.health.saturating_add(event.magnitude);
            lines.push(format!(
                "You recovered {} health. Current: {}",
                event.magnitude, explorer.health
            ));
        }
        EventEffect::Teleport => {
            let destinations: Vec<_> = map
                .positions()
                .filter(|&pos| pos != explorer.position)
                .collect();
            match destinations.choose(rng) {
                Some(&destination) => {
                    explorer.position = destination;
                    if let Some(room) = map.room_mut(destination) {
                        room.visited = true;
                    }
                    lines.push(format!("You were teleported to {}!", destination));
                }
                None => lines.push("The portal flickers, but there is nowhere else to go.".to_string()),
            }
        }
        EventEffect::Buff => {
            explorer.damage = explorer.damage.saturating_add(event.magnitude);
            lines.push(format!(
                "Damage increased by {}. Current: {}",
                event.magnitude, explorer.damage
            ));
        }
    }

    debug!("Event {:?} triggered with magnitude {}", event.effect, event.magnitude);
    Interaction::new(lines, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Position, Room};
    use rand::SeedableRng;

    fn single_room_map() -> Map {
        let mut map = Map::new(3, 3);
        map.insert_room(Room::entrance(0, Position::new(0, 0))).unwrap();
        map
    }

    #[test]
    fn test_content_kinds_and_labels() {
        let treasure = Contents::Treasure(Item::new("Gem", "Shiny", 10));
        let monster = Contents::Monster(Monster::new(1, "Goblin", 15, 3));
        let boss = Contents::Boss(Boss::new(Monster::new(9, "King", 50, 8), None));
        let event = Contents::Event(Event::new("Trap", "Click!", EventEffect::Trap, 2));

        assert_eq!(treasure.kind().label(), "Treasure Chest");
        assert_eq!(monster.kind(), ContentKind::Monster);
        assert_eq!(boss.kind().to_string(), "Final Boss");
        assert_eq!(event.kind(), ContentKind::Event);

        assert_eq!(treasure.description(), "Chest holding Gem");
        assert_eq!(monster.description(), "Goblin (Health: 15, Damage: 3)");
        assert_eq!(boss.description(), "BOSS: King (Health: 50, Damage: 8)");
        assert_eq!(event.description(), "Click!");
    }

    #[test]
    fn test_monster_damage_floors_at_zero() {
        let mut monster = Monster::new(1, "Rat", 5, 1);
        monster.take_damage(3);
        assert_eq!(monster.health, 2);
        monster.take_damage(10);
        assert_eq!(monster.health, 0);
        assert!(!monster.is_alive());
    }

    #[test]
    fn test_treasure_goes_to_inventory() {
        let mut map = single_room_map();
        let mut explorer = Explorer::new(Position::new(0, 0));
        let mut rng = StdRng::seed_from_u64(1);
        let mut contents = Contents::Treasure(Item::new("Sword", "desc", 50));

        let interaction = contents.interact(&mut explorer, &mut map, &mut rng);

        assert!(interaction.resolved);
        assert_eq!(explorer.inventory, vec![Item::new("Sword", "desc", 50)]);
        assert!(interaction.narrative.contains("Sword"));
    }

    #[test]
    fn test_standard_combat_ends_with_one_side_at_zero() {
        for seed in 0..200 {
            let mut map = single_room_map();
            let mut explorer = Explorer::with_stats(Position::new(0, 0), 30, 10);
            let mut rng = StdRng::seed_from_u64(seed);
            let mut contents = Contents::Monster(Monster::new(1, "Orc", 40, 10));

            let interaction = contents.interact(&mut explorer, &mut map, &mut rng);
            let Contents::Monster(monster) = &contents else {
                unreachable!()
            };

            assert!(monster.health == 0 || explorer.health == 0);
            assert_eq!(interaction.resolved, monster.health == 0);
            assert_eq!(interaction.resolved, explorer.is_alive());
        }
    }

    #[test]
    fn test_boss_reward_only_on_victory() {
        let reward = Item::new("Crown", "Victory", 1000);
        let mut wins = 0;
        let mut losses = 0;

        for seed in 0..300 {
            let mut map = single_room_map();
            let mut explorer = Explorer::with_stats(Position::new(0, 0), 20, 10);
            let mut rng = StdRng::seed_from_u64(seed);
            let mut contents =
                Contents::Boss(Boss::new(Monster::new(9999, "Dark Lord", 20, 10), Some(reward.clone())));

            let interaction = contents.interact(&mut explorer, &mut map, &mut rng);
            if interaction.resolved {
                wins += 1;
                assert_eq!(explorer.inventory, vec![reward.clone()]);
                assert!(interaction.narrative.contains("YOU DEFEATED DARK LORD"));
            } else {
                losses += 1;
                assert!(explorer.inventory.is_empty());
                assert!(!explorer.is_alive());
            }
        }

        assert!(wins > 0 && losses > 0);
    }

    #[test]
    fn test_boss_hits_more_often_than_monster() {
        // Count explorer strikes over many single draws of each style.
        let mut rng = StdRng::seed_from_u64(7);
        let trials = 6000;
        let standard = (0..trials)
            .filter(|_| CombatStyle::Standard.explorer_strikes(&mut rng))
            .count();
        let boss = (0..trials)
            .filter(|_| CombatStyle::Boss.explorer_strikes(&mut rng))
            .count();

        assert!(standard > 2700 && standard < 3300, "standard = {}", standard);
        assert!(boss > 1750 && boss < 2250, "boss = {}", boss);
    }

    #[test]
    fn test_harmless_stalemate_does_not_loop() {
        let mut map = single_room_map();
        let mut explorer = Explorer::with_stats(Position::new(0, 0), 10, 0);
        let mut rng = StdRng::seed_from_u64(3);
        let mut contents = Contents::Monster(Monster::new(1, "Ghost", 10, 0));

        let interaction = contents.interact(&mut explorer, &mut map, &mut rng);
        assert!(!interaction.resolved);
        assert_eq!(explorer.health, 10);
    }

    #[test]
    fn test_event_effects() {
        let mut map = single_room_map();
        let mut rng = StdRng::seed_from_u64(11);
        let mut explorer = Explorer::with_stats(Position::new(0, 0), 10, 10);

        let mut trap = Contents::Event(Event::new("Trap", "Click", EventEffect::Trap, 3));
        assert!(trap.interact(&mut explorer, &mut map, &mut rng).resolved);
        assert_eq!(explorer.health, 7);

        let mut heal = Contents::Event(Event::new("Fountain", "Water", EventEffect::Heal, 500));
        heal.interact(&mut explorer, &mut map, &mut rng);
        assert_eq!(explorer.health, 507);

        let mut buff = Contents::Event(Event::new("Altar", "Power", EventEffect::Buff, 2));
        buff.interact(&mut explorer, &mut map, &mut rng);
        assert_eq!(explorer.damage, 12);

        let mut big_trap = Contents::Event(Event::new("Pit", "Deep", EventEffect::Trap, 10_000));
        big_trap.interact(&mut explorer, &mut map, &mut rng);
        assert_eq!(explorer.health, 0);
        assert!(!explorer.is_alive());
    }

    #[test]
    fn test_teleport_goes_to_another_room() {
        let mut map = Map::sample();
        let start = Position::new(2, 2);
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut explorer = Explorer::new(start);
            let mut portal = Contents::Event(Event::new("Portal", "Swirl", EventEffect::Teleport, 0));

            let interaction = portal.interact(&mut explorer, &mut map, &mut rng);

            assert!(interaction.resolved);
            assert_ne!(explorer.position, start);
            assert!(map.contains(explorer.position));
            assert!(map.room(explorer.position).unwrap().visited);
        }
    }

    #[test]
    fn test_teleport_on_single_room_map_stays_put() {
        let mut map = single_room_map();
        let mut rng = StdRng::seed_from_u64(5);
        let mut explorer = Explorer::new(Position::new(0, 0));
        let mut portal = Contents::Event(Event::new("Portal", "Swirl", EventEffect::Teleport, 0));

        let interaction = portal.interact(&mut explorer, &mut map, &mut rng);
        assert!(interaction.resolved);
        assert_eq!(explorer.position, Position::new(0, 0));
    }
}
