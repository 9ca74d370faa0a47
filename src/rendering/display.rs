//! # Display
//!
//! Plain-text views of the dungeon for the terminal: the grid map, the
//! current room, the inventory and map statistics.

use crate::game::{ContentKind, Explorer, Map, Position};

/// Legend printed under every map.
pub const MAP_LEGEND: &str =
    "Legend: @ = You | E = Entrance | B = Boss | M = Monster | T = Treasure | ! = Event | . = Empty | ? = Unexplored";

/// Map symbol for a room, given what the player should be able to see.
///
/// Rooms the explorer has not visited keep their contents hidden.
fn cell_symbol(map: &Map, pos: Position, explorer_position: Position) -> char {
    let Some(room) = map.room(pos) else {
        return ' ';
    };

    if pos == explorer_position {
        '@'
    } else if room.is_entrance {
        'E'
    } else if !room.visited {
        '?'
    } else {
        match room.content_kind() {
            Some(ContentKind::Boss) => 'B',
            Some(ContentKind::Monster) => 'M',
            Some(ContentKind::Treasure) => 'T',
            Some(ContentKind::Event) => '!',
            None => '.',
        }
    }
}

/// Renders the whole grid, three characters per cell, followed by the legend.
///
/// # Examples
///
/// ```
/// use delve::{render_map, Map, Position};
///
/// let map = Map::sample();
/// let text = render_map(&map, Position::new(2, 2));
/// assert!(text.lines().nth(2).unwrap().contains(" @ "));
/// ```
pub fn render_map(map: &Map, explorer_position: Position) -> String {
    let mut lines = Vec::with_capacity(map.height as usize + 2);
    for y in 0..map.height as i32 {
        let row: String = (0..map.width as i32)
            .map(|x| format!(" {} ", cell_symbol(map, Position::new(x, y), explorer_position)))
            .collect();
        lines.push(row.trim_end().to_string());
    }
    lines.push(String::new());
    lines.push(MAP_LEGEND.to_string());
    lines.join("\n")
}

/// Describes the room at `pos`: its coordinates, what it holds, and its exits.
pub fn describe_room(map: &Map, pos: Position) -> String {
    let Some(room) = map.room(pos) else {
        return crate::game::INVALID_POSITION_MESSAGE.to_string();
    };

    let mut title = format!("Room {}", room.position);
    if room.is_entrance {
        title.push_str(" [Entrance]");
    }

    let body = match &room.contents {
        Some(contents) => format!("{}\n{}", contents.kind(), contents.description()),
        None => crate::game::EMPTY_ROOM_MESSAGE.to_string(),
    };

    let exits = if room.connections.is_empty() {
        "No exits.".to_string()
    } else {
        let names: Vec<&str> = room.directions().into_iter().map(|d| d.name()).collect();
        format!("Exits: {}", names.join(", "))
    };

    let danger = format!("Danger: {}", map.room_difficulty(pos).label());

    format!("{}\n{}\n{}\n{}", title, body, danger, exits)
}

/// Lists the explorer's inventory with a total value.
pub fn render_inventory(explorer: &Explorer) -> String {
    if explorer.inventory.is_empty() {
        return "Inventory: empty".to_string();
    }

    let mut lines = vec![format!("Inventory: {} items", explorer.inventory.len())];
    for item in &explorer.inventory {
        lines.push(format!("  - {} ({} gold): {}", item.name, item.value, item.description));
    }
    lines.push(format!("Total value: {} gold", explorer.inventory_value()));
    lines.join("\n")
}

/// Explorer condition and map composition.
pub fn render_stats(explorer: &Explorer, map: &Map) -> String {
    let stats = map.stats();
    [
        format!("Health: {}", explorer.health),
        format!("Damage: {}", explorer.damage),
        format!("Position: {}", explorer.position),
        String::new(),
        format!("Rooms: {} ({} visited)", stats.total, map.visited_count()),
        format!("Monsters: {}", stats.monster_count),
        format!("Treasures: {}", stats.treasure_count),
        format!("Bosses: {}", stats.boss_count),
        format!("Events: {}", stats.event_count),
        format!("Empty: {}", stats.empty_count),
        format!("Average connections: {:.2}", stats.avg_connections),
    ]
    .join("\n")
}
