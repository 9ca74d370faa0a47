//! # Save Files
//!
//! JSON persistence of an explorer and the map they walk.
//!
//! The on-disk document keeps the field names of the established save format
//! (`explorador`, `mapa`, `habitaciones`, ...). Rooms list their connections
//! as direction labels only; loading re-derives each neighbor from the
//! direction's grid offset and refuses any document whose links do not
//! describe a consistent, symmetric graph.

use crate::game::{
    Boss, Contents, Direction, Event, EventEffect, Explorer, Item, Map, Monster, Position, Room,
};
use crate::{DelveError, DelveResult};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

/// Top-level save document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    #[serde(rename = "explorador")]
    pub explorer: ExplorerRecord,
    #[serde(rename = "mapa")]
    pub map: MapRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorerRecord {
    #[serde(rename = "vida")]
    pub health: u32,
    #[serde(rename = "dano")]
    pub damage: u32,
    #[serde(rename = "posicion")]
    pub position: (i32, i32),
    #[serde(rename = "inventario")]
    pub inventory: Vec<ItemRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "valor")]
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapRecord {
    #[serde(rename = "ancho")]
    pub width: u32,
    #[serde(rename = "alto")]
    pub height: u32,
    #[serde(rename = "habitacion_inicial")]
    pub entrance: Option<(i32, i32)>,
    #[serde(rename = "habitaciones")]
    pub rooms: Vec<RoomRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomRecord {
    pub id: u32,
    pub x: i32,
    pub y: i32,
    #[serde(rename = "visitada")]
    pub visited: bool,
    #[serde(rename = "inicial")]
    pub is_entrance: bool,
    #[serde(rename = "conexiones")]
    pub connections: Vec<Direction>,
    #[serde(rename = "contenido")]
    pub contents: Option<ContentsRecord>,
}

/// Room contents, tagged by `tipo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tipo")]
pub enum ContentsRecord {
    #[serde(rename = "Jefe")]
    Boss {
        id: u32,
        #[serde(rename = "nombre")]
        name: String,
        #[serde(rename = "vida")]
        health: u32,
        #[serde(rename = "dano")]
        damage: u32,
        #[serde(rename = "recompensa_especial")]
        reward: Option<ItemRecord>,
    },
    #[serde(rename = "Monstruo")]
    Monster {
        id: u32,
        #[serde(rename = "nombre")]
        name: String,
        #[serde(rename = "vida")]
        health: u32,
        #[serde(rename = "dano")]
        damage: u32,
    },
    #[serde(rename = "Tesoro")]
    Treasure {
        #[serde(rename = "recompensa")]
        reward: ItemRecord,
    },
    #[serde(rename = "Evento")]
    Event {
        #[serde(rename = "nombre_evento")]
        name: String,
        #[serde(rename = "descripcion_evento")]
        description: String,
        #[serde(rename = "efecto")]
        effect: EffectRecord,
        #[serde(rename = "valor_efecto")]
        magnitude: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectRecord {
    #[serde(rename = "trampa")]
    Trap,
    #[serde(rename = "curacion")]
    Heal,
    #[serde(rename = "teletransporte")]
    Teleport,
    #[serde(rename = "bonificacion")]
    Buff,
}

impl From<&Item> for ItemRecord {
    fn from(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            description: item.description.clone(),
            value: item.value,
        }
    }
}

impl From<ItemRecord> for Item {
    fn from(record: ItemRecord) -> Self {
        Item::new(record.name, record.description, record.value)
    }
}

impl From<EventEffect> for EffectRecord {
    fn from(effect: EventEffect) -> Self {
        match effect {
            EventEffect::Trap => EffectRecord::Trap,
            EventEffect::Heal => EffectRecord::Heal,
            EventEffect::Teleport => EffectRecord::Teleport,
            EventEffect::Buff => EffectRecord::Buff,
        }
    }
}

impl From<EffectRecord> for EventEffect {
    fn from(record: EffectRecord) -> Self {
        match record {
            EffectRecord::Trap => EventEffect::Trap,
            EffectRecord::Heal => EventEffect::Heal,
            EffectRecord::Teleport => EventEffect::Teleport,
            EffectRecord::Buff => EventEffect::Buff,
        }
    }
}

impl From<&Contents> for ContentsRecord {
    fn from(contents: &Contents) -> Self {
        match contents {
            Contents::Boss(boss) => ContentsRecord::Boss {
                id: boss.monster.id,
                name: boss.monster.name.clone(),
                health: boss.monster.health,
                damage: boss.monster.damage,
                reward: boss.reward.as_ref().map(ItemRecord::from),
            },
            Contents::Monster(monster) => ContentsRecord::Monster {
                id: monster.id,
                name: monster.name.clone(),
                health: monster.health,
                damage: monster.damage,
            },
            Contents::Treasure(item) => ContentsRecord::Treasure {
                reward: ItemRecord::from(item),
            },
            Contents::Event(event) => ContentsRecord::Event {
                name: event.name.clone(),
                description: event.description.clone(),
                effect: event.effect.into(),
                magnitude: event.magnitude,
            },
        }
    }
}

impl From<ContentsRecord> for Contents {
    fn from(record: ContentsRecord) -> Self {
        match record {
            ContentsRecord::Boss {
                id,
                name,
                health,
                damage,
                reward,
            } => Contents::Boss(Boss::new(
                Monster::new(id, name, health, damage),
                reward.map(Item::from),
            )),
            ContentsRecord::Monster {
                id,
                name,
                health,
                damage,
            } => Contents::Monster(Monster::new(id, name, health, damage)),
            ContentsRecord::Treasure { reward } => Contents::Treasure(reward.into()),
            ContentsRecord::Event {
                name,
                description,
                effect,
                magnitude,
            } => Contents::Event(Event::new(name, description, effect.into(), magnitude)),
        }
    }
}

impl SaveRecord {
    /// Captures the explorer and map as a save document.
    pub fn capture(explorer: &Explorer, map: &Map) -> Self {
        let rooms = map
            .rooms
            .values()
            .map(|room| RoomRecord {
                id: room.id,
                x: room.position.x,
                y: room.position.y,
                visited: room.visited,
                is_entrance: room.is_entrance,
                connections: room.directions(),
                contents: room.contents.as_ref().map(ContentsRecord::from),
            })
            .collect();

        Self {
            explorer: ExplorerRecord {
                health: explorer.health,
                damage: explorer.damage,
                position: (explorer.position.x, explorer.position.y),
                inventory: explorer.inventory.iter().map(ItemRecord::from).collect(),
            },
            map: MapRecord {
                width: map.width,
                height: map.height,
                entrance: map.entrance.map(|pos| (pos.x, pos.y)),
                rooms,
            },
        }
    }

    /// Rebuilds the explorer and map, validating the room graph.
    pub fn restore(self) -> DelveResult<(Explorer, Map)> {
        let map = self.map.restore()?;

        let (x, y) = self.explorer.position;
        let position = Position::new(x, y);
        if !map.is_empty() && !map.contains(position) {
            return Err(malformed(format!("Explorer stands at {}, which is not a room", position)));
        }

        let mut explorer = Explorer::with_stats(position, self.explorer.health, self.explorer.damage);
        explorer.inventory = self.explorer.inventory.into_iter().map(Item::from).collect();
        Ok((explorer, map))
    }
}

impl MapRecord {
    fn restore(self) -> DelveResult<Map> {
        let mut map = Map::new(self.width, self.height);
        let entrance = self.entrance.map(|(x, y)| Position::new(x, y));

        let mut links = Vec::with_capacity(self.rooms.len());
        let mut ids = BTreeSet::new();
        for record in self.rooms {
            let position = Position::new(record.x, record.y);
            if map.contains(position) {
                return Err(malformed(format!("Two rooms share position {}", position)));
            }
            if !ids.insert(record.id) {
                return Err(malformed(format!("Two rooms share id {}", record.id)));
            }
            if record.is_entrance != (entrance == Some(position)) {
                return Err(malformed(format!(
                    "Room {} at {} disagrees with the recorded entrance",
                    record.id, position
                )));
            }

            let mut room = Room::new(record.id, position);
            room.visited = record.visited;
            room.is_entrance = record.is_entrance;
            room.contents = record.contents.map(Contents::from);
            map.insert_room(room).map_err(|err| malformed(err.to_string()))?;
            links.push((position, record.connections));
        }

        if let Some(pos) = entrance {
            if !map.contains(pos) {
                return Err(malformed(format!("Entrance {} is not a room", pos)));
            }
        }

        let declared: BTreeSet<(Position, Direction)> = links
            .iter()
            .flat_map(|(pos, directions)| directions.iter().map(move |&direction| (*pos, direction)))
            .collect();

        for &(from, direction) in &declared {
            let to = from.offset(direction);
            if !map.contains(to) {
                return Err(malformed(format!(
                    "Room {} connects {} to {}, where there is no room",
                    from, direction, to
                )));
            }
            if !declared.contains(&(to, direction.opposite())) {
                return Err(malformed(format!(
                    "Room {} connects {} but {} does not connect back",
                    from, direction, to
                )));
            }
            if let Some(room) = map.room_mut(from) {
                room.connections.insert(direction, to);
            }
        }

        Ok(map)
    }
}

fn malformed(message: String) -> DelveError {
    warn!("Rejecting save: {}", message);
    DelveError::MalformedSave(message)
}

/// Serializes the explorer and map to pretty-printed JSON.
pub fn to_json(explorer: &Explorer, map: &Map) -> DelveResult<String> {
    Ok(serde_json::to_string_pretty(&SaveRecord::capture(explorer, map))?)
}

/// Parses a save document and rebuilds the explorer and map.
pub fn from_json(json: &str) -> DelveResult<(Explorer, Map)> {
    let record: SaveRecord = serde_json::from_str(json)?;
    record.restore()
}

/// Writes a save file, replacing `path` only once the new contents are
/// fully on disk.
pub fn save_game(explorer: &Explorer, map: &Map, path: impl AsRef<Path>) -> DelveResult<()> {
    let path = path.as_ref();
    let json = to_json(explorer, map)?;
    write_atomic(path, &json)?;
    info!("Game saved to {} ({} rooms)", path.display(), map.len());
    Ok(())
}

/// Loads a save file written by [`save_game`].
pub fn load_game(path: impl AsRef<Path>) -> DelveResult<(Explorer, Map)> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => DelveError::NotFound(format!("No save file at {}", path.display())),
        _ => DelveError::Io(err),
    })?;

    let (explorer, map) = from_json(&json)?;
    info!("Game loaded from {} ({} rooms)", path.display(), map.len());
    Ok((explorer, map))
}

fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let base = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("save.json");

    let mut counter = 0u32;
    let tmp_path = loop {
        let candidate = dir.join(format!(".{}.tmp-{}-{}", base, std::process::id(), counter));
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(mut tmp) => {
                tmp.write_all(content.as_bytes())?;
                tmp.sync_all()?;
                break candidate;
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                counter = counter.saturating_add(1);
            }
            Err(err) => return Err(err),
        }
    };

    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }
    Ok(())
}
