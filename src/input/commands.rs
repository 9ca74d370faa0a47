//! # Command Definitions
//!
//! Text commands the player can type, and the parser that reads them.

use crate::game::Direction;
use crate::{DelveError, DelveResult};
use std::str::FromStr;

/// A parsed player command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Move one room in a direction
    Move(Direction),
    /// Interact with the current room's contents
    Explore,
    /// Show the dungeon map
    ShowMap,
    /// Show explorer and map statistics
    Stats,
    /// Show the inventory
    Inventory,
    /// Show the command list
    Help,
    /// Write the game to the save file
    Save,
    /// Quit the game
    Quit,
}

impl Command {
    /// Parses one line of player input.
    ///
    /// Matching ignores case and surrounding whitespace. Directions accept
    /// full names, one-letter shorthands and the save-format labels.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Command, Direction};
    ///
    /// assert_eq!(Command::parse("N").unwrap(), Command::Move(Direction::North));
    /// assert_eq!(Command::parse(" explore ").unwrap(), Command::Explore);
    /// assert!(Command::parse("dance").is_err());
    /// ```
    pub fn parse(input: &str) -> DelveResult<Command> {
        let token = input.trim().to_lowercase();
        let command = match token.as_str() {
            "explore" | "x" => Command::Explore,
            "map" | "m" => Command::ShowMap,
            "stats" => Command::Stats,
            "inventory" | "inv" | "i" => Command::Inventory,
            "help" | "h" | "?" => Command::Help,
            "save" => Command::Save,
            "quit" | "q" => Command::Quit,
            other => match other.parse::<Direction>() {
                Ok(direction) => Command::Move(direction),
                Err(_) => {
                    return Err(DelveError::InvalidParameter(format!(
                        "Unknown command '{}'. Type 'help' for a list of commands.",
                        input.trim()
                    )))
                }
            },
        };
        Ok(command)
    }

    /// Whether carrying out this command can change the game.
    pub fn is_action(self) -> bool {
        matches!(self, Command::Move(_) | Command::Explore)
    }
}

impl FromStr for Command {
    type Err = DelveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::parse(s)
    }
}

/// Command reference shown by `help`.
pub fn help_text() -> String {
    [
        "Commands:",
        "  north | n     move north",
        "  south | s     move south",
        "  east  | e     move east",
        "  west  | w     move west",
        "  explore | x   explore the current room",
        "  map | m       show the map",
        "  stats         show explorer and map statistics",
        "  inventory | i show your inventory",
        "  save          save the game",
        "  help | ?      show this help",
        "  quit | q      leave the dungeon",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_movement() {
        assert_eq!(Command::parse("north").unwrap(), Command::Move(Direction::North));
        assert_eq!(Command::parse("s").unwrap(), Command::Move(Direction::South));
        assert_eq!(Command::parse("ESTE").unwrap(), Command::Move(Direction::East));
        assert_eq!(Command::parse("oeste").unwrap(), Command::Move(Direction::West));
        assert_eq!(Command::parse("w").unwrap(), Command::Move(Direction::West));
    }

    #[test]
    fn test_parse_other_commands() {
        assert_eq!(Command::parse("x").unwrap(), Command::Explore);
        assert_eq!(Command::parse("m").unwrap(), Command::ShowMap);
        assert_eq!(Command::parse("Stats").unwrap(), Command::Stats);
        assert_eq!(Command::parse("inv").unwrap(), Command::Inventory);
        assert_eq!(Command::parse("i").unwrap(), Command::Inventory);
        assert_eq!(Command::parse("?").unwrap(), Command::Help);
        assert_eq!(Command::parse("save").unwrap(), Command::Save);
        assert_eq!(Command::parse("q").unwrap(), Command::Quit);
        assert_eq!("quit".parse::<Command>().unwrap(), Command::Quit);
    }

    #[test]
    fn test_parse_rejects_unknown_input() {
        for input in ["", "   ", "up", "northeast", "go north", "xx"] {
            assert!(
                matches!(Command::parse(input), Err(DelveError::InvalidParameter(_))),
                "accepted {:?}",
                input
            );
        }
    }

    #[test]
    fn test_only_moves_and_explore_are_actions() {
        assert!(Command::Move(Direction::East).is_action());
        assert!(Command::Explore.is_action());
        assert!(!Command::ShowMap.is_action());
        assert!(!Command::Save.is_action());
    }

    #[test]
    fn test_help_mentions_every_command() {
        let help = help_text();
        for word in ["north", "explore", "map", "stats", "inventory", "save", "help", "quit"] {
            assert!(help.contains(word), "help is missing {}", word);
        }
    }
}
