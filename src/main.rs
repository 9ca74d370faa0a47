//! # Delve Main Entry Point
//!
//! Parses the command line, builds or loads a dungeon, and runs the text
//! game loop on stdin.

use clap::Parser;
use delve::{
    config, describe_room, help_text, load_game, render_inventory, render_map, render_stats,
    save_game, Command, DelveError, DelveResult, GameCompletionState, GameState,
    GenerationConfig, InputHandler,
};
use log::{debug, error, info};
use std::io::{self, Write};
use std::path::PathBuf;

/// Command line arguments for Delve.
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(about = "Explore a procedurally generated dungeon and defeat its boss")]
#[command(version)]
struct Args {
    /// Random seed for dungeon generation and combat
    #[arg(short, long)]
    seed: Option<u64>,

    /// Dungeon width in rooms
    #[arg(long, default_value_t = config::DEFAULT_MAP_WIDTH)]
    width: u32,

    /// Dungeon height in rooms
    #[arg(long, default_value_t = config::DEFAULT_MAP_HEIGHT)]
    height: u32,

    /// Number of rooms to generate
    #[arg(short, long, default_value_t = config::DEFAULT_ROOM_COUNT)]
    rooms: usize,

    /// File used by the `save` command
    #[arg(long, default_value = config::DEFAULT_SAVE_FILE)]
    save_file: PathBuf,

    /// Resume from a save file instead of generating a new dungeon
    #[arg(long)]
    load: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> DelveResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level);

    info!("Starting Delve v{}", delve::VERSION);

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut game = match &args.load {
        Some(path) => {
            let (explorer, map) = load_game(path).map_err(|e| {
                error!("Could not load {}: {}", path.display(), e);
                e
            })?;
            GameState::from_parts(map, explorer, seed)
        }
        None => {
            let config = GenerationConfig {
                width: args.width,
                height: args.height,
                room_count: args.rooms,
                ..GenerationConfig::new(seed)
            };
            GameState::new_game(&config).map_err(|e| {
                error!("Could not generate a dungeon: {}", e);
                e
            })?
        }
    };

    run_game_loop(&mut game, &args)
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) {
    #[cfg(feature = "dev-tools")]
    {
        use tracing_subscriber::EnvFilter;

        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(log_level))
            .with_target(false)
            .with_writer(io::stderr)
            .init();
        tracing::debug!(filter = log_level, "tracing subscriber installed");
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::new()
            .parse_filters(log_level)
            .format_target(false)
            .init();
    }
}

/// Main game loop: one command per line until victory, defeat, quit or end
/// of input.
fn run_game_loop(game: &mut GameState, args: &Args) -> DelveResult<()> {
    let stdin = io::stdin();
    let mut input = InputHandler::new(stdin.lock());

    println!("Welcome to Delve! Find and defeat the boss hidden in the dungeon.");
    println!("Type 'help' for the list of commands.\n");
    println!("{}", describe_room(&game.map, game.explorer.position));

    loop {
        if game.is_game_ended() {
            break;
        }

        prompt()?;
        let Some(command) = input.next_command() else {
            info!("End of input, leaving the dungeon");
            break;
        };

        let command = match command {
            Ok(command) => command,
            Err(DelveError::Io(e)) => return Err(e.into()),
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        let acted = command.is_action();
        match command {
            Command::Move(direction) => {
                if game.move_explorer(direction) {
                    println!("{}", describe_room(&game.map, game.explorer.position));
                } else {
                    println!("You can't go {} from here.", direction);
                }
            }
            Command::Explore => println!("{}", game.explore()),
            Command::ShowMap => println!("{}", render_map(&game.map, game.explorer.position)),
            Command::Stats => println!("{}", render_stats(&game.explorer, &game.map)),
            Command::Inventory => println!("{}", render_inventory(&game.explorer)),
            Command::Help => println!("{}", help_text()),
            Command::Save => match save_game(&game.explorer, &game.map, &args.save_file) {
                Ok(()) => println!("Game saved to {}", args.save_file.display()),
                Err(e) => {
                    error!("Save failed: {}", e);
                    println!("Could not save the game: {}", e);
                }
            },
            Command::Quit => {
                println!("You leave the dungeon.");
                break;
            }
        }

        if acted {
            debug!(
                "Turn {}: {} ({:?})",
                game.turn_number,
                game.explorer_summary(),
                game.completion_state
            );
        }
    }

    match game.completion_state {
        GameCompletionState::Victory => println!("\nVICTORY! The dungeon's master has fallen."),
        GameCompletionState::Defeat => println!("\nYou have fallen in the dungeon. GAME OVER."),
        GameCompletionState::Playing => {}
    }
    println!("\n{}", game.exploration_report());

    Ok(())
}

fn prompt() -> io::Result<()> {
    print!("> ");
    io::stdout().flush()
}
