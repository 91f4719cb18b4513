// Standalone replay tool for decision logs written by the arena
//
// Usage:
//   cargo run --bin replay -- <log_file> --game <game> [options]
//
// Options:
//   --game <name>          Game the log was recorded on (maze, twomaze, simmaze, connect-four)
//   --all                  Replay all turns
//   --turns <turn1,turn2>  Replay specific turns (comma-separated)
//   --verbose              Show detailed output for each turn
//   --config <path>        Path to Search.toml (default: Search.toml)

use std::env;
use std::process;

use grid_search::config::{Config, DEFAULT_CONFIG_PATH};
use grid_search::games::connect_four::ConnectFourState;
use grid_search::games::maze::MazeState;
use grid_search::games::simmaze::SimMazeState;
use grid_search::games::twomaze::TwoMazeState;
use grid_search::orchestrator::Playable;
use grid_search::replay::ReplayEngine;

fn print_usage() {
    eprintln!("Grid Search Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <log_file> --game <GAME> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --game <GAME>           maze, twomaze, simmaze or connect-four");
    eprintln!("  --all                   Replay all turns in the log");
    eprintln!("  --turns <T1,T2,...>     Replay specific turns (comma-separated)");
    eprintln!("  --verbose               Show detailed output for each turn");
    eprintln!("  --config <path>         Path to Search.toml (default: Search.toml)");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  # Replay all turns");
    eprintln!("  replay search_decisions.jsonl --game twomaze --all");
    eprintln!();
    eprintln!("  # Verbose replay of specific turns");
    eprintln!("  replay search_decisions.jsonl --game connect-four --turns 5,10 --verbose");
}

fn parse_turns(s: &str) -> Result<Vec<u32>, String> {
    s.split(',')
        .map(|t| {
            t.trim()
                .parse::<u32>()
                .map_err(|e| format!("Invalid turn number '{}': {}", t, e))
        })
        .collect()
}

enum Mode {
    All,
    Turns(Vec<u32>),
}

fn replay<S: Playable>(engine: &ReplayEngine, log_file: &str, mode: &Mode) {
    let entries = match engine.load_log_file::<S, _>(log_file) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error loading log file: {}", e);
            process::exit(1);
        }
    };

    if entries.is_empty() {
        eprintln!("Error: Log file is empty");
        process::exit(1);
    }

    println!("Loaded {} log entries\n", entries.len());

    match mode {
        Mode::All => {
            println!("Replaying all {} decisions...\n", entries.len());
            let results = engine.replay_all(&entries);
            engine.print_report(&results);
        }
        Mode::Turns(turns) => {
            println!("Replaying {} specific turn(s)...\n", turns.len());
            match engine.replay_turns(&entries, turns) {
                Ok(results) => engine.print_report(&results),
                Err(e) => {
                    eprintln!("Error during replay: {}", e);
                    process::exit(1);
                }
            }
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(if args.contains(&"--help".to_string()) { 0 } else { 1 });
    }

    let log_file = &args[1];
    let mut config_path = DEFAULT_CONFIG_PATH.to_string();
    let mut game = None;
    let mut verbose = false;
    let mut mode = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--all" => {
                mode = Some(Mode::All);
            }
            "--turns" => {
                let Some(arg) = args.get(i + 1) else {
                    eprintln!("Error: --turns requires an argument");
                    process::exit(1);
                };
                match parse_turns(arg) {
                    Ok(turns) => mode = Some(Mode::Turns(turns)),
                    Err(e) => {
                        eprintln!("Error parsing turns: {}", e);
                        process::exit(1);
                    }
                }
                i += 1;
            }
            "--game" => {
                let Some(arg) = args.get(i + 1) else {
                    eprintln!("Error: --game requires an argument");
                    process::exit(1);
                };
                game = Some(arg.clone());
                i += 1;
            }
            "--config" => {
                let Some(arg) = args.get(i + 1) else {
                    eprintln!("Error: --config requires an argument");
                    process::exit(1);
                };
                config_path = arg.clone();
                i += 1;
            }
            "--verbose" => {
                verbose = true;
            }
            _ => {
                eprintln!("Error: Unknown option '{}'", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let Some(mode) = mode else {
        eprintln!("Error: Must specify --all or --turns");
        print_usage();
        process::exit(1);
    };
    let Some(game) = game else {
        eprintln!("Error: Must specify --game");
        print_usage();
        process::exit(1);
    };

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        eprintln!("Using default configuration");
        Config::default_hardcoded()
    });

    println!("Loaded configuration from: {}", config_path);
    println!("Replay log file: {}", log_file);
    println!();

    let engine = ReplayEngine::new(config, verbose);

    match game.as_str() {
        "maze" => replay::<MazeState>(&engine, log_file, &mode),
        "twomaze" => replay::<TwoMazeState>(&engine, log_file, &mode),
        "simmaze" => replay::<SimMazeState>(&engine, log_file, &mode),
        "connect-four" => replay::<ConnectFourState>(&engine, log_file, &mode),
        other => {
            eprintln!("Error: Unknown game '{}'", other);
            process::exit(1);
        }
    }
}
