// Arena: plays matches between two configured engines
//
// Usage:
//   cargo run --bin arena -- [config_path]
//
// The [arena] table of the config picks the game and both algorithms. Every
// decision can be written to the decision log for later replay.

use log::{error, info};
use std::env;
use std::process;
use std::time::Instant;

use grid_search::config::Config;
use grid_search::debug_logger::{DecisionLogger, DecisionRecord};
use grid_search::game::{AlternatingState, SearchState, SimultaneousState};
use grid_search::games::connect_four::ConnectFourState;
use grid_search::games::maze::MazeState;
use grid_search::games::simmaze::SimMazeState;
use grid_search::games::twomaze::TwoMazeState;
use grid_search::orchestrator::{AlgorithmId, GameFamily, Playable, Player};
use grid_search::profiler;
use grid_search::SearchError;

/// Final score of one game from the first player's view: 1 win, 0 loss, 0.5 draw.
type GameResult = f64;

fn decision_seed(base: u64, game: u32, turn: u32, side: usize) -> u64 {
    base.wrapping_add(u64::from(game) * 10_000 + u64::from(turn) * 2 + side as u64)
}

fn build_players(family: GameFamily, config: &Config) -> Result<[Player; 2], SearchError> {
    Ok([
        Player::new(family, &config.arena.first, config)?,
        Player::new(family, &config.arena.second, config)?.with_player_id(1)?,
    ])
}

/// Connect four accepts its own engines and every alternating engine.
fn connect_four_player(name: &str, config: &Config) -> Result<Player, SearchError> {
    let algorithm = AlgorithmId::parse(GameFamily::ConnectFour, name)
        .or_else(|_| AlgorithmId::parse(GameFamily::Alternating, name))?;
    Player::from_algorithm(algorithm, config)
}

fn log_decision<S: Playable>(
    logger: &DecisionLogger,
    player: &Player,
    turn: u32,
    seed: u64,
    state: &S,
    action: Option<S::Move>,
    started: Instant,
) {
    let record = DecisionRecord::new(
        turn,
        &player.algorithm().to_string(),
        player.player_id(),
        seed,
        state.clone(),
        action,
        started.elapsed().as_millis() as u64,
    );
    logger.log(&record);
}

fn play_maze(config: &Config, game: u32, logger: &DecisionLogger) -> Result<i32, SearchError> {
    let mut player = Player::new(GameFamily::SinglePlayer, &config.arena.first, config)?;
    let mut state = MazeState::new(config.arena.seed.wrapping_add(u64::from(game)));

    while !state.is_terminal() {
        let seed = decision_seed(config.arena.seed, game, state.turn, 0);
        player.reseed(seed);
        let started = Instant::now();
        let action = MazeState::select(&mut player, &state)?;
        log_decision(logger, &player, state.turn, seed, &state, action, started);
        match action {
            Some(direction) => state = state.apply_action(direction),
            None => break,
        }
    }
    Ok(state.game_score)
}

/// Plays an alternating game where `players[0]` moves first.
fn play_alternating<S>(
    config: &Config,
    game: u32,
    mut state: S,
    players: &mut [Player; 2],
    logger: &DecisionLogger,
) -> Result<GameResult, SearchError>
where
    S: Playable + AlternatingState<Action = <S as Playable>::Move>,
{
    let mut turn = 0u32;
    while !state.is_terminal() {
        let side = (turn % 2) as usize;
        let seed = decision_seed(config.arena.seed, game, turn, side);
        players[side].reseed(seed);
        let started = Instant::now();
        let action = S::select(&mut players[side], &state)?;
        log_decision(logger, &players[side], turn, seed, &state, action, started);
        match action {
            Some(action) => state = state.apply_action(action),
            None => break,
        }
        turn += 1;
    }

    // The outcome is reported for whoever is to move in the final state.
    let value = state.outcome().value();
    Ok(if turn % 2 == 0 { value } else { 1.0 - value })
}

fn play_simultaneous(
    config: &Config,
    game: u32,
    players: &mut [Player; 2],
    logger: &DecisionLogger,
) -> Result<GameResult, SearchError> {
    let mut state = SimMazeState::new(config.arena.seed.wrapping_add(u64::from(game)));

    while !state.is_terminal() {
        let mut chosen = [None, None];
        for side in 0..2 {
            let seed = decision_seed(config.arena.seed, game, state.turn, side);
            players[side].reseed(seed);
            let started = Instant::now();
            chosen[side] = SimMazeState::select(&mut players[side], &state)?;
            log_decision(logger, &players[side], state.turn, seed, &state, chosen[side], started);
        }
        match chosen {
            [Some(first), Some(second)] => state = state.apply_actions(first, second),
            _ => break,
        }
    }
    Ok(state.outcome().value())
}

fn run(config: &Config) -> Result<(), SearchError> {
    let logger = DecisionLogger::new(config.debug.enabled, &config.debug.log_file_path);
    let arena = &config.arena;
    let started = Instant::now();

    if arena.game == "maze" {
        let mut total = 0i64;
        for game in 0..arena.games {
            let score = play_maze(config, game, &logger)?;
            info!("Game {}: {} scored {}", game, arena.first, score);
            total += i64::from(score);
        }
        let average = if arena.games > 0 {
            total as f64 / f64::from(arena.games)
        } else {
            0.0
        };
        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    ARENA REPORT (maze)");
        println!("═══════════════════════════════════════════════════════════");
        println!("Algorithm:      {}", arena.first);
        println!("Games:          {}", arena.games);
        println!("Average Score:  {:.2}", average);
        println!("═══════════════════════════════════════════════════════════\n");
    } else {
        let mut players = match arena.game.as_str() {
            "twomaze" => build_players(GameFamily::Alternating, config)?,
            "simmaze" => build_players(GameFamily::Simultaneous, config)?,
            "connect-four" => [
                connect_four_player(&arena.first, config)?,
                connect_four_player(&arena.second, config)?,
            ],
            other => {
                return Err(SearchError::InvalidParameter {
                    name: "arena.game",
                    reason: format!("unknown game '{}'", other),
                })
            }
        };

        let mut first_points = 0.0;
        for game in 0..arena.games {
            // Sides swap every other game so neither engine always moves first.
            // The simultaneous maze is mirrored, so its sides stay fixed.
            let swapped = game % 2 == 1 && arena.game != "simmaze";
            if swapped {
                players.swap(0, 1);
            }
            let result = match arena.game.as_str() {
                "twomaze" => {
                    let state = TwoMazeState::new(arena.seed.wrapping_add(u64::from(game)));
                    play_alternating(config, game, state, &mut players, &logger)?
                }
                "simmaze" => play_simultaneous(config, game, &mut players, &logger)?,
                _ => play_alternating(config, game, ConnectFourState::new(), &mut players, &logger)?,
            };
            if swapped {
                players.swap(0, 1);
            }
            let for_first = if swapped { 1.0 - result } else { result };
            info!("Game {}: {} scored {:.1} against {}", game, arena.first, for_first, arena.second);
            first_points += for_first;
        }

        let rate = if arena.games > 0 {
            100.0 * first_points / f64::from(arena.games)
        } else {
            0.0
        };
        println!("\n═══════════════════════════════════════════════════════════");
        println!("                  ARENA REPORT ({})", arena.game);
        println!("═══════════════════════════════════════════════════════════");
        println!("Games:          {}", arena.games);
        println!("{:<15} {:.1} points ({:.1}%)", arena.first, first_points, rate);
        println!(
            "{:<15} {:.1} points ({:.1}%)",
            arena.second,
            f64::from(arena.games) - first_points,
            100.0 - rate
        );
        println!("═══════════════════════════════════════════════════════════\n");
    }

    profiler::merge_thread_local();
    profiler::print_report(started.elapsed().as_millis() as u64);
    Ok(())
}

fn main() {
    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let config = match env::args().nth(1) {
        Some(path) => Config::from_file(&path).unwrap_or_else(|e| {
            error!("{}", e);
            process::exit(1);
        }),
        None => Config::load_or_default(),
    };

    info!(
        "Starting arena: {} ({} vs {}, {} games)",
        config.arena.game, config.arena.first, config.arena.second, config.arena.games
    );

    if let Err(e) = run(&config) {
        error!("{}", e);
        process::exit(1);
    }
}
