// Integration tests for decision logging and replay
//
// Decisions are logged through `DecisionLogger`, read back from disk and
// rerun with the logged seed. Seeded engines must reproduce themselves.

use std::path::PathBuf;

use grid_search::config::Config;
use grid_search::debug_logger::{DecisionLogger, DecisionRecord};
use grid_search::game::{SearchState, SimultaneousState};
use grid_search::games::connect_four::ConnectFourState;
use grid_search::games::simmaze::SimMazeState;
use grid_search::games::twomaze::TwoMazeState;
use grid_search::replay::ReplayEngine;
use grid_search::{GameFamily, Playable, Player};

fn temp_log(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("grid_search_{}_{}.jsonl", name, std::process::id()))
}

fn test_config() -> Config {
    let mut config = Config::default_hardcoded();
    config.search.simulation_count = 300;
    config.search.search_depth = 3;
    config.search.time_threshold_ms = 0;
    config
}

/// Plays `turns` decisions of an alternating game and logs each one.
fn log_alternating_game<S: Playable + SearchState<Action = <S as Playable>::Move>>(
    logger: &DecisionLogger,
    player: &mut Player,
    mut state: S,
    turns: u32,
) {
    for turn in 0..turns {
        let seed = 1_000 + u64::from(turn);
        player.reseed(seed);
        let action = S::select(player, &state).expect("same family");
        let record = DecisionRecord::new(
            turn,
            &player.algorithm().to_string(),
            player.player_id(),
            seed,
            state.clone(),
            action,
            0,
        );
        logger.log(&record);
        match action {
            Some(action) => state = state.apply_action(action),
            None => break,
        }
    }
}

#[test]
fn test_seeded_tree_search_replays_exactly() {
    let path = temp_log("twomaze_mcts");
    let logger = DecisionLogger::new(true, &path.to_string_lossy());
    let config = test_config();
    let mut player = Player::new(GameFamily::Alternating, "mcts", &config).expect("valid");
    log_alternating_game(&logger, &mut player, TwoMazeState::new(4), 6);

    let engine = ReplayEngine::new(config, false);
    let entries = engine
        .load_log_file::<TwoMazeState, _>(&path)
        .expect("log should load");
    assert_eq!(entries.len(), 6);
    assert_eq!(entries[0].algorithm, "alternating/mcts");

    let results = engine.replay_all(&entries);
    let stats = engine.generate_stats(&results);
    assert_eq!(stats.total_turns, 6);
    assert_eq!(stats.mismatches, 0);
    assert_eq!(stats.match_rate, 100.0);
    let _ = std::fs::remove_file(path);
}

#[test]
fn test_connect_four_log_replays_specific_turns() {
    let path = temp_log("connect_four");
    let logger = DecisionLogger::new(true, &path.to_string_lossy());
    let config = test_config();
    let mut player = Player::new(GameFamily::ConnectFour, "bit-iterative-deepening", &config).expect("valid");
    log_alternating_game(&logger, &mut player, ConnectFourState::new(), 5);

    let engine = ReplayEngine::new(config, true);
    let entries = engine
        .load_log_file::<ConnectFourState, _>(&path)
        .expect("log should load");
    let results = engine.replay_turns(&entries, &[1, 3]).expect("turns exist");
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.matches));
    assert_eq!(results[1].turn, 3);

    assert!(engine.replay_turns(&entries, &[40]).is_err());
    let _ = std::fs::remove_file(path);
}

#[test]
fn test_simultaneous_side_is_restored() {
    let path = temp_log("simmaze_duct");
    let logger = DecisionLogger::new(true, &path.to_string_lossy());
    let config = test_config();
    let state = SimMazeState::new(6);

    let mut player = Player::new(GameFamily::Simultaneous, "duct", &config)
        .expect("valid")
        .with_player_id(1)
        .expect("valid side")
        .with_seed(55);
    let action = SimMazeState::select(&mut player, &state).expect("same family");
    assert!(state.legal_actions_for(1).contains(&action.expect("action")));
    logger.log(&DecisionRecord::new(0, "simultaneous/duct", 1, 55, state, action, 3));

    let engine = ReplayEngine::new(config, false);
    let entries = engine
        .load_log_file::<SimMazeState, _>(&path)
        .expect("log should load");
    assert_eq!(entries[0].player_id, 1);
    let result = engine.replay_entry(&entries[0]).expect("replayable");
    assert!(result.matches);
    assert_eq!(result.original_time_ms, 3);
    let _ = std::fs::remove_file(path);
}

#[test]
fn test_malformed_log_is_an_error() {
    let path = temp_log("malformed");
    std::fs::write(&path, "{\"turn\": \"zero\"}\n").expect("temp file should be writable");
    let engine = ReplayEngine::new(test_config(), false);
    assert!(engine.load_log_file::<TwoMazeState, _>(&path).is_err());
    let _ = std::fs::remove_file(path);
}

#[test]
fn test_missing_log_is_an_error() {
    let engine = ReplayEngine::new(test_config(), false);
    let result = engine.load_log_file::<TwoMazeState, _>("definitely_missing.jsonl");
    assert!(result.is_err());
}
