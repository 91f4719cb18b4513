// Integration tests for the uniform player entry point
//
// Every registered algorithm is exercised through `Player`, on both live and
// finished games.

use grid_search::config::Config;
use grid_search::game::{SearchState, SimultaneousState};
use grid_search::games::connect_four::ConnectFourState;
use grid_search::games::maze::MazeState;
use grid_search::games::simmaze::SimMazeState;
use grid_search::games::twomaze::TwoMazeState;
use grid_search::games::MAZE_END_TURN;
use grid_search::{AlgorithmId, GameFamily, Playable, Player, SearchError};

/// Small budgets keep every engine fast.
fn quick_config() -> Config {
    let mut config = Config::default_hardcoded();
    config.search.simulation_count = 100;
    config.search.search_depth = 2;
    config.search.time_threshold_ms = 2;
    config.deepening.max_depth = 3;
    config
}

fn players(family: GameFamily) -> Vec<Player> {
    let config = quick_config();
    AlgorithmId::names(family)
        .into_iter()
        .map(|name| Player::new(family, name, &config).expect("registered name").with_seed(42))
        .collect()
}

#[test]
fn test_every_engine_returns_none_on_finished_games() {
    let mut maze = MazeState::new(1);
    maze.turn = MAZE_END_TURN;
    let mut two = TwoMazeState::new(1);
    two.turn = MAZE_END_TURN;
    let mut sim = SimMazeState::new(1);
    sim.turn = MAZE_END_TURN;
    let won = ConnectFourState::from_moves(&[0, 1, 0, 1, 0, 1, 0]);
    assert!(won.is_terminal());

    for mut player in players(GameFamily::SinglePlayer) {
        assert_eq!(MazeState::select(&mut player, &maze).expect("same family"), None, "{}", player.algorithm());
    }
    for mut player in players(GameFamily::Alternating) {
        assert_eq!(TwoMazeState::select(&mut player, &two).expect("same family"), None, "{}", player.algorithm());
        assert_eq!(player.select_connect_four(&won).expect("accepted"), None, "{}", player.algorithm());
    }
    for mut player in players(GameFamily::Simultaneous) {
        assert_eq!(SimMazeState::select(&mut player, &sim).expect("same family"), None, "{}", player.algorithm());
    }
    for mut player in players(GameFamily::ConnectFour) {
        assert_eq!(ConnectFourState::select(&mut player, &won).expect("same family"), None, "{}", player.algorithm());
    }
}

#[test]
fn test_every_engine_returns_a_legal_action() {
    let maze = MazeState::new(3);
    let two = TwoMazeState::new(3);
    let sim = SimMazeState::new(3);
    let board = ConnectFourState::from_moves(&[3, 3, 2]);

    for mut player in players(GameFamily::SinglePlayer) {
        let action = MazeState::select(&mut player, &maze).expect("same family");
        assert!(maze.legal_actions().contains(&action.expect("action")), "{}", player.algorithm());
    }
    for mut player in players(GameFamily::Alternating) {
        let action = TwoMazeState::select(&mut player, &two).expect("same family");
        assert!(two.legal_actions().contains(&action.expect("action")), "{}", player.algorithm());
    }
    for mut player in players(GameFamily::Simultaneous) {
        let action = SimMazeState::select(&mut player, &sim).expect("same family");
        assert!(sim.legal_actions_for(0).contains(&action.expect("action")), "{}", player.algorithm());
    }
    for mut player in players(GameFamily::ConnectFour) {
        let action = ConnectFourState::select(&mut player, &board).expect("same family");
        assert!(board.legal_actions().contains(&action.expect("action")), "{}", player.algorithm());
    }
}

#[test]
fn test_connect_four_engines_take_immediate_win() {
    let board = ConnectFourState::from_moves(&[0, 0, 1, 1, 2, 2]);
    let mut config = quick_config();
    config.search.time_threshold_ms = 0;
    config.search.simulation_count = 2000;
    config.search.search_depth = 3;

    for name in ["mcts", "bit-mcts", "iterative-deepening", "bit-iterative-deepening"] {
        let mut player = Player::new(GameFamily::ConnectFour, name, &config)
            .expect("registered name")
            .with_seed(8);
        assert_eq!(player.select_connect_four(&board).expect("same family"), Some(3), "{}", name);
    }
}

#[test]
fn test_unknown_names_fail_at_construction() {
    let config = quick_config();
    for (family, name) in [
        (GameFamily::SinglePlayer, "minimax"),
        (GameFamily::Alternating, "beam"),
        (GameFamily::Simultaneous, "alphabeta"),
        (GameFamily::ConnectFour, "duct"),
    ] {
        match Player::new(family, name, &config) {
            Err(SearchError::UnknownAlgorithm { family: f, name: n }) => {
                assert_eq!(f, family);
                assert_eq!(n, name);
            }
            Err(other) => panic!("unexpected error {}", other),
            Ok(_) => panic!("{} should not be a {} algorithm", name, family),
        }
    }
}

#[test]
fn test_family_mismatch_is_reported() {
    let config = quick_config();
    let mut single = Player::new(GameFamily::SinglePlayer, "greedy", &config).expect("valid");
    assert!(matches!(
        single.select_alternating(&TwoMazeState::new(0)),
        Err(SearchError::ContractViolation { .. })
    ));
    assert!(matches!(
        single.select_connect_four(&ConnectFourState::new()),
        Err(SearchError::ContractViolation { .. })
    ));

    let mut four = Player::new(GameFamily::ConnectFour, "bit-mcts", &config).expect("valid");
    assert!(matches!(
        four.select_alternating(&TwoMazeState::new(0)),
        Err(SearchError::ContractViolation { .. })
    ));
}

#[test]
fn test_same_seed_gives_same_decision() {
    let config = quick_config();
    let state = TwoMazeState::new(21);
    let mut first = Player::new(GameFamily::Alternating, "mcts", &config).expect("valid").with_seed(99);
    let mut second = Player::new(GameFamily::Alternating, "mcts", &config).expect("valid").with_seed(99);
    assert_eq!(
        first.select_alternating(&state).expect("same family"),
        second.select_alternating(&state).expect("same family")
    );
}
