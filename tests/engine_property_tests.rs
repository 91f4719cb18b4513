// Cross-engine properties checked through the public API
//
// - Bitboard and array connect four agree move for move
// - Alpha-beta returns the minimax value
// - Tree statistics stay consistent after many simulations
// - Time-bounded engines still answer with a tiny budget

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use grid_search::bitboard::ConnectFourBitBoard;
use grid_search::game::{AlternatingState, SearchState, SimultaneousState};
use grid_search::games::connect_four::ConnectFourState;
use grid_search::games::simmaze::SimMazeState;
use grid_search::games::twomaze::TwoMazeState;
use grid_search::search::alphabeta::{alpha_beta_action, alpha_beta_score};
use grid_search::search::deepening::iterative_deepening;
use grid_search::search::duct::DuctTree;
use grid_search::search::mcts::{MctsSettings, MctsTree, NodeId};
use grid_search::search::minimax::{minimax_action, minimax_score};
use grid_search::search::{Budget, INF};

#[test]
fn test_bitboard_tracks_array_board_over_random_games() {
    let mut rng = StdRng::seed_from_u64(2024);
    for game in 0..50 {
        let mut array = ConnectFourState::new();
        let mut bits = ConnectFourBitBoard::from(&array);

        while !array.is_terminal() {
            assert_eq!(bits.legal_actions(), array.legal_actions(), "game {}", game);
            assert_eq!(bits.is_terminal(), array.is_terminal());
            assert_eq!(bits.outcome(), array.outcome());
            assert_eq!(bits.to_array(), array);

            let actions = array.legal_actions();
            let column = actions[rng.random_range(0..actions.len())];
            array = array.apply_action(column);
            bits = bits.apply_action(column);
        }

        assert!(bits.is_terminal(), "game {} should end on both boards", game);
        assert_eq!(bits.outcome(), array.outcome());
        assert!(bits.legal_actions().is_empty());
    }
}

#[test]
fn test_alpha_beta_matches_minimax_value() {
    for seed in 0..8 {
        let state = TwoMazeState::new(seed);
        for depth in 1..=4 {
            assert_eq!(
                alpha_beta_score(&state, -INF, INF, depth),
                minimax_score(&state, depth),
                "seed {} depth {}",
                seed,
                depth
            );
        }
    }

    let mid_game = ConnectFourState::from_moves(&[3, 3, 2, 4, 2]);
    assert_eq!(alpha_beta_score(&mid_game, -INF, INF, 4), minimax_score(&mid_game, 4));
}

#[test]
fn test_alpha_beta_action_achieves_minimax_value() {
    for seed in 0..6 {
        let state = TwoMazeState::new(seed);
        let depth = 3;
        let best = minimax_score(&state, depth);
        let chosen = alpha_beta_action(&state, depth).expect("legal action");
        let achieved = -minimax_score(&state.apply_action(chosen), depth - 1);
        assert_eq!(achieved, best, "seed {}", seed);
        assert!(minimax_action(&state, depth).is_some());
    }
}

#[test]
fn test_mcts_statistics_stay_consistent() {
    let mut rng = StdRng::seed_from_u64(77);
    let state = ConnectFourBitBoard::from(&ConnectFourState::from_moves(&[3, 2, 3]));
    let mut tree = MctsTree::new(state, MctsSettings::playout(1.0, 10));
    let simulations = tree.run(Budget::Simulations(1500), &mut rng);

    assert_eq!(simulations, 1500);
    assert_eq!(tree.stats(tree.root()).n, 1500.0);
    for index in 0..tree.len() {
        let id = NodeId(index as u32);
        let stats = tree.stats(id);
        assert!(stats.w >= 0.0 && stats.w <= stats.n);
        let child_visits: f64 = tree.children(id).map(|c| tree.stats(c).n).sum();
        assert!(child_visits <= stats.n);
    }
}

#[test]
fn test_duct_marginals_are_consistent() {
    let mut rng = StdRng::seed_from_u64(5);
    let state = SimMazeState::new(5);
    let mut tree = DuctTree::new(state.clone(), 1.0, 5);
    for _ in 0..400 {
        tree.simulate(&mut rng);
    }

    let root = tree.root();
    let rows = tree.marginals(root, 0);
    let cols = tree.marginals(root, 1);
    assert_eq!(rows.len(), state.legal_actions_for(0).len());
    assert_eq!(cols.len(), state.legal_actions_for(1).len());

    let row_visits: f64 = rows.iter().map(|s| s.n).sum();
    let col_visits: f64 = cols.iter().map(|s| s.n).sum();
    let row_wins: f64 = rows.iter().map(|s| s.w).sum();
    let col_wins: f64 = cols.iter().map(|s| s.w).sum();
    assert_eq!(row_visits, col_visits);
    assert!((row_wins - col_wins).abs() < 1e-9);
    assert_eq!(tree.stats(root).n, 400.0);
}

#[test]
fn test_deepening_answers_with_tiny_budget() {
    let state = ConnectFourState::new();
    let result = iterative_deepening(&state, 1, 42, 7);
    let action = result.action.expect("fallback action");
    assert!(state.legal_actions().contains(&action));
    assert!(result.completed_depth < 42);
}

#[test]
fn test_deepening_without_clock_searches_fixed_depth() {
    let state = TwoMazeState::new(12);
    let result = iterative_deepening(&state, 0, 42, 3);
    assert_eq!(result.completed_depth, 3);
    assert_eq!(result.action, alpha_beta_action(&state, 3));
}

#[test]
fn test_bitboard_and_array_search_agree() {
    let array = ConnectFourState::from_moves(&[3, 3, 4, 4]);
    let bits = ConnectFourBitBoard::from(&array);
    assert_eq!(alpha_beta_action(&bits, 4), alpha_beta_action(&array, 4));
    assert_eq!(alpha_beta_score(&bits, -INF, INF, 4) > 0, alpha_beta_score(&array, -INF, INF, 4) > 0);
}
