// Alpha-beta pruning over the same negamax recursion as minimax

use super::INF;
use crate::game::AlternatingState;
use crate::profiler;

/// Fail-hard alpha-beta score for the player to move.
///
/// Equals `minimax_score` whenever the true value lies inside
/// `(alpha, beta)`; otherwise it is clamped to the violated bound.
pub fn alpha_beta_score<S: AlternatingState>(state: &S, mut alpha: i64, beta: i64, depth: u32) -> i64 {
    profiler::record_node();
    if depth == 0 || state.is_terminal() {
        return state.heuristic_score();
    }
    let actions = state.legal_actions();
    if actions.is_empty() {
        return state.heuristic_score();
    }
    for action in actions {
        let score = -alpha_beta_score(&state.apply_action(action), -beta, -alpha, depth - 1);
        if score > alpha {
            alpha = score;
        }
        if alpha >= beta {
            profiler::record_cutoff();
            return alpha;
        }
    }
    alpha
}

/// Best action at `depth`. Picks the same score as full minimax.
pub fn alpha_beta_action<S: AlternatingState>(state: &S, depth: u32) -> Option<S::Action> {
    let mut alpha = -INF;
    let beta = INF;
    let mut best: Option<S::Action> = None;

    for action in state.legal_actions() {
        let score = -alpha_beta_score(&state.apply_action(action), -beta, -alpha, depth.saturating_sub(1));
        if best.is_none() || score > alpha {
            best = Some(action);
            alpha = alpha.max(score);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::connect_four::ConnectFourState;
    use crate::games::twomaze::TwoMazeState;
    use crate::search::minimax::minimax_score;

    #[test]
    fn test_full_window_matches_minimax() {
        for seed in 0..6 {
            let state = TwoMazeState::new(seed);
            for depth in 0..4 {
                assert_eq!(
                    alpha_beta_score(&state, -INF, INF, depth),
                    minimax_score(&state, depth),
                    "seed {} depth {}",
                    seed,
                    depth
                );
            }
        }
    }

    #[test]
    fn test_blocks_immediate_threat() {
        // Second player has three on the bottom row; first player must block column 3
        let state = ConnectFourState::from_moves(&[6, 0, 6, 1, 5, 2]);
        assert_eq!(alpha_beta_action(&state, 2), Some(3));
    }

    #[test]
    fn test_all_losing_still_returns_action() {
        // Two open threats for the opponent: every reply loses at depth 2
        let state = ConnectFourState::from_moves(&[6, 1, 6, 2, 5, 3]);
        assert_eq!(alpha_beta_action(&state, 2), Some(0));
    }
}
