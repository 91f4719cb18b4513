// Plain negamax-style minimax

use crate::game::AlternatingState;
use crate::profiler;

/// Score of `state` for the player to move, searched `depth` plies deep.
pub fn minimax_score<S: AlternatingState>(state: &S, depth: u32) -> i64 {
    profiler::record_node();
    if depth == 0 || state.is_terminal() {
        return state.heuristic_score();
    }
    let actions = state.legal_actions();
    if actions.is_empty() {
        return state.heuristic_score();
    }
    actions
        .into_iter()
        .map(|action| -minimax_score(&state.apply_action(action), depth - 1))
        .max()
        .unwrap_or_else(|| state.heuristic_score())
}

/// Best action at `depth`; the first one wins ties.
pub fn minimax_action<S: AlternatingState>(state: &S, depth: u32) -> Option<S::Action> {
    let mut best: Option<(S::Action, i64)> = None;
    for action in state.legal_actions() {
        let score = -minimax_score(&state.apply_action(action), depth.saturating_sub(1));
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((action, score));
        }
    }
    best.map(|(action, _)| action)
}
