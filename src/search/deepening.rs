// Iterative deepening alpha-beta under a wall-clock budget

use log::debug;

use super::alphabeta::alpha_beta_action;
use super::INF;
use crate::game::AlternatingState;
use crate::profiler;
use crate::timing::TimeKeeper;

/// Answer of one deepening run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeepeningResult<A> {
    pub action: Option<A>,
    /// Deepest depth that finished before the budget ran out (0 if none did).
    pub completed_depth: u32,
}

/// Alpha-beta that gives up as soon as the clock runs out.
///
/// Returns `None` when aborted; the caller discards the whole depth.
fn timed_score<S: AlternatingState>(
    state: &S,
    mut alpha: i64,
    beta: i64,
    depth: u32,
    keeper: &TimeKeeper,
) -> Option<i64> {
    if keeper.is_time_over() {
        return None;
    }
    profiler::record_node();
    if depth == 0 || state.is_terminal() {
        return Some(state.heuristic_score());
    }
    let actions = state.legal_actions();
    if actions.is_empty() {
        return Some(state.heuristic_score());
    }
    for action in actions {
        let score = -timed_score(&state.apply_action(action), -beta, -alpha, depth - 1, keeper)?;
        if score > alpha {
            alpha = score;
        }
        if alpha >= beta {
            profiler::record_cutoff();
            return Some(alpha);
        }
    }
    Some(alpha)
}

fn timed_action<S: AlternatingState>(state: &S, depth: u32, keeper: &TimeKeeper) -> Option<S::Action> {
    let mut alpha = -INF;
    let mut best = None;
    for action in state.legal_actions() {
        let score = -timed_score(&state.apply_action(action), -INF, -alpha, depth - 1, keeper)?;
        if best.is_none() || score > alpha {
            best = Some(action);
            alpha = alpha.max(score);
        }
    }
    best
}

/// Runs depth 1, 2, ... `max_depth` until `time_threshold_ms` expires and
/// returns the deepest complete answer.
///
/// Falls back to the first legal action when not even depth 1 finishes.
/// A threshold of zero or less searches exactly `fixed_depth` with no clock.
pub fn iterative_deepening<S: AlternatingState>(
    state: &S,
    time_threshold_ms: i64,
    max_depth: u32,
    fixed_depth: u32,
) -> DeepeningResult<S::Action> {
    let actions = state.legal_actions();
    let Some(&fallback) = actions.first() else {
        return DeepeningResult {
            action: None,
            completed_depth: 0,
        };
    };

    if time_threshold_ms <= 0 {
        return DeepeningResult {
            action: alpha_beta_action(state, fixed_depth).or(Some(fallback)),
            completed_depth: fixed_depth,
        };
    }

    let keeper = TimeKeeper::new(time_threshold_ms);
    let mut result = DeepeningResult {
        action: Some(fallback),
        completed_depth: 0,
    };

    for depth in 1..=max_depth.max(1) {
        match timed_action(state, depth, &keeper) {
            Some(action) if !keeper.is_time_over() => {
                result.action = Some(action);
                result.completed_depth = depth;
            }
            // Aborted mid-depth: keep the previous answer
            _ => break,
        }
    }

    debug!(
        "Iterative deepening finished depth {} in {}ms, action {:?}",
        result.completed_depth,
        keeper.elapsed_ms(),
        result.action
    );
    result
}
