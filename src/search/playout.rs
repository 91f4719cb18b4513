// Random rollouts to a terminal state

use rand::Rng;

use crate::game::{flip_value, AlternatingState, SimultaneousState};
use crate::profiler;

/// Plays uniformly random legal actions until the game ends.
///
/// Returns 1.0 / 0.0 / 0.5 for a win / loss / draw of the player to move in
/// `state`. Equivalent to `terminal value` when done and
/// `flip_value(playout(successor))` otherwise, unrolled into a loop.
pub fn playout<S, R>(state: &S, rng: &mut R) -> f64
where
    S: AlternatingState,
    R: Rng + ?Sized,
{
    profiler::record_playout();
    let mut current = state.clone();
    let mut plies = 0usize;

    let value = loop {
        if current.is_terminal() {
            break current.outcome().value();
        }
        let actions = current.legal_actions();
        if actions.is_empty() {
            break 0.5;
        }
        let action = actions[rng.random_range(0..actions.len())];
        current = current.apply_action(action);
        plies += 1;
    };

    if plies % 2 == 0 {
        value
    } else {
        flip_value(value)
    }
}

/// Both players act uniformly at random until the game ends.
/// Returns the value for player 0.
pub fn simultaneous_playout<S, R>(state: &S, rng: &mut R) -> f64
where
    S: SimultaneousState,
    R: Rng + ?Sized,
{
    profiler::record_playout();
    let mut current = state.clone();

    loop {
        if current.is_terminal() {
            return current.outcome().value();
        }
        let first = current.legal_actions_for(0);
        let second = current.legal_actions_for(1);
        if first.is_empty() || second.is_empty() {
            return 0.5;
        }
        let a0 = first[rng.random_range(0..first.len())];
        let a1 = second[rng.random_range(0..second.len())];
        current = current.apply_actions(a0, a1);
    }
}
