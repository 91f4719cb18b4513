// Search engines grouped by game family

pub mod alphabeta;
pub mod deepening;
pub mod duct;
pub mod mcts;
pub mod minimax;
pub mod monte_carlo;
pub mod playout;
pub mod simultaneous;
pub mod single;

use rand::Rng;

/// Window bound for deterministic search. Decided positions score at most this.
pub const INF: i64 = 1_000_000_000;

/// How long a sampling engine keeps simulating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Budget {
    Simulations(u32),
    /// Wall-clock milliseconds.
    TimeMs(i64),
}

impl Budget {
    /// Picks a time budget when the threshold is positive, otherwise the count.
    pub fn time_or_count(threshold_ms: i64, count: u32) -> Self {
        if threshold_ms > 0 {
            Budget::TimeMs(threshold_ms)
        } else {
            Budget::Simulations(count)
        }
    }
}

/// Uniform random legal action, `None` when there is none.
pub fn random_action<A: Copy, R: Rng + ?Sized>(actions: &[A], rng: &mut R) -> Option<A> {
    if actions.is_empty() {
        None
    } else {
        Some(actions[rng.random_range(0..actions.len())])
    }
}
