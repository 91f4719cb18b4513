// State contracts consumed by every search engine
//
// Games are value types: applying an action returns a fresh state and never
// mutates the receiver. Engines only see these traits, never concrete games.

use std::fmt;

/// Terminal status of a state.
///
/// For alternating-turn games this is from the point of view of the player
/// about to move. Simultaneous games report it for player 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Win,
    Lose,
    Draw,
    Ongoing,
}

impl Outcome {
    /// Scalar value used by playouts and tree statistics.
    pub fn value(self) -> f64 {
        match self {
            Outcome::Win => 1.0,
            Outcome::Lose => 0.0,
            Outcome::Draw | Outcome::Ongoing => 0.5,
        }
    }

    /// Same outcome seen by the other player.
    pub fn reversed(self) -> Outcome {
        match self {
            Outcome::Win => Outcome::Lose,
            Outcome::Lose => Outcome::Win,
            other => other,
        }
    }
}

/// Converts a value in [0, 1] to the opponent's point of view.
///
/// Every place that hands a value across a change of mover goes through here.
#[inline]
pub fn flip_value(value: f64) -> f64 {
    1.0 - value
}

/// Base contract shared by every searchable state, single-agent included.
pub trait SearchState: Clone + Send + Sync {
    type Action: Copy + Eq + fmt::Debug + Send + Sync;

    /// Legal actions for the player to move. Empty on terminal states.
    fn legal_actions(&self) -> Vec<Self::Action>;

    /// Returns the successor. `action` must come from `legal_actions`.
    fn apply_action(&self, action: Self::Action) -> Self;

    fn is_terminal(&self) -> bool;

    /// Heuristic evaluation from the point of view of the player to move.
    fn heuristic_score(&self) -> i64;
}

/// Two-player zero-sum game where players alternate.
pub trait AlternatingState: SearchState {
    /// Terminal status for the player about to move.
    fn outcome(&self) -> Outcome;

    /// Heuristic win-rate estimate in [0, 1] for the player about to move.
    /// Used in place of a rollout by heuristic-leaf MCTS.
    fn score_rate(&self) -> f64;
}

/// Two-player game where both players commit an action each turn.
pub trait SimultaneousState: Clone + Send + Sync {
    type Action: Copy + Eq + fmt::Debug + Send + Sync;

    /// Legal actions for `player` (0 or 1).
    fn legal_actions_for(&self, player: usize) -> Vec<Self::Action>;

    /// Applies both players' actions at once.
    fn apply_actions(&self, first: Self::Action, second: Self::Action) -> Self;

    fn is_terminal(&self) -> bool;

    /// Terminal status for player 0.
    fn outcome(&self) -> Outcome;

    /// Heuristic evaluation for player 0.
    fn heuristic_score(&self) -> i64;

    /// Heuristic win-rate estimate in [0, 1] for player 0.
    fn score_rate(&self) -> f64;
}
