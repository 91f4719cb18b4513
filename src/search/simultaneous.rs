// Simultaneous-move engines other than DUCT

use rand::Rng;

use super::mcts::{mcts_action, MctsSettings};
use super::playout::simultaneous_playout;
use super::{random_action, Budget};
use crate::game::{flip_value, AlternatingState, Outcome, SearchState, SimultaneousState};

pub fn random_simultaneous_action<S, R>(state: &S, player: usize, rng: &mut R) -> Option<S::Action>
where
    S: SimultaneousState,
    R: Rng + ?Sized,
{
    random_action(&state.legal_actions_for(player), rng)
}

/// For each of `player`'s actions, pairs it with a random opponent action
/// and plays out randomly, `playout_number` times. Highest total wins.
pub fn primitive_monte_carlo_simultaneous<S, R>(
    state: &S,
    player: usize,
    playout_number: u32,
    rng: &mut R,
) -> Option<S::Action>
where
    S: SimultaneousState,
    R: Rng + ?Sized,
{
    let mine = state.legal_actions_for(player);
    let theirs = state.legal_actions_for(1 - player);
    if mine.is_empty() {
        return None;
    }
    if theirs.is_empty() {
        return mine.first().copied();
    }

    let mut best: Option<(S::Action, f64)> = None;
    for &action in &mine {
        let mut total = 0.0;
        for _ in 0..playout_number {
            let reply = theirs[rng.random_range(0..theirs.len())];
            let next = if player == 0 {
                state.apply_actions(action, reply)
            } else {
                state.apply_actions(reply, action)
            };
            let value = simultaneous_playout(&next, rng);
            total += if player == 0 { value } else { flip_value(value) };
        }
        if best.map_or(true, |(_, t)| total > t) {
            best = Some((action, total));
        }
    }
    best.map(|(action, _)| action)
}

/// A simultaneous game replayed as alternating turns.
///
/// The searching player commits first and the opponent answers with that
/// choice pending; once both actions are in, the real turn is applied. The
/// answering side effectively sees the first choice, which is the accepted
/// approximation of this formulation.
#[derive(Debug, Clone)]
pub struct VirtualTurns<S: SimultaneousState> {
    base: S,
    root_player: usize,
    pending: Option<S::Action>,
}

impl<S: SimultaneousState> VirtualTurns<S> {
    pub fn new(base: S, root_player: usize) -> Self {
        VirtualTurns {
            base,
            root_player,
            pending: None,
        }
    }

    /// Real player index of whoever acts in this virtual state.
    pub fn mover(&self) -> usize {
        if self.pending.is_none() {
            self.root_player
        } else {
            1 - self.root_player
        }
    }

    pub fn base(&self) -> &S {
        &self.base
    }
}

impl<S: SimultaneousState> SearchState for VirtualTurns<S> {
    type Action = S::Action;

    fn legal_actions(&self) -> Vec<S::Action> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.base.legal_actions_for(self.mover())
    }

    fn apply_action(&self, action: S::Action) -> Self {
        match self.pending {
            None => VirtualTurns {
                base: self.base.clone(),
                root_player: self.root_player,
                pending: Some(action),
            },
            Some(first) => {
                let (a0, a1) = if self.root_player == 0 {
                    (first, action)
                } else {
                    (action, first)
                };
                VirtualTurns {
                    base: self.base.apply_actions(a0, a1),
                    root_player: self.root_player,
                    pending: None,
                }
            }
        }
    }

    fn is_terminal(&self) -> bool {
        self.pending.is_none() && self.base.is_terminal()
    }

    fn heuristic_score(&self) -> i64 {
        if self.mover() == 0 {
            self.base.heuristic_score()
        } else {
            -self.base.heuristic_score()
        }
    }
}

impl<S: SimultaneousState> AlternatingState for VirtualTurns<S> {
    fn outcome(&self) -> Outcome {
        if !self.is_terminal() {
            return Outcome::Ongoing;
        }
        if self.mover() == 0 {
            self.base.outcome()
        } else {
            self.base.outcome().reversed()
        }
    }

    fn score_rate(&self) -> f64 {
        if self.mover() == 0 {
            self.base.score_rate()
        } else {
            flip_value(self.base.score_rate())
        }
    }
}

/// Alternating MCTS over [`VirtualTurns`] rooted at `player`'s choice.
pub fn virtual_alternating_mcts<S, R>(
    state: &S,
    player: usize,
    settings: MctsSettings,
    simulations: u32,
    rng: &mut R,
) -> Option<S::Action>
where
    S: SimultaneousState,
    R: Rng + ?Sized,
{
    mcts_action(&VirtualTurns::new(state.clone(), player), settings, Budget::Simulations(simulations), rng)
}
