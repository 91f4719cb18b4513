//! Decoupled UCT for simultaneous-move games.
//!
//! Each expanded node owns a `rows x cols` matrix of children, one row per
//! action of player 0 and one column per action of player 1. All statistics
//! are kept for player 0; player 1 reads them as `n - w`.

use log::debug;
use rand::Rng;

use super::mcts::{most_visited, NodeId, NodeStats};
use super::playout::simultaneous_playout;
use crate::game::SimultaneousState;
use crate::profiler;

struct DuctNode<S: SimultaneousState> {
    state: S,
    w: f64,
    n: f64,
    actions: [Vec<S::Action>; 2],
    /// Row-major: cell (i, j) is at `i * actions[1].len() + j`.
    children: Vec<NodeId>,
}

pub struct DuctTree<S: SimultaneousState> {
    nodes: Vec<DuctNode<S>>,
    exploration_constant: f64,
    expand_threshold: u32,
}

impl<S: SimultaneousState> DuctTree<S> {
    /// Creates a tree whose root matrix is already expanded.
    pub fn new(root_state: S, exploration_constant: f64, expand_threshold: u32) -> Self {
        let mut tree = DuctTree {
            nodes: Vec::new(),
            exploration_constant,
            expand_threshold,
        };
        let root = tree.allocate(root_state);
        tree.expand(root);
        tree
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn stats(&self, id: NodeId) -> NodeStats {
        let node = &self.nodes[id.index()];
        NodeStats { w: node.w, n: node.n }
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        !self.nodes[id.index()].children.is_empty()
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[id.index()].children.iter().copied()
    }

    /// Summed statistics per action of `player`: rows for player 0, columns
    /// for player 1. `w` is always player 0's win total.
    pub fn marginals(&self, id: NodeId, player: usize) -> Vec<NodeStats> {
        let node = &self.nodes[id.index()];
        let cols = node.actions[1].len();
        let mut sums = vec![NodeStats { w: 0.0, n: 0.0 }; node.actions[player].len()];
        for (k, child) in node.children.iter().enumerate() {
            let slot = if player == 0 { k / cols } else { k % cols };
            let stats = self.stats(*child);
            sums[slot].w += stats.w;
            sums[slot].n += stats.n;
        }
        sums
    }

    /// Root action of `player` with the highest marginal visit count.
    pub fn best_action(&self, player: usize) -> Option<S::Action> {
        let root = &self.nodes[0];
        let visits: Vec<(S::Action, f64)> = root.actions[player]
            .iter()
            .copied()
            .zip(self.marginals(self.root(), player).into_iter().map(|s| s.n))
            .collect();
        most_visited(&visits)
    }

    fn allocate(&mut self, state: S) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(DuctNode {
            state,
            w: 0.0,
            n: 0.0,
            actions: [Vec::new(), Vec::new()],
            children: Vec::new(),
        });
        id
    }

    fn expand(&mut self, id: NodeId) {
        profiler::record_expansion();
        let state = &self.nodes[id.index()].state;
        let first = state.legal_actions_for(0);
        let second = state.legal_actions_for(1);
        let successors: Vec<S> = first
            .iter()
            .flat_map(|&a0| second.iter().map(move |&a1| state.apply_actions(a0, a1)))
            .collect();

        let children = successors.into_iter().map(|s| self.allocate(s)).collect();
        let node = &mut self.nodes[id.index()];
        node.actions = [first, second];
        node.children = children;
    }

    fn record(&mut self, id: NodeId, value: f64) {
        let node = &mut self.nodes[id.index()];
        node.w += value;
        node.n += 1.0;
    }

    fn best_marginal(&self, marginals: &[NodeStats], total: f64, player: usize) -> usize {
        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (index, stats) in marginals.iter().enumerate() {
            let wins = if player == 0 { stats.w } else { stats.n - stats.w };
            let score = wins / stats.n + self.exploration_constant * (2.0 * total.ln() / stats.n).sqrt();
            if score > best_score {
                best_score = score;
                best = index;
            }
        }
        best
    }

    /// Unvisited cells first, then each player's best marginal independently.
    fn select_child(&self, id: NodeId) -> NodeId {
        let node = &self.nodes[id.index()];
        if let Some(&unvisited) = node
            .children
            .iter()
            .find(|&&child| self.nodes[child.index()].n == 0.0)
        {
            return unvisited;
        }

        let total: f64 = node.children.iter().map(|&c| self.nodes[c.index()].n).sum();
        let row = self.best_marginal(&self.marginals(id, 0), total, 0);
        let col = self.best_marginal(&self.marginals(id, 1), total, 1);
        node.children[row * node.actions[1].len() + col]
    }

    /// Returns the value for player 0. No perspective flip between levels.
    fn evaluate<R: Rng + ?Sized>(&mut self, id: NodeId, rng: &mut R) -> f64 {
        let node = &self.nodes[id.index()];

        if node.state.is_terminal() {
            let value = node.state.outcome().value();
            self.record(id, value);
            return value;
        }

        if node.children.is_empty() {
            let value = simultaneous_playout(&node.state, rng);
            self.record(id, value);
            if self.nodes[id.index()].n >= self.expand_threshold as f64 {
                self.expand(id);
            }
            return value;
        }

        let child = self.select_child(id);
        let value = self.evaluate(child, rng);
        self.record(id, value);
        value
    }

    pub fn simulate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64 {
        profiler::record_simulation();
        self.evaluate(self.root(), rng)
    }
}

/// Runs `simulations` DUCT simulations and returns `player`'s action.
pub fn duct_action<S, R>(
    state: &S,
    player: usize,
    simulations: u32,
    exploration_constant: f64,
    expand_threshold: u32,
    rng: &mut R,
) -> Option<S::Action>
where
    S: SimultaneousState,
    R: Rng + ?Sized,
{
    if state.is_terminal() || state.legal_actions_for(player).is_empty() {
        return None;
    }
    let mut tree = DuctTree::new(state.clone(), exploration_constant, expand_threshold);
    if !tree.is_expanded(tree.root()) {
        // Opponent has no move; any own action is as good as another
        return state.legal_actions_for(player).first().copied();
    }
    for _ in 0..simulations {
        tree.simulate(rng);
    }
    let action = tree.best_action(player);
    debug!(
        "DUCT ran {} simulations over {} nodes, player {} action {:?}",
        simulations,
        tree.len(),
        player,
        action
    );
    action
}
