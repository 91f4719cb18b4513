//! Monte Carlo Tree Search for alternating-turn games.
//!
//! Nodes live in a flat arena and refer to each other through [`NodeId`].
//! Every node stores its statistics from the point of view of the player to
//! move at that node, so a parent reads a child's win rate as `1 - w / n`.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use super::playout::playout;
use super::Budget;
use crate::game::{flip_value, AlternatingState};
use crate::profiler;
use crate::timing::TimeKeeper;

/// Index of a node in the tree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// How a leaf is valued on its first visits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LeafEvaluation {
    /// Random playout; children appear once the node has been visited
    /// `expand_threshold` times.
    Playout { expand_threshold: u32 },
    /// The state's own score rate; children appear on the first visit.
    Heuristic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MctsSettings {
    pub exploration_constant: f64,
    pub leaf: LeafEvaluation,
}

impl MctsSettings {
    pub fn playout(exploration_constant: f64, expand_threshold: u32) -> Self {
        MctsSettings {
            exploration_constant,
            leaf: LeafEvaluation::Playout { expand_threshold },
        }
    }

    pub fn heuristic(exploration_constant: f64) -> Self {
        MctsSettings {
            exploration_constant,
            leaf: LeafEvaluation::Heuristic,
        }
    }
}

/// Read-only view of one node's statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeStats {
    pub w: f64,
    pub n: f64,
}

struct Node<S: AlternatingState> {
    state: S,
    w: f64,
    n: f64,
    children: Vec<(S::Action, NodeId)>,
}

impl<S: AlternatingState> Node<S> {
    fn new(state: S) -> Self {
        Node {
            state,
            w: 0.0,
            n: 0.0,
            children: Vec::new(),
        }
    }
}

/// Arena-backed search tree, rebuilt for every decision.
pub struct MctsTree<S: AlternatingState> {
    nodes: Vec<Node<S>>,
    settings: MctsSettings,
}

/// UCB1 from the parent's side: `(1 - w/n) + c * sqrt(2 ln t / n)`.
#[inline]
pub fn ucb1(child: NodeStats, total_visits: f64, exploration_constant: f64) -> f64 {
    flip_value(child.w / child.n) + exploration_constant * (2.0 * total_visits.ln() / child.n).sqrt()
}

impl<S: AlternatingState> MctsTree<S> {
    /// Creates a tree whose root is already expanded.
    pub fn new(root_state: S, settings: MctsSettings) -> Self {
        let mut tree = MctsTree {
            nodes: Vec::new(),
            settings,
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

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[id.index()].children.iter().map(|&(_, child)| child)
    }

    /// Visit count of every root action, in legal-action order.
    pub fn root_visits(&self) -> Vec<(S::Action, f64)> {
        self.nodes[0]
            .children
            .iter()
            .map(|&(action, child)| (action, self.nodes[child.index()].n))
            .collect()
    }

    /// Most visited root action; the first one wins ties.
    pub fn best_action(&self) -> Option<S::Action> {
        most_visited(&self.root_visits())
    }

    fn allocate(&mut self, state: S) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(state));
        id
    }

    fn expand(&mut self, id: NodeId) {
        profiler::record_expansion();
        let parent = &self.nodes[id.index()].state;
        let successors: Vec<(S::Action, S)> = parent
            .legal_actions()
            .into_iter()
            .map(|action| (action, parent.apply_action(action)))
            .collect();

        let mut children = Vec::with_capacity(successors.len());
        for (action, state) in successors {
            children.push((action, self.allocate(state)));
        }
        self.nodes[id.index()].children = children;
    }

    fn record(&mut self, id: NodeId, value: f64) {
        let node = &mut self.nodes[id.index()];
        node.w += value;
        node.n += 1.0;
    }

    /// Unvisited children first, then the highest UCB1 score.
    fn select_child(&self, id: NodeId) -> NodeId {
        let children = &self.nodes[id.index()].children;
        if let Some(&(_, unvisited)) = children
            .iter()
            .find(|&&(_, child)| self.nodes[child.index()].n == 0.0)
        {
            return unvisited;
        }

        let total: f64 = children.iter().map(|&(_, c)| self.nodes[c.index()].n).sum();
        let mut best = children[0].1;
        let mut best_score = f64::NEG_INFINITY;
        for &(_, child) in children {
            let score = ucb1(self.stats(child), total, self.settings.exploration_constant);
            if score > best_score {
                best_score = score;
                best = child;
            }
        }
        best
    }

    /// One selection/expansion/evaluation/backpropagation pass.
    /// Returns the value for the player to move at `id`.
    fn evaluate<R: Rng + ?Sized>(&mut self, id: NodeId, rng: &mut R) -> f64 {
        let node = &self.nodes[id.index()];

        if node.state.is_terminal() {
            let value = node.state.outcome().value();
            self.record(id, value);
            return value;
        }

        if node.children.is_empty() {
            let value = match self.settings.leaf {
                LeafEvaluation::Playout { .. } => playout(&node.state, rng),
                LeafEvaluation::Heuristic => node.state.score_rate(),
            };
            self.record(id, value);

            let ready = match self.settings.leaf {
                LeafEvaluation::Playout { expand_threshold } => {
                    self.nodes[id.index()].n >= expand_threshold as f64
                }
                LeafEvaluation::Heuristic => true,
            };
            if ready {
                self.expand(id);
            }
            return value;
        }

        let child = self.select_child(id);
        let value = flip_value(self.evaluate(child, rng));
        self.record(id, value);
        value
    }

    /// Runs one simulation from the root.
    pub fn simulate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64 {
        profiler::record_simulation();
        self.evaluate(self.root(), rng)
    }

    /// Simulates until the budget is spent. Returns the simulation count.
    pub fn run<R: Rng + ?Sized>(&mut self, budget: Budget, rng: &mut R) -> u32 {
        match budget {
            Budget::Simulations(count) => {
                for _ in 0..count {
                    self.simulate(rng);
                }
                count
            }
            Budget::TimeMs(ms) => {
                let keeper = TimeKeeper::new(ms.max(1));
                let mut done = 0;
                while !keeper.is_time_over() {
                    self.simulate(rng);
                    done += 1;
                }
                done
            }
        }
    }
}

pub(crate) fn most_visited<A: Copy>(visits: &[(A, f64)]) -> Option<A> {
    let mut best: Option<(A, f64)> = None;
    for &(action, n) in visits {
        if best.map_or(true, |(_, m)| n > m) {
            best = Some((action, n));
        }
    }
    best.map(|(action, _)| action)
}

/// Builds a fresh tree, spends the budget, returns the most visited action.
pub fn mcts_action<S, R>(state: &S, settings: MctsSettings, budget: Budget, rng: &mut R) -> Option<S::Action>
where
    S: AlternatingState,
    R: Rng + ?Sized,
{
    if state.is_terminal() {
        return None;
    }
    let mut tree = MctsTree::new(state.clone(), settings);
    let simulations = tree.run(budget, rng);
    let action = tree.best_action();
    debug!(
        "MCTS ran {} simulations over {} nodes, action {:?}",
        simulations,
        tree.len(),
        action
    );
    action
}

/// Root parallelization: independent trees per worker, visit counts summed
/// after every worker has joined.
///
/// A simulation budget is split across the workers; a time budget applies
/// to each worker in full.
pub fn parallel_mcts_action<S>(
    state: &S,
    settings: MctsSettings,
    budget: Budget,
    workers: usize,
    seed: u64,
) -> Option<S::Action>
where
    S: AlternatingState,
{
    if state.is_terminal() {
        return None;
    }
    let actions = state.legal_actions();
    if actions.is_empty() {
        return None;
    }
    let workers = workers.max(1);
    let worker_budget = match budget {
        Budget::Simulations(count) => Budget::Simulations((count / workers as u32).max(1)),
        time => time,
    };

    let totals = (0..workers)
        .into_par_iter()
        .map(|worker| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(worker as u64));
            let mut tree = MctsTree::new(state.clone(), settings);
            tree.run(worker_budget, &mut rng);
            let visits: Vec<f64> = tree.root_visits().into_iter().map(|(_, n)| n).collect();
            profiler::merge_thread_local();
            visits
        })
        .reduce(
            || vec![0.0; actions.len()],
            |a, b| a.iter().zip(b.iter()).map(|(x, y)| x + y).collect(),
        );

    let visits: Vec<(S::Action, f64)> = actions.into_iter().zip(totals).collect();
    let action = most_visited(&visits);
    debug!("Root-parallel MCTS with {} workers, action {:?}", workers, action);
    action
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::SearchState;
    use crate::games::connect_four::ConnectFourState;
    use crate::games::twomaze::TwoMazeState;
    use crate::types::Direction;

    fn assert_invariants<S: AlternatingState>(tree: &MctsTree<S>) {
        for index in 0..tree.len() {
            let id = NodeId(index as u32);
            let stats = tree.stats(id);
            assert!(stats.w >= 0.0 && stats.w <= stats.n, "node {} has w={} n={}", index, stats.w, stats.n);
            let child_visits: f64 = tree.children(id).map(|c| tree.stats(c).n).sum();
            assert!(child_visits <= stats.n, "node {} children {} > {}", index, child_visits, stats.n);
        }
    }

    #[test]
    fn test_statistics_stay_consistent() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut tree = MctsTree::new(TwoMazeState::new(3), MctsSettings::playout(1.0, 10));
        for _ in 0..50 {
            tree.run(Budget::Simulations(20), &mut rng);
            assert_invariants(&tree);
        }
        assert_eq!(tree.stats(tree.root()).n, 1000.0);
    }

    #[test]
    fn test_heuristic_leaves_expand_eagerly() {
        let mut rng = StdRng::seed_from_u64(0);
        let state = TwoMazeState::new(6);
        let root_children = state.legal_actions().len();
        let mut tree = MctsTree::new(state, MctsSettings::heuristic(1.0));
        tree.simulate(&mut rng);
        // One child visited and expanded on its first visit
        assert!(tree.len() > 1 + root_children);
        assert_invariants(&tree);
    }

    #[test]
    fn test_every_root_action_is_tried() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut tree = MctsTree::new(ConnectFourState::new(), MctsSettings::playout(1.0, 10));
        tree.run(Budget::Simulations(7), &mut rng);
        assert!(tree.root_visits().iter().all(|&(_, n)| n == 1.0));
    }

    #[test]
    fn test_finds_immediate_win() {
        let mut rng = StdRng::seed_from_u64(11);
        let state = ConnectFourState::from_moves(&[0, 0, 1, 1, 2, 2]);
        let action = mcts_action(&state, MctsSettings::playout(1.0, 10), Budget::Simulations(1000), &mut rng);
        assert_eq!(action, Some(3));
    }

    #[test]
    fn test_heuristic_leaves_find_immediate_win() {
        let mut rng = StdRng::seed_from_u64(11);
        let state = ConnectFourState::from_moves(&[0, 0, 1, 1, 2, 2]);
        let action = mcts_action(&state, MctsSettings::heuristic(1.0), Budget::Simulations(1000), &mut rng);
        assert_eq!(action, Some(3));
    }

    #[test]
    fn test_heuristic_leaves_score_the_mover() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut state = TwoMazeState::new(12);
        state.points = [[0; 8]; 8];
        state.points[4][2] = 9;
        let action = mcts_action(&state, MctsSettings::heuristic(1.0), Budget::Simulations(300), &mut rng);
        assert_eq!(action, Some(Direction::Left));
    }

    #[test]
    fn test_terminal_root_returns_none() {
        let mut rng = StdRng::seed_from_u64(1);
        let state = ConnectFourState::from_moves(&[0, 1, 0, 1, 0, 1, 0]);
        assert_eq!(mcts_action(&state, MctsSettings::heuristic(1.0), Budget::Simulations(10), &mut rng), None);
    }

    #[test]
    fn test_parallel_workers_agree_on_forced_win() {
        let state = ConnectFourState::from_moves(&[0, 0, 1, 1, 2, 2]);
        let action = parallel_mcts_action(&state, MctsSettings::playout(1.0, 10), Budget::Simulations(2000), 4, 5);
        assert_eq!(action, Some(3));
    }
}
