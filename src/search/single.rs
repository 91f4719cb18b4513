// Single-agent engines: greedy, beam and chokudai search

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use log::debug;

use crate::game::SearchState;
use crate::timing::TimeKeeper;

/// Best immediate successor by heuristic score.
pub fn greedy_action<S: SearchState>(state: &S) -> Option<S::Action> {
    let mut best: Option<(S::Action, i64)> = None;
    for action in state.legal_actions() {
        let score = state.apply_action(action).heuristic_score();
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((action, score));
        }
    }
    best.map(|(action, _)| action)
}

/// Search frontier entry ordered by score, earlier insertions first on ties.
struct Candidate<S: SearchState> {
    score: i64,
    order: u64,
    state: S,
    first_action: Option<S::Action>,
}

impl<S: SearchState> PartialEq for Candidate<S> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<S: SearchState> Eq for Candidate<S> {}

impl<S: SearchState> PartialOrd for Candidate<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S: SearchState> Ord for Candidate<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.score, Reverse(self.order)).cmp(&(other.score, Reverse(other.order)))
    }
}

/// Pushes every successor of `parent` into `heap`.
fn push_successors<S: SearchState>(
    heap: &mut BinaryHeap<Candidate<S>>,
    parent: &Candidate<S>,
    counter: &mut u64,
) {
    for action in parent.state.legal_actions() {
        let state = parent.state.apply_action(action);
        *counter += 1;
        heap.push(Candidate {
            score: state.heuristic_score(),
            order: *counter,
            first_action: parent.first_action.or(Some(action)),
            state,
        });
    }
}

fn root_candidate<S: SearchState>(state: &S) -> Candidate<S> {
    Candidate {
        score: state.heuristic_score(),
        order: 0,
        state: state.clone(),
        first_action: None,
    }
}

/// Keeps the `width` best states per depth for up to `depth` steps and
/// returns the first action of the best line. Stops early once the best
/// state is terminal or the clock (if any) runs out.
pub fn beam_search_action<S: SearchState>(
    state: &S,
    width: usize,
    depth: usize,
    time_threshold_ms: i64,
) -> Option<S::Action> {
    let fallback = state.legal_actions().first().copied()?;
    let keeper = TimeKeeper::new(time_threshold_ms);
    let mut counter = 0u64;
    let mut beam = BinaryHeap::new();
    beam.push(root_candidate(state));
    let mut best_action = None;

    for step in 0..depth {
        let mut next = BinaryHeap::new();
        for _ in 0..width {
            if keeper.is_time_over() {
                break;
            }
            let Some(candidate) = beam.pop() else {
                break;
            };
            push_successors(&mut next, &candidate, &mut counter);
        }
        if keeper.is_time_over() {
            debug!("Beam search stopped by the clock at depth {}", step);
            break;
        }

        beam = next;
        let Some(top) = beam.peek() else {
            break;
        };
        best_action = top.first_action;
        if top.state.is_terminal() {
            break;
        }
    }

    best_action.or(Some(fallback))
}

/// Chokudai search: `number` passes over per-depth priority queues, each pass
/// advancing up to `width` of the best candidates at every depth.
pub fn chokudai_search_action<S: SearchState>(
    state: &S,
    width: usize,
    depth: usize,
    number: usize,
    time_threshold_ms: i64,
) -> Option<S::Action> {
    let fallback = state.legal_actions().first().copied()?;
    let keeper = TimeKeeper::new(time_threshold_ms);
    let mut counter = 0u64;
    let mut beams: Vec<BinaryHeap<Candidate<S>>> = (0..=depth).map(|_| BinaryHeap::new()).collect();
    beams[0].push(root_candidate(state));

    'passes: for _ in 0..number {
        for t in 0..depth {
            for _ in 0..width {
                if keeper.is_time_over() {
                    break 'passes;
                }
                let done = match beams[t].peek() {
                    None => true,
                    Some(top) => top.state.is_terminal(),
                };
                if done {
                    break;
                }
                if let Some(candidate) = beams[t].pop() {
                    push_successors(&mut beams[t + 1], &candidate, &mut counter);
                }
            }
        }
    }

    beams
        .iter()
        .skip(1)
        .rev()
        .find_map(|beam| beam.peek().and_then(|top| top.first_action))
        .or(Some(fallback))
}
