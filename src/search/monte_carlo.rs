// Primitive Monte Carlo: flat playouts per root action, no tree

use rand::Rng;

use super::playout::playout;
use crate::game::{flip_value, AlternatingState};

/// Spreads `playout_number` playouts round-robin over the root actions and
/// returns the action with the best mean value.
pub fn primitive_monte_carlo<S, R>(state: &S, playout_number: u32, rng: &mut R) -> Option<S::Action>
where
    S: AlternatingState,
    R: Rng + ?Sized,
{
    let actions = state.legal_actions();
    if actions.is_empty() {
        return None;
    }
    let children: Vec<S> = actions.iter().map(|&a| state.apply_action(a)).collect();
    let mut totals = vec![0.0; actions.len()];
    let mut counts = vec![0u32; actions.len()];

    for i in 0..playout_number as usize {
        let index = i % actions.len();
        totals[index] += flip_value(playout(&children[index], rng));
        counts[index] += 1;
    }

    let mut best: Option<(usize, f64)> = None;
    for (index, (&total, &count)) in totals.iter().zip(counts.iter()).enumerate() {
        let mean = if count == 0 { 0.0 } else { total / count as f64 };
        if best.map_or(true, |(_, m)| mean > m) {
            best = Some((index, mean));
        }
    }
    best.map(|(index, _)| actions[index])
}
