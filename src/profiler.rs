//! Lightweight search counters using thread-local storage
//!
//! Counting is free when disabled. Enable with environment variable:
//! GRID_SEARCH_PROFILE=1

use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

thread_local! {
    static DETERMINISTIC_TIME: Cell<u64> = const { Cell::new(0) };
    static DETERMINISTIC_CALLS: Cell<u64> = const { Cell::new(0) };
    static TREE_TIME: Cell<u64> = const { Cell::new(0) };
    static TREE_CALLS: Cell<u64> = const { Cell::new(0) };

    static NODES: Cell<u64> = const { Cell::new(0) };
    static CUTOFFS: Cell<u64> = const { Cell::new(0) };
    static SIMULATIONS: Cell<u64> = const { Cell::new(0) };
    static EXPANSIONS: Cell<u64> = const { Cell::new(0) };
    static PLAYOUTS: Cell<u64> = const { Cell::new(0) };
}

// Global aggregators
static GLOBAL_DETERMINISTIC_TIME: AtomicU64 = AtomicU64::new(0);
static GLOBAL_DETERMINISTIC_CALLS: AtomicU64 = AtomicU64::new(0);
static GLOBAL_TREE_TIME: AtomicU64 = AtomicU64::new(0);
static GLOBAL_TREE_CALLS: AtomicU64 = AtomicU64::new(0);
static GLOBAL_NODES: AtomicU64 = AtomicU64::new(0);
static GLOBAL_CUTOFFS: AtomicU64 = AtomicU64::new(0);
static GLOBAL_SIMULATIONS: AtomicU64 = AtomicU64::new(0);
static GLOBAL_EXPANSIONS: AtomicU64 = AtomicU64::new(0);
static GLOBAL_PLAYOUTS: AtomicU64 = AtomicU64::new(0);

static ENABLED: OnceLock<bool> = OnceLock::new();

#[inline]
pub fn is_profiling_enabled() -> bool {
    *ENABLED.get_or_init(|| std::env::var("GRID_SEARCH_PROFILE").is_ok())
}

#[inline]
fn bump(counter: &'static std::thread::LocalKey<Cell<u64>>, by: u64) {
    if is_profiling_enabled() {
        counter.with(|c| c.set(c.get() + by));
    }
}

/// Times one decision of a search family while alive.
pub struct ProfileGuard {
    start: Instant,
    category: &'static str,
}

impl ProfileGuard {
    pub fn new(category: &'static str) -> Option<Self> {
        if is_profiling_enabled() {
            Some(ProfileGuard {
                start: Instant::now(),
                category,
            })
        } else {
            None
        }
    }
}

impl Drop for ProfileGuard {
    fn drop(&mut self) {
        let elapsed_ns = self.start.elapsed().as_nanos() as u64;
        let (time, calls) = match self.category {
            "deterministic" => (&DETERMINISTIC_TIME, &DETERMINISTIC_CALLS),
            "tree" => (&TREE_TIME, &TREE_CALLS),
            _ => return,
        };
        time.with(|t| t.set(t.get() + elapsed_ns));
        calls.with(|c| c.set(c.get() + 1));
    }
}

#[inline]
pub fn record_node() {
    bump(&NODES, 1);
}

#[inline]
pub fn record_cutoff() {
    bump(&CUTOFFS, 1);
}

#[inline]
pub fn record_simulation() {
    bump(&SIMULATIONS, 1);
}

#[inline]
pub fn record_expansion() {
    bump(&EXPANSIONS, 1);
}

#[inline]
pub fn record_playout() {
    bump(&PLAYOUTS, 1);
}

/// Moves this thread's counters into the global totals.
pub fn merge_thread_local() {
    if !is_profiling_enabled() {
        return;
    }
    let pairs: [(&'static std::thread::LocalKey<Cell<u64>>, &AtomicU64); 9] = [
        (&DETERMINISTIC_TIME, &GLOBAL_DETERMINISTIC_TIME),
        (&DETERMINISTIC_CALLS, &GLOBAL_DETERMINISTIC_CALLS),
        (&TREE_TIME, &GLOBAL_TREE_TIME),
        (&TREE_CALLS, &GLOBAL_TREE_CALLS),
        (&NODES, &GLOBAL_NODES),
        (&CUTOFFS, &GLOBAL_CUTOFFS),
        (&SIMULATIONS, &GLOBAL_SIMULATIONS),
        (&EXPANSIONS, &GLOBAL_EXPANSIONS),
        (&PLAYOUTS, &GLOBAL_PLAYOUTS),
    ];
    for (local, global) in pairs {
        local.with(|c| {
            global.fetch_add(c.get(), Ordering::Relaxed);
            c.set(0);
        });
    }
}

/// Global totals collected so far.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProfileSnapshot {
    pub deterministic_ns: u64,
    pub deterministic_calls: u64,
    pub tree_ns: u64,
    pub tree_calls: u64,
    pub nodes: u64,
    pub cutoffs: u64,
    pub simulations: u64,
    pub expansions: u64,
    pub playouts: u64,
}

pub fn snapshot() -> ProfileSnapshot {
    ProfileSnapshot {
        deterministic_ns: GLOBAL_DETERMINISTIC_TIME.load(Ordering::Relaxed),
        deterministic_calls: GLOBAL_DETERMINISTIC_CALLS.load(Ordering::Relaxed),
        tree_ns: GLOBAL_TREE_TIME.load(Ordering::Relaxed),
        tree_calls: GLOBAL_TREE_CALLS.load(Ordering::Relaxed),
        nodes: GLOBAL_NODES.load(Ordering::Relaxed),
        cutoffs: GLOBAL_CUTOFFS.load(Ordering::Relaxed),
        simulations: GLOBAL_SIMULATIONS.load(Ordering::Relaxed),
        expansions: GLOBAL_EXPANSIONS.load(Ordering::Relaxed),
        playouts: GLOBAL_PLAYOUTS.load(Ordering::Relaxed),
    }
}

pub fn print_report(total_time_ms: u64) {
    if !is_profiling_enabled() {
        return;
    }
    let s = snapshot();
    let total_ns = total_time_ms * 1_000_000;
    let pct = |ns: u64| {
        if total_ns > 0 {
            100.0 * ns as f64 / total_ns as f64
        } else {
            0.0
        }
    };
    let cutoff_rate = if s.nodes > 0 {
        100.0 * s.cutoffs as f64 / s.nodes as f64
    } else {
        0.0
    };

    eprintln!("\n═══════════════════════════════════════════════════════════");
    eprintln!("                 SEARCH PROFILE");
    eprintln!("═══════════════════════════════════════════════════════════");
    eprintln!("Total Time: {}ms\n", total_time_ms);

    eprintln!("Deterministic search:");
    eprintln!("  Time:     {:.2}ms ({:.1}%) - {} decisions",
        s.deterministic_ns as f64 / 1_000_000.0, pct(s.deterministic_ns), s.deterministic_calls);
    eprintln!("  Nodes:    {}", s.nodes);
    eprintln!("  Cutoffs:  {} ({:.1}% of nodes)\n", s.cutoffs, cutoff_rate);

    eprintln!("Tree search:");
    eprintln!("  Time:        {:.2}ms ({:.1}%) - {} decisions",
        s.tree_ns as f64 / 1_000_000.0, pct(s.tree_ns), s.tree_calls);
    eprintln!("  Simulations: {}", s.simulations);
    eprintln!("  Expansions:  {}", s.expansions);
    eprintln!("  Playouts:    {}", s.playouts);
    eprintln!("═══════════════════════════════════════════════════════════\n");
}

#[macro_export]
macro_rules! profile {
    ($category:expr, $code:block) => {{
        let _guard = $crate::profiler::ProfileGuard::new($category);
        $code
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_only_exists_when_enabled() {
        assert_eq!(ProfileGuard::new("tree").is_some(), is_profiling_enabled());
    }

    #[test]
    fn test_report_without_data_does_not_panic() {
        merge_thread_local();
        print_report(0);
    }
}
