// Replay module for rerunning logged decisions
//
// This module provides functionality to:
// 1. Parse JSONL decision logs
// 2. Rebuild the logged player with its seed and rerun the search
// 3. Compare logged vs replayed actions
// 4. Print a summary report

use log::{info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::config::Config;
use crate::debug_logger::DecisionRecord;
use crate::error::SearchError;
use crate::orchestrator::{AlgorithmId, Playable, Player};

/// Result of replaying a single decision
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayResult<A> {
    pub turn: u32,
    pub algorithm: String,
    pub original_action: Option<A>,
    pub replayed_action: Option<A>,
    pub matches: bool,
    pub original_time_ms: u64,
    pub computation_time_ms: u64,
}

/// Statistics for a complete replay session
#[derive(Debug, Default, PartialEq)]
pub struct ReplayStats {
    pub total_turns: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
}

/// Replay engine for decision logs
pub struct ReplayEngine {
    config: Config,
    verbose: bool,
}

impl ReplayEngine {
    /// Search parameters come from `config`; algorithm, side and seed come
    /// from each record.
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine { config, verbose }
    }

    /// Loads all records from a JSONL file
    pub fn load_log_file<S: Playable, P: AsRef<Path>>(
        &self,
        log_path: P,
    ) -> Result<Vec<DecisionRecord<S, S::Move>>, SearchError> {
        let display = log_path.as_ref().display().to_string();
        let file = File::open(log_path.as_ref()).map_err(|source| SearchError::Io {
            operation: format!("open log file '{}'", display),
            source,
        })?;

        let mut entries = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|source| SearchError::Io {
                operation: format!("read line {} of '{}'", line_num + 1, display),
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            entries.push(serde_json::from_str(&line)?);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Reruns the logged algorithm on the logged state with the logged seed
    pub fn replay_entry<S: Playable>(
        &self,
        entry: &DecisionRecord<S, S::Move>,
    ) -> Result<ReplayResult<S::Move>, SearchError> {
        if self.verbose {
            info!("Replaying turn {}...", entry.turn);
        }

        let algorithm: AlgorithmId = entry.algorithm.parse()?;
        let mut player = Player::from_algorithm(algorithm, &self.config)?
            .with_player_id(entry.player_id)?
            .with_seed(entry.seed);

        let start = Instant::now();
        let replayed_action = S::select(&mut player, &entry.state)?;
        let computation_time_ms = start.elapsed().as_millis() as u64;

        let matches = replayed_action == entry.chosen_action;
        let result = ReplayResult {
            turn: entry.turn,
            algorithm: entry.algorithm.clone(),
            original_action: entry.chosen_action,
            replayed_action,
            matches,
            original_time_ms: entry.elapsed_ms,
            computation_time_ms,
        };

        if self.verbose {
            if matches {
                info!(
                    "Turn {}: ✓ MATCH - {:?} ({}, time: {}ms)",
                    entry.turn, replayed_action, entry.algorithm, computation_time_ms
                );
            } else {
                warn!(
                    "Turn {}: ✗ MISMATCH - Original: {:?}, Replayed: {:?} ({}, time: {}ms)",
                    entry.turn, entry.chosen_action, replayed_action, entry.algorithm, computation_time_ms
                );
            }
        }

        Ok(result)
    }

    /// Replays every entry; entries that fail are reported and skipped
    pub fn replay_all<S: Playable>(&self, entries: &[DecisionRecord<S, S::Move>]) -> Vec<ReplayResult<S::Move>> {
        entries
            .iter()
            .filter_map(|entry| match self.replay_entry(entry) {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!("Failed to replay turn {}: {}", entry.turn, e);
                    None
                }
            })
            .collect()
    }

    /// Replays the entries logged for the given turns
    pub fn replay_turns<S: Playable>(
        &self,
        entries: &[DecisionRecord<S, S::Move>],
        turn_numbers: &[u32],
    ) -> Result<Vec<ReplayResult<S::Move>>, SearchError> {
        let mut results = Vec::new();

        for turn_num in turn_numbers {
            let matching: Vec<_> = entries.iter().filter(|e| e.turn == *turn_num).collect();
            if matching.is_empty() {
                return Err(SearchError::invalid("turns", format!("turn {} not found in log file", turn_num)));
            }
            for entry in matching {
                match self.replay_entry(entry) {
                    Ok(result) => results.push(result),
                    Err(e) => warn!("Failed to replay turn {}: {}", turn_num, e),
                }
            }
        }

        Ok(results)
    }

    pub fn generate_stats<A>(&self, results: &[ReplayResult<A>]) -> ReplayStats {
        let total_turns = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let match_rate = if total_turns > 0 {
            (matches as f64 / total_turns as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_turns,
            matches,
            mismatches: total_turns - matches,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report<A: std::fmt::Debug>(&self, results: &[ReplayResult<A>]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Turns:    {}", stats.total_turns);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("═══════════════════════════════════════════════════════════\n");

        if !results.is_empty() {
            let count = results.len() as f64;
            let avg_original = results.iter().map(|r| r.original_time_ms as f64).sum::<f64>() / count;
            let avg_replayed = results.iter().map(|r| r.computation_time_ms as f64).sum::<f64>() / count;
            println!("Average Logged Time:        {:.1}ms", avg_original);
            println!("Average Replay Time:        {:.1}ms\n", avg_replayed);
        }

        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches).collect();
        if !mismatches.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");
            for result in mismatches {
                println!(
                    "Turn {}: {:?} → {:?} ({}, time: {}ms)",
                    result.turn,
                    result.original_action,
                    result.replayed_action,
                    result.algorithm,
                    result.computation_time_ms
                );
            }
            println!();
        }
    }
}
