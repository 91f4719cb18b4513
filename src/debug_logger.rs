// Decision logging for offline replay
//
// Each decision is written as one JSON line holding the state searched, the
// algorithm and seed used, and the action chosen. The replay tool reads these
// files back and reruns the same search.

use log::{error, info};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::Arc;

/// One logged decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord<S, A> {
    pub turn: u32,
    /// Algorithm name within the game's family
    pub algorithm: String,
    pub player_id: usize,
    pub seed: u64,
    pub state: S,
    pub chosen_action: Option<A>,
    pub elapsed_ms: u64,
    pub timestamp: String,
}

impl<S, A> DecisionRecord<S, A> {
    /// Builds a record stamped with the current UTC time.
    pub fn new(
        turn: u32,
        algorithm: &str,
        player_id: usize,
        seed: u64,
        state: S,
        chosen_action: Option<A>,
        elapsed_ms: u64,
    ) -> Self {
        DecisionRecord {
            turn,
            algorithm: algorithm.to_string(),
            player_id,
            seed,
            state,
            chosen_action,
            elapsed_ms,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Shared JSONL writer. Cloning shares the same file handle.
#[derive(Clone)]
pub struct DecisionLogger {
    file: Arc<Mutex<Option<File>>>,
}

impl DecisionLogger {
    /// Opens (and truncates) `log_file_path` when `enabled`.
    /// A file that cannot be created leaves the logger disabled.
    pub fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return Self::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
        {
            Ok(file) => {
                info!("Decision logging enabled: {}", log_file_path);
                DecisionLogger {
                    file: Arc::new(Mutex::new(Some(file))),
                }
            }
            Err(e) => {
                error!("Failed to create decision log file '{}': {}", log_file_path, e);
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        DecisionLogger {
            file: Arc::new(Mutex::new(None)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.file.lock().is_some()
    }

    /// Appends one record. Failures are reported through `log` and dropped.
    pub fn log<S: Serialize, A: Serialize>(&self, record: &DecisionRecord<S, A>) {
        let mut guard = self.file.lock();
        let Some(file) = guard.as_mut() else {
            return;
        };

        match serde_json::to_string(record) {
            Ok(line) => {
                if let Err(e) = writeln!(file, "{}", line).and_then(|_| file.flush()) {
                    error!("Failed to write decision log entry: {}", e);
                }
            }
            Err(e) => error!("Failed to serialize decision log entry: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::maze::MazeState;
    use crate::types::Direction;

    #[test]
    fn test_disabled_logger_writes_nothing() {
        let logger = DecisionLogger::disabled();
        assert!(!logger.is_enabled());
        let record = DecisionRecord::new(0, "greedy", 0, 1, MazeState::new(1), Some(Direction::Up), 0);
        logger.log(&record);
    }

    #[test]
    fn test_records_are_written_one_per_line() {
        let path = std::env::temp_dir().join("grid_search_logger_lines.jsonl");
        let path_str = path.to_string_lossy().to_string();
        let logger = DecisionLogger::new(true, &path_str);
        assert!(logger.is_enabled());

        for turn in 0..3 {
            let record = DecisionRecord::new(turn, "greedy", 0, 7, MazeState::new(7), Some(Direction::Left), 1);
            logger.log(&record);
        }

        let contents = std::fs::read_to_string(&path).expect("log file should exist");
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        let parsed: DecisionRecord<MazeState, Direction> =
            serde_json::from_str(lines[2]).expect("line should parse");
        assert_eq!(parsed.turn, 2);
        assert_eq!(parsed.chosen_action, Some(Direction::Left));
        assert_eq!(parsed.state, MazeState::new(7));
        let _ = std::fs::remove_file(path);
    }
}
