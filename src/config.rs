// Configuration module for reading Search.toml
// All tunable search parameters live here; the file mirrors `default_hardcoded`

use log::warn;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::SearchError;

pub const DEFAULT_CONFIG_PATH: &str = "Search.toml";

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub search: SearchParams,
    pub mcts: MctsConfig,
    pub deepening: DeepeningConfig,
    pub arena: ArenaConfig,
    pub debug: DebugConfig,
}

/// Per-decision parameters handed to whichever engine is selected
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SearchParams {
    pub search_width: usize,
    pub search_depth: u32,
    /// Passes for chokudai search
    pub search_number: usize,
    /// Zero or less disables the clock
    pub time_threshold_ms: i64,
    pub simulation_count: u32,
    /// Which side a simultaneous-move engine plays (0 or 1)
    pub player_id: usize,
    // Reserved for annealing-style placement optimizers
    pub start_temperature: f64,
    pub end_temperature: f64,
}

impl SearchParams {
    /// Rejects malformed parameters before any search work begins.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.search_width == 0 {
            return Err(SearchError::invalid("search_width", "must be at least 1"));
        }
        if self.search_depth == 0 {
            return Err(SearchError::invalid("search_depth", "must be at least 1"));
        }
        if self.search_number == 0 {
            return Err(SearchError::invalid("search_number", "must be at least 1"));
        }
        if self.simulation_count == 0 {
            return Err(SearchError::invalid("simulation_count", "must be at least 1"));
        }
        if self.player_id > 1 {
            return Err(SearchError::invalid(
                "player_id",
                format!("must be 0 or 1, got {}", self.player_id),
            ));
        }
        if !(self.end_temperature > 0.0 && self.start_temperature >= self.end_temperature) {
            return Err(SearchError::invalid(
                "start_temperature",
                format!(
                    "expected start >= end > 0, got start {} end {}",
                    self.start_temperature, self.end_temperature
                ),
            ));
        }
        Ok(())
    }
}

/// Tree search constants
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MctsConfig {
    pub exploration_constant: f64,
    /// Visits before an alternating-turn leaf expands
    pub expand_threshold: u32,
    /// Visits before a simultaneous-move leaf expands
    pub duct_expand_threshold: u32,
    /// Root-parallel workers for alternating MCTS; 1 runs sequentially
    pub parallel_workers: usize,
}

impl MctsConfig {
    pub fn validate(&self) -> Result<(), SearchError> {
        if !(self.exploration_constant >= 0.0) {
            return Err(SearchError::invalid("exploration_constant", "must be non-negative"));
        }
        if self.expand_threshold == 0 || self.duct_expand_threshold == 0 {
            return Err(SearchError::invalid("expand_threshold", "must be at least 1"));
        }
        if self.parallel_workers == 0 {
            return Err(SearchError::invalid("parallel_workers", "must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DeepeningConfig {
    /// Upper bound for the iterative deepening loop
    pub max_depth: u32,
}

/// Match settings used by the arena binary
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ArenaConfig {
    pub game: String,
    pub first: String,
    pub second: String,
    pub games: u32,
    pub seed: u64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SearchError> {
        let display = path.as_ref().display().to_string();
        let contents = fs::read_to_string(path.as_ref()).map_err(|source| SearchError::ConfigRead {
            path: display.clone(),
            source,
        })?;

        let config: Config = toml::from_str(&contents).map_err(|source| SearchError::ConfigParse {
            path: display,
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        self.search.validate()?;
        self.mcts.validate()
    }

    /// Loads configuration from the default location (Search.toml)
    pub fn load_default() -> Result<Self, SearchError> {
        Self::from_file(DEFAULT_CONFIG_PATH)
    }

    /// Returns hardcoded default configuration as fallback
    pub fn default_hardcoded() -> Self {
        Config {
            search: SearchParams {
                search_width: 3,
                search_depth: 7,
                search_number: 4,
                time_threshold_ms: 10,
                simulation_count: 1000,
                player_id: 0,
                start_temperature: 500.0,
                end_temperature: 10.0,
            },
            mcts: MctsConfig {
                exploration_constant: 1.0,
                expand_threshold: 10,
                duct_expand_threshold: 5,
                parallel_workers: 1,
            },
            deepening: DeepeningConfig { max_depth: 42 },
            arena: ArenaConfig {
                game: "twomaze".to_string(),
                first: "alphabeta".to_string(),
                second: "mcts".to_string(),
                games: 1,
                seed: 0,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "search_decisions.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        match Self::load_default() {
            Ok(config) => config,
            Err(e) => {
                warn!("{}", e);
                warn!("Using hardcoded default configuration");
                Self::default_hardcoded()
            }
        }
    }
}
