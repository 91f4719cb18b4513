//! Uniform "select one action" entry point over every engine.
//!
//! A [`Player`] binds one algorithm of one game family to a configuration and
//! a private random source. Unknown names and malformed parameters are
//! rejected when the player is built; asking a player to act on a state of
//! another family is reported as a contract violation.

use std::fmt;
use std::str::FromStr;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::bitboard::ConnectFourBitBoard;
use crate::config::Config;
use crate::error::SearchError;
use crate::game::{AlternatingState, SearchState, SimultaneousState};
use crate::games::connect_four::ConnectFourState;
use crate::games::maze::MazeState;
use crate::games::simmaze::SimMazeState;
use crate::games::twomaze::TwoMazeState;
use crate::profile;
use crate::search::alphabeta::alpha_beta_action;
use crate::search::deepening::iterative_deepening;
use crate::search::duct::duct_action;
use crate::search::mcts::{mcts_action, parallel_mcts_action, MctsSettings};
use crate::search::minimax::minimax_action;
use crate::search::monte_carlo::primitive_monte_carlo;
use crate::search::simultaneous::{
    primitive_monte_carlo_simultaneous, random_simultaneous_action, virtual_alternating_mcts,
};
use crate::search::single::{beam_search_action, chokudai_search_action, greedy_action};
use crate::search::{random_action, Budget};
use crate::types::Direction;

/// Kind of game an algorithm plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameFamily {
    SinglePlayer,
    Alternating,
    Simultaneous,
    ConnectFour,
}

impl GameFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameFamily::SinglePlayer => "single-player",
            GameFamily::Alternating => "alternating",
            GameFamily::Simultaneous => "simultaneous",
            GameFamily::ConnectFour => "connect-four",
        }
    }
}

impl fmt::Display for GameFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameFamily {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single-player" => Ok(GameFamily::SinglePlayer),
            "alternating" => Ok(GameFamily::Alternating),
            "simultaneous" => Ok(GameFamily::Simultaneous),
            "connect-four" => Ok(GameFamily::ConnectFour),
            other => Err(SearchError::UnknownFamily(other.to_string())),
        }
    }
}

/// Closed set of algorithms, scoped by family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmId {
    MazeRandom,
    Greedy,
    BeamSearch,
    Chokudai,

    AlternatingRandom,
    Minimax,
    AlphaBeta,
    IterativeDeepening,
    MonteCarlo,
    Mcts,
    Thunder,
    ThunderWithTime,

    SimultaneousRandom,
    Duct,
    PrimitiveMonteCarlo,
    VirtualAlternatingMcts,

    ConnectFourRandom,
    ConnectFourMcts,
    BitMcts,
    ConnectFourIterativeDeepening,
    BitIterativeDeepening,
}

const ALL_ALGORITHMS: [AlgorithmId; 21] = [
    AlgorithmId::MazeRandom,
    AlgorithmId::Greedy,
    AlgorithmId::BeamSearch,
    AlgorithmId::Chokudai,
    AlgorithmId::AlternatingRandom,
    AlgorithmId::Minimax,
    AlgorithmId::AlphaBeta,
    AlgorithmId::IterativeDeepening,
    AlgorithmId::MonteCarlo,
    AlgorithmId::Mcts,
    AlgorithmId::Thunder,
    AlgorithmId::ThunderWithTime,
    AlgorithmId::SimultaneousRandom,
    AlgorithmId::Duct,
    AlgorithmId::PrimitiveMonteCarlo,
    AlgorithmId::VirtualAlternatingMcts,
    AlgorithmId::ConnectFourRandom,
    AlgorithmId::ConnectFourMcts,
    AlgorithmId::BitMcts,
    AlgorithmId::ConnectFourIterativeDeepening,
    AlgorithmId::BitIterativeDeepening,
];

impl AlgorithmId {
    pub fn family(self) -> GameFamily {
        use AlgorithmId::*;
        match self {
            MazeRandom | Greedy | BeamSearch | Chokudai => GameFamily::SinglePlayer,
            AlternatingRandom | Minimax | AlphaBeta | IterativeDeepening | MonteCarlo | Mcts
            | Thunder | ThunderWithTime => GameFamily::Alternating,
            SimultaneousRandom | Duct | PrimitiveMonteCarlo | VirtualAlternatingMcts => {
                GameFamily::Simultaneous
            }
            ConnectFourRandom | ConnectFourMcts | BitMcts | ConnectFourIterativeDeepening
            | BitIterativeDeepening => GameFamily::ConnectFour,
        }
    }

    /// Name within the family, as written in configuration.
    pub fn name(self) -> &'static str {
        use AlgorithmId::*;
        match self {
            MazeRandom | AlternatingRandom | SimultaneousRandom | ConnectFourRandom => "random",
            Greedy => "greedy",
            BeamSearch => "beam",
            Chokudai => "chokudai",
            Minimax => "minimax",
            AlphaBeta => "alphabeta",
            IterativeDeepening | ConnectFourIterativeDeepening => "iterative-deepening",
            MonteCarlo => "monte-carlo",
            Mcts | VirtualAlternatingMcts | ConnectFourMcts => "mcts",
            Thunder => "thunder",
            ThunderWithTime => "thunder-with-time",
            Duct => "duct",
            PrimitiveMonteCarlo => "primitive-monte-carlo",
            BitMcts => "bit-mcts",
            BitIterativeDeepening => "bit-iterative-deepening",
        }
    }

    pub fn parse(family: GameFamily, name: &str) -> Result<Self, SearchError> {
        ALL_ALGORITHMS
            .iter()
            .copied()
            .find(|id| id.family() == family && id.name() == name)
            .ok_or_else(|| SearchError::UnknownAlgorithm {
                family,
                name: name.to_string(),
            })
    }

    /// Every algorithm name accepted for `family`.
    pub fn names(family: GameFamily) -> Vec<&'static str> {
        ALL_ALGORITHMS
            .iter()
            .filter(|id| id.family() == family)
            .map(|id| id.name())
            .collect()
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.family(), self.name())
    }
}

/// Parses the qualified `family/name` form produced by `Display`.
impl FromStr for AlgorithmId {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (family, name) = s
            .split_once('/')
            .ok_or_else(|| SearchError::UnknownFamily(s.to_string()))?;
        AlgorithmId::parse(family.parse()?, name)
    }
}

/// One configured decision maker.
pub struct Player {
    algorithm: AlgorithmId,
    config: Config,
    rng: StdRng,
}

impl Player {
    /// Resolves `name` within `family` and validates `config`.
    pub fn new(family: GameFamily, name: &str, config: &Config) -> Result<Self, SearchError> {
        Self::from_algorithm(AlgorithmId::parse(family, name)?, config)
    }

    pub fn from_algorithm(algorithm: AlgorithmId, config: &Config) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Player {
            algorithm,
            config: config.clone(),
            rng: StdRng::from_rng(&mut rand::rng()),
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.reseed(seed);
        self
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Side played in simultaneous-move games.
    pub fn with_player_id(mut self, player_id: usize) -> Result<Self, SearchError> {
        self.config.search.player_id = player_id;
        self.config.search.validate()?;
        Ok(self)
    }

    pub fn algorithm(&self) -> AlgorithmId {
        self.algorithm
    }

    pub fn player_id(&self) -> usize {
        self.config.search.player_id
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn contract_violation(&self, actual: GameFamily) -> SearchError {
        SearchError::ContractViolation {
            algorithm: self.algorithm.name(),
            expected: self.algorithm.family(),
            actual,
        }
    }

    fn expect_family(&self, actual: GameFamily) -> Result<(), SearchError> {
        if self.algorithm.family() == actual {
            Ok(())
        } else {
            Err(self.contract_violation(actual))
        }
    }

    fn playout_settings(&self) -> MctsSettings {
        MctsSettings::playout(self.config.mcts.exploration_constant, self.config.mcts.expand_threshold)
    }

    fn heuristic_settings(&self) -> MctsSettings {
        MctsSettings::heuristic(self.config.mcts.exploration_constant)
    }

    fn run_mcts<S: AlternatingState>(&mut self, state: &S, settings: MctsSettings, budget: Budget) -> Option<S::Action> {
        profile!("tree", {
            let workers = self.config.mcts.parallel_workers;
            if workers > 1 {
                let seed = self.rng.random::<u64>();
                parallel_mcts_action(state, settings, budget, workers, seed)
            } else {
                mcts_action(state, settings, budget, &mut self.rng)
            }
        })
    }

    fn run_deepening<S: AlternatingState>(&self, state: &S) -> Option<S::Action> {
        profile!("deterministic", {
            let params = &self.config.search;
            let result = iterative_deepening(
                state,
                params.time_threshold_ms,
                self.config.deepening.max_depth,
                params.search_depth,
            );
            result.action
        })
    }

    /// Single-agent decision.
    pub fn select_single<S: SearchState>(&mut self, state: &S) -> Result<Option<S::Action>, SearchError> {
        self.expect_family(GameFamily::SinglePlayer)?;
        let params = &self.config.search;
        let action = match self.algorithm {
            AlgorithmId::MazeRandom => random_action(&state.legal_actions(), &mut self.rng),
            AlgorithmId::Greedy => greedy_action(state),
            AlgorithmId::BeamSearch => beam_search_action(
                state,
                params.search_width,
                params.search_depth as usize,
                params.time_threshold_ms,
            ),
            AlgorithmId::Chokudai => chokudai_search_action(
                state,
                params.search_width,
                params.search_depth as usize,
                params.search_number,
                params.time_threshold_ms,
            ),
            _ => return Err(self.contract_violation(GameFamily::SinglePlayer)),
        };
        debug!("{} chose {:?}", self.algorithm, action);
        Ok(action)
    }

    /// Alternating-turn decision for the player to move in `state`.
    pub fn select_alternating<S: AlternatingState>(&mut self, state: &S) -> Result<Option<S::Action>, SearchError> {
        self.expect_family(GameFamily::Alternating)?;
        let depth = self.config.search.search_depth;
        let count = self.config.search.simulation_count;
        let threshold = self.config.search.time_threshold_ms;

        let action = match self.algorithm {
            AlgorithmId::AlternatingRandom => random_action(&state.legal_actions(), &mut self.rng),
            AlgorithmId::Minimax => profile!("deterministic", { minimax_action(state, depth) }),
            AlgorithmId::AlphaBeta => profile!("deterministic", { alpha_beta_action(state, depth) }),
            AlgorithmId::IterativeDeepening => self.run_deepening(state),
            AlgorithmId::MonteCarlo => primitive_monte_carlo(state, count, &mut self.rng),
            AlgorithmId::Mcts => {
                let settings = self.playout_settings();
                self.run_mcts(state, settings, Budget::Simulations(count))
            }
            AlgorithmId::Thunder => {
                let settings = self.heuristic_settings();
                self.run_mcts(state, settings, Budget::Simulations(count))
            }
            AlgorithmId::ThunderWithTime => {
                let settings = self.heuristic_settings();
                self.run_mcts(state, settings, Budget::time_or_count(threshold, count))
            }
            _ => return Err(self.contract_violation(GameFamily::Alternating)),
        };
        debug!("{} chose {:?}", self.algorithm, action);
        Ok(action)
    }

    /// Simultaneous-move decision for the configured `player_id`.
    pub fn select_simultaneous<S: SimultaneousState>(&mut self, state: &S) -> Result<Option<S::Action>, SearchError> {
        self.expect_family(GameFamily::Simultaneous)?;
        let player = self.config.search.player_id;
        let count = self.config.search.simulation_count;
        let mcts = &self.config.mcts;

        let action = match self.algorithm {
            AlgorithmId::SimultaneousRandom => random_simultaneous_action(state, player, &mut self.rng),
            AlgorithmId::Duct => profile!("tree", {
                duct_action(
                    state,
                    player,
                    count,
                    mcts.exploration_constant,
                    mcts.duct_expand_threshold,
                    &mut self.rng,
                )
            }),
            AlgorithmId::PrimitiveMonteCarlo => {
                primitive_monte_carlo_simultaneous(state, player, count, &mut self.rng)
            }
            AlgorithmId::VirtualAlternatingMcts => {
                let settings = self.playout_settings();
                profile!("tree", {
                    virtual_alternating_mcts(state, player, settings, count, &mut self.rng)
                })
            }
            _ => return Err(self.contract_violation(GameFamily::Simultaneous)),
        };
        debug!("{} (player {}) chose {:?}", self.algorithm, player, action);
        Ok(action)
    }

    /// Column-drop decision. Alternating-family players are accepted too.
    pub fn select_connect_four(&mut self, state: &ConnectFourState) -> Result<Option<usize>, SearchError> {
        if self.algorithm.family() == GameFamily::Alternating {
            return self.select_alternating(state);
        }
        self.expect_family(GameFamily::ConnectFour)?;
        let budget = Budget::time_or_count(
            self.config.search.time_threshold_ms,
            self.config.search.simulation_count,
        );

        let action = match self.algorithm {
            AlgorithmId::ConnectFourRandom => random_action(&state.legal_actions(), &mut self.rng),
            AlgorithmId::ConnectFourMcts => {
                let settings = self.playout_settings();
                self.run_mcts(state, settings, budget)
            }
            AlgorithmId::BitMcts => {
                let settings = self.playout_settings();
                self.run_mcts(&ConnectFourBitBoard::from(state), settings, budget)
            }
            AlgorithmId::ConnectFourIterativeDeepening => self.run_deepening(state),
            AlgorithmId::BitIterativeDeepening => self.run_deepening(&ConnectFourBitBoard::from(state)),
            _ => return Err(self.contract_violation(GameFamily::ConnectFour)),
        };
        debug!("{} chose {:?}", self.algorithm, action);
        Ok(action)
    }
}

/// Binds a concrete game type to its family's entry point.
pub trait Playable: Clone + Serialize + DeserializeOwned {
    type Move: Copy + fmt::Debug + PartialEq + Serialize + DeserializeOwned;

    const FAMILY: GameFamily;

    fn select(player: &mut Player, state: &Self) -> Result<Option<Self::Move>, SearchError>;
}

impl Playable for MazeState {
    type Move = Direction;
    const FAMILY: GameFamily = GameFamily::SinglePlayer;

    fn select(player: &mut Player, state: &Self) -> Result<Option<Direction>, SearchError> {
        player.select_single(state)
    }
}

impl Playable for TwoMazeState {
    type Move = Direction;
    const FAMILY: GameFamily = GameFamily::Alternating;

    fn select(player: &mut Player, state: &Self) -> Result<Option<Direction>, SearchError> {
        player.select_alternating(state)
    }
}

impl Playable for SimMazeState {
    type Move = Direction;
    const FAMILY: GameFamily = GameFamily::Simultaneous;

    fn select(player: &mut Player, state: &Self) -> Result<Option<Direction>, SearchError> {
        player.select_simultaneous(state)
    }
}

impl Playable for ConnectFourState {
    type Move = usize;
    const FAMILY: GameFamily = GameFamily::ConnectFour;

    fn select(player: &mut Player, state: &Self) -> Result<Option<usize>, SearchError> {
        player.select_connect_four(state)
    }
}
