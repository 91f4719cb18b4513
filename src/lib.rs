// Library exports for the grid search engines
// The arena and replay binaries drive everything through these modules

pub mod bitboard;
pub mod config;
pub mod debug_logger;
pub mod error;
pub mod game;
pub mod games;
pub mod orchestrator;
pub mod profiler;
pub mod replay;
pub mod search;
pub mod timing;
pub mod types;

pub use error::SearchError;
pub use orchestrator::{AlgorithmId, GameFamily, Playable, Player};
