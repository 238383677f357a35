//! Monte Carlo Tree Search over any turn-based game.
//!
//! This crate provides a generic MCTS engine that can be used with
//! any game implementing the `mcts_core::Game` trait.
//!
//! # Features
//!
//! - **Generic**: Works with any number of players, any move/board/player types
//! - **Full-layer expansion**: Every expanded node has its complete child set
//! - **Draw-aware**: A rollout can have several winners
//! - **Pluggable policies**: Selection, expansion and simulation choices are
//!   strategies, uniform-random by default
//! - **Seedable**: All randomness comes from the injected `Rng`
//!
//! # Example
//!
//! ```
//! use mcts_engine::{Engine, EngineConfig, games::TicTacToe};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut engine = Engine::new(TicTacToe, ChaCha8Rng::seed_from_u64(42));
//!
//! let result = engine.search(&EngineConfig::with_iterations(200)).unwrap();
//! for estimate in result.iter() {
//!     println!("{}: {:.3}", estimate.mv, estimate.win_rate);
//! }
//!
//! let best = result.best().expect("empty board has moves");
//! engine.apply(&best);
//! ```

pub mod config;
pub mod engine;
pub mod games;
mod node;
pub mod policy;
pub mod result;
mod tree;

pub use config::EngineConfig;
pub use engine::Engine;
pub use node::{Node, NodeId};
pub use policy::{ExpansionPolicy, GameTree, SelectionPolicy, SimulationPolicy, UniformRandom};
pub use result::{MoveEstimate, SearchResult};
pub use tree::Tree;
