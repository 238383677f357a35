//! MCTS Core - Game abstraction and error types
//!
//! This crate provides the [`Game`] trait that a turn-based game implements
//! to be searched by the `mcts-engine` crate, and the errors the engine
//! reports when a game breaks that contract.

mod error;
mod game;

pub use error::{MctsError, Phase, Result};
pub use game::Game;
