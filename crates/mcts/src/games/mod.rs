//! Reference game implementations.
//!
//! Small games with known answers, used to check the engine and to drive
//! the interactive player.

pub mod letters;
pub mod tictactoe;

pub use letters::Letters;
pub use tictactoe::{Player, TicTacToe, TicTacToeBoard, TicTacToeMove};
