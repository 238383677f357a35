use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// A turn-based game the MCTS engine can search.
///
/// The engine knows nothing about the concrete shape of moves, boards or
/// players; everything game-specific goes through this trait. It supports
/// any number of players and games that end in draws.
///
/// Boards are treated as immutable snapshots: nodes of the search tree keep
/// the board they were created with, so `apply` must return a new board
/// rather than change the one it was given.
pub trait Game {
    /// A single move (e.g. a tic-tac-toe cell).
    ///
    /// Moves key the children of a search node, so they must be hashable.
    type Move: Clone + Eq + Hash + Debug;

    /// The game state.
    type Board: Clone;

    /// A player identifier. Compared against the winners of a rollout.
    type Player: Clone + Eq + Hash + Debug;

    /// Returns a fresh board suitable for the start of play.
    fn initial_board(&self) -> Self::Board;

    /// Returns the player who moves first.
    fn first_player(&self) -> Self::Player;

    /// Applies a move, returning a new board (immutable operation).
    fn apply(&self, board: &Self::Board, mv: &Self::Move) -> Self::Board;

    /// Returns the player who moves after `current`.
    ///
    /// This depends on the player only, never on the board.
    fn next_player(&self, current: &Self::Player) -> Self::Player;

    /// Returns true if no further play is possible.
    fn is_over(&self, board: &Self::Board) -> bool;

    /// Returns the legal moves from `board`.
    ///
    /// Empty if and only if `is_over(board)` is true. A move must not be
    /// listed twice.
    fn possible_moves(&self, board: &Self::Board) -> Vec<Self::Move>;

    /// Returns the score of every player on a finished board.
    ///
    /// Empty if the game is not over. Once `is_over` returns true this
    /// must hold at least one entry; the highest score wins, and several
    /// players sharing it is a draw between them.
    fn scores(&self, board: &Self::Board) -> HashMap<Self::Player, i64>;
}
