//! Tic-tac-toe.
//!
//! Tic-tac-toe is a solved game where perfect play always results in a draw.
//! Scores are 1 for the winner and 0 for the loser; a draw scores 0 for
//! both, which makes both players winners of the rollout.

use mcts_core::{Game, MctsError};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Tic-tac-toe player.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opposing player.
    pub fn opposite(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::X => write!(f, "X"),
            Player::O => write!(f, "O"),
        }
    }
}

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2], // top row
    [3, 4, 5], // middle row
    [6, 7, 8], // bottom row
    [0, 3, 6], // left column
    [1, 4, 7], // center column
    [2, 5, 8], // right column
    [0, 4, 8], // main diagonal
    [2, 4, 6], // anti-diagonal
];

/// Tic-tac-toe board.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub struct TicTacToeBoard {
    /// 9 cells, indexed 0-8 (row-major).
    /// ```text
    /// 0 | 1 | 2
    /// ---------
    /// 3 | 4 | 5
    /// ---------
    /// 6 | 7 | 8
    /// ```
    cells: [Option<Player>; 9],

    /// Player whose mark the next move places.
    current: Player,

    /// Cached winner (if any).
    winner: Option<Player>,
}

impl TicTacToeBoard {
    /// Create a new empty board with X to move.
    pub fn new() -> Self {
        Self {
            cells: [None; 9],
            current: Player::X,
            winner: None,
        }
    }

    /// Get the current player to move.
    pub fn current_player(&self) -> Player {
        self.current
    }

    /// Get the winner, if any.
    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    /// Get the mark in a cell, if any.
    pub fn get(&self, cell: TicTacToeMove) -> Option<Player> {
        self.cells.get(cell.index()).copied().flatten()
    }

    /// Check if the board is full (draw if no winner).
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    fn check_winner(&self) -> Option<Player> {
        LINES.iter().find_map(|line| {
            let player = self.cells[line[0]]?;
            let complete = line[1..].iter().all(|&cell| self.cells[cell] == Some(player));
            complete.then_some(player)
        })
    }
}

impl Default for TicTacToeBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TicTacToeBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            if row > 0 {
                writeln!(f, "-----------")?;
            }
            for col in 0..3 {
                if col > 0 {
                    write!(f, "|")?;
                }
                match self.cells[row * 3 + col] {
                    Some(player) => write!(f, " {} ", player)?,
                    None => write!(f, "   ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Compass names of the cells, in index order.
const CELL_NAMES: [&str; 9] = ["NW", "N", "NE", "W", "C", "E", "SW", "S", "SE"];

/// Tic-tac-toe move (cell index 0-8).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TicTacToeMove(u8);

impl TicTacToeMove {
    /// All cells, in index order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..9).map(TicTacToeMove)
    }

    /// Move for a cell index, `None` if out of range.
    pub fn new(index: u8) -> Option<Self> {
        (index < 9).then_some(Self(index))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Get the row (0-2).
    pub fn row(self) -> u8 {
        self.0 / 3
    }

    /// Get the column (0-2).
    pub fn col(self) -> u8 {
        self.0 % 3
    }

    /// Compass name of the cell, e.g. "NW" or "C".
    pub fn name(self) -> &'static str {
        CELL_NAMES[self.index()]
    }
}

impl fmt::Display for TicTacToeMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TicTacToeMove {
    type Err = MctsError;

    /// Parse a compass name (case-insensitive) or a cell index 0-8.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(index) = CELL_NAMES.iter().position(|name| name.eq_ignore_ascii_case(s)) {
            return Ok(Self(index as u8));
        }

        s.parse::<u8>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| MctsError::InvalidMove(s.to_string()))
    }
}

/// Tic-tac-toe game implementation.
#[derive(Clone, Copy, Debug, Default)]
pub struct TicTacToe;

impl Game for TicTacToe {
    type Move = TicTacToeMove;
    type Board = TicTacToeBoard;
    type Player = Player;

    fn initial_board(&self) -> TicTacToeBoard {
        TicTacToeBoard::new()
    }

    fn first_player(&self) -> Player {
        Player::X
    }

    fn apply(&self, board: &TicTacToeBoard, mv: &TicTacToeMove) -> TicTacToeBoard {
        let mut next = board.clone();
        next.cells[mv.index()] = Some(board.current);
        next.current = board.current.opposite();
        next.winner = next.check_winner();
        next
    }

    fn next_player(&self, current: &Player) -> Player {
        current.opposite()
    }

    fn is_over(&self, board: &TicTacToeBoard) -> bool {
        board.winner.is_some() || board.is_full()
    }

    fn possible_moves(&self, board: &TicTacToeBoard) -> Vec<TicTacToeMove> {
        if board.winner.is_some() {
            return Vec::new();
        }

        TicTacToeMove::all()
            .filter(|mv| board.get(*mv).is_none())
            .collect()
    }

    fn scores(&self, board: &TicTacToeBoard) -> HashMap<Player, i64> {
        if !self.is_over(board) {
            return HashMap::new();
        }

        match board.winner {
            Some(winner) => [(winner, 1), (winner.opposite(), 0)].into_iter().collect(),
            None => [(Player::X, 0), (Player::O, 0)].into_iter().collect(),
        }
    }
}
