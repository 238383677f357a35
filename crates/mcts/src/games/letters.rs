//! A two-player letter game with a known best strategy.
//!
//! Players take turns appending "a" or "b" to the board. After the
//! configured number of rounds player 0 scores one point per "a" and
//! player 1 one point per "b". Each player's best move is always their own
//! letter, so the engine's estimates are easy to check.

use mcts_core::Game;
use std::collections::HashMap;

/// The letter game, played for a fixed number of rounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Letters {
    rounds: usize,
}

impl Letters {
    pub fn new(rounds: usize) -> Self {
        Self { rounds }
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }
}

impl Game for Letters {
    type Move = String;
    type Board = String;
    type Player = u8;

    fn initial_board(&self) -> String {
        String::new()
    }

    fn first_player(&self) -> u8 {
        0
    }

    fn apply(&self, board: &String, mv: &String) -> String {
        format!("{}{}", board, mv)
    }

    fn next_player(&self, current: &u8) -> u8 {
        (current + 1) % 2
    }

    fn is_over(&self, board: &String) -> bool {
        board.len() >= self.rounds
    }

    fn possible_moves(&self, board: &String) -> Vec<String> {
        if self.is_over(board) {
            Vec::new()
        } else {
            vec!["a".to_string(), "b".to_string()]
        }
    }

    fn scores(&self, board: &String) -> HashMap<u8, i64> {
        if !self.is_over(board) {
            return HashMap::new();
        }

        let count = |letter: char| board.chars().filter(|c| *c == letter).count() as i64;
        [(0, count('a')), (1, count('b'))].into_iter().collect()
    }
}
