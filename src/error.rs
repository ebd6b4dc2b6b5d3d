//! Errors raised by the puzzle catalog and the guess engine

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// No puzzles to play. Fatal at startup.
    #[error("the puzzle catalog is empty")]
    CatalogEmpty,

    #[error("no puzzle with id '{id}'")]
    PuzzleNotFound { id: String },

    #[error("puzzle '{id}' is invalid: {reason}")]
    InvalidPuzzle { id: String, reason: String },

    #[error("line {guess} is not in the snippet (lines 0..{line_count})")]
    InvalidGuess { guess: i64, line_count: usize },

    #[error("no lives left to spend on a hint")]
    NoLives,

    #[error("the solution is only available once the game is over")]
    NotYetOver,

    #[error("no puzzle has been started")]
    NoActivePuzzle,
}

impl GameError {
    pub fn invalid_puzzle(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPuzzle {
            id: id.into(),
            reason: reason.into(),
        }
    }

    pub fn puzzle_not_found(id: impl Into<String>) -> Self {
        Self::PuzzleNotFound { id: id.into() }
    }
}
