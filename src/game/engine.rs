//! The guessing game's rules: one puzzle at a time, six guesses, five lives
//! that only hints can spend.

use std::fmt;

use crate::error::GameError;
use crate::puzzle::Puzzle;

/// Lives at the start of every puzzle.
pub const MAX_LIVES: u32 = 5;

/// Guesses allowed per puzzle.
pub const MAX_GUESSES: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Higher,
    Lower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    Correct,
    Exhausted { correct_line: usize },
    Continue(Direction),
}

/// How close a guess is to the buggy line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Exact,
    Near,
    Far,
}

impl Feedback {
    pub fn classify(guess: usize, buggy_line: usize) -> Self {
        match guess.abs_diff(buggy_line) {
            0 => Feedback::Exact,
            1 => Feedback::Near,
            _ => Feedback::Far,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    InProgress,
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ready,
    Guessed(GuessOutcome),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ready => write!(f, "Find the line with the bug!"),
            Status::Guessed(GuessOutcome::Correct) => write!(f, "Correct! You found the bug!"),
            Status::Guessed(GuessOutcome::Exhausted { correct_line }) => {
                write!(f, "Game over! The bug was on line {}.", correct_line)
            }
            Status::Guessed(GuessOutcome::Continue(Direction::Higher)) => {
                write!(f, "Try a higher line number.")
            }
            Status::Guessed(GuessOutcome::Continue(Direction::Lower)) => {
                write!(f, "Try a lower line number.")
            }
        }
    }
}

/// Everything that changes while a puzzle is played.
#[derive(Debug, Clone)]
pub struct GameState {
    pub active_puzzle: Option<Puzzle>,
    pub lives_remaining: u32,
    pub guess_history: Vec<usize>,
    pub hint_revealed: bool,
    pub is_game_over: bool,
    pub status: Status,
}

impl Default for GameState {
    fn default() -> Self {
        GameState {
            active_puzzle: None,
            lives_remaining: MAX_LIVES,
            guess_history: Vec::new(),
            hint_revealed: false,
            is_game_over: false,
            status: Status::Ready,
        }
    }
}

impl GameState {
    pub fn phase(&self) -> Phase {
        match (&self.active_puzzle, self.is_game_over, self.status) {
            (None, _, _) => Phase::NotStarted,
            (Some(_), false, _) => Phase::InProgress,
            (Some(_), true, Status::Guessed(GuessOutcome::Correct)) => Phase::Won,
            (Some(_), true, _) => Phase::Lost,
        }
    }

    pub fn guesses_left(&self) -> usize {
        MAX_GUESSES.saturating_sub(self.guess_history.len())
    }
}

/// What the solution screen shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Solution<'a> {
    pub explanation: &'a str,
    pub solution: Option<&'a str>,
    pub buggy_line: usize,
}

/// Owns the [`GameState`] and is the only thing that mutates it.
#[derive(Debug, Default)]
pub struct GuessEngine {
    state: GameState,
}

impl GuessEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn puzzle(&self) -> Option<&Puzzle> {
        self.state.active_puzzle.as_ref()
    }

    pub fn start_puzzle(&mut self, puzzle: Puzzle) -> &GameState {
        log::debug!("starting puzzle {}", puzzle.id);
        self.state = GameState {
            active_puzzle: Some(puzzle),
            ..GameState::default()
        };
        &self.state
    }

    pub fn submit_guess(&mut self, line: i64) -> Result<GuessOutcome, GameError> {
        let puzzle = self
            .state
            .active_puzzle
            .as_ref()
            .ok_or(GameError::NoActivePuzzle)?;

        if self.state.is_game_over {
            if let Status::Guessed(outcome) = self.state.status {
                return Ok(outcome);
            }
        }

        let line_count = puzzle.line_count();
        let index = usize::try_from(line)
            .ok()
            .filter(|index| *index < line_count)
            .ok_or(GameError::InvalidGuess {
                guess: line,
                line_count,
            })?;

        let buggy_line = puzzle.buggy_line;
        self.state.guess_history.push(index);

        // A correct answer wins even on the last guess.
        let outcome = if index == buggy_line {
            GuessOutcome::Correct
        } else if self.state.guess_history.len() >= MAX_GUESSES {
            GuessOutcome::Exhausted {
                correct_line: buggy_line,
            }
        } else if index < buggy_line {
            GuessOutcome::Continue(Direction::Higher)
        } else {
            GuessOutcome::Continue(Direction::Lower)
        };

        if !matches!(outcome, GuessOutcome::Continue(_)) {
            self.state.is_game_over = true;
        }
        self.state.status = Status::Guessed(outcome);

        log::debug!(
            "guess {} ({} of {}): {:?}",
            index,
            self.state.guess_history.len(),
            MAX_GUESSES,
            outcome
        );
        Ok(outcome)
    }

    /// Spends a life on the puzzle's static hint. Once per puzzle, and never
    /// the last life.
    pub fn request_hint(&mut self) -> Result<String, GameError> {
        let puzzle = self
            .state
            .active_puzzle
            .as_ref()
            .ok_or(GameError::NoActivePuzzle)?;

        if self.state.lives_remaining <= 1 || self.state.hint_revealed {
            return Err(GameError::NoLives);
        }

        let hint = puzzle.hint_text();
        self.state.lives_remaining -= 1;
        self.state.hint_revealed = true;
        Ok(hint)
    }

    /// Charges one life for a hint served from outside the engine.
    pub fn spend_life(&mut self) -> Result<u32, GameError> {
        if self.state.active_puzzle.is_none() {
            return Err(GameError::NoActivePuzzle);
        }
        if self.state.lives_remaining <= 1 {
            return Err(GameError::NoLives);
        }
        self.state.lives_remaining -= 1;
        Ok(self.state.lives_remaining)
    }

    pub fn feedback_for(&self, line: usize) -> Option<Feedback> {
        self.puzzle()
            .map(|puzzle| Feedback::classify(line, puzzle.buggy_line))
    }

    pub fn reveal_solution(&self) -> Result<Solution<'_>, GameError> {
        let puzzle = self.puzzle().ok_or(GameError::NoActivePuzzle)?;
        if !self.state.is_game_over {
            return Err(GameError::NotYetOver);
        }
        Ok(Solution {
            explanation: &puzzle.explanation,
            solution: puzzle.solution.as_deref(),
            buggy_line: puzzle.buggy_line,
        })
    }
}
