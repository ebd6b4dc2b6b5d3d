pub mod engine;

pub use engine::{
    Direction, Feedback, GameState, GuessEngine, GuessOutcome, Phase, Solution, Status,
    MAX_GUESSES, MAX_LIVES,
};
