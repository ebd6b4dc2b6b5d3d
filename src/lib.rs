//! Bugdle: spot the buggy line in a code snippet within six guesses.

pub mod config;
pub mod error;
pub mod game;
pub mod hint;
pub mod puzzle;
pub mod ui;

pub use error::GameError;
