pub mod catalog;
pub mod loader;
pub mod types;

pub use catalog::PuzzleCatalog;
pub use loader::{load_dataset, load_dir, load_puzzle};
pub use types::{Puzzle, PuzzleMeta};
