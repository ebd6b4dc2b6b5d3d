use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::error::GameError;
use crate::hint::{CannedHintProvider, HintProvider, PrecomputedHintProvider};
use crate::puzzle::{load_dataset, load_dir, PuzzleCatalog};

#[derive(Debug, Parser)]
#[command(name = "bugdle", version, about = "Find the buggy line in six guesses")]
pub struct Config {
    /// Directory of *.toml puzzle files
    #[arg(long, env = "BUGDLE_PUZZLES")]
    pub puzzles: Option<PathBuf>,

    /// DebugBench JSON export with curated buggy lines
    #[arg(long, env = "BUGDLE_DATASET", conflicts_with = "puzzles")]
    pub dataset: Option<PathBuf>,

    /// Puzzle id to start on
    #[arg(long)]
    pub start: Option<String>,

    #[arg(long, env = "BUGDLE_HINT_TIMEOUT", default_value_t = 10)]
    pub hint_timeout_secs: u64,

    /// Latency of the offline hint generator
    #[arg(long, default_value_t = 1000)]
    pub hint_delay_ms: u64,
}

impl Config {
    /// Fails when the chosen source yields no puzzles.
    pub fn load_catalog(&self) -> Result<PuzzleCatalog> {
        let catalog = match (&self.puzzles, &self.dataset) {
            (Some(dir), _) => PuzzleCatalog::load(load_dir(dir)?)
                .with_context(|| format!("no puzzles found in {}", dir.display()))?,
            (None, Some(path)) => PuzzleCatalog::load(load_dataset(path)?)
                .with_context(|| format!("no playable puzzles in {}", path.display()))?,
            (None, None) => PuzzleCatalog::builtin()?,
        };
        Ok(catalog)
    }

    pub fn start_index(&self, catalog: &PuzzleCatalog) -> Result<usize> {
        match &self.start {
            Some(id) => Ok(catalog
                .index_of(id)
                .ok_or_else(|| GameError::puzzle_not_found(id.as_str()))?),
            None => Ok(0),
        }
    }

    pub fn hint_timeout(&self) -> Duration {
        Duration::from_secs(self.hint_timeout_secs)
    }

    pub fn hint_provider(&self, catalog: &PuzzleCatalog) -> Arc<dyn HintProvider> {
        let canned = Arc::new(CannedHintProvider::new(Duration::from_millis(
            self.hint_delay_ms,
        )));
        Arc::new(PrecomputedHintProvider::from_puzzles(
            catalog.puzzles(),
            canned,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_use_builtin_catalog() {
        let config = Config::try_parse_from(["bugdle"]).unwrap();
        assert_eq!(config.hint_delay_ms, 1000);

        let catalog = config.load_catalog().unwrap();
        assert_eq!(catalog.len(), 5);
        assert_eq!(config.start_index(&catalog).unwrap(), 0);
    }

    #[test]
    fn start_picks_puzzle_by_id() {
        let config =
            Config::try_parse_from(["bugdle", "--start", "single-number"]).unwrap();
        let catalog = PuzzleCatalog::builtin().unwrap();
        assert_eq!(config.start_index(&catalog).unwrap(), 4);
    }

    #[test]
    fn unknown_start_id_is_an_error() {
        let config = Config::try_parse_from(["bugdle", "--start", "nope"]).unwrap();
        let catalog = PuzzleCatalog::builtin().unwrap();
        let err = config.start_index(&catalog).unwrap_err();
        assert_eq!(
            err.downcast_ref::<GameError>(),
            Some(&GameError::puzzle_not_found("nope"))
        );
    }

    #[test]
    fn empty_puzzle_dir_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_string_lossy().to_string();
        let config = Config::try_parse_from(["bugdle", "--puzzles", path.as_str()]).unwrap();

        let err = config.load_catalog().unwrap_err();
        assert_eq!(
            err.downcast_ref::<GameError>(),
            Some(&GameError::CatalogEmpty)
        );
    }

    #[test]
    fn dataset_without_curated_lines_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("BugdleData.json");
        fs::write(
            &path,
            r#"[{"slug": "s", "buggy_code": "x", "bug_explanation": "y"}]"#,
        )
        .unwrap();
        let path = path.to_string_lossy().to_string();
        let config = Config::try_parse_from(["bugdle", "--dataset", path.as_str()]).unwrap();

        assert!(config.load_catalog().is_err());
    }
}
