use anyhow::{Context, Result};
use std::path::Path;

use super::types::{BugRecord, Puzzle, PuzzleFile};

pub fn load_puzzle(path: &Path) -> Result<Puzzle> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading puzzle {}", path.display()))?;
    let file: PuzzleFile =
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    let puzzle = Puzzle::try_from(file)?;
    Ok(puzzle)
}

pub fn load_dir(dir: &Path) -> Result<Vec<Puzzle>> {
    let pattern = dir.join("*.toml");
    let pattern = pattern.to_string_lossy();
    let mut paths: Vec<_> = glob::glob(&pattern)
        .with_context(|| format!("bad puzzle path {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .collect();

    // bug_01, bug_02, ... play in file name order
    paths.sort();

    let mut puzzles = Vec::new();
    for path in paths {
        puzzles.push(load_puzzle(&path)?);
    }

    log::info!("loaded {} puzzles from {}", puzzles.len(), dir.display());
    Ok(puzzles)
}

/// Reads a DebugBench JSON export. Records without a curated buggy line are
/// skipped, never guessed at.
pub fn load_dataset(path: &Path) -> Result<Vec<Puzzle>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading dataset {}", path.display()))?;
    parse_dataset(&content).with_context(|| format!("parsing {}", path.display()))
}

pub fn parse_dataset(json: &str) -> Result<Vec<Puzzle>> {
    let records: Vec<BugRecord> = serde_json::from_str(json)?;
    let total = records.len();

    let puzzles: Vec<Puzzle> = records
        .into_iter()
        .filter_map(|record| match Puzzle::try_from(record) {
            Ok(puzzle) => Some(puzzle),
            Err(e) => {
                log::warn!("skipping dataset record: {}", e);
                None
            }
        })
        .collect();

    log::info!("kept {} of {} dataset records", puzzles.len(), total);
    Ok(puzzles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const ADD: &str = r#"
[meta]
id = "add"
level = "easy"
language = "swift"

[problem]
question = "Add two numbers."

[bug]
code = """
func add(a, b) {
  return a + c
}
"""
line = 1
explanation = "c is never defined."
hint = "Undefined variable"
"#;

    const EQUALITY: &str = r#"
[meta]
id = "equality"

[bug]
code = """
if x = 10 {
  print("Hi")
}
"""
line = 0
explanation = "Assignment where a comparison was meant."
"#;

    #[test]
    fn load_puzzle_reads_all_tables() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bug_01.toml");
        fs::write(&path, ADD).unwrap();

        let puzzle = load_puzzle(&path).unwrap();
        assert_eq!(puzzle.id, "add");
        assert_eq!(puzzle.line_count(), 3);
        assert_eq!(puzzle.buggy_line, 1);
        assert_eq!(puzzle.static_hint.as_deref(), Some("Undefined variable"));
        assert_eq!(puzzle.meta.language, "swift");
        assert_eq!(puzzle.question, "Add two numbers.");
    }

    #[test]
    fn load_dir_sorts_by_file_name_and_ignores_other_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bug_02.toml"), ADD).unwrap();
        fs::write(dir.path().join("bug_01.toml"), EQUALITY).unwrap();
        fs::write(dir.path().join("notes.txt"), "not a puzzle").unwrap();

        let puzzles = load_dir(dir.path()).unwrap();
        let ids: Vec<_> = puzzles.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["equality", "add"]);
    }

    #[test]
    fn load_dir_of_empty_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(load_dir(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn load_puzzle_rejects_line_outside_code() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, ADD.replace("line = 1", "line = 7")).unwrap();

        let err = load_puzzle(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("outside the code"));
    }

    #[test]
    fn parse_dataset_counts_leading_blank_lines() {
        let json = r#"[{
            "slug": "undefined-y",
            "buggy_code": "\nclass Solution {\n  int x = y;\n}",
            "bug_explanation": "y is never declared.",
            "buggy_line": 2
        }]"#;

        let puzzles = parse_dataset(json).unwrap();
        let puzzle = &puzzles[0];
        assert_eq!(puzzle.line_count(), 4);
        assert_eq!(puzzle.code_lines[puzzle.buggy_line], "  int x = y;");
    }

    #[test]
    fn parse_dataset_skips_uncurated_records() {
        let json = r#"[
            {
                "slug": "single-number",
                "category": "logic error",
                "question": "Find the single one.",
                "buggy_code": "for(int i=0;i<nums.size();i++){\n  mp[nums[i]] = 1; \n}",
                "solution": "mp[nums[i]]++;",
                "hint": "",
                "bug_explanation": "Sets the count to 1 instead of incrementing.",
                "level": "easy",
                "language": "cpp",
                "examples": ["Input: [2,2,1] Output: 1"],
                "subtype": "operation error",
                "buggy_line": 1
            },
            {
                "slug": "two-sum",
                "buggy_code": "a\nb",
                "bug_explanation": "no curated line"
            }
        ]"#;

        let puzzles = parse_dataset(json).unwrap();
        assert_eq!(puzzles.len(), 1);
        assert_eq!(puzzles[0].id, "single-number");
        assert_eq!(puzzles[0].meta.examples.len(), 1);
        // empty hint falls back to the subtype
        assert_eq!(puzzles[0].hint_text(), "operation error");
    }
}
