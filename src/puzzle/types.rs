use serde::Deserialize;

use crate::error::GameError;

/// A single buggy-code challenge. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    pub id: String,
    pub code_lines: Vec<String>,
    /// 0-based index into `code_lines`, counting every line of the raw code
    /// including leading blank ones. Always in range.
    pub buggy_line: usize,
    pub explanation: String,
    pub solution: Option<String>,
    pub static_hint: Option<String>,
    /// Pre-generated AI hint, when the data source carries one.
    pub ai_hint: Option<String>,
    pub question: String,
    pub meta: PuzzleMeta,
}

/// Display-only details. Nothing in the game logic reads these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PuzzleMeta {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub subtype: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

impl Puzzle {
    /// Builds a puzzle from multi-line source text, checking that the
    /// curated buggy line exists.
    pub fn new(
        id: impl Into<String>,
        code: &str,
        buggy_line: usize,
        explanation: impl Into<String>,
    ) -> Result<Self, GameError> {
        let id = id.into();
        let code_lines = split_code(code);

        if code_lines.is_empty() {
            return Err(GameError::invalid_puzzle(id, "code is empty"));
        }
        if buggy_line >= code_lines.len() {
            return Err(GameError::invalid_puzzle(
                id,
                format!(
                    "buggy line {} is outside the code ({} lines)",
                    buggy_line,
                    code_lines.len()
                ),
            ));
        }

        Ok(Puzzle {
            id,
            code_lines,
            buggy_line,
            explanation: explanation.into(),
            solution: None,
            static_hint: None,
            ai_hint: None,
            question: String::new(),
            meta: PuzzleMeta::default(),
        })
    }

    pub fn with_question(mut self, question: impl Into<String>) -> Self {
        self.question = question.into();
        self
    }

    pub fn with_solution(mut self, solution: impl Into<String>) -> Self {
        self.solution = Some(solution.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.static_hint = Some(hint.into());
        self
    }

    pub fn with_meta(mut self, meta: PuzzleMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn line_count(&self) -> usize {
        self.code_lines.len()
    }

    pub fn code(&self) -> String {
        self.code_lines.join("\n")
    }

    /// Text shown when the player pays a life for the static hint. Falls
    /// back to the bug subtype, which is what the dataset offers otherwise.
    pub fn hint_text(&self) -> String {
        match (&self.static_hint, self.meta.subtype.as_str()) {
            (Some(hint), _) if !hint.trim().is_empty() => hint.clone(),
            (_, subtype) if !subtype.is_empty() => subtype.to_string(),
            _ => "No hint for this one. Trust your eyes.".to_string(),
        }
    }
}

/// Leading blank lines are kept so curated line indexes stay put.
fn split_code(code: &str) -> Vec<String> {
    code.trim_end()
        .lines()
        .map(|line| line.trim_end().to_string())
        .collect()
}

/// On-disk shape of a `*.toml` puzzle file.
#[derive(Debug, Deserialize)]
pub struct PuzzleFile {
    pub meta: FileMeta,
    #[serde(default)]
    pub problem: Problem,
    pub bug: Bug,
}

#[derive(Debug, Deserialize)]
pub struct FileMeta {
    pub id: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub subtype: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct Problem {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct Bug {
    pub code: String,
    pub line: usize,
    pub explanation: String,
    #[serde(default)]
    pub solution: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub ai_hint: Option<String>,
}

impl TryFrom<PuzzleFile> for Puzzle {
    type Error = GameError;

    fn try_from(file: PuzzleFile) -> Result<Self, Self::Error> {
        let mut puzzle = Puzzle::new(
            file.meta.id,
            &file.bug.code,
            file.bug.line,
            file.bug.explanation,
        )?;
        puzzle.question = file.problem.question;
        puzzle.solution = file.bug.solution;
        puzzle.static_hint = file.bug.hint;
        puzzle.ai_hint = file.bug.ai_hint;
        puzzle.meta = PuzzleMeta {
            category: file.meta.category,
            level: file.meta.level,
            language: file.meta.language,
            subtype: file.meta.subtype,
            examples: file.problem.examples,
        };
        Ok(puzzle)
    }
}

/// One entry of a DebugBench JSON export. `buggy_line` is curated by hand;
/// exports straight from the dataset do not have it.
#[derive(Debug, Deserialize)]
pub struct BugRecord {
    pub slug: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub question: String,
    pub buggy_code: String,
    #[serde(default)]
    pub solution: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
    pub bug_explanation: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub subtype: String,
    #[serde(default)]
    pub ai_hint: Option<String>,
    #[serde(default)]
    pub buggy_line: Option<usize>,
}

impl TryFrom<BugRecord> for Puzzle {
    type Error = GameError;

    fn try_from(record: BugRecord) -> Result<Self, Self::Error> {
        let line = record.buggy_line.ok_or_else(|| {
            GameError::invalid_puzzle(&record.slug, "no curated buggy_line")
        })?;
        let mut puzzle = Puzzle::new(
            record.slug,
            &record.buggy_code,
            line,
            record.bug_explanation,
        )?;
        puzzle.question = record.question;
        puzzle.solution = record.solution;
        puzzle.static_hint = record.hint;
        puzzle.ai_hint = record.ai_hint;
        puzzle.meta = PuzzleMeta {
            category: record.category,
            level: record.level,
            language: record.language,
            subtype: record.subtype,
            examples: record.examples,
        };
        Ok(puzzle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_splits_code_into_lines() {
        let puzzle = Puzzle::new(
            "single-number",
            "for(int i=0;i<nums.size();i++){\n  mp[nums[i]] = 1; \n}",
            1,
            "overwrites instead of incrementing",
        )
        .unwrap();

        assert_eq!(puzzle.line_count(), 3);
        assert_eq!(puzzle.code_lines[1], "  mp[nums[i]] = 1;");
    }

    #[test]
    fn leading_blank_lines_keep_their_index() {
        let puzzle = Puzzle::new("p", "\nclass Solution {\n  int x = y;\n}\n", 2, "y").unwrap();
        assert_eq!(puzzle.line_count(), 4);
        assert_eq!(puzzle.code_lines[0], "");
        assert_eq!(puzzle.code_lines[puzzle.buggy_line], "  int x = y;");
    }

    #[test]
    fn new_rejects_out_of_range_line() {
        let err = Puzzle::new("p", "a\nb", 2, "x").unwrap_err();
        assert!(matches!(err, GameError::InvalidPuzzle { .. }));
    }

    #[test]
    fn new_rejects_empty_code() {
        let err = Puzzle::new("p", "\n\n", 0, "x").unwrap_err();
        assert!(matches!(err, GameError::InvalidPuzzle { .. }));
    }

    #[test]
    fn hint_text_falls_back_to_subtype() {
        let mut puzzle = Puzzle::new("p", "a", 0, "x").unwrap();
        puzzle.meta.subtype = "operation error".to_string();
        assert_eq!(puzzle.hint_text(), "operation error");

        let puzzle = puzzle.with_hint("Undefined variable");
        assert_eq!(puzzle.hint_text(), "Undefined variable");
    }

    #[test]
    fn record_without_curated_line_is_invalid() {
        let record: BugRecord = serde_json::from_str(
            r#"{"slug": "s", "buggy_code": "x", "bug_explanation": "y"}"#,
        )
        .unwrap();
        assert!(Puzzle::try_from(record).is_err());
    }
}
