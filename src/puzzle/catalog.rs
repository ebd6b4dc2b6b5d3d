use crate::error::GameError;

use super::types::{Puzzle, PuzzleMeta};

/// Ordered, read-only set of puzzles. Never empty.
#[derive(Debug, Clone)]
pub struct PuzzleCatalog {
    puzzles: Vec<Puzzle>,
}

impl PuzzleCatalog {
    pub fn load(puzzles: Vec<Puzzle>) -> Result<Self, GameError> {
        if puzzles.is_empty() {
            return Err(GameError::CatalogEmpty);
        }
        for (index, puzzle) in puzzles.iter().enumerate() {
            let id = puzzle.id.trim();
            if puzzles[..index]
                .iter()
                .any(|earlier| earlier.id.trim().eq_ignore_ascii_case(id))
            {
                return Err(GameError::invalid_puzzle(id, "duplicate puzzle id"));
            }
        }
        log::info!("catalog ready with {} puzzles", puzzles.len());
        Ok(PuzzleCatalog { puzzles })
    }

    /// The sample levels that ship with the game.
    pub fn builtin() -> Result<Self, GameError> {
        Self::load(builtin_puzzles()?)
    }

    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }

    pub fn puzzles(&self) -> &[Puzzle] {
        &self.puzzles
    }

    /// `index` wraps around the catalog.
    pub fn get(&self, index: usize) -> &Puzzle {
        &self.puzzles[index % self.puzzles.len()]
    }

    /// Puzzle after `current`, wrapping to the start.
    pub fn next(&self, current: usize) -> (&Puzzle, usize) {
        let len = self.puzzles.len();
        let index = (current % len + 1) % len;
        (&self.puzzles[index], index)
    }

    pub fn by_id(&self, id: &str) -> Result<&Puzzle, GameError> {
        self.index_of(id)
            .map(|index| &self.puzzles[index])
            .ok_or_else(|| GameError::puzzle_not_found(id))
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        let trimmed = id.trim();
        self.puzzles
            .iter()
            .position(|p| p.id.eq_ignore_ascii_case(trimmed))
    }
}

fn meta(category: &str, level: &str, language: &str, subtype: &str) -> PuzzleMeta {
    PuzzleMeta {
        category: category.to_string(),
        level: level.to_string(),
        language: language.to_string(),
        subtype: subtype.to_string(),
        examples: Vec::new(),
    }
}

fn builtin_puzzles() -> Result<Vec<Puzzle>, GameError> {
    Ok(vec![
        Puzzle::new(
            "add-undefined",
            "func add(a, b) {\n  return a + c\n}",
            1,
            "The function returns `a + c`, but `c` is never declared. It should be `a + b`.",
        )?
        .with_question("Return the sum of the two arguments.")
        .with_solution("  return a + b")
        .with_hint("Undefined variable")
        .with_meta(meta("reference error", "easy", "swift", "undefined objects")),
        Puzzle::new(
            "loop-bounds",
            "for i in 0...5 {\n  print(items[i])\n}",
            1,
            "The closed range 0...5 visits index 5, one past the end of a five-item array.",
        )?
        .with_question("Print each of the five items.")
        .with_solution("for i in 0..<5 {")
        .with_hint("Out of bounds")
        .with_meta(meta("logic error", "easy", "swift", "index out of range")),
        Puzzle::new(
            "assign-vs-equal",
            "if x = 10 {\n  print(\"Hi\")\n}",
            0,
            "`x = 10` assigns instead of comparing. The condition needs `==`.",
        )?
        .with_question("Greet when x is ten.")
        .with_solution("if x == 10 {")
        .with_hint("Assignment vs Equality")
        .with_meta(meta("syntax error", "easy", "swift", "misused == or =")),
        Puzzle::new(
            "uninitialized",
            "let name: String\nprint(name)\nname = \"Dev\"",
            1,
            "`name` is printed before anything has been assigned to it.",
        )?
        .with_question("Print the developer's name.")
        .with_solution("let name = \"Dev\"\nprint(name)")
        .with_hint("Used before initialized")
        .with_meta(meta("reference error", "easy", "swift", "undefined objects")),
        Puzzle::new(
            "single-number",
            "for(int i=0;i<nums.size();i++){\n  mp[nums[i]] = 1; \n}",
            1,
            "Instead of incrementing the map's value, we are setting it to 1 each time.",
        )?
        .with_question(
            "Given a non-empty array of integers nums, every element appears twice except for one. Find that single one.",
        )
        .with_solution("mp[nums[i]]++;")
        .with_meta(PuzzleMeta {
            examples: vec!["Input: [2,2,1] Output: 1".to_string()],
            ..meta("logic error", "easy", "cpp", "operation error")
        }),
    ])
}
