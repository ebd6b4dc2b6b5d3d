//! Terminal front end: owns the engine and translates keys into game calls

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    style::{Color, Modifier, Style},
    widgets::{Block, Borders},
};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tui_textarea::TextArea;

use crate::error::GameError;
use crate::game::{GuessEngine, GuessOutcome};
use crate::hint::{HintProvider, HintResult, HintTask};
use crate::puzzle::{Puzzle, PuzzleCatalog};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    TitleScreen,
    Playing,
    Solution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    NewGame,
    Quit,
}

impl MenuOption {
    fn next(&self) -> Self {
        match self {
            MenuOption::NewGame => MenuOption::Quit,
            MenuOption::Quit => MenuOption::NewGame,
        }
    }
}

/// Progress of the AI hint for the current puzzle.
pub enum AiHint {
    Idle,
    Fetching(HintTask),
    Ready(String),
    Unavailable(String),
}

impl AiHint {
    pub fn is_fetching(&self) -> bool {
        matches!(self, AiHint::Fetching(_))
    }
}

const READY_MESSAGE: &str = "Type a line number and press ENTER. F1 hint, F2 ask the AI.";

pub struct App<'a> {
    catalog: PuzzleCatalog,
    current: usize,
    engine: GuessEngine,
    pub(super) guess_input: TextArea<'a>,
    message: String,
    message_style: Style,
    pub(super) message_scroll: u16,
    screen: Screen,
    pub(super) menu_selection: MenuOption,
    ai_hint: AiHint,
    hints: Arc<dyn HintProvider>,
    runtime: Handle,
    hint_timeout: Duration,
    pub(super) command_mode: bool,
    pub(super) command_buffer: String,
    should_quit: bool,
    solved: u32,
    played: u32,
}

fn guess_input<'a>() -> TextArea<'a> {
    let mut input = TextArea::default();
    input.set_block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Line # [ENTER] "),
    );
    input.set_cursor_line_style(Style::default());
    input.set_placeholder_text("e.g. 2");
    input
}

impl<'a> App<'a> {
    pub fn new(
        catalog: PuzzleCatalog,
        start: usize,
        hints: Arc<dyn HintProvider>,
        runtime: Handle,
        hint_timeout: Duration,
    ) -> Self {
        App {
            current: start % catalog.len(),
            catalog,
            engine: GuessEngine::new(),
            guess_input: guess_input(),
            message: String::from(READY_MESSAGE),
            message_style: Style::default().fg(Color::Yellow),
            message_scroll: 0,
            screen: Screen::TitleScreen,
            menu_selection: MenuOption::NewGame,
            ai_hint: AiHint::Idle,
            hints,
            runtime,
            hint_timeout,
            command_mode: false,
            command_buffer: String::new(),
            should_quit: false,
            solved: 0,
            played: 0,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn engine(&self) -> &GuessEngine {
        &self.engine
    }

    pub fn catalog(&self) -> &PuzzleCatalog {
        &self.catalog
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn puzzle(&self) -> &Puzzle {
        self.engine
            .puzzle()
            .unwrap_or_else(|| self.catalog.get(self.current))
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn message_style(&self) -> Style {
        self.message_style
    }

    pub fn ai_hint(&self) -> &AiHint {
        &self.ai_hint
    }

    pub fn guess_text(&self) -> String {
        self.guess_input.lines().join("")
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn solved(&self) -> u32 {
        self.solved
    }

    pub fn played(&self) -> u32 {
        self.played
    }

    fn say(&mut self, message: impl Into<String>, style: Style) {
        self.message = message.into();
        self.message_style = style;
        self.message_scroll = 0;
    }

    pub fn start_game(&mut self) {
        self.screen = Screen::Playing;
        self.load_puzzle(self.current);
    }

    fn load_puzzle(&mut self, index: usize) {
        self.current = index;
        let puzzle = self.catalog.get(index).clone();
        self.engine.start_puzzle(puzzle);
        self.played += 1;

        // Replacing the state drops any in-flight fetch, which cancels it
        self.ai_hint = AiHint::Idle;
        self.guess_input = guess_input();
        self.screen = Screen::Playing;
        self.say(READY_MESSAGE, Style::default().fg(Color::Yellow));
    }

    pub fn new_problem(&mut self) {
        let (_, next) = self.catalog.next(self.current);
        self.load_puzzle(next);
    }

    pub fn submit_guess(&mut self) {
        let text = self.guess_text();
        let text = text.trim();
        let line_count = self.puzzle().line_count();

        let guess: i64 = match text.parse() {
            Ok(guess) => guess,
            Err(_) => {
                self.say(
                    format!(
                        "Enter a line number between 0 and {}.",
                        line_count.saturating_sub(1)
                    ),
                    Style::default().fg(Color::Red),
                );
                return;
            }
        };

        let was_over = self.engine.state().is_game_over;
        match self.engine.submit_guess(guess) {
            Ok(outcome) => {
                self.guess_input = guess_input();
                let status = self.engine.state().status.to_string();
                match outcome {
                    GuessOutcome::Correct => {
                        if !was_over {
                            self.solved += 1;
                        }
                        self.say(
                            format!("{}  [ ENTER: next bug | F3: solution ]", status),
                            Style::default()
                                .fg(Color::Green)
                                .add_modifier(Modifier::BOLD),
                        );
                    }
                    GuessOutcome::Exhausted { .. } => {
                        self.say(
                            format!("{}  [ ENTER: next bug | F3: solution ]", status),
                            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                        );
                    }
                    GuessOutcome::Continue(_) => {
                        let left = self.engine.state().guesses_left();
                        self.say(
                            format!("{} ({} guesses left)", status, left),
                            Style::default().fg(Color::Yellow),
                        );
                    }
                }
            }
            Err(e) => self.say(e.to_string(), Style::default().fg(Color::Red)),
        }
    }

    pub fn show_hint(&mut self) {
        match self.engine.request_hint() {
            Ok(hint) => self.say(format!("HINT: {}", hint), Style::default().fg(Color::Cyan)),
            Err(GameError::NoLives) if self.engine.state().hint_revealed => self.say(
                "You already used the hint for this bug.",
                Style::default().fg(Color::DarkGray),
            ),
            Err(e) => self.say(
                format!("{} You're on your own...", e),
                Style::default().fg(Color::DarkGray),
            ),
        }
    }

    /// Charges a life, then fetches the AI hint in the background.
    pub fn ask_ai(&mut self) {
        if self.ai_hint.is_fetching() {
            self.say(
                "The AI is still analyzing the bug...",
                Style::default().fg(Color::DarkGray),
            );
            return;
        }

        if let Err(e) = self.engine.spend_life() {
            self.say(e.to_string(), Style::default().fg(Color::DarkGray));
            return;
        }

        let puzzle = self.puzzle();
        let task = HintTask::spawn(
            &self.runtime,
            Arc::clone(&self.hints),
            puzzle.code(),
            puzzle.explanation.clone(),
            self.hint_timeout,
        );
        self.ai_hint = AiHint::Fetching(task);
        self.say(
            "AI is analyzing the bug...",
            Style::default().fg(Color::Cyan),
        );
    }

    /// Picks up a finished AI hint, if any. Never blocks.
    pub fn poll_hint(&mut self) {
        let result = match &mut self.ai_hint {
            AiHint::Fetching(task) => task.try_take(),
            _ => None,
        };
        let Some(result) = result else {
            return;
        };

        match result {
            HintResult::Ok(hint) => {
                self.say(
                    format!("AI HINT: {}", hint),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
                );
                self.ai_hint = AiHint::Ready(hint);
            }
            HintResult::TimedOut => {
                self.say(
                    "Hint unavailable: the AI took too long to answer.",
                    Style::default().fg(Color::Magenta),
                );
                self.ai_hint = AiHint::Unavailable("timed out".to_string());
            }
            HintResult::Failed(reason) => {
                self.say(
                    format!("Hint unavailable: {}", reason),
                    Style::default().fg(Color::Magenta),
                );
                self.ai_hint = AiHint::Unavailable(reason);
            }
        }
    }

    pub fn show_solution(&mut self) {
        match self.engine.reveal_solution() {
            Ok(_) => self.screen = Screen::Solution,
            Err(e) => self.say(e.to_string(), Style::default().fg(Color::DarkGray)),
        }
    }

    fn run_command(&mut self) {
        self.command_mode = false;
        let command = std::mem::take(&mut self.command_buffer);
        match command.as_str() {
            "q" | "quit" => self.should_quit = true,
            "hint" => self.show_hint(),
            "ai" => self.ask_ai(),
            "new" => self.new_problem(),
            "solution" => self.show_solution(),
            "help" => self.say(
                "Commands: :q (quit), :hint, :ai, :new, :solution",
                Style::default().fg(Color::Cyan),
            ),
            "" => {}
            other => {
                let message = format!("Unknown command: {}", other);
                self.say(message, Style::default().fg(Color::Red));
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.screen {
            Screen::TitleScreen => {
                match key.code {
                    KeyCode::Up | KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('k') => {
                        self.menu_selection = self.menu_selection.next();
                    }
                    KeyCode::Enter => match self.menu_selection {
                        MenuOption::NewGame => self.start_game(),
                        MenuOption::Quit => self.should_quit = true,
                    },
                    KeyCode::Char('q') => self.should_quit = true,
                    _ => {}
                }
                return;
            }
            Screen::Solution => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                    self.screen = Screen::Playing;
                }
                return;
            }
            Screen::Playing => {}
        }

        // Command mode handling (vim-style :q)
        if self.command_mode {
            match key.code {
                KeyCode::Esc => {
                    self.command_mode = false;
                    self.command_buffer.clear();
                }
                KeyCode::Enter => self.run_command(),
                KeyCode::Backspace => {
                    self.command_buffer.pop();
                    if self.command_buffer.is_empty() {
                        self.command_mode = false;
                    }
                }
                KeyCode::Char(c) => self.command_buffer.push(c),
                _ => {}
            }
            return;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Char(':'), KeyModifiers::NONE) => {
                self.command_mode = true;
                self.command_buffer.clear();
            }
            (KeyCode::Esc, _) => {
                self.guess_input = guess_input();
                self.say("Type :q to quit", Style::default().fg(Color::DarkGray));
            }
            (KeyCode::PageDown, _) => {
                let lines = self.message.lines().count() as u16;
                if self.message_scroll < lines.saturating_sub(3) {
                    self.message_scroll += 3;
                }
            }
            (KeyCode::PageUp, _) => {
                self.message_scroll = self.message_scroll.saturating_sub(3);
            }
            (KeyCode::Char('r'), KeyModifiers::CONTROL) => self.new_problem(),
            (KeyCode::F(1), _) => self.show_hint(),
            (KeyCode::F(2), _) => self.ask_ai(),
            (KeyCode::F(3), _) => self.show_solution(),
            (KeyCode::Enter, _) => {
                if self.engine.state().is_game_over {
                    self.new_problem();
                } else {
                    self.submit_guess();
                }
            }
            (KeyCode::Char(c), _) if c.is_ascii_digit() => {
                if !self.engine.state().is_game_over {
                    self.guess_input.input(key);
                }
            }
            (
                KeyCode::Backspace
                | KeyCode::Delete
                | KeyCode::Left
                | KeyCode::Right
                | KeyCode::Home
                | KeyCode::End,
                _,
            ) => {
                self.guess_input.input(key);
            }
            _ => {}
        }
    }
}
