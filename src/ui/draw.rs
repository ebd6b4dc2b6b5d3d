use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::game::{Feedback, MAX_GUESSES, MAX_LIVES};

use super::app::{AiHint, App, MenuOption, Screen};

fn feedback_color(feedback: Feedback) -> Color {
    match feedback {
        Feedback::Exact => Color::Green,
        Feedback::Near => Color::Yellow,
        Feedback::Far => Color::DarkGray,
    }
}

pub fn draw_ui(f: &mut Frame, app: &App) {
    if app.screen() == Screen::TitleScreen {
        draw_title_screen(f, app);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
            Constraint::Length(7),
        ])
        .split(f.area());

    draw_status_bar(f, app, chunks[0]);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(chunks[1]);

    draw_problem(f, app, main_chunks[0]);
    draw_code(f, app, main_chunks[1]);
    draw_guess_row(f, app, chunks[2]);
    draw_message(f, app, chunks[3]);

    if app.screen() == Screen::Solution {
        draw_solution(f, app);
    }
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let state = app.engine().state();
    let puzzle = app.puzzle();
    let lives = state.lives_remaining;

    let status = Line::from(vec![
        Span::styled(
            " BUGDLE ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ),
        Span::raw("  "),
        Span::styled(
            format!(" {} ", puzzle.id),
            Style::default().fg(Color::White).bg(Color::DarkGray),
        ),
        Span::raw("  "),
        Span::styled(
            format!(" Bug {}/{} ", app.current_index() + 1, app.catalog().len()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("  "),
        Span::styled(
            format!(" {} ", display_or(&puzzle.meta.level, "?").to_uppercase()),
            Style::default().fg(Color::Magenta),
        ),
        Span::raw("  "),
        Span::styled(
            format!(" {} ", display_or(&puzzle.meta.language, "...").to_uppercase()),
            Style::default().fg(Color::Blue),
        ),
        Span::raw("  "),
        Span::styled(
            format!(
                " Lives: {}{} ",
                "♥".repeat(lives as usize),
                "♡".repeat(MAX_LIVES.saturating_sub(lives) as usize)
            ),
            Style::default().fg(lives_color(lives)),
        ),
    ]);
    let status_block = Paragraph::new(status).block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(status_block, area);
}

fn lives_color(lives: u32) -> Color {
    if lives > 3 {
        Color::Green
    } else if lives > 1 {
        Color::Yellow
    } else {
        Color::Red
    }
}

fn display_or<'s>(value: &'s str, fallback: &'s str) -> &'s str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

fn draw_problem(f: &mut Frame, app: &App, area: Rect) {
    let puzzle = app.puzzle();
    let mut lines = vec![Line::from(Span::styled(
        "Problem",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    lines.push(Line::from(display_or(
        &puzzle.question,
        "Which line hides the bug?",
    )));

    if !puzzle.meta.examples.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Examples",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for example in &puzzle.meta.examples {
            lines.push(Line::from(Span::styled(
                example.as_str(),
                Style::default().fg(Color::Gray),
            )));
        }
    }

    if app.engine().state().hint_revealed {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Hint: {}", puzzle.hint_text()),
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )));
    }

    match app.ai_hint() {
        AiHint::Idle => {}
        AiHint::Fetching(_) => {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "AI is analyzing the bug...",
                Style::default().fg(Color::DarkGray),
            )));
        }
        AiHint::Ready(hint) => {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                hint.as_str(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            )));
        }
        AiHint::Unavailable(reason) => {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("AI hint unavailable ({})", reason),
                Style::default().fg(Color::Magenta),
            )));
        }
    }

    let problem = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" The Problem "))
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(Color::White));
    f.render_widget(problem, area);
}

fn draw_code(f: &mut Frame, app: &App, area: Rect) {
    let engine = app.engine();
    let history = &engine.state().guess_history;
    let puzzle = app.puzzle();
    let width = puzzle.line_count().to_string().len();

    let lines: Vec<Line> = puzzle
        .code_lines
        .iter()
        .enumerate()
        .map(|(index, code)| {
            let number = Span::styled(
                format!("{:>width$} ", index, width = width),
                Style::default().fg(Color::DarkGray),
            );
            let style = match engine.feedback_for(index) {
                Some(feedback) if history.contains(&index) => Style::default()
                    .fg(Color::Black)
                    .bg(feedback_color(feedback)),
                _ => Style::default().fg(Color::White),
            };
            Line::from(vec![number, Span::styled(code.as_str(), style)])
        })
        .collect();

    let code = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Buggy Code [F1: Hint | F2: AI | Ctrl+R: New | :q Quit] "),
    );
    f.render_widget(code, area);
}

fn draw_guess_row(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(18),
            Constraint::Length(MAX_GUESSES as u16 * 3 + 2),
            Constraint::Min(10),
        ])
        .split(area);

    f.render_widget(&app.guess_input, chunks[0]);

    let state = app.engine().state();
    let mut slots = Vec::new();
    for i in 0..MAX_GUESSES {
        let span = match state
            .guess_history
            .get(i)
            .and_then(|guess| app.engine().feedback_for(*guess))
        {
            Some(feedback) => Span::styled("■", Style::default().fg(feedback_color(feedback))),
            None => Span::styled("□", Style::default().fg(Color::DarkGray)),
        };
        slots.push(span);
        slots.push(Span::raw("  "));
    }
    let grid = Paragraph::new(Line::from(slots))
        .block(Block::default().borders(Borders::ALL).title(" Guesses "));
    f.render_widget(grid, chunks[1]);

    let status_style = if state.is_game_over {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let status = Paragraph::new(state.status.to_string())
        .style(status_style)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, chunks[2]);
}

fn draw_message(f: &mut Frame, app: &App, area: Rect) {
    let (content, style, title) = if app.command_mode {
        (
            format!(":{}", app.command_buffer),
            Style::default().fg(Color::White).bg(Color::DarkGray),
            " Command ".to_string(),
        )
    } else {
        let scroll_keys = if cfg!(target_os = "macos") {
            "Fn+Up/Down"
        } else {
            "PgUp/PgDn"
        };
        let title = if app.message().lines().count() > 4 {
            format!(" Debugger Whispers [{} to scroll] ", scroll_keys)
        } else {
            " Debugger Whispers ".to_string()
        };
        (app.message().to_string(), app.message_style(), title)
    };

    let message = Paragraph::new(content)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false })
        .style(style)
        .scroll((app.message_scroll, 0));
    f.render_widget(message, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn draw_solution(f: &mut Frame, app: &App) {
    let Ok(solution) = app.engine().reveal_solution() else {
        return;
    };
    let area = centered_rect(70, 60, f.area());

    let mut lines = vec![
        Line::from(Span::styled(
            format!("The bug is on line {}:", solution.buggy_line),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            app.puzzle().code_lines[solution.buggy_line].as_str(),
            Style::default().fg(Color::Red),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "The Bug:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(solution.explanation),
    ];
    if let Some(fix) = solution.solution {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Correct Logic:",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for line in fix.lines() {
            lines.push(Line::from(Span::styled(line, Style::default().fg(Color::Green))));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[ ENTER / Esc: got it ]",
        Style::default().fg(Color::DarkGray),
    )));

    let popup = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Bug Analysis ")
                .style(Style::default().bg(Color::Black)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

fn draw_title_screen(f: &mut Frame, app: &App) {
    let area = f.area();

    let title_art = r#"
    ╔═══════════════════════════════════════════════════════╗
    ║                                                       ║
    ║   ██████╗ ██╗   ██╗ ██████╗ ██████╗ ██╗     ███████╗  ║
    ║   ██╔══██╗██║   ██║██╔════╝ ██╔══██╗██║     ██╔════╝  ║
    ║   ██████╔╝██║   ██║██║  ███╗██║  ██║██║     █████╗    ║
    ║   ██╔══██╗██║   ██║██║   ██║██║  ██║██║     ██╔══╝    ║
    ║   ██████╔╝╚██████╔╝╚██████╔╝██████╔╝███████╗███████╗  ║
    ║   ╚═════╝  ╚═════╝  ╚═════╝ ╚═════╝ ╚══════╝╚══════╝  ║
    ║                                                       ║
    ║          "Six guesses. One buggy line."               ║
    ║                                                       ║
    ╚═══════════════════════════════════════════════════════╝
"#;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(15),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(area);

    let title = Paragraph::new(title_art)
        .style(Style::default().fg(Color::Green))
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let selected = Style::default()
        .fg(Color::Black)
        .bg(Color::Green)
        .add_modifier(Modifier::BOLD);
    let idle = Style::default().fg(Color::White);

    let new_game = Paragraph::new("  NEW GAME  ")
        .style(if app.menu_selection == MenuOption::NewGame {
            selected
        } else {
            idle
        })
        .alignment(Alignment::Center);
    f.render_widget(new_game, chunks[1]);

    let quit = Paragraph::new("  QUIT  ")
        .style(if app.menu_selection == MenuOption::Quit {
            selected
        } else {
            idle
        })
        .alignment(Alignment::Center);
    f.render_widget(quit, chunks[2]);

    let help = Paragraph::new("↑/↓ to select  •  ENTER to confirm  •  q to quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[3]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lives_turn_red_as_they_run_out() {
        assert_eq!(lives_color(MAX_LIVES), Color::Green);
        assert_eq!(lives_color(4), Color::Green);
        assert_eq!(lives_color(3), Color::Yellow);
        assert_eq!(lives_color(2), Color::Yellow);
        assert_eq!(lives_color(1), Color::Red);
    }
}
