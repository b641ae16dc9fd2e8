pub mod catch_stats;

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use klaw::alphabet::full_alphabet;
use klaw::catch::CatchOutcome;
use klaw::game::ClawPhase;
use klaw::round::Capsule;

use crate::{App, Screen, TIME_OPTIONS};

const HORIZONTAL_MARGIN: u16 = 4;
/// Letter grid columns; cursor movement in main.rs steps by this.
pub const LETTERS_PER_ROW: usize = 7;
const LETTER_CELL_WIDTH: usize = 5;

/// Top-level render dispatch, one arm per screen.
pub fn draw(app: &mut App, f: &mut Frame) {
    match app.screen {
        Screen::CatchStats => catch_stats::render_catch_stats(app, f),
        _ => f.render_widget(&*app, f.area()),
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.screen {
            Screen::LetterSelect => render_letter_select(self, area, buf),
            Screen::TimeSelect => render_time_select(self, area, buf),
            Screen::Playing => render_machine(self, area, buf),
            Screen::Result => render_result(self, area, buf),
            Screen::CatchStats => {}
        }
    }
}

fn render_letter_select(app: &App, area: Rect, buf: &mut Buffer) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let selected_style = Style::default().patch(bold).fg(Color::Green);
    let dim = Style::default().add_modifier(Modifier::DIM);

    let alphabet = full_alphabet();
    let grid_rows = alphabet.len().div_ceil(LETTERS_PER_ROW) as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(
            [
                Constraint::Min(2),
                Constraint::Length(2),
                Constraint::Length(grid_rows),
                Constraint::Length(2),
                Constraint::Min(2),
            ]
            .as_ref(),
        )
        .split(area);

    let title = Paragraph::new(vec![
        Line::styled("K L A W", bold.fg(Color::Cyan)),
        Line::styled(
            format!("pick the letters to practice ({}/26 selected)", app.game.pool.len()),
            dim,
        ),
    ])
    .alignment(Alignment::Center);
    title.render(chunks[1], buf);

    let mut lines = Vec::with_capacity(grid_rows as usize);
    for row in &alphabet.iter().enumerate().chunks(LETTERS_PER_ROW) {
        let mut spans = Vec::new();
        for (idx, token) in row {
            let pair = token.pair();
            let pad = LETTER_CELL_WIDTH.saturating_sub(1 + pair.width());
            let cell = format!(" {}{}", pair, " ".repeat(pad));

            let mut style = if app.game.pool.contains(*token) {
                selected_style
            } else {
                dim
            };
            if idx == app.grid_cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled(cell, style));
        }
        lines.push(Line::from(spans).alignment(Alignment::Center));
    }
    Paragraph::new(lines).render(chunks[2], buf);

    let footer = if let Some(warning) = &app.warning {
        Paragraph::new(Span::styled(
            warning.clone(),
            Style::default().patch(bold).fg(Color::Red),
        ))
    } else {
        Paragraph::new(Span::styled(
            "(arrows) move  (space) toggle  (a) all  (n) none  (m) mute  (enter) play  (esc) quit",
            dim,
        ))
    };
    footer
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[3], buf);
}

fn render_time_select(app: &App, area: Rect, buf: &mut Buffer) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().add_modifier(Modifier::DIM);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(
            [
                Constraint::Min(2),
                Constraint::Length(2),
                Constraint::Length(TIME_OPTIONS.len() as u16),
                Constraint::Length(2),
                Constraint::Min(2),
            ]
            .as_ref(),
        )
        .split(area);

    Paragraph::new(Line::styled("HOW LONG?", bold))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let lines: Vec<Line> = TIME_OPTIONS
        .iter()
        .enumerate()
        .map(|(idx, secs)| {
            let marker = if *secs == app.last_duration_secs {
                "•"
            } else {
                " "
            };
            let label = format!("({}) {:>3} seconds {}", idx + 1, secs, marker);
            let style = if idx == app.time_cursor {
                bold.add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            Line::styled(label, style).alignment(Alignment::Center)
        })
        .collect();
    Paragraph::new(lines).render(chunks[2], buf);

    Paragraph::new(Span::styled(
        "(1-4 or enter) start  (esc) back to letters",
        dim,
    ))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);
}

fn render_machine(app: &App, area: Rect, buf: &mut Buffer) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().add_modifier(Modifier::DIM);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(2)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Min(8),
                Constraint::Length(1),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(area);

    // score / timer header
    let header = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(chunks[0]);
    Paragraph::new(Span::styled(
        format!("SCORE {}", app.game.score()),
        bold.fg(Color::Yellow),
    ))
    .render(header[0], buf);
    Paragraph::new(Span::styled(
        format!("TIME {:>3}s", app.game.session.time_remaining),
        bold,
    ))
    .alignment(Alignment::Right)
    .render(header[1], buf);

    // the glass cabinet
    let block = Block::default().borders(Borders::ALL).title("klaw");
    let inner = block.inner(chunks[1]);
    block.render(chunks[1], buf);
    if inner.width > 2 && inner.height > 3 {
        render_cabinet(app, inner, buf);
    }

    // feedback line
    let feedback = match app.game.last_outcome {
        Some(CatchOutcome::Win { points }) => {
            Span::styled(format!("GRAB! +{}", points), bold.fg(Color::Green))
        }
        Some(CatchOutcome::NearMiss) => Span::styled("Oh, so close!", bold.fg(Color::Yellow)),
        Some(CatchOutcome::WrongGrab { penalty }) => {
            Span::styled(format!("Try again ({})", penalty), bold.fg(Color::Red))
        }
        None => Span::styled("listen, then catch the letter you heard", dim),
    };
    Paragraph::new(feedback)
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

    Paragraph::new(Span::styled(
        "(←/→) move  (space) catch  (l) listen  (m) mute  (esc) menu",
        dim,
    ))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);
}

/// Draw rail, rod, claw and capsules into the cabinet interior.
fn render_cabinet(app: &App, inner: Rect, buf: &mut Buffer) {
    let game = &app.game;
    let width = inner.width as usize;
    let claw_col = percent_to_col(game.session.claw_position, width);

    // rail with the trolley on it
    let mut rail: Vec<char> = std::iter::repeat('═').take(width).collect();
    rail[claw_col.min(width - 1)] = '╤';
    buf.set_string(
        inner.x,
        inner.y,
        rail.iter().collect::<String>(),
        Style::default().add_modifier(Modifier::DIM),
    );

    // rod depth scales with how far into the descend/retract the claw is
    let rod_span = inner.height.saturating_sub(3) as usize;
    let depth = (game.phase.rod_extension() * rod_span as f64).round() as usize;
    for r in 0..depth {
        buf.set_string(
            inner.x + claw_col as u16,
            inner.y + 1 + r as u16,
            "│",
            Style::default(),
        );
    }
    let head_row = inner.y + 1 + depth as u16;
    let head = if claw_is_closed(game.phase) { "▼" } else { "▽" };
    buf.set_string(inner.x + claw_col as u16, head_row, head, Style::default());

    // a held capsule rides just under the head
    if let Some(held) = held_capsule(app) {
        if head_row + 1 < inner.y + inner.height {
            buf.set_string(
                inner.x + claw_col as u16,
                head_row + 1,
                held.token.pair(),
                Style::default()
                    .fg(capsule_color(held.hue))
                    .add_modifier(Modifier::BOLD),
            );
        }
    }

    // prize chute sits at the far left of the floor
    let floor_y = inner.y + inner.height - 1;
    buf.set_string(inner.x, floor_y, "▣", Style::default().add_modifier(Modifier::DIM));

    // capsules on the floor
    if let Some(round) = &game.round {
        let hidden_idx = hidden_capsule_index(game.phase);
        for (i, capsule) in round.capsules.iter().enumerate() {
            if Some(i) == hidden_idx {
                continue;
            }
            let col = percent_to_col(capsule.position_x, width);
            buf.set_string(
                inner.x + col as u16,
                floor_y,
                capsule.token.pair(),
                Style::default()
                    .fg(capsule_color(capsule.hue))
                    .add_modifier(Modifier::BOLD),
            );
        }
    }
}

fn percent_to_col(percent: f64, width: usize) -> usize {
    let col = (percent / 100.0 * width.saturating_sub(1) as f64).round() as usize;
    col.min(width.saturating_sub(1))
}

fn claw_is_closed(phase: ClawPhase) -> bool {
    matches!(
        phase,
        ClawPhase::Grabbing { .. }
            | ClawPhase::Retracting { .. }
            | ClawPhase::Carrying { .. }
            | ClawPhase::DroppingBack { .. }
    )
}

/// Capsule riding under the claw head.
fn held_capsule_index(phase: ClawPhase) -> Option<usize> {
    match phase {
        ClawPhase::Retracting {
            caught: Some(idx), ..
        } => Some(idx),
        ClawPhase::Carrying { caught, .. } => Some(caught),
        ClawPhase::DroppingBack { caught, .. } => Some(caught),
        _ => None,
    }
}

/// Capsule absent from the floor: everything held, plus the one falling
/// into the chute.
fn hidden_capsule_index(phase: ClawPhase) -> Option<usize> {
    match phase {
        ClawPhase::Releasing { caught, .. } => Some(caught),
        other => held_capsule_index(other),
    }
}

fn held_capsule(app: &App) -> Option<Capsule> {
    let round = app.game.round.as_ref()?;
    let idx = held_capsule_index(app.game.phase)?;
    round.capsules.get(idx).copied()
}

/// hsl(hue, 75%, 65%), the capsule palette.
fn capsule_color(hue: u16) -> Color {
    let h = f64::from(hue % 360) / 60.0;
    let s = 0.75;
    let l = 0.65;
    let c = (1.0 - (2.0 * l - 1.0f64).abs()) * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    Color::Rgb(
        ((r + m) * 255.0) as u8,
        ((g + m) * 255.0) as u8,
        ((b + m) * 255.0) as u8,
    )
}

fn render_result(app: &App, area: Rect, buf: &mut Buffer) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().add_modifier(Modifier::DIM);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(
            [
                Constraint::Min(2),
                Constraint::Length(4),
                Constraint::Length(2),
                Constraint::Min(2),
            ]
            .as_ref(),
        )
        .split(area);

    let summary = vec![
        Line::styled("TIME'S UP!", bold.fg(Color::Cyan)),
        Line::raw(""),
        Line::styled(format!("FINAL SCORE  {}", app.game.score()), bold.fg(Color::Yellow)),
        Line::styled(format!("letters caught  {}", app.game.rounds_won), dim),
    ];
    Paragraph::new(summary)
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    Paragraph::new(Span::styled(
        "(r) play again  (n) change letters  (s) stats  (esc) quit",
        dim,
    ))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);
}
