use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use time_humanize::{Accuracy, HumanTime, Tense};

use klaw::stats::TokenSummary;

use crate::{App, SortBy};

/// Pure presenter for a single letter row of the stats table.
pub fn present_row(summary: &TokenSummary) -> Row<'static> {
    let rate_color = if summary.win_rate >= 60.0 {
        Color::Green
    } else if summary.win_rate >= 30.0 {
        Color::Yellow
    } else {
        Color::Red
    };

    let wrong_color = if summary.wrong_grabs == 0 {
        Color::Green
    } else {
        Color::Red
    };

    let last_caught = summary
        .last_caught
        .map(|dt| {
            let secs = (Local::now() - dt).num_seconds().max(0) as u64;
            HumanTime::from(std::time::Duration::from_secs(secs))
                .to_text_en(Accuracy::Rough, Tense::Past)
        })
        .unwrap_or_else(|| "—".to_string());

    Row::new(vec![
        Cell::from(summary.letter.to_uppercase().to_string())
            .style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from(summary.attempts.to_string()),
        Cell::from(summary.wins.to_string()),
        Cell::from(format!("{:.0}", summary.win_rate)).style(Style::default().fg(rate_color)),
        Cell::from(summary.wrong_grabs.to_string()).style(Style::default().fg(wrong_color)),
        Cell::from(last_caught),
    ])
}

/// Render the per-letter catch statistics screen.
pub fn render_catch_stats(app: &mut App, f: &mut Frame) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(0),    // Stats table
            Constraint::Length(4), // Instructions
        ])
        .split(area);

    let sort_direction = if app.catch_stats_state.sort_ascending {
        "↑"
    } else {
        "↓"
    };
    let sort_by_text = match app.catch_stats_state.sort_by {
        SortBy::Letter => "Letter",
        SortBy::Attempts => "Attempts",
        SortBy::WinRate => "Win Rate",
        SortBy::WrongGrabs => "Wrong Grabs",
    };
    let title_text = format!("Catch Statistics (Sort: {sort_by_text} {sort_direction})");

    let title = Paragraph::new(title_text)
        .block(Block::default().borders(Borders::ALL).title("Stats"))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let mut summaries = app.game.token_summaries().unwrap_or_default();
    if !summaries.is_empty() {
        let asc = app.catch_stats_state.sort_ascending;
        match app.catch_stats_state.sort_by {
            SortBy::Letter => summaries.sort_by(|a, b| {
                let cmp = a.letter.cmp(&b.letter);
                if asc {
                    cmp
                } else {
                    cmp.reverse()
                }
            }),
            SortBy::Attempts => summaries.sort_by(|a, b| {
                let cmp = a.attempts.cmp(&b.attempts);
                if asc {
                    cmp
                } else {
                    cmp.reverse()
                }
            }),
            SortBy::WinRate => summaries.sort_by(|a, b| {
                let cmp = a
                    .win_rate
                    .partial_cmp(&b.win_rate)
                    .unwrap_or(std::cmp::Ordering::Equal);
                if asc {
                    cmp
                } else {
                    cmp.reverse()
                }
            }),
            SortBy::WrongGrabs => summaries.sort_by(|a, b| {
                let cmp = a.wrong_grabs.cmp(&b.wrong_grabs);
                if asc {
                    cmp
                } else {
                    cmp.reverse()
                }
            }),
        }

        // Calculate scrolling bounds
        let table_height = chunks[1].height.saturating_sub(3) as usize; // borders + header
        let total_rows = summaries.len();
        let max_scroll = total_rows.saturating_sub(table_height);
        if app.catch_stats_state.scroll_offset > max_scroll {
            app.catch_stats_state.scroll_offset = max_scroll;
        }

        let indicator = |matches: bool| if matches { sort_direction } else { "" };
        let header = Row::new(vec![
            Cell::from(format!(
                "Letter {}",
                indicator(matches!(app.catch_stats_state.sort_by, SortBy::Letter))
            )),
            Cell::from(format!(
                "Attempts {}",
                indicator(matches!(app.catch_stats_state.sort_by, SortBy::Attempts))
            )),
            Cell::from("Wins"),
            Cell::from(format!(
                "Win Rate (%) {}",
                indicator(matches!(app.catch_stats_state.sort_by, SortBy::WinRate))
            )),
            Cell::from(format!(
                "Wrong Grabs {}",
                indicator(matches!(app.catch_stats_state.sort_by, SortBy::WrongGrabs))
            )),
            Cell::from("Last Caught"),
        ])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

        let visible_rows: Vec<Row> = summaries
            .iter()
            .skip(app.catch_stats_state.scroll_offset)
            .take(table_height)
            .map(present_row)
            .collect();

        let widths = [
            Constraint::Length(9),  // Letter
            Constraint::Length(11), // Attempts
            Constraint::Length(6),  // Wins
            Constraint::Length(15), // Win Rate
            Constraint::Length(14), // Wrong Grabs
            Constraint::Min(10),    // Last Caught
        ];

        let table = Table::new(visible_rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title("Catch Stats"))
            .column_spacing(2);

        f.render_widget(table, chunks[1]);
    } else {
        let no_data = Paragraph::new("No catches recorded yet. Play a round to collect data.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(no_data, chunks[1]);
    }

    let instructions = Paragraph::new(
        "(↑/↓) scroll  (PgUp/PgDn) page  (Home) top  (1-4) sort  (space) direction  (b/backspace) back  (r) play again",
    )
    .alignment(Alignment::Center)
    .wrap(ratatui::widgets::Wrap { trim: true });
    f.render_widget(instructions, chunks[2]);
}
