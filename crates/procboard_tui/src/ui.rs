//! Draw code for the three tabbed views.
//!
//! # Responsibility
//! - Render the tab bar, the per-tab widgets and the bottom info line from
//!   an immutable `App` snapshot.
//! - Keep all layout and styling decisions out of the state code.

use crate::app::{AddField, App, Tab, TAB_TITLES};
use procboard_core::report;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};
use ratatui::Frame;
use time::macros::format_description;
use time::OffsetDateTime;

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let tabs = Tabs::new(
        TAB_TITLES
            .iter()
            .map(|title| Line::from(*title))
            .collect::<Vec<_>>(),
    )
    .select(app.tab.index())
    .block(Block::default().borders(Borders::ALL).title("procboard"))
    .highlight_style(Style::default().fg(Color::Yellow));
    frame.render_widget(tabs, chunks[0]);

    match app.tab {
        Tab::Add => draw_add(frame, chunks[1], app),
        Tab::Pending => draw_pending(frame, chunks[1], app),
        Tab::Closed => draw_closed(frame, chunks[1], app),
    }

    let info = Paragraph::new(Line::from(vec![
        Span::styled("Info: ", Style::default().fg(Color::Gray)),
        Span::raw(app.info.clone()),
    ]));
    frame.render_widget(info, chunks[2]);
}

fn draw_add(frame: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    draw_input(
        frame,
        rows[0],
        "Process number",
        &app.number_input,
        app.focus == AddField::Number,
    );
    draw_input(
        frame,
        rows[1],
        "Submitter name",
        &app.submitter_input,
        app.focus == AddField::Submitter,
    );

    let hint = Paragraph::new(Line::from(vec![
        key_span("Enter"),
        Span::raw(": submit, "),
        key_span("Up/Down"),
        Span::raw(": switch field, "),
        key_span("Tab"),
        Span::raw(": next view, "),
        key_span("Esc"),
        Span::raw(": quit"),
    ]));
    frame.render_widget(hint, rows[2]);

    draw_input(
        frame,
        rows[3],
        "Remove every record with number",
        &app.remove_input,
        app.focus == AddField::Remove,
    );
}

fn draw_input(frame: &mut Frame, area: Rect, title: &str, value: &str, focused: bool) {
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let input = Paragraph::new(value.to_string()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title.to_string())
            .border_style(border_style),
    );
    frame.render_widget(input, area);

    if focused {
        let cursor_x = area.x + value.chars().count() as u16 + 1;
        frame.set_cursor_position(Position::new(cursor_x, area.y + 1));
    }
}

fn draw_pending(frame: &mut Frame, area: Rect, app: &App) {
    let pending = report::pending(&app.records);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let mut lines = Vec::new();
    if pending.is_empty() {
        lines.push(Line::from(Span::styled(
            "No pending processes.",
            Style::default().fg(Color::Green),
        )));
    } else {
        for record in &pending {
            lines.push(Line::from(vec![
                Span::styled(
                    record.number.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" - {}", record.submitter)),
                Span::styled(
                    format!("  submitted {}", format_epoch_ms(record.submitted_at)),
                    Style::default().fg(Color::Gray),
                ),
            ]));
        }
    }
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Pending processes ({})", pending.len())),
        ),
        cols[0],
    );

    frame.render_widget(
        Paragraph::new(report::pending_numbers_block(&app.records))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Copy for the administrator"),
            ),
        cols[1],
    );
}

fn draw_closed(frame: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Min(0),
        ])
        .split(area);

    let hint = Paragraph::new(Line::from(vec![
        key_span("Space"),
        Span::raw(": close selected, "),
        key_span("a"),
        Span::raw(": close all, "),
        key_span("p"),
        Span::raw(": clear history, "),
        key_span("j/k"),
        Span::raw(": move, "),
        key_span("q"),
        Span::raw(": quit"),
    ]));
    frame.render_widget(hint, rows[0]);

    let pending = report::pending(&app.records);
    let mut checklist = Vec::new();
    if pending.is_empty() {
        checklist.push(Line::from(Span::styled(
            "No pending processes.",
            Style::default().fg(Color::Green),
        )));
    } else {
        for (index, record) in pending.iter().enumerate() {
            let marker = if index == app.selected { "› " } else { "  " };
            let style = if index == app.selected {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            checklist.push(Line::from(Span::styled(
                format!("{marker}[ ] {} - {}", record.number, record.submitter),
                style,
            )));
        }
    }
    frame.render_widget(
        Paragraph::new(checklist).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Close pending processes"),
        ),
        rows[1],
    );

    let closed = report::closed_latest_first(&app.records);
    let mut history = Vec::new();
    if closed.is_empty() {
        history.push(Line::from(Span::styled(
            "No closed processes yet.",
            Style::default().fg(Color::Green),
        )));
    } else {
        for record in &closed {
            let closed_at = record
                .closed_at
                .map(format_epoch_ms)
                .unwrap_or_else(|| String::from("-"));
            history.push(Line::from(vec![
                Span::styled(
                    record.number.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" - {}", record.submitter)),
                Span::styled(
                    format!("  closed {closed_at}"),
                    Style::default().fg(Color::Gray),
                ),
            ]));
        }
    }
    frame.render_widget(
        Paragraph::new(history).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Closed history ({})", closed.len())),
        ),
        rows[2],
    );

    frame.render_widget(
        Paragraph::new(report::closed_digest(&app.records))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Copy closed digest"),
            ),
        rows[3],
    );
}

fn key_span(label: &str) -> Span<'static> {
    Span::styled(label.to_string(), Style::default().fg(Color::Magenta))
}

/// Formats an epoch-millisecond timestamp as `DD/MM/YYYY HH:MM` (UTC).
fn format_epoch_ms(epoch_ms: i64) -> String {
    let format = format_description!("[day]/[month]/[year] [hour]:[minute]");
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(epoch_ms) * 1_000_000)
        .ok()
        .and_then(|timestamp| timestamp.format(format).ok())
        .unwrap_or_else(|| String::from("-"))
}
