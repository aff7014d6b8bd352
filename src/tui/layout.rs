//! Rendering.
//!
//! Three stacked regions: chat log, input bar, status line. Pickers render
//! as a centered overlay on top of the chat area.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::app::{ChatRole, Picker, TuiApp};
use super::commands;

pub fn draw(frame: &mut Frame, app: &TuiApp) {
    let [chat_area, input_area, status_area] = Layout::vertical([
        Constraint::Min(3),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_chat(frame, app, chat_area);
    draw_input(frame, app, input_area);
    draw_status(frame, app, status_area);

    if let Some(picker) = &app.picker {
        draw_picker(frame, app, picker, chat_area);
    }
}

fn draw_chat(frame: &mut Frame, app: &TuiApp, area: Rect) {
    let inner_height = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = app
        .chat_log
        .iter()
        .flat_map(|entry| {
            let (prefix, style) = match entry.role {
                ChatRole::User => ("you", Style::default().fg(Color::Cyan)),
                ChatRole::Agent => ("agent", Style::default().fg(Color::Green)),
                ChatRole::System => ("*", Style::default().fg(Color::DarkGray)),
            };
            entry.text.lines().map(move |text| {
                Line::from(vec![
                    Span::styled(format!("{prefix} "), style),
                    Span::raw(text.to_string()),
                ])
            })
        })
        .collect();
    // Pin the view to the newest lines.
    let skip = lines.len().saturating_sub(inner_height);
    let visible: Vec<Line> = lines.into_iter().skip(skip).collect();
    let chat = Paragraph::new(visible).block(Block::default().borders(Borders::ALL).title("chat"));
    frame.render_widget(chat, area);
}

fn draw_input(frame: &mut Frame, app: &TuiApp, area: Rect) {
    let mut spans = vec![Span::raw(app.input.clone())];
    // Ghost completion for a partially typed command.
    if let Some(suffix) = commands::ghost_suffix(&app.input) {
        spans.push(Span::styled(
            suffix,
            Style::default().add_modifier(Modifier::DIM),
        ));
    }
    let input =
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL).title("> "));
    frame.render_widget(input, area);
}

fn draw_status(frame: &mut Frame, app: &TuiApp, area: Rect) {
    let running = app.tasks.iter().filter(|t| t.status.is_running()).count();
    let text = format!(
        " {} task(s), {} running — /help for commands",
        app.tasks.len(),
        running
    );
    let status = Paragraph::new(text).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(status, area);
}

fn draw_picker(frame: &mut Frame, app: &TuiApp, picker: &Picker, within: Rect) {
    let rows = picker.list.visible_slice();
    // +2 borders, +1 optional status line, +2 possible arrows.
    let height = (rows.len() as u16 + 5).min(within.height);
    let width = (within.width * 3 / 4).max(30).min(within.width);
    let area = centered(within, width, height);
    frame.render_widget(Clear, area);

    let width_digits = picker.list.index_width();
    let mut lines: Vec<Line> = Vec::with_capacity(rows.len() + 3);

    if picker.list.can_scroll_up() {
        lines.push(Line::from(Span::styled(
            "  ▲",
            Style::default().add_modifier(Modifier::DIM),
        )));
    }
    for row in &rows {
        let marker = if row.is_active { ">" } else { " " };
        let number = format!("{:>width$}", row.index + 1, width = width_digits);
        let mut style = Style::default();
        if row.is_active {
            style = style.add_modifier(Modifier::BOLD).fg(Color::Cyan);
        }
        if row.item.disabled {
            style = style.add_modifier(Modifier::DIM);
        }
        lines.push(Line::from(Span::styled(
            format!("{marker} {number}. {}", row.item.display_label()),
            style,
        )));
    }
    if picker.list.can_scroll_down() {
        lines.push(Line::from(Span::styled(
            "  ▼",
            Style::default().add_modifier(Modifier::DIM),
        )));
    }
    if let Some(status) = &app.picker_status {
        lines.push(Line::from(Span::styled(
            status.clone(),
            Style::default().add_modifier(Modifier::DIM),
        )));
    }

    let mut title = picker.title.clone();
    // Surface the in-flight numeric jump.
    if !picker.list.buffer().is_empty() {
        title = format!("{title} [{}]", picker.list.buffer());
    }
    let body = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(body, area);
}

fn centered(within: Rect, width: u16, height: u16) -> Rect {
    let x = within.x + within.width.saturating_sub(width) / 2;
    let y = within.y + within.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(within.width),
        height: height.min(within.height),
    }
}
