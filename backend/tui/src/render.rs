//! TUI Rendering
//!
//! Draws the transcript, a loading indicator while a reply streams, and the
//! input box.

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crumb_core::{ChatMessage, Role};

use crate::app::AppState;
use crate::streaming::ChatView;

const LOADING: &str = "Assistant is typing…";

pub fn draw_ui(f: &mut Frame, state: &AppState, view: &ChatView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(3),    // transcript
            Constraint::Length(1), // status
            Constraint::Length(3), // input
        ])
        .split(f.size());

    let lines: Vec<Line> = view
        .transcript
        .messages()
        .iter()
        .filter(|m| m.role != Role::System)
        .flat_map(message_lines)
        .collect();

    // Keep the newest lines in view.
    let height = chunks[0].height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(height) as u16;
    let transcript = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(Block::default().title("Crumb").borders(Borders::ALL));
    f.render_widget(transcript, chunks[0]);

    let status = if view.busy {
        Paragraph::new(LOADING).style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new("")
    };
    f.render_widget(status, chunks[1]);

    let input = Paragraph::new(state.input.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().title("Message (Enter to send, Esc to quit)").borders(Borders::ALL));
    f.render_widget(input, chunks[2]);
}

fn message_lines(message: &ChatMessage) -> Vec<Line<'static>> {
    let (label, color) = match message.role {
        Role::User => ("You", Color::Cyan),
        _ => ("Assistant", Color::Green),
    };
    let mut lines = vec![Line::from(Span::styled(
        format!("{label}:"),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))];
    lines.extend(message.content.lines().map(|l| Line::from(l.to_string())));
    lines.push(Line::default());
    lines
}
