//! Detail popup for the selected message: every field plus the full body.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::help::centered_rect;
use crate::models::{IncomingMessage, OutgoingMessage};

const POPUP_WIDTH: u16 = 64;
const POPUP_HEIGHT: u16 = 16;

pub fn render_detail_popup(frame: &mut Frame, title: String, lines: Vec<Line<'static>>) {
    let area = frame.area();
    let popup_area = centered_rect(
        POPUP_WIDTH.min(area.width.saturating_sub(2)),
        POPUP_HEIGHT.min(area.height.saturating_sub(2)),
        area,
    );
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from(Span::styled(
            " Esc/Enter to close ",
            Style::default().fg(Color::Gray),
        )));

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        popup_area,
    );
}

fn popup_title(kind: &str, id: Option<i64>) -> String {
    match id {
        Some(id) => format!(" {} #{} ", kind, id),
        None => format!(" {} ", kind),
    }
}

fn field(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<10}", label), Style::default().fg(Color::Cyan)),
        Span::raw(value),
    ])
}

fn with_body(mut lines: Vec<Line<'static>>, body: &str) -> Vec<Line<'static>> {
    lines.push(Line::from(""));
    lines.extend(body.lines().map(|l| Line::from(l.to_string())));
    lines
}

pub fn incoming_title(msg: &IncomingMessage) -> String {
    popup_title("Message", msg.id)
}

pub fn incoming_lines(msg: &IncomingMessage) -> Vec<Line<'static>> {
    let mut lines = vec![
        field("From:", msg.mobile.clone()),
        field("Received:", msg.created_at.clone()),
    ];
    if let Some(ref device) = msg.device {
        lines.push(field("Device:", device.clone()));
    }
    with_body(lines, &msg.body)
}

pub fn outgoing_title(msg: &OutgoingMessage) -> String {
    popup_title("Sent", msg.id)
}

pub fn outgoing_lines(msg: &OutgoingMessage) -> Vec<Line<'static>> {
    let status = msg.status.map(|s| s.to_string()).unwrap_or_default();
    let mut lines = vec![
        field("To:", msg.mobile.clone()),
        field("Status:", format!("{} ({} retries)", status, msg.retries)),
        field("Queued:", msg.created_at.clone()),
        field("Updated:", msg.updated_at.clone()),
    ];
    if !msg.device.is_empty() {
        lines.push(field("Device:", msg.device.clone()));
    }
    if !msg.uuid.is_empty() {
        lines.push(field("UUID:", msg.uuid.clone()));
    }
    with_body(lines, &msg.body)
}
