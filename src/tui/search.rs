//! Search box: line editor whose text filters the table.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Editable search query.
#[derive(Default)]
pub struct SearchState {
    /// Whether keystrokes go to the search box.
    pub editing: bool,
    pub query: String,
    /// Cursor position in characters.
    cursor: usize,
}

impl SearchState {
    /// Start editing, keeping the current query.
    pub fn begin(&mut self) {
        self.editing = true;
        self.cursor = self.query.chars().count();
    }

    /// Stop editing, keeping the query applied.
    pub fn commit(&mut self) {
        self.editing = false;
    }

    /// Stop editing and drop the query.
    pub fn cancel(&mut self) {
        self.editing = false;
        self.query.clear();
        self.cursor = 0;
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.query
            .char_indices()
            .nth(chars)
            .map_or(self.query.len(), |(i, _)| i)
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.query.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_offset(self.cursor);
        self.query.remove(at);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.query.chars().count() {
            self.cursor += 1;
        }
    }
}

/// Render the search line: optional label, then the query.
pub fn render(area: Rect, buf: &mut Buffer, state: &SearchState, label: &str) {
    let mut spans = Vec::new();
    if !label.is_empty() {
        spans.push(Span::styled(
            format!("{} ", label),
            Style::default().fg(Color::Gray),
        ));
    }

    if state.editing {
        let split = state.byte_offset(state.cursor);
        let (before, after) = state.query.split_at(split);
        let mut rest = after.chars();
        let under = rest.next().map_or(" ".to_string(), |c| c.to_string());
        spans.push(Span::styled("/", Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(before.to_string()));
        spans.push(Span::styled(
            under,
            Style::default().add_modifier(Modifier::REVERSED),
        ));
        spans.push(Span::raw(rest.as_str().to_string()));
    } else if !state.query.is_empty() {
        spans.push(Span::styled(
            format!("/{}", state.query),
            Style::default().fg(Color::Yellow),
        ));
    } else {
        spans.push(Span::styled(
            "/ to search",
            Style::default().fg(Color::DarkGray),
        ));
    }

    Paragraph::new(Line::from(spans)).render(area, buf);
}
