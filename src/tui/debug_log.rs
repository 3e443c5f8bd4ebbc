//! Debug log pane: captured tracing records below the table, with a filter
//! for the app's own load and HTTP events and a running warning count.

use std::collections::VecDeque;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use tracing::Level;

use super::log_capture::{LogRecord, LogRing, LogSource};

/// Records kept for scrolling.
const MAX_HISTORY: usize = 2000;

/// Height of the pane when visible.
pub const DEBUG_LOG_HEIGHT: u16 = 8;

/// Which records the pane shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFilter {
    All,
    /// Load lifecycle and gateway HTTP events only.
    App,
    /// WARN and ERROR from any source.
    Problems,
}

impl LogFilter {
    pub fn next(self) -> Self {
        match self {
            LogFilter::All => LogFilter::App,
            LogFilter::App => LogFilter::Problems,
            LogFilter::Problems => LogFilter::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LogFilter::All => "all",
            LogFilter::App => "load+http",
            LogFilter::Problems => "warnings",
        }
    }

    pub fn accepts(&self, record: &LogRecord) -> bool {
        match self {
            LogFilter::All => true,
            LogFilter::App => record.source != LogSource::Other,
            LogFilter::Problems => record.level <= Level::WARN,
        }
    }
}

pub struct DebugLogState {
    ring: LogRing,
    history: VecDeque<LogRecord>,
    pub visible: bool,
    pub filter: LogFilter,
    /// Shown lines scrolled back from the newest (0 = follow tail).
    scroll_back: usize,
    /// WARN/ERROR records seen since the pane was last opened.
    unseen_problems: usize,
}

impl DebugLogState {
    pub fn new(ring: LogRing) -> Self {
        Self {
            ring,
            history: VecDeque::new(),
            visible: false,
            filter: LogFilter::All,
            scroll_back: 0,
            unseen_problems: 0,
        }
    }

    /// Move queued records from the ring into history.
    pub fn refresh(&mut self) {
        for record in self.ring.take_all() {
            if !self.visible && record.level <= Level::WARN {
                self.unseen_problems += 1;
            }
            if self.history.len() == MAX_HISTORY {
                self.history.pop_front();
            }
            self.history.push_back(record);
        }
        self.scroll_back = self.scroll_back.min(self.max_scroll());
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        if self.visible {
            self.scroll_back = 0;
            self.unseen_problems = 0;
        }
    }

    pub fn cycle_filter(&mut self) {
        self.filter = self.filter.next();
        self.scroll_back = 0;
    }

    pub fn unseen_problems(&self) -> usize {
        self.unseen_problems
    }

    /// Records passing the current filter, oldest first.
    fn shown(&self) -> impl Iterator<Item = &LogRecord> {
        let filter = self.filter;
        self.history.iter().filter(move |r| filter.accepts(r))
    }

    fn max_scroll(&self) -> usize {
        self.shown().count().saturating_sub(1)
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.scroll_back = (self.scroll_back + n).min(self.max_scroll());
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.scroll_back = self.scroll_back.saturating_sub(n);
    }

    #[cfg(test)]
    pub fn scroll_back(&self) -> usize {
        self.scroll_back
    }
}

pub fn render(area: Rect, buf: &mut Buffer, state: &DebugLogState) {
    let title = format!(" Log (F12, l: {}) ", state.filter.label());
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    block.render(area, buf);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let shown: Vec<&LogRecord> = state.shown().collect();
    let end = shown.len().saturating_sub(state.scroll_back);
    let start = end.saturating_sub(inner.height as usize);

    let lines: Vec<Line> = shown[start..end].iter().map(|r| record_line(r)).collect();
    Paragraph::new(lines).render(inner, buf);
}

fn level_color(level: Level) -> Color {
    match level {
        Level::ERROR => Color::Red,
        Level::WARN => Color::Yellow,
        Level::INFO => Color::Green,
        _ => Color::DarkGray,
    }
}

/// A record as one pane line: source tag, then the formatted text.
fn record_line(record: &LogRecord) -> Line<'static> {
    let style = Style::default().fg(level_color(record.level));
    let mut spans = Vec::with_capacity(2);
    if record.source != LogSource::Other {
        spans.push(Span::styled(
            format!("[{}] ", record.source.tag()),
            Style::default().fg(Color::Magenta),
        ));
    }
    spans.push(Span::styled(record.text.clone(), style));
    Line::from(spans)
}
