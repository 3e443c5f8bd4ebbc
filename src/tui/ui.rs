//! UI rendering for the TUI

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    Frame,
};

use super::app::{App, Tab};
use super::debug_log::{self, DEBUG_LOG_HEIGHT};
use super::detail;
use super::help;
use super::incoming::{LoadState, LoadStatus};
use super::messages;

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let log_height = if app.debug_log.visible {
        DEBUG_LOG_HEIGHT
    } else {
        0
    };

    let stats_height = u16::from(app.tab == Tab::Outgoing);

    // Layout: header + stats (outgoing) + table + debug log (optional) + status bar
    let [header_area, stats_area, main_area, log_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(stats_height),
        Constraint::Fill(1),
        Constraint::Length(log_height),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(header_area, frame.buffer_mut(), app);

    match app.tab {
        Tab::Incoming => messages::render(
            main_area,
            frame.buffer_mut(),
            "Incoming",
            app.view.table(),
            app.search(),
            app.is_loading(),
        ),
        Tab::Outgoing => {
            Paragraph::new(Span::styled(
                format!(" {}", app.outgoing.stats_line()),
                Style::default().fg(Color::Cyan),
            ))
            .render(stats_area, frame.buffer_mut());
            messages::render(
                main_area,
                frame.buffer_mut(),
                "Outgoing",
                app.outgoing.table(),
                app.search(),
                app.is_loading(),
            );
        }
    }

    if app.debug_log.visible {
        debug_log::render(log_area, frame.buffer_mut(), &app.debug_log);
    }

    render_status(status_area, frame.buffer_mut(), app);

    if app.show_detail {
        let selected = match app.tab {
            Tab::Incoming => app
                .view
                .table()
                .selected_row()
                .map(|m| (detail::incoming_title(m), detail::incoming_lines(m))),
            Tab::Outgoing => app
                .outgoing
                .table()
                .selected_row()
                .map(|m| (detail::outgoing_title(m), detail::outgoing_lines(m))),
        };
        if let Some((title, lines)) = selected {
            detail::render_detail_popup(frame, title, lines);
        }
    }

    if app.show_help {
        help::render_help_popup(frame);
    }
}

fn tab_span(label: &'static str, active: bool) -> Span<'static> {
    if active {
        Span::styled(
            format!("[{}]", label),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(format!(" {} ", label), Style::default().fg(Color::Gray))
    }
}

fn render_header(area: Rect, buf: &mut Buffer, app: &App) {
    let title = " SMS Inbox  ";
    let tabs = [
        tab_span("Incoming", app.tab == Tab::Incoming),
        tab_span("Outgoing", app.tab == Tab::Outgoing),
    ];
    let right = format!("[?] Help  {} ", app.server_url);
    let used = title.len() + tabs.iter().map(|t| t.content.len()).sum::<usize>() + right.len();
    let pad = (area.width as usize).saturating_sub(used);

    let mut spans = vec![Span::styled(
        title,
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )];
    spans.extend(tabs);
    spans.push(Span::raw(" ".repeat(pad)));
    spans.push(Span::styled(right, Style::default().fg(Color::Gray)));
    let line = Line::from(spans);

    Paragraph::new(line)
        .style(Style::default().bg(Color::DarkGray))
        .render(area, buf);
}

/// Status bar text and whether it reports an error.
fn status_text(status: &LoadStatus, state: LoadState, what: &str) -> (String, bool) {
    match status {
        LoadStatus::Idle => ("Not loaded".to_string(), false),
        LoadStatus::Loading => (format!("Loading {}...", what), false),
        LoadStatus::Replaced { rows, at } => (
            format!("{} messages loaded at {}", rows, at.format("%H:%M:%S")),
            false,
        ),
        LoadStatus::Unchanged => ("Server returned no messages field".to_string(), false),
        LoadStatus::Failed(e) if state == LoadState::Loaded => {
            (format!("Load failed, showing earlier data: {}", e), true)
        }
        LoadStatus::Failed(e) => (format!("Load failed: {}", e), true),
    }
}

fn render_status(area: Rect, buf: &mut Buffer, app: &App) {
    let (text, is_error) = match app.tab {
        Tab::Incoming => status_text(app.view.status(), app.view.state(), "incoming messages"),
        Tab::Outgoing => {
            let state = if app.outgoing.table().is_empty() {
                LoadState::Empty
            } else {
                LoadState::Loaded
            };
            status_text(app.outgoing.status(), state, "outgoing log")
        }
    };
    let style = if is_error {
        Style::default().fg(Color::Red).bg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Green).bg(Color::DarkGray)
    };

    let sep = || Span::styled(" | ", Style::default().fg(Color::Gray));
    let mut spans = vec![Span::styled(format!(" {}", text), style)];
    let problems = app.debug_log.unseen_problems();
    if problems > 0 {
        spans.push(sep());
        spans.push(Span::styled(
            format!("F12: {} new warnings", problems),
            Style::default().fg(Color::Yellow).bg(Color::DarkGray),
        ));
    }
    spans.push(sep());
    spans.push(Span::styled("Tab: switch  q: quit", Style::default().fg(Color::Gray)));
    let line = Line::from(spans);
    Paragraph::new(line)
        .style(Style::default().bg(Color::DarkGray))
        .render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::tui::log_capture::LogRing;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_status_text() {
        let (text, err) = status_text(&LoadStatus::Loading, LoadState::Empty, "outgoing log");
        assert!(!err);
        assert_eq!(text, "Loading outgoing log...");
        let failed = LoadStatus::Failed("HTTP 500".to_string());
        let (text, err) = status_text(&failed, LoadState::Empty, "incoming messages");
        assert!(err);
        assert_eq!(text, "Load failed: HTTP 500");
        let (text, _) = status_text(&failed, LoadState::Loaded, "incoming messages");
        assert_eq!(text, "Load failed, showing earlier data: HTTP 500");
    }

    #[test]
    fn test_full_frame_renders() {
        let mut app = App::new(&Config::default(), LogRing::new());
        app.view.apply_error("connection refused");
        app.show_help = true;
        app.debug_log.toggle();

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        let buf = terminal.backend().buffer();
        let last: String = (0..100).map(|x| buf[(x, 29)].symbol().to_string()).collect();
        assert!(last.contains("Load failed: connection refused"), "{}", last);
    }

    fn screen(app: &App, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buf = terminal.backend().buffer();
        (0..height)
            .map(|y| (0..width).map(|x| buf[(x, y)].symbol().to_string()).collect())
            .collect()
    }

    #[test]
    fn test_outgoing_tab_shows_stats() {
        let mut app = App::new(&Config::default(), LogRing::new());
        app.tab = Tab::Outgoing;
        app.handle_response(crate::tui::backend::BackendResponse::Outgoing(Ok(
            serde_json::from_str(
                r#"{"summary":[0,1,0],"daycount":{"2015-03-03":1},"messages":[{"id":1,"mobile":"m1","status":1}]}"#,
            )
            .unwrap(),
        )));

        let lines = screen(&app, 120, 20);
        assert!(lines[0].contains("[Outgoing]"), "{}", lines[0]);
        assert!(lines[1].contains("Processed 1"), "{}", lines[1]);
        assert!(lines[1].contains("03-03 1"));
        assert!(lines[19].contains("1 messages loaded"), "{}", lines[19]);
    }

    #[test]
    fn test_status_bar_counts_unseen_warnings() {
        use crate::tui::log_capture::{LogRecord, LogSource};

        let logs = LogRing::new();
        logs.push(LogRecord {
            level: tracing::Level::WARN,
            source: LogSource::Load,
            text: "Loading incoming messages failed".to_string(),
        });
        let mut app = App::new(&Config::default(), logs);
        app.debug_log.refresh();

        let lines = screen(&app, 100, 10);
        assert!(lines[9].contains("F12: 1 new warnings"), "{}", lines[9]);
    }
}
