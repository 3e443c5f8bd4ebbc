//! TUI application state and main event loop

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::DefaultTerminal;

use super::backend::{Backend, BackendResponse};
use super::debug_log::DebugLogState;
use super::incoming::{IncomingView, LoadStatus};
use super::log_capture::LogRing;
use super::outgoing::OutgoingView;
use super::search::SearchState;
use super::ui;
use crate::config::Config;
use crate::table::{TableColumn, TableDisplay};

/// How often captured log lines are pulled into the debug pane.
const LOG_REFRESH: Duration = Duration::from_millis(250);

/// Which table is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Incoming,
    Outgoing,
}

/// Application state
pub struct App {
    pub should_exit: bool,
    pub server_url: String,
    pub tab: Tab,
    pub view: IncomingView,
    pub outgoing: OutgoingView,
    pub incoming_search: SearchState,
    pub outgoing_search: SearchState,
    pub debug_log: DebugLogState,
    pub show_help: bool,
    pub show_detail: bool,
    /// Set when the backend could not build its client; later loads fail
    /// with this instead of waiting forever.
    client_error: Option<String>,
}

impl App {
    pub fn new(config: &Config, logs: LogRing) -> Self {
        Self {
            should_exit: false,
            server_url: config.server_url.clone(),
            tab: Tab::Incoming,
            view: IncomingView::initialize(config.page_length),
            outgoing: OutgoingView::new(config.page_length),
            incoming_search: SearchState::default(),
            outgoing_search: SearchState::default(),
            debug_log: DebugLogState::new(logs),
            show_help: false,
            show_detail: false,
            client_error: None,
        }
    }

    pub fn search(&self) -> &SearchState {
        match self.tab {
            Tab::Incoming => &self.incoming_search,
            Tab::Outgoing => &self.outgoing_search,
        }
    }

    fn search_mut(&mut self) -> &mut SearchState {
        match self.tab {
            Tab::Incoming => &mut self.incoming_search,
            Tab::Outgoing => &mut self.outgoing_search,
        }
    }

    /// Push the active search query into the active table.
    fn apply_search(&mut self) {
        let query = self.search().query.clone();
        match self.tab {
            Tab::Incoming => self.view.table_mut().set_search(&query),
            Tab::Outgoing => self.outgoing.table_mut().set_search(&query),
        }
    }

    /// Route a key press to whichever layer currently has focus.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        // Raw mode swallows SIGINT.
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_exit = true;
            return;
        }

        if self.show_help {
            self.show_help = false;
            return;
        }

        if self.show_detail {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                self.show_detail = false;
            }
            return;
        }

        if self.search().editing {
            self.handle_search_key(key.code);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_exit = true,
            KeyCode::Esc => {
                if self.search().query.is_empty() {
                    self.should_exit = true;
                } else {
                    self.search_mut().cancel();
                    self.apply_search();
                }
            }
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('/') => self.search_mut().begin(),
            KeyCode::Tab | KeyCode::BackTab => {
                self.tab = match self.tab {
                    Tab::Incoming => Tab::Outgoing,
                    Tab::Outgoing => Tab::Incoming,
                };
            }
            KeyCode::Enter => {
                self.show_detail = match self.tab {
                    Tab::Incoming => self.view.table().selected_row().is_some(),
                    Tab::Outgoing => self.outgoing.table().selected_row().is_some(),
                };
            }
            KeyCode::F(12) => self.debug_log.toggle(),
            KeyCode::PageUp if self.debug_log.visible => self.debug_log.scroll_up(5),
            KeyCode::PageDown if self.debug_log.visible => self.debug_log.scroll_down(5),
            KeyCode::Char('l') if self.debug_log.visible => self.debug_log.cycle_filter(),
            code => match self.tab {
                Tab::Incoming => table_key(self.view.table_mut(), code),
                Tab::Outgoing => table_key(self.outgoing.table_mut(), code),
            },
        }
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        let search = self.search_mut();
        match code {
            KeyCode::Esc => search.cancel(),
            KeyCode::Enter => search.commit(),
            KeyCode::Backspace => search.backspace(),
            KeyCode::Left => search.move_left(),
            KeyCode::Right => search.move_right(),
            KeyCode::Char(c) => search.insert_char(c),
            _ => return,
        }
        // Filter as you type.
        self.apply_search();
    }

    /// Request the outgoing log the first time its tab is shown.
    pub fn load_outgoing_if_needed(&mut self, backend: &Backend) {
        if self.tab != Tab::Outgoing || !self.outgoing.needs_load() {
            return;
        }
        match self.client_error {
            Some(ref e) => self.outgoing.apply_error(e),
            None => self.outgoing.load_data(backend),
        }
    }

    /// Apply a backend response.
    pub fn handle_response(&mut self, resp: BackendResponse) {
        match resp {
            BackendResponse::Incoming(result) => self.view.finish_load(result),
            BackendResponse::Outgoing(result) => self.outgoing.finish_load(result),
            BackendResponse::ClientError(e) => {
                self.view.apply_error(&e);
                if self.outgoing.status() == &LoadStatus::Loading {
                    self.outgoing.apply_error(&e);
                }
                self.client_error = Some(e);
            }
        }
    }

    /// Load status of the table on screen.
    pub fn active_status(&self) -> &LoadStatus {
        match self.tab {
            Tab::Incoming => self.view.status(),
            Tab::Outgoing => self.outgoing.status(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.active_status(), LoadStatus::Loading)
    }

    /// Render the UI
    pub fn render(&self, frame: &mut ratatui::Frame) {
        ui::render(frame, self);
    }
}

/// Paging, selection and sort keys, for whichever table is active.
fn table_key<C: TableColumn>(table: &mut TableDisplay<C>, code: KeyCode) {
    match code {
        KeyCode::Right | KeyCode::Char('n') => {
            table.next_page();
        }
        KeyCode::Left | KeyCode::Char('p') => {
            table.previous_page();
        }
        KeyCode::Home => table.first_page(),
        KeyCode::End => table.last_page(),
        KeyCode::Down | KeyCode::Char('j') => table.select_next(),
        KeyCode::Up | KeyCode::Char('k') => table.select_previous(),
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            if let Some(column) = C::from_index(index) {
                table.sort_by(column);
            }
        }
        KeyCode::Char('+') | KeyCode::Char('-') => {
            let current = table.page_length();
            let wanted = if code == KeyCode::Char('+') {
                current + 5
            } else {
                current.saturating_sub(5)
            };
            if !table.set_page_length(wanted) {
                tracing::debug!("Page length is fixed at {}", current);
            }
        }
        _ => {}
    }
}

/// Run the TUI until the user quits. The terminal is restored on every exit
/// path; ratatui's panic hook covers panics.
pub async fn run(config: Config, logs: LogRing) -> Result<()> {
    let mut terminal = ratatui::init();
    let result = run_app(&mut terminal, config, logs).await;
    ratatui::restore();
    result
}

async fn run_app(terminal: &mut DefaultTerminal, config: Config, logs: LogRing) -> Result<()> {
    let mut app = App::new(&config, logs);
    let mut backend = Backend::start(config);
    let mut events = EventStream::new();
    let mut log_tick = tokio::time::interval(LOG_REFRESH);
    let mut backend_open = true;

    // One incoming load per start; no refresh.
    app.view.load_data(&backend);

    while !app.should_exit {
        terminal.draw(|frame| app.render(frame))?;

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) => {
                    app.handle_key(key);
                    app.load_outgoing_if_needed(&backend);
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => app.should_exit = true,
            },
            resp = backend.recv(), if backend_open => match resp {
                Some(resp) => app.handle_response(resp),
                None => backend_open = false,
            },
            _ = log_tick.tick() => app.debug_log.refresh(),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::backend::BackendCommand;
    use crate::tui::debug_log::LogFilter;
    use crate::tui::log_capture::{LogRecord, LogSource};

    fn app_with_rows(n: i64) -> App {
        let mut app = App::new(&Config::default(), LogRing::new());
        let json = format!(
            "{{\"messages\":[{}]}}",
            (1..=n)
                .map(|i| format!(
                    "{{\"id\":{},\"created_at\":\"t{}\",\"mobile\":\"m{}\",\"body\":\"body {}\"}}",
                    i, i, i, i
                ))
                .collect::<Vec<_>>()
                .join(",")
        );
        app.handle_response(BackendResponse::Incoming(Ok(
            serde_json::from_str(&json).unwrap()
        )));
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_paging_keys() {
        let mut app = app_with_rows(12);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.view.table().page(), 1);
        press(&mut app, KeyCode::End);
        assert_eq!(app.view.table().page(), 2);
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.view.table().page(), 1);
        press(&mut app, KeyCode::Home);
        assert_eq!(app.view.table().page(), 0);
    }

    #[test]
    fn test_search_filters_while_typing() {
        let mut app = app_with_rows(12);
        press(&mut app, KeyCode::Char('/'));
        for c in "body 1".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        // 'q' while editing is text, not quit.
        assert!(!app.should_exit);
        assert_eq!(app.view.table().filtered_len(), 4);

        press(&mut app, KeyCode::Enter);
        assert!(!app.incoming_search.editing);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.view.table().filtered_len(), 12);
        assert!(!app.should_exit);
    }

    #[test]
    fn test_sort_key_toggles_id() {
        let mut app = app_with_rows(3);
        press(&mut app, KeyCode::Char('1'));
        let first = app.view.table().page_rows()[0].id;
        assert_eq!(first, Some(1));
    }

    #[test]
    fn test_detail_popup() {
        let mut app = app_with_rows(2);
        press(&mut app, KeyCode::Enter);
        assert!(app.show_detail);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.show_detail);
        assert!(!app.should_exit);

        let mut empty = App::new(&Config::default(), LogRing::new());
        press(&mut empty, KeyCode::Enter);
        assert!(!empty.show_detail);
    }

    #[test]
    fn test_client_error_does_not_exit() {
        let mut app = App::new(&Config::default(), LogRing::new());
        app.handle_response(BackendResponse::ClientError("invalid server URL".to_string()));
        assert!(matches!(app.view.status(), LoadStatus::Failed(_)));
        assert!(!app.should_exit);
        assert_eq!(app.view.table().len(), 0);
    }

    #[test]
    fn test_page_length_is_fixed() {
        let mut app = app_with_rows(12);
        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.view.table().page_length(), 5);
        assert_eq!(app.view.table().page_count(), 3);
    }

    #[test]
    fn test_quit() {
        let mut app = App::new(&Config::default(), LogRing::new());
        press(&mut app, KeyCode::Char('?'));
        press(&mut app, KeyCode::Char('q'));
        // First key closes help.
        assert!(!app.should_exit);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_exit);
    }

    #[test]
    fn test_ctrl_c_quits_from_any_layer() {
        let mut app = app_with_rows(2);
        press(&mut app, KeyCode::Char('/'));
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_exit);
        // Not typed into the query.
        assert_eq!(app.incoming_search.query, "");
    }

    #[test]
    fn test_log_keys_need_visible_pane() {
        let logs = LogRing::new();
        for i in 0..20 {
            logs.push(LogRecord {
                level: tracing::Level::INFO,
                source: LogSource::Other,
                text: i.to_string(),
            });
        }
        let mut app = App::new(&Config::default(), logs);
        app.debug_log.refresh();

        press(&mut app, KeyCode::PageUp);
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.debug_log.scroll_back(), 0);
        assert_eq!(app.debug_log.filter, LogFilter::All);

        press(&mut app, KeyCode::F(12));
        press(&mut app, KeyCode::PageUp);
        assert_eq!(app.debug_log.scroll_back(), 5);
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.debug_log.filter, LogFilter::App);
    }

    #[test]
    fn test_tab_loads_outgoing_once() {
        let (backend, mut cmd_rx, _resp_tx) = Backend::detached();
        let mut app = App::new(&Config::default(), LogRing::new());

        app.load_outgoing_if_needed(&backend);
        assert!(cmd_rx.try_recv().is_err());

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.tab, Tab::Outgoing);
        app.load_outgoing_if_needed(&backend);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        app.load_outgoing_if_needed(&backend);

        assert_eq!(cmd_rx.try_recv().unwrap(), BackendCommand::LoadOutgoing);
        assert!(cmd_rx.try_recv().is_err());
        assert!(app.is_loading());
    }

    #[test]
    fn test_outgoing_tab_after_client_error() {
        let (backend, mut cmd_rx, _resp_tx) = Backend::detached();
        let mut app = App::new(&Config::default(), LogRing::new());
        app.handle_response(BackendResponse::ClientError("invalid server URL".to_string()));

        press(&mut app, KeyCode::Tab);
        app.load_outgoing_if_needed(&backend);
        assert!(cmd_rx.try_recv().is_err());
        assert!(matches!(app.outgoing.status(), LoadStatus::Failed(_)));
    }

    #[test]
    fn test_outgoing_keys_and_search_are_separate() {
        let mut app = app_with_rows(3);
        app.handle_response(BackendResponse::Outgoing(Ok(serde_json::from_str(
            r#"{"messages":[{"id":1,"mobile":"a","status":1},{"id":2,"mobile":"b","status":2}]}"#,
        )
        .unwrap())));
        press(&mut app, KeyCode::Tab);

        // Column 4 is status on the outgoing table.
        press(&mut app, KeyCode::Char('4'));
        let first = app.outgoing.table().page_rows()[0].id;
        assert_eq!(first, Some(1));

        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Char('b'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.outgoing.table().filtered_len(), 1);
        assert_eq!(app.view.table().filtered_len(), 3);

        press(&mut app, KeyCode::Enter);
        assert!(app.show_detail);
    }
}
