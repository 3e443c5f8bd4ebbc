//! Outgoing log view: sent-message table plus delivery statistics.
//!
//! Loaded once, the first time the tab is opened.

use chrono::Local;

use super::backend::{Backend, BackendCommand};
use super::incoming::LoadStatus;
use crate::api::{self, FetchError};
use crate::models::{LogsResponse, StatusSummary};
use crate::table::{OutgoingColumn, SortDirection, TableColumn, TableDisplay, TableOptions};

pub struct OutgoingView {
    table: TableDisplay<OutgoingColumn>,
    status: LoadStatus,
    summary: Option<StatusSummary>,
    days: Vec<(String, u64)>,
}

impl OutgoingView {
    pub fn new(page_length: usize) -> Self {
        let table = TableDisplay::new(TableOptions {
            page_length,
            length_change: false,
            search_label: String::new(),
            order: vec![(OutgoingColumn::Id, SortDirection::Desc)],
            columns: OutgoingColumn::ALL.to_vec(),
        });

        Self {
            table,
            status: LoadStatus::Idle,
            summary: None,
            days: Vec::new(),
        }
    }

    pub fn table(&self) -> &TableDisplay<OutgoingColumn> {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut TableDisplay<OutgoingColumn> {
        &mut self.table
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// True until the first load has been requested.
    pub fn needs_load(&self) -> bool {
        self.status == LoadStatus::Idle
    }

    pub fn load_data(&mut self, backend: &Backend) {
        tracing::info!("Loading outgoing log");
        self.status = LoadStatus::Loading;
        backend.send(BackendCommand::LoadOutgoing);
    }

    pub fn finish_load(&mut self, result: Result<LogsResponse, FetchError>) {
        match result {
            Ok(resp) => self.apply(resp),
            Err(e) => self.apply_error(&e.to_string()),
        }
    }

    /// Apply a response. Statistics and rows are each replaced only when the
    /// response carries them.
    pub fn apply(&mut self, resp: LogsResponse) {
        if let Some(summary) = resp.status_summary() {
            self.summary = Some(summary);
        }
        if resp.daycount.is_some() {
            self.days = resp.recent_days();
        }

        match resp.messages {
            Some(messages) => {
                self.table.clear();
                self.table.add_data(messages);
                self.status = LoadStatus::Replaced {
                    rows: self.table.len(),
                    at: Local::now(),
                };
                tracing::info!("Loaded {} outgoing messages", self.table.len());
            }
            None => {
                self.status = LoadStatus::Unchanged;
                tracing::debug!("Outgoing response without messages, table left as is");
            }
        }
    }

    pub fn apply_error(&mut self, error: &str) {
        tracing::warn!("Loading outgoing log failed: {}", error);
        self.status = LoadStatus::Failed(error.to_string());
    }

    /// Summary and activity, for the line above the table.
    pub fn stats_line(&self) -> String {
        let activity = api::activity_line(&self.days);
        match self.summary {
            Some(ref summary) => format!("{}  |  {}", api::summary_line(summary), activity),
            None => activity,
        }
    }
}
