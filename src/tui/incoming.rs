//! Incoming-messages view: owns the table and performs the one-shot load.

use chrono::{DateTime, Local};

use super::backend::{Backend, BackendCommand};
use crate::api::FetchError;
use crate::models::IncomingResponse;
use crate::table::{Column, SortDirection, TableColumn, TableDisplay, TableOptions};

/// Load lifecycle of the view. There is no way back to `Empty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Empty,
    Loaded,
}

/// Outcome of the last load, for the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading,
    /// Response applied; `rows` is the new row count.
    Replaced { rows: usize, at: DateTime<Local> },
    /// Response had no `messages` field; nothing changed.
    Unchanged,
    Failed(String),
}

pub struct IncomingView {
    table: TableDisplay<Column>,
    state: LoadState,
    status: LoadStatus,
}

impl IncomingView {
    /// Build the view with an empty table: columns id, created_at, mobile,
    /// body; no page-length control; no search label; newest id first.
    pub fn initialize(page_length: usize) -> Self {
        let table = TableDisplay::new(TableOptions {
            page_length,
            length_change: false,
            search_label: String::new(),
            order: vec![(Column::Id, SortDirection::Desc)],
            columns: Column::ALL.to_vec(),
        });

        Self {
            table,
            state: LoadState::Empty,
            status: LoadStatus::Idle,
        }
    }

    pub fn table(&self) -> &TableDisplay<Column> {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut TableDisplay<Column> {
        &mut self.table
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// Request the incoming messages. The result arrives later through
    /// `Backend::recv` and is handed to `finish_load`.
    pub fn load_data(&mut self, backend: &Backend) {
        tracing::info!("Loading incoming messages");
        self.status = LoadStatus::Loading;
        backend.send(BackendCommand::LoadIncoming);
    }

    /// Apply a completed load.
    pub fn finish_load(&mut self, result: Result<IncomingResponse, FetchError>) {
        match result {
            Ok(resp) => self.apply(resp),
            Err(e) => self.apply_error(&e.to_string()),
        }
    }

    /// Apply a successful response to the table.
    pub fn apply(&mut self, resp: IncomingResponse) {
        if replace_rows(&mut self.table, resp) {
            self.state = LoadState::Loaded;
            self.status = LoadStatus::Replaced {
                rows: self.table.len(),
                at: Local::now(),
            };
            tracing::info!("Loaded {} incoming messages", self.table.len());
        } else {
            self.status = LoadStatus::Unchanged;
            tracing::debug!("Response without messages, table left as is");
        }
    }

    /// Record a failed load. The table is not touched.
    pub fn apply_error(&mut self, error: &str) {
        tracing::warn!("Loading incoming messages failed: {}", error);
        self.status = LoadStatus::Failed(error.to_string());
    }
}

/// Replace the table's rows with the response's messages, in received order.
///
/// Returns `false` without touching the table when the response has no
/// `messages` field.
pub fn replace_rows(table: &mut TableDisplay<Column>, resp: IncomingResponse) -> bool {
    let Some(messages) = resp.messages else {
        return false;
    };
    table.clear();
    table.add_data(messages);
    true
}
