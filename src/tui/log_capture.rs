//! In-memory log sink for TUI mode
//!
//! `LogRing` is the fmt layer's writer while the alternate screen is active.
//! `make_writer_for` tags every line with its event's level and a source
//! derived from the event target, so the debug pane can color and filter
//! records without parsing the formatted text.

use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Mutex};

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;

/// Records kept before the oldest is dropped.
const CAPACITY: usize = 512;

/// Which part of the app emitted a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSource {
    /// View load lifecycle (`tui::incoming`, `tui::outgoing`).
    Load,
    /// Gateway HTTP client (`api`).
    Gateway,
    /// Everything else, including dependencies.
    Other,
}

impl LogSource {
    pub fn from_target(target: &str) -> Self {
        let module = match target.split_once("::") {
            Some((krate, module)) if krate == env!("CARGO_CRATE_NAME") => module,
            _ => return LogSource::Other,
        };
        if module.starts_with("api") {
            LogSource::Gateway
        } else if module.starts_with("tui::incoming") || module.starts_with("tui::outgoing") {
            LogSource::Load
        } else {
            LogSource::Other
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            LogSource::Load => "load",
            LogSource::Gateway => "http",
            LogSource::Other => "",
        }
    }
}

/// One formatted log line with the metadata it was written under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: Level,
    pub source: LogSource,
    pub text: String,
}

/// Shared bounded queue of log records.
#[derive(Clone, Default)]
pub struct LogRing {
    records: Arc<Mutex<VecDeque<LogRecord>>>,
}

impl LogRing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, evicting the oldest when full.
    pub fn push(&self, record: LogRecord) {
        // A poisoned lock still holds usable records.
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        if records.len() == CAPACITY {
            records.pop_front();
        }
        records.push_back(record);
    }

    /// Take every queued record, oldest first.
    pub fn take_all(&self) -> Vec<LogRecord> {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        records.drain(..).collect()
    }
}

/// Per-event writer. Complete lines become records; a trailing partial line
/// is pushed when the writer is dropped.
pub struct RingWriter {
    ring: LogRing,
    level: Level,
    source: LogSource,
    partial: Vec<u8>,
}

impl RingWriter {
    fn push_line(&self, mut line: Vec<u8>) {
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        self.ring.push(LogRecord {
            level: self.level,
            source: self.source,
            text: String::from_utf8_lossy(&line).into_owned(),
        });
    }
}

impl Write for RingWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.partial.extend_from_slice(buf);
        while let Some(nl) = self.partial.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.partial.drain(..=nl).take(nl).collect();
            self.push_line(line);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Drop for RingWriter {
    fn drop(&mut self) {
        if !self.partial.is_empty() {
            let line = std::mem::take(&mut self.partial);
            self.push_line(line);
        }
    }
}

impl<'a> MakeWriter<'a> for LogRing {
    type Writer = RingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        RingWriter {
            ring: self.clone(),
            level: Level::INFO,
            source: LogSource::Other,
            partial: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        RingWriter {
            ring: self.clone(),
            level: *meta.level(),
            source: LogSource::from_target(meta.target()),
            partial: Vec::new(),
        }
    }
}
